//! Simulator: owns the source, the assembled program, and the VM side-by-side.
//!
//! The VM borrows the program on every `run_instruction` call instead of
//! holding a pointer into the parser's output, so re-assembling the source
//! never leaves the VM looking at a stale instruction list.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::asm::{self, Program, Token};
use crate::common::error::{ExecutionError, SimError};
use crate::config::Config;
use crate::sim::loader;
use crate::vm::{Outcome, VirtualMachine};

/// Execution state of a [`Simulator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecState {
    /// Nothing has executed since the last reset.
    #[default]
    Idle,
    /// `run` is executing instructions.
    Running,
    /// Stopped mid-program by `step` or a `break`; resumable.
    Paused,
    /// The program ran off its end or faulted.
    Halted,
}

impl ExecState {
    /// Execution has started and not finished (`Running` or `Paused`).
    pub const fn is_running(self) -> bool {
        matches!(self, Self::Running | Self::Paused)
    }

    /// Execution is suspended and resumable.
    pub const fn is_paused(self) -> bool {
        matches!(self, Self::Paused)
    }
}

/// Top-level simulator: source text, assembled program, and VM.
#[derive(Debug)]
pub struct Simulator {
    filename: Option<PathBuf>,
    source: String,
    config: Config,
    tokens: Vec<Token>,
    program: Program,
    vm: VirtualMachine,
    state: ExecState,
}

impl Default for Simulator {
    fn default() -> Self {
        Self::empty()
    }
}

impl Simulator {
    /// Creates a simulator over `source` with the default configuration.
    pub fn new(source: impl Into<String>) -> Self {
        Self::with_config(source, Config::default())
    }

    /// Creates a simulator with no source.
    pub fn empty() -> Self {
        Self::new(String::new())
    }

    /// Creates a simulator over `source` with an explicit configuration.
    pub fn with_config(source: impl Into<String>, config: Config) -> Self {
        let vm = VirtualMachine::new(&config);
        Self {
            filename: None,
            source: source.into(),
            config,
            tokens: Vec::new(),
            program: Program::default(),
            vm,
            state: ExecState::Idle,
        }
    }

    /// Discards the assembled program and resets the VM and state to `Idle`.
    /// The source text is kept.
    pub fn init(&mut self) {
        self.tokens.clear();
        self.program = Program::default();
        self.vm = VirtualMachine::new(&self.config);
        self.state = ExecState::Idle;
    }

    /// Replaces the source text and resets.
    pub fn set_source(&mut self, source: impl Into<String>) {
        self.source = source.into();
        self.init();
    }

    /// Reads `path` and makes it the current source.
    ///
    /// # Errors
    ///
    /// [`SimError::Io`] if the file cannot be read; the simulator is left
    /// unchanged in that case.
    pub fn load_file(&mut self, path: impl AsRef<Path>) -> Result<(), SimError> {
        let path = path.as_ref();
        let source = loader::load_source(path)?;
        self.set_source(source);
        self.filename = Some(path.to_path_buf());
        Ok(())
    }

    /// Lexes and parses the current source and installs the resulting program.
    ///
    /// Always re-derives the program from the source text. VM state (registers,
    /// PC, memory, outputs) is not touched.
    ///
    /// # Errors
    ///
    /// [`SimError::Lex`] or [`SimError::Parse`]; the previous program is kept.
    pub fn pre_process(&mut self) -> Result<(), SimError> {
        let (tokens, program) = asm::assemble(&self.source)?;
        debug!(
            tokens = tokens.len(),
            instructions = program.len(),
            labels = program.labels.len(),
            "assembled source"
        );
        self.tokens = tokens;
        self.program = program;
        Ok(())
    }

    /// Runs until the program ends, a `break` pauses it, or an error occurs.
    ///
    /// Resumes from the current program counter, so calling `run` after a
    /// `break` continues with the instruction after it.
    ///
    /// # Errors
    ///
    /// Assembly errors leave the state `Idle`; execution errors halt.
    pub fn run(&mut self) -> Result<(), SimError> {
        let start = Instant::now();
        self.state = ExecState::Running;

        if let Err(e) = self.pre_process() {
            self.state = ExecState::Idle;
            return Err(e);
        }
        let result = self.run_code();

        let elapsed = start.elapsed();
        self.vm.stats_mut().record_run(elapsed);
        match &result {
            Err(e) => {
                warn!(pc = self.vm.pc(), "halted: {e}");
                self.state = ExecState::Halted;
            }
            Ok(()) if self.state.is_paused() => {
                info!(pc = self.vm.pc(), line = self.current_line(), "execution paused");
            }
            Ok(()) => {
                self.state = ExecState::Halted;
                info!(?elapsed, "run finished");
            }
        }
        result
    }

    /// Executes instructions until the PC leaves the program or a `break` pauses.
    fn run_code(&mut self) -> Result<(), SimError> {
        let limit = self.config.general.max_steps;
        let mut executed: u64 = 0;

        while self.vm.pc() < self.program.len() && !self.state.is_paused() {
            if let Some(limit) = limit.filter(|&l| executed >= l) {
                return Err(ExecutionError::StepLimitExceeded {
                    limit,
                    line: self.current_line(),
                }
                .into());
            }
            if self.vm.run_instruction(&self.program.instructions)? == Outcome::Break {
                self.state = ExecState::Paused;
            }
            executed += 1;
        }
        Ok(())
    }

    /// Executes exactly one instruction.
    ///
    /// Assembles the source first if execution has not started. When the
    /// program counter is already past the end, nothing executes and the
    /// state becomes `Halted`.
    ///
    /// # Errors
    ///
    /// Assembly errors leave the state `Idle`; execution errors halt.
    pub fn step(&mut self) -> Result<(), SimError> {
        if !self.state.is_running() {
            if let Err(e) = self.pre_process() {
                self.state = ExecState::Idle;
                return Err(e);
            }
        }

        if self.vm.pc() >= self.program.len() {
            self.state = ExecState::Halted;
            return Ok(());
        }

        self.state = ExecState::Paused;
        if let Err(e) = self.vm.run_instruction(&self.program.instructions) {
            warn!(pc = self.vm.pc(), "halted: {e}");
            self.state = ExecState::Halted;
            return Err(e.into());
        }
        Ok(())
    }

    /// Source line of the instruction at the program counter.
    ///
    /// Returns 1 when there are no instructions or the PC is past the end.
    pub fn current_line(&self) -> usize {
        self.program
            .instructions
            .get(self.vm.pc())
            .map_or(1, |inst| inst.line_number)
    }

    /// Current execution state.
    pub const fn state(&self) -> ExecState {
        self.state
    }

    /// Execution has started and not finished.
    pub const fn is_running(&self) -> bool {
        self.state.is_running()
    }

    /// Execution is suspended mid-program.
    pub const fn is_paused(&self) -> bool {
        self.state.is_paused()
    }

    /// Current source text.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// File the source was loaded from, if any.
    pub fn filename(&self) -> Option<&Path> {
        self.filename.as_deref()
    }

    /// Active configuration.
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Tokens from the last successful assembly.
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Program from the last successful assembly.
    pub const fn program(&self) -> &Program {
        &self.program
    }

    /// Virtual machine state.
    pub const fn vm(&self) -> &VirtualMachine {
        &self.vm
    }

    /// Mutable virtual machine state, for seeding registers or memory.
    pub const fn vm_mut(&mut self) -> &mut VirtualMachine {
        &mut self.vm
    }

    /// Output log.
    pub fn outputs(&self) -> &[String] {
        self.vm.outputs()
    }

    /// Empties the output log.
    pub fn clear_outputs(&mut self) {
        self.vm.clear_outputs();
    }

    /// Token listing, one token per line.
    pub fn tokens_listing(&self) -> String {
        let mut out = String::from("TOKENS\n");
        for tok in &self.tokens {
            let _ = writeln!(out, "{tok}");
        }
        out
    }

    /// Instruction listing, one instruction per line.
    pub fn instructions_listing(&self) -> String {
        format!("INSTRUCTIONS\n{}", self.program)
    }

    /// Token listing followed by the instruction listing.
    pub fn tokens_and_instructions(&self) -> String {
        self.tokens_listing() + &self.instructions_listing()
    }
}
