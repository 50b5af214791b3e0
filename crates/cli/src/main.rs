//! MIPS-like assembly simulator CLI.
//!
//! This binary provides a single entry point for the simulator. It supports:
//! 1. **Run:** Assemble a source file and run it to completion or the first `break`.
//! 2. **Step:** Execute a fixed number of single steps, printing where execution stands.
//! 3. **Dump:** Print the token and instruction listings without executing anything.
//!
//! Logging goes to stderr through `tracing-subscriber`; set `RUST_LOG=debug`
//! together with `trace_instructions` in the config to see every instruction.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use mipsim_core::{Config, SimError, Simulator};

#[derive(Parser, Debug)]
#[command(
    name = "mipsim",
    author,
    version,
    about = "Step-capable simulator for a MIPS-like assembly language",
    long_about = "Assemble and execute MIPS-like assembly source.\n\nExamples:\n  mipsim run prog.s\n  mipsim step prog.s -n 5\n  mipsim dump prog.s\n  mipsim --config sim.json run prog.s"
)]
struct Cli {
    /// JSON configuration file (defaults are used when omitted).
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a program until it finishes or reaches a `break`.
    Run {
        /// Assembly source file.
        file: PathBuf,

        /// Print execution statistics after the run.
        #[arg(long)]
        stats: bool,
    },

    /// Execute a program one instruction at a time.
    Step {
        /// Assembly source file.
        file: PathBuf,

        /// Number of instructions to step.
        #[arg(short = 'n', long, default_value_t = 1)]
        count: usize,
    },

    /// Print the token and instruction listings.
    Dump {
        /// Assembly source file.
        file: PathBuf,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match dispatch(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Builds the simulator from the global options and runs the chosen subcommand.
fn dispatch(cli: Cli) -> Result<(), SimError> {
    let config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    let mut sim = Simulator::with_config(String::new(), config);

    match cli.command {
        Commands::Run { file, stats } => {
            sim.load_file(&file)?;
            cmd_run(&mut sim, stats)
        }
        Commands::Step { file, count } => {
            sim.load_file(&file)?;
            cmd_step(&mut sim, count)
        }
        Commands::Dump { file } => {
            sim.load_file(&file)?;
            sim.pre_process()?;
            print!("{}", sim.tokens_and_instructions());
            Ok(())
        }
    }
}

/// Runs to completion or breakpoint, then prints outputs and registers.
///
/// On an execution fault the machine state is still dumped before the error
/// is returned.
fn cmd_run(sim: &mut Simulator, stats: bool) -> Result<(), SimError> {
    let result = sim.run();

    for line in sim.outputs() {
        println!("{line}");
    }
    if let Err(e) = result {
        eprintln!("\n[!] FATAL: {e}");
        sim.vm().dump_state();
        return Err(e);
    }

    if sim.is_paused() {
        println!("\n[*] Paused before line {}", sim.current_line());
    } else {
        println!("\n[*] Halted");
    }
    sim.vm().dump_state();
    if stats {
        sim.vm().stats().print();
    }
    Ok(())
}

/// Steps `count` instructions, printing new output and the next line as it goes.
fn cmd_step(sim: &mut Simulator, count: usize) -> Result<(), SimError> {
    let mut printed = 0;
    for n in 1..=count {
        sim.step()?;
        for line in &sim.outputs()[printed..] {
            println!("{line}");
        }
        printed = sim.outputs().len();

        if !sim.is_running() {
            println!("[*] Halted after {} step(s)", n - 1);
            break;
        }
        println!("[{n}] pc = {} line {}", sim.vm().pc(), sim.current_line());
    }
    sim.vm().dump_state();
    Ok(())
}
