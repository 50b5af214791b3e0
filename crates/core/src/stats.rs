//! Execution statistics collection and reporting.
//!
//! This module tracks what the virtual machine has done. It provides:
//! 1. **Totals:** Retired instructions, breakpoints hit, and runs started.
//! 2. **Instruction mix:** Counts by class (arithmetic, logic, shift, load, store, jump, ...).
//! 3. **Branches:** Taken and not-taken counts.
//! 4. **Timing:** Accumulated wall-clock time spent inside `run`.

use std::time::Duration;

use crate::isa::opcode::InstrClass;

/// Execution statistics.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExecStats {
    /// Number of instructions executed to completion.
    pub instructions_retired: u64,

    /// Arithmetic instructions retired (add, sub, mul, div, slt, li, ...).
    pub inst_arith: u64,
    /// Logic instructions retired (and, or, xor, nor and immediates).
    pub inst_logic: u64,
    /// Shift instructions retired.
    pub inst_shift: u64,
    /// Loads retired.
    pub inst_load: u64,
    /// Stores retired.
    pub inst_store: u64,
    /// Conditional branches retired.
    pub inst_branch: u64,
    /// Jumps retired.
    pub inst_jump: u64,
    /// `nop` and `break` retired.
    pub inst_control: u64,
    /// `print` retired.
    pub inst_output: u64,

    /// Conditional branches that redirected the program counter.
    pub branches_taken: u64,
    /// Conditional branches that fell through.
    pub branches_not_taken: u64,

    /// `break` instructions executed.
    pub breakpoints: u64,
    /// Calls to `Simulator::run`.
    pub runs: u64,
    /// Wall-clock time spent in `Simulator::run`, parsing included.
    pub run_time: Duration,
}

impl ExecStats {
    /// Records one retired instruction.
    ///
    /// # Arguments
    ///
    /// * `class` - Semantic class of the instruction.
    /// * `taken` - For branches, whether the branch redirected the PC.
    pub const fn record(&mut self, class: InstrClass, taken: bool) {
        self.instructions_retired += 1;
        match class {
            InstrClass::Arithmetic => self.inst_arith += 1,
            InstrClass::Logic => self.inst_logic += 1,
            InstrClass::Shift => self.inst_shift += 1,
            InstrClass::Load => self.inst_load += 1,
            InstrClass::Store => self.inst_store += 1,
            InstrClass::Branch => {
                self.inst_branch += 1;
                if taken {
                    self.branches_taken += 1;
                } else {
                    self.branches_not_taken += 1;
                }
            }
            InstrClass::Jump => self.inst_jump += 1,
            InstrClass::Control => self.inst_control += 1,
            InstrClass::Output => self.inst_output += 1,
        }
    }

    /// Adds one completed (or paused) `run` and its duration.
    pub fn record_run(&mut self, elapsed: Duration) {
        self.runs += 1;
        self.run_time += elapsed;
    }

    /// Prints the statistics to stdout.
    pub fn print(&self) {
        let instr = self.instructions_retired.max(1) as f64;
        let pct = |n: u64| (n as f64 / instr) * 100.0;
        let seconds = self.run_time.as_secs_f64();
        let kips = if seconds > 0.0 {
            (self.instructions_retired as f64 / seconds) / 1000.0
        } else {
            0.0
        };

        println!("\n==========================================================");
        println!("SIMULATION STATISTICS");
        println!("==========================================================");
        println!("host_seconds             {seconds:.6} s");
        println!("sim_runs                 {}", self.runs);
        println!("sim_insts                {}", self.instructions_retired);
        println!("sim_kips                 {kips:.2}");
        println!("sim_breakpoints          {}", self.breakpoints);
        println!("----------------------------------------------------------");
        println!("INSTRUCTION MIX");
        for (name, count) in [
            ("op.arith", self.inst_arith),
            ("op.logic", self.inst_logic),
            ("op.shift", self.inst_shift),
            ("op.load", self.inst_load),
            ("op.store", self.inst_store),
            ("op.branch", self.inst_branch),
            ("op.jump", self.inst_jump),
            ("op.control", self.inst_control),
            ("op.output", self.inst_output),
        ] {
            println!("  {name:<22} {count} ({:.2}%)", pct(count));
        }
        println!("----------------------------------------------------------");
        println!("BRANCHES");
        println!("  branch.taken           {}", self.branches_taken);
        println!("  branch.not_taken       {}", self.branches_not_taken);
        println!("==========================================================");
    }
}
