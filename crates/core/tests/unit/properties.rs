//! # Property Tests
//!
//! Randomized checks of invariants that must hold for any program:
//! - `$zero` never changes, whatever writes it.
//! - Label resolution does not depend on declaration order.
//! - Disassembled text re-assembles to an equivalent instruction.
//! - Stepping past the end always leaves the simulator halted.

use mipsim_core::asm::assemble;
use mipsim_core::isa::abi;
use mipsim_core::sim::ExecState;
use mipsim_core::{Instruction, Opcode, Simulator};
use proptest::prelude::*;

/// Register name, `$zero` included.
fn reg() -> impl Strategy<Value = String> {
    (0usize..32).prop_map(|i| format!("${}", abi::name(i)))
}

/// One straight-line instruction that cannot fault or transfer control.
fn straight_line() -> impl Strategy<Value = String> {
    let rrr = prop::sample::select(vec![
        "add", "addu", "sub", "subu", "mul", "and", "or", "xor", "nor", "slt", "sltu", "sllv",
        "srlv", "srav",
    ]);
    let rri = prop::sample::select(vec!["addi", "addiu", "andi", "ori", "xori", "slti"]);
    let shift = prop::sample::select(vec!["sll", "srl", "sra"]);
    let ri = prop::sample::select(vec!["li", "lui"]);

    prop_oneof![
        (rrr, reg(), reg(), reg()).prop_map(|(m, d, s, t)| format!("{m} {d}, {s}, {t}")),
        (rri, reg(), reg(), any::<i32>()).prop_map(|(m, d, s, v)| format!("{m} {d}, {s}, {v}")),
        (shift, reg(), reg(), 0i32..32).prop_map(|(m, d, s, v)| format!("{m} {d}, {s}, {v}")),
        (ri, reg(), any::<i32>()).prop_map(|(m, d, v)| format!("{m} {d}, {v}")),
        (reg(), reg()).prop_map(|(d, s)| format!("move {d}, {s}")),
        reg().prop_map(|s| format!("print {s}")),
        Just("nop".to_string()),
    ]
}

/// Any single instruction, including control flow and memory forms, with
/// numeric targets.
fn any_instruction() -> impl Strategy<Value = String> {
    prop_oneof![
        straight_line(),
        (reg(), reg(), any::<i32>()).prop_map(|(s, t, v)| format!("beq {s}, {t}, {v}")),
        (reg(), any::<i32>()).prop_map(|(s, v)| format!("bltz {s}, {v}")),
        (0i32..1000).prop_map(|v| format!("jal {v}")),
        (reg(), reg()).prop_map(|(d, s)| format!("jalr {d}, {s}")),
        reg().prop_map(|s| format!("jr {s}")),
        (reg(), any::<i32>(), reg()).prop_map(|(d, v, b)| format!("lw {d}, {v}({b})")),
        (reg(), any::<i32>(), reg()).prop_map(|(t, v, b)| format!("sb {t}, {v}({b})")),
        Just("break".to_string()),
    ]
}

fn assemble_instructions(source: &str) -> Vec<Instruction> {
    assemble(source).unwrap().1.instructions
}

proptest! {
    #[test]
    fn prop_register_zero_never_changes(lines in prop::collection::vec(straight_line(), 1..40)) {
        let mut sim = Simulator::new(lines.join("\n"));
        while sim.state() != ExecState::Halted {
            sim.step().unwrap();
            prop_assert_eq!(sim.vm().reg(abi::REG_ZERO), 0);
        }
    }

    #[test]
    fn prop_display_round_trips(line in any_instruction(), label in proptest::option::of("[a-z_][a-z0-9_]{0,8}")) {
        let source = match &label {
            Some(name) => format!("{name}: {line}"),
            None => line,
        };
        let original = assemble_instructions(&source);
        let text = original[0].to_string();
        let reparsed = assemble_instructions(&text);
        prop_assert_eq!(&reparsed[0], &original[0], "text: {}", text);
    }

    #[test]
    fn prop_label_resolution_is_order_independent(
        body in prop::collection::vec(straight_line(), 1..10),
        target in 0usize..10,
    ) {
        let target = target % body.len();

        // Each program branches to and jumps to the instruction at `target`,
        // once from before the label and once from after it.
        let mut forward: Vec<String> = vec!["beq $zero, $zero, dest".into(), "j dest".into()];
        for (i, line) in body.iter().enumerate() {
            if i == target {
                forward.push(format!("dest: {line}"));
            } else {
                forward.push(line.clone());
            }
        }

        let mut numeric = forward.clone();
        numeric[0] = format!("beq $zero, $zero, {}", target + 2 - 1);
        numeric[1] = format!("j {}", target + 2);

        let by_label = assemble_instructions(&forward.join("\n"));
        let by_number = assemble_instructions(&numeric.join("\n"));
        for (a, b) in by_label.iter().zip(&by_number) {
            prop_assert_eq!((a.opcode, a.immediate), (b.opcode, b.immediate));
        }

        // The same label referenced backward yields the offset a hand-computed
        // numeric target would.
        let mut backward = forward[2..].to_vec();
        backward.push("bne $zero, $t0, dest".into());
        let insts = assemble_instructions(&backward.join("\n"));
        let last = insts.len() - 1;
        prop_assert_eq!(insts[last].target(last), Some(target as i64));
    }

    #[test]
    fn prop_stepping_past_end_halts(
        lines in prop::collection::vec(straight_line(), 0..20),
        breaks in prop::collection::vec(any::<bool>(), 0..20),
        runs in prop::collection::vec(any::<bool>(), 0..8),
    ) {
        let source: Vec<String> = lines
            .iter()
            .zip(breaks.iter().chain(std::iter::repeat(&false)))
            .flat_map(|(line, &brk)| {
                let mut out = vec![line.clone()];
                if brk {
                    out.push("break".into());
                }
                out
            })
            .collect();
        let len = assemble_instructions(&source.join("\n")).len();
        let mut sim = Simulator::new(source.join("\n"));

        // Interleave runs and steps, then step until the program is exhausted.
        for run in runs {
            if run {
                sim.run().unwrap();
            } else {
                sim.step().unwrap();
            }
        }
        for _ in 0..=len + 1 {
            sim.step().unwrap();
        }

        prop_assert_eq!(sim.state(), ExecState::Halted);
        prop_assert!(!sim.is_running());
        prop_assert!(!sim.is_paused());
    }
}

#[test]
fn test_opcode_codes_round_trip_through_u8() {
    for op in Opcode::ALL {
        assert_eq!(Opcode::try_from(u8::from(op)), Ok(op));
    }
}
