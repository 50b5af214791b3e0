//! # Execute Stage Tests
//!
//! Per-opcode semantics driven through `VirtualMachine::run_instruction`,
//! plus fault detection and the guarantee that a faulting instruction leaves
//! the machine untouched.

use crate::common::builder::inst;
use crate::common::harness::TestContext;
use mipsim_core::asm::assemble;
use mipsim_core::common::error::ExecutionError;
use mipsim_core::config::Config;
use mipsim_core::isa::abi;
use mipsim_core::vm::{Outcome, PAUSE_MESSAGE};
use mipsim_core::{Instruction, Opcode, VirtualMachine};
use pretty_assertions::assert_eq;
use rstest::rstest;

fn program(source: &str) -> Vec<Instruction> {
    assemble(source).unwrap().1.instructions
}

fn vm() -> VirtualMachine {
    VirtualMachine::new(&Config::default())
}

/// Executes every instruction in order, panicking on a fault.
fn run_all(vm: &mut VirtualMachine, program: &[Instruction]) {
    while vm.pc() < program.len() {
        let _ = vm.run_instruction(program).unwrap();
    }
}

#[test]
fn test_vm_reset_state() {
    let vm = vm();
    assert_eq!(vm.pc(), 0);
    assert!(vm.outputs().is_empty());
    assert_eq!(vm.reg(abi::REG_SP), 64 * 1024);
    for idx in (0..32).filter(|&i| i != abi::REG_SP) {
        assert_eq!(vm.reg(idx), 0, "register {idx}");
    }
}

#[rstest]
#[case("li $t1, 7\nli $t2, 5\nadd $t0, $t1, $t2", 12)]
#[case("li $t1, 7\nli $t2, 5\naddu $t0, $t1, $t2", 12)]
#[case("li $t1, 7\nli $t2, 5\nsub $t0, $t1, $t2", 2)]
#[case("li $t1, 5\nli $t2, 7\nsubu $t0, $t1, $t2", -2)]
#[case("li $t1, 7\nli $t2, -5\nmul $t0, $t1, $t2", -35)]
#[case("li $t1, -7\nli $t2, 2\ndiv $t0, $t1, $t2", -3)]
#[case("li $t1, -1\nli $t2, 16\ndivu $t0, $t1, $t2", 0x0fff_ffff)]
#[case("li $t1, 12\nli $t2, 10\nand $t0, $t1, $t2", 8)]
#[case("li $t1, 12\nli $t2, 10\nor $t0, $t1, $t2", 14)]
#[case("li $t1, 12\nli $t2, 10\nxor $t0, $t1, $t2", 6)]
#[case("li $t1, 0\nli $t2, 0\nnor $t0, $t1, $t2", -1)]
#[case("li $t1, -3\nli $t2, 2\nslt $t0, $t1, $t2", 1)]
#[case("li $t1, -3\nli $t2, 2\nsltu $t0, $t1, $t2", 0)]
#[case("li $t1, 3\nli $t2, 2\nsllv $t0, $t1, $t2", 12)]
#[case("li $t1, -8\nli $t2, 1\nsrlv $t0, $t1, $t2", 0x7fff_fffc)]
#[case("li $t1, -8\nli $t2, 1\nsrav $t0, $t1, $t2", -4)]
#[case("li $t1, 10\naddi $t0, $t1, -3", 7)]
#[case("li $t1, 10\naddiu $t0, $t1, 0x7fffffff", -2147483639)]
#[case("li $t1, 0xff\nandi $t0, $t1, 0x0f", 15)]
#[case("li $t1, 0xf0\nori $t0, $t1, 0x0f", 255)]
#[case("li $t1, 0xff\nxori $t0, $t1, 0x0f", 0xf0)]
#[case("li $t1, 4\nslti $t0, $t1, 5", 1)]
#[case("li $t1, 3\nsll $t0, $t1, 4", 48)]
#[case("li $t1, -1\nsrl $t0, $t1, 31", 1)]
#[case("li $t1, -64\nsra $t0, $t1, 4", -4)]
#[case("lui $t0, 0x1234", 0x1234_0000)]
#[case("lui $t0, 0xffff", -65536)]
#[case("li $t0, -12345", -12345)]
#[case("li $t1, 99\nmove $t0, $t1", 99)]
fn test_execute_alu_semantics(#[case] source: &str, #[case] expected: i32) {
    let mut vm = vm();
    run_all(&mut vm, &program(source));
    assert_eq!(vm.reg(8), expected, "{source}");
}

#[test]
fn test_execute_register_zero_discards_writes() {
    let mut vm = vm();
    run_all(
        &mut vm,
        &program("li $zero, 5\naddi $0, $zero, 9\nlui $zero, 1\nmove $t0, $zero"),
    );
    assert_eq!(vm.reg(0), 0);
    assert_eq!(vm.reg(8), 0);
}

#[test]
fn test_execute_print_appends_decimal() {
    let mut vm = vm();
    run_all(&mut vm, &program("li $t0, -42\nprint $t0\nprint $zero"));
    assert_eq!(vm.outputs(), ["-42", "0"]);
}

#[test]
fn test_execute_break_pauses_and_advances() {
    let mut vm = vm();
    let prog = program("break\nnop");
    assert_eq!(vm.run_instruction(&prog), Ok(Outcome::Break));
    assert_eq!(vm.pc(), 1);
    assert_eq!(vm.outputs(), [PAUSE_MESSAGE]);
    assert_eq!(vm.run_instruction(&prog), Ok(Outcome::Continue));
    assert_eq!(vm.stats().breakpoints, 1);
}

#[rstest]
#[case("beq", 3, 3, true)]
#[case("beq", 3, 4, false)]
#[case("bne", 3, 4, true)]
#[case("bne", 3, 3, false)]
fn test_execute_two_register_branches(
    #[case] mnemonic: &str,
    #[case] a: i32,
    #[case] b: i32,
    #[case] taken: bool,
) {
    let source = format!("{mnemonic} $t0, $t1, skip\nnop\nskip: nop");
    let prog = program(&source);
    let mut vm = vm();
    vm.set_reg(8, a);
    vm.set_reg(9, b);
    let _ = vm.run_instruction(&prog).unwrap();
    assert_eq!(vm.pc(), if taken { 2 } else { 1 });
    assert_eq!(vm.stats().branches_taken, u64::from(taken));
    assert_eq!(vm.stats().branches_not_taken, u64::from(!taken));
}

#[rstest]
#[case("bgez", 0, true)]
#[case("bgez", -1, false)]
#[case("bgtz", 0, false)]
#[case("bgtz", 1, true)]
#[case("blez", 0, true)]
#[case("blez", 1, false)]
#[case("bltz", -1, true)]
#[case("bltz", 0, false)]
fn test_execute_one_register_branches(
    #[case] mnemonic: &str,
    #[case] value: i32,
    #[case] taken: bool,
) {
    let prog = program(&format!("{mnemonic} $a0, skip\nnop\nnop\nskip: nop"));
    let mut vm = vm();
    vm.set_reg(4, value);
    let _ = vm.run_instruction(&prog).unwrap();
    assert_eq!(vm.pc(), if taken { 3 } else { 1 });
}

#[test]
fn test_execute_backward_branch_loop() {
    let mut vm = vm();
    run_all(
        &mut vm,
        &program("li $t0, 3\nloop: print $t0\naddi $t0, $t0, -1\nbgtz $t0, loop"),
    );
    assert_eq!(vm.outputs(), ["3", "2", "1"]);
    assert_eq!(vm.reg(8), 0);
}

#[test]
fn test_execute_jal_and_jr_call_return() {
    let source = "\
        li $a0, 20
        jal double
        print $v0
        j end
        double: add $v0, $a0, $a0
        jr $ra
        end: nop";
    let mut vm = vm();
    run_all(&mut vm, &program(source));
    assert_eq!(vm.outputs(), ["40"]);
    assert_eq!(vm.reg(abi::REG_RA), 2);
}

#[test]
fn test_execute_jalr_links_into_rd() {
    let prog = program("li $t9, 3\njalr $s0, $t9\nnop\nnop");
    let mut vm = vm();
    let _ = vm.run_instruction(&prog).unwrap();
    let _ = vm.run_instruction(&prog).unwrap();
    assert_eq!(vm.pc(), 3);
    assert_eq!(vm.reg(16), 2);
    assert_eq!(vm.reg(abi::REG_RA), 0);
}

#[test]
fn test_execute_jump_past_end_stops_program() {
    let prog = program("j 10\nprint $zero");
    let mut vm = vm();
    let _ = vm.run_instruction(&prog).unwrap();
    assert_eq!(vm.pc(), 10);
    assert_eq!(
        vm.run_instruction(&prog),
        Err(ExecutionError::PcOutOfRange { pc: 10, len: 2 })
    );
}

#[test]
fn test_execute_store_and_load_word() {
    let mut vm = vm();
    run_all(
        &mut vm,
        &program("li $t1, -559038737\naddi $sp, $sp, -8\nsw $t1, 4($sp)\nlw $t0, 4($sp)"),
    );
    assert_eq!(vm.reg(8), -559_038_737);
    let addr = 64 * 1024 - 4;
    assert_eq!(vm.memory().read_word(addr), Ok(-559_038_737));
}

#[test]
fn test_execute_byte_loads_sign_and_zero_extend() {
    let mut vm = vm();
    run_all(
        &mut vm,
        &program("li $t1, 0x80\nsb $t1, 3($zero)\nlb $t0, 3($zero)\nlbu $t2, 3($zero)"),
    );
    assert_eq!(vm.reg(8), -128);
    assert_eq!(vm.reg(10), 128);
    assert_eq!(vm.memory().read_u8(3), Ok(0x80));
}

#[test]
fn test_execute_sb_stores_low_byte_only() {
    let mut vm = vm();
    run_all(&mut vm, &program("li $t1, 0x1234\nsb $t1, 0($zero)\nlw $t0, 0($zero)"));
    assert_eq!(vm.reg(8), 0x34);
}

#[test]
fn test_execute_division_by_zero_leaves_state() {
    let prog = program("li $t1, 5\ndiv $t0, $t1, $zero");
    let mut vm = vm();
    let _ = vm.run_instruction(&prog).unwrap();
    let before = vm.clone();

    assert_eq!(
        vm.run_instruction(&prog),
        Err(ExecutionError::DivisionByZero { line: 2 })
    );
    assert_eq!(vm.pc(), before.pc());
    assert_eq!(vm.regs(), before.regs());
    assert_eq!(vm.stats(), before.stats());
}

#[rstest]
#[case("lw $t0, 2($zero)", ExecutionError::MisalignedAccess { line: 1, addr: 2, size: 4 })]
#[case("sw $t0, -4($zero)", ExecutionError::MemoryOutOfBounds { line: 1, addr: -4, size: 4, limit: 65536 })]
#[case("lb $t0, 65536($zero)", ExecutionError::MemoryOutOfBounds { line: 1, addr: 65536, size: 1, limit: 65536 })]
#[case("lw $t0, 0($sp)", ExecutionError::MemoryOutOfBounds { line: 1, addr: 65536, size: 4, limit: 65536 })]
fn test_execute_memory_faults(#[case] source: &str, #[case] expected: ExecutionError) {
    let prog = program(source);
    let mut vm = vm();
    assert_eq!(vm.run_instruction(&prog), Err(expected));
    assert_eq!(vm.pc(), 0);
    assert_eq!(vm.reg(8), 0);
}

#[test]
fn test_execute_negative_jump_target() {
    let prog = program("li $t0, -3\njr $t0");
    let mut vm = vm();
    let _ = vm.run_instruction(&prog).unwrap();
    assert_eq!(
        vm.run_instruction(&prog),
        Err(ExecutionError::InvalidJumpTarget { line: 2, target: -3 })
    );
    assert_eq!(vm.pc(), 1);
}

#[test]
fn test_execute_branch_before_start() {
    let prog = program("beq $zero, $zero, -5");
    let mut vm = vm();
    assert_eq!(
        vm.run_instruction(&prog),
        Err(ExecutionError::InvalidJumpTarget { line: 1, target: -4 })
    );
}

#[test]
fn test_execute_invalid_register_field() {
    // A hand-built instruction can carry an unused slot where one is required.
    let prog = vec![inst(Opcode::Add).rd(8).rs(9).build()];
    let mut vm = vm();
    assert_eq!(
        vm.run_instruction(&prog),
        Err(ExecutionError::InvalidRegister {
            line: 1,
            mnemonic: "add",
            index: -1
        })
    );
}

#[test]
fn test_execute_pc_out_of_range_on_empty_program() {
    let mut vm = vm();
    assert_eq!(
        vm.run_instruction(&[]),
        Err(ExecutionError::PcOutOfRange { pc: 0, len: 0 })
    );
}

#[test]
fn test_execute_records_instruction_mix() {
    let ctx = TestContext::new(
        "li $t0, 1\nadd $t1, $t0, $t0\nsll $t1, $t1, 2\nsw $t1, 0($zero)\nlw $t2, 0($zero)\nprint $t2\nnop",
    )
    .run();
    let stats = ctx.sim.vm().stats();
    assert_eq!(stats.instructions_retired, 7);
    assert_eq!(stats.inst_arith, 2);
    assert_eq!(stats.inst_shift, 1);
    assert_eq!(stats.inst_store, 1);
    assert_eq!(stats.inst_load, 1);
    assert_eq!(stats.inst_output, 1);
    assert_eq!(stats.inst_control, 1);
    assert_eq!(ctx.outputs(), ["8"]);
}
