//! Opcode table.
//!
//! Every supported instruction is a variant of [`Opcode`]. Each variant has a
//! stable integer code (its discriminant), a mnemonic, an [`OperandShape`]
//! describing which operand slots the assembler fills and in what order, and
//! an [`InstrClass`] used for statistics and dispatch.
//!
//! Codes are part of the external contract: new instructions are appended with
//! fresh codes and existing codes never change.

use std::fmt;

use crate::common::error::UnknownOpcode;

/// Operation selected by an instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Opcode {
    /// No operation.
    Nop = 0,
    /// `add $rd, $rs, $rt`
    Add = 1,
    /// `addi $rd, $rs, imm`
    Addi = 2,
    /// `addiu $rd, $rs, imm`
    Addiu = 3,
    /// `addu $rd, $rs, $rt`
    Addu = 4,
    /// `and $rd, $rs, $rt`
    And = 5,
    /// `andi $rd, $rs, imm`
    Andi = 6,
    /// `beq $rs, $rt, label`
    Beq = 7,
    /// `bgez $rs, label`
    Bgez = 8,
    /// `bgtz $rs, label`
    Bgtz = 9,
    /// `blez $rs, label`
    Blez = 10,
    /// `bltz $rs, label`
    Bltz = 11,
    /// `bne $rs, $rt, label`
    Bne = 12,
    /// `break`
    Break = 13,
    /// `div $rd, $rs, $rt`
    Div = 14,
    /// `divu $rd, $rs, $rt`
    Divu = 15,
    /// `j label`
    J = 16,
    /// `jal label`
    Jal = 17,
    /// `jalr $rd, $rs`
    Jalr = 18,
    /// `jr $rs`
    Jr = 19,
    /// `lb $rd, imm($rs)`
    Lb = 20,
    /// `lbu $rd, imm($rs)`
    Lbu = 21,
    /// `lui $rd, imm`
    Lui = 22,
    /// `lw $rd, imm($rs)`
    Lw = 23,
    /// `mul $rd, $rs, $rt`
    Mul = 24,
    /// `nor $rd, $rs, $rt`
    Nor = 25,
    /// `or $rd, $rs, $rt`
    Or = 26,
    /// `ori $rd, $rs, imm`
    Ori = 27,
    /// `print $rs`
    Print = 28,
    /// `sb $rt, imm($rs)`
    Sb = 29,
    /// `sll $rd, $rs, shamt`
    Sll = 30,
    /// `sllv $rd, $rs, $rt`
    Sllv = 31,
    /// `slt $rd, $rs, $rt`
    Slt = 32,
    /// `slti $rd, $rs, imm`
    Slti = 33,
    /// `sltu $rd, $rs, $rt`
    Sltu = 34,
    /// `sra $rd, $rs, shamt`
    Sra = 35,
    /// `srav $rd, $rs, $rt`
    Srav = 36,
    /// `srl $rd, $rs, shamt`
    Srl = 37,
    /// `srlv $rd, $rs, $rt`
    Srlv = 38,
    /// `sub $rd, $rs, $rt`
    Sub = 39,
    /// `subu $rd, $rs, $rt`
    Subu = 40,
    /// `sw $rt, imm($rs)`
    Sw = 41,
    /// `xor $rd, $rs, $rt`
    Xor = 42,
    /// `xori $rd, $rs, imm`
    Xori = 43,
    /// `li $rd, imm`
    Li = 44,
    /// `move $rd, $rs`
    Move = 45,
}

/// Operand layout expected by a mnemonic, in source order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperandShape {
    /// No operands.
    None,
    /// `$rd, $rs, $rt`
    RdRsRt,
    /// `$rd, $rs, imm`
    RdRsImm,
    /// `$rd, $rs, shamt` with `shamt` in 0..=31.
    RdRsShamt,
    /// `$rs, $rt, target` (PC-relative).
    RsRtTarget,
    /// `$rs, target` (PC-relative).
    RsTarget,
    /// `target` (absolute instruction index).
    Target,
    /// `$rd, $rs`
    RdRs,
    /// `$rs`
    Rs,
    /// `$rd, imm`
    RdImm,
    /// `$rd, imm($rs)`
    RdMem,
    /// `$rt, imm($rs)`
    RtMem,
}

impl OperandShape {
    /// Human-readable operand template, used in diagnostics.
    pub const fn template(self) -> &'static str {
        match self {
            Self::None => "",
            Self::RdRsRt => "$rd, $rs, $rt",
            Self::RdRsImm => "$rd, $rs, imm",
            Self::RdRsShamt => "$rd, $rs, shamt",
            Self::RsRtTarget => "$rs, $rt, label",
            Self::RsTarget => "$rs, label",
            Self::Target => "label",
            Self::RdRs => "$rd, $rs",
            Self::Rs => "$rs",
            Self::RdImm => "$rd, imm",
            Self::RdMem => "$rd, imm($rs)",
            Self::RtMem => "$rt, imm($rs)",
        }
    }
}

/// Semantic class of an opcode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InstrClass {
    /// Add, subtract, multiply, divide, set-less-than, immediate loads.
    Arithmetic,
    /// Bitwise and/or/xor/nor.
    Logic,
    /// Constant and variable shifts.
    Shift,
    /// Conditional PC-relative branches.
    Branch,
    /// Unconditional jumps.
    Jump,
    /// Memory loads.
    Load,
    /// Memory stores.
    Store,
    /// `break` and `nop`.
    Control,
    /// `print`.
    Output,
}

impl Opcode {
    /// Every opcode, ordered by code.
    pub const ALL: [Self; 46] = [
        Self::Nop,
        Self::Add,
        Self::Addi,
        Self::Addiu,
        Self::Addu,
        Self::And,
        Self::Andi,
        Self::Beq,
        Self::Bgez,
        Self::Bgtz,
        Self::Blez,
        Self::Bltz,
        Self::Bne,
        Self::Break,
        Self::Div,
        Self::Divu,
        Self::J,
        Self::Jal,
        Self::Jalr,
        Self::Jr,
        Self::Lb,
        Self::Lbu,
        Self::Lui,
        Self::Lw,
        Self::Mul,
        Self::Nor,
        Self::Or,
        Self::Ori,
        Self::Print,
        Self::Sb,
        Self::Sll,
        Self::Sllv,
        Self::Slt,
        Self::Slti,
        Self::Sltu,
        Self::Sra,
        Self::Srav,
        Self::Srl,
        Self::Srlv,
        Self::Sub,
        Self::Subu,
        Self::Sw,
        Self::Xor,
        Self::Xori,
        Self::Li,
        Self::Move,
    ];

    /// Stable integer code.
    #[inline]
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Assembly mnemonic.
    pub const fn mnemonic(self) -> &'static str {
        match self {
            Self::Nop => "nop",
            Self::Add => "add",
            Self::Addi => "addi",
            Self::Addiu => "addiu",
            Self::Addu => "addu",
            Self::And => "and",
            Self::Andi => "andi",
            Self::Beq => "beq",
            Self::Bgez => "bgez",
            Self::Bgtz => "bgtz",
            Self::Blez => "blez",
            Self::Bltz => "bltz",
            Self::Bne => "bne",
            Self::Break => "break",
            Self::Div => "div",
            Self::Divu => "divu",
            Self::J => "j",
            Self::Jal => "jal",
            Self::Jalr => "jalr",
            Self::Jr => "jr",
            Self::Lb => "lb",
            Self::Lbu => "lbu",
            Self::Lui => "lui",
            Self::Lw => "lw",
            Self::Mul => "mul",
            Self::Nor => "nor",
            Self::Or => "or",
            Self::Ori => "ori",
            Self::Print => "print",
            Self::Sb => "sb",
            Self::Sll => "sll",
            Self::Sllv => "sllv",
            Self::Slt => "slt",
            Self::Slti => "slti",
            Self::Sltu => "sltu",
            Self::Sra => "sra",
            Self::Srav => "srav",
            Self::Srl => "srl",
            Self::Srlv => "srlv",
            Self::Sub => "sub",
            Self::Subu => "subu",
            Self::Sw => "sw",
            Self::Xor => "xor",
            Self::Xori => "xori",
            Self::Li => "li",
            Self::Move => "move",
        }
    }

    /// Looks up a mnemonic (case-insensitive).
    pub fn from_mnemonic(mnemonic: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|op| op.mnemonic().eq_ignore_ascii_case(mnemonic))
    }

    /// Operand layout the assembler expects for this opcode.
    pub const fn shape(self) -> OperandShape {
        match self {
            Self::Nop | Self::Break => OperandShape::None,
            Self::Add
            | Self::Addu
            | Self::And
            | Self::Div
            | Self::Divu
            | Self::Mul
            | Self::Nor
            | Self::Or
            | Self::Sllv
            | Self::Slt
            | Self::Sltu
            | Self::Srav
            | Self::Srlv
            | Self::Sub
            | Self::Subu
            | Self::Xor => OperandShape::RdRsRt,
            Self::Addi | Self::Addiu | Self::Andi | Self::Ori | Self::Slti | Self::Xori => {
                OperandShape::RdRsImm
            }
            Self::Sll | Self::Sra | Self::Srl => OperandShape::RdRsShamt,
            Self::Beq | Self::Bne => OperandShape::RsRtTarget,
            Self::Bgez | Self::Bgtz | Self::Blez | Self::Bltz => OperandShape::RsTarget,
            Self::J | Self::Jal => OperandShape::Target,
            Self::Jalr | Self::Move => OperandShape::RdRs,
            Self::Jr | Self::Print => OperandShape::Rs,
            Self::Lui | Self::Li => OperandShape::RdImm,
            Self::Lb | Self::Lbu | Self::Lw => OperandShape::RdMem,
            Self::Sb | Self::Sw => OperandShape::RtMem,
        }
    }

    /// Semantic class.
    pub const fn class(self) -> InstrClass {
        match self {
            Self::Add
            | Self::Addi
            | Self::Addiu
            | Self::Addu
            | Self::Div
            | Self::Divu
            | Self::Mul
            | Self::Slt
            | Self::Slti
            | Self::Sltu
            | Self::Sub
            | Self::Subu
            | Self::Lui
            | Self::Li
            | Self::Move => InstrClass::Arithmetic,
            Self::And | Self::Andi | Self::Nor | Self::Or | Self::Ori | Self::Xor | Self::Xori => {
                InstrClass::Logic
            }
            Self::Sll | Self::Sllv | Self::Sra | Self::Srav | Self::Srl | Self::Srlv => {
                InstrClass::Shift
            }
            Self::Beq | Self::Bgez | Self::Bgtz | Self::Blez | Self::Bltz | Self::Bne => {
                InstrClass::Branch
            }
            Self::J | Self::Jal | Self::Jalr | Self::Jr => InstrClass::Jump,
            Self::Lb | Self::Lbu | Self::Lw => InstrClass::Load,
            Self::Sb | Self::Sw => InstrClass::Store,
            Self::Nop | Self::Break => InstrClass::Control,
            Self::Print => InstrClass::Output,
        }
    }

    /// Whether the final operand is a PC-relative branch target.
    pub const fn is_branch(self) -> bool {
        matches!(self.class(), InstrClass::Branch)
    }
}

impl TryFrom<u8> for Opcode {
    type Error = UnknownOpcode;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Self::ALL
            .get(usize::from(code))
            .copied()
            .ok_or(UnknownOpcode(code))
    }
}

impl From<Opcode> for u8 {
    fn from(op: Opcode) -> Self {
        op.code()
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}
