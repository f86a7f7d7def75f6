use crate::constants::*;

use std::fmt;

use derive_more::IsVariant;
use num_derive::{FromPrimitive, ToPrimitive};
use num_traits::ToPrimitive;


#[derive(Debug, Clone, Copy, FromPrimitive, ToPrimitive, PartialEq, Eq, Hash, IsVariant)]
pub enum Opcode {
    Halt = 0,
    Add,
    Sub,
    Store,
    Nop,
    Load,
    Branch,
    Brz,
    Brp,

    // Full-word opcodes, no operand.
    In = 901,
    Out = 902,
}

impl Opcode {
    pub const ALL: &[Opcode] = &[
        Opcode::Halt,
        Opcode::Add,
        Opcode::Sub,
        Opcode::Store,
        Opcode::Nop,
        Opcode::Load,
        Opcode::Branch,
        Opcode::Brz,
        Opcode::Brp,
        Opcode::In,
        Opcode::Out,
    ];

    // Every accepted spelling, canonical name first.
    pub fn mnemonics(self) -> &'static [&'static str] {
        use Opcode::*;
        match self {
            Halt => &["HALT", "HLT", "COB"],
            Add => &["ADD"],
            Sub => &["SUB"],
            Store => &["STORE", "STO", "STA"],
            Nop => &["NOP", "NUL"],
            Load => &["LOAD", "LDA"],
            Branch => &["BRANCH", "BR", "BRU", "JMP"],
            Brz => &["BRZ"],
            Brp => &["BRP"],
            In => &["IN", "INP"],
            Out => &["OUT", "PRN"],
        }
    }

    pub fn name(self) -> &'static str {
        self.mnemonics()[0]
    }

    /// Case-insensitive lookup, including aliases.
    pub fn from_mnemonic(s: &str) -> Option<Opcode> {
        let upper = s.to_ascii_uppercase();
        Self::ALL
            .iter()
            .copied()
            .find(|op| op.mnemonics().contains(&upper.as_str()))
    }

    pub fn is_full_word(self) -> bool {
        self.is_in() || self.is_out()
    }

    // Whether the operand means anything when executed.
    pub fn uses_operand(self) -> bool {
        use Opcode::*;
        matches!(self, Add | Sub | Store | Load | Branch | Brz | Brp)
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

////////////////////////////////////////////////////////////////////////////////

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ins {
    pub op: Opcode,
    pub operand: Addr,
}

impl Ins {
    /// Operands are reduced modulo the memory size, and dropped for IN/OUT.
    pub fn new(op: Opcode, operand: i32) -> Ins {
        let operand = if op.is_full_word() {
            0
        } else {
            operand.rem_euclid(ADDR_MODULUS) as Addr
        };
        Ins { op, operand }
    }

    pub fn encode(&self) -> Word {
        let op = self.op.to_i16().unwrap();
        if self.op.is_full_word() {
            op
        } else {
            op * OPCODE_RADIX as Word + self.operand as Word
        }
    }
}

impl fmt::Display for Ins {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.op.uses_operand() {
            write!(f, "{} {}", self.op, self.operand)
        } else {
            write!(f, "{}", self.op)
        }
    }
}
