use common::asm::Opcode;
use common::constants::{Addr, Word, WORD_MAX, WORD_MIN};

use thiserror::Error;

/// Faults that stop the machine until it is reset.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeError {
    #[error("{op} at address {addr:02}: value {value} outside {min}..={max}", min = WORD_MIN, max = WORD_MAX)]
    Overflow { op: Opcode, addr: Addr, value: i32 },

    #[error("unknown opcode in word {word} at address {addr:02}")]
    UnknownOpcode { addr: Addr, word: Word },

    #[error("input cancelled at address {addr:02}")]
    InputCancelled { addr: Addr },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ControllerError {
    #[error("machine is running")]
    Busy,

    #[error("invalid rate of {0} cycles per second")]
    InvalidRate(f64),
}
