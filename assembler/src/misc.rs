use common::constants::{WORD_MAX, WORD_MIN};

use thiserror::Error;

/// Line numbers are 1-based.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssemblyError {
    #[error("line {line}: unknown mnemonic '{mnemonic}'")]
    UnknownMnemonic { line: usize, mnemonic: String },

    #[error("line {line}: invalid operand '{token}'")]
    InvalidOperand { line: usize, token: String },

    #[error("line {line}: invalid literal '{token}'")]
    InvalidLiteral { line: usize, token: String },

    #[error("line {line}: value {value} outside {min}..={max}", min = WORD_MIN, max = WORD_MAX)]
    ValueOutOfRange { line: usize, value: i32 },

    #[error("line {line}: unexpected '{token}'")]
    TrailingToken { line: usize, token: String },

    #[error("line {line}: program does not fit in memory")]
    ProgramTooLarge { line: usize },
}

impl AssemblyError {
    pub fn line(&self) -> usize {
        use AssemblyError::*;
        match self {
            UnknownMnemonic { line, .. }
            | InvalidOperand { line, .. }
            | InvalidLiteral { line, .. }
            | ValueOutOfRange { line, .. }
            | TrailingToken { line, .. }
            | ProgramTooLarge { line } => *line,
        }
    }
}
