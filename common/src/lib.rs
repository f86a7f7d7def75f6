pub mod asm;
pub mod constants;
pub mod decoder;
pub mod mem;
pub mod program;

pub use asm::{Ins, Opcode};
pub use constants::{Addr, Word};
pub use program::{Program, ProgramEntry};
