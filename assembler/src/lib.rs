pub mod assembler;
pub mod helpers;
pub mod ir;
pub mod misc;

pub use assembler::{assemble, Assembly};
pub use misc::AssemblyError;
