pub mod controller;
pub mod emulator;
pub mod emulator_state;
pub mod error;
pub mod io;

pub use controller::{Controller, ControllerConfig, PauseHandle, RunState};
pub use emulator::{Emulator, ExecRet, HaltReason, Stop};
pub use emulator_state::{Flags, MachineState, Memory, Reg};
pub use error::{ControllerError, RuntimeError};
pub use io::{Event, EventLog, InputSource, Observer, PipeInput, Severity};
