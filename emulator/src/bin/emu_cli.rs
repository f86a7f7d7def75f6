use std::fs::File;
use std::io::BufReader;
use std::process::ExitCode;

use common::program::Program;
use emu_lib::io::console::{ConsoleObserver, StdinInput};
use emu_lib::{Controller, Emulator, RunState};

use clap::Parser;
use log::error;

/// Decimal machine emulator
#[derive(Parser)]
struct Args {
    /// Image to execute
    bin: String,

    /// Cycles per second.
    #[arg(long, default_value_t = 1000.0)]
    rate: f64,

    /// Print every machine event to stderr.
    #[arg(long)]
    trace: bool,
}

fn main() -> ExitCode {
    env_logger::init();

    let args = Args::parse();

    let program = match File::open(&args.bin).and_then(|f| Program::read_from(&mut BufReader::new(f))) {
        Ok(program) => program,
        Err(e) => {
            error!("Reading {}: {e}", args.bin);
            return ExitCode::FAILURE;
        }
    };

    let mut emu = Emulator::new();
    emu.subscribe(ConsoleObserver::new(args.trace));
    emu.set_input(StdinInput());

    let mut ctl = Controller::new(emu);
    if let Err(e) = ctl.set_rate(args.rate) {
        error!("{e}");
        return ExitCode::FAILURE;
    }
    if let Err(e) = ctl.load(program) {
        error!("{e}");
        return ExitCode::FAILURE;
    }

    match ctl.run() {
        RunState::Errored => ExitCode::FAILURE,
        _ => ExitCode::SUCCESS,
    }
}
