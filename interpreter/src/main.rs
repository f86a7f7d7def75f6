use std::process::ExitCode;

use as_lib::assemble;
use emu_lib::io::console::{ConsoleObserver, StdinInput};
use emu_lib::{Controller, Emulator, RunState};

use clap::Parser;
use clap_stdin::FileOrStdin;
use log::error;

/// Decimal machine assembly interpreter
#[derive(Parser)]
#[command(about)]
struct Args {
    /// Input assembly file
    input: FileOrStdin,

    /// Cycles per second.
    #[arg(long, default_value_t = 10.0)]
    rate: f64,

    /// Print every machine event to stderr.
    #[arg(long)]
    trace: bool,
}

fn main() -> ExitCode {
    env_logger::init();

    let args = Args::parse();
    let input = match args.input.contents() {
        Ok(input) => input,
        Err(e) => {
            error!("Reading input: {e}");
            return ExitCode::FAILURE;
        }
    };

    // Nothing runs unless the whole source assembled.
    let program = match assemble(input.as_str()).into_result() {
        Ok(program) => program,
        Err(errors) => {
            for err in &errors {
                eprintln!("{err}");
            }
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

    let state = ctl.run();
    eprintln!("{state:?} after {} cycles", ctl.cycles());
    match state {
        RunState::Errored => ExitCode::FAILURE,
        _ => ExitCode::SUCCESS,
    }
}
