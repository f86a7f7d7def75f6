use disassembler::{disassemble, remove_long_zeros, Disassembled};
use common::program::Program;

use std::fs::File;
use std::io::BufReader;
use std::process::ExitCode;

use clap::Parser;
use log::error;

/// Decimal machine disassembler
#[derive(Parser)]
struct Args {
    /// Image to disassemble
    bin: String,
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

    let disassembly = remove_long_zeros(disassemble(&program));

    let mut prev: Option<&Disassembled> = None;
    for dis in &disassembly {
        if let Some(p) = prev {
            if p.addr + 1 != dis.addr {
                println!("...");
            }
        }
        println!("{dis}");
        prev = Some(dis);
    }
    ExitCode::SUCCESS
}
