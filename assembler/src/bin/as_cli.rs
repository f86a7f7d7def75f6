use std::fs::File;
use std::process::ExitCode;

use as_lib::assemble;

use clap::Parser;
use clap_stdin::FileOrStdin;
use log::error;

/// Decimal machine assembler
#[derive(Parser)]
#[command(about)]
struct Args {
    /// Input assembly file
    input: FileOrStdin,

    /// File name to output to
    #[arg(long, short)]
    output: Option<String>,

    /// Print the address, word and source line of every assembled word.
    #[arg(long)]
    listing: bool,
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

    let asm = assemble(input.as_str());
    for err in &asm.errors {
        eprintln!("{err}");
    }
    if !asm.is_ok() {
        return ExitCode::FAILURE;
    }

    if args.listing {
        for entry in &asm.program {
            println!("{:02}\t{:4}\tline {}\t{} {}", entry.addr, entry.word, entry.line, entry.mnemonic, entry.operand);
        }
    }

    let outname = args.output.as_deref().unwrap_or("a.out");
    let written = File::create(outname).and_then(|mut out| asm.program.write_to(&mut out));
    if let Err(e) = written {
        error!("Writing {outname}: {e}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
