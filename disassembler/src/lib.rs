use common::constants::{Addr, Word};
use common::decoder::decode;
use common::program::{Program, DATA_MNEMONIC};

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Disassembled {
    pub addr: Addr,
    pub word: Word,
    pub line: Option<usize>,
    pub interp: String,
}

impl fmt::Display for Disassembled {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:02}:\t{:4}\t{}", self.addr, self.word, self.interp)?;
        if let Some(line) = self.line {
            write!(f, "\t; line {line}")?;
        }
        Ok(())
    }
}

/// One row per address up to the program's extent. Words that were assembled
/// as data, or that don't decode, are shown as DAT.
pub fn disassemble(program: &Program) -> Vec<Disassembled> {
    let image = program.image();
    (0..program.extent())
        .map(|i| {
            let addr = i as Addr;
            let word = image[i];
            let entry = program.entry_at(addr);
            let interp = match (entry, decode(word)) {
                (Some(entry), _) if entry.is_data() => format!("{DATA_MNEMONIC} {word}"),
                (_, Some(ins)) => ins.to_string(),
                _ => format!("{DATA_MNEMONIC} {word}"),
            };
            Disassembled {
                addr,
                word,
                line: entry.map(|e| e.line),
                interp,
            }
        })
        .collect()
}

// Shorter runs are left alone.
const ZERO_RUN_THRESH: usize = 8;

fn is_filler(dis: &Disassembled) -> bool {
    dis.word == 0 && dis.line.is_none()
}

/// Drops the middle of every long run of zero words that no source line put
/// there. The ends of the run stay, so callers can spot the address gap.
pub fn remove_long_zeros(disassembly: Vec<Disassembled>) -> Vec<Disassembled> {
    let mut out = Vec::with_capacity(disassembly.len());
    let mut run: Vec<Disassembled> = Vec::new();

    let flush = |run: &mut Vec<Disassembled>, out: &mut Vec<Disassembled>| {
        if run.len() > ZERO_RUN_THRESH {
            let last = run.pop();
            out.extend(run.drain(..).take(1));
            out.extend(last);
        } else {
            out.append(run);
        }
    };

    for dis in disassembly {
        if is_filler(&dis) {
            run.push(dis);
        } else {
            flush(&mut run, &mut out);
            out.push(dis);
        }
    }
    flush(&mut run, &mut out);
    out
}
