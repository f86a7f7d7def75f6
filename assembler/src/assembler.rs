
use crate::helpers::{parse_int, strip_comment};
use crate::ir::*;
use crate::misc::AssemblyError;
use common::asm::*;
use common::constants::*;
use common::program::{Program, ProgramEntry, DATA_MNEMONIC};

use log::{debug, trace, warn};

const ORIGIN_MARKER: char = '*';

/// Result of assembling a source text. The program holds every line that
/// assembled cleanly even when there are errors; callers decide whether to
/// load it.
#[derive(Debug, Clone, Default)]
pub struct Assembly {
    pub program: Program,
    pub errors: Vec<AssemblyError>,
}

impl Assembly {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn into_result(self) -> Result<Program, Vec<AssemblyError>> {
        if self.errors.is_empty() {
            Ok(self.program)
        } else {
            Err(self.errors)
        }
    }
}

pub fn assemble(prog: &str) -> Assembly {
    Assembler::new().assemble(prog)
}

struct Assembler {
    entries: Vec<ProgramEntry>,
    errors: Vec<AssemblyError>,
}


impl Assembler {

    fn new() -> Assembler {
        Assembler{
            entries: Vec::new(),
            errors: Vec::new(),
        }
    }

    fn error(&mut self, err: AssemblyError) {
        debug!("{err}");
        self.errors.push(err);
    }

    fn parse_data(&mut self, line: usize, token: &str) -> Option<Cmd> {
        let Some(val) = parse_int(token) else {
            self.error(AssemblyError::InvalidLiteral{line, token: token.to_string()});
            return None;
        };
        if !in_word_range(val) {
            self.error(AssemblyError::ValueOutOfRange{line, value: val});
            return None;
        }
        Some(Cmd::Data(val as Word))
    }

    fn parse_ins(&mut self, line: usize, text: &str) -> Option<Cmd> {
        let mut tokens = text.split_whitespace();
        let mnemonic = tokens.next()?;

        let Some(op) = Opcode::from_mnemonic(mnemonic) else {
            self.error(AssemblyError::UnknownMnemonic{line, mnemonic: mnemonic.to_string()});
            return None;
        };

        let operand = match tokens.next() {
            None => 0,
            Some(token) => match parse_int(token) {
                Some(val) => val,
                None => {
                    self.error(AssemblyError::InvalidOperand{line, token: token.to_string()});
                    return None;
                }
            },
        };

        if let Some(token) = tokens.next() {
            self.error(AssemblyError::TrailingToken{line, token: token.to_string()});
            return None;
        }

        Some(Cmd::Ins(Ins::new(op, operand)))
    }

    // First pass: one statement per meaningful line.
    fn parse_line(&mut self, line: usize, text: &str) -> Option<Stmt> {
        let text = strip_comment(text).trim();
        if text.is_empty() {
            return None;
        }

        let cmd = if let Some(rest) = text.strip_prefix(ORIGIN_MARKER) {
            // Targets that aren't numbers are skipped when placed, like out of
            // range ones.
            Cmd::Origin(parse_int(rest.trim()))
        } else if let Some(rest) = Self::strip_data_directive(text) {
            let rest = rest.trim();
            if rest.is_empty() {
                Cmd::Data(0)
            } else {
                self.parse_data(line, rest)?
            }
        } else if parse_int(text).is_some() {
            self.parse_data(line, text)?
        } else {
            self.parse_ins(line, text)?
        };

        Some(Stmt::new(line, cmd))
    }

    fn strip_data_directive(text: &str) -> Option<&str> {
        let mnemonic = text.split_whitespace().next()?;
        if !mnemonic.eq_ignore_ascii_case(DATA_MNEMONIC) {
            return None;
        }
        Some(&text[mnemonic.len()..])
    }

    // Second pass: give every statement an address.
    fn place(&mut self, prog: &[Stmt]) {
        let mut addr: usize = 0;
        for stmt in prog {
            let line = stmt.line;
            match stmt.cmd {
                Cmd::Origin(Some(target)) if (0..MEM_SIZE as i32).contains(&target) => {
                    trace!("Line {line}: load address now {target}");
                    addr = target as usize;
                    continue;
                }
                Cmd::Origin(Some(target)) => {
                    warn!("Line {line}: ignoring out of range load address {target}");
                    continue;
                }
                Cmd::Origin(None) => {
                    warn!("Line {line}: ignoring load address that isn't a number");
                    continue;
                }
                Cmd::Data(_) | Cmd::Ins(_) => (),
            }

            if addr >= MEM_SIZE {
                self.error(AssemblyError::ProgramTooLarge{line});
                continue;
            }

            let entry = match stmt.cmd {
                Cmd::Data(word) => ProgramEntry::data(addr as Addr, word, line),
                Cmd::Ins(ins) => ProgramEntry::ins(addr as Addr, ins, line),
                Cmd::Origin(_) => unreachable!(),
            };
            trace!("Line {line}: {addr:02} <- {:03} ({} {})", entry.word, entry.mnemonic, entry.operand);
            self.entries.push(entry);
            addr += stmt.size();
        }
    }

    fn assemble(mut self, prog: &str) -> Assembly {
        let stmts: Vec<Stmt> = prog
            .lines()
            .zip(1..)
            .filter_map(|(text, line)| self.parse_line(line, text))
            .collect();

        self.place(&stmts);

        debug!("Assembled {} words with {} errors", self.entries.len(), self.errors.len());
        Assembly{program: Program::new(self.entries), errors: self.errors}
    }
}
