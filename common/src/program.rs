use crate::asm::Ins;
use crate::constants::*;
use crate::decoder::decode;
use crate::mem::{invalid_data, ReadU16, WriteU16};

use std::io::{self, Read, Write};

use delegate::delegate;

pub const DATA_MNEMONIC: &str = "DAT";

/// One assembled word, and where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramEntry {
    pub addr: Addr,
    pub word: Word,
    pub line: usize, // 1-based
    pub mnemonic: String,
    pub operand: i32,
}

impl ProgramEntry {
    pub fn ins(addr: Addr, ins: Ins, line: usize) -> Self {
        ProgramEntry {
            addr,
            word: ins.encode(),
            line,
            mnemonic: ins.op.name().to_string(),
            operand: ins.operand as i32,
        }
    }

    pub fn data(addr: Addr, word: Word, line: usize) -> Self {
        ProgramEntry {
            addr,
            word,
            line,
            mnemonic: DATA_MNEMONIC.to_string(),
            operand: word as i32,
        }
    }

    pub fn is_data(&self) -> bool {
        self.mnemonic == DATA_MNEMONIC
    }
}

////////////////////////////////////////////////////////////////////////////////

/// Entries in source order. Several entries may share an address; the last one
/// wins when the image is built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Program {
    entries: Vec<ProgramEntry>,
}

impl Program {
    const MAGIC: u16 = 0o1001;
    const KIND_INS: u16 = 0;
    const KIND_DATA: u16 = 1;

    pub fn new(entries: Vec<ProgramEntry>) -> Self {
        Program { entries }
    }

    delegate! {
        to self.entries {
            pub fn len(&self) -> usize;
            pub fn is_empty(&self) -> bool;
            pub fn iter(&self) -> std::slice::Iter<'_, ProgramEntry>;
        }
    }

    pub fn entries(&self) -> &[ProgramEntry] {
        &self.entries
    }

    /// One past the highest occupied address.
    pub fn extent(&self) -> usize {
        self.entries.iter().map(|e| e.addr as usize + 1).max().unwrap_or(0)
    }

    pub fn image(&self) -> [Word; MEM_SIZE] {
        let mut image = [0; MEM_SIZE];
        for entry in &self.entries {
            image[entry.addr as usize] = entry.word;
        }
        image
    }

    pub fn entry_at(&self, addr: Addr) -> Option<&ProgramEntry> {
        self.entries.iter().rev().find(|e| e.addr == addr)
    }

    pub fn line_at(&self, addr: Addr) -> Option<usize> {
        self.entry_at(addr).map(|e| e.line)
    }

    pub fn write_to(&self, out: &mut impl Write) -> io::Result<()> {
        let count = u16::try_from(self.entries.len())
            .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "too many entries"))?;
        out.write_u16(Self::MAGIC)?;
        out.write_u16(count)?;
        for entry in &self.entries {
            let line = u16::try_from(entry.line).map_err(|_| {
                io::Error::new(io::ErrorKind::InvalidInput, format!("line {} too large", entry.line))
            })?;
            let kind = if entry.is_data() { Self::KIND_DATA } else { Self::KIND_INS };
            out.write_u16(entry.addr as u16)?;
            out.write_u16(entry.word as u16)?;
            out.write_u16(line)?;
            out.write_u16(kind)?;
        }
        Ok(())
    }

    pub fn read_from(input: &mut impl Read) -> io::Result<Program> {
        let magic = input.read_u16()?;
        if magic != Self::MAGIC {
            return Err(invalid_data(format!("bad magic {magic:#o}")));
        }

        let count = input.read_u16()?;
        let mut entries = Vec::with_capacity(count as usize);
        for _ in 0..count {
            let addr = input.read_u16()?;
            let word = input.read_u16()? as Word;
            let line = input.read_u16()? as usize;
            let kind = input.read_u16()?;

            if addr as usize >= MEM_SIZE {
                return Err(invalid_data(format!("address {addr} out of range")));
            }
            if !in_word_range(word as i32) {
                return Err(invalid_data(format!("word {word} out of range")));
            }
            let addr = addr as Addr;

            let entry = match kind {
                Self::KIND_DATA => ProgramEntry::data(addr, word, line),
                Self::KIND_INS => {
                    let ins = decode(word)
                        .ok_or_else(|| invalid_data(format!("word {word} is not an instruction")))?;
                    // Keep the stored word; decoding ignores the sign.
                    ProgramEntry { word, ..ProgramEntry::ins(addr, ins, line) }
                }
                _ => return Err(invalid_data(format!("unknown entry kind {kind}"))),
            };
            entries.push(entry);
        }

        Ok(Program::new(entries))
    }
}

impl<'a> IntoIterator for &'a Program {
    type Item = &'a ProgramEntry;
    type IntoIter = std::slice::Iter<'a, ProgramEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
