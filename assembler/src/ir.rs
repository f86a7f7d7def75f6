use common::asm::Ins;
use common::constants::Word;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cmd {
    // Range checked when placed. None and out of range targets are ignored.
    Origin(Option<i32>),
    Data(Word),
    Ins(Ins),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stmt {
    pub line: usize,
    pub cmd: Cmd,
}

impl Stmt {
    pub fn new(line: usize, cmd: Cmd) -> Stmt {
        Stmt { line, cmd }
    }

    // Number of words the statement occupies.
    pub fn size(&self) -> usize {
        match self.cmd {
            Cmd::Origin(_) => 0,
            Cmd::Data(_) | Cmd::Ins(_) => 1,
        }
    }
}
