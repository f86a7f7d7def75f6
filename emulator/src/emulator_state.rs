use common::constants::*;
use common::program::Program;

use std::fmt;

use log::trace;
use num_derive::ToPrimitive;
use num_traits::ToPrimitive;

#[derive(Debug, Clone, Copy, ToPrimitive, PartialEq, Eq, Hash)]
pub enum Reg {
    PC = 0,
    AC,
    IR,
    MAR,
    MBR,
}

pub const NUM_REGS: usize = 5;

impl Reg {
    pub const ALL: [Reg; NUM_REGS] = [Reg::PC, Reg::AC, Reg::IR, Reg::MAR, Reg::MBR];
}

impl fmt::Display for Reg {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

////////////////////////////////////////////////////////////////////////////////

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Flags {
    pub zero: bool,
    pub negative: bool,
}

impl Flags {
    pub fn new() -> Flags {
        Default::default()
    }

    pub fn from_ac(ac: Word) -> Flags {
        Flags {
            zero: ac == 0,
            negative: ac < 0,
        }
    }
}

////////////////////////////////////////////////////////////////////////////////

// Out of range addresses and values are bugs in the caller, so they panic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Memory {
    cells: [Word; MEM_SIZE],
}

impl Memory {
    pub fn new() -> Self {
        Memory { cells: [0; MEM_SIZE] }
    }

    pub fn size(&self) -> usize {
        self.cells.len()
    }

    pub fn read(&self, addr: Addr) -> Word {
        assert!((addr as usize) < MEM_SIZE, "Memory read of {addr} out of range");
        self.cells[addr as usize]
    }

    pub fn write(&mut self, addr: Addr, val: Word) {
        assert!((addr as usize) < MEM_SIZE, "Memory write of {addr} out of range");
        assert!(in_word_range(val as i32), "Memory write of {val} to {addr} out of word range");
        trace!("Mem: writing {val} to {addr:02}");
        self.cells[addr as usize] = val;
    }

    pub fn reset(&mut self) {
        self.cells = [0; MEM_SIZE];
    }

    // Zero fills first, so nothing from a previous program survives.
    pub fn load(&mut self, program: &Program) {
        self.reset();
        for entry in program {
            self.write(entry.addr, entry.word);
        }
    }

    pub fn as_slice(&self) -> &[Word] {
        &self.cells
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

////////////////////////////////////////////////////////////////////////////////

// Owned by a single Emulator; there is no global machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MachineState {
    mem: Memory,
    regs: [Word; NUM_REGS],
    flags: Flags,
}

impl MachineState {
    pub fn new() -> Self {
        MachineState {
            mem: Memory::new(),
            regs: [0; NUM_REGS],
            flags: Flags::new(),
        }
    }

    pub fn reset(&mut self) {
        self.mem.reset();
        self.regs = [0; NUM_REGS];
        self.flags = Flags::new();
    }

    pub fn reg_write(&mut self, reg: Reg, val: Word) {
        trace!("Reg: writing {val} to {reg}");
        self.regs[reg.to_usize().unwrap()] = val;
    }

    pub fn reg_read(&self, reg: Reg) -> Word {
        self.regs[reg.to_usize().unwrap()]
    }

    pub fn pc(&self) -> Word {
        self.reg_read(Reg::PC)
    }

    pub fn ac(&self) -> Word {
        self.reg_read(Reg::AC)
    }

    pub fn get_flags(&self) -> Flags {
        self.flags
    }

    pub fn set_flags(&mut self, flags: Flags) {
        self.flags = flags;
    }

    pub fn mem(&self) -> &Memory {
        &self.mem
    }

    pub fn mem_mut(&mut self) -> &mut Memory {
        &mut self.mem
    }
}

impl Default for MachineState {
    fn default() -> Self {
        Self::new()
    }
}
