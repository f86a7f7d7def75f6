
use common::asm::*;
use common::constants::*;
use common::decoder::decode;
use common::program::Program;
use crate::emulator_state::{Flags, MachineState, Reg};
use crate::error::RuntimeError;
use crate::io::{Event, InputSource, NoInput, Observer, Severity};

use log::{debug, error, warn};


#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HaltReason {
    Halt,
    // Control passed the last loaded address without a HALT.
    RanOffEnd,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stop {
    Halted(HaltReason),
    Errored(RuntimeError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecRet {
    Ok,
    Halt(HaltReason),
}


pub struct Emulator {
    state: MachineState,
    program: Program,
    observers: Vec<Box<dyn Observer>>,
    input: Box<dyn InputSource>,
    stop: Option<Stop>,
}

impl Emulator {
    pub fn new() -> Emulator {
        Emulator {
            state: MachineState::new(),
            program: Program::default(),
            observers: Vec::new(),
            input: Box::new(NoInput()),
            stop: None,
        }
    }

    pub fn subscribe(&mut self, observer: impl Observer + 'static) {
        self.observers.push(Box::new(observer));
    }

    pub fn set_input(&mut self, input: impl InputSource + 'static) {
        self.input = Box::new(input);
    }

    // Fire and forget; emitted whether or not anyone is subscribed.
    pub(crate) fn emit(&mut self, event: Event) {
        for observer in self.observers.iter_mut() {
            observer.notify(&event);
        }
    }

    fn notice(&mut self, severity: Severity, message: String) {
        self.emit(Event::Notice { severity, message });
    }

    /// Clears everything, then writes the program's image. Loading the same
    /// program twice gives the same machine.
    pub fn load(&mut self, program: Program) {
        self.reset();
        self.state.mem_mut().load(&program);
        for entry in &program {
            self.emit(Event::MemoryWritten { addr: entry.addr, value: entry.word });
        }
        debug!("Loaded {} words, extent {}", program.len(), program.extent());
        self.program = program;
    }

    pub fn reset(&mut self) {
        self.state.reset();
        self.program = Program::default();
        self.stop = None;
        for reg in Reg::ALL {
            self.emit(Event::RegisterChanged { reg, value: 0 });
        }
        self.emit(Event::FlagsChanged { zero: false, negative: false });
    }

    // Run until a halt or error.
    pub fn run(&mut self) {
        while self.step() {}
    }

    /// One fetch-decode-execute cycle. Returns false once the machine has
    /// halted or faulted; after that it never changes state again until reset.
    pub fn step(&mut self) -> bool {
        if self.stop.is_some() {
            return false;
        }

        match self.run_ins() {
            Ok(ExecRet::Ok) => true,
            Ok(ExecRet::Halt(reason)) => {
                self.halt(reason);
                false
            }
            Err(err) => {
                self.fault(err);
                false
            }
        }
    }

    fn run_ins(&mut self) -> Result<ExecRet, RuntimeError> {
        if self.past_end() {
            return Ok(ExecRet::Halt(HaltReason::RanOffEnd));
        }

        let addr = self.fetch();
        let word = self.state.reg_read(Reg::IR);
        let Some(ins) = decode(word) else {
            return Err(RuntimeError::UnknownOpcode { addr, word });
        };
        debug!("PC: {addr:02}: {ins}");
        self.notice(Severity::Info, format!("{addr:02}: {ins}"));

        let ret = self.exec(addr, &ins)?;
        if ret == ExecRet::Ok && self.past_end() {
            return Ok(ExecRet::Halt(HaltReason::RanOffEnd));
        }
        Ok(ret)
    }

    /// Whether PC has left the loaded program, so the next step halts without
    /// fetching.
    pub fn past_end(&self) -> bool {
        self.state.pc() as usize >= self.program.extent()
    }

    fn halt(&mut self, reason: HaltReason) {
        match reason {
            HaltReason::Halt => debug!("Halted at PC {}", self.state.pc()),
            HaltReason::RanOffEnd => {
                let msg = format!("ran off the end of the program at address {:02}", self.state.pc());
                warn!("{msg}");
                self.notice(Severity::Warning, msg);
            }
        }
        self.stop = Some(Stop::Halted(reason));
    }

    fn fault(&mut self, err: RuntimeError) {
        error!("{err}");
        self.notice(Severity::Error, err.to_string());
        self.stop = Some(Stop::Errored(err));
    }

    pub fn get_state(&self) -> &MachineState {
        &self.state
    }

    pub fn get_state_mut(&mut self) -> &mut MachineState {
        &mut self.state
    }

    pub fn program(&self) -> &Program {
        &self.program
    }

    pub fn stop(&self) -> Option<&Stop> {
        self.stop.as_ref()
    }

    pub fn is_stopped(&self) -> bool {
        self.stop.is_some()
    }


    ///////////////////////////////////////////////////////////////////////////


    fn set_reg(&mut self, reg: Reg, value: Word) {
        self.state.reg_write(reg, value);
        self.emit(Event::RegisterChanged { reg, value });
    }

    fn mem_read(&mut self, addr: Addr) -> Word {
        self.emit(Event::MemoryRead { addr });
        self.state.mem().read(addr)
    }

    fn mem_write(&mut self, addr: Addr, value: Word) {
        self.state.mem_mut().write(addr, value);
        self.emit(Event::MemoryWritten { addr, value });
    }

    // Every write to AC goes through here so Z and N always follow it.
    fn write_ac(&mut self, value: Word) {
        self.set_reg(Reg::AC, value);
        let flags = Flags::from_ac(value);
        self.state.set_flags(flags);
        self.emit(Event::FlagsChanged { zero: flags.zero, negative: flags.negative });
    }

    // MAR <- PC; MBR <- M[MAR]; IR <- MBR; PC <- PC + 1
    // Returns the address fetched from.
    fn fetch(&mut self) -> Addr {
        let addr = self.state.pc() as Addr;
        self.set_reg(Reg::MAR, addr as Word);
        let word = self.mem_read(addr);
        self.set_reg(Reg::MBR, word);
        self.set_reg(Reg::IR, word);
        self.set_reg(Reg::PC, addr as Word + 1);

        if let Some(line) = self.program.line_at(addr) {
            self.emit(Event::LineExecuted(line));
        }
        addr
    }


    ///////////////////////////////////////////////////////////////////////////
    // Execute
    ///////////////////////////////////////////////////////////////////////////

    // MAR <- operand; MBR <- M[MAR]
    fn read_operand(&mut self, operand: Addr) -> Word {
        self.set_reg(Reg::MAR, operand as Word);
        let val = self.mem_read(operand);
        self.set_reg(Reg::MBR, val);
        val
    }

    // AC is left alone when the result doesn't fit.
    fn do_arith(&mut self, addr: Addr, ins: &Ins, op: fn(i32, i32) -> i32) -> Result<(), RuntimeError> {
        let val = self.read_operand(ins.operand);
        let res = op(self.state.ac() as i32, val as i32);
        if !in_word_range(res) {
            return Err(RuntimeError::Overflow { op: ins.op, addr, value: res });
        }
        self.write_ac(res as Word);
        Ok(())
    }

    fn do_store(&mut self, operand: Addr) {
        self.set_reg(Reg::MAR, operand as Word);
        let ac = self.state.ac();
        self.set_reg(Reg::MBR, ac);
        self.mem_write(operand, ac);
    }

    fn do_branch(&mut self, operand: Addr, taken: bool) {
        if taken {
            self.set_reg(Reg::PC, operand as Word);
        }
    }

    fn do_input(&mut self, addr: Addr) -> Result<(), RuntimeError> {
        let Some(val) = self.input.read_input() else {
            return Err(RuntimeError::InputCancelled { addr });
        };
        debug!("IN: read {val}");
        if !in_word_range(val) {
            return Err(RuntimeError::Overflow { op: Opcode::In, addr, value: val });
        }
        self.write_ac(val as Word);
        Ok(())
    }

    fn do_output(&mut self) {
        let ac = self.state.ac();
        debug!("OUT: {ac}");
        self.emit(Event::Output(ac));
    }

    fn exec(&mut self, addr: Addr, ins: &Ins) -> Result<ExecRet, RuntimeError> {
        let ac = self.state.ac();
        match ins.op {
            Opcode::Halt => return Ok(ExecRet::Halt(HaltReason::Halt)),
            Opcode::Add => self.do_arith(addr, ins, |a, b| a + b)?,
            Opcode::Sub => self.do_arith(addr, ins, |a, b| a - b)?,
            Opcode::Store => self.do_store(ins.operand),
            Opcode::Nop => (),
            Opcode::Load => {
                let val = self.read_operand(ins.operand);
                self.write_ac(val);
            }
            Opcode::Branch => self.do_branch(ins.operand, true),
            Opcode::Brz => self.do_branch(ins.operand, ac == 0),
            Opcode::Brp => self.do_branch(ins.operand, ac >= 0),
            Opcode::In => self.do_input(addr)?,
            Opcode::Out => self.do_output(),
        }

        Ok(ExecRet::Ok)
    }
}

impl Default for Emulator {
    fn default() -> Self {
        Self::new()
    }
}
