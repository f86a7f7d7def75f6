pub mod console;

use crate::controller::RunState;
use crate::emulator_state::Reg;
use common::constants::{Addr, Word};

use std::collections::VecDeque;
use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// Everything a front end needs to follow the machine. Within a cycle, events
/// arrive in the order the hardware would perform them: fetch, then the
/// executed line, then the instruction's effects.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    RegisterChanged { reg: Reg, value: Word },
    MemoryWritten { addr: Addr, value: Word },
    MemoryRead { addr: Addr },
    FlagsChanged { zero: bool, negative: bool },
    CycleAdvanced(u64),
    RunStateChanged(RunState),
    LineExecuted(usize),
    Output(Word),
    Notice { severity: Severity, message: String },
}

pub trait Observer: Send {
    fn notify(&mut self, event: &Event);
}

// A dropped receiver just means nobody is listening.
impl Observer for Sender<Event> {
    fn notify(&mut self, event: &Event) {
        let _ = self.send(event.clone());
    }
}

/// Records every event; clones share the same log.
#[derive(Default, Clone)]
pub struct EventLog {
    events: Arc<Mutex<Vec<Event>>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn take(&self) -> Vec<Event> {
        std::mem::take(&mut self.events.lock().unwrap())
    }

    pub fn snapshot(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }

    pub fn outputs(&self) -> Vec<Word> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter_map(|e| match e {
                Event::Output(val) => Some(*val),
                _ => None,
            })
            .collect()
    }
}

impl Observer for EventLog {
    fn notify(&mut self, event: &Event) {
        self.events.lock().unwrap().push(event.clone());
    }
}

////////////////////////////////////////////////////////////////////////////////

pub trait InputSource: Send {
    // None cancels the request. Range checking is the CPU's job.
    fn read_input(&mut self) -> Option<i32>;
}

#[derive(Default, Clone, Copy)]
pub struct NoInput();

impl InputSource for NoInput {
    fn read_input(&mut self) -> Option<i32> {
        None
    }
}

/// Queued answers; runs out by cancelling. Clones share the queue.
#[derive(Default, Clone)]
pub struct PipeInput {
    in_buf: Arc<Mutex<VecDeque<i32>>>,
}

impl PipeInput {
    pub fn push_input(&self, val: i32) {
        self.in_buf.lock().unwrap().push_back(val);
    }

    pub fn write_input(&self, vals: &[i32]) {
        for val in vals.iter() {
            self.push_input(*val);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.in_buf.lock().unwrap().is_empty()
    }
}

impl InputSource for PipeInput {
    fn read_input(&mut self) -> Option<i32> {
        self.in_buf.lock().unwrap().pop_front()
    }
}
