use crate::emulator::{Emulator, Stop};
use crate::emulator_state::MachineState;
use crate::error::ControllerError;
use crate::io::{Event, InputSource, Observer};
use common::program::Program;

use std::sync::{Arc, Condvar, Mutex};
use std::time::{Duration, Instant};

use delegate::delegate;
use log::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Ready,
    Running,
    Halted,
    Errored,
}

impl RunState {
    pub fn is_terminal(self) -> bool {
        matches!(self, RunState::Halted | RunState::Errored)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControllerConfig {
    /// Cycles per second while running.
    pub rate: f64,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        ControllerConfig { rate: 10.0 }
    }
}

// Set while run() is looping. Clearing it wakes a runner waiting out the
// interval between cycles.
#[derive(Debug, Default)]
struct RunFlag {
    running: Mutex<bool>,
    wake: Condvar,
}

impl RunFlag {
    fn is_set(&self) -> bool {
        *self.running.lock().unwrap()
    }

    // Returns the previous value.
    fn set(&self) -> bool {
        std::mem::replace(&mut *self.running.lock().unwrap(), true)
    }

    fn clear(&self) {
        *self.running.lock().unwrap() = false;
        self.wake.notify_all();
    }

    // Blocks until the deadline passes or the flag is cleared, whichever comes
    // first. Returns whether the flag is still set.
    fn wait_until(&self, deadline: Instant) -> bool {
        let timeout = deadline.saturating_duration_since(Instant::now());
        let guard = self.running.lock().unwrap();
        let (guard, _) = self.wake.wait_timeout_while(guard, timeout, |running| *running).unwrap();
        *guard
    }
}

/// Stops a running controller before its next cycle, without waiting for the
/// current interval to run out. Can be sent to other threads or held by an
/// observer.
#[derive(Debug, Clone)]
pub struct PauseHandle {
    flag: Arc<RunFlag>,
}

impl PauseHandle {
    pub fn pause(&self) {
        self.flag.clear();
    }

    pub fn is_running(&self) -> bool {
        self.flag.is_set()
    }
}

////////////////////////////////////////////////////////////////////////////////

pub struct Controller {
    emu: Emulator,
    run_state: RunState,
    cycles: u64,
    rate: f64,
    flag: Arc<RunFlag>,
}

impl Controller {
    pub fn new(emu: Emulator) -> Controller {
        let config = ControllerConfig::default();
        Controller {
            emu,
            run_state: RunState::Ready,
            cycles: 0,
            rate: config.rate,
            flag: Arc::new(RunFlag::default()),
        }
    }

    pub fn with_config(emu: Emulator, config: ControllerConfig) -> Result<Controller, ControllerError> {
        let mut ctl = Self::new(emu);
        ctl.set_rate(config.rate)?;
        Ok(ctl)
    }

    delegate! {
        to self.emu {
            pub fn get_state(&self) -> &MachineState;
            pub fn program(&self) -> &Program;
            pub fn stop(&self) -> Option<&Stop>;
            pub fn subscribe(&mut self, observer: impl Observer + 'static);
            pub fn set_input(&mut self, input: impl InputSource + 'static);
        }
    }

    pub fn emulator(&self) -> &Emulator {
        &self.emu
    }

    pub fn run_state(&self) -> RunState {
        self.run_state
    }

    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }

    pub fn set_rate(&mut self, cycles_per_second: f64) -> Result<(), ControllerError> {
        if !cycles_per_second.is_finite() || cycles_per_second <= 0.0 {
            return Err(ControllerError::InvalidRate(cycles_per_second));
        }
        self.rate = cycles_per_second;
        Ok(())
    }

    pub fn pause_handle(&self) -> PauseHandle {
        PauseHandle { flag: self.flag.clone() }
    }

    pub fn pause(&self) {
        self.flag.clear();
    }

    pub fn is_running(&self) -> bool {
        self.flag.is_set()
    }

    fn check_idle(&self) -> Result<(), ControllerError> {
        if self.is_running() {
            return Err(ControllerError::Busy);
        }
        Ok(())
    }

    fn set_run_state(&mut self, state: RunState) {
        debug!("Run state: {:?} -> {state:?}", self.run_state);
        self.run_state = state;
        self.emu.emit(Event::RunStateChanged(state));
    }

    /// Replaces whatever was loaded. Memory is zeroed before the new image is
    /// written.
    pub fn load(&mut self, program: Program) -> Result<(), ControllerError> {
        self.check_idle()?;
        self.emu.load(program);
        self.cycles = 0;
        self.set_run_state(RunState::Ready);
        Ok(())
    }

    /// Zeroes memory, registers, flags and the cycle count, and drops the
    /// program.
    pub fn reset(&mut self) -> Result<(), ControllerError> {
        self.check_idle()?;
        self.emu.reset();
        self.cycles = 0;
        self.set_run_state(RunState::Ready);
        Ok(())
    }

    pub fn single_step(&mut self) -> Result<bool, ControllerError> {
        self.check_idle()?;
        Ok(self.cycle())
    }

    // Only steps that fetch count as cycles. A stopped machine executes
    // nothing, and a PC already past the program halts without a fetch.
    fn cycle(&mut self) -> bool {
        if self.emu.is_stopped() {
            return false;
        }

        let fetches = !self.emu.past_end();
        let cont = self.emu.step();
        if fetches {
            self.cycles += 1;
            self.emu.emit(Event::CycleAdvanced(self.cycles));
        }

        if !cont {
            let state = match self.emu.stop() {
                Some(Stop::Errored(_)) => RunState::Errored,
                _ => RunState::Halted,
            };
            self.set_run_state(state);
        }
        cont
    }

    /// Steps at the configured rate until the machine stops or a pause is
    /// requested. A pause wakes the loop at once and takes effect before the
    /// next cycle. Calling this while already running does nothing. Returns
    /// the run state afterwards.
    pub fn run(&mut self) -> RunState {
        if self.flag.set() {
            debug!("Already running");
            return self.run_state;
        }
        if self.run_state.is_terminal() {
            self.flag.clear();
            return self.run_state;
        }

        info!("Running at {} cycles/s", self.rate);
        self.set_run_state(RunState::Running);

        let interval = Duration::from_secs_f64(1.0 / self.rate);
        let mut next = Instant::now();
        while self.flag.is_set() {
            if !self.cycle() {
                break;
            }

            next += interval;
            let now = Instant::now();
            if next < now {
                // Running behind; don't try to catch up.
                next = now;
            }
            if !self.flag.wait_until(next) {
                break;
            }
        }

        self.flag.clear();
        if self.run_state == RunState::Running {
            debug!("Paused after {} cycles", self.cycles);
            self.set_run_state(RunState::Ready);
        }
        self.run_state
    }
}
