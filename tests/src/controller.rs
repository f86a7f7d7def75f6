use crate::machine::assemble_ok;
use emu_lib::{Controller, ControllerConfig, ControllerError, Emulator, Event, EventLog, PipeInput, Reg, RunState};

use std::sync::mpsc::channel;
use std::thread;
use std::time::{Duration, Instant};

const FAST: ControllerConfig = ControllerConfig { rate: 100_000.0 };

const SUM_INPUTS: &str = r#"
    IN
    STA 30
    IN
    ADD 30
    OUT
    HLT
"#;

fn controller(src: &str, input: &[i32]) -> Controller {
    let pipe = PipeInput::default();
    pipe.write_input(input);
    let mut emu = Emulator::new();
    emu.set_input(pipe);
    let mut ctl = Controller::with_config(emu, FAST).unwrap();
    ctl.load(assemble_ok(src)).unwrap();
    ctl
}

#[test]
fn run_and_reset() {
    let mut ctl = controller(SUM_INPUTS, &[400, 500]);
    let log = EventLog::new();
    ctl.subscribe(log.clone());

    assert_eq!(ctl.run(), RunState::Halted);
    assert_eq!(ctl.cycles(), 6);
    assert_eq!(log.outputs(), [900]);

    ctl.reset().unwrap();
    let state = ctl.get_state();
    assert!(state.mem().as_slice().iter().all(|w| *w == 0));
    assert!(Reg::ALL.iter().all(|r| state.reg_read(*r) == 0));
    assert!(!state.get_flags().zero);
    assert!(!state.get_flags().negative);
    assert_eq!(ctl.run_state(), RunState::Ready);
    assert_eq!(ctl.cycles(), 0);
}

#[test]
fn errored_until_reset() {
    let mut ctl = controller(SUM_INPUTS, &[600, 500]);
    assert_eq!(ctl.run(), RunState::Errored);
    let ac = ctl.get_state().ac();
    assert_eq!(ac, 500);

    assert_eq!(ctl.single_step(), Ok(false));
    assert_eq!(ctl.run(), RunState::Errored);
    assert_eq!(ctl.get_state().ac(), ac);

    ctl.reset().unwrap();
    ctl.load(assemble_ok(SUM_INPUTS)).unwrap();
    assert_eq!(ctl.run_state(), RunState::Ready);
}

#[test]
fn step_through() {
    let mut ctl = controller(SUM_INPUTS, &[1, 2]);
    let mut steps = 0;
    while ctl.single_step().unwrap() {
        steps += 1;
        assert_eq!(ctl.run_state(), RunState::Ready);
    }
    assert_eq!(steps, 5);
    assert_eq!(ctl.cycles(), 6);
    assert_eq!(ctl.run_state(), RunState::Halted);
}

#[test]
fn pause_and_resume() {
    let src = r#"
        LDA 10
        ADD 11   // 1
        BR 1
        *10
        DAT 0
        DAT 0
    "#;
    let mut ctl = controller(src, &[]);
    ctl.set_rate(500.0).unwrap();

    // Events come back over a channel while another thread pauses.
    let (tx, rx) = channel();
    ctl.subscribe(tx);
    let handle = ctl.pause_handle();
    let pauser = thread::spawn(move || {
        for event in rx.iter() {
            if event == Event::CycleAdvanced(10) {
                handle.pause();
                break;
            }
        }
    });

    assert_eq!(ctl.run(), RunState::Ready);
    pauser.join().unwrap();
    assert!(ctl.cycles() >= 10);
    assert!(!ctl.is_running());

    let paused_at = ctl.cycles();
    assert_eq!(ctl.single_step(), Ok(true));
    assert_eq!(ctl.cycles(), paused_at + 1);
}

#[test]
fn slow_rate_pauses_promptly() {
    let src = r#"
        NOP
        BR 0
    "#;
    let mut ctl = controller(src, &[]);
    // Ten seconds between cycles.
    ctl.set_rate(0.1).unwrap();

    let handle = ctl.pause_handle();
    let pauser = thread::spawn(move || {
        while !handle.is_running() {
            thread::yield_now();
        }
        thread::sleep(Duration::from_millis(50));
        handle.pause();
    });

    let start = Instant::now();
    assert_eq!(ctl.run(), RunState::Ready);
    pauser.join().unwrap();
    assert!(start.elapsed() < Duration::from_secs(2), "{:?}", start.elapsed());
    assert_eq!(ctl.cycles(), 1);
}

#[test]
fn invalid_rate() {
    let mut ctl = controller("HLT", &[]);
    assert_eq!(ctl.set_rate(0.0), Err(ControllerError::InvalidRate(0.0)));
    assert_eq!(ctl.rate(), FAST.rate);
}
