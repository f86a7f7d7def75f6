use crate::machine::{assemble_ok, load, run};
use emu_lib::{Emulator, Event, EventLog, HaltReason, PipeInput, Severity, Stop};
use common::constants::MEM_SIZE;

#[test]
fn load_halt_data() {
    let prog = assemble_ok("LDA 10\nHLT\n*10\nDAT 005");
    let image = prog.image();
    assert_eq!(image[0], 510);
    assert_eq!(image[1], 0);
    assert_eq!(image[10], 5);

    let mut emu = Emulator::new();
    emu.load(prog);
    assert!(emu.step());
    assert_eq!(emu.get_state().ac(), 5);
    assert!(!emu.step());
    assert_eq!(emu.stop(), Some(&Stop::Halted(HaltReason::Halt)));
}

// Straight-line programs stop within one pass over memory, and PC stays in
// range between cycles.
#[test]
fn straight_line_terminates() {
    let srcs = [
        "NOP",
        "LDA 3\nADD 3\nSTO 4\nDAT 7",
        "LDA 5\nOUT\nNOP\nNOP\nHLT\nDAT 3",
        "IN\nOUT\nHLT",
    ];
    for src in srcs {
        let mut emu = load(src);
        emu.set_input(PipeInput::default());
        let mut cycles = 0;
        while emu.step() {
            cycles += 1;
            let pc = emu.get_state().pc();
            assert!((0..MEM_SIZE as i16).contains(&pc), "{src}: pc {pc}");
        }
        assert!(cycles < MEM_SIZE, "{src}");
    }
}

#[test]
fn ran_off_end() {
    let log = EventLog::new();
    let mut emu = load("LDA 2\nOUT\nDAT 8");
    emu.subscribe(log.clone());
    emu.run();

    // DAT 8 executes as HALT 8 before the end is reached.
    assert_eq!(emu.stop(), Some(&Stop::Halted(HaltReason::Halt)));

    let mut emu = load("LDA 3\nOUT\nNOP");
    emu.subscribe(log.clone());
    emu.run();
    assert_eq!(emu.stop(), Some(&Stop::Halted(HaltReason::RanOffEnd)));
    assert!(log.snapshot().iter().any(|e| matches!(e, Event::Notice { severity: Severity::Warning, .. })));
    assert!(!log.snapshot().iter().any(|e| matches!(e, Event::Notice { severity: Severity::Error, .. })));
}

#[test]
fn reset_round_trip() {
    let mut emu = run(r#"
        LDA 10
        SUB 11
        STO 12
        HLT
        *10
        DAT 3
        DAT 9
    "#);
    assert!(emu.get_state().get_flags().negative);
    emu.reset();
    assert_eq!(*emu.get_state(), Emulator::new().get_state().clone());
    assert!(emu.program().is_empty());
}

#[test]
fn traces_repeat() {
    let src = r#"
        LDA 20
        ADD 21
        STO 21
        BRP 5
        OUT
        HLT
        *20
        DAT -4
        DAT 6
    "#;

    let trace = |emu: &mut Emulator| {
        let log = EventLog::new();
        emu.subscribe(log.clone());
        emu.load(assemble_ok(src));
        emu.run();
        (emu.get_state().clone(), log.take())
    };

    let (state_a, trace_a) = trace(&mut Emulator::new());

    let mut emu = Emulator::new();
    emu.reset();
    let (state_b, trace_b) = trace(&mut emu);
    emu.reset();
    let (state_c, trace_c) = trace(&mut emu);

    assert_eq!(state_a, state_b);
    assert_eq!(state_b, state_c);
    assert_eq!(trace_a, trace_b);
    assert_eq!(trace_b, trace_c);
    assert!(trace_b.len() > 1);
}

#[test]
fn line_events() {
    let log = EventLog::new();
    let mut emu = Emulator::new();
    emu.subscribe(log.clone());
    emu.load(assemble_ok("// header\nLDA 5\n\nOUT\nHLT\n*5\nDAT 1"));
    emu.run();
    let lines: Vec<usize> = log
        .take()
        .into_iter()
        .filter_map(|e| match e {
            Event::LineExecuted(line) => Some(line),
            _ => None,
        })
        .collect();
    assert_eq!(lines, [2, 4, 5]);
}
