use crate::machine::run_with_input;
use emu_lib::{Event, RuntimeError, Severity, Stop};
use common::asm::Opcode;

const ECHO_SUM: &str = r#"
    IN
    STO 20
    INP
    ADD 20
    OUT
    HLT
"#;

#[test]
fn echo_sum() {
    let (emu, log) = run_with_input(ECHO_SUM, &[12, -30]);
    assert_eq!(log.outputs(), [-18]);
    assert_eq!(emu.get_state().mem().read(20), 12);
    assert!(emu.get_state().get_flags().negative);
}

#[test]
fn input_sets_flags() {
    let (emu, _) = run_with_input("IN\nHLT", &[0]);
    assert!(emu.get_state().get_flags().zero);
}

#[test]
fn cancelled() {
    let (emu, log) = run_with_input(ECHO_SUM, &[12]);
    assert_eq!(emu.stop(), Some(&Stop::Errored(RuntimeError::InputCancelled { addr: 2 })));
    assert!(log.outputs().is_empty());

    let notices: Vec<_> = log
        .snapshot()
        .into_iter()
        .filter(|e| matches!(e, Event::Notice { severity: Severity::Error, .. }))
        .collect();
    assert_eq!(notices.len(), 1);
    let Event::Notice { message, .. } = &notices[0] else { unreachable!() };
    assert!(message.contains("02"), "{message}");
}

#[test]
fn out_of_range() {
    let (emu, _) = run_with_input(ECHO_SUM, &[1000]);
    assert_eq!(
        emu.stop(),
        Some(&Stop::Errored(RuntimeError::Overflow { op: Opcode::In, addr: 0, value: 1000 }))
    );
    assert_eq!(emu.get_state().ac(), 0);
}

#[test]
fn output_each() {
    let (_, log) = run_with_input(r#"
        LDA 10
        OUT
        ADD 10
        PRN
        OUT
        HLT
        *10
        DAT 21
    "#, &[]);
    assert_eq!(log.outputs(), [21, 42, 42]);
}
