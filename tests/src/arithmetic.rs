use crate::machine::run;
use emu_lib::{HaltReason, RuntimeError, Stop};
use common::asm::Opcode;

#[test]
fn load_add_store() {
    let emu = run(r#"
        LOAD 40
        ADD 41
        STORE 41
        HALT
        *40
        DAT 3
        DAT 2
    "#);
    let state = emu.get_state();
    assert_eq!(state.ac(), 5);
    assert_eq!(state.mem().read(41), 5);
    assert_eq!(state.mem().read(40), 3);
    assert!(!state.get_flags().zero);
    assert!(!state.get_flags().negative);
    assert_eq!(emu.stop(), Some(&Stop::Halted(HaltReason::Halt)));
}

#[test]
fn sub_to_negative() {
    let emu = run(r#"
        LDA 10
        SUB 11
        HLT
        *10
        DAT 4
        DAT 9
    "#);
    assert_eq!(emu.get_state().ac(), -5);
    assert!(emu.get_state().get_flags().negative);
}

#[test]
fn sub_to_zero() {
    let emu = run(r#"
        LDA 10
        SUB 10
        HLT
        *10
        DAT 321
    "#);
    assert_eq!(emu.get_state().ac(), 0);
    assert!(emu.get_state().get_flags().zero);
    assert!(!emu.get_state().get_flags().negative);
}

#[test]
fn limits() {
    let emu = run(r#"
        LDA 10
        ADD 11
        HLT
        *10
        DAT 998
        DAT 1
    "#);
    assert_eq!(emu.get_state().ac(), 999);
    assert!(emu.stop().is_some_and(|s| matches!(s, Stop::Halted(_))));

    let emu = run(r#"
        LDA 10
        SUB 11
        HLT
        *10
        DAT -998
        DAT 1
    "#);
    assert_eq!(emu.get_state().ac(), -999);
}

#[test]
fn overflow() {
    let mut emu = run(r#"
        LDA 10
        ADD 10
        HLT
        *10
        DAT 500
    "#);
    assert_eq!(
        emu.stop(),
        Some(&Stop::Errored(RuntimeError::Overflow { op: Opcode::Add, addr: 1, value: 1000 }))
    );
    assert_eq!(emu.get_state().ac(), 500);

    // Frozen until reset.
    let before = emu.get_state().clone();
    assert!(!emu.step());
    assert!(!emu.step());
    assert_eq!(*emu.get_state(), before);
}

#[test]
fn underflow_every_step_count() {
    // Keep subtracting until AC leaves the word range; wherever that happens,
    // the machine ends up Errored with AC at its last legal value.
    for start in [-999, -500, 0, 250, 999] {
        let src = format!(r#"
            LDA 10
        ; loop
            SUB 11
            BR 1
            *10
            DAT {start}
            DAT 250
        "#);
        let emu = run(&src);
        let Some(Stop::Errored(RuntimeError::Overflow { op, value, .. })) = emu.stop() else {
            panic!("start {start}: {:?}", emu.stop());
        };
        assert_eq!(*op, Opcode::Sub);
        assert!(*value < -999);
        let ac = emu.get_state().ac();
        assert!(ac >= -999 && ac - 250 < -999, "start {start}: ac {ac}");
    }
}
