use super::run_one;
use crate::{instr_rrr, RegisterId};

#[test]
fn sums_registers() {
    let (state, effect) = run_one(instr_rrr!(ADD, R3, R1, R2), state![R1 = 20, R2 = 22]);
    assert_eq!(state.register(RegisterId::R3), 42);
    assert_eq!(effect.destination, Some(RegisterId::R3));
    assert_eq!(state.pc(), 2);
}

#[test]
fn wraps_on_overflow() {
    let (state, _) = run_one(instr_rrr!(ADD, R3, R1, R2), state![R1 = i16::MAX, R2 = 1]);
    assert_eq!(state.register(RegisterId::R3), i16::MIN);
}

#[test]
fn write_to_r0_is_dropped() {
    let (state, effect) = run_one(instr_rrr!(ADD, R0, R1, R2), state![R1 = 5, R2 = 6]);
    assert_eq!(state.register(RegisterId::R0), 0);
    assert_eq!(effect.destination, Some(RegisterId::R0));
}

#[test]
fn nop_changes_only_pc_and_count() {
    let before = state![R4 = -3];
    let (after, _) = run_one(crate::nop!(), before);
    assert_eq!(after.registers(), before.registers());
    assert_eq!(after.pc(), 2);
    assert_eq!(after.instruction_count(), 1);
}
