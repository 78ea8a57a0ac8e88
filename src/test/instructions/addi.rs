use super::run_one;
use crate::{instr_rri, RegisterId};

#[test]
fn adds_immediate() {
    let (state, _) = run_one(instr_rri!(ADDI, R1, R2, 40), state![R2 = 960]);
    assert_eq!(state.register(RegisterId::R1), 1000);
}

#[test]
fn negative_immediate_is_sign_extended() {
    let (state, _) = run_one(instr_rri!(ADDI, R1, R2, -1), state![R2 = 0]);
    assert_eq!(state.register(RegisterId::R1), -1);
}

#[test]
fn wraps_on_overflow() {
    let (state, _) = run_one(instr_rri!(ADDI, R1, R2, 1), state![R2 = i16::MAX]);
    assert_eq!(state.register(RegisterId::R1), i16::MIN);
}

#[test]
fn loads_small_constant_from_r0() {
    let (state, _) = run_one(instr_rri!(ADDI, R5, R0, 63), state![]);
    assert_eq!(state.register(RegisterId::R5), 63);
}
