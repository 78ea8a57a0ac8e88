use super::run_one;
use crate::{instr_ri, RegisterId};

#[test]
fn shifts_immediate_into_upper_bits() {
    let (state, _) = run_one(instr_ri!(LUI, R1, 15), state![]);
    assert_eq!(state.register(RegisterId::R1), 960);
}

#[test]
fn lower_six_bits_are_zero() {
    for imm in [1i16, 100, 511, 1023] {
        let (state, _) = run_one(instr_ri!(LUI, R1, imm), state![]);
        assert_eq!(state.register(RegisterId::R1) & 0x3F, 0);
    }
}

#[test]
fn maximum_immediate_fills_upper_bits() {
    let (state, _) = run_one(instr_ri!(LUI, R1, 1023), state![]);
    assert_eq!(state.register(RegisterId::R1) as u16, 0xFFC0);
}

#[test]
fn overwrites_previous_value() {
    let (state, _) = run_one(instr_ri!(LUI, R1, 2), state![R1 = -1]);
    assert_eq!(state.register(RegisterId::R1), 128);
}
