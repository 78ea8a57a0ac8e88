use super::run_one;
use crate::{instr_rrr, RegisterId};

#[test]
fn nands_registers() {
    let a = 0b0110_1100_0011_0101u16 as i16;
    let b = 0b0101_0101_1111_0000u16 as i16;
    let (state, _) = run_one(instr_rrr!(NAND, R3, R1, R2), state![R1 = a, R2 = b]);
    assert_eq!(state.register(RegisterId::R3), !(a & b));
}

#[test]
fn nand_with_self_inverts() {
    let (state, _) = run_one(instr_rrr!(NAND, R2, R1, R1), state![R1 = 0x0F0Fu16 as i16]);
    assert_eq!(state.register(RegisterId::R2), !0x0F0Fu16 as i16);
}

#[test]
fn nand_of_zeros_is_all_ones() {
    let (state, _) = run_one(instr_rrr!(NAND, R1, R0, R0), state![]);
    assert_eq!(state.register(RegisterId::R1), -1);
}
