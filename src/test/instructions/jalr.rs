use super::run_one;
use crate::{instr_rri, RegisterId};

#[test]
fn links_and_jumps() {
    let state = state![R2 = 40].with_pc(10);
    let (next, effect) = run_one(instr_rri!(JALR, R1, R2, 0), state);
    assert_eq!(next.register(RegisterId::R1), 12);
    assert_eq!(next.pc(), 40);
    assert!(!next.halted());
    assert_eq!(effect.destination, Some(RegisterId::R1));
    assert_eq!(effect.branch_target, Some(40));
}

#[test]
fn target_register_is_read_as_unsigned() {
    let state = state![R2 = 0x8000u16 as i16];
    let (next, _) = run_one(instr_rri!(JALR, R1, R2, 0), state);
    assert_eq!(next.pc(), 0x8000);
}

#[test]
fn encoded_r0_r0_halts() {
    let state = state![R3 = 123].with_pc(4);
    let (next, _) = run_one(instr_rri!(JALR, R0, R0, 0), state);
    assert!(next.halted());
    // The link write to r0 is dropped and the jump lands on r0's
    // value.
    assert_eq!(next.register(RegisterId::R0), 0);
    assert_eq!(next.pc(), 0);
    assert_eq!(next.instruction_count(), 1);
}

#[test]
fn halt_detection_uses_operands_not_values() {
    // r2 holds 0, so the jump goes to address 0 either way, but only
    // the r0, r0 encoding halts.
    let state = state![R2 = 0];
    let (next, _) = run_one(instr_rri!(JALR, R1, R2, 0), state);
    assert!(!next.halted());

    let (next, _) = run_one(instr_rri!(JALR, R0, R2, 0), state);
    assert!(!next.halted());

    let (next, _) = run_one(instr_rri!(JALR, R0, R0, 0), state);
    assert!(next.halted());
}

#[test]
fn link_register_can_equal_target_register() {
    // The link value is written after the target is read.
    let state = state![R1 = 20].with_pc(6);
    let (next, _) = run_one(instr_rri!(JALR, R1, R1, 0), state);
    assert_eq!(next.pc(), 20);
    assert_eq!(next.register(RegisterId::R1), 8);
}
