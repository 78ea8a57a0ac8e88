use super::run_one;
use crate::instr_rri;

#[test]
fn taken_forward() {
    let state = state![R1 = 4, R2 = 4].with_pc(6);
    let (next, effect) = run_one(instr_rri!(BEQ, R1, R2, 2), state);
    assert_eq!(next.pc(), 10);
    assert!(effect.branch_taken);
    assert_eq!(effect.branch_target, Some(10));
}

#[test]
fn taken_backward() {
    let state = state![].with_pc(8);
    let (next, _) = run_one(instr_rri!(BEQ, R0, R0, -6), state);
    assert_eq!(next.pc(), 4);
}

#[test]
fn zero_offset_falls_through_to_next_word() {
    let (next, effect) = run_one(instr_rri!(BEQ, R0, R0, 0), state![]);
    assert_eq!(next.pc(), 2);
    assert!(effect.branch_taken);
}

#[test]
fn not_taken_reports_would_be_target() {
    let state = state![R1 = 1, R2 = 2].with_pc(4);
    let (next, effect) = run_one(instr_rri!(BEQ, R1, R2, 10), state);
    assert_eq!(next.pc(), 6);
    assert!(!effect.branch_taken);
    assert_eq!(effect.branch_target, Some(16));
}

#[test]
fn registers_survive_branch() {
    let state = state![R1 = 9, R2 = 9];
    let (next, _) = run_one(instr_rri!(BEQ, R1, R2, 4), state);
    assert_eq!(next.registers(), state.registers());
}
