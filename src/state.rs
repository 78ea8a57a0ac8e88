use std::fmt;

use crate::{constants, RegisterId};

/// Immutable snapshot of the processor between steps.
///
/// Every executor consumes a state and returns a fresh one; nothing
/// mutates a snapshot in place. The functional updaters below enforce
/// the architectural rule that writes to `r0` are dropped, so a
/// reachable state always reads zero from `r0`.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct ProcessorState {
    registers: [i16; constants::REGISTER_COUNT],
    pc: u16,
    halted: bool,
    instruction_count: u64,
}

impl ProcessorState {
    /// The reset state: all registers zero, PC 0, not halted.
    pub fn new() -> ProcessorState {
        ProcessorState::default()
    }

    pub fn register(&self, id: RegisterId) -> i16 {
        self.registers[id.index()]
    }

    pub fn registers(&self) -> &[i16; constants::REGISTER_COUNT] {
        &self.registers
    }

    pub fn pc(&self) -> u16 {
        self.pc
    }

    pub fn halted(&self) -> bool {
        self.halted
    }

    pub fn instruction_count(&self) -> u64 {
        self.instruction_count
    }

    /// Returns a snapshot with `id` set to `value`. A write to `r0`
    /// returns the snapshot unchanged.
    #[must_use]
    pub fn with_register(mut self, id: RegisterId, value: i16) -> ProcessorState {
        if id != RegisterId::R0 {
            self.registers[id.index()] = value;
        }
        self
    }

    #[must_use]
    pub fn with_pc(mut self, pc: u16) -> ProcessorState {
        self.pc = pc;
        self
    }

    #[must_use]
    pub fn with_halted(mut self) -> ProcessorState {
        self.halted = true;
        self
    }

    #[must_use]
    pub fn with_count_incremented(mut self) -> ProcessorState {
        self.instruction_count += 1;
        self
    }
}

impl fmt::Display for ProcessorState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (i, value) in self.registers.iter().enumerate() {
            writeln!(f, "r{}: {:6} ({:#06x})", i, value, *value as u16)?;
        }
        write!(
            f,
            "pc: {:#06x}  halted: {}  instructions: {}",
            self.pc, self.halted, self.instruction_count
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_zero_write_is_dropped() {
        let state = ProcessorState::new().with_register(RegisterId::R0, 17);
        assert_eq!(state.register(RegisterId::R0), 0);
        assert_eq!(state, ProcessorState::new());
    }

    #[test]
    fn updaters_leave_original_untouched() {
        let base = ProcessorState::new();
        let next = base.with_register(RegisterId::R3, -5).with_pc(8);
        assert_eq!(base.register(RegisterId::R3), 0);
        assert_eq!(base.pc(), 0);
        assert_eq!(next.register(RegisterId::R3), -5);
        assert_eq!(next.pc(), 8);
    }

    #[test]
    fn count_is_monotonic() {
        let state = ProcessorState::new()
            .with_count_incremented()
            .with_count_incremented();
        assert_eq!(state.instruction_count(), 2);
    }
}
