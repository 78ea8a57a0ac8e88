use crate::exec::execute;
use crate::{instr_rri, Fault, Memory, MemoryError};

#[test]
fn stores_register_to_memory() {
    let mut memory = Memory::new(64);
    let state = state![R1 = 0x1234u16 as i16, R2 = 8];
    let (next, effect) = execute(&instr_rri!(SW, R1, R2, 4), state, &mut memory).unwrap();
    assert_eq!(memory.read_word(12), Ok(0x1234));
    assert_eq!(effect.memory_address, Some(12));
    assert_eq!(next.pc(), 2);
}

#[test]
fn negative_offset_addresses_backwards() {
    let mut memory = Memory::new(64);
    let state = state![R1 = 7, R2 = 10];
    let (_, effect) = execute(&instr_rri!(SW, R1, R2, -8), state, &mut memory).unwrap();
    assert_eq!(effect.memory_address, Some(2));
    assert_eq!(memory.read_word(2), Ok(7));
}

#[test]
fn base_register_is_read_as_unsigned() {
    let mut memory = Memory::new(65536);
    let state = state![R1 = 1, R2 = 0x8000u16 as i16];
    let (_, effect) = execute(&instr_rri!(SW, R1, R2, 0), state, &mut memory).unwrap();
    assert_eq!(effect.memory_address, Some(0x8000));
}

#[test]
fn store_outside_memory_faults() {
    let mut memory = Memory::new(32);
    let state = state![R1 = 1];
    let fault = execute(&instr_rri!(SW, R1, R0, 50), state, &mut memory).unwrap_err();
    assert_eq!(
        fault,
        Fault::DataAccess {
            pc: 0,
            instruction: "sw r1, r0, 50".to_owned(),
            source: MemoryError::OutOfRange {
                address: 50,
                size: 32
            },
        }
    );
}

#[test]
fn store_to_odd_address_faults() {
    let mut memory = Memory::new(32);
    let state = state![R2 = 3];
    let fault = execute(&instr_rri!(SW, R1, R2, 0), state, &mut memory).unwrap_err();
    assert!(matches!(
        fault,
        Fault::DataAccess {
            source: MemoryError::Misaligned { address: 3 },
            ..
        }
    ));
}

#[test]
fn faulting_store_leaves_state_untouched() {
    let mut memory = Memory::new(32);
    let state = state![R1 = 1];
    assert!(execute(&instr_rri!(SW, R1, R0, 50), state, &mut memory).is_err());
    assert_eq!(state.instruction_count(), 0);
    assert_eq!(state.pc(), 0);
}
