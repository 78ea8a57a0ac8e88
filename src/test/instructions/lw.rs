use crate::exec::execute;
use crate::{instr_rri, Fault, Memory, MemoryError, RegisterId};

#[test]
fn loads_word_from_memory() {
    let mut memory = Memory::new(64);
    memory.write_word(12, 0x1234).unwrap();
    let state = state![R2 = 8];
    let (next, effect) = execute(&instr_rri!(LW, R1, R2, 4), state, &mut memory).unwrap();
    assert_eq!(next.register(RegisterId::R1), 0x1234);
    assert_eq!(effect.destination, Some(RegisterId::R1));
    assert_eq!(effect.memory_address, Some(12));
}

#[test]
fn loaded_word_keeps_its_sign_bit() {
    let mut memory = Memory::new(64);
    memory.write_word(4, 0xFFFF).unwrap();
    let (next, _) = execute(&instr_rri!(LW, R1, R0, 4), state![], &mut memory).unwrap();
    assert_eq!(next.register(RegisterId::R1), -1);
}

#[test]
fn load_into_r0_is_dropped() {
    let mut memory = Memory::new(64);
    memory.write_word(0, 0x4242).unwrap();
    let (next, _) = execute(&instr_rri!(LW, R0, R0, 0), state![], &mut memory).unwrap();
    assert_eq!(next.register(RegisterId::R0), 0);
}

#[test]
fn load_outside_memory_faults() {
    // `lw r1, r0, 50` against a 32-byte memory.
    let mut memory = Memory::new(32);
    let fault = execute(&instr_rri!(LW, R1, R0, 50), state![], &mut memory).unwrap_err();
    assert_eq!(
        fault,
        Fault::DataAccess {
            pc: 0,
            instruction: "lw r1, r0, 50".to_owned(),
            source: MemoryError::OutOfRange {
                address: 50,
                size: 32
            },
        }
    );
}

#[test]
fn load_from_odd_address_faults() {
    let mut memory = Memory::new(32);
    let state = state![R2 = 5];
    let fault = execute(&instr_rri!(LW, R1, R2, 0), state, &mut memory).unwrap_err();
    assert!(matches!(
        fault,
        Fault::DataAccess {
            source: MemoryError::Misaligned { address: 5 },
            ..
        }
    ));
}
