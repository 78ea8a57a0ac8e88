use super::*;

use rcpu::{instr_rri, instr_rrr};

fn sample_program() -> Program {
    Program::new(
        vec![
            InstructionRecord {
                address: 0,
                instruction: instr_rrr!(ADD, R1, R2, R3),
            },
            InstructionRecord {
                address: 2,
                instruction: instr_rri!(JALR, R0, R0, 0),
            },
        ],
        vec![
            DataRecord {
                address: 4,
                value: 0xBEEF,
            },
            DataRecord {
                address: 6,
                value: 0,
            },
        ],
        vec![("start".to_owned(), 0), ("table".to_owned(), 4)],
        0,
    )
}

#[test]
fn load_writes_every_word() {
    let mut memory = Memory::new(64);
    sample_program().load(&mut memory).unwrap();

    assert_eq!(memory.read_word(0), Ok(0x0503));
    assert_eq!(memory.read_word(2), Ok(0xE000));
    assert_eq!(memory.read_word(4), Ok(0xBEEF));
    assert_eq!(memory.read_word(6), Ok(0));
}

#[test]
fn load_clears_previous_contents() {
    let mut memory = Memory::new(64);
    memory.write_word(20, 0xAAAA).unwrap();
    sample_program().load(&mut memory).unwrap();
    assert_eq!(memory.read_word(20), Ok(0));
}

#[test]
fn load_builds_metadata() {
    let mut memory = Memory::new(64);
    let metadata = sample_program().load(&mut memory).unwrap();

    assert_eq!(metadata.entry(), 0);
    assert!(metadata.is_instruction(0));
    assert!(metadata.is_instruction(2));
    assert!(metadata.is_data(4));
    assert_eq!(metadata.tag_at(8), None);
    assert_eq!(metadata.label_at(0), Some("start"));
    assert_eq!(metadata.address_of("table"), Some(4));
    assert_eq!(metadata.address_of("nowhere"), None);
    assert_eq!(metadata.label_count(), 2);
}

#[test]
fn load_rejects_program_larger_than_memory() {
    let mut memory = Memory::new(4);
    assert_eq!(
        sample_program().load(&mut memory),
        Err(LoadError::DoesNotFit {
            address: 4,
            size: 4
        })
    );
}

#[test]
fn image_is_big_endian_and_contiguous() {
    let image = sample_program().image();
    assert_eq!(image.len(), 8);
    assert_eq!(&image[..4], &[0x05, 0x03, 0xE0, 0x00]);
    assert_eq!(&image[4..6], &[0xBE, 0xEF]);
}

#[test]
fn image_of_empty_program_is_empty() {
    let program = Program::new(Vec::new(), Vec::new(), Vec::new(), 0);
    assert!(program.image().is_empty());
    assert_eq!(program.word_count(), 0);
}

#[test]
fn write_then_read_round_trips() {
    let program = sample_program();
    let mut buffer = Vec::new();
    write(&mut buffer, &program).unwrap();

    let words = read(&mut &buffer[..]).unwrap();
    assert_eq!(words, vec![0x0503, 0xE000, 0xBEEF, 0]);
}

#[test]
fn read_rejects_odd_length() {
    let bytes = [1u8, 2, 3];
    assert!(read(&mut &bytes[..]).is_err());
}
