//! Assembled program images for the RiSC-16 toolchain.
//!
//! A [`Program`] is what the assembler hands over: instruction
//! records and data words with their addresses, the label table and
//! the entry point. From it this crate can
//!
//! - [`load`](Program::load) the image into a [`Memory`], producing
//!   the [`ProgramMetadata`] the viewer and debugger query,
//! - serialise the image as a flat file of big-endian words
//!   ([`write_file`]) and read such a file back ([`read_file`]).

mod metadata;

#[cfg(test)]
mod test;

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;

use byteorder::{ByteOrder, ReadBytesExt};
use thiserror::Error;

use rcpu::{constants, Endian, Instruction, Memory, Word};

pub use metadata::{AddressTag, ProgramMetadata};

/// An instruction together with the address it occupies.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct InstructionRecord {
    pub address: u16,
    pub instruction: Instruction,
}

/// One 16-bit data word emitted by `.fill` or `.space`.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct DataRecord {
    pub address: u16,
    pub value: Word,
}

#[derive(Error, Clone, Copy, PartialEq, Eq, Debug)]
pub enum LoadError {
    #[error("program word at {address:#06x} does not fit in memory of {size} bytes")]
    DoesNotFit { address: u16, size: usize },
    #[error("program word at odd address {address:#06x}")]
    Misaligned { address: u16 },
}

/// A fully assembled program, ready to be placed in memory.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Program {
    instructions: Vec<InstructionRecord>,
    data: Vec<DataRecord>,
    symbols: Vec<(String, u16)>,
    entry: u16,
}

impl Program {
    pub fn new(
        instructions: Vec<InstructionRecord>,
        data: Vec<DataRecord>,
        symbols: Vec<(String, u16)>,
        entry: u16,
    ) -> Program {
        Program {
            instructions,
            data,
            symbols,
            entry,
        }
    }

    pub fn instructions(&self) -> &[InstructionRecord] {
        &self.instructions
    }

    pub fn data(&self) -> &[DataRecord] {
        &self.data
    }

    /// Label table in definition order.
    pub fn symbols(&self) -> &[(String, u16)] {
        &self.symbols
    }

    pub fn entry(&self) -> u16 {
        self.entry
    }

    pub fn word_count(&self) -> usize {
        self.instructions.len() + self.data.len()
    }

    /// Byte length of the flat image: up to and including the highest
    /// occupied word.
    pub fn image_size(&self) -> usize {
        self.instructions
            .iter()
            .map(|r| r.address)
            .chain(self.data.iter().map(|r| r.address))
            .max()
            .map_or(0, |highest| highest as usize + constants::WORD_BYTES as usize)
    }

    /// Renders the image as contiguous big-endian bytes starting at
    /// address zero. Unoccupied gaps stay zero.
    pub fn image(&self) -> Vec<u8> {
        let mut image = vec![0u8; self.image_size()];
        for record in &self.instructions {
            let start = record.address as usize;
            Endian::write_u16(&mut image[start..start + 2], record.instruction.encode());
        }
        for record in &self.data {
            let start = record.address as usize;
            Endian::write_u16(&mut image[start..start + 2], record.value);
        }
        image
    }

    /// Copies the program into `memory` and builds its metadata.
    ///
    /// The memory is cleared first, so nothing of a previously loaded
    /// program survives. Fails when any word lies outside the memory.
    pub fn load(&self, memory: &mut Memory) -> Result<ProgramMetadata, LoadError> {
        memory.clear();

        let mut metadata = ProgramMetadata::new(self.entry);

        for record in &self.instructions {
            write_word(memory, record.address, record.instruction.encode())?;
            metadata.tag(record.address, AddressTag::Instruction);
        }
        for record in &self.data {
            write_word(memory, record.address, record.value)?;
            metadata.tag(record.address, AddressTag::Data);
        }
        for (name, address) in &self.symbols {
            metadata.define_label(name.clone(), *address);
        }

        Ok(metadata)
    }
}

fn write_word(memory: &mut Memory, address: u16, word: Word) -> Result<(), LoadError> {
    memory
        .write_word(u32::from(address), word)
        .map_err(|err| match err {
            rcpu::MemoryError::OutOfRange { .. } => LoadError::DoesNotFit {
                address,
                size: memory.size(),
            },
            rcpu::MemoryError::Misaligned { .. } => LoadError::Misaligned { address },
        })
}

/// Writes the flat big-endian image.
pub fn write<W: Write>(writer: &mut W, program: &Program) -> io::Result<()> {
    writer.write_all(&program.image())
}

pub fn write_file<P: AsRef<Path>>(path: P, program: &Program) -> io::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    write(&mut writer, program)
}

/// Reads a flat image back as words. The byte length must be even.
pub fn read<R: Read>(reader: &mut R) -> io::Result<Vec<Word>> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    if bytes.len() % constants::WORD_BYTES as usize != 0 {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            "image length is not a whole number of words",
        ));
    }

    let mut cursor = &bytes[..];
    let mut words = Vec::with_capacity(bytes.len() / 2);
    while !cursor.is_empty() {
        words.push(cursor.read_u16::<Endian>()?);
    }
    Ok(words)
}

pub fn read_file<P: AsRef<Path>>(path: P) -> io::Result<Vec<Word>> {
    let mut reader = BufReader::new(File::open(path)?);
    read(&mut reader)
}
