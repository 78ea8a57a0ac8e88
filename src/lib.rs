//! Processor model and interpreter for the RiSC-16 architecture.
//!
//! RiSC-16 is a 16-bit load/store machine with eight registers (`r0`
//! is hardwired to zero), a 16-bit word-addressed memory and eight
//! opcodes spread over three instruction formats:
//!
//! ```text
//!          +--------+------+------+----------+------+
//!          |15    13|      |      |          |     0|
//!          +--------+------+------+----------+------+
//! RRR      | opcode |  rA  |  rB  |   0000   |  rC  |
//!          +--------+------+------+----------+------+
//! RRI      | opcode |  rA  |  rB  |   imm (signed 7) |
//!          +--------+------+------+------------------+
//! RI       | opcode |  rA  |     imm (unsigned 10)   |
//!          +--------+------+-------------------------+
//! ```
//!
//! The crate provides the instruction record with bit-exact
//! [`encode`](Instruction::encode)/[`decode`](Instruction::decode),
//! the byte-addressed [`Memory`], the immutable [`ProcessorState`]
//! snapshot, one pure executor per opcode and the fetch/decode/dispatch
//! [`Engine`]. Words are stored big-endian at even byte addresses.

mod engine;
mod exec;
mod instructions;
mod memory;
mod state;

pub mod constants;


pub use engine::{Engine, RunResult};
pub use exec::{execute, Effect, Fault};
pub use instructions::{Format, Instruction, Opcode, ParseEnumError, RegisterId};
pub use memory::{Memory, MemoryError};
pub use state::ProcessorState;

/// One machine word. All instructions and data cells are this wide.
pub type Word = u16;

/// Byte order of words in memory and in program images.
pub type Endian = byteorder::BigEndian;
