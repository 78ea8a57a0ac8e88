//! Bit-level layout of the three instruction formats and the
//! immediate ranges shared by the assembler and the interpreter.

use crate::Word;

pub const WORD_BYTES: u16 = 2;
pub const WORD_WIDTH: u16 = 16;

pub const REGISTER_COUNT: usize = 8;

pub const OPCODE_MASK: Word = 0b1110_0000_0000_0000;
pub const REG_A_MASK: Word = 0b0001_1100_0000_0000;
pub const REG_B_MASK: Word = 0b0000_0011_1000_0000;
pub const REG_C_MASK: Word = 0b0000_0000_0000_0111;
pub const RRR_PAD_MASK: Word = 0b0000_0000_0111_1000;
pub const RRI_IMMEDIATE_MASK: Word = 0b0000_0000_0111_1111;
pub const RRI_SIGN_MASK: Word = 0b0000_0000_0100_0000;
pub const RI_IMMEDIATE_MASK: Word = 0b0000_0011_1111_1111;

pub const OPCODE_OFFSET: u32 = 13;
pub const REG_A_OFFSET: u32 = 10;
pub const REG_B_OFFSET: u32 = 7;
pub const REG_C_OFFSET: u32 = 0;

/// Signed 7-bit immediate of the RRI format.
pub const RRI_IMMEDIATE_MIN: i32 = -64;
pub const RRI_IMMEDIATE_MAX: i32 = 63;

/// Unsigned 10-bit immediate of the RI format.
pub const RI_IMMEDIATE_MAX: i32 = 1023;

/// Full 16-bit range accepted by the `movi` pseudo-instruction.
pub const MOVI_IMMEDIATE_MAX: i32 = 65535;

/// Mask applied by `lli` and by the lower half of a `movi` expansion.
pub const LOW_BITS_MASK: i32 = 0x3F;

/// Left shift applied by `lui` to its 10-bit immediate.
pub const UPPER_SHIFT: u32 = 6;

/// Steps executed by a `run` call before it gives up.
pub const DEFAULT_STEP_LIMIT: u64 = 65535;
