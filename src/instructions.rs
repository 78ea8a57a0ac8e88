use std::fmt;
use std::str::FromStr;

use byteorder::ByteOrder;
use num_derive::{FromPrimitive, ToPrimitive};
use num_traits::{FromPrimitive, ToPrimitive};
use thiserror::Error;

use crate::{constants, Endian, Word};

/// The eight RiSC-16 opcodes with their fixed 3-bit codes.
#[derive(Clone, Copy, PartialEq, Eq, Debug, FromPrimitive, ToPrimitive)]
pub enum Opcode {
    //  Mnemonic | Format | Effect
    // ----------+--------+----------------------------------------
    ADD,  //     | RRR    | rA = rB + rC
    ADDI, //     | RRI    | rA = rB + imm
    NAND, //     | RRR    | rA = ~(rB & rC)
    LUI,  //     | RI     | rA = imm << 6
    SW,   //     | RRI    | MEM[rB + imm] = rA
    LW,   //     | RRI    | rA = MEM[rB + imm]
    BEQ,  //     | RRI    | if rA == rB: PC = PC + 2 + imm
    JALR, //     | RRI    | rA = PC + 2; PC = rB
}

/// The three instruction formats.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Format {
    RRR,
    RRI,
    RI,
}

/// Register identifiers `r0`..`r7`. `r0` always reads as zero.
#[derive(Clone, Copy, PartialEq, Eq, Debug, FromPrimitive, ToPrimitive)]
pub enum RegisterId {
    R0,
    R1,
    R2,
    R3,
    R4,
    R5,
    R6,
    R7,
}

impl Opcode {
    /// Every opcode has exactly one format.
    pub fn format(self) -> Format {
        match self {
            Opcode::ADD | Opcode::NAND => Format::RRR,
            Opcode::ADDI | Opcode::SW | Opcode::LW | Opcode::BEQ | Opcode::JALR => Format::RRI,
            Opcode::LUI => Format::RI,
        }
    }

    pub fn mnemonic(self) -> &'static str {
        match self {
            Opcode::ADD => "add",
            Opcode::ADDI => "addi",
            Opcode::NAND => "nand",
            Opcode::LUI => "lui",
            Opcode::SW => "sw",
            Opcode::LW => "lw",
            Opcode::BEQ => "beq",
            Opcode::JALR => "jalr",
        }
    }

    pub fn code(self) -> Word {
        self.to_u16().unwrap()
    }
}

#[derive(Clone, Eq, PartialEq, Debug, Error)]
#[error("failed to parse \"{value}\" as {enum_name}")]
pub struct ParseEnumError {
    pub value: String,
    pub enum_name: &'static str,
}

impl FromStr for Opcode {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "add" => Ok(Opcode::ADD),
            "addi" => Ok(Opcode::ADDI),
            "nand" => Ok(Opcode::NAND),
            "lui" => Ok(Opcode::LUI),
            "sw" => Ok(Opcode::SW),
            "lw" => Ok(Opcode::LW),
            "beq" => Ok(Opcode::BEQ),
            "jalr" => Ok(Opcode::JALR),
            _ => Err(ParseEnumError {
                value: s.to_owned(),
                enum_name: "Opcode",
            }),
        }
    }
}

impl RegisterId {
    pub fn index(self) -> usize {
        self.to_usize().unwrap()
    }

    pub fn number(self) -> Word {
        self.to_u16().unwrap()
    }
}

impl FromStr for RegisterId {
    type Err = ParseEnumError;

    /// Accepts `r0`..`r7` in either case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = s.as_bytes();
        if bytes.len() == 2 && (bytes[0] == b'r' || bytes[0] == b'R') {
            if let Some(id) = (bytes[1] as char)
                .to_digit(10)
                .and_then(RegisterId::from_u32)
            {
                return Ok(id);
            }
        }
        Err(ParseEnumError {
            value: s.to_owned(),
            enum_name: "RegisterId",
        })
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}

impl fmt::Display for RegisterId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "r{}", self.number())
    }
}

/// A decoded instruction.
///
/// One flat record covers all three formats; fields a format does not
/// use are normalised to `R0` / `0` so that encode and decode round
/// trip exactly. The immediate holds the signed 7-bit RRI value or the
/// unsigned 10-bit RI value.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Instruction {
    pub opcode: Opcode,
    pub reg_a: RegisterId,
    pub reg_b: RegisterId,
    pub reg_c: RegisterId,
    pub immediate: i16,
}

impl Instruction {
    /// Constructs an RRR-format instruction (`add`, `nand`).
    pub fn rrr(opcode: Opcode, reg_a: RegisterId, reg_b: RegisterId, reg_c: RegisterId) -> Self {
        debug_assert_eq!(opcode.format(), Format::RRR);
        Instruction {
            opcode,
            reg_a,
            reg_b,
            reg_c,
            immediate: 0,
        }
    }

    /// Constructs an RRI-format instruction (`addi`, `sw`, `lw`,
    /// `beq`, `jalr`). The immediate must lie in [-64, 63].
    pub fn rri(opcode: Opcode, reg_a: RegisterId, reg_b: RegisterId, immediate: i16) -> Self {
        debug_assert_eq!(opcode.format(), Format::RRI);
        debug_assert!(
            (constants::RRI_IMMEDIATE_MIN..=constants::RRI_IMMEDIATE_MAX)
                .contains(&i32::from(immediate))
        );
        Instruction {
            opcode,
            reg_a,
            reg_b,
            reg_c: RegisterId::R0,
            immediate,
        }
    }

    /// Constructs an RI-format instruction (`lui`). The immediate must
    /// lie in [0, 1023].
    pub fn ri(opcode: Opcode, reg_a: RegisterId, immediate: i16) -> Self {
        debug_assert_eq!(opcode.format(), Format::RI);
        debug_assert!((0..=constants::RI_IMMEDIATE_MAX).contains(&i32::from(immediate)));
        Instruction {
            opcode,
            reg_a,
            reg_b: RegisterId::R0,
            reg_c: RegisterId::R0,
            immediate,
        }
    }

    pub fn format(self) -> Format {
        self.opcode.format()
    }

    /// Encodes into one 16-bit word. Negative RRI immediates are
    /// masked to their 7-bit two's-complement form.
    pub fn encode(self) -> Word {
        let op = self.opcode.code() << constants::OPCODE_OFFSET;
        let a = self.reg_a.number() << constants::REG_A_OFFSET;
        match self.format() {
            Format::RRR => {
                op | a
                    | (self.reg_b.number() << constants::REG_B_OFFSET)
                    | (self.reg_c.number() << constants::REG_C_OFFSET)
            }
            Format::RRI => {
                op | a
                    | (self.reg_b.number() << constants::REG_B_OFFSET)
                    | (self.immediate as Word & constants::RRI_IMMEDIATE_MASK)
            }
            Format::RI => op | a | (self.immediate as Word & constants::RI_IMMEDIATE_MASK),
        }
    }

    /// Decodes one word. Returns `None` for an invalid encoding: the
    /// only rejected shape is an RRR word whose 4-bit padding field is
    /// non-zero. The 7-bit RRI immediate is sign-extended and the
    /// 10-bit RI immediate zero-extended.
    pub fn decode(word: Word) -> Option<Instruction> {
        let opcode = Opcode::from_u16((word & constants::OPCODE_MASK) >> constants::OPCODE_OFFSET)?;
        let reg_a =
            RegisterId::from_u16((word & constants::REG_A_MASK) >> constants::REG_A_OFFSET)?;
        let reg_b =
            RegisterId::from_u16((word & constants::REG_B_MASK) >> constants::REG_B_OFFSET)?;
        let reg_c =
            RegisterId::from_u16((word & constants::REG_C_MASK) >> constants::REG_C_OFFSET)?;

        Some(match opcode.format() {
            Format::RRR => {
                if word & constants::RRR_PAD_MASK != 0 {
                    return None;
                }
                Instruction::rrr(opcode, reg_a, reg_b, reg_c)
            }
            Format::RRI => {
                let mut raw = word & constants::RRI_IMMEDIATE_MASK;
                if raw & constants::RRI_SIGN_MASK != 0 {
                    raw |= !constants::RRI_IMMEDIATE_MASK;
                }
                Instruction::rri(opcode, reg_a, reg_b, raw as i16)
            }
            Format::RI => Instruction::ri(opcode, reg_a, (word & constants::RI_IMMEDIATE_MASK) as i16),
        })
    }

    /// Decodes a big-endian byte pair; the first byte is the high byte.
    pub fn decode_bytes(bytes: [u8; 2]) -> Option<Instruction> {
        Instruction::decode(Endian::read_u16(&bytes))
    }

    /// True when `word` decodes to a well-formed instruction.
    pub fn is_valid(word: Word) -> bool {
        Instruction::decode(word).is_some()
    }
}

impl fmt::Display for Instruction {
    /// Renders canonical assembly text, e.g. `addi r1, r2, -1`.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.format() {
            Format::RRR => write!(
                f,
                "{} {}, {}, {}",
                self.opcode, self.reg_a, self.reg_b, self.reg_c
            ),
            Format::RRI if self.opcode == Opcode::JALR => {
                write!(f, "{} {}, {}", self.opcode, self.reg_a, self.reg_b)
            }
            Format::RRI => write!(
                f,
                "{} {}, {}, {}",
                self.opcode, self.reg_a, self.reg_b, self.immediate
            ),
            Format::RI => write!(f, "{} {}, {}", self.opcode, self.reg_a, self.immediate),
        }
    }
}

/// Constructs an RRR-format instruction from bare identifiers.
#[macro_export]
macro_rules! instr_rrr {
    ($opcode:ident, $ra:ident, $rb:ident, $rc:ident) => {
        $crate::Instruction::rrr(
            $crate::Opcode::$opcode,
            $crate::RegisterId::$ra,
            $crate::RegisterId::$rb,
            $crate::RegisterId::$rc,
        )
    };
}

/// Constructs an RRI-format instruction from bare identifiers.
#[macro_export]
macro_rules! instr_rri {
    ($opcode:ident, $ra:ident, $rb:ident, $imm:expr) => {
        $crate::Instruction::rri(
            $crate::Opcode::$opcode,
            $crate::RegisterId::$ra,
            $crate::RegisterId::$rb,
            $imm,
        )
    };
}

/// Constructs an RI-format instruction from bare identifiers.
#[macro_export]
macro_rules! instr_ri {
    ($opcode:ident, $ra:ident, $imm:expr) => {
        $crate::Instruction::ri($crate::Opcode::$opcode, $crate::RegisterId::$ra, $imm)
    };
}

/// `add r0, r0, r0`, the canonical no-op.
#[macro_export]
macro_rules! nop {
    () => {
        $crate::instr_rrr!(ADD, R0, R0, R0)
    };
}

/// `jalr r0, r0`, the halt idiom.
#[macro_export]
macro_rules! halt {
    () => {
        $crate::instr_rri!(JALR, R0, R0, 0)
    };
}
