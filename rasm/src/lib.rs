//! Two-pass assembler for the [rcpu](../rcpu/index.html) RiSC-16
//! processor.
//!
//! The main entry points are [`assemble`], which always returns an
//! [`Assembly`] result carrying either the assembled lists or a
//! single diagnostic, and [`try_assemble`], which returns the typed
//! error directly. [`Assembly::to_program`] converts a successful
//! result into an [`rimg::Program`] ready for loading into memory.
//!
//! # Assembly Language
//!
//! The source is line-oriented. A comment starts with a hash symbol
//! `#` and runs to the end of the line. A line may carry a label,
//! separated from its statement by a colon; the statement is
//! mandatory. Operands are separated by commas and/or whitespace.
//!
//! ```text
//!         movi r1, table      # r1 = address of table
//! loop:   lw   r2, r1, 0
//!         beq  r2, r0, done
//!         addi r1, r1, 2
//!         beq  r0, r0, loop
//! done:   halt
//! table:  .fill 21
//!         .fill 0x15
//!         .fill 0
//! ```
//!
//! ## Numbers
//!
//! Integer literals are decimal (optionally negative), hexadecimal
//! with a `0x` prefix, or octal with a leading `0`. A lone `0` is
//! decimal zero.
//!
//! ## Instructions
//!
//! Mnemonics and register names are case-insensitive; labels are
//! case-sensitive.
//!
//! Mnemonic | Format | Syntax               | Effect
//! ---------|--------|----------------------|--------------------------------
//! `add`    | RRR    | `add rA, rB, rC`     | `rA = rB + rC`
//! `addi`   | RRI    | `addi rA, rB, imm`   | `rA = rB + imm`, imm in [-64, 63]
//! `nand`   | RRR    | `nand rA, rB, rC`    | `rA = ~(rB & rC)`
//! `lui`    | RI     | `lui rA, imm`        | `rA = imm << 6`, imm in [0, 1023]
//! `sw`     | RRI    | `sw rA, rB, imm`     | `MEM[rB + imm] = rA`
//! `lw`     | RRI    | `lw rA, rB, imm`     | `rA = MEM[rB + imm]`
//! `beq`    | RRI    | `beq rA, rB, target` | branch when `rA == rB`
//! `jalr`   | RRI    | `jalr rA, rB`        | `rA = PC + 2; PC = rB`
//!
//! `beq` accepts a numeric offset or a label; `lw`/`sw` likewise
//! accept a label, resolved PC-relative. Offsets must fit the signed
//! 7-bit immediate.
//!
//! ## Pseudo-instructions
//!
//! Mnemonic | Expansion
//! ---------|--------------------------------------------------
//! `nop`    | `add r0, r0, r0`
//! `halt`   | `jalr r0, r0`
//! `lli rA, imm`  | `addi rA, rA, imm & 0x3F` (warns when bits are lost)
//! `movi rA, value-or-label` | `lui` upper 10 bits, then `addi` low 6 bits
//!
//! ## Directives
//!
//! Directive | Effect
//! ----------|--------------------------------------------------
//! `.fill v` | one word holding the number `v` (or a label's address)
//! `.space n`| `n` zero words, `n` positive
//!
//! ## Errors
//!
//! Assembly is fail-fast: the first problem aborts and is reported
//! with its line, the offending source text and a stable kind (see
//! [`ErrorKind`]). A successful result carries no errors and any
//! number of warnings.

mod error;
mod expand;
mod number;
mod parser;
mod resolve;
mod source_map;
mod symbols;
mod token;

pub use error::{AssemblyError, ErrorKind, Warning};
pub use expand::{Operand, Statement};
pub use number::parse_number;
pub use source_map::{SourceMap, SourceMapEntry};
pub use symbols::{Symbol, SymbolTable};
pub use token::{tokenize, Token};

use rimg::{DataRecord, InstructionRecord, Program};

/// Result surface of one assembly.
///
/// `errors` holds at most one entry: assembly stops at the first
/// problem. On failure the emission lists are empty.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Assembly {
    pub instructions: Vec<InstructionRecord>,
    pub data: Vec<DataRecord>,
    pub symbols: SymbolTable,
    pub source_map: SourceMap,
    pub errors: Vec<AssemblyError>,
    pub warnings: Vec<Warning>,
}

impl Assembly {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    /// Packs a successful assembly into a loadable program image with
    /// entry point 0.
    pub fn to_program(&self) -> Program {
        Program::new(
            self.instructions.clone(),
            self.data.clone(),
            self.symbols.to_pairs(),
            0,
        )
    }
}

/// Assembles `source`, reporting failure through the result's error
/// list. A panic out of the pipeline (a bug, not bad input) is
/// converted into an internal SYNTAX_ERROR instead of unwinding into
/// the caller.
pub fn assemble(source: &str) -> Assembly {
    let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| try_assemble(source)))
        .unwrap_or_else(|_| {
            Err(AssemblyError::new(
                ErrorKind::SyntaxError,
                0,
                "internal assembler error",
                "",
            ))
        });

    match outcome {
        Ok(assembly) => assembly,
        Err(error) => Assembly {
            instructions: Vec::new(),
            data: Vec::new(),
            symbols: SymbolTable::new(),
            source_map: Vec::new(),
            errors: vec![error],
            warnings: Vec::new(),
        },
    }
}

/// Assembles `source`, returning the first diagnostic as a typed
/// error.
pub fn try_assemble(source: &str) -> Result<Assembly, AssemblyError> {
    let tokens = token::tokenize(source)?;
    let mut warnings = Vec::new();
    let statements = expand::expand(tokens, &mut warnings)?;
    let mut context = parser::parse(&statements)?;
    resolve::resolve(&mut context)?;

    Ok(Assembly {
        instructions: context.instructions,
        data: context.data,
        symbols: context.symbols,
        source_map: context.source_map,
        errors: Vec::new(),
        warnings,
    })
}
