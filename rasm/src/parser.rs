//! Pass 1: walks the expanded statements, defines labels, emits
//! instruction and data records and collects the symbolic references
//! pass 2 will patch.

use std::str::FromStr;

use matches::debug_assert_matches;

use rcpu::{constants, Format, Instruction, Opcode, RegisterId};
use rimg::{DataRecord, InstructionRecord};

use crate::error::{AssemblyError, ErrorKind};
use crate::expand::{Operand, Statement};
use crate::number::parse_number;
use crate::source_map::{SourceMap, SourceMapEntry};
use crate::symbols::SymbolTable;

/// How a symbolic reference must be patched in pass 2.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) enum ReferenceKind {
    /// `beq` target: PC-relative to the following instruction.
    Branch,
    /// `lw`/`sw` target: PC-relative to the instruction itself.
    LoadStore,
    /// Upper half of a label-valued `movi`.
    MoviUpper,
    /// Lower half of a label-valued `movi`.
    MoviLower,
    /// `.fill` with a label value: the absolute address.
    Fill,
}

/// A use of a label whose address was unknown at emission time.
/// Exactly one of the two indices is set: instruction references
/// patch an instruction immediate, fill references patch a data word.
#[derive(Clone, PartialEq, Eq, Debug)]
pub(crate) struct UnresolvedReference {
    pub kind: ReferenceKind,
    pub label: String,
    pub instruction_index: Option<usize>,
    pub data_index: Option<usize>,
    /// Address of the referencing word.
    pub pc: u16,
    pub line: u32,
    pub source: String,
}

/// Everything pass 1 accumulates. Handed to pass 2 and then broken
/// up into the assembly result.
pub(crate) struct Context {
    cursor: u32,
    pub symbols: SymbolTable,
    pub instructions: Vec<InstructionRecord>,
    pub data: Vec<DataRecord>,
    pub references: Vec<UnresolvedReference>,
    pub source_map: SourceMap,
}

impl Context {
    fn new() -> Context {
        Context {
            cursor: 0,
            symbols: SymbolTable::new(),
            instructions: Vec::new(),
            data: Vec::new(),
            references: Vec::new(),
            source_map: Vec::new(),
        }
    }

    /// Address the next emission will occupy, or an overflow error
    /// once the 16-bit address space is exhausted.
    fn address(&self, statement: &Statement) -> Result<u16, AssemblyError> {
        if self.cursor > u32::from(u16::MAX) {
            Err(AssemblyError::new(
                ErrorKind::MemoryOverflow,
                statement.line,
                "program exceeds the 65536-byte address space",
                &statement.source,
            ))
        } else {
            Ok(self.cursor as u16)
        }
    }

    fn emit_instruction(
        &mut self,
        statement: &Statement,
        instruction: Instruction,
    ) -> Result<usize, AssemblyError> {
        let address = self.address(statement)?;
        self.instructions.push(InstructionRecord {
            address,
            instruction,
        });
        self.source_map.push(SourceMapEntry {
            address,
            line: statement.line,
        });
        self.cursor += u32::from(constants::WORD_BYTES);
        Ok(self.instructions.len() - 1)
    }

    fn emit_data(&mut self, statement: &Statement, value: u16) -> Result<usize, AssemblyError> {
        let address = self.address(statement)?;
        self.data.push(DataRecord { address, value });
        self.source_map.push(SourceMapEntry {
            address,
            line: statement.line,
        });
        self.cursor += u32::from(constants::WORD_BYTES);
        Ok(self.data.len() - 1)
    }
}

fn register(statement: &Statement, operand: &Operand) -> Result<RegisterId, AssemblyError> {
    debug_assert_matches!(operand, Operand::Text(_));
    let text = operand.text().unwrap_or_default();
    RegisterId::from_str(text).map_err(|_| {
        AssemblyError::new(
            ErrorKind::InvalidRegister,
            statement.line,
            format!("`{}` is not a register (expected r0..r7)", text),
            &statement.source,
        )
    })
}

fn expect_operands(statement: &Statement, count: usize) -> Result<(), AssemblyError> {
    if statement.operands.len() == count {
        Ok(())
    } else {
        Err(AssemblyError::new(
            ErrorKind::SyntaxError,
            statement.line,
            format!(
                "`{}` expects {} operand{}, found {}",
                statement.operation,
                count,
                if count == 1 { "" } else { "s" },
                statement.operands.len()
            ),
            &statement.source,
        ))
    }
}

fn reference(
    kind: ReferenceKind,
    label: &str,
    statement: &Statement,
    pc: u16,
) -> UnresolvedReference {
    UnresolvedReference {
        kind,
        label: label.to_owned(),
        instruction_index: None,
        data_index: None,
        pc,
        line: statement.line,
        source: statement.source.clone(),
    }
}

/// Runs pass 1 over the whole program.
pub(crate) fn parse(statements: &[Statement]) -> Result<Context, AssemblyError> {
    let mut context = Context::new();

    for statement in statements {
        if let Some(name) = &statement.label {
            let address = context.address(statement)?;
            if let Err(previous) = context.symbols.define(name, address, statement.line) {
                return Err(AssemblyError::new(
                    ErrorKind::DuplicateLabel,
                    statement.line,
                    format!(
                        "label `{}` already defined at line {}",
                        name, previous.line
                    ),
                    &statement.source,
                ));
            }
        }

        if statement.operation.starts_with('.') {
            parse_directive(&mut context, statement)?;
        } else {
            parse_instruction(&mut context, statement)?;
        }
    }

    if context.instructions.is_empty() && context.data.is_empty() {
        return Err(AssemblyError::new(
            ErrorKind::EmptyProgram,
            0,
            "source contains no instructions or data",
            "",
        ));
    }

    Ok(context)
}

fn parse_directive(context: &mut Context, statement: &Statement) -> Result<(), AssemblyError> {
    match statement.operation.as_str() {
        ".fill" => {
            expect_operands(statement, 1)?;
            let operand = &statement.operands[0];
            debug_assert_matches!(operand, Operand::Text(_));
            let text = operand.text().unwrap_or_default();
            match parse_number(text) {
                Some(value) => {
                    context.emit_data(statement, (value & 0xFFFF) as u16)?;
                }
                None => {
                    // Label-valued fill: a zero placeholder patched in
                    // pass 2 with the absolute address.
                    let pc = context.address(statement)?;
                    let index = context.emit_data(statement, 0)?;
                    let mut unresolved = reference(ReferenceKind::Fill, text, statement, pc);
                    unresolved.data_index = Some(index);
                    context.references.push(unresolved);
                }
            }
        }
        ".space" => {
            expect_operands(statement, 1)?;
            let text = statement.operands[0].text().unwrap_or_default();
            let count = parse_number(text).filter(|n| *n > 0).ok_or_else(|| {
                AssemblyError::new(
                    ErrorKind::InvalidOperand,
                    statement.line,
                    format!("`.space` needs a positive count, found `{}`", text),
                    &statement.source,
                )
            })?;
            for _ in 0..count {
                context.emit_data(statement, 0)?;
            }
        }
        other => {
            return Err(AssemblyError::new(
                ErrorKind::InvalidDirective,
                statement.line,
                format!("unknown directive `{}`", other),
                &statement.source,
            ));
        }
    }
    Ok(())
}

fn parse_instruction(context: &mut Context, statement: &Statement) -> Result<(), AssemblyError> {
    let opcode = Opcode::from_str(&statement.operation).map_err(|_| {
        AssemblyError::new(
            ErrorKind::InvalidOpcode,
            statement.line,
            format!("unknown operation `{}`", statement.operation),
            &statement.source,
        )
    })?;

    match opcode.format() {
        Format::RRR => {
            expect_operands(statement, 3)?;
            let reg_a = register(statement, &statement.operands[0])?;
            let reg_b = register(statement, &statement.operands[1])?;
            let reg_c = register(statement, &statement.operands[2])?;
            context.emit_instruction(statement, Instruction::rrr(opcode, reg_a, reg_b, reg_c))?;
        }
        Format::RRI if opcode == Opcode::JALR => {
            expect_operands(statement, 2)?;
            let reg_a = register(statement, &statement.operands[0])?;
            let reg_b = register(statement, &statement.operands[1])?;
            context.emit_instruction(statement, Instruction::rri(opcode, reg_a, reg_b, 0))?;
        }
        Format::RRI => {
            expect_operands(statement, 3)?;
            let reg_a = register(statement, &statement.operands[0])?;
            let reg_b = register(statement, &statement.operands[1])?;
            match &statement.operands[2] {
                Operand::Text(text) => match parse_number(text) {
                    Some(value) => {
                        if !(constants::RRI_IMMEDIATE_MIN..=constants::RRI_IMMEDIATE_MAX)
                            .contains(&value)
                        {
                            return Err(AssemblyError::new(
                                ErrorKind::InvalidImmediate,
                                statement.line,
                                format!("immediate {} outside [-64, 63]", value),
                                &statement.source,
                            ));
                        }
                        context.emit_instruction(
                            statement,
                            Instruction::rri(opcode, reg_a, reg_b, value as i16),
                        )?;
                    }
                    None => {
                        let kind = match opcode {
                            Opcode::BEQ => ReferenceKind::Branch,
                            Opcode::LW | Opcode::SW => ReferenceKind::LoadStore,
                            _ => {
                                return Err(AssemblyError::new(
                                    ErrorKind::InvalidOperand,
                                    statement.line,
                                    format!(
                                        "`{}` takes a numeric immediate, not a label",
                                        statement.operation
                                    ),
                                    &statement.source,
                                ));
                            }
                        };
                        emit_rri_reference(context, statement, opcode, reg_a, reg_b, kind, text)?;
                    }
                },
                Operand::MoviLower(label) => {
                    emit_rri_reference(
                        context,
                        statement,
                        opcode,
                        reg_a,
                        reg_b,
                        ReferenceKind::MoviLower,
                        label,
                    )?;
                }
                Operand::MoviUpper(_) => unreachable!("movi upper half is always a lui"),
            }
        }
        Format::RI => {
            expect_operands(statement, 2)?;
            let reg_a = register(statement, &statement.operands[0])?;
            match &statement.operands[1] {
                Operand::Text(text) => match parse_number(text) {
                    Some(value) => {
                        if !(0..=constants::RI_IMMEDIATE_MAX).contains(&value) {
                            return Err(AssemblyError::new(
                                ErrorKind::InvalidImmediate,
                                statement.line,
                                format!("immediate {} outside [0, 1023]", value),
                                &statement.source,
                            ));
                        }
                        context.emit_instruction(
                            statement,
                            Instruction::ri(opcode, reg_a, value as i16),
                        )?;
                    }
                    None => {
                        return Err(AssemblyError::new(
                            ErrorKind::InvalidOperand,
                            statement.line,
                            format!("`{}` takes a numeric immediate, not a label", statement.operation),
                            &statement.source,
                        ));
                    }
                },
                Operand::MoviUpper(label) => {
                    let pc = context.address(statement)?;
                    let index =
                        context.emit_instruction(statement, Instruction::ri(opcode, reg_a, 0))?;
                    let mut unresolved =
                        reference(ReferenceKind::MoviUpper, label, statement, pc);
                    unresolved.instruction_index = Some(index);
                    context.references.push(unresolved);
                }
                Operand::MoviLower(_) => unreachable!("movi lower half is always an addi"),
            }
        }
    }
    Ok(())
}

fn emit_rri_reference(
    context: &mut Context,
    statement: &Statement,
    opcode: Opcode,
    reg_a: RegisterId,
    reg_b: RegisterId,
    kind: ReferenceKind,
    label: &str,
) -> Result<(), AssemblyError> {
    let pc = context.address(statement)?;
    let index = context.emit_instruction(statement, Instruction::rri(opcode, reg_a, reg_b, 0))?;
    let mut unresolved = reference(kind, label, statement, pc);
    unresolved.instruction_index = Some(index);
    context.references.push(unresolved);
    Ok(())
}
