use crate::error::{AssemblyError, ErrorKind, Warning};
use crate::number::parse_number;
use crate::token::Token;

use rcpu::constants;

/// An operand after pseudo-instruction expansion.
///
/// Plain text covers registers, numbers and labels; the parser
/// decides which. The two `Movi*` shapes mark the halves of a
/// label-valued `movi` so the parser can record the right unresolved
/// reference without any string matching.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Operand {
    Text(String),
    MoviUpper(String),
    MoviLower(String),
}

impl Operand {
    pub fn text(&self) -> Option<&str> {
        match self {
            Operand::Text(text) => Some(text),
            _ => None,
        }
    }
}

/// A token whose pseudo-instructions have been rewritten into real
/// ones.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Statement {
    pub line: u32,
    pub label: Option<String>,
    pub operation: String,
    pub operands: Vec<Operand>,
    pub source: String,
}

fn texts(operands: &[String]) -> Vec<Operand> {
    operands.iter().cloned().map(Operand::Text).collect()
}

fn expect_operands(token: &Token, count: usize) -> Result<(), AssemblyError> {
    if token.operands.len() == count {
        Ok(())
    } else {
        Err(AssemblyError::new(
            ErrorKind::SyntaxError,
            token.line,
            format!(
                "`{}` expects {} operand{}, found {}",
                token.operation,
                count,
                if count == 1 { "" } else { "s" },
                token.operands.len()
            ),
            &token.source,
        ))
    }
}

fn statement(token: &Token, label: Option<String>, operation: &str, operands: Vec<Operand>) -> Statement {
    Statement {
        line: token.line,
        label,
        operation: operation.to_owned(),
        operands,
        source: token.source.clone(),
    }
}

/// Rewrites `nop`, `halt`, `lli` and `movi` into real instruction
/// statements; everything else passes through unchanged.
///
/// When an expansion yields two instructions, only the first carries
/// the original label.
pub fn expand(tokens: Vec<Token>, warnings: &mut Vec<Warning>) -> Result<Vec<Statement>, AssemblyError> {
    let mut statements = Vec::new();

    for token in tokens {
        let label = token.label.clone();
        match token.operation.as_str() {
            "nop" => {
                expect_operands(&token, 0)?;
                statements.push(statement(&token, label, "add", texts(&["r0".into(), "r0".into(), "r0".into()])));
            }
            "halt" => {
                expect_operands(&token, 0)?;
                statements.push(statement(&token, label, "jalr", texts(&["r0".into(), "r0".into()])));
            }
            "lli" => {
                expect_operands(&token, 2)?;
                let register = token.operands[0].clone();
                let immediate = parse_number(&token.operands[1]).ok_or_else(|| {
                    AssemblyError::new(
                        ErrorKind::InvalidImmediate,
                        token.line,
                        format!("`lli` needs a numeric immediate, found `{}`", token.operands[1]),
                        &token.source,
                    )
                })?;
                let masked = immediate & constants::LOW_BITS_MASK;
                if masked != immediate {
                    warnings.push(Warning {
                        line: token.line,
                        message: format!(
                            "`lli` keeps only the low 6 bits: {} becomes {}",
                            immediate, masked
                        ),
                        source_line: token.source.clone(),
                    });
                }
                statements.push(statement(
                    &token,
                    label,
                    "addi",
                    vec![
                        Operand::Text(register.clone()),
                        Operand::Text(register),
                        Operand::Text(masked.to_string()),
                    ],
                ));
            }
            "movi" => {
                expect_operands(&token, 2)?;
                let register = token.operands[0].clone();
                let value = &token.operands[1];
                match parse_number(value) {
                    Some(immediate) => {
                        if !(0..=constants::MOVI_IMMEDIATE_MAX).contains(&immediate) {
                            return Err(AssemblyError::new(
                                ErrorKind::InvalidImmediate,
                                token.line,
                                format!("`movi` immediate {} outside [0, 65535]", immediate),
                                &token.source,
                            ));
                        }
                        statements.push(statement(
                            &token,
                            label,
                            "lui",
                            vec![
                                Operand::Text(register.clone()),
                                Operand::Text((immediate >> constants::UPPER_SHIFT).to_string()),
                            ],
                        ));
                        statements.push(statement(
                            &token,
                            None,
                            "addi",
                            vec![
                                Operand::Text(register.clone()),
                                Operand::Text(register),
                                Operand::Text((immediate & constants::LOW_BITS_MASK).to_string()),
                            ],
                        ));
                    }
                    None => {
                        statements.push(statement(
                            &token,
                            label,
                            "lui",
                            vec![
                                Operand::Text(register.clone()),
                                Operand::MoviUpper(value.clone()),
                            ],
                        ));
                        statements.push(statement(
                            &token,
                            None,
                            "addi",
                            vec![
                                Operand::Text(register.clone()),
                                Operand::Text(register),
                                Operand::MoviLower(value.clone()),
                            ],
                        ));
                    }
                }
            }
            other => {
                let operands = texts(&token.operands);
                statements.push(statement(&token, label, other, operands));
            }
        }
    }

    Ok(statements)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::tokenize;

    fn expand_source(source: &str) -> (Vec<Statement>, Vec<Warning>) {
        let mut warnings = Vec::new();
        let statements = expand(tokenize(source).unwrap(), &mut warnings).unwrap();
        (statements, warnings)
    }

    fn text_operands(statement: &Statement) -> Vec<&str> {
        statement
            .operands
            .iter()
            .map(|operand| operand.text().unwrap())
            .collect()
    }

    #[test]
    fn nop_becomes_add() {
        let (statements, _) = expand_source("nop");
        assert_eq!(statements[0].operation, "add");
        assert_eq!(text_operands(&statements[0]), ["r0", "r0", "r0"]);
    }

    #[test]
    fn halt_becomes_jalr() {
        let (statements, _) = expand_source("halt");
        assert_eq!(statements[0].operation, "jalr");
        assert_eq!(text_operands(&statements[0]), ["r0", "r0"]);
    }

    #[test]
    fn lli_masks_to_six_bits() {
        let (statements, warnings) = expand_source("lli r1, 65");
        assert_eq!(statements[0].operation, "addi");
        assert_eq!(text_operands(&statements[0]), ["r1", "r1", "1"]);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].line, 1);
    }

    #[test]
    fn lli_in_range_is_silent() {
        let (statements, warnings) = expand_source("lli r1, 63");
        assert_eq!(text_operands(&statements[0]), ["r1", "r1", "63"]);
        assert!(warnings.is_empty());
    }

    #[test]
    fn lli_rejects_labels() {
        let mut warnings = Vec::new();
        let error = expand(tokenize("lli r1, loop").unwrap(), &mut warnings).unwrap_err();
        assert_eq!(error.kind, ErrorKind::InvalidImmediate);
    }

    #[test]
    fn numeric_movi_splits_into_lui_and_addi() {
        let (statements, _) = expand_source("movi r1, 1000");
        assert_eq!(statements.len(), 2);
        assert_eq!(statements[0].operation, "lui");
        assert_eq!(text_operands(&statements[0]), ["r1", "15"]);
        assert_eq!(statements[1].operation, "addi");
        assert_eq!(text_operands(&statements[1]), ["r1", "r1", "40"]);
    }

    #[test]
    fn movi_range_is_checked() {
        let mut warnings = Vec::new();
        let error = expand(tokenize("movi r1, 65536").unwrap(), &mut warnings).unwrap_err();
        assert_eq!(error.kind, ErrorKind::InvalidImmediate);
        let error = expand(tokenize("movi r1, -1").unwrap(), &mut Vec::new()).unwrap_err();
        assert_eq!(error.kind, ErrorKind::InvalidImmediate);
    }

    #[test]
    fn label_movi_uses_sentinel_operands() {
        let (statements, _) = expand_source("movi r1, table");
        assert_eq!(
            statements[0].operands[1],
            Operand::MoviUpper("table".to_owned())
        );
        assert_eq!(
            statements[1].operands[2],
            Operand::MoviLower("table".to_owned())
        );
    }

    #[test]
    fn label_sticks_to_the_first_expanded_instruction() {
        let (statements, _) = expand_source("start: movi r1, 1000");
        assert_eq!(statements[0].label.as_deref(), Some("start"));
        assert_eq!(statements[1].label, None);
    }

    #[test]
    fn operand_count_is_enforced() {
        let error = expand(tokenize("nop r1").unwrap(), &mut Vec::new()).unwrap_err();
        assert_eq!(error.kind, ErrorKind::SyntaxError);
        let error = expand(tokenize("movi r1").unwrap(), &mut Vec::new()).unwrap_err();
        assert_eq!(error.kind, ErrorKind::SyntaxError);
    }

    #[test]
    fn real_instructions_pass_through() {
        let (statements, _) = expand_source("loop: beq r1, r2, done");
        assert_eq!(statements[0].operation, "beq");
        assert_eq!(statements[0].label.as_deref(), Some("loop"));
        assert_eq!(text_operands(&statements[0]), ["r1", "r2", "done"]);
    }
}
