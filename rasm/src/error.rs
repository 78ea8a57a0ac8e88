use std::error::Error as StdError;
use std::fmt;

/// Stable classification of assembly failures.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ErrorKind {
    SyntaxError,
    InvalidOpcode,
    InvalidOperand,
    InvalidRegister,
    InvalidImmediate,
    UndefinedLabel,
    DuplicateLabel,
    LabelSyntaxError,
    OutOfRange,
    InvalidDirective,
    MemoryOverflow,
    EmptyProgram,
}

impl ErrorKind {
    pub fn name(self) -> &'static str {
        match self {
            ErrorKind::SyntaxError => "SYNTAX_ERROR",
            ErrorKind::InvalidOpcode => "INVALID_OPCODE",
            ErrorKind::InvalidOperand => "INVALID_OPERAND",
            ErrorKind::InvalidRegister => "INVALID_REGISTER",
            ErrorKind::InvalidImmediate => "INVALID_IMMEDIATE",
            ErrorKind::UndefinedLabel => "UNDEFINED_LABEL",
            ErrorKind::DuplicateLabel => "DUPLICATE_LABEL",
            ErrorKind::LabelSyntaxError => "LABEL_SYNTAX_ERROR",
            ErrorKind::OutOfRange => "OUT_OF_RANGE",
            ErrorKind::InvalidDirective => "INVALID_DIRECTIVE",
            ErrorKind::MemoryOverflow => "MEMORY_OVERFLOW",
            ErrorKind::EmptyProgram => "EMPTY_PROGRAM",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A diagnostic from either assembler pass.
///
/// Carries everything needed to show the failure to a user: the
/// 1-based source line, the column when one is known, the original
/// line text and a message. `line` 0 means the diagnostic concerns
/// the program as a whole.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct AssemblyError {
    pub kind: ErrorKind,
    pub line: u32,
    pub column: Option<u32>,
    pub message: String,
    pub source_line: String,
}

impl AssemblyError {
    pub fn new(
        kind: ErrorKind,
        line: u32,
        message: impl Into<String>,
        source_line: impl Into<String>,
    ) -> AssemblyError {
        AssemblyError {
            kind,
            line,
            column: None,
            message: message.into(),
            source_line: source_line.into(),
        }
    }

    #[must_use]
    pub fn with_column(mut self, column: u32) -> AssemblyError {
        self.column = Some(column);
        self
    }

    /// Single-line form, e.g.
    /// `line 4: DUPLICATE_LABEL: label "loop" already defined at line 2`.
    pub fn compact(&self) -> String {
        if self.line == 0 {
            format!("{}: {}", self.kind, self.message)
        } else {
            format!("line {}: {}: {}", self.line, self.kind, self.message)
        }
    }

    /// Multi-line form quoting the source line, with a caret under
    /// the offending column when it is known.
    pub fn detailed(&self) -> String {
        let mut text = self.compact();
        if !self.source_line.is_empty() {
            text.push_str("\n  | ");
            text.push_str(&self.source_line);
            if let Some(column) = self.column {
                text.push_str("\n  | ");
                for _ in 1..column {
                    text.push(' ');
                }
                text.push('^');
            }
        }
        text
    }
}

impl fmt::Display for AssemblyError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.compact())
    }
}

impl StdError for AssemblyError {}

/// A non-fatal diagnostic; assembly still succeeds.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Warning {
    pub line: u32,
    pub message: String,
    pub source_line: String,
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "line {}: warning: {}", self.line, self.message)
    }
}
