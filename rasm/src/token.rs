use crate::error::{AssemblyError, ErrorKind};

/// One source line reduced to its parts. The operation is
/// lower-cased; the label and operands keep their original spelling
/// (labels are case-sensitive).
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Token {
    /// 1-based line number in the original source.
    pub line: u32,
    pub label: Option<String>,
    pub operation: String,
    pub operands: Vec<String>,
    /// The unmodified source line, kept for diagnostics.
    pub source: String,
}

fn is_label_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '.' || c == '_'
}

/// Splits source text into tokens, line by line.
///
/// Comments run from `#` to the end of the line; blank lines vanish.
/// A label is everything before the first `:` and must be followed by
/// a statement on the same line. Operands are separated by commas
/// and/or whitespace. Stops at the first malformed line.
pub fn tokenize(source: &str) -> Result<Vec<Token>, AssemblyError> {
    let mut tokens = Vec::new();

    for (index, raw) in source.lines().enumerate() {
        let line = index as u32 + 1;
        let code = match raw.find('#') {
            Some(at) => &raw[..at],
            None => raw,
        };
        let trimmed = code.trim();
        if trimmed.is_empty() {
            continue;
        }
        // Column arithmetic is done on `code`, whose indices match
        // the original line.
        let offset = code.len() - code.trim_start().len();

        let (label, statement) = match trimmed.find(':') {
            Some(colon) => {
                let label = &trimmed[..colon];
                if label.is_empty() || !label.chars().all(is_label_char) {
                    let bad = label
                        .chars()
                        .position(|c| !is_label_char(c))
                        .unwrap_or(0);
                    return Err(AssemblyError::new(
                        ErrorKind::LabelSyntaxError,
                        line,
                        format!("`{}` is not a valid label", label),
                        raw,
                    )
                    .with_column((offset + bad + 1) as u32));
                }
                let statement = trimmed[colon + 1..].trim_start();
                if statement.is_empty() {
                    return Err(AssemblyError::new(
                        ErrorKind::SyntaxError,
                        line,
                        "label must be followed by an instruction or directive",
                        raw,
                    )
                    .with_column((offset + colon + 1) as u32));
                }
                (Some(label.to_owned()), statement)
            }
            None => (None, trimmed),
        };

        let (operation, rest) = match statement.find(char::is_whitespace) {
            Some(at) => (&statement[..at], &statement[at..]),
            None => (statement, ""),
        };
        let operands = rest
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|piece| !piece.is_empty())
            .map(str::to_owned)
            .collect();

        tokens.push(Token {
            line,
            label,
            operation: operation.to_lowercase(),
            operands,
            source: raw.to_owned(),
        });
    }

    Ok(tokens)
}
