//! Line clean-up ahead of tokenizing: comments, tabs and string literals.

use tracing::debug;

use crate::codegen::{Address, Backend};
use crate::error::{CompileError, CompileResult, ErrorKind};

const COMMENT: &str = "//";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StringLiteral {
    pub line: usize,
    pub text: String,
    pub address: Address,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Preprocessed {
    pub lines: Vec<String>,
    /// Extracted literals, in source order.
    pub literals: Vec<StringLiteral>,
}

/// Cut a line at its comment marker, ignoring markers inside quotes.
fn strip_comment(line: &str) -> &str {
    let mut in_quote = false;
    for (i, c) in line.char_indices() {
        if c == '"' {
            in_quote = !in_quote;
        } else if !in_quote && line[i..].starts_with(COMMENT) {
            return &line[..i];
        }
    }
    line
}

fn extract_literals<B: Backend>(
    line: &str,
    number: usize,
    backend: &mut B,
    literals: &mut Vec<StringLiteral>,
) -> CompileResult<String> {
    if line.matches('"').count() % 2 != 0 {
        return Err(CompileError::new(ErrorKind::ImbalancedQuotes, number));
    }

    let mut cleaned = String::with_capacity(line.len());
    for (i, part) in line.split('"').enumerate() {
        if i % 2 == 0 {
            cleaned.push_str(part);
            continue;
        }
        let address = backend.create_string_constant(part);
        debug!(line = number, text = part, address, "string constant");
        // Padded so the address never fuses with a neighbouring name.
        cleaned.push_str(&format!(" {} ", address));
        literals.push(StringLiteral {
            line: number,
            text: part.to_string(),
            address,
        });
    }
    Ok(cleaned.trim().to_string())
}

/// Strip comments and tab noise from each line and swap every quoted
/// literal for the address of a freshly created string constant.
///
/// Every literal occurrence gets its own constant, even when its text
/// repeats.
pub fn preprocess<S: AsRef<str>, B: Backend>(
    lines: &[S],
    backend: &mut B,
) -> CompileResult<Preprocessed> {
    let mut out = Preprocessed::default();

    for (i, line) in lines.iter().enumerate() {
        let line = strip_comment(line.as_ref()).replace('\t', " ");
        let line = line.trim();
        let line = if line.contains('"') {
            extract_literals(line, i + 1, backend, &mut out.literals)?
        } else {
            line.to_string()
        };
        out.lines.push(line);
    }

    Ok(out)
}
