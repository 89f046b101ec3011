//! Splits the token stream at `defproc` headers.

use crate::analyzer::is_global;
use crate::error::{CompileError, CompileResult, ErrorKind};
use crate::lexer::{Token, TokenKind};

/// One `defproc` header and the body that follows it, up to the next header
/// or the end of input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProcedureSegment {
    pub name: String,
    pub line: usize,
    /// Formal parameters, all `Ident` tokens.
    pub params: Vec<Token>,
    pub body: Vec<Token>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Segments {
    /// Everything before the first header. Only separators are allowed here.
    pub preamble: Vec<Token>,
    pub procedures: Vec<ProcedureSegment>,
}

fn parse_params(tokens: &[Token], line: usize) -> CompileResult<Vec<Token>> {
    let mut params = vec![];
    let mut expect_ident = true;

    for token in tokens {
        match (&token.kind, expect_ident) {
            (TokenKind::Ident(_), true) => params.push(token.clone()),
            (TokenKind::Comma, false) => (),
            _ => return Err(CompileError::new(ErrorKind::ParameterSyntax, token.line)),
        }
        expect_ident = !expect_ident;
    }
    // a trailing comma
    if expect_ident && !params.is_empty() {
        return Err(CompileError::new(ErrorKind::ParameterSyntax, line));
    }
    Ok(params)
}

/// `chunk` starts at a `defproc` token.
fn split_header(chunk: &[Token]) -> CompileResult<ProcedureSegment> {
    let line = chunk[0].line;
    let header_error = |kind| CompileError::new(kind, line);

    let name = match chunk.get(1).map(|t| &t.kind) {
        Some(TokenKind::Ident(name)) if !is_global(name) => name.clone(),
        _ => return Err(header_error(ErrorKind::HeaderSyntax)),
    };
    if chunk.get(2).map(|t| &t.kind) != Some(&TokenKind::LeftParen) {
        return Err(header_error(ErrorKind::HeaderSyntax));
    }

    let close = chunk[3..]
        .iter()
        .take_while(|t| t.kind != TokenKind::Newline)
        .position(|t| t.kind == TokenKind::RightParen)
        .map(|i| i + 3)
        .ok_or_else(|| header_error(ErrorKind::ParameterSyntax))?;

    Ok(ProcedureSegment {
        name,
        line,
        params: parse_params(&chunk[3..close], line)?,
        body: chunk[close + 1..].to_vec(),
    })
}

pub fn segment(tokens: Vec<Token>) -> CompileResult<Segments> {
    let starts: Vec<usize> = tokens
        .iter()
        .enumerate()
        .filter(|(_, t)| t.kind == TokenKind::DefProc)
        .map(|(i, _)| i)
        .collect();

    let preamble_end = starts.first().copied().unwrap_or(tokens.len());
    let preamble = tokens[..preamble_end].to_vec();
    if let Some(stray) = preamble.iter().find(|t| !t.kind.is_separator()) {
        return Err(CompileError::new(ErrorKind::CodeOutsideProcedure, stray.line));
    }

    let mut procedures = vec![];
    for (n, &start) in starts.iter().enumerate() {
        let end = starts.get(n + 1).copied().unwrap_or(tokens.len());
        procedures.push(split_header(&tokens[start..end])?);
    }

    Ok(Segments {
        preamble,
        procedures,
    })
}
