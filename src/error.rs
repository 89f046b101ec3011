//! Errors raised while compiling.
//!
//! Compilation stops at the first error, so every failure is a single
//! `CompileError` carrying the source line it was detected on.

use thiserror::Error;

pub type CompileResult<T> = Result<T, CompileError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    // lexical
    #[error("imbalanced quotes")]
    ImbalancedQuotes,

    #[error("unrecognized character '{0}'")]
    UnrecognizedCharacter(char),

    #[error("number out of range: {0}")]
    NumberOutOfRange(String),

    #[error("expected a name or an address after '@'")]
    BadAddressOf,

    // structural
    #[error("procedure header syntax")]
    HeaderSyntax,

    #[error("parameter syntax")]
    ParameterSyntax,

    #[error("code outside procedure")]
    CodeOutsideProcedure,

    #[error("structure syntax")]
    StructureSyntax,

    #[error("unclosed structure")]
    UnclosedStructure,

    #[error("mismatched close: {0} outside any structure")]
    MismatchedClose(&'static str),

    #[error("endif without if")]
    EndIfWithoutIf,

    #[error("endwhile without while")]
    EndWhileWithoutWhile,

    // semantic
    #[error("duplicate procedure {0}")]
    DuplicateProcedure(String),

    #[error("unknown procedure {0}")]
    UnknownProcedure(String),

    #[error("call syntax")]
    CallSyntax,

    #[error("bad parameter {0}")]
    BadArgument(String),

    // expression
    #[error("unrecognized token {0}")]
    UnrecognizedToken(String),

    #[error("missing operand")]
    MissingOperand,

    #[error("missing operator before {0}")]
    MissingOperator(String),

    #[error("empty expression")]
    EmptyExpression,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("line {line}: {kind}")]
pub struct CompileError {
    pub line: usize,
    pub kind: ErrorKind,
}

impl CompileError {
    pub fn new(kind: ErrorKind, line: usize) -> Self {
        Self { line, kind }
    }
}
