//! A one-pass compiler for a small line-oriented high-level assembly
//! language: procedures with positional parameters, `if`/`while` blocks,
//! flat left-to-right expressions and string literals.
//!
//! The stages:
//! - `lexer` cleans lines, extracts string literals and tokenizes.
//! - `parser` splits the token stream at procedure headers.
//! - `analyzer` binds names to storage in local and global scopes.
//! - `codegen` lowers each body onto a [`codegen::Backend`].

pub mod analyzer;
pub mod codegen;
pub mod error;
pub mod lexer;
pub mod parser;

use tracing::{debug, info_span};

use analyzer::{Resolver, SymbolKind, SymbolTable};
use codegen::{Address, Backend, Codegen};
use lexer::{Lexer, StringLiteral};

pub use error::{CompileError, CompileResult, ErrorKind};

#[derive(Debug)]
pub struct Procedure {
    pub name: String,
    /// Line of the `defproc` header.
    pub line: usize,
    pub entry: Address,
    /// Storage each formal parameter is copied into on entry.
    pub params: Vec<Address>,
    /// The procedure's local scope, no longer used for lookups.
    pub locals: SymbolTable,
}

/// Everything one compilation bound.
#[derive(Debug, Default)]
pub struct Program {
    /// Global variables and procedures.
    pub globals: SymbolTable,
    pub procedures: Vec<Procedure>,
    pub literals: Vec<StringLiteral>,
}

impl Program {
    pub fn procedure(&self, name: &str) -> Option<&Procedure> {
        self.procedures.iter().find(|p| p.name == name)
    }
}

/// Compile `source`, emitting into `backend`.
///
/// Stops at the first error. Whatever was emitted before it should be
/// discarded.
pub fn compile<B: Backend>(source: &str, backend: &mut B) -> CompileResult<Program> {
    let lines: Vec<&str> = source.lines().collect();
    compile_lines(&lines, backend)
}

pub fn compile_lines<S: AsRef<str>, B: Backend>(
    lines: &[S],
    backend: &mut B,
) -> CompileResult<Program> {
    let preprocessed = lexer::preprocess(lines, backend)?;
    let tokens = Lexer::tokenize(&preprocessed.lines)?;
    let segments = parser::segment(tokens)?;

    let mut program = Program {
        literals: preprocessed.literals,
        ..Program::default()
    };

    for segment in &segments.procedures {
        let _span = info_span!("procedure", name = %segment.name).entered();

        if program.globals.get(&segment.name).is_some() {
            return Err(CompileError::new(
                ErrorKind::DuplicateProcedure(segment.name.clone()),
                segment.line,
            ));
        }

        let resolved = Resolver::new(&mut program.globals, backend).resolve_procedure(segment)?;

        let entry = backend.current_address();
        program
            .globals
            .declare(&segment.name, entry, SymbolKind::Procedure);
        debug!(entry, params = resolved.params.len(), "defined procedure");

        Codegen::new(&program.globals, backend).generate(&resolved, segment.line)?;

        program.procedures.push(Procedure {
            name: segment.name.clone(),
            line: segment.line,
            entry,
            params: resolved.params,
            locals: resolved.locals,
        });
    }

    Ok(program)
}
