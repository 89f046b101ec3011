use tracing::debug;

use crate::codegen::{Address, Backend, Operand};
use crate::error::{CompileError, CompileResult, ErrorKind};
use crate::lexer::{Token, TokenKind};
use crate::parser::ProcedureSegment;

use super::symbol_table::{is_global, SymbolKind, SymbolTable};

/// A procedure segment whose names have all been bound to storage.
#[derive(Debug)]
pub struct ResolvedProcedure {
    pub params: Vec<Address>,
    pub body: Vec<Token>,
    pub locals: SymbolTable,
}

/// Binds names to storage for one procedure, allocating on first sight.
///
/// Names starting with the global sigil live in `globals`; everything else
/// in a table that starts empty for each procedure. Allocation order is the
/// order names first appear, parameters first.
pub struct Resolver<'a, B: Backend> {
    globals: &'a mut SymbolTable,
    locals: SymbolTable,
    backend: &'a mut B,
}

impl<'a, B: Backend> Resolver<'a, B> {
    pub fn new(globals: &'a mut SymbolTable, backend: &'a mut B) -> Self {
        Self {
            globals,
            locals: SymbolTable::new(),
            backend,
        }
    }

    fn address_of(&mut self, name: &str) -> Address {
        let (table, kind) = if is_global(name) {
            (&mut *self.globals, SymbolKind::Global)
        } else {
            (&mut self.locals, SymbolKind::Local)
        };

        if let Some(address) = table.address(name) {
            return address;
        }
        let address = self.backend.allocate_variable(Some(name));
        table.declare(name, address, kind);
        debug!(name, address, ?kind, "allocated variable");
        address
    }

    /// Rewrite every variable name in `tokens` to an `Operand` token. Names
    /// directly followed by `(` are call heads and stay as they are.
    pub fn resolve_tokens(&mut self, tokens: &[Token]) -> CompileResult<Vec<Token>> {
        let mut out = Vec::with_capacity(tokens.len());
        let mut i = 0;

        while i < tokens.len() {
            let token = &tokens[i];
            let next = tokens.get(i + 1).map(|t| &t.kind);
            i += 1;

            let kind = match (&token.kind, next) {
                (TokenKind::Ident(_), Some(TokenKind::LeftParen)) => token.kind.clone(),
                (TokenKind::Ident(name), _) => {
                    TokenKind::Operand(Operand::Variable(self.address_of(name)))
                }
                (TokenKind::At, next) => {
                    let call_head =
                        tokens.get(i + 1).map(|t| &t.kind) == Some(&TokenKind::LeftParen);
                    i += 1;
                    match next {
                        Some(TokenKind::Ident(name)) if !call_head => {
                            TokenKind::Operand(Operand::Constant(self.address_of(name)))
                        }
                        Some(TokenKind::Num(address)) => {
                            TokenKind::Operand(Operand::Variable(*address))
                        }
                        _ => return Err(CompileError::new(ErrorKind::BadAddressOf, token.line)),
                    }
                }
                (kind, _) => kind.clone(),
            };
            out.push(Token::new(kind, token.line));
        }

        Ok(out)
    }

    pub fn resolve_procedure(
        mut self,
        segment: &ProcedureSegment,
    ) -> CompileResult<ResolvedProcedure> {
        let mut params = Vec::with_capacity(segment.params.len());
        for param in &segment.params {
            match &param.kind {
                TokenKind::Ident(name) => params.push(self.address_of(name)),
                _ => return Err(CompileError::new(ErrorKind::ParameterSyntax, param.line)),
            }
        }

        let body = self.resolve_tokens(&segment.body)?;
        Ok(ResolvedProcedure {
            params,
            body,
            locals: self.locals,
        })
    }
}
