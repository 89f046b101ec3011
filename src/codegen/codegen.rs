use tracing::{trace, warn};

use crate::{
    analyzer::{ResolvedProcedure, SymbolTable},
    error::{CompileError, CompileResult, ErrorKind},
    lexer::{Token, TokenKind},
};

use super::{
    call::compile_call,
    expr::compile_expression,
    structure::{failure_condition, ControlStack},
    Backend,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Guard {
    If,
    While,
}

/// Compiles one procedure body, command by command, in a single pass.
pub struct Codegen<'a, B: Backend> {
    backend: &'a mut B,
    globals: &'a SymbolTable,
    frames: ControlStack,
    tokens: &'a [Token],
    index: usize,
    line: usize,
}

impl<'a, B: Backend> Codegen<'a, B> {
    pub fn new(globals: &'a SymbolTable, backend: &'a mut B) -> Self {
        Self {
            backend,
            globals,
            frames: ControlStack::new(),
            tokens: &[],
            index: 0,
            line: 0,
        }
    }

    fn error(&self, kind: ErrorKind) -> CompileError {
        CompileError::new(kind, self.line)
    }

    fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.index)
    }

    fn advance(&mut self) -> Option<&'a Token> {
        let token = self.tokens.get(self.index)?;
        self.index += 1;
        self.line = token.line;
        Some(token)
    }

    /// Tokens up to the next `)` on the current line, consuming the `)`.
    fn until_close_paren(&mut self, error: ErrorKind) -> CompileResult<&'a [Token]> {
        let tokens = self.tokens;
        let start = self.index;
        loop {
            match self.advance().map(|t| &t.kind) {
                Some(TokenKind::RightParen) => return Ok(&tokens[start..self.index - 1]),
                Some(TokenKind::Newline) | None => return Err(self.error(error)),
                Some(_) => (),
            }
        }
    }

    /// Emits the parameter copies, then the body.
    pub fn generate(&mut self, procedure: &'a ResolvedProcedure, line: usize) -> CompileResult<()> {
        self.tokens = &procedure.body;
        self.index = 0;
        self.line = line;
        self.frames = ControlStack::new();

        for (register, &address) in procedure.params.iter().enumerate() {
            self.backend.store_parameter_register(register, address);
        }

        let mut returned = false;
        while let Some(token) = self.peek() {
            if token.kind.is_separator() {
                self.advance();
                continue;
            }
            self.line = token.line;
            trace!(line = self.line, token = %token.kind, "command");
            if token.kind == TokenKind::EndProc {
                returned = true;
            }
            self.gen_command()?;
        }

        if !self.frames.is_balanced() {
            return Err(self.error(ErrorKind::UnclosedStructure));
        }
        if !returned {
            warn!(line, "procedure has no endproc");
        }
        Ok(())
    }

    fn gen_command(&mut self) -> CompileResult<()> {
        let Some(token) = self.peek() else {
            return Ok(());
        };

        match &token.kind {
            TokenKind::If => self.gen_guard(Guard::If),
            TokenKind::While => self.gen_guard(Guard::While),
            TokenKind::EndIf => {
                self.advance();
                self.frames
                    .close_if(self.backend)
                    .map_err(|kind| self.error(kind))
            }
            TokenKind::EndWhile => {
                self.advance();
                self.frames
                    .close_while(self.backend)
                    .map_err(|kind| self.error(kind))
            }
            TokenKind::EndProc => {
                self.advance();
                self.backend.return_from_procedure();
                Ok(())
            }
            TokenKind::Ident(name) => {
                self.advance();
                if self.advance().map(|t| &t.kind) != Some(&TokenKind::LeftParen) {
                    return Err(self.error(ErrorKind::CallSyntax));
                }
                let line = self.line;
                let args = self.until_close_paren(ErrorKind::CallSyntax)?;
                compile_call(name, args, line, self.globals, self.backend)
            }
            TokenKind::DefProc => Err(self.error(ErrorKind::HeaderSyntax)),
            _ => self.gen_expression_command(),
        }
    }

    /// `if(<expr><cmp>0)` or `while(<expr><cmp>0)`.
    fn gen_guard(&mut self, guard: Guard) -> CompileResult<()> {
        self.advance();
        if self.advance().map(|t| &t.kind) != Some(&TokenKind::LeftParen) {
            return Err(self.error(ErrorKind::StructureSyntax));
        }
        let inner = self.until_close_paren(ErrorKind::StructureSyntax)?;

        let (expr, comparison) = match inner {
            [expr @ .., cmp, zero] => match (&cmp.kind, &zero.kind) {
                (TokenKind::Compare(comparison), TokenKind::Num(0)) => (expr, *comparison),
                _ => return Err(self.error(ErrorKind::StructureSyntax)),
            },
            _ => return Err(self.error(ErrorKind::StructureSyntax)),
        };
        let test = failure_condition(comparison);

        let loop_top = self.backend.current_address();
        compile_expression(expr, self.line, self.backend)?;
        match guard {
            Guard::If => self.frames.open_if(test, self.backend),
            Guard::While => self.frames.open_while(test, loop_top, self.backend),
        }
        Ok(())
    }

    /// An expression runs up to a separator, a keyword, or a call head.
    fn gen_expression_command(&mut self) -> CompileResult<()> {
        let tokens = self.tokens;
        let start = self.index;
        while let Some(token) = self.peek() {
            if token.kind.is_separator()
                || token.kind.is_keyword()
                || matches!(token.kind, TokenKind::Ident(_))
            {
                break;
            }
            self.advance();
        }
        compile_expression(&tokens[start..self.index], self.line, self.backend)
    }
}
