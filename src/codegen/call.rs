//! Procedure calls: `name(arg0,arg1,...)`.
//!
//! Arguments are staged in parameter registers by position. The callee's
//! formal parameter count is not checked against the arguments.

use crate::analyzer::SymbolTable;
use crate::error::{CompileError, CompileResult, ErrorKind};
use crate::lexer::{Token, TokenKind};

use super::{Backend, Operand};

fn argument(group: &[Token]) -> Option<Operand> {
    match group {
        [token] => match token.kind {
            TokenKind::Num(n) => Some(Operand::Constant(n)),
            TokenKind::Operand(operand) => Some(operand),
            _ => None,
        },
        _ => None,
    }
}

fn describe(group: &[Token]) -> String {
    group.iter().map(|t| t.kind.to_string()).collect()
}

/// `args` is everything between the call's parentheses.
pub fn compile_call<B: Backend>(
    name: &str,
    args: &[Token],
    line: usize,
    globals: &SymbolTable,
    backend: &mut B,
) -> CompileResult<()> {
    let target = globals
        .procedure(name)
        .ok_or_else(|| CompileError::new(ErrorKind::UnknownProcedure(name.to_string()), line))?;

    if !args.is_empty() {
        let groups: Vec<&[Token]> = args.split(|t| t.kind == TokenKind::Comma).collect();
        for (register, group) in groups.into_iter().enumerate() {
            let operand = argument(group).ok_or_else(|| {
                CompileError::new(ErrorKind::BadArgument(describe(group)), line)
            })?;
            backend.load_parameter_register(register, operand);
        }
    }

    backend.call(target);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::SymbolKind;
    use crate::codegen::{Op, RecordingBackend};

    fn globals() -> SymbolTable {
        let mut table = SymbolTable::new();
        table.declare("demo", 0x2000, SymbolKind::Procedure);
        table.declare("$v", 0x3000, SymbolKind::Global);
        table
    }

    fn args(kinds: Vec<TokenKind>) -> Vec<Token> {
        kinds.into_iter().map(|k| Token::new(k, 1)).collect()
    }

    #[test]
    fn positional_arguments_then_call() {
        let mut backend = RecordingBackend::default();
        let tokens = args(vec![
            TokenKind::Num(1),
            TokenKind::Comma,
            TokenKind::Operand(Operand::Variable(0x40)),
        ]);
        compile_call("demo", &tokens, 1, &globals(), &mut backend).unwrap();

        assert_eq!(
            backend.ops(),
            vec![
                &Op::LoadParameter {
                    register: 0,
                    operand: Operand::Constant(1)
                },
                &Op::LoadParameter {
                    register: 1,
                    operand: Operand::Variable(0x40)
                },
                &Op::Call(0x2000),
            ]
        );
    }

    #[test]
    fn no_arguments() {
        let mut backend = RecordingBackend::default();
        compile_call("demo", &[], 1, &globals(), &mut backend).unwrap();
        assert_eq!(backend.ops(), vec![&Op::Call(0x2000)]);
    }

    #[test]
    fn unknown_target() {
        let mut backend = RecordingBackend::default();
        for name in ["nope", "$v"] {
            let err = compile_call(name, &[], 4, &globals(), &mut backend).unwrap_err();
            assert_eq!(
                err,
                CompileError::new(ErrorKind::UnknownProcedure(name.to_string()), 4)
            );
        }
    }

    #[test]
    fn malformed_arguments() {
        let mut backend = RecordingBackend::default();
        let expression = args(vec![
            TokenKind::Num(1),
            TokenKind::Operator(crate::codegen::BinaryOp::Add),
            TokenKind::Num(2),
        ]);
        let err = compile_call("demo", &expression, 1, &globals(), &mut backend).unwrap_err();
        assert_eq!(err.kind, ErrorKind::BadArgument("1+2".to_string()));

        let empty = args(vec![TokenKind::Num(1), TokenKind::Comma]);
        let err = compile_call("demo", &empty, 1, &globals(), &mut backend).unwrap_err();
        assert_eq!(err.kind, ErrorKind::BadArgument(String::new()));
    }
}
