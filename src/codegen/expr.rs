//! Flat expressions: operands and binary operators, consumed strictly left
//! to right against the accumulator. There is no precedence and no grouping.

use crate::error::{CompileError, CompileResult, ErrorKind};
use crate::lexer::{Token, TokenKind};

use super::{Backend, BinaryOp, Operand};

fn operand(kind: &TokenKind) -> Option<Operand> {
    match kind {
        TokenKind::Num(n) => Some(Operand::Constant(*n)),
        TokenKind::Operand(operand) => Some(*operand),
        _ => None,
    }
}

/// The first operand is loaded; each following operator and operand pair
/// combines with the accumulator. An expression may also open with an
/// operator, in which case it continues from whatever the accumulator holds.
pub fn compile_expression<B: Backend>(
    tokens: &[Token],
    line: usize,
    backend: &mut B,
) -> CompileResult<()> {
    if tokens.is_empty() {
        return Err(CompileError::new(ErrorKind::EmptyExpression, line));
    }

    let mut pending: Option<BinaryOp> = None;
    let mut loaded = false;

    for token in tokens {
        let error = |kind| CompileError::new(kind, token.line);

        if let Some(value) = operand(&token.kind) {
            match pending.take() {
                Some(op) => backend.binary_operation(op, value),
                None if loaded => {
                    return Err(error(ErrorKind::MissingOperator(token.kind.to_string())))
                }
                None => backend.load(value),
            }
            loaded = true;
        } else if let TokenKind::Operator(op) = token.kind {
            if pending.is_some() {
                return Err(error(ErrorKind::MissingOperand));
            }
            pending = Some(op);
            loaded = true;
        } else {
            return Err(error(ErrorKind::UnrecognizedToken(token.kind.to_string())));
        }
    }

    if pending.is_some() {
        return Err(CompileError::new(ErrorKind::MissingOperand, line));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::{Op, RecordingBackend};

    fn tokens(kinds: Vec<TokenKind>) -> Vec<Token> {
        kinds.into_iter().map(|k| Token::new(k, 3)).collect()
    }

    fn var(address: u32) -> TokenKind {
        TokenKind::Operand(Operand::Variable(address))
    }

    fn op(op: BinaryOp) -> TokenKind {
        TokenKind::Operator(op)
    }

    fn compile(kinds: Vec<TokenKind>) -> CompileResult<Vec<Op>> {
        let mut backend = RecordingBackend::default();
        compile_expression(&tokens(kinds), 3, &mut backend)?;
        Ok(backend.ops().into_iter().cloned().collect())
    }

    #[test]
    fn left_to_right() {
        let ops = compile(vec![
            var(0x40),
            op(BinaryOp::Add),
            TokenKind::Num(2),
            op(BinaryOp::Mul),
            var(0x42),
            op(BinaryOp::Store),
            TokenKind::Operand(Operand::Constant(0x44)),
        ])
        .unwrap();

        assert_eq!(
            ops,
            vec![
                Op::Load(Operand::Variable(0x40)),
                Op::Binary(BinaryOp::Add, Operand::Constant(2)),
                Op::Binary(BinaryOp::Mul, Operand::Variable(0x42)),
                Op::Binary(BinaryOp::Store, Operand::Constant(0x44)),
            ]
        );
    }

    #[test]
    fn leading_operator_continues_the_accumulator() {
        let ops = compile(vec![op(BinaryOp::Sub), TokenKind::Num(1)]).unwrap();
        assert_eq!(ops, vec![Op::Binary(BinaryOp::Sub, Operand::Constant(1))]);
    }

    #[test]
    fn adjacent_operands_fail() {
        let err = compile(vec![var(0x40), TokenKind::Num(7)]).unwrap_err();
        assert_eq!(err, CompileError::new(ErrorKind::MissingOperator("7".into()), 3));
    }

    #[test]
    fn operand_after_leading_operator_pair_still_needs_an_operator() {
        let err = compile(vec![op(BinaryOp::Add), TokenKind::Num(1), TokenKind::Num(2)]);
        assert!(matches!(
            err.unwrap_err().kind,
            ErrorKind::MissingOperator(_)
        ));
    }

    #[test]
    fn dangling_operators() {
        assert_eq!(
            compile(vec![var(0x40), op(BinaryOp::Add)]).unwrap_err().kind,
            ErrorKind::MissingOperand
        );
        assert_eq!(
            compile(vec![var(0x40), op(BinaryOp::Add), op(BinaryOp::Sub), TokenKind::Num(1)])
                .unwrap_err()
                .kind,
            ErrorKind::MissingOperand
        );
    }

    #[test]
    fn unrecognized() {
        let err = compile(vec![var(0x40), TokenKind::LeftParen]).unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnrecognizedToken("(".to_string()));
    }

    #[test]
    fn empty() {
        assert_eq!(compile(vec![]).unwrap_err().kind, ErrorKind::EmptyExpression);
    }
}
