use std::fmt;

use phf::phf_map;

use crate::codegen::{BinaryOp, Operand};

pub static KEYWORDS: phf::Map<&'static str, TokenKind> = phf_map! {
    "if" => TokenKind::If,
    "endif" => TokenKind::EndIf,
    "while" => TokenKind::While,
    "endwhile" => TokenKind::EndWhile,
    "defproc" => TokenKind::DefProc,
    "endproc" => TokenKind::EndProc,
};

pub static SYMBOLS: phf::Map<char, TokenKind> = phf_map! {
    '+' => TokenKind::Operator(BinaryOp::Add),
    '-' => TokenKind::Operator(BinaryOp::Sub),
    '*' => TokenKind::Operator(BinaryOp::Mul),
    '/' => TokenKind::Operator(BinaryOp::Div),
    '%' => TokenKind::Operator(BinaryOp::Mod),
    '&' => TokenKind::Operator(BinaryOp::And),
    '|' => TokenKind::Operator(BinaryOp::Or),
    '^' => TokenKind::Operator(BinaryOp::Xor),
    '>' => TokenKind::Operator(BinaryOp::Store),
    '!' => TokenKind::Operator(BinaryOp::WordIndex),
    '?' => TokenKind::Operator(BinaryOp::ByteIndex),
    '#' => TokenKind::Compare(Comparison::NotEqual),
    '=' => TokenKind::Compare(Comparison::Equal),
    '<' => TokenKind::Compare(Comparison::Less),
    '@' => TokenKind::At,
    '(' => TokenKind::LeftParen,
    ')' => TokenKind::RightParen,
    ',' => TokenKind::Comma,
    ':' => TokenKind::Colon,
};

/// Guard comparison against zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Comparison {
    NotEqual,
    Equal,
    Less,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TokenKind {
    Ident(String),
    Num(u32),
    /// A name already bound to storage by the resolver.
    Operand(Operand),

    Operator(BinaryOp),
    Compare(Comparison),
    At,
    LeftParen,
    RightParen,
    Comma,
    Colon,
    Newline,

    If,
    EndIf,
    While,
    EndWhile,
    DefProc,
    EndProc,
}

impl TokenKind {
    pub fn is_keyword(&self) -> bool {
        matches!(
            self,
            TokenKind::If
                | TokenKind::EndIf
                | TokenKind::While
                | TokenKind::EndWhile
                | TokenKind::DefProc
                | TokenKind::EndProc
        )
    }

    /// Statement separators: `:` and line boundaries.
    pub fn is_separator(&self) -> bool {
        matches!(self, TokenKind::Colon | TokenKind::Newline)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Ident(name) => write!(f, "{}", name),
            TokenKind::Num(n) => write!(f, "{}", n),
            TokenKind::Operand(Operand::Constant(v)) => write!(f, "{}", v),
            TokenKind::Operand(Operand::Variable(a)) => write!(f, "@{}", a),
            TokenKind::Operator(op) => write!(f, "{}", op),
            TokenKind::Compare(Comparison::NotEqual) => write!(f, "#"),
            TokenKind::Compare(Comparison::Equal) => write!(f, "="),
            TokenKind::Compare(Comparison::Less) => write!(f, "<"),
            TokenKind::At => write!(f, "@"),
            TokenKind::LeftParen => write!(f, "("),
            TokenKind::RightParen => write!(f, ")"),
            TokenKind::Comma => write!(f, ","),
            TokenKind::Colon => write!(f, ":"),
            TokenKind::Newline => write!(f, "end of line"),
            TokenKind::If => write!(f, "if"),
            TokenKind::EndIf => write!(f, "endif"),
            TokenKind::While => write!(f, "while"),
            TokenKind::EndWhile => write!(f, "endwhile"),
            TokenKind::DefProc => write!(f, "defproc"),
            TokenKind::EndProc => write!(f, "endproc"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    /// 1-based source line.
    pub line: usize,
}

impl Token {
    pub fn new(kind: TokenKind, line: usize) -> Self {
        Self { kind, line }
    }
}
