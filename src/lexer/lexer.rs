use crate::error::{CompileError, CompileResult, ErrorKind};

use super::token::{Token, TokenKind, KEYWORDS, SYMBOLS};

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '$'
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '.'
}

#[derive(Debug)]
pub struct Lexer {
    tokens: Vec<Token>,
    index: usize,
    line: usize,
}

impl Lexer {
    fn new() -> Self {
        Self {
            tokens: vec![],
            index: 0,
            line: 1,
        }
    }

    fn new_token(&mut self, kind: TokenKind, len: usize) {
        self.tokens.push(Token::new(kind, self.line));
        self.index += len;
    }

    fn error(&self, kind: ErrorKind) -> CompileError {
        CompileError::new(kind, self.line)
    }

    fn parse_number(&mut self, chars: &[char]) -> CompileResult<()> {
        let s: String = chars.iter().take_while(|c| c.is_ascii_digit()).collect();
        let value = s
            .parse()
            .map_err(|_| self.error(ErrorKind::NumberOutOfRange(s.clone())))?;
        self.new_token(TokenKind::Num(value), s.len());
        Ok(())
    }

    fn parse_identifier(&mut self, chars: &[char]) {
        let s: String = chars[..1]
            .iter()
            .chain(chars[1..].iter().take_while(|&&c| is_ident_char(c)))
            .collect();

        let len = s.len();
        if let Some(kind) = KEYWORDS.get(s.as_str()) {
            self.new_token(kind.clone(), len);
        } else {
            self.new_token(TokenKind::Ident(s), len);
        }
    }

    fn tokenize_line(&mut self, line: &str) -> CompileResult<()> {
        let chars: Vec<_> = line.to_ascii_lowercase().chars().collect();
        self.index = 0;

        while self.index < chars.len() {
            let c = chars[self.index];

            if c.is_whitespace() {
                self.index += 1;
            } else if c.is_ascii_digit() {
                self.parse_number(&chars[self.index..])?;
            } else if is_ident_start(c) {
                self.parse_identifier(&chars[self.index..]);
            } else if let Some(kind) = SYMBOLS.get(&c) {
                self.new_token(kind.clone(), 1);
            } else {
                return Err(self.error(ErrorKind::UnrecognizedCharacter(c)));
            }
        }
        Ok(())
    }

    /// Tokenize cleaned source lines into one stream, with a `Newline`
    /// token at every line boundary.
    pub fn tokenize<S: AsRef<str>>(lines: &[S]) -> CompileResult<Vec<Token>> {
        let mut lexer = Lexer::new();

        for (i, line) in lines.iter().enumerate() {
            lexer.line = i + 1;
            if i > 0 {
                lexer.tokens.push(Token::new(TokenKind::Newline, i));
            }
            lexer.tokenize_line(line.as_ref())?;
        }

        Ok(lexer.tokens)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::BinaryOp;
    use crate::lexer::Comparison;

    fn kinds(src: &[&str]) -> Vec<TokenKind> {
        Lexer::tokenize(src)
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn header_and_keywords() {
        assert_eq!(
            kinds(&["DefProc Demo(p1,$g.2)", "endproc"]),
            vec![
                TokenKind::DefProc,
                TokenKind::Ident("demo".to_string()),
                TokenKind::LeftParen,
                TokenKind::Ident("p1".to_string()),
                TokenKind::Comma,
                TokenKind::Ident("$g.2".to_string()),
                TokenKind::RightParen,
                TokenKind::Newline,
                TokenKind::EndProc,
            ]
        );
    }

    #[test]
    fn guard() {
        assert_eq!(
            kinds(&["while(x<0)"]),
            vec![
                TokenKind::While,
                TokenKind::LeftParen,
                TokenKind::Ident("x".to_string()),
                TokenKind::Compare(Comparison::Less),
                TokenKind::Num(0),
                TokenKind::RightParen,
            ]
        );
    }

    #[test]
    fn operators() {
        assert_eq!(
            kinds(&["a!2>@b"]),
            vec![
                TokenKind::Ident("a".to_string()),
                TokenKind::Operator(BinaryOp::WordIndex),
                TokenKind::Num(2),
                TokenKind::Operator(BinaryOp::Store),
                TokenKind::At,
                TokenKind::Ident("b".to_string()),
            ]
        );
    }

    #[test]
    fn keyword_prefix_is_an_identifier() {
        assert_eq!(kinds(&["iffy"]), vec![TokenKind::Ident("iffy".to_string())]);
    }

    #[test]
    fn tokens_carry_lines() {
        let tokens = Lexer::tokenize(&["", "x", "", "y"]).unwrap();
        let x = tokens.iter().find(|t| t.kind == TokenKind::Ident("x".into()));
        let y = tokens.iter().find(|t| t.kind == TokenKind::Ident("y".into()));
        assert_eq!(x.map(|t| t.line), Some(2));
        assert_eq!(y.map(|t| t.line), Some(4));
    }

    #[test]
    fn bad_character() {
        let err = Lexer::tokenize(&["x+1", "y{"]).unwrap_err();
        assert_eq!(err, CompileError::new(ErrorKind::UnrecognizedCharacter('{'), 2));
    }

    #[test]
    fn number_too_large() {
        let err = Lexer::tokenize(&["99999999999"]).unwrap_err();
        assert!(matches!(err.kind, ErrorKind::NumberOutOfRange(_)));
    }
}
