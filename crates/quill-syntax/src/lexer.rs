//! Lossless lexer: every byte of the input belongs to exactly one token, trivia included.

use quill_core::{TextRange, TextRangeExt};

use crate::SyntaxKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: SyntaxKind,
    pub range: TextRange,
}

impl Token {
    #[inline]
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        self.range.slice(source)
    }
}

pub fn lex(input: &str) -> Vec<Token> {
    Lexer::new(input).collect()
}

pub struct Lexer<'a> {
    input: &'a str,
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            bytes: input.as_bytes(),
            pos: 0,
        }
    }

    fn peek(&self, n: usize) -> Option<u8> {
        self.bytes.get(self.pos + n).copied()
    }

    fn next_token(&mut self) -> Option<Token> {
        let start = self.pos;
        let b = self.peek(0)?;
        let kind = match b {
            b' ' | b'\t' | b'\n' | b'\r' | b'\x0c' => {
                while matches!(self.peek(0), Some(b' ' | b'\t' | b'\n' | b'\r' | b'\x0c')) {
                    self.pos += 1;
                }
                SyntaxKind::Whitespace
            }
            b'/' if self.peek(1) == Some(b'/') => {
                while let Some(c) = self.peek(0) {
                    if c == b'\n' || c == b'\r' {
                        break;
                    }
                    self.pos += 1;
                }
                SyntaxKind::LineComment
            }
            b'/' if self.peek(1) == Some(b'*') => {
                // `/**/` is an empty block comment, not a doc comment.
                let is_doc = self.peek(2) == Some(b'*') && self.peek(3) != Some(b'/');
                self.pos += 2;
                loop {
                    match self.peek(0) {
                        None => break,
                        Some(b'*') if self.peek(1) == Some(b'/') => {
                            self.pos += 2;
                            break;
                        }
                        Some(_) => self.pos += 1,
                    }
                }
                if is_doc {
                    SyntaxKind::DocComment
                } else {
                    SyntaxKind::BlockComment
                }
            }
            b'"' if self.peek(1) == Some(b'"') && self.peek(2) == Some(b'"') => {
                self.pos += 3;
                loop {
                    match self.peek(0) {
                        None => break,
                        Some(b'\\') => self.pos += 2,
                        Some(b'"') if self.peek(1) == Some(b'"') && self.peek(2) == Some(b'"') => {
                            self.pos += 3;
                            break;
                        }
                        Some(_) => self.pos += 1,
                    }
                }
                SyntaxKind::TextBlock
            }
            b'"' | b'\'' => {
                let quote = b;
                self.pos += 1;
                loop {
                    match self.peek(0) {
                        None | Some(b'\n') => break,
                        Some(b'\\') => self.pos += 2,
                        Some(c) if c == quote => {
                            self.pos += 1;
                            break;
                        }
                        Some(_) => self.pos += 1,
                    }
                }
                if quote == b'"' {
                    SyntaxKind::StringLiteral
                } else {
                    SyntaxKind::CharLiteral
                }
            }
            b'0'..=b'9' => self.number(),
            b'.' if matches!(self.peek(1), Some(b'0'..=b'9')) => self.number(),
            c if c == b'_'
                || c == b'$'
                || c.is_ascii_alphabetic()
                || (c >= 0x80
                    && self.input[self.pos..]
                        .chars()
                        .next()
                        .is_some_and(char::is_alphabetic)) =>
            {
                self.ident_rest();
                let text = &self.input[start..self.pos];
                SyntaxKind::keyword(text).unwrap_or(SyntaxKind::Ident)
            }
            _ => self.punct(),
        };
        self.pos = self.pos.min(self.bytes.len());
        Some(Token {
            kind,
            range: TextRange::from_offsets(start, self.pos),
        })
    }

    fn ident_rest(&mut self) {
        while self.pos < self.bytes.len() {
            let rest = &self.input[self.pos..];
            let Some(ch) = rest.chars().next() else {
                break;
            };
            if ch == '_' || ch == '$' || ch.is_alphanumeric() {
                self.pos += ch.len_utf8();
            } else {
                break;
            }
        }
    }

    fn number(&mut self) -> SyntaxKind {
        let mut is_float = false;
        if self.peek(0) == Some(b'0') && matches!(self.peek(1), Some(b'x' | b'X' | b'b' | b'B')) {
            self.pos += 2;
            while matches!(self.peek(0), Some(c) if c.is_ascii_hexdigit() || c == b'_') {
                self.pos += 1;
            }
        } else {
            while matches!(self.peek(0), Some(c) if c.is_ascii_digit() || c == b'_') {
                self.pos += 1;
            }
            if self.peek(0) == Some(b'.') && matches!(self.peek(1), Some(b'0'..=b'9')) {
                is_float = true;
                self.pos += 1;
                while matches!(self.peek(0), Some(c) if c.is_ascii_digit() || c == b'_') {
                    self.pos += 1;
                }
            } else if self.peek(0) == Some(b'.')
                && !matches!(self.peek(1), Some(c) if c.is_ascii_alphabetic() || c == b'.')
            {
                // `1.` is a double literal; `1.foo` is not.
                is_float = true;
                self.pos += 1;
            }
            if matches!(self.peek(0), Some(b'e' | b'E')) {
                is_float = true;
                self.pos += 1;
                if matches!(self.peek(0), Some(b'+' | b'-')) {
                    self.pos += 1;
                }
                while matches!(self.peek(0), Some(c) if c.is_ascii_digit()) {
                    self.pos += 1;
                }
            }
        }
        match self.peek(0) {
            Some(b'l' | b'L') => {
                self.pos += 1;
                SyntaxKind::LongLiteral
            }
            Some(b'f' | b'F') => {
                self.pos += 1;
                SyntaxKind::FloatLiteral
            }
            Some(b'd' | b'D') => {
                self.pos += 1;
                SyntaxKind::DoubleLiteral
            }
            _ if is_float => SyntaxKind::DoubleLiteral,
            _ => SyntaxKind::IntLiteral,
        }
    }

    fn punct(&mut self) -> SyntaxKind {
        use SyntaxKind::*;

        let three = [self.peek(0), self.peek(1), self.peek(2)];
        let (kind, len) = match three {
            [Some(b'.'), Some(b'.'), Some(b'.')] => (Ellipsis, 3),
            [Some(b'<'), Some(b'<'), Some(b'=')] => (LeftShiftEq, 3),
            [Some(b':'), Some(b':'), _] => (ColonColon, 2),
            [Some(b'-'), Some(b'>'), _] => (Arrow, 2),
            [Some(b'='), Some(b'='), _] => (EqEq, 2),
            [Some(b'!'), Some(b'='), _] => (BangEq, 2),
            [Some(b'<'), Some(b'='), _] => (LessEq, 2),
            [Some(b'>'), Some(b'='), _] => (GreaterEq, 2),
            [Some(b'<'), Some(b'<'), _] => (LeftShift, 2),
            [Some(b'&'), Some(b'&'), _] => (AmpAmp, 2),
            [Some(b'|'), Some(b'|'), _] => (PipePipe, 2),
            [Some(b'+'), Some(b'+'), _] => (PlusPlus, 2),
            [Some(b'-'), Some(b'-'), _] => (MinusMinus, 2),
            [Some(b'+'), Some(b'='), _] => (PlusEq, 2),
            [Some(b'-'), Some(b'='), _] => (MinusEq, 2),
            [Some(b'*'), Some(b'='), _] => (StarEq, 2),
            [Some(b'/'), Some(b'='), _] => (SlashEq, 2),
            [Some(b'%'), Some(b'='), _] => (PercentEq, 2),
            [Some(b'&'), Some(b'='), _] => (AmpEq, 2),
            [Some(b'|'), Some(b'='), _] => (PipeEq, 2),
            [Some(b'^'), Some(b'='), _] => (CaretEq, 2),
            [Some(b'('), ..] => (LParen, 1),
            [Some(b')'), ..] => (RParen, 1),
            [Some(b'{'), ..] => (LBrace, 1),
            [Some(b'}'), ..] => (RBrace, 1),
            [Some(b'['), ..] => (LBracket, 1),
            [Some(b']'), ..] => (RBracket, 1),
            [Some(b';'), ..] => (Semicolon, 1),
            [Some(b','), ..] => (Comma, 1),
            [Some(b'.'), ..] => (Dot, 1),
            [Some(b'@'), ..] => (At, 1),
            [Some(b':'), ..] => (Colon, 1),
            [Some(b'?'), ..] => (Question, 1),
            [Some(b'='), ..] => (Eq, 1),
            [Some(b'!'), ..] => (Bang, 1),
            [Some(b'<'), ..] => (Less, 1),
            [Some(b'>'), ..] => (Greater, 1),
            [Some(b'&'), ..] => (Amp, 1),
            [Some(b'|'), ..] => (Pipe, 1),
            [Some(b'^'), ..] => (Caret, 1),
            [Some(b'+'), ..] => (Plus, 1),
            [Some(b'-'), ..] => (Minus, 1),
            [Some(b'*'), ..] => (Star, 1),
            [Some(b'/'), ..] => (Slash, 1),
            [Some(b'%'), ..] => (Percent, 1),
            [Some(b'~'), ..] => (Tilde, 1),
            _ => {
                // Unknown character: consume one full UTF-8 scalar.
                let len = self.input[self.pos..]
                    .chars()
                    .next()
                    .map_or(1, char::len_utf8);
                (Error, len)
            }
        };
        self.pos += len;
        kind
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        self.next_token()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<SyntaxKind> {
        lex(input)
            .into_iter()
            .filter(|t| !t.kind.is_trivia())
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn lexing_is_lossless() {
        let input = "class A { /** doc */ int x = 1_000L; // tail\n String s = \"a\\\"b\"; }";
        let tokens = lex(input);
        let rebuilt: String = tokens.iter().map(|t| t.text(input)).collect();
        assert_eq!(rebuilt, input);
        assert!(tokens.iter().any(|t| t.kind == SyntaxKind::DocComment));
        assert!(tokens.iter().any(|t| t.kind == SyntaxKind::LongLiteral));
    }

    #[test]
    fn greater_than_is_never_merged() {
        assert_eq!(
            kinds("List<List<String>> x"),
            vec![
                SyntaxKind::Ident,
                SyntaxKind::Less,
                SyntaxKind::Ident,
                SyntaxKind::Less,
                SyntaxKind::Ident,
                SyntaxKind::Greater,
                SyntaxKind::Greater,
                SyntaxKind::Ident,
            ]
        );
    }

    #[test]
    fn empty_block_comment_is_not_doc() {
        assert_eq!(lex("/**/")[0].kind, SyntaxKind::BlockComment);
        assert_eq!(lex("/** x */")[0].kind, SyntaxKind::DocComment);
    }
}
