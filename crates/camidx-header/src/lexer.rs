//! Tokenizer for the C declaration subset used by `camera_index.h`.
//!
//! The lexer works on raw bytes and records the byte span of every token, so
//! the block parser can point at the exact location of each length field and
//! of the byte-list body. Horizontal whitespace and `/* */` comments are
//! skipped; line breaks are significant and reported as [`TokenKind::Newline`].

use std::ops::Range;

/// Token types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind<'a> {
    /// C identifier or keyword.
    Ident(&'a [u8]),
    /// Integer literal (hex, octal or decimal), saturated at `u64::MAX`.
    Number(u64),
    /// Digits that do not form a valid integer literal.
    BadNumber(&'a [u8]),
    /// `//` comment body, without the slashes and line ending.
    LineComment(&'a [u8]),
    Hash,         // #
    LeftBracket,  // [
    RightBracket, // ]
    LeftBrace,    // {
    RightBrace,   // }
    Eq,           // =
    Comma,        // ,
    Semicolon,    // ;
    /// `\n` or `\r\n`.
    Newline,
    /// Any other byte.
    Other(u8),
    Eof,
}

/// A token and its byte span in the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind<'a>,
    pub start: usize,
    pub end: usize,
}

impl Token<'_> {
    /// Byte span of the token.
    pub fn span(&self) -> Range<usize> {
        self.start..self.end
    }
}

/// Byte-oriented lexer.
#[derive(Debug, Clone)]
pub struct Lexer<'a> {
    input: &'a [u8],
    pos: usize,
}

impl<'a> Lexer<'a> {
    /// Create a lexer at the start of `input`.
    pub const fn new(input: &'a [u8]) -> Self {
        Self { input, pos: 0 }
    }

    /// Create a lexer starting at a specific offset.
    pub const fn new_at(input: &'a [u8], pos: usize) -> Self {
        Self { input, pos }
    }

    /// Current offset in the input.
    pub const fn position(&self) -> usize {
        self.pos
    }

    #[inline]
    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    #[inline]
    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.input.get(self.pos + offset).copied()
    }

    /// Skip spaces, tabs, form feeds, lone carriage returns and block comments.
    fn skip_trivia(&mut self) {
        loop {
            match self.peek() {
                Some(b' ' | b'\t' | 0x0C) => self.pos += 1,
                Some(b'\r') if self.peek_at(1) != Some(b'\n') => self.pos += 1,
                Some(b'/') if self.peek_at(1) == Some(b'*') => {
                    let body = &self.input[self.pos + 2..];
                    self.pos = match memchr::memmem::find(body, b"*/") {
                        Some(end) => self.pos + 2 + end + 2,
                        None => self.input.len(),
                    };
                }
                _ => break,
            }
        }
    }

    /// Get the next token.
    pub fn next_token(&mut self) -> Token<'a> {
        self.skip_trivia();

        let start = self.pos;
        let Some(c) = self.peek() else {
            return Token { kind: TokenKind::Eof, start, end: start };
        };

        let kind = match c {
            b'\n' => {
                self.pos += 1;
                TokenKind::Newline
            }
            b'\r' => {
                // Lone `\r` is trivia, so this is always `\r\n`.
                self.pos += 2;
                TokenKind::Newline
            }
            b'/' if self.peek_at(1) == Some(b'/') => {
                let rest = &self.input[start..];
                let line_end = memchr::memchr(b'\n', rest).map_or(self.input.len(), |i| start + i);
                let body_end = if line_end > start && self.input[line_end - 1] == b'\r' {
                    line_end - 1
                } else {
                    line_end
                };
                self.pos = body_end;
                TokenKind::LineComment(&self.input[start + 2..body_end])
            }
            b'#' => self.single(TokenKind::Hash),
            b'[' => self.single(TokenKind::LeftBracket),
            b']' => self.single(TokenKind::RightBracket),
            b'{' => self.single(TokenKind::LeftBrace),
            b'}' => self.single(TokenKind::RightBrace),
            b'=' => self.single(TokenKind::Eq),
            b',' => self.single(TokenKind::Comma),
            b';' => self.single(TokenKind::Semicolon),
            b'0'..=b'9' => self.number(),
            c if is_ident_start(c) => {
                while self.peek().is_some_and(is_ident_continue) {
                    self.pos += 1;
                }
                TokenKind::Ident(&self.input[start..self.pos])
            }
            other => self.single(TokenKind::Other(other)),
        };

        Token { kind, start, end: self.pos }
    }

    #[inline]
    fn single(&mut self, kind: TokenKind<'a>) -> TokenKind<'a> {
        self.pos += 1;
        kind
    }

    fn number(&mut self) -> TokenKind<'a> {
        let start = self.pos;
        while self.peek().is_some_and(is_ident_continue) {
            self.pos += 1;
        }
        let text = &self.input[start..self.pos];

        // Integer suffixes carry no meaning for byte values.
        let digits_end = text
            .iter()
            .rposition(|b| !matches!(b, b'u' | b'U' | b'l' | b'L'))
            .map_or(0, |i| i + 1);
        let digits = &text[..digits_end];

        let value = match digits {
            [b'0', b'x' | b'X', hex @ ..] => parse_radix(hex, 16),
            [b'0', octal @ ..] if !octal.is_empty() => parse_radix(octal, 8),
            _ => parse_radix(digits, 10),
        };

        match value {
            Some(v) => TokenKind::Number(v),
            None => TokenKind::BadNumber(text),
        }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let token = self.next_token();
        (token.kind != TokenKind::Eof).then_some(token)
    }
}

#[inline]
fn is_ident_start(c: u8) -> bool {
    c.is_ascii_alphabetic() || c == b'_'
}

#[inline]
fn is_ident_continue(c: u8) -> bool {
    c.is_ascii_alphanumeric() || c == b'_'
}

fn parse_radix(digits: &[u8], radix: u32) -> Option<u64> {
    if digits.is_empty() {
        return None;
    }
    let mut value: u64 = 0;
    for &b in digits {
        let d = (b as char).to_digit(radix)?;
        value = value.saturating_mul(radix as u64).saturating_add(d as u64);
    }
    Some(value)
}
