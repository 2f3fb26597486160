//! Header document scanning.
//!
//! A header holds zero or more array blocks, each introduced by a marker
//! comment at the start of a line:
//!
//! ```text
//! //File: index_ov2640.html.gz, Size: 6787
//! #define index_ov2640_html_gz_len 6787
//! const unsigned char index_ov2640_html_gz[] = {
//!   0x1F, 0x8B, 0x08, 0x00, ...
//! };
//! ```
//!
//! Everything else in the document is opaque and is never interpreted.

use std::ops::Range;

use memchr::memmem;

use crate::block::{ArrayBlock, BlockIssue};
use crate::lexer::{Lexer, Token, TokenKind};
use crate::CameraModel;

/// Marker that opens every block.
pub const MARKER: &[u8] = b"//File:";

const FILE_PREFIX: &[u8] = b"index_";
const FILE_SUFFIX: &[u8] = b".html.gz";
const SIZE_LABEL: &[u8] = b"Size:";

/// Line terminator convention of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineEnding {
    #[default]
    Lf,
    CrLf,
}

impl LineEnding {
    /// Pick `\r\n` if the document uses it anywhere, `\n` otherwise.
    pub fn detect(data: &[u8]) -> Self {
        if memmem::find(data, b"\r\n").is_some() {
            LineEnding::CrLf
        } else {
            LineEnding::Lf
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::CrLf => "\r\n",
        }
    }
}

/// A parsed header document.
///
/// Borrows the raw header bytes; blocks own their decoded payloads.
#[derive(Debug, Clone)]
pub struct HeaderDocument<'a> {
    data: &'a [u8],
    blocks: Vec<ArrayBlock>,
    issues: Vec<BlockIssue>,
    unrecognized: Vec<String>,
    line_ending: LineEnding,
}

impl<'a> HeaderDocument<'a> {
    /// Scan a header for array blocks.
    ///
    /// Scanning never fails as a whole: blocks that do not follow the grammar
    /// are collected as [`BlockIssue`]s and scanning resumes at the next
    /// marker. Only the first block of each model is kept. Markers inside a
    /// `/* */` comment are ignored.
    pub fn parse(data: &'a [u8]) -> Self {
        let mut blocks: Vec<ArrayBlock> = Vec::new();
        let mut issues = Vec::new();
        let mut unrecognized = Vec::new();
        let mut comments = CommentTracker::default();
        let mut resume = 0;

        for pos in memmem::find_iter(data, MARKER) {
            if pos < resume || !at_line_start(data, pos) {
                continue;
            }
            if comments.in_block_comment(data, pos) {
                continue;
            }

            let marker = match Marker::parse(data, pos) {
                MarkerScan::NotBlock => continue,
                MarkerScan::Unrecognized(name) => {
                    unrecognized.push(name);
                    continue;
                }
                MarkerScan::Block(Err(issue)) => {
                    issues.push(issue);
                    continue;
                }
                MarkerScan::Block(Ok(marker)) => marker,
            };

            match BlockParser::new(data, pos, &marker).parse(marker) {
                Ok(block) => {
                    resume = block.span.end;
                    comments.restart_at(resume);
                    let first = blocks.iter().find(|b| b.model == block.model).map(|b| b.line);
                    if let Some(first) = first {
                        issues.push(BlockIssue {
                            model: block.model,
                            line: block.line,
                            reason: format!("duplicate block, first declared at line {}", first),
                        });
                    } else {
                        blocks.push(block);
                    }
                }
                Err(issue) => issues.push(issue),
            }
        }

        Self {
            data,
            blocks,
            issues,
            unrecognized,
            line_ending: LineEnding::detect(data),
        }
    }

    /// The raw document bytes.
    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    /// Recognized blocks, in document order.
    pub fn blocks(&self) -> &[ArrayBlock] {
        &self.blocks
    }

    /// Blocks that were found but could not be parsed.
    pub fn issues(&self) -> &[BlockIssue] {
        &self.issues
    }

    /// Marker names outside the recognized model set.
    pub fn unrecognized(&self) -> &[String] {
        &self.unrecognized
    }

    /// Line terminator used by the document.
    pub fn line_ending(&self) -> LineEnding {
        self.line_ending
    }

    /// Find the block for a model.
    pub fn block(&self, model: CameraModel) -> Option<&ArrayBlock> {
        self.blocks.iter().find(|b| b.model == model)
    }
}

fn at_line_start(data: &[u8], pos: usize) -> bool {
    pos == 0 || data[pos - 1] == b'\n'
}

/// Tracks whether a scan position lies inside a `/* */` comment.
///
/// Only moves forward. Line comments and string or character literals are
/// stepped over so that `/*` inside them does not open a comment.
#[derive(Debug, Default)]
struct CommentTracker {
    pos: usize,
    in_block: bool,
}

impl CommentTracker {
    fn in_block_comment(&mut self, data: &[u8], target: usize) -> bool {
        while self.pos < target {
            if self.in_block {
                match memmem::find(&data[self.pos..target], b"*/") {
                    Some(i) => {
                        self.pos += i + 2;
                        self.in_block = false;
                    }
                    None => self.pos = target,
                }
                continue;
            }

            let cur = self.pos;
            self.pos = match (data[cur], data.get(cur + 1).copied()) {
                (b'/', Some(b'*')) => {
                    self.in_block = true;
                    cur + 2
                }
                (b'/', Some(b'/')) => {
                    memchr::memchr(b'\n', &data[cur..]).map_or(data.len(), |i| cur + i)
                }
                (quote @ (b'"' | b'\''), _) => skip_literal(data, cur + 1, quote),
                _ => cur + 1,
            };
        }
        self.in_block
    }

    /// Continue from `pos`, known to be outside any comment.
    fn restart_at(&mut self, pos: usize) {
        self.pos = pos;
        self.in_block = false;
    }
}

/// Offset just past the closing `quote`, or of the line break ending an
/// unterminated literal.
fn skip_literal(data: &[u8], mut cur: usize, quote: u8) -> usize {
    while cur < data.len() {
        match data[cur] {
            b'\\' => cur += 2,
            b'\n' => return cur,
            c if c == quote => return cur + 1,
            _ => cur += 1,
        }
    }
    data.len()
}

/// 1-based line number of a byte offset.
pub fn line_of(data: &[u8], offset: usize) -> usize {
    memchr::memchr_iter(b'\n', &data[..offset.min(data.len())]).count() + 1
}

/// Parsed marker comment.
#[derive(Debug)]
struct Marker {
    model: CameraModel,
    size: u64,
    size_field: Range<usize>,
    end: usize,
}

enum MarkerScan {
    NotBlock,
    Unrecognized(String),
    Block(Result<Marker, BlockIssue>),
}

impl Marker {
    /// Parse `//File: index_<name>.html.gz, Size: <N>` starting at `pos`.
    fn parse(data: &[u8], pos: usize) -> MarkerScan {
        let line_end = memchr::memchr(b'\n', &data[pos..]).map_or(data.len(), |i| pos + i);
        let mut cur = pos + MARKER.len();
        cur = skip_blanks(data, cur, line_end);

        let file_start = cur;
        while cur < line_end && !matches!(data[cur], b',' | b' ' | b'\t' | b'\r') {
            cur += 1;
        }
        let file = &data[file_start..cur];

        let Some(name) = file
            .strip_prefix(FILE_PREFIX)
            .and_then(|f| f.strip_suffix(FILE_SUFFIX))
        else {
            return MarkerScan::NotBlock;
        };

        let name = String::from_utf8_lossy(name);
        let Some(model) = CameraModel::from_name(&name) else {
            return MarkerScan::Unrecognized(name.into_owned());
        };

        let line = line_of(data, pos);
        let issue = |reason: &str| BlockIssue { model, line, reason: reason.to_string() };

        cur = skip_blanks(data, cur, line_end);
        if data.get(cur) != Some(&b',') {
            return MarkerScan::Block(Err(issue("expected ',' after file name in marker comment")));
        }
        cur = skip_blanks(data, cur + 1, line_end);

        if !data[cur..line_end].starts_with(SIZE_LABEL) {
            return MarkerScan::Block(Err(issue("expected 'Size:' in marker comment")));
        }
        cur = skip_blanks(data, cur + SIZE_LABEL.len(), line_end);

        let digits_start = cur;
        while cur < line_end && data[cur].is_ascii_digit() {
            cur += 1;
        }
        if cur == digits_start {
            return MarkerScan::Block(Err(issue("missing size value in marker comment")));
        }
        let size = parse_decimal(&data[digits_start..cur]);

        MarkerScan::Block(Ok(Marker {
            model,
            size,
            size_field: digits_start..cur,
            end: cur,
        }))
    }
}

fn skip_blanks(data: &[u8], mut cur: usize, limit: usize) -> usize {
    while cur < limit && matches!(data[cur], b' ' | b'\t') {
        cur += 1;
    }
    cur
}

fn parse_decimal(digits: &[u8]) -> u64 {
    digits
        .iter()
        .fold(0u64, |acc, d| acc.saturating_mul(10).saturating_add((d - b'0') as u64))
}

/// Parses the `#define`, declaration and byte list that follow a marker.
struct BlockParser<'a> {
    data: &'a [u8],
    start: usize,
    model: CameraModel,
    lexer: Lexer<'a>,
}

impl<'a> BlockParser<'a> {
    fn new(data: &'a [u8], start: usize, marker: &Marker) -> Self {
        Self {
            data,
            start,
            model: marker.model,
            lexer: Lexer::new_at(data, marker.end),
        }
    }

    fn parse(mut self, marker: Marker) -> Result<ArrayBlock, BlockIssue> {
        let model = self.model;

        // Rest of the marker line may only hold a comment.
        let token = self.next_significant(false);
        if token.kind != TokenKind::Newline {
            return Err(self.issue_at(token.start, "unexpected text after marker comment"));
        }

        // #define index_<name>_html_gz_len <N>
        let len_ident = model.len_ident();
        self.expect(|k| k == TokenKind::Hash, "expected '#define' after marker comment")?;
        self.expect(
            |k| k == TokenKind::Ident(b"define"),
            "expected '#define' after marker comment",
        )?;
        self.expect(
            |k| k == TokenKind::Ident(len_ident.as_bytes()),
            &format!("expected length macro '{}'", len_ident),
        )?;
        let len_token = self.next_significant(true);
        let TokenKind::Number(declared_len) = len_token.kind else {
            return Err(self.issue_at(len_token.start, "expected length value"));
        };
        let token = self.next_significant(false);
        if token.kind != TokenKind::Newline {
            return Err(self.issue_at(token.start, "unexpected text after length macro"));
        }

        // [qualifiers...] index_<name>_html_gz [ [N] ] = {
        let array_ident = model.array_ident();
        loop {
            let token = self.next_significant(true);
            match token.kind {
                TokenKind::Ident(ident) if ident == array_ident.as_bytes() => break,
                TokenKind::Ident(_) => continue,
                _ => {
                    return Err(self.issue_at(
                        token.start,
                        &format!("expected declaration of '{}'", array_ident),
                    ))
                }
            }
        }
        self.expect(|k| k == TokenKind::LeftBracket, "expected '[' after array name")?;
        let mut token = self.next_significant(true);
        let mut array_size_field = None;
        if matches!(token.kind, TokenKind::Number(_)) {
            array_size_field = Some(token.span());
            token = self.next_significant(true);
        }
        if token.kind != TokenKind::RightBracket {
            return Err(self.issue_at(token.start, "expected ']' after array name"));
        }
        // trailing attributes such as PROGMEM
        loop {
            let token = self.next_significant(true);
            match token.kind {
                TokenKind::Eq => break,
                TokenKind::Ident(_) => continue,
                _ => return Err(self.issue_at(token.start, "expected '=' in array declaration")),
            }
        }
        let open = self.expect(|k| k == TokenKind::LeftBrace, "expected '{' to open byte list")?;

        // byte list
        let mut bytes = Vec::with_capacity(declared_len.min(1 << 24) as usize);
        let close = loop {
            let token = self.next_significant(true);
            match token.kind {
                TokenKind::RightBrace => break token,
                TokenKind::Number(v) => {
                    let Ok(byte) = u8::try_from(v) else {
                        let reason = format!("byte value {} out of range", v);
                        return Err(self.issue_at(token.start, &reason));
                    };
                    bytes.push(byte);

                    let sep = self.next_significant(true);
                    match sep.kind {
                        TokenKind::Comma => {}
                        TokenKind::RightBrace => break sep,
                        _ => {
                            return Err(self.issue_at(sep.start, "expected ',' or '}' in byte list"))
                        }
                    }
                }
                TokenKind::Eof => {
                    return Err(self.issue_at(token.start, "byte list is not closed with '};'"))
                }
                _ => return Err(self.issue_at(token.start, "expected byte value in byte list")),
            }
        };
        let semi = self.expect(|k| k == TokenKind::Semicolon, "expected ';' after byte list")?;

        Ok(ArrayBlock {
            model,
            line: line_of(self.data, self.start),
            span: self.start..semi.end,
            size_field: marker.size_field,
            len_field: len_token.span(),
            array_size_field,
            body: open.end..close.start,
            marker_size: marker.size,
            declared_len,
            bytes,
        })
    }

    /// Next token that is not a line comment, optionally skipping line breaks.
    fn next_significant(&mut self, skip_newlines: bool) -> Token<'a> {
        loop {
            let token = self.lexer.next_token();
            match token.kind {
                TokenKind::LineComment(_) => continue,
                TokenKind::Newline if skip_newlines => continue,
                _ => return token,
            }
        }
    }

    fn expect(
        &mut self,
        accept: impl Fn(TokenKind<'a>) -> bool,
        reason: &str,
    ) -> Result<Token<'a>, BlockIssue> {
        let token = self.next_significant(true);
        if accept(token.kind) {
            Ok(token)
        } else {
            Err(self.issue_at(token.start, reason))
        }
    }

    fn issue_at(&self, offset: usize, reason: &str) -> BlockIssue {
        BlockIssue {
            model: self.model,
            line: line_of(self.data, offset),
            reason: reason.to_string(),
        }
    }
}
