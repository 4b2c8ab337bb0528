//! Byte-level preprocessing and tokenization.
//!
//! Lexing happens in three stages:
//!
//! 1. A stateful byte FSM normalizes the raw source: newline forms collapse
//!    to LF, backslash continuation keeps the next byte on the current line,
//!    comments (`;` at line start or after whitespace) are stripped, the
//!    `;#end` meta-command records a cut-off line, and string / binary-string
//!    state is tracked so none of this applies inside literals.
//! 2. Lines are stitched back together: trailing whitespace and golf
//!    indentation (two-space units or tabs) are stripped, blank lines drop
//!    out, and adjacent lines concatenate except where a newline is the only
//!    thing separating two numeric tokens.
//! 3. The stitched bytes become tokens. There are no delimiters, so numeric
//!    tokenization carries golf-specific rules: a leading zero is its own
//!    token, and a trailing `.` does double duty as the start of a following
//!    dotted operator.
//!
//! The token stream supports unbounded lookahead through a FIFO cache so the
//! parser can make arity decisions without consuming.

use std::collections::VecDeque;

use crate::exception::{Error, lexer_error};

/// Symbol bytes that form single-character `symb` tokens (letters are
/// handled separately).
const SYMB: &[u8] = b" !#%&'()*+,-/:;<=>?@[]^_`{|}~";

/// One lexical token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Token {
    /// An operator, variable or separator symbol: one byte, or two for the
    /// dotted (`.!`) and dollar (`$a`) forms.
    Symb(String),
    /// A string literal (escapes already resolved).
    Str(String),
    /// A numeric literal, kept as source text until the parser builds the
    /// exact value.
    Num(String),
    /// A binary string literal: the raw byte values.
    Bytes(Vec<u8>),
}

impl Token {
    pub fn symb(&self) -> Option<&str> {
        match self {
            Self::Symb(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_symb(&self, expected: &str) -> bool {
        self.symb() == Some(expected)
    }
}

/// The tokenizer over preprocessed source bytes.
#[derive(Debug)]
pub(crate) struct Lexer {
    src: Vec<u8>,
    idx: usize,
    cache: VecDeque<Token>,
}

impl Lexer {
    pub fn new(raw: &[u8]) -> Self {
        Self {
            src: preprocess(raw),
            idx: 0,
            cache: VecDeque::new(),
        }
    }

    /// The normalized, stitched source this lexer tokenizes (shown by the
    /// CLI debug dump).
    pub fn preprocessed_source(&self) -> &[u8] {
        &self.src
    }

    /// Whether any token remains. Newlines only separate tokens and are
    /// skipped here.
    pub fn has_token(&mut self) -> bool {
        while self.idx < self.src.len() && self.src[self.idx] == b'\n' {
            self.idx += 1;
        }
        !self.cache.is_empty() || self.idx < self.src.len()
    }

    /// Looks `ahead` tokens past the cache without consuming anything.
    pub fn peek_token(&mut self, ahead: usize) -> Result<Token, Error> {
        while self.cache.len() <= ahead {
            let token = self.next_token()?;
            self.cache.push_back(token);
        }
        Ok(self.cache[ahead].clone())
    }

    pub fn get_token(&mut self) -> Result<Token, Error> {
        if let Some(token) = self.cache.pop_front() {
            return Ok(token);
        }
        self.next_token()
    }

    fn next_token(&mut self) -> Result<Token, Error> {
        while self.hasc() && self.peekc() == Some(b'\n') {
            self.idx += 1;
        }
        if !self.hasc() {
            return Err(lexer_error("expected character, found EOF"));
        }

        let c = self.getc();
        if c.is_ascii_alphabetic() || SYMB.contains(&c) {
            return Ok(Token::Symb((c as char).to_string()));
        }

        if c == b'"' {
            return Ok(Token::Str(bytes_to_string(&self.tok_str())));
        }
        if c == b'\\' {
            // A one-character string; EOF right after the backslash yields
            // the empty string.
            let data = if self.hasc() { vec![self.getc()] } else { vec![] };
            return Ok(Token::Str(bytes_to_string(&data)));
        }

        if c.is_ascii_digit() || (c == b'.' && self.peekc().is_some_and(|b| b.is_ascii_digit())) {
            self.idx -= 1; // push the digit or '.' back on the stream
            return Ok(Token::Num(self.tok_num()));
        }

        if c == b'.' {
            return self.tok_dot();
        }
        if c == b'$' {
            if !self.hasc() {
                return Err(lexer_error("expected character after '$', found EOF"));
            }
            let next = self.getc();
            return Ok(Token::Symb(format!("${}", next as char)));
        }

        Err(lexer_error(format!(
            "unexpected character while parsing tokens: {c:x}"
        )))
    }

    fn tok_dot(&mut self) -> Result<Token, Error> {
        if !self.hasc() {
            return Err(lexer_error("expected character after '.', found EOF"));
        }
        let c = self.getc();
        if c == b'"' {
            return Ok(Token::Bytes(self.tok_str()));
        }
        Ok(Token::Symb(format!(".{}", c as char)))
    }

    /// Reads string content up to the closing quote or EOF; a string left
    /// open at EOF keeps its partial content as the payload. `\"` and
    /// `\\` unescape; any other backslash stays literal.
    fn tok_str(&mut self) -> Vec<u8> {
        let mut s = Vec::new();
        while self.hasc() {
            let c = self.getc();
            if c == b'"' {
                break;
            }
            if c == b'\\' && matches!(self.peekc(), Some(b'"' | b'\\')) {
                s.push(self.getc());
            } else {
                s.push(c);
            }
        }
        s
    }

    fn tok_num(&mut self) -> String {
        let mut n: Vec<u8> = Vec::new();

        // Leading zeroes are separate tokens (in a golf language a leading
        // zero is never useful):
        if self.peekc() == Some(b'0') {
            n.push(self.getc());
            if self.peekc() == Some(b'.') {
                n.push(self.getc());
            }
        } else {
            while let Some(c) = self.peekc() {
                if c == b'.' {
                    if n.contains(&b'.') {
                        break;
                    }
                } else if !c.is_ascii_digit() {
                    break;
                }
                n.push(self.getc());
            }
        }

        // A trailing '.' before anything but a space or newline also serves
        // as the start of the next dotted operator: leave it on the stream
        // (the numeric value is unchanged by its own trailing dot).
        if n.ends_with(b".") && matches!(self.peekc(), Some(c) if c != b' ' && c != b'\n') {
            self.idx -= 1;
        }

        bytes_to_string(&n)
    }

    fn hasc(&self) -> bool {
        self.idx < self.src.len()
    }

    fn peekc(&self) -> Option<u8> {
        self.src.get(self.idx).copied()
    }

    fn getc(&mut self) -> u8 {
        self.idx += 1;
        self.src[self.idx - 1]
    }
}

fn bytes_to_string(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

/// Stage 1 + 2: normalizes the raw byte stream and stitches lines.
///
/// Idempotent: running it on its own output is a fixpoint.
pub(crate) fn preprocess(raw: &[u8]) -> Vec<u8> {
    let mut lines = normalize_lines(raw);
    stitch_lines(&mut lines)
}

/// The stage-1 byte FSM. Returns the logical lines, with string and
/// binary-string content carried through untouched (except that newlines
/// inside regular strings become LF bytes in the content).
fn normalize_lines(raw: &[u8]) -> Vec<Vec<u8>> {
    let mut in_string = false;
    let mut in_binstring = false;
    let mut end_meta: Option<usize> = None;

    let mut lines: Vec<Vec<u8>> = vec![Vec::new()];
    let mut i = 0;
    while i < raw.len() {
        let c = raw[i];
        i += 1;

        // Don't normalize anything in binary strings.
        if in_binstring {
            line_push(&mut lines, c);
            if c == b'\\' {
                if i < raw.len() {
                    line_push(&mut lines, raw[i]);
                    i += 1;
                }
            } else if c == b'"' {
                in_binstring = false;
            }
            continue;
        }

        // Normalize newline.
        if c == b'\r' || c == b'\n' {
            if in_string {
                line_push(&mut lines, b'\n');
            } else {
                lines.push(Vec::new());
            }
            // Greedily read \r\n.
            if c == b'\r' && raw.get(i) == Some(&b'\n') {
                i += 1;
            }
            continue;
        }

        // Handle string state.
        if in_string {
            line_push(&mut lines, c);
            if c == b'\\' && raw.get(i) == Some(&b'"') {
                line_push(&mut lines, b'"');
                i += 1;
            } else if c == b'"' {
                in_string = false;
            }
            continue;
        }

        // Comments start at column 0 or after whitespace.
        let at_comment = c == b';'
            && lines
                .last()
                .is_some_and(|line| matches!(line.last().copied(), None | Some(b' ' | b'\t')));
        if at_comment {
            let mut comment = Vec::new();
            while i < raw.len() {
                let c = raw[i];
                i += 1;
                if c == b'\r' && raw.get(i) == Some(&b'\n') {
                    i += 1;
                }
                if c == b'\r' || c == b'\n' {
                    lines.push(Vec::new());
                    break;
                }
                comment.push(c);
            }

            // Meta-command.
            if let Some(meta) = comment.strip_prefix(b"#") {
                if trim_ascii(meta) == b"end" && end_meta.is_none() {
                    end_meta = Some(lines.len() - 1);
                }
            }
            continue;
        }

        // Regular characters.
        line_push(&mut lines, c);
        if c == b'"' {
            in_string = true;
        } else if c == b'.' && raw.get(i) == Some(&b'"') {
            line_push(&mut lines, b'"');
            i += 1;
            in_binstring = true;
        } else if c == b'\\' && i < raw.len() {
            // Line continuation: the next byte lands on this line; a newline
            // after the backslash collapses to a single LF byte.
            let mut c = raw[i];
            i += 1;
            if c == b'\r' && raw.get(i) == Some(&b'\n') {
                i += 1;
            }
            if c == b'\r' || c == b'\n' {
                c = b'\n';
            }
            line_push(&mut lines, c);
        }
    }

    if let Some(end) = end_meta {
        lines.truncate(end);
    }
    lines
}

/// The stage-2 line stitcher.
fn stitch_lines(lines: &mut Vec<Vec<u8>>) -> Vec<u8> {
    // Strip all trailing whitespace and golf indentation (any mix of
    // two-space units and tabs) from the beginning, then drop empty lines.
    for line in lines.iter_mut() {
        while matches!(line.last(), Some(b) if b.is_ascii_whitespace()) {
            line.pop();
        }
        let mut start = 0;
        loop {
            if line[start..].starts_with(b"  ") {
                start += 2;
            } else if line[start..].starts_with(b"\t") {
                start += 1;
            } else {
                break;
            }
        }
        line.drain(..start);
    }
    lines.retain(|line| !line.is_empty());

    // Concatenate lines, unless a line ends in a number or period and the
    // next line begins in a number (the only time a newline is necessary).
    let mut linenr = 0;
    while linenr + 1 < lines.len() {
        let keep_newline = matches!(lines[linenr].last().copied(), Some(b'.' | b'0'..=b'9'))
            && lines[linenr + 1][0].is_ascii_digit();
        if keep_newline {
            linenr += 1;
        } else {
            let next = lines.remove(linenr + 1);
            lines[linenr].extend(next);
        }
    }

    lines.join(&b'\n')
}

fn line_push(lines: &mut [Vec<u8>], c: u8) {
    lines
        .last_mut()
        .expect("line list starts non-empty and only grows")
        .push(c);
}

fn trim_ascii(bytes: &[u8]) -> &[u8] {
    let start = bytes
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(bytes.len());
    let end = bytes
        .iter()
        .rposition(|b| !b.is_ascii_whitespace())
        .map_or(start, |p| p + 1);
    &bytes[start..end]
}
