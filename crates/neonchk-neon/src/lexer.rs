//! # Lexer
//!
//! Splits NEON source into tokens carrying 1-based line and column
//! positions. Whitespace and comments are dropped; line breaks become
//! [`TokenKind::Newline`] tokens that carry the indentation of the next
//! non-blank line, so blank and comment-only lines collapse into a single
//! newline token. The token stream always starts with a newline token (the
//! indentation of the first line) and ends with [`TokenKind::End`].
//!
//! ## Unquoted literals
//!
//! A literal may contain `:` and `-` as long as they are followed by a
//! character other than whitespace or `,` `]` `}` `)`, and it may contain
//! inner runs of spaces as long as the next character could continue it.
//! So `http://example.com` and `foo bar` are single literals, while in
//! `key: value` the colon is punctuation.

use crate::error::DecodeError;

/// Token category and payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    /// Unquoted literal, raw text.
    Literal(String),
    /// Quoted or multi-line string, already unescaped.
    String(String),
    /// One of `, : = [ ] { } ( ) -`.
    Punct(char),
    /// Line break; payload is the indentation of the following line.
    Newline(String),
    /// End of input.
    End,
}

/// A token with its source text and position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Category and payload.
    pub kind: TokenKind,
    /// Source text as written, used in diagnostics.
    pub text: String,
    /// 1-based line.
    pub line: usize,
    /// 1-based column in characters.
    pub column: usize,
}

impl Token {
    /// True if this is the given punctuation character.
    pub fn is_punct(&self, c: char) -> bool {
        self.kind == TokenKind::Punct(c)
    }
}

/// Tokenize a NEON document.
pub fn tokenize(input: &str) -> Result<Vec<Token>, DecodeError> {
    Lexer::new(input).run()
}

/// Characters that terminate an unquoted literal.
fn ends_literal(c: char) -> bool {
    matches!(c, ',' | '=' | ']' | '}' | ')' | '(' | '\n' | '\r')
}

/// Characters after which `:` or `-` act as punctuation.
fn closes_indicator(c: Option<char>) -> bool {
    match c {
        None => true,
        Some(c) => c.is_whitespace() || matches!(c, ',' | ']' | '}' | ')'),
    }
}

struct Lexer {
    chars: Vec<char>,
    pos: usize,
    line: usize,
    line_start: usize,
    tokens: Vec<Token>,
}

impl Lexer {
    fn new(input: &str) -> Self {
        Self {
            chars: input.chars().collect(),
            pos: 0,
            line: 1,
            line_start: 0,
            tokens: Vec::new(),
        }
    }

    fn column(&self) -> usize {
        self.pos - self.line_start + 1
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        if c == '\n' {
            self.line += 1;
            self.line_start = self.pos;
        }
        Some(c)
    }

    fn starts_with(&self, pattern: &str) -> bool {
        pattern
            .chars()
            .enumerate()
            .all(|(i, c)| self.peek_at(i) == Some(c))
    }

    fn push(&mut self, kind: TokenKind, text: String, line: usize, column: usize) {
        self.tokens.push(Token {
            kind,
            text,
            line,
            column,
        });
    }

    fn run(mut self) -> Result<Vec<Token>, DecodeError> {
        self.newline();

        while let Some(c) = self.peek() {
            let (line, column) = (self.line, self.column());
            match c {
                ' ' | '\t' | '\r' => {
                    self.bump();
                }
                '#' => {
                    while self.peek().is_some_and(|c| c != '\n') {
                        self.bump();
                    }
                }
                '\n' => {
                    self.bump();
                    self.newline();
                }
                '\'' | '"' if self.starts_with(&c.to_string().repeat(3)) => {
                    self.multiline_string(c)?;
                }
                '\'' => self.single_quoted()?,
                '"' => self.double_quoted()?,
                ',' | '=' | '[' | ']' | '{' | '}' | '(' | ')' => {
                    self.bump();
                    self.push(TokenKind::Punct(c), c.to_string(), line, column);
                }
                ':' | '-' if closes_indicator(self.peek_at(1)) => {
                    self.bump();
                    self.push(TokenKind::Punct(c), c.to_string(), line, column);
                }
                '`' => return Err(DecodeError::unexpected("`", line, column)),
                _ => self.literal(),
            }
        }

        let (line, column) = (self.line, self.column());
        self.push(TokenKind::End, String::new(), line, column);
        Ok(self.tokens)
    }

    /// Consume indentation after a line break (or at input start) and emit a
    /// newline token, merging with a preceding one so blank lines vanish.
    fn newline(&mut self) {
        let mut indent = String::new();
        while let Some(c @ (' ' | '\t')) = self.peek() {
            indent.push(c);
            self.bump();
        }
        let (line, column) = (self.line, self.column());
        if let Some(last) = self.tokens.last() {
            if matches!(last.kind, TokenKind::Newline(_)) {
                self.tokens.pop();
            }
        }
        self.push(TokenKind::Newline(indent), "\n".to_string(), line, column);
    }

    fn literal(&mut self) {
        let (line, column) = (self.line, self.column());
        let start = self.pos;
        self.bump();

        while let Some(c) = self.peek() {
            if c == ':' {
                if closes_indicator(self.peek_at(1)) {
                    break;
                }
                self.bump();
                continue;
            }
            if c == ' ' || c == '\t' {
                let mut run = 0;
                while matches!(self.peek_at(run), Some(' ' | '\t')) {
                    run += 1;
                }
                let continues = self
                    .peek_at(run)
                    .is_some_and(|n| !ends_literal(n) && !matches!(n, '#' | ':'));
                if !continues {
                    break;
                }
                for _ in 0..run {
                    self.bump();
                }
                continue;
            }
            if ends_literal(c) {
                break;
            }
            self.bump();
        }

        let text: String = self.chars[start..self.pos].iter().collect();
        self.push(TokenKind::Literal(text.clone()), text, line, column);
    }

    fn single_quoted(&mut self) -> Result<(), DecodeError> {
        let (line, column) = (self.line, self.column());
        let start = self.pos;
        self.bump();
        let mut value = String::new();
        loop {
            match self.peek() {
                Some('\'') if self.peek_at(1) == Some('\'') => {
                    value.push('\'');
                    self.bump();
                    self.bump();
                }
                Some('\'') => {
                    self.bump();
                    break;
                }
                Some('\n') | None => {
                    return Err(DecodeError::new("Unterminated string", line, column));
                }
                Some(c) => {
                    value.push(c);
                    self.bump();
                }
            }
        }
        let text: String = self.chars[start..self.pos].iter().collect();
        self.push(TokenKind::String(value), text, line, column);
        Ok(())
    }

    fn double_quoted(&mut self) -> Result<(), DecodeError> {
        let (line, column) = (self.line, self.column());
        let start = self.pos;
        self.bump();
        let mut raw = String::new();
        loop {
            match self.peek() {
                Some('\\') => {
                    raw.push('\\');
                    self.bump();
                    match self.peek() {
                        Some('\n') | None => {
                            return Err(DecodeError::new("Unterminated string", line, column));
                        }
                        Some(c) => {
                            raw.push(c);
                            self.bump();
                        }
                    }
                }
                Some('"') => {
                    self.bump();
                    break;
                }
                Some('\n') | None => {
                    return Err(DecodeError::new("Unterminated string", line, column));
                }
                Some(c) => {
                    raw.push(c);
                    self.bump();
                }
            }
        }
        let value = unescape(&raw).map_err(|seq| {
            DecodeError::new(format!("Invalid escaping sequence {seq}"), line, column)
        })?;
        let text: String = self.chars[start..self.pos].iter().collect();
        self.push(TokenKind::String(value), text, line, column);
        Ok(())
    }

    /// `'''` or `"""` block. The opening delimiter must end its line; the
    /// closing one must stand alone after optional indentation. The
    /// indentation of the first content line is removed from every line.
    fn multiline_string(&mut self, quote: char) -> Result<(), DecodeError> {
        let (line, column) = (self.line, self.column());
        let start = self.pos;
        let unterminated = || DecodeError::new("Unterminated string", line, column);

        for _ in 0..3 {
            self.bump();
        }
        if self.peek() == Some('\r') {
            self.bump();
        }
        if self.peek() != Some('\n') {
            return Err(unterminated());
        }
        self.bump();

        let closing: String = quote.to_string().repeat(3);
        let mut lines: Vec<String> = Vec::new();
        loop {
            if self.peek().is_none() {
                return Err(unterminated());
            }
            let mut offset = 0;
            while matches!(self.peek_at(offset), Some(' ' | '\t')) {
                offset += 1;
            }
            let closes = closing
                .chars()
                .enumerate()
                .all(|(i, c)| self.peek_at(offset + i) == Some(c));
            if closes {
                for _ in 0..offset + 3 {
                    self.bump();
                }
                break;
            }
            let mut current = String::new();
            while let Some(c) = self.peek() {
                self.bump();
                if c == '\n' {
                    break;
                }
                current.push(c);
            }
            if current.ends_with('\r') {
                current.pop();
            }
            lines.push(current);
        }

        let indent: String = lines
            .first()
            .map(|l| l.chars().take_while(|c| *c == ' ' || *c == '\t').collect())
            .unwrap_or_default();
        let joined = lines
            .iter()
            .map(|l| l.strip_prefix(indent.as_str()).unwrap_or(l))
            .collect::<Vec<_>>()
            .join("\n");

        let value = if quote == '"' {
            unescape(&joined).map_err(|seq| {
                DecodeError::new(format!("Invalid escaping sequence {seq}"), line, column)
            })?
        } else {
            joined
        };
        let text: String = self.chars[start..self.pos].iter().collect();
        self.push(TokenKind::String(value), text, line, column);
        Ok(())
    }
}

/// Resolve backslash escapes of a double-quoted string. On failure returns
/// the offending sequence.
fn unescape(raw: &str) -> Result<String, String> {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let Some(esc) = chars.next() else {
            return Err("\\".to_string());
        };
        match esc {
            't' => out.push('\t'),
            'n' => out.push('\n'),
            'r' => out.push('\r'),
            'f' => out.push('\u{000C}'),
            'b' => out.push('\u{0008}'),
            '"' => out.push('"'),
            '\\' => out.push('\\'),
            '/' => out.push('/'),
            '_' => out.push('\u{00A0}'),
            'x' => {
                let hex: String = chars.by_ref().take(2).collect();
                let byte = u8::from_str_radix(&hex, 16).map_err(|_| format!("\\x{hex}"))?;
                out.push(char::from(byte));
            }
            'u' => {
                let hex: String = chars.by_ref().take(4).collect();
                let unit = u32::from_str_radix(&hex, 16).map_err(|_| format!("\\u{hex}"))?;
                let code = if (0xD800..0xDC00).contains(&unit) {
                    // High surrogate; a `\uXXXX` low surrogate must follow.
                    let rest: String = chars.by_ref().take(6).collect();
                    let low = rest
                        .strip_prefix("\\u")
                        .and_then(|h| u32::from_str_radix(h, 16).ok())
                        .filter(|low| (0xDC00..0xE000).contains(low))
                        .ok_or_else(|| format!("\\u{hex}"))?;
                    0x10000 + ((unit - 0xD800) << 10) + (low - 0xDC00)
                } else {
                    unit
                };
                out.push(char::from_u32(code).ok_or_else(|| format!("\\u{hex}"))?);
            }
            other => return Err(format!("\\{other}")),
        }
    }
    Ok(out)
}
