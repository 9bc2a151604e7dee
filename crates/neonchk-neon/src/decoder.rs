//! # Decoder
//!
//! Recursive-descent parser from the token stream to a [`Value`] tree.
//!
//! ## Grammar (informal)
//!
//! - **Block mapping**: `key: value` lines at the same indentation. A key
//!   followed by a line break opens a deeper block, or a bullet list at the
//!   same indentation (`key:` then `- item` lines).
//! - **Block list**: `- item` lines. An item may itself open an inline block
//!   (`- name: a` followed by an aligned `port: 1`).
//! - **Inline collections**: `[a, b]`, `{a: 1, b = 2}`; commas and line breaks
//!   both separate items, trailing commas are allowed.
//! - **Entities**: `Name(args)`, chained as `a(1)b(2)`.
//! - **Scalars**: quoted strings, or unquoted literals classified by
//!   [`parse_literal`].
//!
//! A collection whose items are all unkeyed becomes a sequence; any key
//! makes it a mapping, with unkeyed items receiving the next integer key.
//! An empty `{}` is a mapping, an empty `[]` or `()` is a sequence.

use std::cmp::Ordering;
use std::collections::HashSet;

use crate::error::DecodeError;
use crate::lexer::{tokenize, Token, TokenKind};
use crate::literal::parse_literal;
use crate::value::{Entity, Mapping, Object, Value};

/// Maximum nesting of blocks and inline collections.
const MAX_DEPTH: usize = 256;

/// Decode a NEON document. An empty document (or one holding only comments)
/// decodes to null.
pub fn decode(input: &str) -> Result<Value, DecodeError> {
    let tokens = tokenize(input)?;
    Parser::new(tokens).parse_document()
}

/// Accumulates collection items and applies the sequence/mapping rule.
struct CollectionBuilder {
    items: Vec<(Option<String>, Value)>,
    seen: HashSet<String>,
}

impl CollectionBuilder {
    fn new() -> Self {
        Self {
            items: Vec::new(),
            seen: HashSet::new(),
        }
    }

    fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn push(&mut self, key: Option<(String, &Token)>, value: Value) -> Result<(), DecodeError> {
        let key = match key {
            Some((key, token)) => {
                if !self.seen.insert(key.clone()) {
                    return Err(DecodeError::new(
                        format!("Duplicated key '{key}'"),
                        token.line,
                        token.column,
                    ));
                }
                Some(key)
            }
            None => None,
        };
        self.items.push((key, value));
        Ok(())
    }

    /// `prefer_mapping` decides the shape of an empty collection.
    fn finish(self, prefer_mapping: bool) -> Value {
        if self.seen.is_empty() && !(self.items.is_empty() && prefer_mapping) {
            return Value::Sequence(self.items.into_iter().map(|(_, v)| v).collect());
        }

        let mut next_index: i64 = 0;
        let mut map = Mapping::new();
        for (key, value) in self.items {
            let key = match key {
                Some(key) => {
                    if let Ok(n) = key.parse::<i64>() {
                        if n >= next_index {
                            next_index = n.saturating_add(1);
                        }
                    }
                    key
                }
                None => {
                    // Skip indices already taken by explicit keys further on.
                    while map.contains_key(&next_index.to_string()) {
                        next_index += 1;
                    }
                    let key = next_index.to_string();
                    next_index += 1;
                    key
                }
            };
            map.insert(key, value);
        }
        Value::Mapping(map)
    }
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            pos: 0,
            depth: 0,
        }
    }

    fn peek(&self) -> &Token {
        // The lexer always terminates the stream with `End`.
        let last = self.tokens.len().saturating_sub(1);
        &self.tokens[self.pos.min(last)]
    }

    fn peek_at(&self, offset: usize) -> &Token {
        let last = self.tokens.len().saturating_sub(1);
        &self.tokens[(self.pos + offset).min(last)]
    }

    fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if token.kind != TokenKind::End {
            self.pos += 1;
        }
        token
    }

    fn at_end(&self) -> bool {
        self.peek().kind == TokenKind::End
    }

    fn at_newline(&self) -> bool {
        matches!(self.peek().kind, TokenKind::Newline(_))
    }

    /// Newline followed directly by the end of input.
    fn at_trailing_newline(&self) -> bool {
        self.at_newline() && self.peek_at(1).kind == TokenKind::End
    }

    fn unexpected(&self) -> DecodeError {
        let token = self.peek();
        match &token.kind {
            TokenKind::End => DecodeError::unexpected_end(token.line, token.column),
            TokenKind::Newline(_) => {
                DecodeError::new("Unexpected end of line", token.line, token.column)
            }
            _ => DecodeError::unexpected(&token.text, token.line, token.column),
        }
    }

    fn enter(&mut self) -> Result<(), DecodeError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            let token = self.peek();
            return Err(DecodeError::new(
                "Nesting is too deep",
                token.line,
                token.column,
            ));
        }
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    fn parse_document(mut self) -> Result<Value, DecodeError> {
        let indent = match self.advance().kind {
            TokenKind::Newline(indent) => indent,
            _ => String::new(),
        };
        if self.at_end() {
            return Ok(Value::null());
        }

        let value = self.parse_block(&indent, false)?;

        while self.at_newline() {
            self.advance();
        }
        if !self.at_end() {
            return Err(self.unexpected());
        }
        Ok(value)
    }

    /// Compare the indentation of the newline token at the cursor with the
    /// block's indentation.
    fn compare_indent(&self, indent: &str, base: &str) -> Result<Ordering, DecodeError> {
        if indent == base {
            Ok(Ordering::Equal)
        } else if indent.starts_with(base) {
            Ok(Ordering::Greater)
        } else if base.starts_with(indent) {
            Ok(Ordering::Less)
        } else {
            let token = self.peek();
            Err(DecodeError::new(
                "Invalid combination of tabs and spaces",
                token.line,
                token.column,
            ))
        }
    }

    fn newline_indent(&self) -> Option<String> {
        match &self.peek().kind {
            TokenKind::Newline(indent) => Some(indent.clone()),
            _ => None,
        }
    }

    /// A key is a literal or string directly followed by `:` (or `=` inside
    /// inline collections).
    fn at_key(&self, allow_equals: bool) -> bool {
        let is_keyable = matches!(
            self.peek().kind,
            TokenKind::Literal(_) | TokenKind::String(_)
        );
        let sep = self.peek_at(1);
        is_keyable && (sep.is_punct(':') || (allow_equals && sep.is_punct('=')))
    }

    /// Consume `key` and its separator.
    fn parse_key(&mut self) -> (String, Token) {
        let token = self.advance();
        self.advance();
        let key = match &token.kind {
            TokenKind::Literal(raw) | TokenKind::String(raw) => raw.clone(),
            _ => token.text.clone(),
        };
        (key, token)
    }

    fn parse_block(&mut self, indent: &str, only_bullets: bool) -> Result<Value, DecodeError> {
        self.enter()?;
        let result = self.parse_block_items(indent, only_bullets);
        self.leave();
        result
    }

    fn parse_block_items(&mut self, indent: &str, only_bullets: bool) -> Result<Value, DecodeError> {
        let mut builder = CollectionBuilder::new();

        loop {
            let item_token = self.peek().clone();
            let bullet = item_token.is_punct('-');
            let key = if bullet {
                self.advance();
                None
            } else if !only_bullets && self.at_key(false) {
                Some(self.parse_key())
            } else if builder.is_empty() && !only_bullets {
                return self.parse_value();
            } else {
                return Err(self.unexpected());
            };

            let value = self.parse_block_item_value(indent, bullet, key.is_some())?;
            builder.push(key.as_ref().map(|(k, t)| (k.clone(), t)), value)?;

            if self.at_end() || self.at_trailing_newline() {
                break;
            }
            let Some(next_indent) = self.newline_indent() else {
                return Err(self.unexpected());
            };
            match self.compare_indent(&next_indent, indent)? {
                Ordering::Equal => {
                    if only_bullets && !self.peek_at(1).is_punct('-') {
                        break;
                    }
                    self.advance();
                }
                Ordering::Less => break,
                Ordering::Greater => {
                    let token = self.peek();
                    return Err(DecodeError::new("Bad indentation", token.line, token.column));
                }
            }
        }

        Ok(builder.finish(false))
    }

    /// The value after `key:` or `- `.
    fn parse_block_item_value(
        &mut self,
        indent: &str,
        bullet: bool,
        keyed: bool,
    ) -> Result<Value, DecodeError> {
        if self.at_end() || self.at_newline() {
            let Some(next_indent) = self.newline_indent() else {
                return Ok(Value::null());
            };
            if self.peek_at(1).kind == TokenKind::End {
                return Ok(Value::null());
            }
            return match self.compare_indent(&next_indent, indent)? {
                Ordering::Greater => {
                    self.advance();
                    self.parse_block(&next_indent, false)
                }
                Ordering::Equal if keyed && self.peek_at(1).is_punct('-') => {
                    self.advance();
                    self.parse_block(indent, true)
                }
                _ => Ok(Value::null()),
            };
        }

        if bullet && (self.at_key(false) || self.peek().is_punct('-')) {
            // Inline block opened after the bullet; continuation lines align
            // with the first token after `- `.
            let column = self.peek().column;
            let width = column.saturating_sub(1).saturating_sub(indent.chars().count());
            let inner = format!("{indent}{}", " ".repeat(width));
            return self.parse_block(&inner, false);
        }

        self.parse_value()
    }

    /// Inline value: scalar, inline collection, or entity.
    fn parse_value(&mut self) -> Result<Value, DecodeError> {
        let token = self.peek().clone();
        let value = match &token.kind {
            TokenKind::String(s) => {
                self.advance();
                Value::string(s.clone())
            }
            TokenKind::Literal(raw) => {
                self.advance();
                parse_literal(raw)
            }
            TokenKind::Punct('[') => self.parse_inline(']')?,
            TokenKind::Punct('{') => self.parse_inline('}')?,
            _ => return Err(self.unexpected()),
        };

        if !self.peek().is_punct('(') {
            return Ok(value);
        }

        let mut chain = vec![Entity::new(value, self.parse_inline(')')?)];
        while matches!(self.peek().kind, TokenKind::Literal(_)) && self.peek_at(1).is_punct('(') {
            let name = match self.advance().kind {
                TokenKind::Literal(raw) => parse_literal(&raw),
                _ => return Err(self.unexpected()),
            };
            chain.push(Entity::new(name, self.parse_inline(')')?));
        }

        if chain.len() == 1 {
            let entity = chain.remove(0);
            Ok(Value::Object(Object::Entity(entity)))
        } else {
            Ok(Value::Object(Object::Chain(chain)))
        }
    }

    /// `[...]`, `{...}` or `(...)`; the cursor is on the opening bracket.
    fn parse_inline(&mut self, close: char) -> Result<Value, DecodeError> {
        self.enter()?;
        self.advance();
        let result = self.parse_inline_items(close);
        self.leave();
        result
    }

    fn parse_inline_items(&mut self, close: char) -> Result<Value, DecodeError> {
        let mut builder = CollectionBuilder::new();

        loop {
            self.skip_newlines();
            if self.peek().is_punct(close) {
                self.advance();
                break;
            }
            if self.at_end() {
                return Err(self.unexpected());
            }

            let key = if self.at_key(true) {
                Some(self.parse_key())
            } else {
                None
            };

            let ends_item = |t: &Token| {
                t.is_punct(',') || t.is_punct(close) || matches!(t.kind, TokenKind::Newline(_))
            };
            let value = if key.is_some() && ends_item(self.peek()) {
                Value::null()
            } else {
                self.parse_value()?
            };
            builder.push(key.as_ref().map(|(k, t)| (k.clone(), t)), value)?;

            let had_newline = self.skip_newlines();
            if self.peek().is_punct(',') {
                self.advance();
            } else if self.peek().is_punct(close) {
                self.advance();
                break;
            } else if !had_newline {
                return Err(self.unexpected());
            }
        }

        Ok(builder.finish(close == '}'))
    }

    /// Skip newline tokens; returns whether any were skipped.
    fn skip_newlines(&mut self) -> bool {
        let mut skipped = false;
        while self.at_newline() {
            self.advance();
            skipped = true;
        }
        skipped
    }
}
