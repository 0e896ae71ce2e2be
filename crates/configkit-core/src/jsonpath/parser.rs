//! JSONPath expression parser
//!
//! A recursive descent parser for the JSONPath subset used by placeholder
//! substitution: dot and bracket children, indices, slices, wildcards,
//! recursive descent and unions. Filter expressions are rejected with an
//! `Unsupported` error rather than a syntax error.
//!
//! Copyright (c) 2025 Configkit Team
//! Licensed under the Apache-2.0 license

use super::ast::*;
use super::error::*;
use crate::Result;
use std::iter::Peekable;
use std::str::Chars;

/// JSONPath expression parser
pub struct Parser<'a> {
    /// Input string being parsed
    input: &'a str,
    /// Character iterator
    chars: Peekable<Chars<'a>>,
    /// Current byte position in input
    position: usize,
}

impl<'a> Parser<'a> {
    /// Create a new parser for the given input
    pub fn new(input: &'a str) -> Result<Self> {
        if input.is_empty() {
            return Err(JSONPathError::parse("Empty JSONPath expression", 0, input).into());
        }

        Ok(Self {
            input,
            chars: input.chars().peekable(),
            position: 0,
        })
    }

    /// Parse the JSONPath expression into an AST
    pub fn parse(mut self) -> Result<Expression> {
        let root = self.parse_root()?;
        let mut selectors = Vec::new();

        loop {
            self.skip_whitespace();
            if self.is_at_end() {
                break;
            }

            let after_descent = matches!(selectors.last(), Some(Selector::RecursiveDescent));
            let selector = self.parse_selector(after_descent)?;
            selectors.push(selector);
        }

        Ok(Expression::new(root, selectors))
    }

    /// Parse the root selector ($)
    fn parse_root(&mut self) -> Result<Selector> {
        self.skip_whitespace();

        if self.current_char() != Some('$') {
            return Err(JSONPathError::syntax(
                "JSONPath must start with $",
                self.position,
                self.input,
                vec!["$".to_string()],
                self.found(),
            )
            .into());
        }

        self.advance();
        Ok(Selector::Root)
    }

    /// Parse a selector
    fn parse_selector(&mut self, after_descent: bool) -> Result<Selector> {
        match self.current_char() {
            Some('.') => self.parse_dot_selector(),
            Some('[') => self.parse_bracket_selector(),
            Some('*') if after_descent => {
                self.advance();
                Ok(Selector::Wildcard)
            }
            Some(ch) if after_descent && is_identifier_start(ch) => {
                let property = self.parse_identifier()?;
                Ok(Selector::Child(ChildSelector::Property(property)))
            }
            Some(ch) => Err(JSONPathError::syntax(
                "Unexpected character in selector",
                self.position,
                self.input,
                vec![".".to_string(), "[".to_string()],
                ch.to_string(),
            )
            .into()),
            None => Err(JSONPathError::parse("Unexpected end of input", self.position, self.input).into()),
        }
    }

    /// Parse dot notation selector (.property, .*, .[...] or ..)
    fn parse_dot_selector(&mut self) -> Result<Selector> {
        self.advance(); // consume '.'

        match self.current_char() {
            Some('.') => {
                self.advance();
                if self.is_at_end() {
                    return Err(JSONPathError::parse(
                        "Recursive descent must be followed by a selector",
                        self.position,
                        self.input,
                    )
                    .into());
                }
                Ok(Selector::RecursiveDescent)
            }
            Some('*') => {
                self.advance();
                Ok(Selector::Wildcard)
            }
            // `$.['key']`, produced when a bracketed path is prefixed with `$.`
            Some('[') => self.parse_bracket_selector(),
            _ => {
                let property = self.parse_identifier()?;
                Ok(Selector::Child(ChildSelector::Property(property)))
            }
        }
    }

    /// Parse bracket notation selector, a single item or a union
    fn parse_bracket_selector(&mut self) -> Result<Selector> {
        let start_pos = self.position;
        self.advance(); // consume '['

        let mut items = Vec::new();
        loop {
            self.skip_whitespace();
            items.push(self.parse_bracket_item(start_pos)?);
            self.skip_whitespace();

            match self.current_char() {
                Some(',') => {
                    self.advance();
                }
                Some(']') => {
                    self.advance();
                    break;
                }
                Some(ch) => {
                    return Err(JSONPathError::syntax(
                        "Invalid character in bracket selector",
                        self.position,
                        self.input,
                        vec![",".to_string(), "]".to_string()],
                        ch.to_string(),
                    )
                    .into());
                }
                None => {
                    return Err(JSONPathError::parse(
                        "Unterminated bracket selector",
                        start_pos,
                        self.input,
                    )
                    .into());
                }
            }
        }

        if items.len() == 1 {
            Ok(items.remove(0))
        } else {
            Ok(Selector::Union(UnionSelector { selectors: items }))
        }
    }

    fn parse_bracket_item(&mut self, bracket_start: usize) -> Result<Selector> {
        match self.current_char() {
            Some('\'') | Some('"') => {
                let property = self.parse_quoted_string()?;
                Ok(Selector::Child(ChildSelector::QuotedProperty(property)))
            }
            Some('*') => {
                self.advance();
                Ok(Selector::Wildcard)
            }
            Some('?') => Err(JSONPathError::unsupported(
                format!("filter expression at position {}", self.position),
                Some("an explicit key, index or slice".to_string()),
            )
            .into()),
            Some(ch) if ch.is_ascii_digit() || ch == '-' || ch == ':' => self.parse_index_or_slice(),
            Some(ch) => Err(JSONPathError::syntax(
                "Invalid character in bracket selector",
                self.position,
                self.input,
                vec![
                    "digit".to_string(),
                    ":".to_string(),
                    "*".to_string(),
                    "quoted name".to_string(),
                ],
                ch.to_string(),
            )
            .into()),
            None => Err(JSONPathError::parse(
                "Unterminated bracket selector",
                bracket_start,
                self.input,
            )
            .into()),
        }
    }

    fn parse_index_or_slice(&mut self) -> Result<Selector> {
        let start_pos = self.position;
        let mut part = String::new();

        while let Some(ch) = self.current_char() {
            if ch.is_ascii_digit() || ch == '-' || ch == ':' {
                part.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        if part.contains(':') {
            self.parse_slice_from_string(&part, start_pos)
        } else {
            self.parse_index_from_string(&part, start_pos)
        }
    }

    /// Parse slice from string representation
    fn parse_slice_from_string(&self, s: &str, position: usize) -> Result<Selector> {
        let parts: Vec<&str> = s.split(':').collect();
        if parts.len() > 3 {
            return Err(JSONPathError::parse(
                format!("Invalid slice: {}", s),
                position,
                self.input,
            )
            .into());
        }

        let bound = |text: &str, what: &str| -> Result<Option<i64>> {
            if text.is_empty() {
                return Ok(None);
            }
            text.parse().map(Some).map_err(|_| {
                JSONPathError::parse(format!("Invalid slice {}: {}", what, text), position, self.input)
                    .into()
            })
        };

        let start = bound(parts[0], "start")?;
        let end = bound(parts.get(1).copied().unwrap_or(""), "end")?;
        let step = bound(parts.get(2).copied().unwrap_or(""), "step")?.unwrap_or(1);

        if step == 0 {
            return Err(JSONPathError::parse("Slice step cannot be zero", position, self.input).into());
        }

        Ok(Selector::Slice(SliceSelector { start, end, step }))
    }

    /// Parse index from string representation
    fn parse_index_from_string(&self, s: &str, position: usize) -> Result<Selector> {
        let index: i64 = s.parse().map_err(|_| {
            JSONPathError::parse(format!("Invalid array index: {}", s), position, self.input)
        })?;

        let index_selector = if index < 0 {
            IndexSelector::Negative(index.unsigned_abs() as usize)
        } else {
            IndexSelector::Positive(index as usize)
        };

        Ok(Selector::Index(index_selector))
    }

    /// Parse an identifier; `-` is allowed after the first character
    fn parse_identifier(&mut self) -> Result<String> {
        if !self.current_char().map(is_identifier_start).unwrap_or(false) {
            return Err(JSONPathError::syntax(
                "Expected identifier",
                self.position,
                self.input,
                vec!["letter or _".to_string()],
                self.found(),
            )
            .into());
        }

        let mut identifier = String::new();
        while let Some(ch) = self.current_char() {
            if ch.is_alphanumeric() || ch == '_' || ch == '-' {
                identifier.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        Ok(identifier)
    }

    /// Parse a quoted string
    fn parse_quoted_string(&mut self) -> Result<String> {
        let start_pos = self.position;
        let Some(quote_char) = self.advance() else {
            return Err(JSONPathError::parse("Expected quoted string", start_pos, self.input).into());
        };

        let mut string = String::new();
        let mut escaped = false;

        while let Some(ch) = self.advance() {
            if escaped {
                match ch {
                    'n' => string.push('\n'),
                    'r' => string.push('\r'),
                    't' => string.push('\t'),
                    '\\' => string.push('\\'),
                    '\'' => string.push('\''),
                    '"' => string.push('"'),
                    _ => {
                        string.push('\\');
                        string.push(ch);
                    }
                }
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == quote_char {
                return Ok(string);
            } else {
                string.push(ch);
            }
        }

        Err(JSONPathError::parse("Unterminated string literal", start_pos, self.input).into())
    }

    /// Skip whitespace characters
    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.current_char() {
            if ch.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    /// Get current character without advancing
    fn current_char(&mut self) -> Option<char> {
        self.chars.peek().copied()
    }

    fn found(&mut self) -> String {
        self.current_char()
            .map(|c| c.to_string())
            .unwrap_or_else(|| "EOF".to_string())
    }

    /// Advance to next character
    fn advance(&mut self) -> Option<char> {
        let ch = self.chars.next()?;
        self.position += ch.len_utf8();
        Some(ch)
    }

    /// Check if at end of input
    fn is_at_end(&mut self) -> bool {
        self.current_char().is_none()
    }
}

fn is_identifier_start(ch: char) -> bool {
    ch.is_alphabetic() || ch == '_'
}
