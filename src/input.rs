//! Whitespace-tokenized reader over the judge's line-oriented input.
//!
//! The protocol is position dependent: callers consume exactly the tokens the
//! current phase dictates, in order. There is no lookahead or backtracking.

use std::collections::VecDeque;
use std::io::BufRead;
use std::str::FromStr;

use crate::error::{ProtocolError, ProtocolResult};

/// Token cursor over a buffered input source.
#[derive(Debug)]
pub struct TokenStream<R> {
    reader: R,
    /// Unconsumed tokens of the current line.
    tokens: VecDeque<String>,
    /// One-based number of the last line read.
    line: usize,
}

impl<R: BufRead> TokenStream<R> {
    /// Create a token stream over the given reader.
    #[must_use]
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            tokens: VecDeque::new(),
            line: 0,
        }
    }

    /// One-based number of the last line read (0 before the first read).
    #[must_use]
    pub const fn line(&self) -> usize {
        self.line
    }

    /// Read one raw line, without tokenizing it.
    ///
    /// Trailing line terminators are stripped.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::PendingTokens`] if tokens of the previous line
    /// are still unconsumed, [`ProtocolError::EndOfInput`] if the stream is
    /// closed, or [`ProtocolError::Io`] if the read fails.
    pub fn next_line(&mut self) -> ProtocolResult<String> {
        if !self.tokens.is_empty() {
            return Err(ProtocolError::PendingTokens {
                count: self.tokens.len(),
                line: self.line,
            });
        }
        let mut buf = String::new();
        let read = self.reader.read_line(&mut buf).map_err(ProtocolError::Io)?;
        if read == 0 {
            return Err(ProtocolError::EndOfInput);
        }
        self.line += 1;
        let trimmed = buf.trim_end_matches(&['\r', '\n'][..]).len();
        buf.truncate(trimmed);
        Ok(buf)
    }

    /// Next whitespace-delimited token, reading further lines as needed.
    ///
    /// Blank lines are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::EndOfInput`] if the stream closes before a
    /// token is available, or [`ProtocolError::Io`] if the read fails.
    pub fn next_token(&mut self) -> ProtocolResult<String> {
        loop {
            if let Some(token) = self.tokens.pop_front() {
                return Ok(token);
            }
            let line = self.next_line()?;
            self.tokens
                .extend(line.split_whitespace().map(str::to_string));
        }
    }

    /// Next token as a signed integer.
    ///
    /// # Errors
    ///
    /// Fails if no token is available or it is not an integer.
    pub fn next_int(&mut self) -> ProtocolResult<i32> {
        self.next_as("integer")
    }

    /// Next token as a non-negative integer id.
    ///
    /// # Errors
    ///
    /// Fails if no token is available or it is not a non-negative integer.
    pub fn next_id(&mut self) -> ProtocolResult<u32> {
        self.next_as("id")
    }

    /// Next token as a floating-point number.
    ///
    /// # Errors
    ///
    /// Fails if no token is available or it is not a number.
    pub fn next_float(&mut self) -> ProtocolResult<f64> {
        self.next_as("float")
    }

    /// Next token as a boolean (`true`/`false`, any ASCII case).
    ///
    /// # Errors
    ///
    /// Fails if no token is available or it is not a boolean.
    pub fn next_bool(&mut self) -> ProtocolResult<bool> {
        let token = self.next_token()?;
        parse_bool(&token).ok_or(ProtocolError::InvalidToken {
            token,
            expected: "boolean",
            line: self.line,
        })
    }

    /// Next token as a count, rejecting negative values.
    ///
    /// # Errors
    ///
    /// Fails if no token is available, it is not an integer, or it is negative.
    pub fn next_count(&mut self, what: &'static str) -> ProtocolResult<usize> {
        let count = self.next_int()?;
        usize::try_from(count).map_err(|_| ProtocolError::NegativeCount { what, count })
    }

    /// Next token parsed as `T`; `expected` names the type in errors.
    ///
    /// # Errors
    ///
    /// Fails if no token is available or it does not parse.
    pub fn next_as<T: FromStr>(&mut self, expected: &'static str) -> ProtocolResult<T> {
        let token = self.next_token()?;
        match token.parse() {
            Ok(value) => Ok(value),
            Err(_) => Err(ProtocolError::InvalidToken {
                token,
                expected,
                line: self.line,
            }),
        }
    }
}

/// Parse `true`/`false` in any ASCII case.
#[must_use]
pub fn parse_bool(token: &str) -> Option<bool> {
    if token.eq_ignore_ascii_case("true") {
        Some(true)
    } else if token.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}
