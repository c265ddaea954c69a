//! Cursor over the significant tokens of a lexed buffer.
//!
//! Every grammar matcher follows the same discipline: on entry the current
//! token is the first token of its fragment, on exit the cursor sits one past
//! the last token it consumed.

use std::fmt;

use cli_common::ParseError;

use crate::token::{Ident, Keyword, LocatableToken, Slice, Token, TokenKind, Value};

/// One acceptable shape for the token under the cursor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Matcher {
    /// Any token of this kind.
    Kind(TokenKind),
    /// This exact keyword.
    Keyword(Keyword),
    /// An identifier spelled like this word, ignoring ASCII case.
    Word(&'static str),
    /// An identifier spelled exactly like this word.
    Exact(&'static str),
}

impl Matcher {
    pub fn matches(&self, token: &Token, source: &str) -> bool {
        match (self, token) {
            (Matcher::Kind(kind), token) => token.kind() == *kind,
            (Matcher::Keyword(keyword), Token::Keyword(actual)) => keyword == actual,
            (Matcher::Word(word), Token::Identifier(ident)) => source
                .get(ident.value.start..ident.value.end)
                .is_some_and(|text| text.eq_ignore_ascii_case(word)),
            (Matcher::Exact(word), Token::Identifier(ident)) => {
                source.get(ident.value.start..ident.value.end) == Some(*word)
            }
            _ => false,
        }
    }
}

impl fmt::Display for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Matcher::Kind(kind) => write!(f, "{kind}"),
            Matcher::Keyword(keyword) => write!(f, "{keyword}"),
            Matcher::Word(word) | Matcher::Exact(word) => f.write_str(word),
        }
    }
}

/// Render a matcher set for an error message, e.g. `TABLE, TEMP or TEMPORARY`.
pub fn describe_expected(expecting: &[Matcher]) -> String {
    let names: Vec<String> = expecting.iter().map(|m| m.to_string()).collect();

    match names.split_last() {
        None => String::from("nothing"),
        Some((last, [])) => last.clone(),
        Some((last, rest)) => format!("{} or {}", rest.join(", "), last),
    }
}

pub struct TokenStream<'a> {
    tokens: Vec<LocatableToken>,
    source: &'a str,
    pos: usize,
    held: Option<LocatableToken>,
}

impl<'a> TokenStream<'a> {
    /// Build a cursor over `tokens`, dropping whitespace, comments and the
    /// end marker.
    pub fn new(tokens: Vec<LocatableToken>, source: &'a str) -> Self {
        let tokens = tokens
            .into_iter()
            .filter(|t| t.token.is_significant())
            .collect();

        TokenStream {
            tokens,
            source,
            pos: 0,
            held: None,
        }
    }

    pub fn source(&self) -> &'a str {
        self.source
    }

    /// Offset reported for errors raised at end of input.
    pub fn end_position(&self) -> usize {
        self.source.len()
    }

    /// True once every token has been consumed.
    pub fn done(&self) -> bool {
        self.held.is_none() && self.pos >= self.tokens.len()
    }

    /// Lookahead of one without failing at end of input.
    pub fn peek(&self) -> Option<&LocatableToken> {
        self.held.as_ref().or_else(|| self.tokens.get(self.pos))
    }

    /// The shape of the token under the cursor, if any.
    pub fn peek_token(&self) -> Option<Token> {
        self.peek().map(|t| t.token)
    }

    /// True if the token under the cursor matches `matcher`.
    pub fn next_is(&self, matcher: Matcher) -> bool {
        self.peek()
            .is_some_and(|t| matcher.matches(&t.token, self.source))
    }

    /// The token under the cursor. Callers must not reach past the end; doing
    /// so is a defect in the caller, not a syntax error.
    pub fn current(&self) -> Result<&LocatableToken, ParseError> {
        self.peek()
            .ok_or_else(|| ParseError::internal("read past end of token stream", self.end_position()))
    }

    /// Consume and return the token under the cursor.
    pub fn advance(&mut self) -> Result<LocatableToken, ParseError> {
        if let Some(token) = self.held.take() {
            log::trace!("advance (held) {:?}", token.token);
            return Ok(token);
        }

        let token = *self.current()?;
        self.pos += 1;
        log::trace!("advance {:?} at {}", token.token, token.position);

        Ok(token)
    }

    /// Validate the token under the cursor against `expecting`, then consume it.
    pub fn advance_expecting(&mut self, expecting: &[Matcher]) -> Result<LocatableToken, ParseError> {
        self.check(expecting)?;
        self.advance()
    }

    /// Validate the token under the cursor against `expecting` without moving.
    pub fn check(&self, expecting: &[Matcher]) -> Result<&LocatableToken, ParseError> {
        match self.peek() {
            Some(token) if expecting.iter().any(|m| m.matches(&token.token, self.source)) => {
                Ok(token)
            }
            Some(token) => Err(ParseError::unexpected(
                self.describe(&token.token),
                describe_expected(expecting),
                token.position,
            )),
            None => Err(ParseError::unexpected_eof(
                describe_expected(expecting),
                self.end_position(),
            )),
        }
    }

    /// Undo the last `advance`, making `token` current again. Only one token
    /// can be held back at a time.
    pub fn push(&mut self, token: LocatableToken) -> Result<(), ParseError> {
        if let Some(held) = self.held {
            return Err(ParseError::internal(
                format!("pushback slot already holds {:?}", held.token),
                token.position,
            ));
        }

        log::trace!("push back {:?}", token.token);
        self.held = Some(token);

        Ok(())
    }

    /// Source text covered by `slice`.
    pub fn text(&self, slice: Slice) -> &'a str {
        self.source.get(slice.start..slice.end).unwrap_or_default()
    }

    /// Name carried by an identifier token, with doubled quotes collapsed.
    pub fn identifier(&self, ident: Ident) -> String {
        let text = self.text(ident.value);

        match ident.quote {
            Some(close) => text.replace(&format!("{close}{close}"), &close.to_string()),
            None => String::from(text),
        }
    }

    /// Human readable name of a token for error messages.
    pub fn describe(&self, token: &Token) -> String {
        match token {
            Token::Keyword(keyword) => format!("keyword {keyword}"),
            Token::Identifier(ident) => format!("identifier \"{}\"", self.text(ident.value)),
            Token::Value(Value::SingleQuoted(slice)) => {
                format!("string literal '{}'", self.text(*slice))
            }
            Token::Numeric(slice) => format!("integer literal {}", self.text(*slice)),
            Token::Unknown(slice) => format!("unrecognised input \"{}\"", self.text(*slice)),
            token => match token.symbol() {
                Some(symbol) => format!("'{symbol}'"),
                None => token.kind().to_string(),
            },
        }
    }
}
