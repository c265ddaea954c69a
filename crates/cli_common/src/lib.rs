use thiserror::Error;

#[derive(Clone, PartialEq, Debug, Error)]
#[error("{kind}")]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub position: usize,
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, position: usize) -> Self {
        ParseError { kind, position }
    }

    pub fn unexpected(found: impl Into<String>, expected: impl Into<String>, position: usize) -> Self {
        ParseError::new(
            ParseErrorKind::UnexpectedToken {
                found: found.into(),
                expected: expected.into(),
            },
            position,
        )
    }

    pub fn unexpected_eof(expected: impl Into<String>, position: usize) -> Self {
        ParseError::new(
            ParseErrorKind::UnexpectedEOF {
                expected: expected.into(),
            },
            position,
        )
    }

    pub fn internal(message: impl Into<String>, position: usize) -> Self {
        ParseError::new(ParseErrorKind::Internal(message.into()), position)
    }

    /// True for every error caused by the input text. Only `Internal` errors
    /// point at a defect in the parser itself.
    pub fn is_syntax_error(&self) -> bool {
        !matches!(self.kind, ParseErrorKind::Internal(_))
    }
}

#[derive(Clone, PartialEq, Debug, Error)]
pub enum ParseErrorKind {
    #[error("Unexpected token {found}. Expected {expected}.")]
    UnexpectedToken { found: String, expected: String },
    #[error("Unexpected end of input. Expected {expected}.")]
    UnexpectedEOF { expected: String },
    #[error("Statement expected, found {0}.")]
    UnexpectedStatement(String),
    #[error("Integer literal {0} is out of range.")]
    InvalidInteger(String),
    #[error("Maximum recursion depth reached.")]
    MaximumRecursionDepthReached,
    #[error("Internal parser error: {0}")]
    Internal(String),
}
