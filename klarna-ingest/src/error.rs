use thiserror::Error;

use crate::parser::ParserState;
use crate::types::Token;

#[derive(Error, Debug)]
pub enum ParseError {
    /// The tokenizer was handed an empty or blank line.
    #[error("precondition violated: {0}")]
    PreconditionViolation(&'static str),

    #[error("malformed amount in {line:?} (cents separated by a dot instead of a comma?)")]
    MalformedAmount { line: String },

    #[error("unknown month {month:?} in date {date:?}")]
    UnknownMonth { month: String, date: String },

    #[error("invalid date {date:?}")]
    InvalidDate { date: String },

    /// Only raised in strict mode.
    #[error("unexpected {token} while in state {state}")]
    UnexpectedToken { state: ParserState, token: Token },

    #[error("invalid pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("line {line}: {source}")]
    AtLine {
        line: usize,
        #[source]
        source: Box<ParseError>,
    },
}

impl ParseError {
    /// Attach the 1-based index of the offending non-blank line.
    pub fn at_line(self, line: usize) -> Self {
        match self {
            e @ ParseError::AtLine { .. } => e,
            e => ParseError::AtLine {
                line,
                source: Box::new(e),
            },
        }
    }

    /// The underlying error with any line context stripped.
    pub fn kind(&self) -> &ParseError {
        match self {
            ParseError::AtLine { source, .. } => source.kind(),
            e => e,
        }
    }
}

pub type Result<T> = std::result::Result<T, ParseError>;
