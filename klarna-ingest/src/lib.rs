//! klarna-ingest: tokenizer and state-machine parser for Klarna statement text exports.

pub mod config;
pub mod error;
pub mod months;
pub mod parser;
pub mod statement;
pub mod tokenizer;
pub mod types;

pub use config::{DateStyle, ParserConfig};
pub use error::{ParseError, Result};
pub use parser::{ParseRun, ParserState, StatementParser};
pub use statement::{SAMPLE_STATEMENT, parse_statement_text, statement_lines};
pub use tokenizer::{LogObserver, SilentObserver, TokenObserver, Tokenizer, Tokens};
pub use types::{Token, TokenKind, Transaction};
