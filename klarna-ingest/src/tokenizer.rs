//! Line classifier: every non-blank statement line becomes a DATE, AMOUNT or TEXT token.
//!
//! Expected export (one value per line, blank lines already removed):
//!   7. Apr.
//!   · 34,02 €
//!   EISBAER APOTHEKE E.K.
//!   Self-Care
//!   34,02 €

use regex::Regex;

use crate::config::ParserConfig;
use crate::error::{ParseError, Result};
use crate::months::month_number;
use crate::types::Token;

const CURRENCY_MARKER: char = '€';

/// Receives every (line, token) pair the tokenizer produces. Must not affect tokenizing.
pub trait TokenObserver {
    fn observe(&self, line: &str, token: &Token);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SilentObserver;

impl TokenObserver for SilentObserver {
    fn observe(&self, _line: &str, _token: &Token) {}
}

/// Emits the trace at `debug` level.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogObserver;

impl TokenObserver for LogObserver {
    fn observe(&self, line: &str, token: &Token) {
        log::debug!("tokenized {line:?} -> {token}");
    }
}

pub struct Tokenizer {
    amount_re: Regex,
    date_re: Regex,
    observer: Box<dyn TokenObserver>,
}

impl Tokenizer {
    pub fn new() -> Result<Self> {
        Self::with_observer(SilentObserver)
    }

    /// Tracing is switched on by `config.debug`.
    pub fn from_config(config: &ParserConfig) -> Result<Self> {
        if config.debug {
            Self::with_observer(LogObserver)
        } else {
            Self::with_observer(SilentObserver)
        }
    }

    pub fn with_observer(observer: impl TokenObserver + 'static) -> Result<Self> {
        // "34,02 €", "· 1.234,56 €"
        let amount_re = Regex::new(r"(?P<units>\d{1,3}(?:\.\d{3})+|\d+),(?P<cents>\d{2})\s*€")?;
        // "7. Apr.", "15. Sept.", "3. März"
        let date_re = Regex::new(r"^\d{1,2}\.\s*\p{L}+(?:\.|$)")?;

        Ok(Self {
            amount_re,
            date_re,
            observer: Box::new(observer),
        })
    }

    /// Classify one line. Surrounding whitespace is ignored; a blank line is a caller bug.
    pub fn tokenize_line(&self, line: &str) -> Result<Token> {
        let line = line.trim();
        if line.is_empty() {
            return Err(ParseError::PreconditionViolation(
                "cannot tokenize an empty line",
            ));
        }

        let token = if line.ends_with(CURRENCY_MARKER) {
            Token::amount(self.extract_amount(line)?)
        } else if let Some(m) = self
            .date_re
            .find(line)
            .filter(|m| is_date_fragment(m.as_str()))
        {
            Token::date(m.as_str())
        } else {
            Token::text(line)
        };

        self.observer.observe(line, &token);
        Ok(token)
    }

    /// Pull the `<units>,<cents>` part out of a euro amount, dropping thousands separators.
    pub fn extract_amount(&self, line: &str) -> Result<String> {
        let caps = self
            .amount_re
            .captures(line)
            .ok_or_else(|| ParseError::MalformedAmount {
                line: line.to_string(),
            })?;

        Ok(format!("{},{}", caps["units"].replace('.', ""), &caps["cents"]))
    }

    /// Lazily tokenize `lines`; iteration stops after the first error.
    pub fn tokens<I, S>(&self, lines: I) -> Tokens<'_, I::IntoIter>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Tokens {
            tokenizer: self,
            lines: lines.into_iter(),
            index: 0,
            failed: false,
        }
    }

    pub fn tokenize_lines<I, S>(&self, lines: I) -> Result<Vec<Token>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.tokens(lines).collect()
    }
}

/// Without a closing period only the table's own spelling counts ("3. März", not "2. Hand").
fn is_date_fragment(fragment: &str) -> bool {
    if fragment.ends_with('.') {
        return true;
    }
    fragment
        .split_once('.')
        .is_some_and(|(_, month)| month_number(month.trim()).is_some())
}

/// Single-pass token stream over statement lines. Errors carry the 1-based line index.
pub struct Tokens<'t, I> {
    tokenizer: &'t Tokenizer,
    lines: I,
    index: usize,
    failed: bool,
}

impl<I, S> Iterator for Tokens<'_, I>
where
    I: Iterator<Item = S>,
    S: AsRef<str>,
{
    type Item = Result<Token>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let line = self.lines.next()?;
        self.index += 1;

        let result = self
            .tokenizer
            .tokenize_line(line.as_ref())
            .map_err(|e| e.at_line(self.index));
        self.failed = result.is_err();
        Some(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TokenKind;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn tokenizer() -> Tokenizer {
        Tokenizer::new().unwrap()
    }

    #[test]
    fn test_tokenize_line() {
        let t = tokenizer();
        assert_eq!(t.tokenize_line("7. Apr.").unwrap(), Token::date("7. Apr."));
        assert_eq!(t.tokenize_line("34,02 €").unwrap(), Token::amount("34,02"));
        assert_eq!(
            t.tokenize_line("EISBAER APOTHEKE E.K.").unwrap(),
            Token::text("EISBAER APOTHEKE E.K.")
        );
    }

    #[test]
    fn test_balance_line_with_bullet() {
        let t = tokenizer();
        assert_eq!(t.tokenize_line("· 70,13 €").unwrap(), Token::amount("70,13"));
        assert_eq!(t.tokenize_line("12,00€").unwrap(), Token::amount("12,00"));
    }

    #[test]
    fn test_extract_amount() {
        let t = tokenizer();
        assert_eq!(t.extract_amount("34,02 €").unwrap(), "34,02");
        assert_eq!(t.extract_amount("1234,56 €").unwrap(), "1234,56");
        assert_eq!(t.extract_amount("1.234,56 €").unwrap(), "1234,56");
        assert_eq!(t.extract_amount("12.345.678,90 €").unwrap(), "12345678,90");
    }

    #[test]
    fn test_invalid_amount_format() {
        let t = tokenizer();
        assert!(matches!(
            t.extract_amount("34.02"),
            Err(ParseError::MalformedAmount { .. })
        ));
        // Ends in the marker, so it must be an amount, and it is not one.
        assert!(matches!(
            t.tokenize_line("34.02 €"),
            Err(ParseError::MalformedAmount { .. })
        ));
        assert!(matches!(
            t.tokenize_line("34,2 €"),
            Err(ParseError::MalformedAmount { .. })
        ));
    }

    #[test]
    fn test_empty_input() {
        let t = tokenizer();
        assert!(matches!(
            t.tokenize_line(""),
            Err(ParseError::PreconditionViolation(_))
        ));
        assert!(matches!(
            t.tokenize_line("   "),
            Err(ParseError::PreconditionViolation(_))
        ));
    }

    #[test]
    fn test_date_variants() {
        let t = tokenizer();
        assert_eq!(t.tokenize_line("15. Jan.").unwrap(), Token::date("15. Jan."));
        assert_eq!(t.tokenize_line("3. März").unwrap(), Token::date("3. März"));
        assert_eq!(t.tokenize_line("1. Mai").unwrap(), Token::date("1. Mai"));
        assert_eq!(t.tokenize_line("30. Juni").unwrap(), Token::date("30. Juni"));
        assert_eq!(t.tokenize_line("21.Sept.").unwrap(), Token::date("21.Sept."));
        // The matched prefix is the payload.
        assert_eq!(t.tokenize_line("7. Apr. 2026").unwrap(), Token::date("7. Apr."));
    }

    #[test]
    fn test_text_lookalikes() {
        let t = tokenizer();
        for line in [
            "1. FC Köln Fanshop",
            "123. Apr.",
            "Apr. 7",
            "Self-Care",
            "E.K.",
            "2. Hand",
            "3. Etage",
            "1. Klasse",
            "4. Maibaum",
        ] {
            assert_eq!(t.tokenize_line(line).unwrap().kind, TokenKind::Text, "{line}");
        }
        assert_eq!(
            t.tokenize_line("  Rewe Center  ").unwrap(),
            Token::text("Rewe Center")
        );
    }

    #[test]
    fn test_tokenize_lines_preserves_order() {
        let lines = ["7. Apr.", "· 34,02 €", "EISBAER APOTHEKE E.K.", "Self-Care", "34,02 €"];
        let kinds: Vec<TokenKind> = tokenizer()
            .tokenize_lines(lines)
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Date,
                TokenKind::Amount,
                TokenKind::Text,
                TokenKind::Text,
                TokenKind::Amount
            ]
        );
    }

    #[test]
    fn test_tokenize_lines_reports_line_and_stops() {
        let t = tokenizer();
        let lines = ["7. Apr.", "34.02 €", "never reached"];
        let err = t.tokenize_lines(lines).unwrap_err();
        assert!(matches!(err, ParseError::AtLine { line: 2, .. }));
        assert!(matches!(err.kind(), ParseError::MalformedAmount { .. }));

        let mut stream = t.tokens(lines);
        assert!(stream.next().unwrap().is_ok());
        assert!(stream.next().unwrap().is_err());
        assert!(stream.next().is_none());
    }

    #[derive(Clone, Default)]
    struct Recorder(Rc<RefCell<Vec<(String, Token)>>>);

    impl TokenObserver for Recorder {
        fn observe(&self, line: &str, token: &Token) {
            self.0.borrow_mut().push((line.to_string(), token.clone()));
        }
    }

    #[test]
    fn test_observer_sees_every_token_without_changing_them() {
        let recorder = Recorder::default();
        let traced = Tokenizer::with_observer(recorder.clone()).unwrap();
        let lines = ["7. Apr.", " · 34,02 € ", "Rewe"];

        let with_trace = traced.tokenize_lines(lines).unwrap();
        let without_trace = tokenizer().tokenize_lines(lines).unwrap();
        assert_eq!(with_trace, without_trace);

        let seen = recorder.0.borrow();
        assert_eq!(seen.len(), 3);
        assert_eq!(seen[1], ("· 34,02 €".to_string(), Token::amount("34,02")));
    }
}
