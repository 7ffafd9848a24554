use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::DateStyle;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenKind {
    Date,
    Amount,
    Text,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::Date => "DATE",
            TokenKind::Amount => "AMOUNT",
            TokenKind::Text => "TEXT",
        };
        f.write_str(name)
    }
}

/// One classified statement line.
///
/// For `Amount` the text is the bare numeric part (`"34,02"`), for `Date` the
/// matched date fragment (`"7. Apr."`), for `Text` the trimmed line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    pub fn date(text: impl Into<String>) -> Self {
        Self::new(TokenKind::Date, text)
    }

    pub fn amount(text: impl Into<String>) -> Self {
        Self::new(TokenKind::Amount, text)
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::new(TokenKind::Text, text)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({:?})", self.kind, self.text)
    }
}

/// A single purchase parsed from the statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub date: NaiveDate,
    /// Commas are replaced by spaces so the CSV needs no quoting.
    pub payee: String,
    pub amount: Decimal,
    /// Day of month as written in the statement ("07" stays "07").
    #[serde(skip)]
    pub(crate) day_text: Option<String>,
}

impl Transaction {
    pub fn new(date: NaiveDate, payee: &str, amount: Decimal) -> Self {
        Self {
            date,
            payee: sanitize_payee(payee),
            amount,
            day_text: None,
        }
    }

    /// Render the date the way the CSV output expects it.
    pub fn date_string(&self, style: DateStyle) -> String {
        match style {
            DateStyle::Legacy => match &self.day_text {
                Some(day) => format!("{}-{:02}-{}", self.date.year(), self.date.month(), day),
                None => format!(
                    "{}-{:02}-{}",
                    self.date.year(),
                    self.date.month(),
                    self.date.day()
                ),
            },
            DateStyle::Iso => self.date.format("%Y-%m-%d").to_string(),
        }
    }
}

pub(crate) fn sanitize_payee(raw: &str) -> String {
    raw.replace(',', " ").trim().to_string()
}
