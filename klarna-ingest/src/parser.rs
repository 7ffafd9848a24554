//! Finite-state parser turning the token stream into transactions.
//!
//! One day in the export looks like
//!   DATE, AMOUNT (running balance), then one or more
//!   TEXT (payee), TEXT (category), AMOUNT (purchase)
//! so after a purchase the next token is either another payee or the next date.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::fmt;
use std::str::FromStr;

use crate::config::ParserConfig;
use crate::error::{ParseError, Result};
use crate::months::month_number;
use crate::tokenizer::Tokenizer;
use crate::types::{Token, TokenKind, Transaction, sanitize_payee};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParserState {
    /// Skipping header lines until the first date.
    Init,
    ExpectDate,
    ExpectBalance,
    ExpectPayee,
    ExpectCategory,
    ExpectAmount,
    ExpectPayeeOrDate,
}

impl fmt::Display for ParserState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ParserState::Init => "INIT",
            ParserState::ExpectDate => "EXPECT_DATE",
            ParserState::ExpectBalance => "EXPECT_BALANCE",
            ParserState::ExpectPayee => "EXPECT_PAYEE",
            ParserState::ExpectCategory => "EXPECT_CATEGORY",
            ParserState::ExpectAmount => "EXPECT_AMOUNT",
            ParserState::ExpectPayeeOrDate => "EXPECT_PAYEE_OR_DATE",
        };
        f.write_str(name)
    }
}

/// Convert `"7. Apr."` into a date in `year`.
pub fn parse_statement_date(raw: &str, year: i32) -> Result<NaiveDate> {
    let invalid = || ParseError::InvalidDate {
        date: raw.to_string(),
    };

    let (day, month) = raw.split_once('.').ok_or_else(invalid)?;
    let month_name = month.trim();
    let month = month_number(month_name).ok_or_else(|| ParseError::UnknownMonth {
        month: month_name.to_string(),
        date: raw.to_string(),
    })?;
    let day: u32 = day.trim().parse().map_err(|_| invalid())?;

    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(invalid)
}

/// Convert an amount payload like `"34,02"` into a two-digit fixed-point value.
pub fn parse_amount(text: &str) -> Result<Decimal> {
    let mut amount =
        Decimal::from_str(&text.replace(',', ".")).map_err(|_| ParseError::MalformedAmount {
            line: text.to_string(),
        })?;
    amount.rescale(2);
    Ok(amount)
}

#[derive(Debug, Clone)]
pub struct StatementParser {
    config: ParserConfig,
}

impl StatementParser {
    pub fn new(config: ParserConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Begin a fresh run; state never carries over between runs.
    pub fn start(&self) -> ParseRun<'_> {
        let state = if self.config.skip_preamble {
            ParserState::Init
        } else {
            ParserState::ExpectDate
        };

        ParseRun {
            config: &self.config,
            state,
            current_date: None,
            current_day_text: None,
            current_payee: None,
        }
    }

    pub fn parse<I>(&self, tokens: I) -> Result<Vec<Transaction>>
    where
        I: IntoIterator<Item = Token>,
    {
        let mut run = self.start();
        let mut out = Vec::new();

        for token in tokens {
            if let Some(txn) = run.step(&token)? {
                out.push(txn);
            }
        }

        run.finish();
        Ok(out)
    }

    /// Stream `lines` through `tokenizer` and the state machine without collecting tokens.
    pub fn parse_lines<I, S>(&self, tokenizer: &Tokenizer, lines: I) -> Result<Vec<Transaction>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut run = self.start();
        let mut out = Vec::new();

        for (i, token) in tokenizer.tokens(lines).enumerate() {
            let token = token?;
            if let Some(txn) = run.step(&token).map_err(|e| e.at_line(i + 1))? {
                out.push(txn);
            }
        }

        run.finish();
        Ok(out)
    }
}

/// State of a single parse: current state plus the half-built transaction.
#[derive(Debug)]
pub struct ParseRun<'c> {
    config: &'c ParserConfig,
    state: ParserState,
    current_date: Option<NaiveDate>,
    current_day_text: Option<String>,
    current_payee: Option<String>,
}

impl ParseRun<'_> {
    pub fn state(&self) -> ParserState {
        self.state
    }

    /// Feed one token. Returns the transaction completed by it, if any.
    pub fn step(&mut self, token: &Token) -> Result<Option<Transaction>> {
        use ParserState::*;

        match (self.state, token.kind) {
            (Init | ExpectDate | ExpectPayeeOrDate, TokenKind::Date) => {
                self.current_date = Some(parse_statement_date(&token.text, self.config.year)?);
                self.current_day_text = token
                    .text
                    .split_once('.')
                    .map(|(day, _)| day.trim().to_string());
                self.state = ExpectBalance;
            }
            (ExpectBalance, TokenKind::Amount) => {
                // running balance
                self.state = ExpectPayee;
            }
            (ExpectPayee | ExpectPayeeOrDate, TokenKind::Text) => {
                self.current_payee = Some(sanitize_payee(&token.text));
                self.state = ExpectCategory;
            }
            (ExpectCategory, TokenKind::Text) => {
                self.state = ExpectAmount;
            }
            (ExpectAmount, TokenKind::Amount) => {
                let amount = parse_amount(&token.text)?;
                let (Some(date), Some(payee)) = (self.current_date, self.current_payee.take())
                else {
                    return Err(self.unexpected(token));
                };
                self.state = ExpectPayeeOrDate;
                return Ok(Some(Transaction {
                    date,
                    payee,
                    amount,
                    day_text: self.current_day_text.clone(),
                }));
            }
            (Init, _) => {
                log::debug!("skipping preamble {token}");
            }
            (state, _) => {
                if self.config.strict {
                    return Err(self.unexpected(token));
                }
                log::debug!("dropping {token} in state {state}");
            }
        }

        Ok(None)
    }

    /// End the run. A cycle cut off by the end of input yields nothing.
    pub fn finish(self) -> ParserState {
        if !matches!(
            self.state,
            ParserState::Init | ParserState::ExpectDate | ParserState::ExpectPayeeOrDate
        ) {
            log::debug!("statement ended mid-cycle in state {}", self.state);
        }
        self.state
    }

    fn unexpected(&self, token: &Token) -> ParseError {
        ParseError::UnexpectedToken {
            state: self.state,
            token: token.clone(),
        }
    }
}
