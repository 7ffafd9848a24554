//! Explicit configuration handed to the tokenizer and parser.

use chrono::{Datelike, Local};
use serde::{Deserialize, Serialize};

/// How transaction dates are rendered on output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateStyle {
    /// `2026-04-7`: month zero-padded, day not.
    #[default]
    Legacy,
    /// `2026-04-07`
    Iso,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Statements only carry day and month; every date lands in this year.
    pub year: i32,
    /// Trace every tokenized line through the `log` facade.
    pub debug: bool,
    /// Fail on tokens that do not fit the current parser state instead of dropping them.
    pub strict: bool,
    /// Skip any header lines before the first date.
    pub skip_preamble: bool,
    pub date_style: DateStyle,
}

impl ParserConfig {
    pub fn for_year(year: i32) -> Self {
        Self {
            year,
            ..Self::default()
        }
    }

    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn with_skip_preamble(mut self, skip: bool) -> Self {
        self.skip_preamble = skip;
        self
    }

    pub fn with_date_style(mut self, style: DateStyle) -> Self {
        self.date_style = style;
        self
    }
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            year: Local::now().year(),
            debug: false,
            strict: false,
            skip_preamble: true,
            date_style: DateStyle::Legacy,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_tolerant_current_year() {
        let cfg = ParserConfig::default();
        assert_eq!(cfg.year, Local::now().year());
        assert!(!cfg.strict);
        assert!(!cfg.debug);
        assert!(cfg.skip_preamble);
        assert_eq!(cfg.date_style, DateStyle::Legacy);
    }

    #[test]
    fn test_partial_json_falls_back_to_defaults() {
        let cfg: ParserConfig =
            serde_json::from_str(r#"{"year": 2024, "date_style": "iso"}"#).unwrap();
        assert_eq!(cfg.year, 2024);
        assert_eq!(cfg.date_style, DateStyle::Iso);
        assert!(cfg.skip_preamble);
        assert!(!cfg.strict);
    }
}
