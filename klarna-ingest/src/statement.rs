//! Whole-statement helpers: line preparation and the built-in sample export.

use crate::config::ParserConfig;
use crate::error::Result;
use crate::parser::StatementParser;
use crate::tokenizer::Tokenizer;
use crate::types::Transaction;

/// Used when no input file is given. Ends with a day whose purchase has no amount yet.
pub const SAMPLE_STATEMENT: &str = " Example Klarna statement
7. Apr.
· 34,02 €

APOTHEKE E.K.
Self-Care
34,02 €
5. Apr.
· 70,13 €

Rewe Center
Nahrungsmittel
49,78 €

Metzgerei
Nahrungsmittel
20,35 €
4. Apr.
· 54,31 €

Rewe Center
Nahrungsmittel
54,31 €
3. Apr.
· 86,58 €

Spielwarenladen
Familie
";

/// Trimmed, non-blank lines of `text`, in order.
pub fn statement_lines(text: &str) -> impl Iterator<Item = &str> {
    text.lines().map(str::trim).filter(|line| !line.is_empty())
}

pub fn parse_statement_text(text: &str, config: &ParserConfig) -> Result<Vec<Transaction>> {
    let tokenizer = Tokenizer::from_config(config)?;
    let parser = StatementParser::new(config.clone());
    let txns = parser.parse_lines(&tokenizer, statement_lines(text))?;
    log::info!("parsed {} transactions", txns.len());
    Ok(txns)
}
