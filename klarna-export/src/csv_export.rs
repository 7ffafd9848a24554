//! Write transactions as `Date,Payee,Amount` CSV and read them back.
//!
//! Payees never contain commas (they are replaced by spaces while parsing), so
//! fields are written unquoted.

use klarna_ingest::{DateStyle, Transaction};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use thiserror::Error;

pub const CSV_HEADER: [&str; 3] = ["Date", "Payee", "Amount"];

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, ExportError>;

/// One exported line as read back from disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CsvRow {
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "Payee")]
    pub payee: String,
    #[serde(rename = "Amount")]
    pub amount: Decimal,
}

pub fn write_csv_to<W: Write>(
    writer: W,
    transactions: &[Transaction],
    style: DateStyle,
) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Never)
        .from_writer(writer);

    wtr.write_record(CSV_HEADER)?;
    for t in transactions {
        wtr.write_record([
            t.date_string(style),
            t.payee.replace(',', " "),
            format!("{:.2}", t.amount),
        ])?;
    }
    wtr.flush().map_err(csv::Error::from)?;
    Ok(())
}

pub fn write_csv(
    path: impl AsRef<Path>,
    transactions: &[Transaction],
    style: DateStyle,
) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|source| ExportError::Io {
        path: path.display().to_string(),
        source,
    })?;
    write_csv_to(file, transactions, style)?;
    log::info!("wrote {} transactions to {}", transactions.len(), path.display());
    Ok(())
}

pub fn read_csv(path: impl AsRef<Path>) -> Result<Vec<CsvRow>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path.as_ref())?;

    let mut rows = Vec::new();
    for result in rdr.deserialize() {
        rows.push(result?);
    }
    Ok(rows)
}
