//! klarna-export: CSV output for parsed statement transactions.

pub mod csv_export;

pub use csv_export::{CSV_HEADER, CsvRow, ExportError, read_csv, write_csv, write_csv_to};
