use anyhow::{Context, Result, bail};
use clap::Parser;
use klarna_export::write_csv;
use klarna_ingest::{DateStyle, ParserConfig, SAMPLE_STATEMENT, Transaction, parse_statement_text};
use serde_json::{Value, json};
use std::borrow::Cow;
use std::fs;
use std::path::PathBuf;

mod config;

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("KLARNA2CSV_BUILD_SHA"),
    ")"
);

#[derive(Parser, Debug)]
#[command(
    name = "klarna2csv",
    version,
    long_version = LONG_VERSION,
    about = "Convert a Klarna statement text export into Date,Payee,Amount CSV"
)]
struct Cli {
    /// Statement text export (defaults to a built-in example statement)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// CSV file to write (defaults to printing the transactions)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Config file (defaults to ~/.klarna2csv/config.toml if present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Year assigned to statement dates (default: current year)
    #[arg(long)]
    year: Option<i32>,

    /// Fail on lines that do not fit the statement layout instead of skipping them
    #[arg(long)]
    strict: bool,

    /// Trace every tokenized line
    #[arg(long)]
    debug: bool,

    /// Zero-pad the day in output dates (2026-04-07 instead of 2026-04-7)
    #[arg(long)]
    iso_dates: bool,

    /// Print transactions as JSON instead of a listing
    #[arg(long, conflicts_with = "output")]
    json: bool,
}

impl Cli {
    /// Flags win over the config file.
    fn apply(&self, mut cfg: ParserConfig) -> ParserConfig {
        if let Some(year) = self.year {
            cfg.year = year;
        }
        if self.strict {
            cfg.strict = true;
        }
        if self.debug {
            cfg.debug = true;
        }
        if self.iso_dates {
            cfg.date_style = DateStyle::Iso;
        }
        cfg
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let file_config = config::load_config(cli.config.as_deref())?;
    let parser_config = cli.apply(file_config.parser.to_parser_config());
    init_logging(parser_config.debug);

    let (text, source): (Cow<'static, str>, String) = match &cli.input {
        Some(path) => {
            if !path.is_file() {
                bail!("Input file {} does not exist.", path.display());
            }
            let text =
                fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
            (Cow::Owned(text), path.display().to_string())
        }
        None => {
            log::info!("no --input given, using the built-in example statement");
            (Cow::Borrowed(SAMPLE_STATEMENT), "example statement".to_string())
        }
    };

    let txns = parse_statement_text(&text, &parser_config)
        .with_context(|| format!("parsing {source}"))?;

    match &cli.output {
        Some(path) => {
            write_csv(path, &txns, parser_config.date_style)
                .with_context(|| format!("writing {}", path.display()))?;
            println!(
                "Wrote {} transactions from {} to {}",
                txns.len(),
                source,
                path.display()
            );
        }
        None if cli.json => {
            let rows = json_rows(&txns, parser_config.date_style);
            println!("{}", serde_json::to_string_pretty(&rows)?);
        }
        None => {
            println!("Parsed {} transactions from {}\n", txns.len(), source);
            for t in &txns {
                println!(
                    "{} | {} | {:.2}",
                    t.date_string(parser_config.date_style),
                    t.payee,
                    t.amount
                );
            }
        }
    }

    Ok(())
}

/// Same date rendering as the CSV and the listing.
fn json_rows(txns: &[Transaction], style: DateStyle) -> Value {
    txns.iter()
        .map(|t| {
            json!({
                "date": t.date_string(style),
                "payee": t.payee,
                "amount": t.amount,
            })
        })
        .collect()
}

fn init_logging(debug: bool) {
    let default_filter = if debug { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_config() {
        let cli = Cli::parse_from(["klarna2csv", "--year", "2023", "--strict", "--iso-dates"]);
        let cfg = cli.apply(ParserConfig::for_year(2030));
        assert_eq!(cfg.year, 2023);
        assert!(cfg.strict);
        assert!(!cfg.debug);
        assert_eq!(cfg.date_style, DateStyle::Iso);
    }

    #[test]
    fn test_absent_flags_keep_config() {
        let cli = Cli::parse_from(["klarna2csv", "-i", "statement.txt"]);
        let base = ParserConfig::for_year(2030).with_strict(true);
        assert_eq!(cli.apply(base.clone()), base);
        assert_eq!(cli.input, Some(PathBuf::from("statement.txt")));
    }

    #[test]
    fn test_json_rows_follow_date_style() {
        let txns = parse_statement_text(SAMPLE_STATEMENT, &ParserConfig::for_year(2025)).unwrap();

        let legacy = json_rows(&txns, DateStyle::Legacy);
        assert_eq!(legacy[0]["date"], "2025-04-7");
        assert_eq!(legacy[0]["payee"], "APOTHEKE E.K.");
        assert_eq!(legacy[0]["amount"], "34.02");

        let iso = json_rows(&txns, DateStyle::Iso);
        assert_eq!(iso[0]["date"], "2025-04-07");
        assert_eq!(iso.as_array().map(Vec::len), Some(4));
    }

    #[test]
    fn test_json_conflicts_with_output() {
        let res = Cli::try_parse_from(["klarna2csv", "--json", "-o", "out.csv"]);
        assert!(res.is_err());
    }
}
