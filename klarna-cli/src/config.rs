use anyhow::{Context, Result};
use klarna_ingest::{DateStyle, ParserConfig};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Contents of `config.toml`. Every key is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub parser: ParserSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserSection {
    /// Year assigned to statement dates; defaults to the current year.
    pub year: Option<i32>,
    pub strict: bool,
    pub debug: bool,
    pub skip_preamble: bool,
    pub date_style: DateStyle,
}

impl Default for ParserSection {
    fn default() -> Self {
        let base = ParserConfig::default();
        Self {
            year: None,
            strict: base.strict,
            debug: base.debug,
            skip_preamble: base.skip_preamble,
            date_style: base.date_style,
        }
    }
}

impl ParserSection {
    pub fn to_parser_config(&self) -> ParserConfig {
        let mut cfg = ParserConfig::default()
            .with_strict(self.strict)
            .with_debug(self.debug)
            .with_skip_preamble(self.skip_preamble)
            .with_date_style(self.date_style);
        if let Some(year) = self.year {
            cfg.year = year;
        }
        cfg
    }
}

/// `$HOME/.klarna2csv/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    let home = std::env::var("HOME").ok()?;
    Some(PathBuf::from(home).join(".klarna2csv").join("config.toml"))
}

pub fn read_config(path: &Path) -> Result<Config> {
    let s = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    toml::from_str(&s).with_context(|| format!("parse {}", path.display()))
}

/// An explicit path must exist; the default location is optional.
pub fn load_config(explicit: Option<&Path>) -> Result<Config> {
    if let Some(p) = explicit {
        return read_config(p);
    }
    match default_config_path() {
        Some(p) if p.exists() => read_config(&p),
        _ => Ok(Config::default()),
    }
}
