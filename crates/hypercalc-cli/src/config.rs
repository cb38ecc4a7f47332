//! Configuration loading from TOML files.
//!
//! Lookup order:
//! 1. `$HCALC_CONFIG` environment variable
//! 2. `config.toml` in the platform config dir (e.g. `~/.config/hypercalc/`)
//! 3. Built-in defaults (everything is optional)

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use hypercalc_mcp::SessionOptions;
use hypercalc_parse::{EvalMode, FormulaOptions, ParserOptions};

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub parser: ParserOptions,
    pub output: OutputConfig,
    pub eval: EvalConfig,
    pub formula: FormulaConfig,
}

/// How results are printed.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Decimals to round to. Default: shortest exact form.
    pub digits: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct EvalConfig {
    pub mode: EvalMode,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct FormulaConfig {
    /// Reject evaluation while a named parameter is unbound.
    pub strict_identifiers: bool,
}

impl Config {
    pub fn formula_options(&self) -> FormulaOptions {
        FormulaOptions {
            strict_identifiers: self.formula.strict_identifiers,
            parser: self.parser,
        }
    }

    pub fn session_options(&self) -> SessionOptions {
        SessionOptions {
            mode: self.eval.mode,
            parser: self.parser,
            formula: self.formula_options(),
            digits: self.output.digits,
        }
    }
}

/// Load config from disk. Returns defaults if no config file exists.
pub fn load_config() -> Result<Config> {
    match config_path() {
        Some(p) if p.exists() => load_config_from(&p),
        _ => Ok(Config::default()),
    }
}

pub fn load_config_from(path: &Path) -> Result<Config> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    toml::from_str(&content).with_context(|| format!("parsing {}", path.display()))
}

/// Resolve the config file path.
fn config_path() -> Option<PathBuf> {
    if let Ok(p) = std::env::var("HCALC_CONFIG") {
        return Some(PathBuf::from(p));
    }
    directories::ProjectDirs::from("dev", "hypercalc", "hypercalc")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

/// Show the active config path (for `hcalc config`).
pub fn show_config_path() -> String {
    match config_path() {
        Some(p) if p.exists() => format!("{} (loaded)", p.display()),
        Some(p) => format!("{} (not found, using defaults)", p.display()),
        None => "no config path resolved (using defaults)".into(),
    }
}
