//! CLI Common Utilities
//!
//! Shared configuration loading and output helpers for command handlers.

use serde::Serialize;

use crate::config::{Config, ConfigLoader};
use crate::types::Result;

/// Output format accepted by `-f/--format`
pub const FORMATS: [&str; 2] = ["text", "json"];

pub fn is_json(format: &str) -> bool {
    format.eq_ignore_ascii_case("json")
}

/// Load the effective configuration and apply per-command overrides
pub fn load_config(apply: impl FnOnce(&mut Config)) -> Result<Config> {
    let mut config = ConfigLoader::load()?;
    apply(&mut config);
    config.validate()?;
    Ok(config)
}

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Format a [0,1] score as a percentage
pub fn percent(score: f64) -> String {
    format!("{:.0}%", score * 100.0)
}
