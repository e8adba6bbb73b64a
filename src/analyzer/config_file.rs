//! Configuration file heuristics

use serde_json::json;

use super::context::FileContext;
use super::security::KeywordScan;
use crate::types::{Result, Section, section};

pub fn structure(ctx: &FileContext<'_>) -> Result<Section> {
    Ok(section(json!({
        "format": ctx.format(),
        "lines": ctx.text.lines().count(),
    })))
}

pub fn content(ctx: &FileContext<'_>) -> Result<Section> {
    let settings = ctx.text.matches('=').count() + ctx.text.matches(':').count();
    Ok(section(json!({ "settings_count": settings })))
}

/// Syntax check for formats with a parser; `None` means valid
fn syntax_error(extension: &str, text: &str) -> Option<String> {
    match extension {
        ".toml" => toml::from_str::<toml::Table>(text)
            .err()
            .map(|e| e.message().to_string()),
        ".ini" | ".conf" | ".cfg" | ".env" | ".properties" => key_value_error(text),
        _ => None,
    }
}

/// First line that is neither a comment, a section header nor `key=value`
fn key_value_error(text: &str) -> Option<String> {
    text.lines().enumerate().find_map(|(index, line)| {
        let line = line.trim();
        let ok = line.is_empty()
            || line.starts_with(['#', ';', '!'])
            || (line.starts_with('[') && line.ends_with(']'))
            || line
                .split_once(['=', ':'])
                .is_some_and(|(key, _)| !key.trim().is_empty())
            || line.split_whitespace().count() >= 2;
        (!ok).then(|| format!("line {}: expected key = value", index + 1))
    })
}

pub fn quality(ctx: &FileContext<'_>) -> Result<Section> {
    let mut out = section(json!({ "syntax_valid": true }));
    if let Some(message) = syntax_error(&ctx.record.extension, ctx.text) {
        out.insert("syntax_valid".to_string(), json!(false));
        out.insert("syntax_error".to_string(), json!(message));
    }
    Ok(out)
}

pub fn security(ctx: &FileContext<'_>) -> Result<Section> {
    let lower = ctx.text.to_lowercase();
    let mut out = KeywordScan::run(ctx.text).to_section();
    out.insert(
        "security_settings".to_string(),
        json!({
            "encryption_enabled": lower.contains("ssl") || lower.contains("tls"),
            "authentication_configured": lower.contains("auth") || lower.contains("password"),
            "logging_enabled": lower.contains("log"),
        }),
    );
    Ok(out)
}
