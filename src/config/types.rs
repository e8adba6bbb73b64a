//! Configuration Types
//!
//! All configuration structures with sensible defaults.
//! Supports global (~/.config/filescope/) and project (.filescope/) level configuration.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::data::DEFAULT_SAMPLE_ROWS;
use crate::constants::enrichment::{
    DEFAULT_API_BASE, DEFAULT_MAX_TOKENS, DEFAULT_MODEL, DEFAULT_TIMEOUT_SECS,
};
use crate::constants::scanner::{DEFAULT_CONCURRENCY, DEFAULT_MAX_FILE_SIZE};
use crate::types::{Result, ScopeError};

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Configuration version
    pub version: String,

    /// File analysis settings
    pub analysis: AnalysisConfig,

    /// Optional enrichment provider settings
    pub enrichment: EnrichmentConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            analysis: AnalysisConfig::default(),
            enrichment: EnrichmentConfig::default(),
        }
    }
}

impl Config {
    /// Validate configuration values are within acceptable ranges.
    /// Returns `ScopeError::Config` on validation failure.
    pub fn validate(&self) -> Result<()> {
        if self.analysis.concurrency == 0 {
            return Err(ScopeError::Config(
                "analysis.concurrency must be greater than 0".to_string(),
            ));
        }

        if self.analysis.csv_sample_rows == 0 {
            return Err(ScopeError::Config(
                "analysis.csv_sample_rows must be greater than 0".to_string(),
            ));
        }

        for pattern in &self.analysis.exclude {
            glob::Pattern::new(pattern).map_err(|e| {
                ScopeError::Config(format!("Invalid exclude pattern '{}': {}", pattern, e))
            })?;
        }

        if !(0.0..=2.0).contains(&self.enrichment.temperature) {
            return Err(ScopeError::Config(format!(
                "enrichment.temperature must be between 0.0 and 2.0, got {}",
                self.enrichment.temperature
            )));
        }

        if self.enrichment.timeout_secs == 0 {
            return Err(ScopeError::Config(
                "enrichment.timeout_secs must be greater than 0".to_string(),
            ));
        }

        url::Url::parse(&self.enrichment.api_base).map_err(|e| {
            ScopeError::Config(format!(
                "Invalid enrichment.api_base '{}': {}",
                self.enrichment.api_base, e
            ))
        })?;

        Ok(())
    }
}

// =============================================================================
// Analysis Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Files larger than this are skipped during batch scans
    pub max_file_size: u64,

    /// Files analyzed concurrently in a batch
    pub concurrency: usize,

    /// Include dotfiles and dot-directories
    pub include_hidden: bool,

    /// Honor .gitignore and git exclude files
    pub respect_gitignore: bool,

    /// Glob patterns to exclude
    pub exclude: Vec<String>,

    /// Rows sampled for column type inference
    pub csv_sample_rows: usize,

    /// Replace invalid UTF-8 instead of reporting a decode error
    pub lossy_decode: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            concurrency: DEFAULT_CONCURRENCY,
            include_hidden: false,
            respect_gitignore: true,
            exclude: vec![
                "**/node_modules/**".to_string(),
                "**/.git/**".to_string(),
                "**/target/**".to_string(),
                "**/__pycache__/**".to_string(),
                "**/.venv/**".to_string(),
            ],
            csv_sample_rows: DEFAULT_SAMPLE_ROWS,
            lossy_decode: false,
        }
    }
}

// =============================================================================
// Enrichment Configuration
// =============================================================================

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum EnrichmentProvider {
    /// Rule-based fallback only
    #[default]
    None,
    /// OpenAI-compatible chat completions endpoint
    OpenAi,
}

impl fmt::Display for EnrichmentProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnrichmentProvider::None => write!(f, "none"),
            EnrichmentProvider::OpenAi => write!(f, "openai"),
        }
    }
}

#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EnrichmentConfig {
    pub provider: EnrichmentProvider,

    pub model: String,

    /// Base URL of the chat completions API
    pub api_base: String,

    /// Never written back out; falls back to `OPENAI_API_KEY`
    #[serde(skip_serializing)]
    pub api_key: Option<String>,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    pub temperature: f32,

    pub max_tokens: usize,
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            provider: EnrichmentProvider::None,
            model: DEFAULT_MODEL.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            api_key: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            temperature: 0.0,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }
}

impl fmt::Debug for EnrichmentConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnrichmentConfig")
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("api_base", &self.api_base)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("timeout_secs", &self.timeout_secs)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.version, "1.0");
        assert_eq!(config.enrichment.provider, EnrichmentProvider::None);
        assert_eq!(config.analysis.csv_sample_rows, DEFAULT_SAMPLE_ROWS);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::default();
        config.analysis.concurrency = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.enrichment.temperature = 3.0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.analysis.exclude = vec!["[".to_string()];
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.enrichment.api_base = "not a url".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_api_key_is_never_serialized_or_printed() {
        let mut config = Config::default();
        config.enrichment.api_key = Some("sk-live-123".to_string());

        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("sk-live-123"));
        assert!(!format!("{:?}", config).contains("sk-live-123"));
    }

    #[test]
    fn test_provider_names() {
        assert_eq!(EnrichmentProvider::OpenAi.to_string(), "openai");
        let parsed: EnrichmentProvider = serde_json::from_str("\"openai\"").unwrap();
        assert_eq!(parsed, EnrichmentProvider::OpenAi);
    }
}
