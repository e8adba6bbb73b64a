//! Configuration Loader (Figment-based)
//!
//! Loads and merges configuration from multiple sources using Figment:
//! 1. Built-in defaults (Serialized)
//! 2. Global config (~/.config/filescope/config.toml)
//! 3. Project config (.filescope/config.toml)
//! 4. Environment variables (FILESCOPE_* prefix, `__` between levels)

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::types::Config;
use crate::types::{Result, ScopeError};

/// Configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with full resolution chain using Figment:
    /// defaults → global → project → env vars
    pub fn load() -> Result<Config> {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            debug!("Loading global config from: {}", global_path.display());
            figment = figment.merge(Toml::file(&global_path));
        }

        let project_path = Self::project_config_path();
        if project_path.exists() {
            debug!("Loading project config from: {}", project_path.display());
            figment = figment.merge(Toml::file(&project_path));
        }

        // FILESCOPE_ANALYSIS__MAX_FILE_SIZE -> analysis.max_file_size
        figment = figment.merge(Env::prefixed("FILESCOPE_").split("__").lowercase(true));

        Self::extract(figment)
    }

    /// Load configuration from a specific file only
    pub fn load_from_file(path: &Path) -> Result<Config> {
        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(path));
        Self::extract(figment)
    }

    fn extract(figment: Figment) -> Result<Config> {
        let config: Config = figment
            .extract()
            .map_err(|e| ScopeError::Config(format!("Configuration error: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    // =========================================================================
    // Path Management
    // =========================================================================

    /// Get path to global config directory (~/.config/filescope/)
    pub fn global_dir() -> Option<PathBuf> {
        env::var("XDG_CONFIG_HOME")
            .ok()
            .map(PathBuf::from)
            .or_else(|| {
                env::var("HOME")
                    .ok()
                    .map(|home| PathBuf::from(home).join(".config"))
            })
            .map(|p| p.join("filescope"))
    }

    /// Get path to global config file
    pub fn global_config_path() -> Option<PathBuf> {
        Self::global_dir().map(|dir| dir.join("config.toml"))
    }

    /// Get path to project config file
    pub fn project_config_path() -> PathBuf {
        Self::project_dir().join("config.toml")
    }

    pub fn project_dir() -> PathBuf {
        PathBuf::from(".filescope")
    }

    // =========================================================================
    // Config Commands
    // =========================================================================

    /// Current effective configuration rendered as TOML or JSON
    pub fn render(config: &Config, as_json: bool) -> Result<String> {
        if as_json {
            Ok(serde_json::to_string_pretty(config)?)
        } else {
            toml::to_string_pretty(config).map_err(|e| ScopeError::Config(e.to_string()))
        }
    }

    // =========================================================================
    // Initialization
    // =========================================================================

    /// Write a config template to the global or project location.
    ///
    /// Returns the path and whether a file was written.
    pub fn init(global: bool, force: bool) -> Result<(PathBuf, bool)> {
        let path = if global {
            Self::global_config_path().ok_or_else(|| {
                ScopeError::Config("Cannot determine global config directory".to_string())
            })?
        } else {
            Self::project_config_path()
        };
        let written = Self::write_template(&path, force)?;
        Ok((path, written))
    }

    fn write_template(path: &Path, force: bool) -> Result<bool> {
        if path.exists() && !force {
            info!("Config exists: {}", path.display());
            return Ok(false);
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, Self::default_config())?;
        info!("Created config: {}", path.display());
        Ok(true)
    }

    /// Generate default config content (TOML)
    fn default_config() -> String {
        r#"# filescope Configuration
# Project settings in .filescope/config.toml override the global file.
# Environment variables override both, e.g. FILESCOPE_ANALYSIS__CONCURRENCY=4

version = "1.0"

[analysis]
max_file_size = 10485760
concurrency = 8
include_hidden = false
respect_gitignore = true
exclude = [
    "**/node_modules/**",
    "**/.git/**",
    "**/target/**",
    "**/__pycache__/**",
    "**/.venv/**",
]
csv_sample_rows = 1000
lossy_decode = false

# Optional insights from a chat completions API
[enrichment]
provider = "none"
model = "gpt-4o-mini"
api_base = "https://api.openai.com/v1"
timeout_secs = 60
temperature = 0.0
max_tokens = 1024
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EnrichmentProvider;
    use tempfile::TempDir;

    #[test]
    fn test_load_default_config() {
        let config = ConfigLoader::load().unwrap();
        assert_eq!(config.version, "1.0");
    }

    #[test]
    fn test_template_parses_to_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested/config.toml");

        assert!(ConfigLoader::write_template(&path, false).unwrap());
        assert!(!ConfigLoader::write_template(&path, false).unwrap());
        assert!(ConfigLoader::write_template(&path, true).unwrap());

        let config = ConfigLoader::load_from_file(&path).unwrap();
        let defaults = Config::default();
        assert_eq!(config.analysis.max_file_size, defaults.analysis.max_file_size);
        assert_eq!(config.analysis.exclude, defaults.analysis.exclude);
        assert_eq!(config.enrichment.provider, EnrichmentProvider::None);
    }

    #[test]
    fn test_load_from_file_overrides() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(
            &path,
            "[analysis]\nconcurrency = 2\n\n[enrichment]\nprovider = \"openai\"\n",
        )
        .unwrap();

        let config = ConfigLoader::load_from_file(&path).unwrap();
        assert_eq!(config.analysis.concurrency, 2);
        assert_eq!(config.enrichment.provider, EnrichmentProvider::OpenAi);
        assert!(config.analysis.respect_gitignore);
    }

    #[test]
    fn test_invalid_file_is_config_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "[analysis]\nconcurrency = 0\n").unwrap();

        let err = ConfigLoader::load_from_file(&path).unwrap_err();
        assert!(matches!(err, ScopeError::Config(_)));
    }

    #[test]
    fn test_render_hides_api_key() {
        let mut config = Config::default();
        config.enrichment.api_key = Some("sk-secret".to_string());
        let toml = ConfigLoader::render(&config, false).unwrap();
        assert!(toml.contains("[analysis]"));
        assert!(!toml.contains("sk-secret"));
        let json = ConfigLoader::render(&config, true).unwrap();
        assert!(json.contains("\"enrichment\""));
    }

    #[test]
    fn test_env_override() {
        // SAFETY: This test runs in isolation
        unsafe {
            std::env::set_var("FILESCOPE_ANALYSIS__CSV_SAMPLE_ROWS", "42");
        }
        let config = ConfigLoader::load().unwrap();
        assert_eq!(config.analysis.csv_sample_rows, 42);
        unsafe {
            std::env::remove_var("FILESCOPE_ANALYSIS__CSV_SAMPLE_ROWS");
        }
    }
}
