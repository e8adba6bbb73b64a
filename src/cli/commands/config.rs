//! Config Command
//!
//! Manage filescope configuration.
//!
//! Usage:
//!   filescope config show [-f json]
//!   filescope config path
//!   filescope config init [-g] [--force]

use crate::cli::ui::Output;
use crate::cli::util::is_json;
use crate::config::ConfigLoader;
use crate::types::Result;

/// Show merged effective configuration
pub fn show(format: &str) -> Result<()> {
    let config = ConfigLoader::load()?;
    println!("{}", ConfigLoader::render(&config, is_json(format))?);
    Ok(())
}

/// Show configuration paths
pub fn path() -> Result<()> {
    println!("Configuration paths:");
    println!();

    if let Some(global) = ConfigLoader::global_config_path() {
        let exists = if global.exists() { "✓" } else { "✗" };
        println!("  Global:  {} {}", exists, global.display());
    } else {
        println!("  Global:  (not available)");
    }

    let project = ConfigLoader::project_config_path();
    let exists = if project.exists() { "✓" } else { "✗" };
    println!("  Project: {} {}", exists, project.display());
    Ok(())
}

/// Write a config template
pub fn init(global: bool, force: bool) -> Result<()> {
    let output = Output::new();
    let (path, written) = ConfigLoader::init(global, force)?;
    if written {
        output.success(&format!("Created {}", path.display()));
    } else {
        output.info(&format!(
            "{} already exists (use --force to overwrite)",
            path.display()
        ));
    }
    Ok(())
}
