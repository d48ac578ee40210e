//! Configuration management for formsmith
//!
//! Handles the ~/.formsmith/ directory structure and config.toml

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub export: ExportConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Pretty-print exported JSON
    pub pretty: bool,
    /// Export target; defaults to ~/.formsmith/exports
    pub directory: Option<PathBuf>,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            pretty: true,
            directory: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `tracing_subscriber::EnvFilter` directive, overridden by RUST_LOG
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "warn".to_string(),
        }
    }
}

/// Returns the path to the formsmith home directory (~/.formsmith)
pub fn formsmith_home() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(".formsmith"))
}

/// Returns paths to all formsmith files and directories
pub struct FormsmithPaths {
    pub root: PathBuf,
    pub config: PathBuf,
    pub session: PathBuf,
    pub exports: PathBuf,
}

impl FormsmithPaths {
    pub fn new() -> Result<Self> {
        let root = formsmith_home()?;
        Ok(Self::at(root))
    }

    /// Layout rooted at an arbitrary directory
    pub fn at(root: PathBuf) -> Self {
        Self {
            config: root.join("config.toml"),
            session: root.join("session.json"),
            exports: root.join("exports"),
            root,
        }
    }

    /// Create all directories if they don't exist
    pub fn ensure_dirs(&self) -> Result<()> {
        fs::create_dir_all(&self.root).context("Failed to create formsmith root")?;
        fs::create_dir_all(&self.exports).context("Failed to create exports directory")?;
        Ok(())
    }

    /// Check if formsmith has been initialized
    pub fn is_initialized(&self) -> bool {
        self.config.exists()
    }

    /// Directory exports go to, honouring the config override
    pub fn export_dir(&self, config: &Config) -> PathBuf {
        config
            .export
            .directory
            .clone()
            .unwrap_or_else(|| self.exports.clone())
    }
}

/// Load configuration from disk; a missing file means defaults
pub fn load_config(paths: &FormsmithPaths) -> Result<Config> {
    if !paths.config.exists() {
        return Ok(Config::default());
    }
    let content = fs::read_to_string(&paths.config).context("Failed to read config.toml")?;
    toml::from_str(&content).context("Failed to parse config.toml")
}

/// Save configuration to disk
pub fn save_config(paths: &FormsmithPaths, config: &Config) -> Result<()> {
    let content = toml::to_string_pretty(config).context("Failed to serialize config")?;
    fs::write(&paths.config, content).context("Failed to write config.toml")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_roundtrip() -> Result<()> {
        let temp = tempfile::TempDir::new()?;
        let paths = FormsmithPaths::at(temp.path().to_path_buf());
        paths.ensure_dirs()?;
        assert!(!paths.is_initialized());

        let mut config = Config::default();
        config.export.pretty = false;
        config.logging.filter = "formsmith=debug".to_string();
        save_config(&paths, &config)?;

        let loaded = load_config(&paths)?;
        assert!(!loaded.export.pretty);
        assert_eq!(loaded.logging.filter, "formsmith=debug");
        assert!(paths.is_initialized());
        Ok(())
    }

    #[test]
    fn test_partial_config_uses_defaults() -> Result<()> {
        let config: Config = toml::from_str("[logging]\nfilter = \"info\"\n")?;
        assert!(config.export.pretty);
        assert_eq!(config.logging.filter, "info");
        Ok(())
    }
}
