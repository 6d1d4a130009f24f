use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

use crate::thinking::analysis::DEFAULT_MAX_RELATED;
use crate::thinking::lock::LockOptions;

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct ThinkingConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub analysis: AnalysisConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub log_level: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct StorageConfig {
    pub dir: String,
    pub lock_retries: u32,
    pub lock_min_timeout_ms: u64,
    pub lock_max_timeout_ms: u64,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AnalysisConfig {
    pub max_related: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            log_level: "info".into(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        let defaults = LockOptions::default();
        Self {
            dir: default_storage_dir().to_string_lossy().into_owned(),
            lock_retries: defaults.retries,
            lock_min_timeout_ms: defaults.min_timeout.as_millis() as u64,
            lock_max_timeout_ms: defaults.max_timeout.as_millis() as u64,
        }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            max_related: DEFAULT_MAX_RELATED,
        }
    }
}

/// Returns `~/.mcp_sequential_thinking/`
pub fn default_storage_dir() -> PathBuf {
    dirs::home_dir()
        .expect("home directory must exist")
        .join(".mcp_sequential_thinking")
}

/// Returns the default config file path: `~/.mcp_sequential_thinking/config.toml`
pub fn default_config_path() -> PathBuf {
    default_storage_dir().join("config.toml")
}

impl ThinkingConfig {
    /// Load config from TOML file (if it exists) then apply env var overrides.
    pub fn load() -> Result<Self> {
        Self::load_from(default_config_path())
    }

    /// Load from a specific path, then apply env var overrides.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut config = if path.exists() {
            let contents =
                std::fs::read_to_string(path).context("failed to read config file")?;
            toml::from_str(&contents).context("failed to parse config TOML")?
        } else {
            info!("no config file at {}, using defaults", path.display());
            ThinkingConfig::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides (MCP_STORAGE_DIR, LOG_LEVEL).
    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("MCP_STORAGE_DIR") {
            self.storage.dir = val;
        }
        if let Ok(val) = std::env::var("LOG_LEVEL") {
            self.server.log_level = val;
        }
    }

    /// Resolve the storage directory, expanding `~` if needed.
    pub fn resolved_storage_dir(&self) -> PathBuf {
        expand_tilde(&self.storage.dir)
    }

    pub fn lock_options(&self) -> LockOptions {
        LockOptions {
            retries: self.storage.lock_retries,
            min_timeout: Duration::from_millis(self.storage.lock_min_timeout_ms),
            max_timeout: Duration::from_millis(self.storage.lock_max_timeout_ms),
        }
    }
}

pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        dirs::home_dir()
            .expect("home directory must exist")
            .join(rest)
    } else {
        PathBuf::from(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = ThinkingConfig::default();
        assert_eq!(config.server.log_level, "info");
        assert_eq!(config.analysis.max_related, 3);
        assert_eq!(config.lock_options(), LockOptions::default());
        assert!(config.storage.dir.ends_with(".mcp_sequential_thinking"));
    }

    #[test]
    fn parse_toml_config() {
        let toml_str = r#"
[server]
log_level = "debug"

[storage]
dir = "/tmp/thinking"
lock_retries = 2
"#;
        let config: ThinkingConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.server.log_level, "debug");
        assert_eq!(config.resolved_storage_dir(), PathBuf::from("/tmp/thinking"));
        assert_eq!(config.lock_options().retries, 2);
        // defaults still apply for unset fields
        assert_eq!(config.storage.lock_max_timeout_ms, 1000);
        assert_eq!(config.analysis.max_related, 3);
    }

    #[test]
    fn env_overrides_apply() {
        let mut config = ThinkingConfig::default();
        std::env::set_var("MCP_STORAGE_DIR", "/tmp/override");
        std::env::set_var("LOG_LEVEL", "trace");

        config.apply_env_overrides();

        assert_eq!(config.storage.dir, "/tmp/override");
        assert_eq!(config.server.log_level, "trace");

        // Clean up
        std::env::remove_var("MCP_STORAGE_DIR");
        std::env::remove_var("LOG_LEVEL");
    }

    #[test]
    fn tilde_expands_to_home() {
        let home = dirs::home_dir().unwrap();
        assert_eq!(expand_tilde("~/x/y"), home.join("x/y"));
        assert_eq!(expand_tilde("/abs"), PathBuf::from("/abs"));
    }
}
