//! CLI preferences stored as TOML under `~/.config/multitimer/`.
//!
//! Two settings live here: the document used when `--file` is not given and
//! the poll cadence of the `run` command. Set MULTITIMER_ENV=dev to keep a
//! separate preference directory during development.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use multitimer_core::FILE_EXTENSION;

fn default_poll_interval_ms() -> u64 {
    250
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CliConfig {
    /// Document used when no `--file` override is given.
    #[serde(default)]
    pub default_file: Option<PathBuf>,
    /// How often `run` checks for finished timers, in milliseconds.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            default_file: None,
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

/// Returns `~/.config/multitimer[-dev]/` based on MULTITIMER_ENV.
///
/// Set MULTITIMER_ENV=dev to use the development data directory.
///
/// # Errors
/// Returns an error if the directory cannot be created.
pub fn data_dir() -> Result<PathBuf, Box<dyn std::error::Error>> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("MULTITIMER_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("multitimer-dev")
    } else {
        base_dir.join("multitimer")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

impl CliConfig {
    fn path() -> Result<PathBuf, Box<dyn std::error::Error>> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk or return default.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, Box<dyn std::error::Error>> {
        let path = Self::path()?;
        match std::fs::read_to_string(&path) {
            Ok(content) => {
                let config: CliConfig = toml::from_str(&content)?;
                Ok(config)
            }
            Err(_) => {
                let config = Self::default();
                config.save()?;
                Ok(config)
            }
        }
    }

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written.
    pub fn save(&self) -> Result<(), Box<dyn std::error::Error>> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(Self::path()?, content)?;
        Ok(())
    }

    /// Get a preference as a string by key.
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "default-file" => Some(
                self.default_file
                    .as_ref()
                    .map(|path| path.display().to_string())
                    .unwrap_or_default(),
            ),
            "poll-interval-ms" => Some(self.poll_interval_ms.to_string()),
            _ => None,
        }
    }

    /// Set a preference by key. Returns an error if the key is unknown
    /// or the value cannot be parsed.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), Box<dyn std::error::Error>> {
        match key {
            "default-file" => {
                self.default_file = if value.is_empty() {
                    None
                } else {
                    Some(PathBuf::from(value))
                };
            }
            "poll-interval-ms" => {
                self.poll_interval_ms = value.parse()?;
            }
            _ => return Err(format!("unknown config key: {key}").into()),
        }
        Ok(())
    }

    /// Document the CLI operates on: the `--file` override wins, then the
    /// configured default, then `default.timers` in the data directory.
    pub fn document_path(&self, file: Option<&Path>) -> Result<PathBuf, Box<dyn std::error::Error>> {
        if let Some(path) = file {
            return Ok(path.to_path_buf());
        }
        if let Some(ref path) = self.default_file {
            return Ok(path.clone());
        }
        Ok(data_dir()?.join(format!("default.{FILE_EXTENSION}")))
    }
}
