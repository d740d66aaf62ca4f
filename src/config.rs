//! Server configuration
//!
//! Settings come from an optional YAML file and can be overridden through
//! environment variables. Every section has defaults, so an empty file (or no
//! file at all) yields a working configuration.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub files: FilesConfig,
    pub limits: LimitsConfig,
    pub io_error_policy: IoErrorPolicy,
}

/// Listening socket settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,

    /// Preferred port; the next free one is used when it is taken
    pub port: u16,

    /// How many successive ports to try before giving up
    pub max_port_attempts: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 1701,
            max_port_attempts: 100,
        }
    }
}

/// Where validated filenames are looked up
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FilesConfig {
    pub root: PathBuf,
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
        }
    }
}

/// Per-connection time and memory bounds
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    pub read_timeout_ms: u64,
    pub write_timeout_ms: u64,
    pub max_header_bytes: usize,
    pub read_buffer_size: usize,
    pub file_chunk_size: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            read_timeout_ms: 30_000,
            write_timeout_ms: 30_000,
            max_header_bytes: 8192,
            read_buffer_size: 1024,
            file_chunk_size: 8192,
        }
    }
}

impl LimitsConfig {
    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }

    pub fn write_timeout(&self) -> Duration {
        Duration::from_millis(self.write_timeout_ms)
    }
}

/// What a transport failure on one connection does to the rest of the server
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IoErrorPolicy {
    /// Log the failure and drop only the offending connection
    #[default]
    CloseConnection,
    /// Stop accepting and shut the whole server down
    Terminate,
}

impl Config {
    /// Load configuration from an optional YAML file, then apply
    /// `WEBSERVER_HOST`, `WEBSERVER_PORT` and `WEBSERVER_ROOT` overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut cfg = match path {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read config file {}", path.display()))?;
                Self::from_yaml_str(&text)
                    .with_context(|| format!("Invalid config file {}", path.display()))?
            }
            None => Self::default(),
        };

        cfg.apply_env_overrides(|key| std::env::var(key).ok())?;
        Ok(cfg)
    }

    pub fn from_yaml_str(text: &str) -> Result<Self> {
        // An empty document deserializes to unit, not to a map
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(text).context("Failed to parse YAML configuration")
    }

    /// Apply overrides from any key/value source (the process environment in
    /// production).
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("WEBSERVER_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("WEBSERVER_PORT") {
            self.server.port = port
                .parse()
                .with_context(|| format!("WEBSERVER_PORT is not a valid port: {port}"))?;
        }
        if let Some(root) = lookup("WEBSERVER_ROOT") {
            self.files.root = PathBuf::from(root);
        }
        Ok(())
    }
}
