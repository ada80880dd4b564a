//! Configuration file handling for verdent-cli

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use verdent_client::ClientConfig;

/// Configuration for the CLI tool
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Agent API host
    pub host: Option<String>,
    /// Agent API port
    pub port: Option<u16>,
    /// Passport host
    pub login_host: Option<String>,
    /// Session token
    pub token: Option<String>,
    /// Request timeout in milliseconds
    pub timeout_ms: Option<u64>,
    /// Default output format
    pub output: Option<String>,
    /// Disable colored output
    pub no_color: Option<bool>,
}

impl Config {
    /// Load configuration from the default config file
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Get the default config file path
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not determine config directory")?
            .join("verdent");

        Ok(config_dir.join("config.toml"))
    }

    /// Merge CLI arguments over config file values
    pub fn merge_with_args(&self, args: &ConnectionArgs<'_>) -> ClientConfig {
        let mut builder = ClientConfig::builder();
        if let Some(host) = args.host.or(self.host.as_deref()) {
            builder = builder.host(host);
        }
        if let Some(port) = args.port.or(self.port) {
            builder = builder.port(port);
        }
        if let Some(login_host) = self.login_host.as_deref() {
            builder = builder.login_host(login_host);
        }
        if let Some(token) = args.token.or(self.token.as_deref()) {
            builder = builder.token(token);
        }
        if let Some(ms) = self.timeout_ms {
            builder = builder.timeout_ms(ms);
        }
        builder.build()
    }
}

/// Connection flags given on the command line
#[derive(Debug, Default)]
pub struct ConnectionArgs<'a> {
    pub host: Option<&'a str>,
    pub port: Option<u16>,
    pub token: Option<&'a str>,
}
