//! Server configuration.
//!
//! Loaded from a TOML file (path in `GRANGE_CONFIG`, else
//! `~/.config/grange/config.toml`) with a `GRANGE_`-prefixed environment
//! overlay on top, so secrets can stay out of the file. A commented
//! default file is written on first run.

use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use serde::Deserialize;

use crate::error::{GrangeError, GrangeResult};

const DEFAULT_PORT: u16 = 4096;

fn default_port() -> u16 {
    DEFAULT_PORT
}

/// Hosted database connection.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct DatabaseConfig {
    /// REST root of the hosted database.
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub api_key: String,
}

/// Hosted object-storage connection.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct StorageConfig {
    /// HTTP root of the storage service.
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub bucket: String,
    #[serde(default)]
    pub api_key: String,
}

/// Chat-completion API the assistant calls.
#[derive(Debug, Clone, Deserialize)]
pub struct AssistantConfig {
    #[serde(default = "default_assistant_url")]
    pub url: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_assistant_model")]
    pub model: String,
}

fn default_assistant_url() -> String {
    "https://api.openai.com/v1/chat/completions".to_string()
}

fn default_assistant_model() -> String {
    "gpt-4o-mini".to_string()
}

impl Default for AssistantConfig {
    fn default() -> Self {
        AssistantConfig {
            url: default_assistant_url(),
            api_key: String::new(),
            model: default_assistant_model(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct GrangeConfig {
    #[serde(default = "default_port")]
    pub port: u16,

    /// Log filter used when `RUST_LOG` is unset, e.g. `grange_server=debug`.
    #[serde(default)]
    pub log: Option<String>,

    /// Argon2 PHC hash the admin login is verified against. With no hash
    /// configured, login always fails; nothing else is gated on it.
    #[serde(default)]
    pub admin_password_hash: Option<String>,

    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub assistant: AssistantConfig,
}

impl GrangeConfig {
    pub fn config_path() -> GrangeResult<PathBuf> {
        if let Ok(path) = std::env::var("GRANGE_CONFIG") {
            return Ok(PathBuf::from(path));
        }

        let config_dir = dirs::config_dir()
            .ok_or_else(|| GrangeError::Config("Could not determine config directory".into()))?
            .join("grange");

        Ok(config_dir.join("config.toml"))
    }

    pub fn load() -> GrangeResult<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
        }

        Self::load_from(&config_path)
    }

    /// Load from an explicit file, with the environment overlay applied.
    pub fn load_from(path: &Path) -> GrangeResult<Self> {
        Config::builder()
            .add_source(File::from(path.to_path_buf()).required(false))
            .add_source(Environment::with_prefix("GRANGE").separator("__"))
            .build()
            .map_err(|e| GrangeError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| GrangeError::Config(e.to_string()))
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> GrangeResult<()> {
        let contents = format!(
            "\
# grange configuration

# Port the server listens on:
# port = {DEFAULT_PORT}

# Log filter used when RUST_LOG is unset:
# log = \"grange_server=info\"

# Argon2 PHC hash for the admin login:
# admin_password_hash = \"$argon2id$...\"

# [database]
# url = \"https://project.example.co/rest/v1\"
# api_key = \"...\"

# [storage]
# url = \"https://project.example.co/storage/v1\"
# bucket = \"media\"
# api_key = \"...\"

# [assistant]
# url = \"https://api.openai.com/v1/chat/completions\"
# api_key = \"...\"
# model = \"gpt-4o-mini\"
"
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                GrangeError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| GrangeError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }
}
