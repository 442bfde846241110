use std::fmt;
use std::path::{Path, PathBuf};

use eyre::{Result, bail};
use log::debug;
use serde::{Deserialize, Serialize};

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_ORIGIN: &str = "https://bluedoraemon.github.io";
pub const DEFAULT_LANG: &str = "en";

pub const ENV_API_KEY: &str = "OPENROUTER_API_KEY";
pub const ENV_SITE_URL: &str = "YOUR_SITE_URL";
pub const ENV_SITE_NAME: &str = "YOUR_SITE_NAME";
pub const ENV_MODEL: &str = "MODEL";

/// Optional on-disk settings; every field may be absent
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct FileConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub allowed_origins: Option<Vec<String>>,
    pub lang: Option<String>,
    pub youtube_base_url: Option<String>,
    pub llm_base_url: Option<String>,
    pub site_url: Option<String>,
    pub site_name: Option<String>,
    pub model: Option<String>,
}

impl FileConfig {
    /// Load config from `path` if it exists
    pub fn load(path: &Path) -> Result<Self> {
        if path.exists() {
            debug!("Loading config from {}", path.display());
            let content = std::fs::read_to_string(path)?;
            let config: FileConfig = toml::from_str(&content)?;
            Ok(config)
        } else {
            debug!("No config file found at {}", path.display());
            Ok(FileConfig::default())
        }
    }
}

pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from(".config"))
        .join("ytsum")
        .join("config.toml")
}

/// Settings for the chat-completion endpoint
#[derive(Clone)]
pub struct LlmConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub site_url: Option<String>,
    pub site_name: Option<String>,
}

impl fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LlmConfig")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("site_url", &self.site_url)
            .field("site_name", &self.site_name)
            .finish()
    }
}

/// Fully resolved, validated runtime configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub allowed_origins: Vec<String>,
    pub lang: String,
    pub youtube_base_url: String,
    pub llm: LlmConfig,
}

impl Config {
    /// Merge the file settings with the process environment
    pub fn from_env(file: FileConfig) -> Result<Self> {
        Self::resolve(file, |key| std::env::var(key).ok())
    }

    /// Environment values win over file values. Blank values count as unset.
    pub fn resolve(file: FileConfig, env: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let lookup = |key: &str| env(key).filter(|v| !v.trim().is_empty());

        let Some(api_key) = lookup(ENV_API_KEY) else {
            bail!("{ENV_API_KEY} is not set (required to call the summarization API)");
        };

        let Some(model) = lookup(ENV_MODEL).or(file.model).filter(|m| !m.trim().is_empty()) else {
            bail!("no model configured: set {ENV_MODEL} or `model` in the config file");
        };

        let allowed_origins = file
            .allowed_origins
            .filter(|o| !o.is_empty())
            .unwrap_or_else(|| vec![DEFAULT_ORIGIN.to_string()]);

        Ok(Config {
            host: file.host.unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: file.port.unwrap_or(DEFAULT_PORT),
            allowed_origins,
            lang: file.lang.unwrap_or_else(|| DEFAULT_LANG.to_string()),
            youtube_base_url: file
                .youtube_base_url
                .unwrap_or_else(|| crate::youtube::DEFAULT_BASE_URL.to_string()),
            llm: LlmConfig {
                api_key,
                model,
                base_url: file
                    .llm_base_url
                    .unwrap_or_else(|| crate::summarize::DEFAULT_BASE_URL.to_string()),
                site_url: lookup(ENV_SITE_URL).or(file.site_url),
                site_name: lookup(ENV_SITE_NAME).or(file.site_name),
            },
        })
    }

    /// Command-line bind address wins over file and environment
    pub fn with_bind_overrides(mut self, host: Option<String>, port: Option<u16>) -> Self {
        if let Some(host) = host {
            self.host = host;
        }
        if let Some(port) = port {
            self.port = port;
        }
        self
    }
}
