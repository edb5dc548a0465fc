use crate::error::{Error, Result};
use config::{Config, File, FileFormat};
use serde::Deserialize;
use std::fmt;
use std::path::Path;
use validator::Validate;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub credentials_path: String,
    pub server: ServerCfg,
    pub log: LogCfg,
    pub llm: crate::llm::LLMCfg,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            credentials_path: "config.json".to_string(),
            server: ServerCfg::default(),
            log: LogCfg::default(),
            llm: crate::llm::LLMCfg::default(),
        }
    }
}

impl Settings {
    pub fn new() -> Result<Self> {
        Self::load("config/llm")
    }

    /// Reads settings from `name` (extension optional). The file itself is
    /// optional; every field falls back to its default.
    pub fn load(name: &str) -> Result<Self> {
        let c = Config::builder()
            .add_source(File::with_name(name).required(false))
            .build()?;
        let settings: Settings = c.try_deserialize()?;
        settings
            .llm
            .generation
            .validate()
            .map_err(|e| Error::Configuration(e.to_string()))?;
        Ok(settings)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerCfg {
    pub host: String,
    pub port: u16,
    pub static_dir: String,
}

impl Default for ServerCfg {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            static_dir: "static".to_string(),
        }
    }
}

impl ServerCfg {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LogCfg {
    pub level: String,
}

impl Default for LogCfg {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// The access token used to fetch gated model artifacts.
#[derive(Clone, Deserialize)]
pub struct Credentials {
    #[serde(alias = "HF_TOKEN")]
    hf_token: String,
}

impl Credentials {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let c = Config::builder()
            .add_source(File::new(&path.to_string_lossy(), FileFormat::Json))
            .build()
            .map_err(|e| {
                Error::Configuration(format!("cannot read {}: {}", path.display(), e))
            })?;
        let credentials: Credentials = c.try_deserialize().map_err(|e| {
            Error::Configuration(format!("HF_TOKEN not found in {}: {}", path.display(), e))
        })?;
        if credentials.hf_token.trim().is_empty() {
            return Err(Error::Configuration(format!(
                "HF_TOKEN in {} is empty",
                path.display()
            )));
        }
        Ok(credentials)
    }

    pub fn new(hf_token: impl Into<String>) -> Self {
        Self {
            hf_token: hf_token.into(),
        }
    }

    pub fn hf_token(&self) -> &str {
        &self.hf_token
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("hf_token", &"<redacted>")
            .finish()
    }
}
