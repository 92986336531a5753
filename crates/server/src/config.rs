use serde::Deserialize;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use thiserror::Error;

use billscan_core::DEFAULT_CURRENCY;

/// Names the optional TOML file read before environment overrides.
pub const CONFIG_PATH_VAR: &str = "BILLSCAN_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid value for {key}: '{value}'")]
    InvalidValue { key: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    /// Uploaded images are parked here while a request is processed.
    pub upload_dir: PathBuf,
    pub default_currency: String,
    pub max_upload_bytes: usize,
    pub tessdata_path: Option<String>,
    pub ocr_lang: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8000)),
            upload_dir: PathBuf::from("temp_uploads"),
            default_currency: DEFAULT_CURRENCY.to_string(),
            max_upload_bytes: 10 * 1024 * 1024,
            tessdata_path: None,
            ocr_lang: "eng".to_string(),
        }
    }
}

impl ServerConfig {
    /// Defaults, then the file named by `BILLSCAN_CONFIG`, then `BILLSCAN_*` variables.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match std::env::var_os(CONFIG_PATH_VAR) {
            Some(path) => Self::from_file(Path::new(&path))?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Override fields from variables resolved by `lookup`.
    pub fn apply_env(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(v) = lookup("BILLSCAN_BIND_ADDR") {
            self.bind_addr = v.parse().map_err(|_| ConfigError::InvalidValue {
                key: "BILLSCAN_BIND_ADDR",
                value: v.clone(),
            })?;
        }
        if let Some(v) = lookup("BILLSCAN_UPLOAD_DIR") {
            self.upload_dir = PathBuf::from(v);
        }
        if let Some(v) = lookup("BILLSCAN_DEFAULT_CURRENCY") {
            self.default_currency = v;
        }
        if let Some(v) = lookup("BILLSCAN_MAX_UPLOAD_BYTES") {
            self.max_upload_bytes = v.parse().map_err(|_| ConfigError::InvalidValue {
                key: "BILLSCAN_MAX_UPLOAD_BYTES",
                value: v.clone(),
            })?;
        }
        if let Some(v) = lookup("BILLSCAN_TESSDATA") {
            self.tessdata_path = Some(v);
        }
        if let Some(v) = lookup("BILLSCAN_OCR_LANG") {
            self.ocr_lang = v;
        }
        Ok(())
    }
}
