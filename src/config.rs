use std::env;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{DocumntrError, Result};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".into()
}

fn default_port() -> u16 {
    8080
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModelConfig {
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub base_url: Option<String>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            api_key: None,
            base_url: None,
        }
    }
}

fn default_model() -> String {
    "gpt-4o-mini".into()
}

#[cfg(feature = "history")]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HistoryConfig {
    #[serde(default = "default_history_enabled")]
    pub enabled: bool,
    #[serde(default = "default_history_path")]
    pub file_path: String,
}

#[cfg(feature = "history")]
impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            enabled: default_history_enabled(),
            file_path: default_history_path(),
        }
    }
}

#[cfg(feature = "history")]
fn default_history_enabled() -> bool {
    true
}

#[cfg(feature = "history")]
fn default_history_path() -> String {
    "history.json".into()
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub model: ModelConfig,
    #[cfg(feature = "history")]
    #[serde(default)]
    pub history: HistoryConfig,
}

impl AppConfig {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        let cfg: Self = toml::from_str(&raw)
            .map_err(|err| DocumntrError::Config(format!("failed to parse configuration: {err}")))?;
        Ok(cfg)
    }

    pub fn from_env_or_file(path: impl AsRef<Path>) -> Result<Self> {
        let cfg = Self::from_file(path)?;
        Ok(cfg.apply_env())
    }

    /// Defaults plus environment overrides, for running without a config file.
    pub fn from_env() -> Self {
        Self::default().apply_env()
    }

    fn apply_env(mut self) -> Self {
        if let Ok(host) = env::var("DOCUMNTR_HOST") {
            self.server.host = host;
        }
        if let Ok(port) = env::var("DOCUMNTR_PORT") {
            if let Ok(parsed) = port.parse::<u16>() {
                self.server.port = parsed;
            }
        }
        if let Ok(model) = env::var("DOCUMNTR_MODEL") {
            self.model.model = model;
        }
        if let Ok(key) = env::var("DOCUMNTR_API_KEY") {
            self.model.api_key = Some(key);
        }
        if let Ok(base_url) = env::var("DOCUMNTR_BASE_URL") {
            self.model.base_url = Some(base_url);
        }
        #[cfg(feature = "history")]
        {
            if let Ok(enabled) = env::var("DOCUMNTR_HISTORY") {
                if let Ok(parsed) = enabled.parse::<bool>() {
                    self.history.enabled = parsed;
                }
            }
            if let Ok(path) = env::var("DOCUMNTR_HISTORY_PATH") {
                self.history.file_path = path;
            }
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn loads_and_overrides() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[server]\nhost='127.0.0.1'\nport=9000\n[model]\nmodel='gpt-4'"
        )
        .unwrap();

        env::set_var("DOCUMNTR_PORT", "9100");
        let cfg = AppConfig::from_env_or_file(file.path()).unwrap();
        env::remove_var("DOCUMNTR_PORT");

        assert_eq!(cfg.server.port, 9100);
        assert_eq!(cfg.server.host, "127.0.0.1");
        assert_eq!(cfg.model.model, "gpt-4");
    }

    #[test]
    fn defaults_fill_missing_sections() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[model]\nmodel='gpt-4'").unwrap();

        let cfg = AppConfig::from_file(file.path()).unwrap();
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.model.api_key, None);
    }

    #[test]
    #[cfg(feature = "history")]
    fn overrides_history_path() {
        env::set_var("DOCUMNTR_HISTORY_PATH", "elsewhere.json");
        let cfg = AppConfig::from_env();
        env::remove_var("DOCUMNTR_HISTORY_PATH");

        assert_eq!(cfg.history.file_path, "elsewhere.json");
        assert!(cfg.history.enabled);
    }
}
