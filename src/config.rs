//! Configuration for skinsight

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// HTTP server port
    #[serde(default = "default_http_port")]
    pub http_port: u16,

    /// Largest accepted request body, in bytes
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,

    /// Language model settings
    #[serde(default)]
    pub llm: LlmConfig,

    /// Model server endpoints
    #[serde(default)]
    pub classifiers: ClassifierConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Base URL of an OpenAI-compatible API
    #[serde(default = "default_llm_base_url")]
    pub base_url: String,

    /// Chat model name
    #[serde(default = "default_llm_model")]
    pub model: String,

    /// Output token bound for every completion
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Environment variable holding the API key. Read on every call.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Prediction endpoint of the mole (lunares) model
    #[serde(default = "default_lunares_url")]
    pub lunares_url: String,

    /// Prediction endpoint of the acne model
    #[serde(default = "default_acne_url")]
    pub acne_url: String,

    /// Prediction endpoint of the rosacea model
    #[serde(default = "default_rosacea_url")]
    pub rosacea_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            http_port: default_http_port(),
            max_upload_bytes: default_max_upload_bytes(),
            llm: LlmConfig::default(),
            classifiers: ClassifierConfig::default(),
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: default_llm_base_url(),
            model: default_llm_model(),
            max_tokens: default_max_tokens(),
            api_key_env: default_api_key_env(),
        }
    }
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            lunares_url: default_lunares_url(),
            acne_url: default_acne_url(),
            rosacea_url: default_rosacea_url(),
        }
    }
}

impl Config {
    /// Load config from the default location, or fall back to defaults
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::default_path()?)
    }

    /// Load config from a specific file. A missing file yields defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            tracing::debug!("No config at {:?}, using defaults", path);
            Ok(Config::default())
        }
    }

    /// Save config to a file, creating parent directories
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(e.to_string()))?;
        std::fs::write(path, content)?;

        Ok(())
    }

    /// Get the default config path
    pub fn default_path() -> Result<PathBuf> {
        let dir = dirs::config_dir()
            .ok_or_else(|| Error::Config("Could not find config directory".into()))?;
        Ok(dir.join("skinsight").join("config.toml"))
    }
}

// Default value functions

fn default_http_port() -> u16 {
    8000
}

fn default_max_upload_bytes() -> usize {
    10 * 1024 * 1024
}

fn default_llm_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_llm_model() -> String {
    "gpt-4o".to_string()
}

fn default_max_tokens() -> u32 {
    500
}

fn default_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

fn default_lunares_url() -> String {
    "http://127.0.0.1:8501/predict/lunares".to_string()
}

fn default_acne_url() -> String {
    "http://127.0.0.1:8501/predict/acne".to_string()
}

fn default_rosacea_url() -> String {
    "http://127.0.0.1:8501/predict/rosacea".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config = Config::load_from(&temp_dir.path().join("absent.toml")).unwrap();

        assert_eq!(config.http_port, 8000);
        assert_eq!(config.llm.model, "gpt-4o");
        assert_eq!(config.llm.max_tokens, 500);
        assert_eq!(config.llm.api_key_env, "OPENAI_API_KEY");
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(
            &path,
            "http_port = 9100\n\n[classifiers]\nacne_url = \"http://models:9000/acne\"\n",
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.http_port, 9100);
        assert_eq!(config.classifiers.acne_url, "http://models:9000/acne");
        assert_eq!(config.classifiers.lunares_url, default_lunares_url());
        assert_eq!(config.llm.base_url, "https://api.openai.com/v1");
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.max_upload_bytes = 1024;
        config.llm.model = "gpt-4o-mini".into();
        config.save(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.max_upload_bytes, 1024);
        assert_eq!(loaded.llm.model, "gpt-4o-mini");
    }

    #[test]
    fn test_invalid_toml_is_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "http_port = \"not a number\"").unwrap();

        assert!(matches!(Config::load_from(&path), Err(Error::Toml(_))));
    }
}
