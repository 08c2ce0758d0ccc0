//! Error types for skinsight

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Classifier error: {0}")]
    Classifier(String),

    #[error("Language model error: {0}")]
    LanguageModel(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;
