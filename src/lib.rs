//! Skinsight - HTTP API for skin image classification and dermatology guidance

pub mod config;
pub mod error;
pub mod types;

pub mod classify;
pub mod conditions;
pub mod llm;
pub mod store;
pub mod api;

pub use config::Config;
pub use error::{Error, Result};
pub use types::*;
