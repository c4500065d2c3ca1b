use thiserror::Error;

use crate::config::ConfigError;
use crate::provider::ProviderError;
use crate::session::SessionError;

#[derive(Debug, Error)]
pub enum NavError {
    #[error("navigation session error: {0}")]
    Session(#[from] SessionError),
    #[error("upstream service error: {0}")]
    Provider(#[from] ProviderError),
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("failed to read input file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid JSON input: {0}")]
    Json(#[from] serde_json::Error),
}
