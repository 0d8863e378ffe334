use thiserror::Error;

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("failed to access history file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to encode history: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
}

#[derive(Debug, Error)]
#[error("unknown format: {0}")]
pub struct UnknownFormat(pub String);
