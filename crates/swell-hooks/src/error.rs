use thiserror::Error;

#[derive(Debug, Error)]
pub enum HookError {
    #[error("failed to read hook config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed hook config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid hook config: {0}")]
    Invalid(String),
}
