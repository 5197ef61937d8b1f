use thiserror::Error;

/// Unified error type for the hook programs
#[derive(Error, Debug)]
pub enum HookError {
    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Version error: {0}")]
    Version(String),

    #[error("Remote operation failed: {0}")]
    Remote(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("External tool failed: {0}")]
    Tool(String),

    #[error("Notebook error: {0}")]
    Notebook(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in the hook library
pub type Result<T> = std::result::Result<T, HookError>;

impl HookError {
    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        HookError::Config(msg.into())
    }

    /// Create a version error with context
    pub fn version(msg: impl Into<String>) -> Self {
        HookError::Version(msg.into())
    }

    /// Create a remote error with context
    pub fn remote(msg: impl Into<String>) -> Self {
        HookError::Remote(msg.into())
    }

    /// Create an external tool error with context
    pub fn tool(msg: impl Into<String>) -> Self {
        HookError::Tool(msg.into())
    }

    /// Create a notebook error with context
    pub fn notebook(msg: impl Into<String>) -> Self {
        HookError::Notebook(msg.into())
    }
}
