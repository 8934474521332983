//! Error types for the sentiment client

use thiserror::Error;

/// Message used when the service gives no usable description of a failure
pub const GENERIC_FAILURE: &str = "Analysis failed";

#[derive(Error, Debug)]
pub enum ClassifierError {
    /// Service answered with a non-success status
    #[error("{message}")]
    Application { status: u16, message: String },

    #[error("{0}")]
    Network(#[from] reqwest::Error),

    #[error("{0}")]
    Transport(String),

    #[error("Invalid JSON response: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Coarse failure taxonomy used for logging and rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Service reachable but signalled failure
    Application,
    /// Unreachable, timed out, or replied with something unparsable
    Transport,
    /// Local setup problem, never produced by a request
    Config,
}

impl ClassifierError {
    /// Build an application error from an optional service-provided message
    pub fn application(status: u16, message: Option<String>) -> Self {
        let message = message
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| GENERIC_FAILURE.to_string());
        Self::Application { status, message }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Application { .. } => ErrorKind::Application,
            Self::Network(_)
            | Self::Transport(_)
            | Self::InvalidJson(_)
            | Self::MalformedResponse(_) => ErrorKind::Transport,
            Self::Config(_) => ErrorKind::Config,
        }
    }

    /// Human-readable description shown to the user, never empty.
    ///
    /// Appends each distinct cause from the source chain, e.g.
    /// `error sending request for url (...): tcp connect error: Connection refused`.
    pub fn user_message(&self) -> String {
        let mut message = self.to_string();
        let mut source = std::error::Error::source(self);
        while let Some(cause) = source {
            let text = cause.to_string();
            if !text.trim().is_empty() && !message.contains(&text) {
                if !message.trim().is_empty() {
                    message.push_str(": ");
                }
                message.push_str(&text);
            }
            source = std::error::Error::source(cause);
        }

        if message.trim().is_empty() {
            GENERIC_FAILURE.to_string()
        } else {
            message
        }
    }
}

impl From<config::ConfigError> for ClassifierError {
    fn from(err: config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ClassifierError>;
