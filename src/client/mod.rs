//! Classification service client
//!
//! The controller talks to the classifier only through the [`Classifier`]
//! trait:
//! - `HttpClassifier`: JSON over HTTP against the remote service
//! - `MockClassifier`: scripted responses for tests and offline runs

mod http;
pub mod mock;
#[cfg(test)]
mod tests;

pub use http::HttpClassifier;
pub use mock::{MockClassifier, MockReply};

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Body sent to the classification endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalysisRequest {
    pub text: String,
}

impl AnalysisRequest {
    /// Build a request from raw user input.
    ///
    /// Returns `None` when the input is empty after trimming, so an invalid
    /// request can never reach the wire.
    pub fn from_input(raw: &str) -> Option<Self> {
        let text = raw.trim();
        if text.is_empty() {
            None
        } else {
            Some(Self {
                text: text.to_string(),
            })
        }
    }
}

/// Classification returned by the service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Opaque label, e.g. "Positive"
    pub sentiment: String,
    /// Percentage in [0, 100]
    pub confidence: f64,
    /// Normalised text the service actually classified
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processed_text: Option<String>,
}

impl AnalysisResult {
    pub fn new(sentiment: impl Into<String>, confidence: f64) -> Self {
        Self {
            sentiment: sentiment.into(),
            confidence,
            processed_text: None,
        }
    }
}

/// Service health report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub model_loaded: bool,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.status.eq_ignore_ascii_case("healthy") && self.model_loaded
    }
}

/// Single-shot classification call
#[async_trait]
pub trait Classifier: Send + Sync {
    /// Classify one request. Resolves exactly once with a result or failure.
    async fn classify(&self, request: &AnalysisRequest) -> Result<AnalysisResult>;

    /// Query service health
    async fn health(&self) -> Result<HealthStatus>;
}
