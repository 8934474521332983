//! Mock classifier for testing
//!
//! Provides scripted replies for:
//! - Unit tests without network calls
//! - Holding a request in flight until the test releases it

use super::http::interpret_response;
use super::{AnalysisRequest, AnalysisResult, Classifier, HealthStatus};
use crate::error::{ClassifierError, Result};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::Semaphore;

/// One scripted reply
#[derive(Debug, Clone)]
pub enum MockReply {
    /// Well-formed success
    Success(AnalysisResult),
    /// Status and raw body, interpreted exactly like a live response
    Raw { status: u16, body: String },
    /// Connection-level failure with the given description
    TransportFailure(String),
}

impl MockReply {
    pub fn success(sentiment: &str, confidence: f64) -> Self {
        Self::Success(AnalysisResult::new(sentiment, confidence))
    }

    pub fn raw(status: u16, body: impl Into<String>) -> Self {
        Self::Raw {
            status,
            body: body.into(),
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::TransportFailure(message.into())
    }

    fn into_result(self) -> Result<AnalysisResult> {
        match self {
            Self::Success(result) => Ok(result),
            Self::Raw { status, body } => interpret_response(status, &body),
            Self::TransportFailure(message) => Err(ClassifierError::Transport(message)),
        }
    }
}

/// Scripted classifier
pub struct MockClassifier {
    replies: Mutex<VecDeque<MockReply>>,
    fallback: MockReply,
    requests: Mutex<Vec<AnalysisRequest>>,
    gate: Option<Arc<Semaphore>>,
    latency_ms: u64,
    healthy: bool,
}

impl MockClassifier {
    pub fn new() -> Self {
        Self {
            replies: Mutex::new(VecDeque::new()),
            fallback: MockReply::success("Neutral", 50.0),
            requests: Mutex::new(Vec::new()),
            gate: None,
            latency_ms: 0,
            healthy: true,
        }
    }

    /// Queue a reply; queued replies are used in order before the fallback
    pub fn with_reply(self, reply: MockReply) -> Self {
        self.replies.lock().push_back(reply);
        self
    }

    /// Reply used once the queue is exhausted
    pub fn with_fallback(mut self, reply: MockReply) -> Self {
        self.fallback = reply;
        self
    }

    /// Each call waits for one permit on `gate` before replying
    pub fn with_gate(mut self, gate: Arc<Semaphore>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn with_latency(mut self, ms: u64) -> Self {
        self.latency_ms = ms;
        self
    }

    pub fn unhealthy(mut self) -> Self {
        self.healthy = false;
        self
    }

    /// Requests seen so far, in issue order
    pub fn requests(&self) -> Vec<AnalysisRequest> {
        self.requests.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().len()
    }

    fn next_reply(&self) -> MockReply {
        self.replies
            .lock()
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone())
    }

    async fn simulate_latency(&self) {
        if self.latency_ms > 0 {
            tokio::time::sleep(std::time::Duration::from_millis(self.latency_ms)).await;
        }
    }
}

impl Default for MockClassifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Classifier for MockClassifier {
    async fn classify(&self, request: &AnalysisRequest) -> Result<AnalysisResult> {
        self.requests.lock().push(request.clone());

        if let Some(gate) = &self.gate {
            let permit = gate
                .acquire()
                .await
                .map_err(|_| ClassifierError::Transport("mock gate closed".into()))?;
            permit.forget();
        }
        self.simulate_latency().await;

        self.next_reply().into_result()
    }

    async fn health(&self) -> Result<HealthStatus> {
        Ok(HealthStatus {
            status: if self.healthy { "healthy" } else { "degraded" }.to_string(),
            model_loaded: self.healthy,
        })
    }
}
