//! HTTP classifier
//!
//! POSTs `{"text": ...}` to the predict endpoint and interprets the reply.

use super::{AnalysisRequest, AnalysisResult, Classifier, HealthStatus};
use crate::config::ClassifierConfig;
use crate::error::{ClassifierError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

/// Classifier backed by the remote HTTP service
pub struct HttpClassifier {
    http: Client,
    predict_url: String,
    health_url: String,
}

impl HttpClassifier {
    /// Create a new client from config
    pub fn new(config: &ClassifierConfig) -> Result<Self> {
        config.validate()?;
        let http = Client::builder().timeout(config.timeout()).build()?;

        Ok(Self {
            http,
            predict_url: config.predict_url(),
            health_url: config.health_url(),
        })
    }

    pub fn predict_url(&self) -> &str {
        &self.predict_url
    }
}

#[async_trait]
impl Classifier for HttpClassifier {
    async fn classify(&self, request: &AnalysisRequest) -> Result<AnalysisResult> {
        let resp = self
            .http
            .post(&self.predict_url)
            .header("content-type", "application/json")
            .json(request)
            .send()
            .await?;

        let status = resp.status();
        let text = resp.text().await?;
        tracing::debug!(
            status = status.as_u16(),
            "classifier raw response: {}",
            truncate(&text, 500)
        );

        interpret_response(status.as_u16(), &text)
    }

    async fn health(&self) -> Result<HealthStatus> {
        let resp = self.http.get(&self.health_url).send().await?;
        let status = resp.status();
        let text = resp.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<Value>(&text)
                .ok()
                .and_then(|v| error_message(&v));
            return Err(ClassifierError::application(status.as_u16(), message));
        }

        Ok(serde_json::from_str(&text)?)
    }
}

/// Turn a status code and body into a result or failure.
///
/// An unparsable body is a failure whatever the status. A success status
/// still needs both `sentiment` and `confidence` to count as a result.
pub(crate) fn interpret_response(status: u16, body: &str) -> Result<AnalysisResult> {
    let value: Value = serde_json::from_str(body)?;
    let success = (200..300).contains(&status);

    if !success {
        return Err(ClassifierError::application(status, error_message(&value)));
    }

    let sentiment = match value.get("sentiment") {
        Some(Value::String(s)) if !s.trim().is_empty() => s.clone(),
        Some(Value::String(_)) => {
            return Err(ClassifierError::MalformedResponse("empty `sentiment` label".into()))
        }
        Some(_) => {
            return Err(ClassifierError::MalformedResponse("`sentiment` is not a string".into()))
        }
        None => return Err(missing_field(&value, status, "sentiment")),
    };

    let confidence = match value.get("confidence") {
        Some(Value::Number(n)) => n.as_f64().ok_or_else(|| {
            ClassifierError::MalformedResponse("`confidence` is not representable".into())
        })?,
        Some(_) => {
            return Err(ClassifierError::MalformedResponse("`confidence` is not a number".into()))
        }
        None => return Err(missing_field(&value, status, "confidence")),
    };

    if !(0.0..=100.0).contains(&confidence) {
        return Err(ClassifierError::MalformedResponse(format!(
            "`confidence` {} outside 0-100",
            confidence
        )));
    }

    let processed_text = value
        .get("processed_text")
        .and_then(Value::as_str)
        .map(str::to_string);

    Ok(AnalysisResult {
        sentiment,
        confidence,
        processed_text,
    })
}

/// A success status that carries an `error` field is still an application
/// failure; otherwise the payload is just malformed.
fn missing_field(value: &Value, status: u16, field: &str) -> ClassifierError {
    match error_message(value) {
        Some(message) => ClassifierError::application(status, Some(message)),
        None => ClassifierError::MalformedResponse(format!("missing `{}`", field)),
    }
}

fn error_message(value: &Value) -> Option<String> {
    value
        .get("error")
        .and_then(Value::as_str)
        .map(str::to_string)
}

fn truncate(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
