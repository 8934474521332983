//! Presentation collaborator
//!
//! The controller reports every transition to a [`Presenter`]. Rendering
//! decisions (labels, styling, prompts) live here so the controller only
//! deals in states.


use crate::client::AnalysisResult;
use parking_lot::Mutex;
use rand::seq::IndexedRandom;
use std::io::Write;

/// Example inputs offered as prompt hints
pub const EXAMPLES: [&str; 4] = [
    "I absolutely love this new feature!",
    "This is terrible and doesn't work at all.",
    "The weather is nice today.",
    "I'm so excited about the weekend!",
];

pub const DEFAULT_PLACEHOLDER: &str = "Type your message here...";

/// Random example formatted as a prompt hint
pub fn suggestion() -> String {
    let example = EXAMPLES.choose(&mut rand::rng()).copied().unwrap_or(EXAMPLES[0]);
    format!("Try: \"{}\"", example)
}

/// Display tone derived from the label; styling only, never validation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SentimentTone {
    Positive,
    Negative,
    Neutral,
    Other,
}

impl SentimentTone {
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "positive" => Self::Positive,
            "negative" => Self::Negative,
            "neutral" => Self::Neutral,
            _ => Self::Other,
        }
    }

    pub fn marker(&self) -> &'static str {
        match self {
            Self::Positive => "[+]",
            Self::Negative => "[-]",
            Self::Neutral => "[=]",
            Self::Other => "[?]",
        }
    }
}

/// Render-ready view of a successful analysis
#[derive(Debug, Clone, PartialEq)]
pub struct SentimentView {
    pub label: String,
    pub confidence_text: String,
    /// Lower-cased label, used as a style key
    pub style_class: String,
    pub tone: SentimentTone,
}

impl SentimentView {
    pub fn from_result(result: &AnalysisResult) -> Self {
        Self {
            label: result.sentiment.clone(),
            confidence_text: format!("{}% confident", result.confidence),
            style_class: result.sentiment.to_lowercase(),
            tone: SentimentTone::from_label(&result.sentiment),
        }
    }
}

/// Consumer of controller transitions
#[cfg_attr(test, mockall::automock)]
pub trait Presenter: Send + Sync {
    /// Request issued: show busy indicator, disable submission
    fn on_submitting(&self, text: &str);
    fn on_succeeded(&self, view: &SentimentView);
    fn on_failed(&self, message: &str);
    /// Request settled either way: re-enable submission
    fn on_settled(&self);
}

/// Presenter that renders nothing
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopPresenter;

impl Presenter for NoopPresenter {
    fn on_submitting(&self, _text: &str) {}
    fn on_succeeded(&self, _view: &SentimentView) {}
    fn on_failed(&self, _message: &str) {}
    fn on_settled(&self) {}
}

/// Line-oriented renderer for terminals
pub struct TerminalPresenter<W: Write + Send> {
    out: Mutex<W>,
    prompt: Option<String>,
}

impl TerminalPresenter<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write + Send> TerminalPresenter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
            prompt: None,
        }
    }

    /// Print `prompt` whenever input is accepted again
    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = Some(prompt.into());
        self
    }

    pub fn into_inner(self) -> W {
        self.out.into_inner()
    }

    fn emit(&self, line: &str) {
        let mut out = self.out.lock();
        if let Err(e) = writeln!(out, "{}", line).and_then(|_| out.flush()) {
            tracing::debug!("terminal write failed: {}", e);
        }
    }
}

impl<W: Write + Send> Presenter for TerminalPresenter<W> {
    fn on_submitting(&self, _text: &str) {
        self.emit("Analyzing...");
    }

    fn on_succeeded(&self, view: &SentimentView) {
        self.emit(&format!(
            "{} {} | {}",
            view.tone.marker(),
            view.label,
            view.confidence_text
        ));
    }

    fn on_failed(&self, message: &str) {
        self.emit(&format!("Error: {}", message));
    }

    fn on_settled(&self) {
        if let Some(prompt) = &self.prompt {
            let mut out = self.out.lock();
            if let Err(e) = write!(out, "{}", prompt).and_then(|_| out.flush()) {
                tracing::debug!("terminal write failed: {}", e);
            }
        }
    }
}
