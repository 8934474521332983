//! Request controller
//!
//! Owns the lifecycle of a single classification request:
//!
//! ```text
//! Idle | Succeeded | Failed --submit(text)--> Submitting
//! Submitting --(ok, well-formed)--> Succeeded
//! Submitting --(error payload | transport failure | malformed)--> Failed
//! any --submit(blank)--> unchanged
//! Submitting --submit(any)--> unchanged (rejected, busy)
//! ```
//!
//! At most one request is in flight. A submission made while busy is
//! rejected rather than queued or substituted. Dropping the `submit` future
//! abandons the call and settles to `Failed("Analysis interrupted")`.


use crate::client::{AnalysisRequest, AnalysisResult, Classifier};
use crate::presentation::{NoopPresenter, Presenter, SentimentView};
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Reported when a submission future is dropped before the call settles
pub const INTERRUPTED: &str = "Analysis interrupted";

/// Where the current request is in its lifecycle
#[derive(Debug, Clone, PartialEq)]
pub enum Phase {
    Idle,
    Submitting,
    Succeeded(AnalysisResult),
    Failed(String),
}

/// Snapshot of the controller. The busy flag gates resubmission and is
/// cleared on every settlement.
#[derive(Debug, Clone, PartialEq)]
pub struct ControllerState {
    phase: Phase,
    busy: bool,
}

impl ControllerState {
    pub fn idle() -> Self {
        Self {
            phase: Phase::Idle,
            busy: false,
        }
    }

    fn submitting() -> Self {
        Self {
            phase: Phase::Submitting,
            busy: true,
        }
    }

    fn settled(phase: Phase) -> Self {
        Self { phase, busy: false }
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn result(&self) -> Option<&AnalysisResult> {
        match &self.phase {
            Phase::Succeeded(result) => Some(result),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.phase {
            Phase::Failed(message) => Some(message),
            _ => None,
        }
    }
}

impl Default for ControllerState {
    fn default() -> Self {
        Self::idle()
    }
}

/// What a call to [`RequestController::submit`] did
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Blank input; nothing happened
    Ignored,
    /// Another request was in flight; nothing happened
    Rejected,
    /// A request was issued and settled into this state
    Settled(ControllerState),
}

/// Serialises user submissions against a single classifier
pub struct RequestController {
    state: Mutex<ControllerState>,
    classifier: Arc<dyn Classifier>,
    presenter: Arc<dyn Presenter>,
}

impl RequestController {
    pub fn new(classifier: Arc<dyn Classifier>) -> Self {
        Self {
            state: Mutex::new(ControllerState::idle()),
            classifier,
            presenter: Arc::new(NoopPresenter),
        }
    }

    pub fn with_presenter(mut self, presenter: Arc<dyn Presenter>) -> Self {
        self.presenter = presenter;
        self
    }

    /// Latest state; no side effects
    pub fn current_state(&self) -> ControllerState {
        self.state.lock().clone()
    }

    pub fn is_busy(&self) -> bool {
        self.state.lock().busy
    }

    /// Validate `raw`, issue one classification request and settle.
    ///
    /// Never fails: every error ends up as [`Phase::Failed`].
    pub async fn submit(&self, raw: &str) -> SubmitOutcome {
        let Some(request) = AnalysisRequest::from_input(raw) else {
            debug!("ignoring blank submission");
            return SubmitOutcome::Ignored;
        };

        let request_id = Uuid::new_v4();
        {
            let mut state = self.state.lock();
            if state.busy {
                warn!(%request_id, "request already in flight, submission rejected");
                return SubmitOutcome::Rejected;
            }
            *state = ControllerState::submitting();
        }

        let in_flight = InFlight {
            controller: self,
            request_id,
            settled: false,
        };
        self.presenter.on_submitting(&request.text);
        info!(
            %request_id,
            chars = request.text.chars().count(),
            "submitting text for analysis"
        );

        let phase = match self.classifier.classify(&request).await {
            Ok(result) => {
                info!(
                    %request_id,
                    sentiment = %result.sentiment,
                    confidence = result.confidence,
                    "analysis succeeded"
                );
                Phase::Succeeded(result)
            }
            Err(e) => {
                warn!(%request_id, kind = ?e.kind(), "analysis failed: {}", e);
                Phase::Failed(e.user_message())
            }
        };

        SubmitOutcome::Settled(in_flight.settle(phase))
    }

    /// Publish the settled phase, notify the presenter, then release busy.
    /// Busy stays set until every settlement callback has returned.
    fn apply_settlement(&self, phase: Phase) -> ControllerState {
        self.state.lock().phase = phase.clone();

        match &phase {
            Phase::Succeeded(result) => self.presenter.on_succeeded(&SentimentView::from_result(result)),
            Phase::Failed(message) => self.presenter.on_failed(message),
            Phase::Idle | Phase::Submitting => {}
        }
        self.presenter.on_settled();

        let mut state = self.state.lock();
        *state = ControllerState::settled(phase);
        state.clone()
    }
}

/// Settles the controller exactly once, even if the submit future is dropped
/// while the call is outstanding.
struct InFlight<'a> {
    controller: &'a RequestController,
    request_id: Uuid,
    settled: bool,
}

impl InFlight<'_> {
    fn settle(mut self, phase: Phase) -> ControllerState {
        self.settled = true;
        self.controller.apply_settlement(phase)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if !self.settled {
            warn!(request_id = %self.request_id, "submission dropped before settling");
            self.controller
                .apply_settlement(Phase::Failed(INTERRUPTED.to_string()));
        }
    }
}
