//! Per-interaction submission state

use super::adapter::PredictorAdapter;
use crate::error::Result;
use crate::models::{PredictionOutcome, RawAnswers};

/// Where a session stands between submissions
#[derive(Debug, Clone, Default)]
pub enum SessionState {
    #[default]
    AwaitingSubmission,
    Predicted(PredictionOutcome),
}

/// One user's form: submit answers, read the result, submit again.
///
/// A failed submission leaves the session awaiting input; it never holds a
/// half-finished result.
pub struct PredictionSession<'a> {
    adapter: &'a PredictorAdapter,
    state: SessionState,
}

impl<'a> PredictionSession<'a> {
    pub fn new(adapter: &'a PredictorAdapter) -> Self {
        Self {
            adapter,
            state: SessionState::AwaitingSubmission,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Latest result, if the last submission succeeded
    pub fn outcome(&self) -> Option<&PredictionOutcome> {
        match &self.state {
            SessionState::Predicted(outcome) => Some(outcome),
            SessionState::AwaitingSubmission => None,
        }
    }

    pub fn submit(&mut self, raw: &RawAnswers) -> Result<PredictionOutcome> {
        self.state = SessionState::AwaitingSubmission;
        let outcome = self.adapter.predict(raw)?;
        self.state = SessionState::Predicted(outcome.clone());
        Ok(outcome)
    }

    pub fn reset(&mut self) {
        self.state = SessionState::AwaitingSubmission;
    }
}
