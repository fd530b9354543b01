//! # Deal Form Engine
//!
//! Owns the deal draft, shapes each keystroke, and turns the draft into a
//! `DealRequest` on submit. The submit cycle itself is a `SessionState`:
//! `Idle` is editing, `Pending` is submitting, then `Resolved` or `Failed`.

use core_types::numeric::is_numeric_input;
use core_types::{
    DealDraft, DealField, DealRequest, DealResult, FieldKind, IndustryMultipleTable,
    ValidationError,
};
use session::{EvaluationSession, SessionState};
use tokio::sync::Mutex;

pub mod options;
pub mod validate;

pub use options::{IndustryOption, industry_options, security_type_options};
pub use validate::{build_request, parse_revenue};

/// Shown for any transport failure; the cause itself goes to the log.
pub const EVALUATION_FAILED_MESSAGE: &str =
    "Failed to evaluate the deal. Please check your inputs.";

/// What happened when submit was pressed.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitAttempt {
    /// The draft is valid; the form is now submitting this request.
    Ready(DealRequest),
    /// A submit is already in flight. Nothing changed.
    Busy,
    /// The draft failed local validation; the form shows the error.
    Invalid(ValidationError),
}

/// How a full submit cycle ended.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    Evaluated(DealResult),
    /// Rejected because another submit was still in flight.
    Busy,
    Invalid(ValidationError),
    /// The request reached the transport and failed there.
    Failed(String),
}

#[derive(Debug, Default)]
pub struct DealForm {
    draft: DealDraft,
    state: SessionState<DealResult>,
}

impl DealForm {
    /// An empty draft in the editing state.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn draft(&self) -> &DealDraft {
        &self.draft
    }

    pub fn state(&self) -> &SessionState<DealResult> {
        &self.state
    }

    pub fn is_submitting(&self) -> bool {
        self.state.is_pending()
    }

    /// Applies one keystroke to one field, by name.
    ///
    /// Numeric fields refuse characters no number can contain and keep their
    /// previous text. Everything else is stored as typed and checked on submit.
    pub fn set_field(&mut self, name: &str, raw: &str) -> Result<(), ValidationError> {
        let field: DealField = name.parse()?;
        if field.kind() == FieldKind::Numeric && !is_numeric_input(raw) {
            return Err(ValidationError::InvalidNumber {
                field: field.label(),
                value: raw.to_string(),
            });
        }
        self.draft.set(field, raw);
        Ok(())
    }

    /// Validates the draft against the current industry table and, if it is
    /// valid, enters the submitting state.
    pub fn begin_submit(&mut self, multiples: &IndustryMultipleTable) -> SubmitAttempt {
        if self.is_submitting() {
            return SubmitAttempt::Busy;
        }
        match build_request(&self.draft, multiples) {
            Ok(request) => {
                self.state.begin();
                SubmitAttempt::Ready(request)
            }
            Err(err) => {
                tracing::warn!(error = %err, "Deal draft rejected before submission.");
                self.state.fail(err.to_string());
                SubmitAttempt::Invalid(err)
            }
        }
    }

    /// Records the evaluator's answer, replacing any earlier result or error.
    pub fn finish_submit(&mut self, outcome: &Result<DealResult, api_client::TransportError>) {
        match outcome {
            Ok(result) => self.state.resolve(result.clone()),
            Err(_) => self.state.fail(EVALUATION_FAILED_MESSAGE),
        }
    }
}

/// Runs one submit cycle on a shared form.
///
/// The lock is only held while reading or updating the form, never across the
/// request, so a second call made while the first is in flight sees the form
/// submitting and returns `Busy` without touching the transport.
pub async fn submit_deal(
    form: &Mutex<DealForm>,
    multiples: &IndustryMultipleTable,
    session: &EvaluationSession,
) -> SubmitOutcome {
    let attempt = form.lock().await.begin_submit(multiples);
    let request = match attempt {
        SubmitAttempt::Ready(request) => request,
        SubmitAttempt::Busy => return SubmitOutcome::Busy,
        SubmitAttempt::Invalid(err) => return SubmitOutcome::Invalid(err),
    };

    let outcome = session.submit(&request).await;
    form.lock().await.finish_submit(&outcome);

    match outcome {
        Ok(result) => SubmitOutcome::Evaluated(result),
        Err(_) => SubmitOutcome::Failed(EVALUATION_FAILED_MESSAGE.to_string()),
    }
}
