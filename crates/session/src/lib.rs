//! # Evaluation Session
//!
//! The submit → await → render cycle shared by everything that talks to the
//! evaluator. `SessionState` is the state machine; `EvaluationSession` performs
//! the one request each submit makes.

use api_client::{CsvUploadResponse, EvaluatorClient, TransportError};
use core_types::{DealRequest, DealResult};

/// Where an asynchronous operation stands, from the UI's point of view.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionState<T> {
    Idle,
    Pending,
    Resolved(T),
    Failed(String),
}

impl<T> Default for SessionState<T> {
    fn default() -> Self {
        SessionState::Idle
    }
}

impl<T> SessionState<T> {
    /// Moves to `Pending`. Returns `false`, changing nothing, if already pending.
    pub fn begin(&mut self) -> bool {
        if self.is_pending() {
            return false;
        }
        *self = SessionState::Pending;
        true
    }

    /// Stores the outcome, replacing whatever was shown before.
    pub fn resolve(&mut self, value: T) {
        *self = SessionState::Resolved(value);
    }

    /// Stores the error message. Any previous result is dropped.
    pub fn fail(&mut self, message: impl Into<String>) {
        *self = SessionState::Failed(message.into());
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, SessionState::Pending)
    }

    pub fn result(&self) -> Option<&T> {
        match self {
            SessionState::Resolved(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            SessionState::Failed(message) => Some(message),
            _ => None,
        }
    }
}

/// Sends deals (and CSV batches) to the evaluator.
///
/// Each call is one request that runs to completion; there is no cancellation
/// and no timeout beyond the transport's own. Guarding against overlapping
/// submits is the caller's job.
#[derive(Clone)]
pub struct EvaluationSession {
    client: EvaluatorClient,
}

impl EvaluationSession {
    pub fn new(client: EvaluatorClient) -> Self {
        Self { client }
    }

    pub async fn submit(&self, request: &DealRequest) -> Result<DealResult, TransportError> {
        tracing::info!(
            company = %request.company_name,
            industry = %request.industry,
            "Submitting deal for evaluation."
        );
        let result = self.client.evaluate_deal(request).await?;
        tracing::info!(company = %request.company_name, "Deal evaluated.");
        Ok(result)
    }

    pub async fn submit_csv(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<CsvUploadResponse, TransportError> {
        tracing::info!(file = file_name, size = bytes.len(), "Uploading CSV for evaluation.");
        let response = self.client.upload_csv(file_name, bytes).await?;
        tracing::info!(results = response.results.len(), "CSV evaluated.");
        Ok(response)
    }
}
