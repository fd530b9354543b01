//! An in-memory `Transport` for tests: canned answers per path, every call recorded.

use crate::Transport;
use crate::error::{TransportCause, TransportError};
use crate::request::{ApiRequest, FilePart, RequestBody};
use async_trait::async_trait;
use reqwest::Method;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

/// One request as the stub saw it.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
    pub file: Option<FilePart>,
    pub headers: Vec<(String, String)>,
}

#[derive(Debug, Clone)]
enum Canned {
    Payload(Value),
    Failure(TransportCause),
}

/// A transport that never touches the network.
///
/// Unknown paths answer with a 404 status failure. With a gate installed every
/// call waits for one `Notify` permit before answering, which keeps requests in
/// flight for as long as a test needs.
#[derive(Default)]
pub struct StubTransport {
    answers: HashMap<String, Canned>,
    calls: Mutex<Vec<RecordedCall>>,
    gate: Option<Arc<Notify>>,
}

impl StubTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(mut self, path: &str, payload: Value) -> Self {
        self.answers.insert(path.to_string(), Canned::Payload(payload));
        self
    }

    pub fn fail(mut self, path: &str, cause: TransportCause) -> Self {
        self.answers.insert(path.to_string(), Canned::Failure(cause));
        self
    }

    pub fn gated(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().expect("stub call log poisoned").clone()
    }

    /// The paths called so far, in call order.
    pub fn paths(&self) -> Vec<String> {
        self.calls().into_iter().map(|call| call.path).collect()
    }
}

#[async_trait]
impl Transport for StubTransport {
    async fn request(&self, request: ApiRequest) -> Result<Value, TransportError> {
        let (body, file) = match request.body {
            Some(RequestBody::Json(value)) => (Some(value), None),
            Some(RequestBody::Multipart(part)) => (None, Some(part)),
            None => (None, None),
        };
        self.calls
            .lock()
            .expect("stub call log poisoned")
            .push(RecordedCall {
                method: request.method,
                path: request.path.clone(),
                body,
                file,
                headers: request.headers,
            });

        if let Some(gate) = &self.gate {
            gate.notified().await;
        }

        match self.answers.get(&request.path) {
            Some(Canned::Payload(payload)) => Ok(payload.clone()),
            Some(Canned::Failure(cause)) => {
                Err(TransportError::logged(request.path, cause.clone()))
            }
            None => Err(TransportError::logged(
                request.path,
                TransportCause::Status {
                    status: 404,
                    body: "no canned answer".to_string(),
                },
            )),
        }
    }
}
