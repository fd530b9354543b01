use crate::Transport;
use crate::error::{TransportCause, TransportError};
use crate::request::{ApiRequest, RequestBody};
use async_trait::async_trait;
use configuration::ApiSettings;
use reqwest::multipart::{Form, Part};
use serde_json::Value;
use std::time::Duration;

/// The `reqwest`-backed transport. One attempt per call, no retry.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(settings: &ApiSettings) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| TransportError::logged("", TransportCause::from(e)))?;

        Ok(Self {
            client,
            base_url: settings.trimmed_base_url().to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn execute(&self, request: ApiRequest) -> Result<Value, TransportCause> {
        let url = format!("{}{}", self.base_url, request.path);

        let mut builder = self.client.request(request.method, &url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        builder = match request.body {
            None => builder,
            Some(RequestBody::Json(body)) => builder.json(&body),
            Some(RequestBody::Multipart(file)) => {
                let part = Part::bytes(file.bytes)
                    .file_name(file.file_name)
                    .mime_str(&file.mime)?;
                builder.multipart(Form::new().part(file.field, part))
            }
        };

        let response = builder.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(TransportCause::Status {
                status: status.as_u16(),
                body: text,
            });
        }
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text).map_err(|e| TransportCause::Deserialization(e.to_string()))
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn request(&self, request: ApiRequest) -> Result<Value, TransportError> {
        let path = request.path.clone();
        tracing::debug!(method = %request.method, path = %path, "Sending request to evaluator.");
        self.execute(request)
            .await
            .map_err(|cause| TransportError::logged(path, cause))
    }
}
