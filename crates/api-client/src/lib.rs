use async_trait::async_trait;
use core_types::{DealRequest, DealResult, IndustryMultipleTable, ModelConfiguration};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;

pub mod error;
pub mod http;
pub mod request;
pub mod responses;
#[cfg(any(test, feature = "testing"))]
pub mod testing;

// --- Public API ---
pub use error::{TransportCause, TransportError};
pub use http::HttpTransport;
pub use request::{ApiRequest, FilePart, RequestBody};
pub use responses::{Ack, ConfigEnvelope, CsvUploadResponse, MultiplesEnvelope};

pub const EVALUATE_DEAL_PATH: &str = "/evaluate-deal";
pub const UPLOAD_CSV_PATH: &str = "/upload-csv";
pub const GET_CONFIG_PATH: &str = "/get-config";
pub const GET_INDUSTRY_MULTIPLES_PATH: &str = "/get-industry-multiples";
pub const UPDATE_CONFIG_PATH: &str = "/update-config";
pub const UPDATE_INDUSTRY_MULTIPLES_PATH: &str = "/update-industry-multiples";

/// The seam between the client and the network.
///
/// An implementation sends one request and returns the decoded JSON payload, or a
/// `TransportError` carrying the path and the cause. It must not retry.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn request(&self, request: ApiRequest) -> Result<Value, TransportError>;
}

/// Typed access to the evaluator's endpoints over any `Transport`.
#[derive(Clone)]
pub struct EvaluatorClient {
    transport: Arc<dyn Transport>,
}

impl EvaluatorClient {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// # POST /evaluate-deal
    pub async fn evaluate_deal(&self, deal: &DealRequest) -> Result<DealResult, TransportError> {
        let body = encode(EVALUATE_DEAL_PATH, deal)?;
        let payload = self
            .transport
            .request(ApiRequest::post(EVALUATE_DEAL_PATH).json(body))
            .await?;
        Ok(DealResult(payload))
    }

    /// # POST /upload-csv
    /// Ships the file untouched as multipart field `file`; parsing happens server-side.
    pub async fn upload_csv(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<CsvUploadResponse, TransportError> {
        let part = FilePart {
            field: "file".to_string(),
            file_name: file_name.to_string(),
            mime: "text/csv".to_string(),
            bytes,
        };
        let payload = self
            .transport
            .request(ApiRequest::post(UPLOAD_CSV_PATH).multipart(part))
            .await?;
        decode(UPLOAD_CSV_PATH, payload)
    }

    /// # GET /get-config
    pub async fn get_config(&self) -> Result<ModelConfiguration, TransportError> {
        let payload = self.transport.request(ApiRequest::get(GET_CONFIG_PATH)).await?;
        let envelope: ConfigEnvelope = decode(GET_CONFIG_PATH, payload)?;
        Ok(envelope.config)
    }

    /// # GET /get-industry-multiples
    pub async fn get_industry_multiples(&self) -> Result<IndustryMultipleTable, TransportError> {
        let payload = self
            .transport
            .request(ApiRequest::get(GET_INDUSTRY_MULTIPLES_PATH))
            .await?;
        let envelope: MultiplesEnvelope = decode(GET_INDUSTRY_MULTIPLES_PATH, payload)?;
        Ok(envelope.industry_multiples)
    }

    /// # PUT /update-config
    pub async fn update_config(&self, config: &ModelConfiguration) -> Result<Ack, TransportError> {
        let body = encode(UPDATE_CONFIG_PATH, config)?;
        let payload = self
            .transport
            .request(ApiRequest::put(UPDATE_CONFIG_PATH).json(body))
            .await?;
        Ok(decode_ack(payload))
    }

    /// # PUT /update-industry-multiples
    pub async fn update_industry_multiples(
        &self,
        multiples: &IndustryMultipleTable,
    ) -> Result<Ack, TransportError> {
        let body = encode(UPDATE_INDUSTRY_MULTIPLES_PATH, multiples)?;
        let payload = self
            .transport
            .request(ApiRequest::put(UPDATE_INDUSTRY_MULTIPLES_PATH).json(body))
            .await?;
        Ok(decode_ack(payload))
    }
}

fn encode<T: Serialize>(path: &str, value: &T) -> Result<Value, TransportError> {
    serde_json::to_value(value)
        .map_err(|e| TransportError::logged(path, TransportCause::Serialization(e.to_string())))
}

fn decode<T: DeserializeOwned>(path: &str, payload: Value) -> Result<T, TransportError> {
    serde_json::from_value(payload)
        .map_err(|e| TransportError::logged(path, TransportCause::Deserialization(e.to_string())))
}

// Any 2xx counts as an ack, whatever the body looks like.
fn decode_ack(payload: Value) -> Ack {
    serde_json::from_value(payload).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::StubTransport;
    use reqwest::Method;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn config_json() -> Value {
        json!({
            "modeled_discount_rate": 0.2,
            "modeled_interest_rate": 0.06,
            "modeled_revenue_growth_aggressive": 5.0,
            "modeled_revenue_growth_standard": 0.5,
            "modeled_revenue_growth_low": 0.1,
            "modeled_valuation_threshold": 0.25,
            "modeled_cash_months": 12.0
        })
    }

    #[tokio::test]
    async fn get_config_unwraps_envelope() {
        let stub = Arc::new(
            StubTransport::new().respond(GET_CONFIG_PATH, json!({ "config": config_json() })),
        );
        let client = EvaluatorClient::new(stub.clone());

        let config = client.get_config().await.expect("config loads");
        assert_eq!(config.modeled_cash_months, dec!(12));
        assert_eq!(config.modeled_discount_rate, dec!(0.2));

        let calls = stub.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].method, Method::GET);
        assert_eq!(calls[0].path, GET_CONFIG_PATH);
    }

    #[tokio::test]
    async fn missing_envelope_is_a_transport_error() {
        let stub = Arc::new(StubTransport::new().respond(GET_CONFIG_PATH, config_json()));
        let client = EvaluatorClient::new(stub);

        let err = client.get_config().await.expect_err("bare document is rejected");
        assert_eq!(err.path, GET_CONFIG_PATH);
        assert!(matches!(err.cause, TransportCause::Deserialization(_)));
    }

    #[tokio::test]
    async fn multiples_keep_the_sentinel() {
        let stub = Arc::new(StubTransport::new().respond(
            GET_INDUSTRY_MULTIPLES_PATH,
            json!({ "industry_multiples": { "Software": 3.13, "Other": null } }),
        ));
        let client = EvaluatorClient::new(stub);

        let table = client.get_industry_multiples().await.expect("table loads");
        assert_eq!(table.multiple("Other"), Some(None));
        assert_eq!(table.multiple("Software"), Some(Some(dec!(3.13))));
    }

    #[tokio::test]
    async fn update_config_puts_the_document_and_accepts_any_ack() {
        let stub = Arc::new(StubTransport::new().respond(UPDATE_CONFIG_PATH, Value::Null));
        let client = EvaluatorClient::new(stub.clone());
        let config = ModelConfiguration::default();

        let ack = client.update_config(&config).await.expect("ack");
        assert_eq!(ack, Ack::default());

        let calls = stub.calls();
        assert_eq!(calls[0].method, Method::PUT);
        assert_eq!(calls[0].body, Some(serde_json::to_value(&config).unwrap()));
    }

    #[tokio::test]
    async fn upload_csv_sends_file_field() {
        let stub = Arc::new(StubTransport::new().respond(
            UPLOAD_CSV_PATH,
            json!({ "results": [{ "company_name": "Acme", "metrics": {} }] }),
        ));
        let client = EvaluatorClient::new(stub.clone());

        let response = client
            .upload_csv("deals.csv", b"company_name\nAcme\n".to_vec())
            .await
            .expect("upload");
        assert_eq!(response.results.len(), 1);

        let calls = stub.calls();
        let part = calls[0].file.as_ref().expect("multipart body");
        assert_eq!(part.field, "file");
        assert_eq!(part.file_name, "deals.csv");
    }

    #[tokio::test]
    async fn evaluate_deal_surfaces_transport_failures_unchanged() {
        let stub = Arc::new(StubTransport::new().fail(
            EVALUATE_DEAL_PATH,
            TransportCause::Status { status: 422, body: "bad".to_string() },
        ));
        let client = EvaluatorClient::new(stub);
        let request = DealRequest {
            company_name: "Acme".to_string(),
            industry: "Software".to_string(),
            ask: dec!(1),
            valuation_cap: dec!(1),
            security_type: core_types::SecurityType::Safe,
            discount_rate: dec!(0),
            interest: dec!(0),
            yearly_revenue: vec![dec!(1)],
            monthly_burn: dec!(0),
            current_cash: dec!(0),
            previous_raise: dec!(0),
        };

        let err = client.evaluate_deal(&request).await.expect_err("fails");
        assert_eq!(err.path, EVALUATE_DEAL_PATH);
        assert_eq!(err.cause, TransportCause::Status { status: 422, body: "bad".to_string() });
    }
}
