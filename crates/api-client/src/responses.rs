use core_types::{DealResult, IndustryMultipleTable, ModelConfiguration};
use serde::Deserialize;

/// The response from `GET /get-config`.
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigEnvelope {
    pub config: ModelConfiguration,
}

/// The response from `GET /get-industry-multiples`.
#[derive(Debug, Clone, Deserialize)]
pub struct MultiplesEnvelope {
    pub industry_multiples: IndustryMultipleTable,
}

/// The response from `POST /upload-csv`. Each entry is rendered verbatim.
#[derive(Debug, Clone, Deserialize)]
pub struct CsvUploadResponse {
    pub results: Vec<DealResult>,
}

/// Acknowledgement of a `PUT`. The server also echoes the document back; only the
/// message is kept.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Ack {
    #[serde(default)]
    pub message: Option<String>,
}
