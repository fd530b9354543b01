use serde::Deserialize;
use std::path::PathBuf;

/// The root settings structure for the client.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub api: ApiSettings,
    pub store: StoreSettings,
    pub logging: LoggingSettings,
}

/// Where the evaluator lives and how long a single request may take.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiSettings {
    /// Base address every endpoint path is appended to, e.g. "http://127.0.0.1:8000".
    pub base_url: String,
    /// Per-request timeout. There is no retry on top of it.
    pub timeout_secs: u64,
}

/// Behaviour of the configuration editor.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreSettings {
    pub coercion: CoercionPolicy,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    /// A `tracing_subscriber::EnvFilter` directive. `RUST_LOG` takes precedence.
    pub filter: String,
    /// When set, logs go to a daily rolling file in this directory instead of stderr.
    pub directory: Option<PathBuf>,
}

/// What to do when a numeric configuration edit does not parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum CoercionPolicy {
    /// Store zero in place of the unparseable value.
    #[default]
    Lenient,
    /// Reject the edit and keep the previous value.
    Strict,
}

impl ApiSettings {
    /// The base address without a trailing slash, ready for `format!("{base}{path}")`.
    pub fn trimmed_base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}
