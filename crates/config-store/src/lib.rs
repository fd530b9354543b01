//! # Configuration Store
//!
//! Client-side copy of the two documents the evaluator holds: the model
//! configuration and the industry multiple table. Both start from a fallback,
//! are replaced by a successful load, edited in place, and written back by an
//! explicit two-phase save.

use api_client::EvaluatorClient;
use configuration::CoercionPolicy;
use core_types::{ConfigField, IndustryMultipleTable, ModelConfiguration, fallback_multiples};
use rust_decimal::Decimal;

pub mod coercion;
pub mod error;

pub use error::StoreError;

/// Where the current copy of a document came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentSource {
    Fallback,
    Loaded,
}

/// Progress of the two-write save.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SavePhase {
    Idle,
    WritingConfig,
    /// The configuration is on the server; the multiples are not yet.
    ConfigCommitted,
    WritingMultiples,
    Saved,
    /// The configuration write failed, so nothing was written.
    Failed,
}

/// The documents used until the first load answers.
#[derive(Debug, Clone, PartialEq)]
pub struct Fallback {
    pub config: ModelConfiguration,
    pub multiples: IndustryMultipleTable,
}

impl Default for Fallback {
    fn default() -> Self {
        Self {
            config: ModelConfiguration::default(),
            multiples: fallback_multiples(),
        }
    }
}

pub struct ConfigStore {
    client: EvaluatorClient,
    policy: CoercionPolicy,
    config: ModelConfiguration,
    multiples: IndustryMultipleTable,
    config_source: DocumentSource,
    multiples_source: DocumentSource,
    save_phase: SavePhase,
}

impl ConfigStore {
    pub fn new(client: EvaluatorClient, fallback: Fallback, policy: CoercionPolicy) -> Self {
        Self {
            client,
            policy,
            config: fallback.config,
            multiples: fallback.multiples,
            config_source: DocumentSource::Fallback,
            multiples_source: DocumentSource::Fallback,
            save_phase: SavePhase::Idle,
        }
    }

    pub fn config(&self) -> &ModelConfiguration {
        &self.config
    }

    pub fn multiples(&self) -> &IndustryMultipleTable {
        &self.multiples
    }

    pub fn config_source(&self) -> DocumentSource {
        self.config_source
    }

    pub fn multiples_source(&self) -> DocumentSource {
        self.multiples_source
    }

    pub fn save_phase(&self) -> SavePhase {
        self.save_phase
    }

    /// Fetches the model configuration. On failure the current copy is untouched.
    pub async fn load_config(&mut self) -> Result<&ModelConfiguration, StoreError> {
        let config = self.client.get_config().await.map_err(StoreError::ConfigLoad)?;
        self.config = config;
        self.config_source = DocumentSource::Loaded;
        tracing::info!("Model configuration loaded.");
        Ok(&self.config)
    }

    /// Fetches the multiple table. Its key set becomes the industry option list.
    pub async fn load_multiples(&mut self) -> Result<&IndustryMultipleTable, StoreError> {
        let multiples = self
            .client
            .get_industry_multiples()
            .await
            .map_err(StoreError::MultiplesLoad)?;
        self.multiples = multiples;
        self.multiples_source = DocumentSource::Loaded;
        tracing::info!(industries = self.multiples.len(), "Industry multiples loaded.");
        Ok(&self.multiples)
    }

    /// Sets one modeled assumption from raw text, coerced per the store's policy.
    pub fn set_config_field(&mut self, name: &str, raw: &str) -> Result<Decimal, StoreError> {
        let field: ConfigField = name.parse()?;
        let value = coercion::coerce(self.policy, field.as_str(), raw)?;
        self.config.set(field, value);
        Ok(value)
    }

    /// Sets the multiple of an existing industry from raw text, coerced per the store's policy.
    pub fn set_multiple(&mut self, industry: &str, raw: &str) -> Result<Decimal, StoreError> {
        if !self.multiples.contains(industry) {
            return Err(core_types::ValidationError::UnknownIndustry(industry.to_string()).into());
        }
        let value = coercion::coerce(self.policy, industry, raw)?;
        self.multiples.update(industry, Some(value))?;
        Ok(value)
    }

    /// First phase: writes the model configuration.
    pub async fn commit_config(&mut self) -> Result<(), StoreError> {
        self.save_phase = SavePhase::WritingConfig;
        match self.client.update_config(&self.config).await {
            Ok(_) => {
                self.save_phase = SavePhase::ConfigCommitted;
                Ok(())
            }
            Err(err) => {
                self.save_phase = SavePhase::Failed;
                Err(StoreError::Save(err))
            }
        }
    }

    /// Second phase: writes the multiple table.
    ///
    /// Only runs once the configuration is committed. A failure leaves the phase
    /// at `ConfigCommitted`, so this can be retried on its own.
    pub async fn commit_multiples(&mut self) -> Result<(), StoreError> {
        if self.save_phase != SavePhase::ConfigCommitted {
            return Err(StoreError::ConfigNotCommitted(self.save_phase));
        }
        self.save_phase = SavePhase::WritingMultiples;
        match self.client.update_industry_multiples(&self.multiples).await {
            Ok(_) => {
                self.save_phase = SavePhase::Saved;
                Ok(())
            }
            Err(err) => {
                self.save_phase = SavePhase::ConfigCommitted;
                Err(StoreError::PartialSave(err))
            }
        }
    }

    /// Writes both documents, configuration first. The multiples are only
    /// attempted after the configuration write succeeded.
    pub async fn save(&mut self) -> Result<(), StoreError> {
        self.commit_config().await?;
        self.commit_multiples().await?;
        tracing::info!("Configuration and industry multiples saved.");
        Ok(())
    }
}
