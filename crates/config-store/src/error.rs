use crate::SavePhase;
use api_client::TransportError;
use core_types::ValidationError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    #[error("Failed to load the model configuration: {0}")]
    ConfigLoad(TransportError),

    #[error("Failed to load the industry multiples: {0}")]
    MultiplesLoad(TransportError),

    #[error("Invalid edit: {0}")]
    Validation(#[from] ValidationError),

    /// Nothing was written.
    #[error("Failed to save the model configuration: {0}")]
    Save(TransportError),

    /// The configuration was written but the multiples were not. No rollback.
    #[error("Configuration saved but industry multiples were not: {0}")]
    PartialSave(TransportError),

    /// The multiples are only written after the configuration.
    #[error("Industry multiples can only be saved after the configuration (save phase: {0:?})")]
    ConfigNotCommitted(SavePhase),
}
