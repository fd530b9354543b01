pub mod defaults;
pub mod enums;
pub mod error;
pub mod numeric;
pub mod structs;

// Re-export the core types to provide a clean public API.
pub use defaults::fallback_multiples;
pub use enums::{ConfigField, DealField, FieldKind, SecurityType};
pub use error::ValidationError;
pub use numeric::parse_decimal;
pub use structs::{
    DealDraft, DealRequest, DealResult, IndustryMultipleTable, ModelConfiguration, format_multiple,
};
