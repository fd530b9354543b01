use thiserror::Error;

/// A problem with user input caught before any request leaves the client.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{0} is required")]
    MissingField(String),

    #[error("{field} must be a number, got `{value}`")]
    InvalidNumber { field: String, value: String },

    #[error("{field} {constraint}, got {value}")]
    OutOfRange {
        field: String,
        constraint: &'static str,
        value: String,
    },

    #[error(
        "yearly revenue must be comma-separated numbers; could not parse entry {position} `{token}`"
    )]
    MalformedRevenue { token: String, position: usize },

    #[error("`{0}` is not one of the available industries")]
    UnknownIndustry(String),

    #[error("`{0}` is not a supported security type")]
    UnknownSecurityType(String),

    #[error("unknown field `{0}`")]
    UnknownField(String),
}
