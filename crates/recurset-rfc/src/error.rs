use thiserror::Error;

use crate::rfc::ical::expand::ConversionError;

/// Recurrence and serialization errors
#[derive(Error, Debug)]
pub enum RfcError {
    /// The argument is not a well-formed rule handle or date value.
    #[error("Type error: {0}")]
    TypeKind(String),

    #[error("Timezone error: {0}")]
    Timezone(#[from] ConversionError),

    #[error("RRule error: {0}")]
    RRuleError(#[from] rrule::RRuleError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    CoreError(#[from] recurset_core::error::CoreError),
}

pub type RfcResult<T> = std::result::Result<T, RfcError>;
