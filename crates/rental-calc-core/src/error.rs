use thiserror::Error;

#[derive(Debug, Error)]
pub enum RentalCalcError {
    #[error("Invalid input: {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for RentalCalcError {
    fn from(e: serde_json::Error) -> Self {
        RentalCalcError::Serialization(e.to_string())
    }
}
