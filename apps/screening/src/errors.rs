use thiserror::Error;

use crate::client::ApiError;
use crate::scoring::ScoreError;
use crate::store::StoreError;

/// Application-level error taxonomy. No layer recovers from its own errors;
/// everything surfaces here for the caller to present as one plain message.
#[derive(Debug, Error)]
pub enum AppError {
    /// An AI payload failed schema validation. Carries the full joined error
    /// list from the validator.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Transport failure or non-2xx response from the analysis service.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// A validated analysis could not be scored.
    #[error(transparent)]
    Score(#[from] ScoreError),

    #[error(transparent)]
    Store(#[from] StoreError),

    /// A flow started without its required precursor state.
    #[error("{0}")]
    MissingInput(String),
}
