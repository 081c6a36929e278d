//! Unified error type exposed by **`tessera-core`**.
//!
//! Provider crates convert their internal errors into
//! [`TesseraError::Backend`] before bubbling them up, so callers only ever
//! match on one enum. Composition, budget validation and skill loading report
//! through the same type.

use std::path::PathBuf;

use thiserror::Error;

/// Convenient alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, TesseraError>;

#[derive(Debug, Error)]
pub enum TesseraError {
    /// The fixed fragments (system, intent, continuation) alone do not fit
    /// into the budget left after reserving the response tokens.
    #[error("fixed fragments need {required} tokens but only {available} are available")]
    BudgetExceeded { required: usize, available: usize },

    /// A [`crate::budget::PromptBudget`] or token estimator was configured
    /// with values that cannot produce a bounded prompt.
    #[error("invalid budget: {0}")]
    InvalidBudget(String),

    /// A skill directory could not be turned into a prompt template.
    #[error("could not load skill `{name}` from {path}: {reason}")]
    FragmentLoad {
        name: String,
        path: PathBuf,
        reason: String,
    },

    /// Failure while serialising or deserialising JSON payloads.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Filesystem failure while reading settings or skill templates.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic forwarding of any completion-provider error. The wrapped value
    /// is passed through untouched.
    #[error("backend returned an error: {0}")]
    Backend(Box<dyn std::error::Error + Send + Sync + 'static>),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("invalid: {0}")]
    Invalid(String),
}
