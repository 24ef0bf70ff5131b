//! Build errors for the calculator builder.

use crate::storage::StorageError;
use thiserror::Error;

/// Errors that can occur when assembling a calculator.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("max_length must be at least 1")]
    ZeroMaxLength,

    #[error("Audit slot and device slot must differ (both '{0}')")]
    SlotCollision(String),

    #[error("Storage could not be opened: {0}")]
    Storage(#[from] StorageError),
}
