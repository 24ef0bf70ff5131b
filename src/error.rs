//! User-visible calculator errors.

use crate::core::ArithmeticError;
use thiserror::Error;

/// Failures a transition can surface to the operator.
///
/// These never escape the machine as a panic or propagated `Err`; they are
/// shown on the display and recorded as `ERROR` audit entries.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CalcError {
    #[error(transparent)]
    Arithmetic(#[from] ArithmeticError),

    #[error("Invalid signature")]
    InvalidSignature,
}

impl CalcError {
    /// Short message suitable for the display.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Arithmetic(ArithmeticError::DivideByZero) => "Cannot divide by zero",
            Self::Arithmetic(ArithmeticError::InvalidNumber(_)) => "Invalid number",
            Self::Arithmetic(ArithmeticError::InvalidOperator(_)) => "Invalid operator",
            Self::InvalidSignature => "Signature could not be verified",
        }
    }
}
