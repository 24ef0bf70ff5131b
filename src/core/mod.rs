//! Pure calculator core.
//!
//! This module contains the side-effect-free building blocks:
//! - Register state and derived phases
//! - Validation predicates gating token input
//! - Scaled decimal arithmetic
//!
//! Nothing here logs, persists, or reads ambient state.

mod arithmetic;
mod state;
mod validation;

pub use arithmetic::{compute, evaluate, ArithmeticError, FRACTION_DIGITS};
pub use state::{CalculatorState, Operator, Phase, UnknownOperator};
pub use validation::{
    can_append_decimal, can_compute, check_computable, enforce_max_length, is_complete_decimal,
    is_digit, is_operator, ComputeBlocker, MAX_OPERAND_LENGTH,
};
