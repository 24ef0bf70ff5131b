//! Input validation predicates.
//!
//! These are pure functions that decide whether a token may be appended to
//! the current registers. Rejections they produce are silent: the machine
//! treats them as no-op transitions.

use super::state::CalculatorState;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// Default cap on operand length, in characters.
pub const MAX_OPERAND_LENGTH: usize = 16;

/// Reasons the registers cannot be computed yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComputeBlocker {
    /// `input_a` is empty or not a complete decimal.
    IncompleteLeft,
    /// No operator pending.
    MissingOperator,
    /// `input_b` is empty or not a complete decimal.
    IncompleteRight,
}

/// True iff `token` is exactly one ASCII digit.
pub fn is_digit(token: &str) -> bool {
    matches!(token.as_bytes(), [b'0'..=b'9'])
}

/// True iff `token` is one of `+ - * /`.
pub fn is_operator(token: &str) -> bool {
    matches!(token, "+" | "-" | "*" | "/")
}

/// True iff the active operand has no decimal point yet.
///
/// Only the operand being edited counts; a point in the other one is
/// irrelevant.
///
/// # Example
///
/// ```rust
/// use auditcalc::core::{can_append_decimal, CalculatorState, Operator};
///
/// let state = CalculatorState {
///     input_a: "1.5".to_string(),
///     input_b: "2".to_string(),
///     operator: Some(Operator::Add),
/// };
/// assert!(can_append_decimal(&state));
/// ```
pub fn can_append_decimal(state: &CalculatorState) -> bool {
    !state.active_operand().contains('.')
}

/// Truncate `value` to at most `max` characters, keeping the earliest ones.
pub fn enforce_max_length(value: &str, max: usize) -> String {
    value.chars().take(max).collect()
}

/// True iff `text` is a finished decimal: digits, at most one point with
/// digits on both sides of it, and an optional leading minus.
pub fn is_complete_decimal(text: &str) -> bool {
    let unsigned = text.strip_prefix('-').unwrap_or(text);
    let digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());

    match unsigned.split_once('.') {
        Some((whole, fraction)) => digits(whole) && digits(fraction),
        None => digits(unsigned),
    }
}

/// Collect every reason the registers are not ready for `=`.
///
/// All checks run; failures accumulate instead of stopping at the first.
pub fn check_computable(state: &CalculatorState) -> Validation<(), NonEmptyVec<ComputeBlocker>> {
    let check = |ok: bool, blocker: ComputeBlocker| {
        if ok {
            Validation::success(())
        } else {
            Validation::fail(blocker)
        }
    };

    let checks = vec![
        check(
            is_complete_decimal(&state.input_a),
            ComputeBlocker::IncompleteLeft,
        ),
        check(state.operator.is_some(), ComputeBlocker::MissingOperator),
        check(
            is_complete_decimal(&state.input_b),
            ComputeBlocker::IncompleteRight,
        ),
    ];

    Validation::all_vec(checks).map(|_| ())
}

/// True iff `input_a`, the operator and `input_b` are all ready.
pub fn can_compute(state: &CalculatorState) -> bool {
    check_computable(state).is_success()
}
