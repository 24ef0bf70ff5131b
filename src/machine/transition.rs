//! Pure transition function.
//!
//! `transition` maps the current registers and one token to a [`Step`]
//! without touching the log, the display or any collaborator. Actions that
//! need confirmation come back as [`Step::NeedsConfirmation`]; the shell
//! applies them later through [`resolve`].

use super::token::Token;
use crate::audit::AuditRecord;
use crate::core::{
    can_append_decimal, can_compute, enforce_max_length, evaluate, CalculatorState, Operator,
};
use crate::error::CalcError;
use crate::signature::{PendingAction, SignatureResult};

/// Registers plus whether `input_a` currently shows a finished result.
///
/// A shown result is replaced, not extended, by the next digit or point.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct Register {
    pub state: CalculatorState,
    pub showing_result: bool,
}

impl Register {
    pub fn new() -> Self {
        Self::default()
    }

    fn starts_fresh_entry(&self) -> bool {
        self.showing_result && self.state.operator.is_none()
    }
}

/// What a token does to the registers.
#[derive(Clone, PartialEq, Debug)]
pub enum Step {
    /// Rejected or meaningless input; nothing changes, nothing is audited.
    Ignore,
    /// Accepted transition.
    Commit { next: Register, record: AuditRecord },
    /// Failed transition; registers stay as they were.
    Fail { error: CalcError, record: AuditRecord },
    /// Requires confirmation before [`resolve`] can apply it.
    NeedsConfirmation(PendingAction),
}

/// Apply one token to `register`.
pub fn transition(register: &Register, token: Token, max_length: usize) -> Step {
    match token {
        Token::Digit(d) => append_digit(register, d, max_length),
        Token::Decimal => append_decimal(register, max_length),
        Token::Operator(op) => choose_operator(register, op),
        Token::Backspace => backspace(register),
        Token::Clear => Step::NeedsConfirmation(PendingAction::Clear),
        Token::Equals if can_compute(&register.state) => {
            Step::NeedsConfirmation(PendingAction::Compute)
        }
        Token::Equals => Step::Ignore,
    }
}

/// Apply a confirmed action, annotating its entry with `signature`.
pub fn resolve(
    register: &Register,
    action: PendingAction,
    signature: Option<SignatureResult>,
) -> Step {
    let before = register.state.clone();
    match action {
        PendingAction::Clear => Step::Commit {
            next: Register::new(),
            record: AuditRecord::clear(before, CalculatorState::new(), signature),
        },
        PendingAction::Compute => {
            let Some(op) = before.operator.filter(|_| can_compute(&before)) else {
                return Step::Ignore;
            };
            match evaluate(&before.input_a, op, &before.input_b) {
                Ok(result) => {
                    let after = CalculatorState {
                        input_a: result,
                        ..CalculatorState::default()
                    };
                    Step::Commit {
                        next: Register {
                            state: after.clone(),
                            showing_result: true,
                        },
                        record: AuditRecord::compute(before, after, signature),
                    }
                }
                Err(err) => Step::Fail {
                    record: AuditRecord::error(before, err.to_string(), signature),
                    error: err.into(),
                },
            }
        }
    }
}

/// Replace the active operand with `candidate` if that changes anything.
///
/// Input that would grow the operand past `max_length` is ignored. A result
/// may already be longer than the cap; it is never shortened by typing.
fn edit_operand(
    register: &Register,
    candidate: String,
    max_length: usize,
    reason: &str,
    fresh: bool,
) -> Step {
    if !fresh && candidate.chars().count() > max_length {
        return Step::Ignore;
    }
    let candidate = enforce_max_length(&candidate, max_length);
    if candidate == register.state.active_operand() && !fresh {
        return Step::Ignore;
    }

    let mut next = register.clone();
    *next.state.active_operand_mut() = candidate;
    next.showing_result = false;
    Step::Commit {
        record: AuditRecord::digit(register.state.clone(), next.state.clone(), reason),
        next,
    }
}

fn append_digit(register: &Register, digit: char, max_length: usize) -> Step {
    let fresh = register.starts_fresh_entry();
    let current = register.state.active_operand();
    let candidate = if fresh || current == "0" {
        digit.to_string()
    } else {
        format!("{current}{digit}")
    };
    edit_operand(register, candidate, max_length, "digit", fresh)
}

fn append_decimal(register: &Register, max_length: usize) -> Step {
    let fresh = register.starts_fresh_entry();
    if !fresh && !can_append_decimal(&register.state) {
        return Step::Ignore;
    }

    let current = register.state.active_operand();
    let candidate = if fresh || current.is_empty() {
        "0.".to_string()
    } else {
        format!("{current}.")
    };
    edit_operand(register, candidate, max_length, "decimal", fresh)
}

fn choose_operator(register: &Register, op: Operator) -> Step {
    let before = register.state.clone();

    if let Some(pending) = before.operator.filter(|_| !before.input_b.is_empty()) {
        return match evaluate(&before.input_a, pending, &before.input_b) {
            Ok(result) => {
                let after = CalculatorState {
                    input_a: result,
                    input_b: String::new(),
                    operator: Some(op),
                };
                Step::Commit {
                    next: Register {
                        state: after.clone(),
                        showing_result: false,
                    },
                    record: AuditRecord::operator(before, after, Some("chain".to_string())),
                }
            }
            Err(err) => Step::Fail {
                record: AuditRecord::error(before, err.to_string(), None),
                error: err.into(),
            },
        };
    }

    if before.operator == Some(op) {
        return Step::Ignore;
    }

    let after = CalculatorState {
        operator: Some(op),
        ..before.clone()
    };
    Step::Commit {
        next: Register {
            state: after.clone(),
            showing_result: false,
        },
        record: AuditRecord::operator(before, after, None),
    }
}

fn backspace(register: &Register) -> Step {
    let mut next = register.clone();
    if next.state.active_operand_mut().pop().is_none() {
        return Step::Ignore;
    }
    next.showing_result = false;
    Step::Commit {
        record: AuditRecord::digit(register.state.clone(), next.state.clone(), "backspace"),
        next,
    }
}
