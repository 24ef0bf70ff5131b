//! Calculator registers and the phases derived from them.
//!
//! All methods are pure - no side effects. A `CalculatorState` is an
//! immutable-by-convention value that the machine replaces wholesale on
//! every accepted transition.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the four supported binary operators.
///
/// Serialized as its symbol (`"+"`, `"-"`, `"*"`, `"/"`).
///
/// # Example
///
/// ```rust
/// use auditcalc::core::Operator;
///
/// let op: Operator = "*".parse().unwrap();
/// assert_eq!(op, Operator::Multiply);
/// assert_eq!(op.symbol(), "*");
/// assert!("x".parse::<Operator>().is_err());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
pub enum Operator {
    #[serde(rename = "+")]
    Add,
    #[serde(rename = "-")]
    Subtract,
    #[serde(rename = "*")]
    Multiply,
    #[serde(rename = "/")]
    Divide,
}

impl Operator {
    /// The token symbol for this operator.
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Subtract => "-",
            Self::Multiply => "*",
            Self::Divide => "/",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Returned when a string is not one of `+ - * /`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnknownOperator(pub String);

impl FromStr for Operator {
    type Err = UnknownOperator;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "+" => Ok(Self::Add),
            "-" => Ok(Self::Subtract),
            "*" => Ok(Self::Multiply),
            "/" => Ok(Self::Divide),
            other => Err(UnknownOperator(other.to_string())),
        }
    }
}

/// Operand buffers and the pending operator.
///
/// `input_b` is non-empty only while `operator` is set. This is the snapshot
/// recorded as `before`/`after` in every audit entry.
///
/// # Example
///
/// ```rust
/// use auditcalc::core::{CalculatorState, Operator, Phase};
///
/// let state = CalculatorState {
///     input_a: "12".to_string(),
///     input_b: String::new(),
///     operator: Some(Operator::Add),
/// };
///
/// assert_eq!(state.phase(), Phase::OperatorPending);
/// assert_eq!(state.display(), "12");
/// ```
#[derive(Clone, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculatorState {
    pub input_a: String,
    pub input_b: String,
    pub operator: Option<Operator>,
}

impl CalculatorState {
    /// Empty registers, no operator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Operand currently being edited: `input_b` once an operator is pending.
    pub fn active_operand(&self) -> &str {
        if self.operator.is_some() {
            &self.input_b
        } else {
            &self.input_a
        }
    }

    /// Mutable access to the active operand.
    pub(crate) fn active_operand_mut(&mut self) -> &mut String {
        if self.operator.is_some() {
            &mut self.input_b
        } else {
            &mut self.input_a
        }
    }

    /// Projection shown to the user.
    ///
    /// `input_b` when an operator is pending and `input_b` is non-empty,
    /// otherwise `input_a`, falling back to `"0"`.
    pub fn display(&self) -> &str {
        let shown = if self.operator.is_some() && !self.input_b.is_empty() {
            &self.input_b
        } else {
            &self.input_a
        };

        if shown.is_empty() {
            "0"
        } else {
            shown
        }
    }

    /// Phase derived from which registers are populated.
    pub fn phase(&self) -> Phase {
        match (self.operator, self.input_b.is_empty()) {
            (None, _) => Phase::Idle,
            (Some(_), true) => Phase::OperatorPending,
            (Some(_), false) => Phase::EnteringB,
        }
    }

    /// True when every register is empty.
    pub fn is_empty(&self) -> bool {
        self.input_a.is_empty() && self.input_b.is_empty() && self.operator.is_none()
    }
}

/// Where the machine sits in its input cycle.
///
/// There is no final phase; the machine cycles indefinitely.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum Phase {
    /// No operator pending; digits go to `input_a`.
    Idle,
    /// Operator set, `input_b` still empty.
    OperatorPending,
    /// Operator set and `input_b` being entered.
    EnteringB,
    /// A gated action is waiting for a PIN.
    PendingConfirmation,
}

impl Phase {
    /// Get the phase's name for display/logging.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::OperatorPending => "OperatorPending",
            Self::EnteringB => "EnteringB",
            Self::PendingConfirmation => "PendingConfirmation",
        }
    }
}
