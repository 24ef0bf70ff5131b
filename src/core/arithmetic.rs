//! Scaled decimal arithmetic on operand strings.
//!
//! Addition, subtraction and multiplication lift both operands onto a shared
//! power-of-ten scale and work on 128-bit integers, so `0.1 + 0.2` is exactly
//! `0.3`. Division has no terminating-decimal guarantee and runs in `f64`.
//! Every result is rendered with at most [`FRACTION_DIGITS`] fractional
//! digits and no trailing zeros.

use super::state::Operator;
use thiserror::Error;

/// Maximum number of fractional digits in a formatted result.
pub const FRACTION_DIGITS: u32 = 10;

/// Errors produced by the arithmetic engine.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ArithmeticError {
    #[error("Invalid number: '{0}'")]
    InvalidNumber(String),

    #[error("Invalid operator: '{0}'")]
    InvalidOperator(String),

    #[error("Divide by zero")]
    DivideByZero,
}

/// Compute `a op b` where `op` is given as its token symbol.
///
/// # Example
///
/// ```rust
/// use auditcalc::core::{compute, ArithmeticError};
///
/// assert_eq!(compute("0.1", "+", "0.2").unwrap(), "0.3");
/// assert_eq!(compute("2.5000", "+", "0.5000").unwrap(), "3");
/// assert_eq!(compute("4", "/", "0"), Err(ArithmeticError::DivideByZero));
/// ```
pub fn compute(a: &str, op: &str, b: &str) -> Result<String, ArithmeticError> {
    let lhs = Operand::parse(a)?;
    let rhs = Operand::parse(b)?;
    let op: Operator = op
        .parse()
        .map_err(|_| ArithmeticError::InvalidOperator(op.to_string()))?;
    apply(&lhs, op, &rhs)
}

/// Compute `a op b` for an already-parsed operator.
pub fn evaluate(a: &str, op: Operator, b: &str) -> Result<String, ArithmeticError> {
    let lhs = Operand::parse(a)?;
    let rhs = Operand::parse(b)?;
    apply(&lhs, op, &rhs)
}

fn apply(lhs: &Operand<'_>, op: Operator, rhs: &Operand<'_>) -> Result<String, ArithmeticError> {
    if op == Operator::Divide {
        if rhs.value == 0.0 {
            return Err(ArithmeticError::DivideByZero);
        }
        return format_float(lhs.value / rhs.value);
    }

    let scale = lhs.fraction_len().max(rhs.fraction_len());
    match scaled_result(lhs, op, rhs, scale) {
        Some(text) => Ok(text),
        // Scaled values outgrew i128; settle for float precision.
        None => format_float(match op {
            Operator::Add => lhs.value + rhs.value,
            Operator::Subtract => lhs.value - rhs.value,
            _ => lhs.value * rhs.value,
        }),
    }
}

fn scaled_result(lhs: &Operand<'_>, op: Operator, rhs: &Operand<'_>, scale: u32) -> Option<String> {
    let a = lhs.scaled(scale)?;
    let b = rhs.scaled(scale)?;
    let (value, result_scale) = match op {
        Operator::Add => (a.checked_add(b)?, scale),
        Operator::Subtract => (a.checked_sub(b)?, scale),
        Operator::Multiply => (a.checked_mul(b)?, scale.checked_mul(2)?),
        Operator::Divide => return None,
    };
    format_scaled(value, result_scale)
}

/// A syntactically valid operand string split at its decimal point.
struct Operand<'a> {
    negative: bool,
    whole: &'a str,
    fraction: &'a str,
    value: f64,
}

impl<'a> Operand<'a> {
    /// Accepts `-?\d*(\.\d*)?` with at least one digit.
    fn parse(text: &'a str) -> Result<Self, ArithmeticError> {
        let invalid = || ArithmeticError::InvalidNumber(text.to_string());

        let (negative, unsigned) = match text.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, text),
        };
        let (whole, fraction) = unsigned.split_once('.').unwrap_or((unsigned, ""));

        let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
        if whole.is_empty() && fraction.is_empty() {
            return Err(invalid());
        }
        if !all_digits(whole) || !all_digits(fraction) {
            return Err(invalid());
        }

        let value: f64 = text.parse().map_err(|_| invalid())?;
        if !value.is_finite() {
            return Err(invalid());
        }

        Ok(Self {
            negative,
            whole,
            fraction,
            value,
        })
    }

    fn fraction_len(&self) -> u32 {
        u32::try_from(self.fraction.len()).unwrap_or(u32::MAX)
    }

    /// Integer value of this operand multiplied by `10^scale`.
    fn scaled(&self, scale: u32) -> Option<i128> {
        let mut value: i128 = 0;
        for digit in self.whole.bytes().chain(self.fraction.bytes()) {
            value = value
                .checked_mul(10)?
                .checked_add(i128::from(digit - b'0'))?;
        }
        let padding = 10i128.checked_pow(scale.checked_sub(self.fraction_len())?)?;
        let value = value.checked_mul(padding)?;
        Some(if self.negative { -value } else { value })
    }
}

/// Render `value / 10^scale`, rounding half away from zero to
/// [`FRACTION_DIGITS`] places.
fn format_scaled(value: i128, scale: u32) -> Option<String> {
    let (magnitude, scale) = if scale > FRACTION_DIGITS {
        let divisor = 10u128.checked_pow(scale - FRACTION_DIGITS)?;
        let abs = value.unsigned_abs();
        let mut quotient = abs / divisor;
        if (abs % divisor) * 2 >= divisor {
            quotient += 1;
        }
        (quotient, FRACTION_DIGITS)
    } else {
        (value.unsigned_abs(), scale)
    };

    let negative = value < 0 && magnitude != 0;
    let width = scale as usize + 1;
    let digits = format!("{magnitude:0width$}");
    let (whole, fraction) = digits.split_at(digits.len() - scale as usize);

    let mut text = String::with_capacity(digits.len() + 2);
    if negative {
        text.push('-');
    }
    text.push_str(whole);
    if !fraction.is_empty() {
        text.push('.');
        text.push_str(fraction);
    }
    Some(trim_fraction(text))
}

fn format_float(value: f64) -> Result<String, ArithmeticError> {
    if !value.is_finite() {
        return Err(ArithmeticError::InvalidNumber(value.to_string()));
    }
    let text = format!("{:.*}", FRACTION_DIGITS as usize, value);
    Ok(trim_fraction(text))
}

/// Drop trailing fractional zeros, a dangling point, and the sign of zero.
fn trim_fraction(mut text: String) -> String {
    if text.contains('.') {
        let trimmed = text.trim_end_matches('0').trim_end_matches('.').len();
        text.truncate(trimmed);
    }
    if text == "-0" {
        text.remove(0);
    }
    text
}
