//! Input tokens accepted by the calculator.

use crate::core::{is_digit, Operator};

const DIGIT_LABELS: [&str; 10] = ["0", "1", "2", "3", "4", "5", "6", "7", "8", "9"];

/// One discrete key press.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Token {
    Digit(char),
    Decimal,
    Operator(Operator),
    Backspace,
    Clear,
    Equals,
}

impl Token {
    /// Parse the wire form: `0`-`9`, `+ - * /`, `.`, `=`, `C`, `BS`.
    ///
    /// Returns `None` for anything else; such input is ignored.
    ///
    /// # Example
    ///
    /// ```rust
    /// use auditcalc::core::Operator;
    /// use auditcalc::machine::Token;
    ///
    /// assert_eq!(Token::parse("7"), Some(Token::Digit('7')));
    /// assert_eq!(Token::parse("*"), Some(Token::Operator(Operator::Multiply)));
    /// assert_eq!(Token::parse("BS"), Some(Token::Backspace));
    /// assert_eq!(Token::parse("%"), None);
    /// ```
    pub fn parse(text: &str) -> Option<Self> {
        if is_digit(text) {
            return text.chars().next().map(Self::Digit);
        }
        if let Ok(op) = text.parse::<Operator>() {
            return Some(Self::Operator(op));
        }
        match text {
            "." => Some(Self::Decimal),
            "=" => Some(Self::Equals),
            "C" => Some(Self::Clear),
            "BS" => Some(Self::Backspace),
            _ => None,
        }
    }

    /// Accessible name for the key.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Digit(d) => d
                .to_digit(10)
                .and_then(|n| DIGIT_LABELS.get(n as usize))
                .copied()
                .unwrap_or("digit"),
            Self::Decimal => "decimal",
            Self::Operator(Operator::Add) => "add",
            Self::Operator(Operator::Subtract) => "subtract",
            Self::Operator(Operator::Multiply) => "multiply",
            Self::Operator(Operator::Divide) => "divide",
            Self::Backspace => "backspace",
            Self::Clear => "clear",
            Self::Equals => "equals",
        }
    }
}
