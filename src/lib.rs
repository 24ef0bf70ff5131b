//! Auditcalc: a deterministic, audited calculator engine
//!
//! Auditcalc follows the "pure core, imperative shell" philosophy. Token
//! handling, validation and arithmetic are pure functions; the
//! [`Calculator`](machine::Calculator) shell applies their results, writes an
//! append-only audit trail and, optionally, holds state-mutating actions
//! behind an electronic signature.
//!
//! # Core Concepts
//!
//! - **State**: two operand buffers and a pending operator
//! - **Validation**: pure predicates deciding which input is accepted
//! - **Arithmetic**: scaled decimal math without binary float artifacts
//! - **Audit**: one immutable entry per accepted or failed transition
//! - **Signature gate**: PIN confirmation before compute and clear
//!
//! # Example
//!
//! ```rust
//! use auditcalc::audit::AuditAction;
//! use auditcalc::machine::{Calculator, Outcome};
//!
//! let mut calc = Calculator::new();
//! for token in ["5", "*", "6", "="] {
//!     calc.press(token);
//! }
//! assert_eq!(calc.display(), "30");
//!
//! for token in ["9", "-", "3"] {
//!     calc.press(token);
//! }
//! assert_eq!(calc.press("="), Outcome::Applied(AuditAction::Compute));
//! assert_eq!(calc.display(), "6");
//!
//! let exported = calc.audit().export_json().unwrap();
//! assert!(exported.contains("\"COMPUTE\""));
//! ```

pub mod audit;
pub mod builder;
pub mod config;
pub mod core;
pub mod error;
pub mod identity;
pub mod machine;
pub mod signature;
pub mod storage;

// Re-export commonly used types
pub use audit::{AuditAction, AuditEntry, AuditLog};
pub use config::{CalculatorConfig, ConfigError};
pub use core::{compute, CalculatorState, Operator};
pub use error::CalcError;
pub use machine::{Calculator, Outcome, Token};
