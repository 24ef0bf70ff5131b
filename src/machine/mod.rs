//! Calculator state machine.
//!
//! The machine is split the "pure core, imperative shell" way:
//!
//! - [`transition`] and [`resolve`] are pure functions from registers and a
//!   token to a [`Step`], testable without any collaborator
//! - [`Calculator`] applies steps, appends audit entries, and handles
//!   confirmation and signature gating

mod calculator;
mod token;
mod transition;

pub use calculator::{Calculator, Outcome};
pub(crate) use calculator::Gate;
pub use token::Token;
pub use transition::{resolve, transition, Register, Step};
