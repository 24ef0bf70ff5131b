//! Electronic-signature gate for state-mutating actions.
//!
//! When present, the gate holds back `=` and clear until the operator
//! re-enters their PIN. A verified signature is attached to the audit entry
//! of the action it released.

use crate::identity::Identity;
use serde::{Deserialize, Serialize};

/// Outcome of one signature attempt.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct SignatureResult {
    pub verified: bool,
    pub method: String,
}

impl SignatureResult {
    /// Result of a PIN check.
    pub fn pin(verified: bool) -> Self {
        Self {
            verified,
            method: "pin".to_string(),
        }
    }
}

/// Action held back while a signature is pending.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum PendingAction {
    Compute,
    Clear,
}

impl PendingAction {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Compute => "Compute",
            Self::Clear => "Clear",
        }
    }
}

/// Verifies PINs against the identity collaborator's credential.
pub struct SignatureGate {
    identity: Box<dyn Identity>,
}

impl SignatureGate {
    pub fn new(identity: Box<dyn Identity>) -> Self {
        Self { identity }
    }

    pub fn identity(&self) -> &dyn Identity {
        self.identity.as_ref()
    }

    /// Prompt text for a pending action.
    pub fn prompt(&self, action: PendingAction) -> String {
        format!(
            "{}: enter PIN to sign {}",
            self.identity.display_name(),
            action.name().to_lowercase()
        )
    }

    /// Compare `pin` with the expected credential.
    pub fn verify(&self, pin: &str) -> SignatureResult {
        let expected = self.identity.expected_pin();
        let verified =
            !expected.is_empty() && constant_time_eq(expected.as_bytes(), pin.as_bytes());
        tracing::info!(
            subject = self.identity.subject_id(),
            verified,
            "Signature attempt"
        );
        SignatureResult::pin(verified)
    }
}

impl std::fmt::Debug for SignatureGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignatureGate")
            .field("subject_id", &self.identity.subject_id())
            .finish_non_exhaustive()
    }
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff = 0u8;
    for (&x, &y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}
