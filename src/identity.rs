//! External collaborators injected into the calculator.
//!
//! The calculator never reads ambient session state. Who is operating it,
//! how a clear is confirmed, and which credential a signature must match
//! all arrive through these traits.

use crate::storage::{Slots, StorageError};
use uuid::Uuid;

/// Slot holding the per-installation subject identifier.
pub const DEVICE_SLOT: &str = "calculator_device_id";

/// An authenticated operator.
pub trait Identity {
    /// Subject identifier recorded on audit entries.
    fn subject_id(&self) -> &str;

    /// Human-readable name shown when asking for a signature.
    fn display_name(&self) -> &str;

    /// Credential a signature PIN must match.
    fn expected_pin(&self) -> &str;
}

/// Fixed identity, e.g. from a login already performed by the host.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StaticIdentity {
    pub subject_id: String,
    pub display_name: String,
    pub pin: String,
}

impl StaticIdentity {
    pub fn new(
        subject_id: impl Into<String>,
        display_name: impl Into<String>,
        pin: impl Into<String>,
    ) -> Self {
        Self {
            subject_id: subject_id.into(),
            display_name: display_name.into(),
            pin: pin.into(),
        }
    }
}

impl Identity for StaticIdentity {
    fn subject_id(&self) -> &str {
        &self.subject_id
    }

    fn display_name(&self) -> &str {
        &self.display_name
    }

    fn expected_pin(&self) -> &str {
        &self.pin
    }
}

/// Yes/no prompt used before clearing when no signature is required.
pub trait Confirm {
    fn confirm(&mut self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: FnMut(&str) -> bool,
{
    fn confirm(&mut self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// Confirmation that always says yes.
#[derive(Clone, Copy, Debug, Default)]
pub struct AlwaysConfirm;

impl Confirm for AlwaysConfirm {
    fn confirm(&mut self, _prompt: &str) -> bool {
        true
    }
}

/// Stable random identifier for this installation.
///
/// Read from `key`; generated (UUID v4) and written on first use.
pub fn installation_id(slots: &mut dyn Slots, key: &str) -> Result<String, StorageError> {
    if let Some(existing) = slots.get(key)? {
        let existing = existing.trim();
        if !existing.is_empty() {
            return Ok(existing.to_string());
        }
    }

    let id = Uuid::new_v4().to_string();
    slots.set(key, &id)?;
    tracing::info!(slot = key, "Generated installation identifier");
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemorySlots;

    #[test]
    fn installation_id_is_stable() {
        let mut slots = MemorySlots::new();
        let first = installation_id(&mut slots, DEVICE_SLOT).unwrap();
        let second = installation_id(&mut slots, DEVICE_SLOT).unwrap();

        assert_eq!(first, second);
        assert!(Uuid::parse_str(&first).is_ok());
    }

    #[test]
    fn installation_id_reuses_existing_value() {
        let mut slots = MemorySlots::new();
        slots.set(DEVICE_SLOT, "device-42\n").unwrap();

        assert_eq!(installation_id(&mut slots, DEVICE_SLOT).unwrap(), "device-42");
    }

    #[test]
    fn closures_are_confirmations() {
        let mut prompts = Vec::new();
        let mut confirm = |prompt: &str| {
            prompts.push(prompt.to_string());
            false
        };

        assert!(!Confirm::confirm(&mut confirm, "Clear all?"));
        assert!(AlwaysConfirm.confirm("Clear all?"));
        assert_eq!(prompts, vec!["Clear all?".to_string()]);
    }

    #[test]
    fn static_identity_exposes_fields() {
        let identity = StaticIdentity::new("user-001", "Ada", "1234");
        assert_eq!(identity.subject_id(), "user-001");
        assert_eq!(identity.display_name(), "Ada");
        assert_eq!(identity.expected_pin(), "1234");
    }
}
