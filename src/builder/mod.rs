//! Builder API for assembling a calculator from its collaborators.
//!
//! The builder wires configuration, storage slots, an optional identity and
//! a confirmation prompt into a [`Calculator`]. Whether the signature gate is
//! active is decided here: it needs both `require_signature` and an identity.

pub mod error;

pub use error::BuildError;

use crate::audit::AuditLog;
use crate::config::CalculatorConfig;
use crate::identity::{installation_id, AlwaysConfirm, Confirm, Identity};
use crate::machine::{Calculator, Gate};
use crate::signature::SignatureGate;
use crate::storage::{FileSlots, MemorySlots, Slots};
use uuid::Uuid;

/// Fluent builder for [`Calculator`].
///
/// # Example
///
/// ```rust
/// use auditcalc::builder::CalculatorBuilder;
/// use auditcalc::identity::StaticIdentity;
///
/// let calc = CalculatorBuilder::new()
///     .require_signature(true)
///     .identity(StaticIdentity::new("user-001", "Ada", "1234"))
///     .build()
///     .unwrap();
///
/// assert!(calc.is_gated());
/// assert_eq!(calc.subject_id(), "user-001");
/// ```
pub struct CalculatorBuilder {
    config: CalculatorConfig,
    slots: Option<Box<dyn Slots>>,
    identity: Option<Box<dyn Identity>>,
    confirm: Option<Box<dyn Confirm>>,
}

impl CalculatorBuilder {
    pub fn new() -> Self {
        Self {
            config: CalculatorConfig::default(),
            slots: None,
            identity: None,
            confirm: None,
        }
    }

    /// Replace the whole configuration.
    pub fn config(mut self, config: CalculatorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn max_length(mut self, max: usize) -> Self {
        self.config.max_length = max;
        self
    }

    pub fn require_signature(mut self, required: bool) -> Self {
        self.config.require_signature = required;
        self
    }

    /// Storage for the audit log and installation id.
    ///
    /// Defaults to file slots under `storage.dir` when configured, otherwise
    /// in-memory slots.
    pub fn slots(mut self, slots: impl Slots + 'static) -> Self {
        self.slots = Some(Box::new(slots));
        self
    }

    pub fn identity(mut self, identity: impl Identity + 'static) -> Self {
        self.identity = Some(Box::new(identity));
        self
    }

    /// Prompt asked before clearing when no signature is required.
    pub fn confirm(mut self, confirm: impl Confirm + 'static) -> Self {
        self.confirm = Some(Box::new(confirm));
        self
    }

    /// Build the calculator.
    /// Returns an error if the configuration is inconsistent or storage
    /// cannot be opened.
    pub fn build(self) -> Result<Calculator, BuildError> {
        let config = self.config;
        if config.max_length == 0 {
            return Err(BuildError::ZeroMaxLength);
        }
        if config.storage.audit_slot == config.storage.device_slot {
            return Err(BuildError::SlotCollision(config.storage.audit_slot));
        }

        let mut slots: Box<dyn Slots> = match (self.slots, &config.storage.dir) {
            (Some(slots), _) => slots,
            (None, Some(dir)) => Box::new(FileSlots::open(dir)?),
            (None, None) => Box::new(MemorySlots::new()),
        };

        let device_id = match self.identity {
            Some(_) => None,
            None => Some(
                installation_id(slots.as_mut(), &config.storage.device_slot).unwrap_or_else(
                    |err| {
                        tracing::warn!(%err, "Using an unpersisted installation identifier");
                        Uuid::new_v4().to_string()
                    },
                ),
            ),
        };

        let log = AuditLog::open(slots, config.storage.audit_slot.clone());

        let gate = match (self.identity, config.require_signature) {
            (Some(identity), true) => Gate::Signed(SignatureGate::new(identity)),
            (identity, required) => {
                if required {
                    tracing::warn!("Signature required but no identity supplied; gating disabled");
                }
                Gate::Open {
                    confirm: self.confirm.unwrap_or_else(|| Box::new(AlwaysConfirm)),
                    identity,
                }
            }
        };

        Ok(Calculator::from_parts(config, log, gate, device_id))
    }
}

impl Default for CalculatorBuilder {
    fn default() -> Self {
        Self::new()
    }
}
