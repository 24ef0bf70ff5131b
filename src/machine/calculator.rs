//! Calculator shell: applies pure steps, writes the audit log, tracks the
//! display error and the pending signature.

use super::token::Token;
use super::transition::{resolve, transition, Register, Step};
use crate::audit::{AuditAction, AuditLog, AuditRecord};
use crate::config::CalculatorConfig;
use crate::core::{CalculatorState, Phase};
use crate::error::CalcError;
use crate::identity::{Confirm, Identity};
use crate::signature::{PendingAction, SignatureGate};

/// Result of feeding one token, PIN or cancellation to the calculator.
#[derive(Clone, Debug, PartialEq)]
pub enum Outcome {
    /// Transition applied and audited with this action.
    Applied(AuditAction),
    /// Input rejected or meaningless; nothing changed, nothing audited.
    Ignored,
    /// The confirmation collaborator declined a clear.
    Declined,
    /// Action held until [`Calculator::sign`] or [`Calculator::cancel`].
    AwaitingSignature(PendingAction),
    /// Pending action abandoned.
    Cancelled,
    /// Transition failed; state unchanged, error displayed and audited.
    Failed(CalcError),
}

/// How state-mutating actions are confirmed.
pub(crate) enum Gate {
    /// Applied immediately; clear asks the confirmation collaborator first.
    Open {
        confirm: Box<dyn Confirm>,
        identity: Option<Box<dyn Identity>>,
    },
    /// Compute and clear wait for a verified PIN.
    Signed(SignatureGate),
}

/// An audited calculator.
///
/// # Example
///
/// ```rust
/// use auditcalc::audit::AuditAction;
/// use auditcalc::machine::Calculator;
///
/// let mut calc = Calculator::new();
/// for token in ["2", "+", "2", "="] {
///     calc.press(token);
/// }
///
/// assert_eq!(calc.display(), "4");
/// let computes = calc
///     .audit()
///     .entries()
///     .iter()
///     .filter(|e| e.action == AuditAction::Compute)
///     .count();
/// assert_eq!(computes, 1);
/// ```
pub struct Calculator {
    register: Register,
    pending: Option<PendingAction>,
    error: Option<CalcError>,
    gate: Gate,
    log: AuditLog,
    device_id: Option<String>,
    config: CalculatorConfig,
}

impl Calculator {
    /// Anonymous calculator with in-memory storage that confirms every clear.
    pub fn new() -> Self {
        Self::from_parts(
            CalculatorConfig::default(),
            AuditLog::in_memory(),
            Gate::Open {
                confirm: Box::new(crate::identity::AlwaysConfirm),
                identity: None,
            },
            Some(uuid::Uuid::new_v4().to_string()),
        )
    }

    pub fn builder() -> crate::builder::CalculatorBuilder {
        crate::builder::CalculatorBuilder::new()
    }

    pub(crate) fn from_parts(
        config: CalculatorConfig,
        log: AuditLog,
        gate: Gate,
        device_id: Option<String>,
    ) -> Self {
        Self {
            register: Register::new(),
            pending: None,
            error: None,
            gate,
            log,
            device_id,
            config,
        }
    }

    /// Feed a token in wire form. Unrecognized tokens are ignored.
    pub fn press(&mut self, token: &str) -> Outcome {
        match Token::parse(token) {
            Some(token) => self.dispatch(token),
            None => {
                tracing::debug!(token, "Ignoring unrecognized token");
                Outcome::Ignored
            }
        }
    }

    /// Feed one parsed token.
    pub fn dispatch(&mut self, token: Token) -> Outcome {
        if let Some(action) = self.pending {
            tracing::warn!(
                key = token.label(),
                pending = action.name(),
                "Input rejected while awaiting signature"
            );
            return Outcome::Ignored;
        }

        let from = self.phase();
        let step = transition(&self.register, token, self.config.max_length);
        let outcome = match step {
            Step::NeedsConfirmation(action) => self.request(action),
            step => self.apply(step),
        };
        tracing::debug!(
            key = token.label(),
            from = from.name(),
            to = self.phase().name(),
            ?outcome,
            "Token dispatched"
        );
        outcome
    }

    /// Supply the PIN for a pending action.
    pub fn sign(&mut self, pin: &str) -> Outcome {
        let Some(action) = self.pending else {
            return Outcome::Ignored;
        };
        let Gate::Signed(gate) = &self.gate else {
            self.pending = None;
            return Outcome::Ignored;
        };

        let signature = gate.verify(pin);
        self.pending = None;

        if !signature.verified {
            let error = CalcError::InvalidSignature;
            let record =
                AuditRecord::error(self.register.state.clone(), error.to_string(), Some(signature));
            return self.apply(Step::Fail { error, record });
        }

        let step = resolve(&self.register, action, Some(signature));
        self.apply(step)
    }

    /// Abandon a pending action without auditing it.
    pub fn cancel(&mut self) -> Outcome {
        match self.pending.take() {
            Some(action) => {
                tracing::info!(pending = action.name(), "Signature cancelled");
                Outcome::Cancelled
            }
            None => Outcome::Ignored,
        }
    }

    fn request(&mut self, action: PendingAction) -> Outcome {
        let declined = match &mut self.gate {
            Gate::Signed(gate) => {
                tracing::info!(prompt = %gate.prompt(action), "Awaiting signature");
                self.pending = Some(action);
                return Outcome::AwaitingSignature(action);
            }
            Gate::Open { confirm, .. } => {
                action == PendingAction::Clear && !confirm.confirm(&self.config.confirm_prompt)
            }
        };

        if declined {
            tracing::info!("Clear declined");
            return Outcome::Declined;
        }
        let step = resolve(&self.register, action, None);
        self.apply(step)
    }

    fn apply(&mut self, step: Step) -> Outcome {
        match step {
            Step::Ignore => Outcome::Ignored,
            Step::Commit { next, record } => {
                let action = record.action;
                self.register = next;
                self.error = None;
                self.record(record);
                Outcome::Applied(action)
            }
            Step::Fail { error, record } => {
                tracing::warn!(%error, "Transition failed");
                self.error = Some(error.clone());
                self.record(record);
                Outcome::Failed(error)
            }
            Step::NeedsConfirmation(action) => self.request(action),
        }
    }

    fn record(&mut self, record: AuditRecord) {
        let subject = self.subject_id().to_string();
        self.log.append(&subject, record);
    }

    /// Value shown on the display.
    pub fn display(&self) -> &str {
        self.register.state.display()
    }

    /// Message for the last failed transition, until the next accepted one.
    pub fn error_message(&self) -> Option<&'static str> {
        self.error.as_ref().map(CalcError::user_message)
    }

    pub fn error(&self) -> Option<&CalcError> {
        self.error.as_ref()
    }

    pub fn state(&self) -> &CalculatorState {
        &self.register.state
    }

    pub fn phase(&self) -> Phase {
        if self.pending.is_some() {
            Phase::PendingConfirmation
        } else {
            self.register.state.phase()
        }
    }

    pub fn pending(&self) -> Option<PendingAction> {
        self.pending
    }

    /// Prompt to show while a signature is pending.
    pub fn signature_prompt(&self) -> Option<String> {
        match (&self.gate, self.pending) {
            (Gate::Signed(gate), Some(action)) => Some(gate.prompt(action)),
            _ => None,
        }
    }

    pub fn is_gated(&self) -> bool {
        matches!(self.gate, Gate::Signed(_))
    }

    /// Subject recorded on audit entries: the identity's, else this
    /// installation's identifier.
    pub fn subject_id(&self) -> &str {
        let identity: Option<&dyn Identity> = match &self.gate {
            Gate::Signed(gate) => Some(gate.identity()),
            Gate::Open { identity, .. } => identity.as_deref(),
        };
        match identity {
            Some(identity) => identity.subject_id(),
            None => self.device_id.as_deref().unwrap_or("anonymous"),
        }
    }

    pub fn audit(&self) -> &AuditLog {
        &self.log
    }

    pub fn audit_mut(&mut self) -> &mut AuditLog {
        &mut self.log
    }

    pub fn config(&self) -> &CalculatorConfig {
        &self.config
    }
}

impl Default for Calculator {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Calculator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Calculator")
            .field("state", &self.register.state)
            .field("pending", &self.pending)
            .field("error", &self.error)
            .field("log", &self.log)
            .finish_non_exhaustive()
    }
}
