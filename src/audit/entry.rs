//! Audit entry types.
//!
//! An [`AuditRecord`] is what the machine produces for a transition; the log
//! stamps it with a subject and capture time to form an [`AuditEntry`].

use crate::core::CalculatorState;
use crate::signature::SignatureResult;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of transition an entry records.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditAction {
    Compute,
    Clear,
    Error,
    Input,
    Operator,
}

impl AuditAction {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Compute => "COMPUTE",
            Self::Clear => "CLEAR",
            Self::Error => "ERROR",
            Self::Input => "INPUT",
            Self::Operator => "OPERATOR",
        }
    }
}

/// Optional annotations carried by an entry.
#[derive(Clone, PartialEq, Debug, Default, Serialize, Deserialize)]
pub struct AuditMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<SignatureResult>,
}

impl AuditMetadata {
    fn is_empty(&self) -> bool {
        self.reason.is_none() && self.error.is_none() && self.signature.is_none()
    }
}

/// A transition ready to be logged, not yet stamped.
///
/// The constructors only fix the action tag and shape the metadata.
///
/// # Example
///
/// ```rust
/// use auditcalc::audit::{AuditAction, AuditRecord};
/// use auditcalc::core::CalculatorState;
///
/// let before = CalculatorState::new();
/// let mut after = before.clone();
/// after.input_a.push('7');
///
/// let record = AuditRecord::digit(before, after, "digit");
/// assert_eq!(record.action, AuditAction::Input);
/// ```
#[derive(Clone, PartialEq, Debug)]
pub struct AuditRecord {
    pub action: AuditAction,
    pub before: CalculatorState,
    pub after: Option<CalculatorState>,
    pub metadata: Option<AuditMetadata>,
}

impl AuditRecord {
    fn new(
        action: AuditAction,
        before: CalculatorState,
        after: Option<CalculatorState>,
        metadata: AuditMetadata,
    ) -> Self {
        Self {
            action,
            before,
            after,
            metadata: (!metadata.is_empty()).then_some(metadata),
        }
    }

    /// Operand edit: digit, decimal point or backspace.
    pub fn digit(
        before: CalculatorState,
        after: CalculatorState,
        reason: impl Into<String>,
    ) -> Self {
        let metadata = AuditMetadata {
            reason: Some(reason.into()),
            ..AuditMetadata::default()
        };
        Self::new(AuditAction::Input, before, Some(after), metadata)
    }

    /// Operator selection, including a chained intermediate computation.
    pub fn operator(
        before: CalculatorState,
        after: CalculatorState,
        reason: Option<String>,
    ) -> Self {
        let metadata = AuditMetadata {
            reason,
            ..AuditMetadata::default()
        };
        Self::new(AuditAction::Operator, before, Some(after), metadata)
    }

    pub fn compute(
        before: CalculatorState,
        after: CalculatorState,
        signature: Option<SignatureResult>,
    ) -> Self {
        let metadata = AuditMetadata {
            signature,
            ..AuditMetadata::default()
        };
        Self::new(AuditAction::Compute, before, Some(after), metadata)
    }

    pub fn clear(
        before: CalculatorState,
        after: CalculatorState,
        signature: Option<SignatureResult>,
    ) -> Self {
        let metadata = AuditMetadata {
            signature,
            ..AuditMetadata::default()
        };
        Self::new(AuditAction::Clear, before, Some(after), metadata)
    }

    /// Failed transition. `before` is the state the failure left untouched.
    pub fn error(
        before: CalculatorState,
        error: impl Into<String>,
        signature: Option<SignatureResult>,
    ) -> Self {
        let metadata = AuditMetadata {
            error: Some(error.into()),
            signature,
            ..AuditMetadata::default()
        };
        Self::new(AuditAction::Error, before, None, metadata)
    }
}

/// Immutable, stamped record of one transition attempt.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEntry {
    pub subject_id: String,
    pub timestamp: DateTime<Utc>,
    pub action: AuditAction,
    pub before: CalculatorState,
    pub after: Option<CalculatorState>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<AuditMetadata>,
}

impl AuditEntry {
    /// Stamp a record with its subject and capture time.
    pub fn stamp(
        record: AuditRecord,
        subject_id: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            subject_id: subject_id.into(),
            timestamp,
            action: record.action,
            before: record.before,
            after: record.after,
            metadata: record.metadata,
        }
    }

    pub fn reason(&self) -> Option<&str> {
        self.metadata.as_ref()?.reason.as_deref()
    }

    pub fn error(&self) -> Option<&str> {
        self.metadata.as_ref()?.error.as_deref()
    }

    pub fn signature(&self) -> Option<&SignatureResult> {
        self.metadata.as_ref()?.signature.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Operator;

    fn before() -> CalculatorState {
        CalculatorState {
            input_a: "2".to_string(),
            input_b: "2".to_string(),
            operator: Some(Operator::Add),
        }
    }

    #[test]
    fn constructors_fix_action_tags() {
        let after = CalculatorState::new();
        assert_eq!(
            AuditRecord::digit(before(), after.clone(), "digit").action,
            AuditAction::Input
        );
        assert_eq!(
            AuditRecord::operator(before(), after.clone(), None).action,
            AuditAction::Operator
        );
        assert_eq!(
            AuditRecord::compute(before(), after.clone(), None).action,
            AuditAction::Compute
        );
        assert_eq!(
            AuditRecord::clear(before(), after, None).action,
            AuditAction::Clear
        );
        assert_eq!(
            AuditRecord::error(before(), "Divide by zero", None).action,
            AuditAction::Error
        );
    }

    #[test]
    fn empty_metadata_is_omitted() {
        let record = AuditRecord::compute(before(), CalculatorState::new(), None);
        assert!(record.metadata.is_none());

        let record = AuditRecord::error(before(), "Divide by zero", None);
        assert!(record.after.is_none());
        assert_eq!(
            record.metadata.and_then(|m| m.error).as_deref(),
            Some("Divide by zero")
        );
    }

    #[test]
    fn entry_serializes_with_expected_shape() {
        let entry = AuditEntry::stamp(
            AuditRecord::clear(before(), CalculatorState::new(), Some(SignatureResult::pin(true))),
            "user-001",
            Utc::now(),
        );
        let json = serde_json::to_value(&entry).unwrap();

        assert_eq!(json["subjectId"], "user-001");
        assert_eq!(json["action"], "CLEAR");
        assert_eq!(json["before"]["inputA"], "2");
        assert_eq!(json["after"]["operator"], serde_json::Value::Null);
        assert_eq!(json["metadata"]["signature"]["verified"], true);
        assert_eq!(json["metadata"]["signature"]["method"], "pin");

        let timestamp = json["timestamp"].as_str().unwrap();
        assert!(DateTime::parse_from_rfc3339(timestamp).is_ok());
    }

    #[test]
    fn accessors_read_metadata() {
        let entry = AuditEntry::stamp(
            AuditRecord::digit(before(), before(), "backspace"),
            "device",
            Utc::now(),
        );
        assert_eq!(entry.reason(), Some("backspace"));
        assert_eq!(entry.error(), None);
        assert!(entry.signature().is_none());
        assert_eq!(entry.action.name(), "INPUT");
    }
}
