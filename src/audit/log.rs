//! Append-only audit log.

use super::entry::{AuditEntry, AuditRecord};
use crate::storage::{MemorySlots, Slots, StorageError};
use chrono::Utc;

/// Slot holding the serialized log.
pub const AUDIT_SLOT: &str = "calculator_audit_log_v1";

/// Ordered, append-only sequence of audit entries.
///
/// The log is the sole writer of its entries. Each append re-persists the
/// whole sequence as a JSON array into its slot; persistence failures are
/// logged and swallowed so auditing never blocks the calculator.
///
/// # Example
///
/// ```rust
/// use auditcalc::audit::{AuditLog, AuditRecord};
/// use auditcalc::core::CalculatorState;
///
/// let mut log = AuditLog::in_memory();
/// let before = CalculatorState::new();
/// let mut after = before.clone();
/// after.input_a.push('9');
///
/// log.append("user-001", AuditRecord::digit(before, after, "digit"));
/// assert_eq!(log.get_all().len(), 1);
///
/// log.clear();
/// assert!(log.get_all().is_empty());
/// ```
pub struct AuditLog {
    entries: Vec<AuditEntry>,
    slots: Box<dyn Slots>,
    key: String,
}

impl AuditLog {
    /// Open the log stored under `key`, resuming any persisted entries.
    ///
    /// Unreadable slot contents are logged and the log starts empty.
    pub fn open(slots: Box<dyn Slots>, key: impl Into<String>) -> Self {
        let key = key.into();
        let entries = match load(&*slots, &key) {
            Ok(entries) => entries,
            Err(err) => {
                tracing::warn!(%err, slot = %key, "Discarding unreadable audit log");
                Vec::new()
            }
        };
        tracing::debug!(slot = %key, entries = entries.len(), "Opened audit log");

        Self {
            entries,
            slots,
            key,
        }
    }

    /// A log backed by fresh in-memory slots.
    pub fn in_memory() -> Self {
        Self::open(Box::new(MemorySlots::new()), AUDIT_SLOT)
    }

    /// Stamp `record` with `subject_id` and the current time, then append.
    ///
    /// The whole log is serialized and written to its slot on every call,
    /// so the cost of an append grows with the length of the log.
    pub fn append(&mut self, subject_id: &str, record: AuditRecord) {
        let entry = AuditEntry::stamp(record, subject_id, Utc::now());
        tracing::debug!(
            action = entry.action.name(),
            subject = %entry.subject_id,
            "Audit entry appended"
        );
        self.entries.push(entry);

        if let Err(err) = self.flush() {
            tracing::warn!(%err, slot = %self.key, "Failed to persist audit log");
        }
    }

    /// Persist the current entries, reporting storage failures.
    pub fn flush(&mut self) -> Result<(), StorageError> {
        let json = serde_json::to_string(&self.entries)?;
        self.slots.set(&self.key, &json)
    }

    /// Snapshot copy of all entries, oldest first.
    pub fn get_all(&self) -> Vec<AuditEntry> {
        self.entries.clone()
    }

    /// Borrowed view of all entries, oldest first.
    pub fn entries(&self) -> &[AuditEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Erase every entry and the persisted slot.
    pub fn clear(&mut self) {
        self.entries.clear();
        if let Err(err) = self.slots.remove(&self.key) {
            tracing::warn!(%err, slot = %self.key, "Failed to remove persisted audit log");
        }
        tracing::info!(slot = %self.key, "Audit log cleared");
    }

    /// Pretty-printed JSON array of all entries.
    pub fn export_json(&self) -> Result<String, StorageError> {
        Ok(serde_json::to_string_pretty(&self.entries)?)
    }

    /// Mutable access to the backing slots.
    pub fn slots_mut(&mut self) -> &mut dyn Slots {
        self.slots.as_mut()
    }
}

fn load(slots: &dyn Slots, key: &str) -> Result<Vec<AuditEntry>, StorageError> {
    match slots.get(key)? {
        Some(raw) => serde_json::from_str(&raw).map_err(|source| StorageError::Corrupt {
            key: key.to_string(),
            source,
        }),
        None => Ok(Vec::new()),
    }
}

impl std::fmt::Debug for AuditLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuditLog")
            .field("key", &self.key)
            .field("entries", &self.entries.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::AuditAction;
    use crate::core::{CalculatorState, Operator};
    use crate::signature::SignatureResult;

    fn before() -> CalculatorState {
        CalculatorState {
            input_a: "1".to_string(),
            input_b: "1".to_string(),
            operator: Some(Operator::Add),
        }
    }

    fn after() -> CalculatorState {
        CalculatorState {
            input_a: "2".to_string(),
            ..CalculatorState::default()
        }
    }

    /// Slots whose writes always fail.
    struct BrokenSlots;

    impl Slots for BrokenSlots {
        fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Ok(None)
        }

        fn set(&mut self, key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::InvalidKey(key.to_string()))
        }

        fn remove(&mut self, key: &str) -> Result<(), StorageError> {
            Err(StorageError::InvalidKey(key.to_string()))
        }
    }

    #[test]
    fn new_log_is_empty() {
        let log = AuditLog::in_memory();
        assert!(log.is_empty());
        assert_eq!(log.len(), 0);
    }

    #[test]
    fn append_stamps_and_orders_entries() {
        let mut log = AuditLog::in_memory();
        log.append("user-001", AuditRecord::compute(before(), after(), None));
        log.append("user-001", AuditRecord::error(before(), "Divide by zero", None));

        let all = log.get_all();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].action, AuditAction::Compute);
        assert_eq!(all[1].action, AuditAction::Error);
        assert!(all.iter().all(|e| e.subject_id == "user-001"));
        assert!(all[0].timestamp <= all[1].timestamp);
    }

    #[test]
    fn get_all_is_a_snapshot() {
        let mut log = AuditLog::in_memory();
        log.append("user-001", AuditRecord::compute(before(), after(), None));

        let mut copy = log.get_all();
        copy.clear();

        assert_eq!(log.len(), 1);
    }

    #[test]
    fn append_persists_to_slot() {
        let mut log = AuditLog::in_memory();
        log.append(
            "user-001",
            AuditRecord::compute(before(), after(), Some(SignatureResult::pin(true))),
        );

        let raw = log.slots_mut().get(AUDIT_SLOT).unwrap().unwrap();
        let stored: Vec<AuditEntry> = serde_json::from_str(&raw).unwrap();
        assert_eq!(stored, log.get_all());
    }

    #[test]
    fn open_resumes_persisted_entries() {
        let mut slots = MemorySlots::new();
        {
            let mut log = AuditLog::open(Box::new(slots.clone()), AUDIT_SLOT);
            log.append("user-001", AuditRecord::compute(before(), after(), None));
            let raw = log.slots_mut().get(AUDIT_SLOT).unwrap().unwrap();
            slots.set(AUDIT_SLOT, &raw).unwrap();
        }

        let log = AuditLog::open(Box::new(slots), AUDIT_SLOT);
        assert_eq!(log.len(), 1);
        assert_eq!(log.entries()[0].after, Some(after()));
    }

    #[test]
    fn open_discards_corrupt_slot() {
        let mut slots = MemorySlots::new();
        slots.set(AUDIT_SLOT, "{not json").unwrap();

        let log = AuditLog::open(Box::new(slots), AUDIT_SLOT);
        assert!(log.is_empty());
    }

    #[test]
    fn clear_erases_entries_and_slot() {
        let mut log = AuditLog::in_memory();
        log.append("user-001", AuditRecord::clear(before(), CalculatorState::new(), None));
        log.clear();

        assert!(log.get_all().is_empty());
        assert_eq!(log.slots_mut().get(AUDIT_SLOT).unwrap(), None);
    }

    #[test]
    fn export_round_trips() {
        let mut log = AuditLog::in_memory();
        log.append("user-001", AuditRecord::digit(CalculatorState::new(), after(), "digit"));
        log.append(
            "user-001",
            AuditRecord::error(before(), "Divide by zero", Some(SignatureResult::pin(false))),
        );

        let exported = log.export_json().unwrap();
        let parsed: Vec<AuditEntry> = serde_json::from_str(&exported).unwrap();
        assert_eq!(parsed, log.get_all());
    }

    #[test]
    fn persistence_failures_do_not_block_appends() {
        let mut log = AuditLog::open(Box::new(BrokenSlots), AUDIT_SLOT);
        log.append("user-001", AuditRecord::compute(before(), after(), None));
        log.clear();
        log.append("user-001", AuditRecord::compute(before(), after(), None));

        assert_eq!(log.len(), 1);
        assert!(log.flush().is_err());
    }
}
