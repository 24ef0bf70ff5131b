//! Audit trail for calculator transitions.
//!
//! Every accepted transition and every failed one becomes an immutable
//! [`AuditEntry`] carrying before/after snapshots. Validation rejections
//! are not audited.

mod entry;
mod log;

pub use entry::{AuditAction, AuditEntry, AuditMetadata, AuditRecord};
pub use log::{AuditLog, AUDIT_SLOT};
