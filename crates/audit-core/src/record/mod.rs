//! Normalized audit records

mod audit_record;

pub use audit_record::{AuditRecord, RecordColor, RecordField, FIELD_VALUE_LIMIT, NO_CONTENT};
