//! Audit record - the uniform notification sent to a sink channel
//!
//! Serializes to the platform's embed shape:
//! `{ title, color, timestamp, fields: [{ name, value, inline }] }`.

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};

/// Placeholder for empty or missing message content
pub const NO_CONTENT: &str = "No content";

/// Maximum length of a field value accepted by the platform
pub const FIELD_VALUE_LIMIT: usize = 1024;

/// Record accent colors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordColor {
    Red,
    Yellow,
    Green,
}

impl RecordColor {
    /// RGB value as sent on the wire
    #[must_use]
    pub const fn rgb(self) -> u32 {
        match self {
            Self::Red => 0xFF_00_00,
            Self::Yellow => 0xFF_FF_00,
            Self::Green => 0x00_FF_00,
        }
    }
}

impl Serialize for RecordColor {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u32(self.rgb())
    }
}

/// A single name/value pair of a record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

/// Normalized audit record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuditRecord {
    pub title: String,
    pub color: RecordColor,
    /// When the event was normalized, not when it was sent
    pub timestamp: DateTime<Utc>,
    pub fields: Vec<RecordField>,
}

impl AuditRecord {
    /// Create a record without fields
    #[must_use]
    pub fn new(title: impl Into<String>, color: RecordColor, timestamp: DateTime<Utc>) -> Self {
        Self {
            title: title.into(),
            color,
            timestamp,
            fields: Vec::new(),
        }
    }

    /// Append a field (builder style)
    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>, inline: bool) -> Self {
        self.push_field(name, value, inline);
        self
    }

    /// Append a field, clamping its value to [`FIELD_VALUE_LIMIT`]
    pub fn push_field(&mut self, name: impl Into<String>, value: impl Into<String>, inline: bool) {
        self.fields.push(RecordField {
            name: name.into(),
            value: clamp_value(value.into()),
            inline,
        });
    }

    /// First field with the given name
    pub fn field(&self, name: &str) -> Option<&RecordField> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Number of fields with the given name
    pub fn count_fields(&self, name: &str) -> usize {
        self.fields.iter().filter(|f| f.name == name).count()
    }
}

fn clamp_value(value: String) -> String {
    if value.chars().count() <= FIELD_VALUE_LIMIT {
        return value;
    }
    let mut clamped: String = value.chars().take(FIELD_VALUE_LIMIT - 1).collect();
    clamped.push('…');
    clamped
}
