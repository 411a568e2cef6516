//! Errors - per-record validation failures.

use std::fmt;

/// A single validation failure for one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Validation failures collected for one record during one validation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Errors {
    entries: Vec<FieldError>,
}

impl Errors {
    /// Create an empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.entries.push(FieldError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn is_blank(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of messages, duplicates included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Messages in the order they were added.
    pub fn iter(&self) -> std::slice::Iter<'_, FieldError> {
        self.entries.iter()
    }

    /// Messages recorded against `field`.
    pub fn on(&self, field: &str) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|entry| entry.field == field)
            .map(|entry| entry.message.as_str())
            .collect()
    }

    pub fn full_messages(&self) -> Vec<String> {
        self.entries.iter().map(|entry| entry.message.clone()).collect()
    }

    /// Sorted by field name with at most one entry per field. The sort is
    /// stable, so the first message added for a field is the one kept.
    pub fn uniq(&self) -> Errors {
        let mut entries = self.entries.clone();
        entries.sort_by(|a, b| a.field.cmp(&b.field));
        entries.dedup_by(|next, kept| next.field == kept.field);
        Errors { entries }
    }

    /// In-place form of [`Errors::uniq`].
    pub fn dedup(&mut self) {
        *self = self.uniq();
    }
}

impl<'a> IntoIterator for &'a Errors {
    type Item = &'a FieldError;
    type IntoIter = std::slice::Iter<'a, FieldError>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl fmt::Display for Errors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages = self.full_messages();
        write!(f, "{}", messages.join(", "))
    }
}
