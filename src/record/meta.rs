use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::errors::Errors;

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a record value.
///
/// Identity is what `persisted` and `destroy` compare against, never the
/// record's attributes. Clones share it; [`RecordMeta::reassign`] replaces it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordId(u64);

impl RecordId {
    pub fn next() -> Self {
        RecordId(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Bookkeeping carried by every record: its identity and the errors from its
/// most recent validation pass. Not part of the record's attributes.
#[derive(Clone, Debug)]
pub struct RecordMeta {
    id: RecordId,
    errors: Errors,
}

impl Default for RecordMeta {
    fn default() -> Self {
        RecordMeta::new()
    }
}

impl RecordMeta {
    pub fn new() -> Self {
        RecordMeta {
            id: RecordId::next(),
            errors: Errors::new(),
        }
    }

    pub fn id(&self) -> RecordId {
        self.id
    }

    /// Give this record a fresh identity, detaching it from any stored copy.
    pub fn reassign(&mut self) {
        self.id = RecordId::next();
    }

    pub fn errors(&self) -> &Errors {
        &self.errors
    }

    pub(crate) fn set_errors(&mut self, errors: Errors) {
        self.errors = errors;
    }
}
