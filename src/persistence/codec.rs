use std::fmt;

use crate::error::{RecordError, Result};
use crate::record::Attributes;

/// Converts a table's rows to and from the bytes of one document.
pub trait Codec: Send + Sync {
    /// Short name used in error messages, e.g. `"yaml"`.
    fn format(&self) -> &'static str;

    /// File extension without the dot.
    fn extension(&self) -> &'static str;

    fn encode(&self, rows: &[Attributes]) -> Result<Vec<u8>>;

    /// Decode a document. Empty or whitespace-only input is an empty table.
    fn decode(&self, bytes: &[u8]) -> Result<Vec<Attributes>>;

    /// Codec error tagged with [`Codec::format`].
    fn error(&self, err: impl fmt::Display) -> RecordError
    where
        Self: Sized,
    {
        RecordError::Codec {
            format: self.format(),
            message: err.to_string(),
        }
    }
}
