//! Persistence - strategies, codecs and storage backends.
//!
//! A table's records are written as one document per entity type. The
//! [`Strategy`] picks the [`Codec`] and the file extension; the [`Storage`]
//! backend decides where the bytes live.

mod codec;
mod csv;
mod file;
mod in_memory;
mod json;
mod storage;
mod yaml;

use std::fmt;
use std::str::FromStr;

use crate::error::{RecordError, Result};
use crate::naming;

pub use self::csv::CsvCodec;
pub use codec::Codec;
pub use file::FileStorage;
pub use in_memory::InMemoryStorage;
pub use json::JsonCodec;
pub use storage::Storage;
pub use yaml::YamlCodec;

/// How a table's records are encoded on disk.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Strategy {
    #[default]
    Yaml,
    Csv,
    Json,
    /// PostgreSQL. Recognized but not implemented: every load or persist
    /// fails with a configuration error.
    Psql,
}

impl Strategy {
    pub fn name(&self) -> &'static str {
        match self {
            Strategy::Yaml => "yaml",
            Strategy::Csv => "csv",
            Strategy::Json => "json",
            Strategy::Psql => "psql",
        }
    }

    pub fn extension(&self) -> Result<&'static str> {
        Ok(self.codec()?.extension())
    }

    pub fn codec(&self) -> Result<&'static dyn Codec> {
        match self {
            Strategy::Yaml => Ok(&YamlCodec),
            Strategy::Csv => Ok(&CsvCodec),
            Strategy::Json => Ok(&JsonCodec),
            Strategy::Psql => Err(RecordError::BackendUnavailable("psql")),
        }
    }

    /// Storage location for `entity` under this strategy, e.g. `pet_owner.yml`.
    pub fn location(&self, entity: &str) -> Result<String> {
        Ok(format!("{}.{}", naming::underscore(entity), self.extension()?))
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Strategy {
    type Err = RecordError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "yaml" | "yml" => Ok(Strategy::Yaml),
            "csv" => Ok(Strategy::Csv),
            "json" => Ok(Strategy::Json),
            "psql" | "postgres" | "postgresql" => Ok(Strategy::Psql),
            _ => Err(RecordError::UnsupportedStrategy(s.to_string())),
        }
    }
}
