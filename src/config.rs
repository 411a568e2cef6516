//! Configuration for a [`Database`](crate::Database).

use std::path::PathBuf;

use crate::error::Result;
use crate::persistence::Strategy;

/// Directory holding the backing files.
pub const ROOT_VAR: &str = "RECORD_RUST_ROOT";
/// Default persistence strategy name (`yaml`, `csv`, `json`, `psql`).
pub const STRATEGY_VAR: &str = "RECORD_RUST_STRATEGY";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DatabaseConfig {
    /// Directory for file-backed tables. Defaults to the working directory.
    pub root: PathBuf,
    /// Strategy for tables whose schema does not pick one.
    pub default_strategy: Strategy,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        DatabaseConfig {
            root: PathBuf::from("."),
            default_strategy: Strategy::Yaml,
        }
    }
}

impl DatabaseConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = root.into();
        self
    }

    pub fn with_default_strategy(mut self, strategy: Strategy) -> Self {
        self.default_strategy = strategy;
        self
    }

    /// Defaults overridden by `RECORD_RUST_ROOT` and `RECORD_RUST_STRATEGY`.
    /// An unknown strategy name is a configuration error.
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = DatabaseConfig::default();
        if let Some(root) = lookup(ROOT_VAR).filter(|value| !value.is_empty()) {
            config.root = PathBuf::from(root);
        }
        if let Some(strategy) = lookup(STRATEGY_VAR).filter(|value| !value.is_empty()) {
            config.default_strategy = strategy.parse()?;
        }
        Ok(config)
    }
}
