//! Database - the tables of every entity type, keyed by entity name.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, RwLock};

use tracing::debug;

use crate::association::{Association, AssociationKind};
use crate::collection::Collection;
use crate::config::DatabaseConfig;
use crate::error::{RecordError, Result};
use crate::persistence::{FileStorage, InMemoryStorage, Storage};
use crate::record::{Attributes, Record};
use crate::table::Table;

type AnyTable = Arc<dyn Any + Send + Sync>;

/// Owns one [`Table`] per entity type. Tables are created on first use and
/// live as long as the database.
pub struct Database {
    config: DatabaseConfig,
    storage: Arc<dyn Storage>,
    tables: RwLock<HashMap<&'static str, AnyTable>>,
}

impl Database {
    /// File-backed database rooted at `config.root`.
    pub fn new(config: DatabaseConfig) -> Self {
        let storage = FileStorage::new(config.root.clone());
        Self::with_storage(config, storage)
    }

    /// Database whose documents live in memory only.
    pub fn in_memory() -> Self {
        Self::with_storage(DatabaseConfig::default(), InMemoryStorage::new())
    }

    pub fn with_storage(config: DatabaseConfig, storage: impl Storage + 'static) -> Self {
        Database {
            config,
            storage: Arc::new(storage),
            tables: RwLock::new(HashMap::new()),
        }
    }

    /// Configuration this database was opened with.
    pub fn config(&self) -> &DatabaseConfig {
        &self.config
    }

    /// Backend shared by every table.
    pub fn storage(&self) -> Arc<dyn Storage> {
        Arc::clone(&self.storage)
    }

    fn downcast<R: Record>(name: &str, entry: &AnyTable) -> Result<Table<R>> {
        entry
            .downcast_ref::<Table<R>>()
            .cloned()
            .ok_or_else(|| RecordError::EntityTypeMismatch {
                name: name.to_string(),
                requested: R::ENTITY,
            })
    }

    /// Table for `R`, creating it on first use. Fails when `R`'s schema is
    /// misconfigured or another type already registered the same entity name.
    pub fn table<R: Record>(&self) -> Result<Table<R>> {
        {
            let tables = self
                .tables
                .read()
                .map_err(|_| RecordError::LockPoisoned("tables read"))?;
            if let Some(entry) = tables.get(R::ENTITY) {
                return Self::downcast(R::ENTITY, entry);
            }
        }

        let mut tables = self
            .tables
            .write()
            .map_err(|_| RecordError::LockPoisoned("tables write"))?;
        if let Some(entry) = tables.get(R::ENTITY) {
            return Self::downcast(R::ENTITY, entry);
        }

        let table = Table::<R>::new(self.storage(), self.config.default_strategy)?;
        tables.insert(R::ENTITY, Arc::new(table.clone()));
        debug!(entity = R::ENTITY, "table registered");
        Ok(table)
    }

    /// Alias of [`Database::table`] for eager registration at startup.
    pub fn register<R: Record>(&self) -> Result<Table<R>> {
        self.table::<R>()
    }

    /// Table registered under `name`. Never creates one.
    pub fn lookup<R: Record>(&self, name: &str) -> Result<Table<R>> {
        let tables = self
            .tables
            .read()
            .map_err(|_| RecordError::LockPoisoned("tables read"))?;
        let entry = tables
            .get(name)
            .ok_or_else(|| RecordError::UnknownEntity(name.to_string()))?;
        Self::downcast(name, entry)
    }

    /// Names of the registered entity types, sorted.
    pub fn entities(&self) -> Result<Vec<&'static str>> {
        let tables = self
            .tables
            .read()
            .map_err(|_| RecordError::LockPoisoned("tables read"))?;
        let mut names: Vec<&'static str> = tables.keys().copied().collect();
        names.sort_unstable();
        Ok(names)
    }

    fn resolve<O: Record, T: Record>(
        &self,
        name: &str,
        kind: AssociationKind,
    ) -> Result<(Association, Table<T>)> {
        let association = self
            .table::<O>()?
            .schema()
            .association(name, kind)
            .cloned()
            .ok_or_else(|| RecordError::UnknownAssociation {
                entity: O::ENTITY,
                name: name.to_string(),
            })?;

        let target = self.lookup::<T>(association.target())?;
        if !T::declares(association.foreign_key()) {
            return Err(RecordError::UnknownAttribute {
                entity: T::ENTITY,
                attribute: association.foreign_key().to_string(),
            });
        }
        Ok((association, target))
    }

    /// Records of `T` pointing at `owner` through the `name` has-many
    /// association declared on `O`.
    pub fn has_many<O: Record, T: Record>(&self, owner: &O, name: &str) -> Result<Collection<T>> {
        let (association, target) = self.resolve::<O, T>(name, AssociationKind::HasMany)?;
        let mut conditions = Attributes::new();
        conditions.insert(association.foreign_key().to_string(), owner.reference());
        target.filter(conditions)
    }

    /// First record of `T` pointing at `record` through the `name`
    /// belongs-to association declared on `O`.
    pub fn belongs_to<O: Record, T: Record>(&self, record: &O, name: &str) -> Result<Option<T>> {
        let (association, target) = self.resolve::<O, T>(name, AssociationKind::BelongsTo)?;
        let mut conditions = Attributes::new();
        conditions.insert(association.foreign_key().to_string(), record.reference());
        target.find_by(conditions)
    }
}

impl fmt::Debug for Database {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let entities = self.entities().unwrap_or_default();
        f.debug_struct("Database")
            .field("config", &self.config)
            .field("entities", &entities)
            .finish()
    }
}
