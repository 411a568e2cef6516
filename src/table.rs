//! Table - the live records of one entity type and their lifecycle.
//!
//! A table owns the ordered list of records, the schema declared by the
//! record type and the active persistence strategy. Every mutating operation
//! rewrites the whole backing document before it returns.
//!
//! Locking: the store-mutate-then-persist sequence of each operation runs
//! under one write lock. Hooks and validation rules run with no lock held,
//! so they may call back into any table, including this one. Uniqueness
//! rules are checked again under the write lock before a record is stored,
//! so concurrent saves cannot both store the same value. Custom rules get
//! no such guarantee.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, info, warn};

use crate::callbacks::Event;
use crate::collection::Collection;
use crate::error::{RecordError, Result};
use crate::errors::Errors;
use crate::persistence::{Storage, Strategy};
use crate::record::{Attributes, Record, RecordId};
use crate::schema::Schema;

struct TableState<R> {
    records: Vec<R>,
    strategy: Strategy,
}

struct TableInner<R> {
    schema: Schema<R>,
    storage: Arc<dyn Storage>,
    state: RwLock<TableState<R>>,
}

/// Handle to the record store of `R`. Clones share the same store.
pub struct Table<R> {
    inner: Arc<TableInner<R>>,
}

impl<R> std::fmt::Debug for Table<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Table").finish_non_exhaustive()
    }
}

impl<R> Clone for Table<R> {
    fn clone(&self) -> Self {
        Table {
            inner: Arc::clone(&self.inner),
        }
    }
}

fn position<R: Record>(records: &[R], id: RecordId) -> Option<usize> {
    records.iter().position(|record| record.id() == id)
}

impl<R: Record> Table<R> {
    /// Table for `R` with the schema from [`Record::configure`]. The schema's
    /// strategy wins over `default_strategy`.
    pub fn new(storage: Arc<dyn Storage>, default_strategy: Strategy) -> Result<Self> {
        Self::with_schema(Schema::for_record()?, storage, default_strategy)
    }

    /// Table for `R` with an explicit schema. Fails on the first
    /// configuration problem in `schema`, such as a format validation
    /// without a pattern.
    pub fn with_schema(
        mut schema: Schema<R>,
        storage: Arc<dyn Storage>,
        default_strategy: Strategy,
    ) -> Result<Self> {
        schema.check()?;
        let strategy = schema.strategy().unwrap_or(default_strategy);
        Ok(Table {
            inner: Arc::new(TableInner {
                schema,
                storage,
                state: RwLock::new(TableState {
                    records: Vec::new(),
                    strategy,
                }),
            }),
        })
    }

    pub fn schema(&self) -> &Schema<R> {
        &self.inner.schema
    }

    fn read_state(&self, operation: &'static str) -> Result<RwLockReadGuard<'_, TableState<R>>> {
        self.inner
            .state
            .read()
            .map_err(|_| RecordError::LockPoisoned(operation))
    }

    fn write_state(
        &self,
        operation: &'static str,
    ) -> Result<RwLockWriteGuard<'_, TableState<R>>> {
        self.inner
            .state
            .write()
            .map_err(|_| RecordError::LockPoisoned(operation))
    }

    fn run(&self, event: Event, record: &mut R) -> Result<()> {
        self.inner.schema.callbacks().run(event, record)
    }

    // ------------------------------------------------------------------
    // Persistence
    // ------------------------------------------------------------------

    pub fn persistence_strategy(&self) -> Result<Strategy> {
        Ok(self.read_state("strategy read")?.strategy)
    }

    /// Switch strategies. Records already written under the old strategy
    /// stay where they are.
    pub fn set_persistence_strategy(&self, strategy: Strategy) -> Result<()> {
        self.write_state("strategy write")?.strategy = strategy;
        debug!(entity = R::ENTITY, %strategy, "persistence strategy set");
        Ok(())
    }

    /// Storage location of the backing document under the current strategy.
    pub fn location(&self) -> Result<String> {
        self.persistence_strategy()?.location(R::ENTITY)
    }

    /// Encode every record and overwrite the backing document.
    pub fn persist(&self) -> Result<()> {
        let state = self.write_state("persist")?;
        self.write_locked(&state)
    }

    fn write_locked(&self, state: &TableState<R>) -> Result<()> {
        let codec = state.strategy.codec()?;
        let location = state.strategy.location(R::ENTITY)?;
        let rows: Vec<Attributes> = state.records.iter().map(Record::attributes).collect();
        let bytes = codec.encode(&rows)?;

        if let Err(err) = self.inner.storage.write(&location, &bytes) {
            warn!(entity = R::ENTITY, %location, error = %err, "persist failed");
            return Err(err);
        }
        debug!(
            entity = R::ENTITY,
            %location,
            records = rows.len(),
            bytes = bytes.len(),
            "persisted"
        );
        Ok(())
    }

    /// Replace the store with the records in the backing document.
    ///
    /// Each row goes through the create lifecycle (validation and the create
    /// and save hooks); rows that fail validation are dropped. The document
    /// is rewritten once at the end. Returns `false`, leaving the store as it
    /// was, when there is no backing document.
    pub fn load(&self) -> Result<bool> {
        let strategy = self.persistence_strategy()?;
        let codec = strategy.codec()?;
        let location = strategy.location(R::ENTITY)?;

        let Some(bytes) = self.inner.storage.read(&location)? else {
            debug!(entity = R::ENTITY, %location, "nothing to load");
            return Ok(false);
        };

        let mut candidates = codec
            .decode(&bytes)?
            .into_iter()
            .map(R::from_attributes)
            .collect::<Result<Vec<R>>>()?;

        self.write_state("load")?.records.clear();

        let total = candidates.len();
        let mut loaded = 0;
        for record in candidates.iter_mut() {
            if self.create_record(record, false)? {
                loaded += 1;
            } else {
                warn!(
                    entity = R::ENTITY,
                    errors = %record.errors(),
                    "dropping invalid row"
                );
            }
        }

        self.persist()?;
        info!(entity = R::ENTITY, %location, loaded, dropped = total - loaded, "loaded");
        Ok(true)
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// Snapshot of every stored record.
    pub fn all(&self) -> Result<Collection<R>> {
        Ok(Collection::new(self.read_state("all")?.records.clone()))
    }

    /// Stored records matching every condition. See [`Collection::filter`].
    pub fn filter(&self, conditions: Attributes) -> Result<Collection<R>> {
        Ok(self.all()?.filter(conditions))
    }

    /// First stored record matching every condition.
    pub fn find_by(&self, conditions: Attributes) -> Result<Option<R>> {
        Ok(self.all()?.find_by(conditions))
    }

    /// Number of stored records.
    pub fn count(&self) -> Result<usize> {
        Ok(self.read_state("count")?.records.len())
    }

    /// Whether `record` is in the store, by identity.
    pub fn persisted(&self, record: &R) -> Result<bool> {
        let state = self.read_state("persisted")?;
        Ok(position(&state.records, record.id()).is_some())
    }

    // ------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------

    /// A new, unsaved record.
    pub fn build(&self, attrs: Attributes) -> Result<R> {
        R::from_attributes(attrs)
    }

    /// Build, validate and save a record. An invalid record is returned
    /// unsaved; check [`Table::persisted`] or its errors.
    pub fn create(&self, attrs: Attributes) -> Result<R> {
        self.create_from(self.build(attrs)?)
    }

    pub fn create_from(&self, mut record: R) -> Result<R> {
        self.create_record(&mut record, true)?;
        Ok(record)
    }

    fn create_record(&self, record: &mut R, flush: bool) -> Result<bool> {
        if !self.valid(record)? {
            return Ok(false);
        }
        self.run(Event::BeforeCreate, record)?;
        if !self.save_record(record, flush)? {
            return Ok(false);
        }
        self.run(Event::AfterCreate, record)?;
        Ok(true)
    }

    /// Validate the record and write it to the store. A record already in
    /// the store is replaced in place, never duplicated.
    ///
    /// A failed write leaves the record in the in-memory store.
    pub fn save(&self, record: &mut R) -> Result<bool> {
        self.save_record(record, true)
    }

    fn save_record(&self, record: &mut R, flush: bool) -> Result<bool> {
        self.run(Event::BeforeSave, record)?;
        if !self.valid(record)? {
            debug!(entity = R::ENTITY, id = %record.id(), errors = %record.errors(), "save rejected");
            return Ok(false);
        }

        {
            let mut state = self.write_state("save")?;
            let validations = self.inner.schema.validations();
            if validations.needs_peers() {
                // re-checked under the write lock; a concurrent save may have
                // stored the same value since validation ran
                let conflicts = validations.uniqueness_conflicts(record, &state.records);
                if !conflicts.is_blank() {
                    debug!(entity = R::ENTITY, id = %record.id(), errors = %conflicts, "save rejected");
                    record.meta_mut().set_errors(conflicts);
                    return Ok(false);
                }
            }
            match position(&state.records, record.id()) {
                Some(index) => state.records[index] = record.clone(),
                None => state.records.push(record.clone()),
            }
            if flush {
                self.write_locked(&state)?;
            }
        }

        self.run(Event::AfterSave, record)?;
        Ok(true)
    }

    /// Assign `attrs` and save. `after_update` hooks run only when the save
    /// succeeded.
    pub fn update(&self, record: &mut R, attrs: Attributes) -> Result<bool> {
        self.run(Event::BeforeUpdate, record)?;
        record.assign_attributes(&attrs)?;
        let saved = self.save(record)?;
        if saved {
            self.run(Event::AfterUpdate, record)?;
        }
        Ok(saved)
    }

    /// Remove the record from the store. Returns whether it was there; the
    /// record value itself is left with the caller.
    pub fn destroy(&self, record: &mut R) -> Result<bool> {
        self.run(Event::BeforeDestroy, record)?;

        let removed = {
            let mut state = self.write_state("destroy")?;
            match position(&state.records, record.id()) {
                Some(index) => {
                    state.records.remove(index);
                    self.write_locked(&state)?;
                    true
                }
                None => false,
            }
        };

        if removed {
            self.run(Event::AfterDestroy, record)?;
        }
        Ok(removed)
    }

    /// Run the validation pipeline and store the resulting errors on the
    /// record. Returns whether the record is valid.
    pub fn valid(&self, record: &mut R) -> Result<bool> {
        record.meta_mut().set_errors(Errors::new());
        self.run(Event::BeforeValidation, record)?;

        let validations = self.inner.schema.validations();
        let mut errors = if validations.needs_peers() {
            let peers = self.read_state("validate")?.records.clone();
            validations.evaluate(record, &peers)
        } else {
            validations.evaluate(record, &[])
        };
        errors.dedup();
        record.meta_mut().set_errors(errors);

        self.run(Event::AfterValidation, record)?;
        Ok(record.errors().is_blank())
    }

    /// [`Table::update`] every record, each validated and written on its
    /// own. Returns how many saved.
    pub fn update_all(&self, attrs: Attributes) -> Result<usize> {
        let mut saved = 0;
        for mut record in self.all()? {
            if self.update(&mut record, attrs.clone())? {
                saved += 1;
            }
        }
        Ok(saved)
    }

    /// Empty the store without running any callbacks, then persist. Returns
    /// how many records were removed.
    pub fn destroy_all(&self) -> Result<usize> {
        let mut state = self.write_state("destroy_all")?;
        let removed = state.records.len();
        state.records.clear();
        self.write_locked(&state)?;
        debug!(entity = R::ENTITY, removed, "destroyed all");
        Ok(removed)
    }
}
