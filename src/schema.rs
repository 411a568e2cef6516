//! Schema - everything declared about one entity type.

use crate::association::{Association, AssociationKind};
use crate::callbacks::{Callback, Callbacks, Event};
use crate::error::Result;
use crate::errors::Errors;
use crate::persistence::Strategy;
use crate::record::Record;
use crate::validation::{Validates, Validations};

macro_rules! hook_registrars {
    ($($method:ident => $event:ident),* $(,)?) => {
        $(
            #[doc = concat!("Register a closure to run at `", stringify!($method), "`.")]
            pub fn $method<F>(&mut self, block: F) -> &mut Self
            where
                F: Fn(&mut R) -> Result<()> + Send + Sync + 'static,
            {
                self.callbacks.on(Event::$event, block);
                self
            }
        )*
    };
}

/// Callbacks, validations, associations and persistence settings for `R`,
/// filled in by [`Record::configure`].
#[derive(Debug)]
pub struct Schema<R> {
    callbacks: Callbacks<R>,
    validations: Validations<R>,
    associations: Vec<Association>,
    strategy: Option<Strategy>,
}

impl<R: Record> Default for Schema<R> {
    fn default() -> Self {
        Schema {
            callbacks: Callbacks::new(),
            validations: Validations::new(),
            associations: Vec::new(),
            strategy: None,
        }
    }
}

impl<R: Record> Schema<R> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schema declared by `R::configure`. Fails on the first configuration
    /// problem, such as a format validation without a pattern.
    pub fn for_record() -> Result<Self> {
        let mut schema = Schema::new();
        R::configure(&mut schema);
        schema.check()?;
        Ok(schema)
    }

    /// Fail with the first configuration problem recorded while the schema
    /// was declared.
    pub(crate) fn check(&mut self) -> Result<()> {
        match self.validations.take_problem() {
            Some(problem) => Err(problem),
            None => Ok(()),
        }
    }

    pub fn callbacks(&self) -> &Callbacks<R> {
        &self.callbacks
    }

    pub fn validations(&self) -> &Validations<R> {
        &self.validations
    }

    pub fn associations(&self) -> &[Association] {
        &self.associations
    }

    pub fn association(&self, name: &str, kind: AssociationKind) -> Option<&Association> {
        self.associations
            .iter()
            .find(|association| association.name() == name && association.kind() == kind)
    }

    /// Strategy declared for this type, if any.
    pub fn strategy(&self) -> Option<Strategy> {
        self.strategy
    }

    pub fn persistence(&mut self, strategy: Strategy) -> &mut Self {
        self.strategy = Some(strategy);
        self
    }

    pub fn callback(&mut self, event: Event, callback: Callback<R>) -> &mut Self {
        self.callbacks.register(event, callback);
        self
    }

    /// Register a method hook, e.g. `method(Event::BeforeSave, "normalize", Person::normalize)`.
    pub fn method(
        &mut self,
        event: Event,
        name: impl Into<String>,
        method: fn(&mut R) -> Result<()>,
    ) -> &mut Self {
        self.callbacks.register(event, Callback::method(name, method));
        self
    }

    hook_registrars! {
        before_save => BeforeSave,
        before_create => BeforeCreate,
        before_update => BeforeUpdate,
        before_validation => BeforeValidation,
        before_destroy => BeforeDestroy,
        after_save => AfterSave,
        after_create => AfterCreate,
        after_update => AfterUpdate,
        after_validation => AfterValidation,
        after_destroy => AfterDestroy,
    }

    pub fn validate(&mut self, name: impl Into<String>, method: fn(&R, &mut Errors)) -> &mut Self {
        self.validations.validate(name, method);
        self
    }

    pub fn validate_with<F>(&mut self, name: impl Into<String>, block: F) -> &mut Self
    where
        F: Fn(&R, &mut Errors) + Send + Sync + 'static,
    {
        self.validations.validate_with(name, block);
        self
    }

    pub fn validates(&mut self, field: impl Into<String>, options: Validates) -> &mut Self {
        self.validations.validates(field, options);
        self
    }

    pub fn validates_presence_of(&mut self, field: impl Into<String>) -> &mut Self {
        self.validations.validates_presence_of(field);
        self
    }

    pub fn validates_uniqueness_of(&mut self, field: impl Into<String>) -> &mut Self {
        self.validations.validates_uniqueness_of(field);
        self
    }

    pub fn validates_format_of(&mut self, field: impl Into<String>, pattern: &str) -> &mut Self {
        self.validations.validates_format_of(field, pattern);
        self
    }

    pub fn has_many(&mut self, name: impl Into<String>) -> &mut Self {
        self.associations.push(Association::has_many(R::ENTITY, name));
        self
    }

    pub fn belongs_to(&mut self, name: impl Into<String>) -> &mut Self {
        self.associations.push(Association::belongs_to(R::ENTITY, name));
        self
    }
}
