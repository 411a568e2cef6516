//! Callbacks - lifecycle hooks registered per entity type.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::trace;

use crate::error::{RecordError, Result};

/// Lifecycle points at which hooks run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Event {
    BeforeSave,
    BeforeCreate,
    BeforeUpdate,
    BeforeValidation,
    BeforeDestroy,
    AfterSave,
    AfterCreate,
    AfterUpdate,
    AfterValidation,
    AfterDestroy,
}

impl Event {
    pub const ALL: [Event; 10] = [
        Event::BeforeSave,
        Event::BeforeCreate,
        Event::BeforeUpdate,
        Event::BeforeValidation,
        Event::BeforeDestroy,
        Event::AfterSave,
        Event::AfterCreate,
        Event::AfterUpdate,
        Event::AfterValidation,
        Event::AfterDestroy,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Event::BeforeSave => "before_save",
            Event::BeforeCreate => "before_create",
            Event::BeforeUpdate => "before_update",
            Event::BeforeValidation => "before_validation",
            Event::BeforeDestroy => "before_destroy",
            Event::AfterSave => "after_save",
            Event::AfterCreate => "after_create",
            Event::AfterUpdate => "after_update",
            Event::AfterValidation => "after_validation",
            Event::AfterDestroy => "after_destroy",
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Closure form of a hook.
pub type Hook<R> = Arc<dyn Fn(&mut R) -> Result<()> + Send + Sync>;

enum Target<R> {
    /// A method on the record taking no arguments besides the receiver.
    Method(fn(&mut R) -> Result<()>),
    Block(Hook<R>),
}

/// One registered hook.
pub struct Callback<R> {
    name: String,
    target: Target<R>,
}

impl<R> Callback<R> {
    /// Wrap an instance method, e.g. `Callback::method("normalize", Person::normalize)`.
    pub fn method(name: impl Into<String>, method: fn(&mut R) -> Result<()>) -> Self {
        Callback {
            name: name.into(),
            target: Target::Method(method),
        }
    }

    /// Wrap an inline closure.
    pub fn block<F>(block: F) -> Self
    where
        F: Fn(&mut R) -> Result<()> + Send + Sync + 'static,
    {
        Callback {
            name: "block".to_string(),
            target: Target::Block(Arc::new(block)),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn call(&self, record: &mut R) -> Result<()> {
        match &self.target {
            Target::Method(method) => method(record),
            Target::Block(block) => block(record),
        }
    }
}

impl<R> fmt::Debug for Callback<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.target {
            Target::Method(_) => "method",
            Target::Block(_) => "block",
        };
        f.debug_struct("Callback")
            .field("name", &self.name)
            .field("kind", &kind)
            .finish()
    }
}

/// Ordered hooks for each lifecycle event of one entity type.
pub struct Callbacks<R> {
    hooks: HashMap<Event, Vec<Callback<R>>>,
}

impl<R> Default for Callbacks<R> {
    fn default() -> Self {
        Callbacks {
            hooks: HashMap::new(),
        }
    }
}

impl<R> Callbacks<R> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, event: Event, callback: Callback<R>) {
        self.hooks.entry(event).or_default().push(callback);
    }

    /// Register an inline closure for `event`.
    pub fn on<F>(&mut self, event: Event, block: F)
    where
        F: Fn(&mut R) -> Result<()> + Send + Sync + 'static,
    {
        self.register(event, Callback::block(block));
    }

    pub fn registered(&self, event: Event) -> &[Callback<R>] {
        self.hooks.get(&event).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Run every hook for `event` in registration order. The first failing
    /// hook stops the rest; [`RecordError::abort`] errors are tagged with the
    /// event and the hook's name.
    pub fn run(&self, event: Event, record: &mut R) -> Result<()> {
        let hooks = self.registered(event);
        if hooks.is_empty() {
            return Ok(());
        }

        trace!(%event, count = hooks.len(), "running callbacks");
        for hook in hooks {
            hook.call(record).map_err(|err| match err {
                RecordError::Hook(message) => RecordError::Aborted {
                    event,
                    callback: hook.name().to_string(),
                    message,
                },
                other => other,
            })?;
        }
        Ok(())
    }
}

impl<R> fmt::Debug for Callbacks<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for event in Event::ALL {
            let hooks = self.registered(event);
            if !hooks.is_empty() {
                map.entry(&event.name(), &hooks);
            }
        }
        map.finish()
    }
}
