//! Validations - ordered rules evaluated against a record.

use std::fmt;
use std::sync::Arc;

use regex::Regex;
use serde_json::Value;

use crate::error::RecordError;
use crate::errors::Errors;
use crate::record::{is_blank, values_equal, Record};

/// Options accepted by [`Validations::validates`]. Each enabled option
/// becomes one rule, in the order presence, uniqueness, format.
#[derive(Clone, Debug, Default)]
pub struct Validates {
    pub presence: bool,
    pub uniqueness: bool,
    pub format: Option<FormatOptions>,
}

/// Options for a format rule. `with` is required.
#[derive(Clone, Debug, Default)]
pub struct FormatOptions {
    pub with: Option<String>,
}

impl Validates {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn presence(mut self) -> Self {
        self.presence = true;
        self
    }

    pub fn uniqueness(mut self) -> Self {
        self.uniqueness = true;
        self
    }

    pub fn format(mut self, pattern: impl Into<String>) -> Self {
        self.format = Some(FormatOptions {
            with: Some(pattern.into()),
        });
        self
    }
}

/// Custom rule body: inspect the record, record failures.
pub type Check<R> = Arc<dyn Fn(&R, &mut Errors) + Send + Sync>;

enum Custom<R> {
    Method(fn(&R, &mut Errors)),
    Block(Check<R>),
}

enum Rule<R> {
    Presence { field: String },
    Uniqueness { field: String },
    Format { field: String, pattern: Regex },
    Custom { name: String, check: Custom<R> },
}

impl<R> Rule<R> {
    fn name(&self) -> &str {
        match self {
            Rule::Presence { field } | Rule::Uniqueness { field } | Rule::Format { field, .. } => {
                field
            }
            Rule::Custom { name, .. } => name,
        }
    }
}

/// Ordered validation rules for one entity type.
pub struct Validations<R> {
    rules: Vec<Rule<R>>,
    problems: Vec<RecordError>,
}

impl<R> Default for Validations<R> {
    fn default() -> Self {
        Validations {
            rules: Vec::new(),
            problems: Vec::new(),
        }
    }
}

impl<R: Record> Validations<R> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Register a custom rule implemented as a method, e.g.
    /// `validate("adult", Person::must_be_adult)`.
    pub fn validate(&mut self, name: impl Into<String>, method: fn(&R, &mut Errors)) {
        self.rules.push(Rule::Custom {
            name: name.into(),
            check: Custom::Method(method),
        });
    }

    /// Register a custom rule implemented as a closure.
    pub fn validate_with<F>(&mut self, name: impl Into<String>, block: F)
    where
        F: Fn(&R, &mut Errors) + Send + Sync + 'static,
    {
        self.rules.push(Rule::Custom {
            name: name.into(),
            check: Custom::Block(Arc::new(block)),
        });
    }

    /// Register the built-in rules enabled in `options` for `field`.
    ///
    /// A format option without a pattern, or with a pattern that does not
    /// compile, is a configuration problem reported when the table is
    /// registered.
    pub fn validates(&mut self, field: impl Into<String>, options: Validates) {
        let field = field.into();

        if options.presence {
            self.validates_presence_of(field.clone());
        }
        if options.uniqueness {
            self.validates_uniqueness_of(field.clone());
        }
        if let Some(format) = options.format {
            match format.with {
                Some(pattern) => self.validates_format_of(field, &pattern),
                None => self.problems.push(RecordError::InvalidValidation {
                    entity: R::ENTITY,
                    field,
                    message: "provide a pattern with a format validation".to_string(),
                }),
            }
        }
    }

    pub fn validates_presence_of(&mut self, field: impl Into<String>) {
        self.rules.push(Rule::Presence {
            field: field.into(),
        });
    }

    pub fn validates_uniqueness_of(&mut self, field: impl Into<String>) {
        self.rules.push(Rule::Uniqueness {
            field: field.into(),
        });
    }

    pub fn validates_format_of(&mut self, field: impl Into<String>, pattern: &str) {
        let field = field.into();
        match Regex::new(pattern) {
            Ok(pattern) => self.rules.push(Rule::Format { field, pattern }),
            Err(err) => self.problems.push(RecordError::InvalidValidation {
                entity: R::ENTITY,
                field,
                message: err.to_string(),
            }),
        }
    }

    /// Whether evaluation needs the other records of the entity type.
    pub fn needs_peers(&self) -> bool {
        self.rules
            .iter()
            .any(|rule| matches!(rule, Rule::Uniqueness { .. }))
    }

    /// First configuration problem found while registering rules.
    pub(crate) fn take_problem(&mut self) -> Option<RecordError> {
        if self.problems.is_empty() {
            None
        } else {
            Some(self.problems.remove(0))
        }
    }

    /// Only the uniqueness rules, against `peers`. Calls no custom rules, so
    /// it may run while the store is locked.
    pub(crate) fn uniqueness_conflicts(&self, record: &R, peers: &[R]) -> Errors {
        let mut errors = Errors::new();
        for rule in &self.rules {
            if let Rule::Uniqueness { field } = rule {
                if is_taken(field, record, peers) {
                    errors.add(field.as_str(), not_unique(field));
                }
            }
        }
        errors
    }

    /// Run every rule against `record`. `peers` is the entity type's current
    /// store contents, consulted by uniqueness rules.
    pub fn evaluate(&self, record: &R, peers: &[R]) -> Errors {
        let mut errors = Errors::new();

        for rule in &self.rules {
            match rule {
                Rule::Presence { field } => {
                    if is_blank(record.read_attribute(field).as_ref()) {
                        errors.add(field.as_str(), format!("{} must be present", field));
                    }
                }
                Rule::Uniqueness { field } => {
                    if is_taken(field, record, peers) {
                        errors.add(field.as_str(), not_unique(field));
                    }
                }
                Rule::Format { field, pattern } => {
                    let matches = match record.read_attribute(field) {
                        Some(Value::String(text)) => pattern.is_match(&text),
                        _ => false,
                    };
                    if !matches {
                        errors.add(
                            field.as_str(),
                            format!("{} must match format {}", field, pattern.as_str()),
                        );
                    }
                }
                Rule::Custom { check, .. } => match check {
                    Custom::Method(method) => method(record, &mut errors),
                    Custom::Block(block) => block(record, &mut errors),
                },
            }
        }

        errors
    }
}

fn not_unique(field: &str) -> String {
    format!("{} is not unique", field)
}

/// Whether a record other than `record` holds an equal, non-null `field`.
fn is_taken<R: Record>(field: &str, record: &R, peers: &[R]) -> bool {
    let Some(value) = record.read_attribute(field) else {
        return false;
    };
    if value.is_null() {
        return false;
    }
    peers.iter().any(|peer| {
        peer.id() != record.id()
            && peer
                .read_attribute(field)
                .is_some_and(|theirs| values_equal(&theirs, &value))
    })
}

impl<R> fmt::Debug for Validations<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.rules.iter().map(Rule::name).collect();
        f.debug_struct("Validations")
            .field("rules", &names)
            .field("problems", &self.problems.len())
            .finish()
    }
}
