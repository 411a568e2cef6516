use thiserror::Error;

use crate::callbacks::Event;

/// Broad category of a [`RecordError`], for callers that branch on the
/// failure class rather than the exact variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Configuration,
    Persistence,
    Lookup,
    Attribute,
    Callback,
}

#[derive(Debug, Error)]
pub enum RecordError {
    #[error("unsupported persistence strategy: {0}")]
    UnsupportedStrategy(String),

    #[error("{0} currently unsupported")]
    BackendUnavailable(&'static str),

    #[error("invalid validation for {entity}.{field}: {message}")]
    InvalidValidation {
        entity: &'static str,
        field: String,
        message: String,
    },

    #[error("undefined attribute `{attribute}` for {entity}")]
    UnknownAttribute {
        entity: &'static str,
        attribute: String,
    },

    #[error("invalid value for {entity}.{attribute}: {message}")]
    InvalidAttribute {
        entity: &'static str,
        attribute: String,
        message: String,
    },

    #[error("no entity type named `{0}` is registered")]
    UnknownEntity(String),

    #[error("entity type `{name}` is registered with a different record type than {requested}")]
    EntityTypeMismatch {
        name: String,
        requested: &'static str,
    },

    #[error("{entity} has no association named `{name}`")]
    UnknownAssociation { entity: &'static str, name: String },

    #[error("{format} codec error: {message}")]
    Codec {
        format: &'static str,
        message: String,
    },

    #[error("storage error at {location}: {source}")]
    Io {
        location: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{event} callback `{callback}` aborted: {message}")]
    Aborted {
        event: Event,
        callback: String,
        message: String,
    },

    #[error("{0}")]
    Hook(String),

    #[error("record store lock poisoned during {0}")]
    LockPoisoned(&'static str),
}

impl RecordError {
    /// Error for a hook to return when it wants to stop the surrounding
    /// lifecycle operation. The dispatcher tags it with the event and callback
    /// name before it reaches the caller.
    pub fn abort(message: impl Into<String>) -> Self {
        RecordError::Hook(message.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            RecordError::UnsupportedStrategy(_)
            | RecordError::BackendUnavailable(_)
            | RecordError::InvalidValidation { .. } => ErrorKind::Configuration,
            RecordError::Codec { .. } | RecordError::Io { .. } | RecordError::LockPoisoned(_) => {
                ErrorKind::Persistence
            }
            RecordError::UnknownEntity(_)
            | RecordError::EntityTypeMismatch { .. }
            | RecordError::UnknownAssociation { .. } => ErrorKind::Lookup,
            RecordError::UnknownAttribute { .. } | RecordError::InvalidAttribute { .. } => {
                ErrorKind::Attribute
            }
            RecordError::Aborted { .. } | RecordError::Hook(_) => ErrorKind::Callback,
        }
    }

    pub fn is_configuration(&self) -> bool {
        self.kind() == ErrorKind::Configuration
    }
}

pub type Result<T> = std::result::Result<T, RecordError>;
