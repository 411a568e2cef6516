//! Active-record style models for plain Rust structs.
//!
//! A record type derives [`Record`], declares its validations, callbacks and
//! associations in a [`Schema`], and is stored in a [`Table`] obtained from a
//! [`Database`]. Tables keep their records in memory and rewrite a YAML, CSV
//! or JSON document on every change.
//!
//! ```ignore
//! use record_rust::{attrs, Database, Record, RecordMeta, Schema, Validates};
//!
//! #[derive(Clone, Debug, Record)]
//! #[record(configure = Person::schema)]
//! struct Person {
//!     meta: RecordMeta,
//!     name: Option<String>,
//!     email: Option<String>,
//! }
//!
//! impl Person {
//!     fn schema(schema: &mut Schema<Self>) {
//!         schema
//!             .validates("name", Validates::new().presence())
//!             .validates("email", Validates::new().uniqueness());
//!     }
//! }
//!
//! let db = Database::in_memory();
//! let people = db.table::<Person>()?;
//! let ellie = people.create(attrs! { "name" => "Ellie", "email" => "ellie@example.com" })?;
//! assert!(people.persisted(&ellie)?);
//! ```

extern crate self as record_rust;

mod association;
mod callbacks;
mod collection;
mod config;
mod database;
mod error;
mod errors;
mod record;
mod schema;
mod table;
mod validation;

pub mod naming;
pub mod persistence;

pub use association::{Association, AssociationKind};
pub use callbacks::{Callback, Callbacks, Event, Hook};
pub use collection::Collection;
pub use config::{DatabaseConfig, ROOT_VAR, STRATEGY_VAR};
pub use database::Database;
pub use error::{ErrorKind, RecordError, Result};
pub use errors::{Errors, FieldError};
pub use persistence::{Codec, FileStorage, InMemoryStorage, Storage, Strategy};
pub use record::{
    attributes_equal, from_attribute, is_blank, reject_unknown, take_attribute, to_attribute,
    values_equal, Attributes, Record, RecordId, RecordMeta,
};
pub use schema::Schema;
pub use table::Table;
pub use validation::{Check, FormatOptions, Validates, Validations};

pub use record_rust_macros::Record;
pub use serde_json::Value;

#[doc(hidden)]
pub mod __private {
    pub use serde_json;
}

/// Build an [`Attributes`] map: `attrs! { "name" => "Ellie", "age" => 4 }`.
/// Values are any serializable expression.
#[macro_export]
macro_rules! attrs {
    () => {
        $crate::Attributes::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut attrs = $crate::Attributes::new();
        $(
            attrs.insert(
                ::std::string::String::from($key),
                $crate::__private::serde_json::json!($value),
            );
        )+
        attrs
    }};
}

#[cfg(test)]
pub(crate) mod testing;
