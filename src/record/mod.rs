//! Records - typed structs that behave as active records.
//!
//! A record type declares its fields as an ordinary struct, embeds a
//! [`RecordMeta`] and derives [`Record`](crate::Record):
//!
//! ```ignore
//! use record_rust::{Record, RecordMeta, Schema, Validates};
//!
//! #[derive(Clone, Debug, Record)]
//! struct Person {
//!     meta: RecordMeta,
//!     name: Option<String>,
//!     email: Option<String>,
//! }
//! ```
//!
//! The derive implements attribute access for every named field. A field
//! marked `#[record(extra)]` of type [`Attributes`] turns the record into an
//! open attribute bag that accepts any other field name. Validations,
//! callbacks and associations are declared by overriding
//! [`Record::configure`]; with the derive this is done through
//! `#[record(configure = path::to::fn)]`.

mod attributes;
mod meta;

pub use attributes::{
    attributes_equal, from_attribute, is_blank, reject_unknown, take_attribute, to_attribute,
    values_equal, Attributes,
};
pub use meta::{RecordId, RecordMeta};

use serde_json::Value;

use crate::error::Result;
use crate::errors::Errors;
use crate::schema::Schema;

pub trait Record: Clone + Send + Sync + 'static {
    /// Entity type name, e.g. `"Person"`. Storage locations and association
    /// lookups are derived from it.
    const ENTITY: &'static str;

    fn meta(&self) -> &RecordMeta;

    fn meta_mut(&mut self) -> &mut RecordMeta;

    /// Every field currently held by the record.
    fn attributes(&self) -> Attributes;

    /// Value of one field, `None` if the record does not hold it.
    fn read_attribute(&self, attribute: &str) -> Option<Value>;

    /// Assign one field. Fails with an attribute error when the record has no
    /// such field or the value has the wrong shape.
    fn write_attribute(&mut self, attribute: &str, value: Value) -> Result<()>;

    /// Construct a new, unsaved record with a fresh identity.
    fn from_attributes(attrs: Attributes) -> Result<Self>;

    /// Whether records of this type can hold `attribute`.
    fn declares(attribute: &str) -> bool;

    /// Register validations, callbacks, associations and the default
    /// persistence strategy for this type.
    fn configure(_schema: &mut Schema<Self>) {}

    /// Value stored on the other side of an association to point at this
    /// record. Defaults to the full attribute map.
    fn reference(&self) -> Value {
        Value::Object(self.attributes())
    }

    fn id(&self) -> RecordId {
        self.meta().id()
    }

    /// Errors from the most recent validation pass.
    fn errors(&self) -> &Errors {
        self.meta().errors()
    }

    /// Copy with the same attributes and a new identity.
    fn duplicate(&self) -> Self {
        let mut copy = self.clone();
        copy.meta_mut().reassign();
        copy
    }

    fn assign_attributes(&mut self, attrs: &Attributes) -> Result<()> {
        for (attribute, value) in attrs {
            self.write_attribute(attribute, value.clone())?;
        }
        Ok(())
    }
}
