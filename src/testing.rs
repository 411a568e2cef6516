//! Record types shared by unit tests.

use crate::{Attributes, Record, RecordMeta, Schema, Validates};

#[derive(Clone, Debug, Record)]
#[record(configure = Gadget::schema)]
pub struct Gadget {
    pub meta: RecordMeta,
    pub name: Option<String>,
    pub serial: Option<String>,
    pub weight: Option<u32>,
}

impl Gadget {
    fn schema(schema: &mut Schema<Self>) {
        schema
            .validates("name", Validates::new().presence())
            .validates("serial", Validates::new().uniqueness().format(r"^[A-Z]{2}-\d+$"));
    }

    pub fn named(name: &str, serial: &str) -> Self {
        Gadget {
            meta: RecordMeta::new(),
            name: Some(name.to_string()),
            serial: Some(serial.to_string()),
            weight: None,
        }
    }
}

/// Open attribute bag with no validations.
#[derive(Clone, Debug, Record)]
pub struct Note {
    #[record(meta)]
    pub state: RecordMeta,
    #[record(extra)]
    pub fields: Attributes,
}
