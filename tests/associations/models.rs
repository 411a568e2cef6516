use record_rust::{Record, RecordMeta, Schema, Value};

#[derive(Clone, Debug, Record)]
#[record(configure = Person::schema)]
pub struct Person {
    pub meta: RecordMeta,
    pub name: Option<String>,
}

impl Person {
    fn schema(schema: &mut Schema<Self>) {
        schema
            .has_many("pets")
            .has_many("toys")
            .has_many("robots")
            .belongs_to("passport");
    }
}

/// Points at its owner through `person`.
#[derive(Clone, Debug, Record)]
pub struct Pet {
    pub meta: RecordMeta,
    pub name: Option<String>,
    pub person: Option<Value>,
}

/// Never registered with the database.
#[derive(Clone, Debug, Record)]
pub struct Toy {
    pub meta: RecordMeta,
    pub person: Option<Value>,
}

/// Has no field pointing back at a person.
#[derive(Clone, Debug, Record)]
pub struct Robot {
    pub meta: RecordMeta,
    pub serial: Option<String>,
}

#[derive(Clone, Debug, Record)]
pub struct Passport {
    pub meta: RecordMeta,
    pub number: Option<String>,
    pub person: Option<Value>,
}
