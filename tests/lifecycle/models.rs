use record_rust::{
    Attributes, Callback, Event, Record, RecordError, RecordMeta, Result, Schema, Validates,
};

#[derive(Clone, Debug, Record)]
#[record(configure = Person::schema)]
pub struct Person {
    pub meta: RecordMeta,
    pub name: Option<String>,
    pub email: Option<String>,
    pub age: Option<u32>,
}

impl Person {
    fn schema(schema: &mut Schema<Self>) {
        schema
            .validates("name", Validates::new().presence())
            .validates("email", Validates::new().uniqueness())
            .method(Event::BeforeSave, "normalize_email", Person::normalize_email);
    }

    fn normalize_email(&mut self) -> Result<()> {
        if let Some(email) = self.email.as_mut() {
            *email = email.trim().to_lowercase();
        }
        Ok(())
    }
}

/// Records every lifecycle event it passes through in `trail`.
#[derive(Clone, Debug, Record)]
#[record(configure = Journal::schema)]
pub struct Journal {
    pub meta: RecordMeta,
    pub title: Option<String>,
    #[record(skip)]
    pub trail: Vec<String>,
}

impl Journal {
    fn schema(schema: &mut Schema<Self>) {
        schema.validates_presence_of("title");
        for event in Event::ALL {
            schema.callback(
                event,
                Callback::block(move |journal: &mut Journal| {
                    journal.trail.push(event.name().to_string());
                    Ok(())
                }),
            );
        }
        schema.before_destroy(|journal| {
            if journal.title.as_deref() == Some("locked") {
                return Err(RecordError::abort("journal is locked"));
            }
            Ok(())
        });
    }

    pub fn clear_trail(&mut self) {
        self.trail.clear();
    }
}

/// A record with no declared fields: it holds whatever it is given.
#[derive(Clone, Debug, Record)]
pub struct Entry {
    pub meta: RecordMeta,
    #[record(extra)]
    pub fields: Attributes,
}
