//! Collection - an ordered, read-only snapshot of records.

use serde_json::Value;

use crate::record::{values_equal, Attributes, Record};

macro_rules! positional_accessors {
    ($($method:ident => $index:expr),* $(,)?) => {
        $(
            pub fn $method(&self) -> Option<&R> {
                self.records.get($index)
            }
        )*
    };
}

/// Records copied out of a table at query time. Changes to the table after
/// the query are not reflected, and filtering never changes the receiver.
#[derive(Clone, Debug)]
pub struct Collection<R> {
    records: Vec<R>,
}

impl<R> Default for Collection<R> {
    fn default() -> Self {
        Collection {
            records: Vec::new(),
        }
    }
}

impl<R> Collection<R> {
    /// Wrap a snapshot of records.
    pub fn new(records: Vec<R>) -> Self {
        Self { records }
    }

    /// Number of records in the snapshot.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Same as [`len`](Self::len).
    pub fn count(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Record at `index`, if any.
    pub fn get(&self, index: usize) -> Option<&R> {
        self.records.get(index)
    }

    pub fn last(&self) -> Option<&R> {
        self.records.last()
    }

    /// Records in store order.
    pub fn iter(&self) -> std::slice::Iter<'_, R> {
        self.records.iter()
    }

    pub fn as_slice(&self) -> &[R] {
        &self.records
    }

    pub fn into_vec(self) -> Vec<R> {
        self.records
    }

    positional_accessors! {
        first => 0,
        second => 1,
        third => 2,
        fourth => 3,
        fifth => 4,
        sixth => 5,
        seventh => 6,
        eighth => 7,
        ninth => 8,
        tenth => 9,
    }
}

impl<R: Clone> Collection<R> {
    /// A new collection over the same snapshot.
    pub fn all(&self) -> Collection<R> {
        self.clone()
    }
}

impl<R: Record> Collection<R> {
    /// Records whose every `conditions` field equals the given value, numbers
    /// by value. A field a record does not hold compares as `null`; no
    /// conditions match everything.
    pub fn filter(&self, conditions: Attributes) -> Collection<R> {
        let mut narrowed: Vec<&R> = self.records.iter().collect();
        for (field, expected) in &conditions {
            narrowed.retain(|record| field_equals(*record, field, expected));
        }
        Collection::new(narrowed.into_iter().cloned().collect())
    }

    pub fn find_by(&self, conditions: Attributes) -> Option<R> {
        self.records
            .iter()
            .find(|record| {
                conditions
                    .iter()
                    .all(|(field, expected)| field_equals(*record, field, expected))
            })
            .cloned()
    }
}

fn field_equals<R: Record>(record: &R, field: &str, expected: &Value) -> bool {
    match record.read_attribute(field) {
        Some(actual) => values_equal(&actual, expected),
        None => expected.is_null(),
    }
}

impl<R> IntoIterator for Collection<R> {
    type Item = R;
    type IntoIter = std::vec::IntoIter<R>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

impl<'a, R> IntoIterator for &'a Collection<R> {
    type Item = &'a R;
    type IntoIter = std::slice::Iter<'a, R>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

impl<R> FromIterator<R> for Collection<R> {
    fn from_iter<I: IntoIterator<Item = R>>(iter: I) -> Self {
        Collection::new(iter.into_iter().collect())
    }
}

impl<R> From<Vec<R>> for Collection<R> {
    fn from(records: Vec<R>) -> Self {
        Collection::new(records)
    }
}
