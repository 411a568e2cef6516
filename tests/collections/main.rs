//! Integration tests for queries and the collections they return.

use proptest::prelude::*;
use record_rust::{attrs, Collection, Database, Record, RecordMeta, Schema, Table, Value};

#[derive(Clone, Debug, Record)]
struct Dog {
    meta: RecordMeta,
    name: Option<String>,
    size: Option<String>,
    age: Option<u32>,
}

fn kennel(db: &Database) -> Table<Dog> {
    let dogs = db.table::<Dog>().unwrap();
    for n in 1..=20 {
        dogs.create(attrs! {
            "name" => format!("Bobby the {}", n),
            "size" => "Micro",
            "age" => n % 5
        })
        .unwrap();
    }
    dogs.create(attrs! { "name" => "Rex", "size" => "Giant", "age" => 3 })
        .unwrap();
    dogs
}

#[test]
fn filter_and_chain() {
    let db = Database::in_memory();
    let dogs = kennel(&db);

    let micro = dogs.filter(attrs! { "size" => "Micro" }).unwrap();
    assert_eq!(micro.count(), 20);

    let bobby = micro.filter(attrs! { "name" => "Bobby the 15" });
    assert_eq!(bobby.count(), 1);
    assert_eq!(micro.count(), 20);
}

#[test]
fn filter_on_several_fields() {
    let db = Database::in_memory();
    let dogs = kennel(&db);

    let three = dogs
        .filter(attrs! { "size" => "Micro", "age" => 3 })
        .unwrap();
    assert_eq!(three.count(), 4);
    assert!(three.iter().all(|dog| dog.age == Some(3)));
}

#[test]
fn empty_conditions_match_everything() {
    let db = Database::in_memory();
    let dogs = kennel(&db);

    assert_eq!(dogs.filter(attrs! {}).unwrap().count(), 21);
    assert_eq!(dogs.all().unwrap().all().count(), 21);
}

#[test]
fn missing_fields_compare_as_null() {
    let db = Database::in_memory();
    let dogs = kennel(&db);
    dogs.create(attrs! { "name" => "Mystery" }).unwrap();

    let unsized_dogs = dogs.filter(attrs! { "size" => Value::Null }).unwrap();
    assert_eq!(unsized_dogs.count(), 1);
    assert!(dogs.filter(attrs! { "colour" => "brown" }).unwrap().is_empty());
}

#[test]
fn find_by_returns_first_match() {
    let db = Database::in_memory();
    let dogs = kennel(&db);

    let first = dogs.find_by(attrs! { "size" => "Micro" }).unwrap().unwrap();
    assert_eq!(first.name.as_deref(), Some("Bobby the 1"));
    assert!(dogs.find_by(attrs! { "size" => "Tiny" }).unwrap().is_none());
}

#[test]
fn positional_accessors() {
    let db = Database::in_memory();
    let dogs = kennel(&db);
    let all = dogs.all().unwrap();

    let name = |dog: Option<&Dog>| dog.and_then(|dog| dog.name.clone());
    assert_eq!(name(all.first()), Some("Bobby the 1".to_string()));
    assert_eq!(name(all.second()), Some("Bobby the 2".to_string()));
    assert_eq!(name(all.fifth()), Some("Bobby the 5".to_string()));
    assert_eq!(name(all.tenth()), Some("Bobby the 10".to_string()));
    assert_eq!(name(all.last()), Some("Rex".to_string()));

    let empty: Collection<Dog> = Collection::default();
    assert!(empty.first().is_none());
    assert!(empty.tenth().is_none());
}

#[test]
fn collections_are_snapshots() {
    let db = Database::in_memory();
    let dogs = kennel(&db);
    let before = dogs.all().unwrap();

    dogs.create(attrs! { "name" => "Late", "size" => "Micro" })
        .unwrap();

    assert_eq!(before.count(), 21);
    assert_eq!(dogs.count().unwrap(), 22);
}

#[test]
fn found_records_keep_identity() {
    let db = Database::in_memory();
    let dogs = kennel(&db);

    let mut rex = dogs.find_by(attrs! { "name" => "Rex" }).unwrap().unwrap();
    assert!(dogs.persisted(&rex).unwrap());
    assert!(dogs.destroy(&mut rex).unwrap());
    assert_eq!(dogs.count().unwrap(), 20);
}

#[derive(Clone, Debug, Record)]
#[record(configure = Parcel::schema)]
struct Parcel {
    meta: RecordMeta,
    weight: Option<f64>,
}

impl Parcel {
    fn schema(schema: &mut Schema<Self>) {
        schema.validates_uniqueness_of("weight");
    }
}

#[test]
fn float_fields_match_whole_numbers() {
    let db = Database::in_memory();
    let parcels = db.table::<Parcel>().unwrap();

    let given = attrs! { "weight" => 2 };
    let parcel = parcels.create(given.clone()).unwrap();
    assert_eq!(parcel.attributes(), given);
    assert_eq!(parcel.weight, Some(2.0));

    assert_eq!(parcels.filter(attrs! { "weight" => 2 }).unwrap().count(), 1);
    assert_eq!(parcels.filter(attrs! { "weight" => 2.0 }).unwrap().count(), 1);
    assert!(parcels.find_by(attrs! { "weight" => 2.5 }).unwrap().is_none());

    let twin = parcels.create(attrs! { "weight" => 2.0 }).unwrap();
    assert!(!parcels.persisted(&twin).unwrap());
    assert_eq!(twin.errors().on("weight"), vec!["weight is not unique"]);
    assert_eq!(twin, parcel);

    let heavier = parcels.create(attrs! { "weight" => 2.5 }).unwrap();
    assert!(parcels.persisted(&heavier).unwrap());
}

fn dog(size: &str, age: u32) -> Dog {
    Dog::from_attributes(attrs! { "size" => size, "age" => age }).unwrap()
}

fn ids(collection: &Collection<Dog>) -> Vec<u64> {
    collection.iter().map(|dog| dog.id().get()).collect()
}

proptest! {
    #[test]
    fn chained_filters_commute(
        rows in prop::collection::vec((0usize..3, 0u32..4), 0..40),
        size in 0usize..3,
        age in 0u32..4,
    ) {
        let sizes = ["Micro", "Medium", "Giant"];
        let dogs: Collection<Dog> = rows
            .iter()
            .map(|(s, a)| dog(sizes[*s], *a))
            .collect();

        let by_size = attrs! { "size" => sizes[size] };
        let by_age = attrs! { "age" => age };

        let size_then_age = dogs.filter(by_size.clone()).filter(by_age.clone());
        let age_then_size = dogs.filter(by_age).filter(by_size);
        let both = dogs.filter(attrs! { "size" => sizes[size], "age" => age });

        prop_assert_eq!(ids(&size_then_age), ids(&age_then_size));
        prop_assert_eq!(ids(&size_then_age), ids(&both));
        prop_assert!(size_then_age.count() <= dogs.count());
    }
}
