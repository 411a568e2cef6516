//! Integration tests for persistence strategies and file-backed tables.


use models::{Book, Line};
use record_rust::{
    attrs, Attributes, Database, DatabaseConfig, ErrorKind, InMemoryStorage, Record, Storage,
    Strategy,
};
use tempfile::TempDir;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn file_db(dir: &TempDir, strategy: Strategy) -> Database {
    Database::new(
        DatabaseConfig::new()
            .with_root(dir.path())
            .with_default_strategy(strategy),
    )
}

fn sample_books(db: &Database) {
    let books = db.table::<Book>().unwrap();
    books
        .create(attrs! {
            "title" => "Dune",
            "pages" => 412,
            "tags" => ["sci-fi", "desert"],
            "subtitle" => ""
        })
        .unwrap();
    // a title that reads as a number must come back as a string
    books.create(attrs! { "title" => "1984", "pages" => 328 }).unwrap();
    books.create(attrs! { "title" => "Emma, Volume 1" }).unwrap();
}

fn rows(db: &Database) -> Vec<Attributes> {
    db.table::<Book>()
        .unwrap()
        .all()
        .unwrap()
        .iter()
        .map(Record::attributes)
        .collect()
}

fn round_trip(strategy: Strategy, file: &str) {
    init_tracing();
    let dir = TempDir::new().unwrap();

    let writer = file_db(&dir, strategy);
    sample_books(&writer);
    assert!(dir.path().join(file).exists(), "missing {}", file);

    let reader = file_db(&dir, strategy);
    let books = reader.table::<Book>().unwrap();
    assert!(books.load().unwrap());
    assert_eq!(books.count().unwrap(), 3);
    assert_eq!(rows(&reader), rows(&writer));
}

#[test]
fn yaml_round_trip() {
    round_trip(Strategy::Yaml, "book.yml");
}

#[test]
fn csv_round_trip() {
    round_trip(Strategy::Csv, "book.csv");
}

#[test]
fn json_round_trip() {
    round_trip(Strategy::Json, "book.json");
}

#[test]
fn yaml_is_the_default() {
    let dir = TempDir::new().unwrap();
    let db = Database::new(DatabaseConfig::new().with_root(dir.path()));

    let books = db.table::<Book>().unwrap();
    assert_eq!(books.persistence_strategy().unwrap(), Strategy::Yaml);
    assert_eq!(books.location().unwrap(), "book.yml");
}

#[test]
fn load_without_document_keeps_store() {
    let dir = TempDir::new().unwrap();
    let db = file_db(&dir, Strategy::Json);
    let books = db.table::<Book>().unwrap();

    assert!(!books.load().unwrap());
    assert_eq!(books.count().unwrap(), 0);
}

#[test]
fn load_replaces_store_contents() {
    let storage = InMemoryStorage::new();
    let db = Database::with_storage(
        DatabaseConfig::new().with_default_strategy(Strategy::Json),
        storage.clone(),
    );
    let books = db.table::<Book>().unwrap();
    books.create(attrs! { "title" => "Stale" }).unwrap();

    storage
        .write("book.json", br#"[{"title": "Dune"}, {"title": "Emma"}]"#)
        .unwrap();
    assert!(books.load().unwrap());

    let titles: Vec<_> = books
        .all()
        .unwrap()
        .iter()
        .filter_map(|book| book.title.clone())
        .collect();
    assert_eq!(titles, vec!["Dune", "Emma"]);
}

#[test]
fn load_drops_invalid_rows() {
    init_tracing();
    let storage = InMemoryStorage::new();
    storage
        .write(
            "book.json",
            br#"[{"title": "Dune"}, {"title": ""}, {"pages": 12}]"#,
        )
        .unwrap();
    let db = Database::with_storage(
        DatabaseConfig::new().with_default_strategy(Strategy::Json),
        storage.clone(),
    );
    let books = db.table::<Book>().unwrap();

    assert!(books.load().unwrap());
    assert_eq!(books.count().unwrap(), 1);

    // the document is rewritten without the dropped rows
    let document = storage.read("book.json").unwrap().unwrap();
    let stored: Vec<Attributes> = serde_json::from_slice(&document).unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0]["title"], "Dune");
}

#[test]
fn load_rejects_unknown_columns() {
    let storage = InMemoryStorage::new();
    storage
        .write("book.json", br#"[{"title": "Dune", "isbn": "x"}]"#)
        .unwrap();
    let db = Database::with_storage(
        DatabaseConfig::new().with_default_strategy(Strategy::Json),
        storage,
    );

    let err = db.table::<Book>().unwrap().load().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Attribute);
}

#[test]
fn malformed_document_is_a_persistence_error() {
    let storage = InMemoryStorage::new();
    storage.write("book.json", b"[{\"title\": ").unwrap();
    let db = Database::with_storage(
        DatabaseConfig::new().with_default_strategy(Strategy::Json),
        storage,
    );

    let err = db.table::<Book>().unwrap().load().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Persistence);
}

#[test]
fn psql_is_unavailable() {
    let db = Database::in_memory();
    let books = db.table::<Book>().unwrap();
    books.set_persistence_strategy(Strategy::Psql).unwrap();

    let err = books.create(attrs! { "title" => "Dune" }).unwrap_err();
    assert!(err.is_configuration());
    assert_eq!(err.to_string(), "psql currently unsupported");

    assert!(books.load().unwrap_err().is_configuration());
    assert!(books.persist().unwrap_err().is_configuration());
}

#[test]
fn unknown_strategy_name_is_a_configuration_error() {
    let err = "xml".parse::<Strategy>().unwrap_err();
    assert!(err.is_configuration());
}

#[test]
fn switching_strategy_writes_a_new_document() {
    let dir = TempDir::new().unwrap();
    let db = file_db(&dir, Strategy::Yaml);
    let books = db.table::<Book>().unwrap();
    books.create(attrs! { "title" => "Dune" }).unwrap();

    books.set_persistence_strategy(Strategy::Json).unwrap();
    books.persist().unwrap();

    assert!(dir.path().join("book.yml").exists());
    assert!(dir.path().join("book.json").exists());
}

#[test]
fn schema_strategy_wins_over_default() {
    let dir = TempDir::new().unwrap();
    let db = file_db(&dir, Strategy::Json);
    let lines = db.table::<Line>().unwrap();

    lines.create(attrs! { "amount" => -250 }).unwrap();
    assert_eq!(lines.location().unwrap(), "ledger_line.csv");

    let text = std::fs::read_to_string(dir.path().join("ledger_line.csv")).unwrap();
    let written: Vec<&str> = text.lines().collect();
    assert_eq!(written, vec!["amount", "-250"]);
}

#[test]
fn destroy_all_empties_the_document() {
    let dir = TempDir::new().unwrap();
    let db = file_db(&dir, Strategy::Json);
    sample_books(&db);

    db.table::<Book>().unwrap().destroy_all().unwrap();

    let reader = file_db(&dir, Strategy::Json);
    let books = reader.table::<Book>().unwrap();
    assert!(books.load().unwrap());
    assert_eq!(books.count().unwrap(), 0);
}
