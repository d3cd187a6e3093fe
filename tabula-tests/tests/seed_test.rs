//! Seed preprocessing against the dvdrental fixture

use std::path::PathBuf;

use serde_json::json;
use tabula_codegen::schema::{parse_schema_json, Schema};
use tabula_codegen::seed::{preprocess, RawSeedInput, Reference, SeedValue};
use tabula_codegen::CodegenError;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("fixtures")
        .join(name)
}

fn schemas() -> Vec<Schema> {
    let json = std::fs::read_to_string(fixture("dvdrental.json")).unwrap();
    parse_schema_json(&json).unwrap()
}

fn seed_input() -> RawSeedInput {
    let json = std::fs::read_to_string(fixture("seed.json")).unwrap();
    serde_json::from_str(&json).unwrap()
}

#[test]
fn test_tables_follow_foreign_keys() {
    let seed = preprocess(&seed_input(), &schemas()).unwrap();

    assert_eq!(
        seed.table_names(),
        vec!["actor", "language", "film", "film_actor"]
    );
}

#[test]
fn test_references_resolved() {
    let seed = preprocess(&seed_input(), &schemas()).unwrap();

    let film = seed.table("film").unwrap();
    assert_eq!(film.index_column.as_deref(), Some("slug"));
    let row = &film.rows[0];
    assert_eq!(row.key.as_deref(), Some("academy-dinosaur"));
    assert!(!row.values.contains_key("slug"));
    assert_eq!(
        row.values["language_id"],
        SeedValue::Reference(Reference {
            schema: "public".into(),
            table: "language".into(),
            key: "en".into(),
            column: "language_id".into(),
        })
    );
    assert_eq!(row.values["title"], SeedValue::Literal(json!("Academy Dinosaur")));

    let film_actor = seed.table("film_actor").unwrap();
    assert_eq!(film_actor.index_column, None);
    assert_eq!(film_actor.rows.len(), 2);
    assert_eq!(film_actor.rows[1].key, None);
    assert_eq!(
        film_actor.rows[1].values["actor_id"],
        SeedValue::Reference(Reference {
            schema: "public".into(),
            table: "actor".into(),
            key: "nick".into(),
            column: "actor_id".into(),
        })
    );
}

#[test]
fn test_serialized_output() {
    let seed = preprocess(&seed_input(), &schemas()).unwrap();
    let value = serde_json::to_value(&seed).unwrap();

    let language = &value["tables"][1];
    assert_eq!(language["schema"], "public");
    assert_eq!(language["name"], "language");
    assert_eq!(language["rows"][0]["key"], "en");
    assert_eq!(language["rows"][0]["values"]["name"], json!({ "literal": "English" }));

    let film_actor = &value["tables"][3];
    assert_eq!(
        film_actor["rows"][0]["values"]["film_id"],
        json!({
            "reference": {
                "schema": "public",
                "table": "film",
                "key": "academy-dinosaur",
                "column": "film_id"
            }
        })
    );
}

#[test]
fn test_missing_referenced_table() {
    let mut raw = seed_input();
    raw.tables.retain(|table| table.name != "language");

    let err = preprocess(&raw, &schemas()).unwrap_err();
    assert!(matches!(err, CodegenError::TableNotFound(table) if table == "public.language"));
}

#[test]
fn test_unknown_reference_key() {
    let raw: RawSeedInput = serde_json::from_value(json!({
        "tables": [
            {
                "name": "actor",
                "tags": { "slug": "index" },
                "rows": [{ "slug": "penelope", "first_name": "Penelope", "last_name": "Guiness" }]
            },
            {
                "name": "actor_change",
                "tags": { "actor_id": "reference" },
                "rows": [{ "id": "9b2c", "actor_id": "grace" }]
            }
        ]
    }))
    .unwrap();

    let err = preprocess(&raw, &schemas()).unwrap_err();
    assert!(matches!(
        err,
        CodegenError::RowNotFound { table, key } if table == "public.actor" && key == "grace"
    ));
}

#[test]
fn test_cross_schema_reference() {
    let raw: RawSeedInput = serde_json::from_value(json!({
        "tables": [
            {
                "name": "audit.actor_change",
                "tags": { "actor_id": "reference" },
                "rows": [{ "id": "9b2c", "actor_id": "penelope" }]
            },
            {
                "name": "actor",
                "tags": { "slug": "index" },
                "rows": [{ "slug": "penelope", "first_name": "Penelope", "last_name": "Guiness" }]
            }
        ]
    }))
    .unwrap();

    let seed = preprocess(&raw, &schemas()).unwrap();
    assert_eq!(seed.table_names(), vec!["actor", "actor_change"]);

    let change = seed.table("audit.actor_change").unwrap();
    assert_eq!(change.schema, "audit");
    assert_eq!(
        change.rows[0].values["actor_id"],
        SeedValue::Reference(Reference {
            schema: "public".into(),
            table: "actor".into(),
            key: "penelope".into(),
            column: "actor_id".into(),
        })
    );
}
