//! Compiled-SQL-shape assertions standing in for the original system's
//! live-database `TestFilterEngineReal` suite: this crate has no database
//! driver of its own, so these check the generated `BackendQuery` text and
//! bound parameters instead of row counts against a live table.

use oxide_did_filter::{Engine, FilterOptions, SimpleEntity};
use oxide_sql_core::builder::value::SqlValue;

fn dids_entity() -> SimpleEntity {
    SimpleEntity::new("dids")
        .with_column("name", "name")
        .with_column("scope", "scope")
        .with_column("did_type", "did_type")
        .with_column("created_at", "created_at")
        .with_column("updated_at", "updated_at")
        .with_column("length", "length")
}

#[test]
fn run_number_equal_and_not_equal_over_kv_fallback() {
    let entity = dids_entity().with_kv_table("did_meta_kv");

    let eq = Engine::new("run_number = 1", FilterOptions::default()).unwrap();
    let query = eq.create_query(&entity, &["did_type"], None).unwrap();
    assert!(query.sql.contains("did_meta_kv.value = ?"));
    assert!(query.sql.starts_with("SELECT DISTINCT scope, name, did_type FROM dids"));
    assert_eq!(
        query.params,
        vec![SqlValue::Text("run_number".to_string()), SqlValue::Int(1)]
    );

    let ne = Engine::new("run_number != 1", FilterOptions::default()).unwrap();
    let query = ne.create_query(&entity, &[], None).unwrap();
    assert!(query.sql.contains("NOT EXISTS (SELECT 1 FROM did_meta_kv"));
}

#[test]
fn or_of_run_number_and_project_across_kv_fallback() {
    let entity = dids_entity().with_kv_table("did_meta_kv");
    let engine = Engine::new("run_number = 1; project = test", FilterOptions::default()).unwrap();
    let query = engine.create_query(&entity, &[], None).unwrap();
    assert_eq!(query.sql.matches(") OR (").count(), 1);
    assert_eq!(query.params.len(), 4);
}

#[test]
fn json_backed_testkeyint1_equality_and_inequality() {
    let entity = dids_entity();
    let options = FilterOptions::default().strict_coerce(false);

    let eq = Engine::new("testkeyint1 = 1; testkeystr1 = test", options.clone()).unwrap();
    let query = eq.create_query(&entity, &[], Some("meta")).unwrap();
    assert!(query.sql.contains("json_extract(meta, '$.testkeyint1') = ?"));
    assert!(query.sql.contains("json_extract(meta, '$.testkeystr1') = ?"));

    let ne = Engine::new("testkeyint1 = 1; testkeystr1 != test", options).unwrap();
    let query = ne.create_query(&entity, &[], Some("meta")).unwrap();
    assert!(query.sql.contains(
        "(json_extract(meta, '$.testkeystr1') != ?) OR (json_extract(meta, '$.testkeystr1') IS NULL)"
    ));
}

#[test]
fn json_backed_testkeyint1_compound_range_casts_both_sides() {
    let entity = dids_entity();
    let engine = Engine::new(
        "0 < testkeyint1 < 2",
        FilterOptions::default().strict_coerce(false),
    )
    .unwrap();
    let query = engine.create_query(&entity, &[], Some("meta")).unwrap();
    assert!(query.sql.contains("CAST(json_extract(meta, '$.testkeyint1') AS INTEGER) > ?"));
    assert!(query.sql.contains("CAST(json_extract(meta, '$.testkeyint1') AS INTEGER) < ?"));
}

#[test]
fn and_or_groups_mixing_reserved_and_json_keys() {
    let entity = dids_entity();
    let options = FilterOptions::default().strict_coerce(false);

    let engine = Engine::new(
        "testkeyint1 = 1, testkeystr1 != test; testkeystr1 = test",
        options,
    )
    .unwrap();
    let query = engine.create_query(&entity, &[], Some("meta")).unwrap();
    assert_eq!(query.sql.matches(") OR (").count(), 1);
    assert!(query.sql.contains("json_extract(meta, '$.testkeyint1') = ?"));
}

#[test]
fn length_range_query_mirrors_backward_compatibility_suite() {
    let entity = dids_entity();
    for (src, expected_fragment) in [
        ("length >= 10", "length >= ?"),
        ("length > 9", "length > ?"),
        ("length <= 10", "length <= ?"),
        ("length < 11", "length < ?"),
    ] {
        let engine = Engine::new(src, FilterOptions::default()).unwrap();
        let query = engine.create_query(&entity, &[], None).unwrap();
        assert!(query.sql.contains(expected_fragment), "{src} -> {}", query.sql);
    }
}

#[test]
fn wildcard_prefix_suffix_and_contains_over_reserved_and_json_keys() {
    let entity = dids_entity();

    let prefix = Engine::new("did_type = test*", FilterOptions::default()).unwrap();
    let query = prefix.create_query(&entity, &[], None).unwrap();
    assert!(query.params.contains(&SqlValue::Text("test%".to_string())));

    let contains = Engine::new(
        "testkeystr1 = *test*",
        FilterOptions::default().strict_coerce(false),
    )
    .unwrap();
    let query = contains.create_query(&entity, &[], Some("meta")).unwrap();
    assert!(query.params.contains(&SqlValue::Text("%test%".to_string())));
}

#[test]
fn additional_return_attributes_project_after_scope_and_name() {
    let entity = dids_entity().with_kv_table("did_meta_kv");
    let engine = Engine::new("run_number = 1", FilterOptions::default()).unwrap();
    let query = engine.create_query(&entity, &["did_type", "length"], None).unwrap();
    assert!(query
        .sql
        .starts_with("SELECT DISTINCT scope, name, did_type, length FROM dids"));
}
