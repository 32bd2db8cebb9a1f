//! End-to-end scenarios from the filter language's public contract: the
//! six worked examples (AND/OR groups, negation-includes-null, compound
//! inequality, wildcard negation, input sanitisation) plus the datetime
//! back-compat rewrites, expressed against [`Engine::create_query`] and
//! [`Engine::evaluate`] rather than a live database.

use oxide_did_filter::{Engine, FilterError, FilterOptions, SimpleEntity};

fn dids_entity() -> SimpleEntity {
    SimpleEntity::new("dids")
        .with_column("name", "name")
        .with_column("scope", "scope")
        .with_column("did_type", "did_type")
        .with_column("created_at", "created_at")
        .with_column("updated_at", "updated_at")
        .with_column("length", "length")
        .with_kv_table("did_meta_kv")
}

/// S1: AND of two equalities compiles to a single conjoined AND-group.
#[test]
fn s1_and_of_two_equalities() {
    let engine = Engine::new("run_number = 1, project = test", FilterOptions::default()).unwrap();
    let query = engine.create_query(&dids_entity(), &[], None).unwrap();
    assert_eq!(query.sql.matches(" OR ").count(), 0);
    assert!(query.sql.contains("did_meta_kv.key = ?"));
}

/// S2: OR of two equalities compiles to two disjoined AND-groups.
#[test]
fn s2_or_of_two_equalities() {
    let engine = Engine::new("run_number = 1; project = test", FilterOptions::default()).unwrap();
    let query = engine.create_query(&dids_entity(), &[], None).unwrap();
    assert_eq!(query.sql.matches(") OR (").count(), 1);
}

/// S3: `!=` on a non-reserved key widens to the key/value fallback's
/// `NOT EXISTS`, which already includes DIDs with no row for that key —
/// the same "NULL counted in not-equals" semantics expressed without a
/// nullable column.
#[test]
fn s3_not_equal_includes_null_equivalent() {
    let engine = Engine::new("run_number != 1", FilterOptions::default()).unwrap();
    let query = engine.create_query(&dids_entity(), &[], None).unwrap();
    assert!(query.sql.contains("NOT EXISTS"));
}

/// S3-column: `!=` on a reserved (nullable) column widens with `OR IS NULL`.
#[test]
fn s3_not_equal_on_reserved_column_widens_with_is_null() {
    let engine = Engine::new("length != 1", FilterOptions::default()).unwrap();
    let query = engine.create_query(&dids_entity(), &[], None).unwrap();
    assert!(query.sql.contains("(length != ?) OR (length IS NULL)"));
}

/// S4: compound inequality on a reserved key expands to two bound triples
/// in the same AND-group.
#[test]
fn s4_compound_inequality() {
    let engine = Engine::new("0 < length < 2", FilterOptions::default()).unwrap();
    assert_eq!(engine.filters().groups().len(), 1);
    assert_eq!(engine.filters().groups()[0].conditions().len(), 2);

    let engine2 = Engine::new("0 <= length < 1", FilterOptions::default()).unwrap();
    let query = engine2.create_query(&dids_entity(), &[], None).unwrap();
    assert!(query.sql.contains("length >= ?"));
    assert!(query.sql.contains("length < ?"));
}

/// S5: wildcard `!=` on a nullable reserved string column compiles to a
/// NOT-LIKE-or-NULL predicate. `name`/`scope` are the identity columns and
/// never NULL, so `did_type` is the column that actually exercises this.
#[test]
fn s5_wildcard_not_equal() {
    let engine = Engine::new("did_type != *anothertest*", FilterOptions::default()).unwrap();
    let query = engine.create_query(&dids_entity(), &[], None).unwrap();
    assert!(query.sql.contains("(did_type NOT LIKE ?) OR (did_type IS NULL)"));
    assert!(query.params.iter().any(|p| matches!(
        p,
        oxide_sql_core::builder::value::SqlValue::Text(text) if text == "%anothertest%"
    )));
}

/// S6: input sanitisation — whitespace around identifiers/operators/values
/// is stripped, and a reserved-looking custom keyword with one operator
/// stays a condition while a compound expands in place.
#[test]
fn s6_input_sanitisation_parses_expected_dnf() {
    let engine = Engine::new(
        "  TestKeyword1  =  True  ,  TestKeyword2   =   0; 1 < TestKeyword4 <= 2",
        FilterOptions::default().strict_coerce(false),
    )
    .unwrap();
    let groups = engine.filters().groups();
    assert_eq!(groups.len(), 2);

    let first = groups[0].conditions();
    assert_eq!(first.len(), 2);
    assert_eq!(first[0].key.as_deref(), Some("TestKeyword1"));
    assert_eq!(first[0].value, oxide_did_filter::TypedValue::Bool(true));
    assert_eq!(first[1].key.as_deref(), Some("TestKeyword2"));
    assert_eq!(first[1].value, oxide_did_filter::TypedValue::Int(0));

    let second = groups[1].conditions();
    assert_eq!(second.len(), 2);
    assert_eq!(second[0].key.as_deref(), Some("TestKeyword4"));
    assert_eq!(second[0].op, oxide_did_filter::Operator::Gt);
    assert_eq!(second[1].key.as_deref(), Some("TestKeyword4"));
    assert_eq!(second[1].op, oxide_did_filter::Operator::Le);
}

#[test]
fn s6_reserved_key_type_errors_surface_as_invalid_value() {
    let err = Engine::new("did_type >= 1", FilterOptions::default().strict_coerce(false)).unwrap_err();
    assert!(matches!(err, FilterError::InvalidValue { .. }));

    let err = Engine::new("name >= 1", FilterOptions::default().strict_coerce(false)).unwrap_err();
    assert!(matches!(err, FilterError::InvalidValue { .. }));

    let err = Engine::new("length >= test", FilterOptions::default().strict_coerce(false)).unwrap_err();
    assert!(matches!(err, FilterError::InvalidValue { .. }));

    let err = Engine::new("name >= *", FilterOptions::default().strict_coerce(false)).unwrap_err();
    assert!(matches!(err, FilterError::InvalidValue { .. }));
}

#[test]
fn legacy_created_after_all_four_datetime_formats() {
    for raw in [
        "1900-01-01 00:00:00",
        "1900-01-01T00:00:00",
        "1900-01-01 00:00:00.000Z",
        "1900-01-01T00:00:00.000Z",
    ] {
        let engine = Engine::new(&format!("created_after={raw}"), FilterOptions::default()).unwrap();
        let cond = &engine.filters().groups()[0].conditions()[0];
        assert_eq!(cond.key.as_deref(), Some("created_at"));
        assert_eq!(cond.op, oxide_did_filter::Operator::Ge);
    }
}

#[test]
fn legacy_created_before_all_four_datetime_formats() {
    for raw in [
        "1900-01-01 00:00:00",
        "1900-01-01T00:00:00",
        "1900-01-01 00:00:00.000Z",
        "1900-01-01T00:00:00.000Z",
    ] {
        let engine = Engine::new(&format!("created_before={raw}"), FilterOptions::default()).unwrap();
        let cond = &engine.filters().groups()[0].conditions()[0];
        assert_eq!(cond.key.as_deref(), Some("created_at"));
        assert_eq!(cond.op, oxide_did_filter::Operator::Le);
    }
}

#[test]
fn length_supports_all_six_operators() {
    use oxide_did_filter::Operator::{Eq, Ge, Gt, Le, Lt, Ne};
    let cases = [
        ("length > 0", Gt),
        ("length < 0", Lt),
        ("length >= 0", Ge),
        ("length <= 0", Le),
        ("length == 0", Eq),
        ("length != 0", Ne),
    ];
    for (src, expected_op) in cases {
        let engine = Engine::new(src, FilterOptions::default()).unwrap();
        let cond = &engine.filters().groups()[0].conditions()[0];
        assert_eq!(cond.key.as_deref(), Some("length"));
        assert_eq!(cond.op, expected_op);
    }
}

#[test]
fn six_way_typecast_table() {
    use oxide_did_filter::TypedValue;

    let cases: &[(&str, fn(&TypedValue) -> bool)] = &[
        ("testkeyint1 = 0", |v| matches!(v, TypedValue::Int(0))),
        ("testkeyfloat1 = 0.5", |v| matches!(v, TypedValue::Float(f) if (*f - 0.5).abs() < f64::EPSILON)),
        ("testkeystr1 = test", |v| matches!(v, TypedValue::Str { value, .. } if value == "test")),
        ("testbool1 = false", |v| matches!(v, TypedValue::Bool(false))),
        ("testbool2 = False", |v| matches!(v, TypedValue::Bool(false))),
        ("testbool3 = FALSE", |v| matches!(v, TypedValue::Bool(false))),
        ("testbool4 = true", |v| matches!(v, TypedValue::Bool(true))),
        ("testbool5 = True", |v| matches!(v, TypedValue::Bool(true))),
        ("testbool6 = TRUE", |v| matches!(v, TypedValue::Bool(true))),
    ];
    for (src, check) in cases {
        let engine = Engine::new(src, FilterOptions::default().strict_coerce(false)).unwrap();
        let cond = &engine.filters().groups()[0].conditions()[0];
        assert!(check(&cond.value), "unexpected typed value for {src:?}: {:?}", cond.value);
    }

    for raw in [
        "1900-01-01 00:00:00",
        "1900-01-01 00:00:00.000Z",
        "1900-01-01T00:00:00",
        "1900-01-01T00:00:00.000Z",
    ] {
        let engine = Engine::new(
            &format!("testkeydate1 = {raw}"),
            FilterOptions::default().strict_coerce(false),
        )
        .unwrap();
        let cond = &engine.filters().groups()[0].conditions()[0];
        assert!(matches!(cond.value, TypedValue::DateTime(_)));
    }
}

#[test]
fn negation_includes_null_json_backed_key() {
    let engine = Engine::new("project != test", FilterOptions::default()).unwrap();
    let query = engine.create_query(&dids_entity(), &[], Some("meta")).unwrap();
    assert!(query.sql.contains(
        "(json_extract(meta, '$.project') != ?) OR (json_extract(meta, '$.project') IS NULL)"
    ));
}

#[test]
fn wildcard_translation_examples() {
    let engine = Engine::new("key = *foo*", FilterOptions::default()).unwrap();
    let query = engine.create_query(&dids_entity(), &[], Some("meta")).unwrap();
    assert!(query.sql.contains("json_extract(meta, '$.key') LIKE ?"));
    assert!(query.params.iter().any(|p| matches!(
        p,
        oxide_sql_core::builder::value::SqlValue::Text(text) if text == "%foo%"
    )));

    let engine2 = Engine::new("key = foo*", FilterOptions::default()).unwrap();
    let query2 = engine2.create_query(&dids_entity(), &[], Some("meta")).unwrap();
    assert!(query2.params.iter().any(|p| matches!(
        p,
        oxide_sql_core::builder::value::SqlValue::Text(text) if text == "foo%"
    )));
}

#[test]
fn dedup_select_is_distinct_on_scope_and_name() {
    let engine = Engine::new("length=1;length=2", FilterOptions::default()).unwrap();
    let query = engine.create_query(&dids_entity(), &[], None).unwrap();
    assert!(query.sql.starts_with("SELECT DISTINCT scope, name FROM dids"));
}
