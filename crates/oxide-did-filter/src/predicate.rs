//! The compiled predicate tree and its lowering to `(String, Vec<SqlValue>)`.
//!
//! Shaped after `oxide_orm::query::filter::FilterExpr` — the same small set
//! of variants (comparison, LIKE, AND, a raw escape hatch) recursively
//! lowered with the caller accumulating parameters alongside the SQL text —
//! generalised here for the filter engine's NULL-widening and JSON-path
//! rules, which the ORM's generic `Q` has no notion of.

use oxide_sql_core::builder::value::SqlValue;

use crate::ast::{Operator, TypedValue};

fn operator_sql(op: Operator) -> &'static str {
    match op {
        Operator::Eq => "=",
        Operator::Ne => "!=",
        Operator::Lt => "<",
        Operator::Le => "<=",
        Operator::Gt => ">",
        Operator::Ge => ">=",
    }
}

/// Converts a coerced filter value to a bound SQL parameter.
///
/// `Bool` binds as `0`/`1`: the columns and JSON paths this engine targets
/// have no native boolean type guarantee across backends, so booleans ride
/// along as integers once they leave the introspection surface (mirrors
/// `TypedValue::as_numeric`).
#[must_use]
pub fn to_sql_value(value: &TypedValue) -> SqlValue {
    match value {
        TypedValue::Int(i) => SqlValue::Int(*i),
        TypedValue::Float(f) => SqlValue::Float(*f),
        TypedValue::Bool(b) => SqlValue::Int(i64::from(*b)),
        TypedValue::DateTime(dt) => SqlValue::Text(dt.format("%Y-%m-%d %H:%M:%S%.3f").to_string()),
        TypedValue::Str { value, .. } => SqlValue::Text(value.clone()),
    }
}

/// Turns a wildcard value's raw text into a `LIKE` pattern: `*` becomes `%`.
/// No escaping is invented for literal `%`/`_` — the source grammar has no
/// escape syntax for `*` either, so a stored `%` collides with the wildcard
/// the same way the original does.
#[must_use]
pub fn wildcard_to_like_pattern(raw: &str) -> String {
    raw.replace('*', "%")
}

/// A leaf or combinator in the compiled predicate tree.
#[derive(Debug, Clone)]
pub enum Predicate {
    /// `column OP ?`.
    Compare {
        column: String,
        op: Operator,
        value: SqlValue,
    },
    /// `(column != ?) OR (column IS NULL)` — the negation-includes-null
    /// widening for a plain (non-wildcard) `!=`.
    NeOrNull { column: String, value: SqlValue },
    /// `column LIKE ?`.
    Like { column: String, pattern: String },
    /// `(column NOT LIKE ?) OR (column IS NULL)`.
    NotLikeOrNull { column: String, pattern: String },
    /// `json_extract(blob, '$.key') OP ?`, used for non-equality compares
    /// against a JSON attribute (ordering and plain equality).
    JsonCompare {
        path: String,
        op: Operator,
        value: SqlValue,
    },
    /// `(json_extract(blob, '$.key') != ?) OR (json_extract(...) IS NULL)`.
    JsonNeOrNull { path: String, value: SqlValue },
    /// `json_extract(blob, '$.key') LIKE ?`.
    JsonLike { path: String, pattern: String },
    /// A correlated `EXISTS` subquery against the key/value fallback table,
    /// or any other construct that does not fit the typed variants above.
    Raw { sql: String, params: Vec<SqlValue> },
    /// Conjunction of an AND-group's compiled conditions. An empty `And`
    /// compiles to the SQL literal `1=1` (vacuous truth, matching the
    /// empty-AndGroup-is-TRUE invariant).
    And(Vec<Predicate>),
}

fn json_path(key: &str) -> String {
    format!("'$.{key}'")
}

/// Builds the `json_extract(column, '$.key')` expression for a JSON
/// attribute lookup.
#[must_use]
pub fn json_extract(json_column: &str, key: &str) -> String {
    format!("json_extract({json_column}, {})", json_path(key))
}

/// Lowers a predicate tree to its SQL text and bound parameters.
#[must_use]
pub fn compile(predicate: &Predicate) -> (String, Vec<SqlValue>) {
    match predicate {
        Predicate::Compare { column, op, value } => (
            format!("{column} {} ?", operator_sql(*op)),
            vec![value.clone()],
        ),
        Predicate::NeOrNull { column, value } => (
            format!("({column} != ?) OR ({column} IS NULL)"),
            vec![value.clone()],
        ),
        Predicate::Like { column, pattern } => (
            format!("{column} LIKE ?"),
            vec![SqlValue::Text(pattern.clone())],
        ),
        Predicate::NotLikeOrNull { column, pattern } => (
            format!("({column} NOT LIKE ?) OR ({column} IS NULL)"),
            vec![SqlValue::Text(pattern.clone())],
        ),
        Predicate::JsonCompare { path, op, value } => (
            format!("{path} {} ?", operator_sql(*op)),
            vec![value.clone()],
        ),
        Predicate::JsonNeOrNull { path, value } => (
            format!("({path} != ?) OR ({path} IS NULL)"),
            vec![value.clone()],
        ),
        Predicate::JsonLike { path, pattern } => (
            format!("{path} LIKE ?"),
            vec![SqlValue::Text(pattern.clone())],
        ),
        Predicate::Raw { sql, params } => (sql.clone(), params.clone()),
        Predicate::And(predicates) => {
            if predicates.is_empty() {
                return ("1=1".to_string(), Vec::new());
            }
            let mut sql_parts = Vec::with_capacity(predicates.len());
            let mut params = Vec::new();
            for predicate in predicates {
                let (sql, predicate_params) = compile(predicate);
                sql_parts.push(format!("({sql})"));
                params.extend(predicate_params);
            }
            (sql_parts.join(" AND "), params)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wildcard_translation_matches_spec_examples() {
        assert_eq!(wildcard_to_like_pattern("*foo*"), "%foo%");
        assert_eq!(wildcard_to_like_pattern("foo*"), "foo%");
    }

    #[test]
    fn compare_compiles_to_placeholder() {
        let (sql, params) = compile(&Predicate::Compare {
            column: "length".to_string(),
            op: Operator::Gt,
            value: SqlValue::Int(5),
        });
        assert_eq!(sql, "length > ?");
        assert_eq!(params, vec![SqlValue::Int(5)]);
    }

    #[test]
    fn ne_or_null_widens_negation() {
        let (sql, _) = compile(&Predicate::NeOrNull {
            column: "run_number".to_string(),
            value: SqlValue::Int(1),
        });
        assert_eq!(sql, "(run_number != ?) OR (run_number IS NULL)");
    }

    #[test]
    fn and_joins_with_parens() {
        let (sql, params) = compile(&Predicate::And(vec![
            Predicate::Compare {
                column: "a".to_string(),
                op: Operator::Eq,
                value: SqlValue::Int(1),
            },
            Predicate::Compare {
                column: "b".to_string(),
                op: Operator::Eq,
                value: SqlValue::Int(2),
            },
        ]));
        assert_eq!(sql, "(a = ?) AND (b = ?)");
        assert_eq!(params, vec![SqlValue::Int(1), SqlValue::Int(2)]);
    }

    #[test]
    fn empty_and_group_is_vacuously_true() {
        let (sql, params) = compile(&Predicate::And(vec![]));
        assert_eq!(sql, "1=1");
        assert!(params.is_empty());
    }

    #[test]
    fn json_extract_builds_path_expression() {
        assert_eq!(
            json_extract("meta", "project"),
            "json_extract(meta, '$.project')"
        );
    }

    #[test]
    fn bool_value_binds_as_integer() {
        assert_eq!(to_sql_value(&TypedValue::Bool(true)), SqlValue::Int(1));
        assert_eq!(to_sql_value(&TypedValue::Bool(false)), SqlValue::Int(0));
    }
}
