//! The query compiler: lowers a normalized `OrExpression` to a backend
//! query description against an `EntityDescriptor`.
//!
//! Grounded on `oxide_orm::queryset::QuerySet::build*` (`sql.push_str`
//! composition of `SELECT ... FROM ... WHERE ...` around a hand-built
//! WHERE clause) rather than the `SelectDyn` typestate builder: `SelectDyn`
//! has no public constructor that attaches parameters to a raw WHERE
//! fragment, and this compiler's WHERE clause is exactly that — a raw
//! fragment built by `predicate::compile`, one parameter per `?`.

use std::collections::HashMap;

use tracing::{debug, trace};

use crate::ast::{AndGroup, Condition, OrExpression};
use crate::entity::{EntityDescriptor, Lookup};
use crate::error::{FilterError, Result};
use crate::evaluator::eval_condition;
use crate::predicate::{self, json_extract, wildcard_to_like_pattern, Predicate};
use crate::reserved::ReservedKeys;

/// A compiled query: ready to be handed to a backend driver. Owns no
/// connection and executes nothing; see spec.md §5 — compilation is a pure
/// read over the normalized DNF.
#[derive(Debug, Clone, PartialEq)]
pub struct BackendQuery {
    pub sql: String,
    pub params: Vec<oxide_sql_core::builder::value::SqlValue>,
}

fn sql_type_for(value: &crate::ast::TypedValue) -> &'static str {
    use crate::ast::TypedValue;
    match value {
        TypedValue::Int(_) | TypedValue::Bool(_) => "INTEGER",
        TypedValue::Float(_) => "REAL",
        TypedValue::DateTime(_) | TypedValue::Str { .. } => "TEXT",
    }
}

fn compile_column_condition(
    column: &str,
    cond: &Condition,
    nullable: bool,
) -> Result<Predicate> {
    use crate::ast::Operator;

    if cond.value.is_wildcard_str() {
        let crate::ast::TypedValue::Str { value, .. } = &cond.value else {
            unreachable!("wildcard values are always strings");
        };
        let pattern = wildcard_to_like_pattern(value);
        return Ok(match cond.op {
            Operator::Eq => Predicate::Like {
                column: column.to_string(),
                pattern,
            },
            Operator::Ne if nullable => Predicate::NotLikeOrNull {
                column: column.to_string(),
                pattern,
            },
            Operator::Ne => Predicate::Raw {
                sql: format!("{column} NOT LIKE ?"),
                params: vec![oxide_sql_core::builder::value::SqlValue::Text(pattern)],
            },
            _ => unreachable!("parser rejects wildcards with non-=/!= operators"),
        });
    }

    let value = predicate::to_sql_value(&cond.value);
    Ok(match cond.op {
        Operator::Ne if nullable => Predicate::NeOrNull {
            column: column.to_string(),
            value,
        },
        op => Predicate::Compare {
            column: column.to_string(),
            op,
            value,
        },
    })
}

fn compile_json_condition(json_column: &str, cond: &Condition) -> Result<Predicate> {
    use crate::ast::Operator;

    let key = cond.key.as_deref().expect("non-literal condition has a key");
    let path = json_extract(json_column, key);

    if cond.value.is_wildcard_str() {
        let crate::ast::TypedValue::Str { value, .. } = &cond.value else {
            unreachable!("wildcard values are always strings");
        };
        let pattern = wildcard_to_like_pattern(value);
        return match cond.op {
            Operator::Eq => Ok(Predicate::JsonLike { path, pattern }),
            Operator::Ne => Err(FilterError::UnsupportedOnBackend {
                backend: "sql".to_string(),
                message: format!(
                    "negated wildcard match over JSON attribute {key:?} is not supported reliably on this dialect"
                ),
            }),
            _ => unreachable!("parser rejects wildcards with non-=/!= operators"),
        };
    }

    let value = predicate::to_sql_value(&cond.value);
    Ok(match cond.op {
        Operator::Ne => Predicate::JsonNeOrNull { path, value },
        Operator::Eq => Predicate::JsonCompare {
            path,
            op: cond.op,
            value,
        },
        _ordering => Predicate::JsonCompare {
            path: format!("CAST({path} AS {})", sql_type_for(&cond.value)),
            op: cond.op,
            value,
        },
    })
}

fn compile_kv_fallback(
    kv_table: &str,
    entity: &dyn EntityDescriptor,
    cond: &Condition,
) -> Predicate {
    use crate::ast::Operator;

    let key = cond.key.as_deref().expect("non-literal condition has a key");
    let table = entity.table();
    let scope_col = entity.scope_column();
    let name_col = entity.name_column();
    let value_cmp = if cond.value.is_wildcard_str() {
        "LIKE"
    } else {
        match cond.op {
            Operator::Eq | Operator::Ne => "=",
            Operator::Lt => "<",
            Operator::Le => "<=",
            Operator::Gt => ">",
            Operator::Ge => ">=",
        }
    };
    let value = if cond.value.is_wildcard_str() {
        let crate::ast::TypedValue::Str { value, .. } = &cond.value else {
            unreachable!("wildcard values are always strings");
        };
        oxide_sql_core::builder::value::SqlValue::Text(wildcard_to_like_pattern(value))
    } else {
        predicate::to_sql_value(&cond.value)
    };

    let exists = format!(
        "EXISTS (SELECT 1 FROM {kv_table} WHERE {kv_table}.scope = {table}.{scope_col} AND {kv_table}.name = {table}.{name_col} AND {kv_table}.key = ? AND {kv_table}.value {value_cmp} ?)"
    );
    let sql = if matches!(cond.op, Operator::Ne) {
        format!("NOT {exists}")
    } else {
        exists
    };
    Predicate::Raw {
        sql,
        params: vec![
            oxide_sql_core::builder::value::SqlValue::Text(key.to_string()),
            value,
        ],
    }
}

fn compile_condition(
    cond: &Condition,
    entity: &dyn EntityDescriptor,
    reserved: &ReservedKeys,
    json_column: Option<&str>,
) -> Result<Predicate> {
    if cond.is_literal() {
        let truth = eval_condition(cond)?;
        return Ok(Predicate::Raw {
            sql: if truth { "1=1" } else { "1=0" }.to_string(),
            params: Vec::new(),
        });
    }
    let key = cond.key.as_deref().expect("checked is_literal above");

    if reserved.contains(key) {
        return match entity.lookup(key) {
            Lookup::Column(column) => {
                compile_column_condition(&column, cond, entity.is_nullable(key))
            }
            Lookup::Json | Lookup::Missing => Err(FilterError::InvalidValue {
                key: Some(key.to_string()),
                message: "reserved key has no column on this entity descriptor".to_string(),
            }),
        };
    }

    match entity.lookup(key) {
        Lookup::Column(column) => compile_column_condition(&column, cond, entity.is_nullable(key)),
        Lookup::Json => {
            let json_column = json_column.ok_or_else(|| FilterError::InvalidValue {
                key: Some(key.to_string()),
                message: "key resolves to the JSON attribute but no json_column was supplied".to_string(),
            })?;
            compile_json_condition(json_column, cond)
        }
        Lookup::Missing => {
            if let Some(json_column) = json_column {
                compile_json_condition(json_column, cond)
            } else if let Some(kv_table) = entity.kv_table() {
                Ok(compile_kv_fallback(kv_table, entity, cond))
            } else {
                Err(FilterError::InvalidValue {
                    key: Some(key.to_string()),
                    message: "non-reserved key with no json_column or kv fallback table configured".to_string(),
                })
            }
        }
    }
}

fn compile_and_group(
    group: &AndGroup,
    entity: &dyn EntityDescriptor,
    reserved: &ReservedKeys,
    json_column: Option<&str>,
) -> Result<Predicate> {
    let predicates = group
        .conditions()
        .iter()
        .map(|cond| compile_condition(cond, entity, reserved, json_column))
        .collect::<Result<Vec<_>>>()?;
    Ok(Predicate::And(predicates))
}

/// Compiles a normalized `OrExpression` into a `BackendQuery` selecting
/// `(scope, name)` plus any additional return attributes, deduplicated
/// across all OR-groups.
pub fn compile(
    expr: &OrExpression,
    entity: &dyn EntityDescriptor,
    reserved: &ReservedKeys,
    additional_return_attrs: &[&str],
    json_column: Option<&str>,
) -> Result<BackendQuery> {
    debug!(
        groups = expr.groups().len(),
        json_column = json_column.unwrap_or("<none>"),
        "compiling filter to backend query"
    );

    let mut columns = vec![
        entity.scope_column().to_string(),
        entity.name_column().to_string(),
    ];
    columns.extend(additional_return_attrs.iter().map(|s| (*s).to_string()));

    let mut sql = String::from("SELECT DISTINCT ");
    sql.push_str(&columns.join(", "));
    sql.push_str(" FROM ");
    sql.push_str(entity.table());

    let mut params = Vec::new();
    if !expr.groups().is_empty() {
        let mut group_sql = Vec::with_capacity(expr.groups().len());
        for group in expr.groups() {
            let predicate = compile_and_group(group, entity, reserved, json_column)?;
            let (sql, group_params) = predicate::compile(&predicate);
            trace!(sql = %sql, "compiled AND-group predicate");
            group_sql.push(format!("({sql})"));
            params.extend(group_params);
        }
        sql.push_str(" WHERE ");
        sql.push_str(&group_sql.join(" OR "));
    } else {
        // The empty OrExpression is vacuously FALSE.
        sql.push_str(" WHERE 1=0");
    }

    Ok(BackendQuery { sql, params })
}

/// Counts, per key, how many distinct operators are used across the whole
/// expression. Exposed for `tracing` instrumentation call sites that want a
/// cheap complexity signal without re-walking the tree; not part of the
/// compiled query itself.
#[must_use]
pub fn operator_histogram(expr: &OrExpression) -> HashMap<String, usize> {
    let mut histogram = HashMap::new();
    for group in expr.groups() {
        for cond in group.conditions() {
            if let Some(key) = &cond.key {
                *histogram.entry(key.clone()).or_insert(0) += 1;
            }
        }
    }
    histogram
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::SimpleEntity;
    use crate::parser::Parser;
    use crate::reserved::ReservedKeys;
    use oxide_sql_core::builder::value::SqlValue;

    fn parse(src: &str, reserved: &ReservedKeys) -> OrExpression {
        Parser::new(src, reserved, true).unwrap().parse().unwrap()
    }

    fn dids_entity() -> SimpleEntity {
        SimpleEntity::new("dids")
            .with_column("name", "name")
            .with_column("scope", "scope")
            .with_column("did_type", "did_type")
            .with_column("created_at", "created_at")
            .with_column("updated_at", "updated_at")
            .with_column("length", "length")
            .with_nullable("length", true)
            .with_kv_table("did_meta_kv")
    }

    #[test]
    fn reserved_equality_compiles_to_plain_comparison() {
        let reserved = ReservedKeys::with_defaults();
        let expr = parse("length=5", &reserved);
        let query = compile(&expr, &dids_entity(), &reserved, &[], None).unwrap();
        assert!(query.sql.contains("length = ?"));
        assert_eq!(query.params, vec![SqlValue::Int(5)]);
    }

    #[test]
    fn reserved_not_equal_widens_to_include_null() {
        let reserved = ReservedKeys::with_defaults();
        let expr = parse("length!=5", &reserved);
        let query = compile(&expr, &dids_entity(), &reserved, &[], None).unwrap();
        assert!(query.sql.contains("(length != ?) OR (length IS NULL)"));
    }

    #[test]
    fn wildcard_equality_compiles_to_like() {
        let reserved = ReservedKeys::with_defaults();
        let expr = parse("name=*foo*", &reserved);
        let query = compile(&expr, &dids_entity(), &reserved, &[], None).unwrap();
        assert!(query.sql.contains("name LIKE ?"));
        assert_eq!(query.params, vec![SqlValue::Text("%foo%".to_string())]);
    }

    #[test]
    fn wildcard_not_equal_widens_to_include_null() {
        // `name`/`scope` are the identity columns and never NULL (see
        // `EntityDescriptor::is_nullable`'s default); `did_type` is an
        // ordinary nullable reserved string column, so it's the one that
        // exercises the widening.
        let reserved = ReservedKeys::with_defaults();
        let expr = parse("did_type!=*foo*", &reserved);
        let query = compile(&expr, &dids_entity(), &reserved, &[], None).unwrap();
        assert!(query.sql.contains("(did_type NOT LIKE ?) OR (did_type IS NULL)"));
    }

    #[test]
    fn wildcard_not_equal_on_identity_column_does_not_widen() {
        let reserved = ReservedKeys::with_defaults();
        let expr = parse("name!=*foo*", &reserved);
        let query = compile(&expr, &dids_entity(), &reserved, &[], None).unwrap();
        assert!(query.sql.contains("name NOT LIKE ?"));
        assert!(!query.sql.contains("IS NULL"));
    }

    #[test]
    fn non_reserved_key_with_json_column_uses_json_extract() {
        let reserved = ReservedKeys::with_defaults();
        let expr = parse("project=test", &reserved);
        let query = compile(&expr, &dids_entity(), &reserved, &[], Some("meta")).unwrap();
        assert!(query.sql.contains("json_extract(meta, '$.project') = ?"));
    }

    #[test]
    fn non_reserved_key_without_json_column_falls_back_to_exists() {
        let reserved = ReservedKeys::with_defaults();
        let expr = parse("project=test", &reserved);
        let query = compile(&expr, &dids_entity(), &reserved, &[], None).unwrap();
        assert!(query.sql.contains("EXISTS (SELECT 1 FROM did_meta_kv"));
        assert!(query.sql.contains("did_meta_kv.key = ?"));
    }

    #[test]
    fn negated_wildcard_over_json_is_rejected() {
        let reserved = ReservedKeys::with_defaults();
        let expr = parse("project!=*foo*", &reserved);
        let err = compile(&expr, &dids_entity(), &reserved, &[], Some("meta")).unwrap_err();
        assert!(matches!(err, FilterError::UnsupportedOnBackend { .. }));
    }

    #[test]
    fn ordering_over_json_casts_before_comparing() {
        let reserved = ReservedKeys::with_defaults();
        let expr = parse("run_number>0", &reserved);
        let query = compile(&expr, &dids_entity(), &reserved, &[], Some("meta")).unwrap();
        assert!(query.sql.contains("CAST(json_extract(meta, '$.run_number') AS INTEGER) > ?"));
    }

    #[test]
    fn or_groups_join_with_or_and_select_is_distinct() {
        let reserved = ReservedKeys::with_defaults();
        let expr = parse("length=1;length=2", &reserved);
        let query = compile(&expr, &dids_entity(), &reserved, &[], None).unwrap();
        assert!(query.sql.starts_with("SELECT DISTINCT scope, name FROM dids WHERE"));
        assert!(query.sql.contains(") OR ("));
    }

    #[test]
    fn additional_return_attributes_are_projected() {
        let reserved = ReservedKeys::with_defaults();
        let expr = parse("length=1", &reserved);
        let query = compile(&expr, &dids_entity(), &reserved, &["did_type"], None).unwrap();
        assert!(query.sql.starts_with("SELECT DISTINCT scope, name, did_type FROM"));
    }

    #[test]
    fn empty_expression_is_vacuously_false() {
        let reserved = ReservedKeys::with_defaults();
        let expr = OrExpression::default();
        let query = compile(&expr, &dids_entity(), &reserved, &[], None).unwrap();
        assert!(query.sql.ends_with("WHERE 1=0"));
    }
}
