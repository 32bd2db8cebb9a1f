//! Sorts a parsed `OrExpression` into a stable, canonical form and renders
//! it back to source text.
//!
//! Two expressions that are logically identical but were written with their
//! conditions in a different order normalize to the same value; re-parsing
//! `to_canonical_string`'s output reproduces that same normalized form
//! (the idempotence property conditions are tested against).

use crate::ast::{AndGroup, Condition, OrExpression};

fn condition_sort_key(cond: &Condition) -> (bool, String) {
    match &cond.key {
        Some(key) => (false, key.clone()),
        None => (true, String::new()),
    }
}

/// Sorts the conditions within each AND-group by key, with literal
/// (key-less) conditions first. Group order itself is left untouched: an
/// `OrExpression`'s groups are not re-sorted, since nothing about OR is
/// order-sensitive enough to justify reshuffling user-visible groups.
#[must_use]
pub fn normalize(expr: &OrExpression) -> OrExpression {
    let groups = expr
        .groups()
        .iter()
        .map(|group| {
            let mut conditions = group.conditions().to_vec();
            conditions.sort_by_key(condition_sort_key);
            AndGroup(conditions)
        })
        .collect();
    OrExpression(groups)
}

fn render_condition(cond: &Condition) -> String {
    match &cond.key {
        Some(key) => format!("{key} {} {}", cond.op, cond.value),
        None => {
            let lhs = cond
                .literal_lhs
                .as_ref()
                .expect("literal condition must carry its left-hand literal");
            format!("{lhs} {} {}", cond.op, cond.value)
        }
    }
}

/// Renders an `OrExpression` back to the `key OP value` surface syntax:
/// conditions within a group joined by `,`, groups joined by `;`.
#[must_use]
pub fn to_canonical_string(expr: &OrExpression) -> String {
    expr.groups()
        .iter()
        .map(|group| {
            group
                .conditions()
                .iter()
                .map(render_condition)
                .collect::<Vec<_>>()
                .join(",")
        })
        .collect::<Vec<_>>()
        .join(";")
}
