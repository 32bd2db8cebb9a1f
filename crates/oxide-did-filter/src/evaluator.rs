//! The literal evaluator: computes a boolean directly from a DNF of
//! literal (key-less) conditions, without touching any backend.

use std::cmp::Ordering;

use crate::ast::{AndGroup, Condition, Operator, OrExpression, TypedValue};
use crate::error::{FilterError, Result};

fn typed_eq(lhs: &TypedValue, rhs: &TypedValue) -> bool {
    if let (Some(a), Some(b)) = (lhs.as_numeric(), rhs.as_numeric()) {
        return (a - b).abs() < f64::EPSILON;
    }
    match (lhs, rhs) {
        (TypedValue::DateTime(a), TypedValue::DateTime(b)) => a == b,
        (TypedValue::Str { value: a, .. }, TypedValue::Str { value: b, .. }) => a == b,
        _ => false,
    }
}

fn typed_cmp(lhs: &TypedValue, rhs: &TypedValue) -> Option<Ordering> {
    if let (Some(a), Some(b)) = (lhs.as_numeric(), rhs.as_numeric()) {
        return a.partial_cmp(&b);
    }
    match (lhs, rhs) {
        (TypedValue::DateTime(a), TypedValue::DateTime(b)) => Some(a.cmp(b)),
        (TypedValue::Str { value: a, .. }, TypedValue::Str { value: b, .. }) => Some(a.cmp(b)),
        _ => None,
    }
}

/// Evaluates a single literal condition to a boolean. Errors if `cond`
/// carries a key (it is not a literal condition) or if its two sides can't
/// be ordered against each other under an ordering operator.
pub fn eval_condition(cond: &Condition) -> Result<bool> {
    if cond.key.is_some() {
        return Err(FilterError::InvalidValue {
            key: cond.key.clone(),
            message: "evaluate() cannot be used on a condition that references a key".to_string(),
        });
    }
    let lhs = cond
        .literal_lhs
        .as_ref()
        .expect("a literal condition always carries its left-hand literal");
    let rhs = &cond.value;

    match cond.op {
        Operator::Eq => Ok(typed_eq(lhs, rhs)),
        Operator::Ne => Ok(!typed_eq(lhs, rhs)),
        Operator::Lt | Operator::Le | Operator::Gt | Operator::Ge => {
            let Some(ordering) = typed_cmp(lhs, rhs) else {
                return Err(FilterError::InvalidValue {
                    key: None,
                    message: format!(
                        "cannot order a {} against a {} literal",
                        lhs.type_name(),
                        rhs.type_name()
                    ),
                });
            };
            Ok(match cond.op {
                Operator::Lt => ordering == Ordering::Less,
                Operator::Le => ordering != Ordering::Greater,
                Operator::Gt => ordering == Ordering::Greater,
                Operator::Ge => ordering != Ordering::Less,
                Operator::Eq | Operator::Ne => unreachable!("handled above"),
            })
        }
    }
}

fn eval_and_group(group: &AndGroup) -> Result<bool> {
    for cond in group.conditions() {
        if !eval_condition(cond)? {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Evaluates a whole DNF expression. Every condition in `expr` must be
/// literal (no keys); the first keyed condition found is reported as an
/// error rather than silently ignored.
pub fn evaluate(expr: &OrExpression) -> Result<bool> {
    for group in expr.groups() {
        for cond in group.conditions() {
            if let Some(key) = &cond.key {
                return Err(FilterError::InvalidValue {
                    key: Some(key.clone()),
                    message: "evaluate() requires a filter with no keys".to_string(),
                });
            }
        }
    }
    for group in expr.groups() {
        if eval_and_group(group)? {
            return Ok(true);
        }
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Parser;
    use crate::reserved::ReservedKeys;

    fn eval(src: &str) -> bool {
        let reserved = ReservedKeys::with_defaults();
        let expr = Parser::new(src, &reserved, false).unwrap().parse().unwrap();
        evaluate(&expr).unwrap()
    }

    #[test]
    fn equal_and_not_equal() {
        assert!(eval("True = True"));
        assert!(eval("True != False"));
    }

    #[test]
    fn one_sided_inequality() {
        assert!(eval("1 < 2"));
        assert!(!eval("1 > 2"));
        assert!(eval("1 <= 1"));
        assert!(eval("1 >= 1"));
    }

    #[test]
    fn compound_inequality_decomposes_to_conjunction() {
        assert!(eval("3 > 2 > 1"));
        assert!(!eval("1 > 2 > 3"));
    }

    #[test]
    fn and_groups() {
        assert!(eval("True = True, False = False"));
        assert!(!eval("True = True, False = True"));
        assert!(eval("3 > 2, 2 > 1"));
        assert!(!eval("1 > 2, 2 > 1"));
        assert!(!eval("1 > 2, 2 > 3"));
        assert!(!eval("1 > 2, 4 > 3 > 2"));
    }

    #[test]
    fn or_groups() {
        assert!(eval("True = True; True = True"));
        assert!(eval("True = True; True = False"));
        assert!(!eval("True = False; False = True"));
        assert!(eval("3 > 2; 2 > 1"));
        assert!(eval("1 > 2; 2 > 1"));
        assert!(!eval("1 > 2; 2 > 3"));
        assert!(eval("1 > 2; 4 > 3 > 2"));
    }

    #[test]
    fn and_or_groups() {
        assert!(eval("1 > 2, 4 > 3 > 2; True=True"));
        assert!(!eval("1 > 2, 4 > 3 > 2; True=False"));
    }

    #[test]
    fn evaluate_rejects_keyed_conditions() {
        let reserved = ReservedKeys::with_defaults();
        let expr = Parser::new("length=1", &reserved, true)
            .unwrap()
            .parse()
            .unwrap();
        let err = evaluate(&expr).unwrap_err();
        assert!(matches!(err, FilterError::InvalidValue { .. }));
    }

    #[test]
    fn empty_expression_evaluates_false() {
        assert!(!eval(""));
    }
}
