//! Cross-condition checks the parser cannot make on its own: contradictory
//! criteria on the same key within one AND-group.
//!
//! Per-condition checks (wildcard/operator compatibility, equality-only
//! reserved keys) are already enforced while the condition is built, since
//! they only need that one condition's own key/operator/value. This module
//! adds one more per-condition check that genuinely belongs here instead:
//! under `strict_coerce=false`, `typer::coerce_value` is allowed to fall
//! through to `TypedValue::Str` for a reserved key with a declared
//! non-string type, deferring the "is this actually usable" decision to the
//! Validator (spec.md: "the condition is kept with string type and the
//! Validator rejects only if semantically impossible"). A `Str` value on a
//! key declared `Int`/`Float`/`Bool`/`DateTime` is exactly that — there is
//! no operator under which it is satisfiable — so it is rejected here
//! regardless of which operator the condition uses.

use std::collections::HashMap;

use crate::ast::{AndGroup, Operator, OrExpression, TypedValue};
use crate::error::{FilterError, Result};
use crate::reserved::ReservedKeys;

/// Which side of a key's value range a condition constrains. `Eq` pins an
/// exact value; `Lower`/`Upper` bound it from below/above. `Ne` never
/// contradicts another `Ne` (excluding several values is fine), so it has
/// no bucket.
#[derive(PartialEq, Eq, Hash, Clone, Copy)]
enum Bucket {
    Eq,
    Lower,
    Upper,
}

fn bucket_for(op: Operator) -> Option<Bucket> {
    match op {
        Operator::Eq => Some(Bucket::Eq),
        Operator::Gt | Operator::Ge => Some(Bucket::Lower),
        Operator::Lt | Operator::Le => Some(Bucket::Upper),
        Operator::Ne => None,
    }
}

/// Rejects a condition whose value fell through to `Str` under
/// `strict_coerce=false` even though its key is reserved with a declared
/// non-string type: no operator makes `length >= "test"` or `length =
/// "test"` satisfiable, so this is semantically impossible regardless of
/// `cond.op`.
fn check_semantically_possible(cond: &crate::ast::Condition, reserved: &ReservedKeys) -> Result<()> {
    let Some(key) = &cond.key else {
        return Ok(());
    };
    let Some(reserved_type) = reserved.get(key) else {
        return Ok(());
    };
    if reserved_type != crate::reserved::ReservedType::Str
        && matches!(cond.value, TypedValue::Str { .. })
    {
        return Err(FilterError::InvalidValue {
            key: Some(key.clone()),
            message: format!("key is declared {reserved_type:?} and cannot be compared against a string value"),
        });
    }
    Ok(())
}

fn validate_group(group: &AndGroup, reserved: &ReservedKeys) -> Result<()> {
    let mut seen: HashMap<(String, Bucket), &crate::ast::TypedValue> = HashMap::new();
    for cond in group.conditions() {
        check_semantically_possible(cond, reserved)?;

        let Some(key) = &cond.key else {
            continue;
        };
        let Some(bucket) = bucket_for(cond.op) else {
            continue;
        };
        match seen.get(&(key.clone(), bucket)) {
            Some(existing) if *existing != &cond.value => {
                return Err(FilterError::DuplicateCriterion { key: key.clone() });
            }
            _ => {
                seen.insert((key.clone(), bucket), &cond.value);
            }
        }
    }
    Ok(())
}

/// Validates every AND-group in the expression.
pub fn validate(expr: &OrExpression, reserved: &ReservedKeys) -> Result<()> {
    for group in expr.groups() {
        validate_group(group, reserved)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Parser;
    use crate::reserved::ReservedKeys;

    fn parse(src: &str) -> OrExpression {
        let reserved = ReservedKeys::with_defaults();
        Parser::new(src, &reserved, true).unwrap().parse().unwrap()
    }

    fn parse_non_strict(src: &str) -> OrExpression {
        let reserved = ReservedKeys::with_defaults();
        Parser::new(src, &reserved, false).unwrap().parse().unwrap()
    }

    fn validate_defaults(expr: &OrExpression) -> Result<()> {
        validate(expr, &ReservedKeys::with_defaults())
    }

    #[test]
    fn differing_equalities_on_same_key_are_rejected() {
        let expr = parse("name=a,name=b");
        assert!(matches!(
            validate_defaults(&expr),
            Err(FilterError::DuplicateCriterion { .. })
        ));
    }

    #[test]
    fn identical_equalities_on_same_key_are_allowed() {
        let expr = parse("name=a,name=a");
        assert!(validate_defaults(&expr).is_ok());
    }

    #[test]
    fn two_differing_lower_bounds_are_rejected() {
        let expr = parse("length>1,length>2");
        assert!(matches!(
            validate_defaults(&expr),
            Err(FilterError::DuplicateCriterion { .. })
        ));
    }

    #[test]
    fn a_lower_and_an_upper_bound_form_a_valid_range() {
        let expr = parse("length>1,length<10");
        assert!(validate_defaults(&expr).is_ok());
    }

    #[test]
    fn multiple_not_equal_on_same_key_are_allowed() {
        let expr = parse("name!=a,name!=b");
        assert!(validate_defaults(&expr).is_ok());
    }

    #[test]
    fn non_strict_string_fallback_on_ordering_operator_is_semantically_impossible() {
        let expr = parse_non_strict("length >= test");
        assert!(matches!(
            validate_defaults(&expr),
            Err(FilterError::InvalidValue { .. })
        ));
    }

    #[test]
    fn non_strict_string_fallback_on_equality_operator_is_also_rejected() {
        let expr = parse_non_strict("length = test");
        assert!(matches!(
            validate_defaults(&expr),
            Err(FilterError::InvalidValue { .. })
        ));
    }

    #[test]
    fn non_strict_string_fallback_on_datetime_key_is_rejected() {
        let expr = parse_non_strict("created_at >= test");
        assert!(matches!(
            validate_defaults(&expr),
            Err(FilterError::InvalidValue { .. })
        ));
    }

    #[test]
    fn non_strict_string_fallback_in_compound_range_is_rejected() {
        let expr = parse_non_strict("0 < length < test");
        assert!(matches!(
            validate_defaults(&expr),
            Err(FilterError::InvalidValue { .. })
        ));
    }

    #[test]
    fn non_strict_string_value_on_string_reserved_key_is_fine() {
        let expr = parse_non_strict("name = test");
        assert!(validate_defaults(&expr).is_ok());
    }
}
