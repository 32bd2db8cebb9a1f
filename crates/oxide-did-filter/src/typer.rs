//! Coercion of raw lexemes into `TypedValue`s.
//!
//! Applies the ordered coercion cascade (bool, datetime, int, float, string)
//! and the two legacy key rewrites (`created_after`/`created_before`).

use chrono::NaiveDateTime;

use crate::ast::{Operator, TypedValue};
use crate::error::FilterError;
use crate::reserved::{ReservedKeys, ReservedType};

/// Datetime formats accepted for backward compatibility, in the order the
/// original system tries them.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.fZ",
    "%Y-%m-%dT%H:%M:%S%.fZ",
];

fn parse_bool(raw: &str) -> Option<bool> {
    match raw {
        "true" | "True" | "TRUE" => Some(true),
        "false" | "False" | "FALSE" => Some(false),
        _ => None,
    }
}

fn parse_datetime(raw: &str) -> Option<NaiveDateTime> {
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
}

/// True once the lexeme has been fully consumed by an unescaped `*`.
fn has_wildcard(raw: &str) -> bool {
    raw.contains('*')
}

fn to_str_value(raw: &str) -> TypedValue {
    TypedValue::Str {
        wildcard: has_wildcard(raw),
        value: raw.to_string(),
    }
}

/// Tries to coerce `raw` to exactly `reserved_type`, without falling through
/// to the generic cascade.
fn coerce_exact(reserved_type: ReservedType, raw: &str) -> Option<TypedValue> {
    match reserved_type {
        ReservedType::Int => raw.parse::<i64>().ok().map(TypedValue::Int),
        ReservedType::Float => raw.parse::<f64>().ok().map(TypedValue::Float),
        ReservedType::Bool => parse_bool(raw).map(TypedValue::Bool),
        ReservedType::DateTime => parse_datetime(raw).map(TypedValue::DateTime),
        ReservedType::Str => Some(to_str_value(raw)),
    }
}

/// The unreserved-key cascade: bool, then datetime, then int, then float,
/// falling back to string. Always succeeds.
fn coerce_cascade(raw: &str) -> TypedValue {
    if let Some(b) = parse_bool(raw) {
        return TypedValue::Bool(b);
    }
    if let Some(dt) = parse_datetime(raw) {
        return TypedValue::DateTime(dt);
    }
    if let Ok(i) = raw.parse::<i64>() {
        return TypedValue::Int(i);
    }
    if let Ok(f) = raw.parse::<f64>() {
        return TypedValue::Float(f);
    }
    to_str_value(raw)
}

/// Coerces a literal lexeme, quoted strings always remaining `Str`.
///
/// `reserved_type` is the declared type of the key this value is compared
/// against, if any. `strict` controls what happens when a reserved
/// numeric/bool/datetime key's value fails to coerce to its declared type:
/// under strict mode that is a hard error; otherwise the value falls
/// through the generic cascade and the validator decides whether the
/// resulting type is usable with the condition's operator.
pub fn coerce_value(
    key: Option<&str>,
    reserved_type: Option<ReservedType>,
    raw: &str,
    quoted: bool,
    strict: bool,
) -> crate::error::Result<TypedValue> {
    if quoted {
        return Ok(to_str_value(raw));
    }
    match reserved_type {
        Some(rt) => match coerce_exact(rt, raw) {
            Some(value) => Ok(value),
            None if strict => Err(FilterError::InvalidValue {
                key: key.map(str::to_string),
                message: format!("cannot coerce {raw:?} to {rt:?}"),
            }),
            None => Ok(coerce_cascade(raw)),
        },
        None => Ok(coerce_cascade(raw)),
    }
}

/// True if `raw` would coerce to something other than a plain string under
/// the generic cascade: used by the parser to tell a bare literal apart
/// from a key name when a condition's two sides are otherwise ambiguous.
#[must_use]
pub fn looks_like_literal(raw: &str) -> bool {
    parse_bool(raw).is_some()
        || parse_datetime(raw).is_some()
        || raw.parse::<i64>().is_ok()
        || raw.parse::<f64>().is_ok()
}

/// The legacy key rewrite result: the real reserved key and operator a
/// `created_after`/`created_before` shorthand condition expands to.
pub struct LegacyRewrite {
    pub key: &'static str,
    pub op: Operator,
}

/// Rewrites `created_after`/`created_before` shorthand keys to `created_at`
/// with the appropriate ordering operator. Returns `None` for any other key.
#[must_use]
pub fn legacy_rewrite(key: &str) -> Option<LegacyRewrite> {
    match key {
        "created_after" => Some(LegacyRewrite {
            key: "created_at",
            op: Operator::Ge,
        }),
        "created_before" => Some(LegacyRewrite {
            key: "created_at",
            op: Operator::Le,
        }),
        _ => None,
    }
}

/// Resolves which key a condition's key-side resolves to, and what
/// `ReservedKeys` entry (if any) now governs coercion, applying the legacy
/// rewrite first.
#[must_use]
pub fn resolve_key<'a>(
    key: &'a str,
    reserved: &ReservedKeys,
) -> (&'a str, Option<Operator>, Option<ReservedType>) {
    if let Some(rewrite) = legacy_rewrite(key) {
        return (
            "created_at",
            Some(rewrite.op),
            reserved.get("created_at"),
        );
    }
    (key, None, reserved.get(key))
}
