//! The data model shared by every stage of the engine: operators, typed
//! values, and the DNF tree (`OrExpression` of `AndGroup`s of `Condition`s).

use chrono::NaiveDateTime;
use std::fmt;

/// A comparison operator recognised by the grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

/// The direction of an ordering operator, used to validate and flip compound
/// inequalities (`a < k < b`). `Eq`/`Ne` have no direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Reverse,
}

impl Operator {
    #[must_use]
    pub const fn direction(self) -> Option<Direction> {
        match self {
            Self::Lt | Self::Le => Some(Direction::Forward),
            Self::Gt | Self::Ge => Some(Direction::Reverse),
            Self::Eq | Self::Ne => None,
        }
    }

    /// Flips an ordering operator to its mirror image: `a < b` becomes
    /// `b > a`. Returns `None` for `Eq`/`Ne`, which have no mirror.
    #[must_use]
    pub const fn flip(self) -> Option<Self> {
        match self {
            Self::Lt => Some(Self::Gt),
            Self::Le => Some(Self::Ge),
            Self::Gt => Some(Self::Lt),
            Self::Ge => Some(Self::Le),
            Self::Eq | Self::Ne => None,
        }
    }

    /// True for `Lt`/`Le`/`Gt`/`Ge`: operators that impose an ordering and so
    /// are rejected against string-typed reserved keys like `name`/`scope`.
    #[must_use]
    pub const fn is_ordering(self) -> bool {
        self.direction().is_some()
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Eq => "=",
            Self::Ne => "!=",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
        };
        f.write_str(s)
    }
}

/// A value after coercion, tagged with the type it was coerced to.
#[derive(Debug, Clone, PartialEq)]
pub enum TypedValue {
    Int(i64),
    Float(f64),
    Bool(bool),
    DateTime(NaiveDateTime),
    /// A string value. `wildcard` is set when the raw lexeme contained an
    /// unescaped `*`, which the query compiler lowers to SQL `LIKE`/`%`.
    Str { value: String, wildcard: bool },
}

impl TypedValue {
    #[must_use]
    pub const fn is_wildcard_str(&self) -> bool {
        matches!(self, Self::Str { wildcard: true, .. })
    }

    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Bool(_) => "bool",
            Self::DateTime(_) => "datetime",
            Self::Str { .. } => "str",
        }
    }

    /// Numeric view used when comparing two typed values in the literal
    /// evaluator or in an ordering comparison: `Bool` is treated as its
    /// `0`/`1` integer value once it meets a numeric operand.
    #[must_use]
    pub fn as_numeric(&self) -> Option<f64> {
        match self {
            Self::Int(i) => Some(*i as f64),
            Self::Float(f) => Some(*f),
            Self::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            Self::DateTime(_) | Self::Str { .. } => None,
        }
    }
}

impl fmt::Display for TypedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%dT%H:%M:%S")),
            Self::Str { value, .. } => write!(f, "{value}"),
        }
    }
}

/// A single leaf predicate.
///
/// When `key` is `Some`, this is a key condition: `key op value`. When `key`
/// is `None`, this is a literal condition (`1 < 2`); `literal_lhs` then
/// carries the left-hand literal that `value` is compared against. Public
/// introspection (`Engine::filters`) only surfaces `(key, op, value)` triples
/// as the key conditions that matter for query compilation; literal
/// conditions are only ever consumed through `Engine::evaluate`.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub key: Option<String>,
    pub op: Operator,
    pub value: TypedValue,
    pub literal_lhs: Option<TypedValue>,
}

impl Condition {
    #[must_use]
    pub const fn is_literal(&self) -> bool {
        self.key.is_none()
    }
}

/// A conjunction of conditions. An empty group is the identity for AND:
/// vacuously true.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AndGroup(pub Vec<Condition>);

impl AndGroup {
    #[must_use]
    pub fn conditions(&self) -> &[Condition] {
        &self.0
    }
}

/// A disjunction of AND-groups. An empty expression is the identity for OR:
/// vacuously false.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrExpression(pub Vec<AndGroup>);

impl OrExpression {
    #[must_use]
    pub fn groups(&self) -> &[AndGroup] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flip_is_its_own_inverse() {
        for op in [Operator::Lt, Operator::Le, Operator::Gt, Operator::Ge] {
            assert_eq!(op.flip().unwrap().flip().unwrap(), op);
        }
    }

    #[test]
    fn eq_ne_have_no_flip_or_direction() {
        assert_eq!(Operator::Eq.flip(), None);
        assert_eq!(Operator::Ne.flip(), None);
        assert_eq!(Operator::Eq.direction(), None);
        assert_eq!(Operator::Ne.direction(), None);
    }

    #[test]
    fn direction_groups_match_flip_targets() {
        assert_eq!(Operator::Lt.direction(), Operator::Le.direction());
        assert_eq!(Operator::Gt.direction(), Operator::Ge.direction());
        assert_ne!(Operator::Lt.direction(), Operator::Gt.direction());
    }

    #[test]
    fn bool_compares_as_zero_or_one() {
        assert_eq!(TypedValue::Bool(true).as_numeric(), Some(1.0));
        assert_eq!(TypedValue::Bool(false).as_numeric(), Some(0.0));
    }
}
