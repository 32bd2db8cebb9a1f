//! A metadata filter language for selecting data identifiers (DIDs) by
//! structured predicates over their metadata.
//!
//! Users submit a compact textual filter expression (`name=test,length>5`);
//! [`Engine`] lexes, parses, type-coerces, validates and normalizes it into
//! canonical disjunctive normal form, then either evaluates it directly
//! (when it references no keys) or compiles it into a backend query against
//! an [`entity::EntityDescriptor`].
//!
//! ```
//! use oxide_did_filter::{Engine, FilterOptions};
//!
//! let engine = Engine::new("length>5,name=foo*", FilterOptions::default()).unwrap();
//! assert_eq!(engine.filters().groups().len(), 1);
//! ```

pub mod ast;
pub mod compiler;
pub mod entity;
pub mod error;
mod evaluator;
mod lexer;
mod normalize;
mod parser;
mod predicate;
pub mod reserved;
mod typer;
mod validator;

use tracing::debug;

pub use ast::{AndGroup, Condition, Operator, OrExpression, TypedValue};
pub use compiler::BackendQuery;
pub use entity::{EntityDescriptor, Lookup, SimpleEntity};
pub use error::{FilterError, Result};
pub use reserved::{ReservedKeys, ReservedType};

/// Construction options for [`Engine::new`].
///
/// Mirrors the workspace's builder-style option structs (e.g.
/// `oxide_orm::fields::FieldOptions`): callers commonly write
/// `Engine::new(src, FilterOptions::default())` and override only what they
/// need.
#[derive(Debug, Clone)]
pub struct FilterOptions {
    /// When `true` (the default), a reserved numeric/bool/datetime key
    /// whose value fails to coerce to its declared type is a hard parse
    /// error. When `false`, the condition falls through to string typing
    /// and the validator rejects it only if that is semantically
    /// impossible. Defaults to strict: spec.md §9 resolves this Open
    /// Question in favor of strict-by-default.
    pub strict_coerce: bool,
    /// The reserved-key table. Defaults to [`ReservedKeys::with_defaults`].
    pub reserved_keys: ReservedKeys,
}

impl Default for FilterOptions {
    fn default() -> Self {
        Self {
            strict_coerce: true,
            reserved_keys: ReservedKeys::with_defaults(),
        }
    }
}

impl FilterOptions {
    #[must_use]
    pub fn strict_coerce(mut self, strict: bool) -> Self {
        self.strict_coerce = strict;
        self
    }

    #[must_use]
    pub fn reserved_keys(mut self, reserved_keys: ReservedKeys) -> Self {
        self.reserved_keys = reserved_keys;
        self
    }
}

/// The Filter Engine: a parsed, coerced, validated and normalized filter
/// expression.
///
/// Construction is the only place that can fail; once built, `Engine` is
/// immutable, `Send + Sync`, and safe to share across threads (spec.md §5).
/// Compilation (`create_query`) and evaluation (`evaluate`) are pure reads
/// that hold no state between calls.
#[derive(Debug, Clone)]
pub struct Engine {
    filters: OrExpression,
    reserved_keys: ReservedKeys,
}

impl Engine {
    /// Lexes, parses, coerces, validates and normalizes `source` into an
    /// `Engine`. Fails with [`FilterError::InvalidSyntax`],
    /// [`FilterError::InvalidValue`] or [`FilterError::DuplicateCriterion`].
    pub fn new(source: &str, options: FilterOptions) -> Result<Self> {
        debug!(source_len = source.len(), strict = options.strict_coerce, "constructing filter engine");
        let parsed = parser::Parser::new(source, &options.reserved_keys, options.strict_coerce)?
            .parse()?;
        validator::validate(&parsed, &options.reserved_keys)?;
        let filters = normalize::normalize(&parsed);
        debug!(
            groups = filters.groups().len(),
            canonical = %normalize::to_canonical_string(&filters),
            "filter engine constructed"
        );
        Ok(Self {
            filters,
            reserved_keys: options.reserved_keys,
        })
    }

    /// The normalized DNF: an ordered sequence of AND-groups of
    /// `(key, op, value)` triples. Used heavily in testing, and by any
    /// caller that wants to inspect the parsed filter directly.
    #[must_use]
    pub fn filters(&self) -> &OrExpression {
        &self.filters
    }

    /// Renders the normalized DNF back to the `key OP value` surface
    /// syntax. Re-parsing this string reproduces an equal DNF
    /// (normalization idempotence, spec.md §8 item 1).
    #[must_use]
    pub fn to_canonical_string(&self) -> String {
        normalize::to_canonical_string(&self.filters)
    }

    /// Evaluates a filter that references no keys (constants only) to a
    /// boolean, without touching any backend. Errors if any condition
    /// references a key.
    pub fn evaluate(&self) -> Result<bool> {
        evaluator::evaluate(&self.filters)
    }

    /// Compiles the filter into a [`BackendQuery`] against `entity`,
    /// optionally projecting `additional_return_attrs` and resolving
    /// non-reserved keys through `json_column` when given.
    pub fn create_query(
        &self,
        entity: &dyn EntityDescriptor,
        additional_return_attrs: &[&str],
        json_column: Option<&str>,
    ) -> Result<BackendQuery> {
        compiler::compile(
            &self.filters,
            entity,
            &self.reserved_keys,
            additional_return_attrs,
            json_column,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_send_sync<T: Send + Sync>(_value: T) {}

    #[test]
    fn engine_is_send_and_sync() {
        let engine = Engine::new("length>5", FilterOptions::default()).unwrap();
        is_send_sync(engine);
    }

    #[test]
    fn new_rejects_invalid_syntax() {
        let err = Engine::new("length >", FilterOptions::default()).unwrap_err();
        assert!(matches!(err, FilterError::InvalidSyntax { .. }));
    }

    #[test]
    fn new_rejects_bad_reserved_value() {
        let err = Engine::new("length >= test", FilterOptions::default()).unwrap_err();
        assert!(matches!(err, FilterError::InvalidValue { .. }));
    }

    #[test]
    fn new_rejects_duplicate_criteria() {
        let err = Engine::new("name=a,name=b", FilterOptions::default()).unwrap_err();
        assert!(matches!(err, FilterError::DuplicateCriterion { .. }));
    }

    #[test]
    fn evaluate_handles_literal_filters() {
        let engine = Engine::new("1 < 2, 3 > 2", FilterOptions::default()).unwrap();
        assert!(engine.evaluate().unwrap());
    }

    #[test]
    fn evaluate_errors_on_keyed_filter() {
        let engine = Engine::new("length>5", FilterOptions::default()).unwrap();
        assert!(engine.evaluate().is_err());
    }

    #[test]
    fn create_query_compiles_a_reserved_key_condition() {
        let entity = SimpleEntity::new("dids")
            .with_column("length", "length")
            .with_column("name", "name")
            .with_column("scope", "scope");
        let engine = Engine::new("length>5", FilterOptions::default()).unwrap();
        let query = engine.create_query(&entity, &[], None).unwrap();
        assert!(query.sql.contains("length > ?"));
    }

    #[test]
    fn canonical_round_trip_reparses_to_equal_dnf() {
        let engine = Engine::new("length>1,name=test", FilterOptions::default()).unwrap();
        let rendered = engine.to_canonical_string();
        let reparsed = Engine::new(&rendered, FilterOptions::default()).unwrap();
        assert_eq!(engine.filters(), reparsed.filters());
    }
}
