//! Reserved keys: the engine's one piece of configuration.
//!
//! A reserved key is a metadata key with a declared type and, implicitly,
//! its own storage column. Keys absent from this table are looked up as
//! free-form metadata attributes (a JSON path, or a key/value fallback
//! table) by the query compiler instead.

use std::collections::HashMap;

/// The type a reserved key's values are coerced to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReservedType {
    Int,
    Float,
    Bool,
    DateTime,
    Str,
}

/// Declared reserved keys and the type each coerces to.
#[derive(Debug, Clone)]
pub struct ReservedKeys(HashMap<String, ReservedType>);

impl ReservedKeys {
    /// An empty reserved-key table: every key is treated as free-form
    /// metadata.
    #[must_use]
    pub fn empty() -> Self {
        Self(HashMap::new())
    }

    /// The reserved-key table observed on data identifiers: `name`,
    /// `scope` and `did_type` are string-typed and only support `=`/`!=`;
    /// `created_at`/`updated_at` are timestamps; `length` is an integer.
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut map = HashMap::new();
        map.insert("name".to_string(), ReservedType::Str);
        map.insert("scope".to_string(), ReservedType::Str);
        map.insert("did_type".to_string(), ReservedType::Str);
        map.insert("created_at".to_string(), ReservedType::DateTime);
        map.insert("updated_at".to_string(), ReservedType::DateTime);
        map.insert("length".to_string(), ReservedType::Int);
        Self(map)
    }

    /// Declares (or overrides) a reserved key.
    pub fn insert(&mut self, key: impl Into<String>, reserved_type: ReservedType) {
        self.0.insert(key.into(), reserved_type);
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<ReservedType> {
        self.0.get(key).copied()
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// `name`, `scope` and `did_type` only support equality: any ordering
    /// operator against them is a syntax-level error regardless of the
    /// value's type.
    #[must_use]
    pub fn equality_only(&self, key: &str) -> bool {
        matches!(self.get(key), Some(ReservedType::Str))
    }
}

impl Default for ReservedKeys {
    fn default() -> Self {
        Self::with_defaults()
    }
}
