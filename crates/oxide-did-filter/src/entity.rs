//! Entity descriptors: the compiler's view of where a key is stored.
//!
//! A reserved key maps to a typed column; anything else is either looked up
//! in the entity's JSON metadata blob (when one is configured) or falls back
//! to a correlated key/value metadata table. `EntityDescriptor::lookup` is
//! the single capability the compiler needs — it does not duplicate the
//! reserved-key list itself (spec design note: "a single `lookup(key) ->
//! ColumnHandle | JsonPath | Missing` capability rather than duplicate the
//! key list").

/// Where the query compiler should look for a given key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    /// A strongly typed column, named as it appears in SQL (already
    /// table-qualified if the caller wants that).
    Column(String),
    /// Not a column: compile as a `json_extract` path into the entity's
    /// JSON metadata blob.
    Json,
    /// Neither: this key is not natively known to the entity at all (the
    /// descriptor only reports this when `json_column` handling is not
    /// wanted for the call; ordinary non-reserved lookups normally resolve
    /// to `Json` or the key/value fallback instead).
    Missing,
}

/// Describes a backend entity (table) the compiler emits a query against.
///
/// Implemented once per concrete backend model; the engine itself is
/// generic over any `EntityDescriptor`.
pub trait EntityDescriptor {
    /// The table name the compiled query selects from.
    fn table(&self) -> &str;

    /// The column holding the DID scope, used for the `(scope, name)`
    /// dedup key and for the key/value fallback join.
    fn scope_column(&self) -> &str {
        "scope"
    }

    /// The column holding the DID name.
    fn name_column(&self) -> &str {
        "name"
    }

    /// Resolves a reserved key to its column, or reports it is not a
    /// reserved key of this entity at all.
    fn lookup(&self, key: &str) -> Lookup;

    /// True if the column for `key` can hold SQL NULL. Drives the
    /// negation-includes-null widening; defaults to `true` since most
    /// metadata columns are optional. `name`/`scope` are the identity of
    /// the row and are never NULL.
    fn is_nullable(&self, key: &str) -> bool {
        !matches!(key, "name" | "scope")
    }

    /// The key/value fallback table used for non-reserved keys when no
    /// JSON column is configured, keyed by `(scope, name, key)`. `None`
    /// disables the fallback (non-reserved keys then only work via
    /// `json_column`).
    fn kv_table(&self) -> Option<&str> {
        None
    }
}

/// A minimal, map-backed `EntityDescriptor` good enough for tests and for
/// callers that don't want to hand-write a descriptor per model.
#[derive(Debug, Clone)]
pub struct SimpleEntity {
    table: String,
    columns: std::collections::HashMap<String, String>,
    kv_table: Option<String>,
    nullable: std::collections::HashMap<String, bool>,
}

impl SimpleEntity {
    #[must_use]
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            columns: std::collections::HashMap::new(),
            kv_table: None,
            nullable: std::collections::HashMap::new(),
        }
    }

    /// Declares that `key` is backed by `column`.
    #[must_use]
    pub fn with_column(mut self, key: impl Into<String>, column: impl Into<String>) -> Self {
        self.columns.insert(key.into(), column.into());
        self
    }

    /// Overrides nullability for a declared column (default: nullable,
    /// except `name`/`scope`).
    #[must_use]
    pub fn with_nullable(mut self, key: impl Into<String>, nullable: bool) -> Self {
        self.nullable.insert(key.into(), nullable);
        self
    }

    /// Declares the key/value fallback table for non-reserved keys.
    #[must_use]
    pub fn with_kv_table(mut self, table: impl Into<String>) -> Self {
        self.kv_table = Some(table.into());
        self
    }
}

impl EntityDescriptor for SimpleEntity {
    fn table(&self) -> &str {
        &self.table
    }

    fn lookup(&self, key: &str) -> Lookup {
        self.columns
            .get(key)
            .map_or(Lookup::Missing, |column| Lookup::Column(column.clone()))
    }

    fn is_nullable(&self, key: &str) -> bool {
        if let Some(nullable) = self.nullable.get(key) {
            return *nullable;
        }
        !matches!(key, "name" | "scope")
    }

    fn kv_table(&self) -> Option<&str> {
        self.kv_table.as_deref()
    }
}
