//! Recursive-descent parser for the filter grammar:
//!
//! ```text
//! expr     = andgroup { ";" andgroup }
//! andgroup = condition { "," condition }
//! condition = term op term [ op term ]
//! term     = IDENT | LITERAL
//! ```
//!
//! There is exactly one nesting level (`OrExpression` → `AndGroup` →
//! `Condition`), so unlike a full SQL grammar this needs no Pratt
//! precedence climbing: each clause is a flat, sequential read of tokens.
//!
//! Key/literal disambiguation and coercion happen inline as each condition
//! is parsed, since both need the caller-supplied `ReservedKeys` and
//! `strict_coerce` flag that only the parser is constructed with.

mod core;

pub use core::Parser;
