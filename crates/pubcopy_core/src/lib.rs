//! Public library API for filtered deep copies of schema-typed values.

/// Type registry, value tree, filters, and the copy engine.
pub mod copy;
