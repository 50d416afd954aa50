mod barrier;
mod dispatch;
mod entry;
mod error;
mod expr;
mod filter;
mod key;
mod schema;
mod value;

/// Copy entry points.
pub use entry::{copy, copy_value};
/// Error and result aliases.
pub use error::{CopyError, DestinationIssue, ErrorKind, Result, SchemaError};
/// Type expression parser types.
pub use expr::TypeExpr;
/// Field and embedded-type filters.
pub use filter::{Filter, KeepAll, NameFilter, PublicOnly, is_exported, keeps_field};
/// Hashable map-key form.
pub use key::KeyForm;
/// Type-descriptor registry.
pub use schema::{FieldDef, ScalarKind, Schema, Shape, TypeDef, TypeId};
/// Dynamic value tree.
pub use value::{MapEntry, Value};
