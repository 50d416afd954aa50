use std::fmt;

use thiserror::Error;

/// Crate-local result type.
pub type Result<T> = std::result::Result<T, CopyError>;

/// Coarse classification of a [`CopyError`] chain, taken from its root cause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
	/// Destination was rejected before traversal started.
	InvalidDestination,
	/// A value of a type that cannot be copied was reached.
	UnsupportedType,
	/// A structural operation could not complete.
	ReflectionFault,
	/// The type registry was misused.
	Schema,
}

/// Why a destination was rejected at entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DestinationIssue {
	/// Destination type is not a pointer type.
	NotAPointer,
	/// Destination pointee type differs from the source type.
	TypeMismatch,
	/// Destination pointer is nil, so there is no slot to write.
	NilPointer,
}

impl DestinationIssue {
	/// Short stable label.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::NotAPointer => "not a pointer",
			Self::TypeMismatch => "type mismatch",
			Self::NilPointer => "nil pointer",
		}
	}
}

impl fmt::Display for DestinationIssue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Errors produced while building or querying a [`Schema`](crate::copy::Schema).
#[derive(Debug, Error)]
pub enum SchemaError {
	/// Type id does not belong to this registry.
	#[error("unknown type id {id}")]
	UnknownType {
		/// Offending raw id.
		id: u32,
	},
	/// Named type lookup failed.
	#[error("type not found: {name}")]
	TypeNotFound {
		/// Requested type name.
		name: String,
	},
	/// A named type was registered twice.
	#[error("duplicate type name: {name}")]
	DuplicateTypeName {
		/// Conflicting name.
		name: String,
	},
	/// A record body was supplied for a record that already has one.
	#[error("record {name} is already defined")]
	RecordAlreadyDefined {
		/// Record type name.
		name: String,
	},
	/// A record body was supplied for a type that is not a declared record.
	#[error("type {name} is not a declared record")]
	NotADeclaredRecord {
		/// Display name of the offending type.
		name: String,
	},
	/// A record is used before its fields were defined.
	#[error("record {name} is declared but never defined")]
	UndefinedRecord {
		/// Record type name.
		name: String,
	},
	/// A record would contain itself by value.
	#[error("invalid recursive type {name} through field {field}")]
	RecursiveRecord {
		/// Record type name.
		name: String,
		/// Field closing the cycle.
		field: String,
	},
	/// Named types need a non-empty name.
	#[error("empty type name")]
	EmptyTypeName,
	/// Two fields of one record share a label.
	#[error("duplicate field {field} in {record}")]
	DuplicateField {
		/// Record display name.
		record: String,
		/// Repeated field label.
		field: String,
	},
	/// Map key type cannot be compared for equality.
	#[error("invalid map key type {key}: keys must be comparable")]
	InvalidMapKey {
		/// Display name of the key type.
		key: String,
	},
	/// Type expression syntax is invalid.
	#[error("invalid type expression: {expr}")]
	InvalidTypeExpr {
		/// Original expression text.
		expr: String,
	},
}

/// Errors produced by [`copy`](crate::copy::copy) and [`copy_value`](crate::copy::copy_value).
///
/// Failures deep in the traversal are wrapped in [`CopyError::Context`] frames on
/// the way up, so `Display` reads from the outermost operation down to the root cause.
#[derive(Debug, Error)]
pub enum CopyError {
	/// Destination rejected at entry; nothing was written.
	#[error("invalid destination, {issue}: {detail}")]
	InvalidDestination {
		/// Which entry check failed.
		issue: DestinationIssue,
		/// Types involved, rendered for humans.
		detail: String,
	},
	/// A value of an uncopyable type was reached.
	#[error("unsupported type {type_name}: {kind} values cannot be copied")]
	UnsupportedType {
		/// Shape category that was rejected.
		kind: &'static str,
		/// Display name of the rejected type.
		type_name: String,
	},
	/// A structural operation failed, usually because a value does not conform to its type.
	#[error("reflect error for {type_name}: {detail}")]
	ReflectionFault {
		/// Display name of the type being processed.
		type_name: String,
		/// Best-effort description of the failure.
		detail: String,
	},
	/// Registry lookup failed during traversal.
	#[error(transparent)]
	Schema(#[from] SchemaError),
	/// One frame of traversal context around a deeper failure.
	#[error("{context}: {source}")]
	Context {
		/// Operation that was in progress.
		context: String,
		/// Failure raised by the nested operation.
		source: Box<CopyError>,
	},
}

impl CopyError {
	pub(crate) fn fault(type_name: impl Into<String>, detail: impl Into<String>) -> Self {
		Self::ReflectionFault {
			type_name: type_name.into(),
			detail: detail.into(),
		}
	}

	/// Wrap this error in one more context frame.
	pub fn context(self, context: impl Into<String>) -> Self {
		Self::Context {
			context: context.into(),
			source: Box::new(self),
		}
	}

	/// Innermost error of the chain.
	pub fn root_cause(&self) -> &CopyError {
		let mut current = self;
		while let Self::Context { source, .. } = current {
			current = source;
		}
		current
	}

	/// Context frames, outermost first.
	pub fn frames(&self) -> Vec<&str> {
		let mut out = Vec::new();
		let mut current = self;
		while let Self::Context { context, source } = current {
			out.push(context.as_str());
			current = source;
		}
		out
	}

	/// Classification of the root cause.
	pub fn kind(&self) -> ErrorKind {
		match self.root_cause() {
			Self::InvalidDestination { .. } => ErrorKind::InvalidDestination,
			Self::UnsupportedType { .. } => ErrorKind::UnsupportedType,
			Self::ReflectionFault { .. } => ErrorKind::ReflectionFault,
			Self::Schema(_) => ErrorKind::Schema,
			Self::Context { .. } => unreachable!("root cause is never a context frame"),
		}
	}
}

/// Attach lazily-built context to a failing result.
pub(crate) trait ResultExt<T> {
	fn with_context<F>(self, context: F) -> Result<T>
	where
		F: FnOnce() -> String;
}

impl<T> ResultExt<T> for Result<T> {
	fn with_context<F>(self, context: F) -> Result<T>
	where
		F: FnOnce() -> String,
	{
		self.map_err(|err| err.context(context()))
	}
}

#[cfg(test)]
mod tests {
	use super::{CopyError, ErrorKind, Result, ResultExt};

	#[test]
	fn context_chain_renders_outermost_first() {
		let err = CopyError::fault("structure", "record has 2 fields, expected 3")
			.context("pointer dereference")
			.context("field AnotherPtr of structure");

		assert_eq!(
			err.to_string(),
			"field AnotherPtr of structure: pointer dereference: reflect error for structure: record has 2 fields, expected 3"
		);
		assert_eq!(err.frames(), vec!["field AnotherPtr of structure", "pointer dereference"]);
		assert_eq!(err.kind(), ErrorKind::ReflectionFault);
	}

	#[test]
	fn source_walks_the_chain() {
		use std::error::Error;

		let err = CopyError::UnsupportedType {
			kind: "channel",
			type_name: "chan int".to_owned(),
		}
		.context("map iteration");

		let source = err.source().expect("context frame exposes its source");
		assert!(source.to_string().contains("chan int"));
		assert!(matches!(err.root_cause(), CopyError::UnsupportedType { kind: "channel", .. }));
	}

	#[test]
	fn with_context_is_lazy_on_success() {
		let ok: Result<u8> = Ok(7);
		let value = ok.with_context(|| unreachable!("context must not be built for Ok")).expect("stays ok");
		assert_eq!(value, 7);
	}
}
