use crate::copy::dispatch::copy_into;
use crate::copy::{CopyError, DestinationIssue, Filter, Result, Schema, Shape, TypeId, Value};

/// Copy `source` into the pointee of `destination`, keeping only what `filter` allows.
///
/// `destination_ty` must be a pointer type whose element type is exactly `source_ty`,
/// and `destination` must be a non-nil pointer; otherwise
/// [`CopyError::InvalidDestination`] is returned and `destination` is left untouched.
///
/// Fields rejected by the filter hold their zero value in the copy. On any other
/// error the destination must be discarded: a sequence at the top level may have
/// been partially filled.
pub fn copy<F: Filter + ?Sized>(schema: &Schema, source: &Value, source_ty: TypeId, destination: &mut Value, destination_ty: TypeId, filter: &F) -> Result<()> {
	let dst_def = schema.def(destination_ty)?;
	let Shape::Pointer { elem } = dst_def.shape else {
		return Err(CopyError::InvalidDestination {
			issue: DestinationIssue::NotAPointer,
			detail: format!("must be a pointer, got {}", schema.display_name(destination_ty)),
		});
	};
	if elem != source_ty {
		return Err(CopyError::InvalidDestination {
			issue: DestinationIssue::TypeMismatch,
			detail: format!("must be *{}, got {}", schema.display_name(source_ty), schema.display_name(destination_ty)),
		});
	}

	let slot = match destination {
		Value::Pointer(slot) => slot,
		Value::Nil => {
			return Err(CopyError::InvalidDestination {
				issue: DestinationIssue::NilPointer,
				detail: format!("{} is nil", schema.display_name(destination_ty)),
			});
		}
		other => {
			return Err(CopyError::InvalidDestination {
				issue: DestinationIssue::NotAPointer,
				detail: format!("{} holds a {} value", schema.display_name(destination_ty), other.kind_name()),
			});
		}
	};

	copy_into(schema, source, source_ty, slot, filter)
}

/// Build a filtered copy of `source`, an instance of `ty`.
pub fn copy_value<F: Filter + ?Sized>(schema: &Schema, source: &Value, ty: TypeId, filter: &F) -> Result<Value> {
	let mut out = Value::Nil;
	copy_into(schema, source, ty, &mut out, filter)?;
	Ok(out)
}

#[cfg(test)]
mod tests {
	use super::{copy, copy_value};
	use crate::copy::{CopyError, DestinationIssue, ErrorKind, FieldDef, KeepAll, PublicOnly, ScalarKind, Schema, Value};

	fn point_schema() -> (Schema, crate::copy::TypeId) {
		let mut schema = Schema::new();
		let int = schema.scalar(ScalarKind::Int);
		let point = schema
			.record("Point", [FieldDef::named("X", int), FieldDef::named("y", int)])
			.expect("record defines");
		(schema, point)
	}

	#[test]
	fn non_pointer_destination_is_rejected() {
		let (schema, point) = point_schema();
		let source = Value::Record(vec![Value::Int(1), Value::Int(2)]);
		let mut destination = Value::Record(vec![Value::Int(9), Value::Int(9)]);

		let err = copy(&schema, &source, point, &mut destination, point, &PublicOnly).expect_err("record destination fails");
		assert!(matches!(
			err,
			CopyError::InvalidDestination {
				issue: DestinationIssue::NotAPointer,
				..
			}
		));
		assert_eq!(destination, Value::Record(vec![Value::Int(9), Value::Int(9)]), "destination untouched");
	}

	#[test]
	fn pointer_to_other_type_is_rejected() {
		let (mut schema, point) = point_schema();
		let int = schema.scalar(ScalarKind::Int);
		let int_ptr = schema.pointer(int).expect("pointer type");
		let source = Value::Record(vec![Value::Int(1), Value::Int(2)]);
		let mut destination = Value::pointer(Value::Int(3));

		let err = copy(&schema, &source, point, &mut destination, int_ptr, &PublicOnly).expect_err("wrong pointee fails");
		assert_eq!(err.kind(), ErrorKind::InvalidDestination);
		assert_eq!(err.to_string(), "invalid destination, type mismatch: must be *Point, got *int");
		assert_eq!(destination, Value::pointer(Value::Int(3)), "destination untouched");
	}

	#[test]
	fn nil_destination_is_rejected() {
		let (mut schema, point) = point_schema();
		let point_ptr = schema.pointer(point).expect("pointer type");
		let source = Value::Record(vec![Value::Int(1), Value::Int(2)]);
		let mut destination = Value::Nil;

		let err = copy(&schema, &source, point, &mut destination, point_ptr, &PublicOnly).expect_err("nil destination fails");
		assert!(matches!(
			err,
			CopyError::InvalidDestination {
				issue: DestinationIssue::NilPointer,
				..
			}
		));
	}

	#[test]
	fn copy_writes_through_the_pointer() {
		let (mut schema, point) = point_schema();
		let point_ptr = schema.pointer(point).expect("pointer type");
		let source = Value::Record(vec![Value::Int(1), Value::Int(2)]);
		let mut destination = Value::pointer(schema.zero_value(point).expect("zero value"));

		copy(&schema, &source, point, &mut destination, point_ptr, &PublicOnly).expect("copy succeeds");
		assert_eq!(destination, Value::pointer(Value::Record(vec![Value::Int(1), Value::Int(0)])));
	}

	#[test]
	fn copy_value_with_keep_all_is_a_deep_clone() {
		let (schema, point) = point_schema();
		let source = Value::Record(vec![Value::Int(1), Value::Int(2)]);

		let out = copy_value(&schema, &source, point, &KeepAll).expect("copy succeeds");
		assert_eq!(out, source);
	}
}
