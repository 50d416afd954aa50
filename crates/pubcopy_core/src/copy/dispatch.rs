use crate::copy::barrier::{MapBuilder, append_element, init_sequence, set_field};
use crate::copy::error::ResultExt;
use crate::copy::value::{MapEntry, Value};
use crate::copy::{CopyError, FieldDef, Filter, Result, ScalarKind, Schema, Shape, TypeId, keeps_field};

/// Copy `src`, an instance of `ty`, into `dst`, dropping what `filter` rejects.
///
/// `dst` is only assigned once the copy of `src` is complete, except for
/// sequences, which grow in place element by element.
pub(crate) fn copy_into<F: Filter + ?Sized>(schema: &Schema, src: &Value, ty: TypeId, dst: &mut Value, filter: &F) -> Result<()> {
	let def = schema.def(ty)?;
	log::trace!("copy {} ({})", schema.display_name(ty), def.shape.category());

	match &def.shape {
		Shape::Pointer { elem } => copy_pointer(schema, src, ty, *elem, dst, filter),
		Shape::Record { fields } => copy_record(schema, src, ty, fields, dst, filter),
		Shape::Map { key, value } => copy_map(schema, src, ty, *key, *value, dst, filter),
		Shape::Sequence { elem } => copy_sequence(schema, src, ty, *elem, dst, filter),
		Shape::Array { len, .. } => copy_array(schema, src, ty, *len, dst),
		Shape::Scalar(kind) => copy_scalar(schema, src, ty, *kind, dst),
		Shape::Channel { .. } => Err(CopyError::UnsupportedType {
			kind: "channel",
			type_name: schema.display_name(ty),
		}),
		Shape::Declared => Err(CopyError::fault(schema.display_name(ty), "record is declared but never defined")),
	}
}

fn copy_pointer<F: Filter + ?Sized>(schema: &Schema, src: &Value, ty: TypeId, elem: TypeId, dst: &mut Value, filter: &F) -> Result<()> {
	match src {
		Value::Nil => {
			*dst = Value::Nil;
			Ok(())
		}
		Value::Pointer(pointee) => {
			let mut slot = Value::Nil;
			copy_into(schema, pointee, elem, &mut slot, filter).with_context(|| "pointer dereference".to_owned())?;
			*dst = Value::Pointer(Box::new(slot));
			Ok(())
		}
		other => Err(nonconforming(schema, ty, other)),
	}
}

fn copy_record<F: Filter + ?Sized>(schema: &Schema, src: &Value, ty: TypeId, fields: &[FieldDef], dst: &mut Value, filter: &F) -> Result<()> {
	let Value::Record(items) = src else {
		return Err(nonconforming(schema, ty, src));
	};
	if items.len() != fields.len() {
		return Err(CopyError::fault(
			schema.display_name(ty),
			format!("record has {} fields, expected {}", items.len(), fields.len()),
		));
	}

	let mut out = schema.zero_value(ty)?;
	for (index, (field, item)) in fields.iter().zip(items).enumerate() {
		if !keeps_field(schema, field, filter)? {
			log::debug!("drop field {} of {}", schema.field_label(field), schema.display_name(ty));
			continue;
		}

		let mut slot = Value::Nil;
		copy_into(schema, item, field.ty, &mut slot, filter)
			.and_then(|()| set_field(schema, ty, &mut out, index, slot))
			.with_context(|| format!("field {} of {}", schema.field_label(field), schema.display_name(ty)))?;
	}

	*dst = out;
	Ok(())
}

fn copy_map<F: Filter + ?Sized>(
	schema: &Schema,
	src: &Value,
	ty: TypeId,
	key_ty: TypeId,
	value_ty: TypeId,
	dst: &mut Value,
	filter: &F,
) -> Result<()> {
	let entries = match src {
		Value::Nil => {
			*dst = Value::Nil;
			return Ok(());
		}
		Value::Map(entries) => entries,
		other => return Err(nonconforming(schema, ty, other)),
	};

	let mut out = MapBuilder::with_capacity(entries.len());
	for entry in entries {
		copy_map_entry(schema, ty, key_ty, value_ty, entry, &mut out, filter).with_context(|| "map iteration".to_owned())?;
	}

	*dst = out.finish();
	Ok(())
}

fn copy_map_entry<F: Filter + ?Sized>(
	schema: &Schema,
	ty: TypeId,
	key_ty: TypeId,
	value_ty: TypeId,
	entry: &MapEntry,
	out: &mut MapBuilder,
	filter: &F,
) -> Result<()> {
	// The copied key does not exist yet when its copy fails, so only the map type is named.
	let mut key = Value::Nil;
	copy_into(schema, &entry.key, key_ty, &mut key, filter).with_context(|| format!("copying key of {}", schema.display_name(ty)))?;

	let mut value = Value::Nil;
	copy_into(schema, &entry.value, value_ty, &mut value, filter)
		.with_context(|| format!("copying value of {} for key {}", schema.display_name(ty), entry.key.brief()))?;

	out.insert(schema, ty, key, value).with_context(|| "setting map item".to_owned())
}

fn copy_sequence<F: Filter + ?Sized>(schema: &Schema, src: &Value, ty: TypeId, elem: TypeId, dst: &mut Value, filter: &F) -> Result<()> {
	let items = match src {
		Value::Nil => {
			*dst = Value::Nil;
			return Ok(());
		}
		Value::Sequence(items) => items,
		other => return Err(nonconforming(schema, ty, other)),
	};

	init_sequence(dst);
	for (index, item) in items.iter().enumerate() {
		let mut slot = Value::Nil;
		copy_into(schema, item, elem, &mut slot, filter).with_context(|| format!("copying slice {} element {index}", schema.display_name(ty)))?;
		append_element(schema, ty, dst, slot).with_context(|| "append slice item".to_owned())?;
	}
	Ok(())
}

/// Arrays are copied whole, without consulting the filter for their elements.
fn copy_array(schema: &Schema, src: &Value, ty: TypeId, len: usize, dst: &mut Value) -> Result<()> {
	let Value::Array(items) = src else {
		return Err(nonconforming(schema, ty, src));
	};
	if items.len() != len {
		return Err(CopyError::fault(
			schema.display_name(ty),
			format!("array has {} elements, expected {len}", items.len()),
		));
	}

	*dst = src.clone();
	Ok(())
}

fn copy_scalar(schema: &Schema, src: &Value, ty: TypeId, kind: ScalarKind, dst: &mut Value) -> Result<()> {
	if !kind.accepts(src) {
		return Err(nonconforming(schema, ty, src));
	}
	*dst = src.clone();
	Ok(())
}

fn nonconforming(schema: &Schema, ty: TypeId, value: &Value) -> CopyError {
	let expected = schema.get(ty).map(|def| def.shape.category()).unwrap_or("value");
	CopyError::fault(
		schema.display_name(ty),
		format!("cannot use {} value as {expected}", value.kind_name()),
	)
}
