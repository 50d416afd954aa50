//! Fallible structural mutations.
//!
//! Every write the copy engine makes into a value under construction goes through
//! one of these helpers, so a write that cannot happen surfaces as a
//! [`CopyError::ReflectionFault`] naming the type being built instead of a panic.

use std::collections::HashMap;

use crate::copy::key::KeyForm;
use crate::copy::value::{MapEntry, Value};
use crate::copy::{CopyError, Result, Schema, TypeId};

/// Assign `value` to field `index` of a record being assembled.
pub(crate) fn set_field(schema: &Schema, record_ty: TypeId, record: &mut Value, index: usize, value: Value) -> Result<()> {
	let Value::Record(fields) = record else {
		return Err(CopyError::fault(
			schema.display_name(record_ty),
			format!("cannot set field {index} on a {} value", record.kind_name()),
		));
	};
	let count = fields.len();
	let slot = fields.get_mut(index).ok_or_else(|| {
		CopyError::fault(
			schema.display_name(record_ty),
			format!("field index {index} out of range for {count} fields"),
		)
	})?;
	*slot = value;
	Ok(())
}

/// Map under construction, indexed by key so a collapsed key is found in constant time.
pub(crate) struct MapBuilder {
	entries: Vec<MapEntry>,
	index: HashMap<KeyForm, usize>,
}

impl MapBuilder {
	pub(crate) fn with_capacity(capacity: usize) -> Self {
		Self {
			entries: Vec::with_capacity(capacity),
			index: HashMap::with_capacity(capacity),
		}
	}

	/// Insert a copied entry. An equal key already present is replaced.
	pub(crate) fn insert(&mut self, schema: &Schema, map_ty: TypeId, key: Value, value: Value) -> Result<()> {
		if let Some(kind) = uncomparable_part(&key) {
			return Err(CopyError::fault(
				schema.display_name(map_ty),
				format!("map key contains an uncomparable {kind} value"),
			));
		}

		// A key with no form (NaN inside) equals nothing, not even itself.
		let Some(form) = KeyForm::of(&key) else {
			self.entries.push(MapEntry::new(key, value));
			return Ok(());
		};
		if let Some(&slot) = self.index.get(&form) {
			log::debug!("copied key {} collides in {}, keeping the later value", key.brief(), schema.display_name(map_ty));
			self.entries[slot].value = value;
			return Ok(());
		}
		self.index.insert(form, self.entries.len());
		self.entries.push(MapEntry::new(key, value));
		Ok(())
	}

	pub(crate) fn finish(self) -> Value {
		Value::Map(self.entries)
	}
}

/// Reset a destination slot to an empty, zero-capacity sequence.
pub(crate) fn init_sequence(slot: &mut Value) {
	*slot = Value::Sequence(Vec::new());
}

/// Append one copied element to a sequence slot.
pub(crate) fn append_element(schema: &Schema, sequence_ty: TypeId, slot: &mut Value, item: Value) -> Result<()> {
	match slot {
		Value::Sequence(items) => {
			items.push(item);
			Ok(())
		}
		other => Err(CopyError::fault(
			schema.display_name(sequence_ty),
			format!("cannot append to a {} value", other.kind_name()),
		)),
	}
}

fn uncomparable_part(value: &Value) -> Option<&'static str> {
	match value {
		Value::Sequence(_) | Value::Map(_) => Some(value.kind_name()),
		Value::Record(items) | Value::Array(items) => items.iter().find_map(uncomparable_part),
		_ => None,
	}
}
