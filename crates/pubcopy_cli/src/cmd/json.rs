use std::collections::HashSet;

use pubcopy::copy::{KeyForm, MapEntry, ScalarKind, Schema, Shape, TypeId, Value};
use serde_json::{Map, Value as JsonValue, json};

use crate::error::{CliError, Result};

/// Decode `input` as an instance of `ty`.
///
/// Records are objects keyed by field label with missing keys left at their zero
/// value, maps are objects or `[[key, value], ...]` pairs, pointers are `null` or
/// their pointee, and channels are numeric handles.
pub(crate) fn decode_value(schema: &Schema, ty: TypeId, input: &JsonValue) -> Result<Value> {
	decode_at(schema, ty, input, "$")
}

fn decode_at(schema: &Schema, ty: TypeId, input: &JsonValue, at: &str) -> Result<Value> {
	let def = schema.def(ty)?;
	match &def.shape {
		Shape::Scalar(kind) => decode_scalar(*kind, input, at),
		Shape::Pointer { elem } => match input {
			JsonValue::Null => Ok(Value::Nil),
			other => Ok(Value::pointer(decode_at(schema, *elem, other, at)?)),
		},
		Shape::Record { .. } => decode_record(schema, ty, input, at),
		Shape::Map { key, value } => decode_map(schema, *key, *value, input, at),
		Shape::Sequence { elem } => match input {
			JsonValue::Null => Ok(Value::Nil),
			JsonValue::Array(items) => {
				let mut out = Vec::with_capacity(items.len());
				for (idx, item) in items.iter().enumerate() {
					out.push(decode_at(schema, *elem, item, &format!("{at}[{idx}]"))?);
				}
				Ok(Value::Sequence(out))
			}
			other => Err(mismatch(at, "array", other)),
		},
		Shape::Array { elem, len } => {
			let JsonValue::Array(items) = input else {
				return Err(mismatch(at, "array", input));
			};
			if items.len() != *len {
				return Err(decode_error(at, format!("expected {len} elements, got {}", items.len())));
			}
			let mut out = Vec::with_capacity(items.len());
			for (idx, item) in items.iter().enumerate() {
				out.push(decode_at(schema, *elem, item, &format!("{at}[{idx}]"))?);
			}
			Ok(Value::Array(out))
		}
		Shape::Channel { .. } => match input {
			JsonValue::Null => Ok(Value::Nil),
			other => other.as_u64().map(Value::Channel).ok_or_else(|| mismatch(at, "channel handle", other)),
		},
		Shape::Declared => Err(decode_error(at, format!("record {} is declared but never defined", schema.display_name(ty)))),
	}
}

fn decode_scalar(kind: ScalarKind, input: &JsonValue, at: &str) -> Result<Value> {
	let decoded = match kind {
		ScalarKind::Bool => input.as_bool().map(Value::Bool),
		ScalarKind::Int => input.as_i64().map(Value::Int),
		ScalarKind::Uint => input.as_u64().map(Value::Uint),
		ScalarKind::Float => input.as_f64().map(Value::Float),
		ScalarKind::String => input.as_str().map(Value::string),
		ScalarKind::Bytes => decode_bytes(input),
		ScalarKind::Any => Some(decode_any(input)),
	};
	decoded.ok_or_else(|| mismatch(at, kind.as_str(), input))
}

fn decode_bytes(input: &JsonValue) -> Option<Value> {
	let items = input.as_array()?;
	let mut out = Vec::with_capacity(items.len());
	for item in items {
		out.push(u8::try_from(item.as_u64()?).ok()?);
	}
	Some(Value::Bytes(out))
}

/// Untyped JSON keeps its own structure: objects become string-keyed maps.
fn decode_any(input: &JsonValue) -> Value {
	match input {
		JsonValue::Null => Value::Nil,
		JsonValue::Bool(v) => Value::Bool(*v),
		JsonValue::Number(n) => {
			if let Some(v) = n.as_i64() {
				Value::Int(v)
			} else if let Some(v) = n.as_u64() {
				Value::Uint(v)
			} else {
				Value::Float(n.as_f64().unwrap_or_default())
			}
		}
		JsonValue::String(v) => Value::string(v),
		JsonValue::Array(items) => Value::Sequence(items.iter().map(decode_any).collect()),
		JsonValue::Object(entries) => Value::Map(
			entries
				.iter()
				.map(|(key, value)| MapEntry::new(Value::string(key), decode_any(value)))
				.collect(),
		),
	}
}

fn decode_record(schema: &Schema, ty: TypeId, input: &JsonValue, at: &str) -> Result<Value> {
	let JsonValue::Object(object) = input else {
		return Err(mismatch(at, "object", input));
	};
	let fields = schema.record_fields(ty).unwrap_or_default();

	for key in object.keys() {
		if !fields.iter().any(|field| schema.field_label(field) == *key) {
			return Err(decode_error(at, format!("unknown field {key} of {}", schema.display_name(ty))));
		}
	}

	let mut out = Vec::with_capacity(fields.len());
	for field in fields {
		let label = schema.field_label(field);
		match object.get(&label) {
			Some(item) => out.push(decode_at(schema, field.ty, item, &format!("{at}.{label}"))?),
			None => out.push(schema.zero_value(field.ty)?),
		}
	}
	Ok(Value::Record(out))
}

fn decode_map(schema: &Schema, key_ty: TypeId, value_ty: TypeId, input: &JsonValue, at: &str) -> Result<Value> {
	let mut out = Vec::new();
	match input {
		JsonValue::Null => return Ok(Value::Nil),
		JsonValue::Object(object) => {
			for (key, value) in object {
				let item_at = format!("{at}[{key:?}]");
				let key = decode_at(schema, key_ty, &JsonValue::String(key.clone()), &item_at)?;
				out.push(MapEntry::new(key, decode_at(schema, value_ty, value, &item_at)?));
			}
		}
		JsonValue::Array(pairs) => {
			let mut seen = HashSet::with_capacity(pairs.len());
			for (idx, pair) in pairs.iter().enumerate() {
				let item_at = format!("{at}[{idx}]");
				let Some([key, value]) = pair.as_array().map(Vec::as_slice).and_then(|items| <&[JsonValue; 2]>::try_from(items).ok()) else {
					return Err(mismatch(&item_at, "[key, value] pair", pair));
				};
				let key = decode_at(schema, key_ty, key, &item_at)?;
				if KeyForm::of(&key).is_some_and(|form| !seen.insert(form)) {
					return Err(decode_error(&item_at, format!("duplicate map key {}", key.brief())));
				}
				out.push(MapEntry::new(key, decode_at(schema, value_ty, value, &item_at)?));
			}
		}
		other => return Err(mismatch(at, "object or array of pairs", other)),
	}
	Ok(Value::Map(out))
}

/// Encode `value`, an instance of `ty`, back into the JSON layout [`decode_value`] reads.
///
/// Maps whose keys all encode as strings become objects; anything else becomes a pair list.
pub(crate) fn encode_value(schema: &Schema, ty: TypeId, value: &Value) -> Result<JsonValue> {
	let def = schema.def(ty)?;
	match (&def.shape, value) {
		(Shape::Scalar(ScalarKind::Any), _) => Ok(encode_any(value)),
		(_, Value::Nil) => Ok(JsonValue::Null),
		(Shape::Scalar(_), Value::Bool(v)) => Ok(json!(v)),
		(Shape::Scalar(_), Value::Int(v)) => Ok(json!(v)),
		(Shape::Scalar(_), Value::Uint(v)) => Ok(json!(v)),
		(Shape::Scalar(_), Value::Float(v)) => Ok(json!(v)),
		(Shape::Scalar(_), Value::String(v)) => Ok(json!(v.as_ref())),
		(Shape::Scalar(_), Value::Bytes(v)) => Ok(json!(v)),
		(Shape::Pointer { elem }, Value::Pointer(inner)) => encode_value(schema, *elem, inner),
		(Shape::Record { fields }, Value::Record(items)) if fields.len() == items.len() => {
			let mut out = Map::new();
			for (field, item) in fields.iter().zip(items) {
				out.insert(schema.field_label(field), encode_value(schema, field.ty, item)?);
			}
			Ok(JsonValue::Object(out))
		}
		(Shape::Map { key, value: value_ty }, Value::Map(entries)) => {
			let mut pairs = Vec::with_capacity(entries.len());
			for entry in entries {
				pairs.push((encode_value(schema, *key, &entry.key)?, encode_value(schema, *value_ty, &entry.value)?));
			}
			if pairs.iter().all(|(key, _)| key.is_string()) {
				let object = pairs
					.into_iter()
					.map(|(key, value)| (key.as_str().unwrap_or_default().to_owned(), value))
					.collect();
				Ok(JsonValue::Object(object))
			} else {
				Ok(JsonValue::Array(pairs.into_iter().map(|(key, value)| json!([key, value])).collect()))
			}
		}
		(Shape::Sequence { elem } | Shape::Array { elem, .. }, Value::Sequence(items) | Value::Array(items)) => {
			let mut out = Vec::with_capacity(items.len());
			for item in items {
				out.push(encode_value(schema, *elem, item)?);
			}
			Ok(JsonValue::Array(out))
		}
		(Shape::Channel { .. }, Value::Channel(handle)) => Ok(json!(handle)),
		(_, other) => Err(CliError::Encode {
			type_name: schema.display_name(ty),
			detail: format!("unexpected {} value", other.kind_name()),
		}),
	}
}

fn encode_any(value: &Value) -> JsonValue {
	match value {
		Value::Nil => JsonValue::Null,
		Value::Bool(v) => json!(v),
		Value::Int(v) => json!(v),
		Value::Uint(v) => json!(v),
		Value::Float(v) => json!(v),
		Value::String(v) => json!(v.as_ref()),
		Value::Bytes(v) => json!(v),
		Value::Pointer(inner) => encode_any(inner),
		Value::Record(items) | Value::Sequence(items) | Value::Array(items) => JsonValue::Array(items.iter().map(encode_any).collect()),
		Value::Map(entries) => JsonValue::Array(entries.iter().map(|entry| json!([encode_any(&entry.key), encode_any(&entry.value)])).collect()),
		Value::Channel(handle) => json!(handle),
	}
}

fn mismatch(at: &str, expected: &str, found: &JsonValue) -> CliError {
	let found = match found {
		JsonValue::Null => "null",
		JsonValue::Bool(_) => "bool",
		JsonValue::Number(_) => "number",
		JsonValue::String(_) => "string",
		JsonValue::Array(_) => "array",
		JsonValue::Object(_) => "object",
	};
	decode_error(at, format!("expected {expected}, got {found}"))
}

fn decode_error(at: &str, detail: String) -> CliError {
	CliError::Decode { at: at.to_owned(), detail }
}
