//! Hashable form of comparable map keys.

use crate::copy::value::Value;

/// Hashable mirror of a comparable [`Value`].
///
/// Two keys map to the same form exactly when they compare equal as values.
/// Floats are held by bit pattern with `-0.0` folded into `0.0`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum KeyForm {
	Nil,
	Bool(bool),
	Int(i64),
	Uint(u64),
	Float(u64),
	String(Box<str>),
	Bytes(Vec<u8>),
	Pointer(Box<KeyForm>),
	Record(Vec<KeyForm>),
	Array(Vec<KeyForm>),
	Channel(u64),
}

impl KeyForm {
	/// Form of `value`, or `None` when no equal key can exist.
	///
	/// That covers sequences and maps, and any key holding a NaN, which never equals itself.
	pub fn of(value: &Value) -> Option<Self> {
		Some(match value {
			Value::Nil => Self::Nil,
			Value::Bool(v) => Self::Bool(*v),
			Value::Int(v) => Self::Int(*v),
			Value::Uint(v) => Self::Uint(*v),
			Value::Float(v) if v.is_nan() => return None,
			Value::Float(v) => Self::Float(if *v == 0.0 { 0 } else { v.to_bits() }),
			Value::String(v) => Self::String(v.clone()),
			Value::Bytes(v) => Self::Bytes(v.clone()),
			Value::Pointer(inner) => Self::Pointer(Box::new(Self::of(inner)?)),
			Value::Record(items) => Self::Record(items.iter().map(Self::of).collect::<Option<_>>()?),
			Value::Array(items) => Self::Array(items.iter().map(Self::of).collect::<Option<_>>()?),
			Value::Channel(v) => Self::Channel(*v),
			Value::Sequence(_) | Value::Map(_) => return None,
		})
	}
}
