/// Dynamic value whose meaning comes from a [`TypeId`](crate::copy::TypeId) in a [`Schema`](crate::copy::Schema).
///
/// Children are owned, so a value tree never aliases another one and cannot contain cycles.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
	/// Nil pointer, map, sequence, channel, or empty `any`.
	Nil,
	Bool(bool),
	Int(i64),
	Uint(u64),
	Float(f64),
	String(Box<str>),
	Bytes(Vec<u8>),
	/// Non-nil pointer to exactly one owned pointee.
	Pointer(Box<Value>),
	/// Record fields in declaration order.
	Record(Vec<Value>),
	/// Map entries; order carries no meaning.
	Map(Vec<MapEntry>),
	Sequence(Vec<Value>),
	Array(Vec<Value>),
	/// Opaque channel handle.
	Channel(u64),
}

/// One key/value association of a [`Value::Map`].
#[derive(Debug, Clone, PartialEq)]
pub struct MapEntry {
	/// Entry key.
	pub key: Value,
	/// Entry value.
	pub value: Value,
}

impl MapEntry {
	/// Build an entry.
	pub fn new(key: Value, value: Value) -> Self {
		Self { key, value }
	}
}

impl Value {
	/// Variant label used in diagnostics.
	pub fn kind_name(&self) -> &'static str {
		match self {
			Self::Nil => "nil",
			Self::Bool(_) => "bool",
			Self::Int(_) => "int",
			Self::Uint(_) => "uint",
			Self::Float(_) => "float",
			Self::String(_) => "string",
			Self::Bytes(_) => "bytes",
			Self::Pointer(_) => "pointer",
			Self::Record(_) => "record",
			Self::Map(_) => "map",
			Self::Sequence(_) => "sequence",
			Self::Array(_) => "array",
			Self::Channel(_) => "channel",
		}
	}

	/// Build a string value.
	pub fn string(text: &str) -> Self {
		Self::String(text.to_owned().into_boxed_str())
	}

	/// Build a non-nil pointer.
	pub fn pointer(pointee: Value) -> Self {
		Self::Pointer(Box::new(pointee))
	}

	/// Pointee of a non-nil pointer.
	pub fn pointee(&self) -> Option<&Value> {
		match self {
			Self::Pointer(item) => Some(item),
			_ => None,
		}
	}

	/// Record field by declaration index.
	pub fn field(&self, index: usize) -> Option<&Value> {
		match self {
			Self::Record(fields) => fields.get(index),
			_ => None,
		}
	}

	/// Map value for `key`, compared by equality.
	pub fn map_get(&self, key: &Value) -> Option<&Value> {
		match self {
			Self::Map(entries) => entries.iter().find(|entry| entry.key == *key).map(|entry| &entry.value),
			_ => None,
		}
	}

	/// Elements of a sequence or array.
	pub fn items(&self) -> Option<&[Value]> {
		match self {
			Self::Sequence(items) | Self::Array(items) => Some(items),
			_ => None,
		}
	}

	/// Short single-line rendering used when naming map keys in errors.
	pub fn brief(&self) -> String {
		match self {
			Self::Nil => "nil".to_owned(),
			Self::Bool(v) => v.to_string(),
			Self::Int(v) => v.to_string(),
			Self::Uint(v) => v.to_string(),
			Self::Float(v) => v.to_string(),
			Self::String(v) => v.to_string(),
			Self::Bytes(v) => format!("bytes[{}]", v.len()),
			Self::Channel(v) => format!("chan#{v}"),
			Self::Pointer(_) | Self::Record(_) | Self::Map(_) | Self::Sequence(_) | Self::Array(_) => format!("<{}>", self.kind_name()),
		}
	}
}
