use std::collections::{HashMap, HashSet};

use crate::copy::SchemaError;
use crate::copy::value::Value;

/// Index of a type inside one [`Schema`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(u32);

impl TypeId {
	/// Zero-based registry index.
	pub fn index(self) -> usize {
		self.0 as usize
	}

	/// Raw id value.
	pub fn raw(self) -> u32 {
		self.0
	}
}

/// Leaf value categories. Each one is predeclared in every schema under a lowercase name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
	/// `bool`
	Bool,
	/// `int`, signed 64-bit.
	Int,
	/// `uint`, unsigned 64-bit.
	Uint,
	/// `float`, 64-bit.
	Float,
	/// `string`
	String,
	/// `bytes`
	Bytes,
	/// `any`: holds any value, copied verbatim.
	Any,
}

impl ScalarKind {
	/// All kinds in predeclaration order.
	pub const ALL: [ScalarKind; 7] = [Self::Bool, Self::Int, Self::Uint, Self::Float, Self::String, Self::Bytes, Self::Any];

	/// Predeclared type name.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Bool => "bool",
			Self::Int => "int",
			Self::Uint => "uint",
			Self::Float => "float",
			Self::String => "string",
			Self::Bytes => "bytes",
			Self::Any => "any",
		}
	}

	/// Parse a predeclared type name.
	pub fn from_name(name: &str) -> Option<Self> {
		Self::ALL.into_iter().find(|kind| kind.as_str() == name)
	}

	/// Whether `value` is a valid instance of this kind.
	pub fn accepts(self, value: &Value) -> bool {
		matches!(
			(self, value),
			(Self::Any, _)
				| (Self::Bool, Value::Bool(_))
				| (Self::Int, Value::Int(_))
				| (Self::Uint, Value::Uint(_))
				| (Self::Float, Value::Float(_))
				| (Self::String, Value::String(_))
				| (Self::Bytes, Value::Bytes(_))
		)
	}

	/// Zero value of this kind.
	pub fn zero(self) -> Value {
		match self {
			Self::Bool => Value::Bool(false),
			Self::Int => Value::Int(0),
			Self::Uint => Value::Uint(0),
			Self::Float => Value::Float(0.0),
			Self::String => Value::String(Box::from("")),
			Self::Bytes => Value::Bytes(Vec::new()),
			Self::Any => Value::Nil,
		}
	}
}

/// One record field declaration.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldDef {
	/// Declared name; `None` marks an embedded (anonymous) field.
	pub name: Option<Box<str>>,
	/// Field type.
	pub ty: TypeId,
}

impl FieldDef {
	/// Named field.
	pub fn named(name: &str, ty: TypeId) -> Self {
		Self {
			name: Some(name.to_owned().into_boxed_str()),
			ty,
		}
	}

	/// Embedded field, identified by its type.
	pub fn embedded(ty: TypeId) -> Self {
		Self { name: None, ty }
	}

	/// Whether this field has no declared name.
	pub fn is_embedded(&self) -> bool {
		self.name.is_none()
	}
}

/// Structural category of a type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Shape {
	Scalar(ScalarKind),
	Pointer {
		/// Pointee type.
		elem: TypeId,
	},
	Record {
		/// Fields in declaration order.
		fields: Vec<FieldDef>,
	},
	Map {
		/// Key type; always comparable.
		key: TypeId,
		/// Value type.
		value: TypeId,
	},
	Sequence {
		/// Element type.
		elem: TypeId,
	},
	Array {
		/// Element type.
		elem: TypeId,
		/// Fixed element count.
		len: usize,
	},
	Channel {
		/// Element type.
		elem: TypeId,
	},
	/// Named record declared but not yet given fields.
	Declared,
}

impl Shape {
	/// Category label used in diagnostics.
	pub fn category(&self) -> &'static str {
		match self {
			Self::Scalar(_) => "scalar",
			Self::Pointer { .. } => "pointer",
			Self::Record { .. } | Self::Declared => "record",
			Self::Map { .. } => "map",
			Self::Sequence { .. } => "sequence",
			Self::Array { .. } => "array",
			Self::Channel { .. } => "channel",
		}
	}
}

/// One registered type.
#[derive(Debug, Clone)]
pub struct TypeDef {
	/// Type name; `None` for composite type literals.
	pub name: Option<Box<str>>,
	/// Structure of the type.
	pub shape: Shape,
}

impl TypeDef {
	/// Type name, if the type is named.
	pub fn name(&self) -> Option<&str> {
		self.name.as_deref()
	}
}

/// Registry of type descriptors.
///
/// Named types are nominal: each name is registered once. Unnamed composite types
/// (pointers, maps, sequences, arrays, channels, anonymous records) are interned by
/// structure, so building the same literal twice yields the same [`TypeId`].
#[derive(Debug, Clone)]
pub struct Schema {
	types: Vec<TypeDef>,
	by_name: HashMap<Box<str>, TypeId>,
	literals: HashMap<Shape, TypeId>,
}

impl Default for Schema {
	fn default() -> Self {
		Self::new()
	}
}

impl Schema {
	/// Empty registry holding only the predeclared scalars.
	pub fn new() -> Self {
		let mut schema = Self {
			types: Vec::new(),
			by_name: HashMap::new(),
			literals: HashMap::new(),
		};
		for kind in ScalarKind::ALL {
			let name: Box<str> = Box::from(kind.as_str());
			let id = schema.push(TypeDef {
				name: Some(name.clone()),
				shape: Shape::Scalar(kind),
			});
			schema.by_name.insert(name, id);
		}
		schema
	}

	/// Number of registered types, predeclared scalars included.
	pub fn len(&self) -> usize {
		self.types.len()
	}

	/// Always false: predeclared scalars are always present.
	pub fn is_empty(&self) -> bool {
		self.types.is_empty()
	}

	/// Iterate registered types in registration order.
	pub fn iter(&self) -> impl Iterator<Item = (TypeId, &TypeDef)> {
		self.types.iter().enumerate().map(|(idx, def)| (TypeId(idx as u32), def))
	}

	/// Look up a type by id.
	pub fn get(&self, id: TypeId) -> Option<&TypeDef> {
		self.types.get(id.index())
	}

	/// Look up a type by id, failing with [`SchemaError::UnknownType`].
	pub fn def(&self, id: TypeId) -> Result<&TypeDef, SchemaError> {
		self.get(id).ok_or(SchemaError::UnknownType { id: id.raw() })
	}

	/// Look up a named type.
	pub fn lookup(&self, name: &str) -> Option<TypeId> {
		self.by_name.get(name).copied()
	}

	/// Predeclared scalar type.
	pub fn scalar(&self, kind: ScalarKind) -> TypeId {
		let position = ScalarKind::ALL.iter().position(|item| *item == kind).unwrap_or_default();
		TypeId(position as u32)
	}

	/// Register a named scalar type distinct from the predeclared one.
	pub fn define_scalar(&mut self, name: &str, kind: ScalarKind) -> Result<TypeId, SchemaError> {
		self.insert_named(name, Shape::Scalar(kind))
	}

	/// Pointer to `elem`.
	pub fn pointer(&mut self, elem: TypeId) -> Result<TypeId, SchemaError> {
		self.literal(Shape::Pointer { elem })
	}

	/// Variable-length sequence of `elem`.
	pub fn sequence(&mut self, elem: TypeId) -> Result<TypeId, SchemaError> {
		self.literal(Shape::Sequence { elem })
	}

	/// Fixed-length array of `len` elements.
	pub fn array(&mut self, elem: TypeId, len: usize) -> Result<TypeId, SchemaError> {
		self.literal(Shape::Array { elem, len })
	}

	/// Channel carrying `elem`.
	pub fn channel(&mut self, elem: TypeId) -> Result<TypeId, SchemaError> {
		self.literal(Shape::Channel { elem })
	}

	/// Map from `key` to `value`. The key type must be comparable.
	pub fn map(&mut self, key: TypeId, value: TypeId) -> Result<TypeId, SchemaError> {
		self.def(key)?;
		if !self.is_comparable(key) {
			return Err(SchemaError::InvalidMapKey { key: self.display_name(key) });
		}
		self.literal(Shape::Map { key, value })
	}

	/// Reserve a named record so fields can refer to it before it is defined.
	pub fn declare_record(&mut self, name: &str) -> Result<TypeId, SchemaError> {
		self.insert_named(name, Shape::Declared)
	}

	/// Give a declared record its fields.
	pub fn define_record(&mut self, id: TypeId, fields: impl IntoIterator<Item = FieldDef>) -> Result<(), SchemaError> {
		let def = self.def(id)?;
		let name = self.display_name(id);
		match def.shape {
			Shape::Declared => {}
			Shape::Record { .. } if def.name.is_some() => return Err(SchemaError::RecordAlreadyDefined { name }),
			_ => return Err(SchemaError::NotADeclaredRecord { name }),
		}

		let fields: Vec<FieldDef> = fields.into_iter().collect();
		self.check_fields(&name, &fields)?;
		if let Some(field) = fields.iter().find(|field| self.contains_by_value(field.ty, id, &mut HashSet::new())) {
			return Err(SchemaError::RecursiveRecord {
				name,
				field: self.field_label(field),
			});
		}

		self.types[id.index()].shape = Shape::Record { fields };
		Ok(())
	}

	/// Declare and define a named record in one step.
	pub fn record(&mut self, name: &str, fields: impl IntoIterator<Item = FieldDef>) -> Result<TypeId, SchemaError> {
		let id = self.declare_record(name)?;
		if let Err(err) = self.define_record(id, fields) {
			self.types.pop();
			self.by_name.remove(name);
			return Err(err);
		}
		Ok(id)
	}

	/// Unnamed record type literal.
	pub fn anonymous_record(&mut self, fields: impl IntoIterator<Item = FieldDef>) -> Result<TypeId, SchemaError> {
		let fields: Vec<FieldDef> = fields.into_iter().collect();
		self.check_fields("struct", &fields)?;
		self.literal(Shape::Record { fields })
	}

	/// Fields of a defined record.
	pub fn record_fields(&self, id: TypeId) -> Option<&[FieldDef]> {
		match &self.get(id)?.shape {
			Shape::Record { fields } => Some(fields),
			_ => None,
		}
	}

	/// Human-readable type name (`structure`, `*subStruct`, `map[string]int`, ...).
	pub fn display_name(&self, id: TypeId) -> String {
		let Some(def) = self.get(id) else {
			return format!("<unknown#{}>", id.raw());
		};
		if let Some(name) = def.name() {
			return name.to_owned();
		}

		match &def.shape {
			Shape::Scalar(kind) => kind.as_str().to_owned(),
			Shape::Pointer { elem } => format!("*{}", self.display_name(*elem)),
			Shape::Sequence { elem } => format!("[]{}", self.display_name(*elem)),
			Shape::Array { elem, len } => format!("[{len}]{}", self.display_name(*elem)),
			Shape::Channel { elem } => format!("chan {}", self.display_name(*elem)),
			Shape::Map { key, value } => format!("map[{}]{}", self.display_name(*key), self.display_name(*value)),
			Shape::Record { fields } => {
				let parts: Vec<String> = fields
					.iter()
					.map(|field| match field.name.as_deref() {
						Some(name) => format!("{name} {}", self.display_name(field.ty)),
						None => self.display_name(field.ty),
					})
					.collect();
				if parts.is_empty() {
					"struct {}".to_owned()
				} else {
					format!("struct {{ {} }}", parts.join("; "))
				}
			}
			Shape::Declared => "<declared>".to_owned(),
		}
	}

	/// Label a field is addressed by: its name, or for embedded fields its type name without pointer stars.
	pub fn field_label(&self, field: &FieldDef) -> String {
		match field.name.as_deref() {
			Some(name) => name.to_owned(),
			None => self.display_name(field.ty).trim_start_matches('*').to_owned(),
		}
	}

	/// Name an embedded field of type `id` is addressed by: the type's own name, or the
	/// pointee's name for `*T`. Unnamed literals have none.
	pub fn embedded_name(&self, id: TypeId) -> Option<&str> {
		let def = self.get(id)?;
		match (def.name(), &def.shape) {
			(Some(name), _) => Some(name),
			(None, Shape::Pointer { elem }) => self.get(*elem)?.name(),
			(None, _) => None,
		}
	}

	/// Zero value of a type: what filtered-out fields are left holding.
	pub fn zero_value(&self, id: TypeId) -> Result<Value, SchemaError> {
		let def = self.def(id)?;
		match &def.shape {
			Shape::Scalar(kind) => Ok(kind.zero()),
			Shape::Pointer { .. } | Shape::Map { .. } | Shape::Sequence { .. } | Shape::Channel { .. } => Ok(Value::Nil),
			Shape::Array { elem, len } => {
				let item = self.zero_value(*elem)?;
				Ok(Value::Array(vec![item; *len]))
			}
			Shape::Record { fields } => {
				let mut out = Vec::with_capacity(fields.len());
				for field in fields {
					out.push(self.zero_value(field.ty)?);
				}
				Ok(Value::Record(out))
			}
			Shape::Declared => Err(SchemaError::UndefinedRecord { name: self.display_name(id) }),
		}
	}

	fn push(&mut self, def: TypeDef) -> TypeId {
		let id = TypeId(self.types.len() as u32);
		self.types.push(def);
		id
	}

	fn insert_named(&mut self, name: &str, shape: Shape) -> Result<TypeId, SchemaError> {
		if name.is_empty() {
			return Err(SchemaError::EmptyTypeName);
		}
		if self.by_name.contains_key(name) {
			return Err(SchemaError::DuplicateTypeName { name: name.to_owned() });
		}
		let name: Box<str> = Box::from(name);
		let id = self.push(TypeDef {
			name: Some(name.clone()),
			shape,
		});
		self.by_name.insert(name, id);
		Ok(id)
	}

	fn literal(&mut self, shape: Shape) -> Result<TypeId, SchemaError> {
		match &shape {
			Shape::Pointer { elem } | Shape::Sequence { elem } | Shape::Array { elem, .. } | Shape::Channel { elem } => {
				self.def(*elem)?;
			}
			Shape::Map { key, value } => {
				self.def(*key)?;
				self.def(*value)?;
			}
			Shape::Record { .. } | Shape::Scalar(_) | Shape::Declared => {}
		}

		if let Some(id) = self.literals.get(&shape) {
			return Ok(*id);
		}
		let id = self.push(TypeDef {
			name: None,
			shape: shape.clone(),
		});
		self.literals.insert(shape, id);
		Ok(id)
	}

	fn check_fields(&self, record: &str, fields: &[FieldDef]) -> Result<(), SchemaError> {
		let mut seen = HashSet::new();
		for field in fields {
			self.def(field.ty)?;
			let label = self.field_label(field);
			if !seen.insert(label.clone()) {
				return Err(SchemaError::DuplicateField {
					record: record.to_owned(),
					field: label,
				});
			}
		}
		Ok(())
	}

	/// Whether values of `id` embed a `target` by value (not behind a pointer, map, sequence, or channel).
	fn contains_by_value(&self, id: TypeId, target: TypeId, visiting: &mut HashSet<TypeId>) -> bool {
		if id == target {
			return true;
		}
		if !visiting.insert(id) {
			return false;
		}
		match self.get(id).map(|def| &def.shape) {
			Some(Shape::Record { fields }) => fields.iter().any(|field| self.contains_by_value(field.ty, target, visiting)),
			Some(Shape::Array { elem, .. }) => self.contains_by_value(*elem, target, visiting),
			_ => false,
		}
	}

	fn is_comparable(&self, id: TypeId) -> bool {
		match self.get(id).map(|def| &def.shape) {
			Some(Shape::Sequence { .. } | Shape::Map { .. }) | None => false,
			Some(Shape::Array { elem, .. }) => self.is_comparable(*elem),
			Some(Shape::Record { fields }) => fields.iter().all(|field| self.is_comparable(field.ty)),
			Some(Shape::Scalar(_) | Shape::Pointer { .. } | Shape::Channel { .. } | Shape::Declared) => true,
		}
	}
}
