use std::fmt::Write as _;

use pubcopy::copy::{Schema, Shape, TypeId, Value};

use crate::cmd::util::truncate;

/// Output truncation and formatting limits for value trees.
#[derive(Debug, Clone, Copy)]
pub struct PrintOptions {
	/// Maximum number of fields printed for a single record.
	pub max_fields_per_record: usize,
	/// Maximum number of Unicode scalar values printed for strings.
	pub max_string_len: usize,
	/// Maximum number of elements or entries printed for collections.
	pub max_items: usize,
	/// Maximum nesting depth before collections are summarised.
	pub max_print_depth: u32,
}

impl Default for PrintOptions {
	fn default() -> Self {
		Self {
			max_fields_per_record: 80,
			max_string_len: 200,
			max_items: 16,
			max_print_depth: 8,
		}
	}
}

/// Print one value tree to stdout.
pub fn print_value(schema: &Schema, ty: TypeId, value: &Value, indent: usize, options: PrintOptions) {
	let mut out = String::new();
	render_value(&mut out, schema, ty, value, indent, 0, options);
	print!("{out}");
}

/// Render one value tree as indented text, one node per line.
pub fn render_value(out: &mut String, schema: &Schema, ty: TypeId, value: &Value, indent: usize, depth: u32, options: PrintOptions) {
	let pad = " ".repeat(indent);
	let Some(def) = schema.get(ty) else {
		let _ = writeln!(out, "{pad}<unknown type>");
		return;
	};

	match (&def.shape, value) {
		(Shape::Pointer { elem }, Value::Pointer(inner)) => {
			render_value(out, schema, *elem, inner, indent, depth, options);
		}
		(Shape::Record { fields }, Value::Record(items)) => {
			let type_name = schema.display_name(ty);
			if depth >= options.max_print_depth {
				let _ = writeln!(out, "{pad}{type_name} {{ ... }}");
				return;
			}
			let _ = writeln!(out, "{pad}{type_name} {{");
			for (field, item) in fields.iter().zip(items).take(options.max_fields_per_record) {
				let _ = write!(out, "{pad}  {} = ", schema.field_label(field));
				if is_nested(schema, field.ty, item) {
					out.push('\n');
					render_value(out, schema, field.ty, item, indent + 4, depth + 1, options);
				} else {
					render_value(out, schema, field.ty, item, 0, depth + 1, options);
				}
			}
			if fields.len() > options.max_fields_per_record {
				let _ = writeln!(out, "{pad}  ... {} more fields", fields.len() - options.max_fields_per_record);
			}
			let _ = writeln!(out, "{pad}}}");
		}
		(Shape::Map { key, value: value_ty }, Value::Map(entries)) => {
			if depth >= options.max_print_depth {
				let _ = writeln!(out, "{pad}{{... {} entries}}", entries.len());
				return;
			}
			let _ = writeln!(out, "{pad}{{");
			for entry in entries.iter().take(options.max_items) {
				let _ = write!(out, "{pad}  {} => ", inline_key(schema, *key, &entry.key, options));
				if is_nested(schema, *value_ty, &entry.value) {
					out.push('\n');
					render_value(out, schema, *value_ty, &entry.value, indent + 4, depth + 1, options);
				} else {
					render_value(out, schema, *value_ty, &entry.value, 0, depth + 1, options);
				}
			}
			if entries.len() > options.max_items {
				let _ = writeln!(out, "{pad}  ... {} more", entries.len() - options.max_items);
			}
			let _ = writeln!(out, "{pad}}}");
		}
		(Shape::Sequence { elem } | Shape::Array { elem, .. }, Value::Sequence(items) | Value::Array(items)) => {
			if depth >= options.max_print_depth {
				let _ = writeln!(out, "{pad}[... {} items]", items.len());
				return;
			}
			let _ = writeln!(out, "{pad}[");
			for item in items.iter().take(options.max_items) {
				render_value(out, schema, *elem, item, indent + 2, depth + 1, options);
			}
			if items.len() > options.max_items {
				let _ = writeln!(out, "{pad}  ... {} more", items.len() - options.max_items);
			}
			let _ = writeln!(out, "{pad}]");
		}
		_ => {
			let _ = writeln!(out, "{pad}{}", render_leaf(value, options));
		}
	}
}

fn is_nested(schema: &Schema, ty: TypeId, value: &Value) -> bool {
	match (schema.get(ty).map(|def| &def.shape), value) {
		(Some(Shape::Pointer { elem }), Value::Pointer(inner)) => is_nested(schema, *elem, inner),
		(Some(Shape::Record { .. }), Value::Record(_))
		| (Some(Shape::Map { .. }), Value::Map(_))
		| (Some(Shape::Sequence { .. } | Shape::Array { .. }), Value::Sequence(_) | Value::Array(_)) => true,
		_ => false,
	}
}

fn inline_key(schema: &Schema, ty: TypeId, key: &Value, options: PrintOptions) -> String {
	if is_nested(schema, ty, key) {
		let mut out = String::new();
		render_value(&mut out, schema, ty, key, 0, options.max_print_depth, options);
		return out.trim_end().to_owned();
	}
	render_leaf(key, options)
}

fn render_leaf(value: &Value, options: PrintOptions) -> String {
	match value {
		Value::Nil => "nil".to_owned(),
		Value::String(v) => format!("\"{}\"", truncate(v, options.max_string_len)),
		Value::Channel(v) => format!("chan#{v}"),
		Value::Pointer(inner) => format!("&{}", render_leaf(inner, options)),
		other => other.brief(),
	}
}
