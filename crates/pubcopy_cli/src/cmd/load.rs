use std::path::Path;

use pubcopy::copy::{FieldDef, ScalarKind, Schema};
use serde::Deserialize;

use crate::cmd::util::read_json_as;
use crate::error::{CliError, Result};

/// On-disk schema document.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct SchemaFile {
	pub types: Vec<TypeEntry>,
}

/// One named type of a schema document.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct TypeEntry {
	pub name: String,
	pub kind: TypeKind,
	#[serde(default)]
	pub fields: Vec<FieldEntry>,
	#[serde(default)]
	pub scalar: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum TypeKind {
	Record,
	Scalar,
}

/// Record field; a missing name marks an embedded field.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct FieldEntry {
	#[serde(default)]
	pub name: Option<String>,
	#[serde(rename = "type")]
	pub ty: String,
}

/// Load a schema document from disk.
pub(crate) fn load_schema(path: &Path) -> Result<Schema> {
	let file: SchemaFile = read_json_as(path)?;
	build_schema(&file)
}

/// Register every type of `file`.
///
/// Names are declared before any record body is resolved, so fields may refer
/// to types that appear later in the document.
pub(crate) fn build_schema(file: &SchemaFile) -> Result<Schema> {
	let mut schema = Schema::new();
	let mut records = Vec::new();

	for entry in &file.types {
		match entry.kind {
			TypeKind::Record => {
				if entry.scalar.is_some() {
					return Err(schema_file_error(&entry.name, "records do not take a scalar kind"));
				}
				records.push((schema.declare_record(&entry.name)?, entry));
			}
			TypeKind::Scalar => {
				if !entry.fields.is_empty() {
					return Err(schema_file_error(&entry.name, "scalars do not take fields"));
				}
				let base = entry
					.scalar
					.as_deref()
					.ok_or_else(|| schema_file_error(&entry.name, "scalar type needs a \"scalar\" kind"))?;
				let kind = ScalarKind::from_name(base).ok_or_else(|| schema_file_error(&entry.name, &format!("unknown scalar kind {base}")))?;
				schema.define_scalar(&entry.name, kind)?;
			}
		}
	}

	for (id, entry) in records {
		let mut fields = Vec::with_capacity(entry.fields.len());
		for field in &entry.fields {
			let ty = schema.resolve_expr(&field.ty)?;
			fields.push(match field.name.as_deref() {
				Some(name) => FieldDef::named(name, ty),
				None => FieldDef::embedded(ty),
			});
		}
		schema.define_record(id, fields)?;
		log::debug!("defined record {} with {} fields", entry.name, entry.fields.len());
	}

	Ok(schema)
}

fn schema_file_error(name: &str, detail: &str) -> CliError {
	CliError::SchemaFile {
		name: name.to_owned(),
		detail: detail.to_owned(),
	}
}
