use std::path::PathBuf;

use pubcopy::copy::{Filter, PublicOnly, Schema, TypeId, keeps_field};

use crate::cmd::load::load_schema;
use crate::cmd::util::emit_json;
use crate::error::Result;

#[derive(clap::Args)]
pub struct Args {
	/// Schema document describing the named types.
	pub schema: PathBuf,
	/// Show one type expression in detail instead of listing the registry.
	#[arg(long = "type")]
	pub type_expr: Option<String>,
	#[arg(long)]
	pub json: bool,
}

/// List registered types, or describe one type and how `PublicOnly` treats its fields.
pub fn run(args: Args) -> Result<()> {
	let Args { schema: path, type_expr, json } = args;
	let mut schema = load_schema(&path)?;

	let Some(type_expr) = type_expr else {
		let rows: Vec<TypeRowJson> = schema
			.iter()
			.map(|(id, def)| TypeRowJson {
				id: id.raw(),
				name: schema.display_name(id),
				shape: def.shape.category(),
			})
			.collect();

		if json {
			return emit_json(&TypesJson {
				schema: path.display().to_string(),
				types: rows,
			});
		}

		println!("schema: {}", path.display());
		println!("types: {}", rows.len());
		for row in &rows {
			println!("  {:>3} {} ({})", row.id, row.name, row.shape);
		}
		return Ok(());
	};

	let ty = schema.resolve_expr(&type_expr)?;
	let detail = describe(&schema, ty)?;

	if json {
		return emit_json(&detail);
	}

	println!("type: {}", detail.type_name);
	println!("shape: {}", detail.shape);
	println!("exported: {}", if detail.exported { "yes" } else { "no" });
	if let Some(fields) = &detail.fields {
		println!("fields: {}", fields.len());
		for field in fields {
			let embedded = if field.embedded { " (embedded)" } else { "" };
			let kept = if field.kept_by_public { "keep" } else { "drop" };
			println!("  {} {}{embedded} [{kept}]", field.label, field.type_name);
		}
	}
	Ok(())
}

fn describe(schema: &Schema, ty: TypeId) -> Result<TypeDetailJson> {
	let def = schema.def(ty)?;
	let fields = schema.record_fields(ty).map(|fields| {
		fields
			.iter()
			.map(|field| FieldRowJson {
				label: schema.field_label(field),
				type_name: schema.display_name(field.ty),
				embedded: field.is_embedded(),
				kept_by_public: keeps_field(schema, field, &PublicOnly).unwrap_or(false),
			})
			.collect()
	});

	Ok(TypeDetailJson {
		type_name: schema.display_name(ty),
		shape: def.shape.category(),
		exported: PublicOnly.keep_type(def),
		fields,
	})
}

#[derive(serde::Serialize)]
struct TypesJson {
	schema: String,
	types: Vec<TypeRowJson>,
}

#[derive(serde::Serialize)]
struct TypeRowJson {
	id: u32,
	name: String,
	shape: &'static str,
}

#[derive(serde::Serialize)]
struct TypeDetailJson {
	#[serde(rename = "type")]
	type_name: String,
	shape: &'static str,
	exported: bool,
	#[serde(skip_serializing_if = "Option::is_none")]
	fields: Option<Vec<FieldRowJson>>,
}

#[derive(serde::Serialize)]
struct FieldRowJson {
	label: String,
	#[serde(rename = "type")]
	type_name: String,
	embedded: bool,
	kept_by_public: bool,
}

#[cfg(test)]
mod tests;
