use std::collections::BTreeSet;
use std::path::PathBuf;

use pubcopy::copy::{Filter, KeepAll, PublicOnly, TypeDef, Value, copy};

use crate::cmd::json::{decode_value, encode_value};
use crate::cmd::load::load_schema;
use crate::cmd::print::{PrintOptions, print_value};
use crate::cmd::util::{emit_json, read_json};
use crate::error::{CliError, Result};

#[derive(clap::Args)]
pub struct Args {
	/// Schema document describing the named types.
	pub schema: PathBuf,
	/// JSON value to copy.
	pub value: PathBuf,
	/// Type of the value, e.g. `structure` or `[]*Item`.
	#[arg(long = "type")]
	pub type_expr: String,
	/// Base filter: `public` keeps exported names only, `all` keeps everything.
	#[arg(long, default_value = "public")]
	pub filter: String,
	/// Extra field or embedded type names to drop.
	#[arg(long = "drop")]
	pub drop: Vec<String>,
	#[arg(long)]
	pub json: bool,
	#[arg(long = "max-depth")]
	pub max_depth: Option<u32>,
	#[arg(long = "max-items")]
	pub max_items: Option<usize>,
}

/// Base filter selected on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BaseFilter {
	Public,
	All,
}

impl BaseFilter {
	pub(crate) fn parse(name: &str) -> Result<Self> {
		match name {
			"public" => Ok(Self::Public),
			"all" => Ok(Self::All),
			_ => Err(CliError::UnknownFilter { name: name.to_owned() }),
		}
	}

	pub(crate) fn as_str(self) -> &'static str {
		match self {
			Self::Public => "public",
			Self::All => "all",
		}
	}
}

/// Base filter plus a deny-list of names.
pub(crate) struct CliFilter {
	base: Box<dyn Filter>,
	dropped: BTreeSet<String>,
}

impl CliFilter {
	pub(crate) fn new(base: BaseFilter, dropped: impl IntoIterator<Item = String>) -> Self {
		let base: Box<dyn Filter> = match base {
			BaseFilter::Public => Box::new(PublicOnly),
			BaseFilter::All => Box::new(KeepAll),
		};
		Self {
			base,
			dropped: dropped.into_iter().collect(),
		}
	}
}

impl Filter for CliFilter {
	fn keep_name(&self, name: &str) -> bool {
		!self.dropped.contains(name) && self.base.keep_name(name)
	}

	fn keep_type(&self, ty: &TypeDef) -> bool {
		match ty.name() {
			Some(name) if self.dropped.contains(name) => false,
			_ => self.base.keep_type(ty),
		}
	}
}

/// Load a schema and a value, copy the value through the selected filter, and print the copy.
pub fn run(args: Args) -> Result<()> {
	let Args {
		schema: schema_path,
		value: value_path,
		type_expr,
		filter,
		drop,
		json,
		max_depth,
		max_items,
	} = args;

	let base = BaseFilter::parse(&filter)?;
	let mut schema = load_schema(&schema_path)?;
	let ty = schema.resolve_expr(&type_expr)?;
	let ptr = schema.pointer(ty)?;

	let source = decode_value(&schema, ty, &read_json(&value_path)?)?;
	let filter = CliFilter::new(base, drop.iter().cloned());

	let mut destination = Value::pointer(schema.zero_value(ty)?);
	copy(&schema, &source, ty, &mut destination, ptr, &filter)?;
	let copied = match destination {
		Value::Pointer(inner) => *inner,
		other => other,
	};
	log::info!("copied {} with filter {}", schema.display_name(ty), base.as_str());

	if json {
		let payload = CopyJson {
			schema: schema_path.display().to_string(),
			type_name: schema.display_name(ty),
			filter: base.as_str(),
			dropped: drop,
			value: encode_value(&schema, ty, &copied)?,
		};
		return emit_json(&payload);
	}

	let mut print = PrintOptions::default();
	if let Some(max_depth) = max_depth {
		print.max_print_depth = max_depth;
	}
	if let Some(max_items) = max_items {
		print.max_items = max_items;
	}

	println!("schema: {}", schema_path.display());
	println!("type: {}", schema.display_name(ty));
	println!("filter: {}", base.as_str());
	if !drop.is_empty() {
		println!("dropped: {}", drop.join(", "));
	}
	println!("value:");
	print_value(&schema, ty, &copied, 2, print);

	Ok(())
}

#[derive(serde::Serialize)]
struct CopyJson {
	schema: String,
	#[serde(rename = "type")]
	type_name: String,
	filter: &'static str,
	dropped: Vec<String>,
	value: serde_json::Value,
}

#[cfg(test)]
mod tests;
