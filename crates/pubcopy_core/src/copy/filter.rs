use crate::copy::{FieldDef, Schema, SchemaError, TypeDef};

/// Decides which record fields survive a copy.
///
/// Named fields are judged by [`Filter::keep_name`]; embedded fields have no name of
/// their own and are judged by [`Filter::keep_type`] on the embedded type.
pub trait Filter {
	/// Whether a named field should be copied.
	fn keep_name(&self, name: &str) -> bool;

	/// Whether an embedded field of this type should be copied.
	///
	/// Implementations must return `true` for unnamed types so type literals are
	/// never dropped just for lacking a name.
	fn keep_type(&self, ty: &TypeDef) -> bool;
}

impl<F: Filter + ?Sized> Filter for &F {
	fn keep_name(&self, name: &str) -> bool {
		(**self).keep_name(name)
	}

	fn keep_type(&self, ty: &TypeDef) -> bool {
		(**self).keep_type(ty)
	}
}

impl<F: Filter + ?Sized> Filter for Box<F> {
	fn keep_name(&self, name: &str) -> bool {
		(**self).keep_name(name)
	}

	fn keep_type(&self, ty: &TypeDef) -> bool {
		(**self).keep_type(ty)
	}
}

/// Filter built from a single name predicate, applied to field names and type names alike.
#[derive(Debug, Clone, Copy)]
pub struct NameFilter<P>(pub P);

impl<P> Filter for NameFilter<P>
where
	P: Fn(&str) -> bool,
{
	fn keep_name(&self, name: &str) -> bool {
		(self.0)(name)
	}

	fn keep_type(&self, ty: &TypeDef) -> bool {
		match ty.name() {
			Some(name) if !name.is_empty() => (self.0)(name),
			_ => true,
		}
	}
}

/// Keeps exported identifiers only (see [`is_exported`]).
#[derive(Debug, Clone, Copy, Default)]
pub struct PublicOnly;

impl Filter for PublicOnly {
	fn keep_name(&self, name: &str) -> bool {
		NameFilter(is_exported).keep_name(name)
	}

	fn keep_type(&self, ty: &TypeDef) -> bool {
		NameFilter(is_exported).keep_type(ty)
	}
}

/// Keeps everything; the copy is a plain deep copy.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeepAll;

impl Filter for KeepAll {
	fn keep_name(&self, _name: &str) -> bool {
		true
	}

	fn keep_type(&self, _ty: &TypeDef) -> bool {
		true
	}
}

/// An identifier is exported when its first character is an uppercase letter. Empty names are not.
pub fn is_exported(name: &str) -> bool {
	name.chars().next().is_some_and(char::is_uppercase)
}

/// Whether `filter` keeps `field` of a record.
///
/// Named fields are judged by their name. An embedded field must pass
/// [`Filter::keep_type`] and, when it embeds a named type `T` or `*T`, also
/// [`Filter::keep_name`] on `T`: the embedded field is addressed by that name.
pub fn keeps_field<F: Filter + ?Sized>(schema: &Schema, field: &FieldDef, filter: &F) -> Result<bool, SchemaError> {
	match field.name.as_deref() {
		Some(name) => Ok(filter.keep_name(name)),
		None => {
			if !filter.keep_type(schema.def(field.ty)?) {
				return Ok(false);
			}
			Ok(schema.embedded_name(field.ty).is_none_or(|name| filter.keep_name(name)))
		}
	}
}

#[cfg(test)]
mod tests {
	use super::{Filter, KeepAll, NameFilter, PublicOnly, is_exported, keeps_field};
	use crate::copy::{FieldDef, ScalarKind, Schema};

	#[test]
	fn exported_needs_leading_uppercase() {
		assert!(is_exported("Name"));
		assert!(is_exported("Ärger"));
		assert!(!is_exported("hidden"));
		assert!(!is_exported("_Name"));
		assert!(!is_exported(""));
	}

	#[test]
	fn public_only_judges_types_by_name() {
		let mut schema = Schema::new();
		let string = schema.scalar(ScalarKind::String);
		let hidden = schema.record("Hidden", [FieldDef::named("Value", string)]).expect("record defines");
		let sub = schema.record("subStruct", [FieldDef::named("Name", string)]).expect("record defines");
		let sub_ptr = schema.pointer(sub).expect("pointer type");
		let anon = schema.anonymous_record([FieldDef::named("x", string)]).expect("anonymous record");

		assert!(PublicOnly.keep_type(schema.def(hidden).expect("registered")));
		assert!(!PublicOnly.keep_type(schema.def(sub).expect("registered")));
		assert!(PublicOnly.keep_type(schema.def(sub_ptr).expect("registered")), "unnamed pointer type passes");
		assert!(PublicOnly.keep_type(schema.def(anon).expect("registered")), "anonymous record passes");
		assert!(!PublicOnly.keep_type(schema.def(string).expect("registered")), "predeclared names are lowercase");
	}

	#[test]
	fn name_filter_wraps_a_predicate() {
		let filter = NameFilter(|name: &str| name != "Secret");
		assert!(filter.keep_name("Public"));
		assert!(!filter.keep_name("Secret"));

		let boxed: Box<dyn Filter> = Box::new(filter);
		assert!(!boxed.keep_name("Secret"));
		assert!((&KeepAll).keep_name("anything"));
	}

	#[test]
	fn embedded_pointer_is_judged_by_its_pointee_name() {
		let mut schema = Schema::new();
		let string = schema.scalar(ScalarKind::String);
		let hidden = schema.record("Hidden", [FieldDef::named("Value", string)]).expect("record defines");
		let sub = schema.record("subStruct", [FieldDef::named("Name", string)]).expect("record defines");
		let hidden_ptr = schema.pointer(hidden).expect("pointer type");
		let sub_ptr = schema.pointer(sub).expect("pointer type");
		let anon = schema.anonymous_record([FieldDef::named("x", string)]).expect("anonymous record");

		let keeps = |field: FieldDef| keeps_field(&schema, &field, &PublicOnly).expect("known type");
		assert!(!keeps(FieldDef::embedded(sub_ptr)), "embedded *subStruct is unexported");
		assert!(!keeps(FieldDef::embedded(sub)));
		assert!(keeps(FieldDef::embedded(hidden_ptr)));
		assert!(keeps(FieldDef::embedded(anon)), "anonymous records have no name to reject");
		assert!(keeps(FieldDef::named("Other", sub_ptr)), "named fields ignore their type");
		assert!(keeps_field(&schema, &FieldDef::embedded(sub_ptr), &KeepAll).expect("known type"));
	}
}
