use crate::cmd::test_support::{fixture_arg, run_pubcopy, run_pubcopy_json};

#[test]
fn types_json_lists_named_and_interned_types() {
	let schema = fixture_arg("structure.schema.json");
	let json = run_pubcopy_json(&["types", &schema, "--json"]);

	let types = json["types"].as_array().expect("types array");
	let names: Vec<&str> = types.iter().filter_map(|row| row["name"].as_str()).collect();
	assert!(names.contains(&"structure"));
	assert!(names.contains(&"map[string]subStruct"));
	assert!(names.contains(&"int"), "predeclared scalars are listed");
}

#[test]
fn type_detail_reports_public_filter_decisions() {
	let schema = fixture_arg("structure.schema.json");
	let json = run_pubcopy_json(&["types", &schema, "--type", "structure", "--json"]);

	assert_eq!(json["type"], "structure");
	assert_eq!(json["shape"], "record");
	assert_eq!(json["exported"], false);

	let fields = json["fields"].as_array().expect("record fields");
	assert_eq!(fields.len(), 11);
	assert_eq!(fields[0]["label"], "subStruct");
	assert_eq!(fields[0]["embedded"], true);
	assert_eq!(fields[0]["kept_by_public"], false);
	assert_eq!(fields[1]["label"], "Hidden");
	assert_eq!(fields[1]["kept_by_public"], true);
	assert_eq!(fields[7]["label"], "hiddenValue");
	assert_eq!(fields[7]["kept_by_public"], false);
}

#[test]
fn unknown_type_is_an_error() {
	let schema = fixture_arg("structure.schema.json");
	let output = run_pubcopy(&["types", &schema, "--type", "Missing"]);

	assert!(!output.status.success());
	assert!(String::from_utf8_lossy(&output.stderr).contains("error: type not found: Missing"));
}
