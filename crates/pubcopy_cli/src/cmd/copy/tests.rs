use pubcopy::copy::{Filter, PublicOnly, ScalarKind, Schema};

use super::{BaseFilter, CliFilter};
use crate::cmd::test_support::{fixture_arg, run_pubcopy, run_pubcopy_json};

#[test]
fn drop_list_narrows_the_base_filter() {
	let mut schema = Schema::new();
	let int = schema.scalar(ScalarKind::Int);
	let seconds = schema.define_scalar("Seconds", ScalarKind::Int).expect("named scalar");
	let seq = schema.sequence(int).expect("sequence");

	let filter = CliFilter::new(BaseFilter::All, ["Secret".to_owned(), "Seconds".to_owned()]);
	assert!(filter.keep_name("hidden"));
	assert!(!filter.keep_name("Secret"));
	assert!(!filter.keep_type(schema.def(seconds).expect("registered")));
	assert!(filter.keep_type(schema.def(seq).expect("registered")), "unnamed types always pass");

	let public = CliFilter::new(BaseFilter::Public, Vec::new());
	assert_eq!(public.keep_name("hidden"), PublicOnly.keep_name("hidden"));
}

#[test]
fn unknown_filter_name_is_rejected() {
	assert!(BaseFilter::parse("everything").is_err());
	assert_eq!(BaseFilter::parse("all").expect("known filter"), BaseFilter::All);
}

#[test]
fn copy_json_output_matches_public_structure() {
	let schema = fixture_arg("structure.schema.json");
	let value = fixture_arg("structure.value.json");
	let json = run_pubcopy_json(&["copy", &schema, &value, "--type", "structure", "--json"]);

	assert_eq!(json["type"], "structure");
	assert_eq!(json["filter"], "public");

	let copied = &json["value"];
	assert_eq!(copied["subStruct"]["Name"], "");
	assert_eq!(copied["Hidden"]["Value"], "actually visible");
	assert_eq!(copied["Another"]["hidden"], "");
	assert_eq!(copied["AnotherPtr"]["Name"], "name");
	assert_eq!(copied["another"]["Value"], "");
	assert_eq!(copied["Pointer"], 4);
	assert_eq!(copied["hiddenValue"], 0);
	assert_eq!(copied["Items"][0]["Value"], "value");
	assert_eq!(copied["Items"][0]["hidden"], "");
	assert_eq!(copied["Map"]["key"]["hidden"], "");
}

#[test]
fn keep_all_with_drop_list_removes_only_named_fields() {
	let schema = fixture_arg("structure.schema.json");
	let value = fixture_arg("structure.value.json");
	let json = run_pubcopy_json(&[
		"copy", &schema, &value, "--type", "structure", "--filter", "all", "--drop", "Map", "--drop", "Hidden", "--json",
	]);

	let copied = &json["value"];
	assert_eq!(copied["subStruct"]["hidden"], "hidden");
	assert_eq!(copied["hiddenValue"], 12);
	assert!(copied["Map"].is_null(), "dropped map is left nil");
	assert_eq!(copied["Hidden"]["Value"], "", "dropped embedded type is zeroed");
}

#[test]
fn exported_channel_fails_and_reports_the_chain() {
	let schema = fixture_arg("worker.schema.json");
	let value = fixture_arg("worker.value.json");
	let output = run_pubcopy(&["copy", &schema, &value, "--type", "Pool"]);

	assert!(!output.status.success(), "channel copy must fail");
	let stderr = String::from_utf8_lossy(&output.stderr);
	assert!(
		stderr.contains("error: field Workers of Pool: copying slice []Worker element 0: field Jobs of Worker: unsupported type chan int"),
		"unexpected stderr: {stderr}"
	);
}

#[test]
fn dropping_the_channel_lets_the_copy_succeed() {
	let schema = fixture_arg("worker.schema.json");
	let value = fixture_arg("worker.value.json");
	let json = run_pubcopy_json(&["copy", &schema, &value, "--type", "Pool", "--drop", "Jobs", "--json"]);

	assert_eq!(json["type"], "Pool");
	assert_eq!(json["value"]["Workers"][0]["ID"], 1);
	assert!(json["value"]["Workers"][0]["Jobs"].is_null());
	assert!(json["value"]["Workers"][0]["queue"].is_null());
}

#[test]
fn text_output_lists_header_and_tree() {
	let schema = fixture_arg("structure.schema.json");
	let value = fixture_arg("structure.value.json");
	let output = run_pubcopy(&["copy", &schema, &value, "--type", "*structure"]);

	assert!(output.status.success(), "copy of a pointer type succeeds");
	let stdout = String::from_utf8_lossy(&output.stdout);
	assert!(stdout.contains("type: *structure"));
	assert!(stdout.contains("filter: public"));
	assert!(stdout.contains("Value = \"actually visible\""));
}
