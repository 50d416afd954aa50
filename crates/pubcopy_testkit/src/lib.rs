//! Shared test helpers for workspace crates.

use std::path::{Path, PathBuf};

/// Resolve the workspace root path.
pub fn workspace_root() -> PathBuf {
	let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
	manifest_dir
		.join("..")
		.join("..")
		.canonicalize()
		.unwrap_or_else(|_| manifest_dir.join("..").join(".."))
}

/// Resolve a fixture path under `<workspace>/fixtures`.
pub fn fixture_path(name: &str) -> PathBuf {
	workspace_root().join("fixtures").join(name)
}

/// Fixture path rendered as an owned argument string.
pub fn fixture_arg(name: &str) -> String {
	fixture_path(name).to_string_lossy().into_owned()
}

/// Resolve the workspace target directory.
pub fn target_dir() -> PathBuf {
	std::env::var_os("CARGO_TARGET_DIR")
		.map(PathBuf::from)
		.unwrap_or_else(|| workspace_root().join("target"))
}

/// Read and parse a JSON fixture.
///
/// Panics with the fixture name when the file is missing or malformed.
pub fn read_fixture_json(name: &str) -> serde_json::Value {
	let path = fixture_path(name);
	let bytes = std::fs::read(&path).unwrap_or_else(|err| panic!("fixture {} should be readable: {err}", path.display()));
	serde_json::from_slice(&bytes).unwrap_or_else(|err| panic!("fixture {} should be valid json: {err}", path.display()))
}
