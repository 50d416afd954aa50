use std::path::PathBuf;
use std::process::{Command, Output};
use std::sync::OnceLock;

static PUBCOPY_BIN: OnceLock<PathBuf> = OnceLock::new();

pub(crate) use pubcopy_testkit::fixture_arg;

pub(crate) fn run_pubcopy(args: &[&str]) -> Output {
	Command::new(pubcopy_bin()).args(args).output().expect("pubcopy command executes")
}

pub(crate) fn run_pubcopy_json(args: &[&str]) -> serde_json::Value {
	let output = run_pubcopy(args);
	assert!(
		output.status.success(),
		"pubcopy command failed with status={}: {}",
		output.status,
		String::from_utf8_lossy(&output.stderr)
	);
	serde_json::from_slice(&output.stdout).expect("stdout should be valid json")
}

fn pubcopy_bin() -> &'static PathBuf {
	PUBCOPY_BIN.get_or_init(resolve_pubcopy_bin)
}

fn resolve_pubcopy_bin() -> PathBuf {
	if let Ok(path) = std::env::var("CARGO_BIN_EXE_pubcopy") {
		return PathBuf::from(path);
	}

	let mut bin = pubcopy_testkit::target_dir().join("debug");
	bin.push(if cfg!(windows) { "pubcopy.exe" } else { "pubcopy" });

	let status = Command::new("cargo")
		.current_dir(pubcopy_testkit::workspace_root())
		.args(["build", "--quiet", "--bin", "pubcopy"])
		.status()
		.expect("cargo build executes");
	assert!(status.success(), "failed to build pubcopy binary at {}", bin.display());

	bin
}
