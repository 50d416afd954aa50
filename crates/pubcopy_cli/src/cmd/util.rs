use std::path::Path;

use crate::error::{CliError, Result};

/// Read a file and parse it as JSON.
pub(crate) fn read_json(path: &Path) -> Result<serde_json::Value> {
	read_json_as(path)
}

/// Read a file and deserialize it into `T`.
pub(crate) fn read_json_as<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
	let bytes = std::fs::read(path).map_err(|source| CliError::Io {
		path: path.to_path_buf(),
		source,
	})?;
	serde_json::from_slice(&bytes).map_err(|source| CliError::Json {
		path: path.to_path_buf(),
		source,
	})
}

/// Print a serializable payload as pretty JSON on stdout.
pub(crate) fn emit_json<T: serde::Serialize>(payload: &T) -> Result<()> {
	let text = serde_json::to_string_pretty(payload).map_err(CliError::Render)?;
	println!("{text}");
	Ok(())
}

/// Shorten `input` to `max_len` characters, marking the cut.
pub(crate) fn truncate(input: &str, max_len: usize) -> String {
	if input.chars().count() <= max_len {
		return input.to_owned();
	}
	let out: String = input.chars().take(max_len).collect();
	format!("{out}...")
}

#[cfg(test)]
mod tests {
	use super::truncate;

	#[test]
	fn truncate_counts_characters_not_bytes() {
		assert_eq!(truncate("héllo", 5), "héllo");
		assert_eq!(truncate("héllo", 2), "hé...");
	}
}
