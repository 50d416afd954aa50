use std::path::PathBuf;

use pubcopy::copy::{CopyError, SchemaError};
use thiserror::Error;

/// CLI result type.
pub type Result<T> = std::result::Result<T, CliError>;

/// Failures surfaced by `pubcopy` subcommands.
#[derive(Debug, Error)]
pub enum CliError {
	#[error("failed to read {path}: {source}")]
	Io {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},
	#[error("invalid json in {path}: {source}")]
	Json {
		path: PathBuf,
		#[source]
		source: serde_json::Error,
	},
	#[error("failed to render json output: {0}")]
	Render(#[source] serde_json::Error),
	#[error("schema type {name}: {detail}")]
	SchemaFile { name: String, detail: String },
	#[error(transparent)]
	Schema(#[from] SchemaError),
	#[error(transparent)]
	Copy(#[from] CopyError),
	#[error("invalid value at {at}: {detail}")]
	Decode { at: String, detail: String },
	#[error("cannot encode {type_name} value: {detail}")]
	Encode { type_name: String, detail: String },
	#[error("unknown filter: {name} (expected public or all)")]
	UnknownFilter { name: String },
}
