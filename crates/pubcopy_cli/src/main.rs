#![allow(missing_docs)]

use clap::{Parser, Subcommand};

mod cmd;
mod error;

#[derive(Parser)]
#[command(name = "pubcopy", about = "Filtered deep copies of schema-typed JSON values")]
struct Cli {
	#[command(subcommand)]
	command: Commands,
}

#[derive(Subcommand)]
enum Commands {
	/// Copy a value, keeping only the fields the filter allows.
	Copy(cmd::copy::Args),
	/// Inspect the types of a schema document.
	Types(cmd::types::Args),
}

fn main() {
	env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

	if let Err(err) = run() {
		eprintln!("error: {err}");
		std::process::exit(1);
	}
}

fn run() -> error::Result<()> {
	let cli = Cli::parse();

	match cli.command {
		Commands::Copy(args) => cmd::copy::run(args),
		Commands::Types(args) => cmd::types::run(args),
	}
}
