//! filter-check binary.
//!
//! Validates an RSQL filter against a type described in a JSON schema file.
//! Exits with 0 when the filter is valid, 1 when it is not and 2 on usage or
//! configuration errors.

use std::{path::PathBuf, process::ExitCode};

use anyhow::Context;
use clap::{Parser, ValueEnum};
use rsql_filter_validator::{
	FilterValidator, MessageCatalog, NestedContextPolicy, ValidationOutcome, ValidatorConfig,
};
use tracing_subscriber::EnvFilter;

/// Checks that an RSQL filter only references fields of a schema type.
#[derive(Parser, Debug)]
#[command(name = "filter-check", version, about, long_about = None)]
struct Cli {
	/// JSON file with the schema definitions
	#[arg(long, value_name = "FILE")]
	schema: PathBuf,

	/// Type the filter is checked against
	#[arg(long = "type", value_name = "NAME")]
	type_name: String,

	/// Type reported for unknown fields inside a nested object
	#[arg(long, value_enum, default_value_t = NestedContext::Root)]
	nested_context: NestedContext,

	/// JSON file overriding the default message templates
	#[arg(long, value_name = "FILE")]
	messages: Option<PathBuf>,

	/// Filter to validate, e.g. "age==12 and address.city==Liege"
	filter: String,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum NestedContext {
	Root,
	Nested,
}

impl From<NestedContext> for NestedContextPolicy {
	fn from(context: NestedContext) -> Self {
		match context {
			NestedContext::Root => NestedContextPolicy::RootType,
			NestedContext::Nested => NestedContextPolicy::NestedType,
		}
	}
}

fn run(cli: Cli) -> anyhow::Result<bool> {
	let catalog = match &cli.messages {
		Some(path) => {
			let json = std::fs::read_to_string(path)
				.with_context(|| format!("failed to read {}", path.display()))?;
			MessageCatalog::from_json_str(&json)
				.with_context(|| format!("failed to parse {}", path.display()))?
		}
		None => MessageCatalog::default(),
	};

	let validator = FilterValidator::from_schema_file(&cli.schema)
		.with_context(|| format!("failed to load schemas from {}", cli.schema.display()))?
		.with_config(ValidatorConfig::default().with_nested_context(cli.nested_context.into()));

	match validator.check(&cli.filter, &cli.type_name)? {
		ValidationOutcome::Valid => {
			println!("valid");
			Ok(true)
		}
		ValidationOutcome::Invalid(violation) => {
			println!("{}", catalog.render(&violation));
			Ok(false)
		}
	}
}

fn main() -> ExitCode {
	// clap exits with status 2 on usage errors
	let cli = Cli::parse();

	tracing_subscriber::fmt()
		.with_env_filter(
			EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
		)
		.with_writer(std::io::stderr)
		.init();

	match run(cli) {
		Ok(true) => ExitCode::SUCCESS,
		Ok(false) => ExitCode::from(1),
		Err(err) => {
			eprintln!("error: {err:#}");
			ExitCode::from(2)
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use clap::{error::ErrorKind, CommandFactory};

	#[test]
	fn test_cli_definition() {
		Cli::command().debug_assert();
	}

	#[test]
	fn test_parse_cli() {
		let cli = Cli::try_parse_from([
			"filter-check",
			"--schema",
			"schemas.json",
			"--type",
			"Employee",
			"--nested-context",
			"nested",
			"age==12",
		])
		.unwrap();
		assert_eq!(cli.schema, PathBuf::from("schemas.json"));
		assert_eq!(cli.type_name, "Employee");
		assert_eq!(
			NestedContextPolicy::from(cli.nested_context),
			NestedContextPolicy::NestedType
		);
		assert_eq!(cli.messages, None);
		assert_eq!(cli.filter, "age==12");
	}

	#[test]
	fn test_parse_cli_defaults_to_root_context() {
		let cli =
			Cli::try_parse_from(["filter-check", "--schema", "s.json", "--type", "E", "a==1"]).unwrap();
		assert_eq!(
			NestedContextPolicy::from(cli.nested_context),
			NestedContextPolicy::RootType
		);
	}

	#[test]
	fn test_parse_cli_errors() {
		let kind = |args: &[&str]| Cli::try_parse_from(args).unwrap_err().kind();

		assert_eq!(
			kind(&["filter-check", "--type", "Employee", "a==1"]),
			ErrorKind::MissingRequiredArgument
		);
		assert_eq!(
			kind(&["filter-check", "--schema", "s.json", "--type", "Employee"]),
			ErrorKind::MissingRequiredArgument
		);
		assert_eq!(
			kind(&["filter-check", "--schema", "s.json", "--type", "E", "--verbose", "a==1"]),
			ErrorKind::UnknownArgument
		);
		assert_eq!(
			kind(&["filter-check", "--schema", "s.json", "--type", "E", "a==1", "b==2"]),
			ErrorKind::UnknownArgument
		);
		assert_eq!(
			kind(&[
				"filter-check",
				"--schema",
				"s.json",
				"--type",
				"E",
				"--nested-context",
				"parent",
				"a==1"
			]),
			ErrorKind::InvalidValue
		);
		assert_eq!(kind(&["filter-check", "--help"]), ErrorKind::DisplayHelp);
		assert_eq!(kind(&["filter-check", "--version"]), ErrorKind::DisplayVersion);
	}

	#[test]
	fn test_parse_cli_accepts_blank_filter() {
		let cli =
			Cli::try_parse_from(["filter-check", "--schema", "s.json", "--type", "E", ""]).unwrap();
		assert_eq!(cli.filter, "");
	}
}
