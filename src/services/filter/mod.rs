//! Filter validation service.
//!
//! Entry point for checking RSQL filter strings before they are handed to a
//! query layer:
//! - Blank filters are accepted as they are
//! - Malformed filters are reported as syntax violations
//! - Well-formed filters have every selector checked against the target schema

use std::path::Path;

mod error;
pub mod expression;
mod validation;

use crate::{
	models::{FilterTarget, SchemaDescriptor, ValidationOutcome, ValidatorConfig, Violation},
	services::schema::{SchemaProvider, SchemaRegistry},
};

pub use error::FilterError;
pub use validation::{validate, validate_with_config, validate_with_provider};

/// Checks a filter string against a schema with the default configuration
pub fn check_filter(filter_text: &str, schema: &SchemaDescriptor) -> ValidationOutcome {
	check_filter_with_config(filter_text, schema, &ValidatorConfig::default())
}

pub fn check_filter_with_config(
	filter_text: &str,
	schema: &SchemaDescriptor,
	config: &ValidatorConfig,
) -> ValidationOutcome {
	run_check(filter_text, schema, config, None)
}

fn run_check(
	filter_text: &str,
	schema: &SchemaDescriptor,
	config: &ValidatorConfig,
	provider: Option<&dyn SchemaProvider>,
) -> ValidationOutcome {
	if filter_text.trim().is_empty() {
		tracing::debug!("Empty filter for {}, nothing to validate", schema.type_name());
		return ValidationOutcome::Valid;
	}

	let expression = match expression::parse(filter_text) {
		Ok(expression) => expression,
		Err(err) => {
			tracing::warn!("The filter is invalid: {}. Filter: '{}'", err, filter_text);
			return ValidationOutcome::Invalid(Violation::InvalidSyntax {
				message: err.to_string(),
			});
		}
	};

	let outcome = match provider {
		Some(provider) => validate_with_provider(schema, &expression, config, provider),
		None => validate_with_config(schema, &expression, config),
	};
	match outcome.violation() {
		Some(violation) => {
			tracing::warn!("The filter is invalid: {}. Filter: '{}'", violation, filter_text)
		}
		None => tracing::debug!("Filter '{}' is valid for {}", filter_text, schema.type_name()),
	}
	outcome
}

/// Checks a filter string against the schema a Rust type describes for itself
pub fn check_filter_for<T: FilterTarget>(filter_text: &str) -> ValidationOutcome {
	check_filter(filter_text, &T::schema())
}

/// Validates filters for target types looked up by name
#[derive(Debug, Clone)]
pub struct FilterValidator<P = SchemaRegistry> {
	provider: P,
	config: ValidatorConfig,
}

impl<P: SchemaProvider> FilterValidator<P> {
	pub fn new(provider: P) -> Self {
		Self {
			provider,
			config: ValidatorConfig::default(),
		}
	}

	pub fn with_config(mut self, config: ValidatorConfig) -> Self {
		self.config = config;
		self
	}

	/// Checks `filter_text` against the schema registered for `type_name`.
	///
	/// Blank filters are valid whatever the type. An unregistered type is an
	/// error, not a validation outcome.
	pub fn check(&self, filter_text: &str, type_name: &str) -> Result<ValidationOutcome, FilterError> {
		if filter_text.trim().is_empty() {
			return Ok(ValidationOutcome::Valid);
		}
		let schema = self
			.provider
			.schema_for(type_name)
			.ok_or_else(|| FilterError::UnknownType(type_name.to_string()))?;
		Ok(run_check(
			filter_text,
			&schema,
			&self.config,
			Some(&self.provider),
		))
	}

	/// Checks `filter_text` against the schema of `T` instead of looking the
	/// type up. Nested types referenced by name still come from the provider.
	pub fn check_target<T: FilterTarget>(&self, filter_text: &str) -> ValidationOutcome {
		run_check(filter_text, &T::schema(), &self.config, Some(&self.provider))
	}
}

impl FilterValidator<SchemaRegistry> {
	/// Creates a validator over the schemas defined in a JSON file
	pub fn from_schema_file(path: impl AsRef<Path>) -> Result<Self, FilterError> {
		Ok(Self::new(SchemaRegistry::load_from_file(path)?))
	}
}
