//! Validation of filter selectors against a schema.
//!
//! Every comparison in the expression tree must name a field visible on the
//! root schema. Logical nodes do not change the root; a nested-object field
//! must be followed by exactly one more segment naming a field of the nested
//! type. Deeper segments are not inspected.

use std::sync::Arc;

use crate::{
	models::{
		NestedContextPolicy, NestedSchema, SchemaDescriptor, ValidationOutcome, ValidatorConfig,
		Violation,
	},
	services::{
		filter::expression::{Comparison, Expression},
		schema::SchemaProvider,
	},
};

/// Validates every selector of `expression` against `schema` using the default
/// configuration
pub fn validate(schema: &SchemaDescriptor, expression: &Expression<'_>) -> ValidationOutcome {
	validate_with_config(schema, expression, &ValidatorConfig::default())
}

pub fn validate_with_config(
	schema: &SchemaDescriptor,
	expression: &Expression<'_>,
	config: &ValidatorConfig,
) -> ValidationOutcome {
	SelectorValidator::new(schema, config, None)
		.validate(expression)
		.into()
}

/// Like `validate_with_config`, with nested types referenced by name looked up
/// in `provider`
pub fn validate_with_provider(
	schema: &SchemaDescriptor,
	expression: &Expression<'_>,
	config: &ValidatorConfig,
	provider: &dyn SchemaProvider,
) -> ValidationOutcome {
	SelectorValidator::new(schema, config, Some(provider))
		.validate(expression)
		.into()
}

struct SelectorValidator<'s> {
	root: &'s SchemaDescriptor,
	config: &'s ValidatorConfig,
	provider: Option<&'s dyn SchemaProvider>,
}

impl<'s> SelectorValidator<'s> {
	fn new(
		root: &'s SchemaDescriptor,
		config: &'s ValidatorConfig,
		provider: Option<&'s dyn SchemaProvider>,
	) -> Self {
		Self {
			root,
			config,
			provider,
		}
	}

	/// Walks the tree; the first failing comparison stops the walk
	fn validate(&self, expression: &Expression<'_>) -> Result<(), Violation> {
		match expression {
			Expression::Comparison(comparison) => self.validate_comparison(comparison),
			Expression::Logical { children, .. } => children
				.iter()
				.try_for_each(|child| self.validate(child)),
		}
	}

	fn validate_comparison(&self, comparison: &Comparison<'_>) -> Result<(), Violation> {
		let segments = significant_segments(comparison.selector.segments());
		let result = self.resolve_field_path(self.root, segments);
		tracing::trace!(
			"Selector '{}' on {} resolved to: {:?}",
			comparison.selector,
			self.root.type_name(),
			result
		);
		result
	}

	/// Resolves the first segment on `schema`. A nested-object field recurses
	/// into its own schema with the next segment only.
	fn resolve_field_path(
		&self,
		schema: &SchemaDescriptor,
		segments: &[&str],
	) -> Result<(), Violation> {
		let Some((&name, rest)) = segments.split_first() else {
			return Ok(());
		};

		let Some(resolved) = schema.field(name) else {
			return Err(Violation::UnknownField {
				selector: name.to_string(),
				type_name: self.context_type_name(schema.type_name()).to_string(),
			});
		};

		let Some(nested) = resolved.field.nested_schema() else {
			// Trailing segments after a plain field are ignored
			return Ok(());
		};

		let Some(&next) = rest.first() else {
			return Err(Violation::MissingNestedSelector {
				selector: name.to_string(),
				type_name: resolved.declaring_type.to_string(),
			});
		};

		match self.nested_schema(nested) {
			Some(nested_schema) => {
				self.resolve_field_path(&nested_schema, std::slice::from_ref(&next))
			}
			None => {
				// Nothing can be looked up on a type that is not available
				let type_name = nested.type_name().unwrap_or_default();
				tracing::warn!(
					"No schema available for nested type '{}' of field '{}'",
					type_name,
					name
				);
				Err(Violation::UnknownField {
					selector: next.to_string(),
					type_name: self.context_type_name(type_name).to_string(),
				})
			}
		}
	}

	fn nested_schema(&self, nested: &NestedSchema) -> Option<Arc<SchemaDescriptor>> {
		match nested {
			NestedSchema::Named(type_name) => self
				.provider
				.and_then(|provider| provider.schema_for(type_name)),
			NestedSchema::Resolved(_) | NestedSchema::Target(_) => nested.resolve(),
		}
	}

	/// Type name reported for an unknown field looked up on `type_name`
	fn context_type_name<'a>(&'a self, type_name: &'a str) -> &'a str {
		match self.config.nested_context {
			NestedContextPolicy::RootType => self.root.type_name(),
			NestedContextPolicy::NestedType => type_name,
		}
	}
}

/// Drops trailing empty segments ("address." selects nothing inside address),
/// always keeping the first segment
fn significant_segments<'a, 'b>(segments: &'b [&'a str]) -> &'b [&'a str] {
	let mut end = segments.len();
	while end > 1 && segments[end - 1].is_empty() {
		end -= 1;
	}
	&segments[..end]
}
