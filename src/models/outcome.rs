//! Results of validating a filter against a schema

use thiserror::Error;

/// Failure classes a caller can tell apart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViolationKind {
	SyntaxError,
	UnknownField,
	MissingNestedSelector,
}

impl ViolationKind {
	/// Message key used to look up the template for this kind of violation
	pub fn message_key(&self) -> &'static str {
		match self {
			ViolationKind::SyntaxError => "ethias.oi.rxjs.ValidFilter.invalidSyntax",
			ViolationKind::UnknownField => "ethias.oi.rxjs.ValidFilter.unknownField",
			ViolationKind::MissingNestedSelector => "ethias.oi.rxjs.ValidFilter.invalidNestedObject",
		}
	}
}

/// The first problem found in a filter
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Violation {
	#[error("The filter syntax is invalid: {message}")]
	InvalidSyntax { message: String },
	#[error("The field <{selector}> can't be found in {type_name}")]
	UnknownField { selector: String, type_name: String },
	#[error("Please add the name of the field you are searching for in nested object <{selector}> in class {type_name}")]
	MissingNestedSelector { selector: String, type_name: String },
}

impl Violation {
	pub fn kind(&self) -> ViolationKind {
		match self {
			Violation::InvalidSyntax { .. } => ViolationKind::SyntaxError,
			Violation::UnknownField { .. } => ViolationKind::UnknownField,
			Violation::MissingNestedSelector { .. } => ViolationKind::MissingNestedSelector,
		}
	}

	pub fn message_key(&self) -> &'static str {
		self.kind().message_key()
	}

	/// The offending selector segment. Syntax errors have none.
	pub fn selector(&self) -> Option<&str> {
		match self {
			Violation::InvalidSyntax { .. } => None,
			Violation::UnknownField { selector, .. }
			| Violation::MissingNestedSelector { selector, .. } => Some(selector),
		}
	}

	/// Name of the type the violation is reported against. Syntax errors have none.
	pub fn type_name(&self) -> Option<&str> {
		match self {
			Violation::InvalidSyntax { .. } => None,
			Violation::UnknownField { type_name, .. }
			| Violation::MissingNestedSelector { type_name, .. } => Some(type_name),
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationOutcome {
	Valid,
	Invalid(Violation),
}

impl ValidationOutcome {
	pub fn is_valid(&self) -> bool {
		matches!(self, ValidationOutcome::Valid)
	}

	pub fn violation(&self) -> Option<&Violation> {
		match self {
			ValidationOutcome::Valid => None,
			ValidationOutcome::Invalid(violation) => Some(violation),
		}
	}

	pub fn into_result(self) -> Result<(), Violation> {
		self.into()
	}
}

impl From<Result<(), Violation>> for ValidationOutcome {
	fn from(result: Result<(), Violation>) -> Self {
		match result {
			Ok(()) => ValidationOutcome::Valid,
			Err(violation) => ValidationOutcome::Invalid(violation),
		}
	}
}

impl From<ValidationOutcome> for Result<(), Violation> {
	fn from(outcome: ValidationOutcome) -> Self {
		match outcome {
			ValidationOutcome::Valid => Ok(()),
			ValidationOutcome::Invalid(violation) => Err(violation),
		}
	}
}
