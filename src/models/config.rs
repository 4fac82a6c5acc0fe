//! Validator configuration

use serde::{Deserialize, Serialize};

/// Which type name is reported when a field inside a nested object is unknown.
///
/// For `address.postalCde` filtered on `Employee`, `RootType` reports
/// `Employee` and `NestedType` reports `Address`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NestedContextPolicy {
	#[default]
	RootType,
	NestedType,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorConfig {
	pub nested_context: NestedContextPolicy,
}

impl ValidatorConfig {
	pub fn with_nested_context(mut self, nested_context: NestedContextPolicy) -> Self {
		self.nested_context = nested_context;
		self
	}
}
