//! Message templates for reporting violations.
//!
//! Templates use positional `%s` placeholders, filled with the selector and
//! then the type name.

use std::collections::HashMap;

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};

use crate::models::{Violation, ViolationKind};

lazy_static! {
	static ref DEFAULT_CATALOG: MessageCatalog = MessageCatalog::english();
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageCatalog {
	templates: HashMap<String, String>,
}

impl MessageCatalog {
	fn english() -> Self {
		let templates = [
			(ViolationKind::SyntaxError, "The filter syntax is invalid."),
			(
				ViolationKind::UnknownField,
				"The filter is invalid: the field <%s> can't be found in %s.",
			),
			(
				ViolationKind::MissingNestedSelector,
				"The filter is invalid: please add the name of the field you are searching for in nested object <%s> in class %s.",
			),
		]
		.into_iter()
		.map(|(kind, template)| (kind.message_key().to_string(), template.to_string()))
		.collect();

		Self { templates }
	}

	/// The shared English catalog
	pub fn default_catalog() -> &'static MessageCatalog {
		&DEFAULT_CATALOG
	}

	/// Loads a catalog from a JSON object mapping message keys to templates.
	/// Keys missing from the object fall back to the English templates.
	pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
		let loaded: MessageCatalog = serde_json::from_str(json)?;
		let mut templates = DEFAULT_CATALOG.templates.clone();
		templates.extend(loaded.templates);
		Ok(Self { templates })
	}

	pub fn template(&self, key: &str) -> Option<&str> {
		self.templates.get(key).map(String::as_str)
	}

	/// Renders the violation with the template registered for its key
	pub fn render(&self, violation: &Violation) -> String {
		let Some(template) = self.template(violation.message_key()) else {
			return violation.to_string();
		};
		let arguments: Vec<&str> = violation
			.selector()
			.into_iter()
			.chain(violation.type_name())
			.collect();
		format_template(template, &arguments)
	}
}

impl Default for MessageCatalog {
	fn default() -> Self {
		DEFAULT_CATALOG.clone()
	}
}

/// Replaces each `%s` with the next argument; placeholders without an
/// argument are left as they are
fn format_template(template: &str, arguments: &[&str]) -> String {
	let mut rendered = String::with_capacity(template.len());
	let mut arguments = arguments.iter();
	let mut pieces = template.split("%s");

	if let Some(first) = pieces.next() {
		rendered.push_str(first);
	}
	for piece in pieces {
		match arguments.next() {
			Some(argument) => rendered.push_str(argument),
			None => rendered.push_str("%s"),
		}
		rendered.push_str(piece);
	}
	rendered
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_render_unknown_field() {
		let violation = Violation::UnknownField {
			selector: "fistname".to_string(),
			type_name: "Employee".to_string(),
		};
		assert_eq!(
			MessageCatalog::default_catalog().render(&violation),
			"The filter is invalid: the field <fistname> can't be found in Employee."
		);
	}

	#[test]
	fn test_render_syntax_error_has_no_arguments() {
		let violation = Violation::InvalidSyntax {
			message: "unexpected input".to_string(),
		};
		assert_eq!(
			MessageCatalog::default().render(&violation),
			"The filter syntax is invalid."
		);
	}

	#[test]
	fn test_catalog_from_json_overrides_and_falls_back() {
		let catalog = MessageCatalog::from_json_str(
			r#"{"ethias.oi.rxjs.ValidFilter.unknownField": "Champ <%s> inconnu dans %s"}"#,
		)
		.unwrap();

		let unknown = Violation::UnknownField {
			selector: "nom".to_string(),
			type_name: "Employee".to_string(),
		};
		assert_eq!(catalog.render(&unknown), "Champ <nom> inconnu dans Employee");

		let nested = Violation::MissingNestedSelector {
			selector: "address".to_string(),
			type_name: "Person".to_string(),
		};
		assert!(catalog.render(&nested).contains("<address> in class Person"));
	}

	#[test]
	fn test_format_template_with_missing_argument() {
		assert_eq!(format_template("a %s b %s", &["x"]), "a x b %s");
		assert_eq!(format_template("no placeholders", &["x"]), "no placeholders");
	}
}
