use std::{
	collections::{HashMap, HashSet},
	path::Path,
	sync::Arc,
};

use serde::Deserialize;

use super::{SchemaError, SchemaProvider};
use crate::models::{FilterTarget, SchemaDescriptor};

/// --- JSON definition format ---
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RegistryDefinition {
	types: Vec<TypeDefinition>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct TypeDefinition {
	name: String,
	#[serde(default)]
	extends: Option<String>,
	#[serde(default)]
	fields: Vec<FieldDefinition>,
}

// A field is either a bare name or an object naming its nested type
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum FieldDefinition {
	Plain(String),
	Detailed {
		name: String,
		#[serde(default)]
		nested: Option<String>,
	},
}

impl FieldDefinition {
	fn name(&self) -> &str {
		match self {
			FieldDefinition::Plain(name) => name,
			FieldDefinition::Detailed { name, .. } => name,
		}
	}

	fn nested_type(&self) -> Option<&str> {
		match self {
			FieldDefinition::Plain(_) => None,
			FieldDefinition::Detailed { nested, .. } => nested.as_deref(),
		}
	}
}

/// Resolves type definitions into shared schemas, each built at most once.
///
/// Nested fields whose type leads back to the declaring type are kept as
/// by-name references; every other reference is resolved eagerly. Only a
/// supertype chain that loops is an error.
struct Resolver<'d> {
	definitions: HashMap<&'d str, &'d TypeDefinition>,
	built: HashMap<String, Arc<SchemaDescriptor>>,
	visiting: Vec<String>,
}

impl<'d> Resolver<'d> {
	fn new(types: &'d [TypeDefinition]) -> Result<Self, SchemaError> {
		let mut definitions = HashMap::with_capacity(types.len());
		for definition in types {
			if definitions
				.insert(definition.name.as_str(), definition)
				.is_some()
			{
				return Err(SchemaError::DuplicateType(definition.name.clone()));
			}
		}
		Ok(Self {
			definitions,
			built: HashMap::new(),
			visiting: Vec::new(),
		})
	}

	fn resolve(&mut self, name: &str) -> Result<Arc<SchemaDescriptor>, SchemaError> {
		if let Some(schema) = self.built.get(name) {
			return Ok(schema.clone());
		}
		if self.visiting.iter().any(|visiting| visiting == name) {
			let mut chain = self.visiting.clone();
			chain.push(name.to_string());
			return Err(SchemaError::CyclicReference(chain));
		}
		let definition = self.definitions[name];
		self.visiting.push(name.to_string());

		let mut builder = SchemaDescriptor::builder(name);
		if let Some(supertype) = definition.extends.as_deref() {
			if !self.definitions.contains_key(supertype) {
				return Err(SchemaError::UnknownSupertype {
					type_name: name.to_string(),
					supertype: supertype.to_string(),
				});
			}
			builder = builder.extends(self.resolve(supertype)?);
		}
		for field in &definition.fields {
			builder = match field.nested_type() {
				None => builder.field(field.name()),
				Some(nested_type) => {
					if !self.definitions.contains_key(nested_type) {
						return Err(SchemaError::UnknownNestedType {
							type_name: name.to_string(),
							field: field.name().to_string(),
							nested_type: nested_type.to_string(),
						});
					}
					if self.reaches(nested_type, name) {
						// Part of a nesting cycle, looked up by name when validated
						builder.nested_named(field.name(), nested_type)
					} else {
						builder.nested(field.name(), self.resolve(nested_type)?)
					}
				}
			};
		}

		self.visiting.pop();
		let schema = builder.build();
		self.built.insert(name.to_string(), schema.clone());
		Ok(schema)
	}

	/// Whether `to` can be reached from `from` through supertype or nested references
	fn reaches(&self, from: &'d str, to: &str) -> bool {
		let mut pending = vec![from];
		let mut seen = HashSet::new();
		while let Some(name) = pending.pop() {
			if name == to {
				return true;
			}
			if !seen.insert(name) {
				continue;
			}
			if let Some(definition) = self.definitions.get(name) {
				pending.extend(definition.extends.as_deref());
				pending.extend(definition.fields.iter().filter_map(FieldDefinition::nested_type));
			}
		}
		false
	}
}

/// Read-only map from type names to schemas
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
	schemas: HashMap<String, Arc<SchemaDescriptor>>,
}

impl SchemaRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	/// Registers a schema under its own type name, replacing any previous one
	pub fn insert(&mut self, schema: Arc<SchemaDescriptor>) -> Option<Arc<SchemaDescriptor>> {
		self.schemas.insert(schema.type_name().to_string(), schema)
	}

	pub fn with_schema(mut self, schema: Arc<SchemaDescriptor>) -> Self {
		self.insert(schema);
		self
	}

	/// Registers the schema a Rust type describes for itself
	pub fn with_target<T: FilterTarget>(self) -> Self {
		self.with_schema(T::schema())
	}

	pub fn get(&self, type_name: &str) -> Option<&Arc<SchemaDescriptor>> {
		self.schemas.get(type_name)
	}

	pub fn len(&self) -> usize {
		self.schemas.len()
	}

	pub fn is_empty(&self) -> bool {
		self.schemas.is_empty()
	}

	/// Registered type names in sorted order
	pub fn type_names(&self) -> Vec<&str> {
		let mut names: Vec<&str> = self.schemas.keys().map(String::as_str).collect();
		names.sort_unstable();
		names
	}

	/// Builds a registry from a JSON definition of the form
	/// `{"types": [{"name": "...", "extends": "...", "fields": [...]}]}`
	pub fn from_json_str(json: &str) -> Result<Self, SchemaError> {
		let definition: RegistryDefinition = serde_json::from_str(json)?;
		let mut resolver = Resolver::new(&definition.types)?;
		for type_definition in &definition.types {
			resolver.resolve(&type_definition.name)?;
		}
		tracing::debug!("Built schema registry with {} types", resolver.built.len());
		Ok(Self {
			schemas: resolver.built,
		})
	}

	pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, SchemaError> {
		let path = path.as_ref();
		let json = std::fs::read_to_string(path)?;
		let registry = Self::from_json_str(&json)?;
		tracing::debug!(
			"Loaded {} schemas from '{}'",
			registry.len(),
			path.display()
		);
		Ok(registry)
	}
}

impl SchemaProvider for SchemaRegistry {
	fn schema_for(&self, type_name: &str) -> Option<Arc<SchemaDescriptor>> {
		self.get(type_name).cloned()
	}
}

#[cfg(test)]
mod tests {
	use std::io::Write;

	use super::*;
	use crate::models::{FieldKind, NestedSchema};

	const EMPLOYEE_DEFINITION: &str = r#"{
		"types": [
			{ "name": "Employee", "extends": "Person", "fields": ["employeeNumber", "isActive"] },
			{
				"name": "Person",
				"fields": ["id", "firstname", "lastname", "age", { "name": "address", "nested": "Address" }]
			},
			{ "name": "Address", "fields": ["street", { "name": "postalCode" }, "city"] }
		]
	}"#;

	#[test]
	fn test_from_json_resolves_supertype_and_nested() {
		let registry = SchemaRegistry::from_json_str(EMPLOYEE_DEFINITION).unwrap();
		assert_eq!(registry.type_names(), vec!["Address", "Employee", "Person"]);

		let employee = registry.schema_for("Employee").unwrap();
		assert_eq!(employee.supertype().unwrap().type_name(), "Person");

		let address = employee.field("address").unwrap();
		match address.field.kind() {
			FieldKind::Nested(NestedSchema::Resolved(schema)) => {
				assert!(schema.field("postalCode").is_some());
				// Definitions are shared, not copied
				assert!(Arc::ptr_eq(schema, registry.get("Address").unwrap()));
			}
			other => panic!("Expected address to be resolved, got {:?}", other),
		}
	}

	#[test]
	fn test_from_json_rejects_duplicates() {
		let json = r#"{"types": [{"name": "A"}, {"name": "A"}]}"#;
		assert!(matches!(
			SchemaRegistry::from_json_str(json),
			Err(SchemaError::DuplicateType(name)) if name == "A"
		));
	}

	#[test]
	fn test_from_json_rejects_unknown_references() {
		let json = r#"{"types": [{"name": "A", "extends": "B"}]}"#;
		assert!(matches!(
			SchemaRegistry::from_json_str(json),
			Err(SchemaError::UnknownSupertype { .. })
		));

		let json = r#"{"types": [{"name": "A", "fields": [{"name": "b", "nested": "B"}]}]}"#;
		assert!(matches!(
			SchemaRegistry::from_json_str(json),
			Err(SchemaError::UnknownNestedType { nested_type, .. }) if nested_type == "B"
		));
	}

	#[test]
	fn test_from_json_rejects_supertype_cycles() {
		let json = r#"{"types": [
			{"name": "A", "extends": "B"},
			{"name": "B", "extends": "A"}
		]}"#;
		match SchemaRegistry::from_json_str(json) {
			Err(SchemaError::CyclicReference(chain)) => assert_eq!(chain, vec!["A", "B", "A"]),
			other => panic!("Expected cyclic reference error, got {:?}", other),
		}

		let json = r#"{"types": [{"name": "A", "extends": "A"}]}"#;
		assert!(matches!(
			SchemaRegistry::from_json_str(json),
			Err(SchemaError::CyclicReference(_))
		));
	}

	#[test]
	fn test_from_json_accepts_nesting_cycles() {
		let json = r#"{"types": [
			{"name": "Person", "fields": ["firstname", {"name": "manager", "nested": "Person"}]},
			{"name": "Employee", "extends": "Person", "fields": [{"name": "department", "nested": "Department"}]},
			{"name": "Department", "fields": ["code", {"name": "head", "nested": "Employee"}]},
			{"name": "Office", "fields": [{"name": "department", "nested": "Department"}]}
		]}"#;
		let registry = SchemaRegistry::from_json_str(json).unwrap();
		assert_eq!(registry.len(), 4);

		let nested = |type_name: &str, field: &str| {
			registry
				.get(type_name)
				.unwrap()
				.field(field)
				.unwrap()
				.field
				.nested_schema()
				.cloned()
				.unwrap()
		};
		assert_eq!(nested("Person", "manager").type_name(), Some("Person"));
		assert_eq!(nested("Employee", "department").type_name(), Some("Department"));
		assert_eq!(nested("Department", "head").type_name(), Some("Employee"));
		// Types outside the cycle keep a direct reference
		match nested("Office", "department") {
			NestedSchema::Resolved(schema) => {
				assert!(Arc::ptr_eq(&schema, registry.get("Department").unwrap()))
			}
			other => panic!("Expected a resolved schema, got {:?}", other),
		}
	}

	#[test]
	fn test_from_json_rejects_malformed_input() {
		assert!(matches!(
			SchemaRegistry::from_json_str("{\"types\": [{\"name\": 1}]}"),
			Err(SchemaError::Json(_))
		));
		assert!(matches!(
			SchemaRegistry::from_json_str("{\"kinds\": []}"),
			Err(SchemaError::Json(_))
		));
	}

	#[test]
	fn test_load_from_file() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		file.write_all(EMPLOYEE_DEFINITION.as_bytes()).unwrap();

		let registry = SchemaRegistry::load_from_file(file.path()).unwrap();
		assert_eq!(registry.len(), 3);

		assert!(matches!(
			SchemaRegistry::load_from_file("/nonexistent/schemas.json"),
			Err(SchemaError::Io(_))
		));
	}

	#[test]
	fn test_insert_replaces_by_type_name() {
		let mut registry = SchemaRegistry::new();
		assert!(registry.is_empty());
		assert!(registry
			.insert(SchemaDescriptor::builder("A").field("x").build())
			.is_none());
		let previous = registry.insert(SchemaDescriptor::builder("A").field("y").build());
		assert!(previous.unwrap().field("x").is_some());
		assert!(registry.get("A").unwrap().field("y").is_some());
	}
}
