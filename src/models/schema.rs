//! Schema descriptions of filterable types.
//!
//! A schema lists the fields a filter may reference on a type. Field lookup
//! sees the type's own fields followed by the fields declared on its immediate
//! supertype; anything declared further up the hierarchy is not visible.
//!
//! Nested-object fields do not have to point at a finished schema. A type may
//! nest itself, or two types may nest each other, so the nested schema can
//! also be produced on demand or looked up by name when a filter is validated.

use std::{fmt, sync::Arc};

/// Where the schema of a nested object comes from
#[derive(Clone)]
pub enum NestedSchema {
	/// Schema known when the field was declared
	Resolved(Arc<SchemaDescriptor>),
	/// Schema produced on use by a `FilterTarget`
	Target(fn() -> Arc<SchemaDescriptor>),
	/// Schema looked up by type name through a `SchemaProvider`
	Named(String),
}

impl NestedSchema {
	/// The nested schema, when it does not depend on a provider
	pub fn resolve(&self) -> Option<Arc<SchemaDescriptor>> {
		match self {
			NestedSchema::Resolved(schema) => Some(schema.clone()),
			NestedSchema::Target(schema) => Some(schema()),
			NestedSchema::Named(_) => None,
		}
	}

	/// Type name of a by-name reference
	pub fn type_name(&self) -> Option<&str> {
		match self {
			NestedSchema::Named(type_name) => Some(type_name.as_str()),
			NestedSchema::Resolved(_) | NestedSchema::Target(_) => None,
		}
	}
}

// Deferred schemas may refer back to the type holding the field, so they are
// never expanded here
impl fmt::Debug for NestedSchema {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			NestedSchema::Resolved(schema) => f.debug_tuple("Resolved").field(&schema.type_name).finish(),
			NestedSchema::Target(_) => f.write_str("Target"),
			NestedSchema::Named(type_name) => f.debug_tuple("Named").field(type_name).finish(),
		}
	}
}

/// Whether a field holds a plain value or a nested object with its own schema
#[derive(Debug, Clone)]
pub enum FieldKind {
	Plain,
	Nested(NestedSchema),
}

#[derive(Debug, Clone)]
pub struct FieldDescriptor {
	name: String,
	kind: FieldKind,
}

impl FieldDescriptor {
	pub fn plain(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			kind: FieldKind::Plain,
		}
	}

	pub fn nested(name: impl Into<String>, schema: NestedSchema) -> Self {
		Self {
			name: name.into(),
			kind: FieldKind::Nested(schema),
		}
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn kind(&self) -> &FieldKind {
		&self.kind
	}

	/// Schema source of the nested object, if this is a nested-object field
	pub fn nested_schema(&self) -> Option<&NestedSchema> {
		match &self.kind {
			FieldKind::Plain => None,
			FieldKind::Nested(schema) => Some(schema),
		}
	}
}

/// A field found by lookup, together with the name of the type that declares it
#[derive(Debug, Clone, Copy)]
pub struct ResolvedField<'s> {
	pub field: &'s FieldDescriptor,
	pub declaring_type: &'s str,
}

#[derive(Debug, Clone)]
pub struct SchemaDescriptor {
	type_name: String,
	fields: Vec<FieldDescriptor>,
	supertype: Option<Arc<SchemaDescriptor>>,
}

impl SchemaDescriptor {
	pub fn builder(type_name: impl Into<String>) -> SchemaBuilder {
		SchemaBuilder {
			type_name: type_name.into(),
			fields: Vec::new(),
			supertype: None,
		}
	}

	pub fn type_name(&self) -> &str {
		&self.type_name
	}

	pub fn supertype(&self) -> Option<&Arc<SchemaDescriptor>> {
		self.supertype.as_ref()
	}

	/// All visible fields: own fields first, then the immediate supertype's own
	/// fields. Names are not deduplicated.
	pub fn fields(&self) -> impl Iterator<Item = ResolvedField<'_>> + '_ {
		let own = self.fields.iter().map(move |field| ResolvedField {
			field,
			declaring_type: &self.type_name,
		});
		let inherited = self.supertype.iter().flat_map(|supertype| {
			supertype.fields.iter().map(move |field| ResolvedField {
				field,
				declaring_type: &supertype.type_name,
			})
		});
		own.chain(inherited)
	}

	/// First visible field with the given name
	pub fn field(&self, name: &str) -> Option<ResolvedField<'_>> {
		self.fields().find(|resolved| resolved.field.name() == name)
	}
}

/// Incremental construction of a `SchemaDescriptor`
#[derive(Debug, Clone)]
pub struct SchemaBuilder {
	type_name: String,
	fields: Vec<FieldDescriptor>,
	supertype: Option<Arc<SchemaDescriptor>>,
}

impl SchemaBuilder {
	/// Adds a plain field
	pub fn field(mut self, name: impl Into<String>) -> Self {
		self.fields.push(FieldDescriptor::plain(name));
		self
	}

	/// Adds a nested-object field whose own fields are described by `schema`
	pub fn nested(mut self, name: impl Into<String>, schema: Arc<SchemaDescriptor>) -> Self {
		self.fields
			.push(FieldDescriptor::nested(name, NestedSchema::Resolved(schema)));
		self
	}

	/// Adds a nested-object field of type `T`, whose schema is only asked for
	/// when a filter goes through the field. `T` may be the type being built.
	pub fn nested_target<T: FilterTarget>(mut self, name: impl Into<String>) -> Self {
		self.fields
			.push(FieldDescriptor::nested(name, NestedSchema::Target(T::schema)));
		self
	}

	/// Adds a nested-object field whose schema is looked up by type name
	pub fn nested_named(mut self, name: impl Into<String>, type_name: impl Into<String>) -> Self {
		self.fields.push(FieldDescriptor::nested(
			name,
			NestedSchema::Named(type_name.into()),
		));
		self
	}

	/// Sets the supertype whose declared fields are visible on this type
	pub fn extends(mut self, supertype: Arc<SchemaDescriptor>) -> Self {
		self.supertype = Some(supertype);
		self
	}

	pub fn build(self) -> Arc<SchemaDescriptor> {
		Arc::new(SchemaDescriptor {
			type_name: self.type_name,
			fields: self.fields,
			supertype: self.supertype,
		})
	}
}

/// Rust types that can be the target of a filter describe their own schema.
///
/// Implementations usually build the schema once and hand out clones of the
/// same `Arc`.
pub trait FilterTarget {
	fn schema() -> Arc<SchemaDescriptor>;
}
