//! Schema lookup for filter targets.
//!
//! A `SchemaProvider` hands out the schema of a target type by name. The
//! `SchemaRegistry` implementation is built once, either in code or from a
//! JSON definition, and is read-only afterwards.

mod error;
mod registry;

use std::sync::Arc;

use crate::models::SchemaDescriptor;

pub use error::SchemaError;
pub use registry::SchemaRegistry;

pub trait SchemaProvider {
	/// Gets the schema registered for a type name
	fn schema_for(&self, type_name: &str) -> Option<Arc<SchemaDescriptor>>;
}
