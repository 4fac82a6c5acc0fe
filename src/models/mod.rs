//! Domain models: schema descriptions, validation outcomes, configuration
//! and message catalogs.

mod config;
mod messages;
mod outcome;
mod schema;

pub use config::{NestedContextPolicy, ValidatorConfig};
pub use messages::MessageCatalog;
pub use outcome::{ValidationOutcome, Violation, ViolationKind};
pub use schema::{
	FieldDescriptor, FieldKind, FilterTarget, NestedSchema, ResolvedField, SchemaBuilder,
	SchemaDescriptor,
};
