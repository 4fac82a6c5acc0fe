//! Validation of RSQL filter expressions against the fields of a data model.
//!
//! A filter such as `age==12 and address.postalCode==4000` is parsed into an
//! expression tree, then every selector is checked against the schema of the
//! target type: its own fields, the fields of its immediate supertype, and one
//! level of nested objects.
//!
//! ```
//! use rsql_filter_validator::{check_filter, SchemaDescriptor, ViolationKind};
//!
//! let address = SchemaDescriptor::builder("Address").field("postalCode").build();
//! let person = SchemaDescriptor::builder("Person")
//! 	.field("firstname")
//! 	.nested("address", address)
//! 	.build();
//!
//! assert!(check_filter("firstname==William", &person).is_valid());
//!
//! let outcome = check_filter("address==4000", &person);
//! assert_eq!(
//! 	outcome.violation().map(|v| v.kind()),
//! 	Some(ViolationKind::MissingNestedSelector)
//! );
//! ```

pub mod models;
pub mod services;

pub use models::{
	FieldDescriptor, FieldKind, FilterTarget, MessageCatalog, NestedContextPolicy, NestedSchema,
	SchemaDescriptor, ValidationOutcome, ValidatorConfig, Violation, ViolationKind,
};
pub use services::{
	filter::{
		check_filter, check_filter_for, check_filter_with_config, FilterError, FilterValidator,
	},
	schema::{SchemaError, SchemaProvider, SchemaRegistry},
};
