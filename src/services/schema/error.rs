//! Schema registry error types and handling.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SchemaError {
	#[error("Type '{0}' is defined more than once")]
	DuplicateType(String),
	#[error("Type '{type_name}' extends unknown type '{supertype}'")]
	UnknownSupertype {
		type_name: String,
		supertype: String,
	},
	#[error("Field '{field}' of type '{type_name}' refers to unknown nested type '{nested_type}'")]
	UnknownNestedType {
		type_name: String,
		field: String,
		nested_type: String,
	},
	#[error("Cyclic schema reference: {}", .0.join(" -> "))]
	CyclicReference(Vec<String>),
	#[error("Failed to read schema file: {0}")]
	Io(#[from] std::io::Error),
	#[error("Failed to parse schema definition: {0}")]
	Json(#[from] serde_json::Error),
}
