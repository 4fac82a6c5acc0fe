//! Filter validation error types and handling.
//!
//! These are configuration problems at the validation boundary. A filter that
//! is merely wrong is reported as a `ValidationOutcome`, not as an error.

use thiserror::Error;

use crate::services::schema::SchemaError;

#[derive(Debug, Error)]
pub enum FilterError {
	#[error("No schema registered for type '{0}'")]
	UnknownType(String),
	#[error(transparent)]
	Schema(#[from] SchemaError),
}
