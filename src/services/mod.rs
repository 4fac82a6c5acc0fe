//! Core services: filter parsing and validation, and schema lookup.

pub mod filter;
pub mod schema;
