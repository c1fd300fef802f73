//! Error types

use auto_schema_orm::{ConstructionError, IntrospectionError};
use indexmap::IndexMap;
use std::fmt;

/// Field-level validation messages collected during a load
///
/// Keys are dotted paths: `name` for a top-level field, `0.name` for an item
/// of a collection load and `attachments.0.location` inside nested data.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
	errors: IndexMap<String, Vec<String>>,
}

impl ValidationErrors {
	pub fn new() -> Self {
		Self::default()
	}

	/// Record a message for `path`
	pub fn add(&mut self, path: impl Into<String>, message: impl Into<String>) {
		self.errors.entry(path.into()).or_default().push(message.into());
	}

	/// Merge another set of errors under `prefix`
	pub fn extend_prefixed(&mut self, prefix: &str, other: ValidationErrors) {
		for (path, messages) in other.errors {
			let path = format!("{prefix}.{path}");
			self.errors.entry(path).or_default().extend(messages);
		}
	}

	pub fn get(&self, path: &str) -> Option<&[String]> {
		self.errors.get(path).map(Vec::as_slice)
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
		self.errors
			.iter()
			.map(|(path, messages)| (path.as_str(), messages.as_slice()))
	}

	/// Number of failing paths
	pub fn len(&self) -> usize {
		self.errors.len()
	}

	pub fn is_empty(&self) -> bool {
		self.errors.is_empty()
	}

	/// `Ok(value)` when nothing was recorded
	pub fn into_result<T>(self, value: T) -> Result<T, ValidationErrors> {
		if self.is_empty() { Ok(value) } else { Err(self) }
	}
}

impl fmt::Display for ValidationErrors {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let mut first = true;
		for (path, messages) in &self.errors {
			if !first {
				f.write_str("; ")?;
			}
			first = false;
			write!(f, "{path}: {}", messages.join(" "))?;
		}
		Ok(())
	}
}

impl std::error::Error for ValidationErrors {}

/// Errors raised while synthesizing a schema
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
	#[error(transparent)]
	Introspection(#[from] IntrospectionError),

	#[error("Cyclic relationship: {}", path.join(" -> "))]
	CyclicRelationship { path: Vec<String> },

	#[error("Cannot generate field '{attribute}': {message}")]
	Generator { attribute: String, message: String },
}

/// Errors raised by dump, load and rehydration
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SerializeError {
	#[error("Validation failed: {0}")]
	Validation(#[from] ValidationErrors),

	#[error(transparent)]
	Construction(#[from] ConstructionError),

	#[error("Expected an instance of {expected}, got {found}")]
	ModelMismatch { expected: String, found: String },

	#[error("Loaded instance is not a {expected}")]
	Downcast { expected: String },

	#[error("Cannot dump field '{field}': {message}")]
	Dump { field: String, message: String },

	#[error("Invalid input shape: {message}")]
	Shape { message: String },
}
