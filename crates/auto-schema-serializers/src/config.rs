//! Configuration for schema generation and loading
//!
//! Supports TOML configuration with the `config` feature.

use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;

const DEFAULT_CACHE_CAPACITY: NonZeroUsize = match NonZeroUsize::new(100) {
	Some(capacity) => capacity,
	None => unreachable!(),
};

/// Handling of input keys that match no field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownPolicy {
	/// Report a validation error
	#[default]
	Raise,
	/// Drop the key silently
	Exclude,
}

/// Settings for an [`AutoSchema`](crate::AutoSchema)
///
/// # Examples
///
/// ```
/// use auto_schema_serializers::{AutoSchemaConfig, UnknownPolicy};
///
/// let config = AutoSchemaConfig::default()
/// 	.with_include_fk(false)
/// 	.with_unknown(UnknownPolicy::Exclude);
///
/// assert_eq!(config.cache_capacity.get(), 100);
/// assert!(!config.include_fk);
/// ```
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutoSchemaConfig {
	/// Maximum number of cached schemas
	pub cache_capacity: NonZeroUsize,

	/// Generate fields for foreign key columns
	pub include_fk: bool,

	/// Default handling of unknown keys on load
	pub unknown: UnknownPolicy,

	/// Skip required-field checks on load by default
	pub partial: bool,
}

impl Default for AutoSchemaConfig {
	fn default() -> Self {
		Self {
			cache_capacity: DEFAULT_CACHE_CAPACITY,
			include_fk: true,
			unknown: UnknownPolicy::Raise,
			partial: false,
		}
	}
}

impl AutoSchemaConfig {
	pub fn with_cache_capacity(mut self, capacity: NonZeroUsize) -> Self {
		self.cache_capacity = capacity;
		self
	}

	pub fn with_include_fk(mut self, include_fk: bool) -> Self {
		self.include_fk = include_fk;
		self
	}

	pub fn with_unknown(mut self, unknown: UnknownPolicy) -> Self {
		self.unknown = unknown;
		self
	}

	pub fn with_partial(mut self, partial: bool) -> Self {
		self.partial = partial;
		self
	}

	/// Parse configuration from a TOML string
	///
	/// Missing keys take their default.
	///
	/// # Errors
	///
	/// Returns [`ConfigError::Parse`] for malformed TOML, unknown policy names
	/// and a zero cache capacity.
	#[cfg(feature = "config")]
	pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
		toml::from_str(content).map_err(|e| ConfigError::Parse {
			message: e.to_string(),
		})
	}
}

/// Configuration errors
#[cfg(feature = "config")]
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
	#[error("Failed to parse configuration: {message}")]
	Parse { message: String },
}
