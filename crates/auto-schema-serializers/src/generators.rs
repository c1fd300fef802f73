//! Custom field generation keyed by storage kind

use crate::error::SchemaError;
use crate::fields::{FieldDescriptor, FieldKind};
use auto_schema_orm::{Attribute, StorageKind, check_column_is_nullable};
use indexmap::IndexMap;
use std::fmt;

/// Produces the field descriptor for a column of a particular storage kind
pub trait FieldGenerator: Send + Sync {
	fn generate(&self, attribute: &Attribute) -> Result<FieldDescriptor, SchemaError>;
}

/// Enumeration columns, encoded by member name
#[derive(Debug, Clone, Copy, Default)]
pub struct EnumFieldGenerator;

impl FieldGenerator for EnumFieldGenerator {
	fn generate(&self, attribute: &Attribute) -> Result<FieldDescriptor, SchemaError> {
		let nullable = check_column_is_nullable(attribute)?;
		let enum_type = attribute
			.column_property()
			.and_then(|property| property.column())
			.and_then(|column| column.storage_type().enum_type())
			.copied()
			.ok_or_else(|| SchemaError::Generator {
				attribute: attribute.key().to_string(),
				message: "column is not an enumeration".to_string(),
			})?;

		Ok(FieldDescriptor::new(attribute.key(), FieldKind::Enum(enum_type))
			.required(!nullable)
			.allow_none(nullable))
	}
}

/// Binary columns
///
/// `null` is always accepted, whatever the column's nullability.
#[derive(Debug, Clone, Copy, Default)]
pub struct BytesFieldGenerator;

impl FieldGenerator for BytesFieldGenerator {
	fn generate(&self, attribute: &Attribute) -> Result<FieldDescriptor, SchemaError> {
		let nullable = check_column_is_nullable(attribute)?;
		// TODO: derive allow_none from the column once callers can opt out of null blobs
		Ok(FieldDescriptor::new(attribute.key(), FieldKind::Bytes)
			.required(!nullable)
			.allow_none(true))
	}
}

/// Storage kinds with a custom generator
///
/// Generators run in registration order. Kinds without an entry keep the
/// default field inference.
pub struct GeneratorRegistry {
	generators: IndexMap<StorageKind, Box<dyn FieldGenerator>>,
}

impl GeneratorRegistry {
	/// Registry without any generator
	pub fn empty() -> Self {
		Self {
			generators: IndexMap::new(),
		}
	}

	/// Enum and binary generators
	pub fn with_defaults() -> Self {
		let mut registry = Self::empty();
		registry.register(StorageKind::Enum, EnumFieldGenerator);
		registry.register(StorageKind::LargeBinary, BytesFieldGenerator);
		registry
	}

	/// Add a generator, replacing any previous one for `kind`
	///
	/// # Examples
	///
	/// ```
	/// use auto_schema_orm::{Attribute, StorageKind};
	/// use auto_schema_serializers::{
	/// 	FieldDescriptor, FieldGenerator, FieldKind, GeneratorRegistry, SchemaError,
	/// };
	///
	/// struct UpperDate;
	///
	/// impl FieldGenerator for UpperDate {
	/// 	fn generate(&self, attribute: &Attribute) -> Result<FieldDescriptor, SchemaError> {
	/// 		Ok(FieldDescriptor::new(attribute.key(), FieldKind::Raw))
	/// 	}
	/// }
	///
	/// let mut registry = GeneratorRegistry::with_defaults();
	/// registry.register(StorageKind::Date, UpperDate);
	/// assert!(registry.get(StorageKind::Date).is_some());
	/// ```
	pub fn register(&mut self, kind: StorageKind, generator: impl FieldGenerator + 'static) {
		self.generators.insert(kind, Box::new(generator));
	}

	pub fn get(&self, kind: StorageKind) -> Option<&dyn FieldGenerator> {
		self.generators.get(&kind).map(Box::as_ref)
	}

	pub fn iter(&self) -> impl Iterator<Item = (StorageKind, &dyn FieldGenerator)> {
		self.generators
			.iter()
			.map(|(kind, generator)| (*kind, generator.as_ref()))
	}

	pub fn len(&self) -> usize {
		self.generators.len()
	}

	pub fn is_empty(&self) -> bool {
		self.generators.is_empty()
	}
}

impl Default for GeneratorRegistry {
	fn default() -> Self {
		Self::with_defaults()
	}
}

impl fmt::Debug for GeneratorRegistry {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("GeneratorRegistry")
			.field("kinds", &self.generators.keys().collect::<Vec<_>>())
			.finish()
	}
}
