//! Schema synthesis

use crate::cache::SchemaCache;
use crate::config::AutoSchemaConfig;
use crate::error::SchemaError;
use crate::fields::{FieldDescriptor, FieldKind};
use crate::generators::GeneratorRegistry;
use crate::schema::{LoadOptions, Schema};
use auto_schema_orm::{
	ColumnProperty, Model, ModelClass, PropertyFilter, computed_columns, find_col_types,
	get_columns_of_property_type, relationships,
};
use std::sync::Arc;
use tracing::debug;

/// Synthesizes and caches schemas for model classes
///
/// # Examples
///
/// ```ignore
/// let auto_schema = AutoSchema::default();
/// let schema = auto_schema.generate_schema(Task::model_class())?;
/// assert!(Arc::ptr_eq(&schema, &auto_schema.get_schema(Task::model_class())?));
/// ```
#[derive(Debug)]
pub struct AutoSchema {
	config: AutoSchemaConfig,
	generators: GeneratorRegistry,
	cache: SchemaCache,
}

impl AutoSchema {
	pub fn new(config: AutoSchemaConfig) -> Self {
		Self {
			cache: SchemaCache::new(config.cache_capacity),
			generators: GeneratorRegistry::with_defaults(),
			config,
		}
	}

	/// Replace the field generators; previously cached schemas are dropped
	pub fn with_generators(mut self, generators: GeneratorRegistry) -> Self {
		self.generators = generators;
		self.cache.clear();
		self
	}

	pub fn config(&self) -> &AutoSchemaConfig {
		&self.config
	}

	pub fn generators(&self) -> &GeneratorRegistry {
		&self.generators
	}

	pub fn cache(&self) -> &SchemaCache {
		&self.cache
	}

	/// Schema for `class`, synthesized on first request
	///
	/// While the schema stays cached every call returns the same `Arc`.
	///
	/// # Errors
	///
	/// [`SchemaError::CyclicRelationship`] when the relationship graph
	/// reachable from `class` loops back, and any error raised by a field
	/// generator or by column introspection.
	pub fn generate_schema(&self, class: &'static ModelClass) -> Result<Arc<Schema>, SchemaError> {
		let mut in_progress = Vec::new();
		self.generate(class, &mut in_progress)
	}

	/// Alias of [`AutoSchema::generate_schema`]
	pub fn get_schema(&self, class: &'static ModelClass) -> Result<Arc<Schema>, SchemaError> {
		self.generate_schema(class)
	}

	/// Schema for the model type `M`
	pub fn schema_for<M: Model>(&self) -> Result<Arc<Schema>, SchemaError> {
		self.generate_schema(M::model_class())
	}

	fn generate(
		&self,
		class: &'static ModelClass,
		in_progress: &mut Vec<&'static ModelClass>,
	) -> Result<Arc<Schema>, SchemaError> {
		if let Some(schema) = self.cache.get(&class.type_id()) {
			return Ok(schema);
		}
		if let Some(start) = in_progress.iter().position(|pending| *pending == class) {
			let mut path: Vec<String> = in_progress[start..]
				.iter()
				.map(|pending| pending.name().to_string())
				.collect();
			path.push(class.name().to_string());
			return Err(SchemaError::CyclicRelationship { path });
		}

		in_progress.push(class);
		let synthesized = self.synthesize(class, in_progress);
		in_progress.pop();

		Ok(self.cache.insert(class.type_id(), Arc::new(synthesized?)))
	}

	fn synthesize(
		&self,
		class: &'static ModelClass,
		in_progress: &mut Vec<&'static ModelClass>,
	) -> Result<Schema, SchemaError> {
		debug!(model = class.name(), "synthesizing schema");

		let mut builder = Schema::builder(class)
			.include_fk(self.config.include_fk)
			.options(LoadOptions::from(&self.config));

		for attribute in get_columns_of_property_type(class, PropertyFilter::Column) {
			let Some(column) = attribute.column_property().and_then(ColumnProperty::column) else {
				continue;
			};
			if column.is_foreign_key() && !self.config.include_fk {
				continue;
			}
			builder.field(FieldDescriptor::infer(attribute, column));
		}

		for (kind, generator) in self.generators.iter() {
			for attribute in find_col_types(class, kind) {
				// excluded foreign keys stay excluded
				if !builder.has_field(attribute.key()) {
					continue;
				}
				builder.field(generator.generate(attribute)?);
			}
		}

		for attribute in computed_columns(class) {
			if let Some(field) = builder.field_mut(attribute.key()) {
				field.set_dump_only();
			}
			builder.exclude_from_load(attribute.key());
		}

		for (attribute, relationship) in relationships(class) {
			let nested = self.generate(relationship.target(), in_progress)?;
			let kind = FieldKind::Nested {
				schema: nested,
				many: relationship.uselist(),
			};
			builder.field(FieldDescriptor::new(attribute.key(), kind).required(false).allow_none(true));
			builder.exclude_from_load(attribute.key());
		}

		let schema = builder.build();
		debug!(
			schema = schema.name(),
			fields = schema.fields().count(),
			"synthesized schema"
		);
		Ok(schema)
	}
}

impl Default for AutoSchema {
	fn default() -> Self {
		Self::new(AutoSchemaConfig::default())
	}
}
