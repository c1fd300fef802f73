//! Generated schemas: dump and load
//!
//! A [`Schema`] is bound to one model class. It dumps instances of that class
//! into [`Record`]s and validates incoming records into [`LoadedRecord`]s,
//! recursing into nested schemas for relationships. Schemas are normally
//! obtained from [`AutoSchema`](crate::AutoSchema) rather than built by hand.

use crate::config::{AutoSchemaConfig, UnknownPolicy};
use crate::data::{Data, Record};
use crate::error::{SerializeError, ValidationErrors};
use crate::fields::{self, FieldDescriptor, FieldKind};
use crate::shape::OneOrMany;
use auto_schema_orm::{AttributeRef, Model, ModelClass, Value};
use indexmap::{IndexMap, IndexSet};
use std::sync::Arc;

/// A validated record, ready for the model constructor
pub type LoadedRecord = IndexMap<String, Loaded>;

/// A validated field value
#[derive(Debug, Clone, PartialEq)]
pub enum Loaded {
	/// Column value, or `Null` for an explicit null
	Value(Value),
	/// Data of a single related instance
	One(LoadedRecord),
	/// Data of a related collection
	Many(Vec<LoadedRecord>),
}

impl Loaded {
	pub fn as_value(&self) -> Option<&Value> {
		match self {
			Loaded::Value(value) => Some(value),
			_ => None,
		}
	}

	/// Explicit `null`
	pub fn is_null(&self) -> bool {
		matches!(self, Loaded::Value(Value::Null))
	}

	/// No related data: `null`, an empty collection or an empty record
	pub fn is_empty(&self) -> bool {
		match self {
			Loaded::Value(value) => value.is_null(),
			Loaded::One(record) => record.is_empty(),
			Loaded::Many(records) => records.is_empty(),
		}
	}
}

/// Options forwarded to a load
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoadOptions {
	/// Skip required-field checks
	pub partial: bool,
	/// Handling of keys without a field
	pub unknown: UnknownPolicy,
}

impl LoadOptions {
	pub fn partial(mut self, partial: bool) -> Self {
		self.partial = partial;
		self
	}

	pub fn unknown(mut self, unknown: UnknownPolicy) -> Self {
		self.unknown = unknown;
		self
	}
}

impl From<&AutoSchemaConfig> for LoadOptions {
	fn from(config: &AutoSchemaConfig) -> Self {
		Self {
			partial: config.partial,
			unknown: config.unknown,
		}
	}
}

/// Serializer bound to one model class
#[derive(Debug)]
pub struct Schema {
	name: String,
	model: &'static ModelClass,
	include_fk: bool,
	fields: IndexMap<String, FieldDescriptor>,
	load_excluded: IndexSet<String>,
	options: LoadOptions,
}

impl Schema {
	pub fn builder(model: &'static ModelClass) -> SchemaBuilder {
		SchemaBuilder::new(model)
	}

	/// `"{Model}Schema"`
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Model class this schema serializes
	pub fn model(&self) -> &'static ModelClass {
		self.model
	}

	pub fn include_fk(&self) -> bool {
		self.include_fk
	}

	/// Field descriptors in declaration order
	pub fn fields(&self) -> impl Iterator<Item = &FieldDescriptor> {
		self.fields.values()
	}

	pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
		self.fields.get(name)
	}

	/// Schema of the related model behind relationship `name`
	pub fn nested(&self, name: &str) -> Option<&Arc<Schema>> {
		match self.fields.get(name).map(FieldDescriptor::kind) {
			Some(FieldKind::Nested { schema, .. }) => Some(schema),
			_ => None,
		}
	}

	/// Attributes excluded from the arguments passed to the constructor
	pub fn load_excluded(&self) -> impl Iterator<Item = &str> {
		self.load_excluded.iter().map(String::as_str)
	}

	pub fn is_load_excluded(&self, name: &str) -> bool {
		self.load_excluded.contains(name)
	}

	/// Load options used when none are given
	pub fn options(&self) -> &LoadOptions {
		&self.options
	}

	/// Dump an instance of this schema's model
	///
	/// Attributes the instance does not report are left out. An unset single
	/// relationship dumps as `null` and an empty collection as an empty list.
	pub fn dump(&self, instance: &dyn Model) -> Result<Record, SerializeError> {
		if !self.model.is_class_of(instance) {
			return Err(SerializeError::ModelMismatch {
				expected: self.model.name().to_string(),
				found: instance.class().name().to_string(),
			});
		}

		let mut record = Record::with_capacity(self.fields.len());
		for field in self.fields.values() {
			let Some(attribute) = instance.attribute(field.name()) else {
				continue;
			};
			let data = self.dump_attribute(field, attribute)?;
			record.insert(field.name().to_string(), data);
		}
		Ok(record)
	}

	pub fn dump_many(&self, instances: &[&dyn Model]) -> Result<Vec<Record>, SerializeError> {
		instances.iter().map(|instance| self.dump(*instance)).collect()
	}

	/// Dump keeping the input shape: a map for `One`, a list of maps for `Many`
	pub fn dump_shape(&self, instances: OneOrMany<&dyn Model>) -> Result<Data, SerializeError> {
		match instances {
			OneOrMany::One(instance) => self.dump(instance).map(Data::Map),
			OneOrMany::Many(instances) => self
				.dump_many(&instances)
				.map(|records| Data::List(records.into_iter().map(Data::Map).collect())),
		}
	}

	fn dump_attribute(&self, field: &FieldDescriptor, attribute: AttributeRef<'_>) -> Result<Data, SerializeError> {
		let dump_error = |message: String| SerializeError::Dump {
			field: field.name().to_string(),
			message,
		};

		match (field.kind(), attribute) {
			(FieldKind::Nested { .. }, AttributeRef::One(None)) => Ok(Data::Null),
			(FieldKind::Nested { .. }, AttributeRef::Value(Value::Null)) => Ok(Data::Null),
			(FieldKind::Nested { schema, .. }, AttributeRef::One(Some(related))) => {
				schema.dump(related).map(Data::Map)
			}
			(FieldKind::Nested { schema, .. }, AttributeRef::Many(related)) => related
				.into_iter()
				.map(|instance| schema.dump(instance).map(Data::Map))
				.collect::<Result<Vec<_>, _>>()
				.map(Data::List),
			(FieldKind::Nested { .. }, AttributeRef::Value(value)) => Err(dump_error(format!(
				"expected related instances, got {}",
				value.type_name()
			))),
			(_, AttributeRef::Value(value)) => field.dump_value(value).map_err(dump_error),
			(_, AttributeRef::One(_) | AttributeRef::Many(_)) => {
				Err(dump_error("expected a column value, got related instances".to_string()))
			}
		}
	}

	/// Validate and coerce records
	///
	/// Every field error is collected before failing. Keys of computed
	/// attributes are discarded; other keys without a field are handled
	/// according to [`LoadOptions::unknown`].
	///
	/// # Errors
	///
	/// [`SerializeError::Validation`] with one entry per failing path.
	pub fn load(
		&self,
		records: OneOrMany<Record>,
		options: &LoadOptions,
	) -> Result<OneOrMany<LoadedRecord>, SerializeError> {
		let mut errors = ValidationErrors::new();
		let loaded = match records {
			OneOrMany::One(record) => OneOrMany::One(self.load_record(record, options, &mut errors, "")),
			OneOrMany::Many(records) => OneOrMany::Many(
				records
					.into_iter()
					.enumerate()
					.map(|(index, record)| self.load_record(record, options, &mut errors, &index.to_string()))
					.collect(),
			),
		};
		errors.into_result(loaded).map_err(SerializeError::from)
	}

	pub(crate) fn load_record(
		&self,
		mut record: Record,
		options: &LoadOptions,
		errors: &mut ValidationErrors,
		prefix: &str,
	) -> LoadedRecord {
		let mut loaded = LoadedRecord::with_capacity(self.fields.len());

		for field in self.fields.values() {
			let path = join_path(prefix, field.name());
			let Some(data) = record.shift_remove(field.name()) else {
				if field.is_required() && !field.is_dump_only() && !options.partial {
					errors.add(path, fields::MISSING);
				}
				continue;
			};
			if field.is_dump_only() {
				continue;
			}
			if data.is_null() {
				if field.allows_none() {
					loaded.insert(field.name().to_string(), Loaded::Value(Value::Null));
				} else {
					errors.add(path, fields::NULL);
				}
				continue;
			}

			let value = match field.kind() {
				FieldKind::Nested { schema, many } => schema.load_nested(data, *many, options, errors, &path),
				_ => match field.load_value(data) {
					Ok(value) => Some(Loaded::Value(value)),
					Err(message) => {
						errors.add(path, message);
						None
					}
				},
			};
			if let Some(value) = value {
				loaded.insert(field.name().to_string(), value);
			}
		}

		if options.unknown == UnknownPolicy::Raise {
			for key in record.keys() {
				errors.add(join_path(prefix, key), fields::UNKNOWN);
			}
		}

		loaded
	}

	fn load_nested(
		&self,
		data: Data,
		many: bool,
		options: &LoadOptions,
		errors: &mut ValidationErrors,
		path: &str,
	) -> Option<Loaded> {
		match (many, data) {
			(false, Data::Map(record)) => Some(Loaded::One(self.load_record(record, options, errors, path))),
			(true, Data::List(items)) => {
				let mut records = Vec::with_capacity(items.len());
				for (index, item) in items.into_iter().enumerate() {
					let item_path = join_path(path, &index.to_string());
					match item {
						Data::Map(record) => records.push(self.load_record(record, options, errors, &item_path)),
						_ => errors.add(item_path, "Invalid input type."),
					}
				}
				Some(Loaded::Many(records))
			}
			(false, _) => {
				errors.add(path, "Invalid input type.");
				None
			}
			(true, _) => {
				errors.add(path, "Invalid type.");
				None
			}
		}
	}
}

fn join_path(prefix: &str, key: &str) -> String {
	if prefix.is_empty() {
		key.to_string()
	} else {
		format!("{prefix}.{key}")
	}
}

/// Builder for [`Schema`]
#[derive(Debug)]
pub struct SchemaBuilder {
	model: &'static ModelClass,
	include_fk: bool,
	fields: IndexMap<String, FieldDescriptor>,
	load_excluded: IndexSet<String>,
	options: LoadOptions,
}

impl SchemaBuilder {
	pub fn new(model: &'static ModelClass) -> Self {
		Self {
			model,
			include_fk: true,
			fields: IndexMap::new(),
			load_excluded: IndexSet::new(),
			options: LoadOptions::default(),
		}
	}

	pub fn include_fk(mut self, include_fk: bool) -> Self {
		self.include_fk = include_fk;
		self
	}

	pub fn options(mut self, options: LoadOptions) -> Self {
		self.options = options;
		self
	}

	/// Install a field; an existing field of the same name is replaced in place
	pub fn field(&mut self, field: FieldDescriptor) -> &mut Self {
		self.fields.insert(field.name().to_string(), field);
		self
	}

	pub fn field_mut(&mut self, name: &str) -> Option<&mut FieldDescriptor> {
		self.fields.get_mut(name)
	}

	pub fn has_field(&self, name: &str) -> bool {
		self.fields.contains_key(name)
	}

	/// Exclude an attribute from the constructor arguments
	pub fn exclude_from_load(&mut self, name: impl Into<String>) -> &mut Self {
		self.load_excluded.insert(name.into());
		self
	}

	pub fn build(self) -> Schema {
		Schema {
			name: format!("{}Schema", self.model.name()),
			model: self.model,
			include_fk: self.include_fk,
			fields: self.fields,
			load_excluded: self.load_excluded,
			options: self.options,
		}
	}
}
