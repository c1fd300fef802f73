//! Model rehydration
//!
//! Rebuilds model instances from loaded records, bottom-up: related data is
//! turned into instances of the target model first, then handed to the
//! parent constructor under the relationship key.

use crate::data::Record;
use crate::error::{SerializeError, ValidationErrors};
use crate::schema::{LoadOptions, Loaded, LoadedRecord, Schema};
use crate::shape::OneOrMany;
use auto_schema_orm::{Arg, Model, has_relationships, relationships};
use tracing::trace;

impl Schema {
	/// Load records and construct model instances with the schema's options
	///
	/// Relationship keys that are absent, `null` or empty are not passed to
	/// the constructor, leaving the attribute at the constructor's default.
	///
	/// # Errors
	///
	/// Validation errors from the load, and construction errors from the
	/// model constructors, unmodified.
	pub fn load_instance(&self, records: OneOrMany<Record>) -> Result<OneOrMany<Box<dyn Model>>, SerializeError> {
		let options = *self.options();
		self.load_instance_with(records, &options)
	}

	pub fn load_instance_with(
		&self,
		records: OneOrMany<Record>,
		options: &LoadOptions,
	) -> Result<OneOrMany<Box<dyn Model>>, SerializeError> {
		self.load(records, options)?
			.try_map(|record| self.construct(record))
	}

	/// Load a single record into the concrete model type `M`
	///
	/// # Examples
	///
	/// ```ignore
	/// let task: Task = schema.load_instance_as(schema.dump(&task)?)?;
	/// ```
	pub fn load_instance_as<M: Model>(&self, record: Record) -> Result<M, SerializeError> {
		let mut errors = ValidationErrors::new();
		let loaded = self.load_record(record, self.options(), &mut errors, "");
		let loaded = errors.into_result(loaded)?;

		self.construct(loaded)?
			.downcast::<M>()
			.map(|instance| *instance)
			.map_err(|_| SerializeError::Downcast {
				expected: M::model_class().name().to_string(),
			})
	}

	fn construct(&self, record: LoadedRecord) -> Result<Box<dyn Model>, SerializeError> {
		if has_relationships(self.model()) {
			self.rehydrate(record)
		} else {
			self.construct_flat(record, Vec::new())
		}
	}

	fn rehydrate(&self, mut record: LoadedRecord) -> Result<Box<dyn Model>, SerializeError> {
		let model = self.model();
		let mut related = Vec::new();

		for (attribute, _) in relationships(model) {
			let key = attribute.key();
			let Some(loaded) = record.shift_remove(key) else {
				continue;
			};
			if loaded.is_empty() {
				trace!(model = model.name(), relationship = key, "no related data");
				continue;
			}
			let Some(nested) = self.nested(key) else {
				continue;
			};

			let arg = match loaded {
				Loaded::One(record) => Arg::One(nested.construct(record)?),
				Loaded::Many(records) => Arg::Many(
					records
						.into_iter()
						.map(|record| nested.construct(record))
						.collect::<Result<_, _>>()?,
				),
				Loaded::Value(value) => {
					return Err(SerializeError::Shape {
						message: format!("'{key}' holds a {}, expected related data", value.type_name()),
					});
				}
			};
			trace!(
				model = model.name(),
				relationship = key,
				target = nested.model().name(),
				"rehydrated relationship"
			);
			related.push((key.to_string(), arg));
		}

		self.construct_flat(record, related)
	}

	fn construct_flat(&self, record: LoadedRecord, related: Vec<(String, Arg)>) -> Result<Box<dyn Model>, SerializeError> {
		let model = self.model();
		let mut kwargs = model.kwargs();

		for (key, loaded) in record {
			if self.is_load_excluded(&key) {
				continue;
			}
			match loaded {
				Loaded::Value(value) => {
					kwargs.insert(key, Arg::Value(value));
				}
				Loaded::One(_) | Loaded::Many(_) => {
					return Err(SerializeError::Shape {
						message: format!("unexpected nested data under '{key}' for {}", model.name()),
					});
				}
			}
		}
		kwargs.extend(related);

		Ok(model.construct(kwargs)?)
	}
}
