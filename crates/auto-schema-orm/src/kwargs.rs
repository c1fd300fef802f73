//! Keyword arguments passed to model constructors

use crate::model::Model;
use crate::value::{FromValue, ModelEnum, Value};
use indexmap::IndexMap;

/// Errors raised by a model constructor
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConstructionError {
	#[error("{model}() got an unexpected keyword argument '{keyword}'")]
	UnexpectedKeyword { model: String, keyword: String },

	#[error("{model}() missing required keyword argument '{keyword}'")]
	MissingKeyword { model: String, keyword: String },

	#[error("{model}() argument '{keyword}' must be {expected}, not {found}")]
	InvalidArgument {
		model: String,
		keyword: String,
		expected: &'static str,
		found: String,
	},

	#[error("{0}")]
	Custom(String),
}

/// A single keyword argument
#[derive(Debug)]
pub enum Arg {
	/// Column value
	Value(Value),
	/// Single related instance
	One(Box<dyn Model>),
	/// Related collection
	Many(Vec<Box<dyn Model>>),
}

impl Arg {
	fn describe(&self) -> String {
		match self {
			Arg::Value(value) => value.type_name().to_string(),
			Arg::One(model) => model.class().name().to_string(),
			Arg::Many(models) => format!("list of {}", models.len()),
		}
	}
}

/// Ordered keyword arguments for one constructor call
///
/// Constructors take the arguments they understand and finish with
/// [`Kwargs::finish`], which rejects anything left over.
///
/// # Examples
///
/// ```
/// use auto_schema_orm::{ConstructionError, Kwargs};
///
/// let mut kwargs = Kwargs::new("Task");
/// kwargs.insert_value("id", 1_i64);
/// kwargs.insert_value("color", "red");
///
/// let id: Option<i64> = kwargs.optional("id").unwrap();
/// assert_eq!(id, Some(1));
///
/// let err = kwargs.finish().unwrap_err();
/// assert!(matches!(err, ConstructionError::UnexpectedKeyword { .. }));
/// ```
#[derive(Debug)]
pub struct Kwargs {
	model: &'static str,
	args: IndexMap<String, Arg>,
}

impl Kwargs {
	/// Empty argument set for the constructor of `model`
	pub fn new(model: &'static str) -> Self {
		Self {
			model,
			args: IndexMap::new(),
		}
	}

	/// Model the arguments are addressed to
	pub fn model(&self) -> &'static str {
		self.model
	}

	/// Insert an argument, replacing any previous value under `key`
	pub fn insert(&mut self, key: impl Into<String>, arg: Arg) -> Option<Arg> {
		self.args.insert(key.into(), arg)
	}

	pub fn insert_value(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Arg> {
		self.insert(key, Arg::Value(value.into()))
	}

	pub fn get(&self, key: &str) -> Option<&Arg> {
		self.args.get(key)
	}

	pub fn contains_key(&self, key: &str) -> bool {
		self.args.contains_key(key)
	}

	pub fn keys(&self) -> impl Iterator<Item = &str> {
		self.args.keys().map(String::as_str)
	}

	pub fn len(&self) -> usize {
		self.args.len()
	}

	pub fn is_empty(&self) -> bool {
		self.args.is_empty()
	}

	/// Remove and return the raw argument under `key`
	pub fn take(&mut self, key: &str) -> Option<Arg> {
		self.args.shift_remove(key)
	}

	/// Take a column value; absent and `Null` both yield `None`
	pub fn optional<T: FromValue>(&mut self, key: &str) -> Result<Option<T>, ConstructionError> {
		match self.take(key) {
			None | Some(Arg::Value(Value::Null)) => Ok(None),
			Some(Arg::Value(value)) => T::from_value(value)
				.map(Some)
				.map_err(|found| self.invalid(key, T::EXPECTED, found.type_name().to_string())),
			Some(other) => Err(self.invalid(key, T::EXPECTED, other.describe())),
		}
	}

	/// Take a column value that must be present and non-null
	pub fn required<T: FromValue>(&mut self, key: &str) -> Result<T, ConstructionError> {
		self.optional(key)?.ok_or_else(|| ConstructionError::MissingKeyword {
			model: self.model.to_string(),
			keyword: key.to_string(),
		})
	}

	/// Take an enumeration value as the Rust enum `E`
	pub fn optional_enum<E: ModelEnum>(&mut self, key: &str) -> Result<Option<E>, ConstructionError> {
		let Some(value) = self.optional::<crate::value::EnumValue>(key)? else {
			return Ok(None);
		};
		E::from_enum_value(&value)
			.map(Some)
			.ok_or_else(|| self.invalid(key, E::ENUM_TYPE.name(), value.to_string()))
	}

	/// Take a single related instance
	pub fn one<M: Model>(&mut self, key: &str) -> Result<Option<M>, ConstructionError> {
		let expected = M::model_class().name();
		match self.take(key) {
			None | Some(Arg::Value(Value::Null)) => Ok(None),
			Some(Arg::One(model)) => model
				.downcast::<M>()
				.map(|model| Some(*model))
				.map_err(|found| self.invalid(key, expected, found.class().name().to_string())),
			Some(other) => Err(self.invalid(key, expected, other.describe())),
		}
	}

	/// Take a related collection; absent yields an empty vector
	pub fn many<M: Model>(&mut self, key: &str) -> Result<Vec<M>, ConstructionError> {
		let expected = M::model_class().name();
		match self.take(key) {
			None | Some(Arg::Value(Value::Null)) => Ok(Vec::new()),
			Some(Arg::Many(models)) => models
				.into_iter()
				.map(|model| {
					model
						.downcast::<M>()
						.map(|model| *model)
						.map_err(|found| self.invalid(key, expected, found.class().name().to_string()))
				})
				.collect(),
			Some(other) => Err(self.invalid(key, expected, other.describe())),
		}
	}

	/// Reject any argument the constructor did not take
	pub fn finish(self) -> Result<(), ConstructionError> {
		match self.args.into_iter().next() {
			Some((keyword, _)) => Err(ConstructionError::UnexpectedKeyword {
				model: self.model.to_string(),
				keyword,
			}),
			None => Ok(()),
		}
	}

	fn invalid(&self, key: &str, expected: &'static str, found: String) -> ConstructionError {
		ConstructionError::InvalidArgument {
			model: self.model.to_string(),
			keyword: key.to_string(),
			expected,
			found,
		}
	}
}

impl IntoIterator for Kwargs {
	type Item = (String, Arg);
	type IntoIter = indexmap::map::IntoIter<String, Arg>;

	fn into_iter(self) -> Self::IntoIter {
		self.args.into_iter()
	}
}

impl Extend<(String, Arg)> for Kwargs {
	fn extend<I: IntoIterator<Item = (String, Arg)>>(&mut self, iter: I) {
		self.args.extend(iter);
	}
}
