//! Single-or-collection payloads

use crate::data::{Data, Record};
use crate::error::SerializeError;

/// A single item or a collection of items
///
/// The variant chosen on input is preserved on output: loading a `One`
/// record yields a `One` result and loading `Many` yields `Many`, even when
/// the collection has exactly one element.
#[derive(Debug, Clone, PartialEq)]
pub enum OneOrMany<T> {
	One(T),
	Many(Vec<T>),
}

impl<T> OneOrMany<T> {
	pub fn is_many(&self) -> bool {
		matches!(self, OneOrMany::Many(_))
	}

	/// Number of items carried
	pub fn len(&self) -> usize {
		match self {
			OneOrMany::One(_) => 1,
			OneOrMany::Many(items) => items.len(),
		}
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Apply `f` to every item, keeping the shape
	pub fn map<U>(self, mut f: impl FnMut(T) -> U) -> OneOrMany<U> {
		match self {
			OneOrMany::One(item) => OneOrMany::One(f(item)),
			OneOrMany::Many(items) => OneOrMany::Many(items.into_iter().map(f).collect()),
		}
	}

	/// Apply a fallible `f` to every item, stopping at the first error
	pub fn try_map<U, E>(self, mut f: impl FnMut(T) -> Result<U, E>) -> Result<OneOrMany<U>, E> {
		match self {
			OneOrMany::One(item) => f(item).map(OneOrMany::One),
			OneOrMany::Many(items) => items
				.into_iter()
				.map(f)
				.collect::<Result<Vec<_>, _>>()
				.map(OneOrMany::Many),
		}
	}

	/// Items as a vector, regardless of shape
	pub fn into_vec(self) -> Vec<T> {
		match self {
			OneOrMany::One(item) => vec![item],
			OneOrMany::Many(items) => items,
		}
	}

	/// The single item, or `None` for a collection
	pub fn into_one(self) -> Option<T> {
		match self {
			OneOrMany::One(item) => Some(item),
			OneOrMany::Many(_) => None,
		}
	}

	/// The collection, or `None` for a single item
	pub fn into_many(self) -> Option<Vec<T>> {
		match self {
			OneOrMany::One(_) => None,
			OneOrMany::Many(items) => Some(items),
		}
	}
}

impl<T> From<T> for OneOrMany<T> {
	fn from(item: T) -> Self {
		OneOrMany::One(item)
	}
}

impl<T> From<Vec<T>> for OneOrMany<T> {
	fn from(items: Vec<T>) -> Self {
		OneOrMany::Many(items)
	}
}

impl TryFrom<Data> for OneOrMany<Record> {
	type Error = SerializeError;

	/// A map becomes `One`; a list of maps becomes `Many`
	///
	/// # Examples
	///
	/// ```
	/// use auto_schema_serializers::{Data, OneOrMany, Record};
	/// use serde_json::json;
	///
	/// let data = Data::from_json(json!([{"id": 1}, {"id": 2}]));
	/// let records = OneOrMany::<Record>::try_from(data).unwrap();
	/// assert_eq!(records.len(), 2);
	/// assert!(records.is_many());
	/// ```
	fn try_from(data: Data) -> Result<Self, Self::Error> {
		match data {
			Data::Map(record) => Ok(OneOrMany::One(record)),
			Data::List(items) => items
				.into_iter()
				.enumerate()
				.map(|(index, item)| match item {
					Data::Map(record) => Ok(record),
					other => Err(SerializeError::Shape {
						message: format!("item {index} is a {}, expected a map", other.type_name()),
					}),
				})
				.collect::<Result<Vec<_>, _>>()
				.map(OneOrMany::Many),
			other => Err(SerializeError::Shape {
				message: format!("expected a map or a list of maps, got {}", other.type_name()),
			}),
		}
	}
}
