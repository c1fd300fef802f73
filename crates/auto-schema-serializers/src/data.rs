//! Serialized data tree
//!
//! [`Data`] is the plain, JSON-compatible representation produced by
//! [`Schema::dump`](crate::Schema::dump) and consumed by
//! [`Schema::load`](crate::Schema::load). Unlike JSON it keeps byte strings
//! distinct from lists.

use indexmap::IndexMap;
use serde::de::{self, MapAccess, SeqAccess, Visitor};
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// An insertion-ordered mapping of field names to data
pub type Record = IndexMap<String, Data>;

/// A serialized value
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Data {
	#[default]
	Null,
	Bool(bool),
	Integer(i64),
	Float(f64),
	String(String),
	Bytes(Vec<u8>),
	List(Vec<Data>),
	Map(Record),
}

impl Data {
	/// Short type name used in validation messages
	pub fn type_name(&self) -> &'static str {
		match self {
			Data::Null => "null",
			Data::Bool(_) => "bool",
			Data::Integer(_) => "integer",
			Data::Float(_) => "float",
			Data::String(_) => "string",
			Data::Bytes(_) => "bytes",
			Data::List(_) => "list",
			Data::Map(_) => "map",
		}
	}

	pub fn is_null(&self) -> bool {
		matches!(self, Data::Null)
	}

	pub fn as_str(&self) -> Option<&str> {
		match self {
			Data::String(s) => Some(s),
			_ => None,
		}
	}

	pub fn as_i64(&self) -> Option<i64> {
		match self {
			Data::Integer(i) => Some(*i),
			_ => None,
		}
	}

	pub fn as_list(&self) -> Option<&[Data]> {
		match self {
			Data::List(items) => Some(items),
			_ => None,
		}
	}

	pub fn as_map(&self) -> Option<&Record> {
		match self {
			Data::Map(record) => Some(record),
			_ => None,
		}
	}

	/// Convert from a JSON value
	///
	/// Numbers that fit in an `i64` become integers, everything else becomes a
	/// float. JSON has no byte strings, so arrays always become lists.
	///
	/// # Examples
	///
	/// ```
	/// use auto_schema_serializers::Data;
	/// use serde_json::json;
	///
	/// let data = Data::from_json(json!({"id": 1, "tags": ["a"]}));
	/// let record = data.as_map().unwrap();
	/// assert_eq!(record["id"], Data::Integer(1));
	/// ```
	pub fn from_json(value: serde_json::Value) -> Self {
		match value {
			serde_json::Value::Null => Data::Null,
			serde_json::Value::Bool(b) => Data::Bool(b),
			serde_json::Value::Number(n) => match n.as_i64() {
				Some(i) => Data::Integer(i),
				None => n.as_f64().map_or(Data::Null, Data::Float),
			},
			serde_json::Value::String(s) => Data::String(s),
			serde_json::Value::Array(items) => {
				Data::List(items.into_iter().map(Data::from_json).collect())
			}
			serde_json::Value::Object(map) => Data::Map(
				map.into_iter()
					.map(|(key, value)| (key, Data::from_json(value)))
					.collect(),
			),
		}
	}

	/// Convert into a JSON value
	///
	/// Bytes become an array of integers; non-finite floats become `null`.
	pub fn to_json(&self) -> serde_json::Value {
		match self {
			Data::Null => serde_json::Value::Null,
			Data::Bool(b) => serde_json::Value::Bool(*b),
			Data::Integer(i) => serde_json::Value::from(*i),
			Data::Float(f) => serde_json::Number::from_f64(*f)
				.map_or(serde_json::Value::Null, serde_json::Value::Number),
			Data::String(s) => serde_json::Value::String(s.clone()),
			Data::Bytes(bytes) => {
				serde_json::Value::Array(bytes.iter().map(|b| serde_json::Value::from(*b)).collect())
			}
			Data::List(items) => serde_json::Value::Array(items.iter().map(Data::to_json).collect()),
			Data::Map(record) => serde_json::Value::Object(
				record
					.iter()
					.map(|(key, value)| (key.clone(), value.to_json()))
					.collect(),
			),
		}
	}
}

impl From<serde_json::Value> for Data {
	fn from(value: serde_json::Value) -> Self {
		Data::from_json(value)
	}
}

impl From<&Data> for serde_json::Value {
	fn from(data: &Data) -> Self {
		data.to_json()
	}
}

impl From<bool> for Data {
	fn from(value: bool) -> Self {
		Data::Bool(value)
	}
}

impl From<i64> for Data {
	fn from(value: i64) -> Self {
		Data::Integer(value)
	}
}

impl From<i32> for Data {
	fn from(value: i32) -> Self {
		Data::Integer(i64::from(value))
	}
}

impl From<f64> for Data {
	fn from(value: f64) -> Self {
		Data::Float(value)
	}
}

impl From<String> for Data {
	fn from(value: String) -> Self {
		Data::String(value)
	}
}

impl From<&str> for Data {
	fn from(value: &str) -> Self {
		Data::String(value.to_string())
	}
}

impl From<Vec<u8>> for Data {
	fn from(value: Vec<u8>) -> Self {
		Data::Bytes(value)
	}
}

impl From<Vec<Data>> for Data {
	fn from(value: Vec<Data>) -> Self {
		Data::List(value)
	}
}

impl From<Record> for Data {
	fn from(value: Record) -> Self {
		Data::Map(value)
	}
}

impl<T: Into<Data>> From<Option<T>> for Data {
	fn from(value: Option<T>) -> Self {
		value.map_or(Data::Null, Into::into)
	}
}

impl Serialize for Data {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		match self {
			Data::Null => serializer.serialize_unit(),
			Data::Bool(b) => serializer.serialize_bool(*b),
			Data::Integer(i) => serializer.serialize_i64(*i),
			Data::Float(f) => serializer.serialize_f64(*f),
			Data::String(s) => serializer.serialize_str(s),
			Data::Bytes(bytes) => serializer.serialize_bytes(bytes),
			Data::List(items) => {
				let mut seq = serializer.serialize_seq(Some(items.len()))?;
				for item in items {
					seq.serialize_element(item)?;
				}
				seq.end()
			}
			Data::Map(record) => {
				let mut map = serializer.serialize_map(Some(record.len()))?;
				for (key, value) in record {
					map.serialize_entry(key, value)?;
				}
				map.end()
			}
		}
	}
}

struct DataVisitor;

impl<'de> Visitor<'de> for DataVisitor {
	type Value = Data;

	fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str("any serialized value")
	}

	fn visit_bool<E: de::Error>(self, v: bool) -> Result<Data, E> {
		Ok(Data::Bool(v))
	}

	fn visit_i64<E: de::Error>(self, v: i64) -> Result<Data, E> {
		Ok(Data::Integer(v))
	}

	fn visit_u64<E: de::Error>(self, v: u64) -> Result<Data, E> {
		Ok(i64::try_from(v).map_or(Data::Float(v as f64), Data::Integer))
	}

	fn visit_f64<E: de::Error>(self, v: f64) -> Result<Data, E> {
		Ok(Data::Float(v))
	}

	fn visit_str<E: de::Error>(self, v: &str) -> Result<Data, E> {
		Ok(Data::String(v.to_string()))
	}

	fn visit_string<E: de::Error>(self, v: String) -> Result<Data, E> {
		Ok(Data::String(v))
	}

	fn visit_bytes<E: de::Error>(self, v: &[u8]) -> Result<Data, E> {
		Ok(Data::Bytes(v.to_vec()))
	}

	fn visit_byte_buf<E: de::Error>(self, v: Vec<u8>) -> Result<Data, E> {
		Ok(Data::Bytes(v))
	}

	fn visit_none<E: de::Error>(self) -> Result<Data, E> {
		Ok(Data::Null)
	}

	fn visit_unit<E: de::Error>(self) -> Result<Data, E> {
		Ok(Data::Null)
	}

	fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Data, D::Error> {
		Data::deserialize(deserializer)
	}

	fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Data, A::Error> {
		let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
		while let Some(item) = seq.next_element()? {
			items.push(item);
		}
		Ok(Data::List(items))
	}

	fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Data, A::Error> {
		let mut record = Record::with_capacity(map.size_hint().unwrap_or(0));
		while let Some((key, value)) = map.next_entry::<String, Data>()? {
			record.insert(key, value);
		}
		Ok(Data::Map(record))
	}
}

impl<'de> Deserialize<'de> for Data {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		deserializer.deserialize_any(DataVisitor)
	}
}

/// Build a [`Record`] from `key => value` pairs
///
/// # Examples
///
/// ```
/// use auto_schema_serializers::{Data, record};
///
/// let record = record! { "id" => 1, "name" => "Test" };
/// assert_eq!(record["name"], Data::from("Test"));
/// ```
#[macro_export]
macro_rules! record {
	() => {
		$crate::Record::new()
	};
	($($key:expr => $value:expr),+ $(,)?) => {{
		let mut record = $crate::Record::new();
		$(record.insert(::std::string::String::from($key), $crate::Data::from($value));)+
		record
	}};
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;

	#[rstest]
	fn test_json_conversion_keeps_field_order() {
		// Arrange
		let record = crate::record! { "b" => 1, "a" => "x", "c" => Data::Null };

		// Act
		let json = Data::Map(record).to_json();

		// Assert
		assert_eq!(json, json!({"b": 1, "a": "x", "c": null}));
	}

	#[rstest]
	fn test_bytes_are_serialized_as_byte_array() {
		let data = Data::Bytes(vec![1, 2, 255]);

		assert_eq!(serde_json::to_value(&data).unwrap(), json!([1, 2, 255]));
		assert_eq!(data.to_json(), json!([1, 2, 255]));
	}

	#[rstest]
	#[case(json!(7), Data::Integer(7))]
	#[case(json!(1.5), Data::Float(1.5))]
	#[case(json!(u64::MAX), Data::Float(u64::MAX as f64))]
	#[case(json!(null), Data::Null)]
	fn test_from_json_numbers(#[case] input: serde_json::Value, #[case] expected: Data) {
		assert_eq!(Data::from_json(input), expected);
	}

	#[rstest]
	fn test_deserialize_from_json_text() {
		// Arrange
		let text = r#"{"id": 1, "attachments": [{"location": "Here"}]}"#;

		// Act
		let data: Data = serde_json::from_str(text).unwrap();

		// Assert
		let attachments = data.as_map().unwrap()["attachments"].as_list().unwrap();
		assert_eq!(
			attachments[0].as_map().unwrap()["location"],
			Data::from("Here")
		);
	}

	#[rstest]
	fn test_non_finite_float_to_json_is_null() {
		assert_eq!(Data::Float(f64::NAN).to_json(), serde_json::Value::Null);
	}
}
