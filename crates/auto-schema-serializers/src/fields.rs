//! Field descriptors
//!
//! A [`FieldDescriptor`] describes how one model attribute is dumped into
//! [`Data`] and how incoming data is validated and coerced back into a model
//! [`Value`]. Descriptors are either inferred from the column declaration or
//! produced by a [`FieldGenerator`](crate::FieldGenerator).

use crate::data::Data;
use crate::schema::Schema;
use auto_schema_orm::{Attribute, Column, EnumType, StorageType, Value};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use std::fmt;
use std::sync::Arc;

const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";
const TIME_FORMAT: &str = "%H:%M:%S%.f";

pub(crate) const MISSING: &str = "Missing data for required field.";
pub(crate) const NULL: &str = "Field may not be null.";
pub(crate) const UNKNOWN: &str = "Unknown field.";

/// Encoding of a field
#[derive(Clone)]
pub enum FieldKind {
	Integer,
	Float,
	String { max_length: Option<usize> },
	Boolean,
	Date,
	DateTime,
	Time,
	/// Enumeration encoded by member name
	Enum(EnumType),
	/// Raw byte sequence
	Bytes,
	/// Values passed through without coercion
	Raw,
	/// Related model data handled by a nested schema
	Nested { schema: Arc<Schema>, many: bool },
}

impl FieldKind {
	/// Default encoding for a storage type
	pub fn for_storage(storage_type: &StorageType) -> Self {
		match storage_type {
			StorageType::Integer | StorageType::BigInteger => FieldKind::Integer,
			StorageType::Float => FieldKind::Float,
			StorageType::String { length } => FieldKind::String { max_length: *length },
			StorageType::Text => FieldKind::String { max_length: None },
			StorageType::Boolean => FieldKind::Boolean,
			StorageType::Date => FieldKind::Date,
			StorageType::DateTime => FieldKind::DateTime,
			StorageType::Time => FieldKind::Time,
			StorageType::Enum(enum_type) => FieldKind::Enum(*enum_type),
			StorageType::LargeBinary => FieldKind::Bytes,
			_ => FieldKind::Raw,
		}
	}

	pub fn is_nested(&self) -> bool {
		matches!(self, FieldKind::Nested { .. })
	}
}

impl fmt::Debug for FieldKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			FieldKind::Integer => f.write_str("Integer"),
			FieldKind::Float => f.write_str("Float"),
			FieldKind::String { max_length } => f
				.debug_struct("String")
				.field("max_length", max_length)
				.finish(),
			FieldKind::Boolean => f.write_str("Boolean"),
			FieldKind::Date => f.write_str("Date"),
			FieldKind::DateTime => f.write_str("DateTime"),
			FieldKind::Time => f.write_str("Time"),
			FieldKind::Enum(enum_type) => f.debug_tuple("Enum").field(&enum_type.name()).finish(),
			FieldKind::Bytes => f.write_str("Bytes"),
			FieldKind::Raw => f.write_str("Raw"),
			FieldKind::Nested { schema, many } => f
				.debug_struct("Nested")
				.field("schema", &schema.name())
				.field("many", many)
				.finish(),
		}
	}
}

impl PartialEq for FieldKind {
	fn eq(&self, other: &Self) -> bool {
		match (self, other) {
			(FieldKind::String { max_length: a }, FieldKind::String { max_length: b }) => a == b,
			(FieldKind::Enum(a), FieldKind::Enum(b)) => a == b,
			(
				FieldKind::Nested { schema: a, many: m },
				FieldKind::Nested { schema: b, many: n },
			) => Arc::ptr_eq(a, b) && m == n,
			(a, b) => !matches!(a, FieldKind::Nested { .. })
				&& std::mem::discriminant(a) == std::mem::discriminant(b),
		}
	}
}

/// How a single attribute is dumped and loaded
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
	name: String,
	kind: FieldKind,
	required: bool,
	allow_none: bool,
	dump_only: bool,
}

impl FieldDescriptor {
	/// Optional field that accepts `null`
	pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
		Self {
			name: name.into(),
			kind,
			required: false,
			allow_none: true,
			dump_only: false,
		}
	}

	/// Default-inferred field for a column attribute
	///
	/// A column is required when it is not nullable, has no default and is
	/// not an autoincrement primary key. `null` is accepted exactly when the
	/// column is nullable.
	pub fn infer(attribute: &Attribute, column: &Column) -> Self {
		let required =
			!column.is_nullable() && !column.has_default() && !(column.is_primary_key() && column.is_autoincrement());
		Self {
			name: attribute.key().to_string(),
			kind: FieldKind::for_storage(column.storage_type()),
			required,
			allow_none: column.is_nullable(),
			dump_only: attribute.is_computed(),
		}
	}

	pub fn required(mut self, required: bool) -> Self {
		self.required = required;
		self
	}

	pub fn allow_none(mut self, allow_none: bool) -> Self {
		self.allow_none = allow_none;
		self
	}

	pub fn dump_only(mut self, dump_only: bool) -> Self {
		self.dump_only = dump_only;
		self
	}

	pub(crate) fn set_dump_only(&mut self) {
		self.dump_only = true;
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn kind(&self) -> &FieldKind {
		&self.kind
	}

	pub fn is_required(&self) -> bool {
		self.required
	}

	pub fn allows_none(&self) -> bool {
		self.allow_none
	}

	pub fn is_dump_only(&self) -> bool {
		self.dump_only
	}

	/// Encode a model value
	///
	/// `Null` always dumps as [`Data::Null`].
	pub fn dump_value(&self, value: Value) -> Result<Data, String> {
		if value.is_null() {
			return Ok(Data::Null);
		}
		let mismatch = |value: &Value| format!("cannot encode {} as {:?}", value.type_name(), self.kind);

		match (&self.kind, value) {
			(FieldKind::Integer, Value::Integer(i)) => Ok(Data::Integer(i)),
			(FieldKind::Float, Value::Float(f)) => Ok(Data::Float(f)),
			(FieldKind::Float, Value::Integer(i)) => Ok(Data::Float(i as f64)),
			(FieldKind::String { .. }, Value::String(s)) => Ok(Data::String(s)),
			(FieldKind::Boolean, Value::Bool(b)) => Ok(Data::Bool(b)),
			(FieldKind::Date, Value::Date(d)) => Ok(Data::String(d.to_string())),
			(FieldKind::DateTime, Value::DateTime(dt)) => {
				Ok(Data::String(dt.format(DATETIME_FORMAT).to_string()))
			}
			(FieldKind::Time, Value::Time(t)) => Ok(Data::String(t.format(TIME_FORMAT).to_string())),
			(FieldKind::Enum(enum_type), Value::Enum(member)) if enum_type.contains(&member) => {
				Ok(Data::String(member.member().to_string()))
			}
			(FieldKind::Bytes, Value::Bytes(bytes)) => Ok(Data::Bytes(bytes)),
			(FieldKind::Raw, value) => Ok(raw_dump(value)),
			(_, value) => Err(mismatch(&value)),
		}
	}

	/// Validate and coerce incoming data into a model value
	///
	/// `null` is handled by the schema before this is called. Returns the
	/// validation message on failure.
	pub fn load_value(&self, data: Data) -> Result<Value, String> {
		match &self.kind {
			FieldKind::Integer => load_integer(data),
			FieldKind::Float => match data {
				Data::Float(f) => Ok(Value::Float(f)),
				Data::Integer(i) => Ok(Value::Float(i as f64)),
				Data::String(s) => s
					.trim()
					.parse::<f64>()
					.map(Value::Float)
					.map_err(|_| "Not a valid number.".to_string()),
				_ => Err("Not a valid number.".to_string()),
			},
			FieldKind::String { max_length } => match data {
				Data::String(s) => match max_length {
					Some(max) if s.chars().count() > *max => {
						Err(format!("Longer than maximum length {max}."))
					}
					_ => Ok(Value::String(s)),
				},
				_ => Err("Not a valid string.".to_string()),
			},
			FieldKind::Boolean => match data {
				Data::Bool(b) => Ok(Value::Bool(b)),
				Data::Integer(0) => Ok(Value::Bool(false)),
				Data::Integer(1) => Ok(Value::Bool(true)),
				Data::String(s) => match s.to_ascii_lowercase().as_str() {
					"true" | "1" => Ok(Value::Bool(true)),
					"false" | "0" => Ok(Value::Bool(false)),
					_ => Err("Not a valid boolean.".to_string()),
				},
				_ => Err("Not a valid boolean.".to_string()),
			},
			FieldKind::Date => parse_str(data, "Not a valid date.", |s| {
				NaiveDate::parse_from_str(s, "%Y-%m-%d").ok().map(Value::Date)
			}),
			FieldKind::DateTime => parse_str(data, "Not a valid datetime.", |s| {
				s.parse::<NaiveDateTime>().ok().map(Value::DateTime)
			}),
			FieldKind::Time => parse_str(data, "Not a valid time.", |s| {
				s.parse::<NaiveTime>().ok().map(Value::Time)
			}),
			FieldKind::Enum(enum_type) => match data {
				Data::String(name) => enum_type
					.member(&name)
					.map(Value::Enum)
					.ok_or_else(|| format!("Invalid enum member {name}")),
				_ => Err("Enum name must be string".to_string()),
			},
			FieldKind::Bytes => match data {
				Data::Bytes(bytes) => Ok(Value::Bytes(bytes)),
				Data::String(s) => Ok(Value::Bytes(s.into_bytes())),
				Data::List(items) => items
					.into_iter()
					.map(|item| item.as_i64().and_then(|i| u8::try_from(i).ok()))
					.collect::<Option<Vec<u8>>>()
					.map(Value::Bytes)
					.ok_or_else(|| "Not a valid byte sequence.".to_string()),
				_ => Err("Not a valid byte sequence.".to_string()),
			},
			FieldKind::Raw => raw_load(data),
			FieldKind::Nested { .. } => Err("Nested data must be loaded by its schema.".to_string()),
		}
	}
}

fn load_integer(data: Data) -> Result<Value, String> {
	const INVALID: &str = "Not a valid integer.";
	match data {
		Data::Integer(i) => Ok(Value::Integer(i)),
		Data::Float(f) if f.fract() == 0.0 && f.is_finite() && f.abs() < i64::MAX as f64 => {
			Ok(Value::Integer(f as i64))
		}
		Data::String(s) => s
			.trim()
			.parse::<i64>()
			.map(Value::Integer)
			.map_err(|_| INVALID.to_string()),
		_ => Err(INVALID.to_string()),
	}
}

fn parse_str(data: Data, invalid: &str, parse: impl FnOnce(&str) -> Option<Value>) -> Result<Value, String> {
	data.as_str()
		.and_then(parse)
		.ok_or_else(|| invalid.to_string())
}

fn raw_dump(value: Value) -> Data {
	match value {
		Value::Null => Data::Null,
		Value::Bool(b) => Data::Bool(b),
		Value::Integer(i) => Data::Integer(i),
		Value::Float(f) => Data::Float(f),
		Value::String(s) => Data::String(s),
		Value::Date(d) => Data::String(d.to_string()),
		Value::DateTime(dt) => Data::String(dt.format(DATETIME_FORMAT).to_string()),
		Value::Time(t) => Data::String(t.format(TIME_FORMAT).to_string()),
		Value::Enum(member) => Data::String(member.member().to_string()),
		Value::Bytes(bytes) => Data::Bytes(bytes),
	}
}

fn raw_load(data: Data) -> Result<Value, String> {
	match data {
		Data::Null => Ok(Value::Null),
		Data::Bool(b) => Ok(Value::Bool(b)),
		Data::Integer(i) => Ok(Value::Integer(i)),
		Data::Float(f) => Ok(Value::Float(f)),
		Data::String(s) => Ok(Value::String(s)),
		Data::Bytes(bytes) => Ok(Value::Bytes(bytes)),
		other => Err(format!("Cannot load {} into a column value.", other.type_name())),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use auto_schema_orm::StorageType;
	use rstest::rstest;

	const COLOR: EnumType = EnumType::new("Color", &["Red", "Green"]);

	fn field(kind: FieldKind) -> FieldDescriptor {
		FieldDescriptor::new("f", kind)
	}

	#[rstest]
	#[case(Column::new("id", StorageType::Integer).primary_key(), false, false)]
	#[case(Column::new("name", StorageType::Text).not_null(), true, false)]
	#[case(Column::new("name", StorageType::Text).not_null().with_default(), false, false)]
	#[case(Column::new("code", StorageType::Text).primary_key(), true, false)]
	#[case(Column::new("note", StorageType::Text), false, true)]
	fn test_infer_required_and_allow_none(
		#[case] column: Column,
		#[case] required: bool,
		#[case] allow_none: bool,
	) {
		// Arrange
		let attribute = Attribute::column(column.clone());

		// Act
		let descriptor = FieldDescriptor::infer(&attribute, &column);

		// Assert
		assert_eq!(descriptor.is_required(), required);
		assert_eq!(descriptor.allows_none(), allow_none);
		assert!(!descriptor.is_dump_only());
	}

	#[rstest]
	fn test_infer_string_length_becomes_max_length() {
		let column = Column::new("location", StorageType::String { length: Some(4) });
		let descriptor = FieldDescriptor::infer(&Attribute::column(column.clone()), &column);

		assert_eq!(descriptor.kind(), &FieldKind::String { max_length: Some(4) });
		assert_eq!(
			descriptor.load_value(Data::from("There")),
			Err("Longer than maximum length 4.".to_string())
		);
	}

	#[rstest]
	fn test_date_values_dump_as_iso_strings() {
		// Arrange
		let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
		let datetime = date.and_hms_opt(8, 30, 0).unwrap();

		// Act
		let dumped_date = field(FieldKind::Date).dump_value(Value::Date(date));
		let dumped_datetime = field(FieldKind::DateTime).dump_value(Value::DateTime(datetime));

		// Assert
		assert_eq!(dumped_date, Ok(Data::from("2024-03-09")));
		assert_eq!(dumped_datetime, Ok(Data::from("2024-03-09T08:30:00")));
	}

	#[rstest]
	#[case(Data::Integer(4), Ok(Value::Integer(4)))]
	#[case(Data::Float(4.0), Ok(Value::Integer(4)))]
	#[case(Data::from("12"), Ok(Value::Integer(12)))]
	#[case(Data::Float(4.5), Err("Not a valid integer.".to_string()))]
	#[case(Data::from("twelve"), Err("Not a valid integer.".to_string()))]
	#[case(Data::Bool(true), Err("Not a valid integer.".to_string()))]
	fn test_integer_load(#[case] input: Data, #[case] expected: Result<Value, String>) {
		assert_eq!(field(FieldKind::Integer).load_value(input), expected);
	}

	#[rstest]
	#[case(Data::from("Red"), Ok(Value::Enum(COLOR.member("Red").unwrap())))]
	#[case(Data::from("Blue"), Err("Invalid enum member Blue".to_string()))]
	#[case(Data::Integer(0), Err("Enum name must be string".to_string()))]
	fn test_enum_load(#[case] input: Data, #[case] expected: Result<Value, String>) {
		assert_eq!(field(FieldKind::Enum(COLOR)).load_value(input), expected);
	}

	#[rstest]
	fn test_enum_dump_uses_member_name() {
		let value = Value::Enum(COLOR.member("Green").unwrap());

		assert_eq!(field(FieldKind::Enum(COLOR)).dump_value(value), Ok(Data::from("Green")));
	}

	#[rstest]
	fn test_enum_dump_rejects_foreign_enum() {
		let other = EnumType::new("Paint", &["Red"]);
		let value = Value::Enum(other.member("Red").unwrap());

		assert!(field(FieldKind::Enum(COLOR)).dump_value(value).is_err());
	}

	#[rstest]
	#[case(Data::Bytes(vec![0, 1]), Ok(Value::Bytes(vec![0, 1])))]
	#[case(Data::List(vec![Data::Integer(7), Data::Integer(255)]), Ok(Value::Bytes(vec![7, 255])))]
	#[case(Data::List(vec![Data::Integer(256)]), Err("Not a valid byte sequence.".to_string()))]
	fn test_bytes_load(#[case] input: Data, #[case] expected: Result<Value, String>) {
		assert_eq!(field(FieldKind::Bytes).load_value(input), expected);
	}

	#[rstest]
	fn test_null_always_dumps() {
		let descriptor = field(FieldKind::Integer).allow_none(false);

		assert_eq!(descriptor.dump_value(Value::Null), Ok(Data::Null));
	}

	#[rstest]
	fn test_time_round_trip() {
		// Arrange
		let descriptor = field(FieldKind::Time);
		let time = NaiveTime::from_hms_milli_opt(13, 5, 7, 250).unwrap();

		// Act
		let dumped = descriptor.dump_value(Value::Time(time)).unwrap();
		let loaded = descriptor.load_value(dumped.clone());

		// Assert
		assert_eq!(dumped, Data::from("13:05:07.250"));
		assert_eq!(loaded, Ok(Value::Time(time)));
	}
}
