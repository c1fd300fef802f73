//! Attribute values as held by model instances
//!
//! [`Value`] is the model-side representation of a single column value. It is
//! what a model reports for an attribute when it is dumped, and what a
//! constructor receives back through [`Kwargs`](crate::Kwargs) when an
//! instance is loaded.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use std::fmt;

/// An enumeration declared by a model column
///
/// Members are identified by name. The serialized form of an enum attribute
/// is always the member name.
///
/// # Examples
///
/// ```
/// use auto_schema_orm::EnumType;
///
/// const STATUS: EnumType = EnumType::new("Status", &["Open", "Closed"]);
///
/// assert!(STATUS.member("Open").is_some());
/// assert!(STATUS.member("open").is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EnumType {
	name: &'static str,
	members: &'static [&'static str],
}

impl EnumType {
	/// Create an enumeration with the given member names
	pub const fn new(name: &'static str, members: &'static [&'static str]) -> Self {
		Self { name, members }
	}

	/// Enumeration name
	pub const fn name(&self) -> &'static str {
		self.name
	}

	/// Member names in declaration order
	pub const fn members(&self) -> &'static [&'static str] {
		self.members
	}

	/// Look up a member by its exact name
	pub fn member(&self, name: &str) -> Option<EnumValue> {
		self.members
			.iter()
			.find(|member| **member == name)
			.map(|member| EnumValue {
				enum_name: self.name,
				member,
			})
	}

	/// Check whether `value` is a member of this enumeration
	pub fn contains(&self, value: &EnumValue) -> bool {
		value.enum_name == self.name && self.members.contains(&value.member)
	}
}

/// A single member of an [`EnumType`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EnumValue {
	enum_name: &'static str,
	member: &'static str,
}

impl EnumValue {
	/// Name of the enumeration this member belongs to
	pub const fn enum_name(&self) -> &'static str {
		self.enum_name
	}

	/// Member name
	pub const fn member(&self) -> &'static str {
		self.member
	}

	/// Member of a Rust enum implementing [`ModelEnum`]
	pub fn of<E: ModelEnum>(value: &E) -> Self {
		Self {
			enum_name: E::ENUM_TYPE.name,
			member: value.member_name(),
		}
	}
}

impl fmt::Display for EnumValue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}.{}", self.enum_name, self.member)
	}
}

/// Rust enums stored in enumeration columns
///
/// # Examples
///
/// ```
/// use auto_schema_orm::{EnumType, ModelEnum, Value};
///
/// #[derive(Debug, Clone, Copy, PartialEq)]
/// enum Priority {
/// 	Low,
/// 	High,
/// }
///
/// impl ModelEnum for Priority {
/// 	const ENUM_TYPE: EnumType = EnumType::new("Priority", &["Low", "High"]);
///
/// 	fn member_name(&self) -> &'static str {
/// 		match self {
/// 			Priority::Low => "Low",
/// 			Priority::High => "High",
/// 		}
/// 	}
///
/// 	fn from_member_name(name: &str) -> Option<Self> {
/// 		match name {
/// 			"Low" => Some(Priority::Low),
/// 			"High" => Some(Priority::High),
/// 			_ => None,
/// 		}
/// 	}
/// }
///
/// let value = Priority::High.to_value();
/// assert_eq!(value.as_enum().map(|e| e.member()), Some("High"));
/// ```
pub trait ModelEnum: Sized {
	/// The column-level enumeration this type maps to
	const ENUM_TYPE: EnumType;

	/// Name of this member
	fn member_name(&self) -> &'static str;

	/// Resolve a member by name
	fn from_member_name(name: &str) -> Option<Self>;

	/// Model value for this member
	fn to_value(&self) -> Value {
		Value::Enum(EnumValue::of(self))
	}

	/// Decode a model value back into the Rust enum
	fn from_enum_value(value: &EnumValue) -> Option<Self> {
		if value.enum_name() != Self::ENUM_TYPE.name() {
			return None;
		}
		Self::from_member_name(value.member())
	}
}

/// A model attribute value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
	Null,
	Bool(bool),
	Integer(i64),
	Float(f64),
	String(String),
	Date(NaiveDate),
	DateTime(NaiveDateTime),
	Time(NaiveTime),
	Enum(EnumValue),
	Bytes(Vec<u8>),
}

impl Value {
	/// Short type name used in error messages
	pub fn type_name(&self) -> &'static str {
		match self {
			Value::Null => "null",
			Value::Bool(_) => "bool",
			Value::Integer(_) => "integer",
			Value::Float(_) => "float",
			Value::String(_) => "string",
			Value::Date(_) => "date",
			Value::DateTime(_) => "datetime",
			Value::Time(_) => "time",
			Value::Enum(_) => "enum",
			Value::Bytes(_) => "bytes",
		}
	}

	pub fn is_null(&self) -> bool {
		matches!(self, Value::Null)
	}

	pub fn as_i64(&self) -> Option<i64> {
		match self {
			Value::Integer(i) => Some(*i),
			_ => None,
		}
	}

	pub fn as_str(&self) -> Option<&str> {
		match self {
			Value::String(s) => Some(s),
			_ => None,
		}
	}

	pub fn as_enum(&self) -> Option<&EnumValue> {
		match self {
			Value::Enum(e) => Some(e),
			_ => None,
		}
	}

	pub fn as_bytes(&self) -> Option<&[u8]> {
		match self {
			Value::Bytes(b) => Some(b),
			_ => None,
		}
	}
}

impl From<i64> for Value {
	fn from(value: i64) -> Self {
		Value::Integer(value)
	}
}

impl From<i32> for Value {
	fn from(value: i32) -> Self {
		Value::Integer(i64::from(value))
	}
}

impl From<f64> for Value {
	fn from(value: f64) -> Self {
		Value::Float(value)
	}
}

impl From<bool> for Value {
	fn from(value: bool) -> Self {
		Value::Bool(value)
	}
}

impl From<String> for Value {
	fn from(value: String) -> Self {
		Value::String(value)
	}
}

impl From<&str> for Value {
	fn from(value: &str) -> Self {
		Value::String(value.to_string())
	}
}

impl From<NaiveDate> for Value {
	fn from(value: NaiveDate) -> Self {
		Value::Date(value)
	}
}

impl From<NaiveDateTime> for Value {
	fn from(value: NaiveDateTime) -> Self {
		Value::DateTime(value)
	}
}

impl From<NaiveTime> for Value {
	fn from(value: NaiveTime) -> Self {
		Value::Time(value)
	}
}

impl From<EnumValue> for Value {
	fn from(value: EnumValue) -> Self {
		Value::Enum(value)
	}
}

impl From<Vec<u8>> for Value {
	fn from(value: Vec<u8>) -> Self {
		Value::Bytes(value)
	}
}

impl<T: Into<Value>> From<Option<T>> for Value {
	fn from(value: Option<T>) -> Self {
		value.map_or(Value::Null, Into::into)
	}
}

/// Extraction of a concrete type from a [`Value`]
///
/// On mismatch the original value is handed back so callers can report what
/// they actually received.
pub trait FromValue: Sized {
	/// Type name reported in construction errors
	const EXPECTED: &'static str;

	fn from_value(value: Value) -> Result<Self, Value>;
}

macro_rules! impl_from_value {
	($ty:ty, $expected:literal, $variant:ident) => {
		impl FromValue for $ty {
			const EXPECTED: &'static str = $expected;

			fn from_value(value: Value) -> Result<Self, Value> {
				match value {
					Value::$variant(inner) => Ok(inner),
					other => Err(other),
				}
			}
		}
	};
}

impl_from_value!(i64, "integer", Integer);
impl_from_value!(bool, "bool", Bool);
impl_from_value!(String, "string", String);
impl_from_value!(NaiveDate, "date", Date);
impl_from_value!(NaiveDateTime, "datetime", DateTime);
impl_from_value!(NaiveTime, "time", Time);
impl_from_value!(EnumValue, "enum", Enum);
impl_from_value!(Vec<u8>, "bytes", Bytes);

impl FromValue for i32 {
	const EXPECTED: &'static str = "integer";

	fn from_value(value: Value) -> Result<Self, Value> {
		match value {
			Value::Integer(i) => i32::try_from(i).map_err(|_| Value::Integer(i)),
			other => Err(other),
		}
	}
}

impl FromValue for f64 {
	const EXPECTED: &'static str = "float";

	fn from_value(value: Value) -> Result<Self, Value> {
		match value {
			Value::Float(f) => Ok(f),
			Value::Integer(i) => Ok(i as f64),
			other => Err(other),
		}
	}
}

impl FromValue for Value {
	const EXPECTED: &'static str = "value";

	fn from_value(value: Value) -> Result<Self, Value> {
		Ok(value)
	}
}
