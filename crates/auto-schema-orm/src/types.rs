//! Column storage types

use crate::value::EnumType;

/// Underlying storage type of a column
///
/// Mirrors the generic SQL type the model layer declared for the column.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageType {
	Integer,
	BigInteger,
	Float,
	/// Bounded string, `VARCHAR(length)`
	String {
		length: Option<usize>,
	},
	Text,
	Boolean,
	Date,
	DateTime,
	Time,
	Enum(EnumType),
	LargeBinary,
}

impl StorageType {
	/// Fieldless kind of this storage type
	///
	/// # Examples
	///
	/// ```
	/// use auto_schema_orm::{StorageKind, StorageType};
	///
	/// let ty = StorageType::String { length: Some(20) };
	/// assert_eq!(ty.kind(), StorageKind::String);
	/// ```
	pub fn kind(&self) -> StorageKind {
		match self {
			StorageType::Integer => StorageKind::Integer,
			StorageType::BigInteger => StorageKind::BigInteger,
			StorageType::Float => StorageKind::Float,
			StorageType::String { .. } => StorageKind::String,
			StorageType::Text => StorageKind::Text,
			StorageType::Boolean => StorageKind::Boolean,
			StorageType::Date => StorageKind::Date,
			StorageType::DateTime => StorageKind::DateTime,
			StorageType::Time => StorageKind::Time,
			StorageType::Enum(_) => StorageKind::Enum,
			StorageType::LargeBinary => StorageKind::LargeBinary,
		}
	}

	/// Whether values of this type are integers the database can assign itself
	pub fn is_integer(&self) -> bool {
		matches!(self, StorageType::Integer | StorageType::BigInteger)
	}

	/// Enumeration declared by an `Enum` column
	pub fn enum_type(&self) -> Option<&EnumType> {
		match self {
			StorageType::Enum(enum_type) => Some(enum_type),
			_ => None,
		}
	}
}

/// Discriminant of [`StorageType`], used as a dispatch key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StorageKind {
	Integer,
	BigInteger,
	Float,
	String,
	Text,
	Boolean,
	Date,
	DateTime,
	Time,
	Enum,
	LargeBinary,
}
