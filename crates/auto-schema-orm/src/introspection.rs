//! Column introspection
//!
//! Classifies the attributes of a [`ModelClass`] into plain columns,
//! computed (labeled expression) columns and relationships, which is what
//! schema generation dispatches on.

use crate::model::{Attribute, AttributeKind, ModelClass, Relationship};
use crate::types::StorageKind;

/// Errors raised while inspecting model attributes
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IntrospectionError {
	#[error("Can only handle when columns == 1! '{attribute}' is backed by {columns} columns")]
	UnsupportedShape { attribute: String, columns: usize },

	#[error("'{attribute}' is a relationship, not a column")]
	NotAColumn { attribute: String },
}

/// Which attribute classes to enumerate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PropertyFilter {
	/// Every mapped attribute
	Any,
	/// Column-backed attributes, computed ones included
	#[default]
	Column,
	/// Relationships only
	Relationship,
}

/// Attributes of `class` in declaration order, filtered by property type
pub fn get_columns_of_property_type(class: &ModelClass, filter: PropertyFilter) -> Vec<&Attribute> {
	class
		.attributes()
		.iter()
		.filter(|attribute| match (filter, attribute.kind()) {
			(PropertyFilter::Any, _) => true,
			(PropertyFilter::Column, AttributeKind::Column(_)) => true,
			(PropertyFilter::Relationship, AttributeKind::Relationship(_)) => true,
			_ => false,
		})
		.collect()
}

/// Plain columns whose storage type is of the given kind
///
/// Only the first backing column is consulted; computed attributes are
/// never matched.
///
/// # Examples
///
/// ```ignore
/// let enums = find_col_types(Task::model_class(), StorageKind::Enum);
/// assert_eq!(enums[0].key(), "type");
/// ```
pub fn find_col_types(class: &ModelClass, kind: StorageKind) -> Vec<&Attribute> {
	get_columns_of_property_type(class, PropertyFilter::Column)
		.into_iter()
		.filter(|attribute| {
			attribute.column_property().is_some_and(|property| {
				!property.is_computed()
					&& property
						.column()
						.is_some_and(|column| column.storage_type().kind() == kind)
			})
		})
		.collect()
}

/// Nullability of an attribute's single backing column
///
/// # Errors
///
/// [`IntrospectionError::UnsupportedShape`] when the attribute is backed by
/// anything other than exactly one column, and
/// [`IntrospectionError::NotAColumn`] for relationships.
pub fn check_column_is_nullable(attribute: &Attribute) -> Result<bool, IntrospectionError> {
	let property = attribute
		.column_property()
		.ok_or_else(|| IntrospectionError::NotAColumn {
			attribute: attribute.key().to_string(),
		})?;

	match property.columns() {
		[column] => Ok(column.is_nullable()),
		columns => Err(IntrospectionError::UnsupportedShape {
			attribute: attribute.key().to_string(),
			columns: columns.len(),
		}),
	}
}

/// Attributes backed by a labeled expression
pub fn computed_columns(class: &ModelClass) -> Vec<&Attribute> {
	get_columns_of_property_type(class, PropertyFilter::Column)
		.into_iter()
		.filter(|attribute| attribute.is_computed())
		.collect()
}

/// Relationship attributes paired with their descriptors
pub fn relationships(class: &ModelClass) -> impl Iterator<Item = (&Attribute, &Relationship)> {
	class.attributes().iter().filter_map(|attribute| {
		attribute
			.relationship_property()
			.map(|relationship| (attribute, relationship))
	})
}

/// Whether `class` declares any relationship
pub fn has_relationships(class: &ModelClass) -> bool {
	relationships(class).next().is_some()
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::model::{AttributeRef, Cardinality, Column, Model};
	use crate::types::StorageType;
	use crate::value::EnumType;
	use once_cell::sync::Lazy;
	use rstest::rstest;

	const LEVEL: EnumType = EnumType::new("Level", &["Low", "High"]);

	#[derive(Debug)]
	struct Sample;

	#[derive(Debug)]
	struct Child;

	static SAMPLE: Lazy<ModelClass> = Lazy::new(|| {
		ModelClass::builder::<Sample>("Sample")
			.column(Column::new("id", StorageType::Integer).primary_key())
			.column(Column::new("level", StorageType::Enum(LEVEL)).not_null())
			.column(Column::new("note", StorageType::Enum(LEVEL)))
			.column(Column::new("blob", StorageType::LargeBinary))
			.computed(
				"level_count",
				vec![Column::new("level_count", StorageType::Enum(LEVEL))],
			)
			.attribute(crate::model::Attribute::composite(
				"span",
				vec![
					Column::new("start", StorageType::Integer),
					Column::new("end", StorageType::Integer),
				],
			))
			.relationship("children", Child::model_class, Cardinality::Many)
			.build(|_| Ok(Box::new(Sample)))
	});

	static CHILD: Lazy<ModelClass> = Lazy::new(|| {
		ModelClass::builder::<Child>("Child")
			.column(Column::new("id", StorageType::Integer).primary_key())
			.build(|_| Ok(Box::new(Child)))
	});

	impl Model for Sample {
		fn model_class() -> &'static ModelClass {
			&SAMPLE
		}

		fn class(&self) -> &'static ModelClass {
			&SAMPLE
		}

		fn attribute(&self, _key: &str) -> Option<AttributeRef<'_>> {
			None
		}
	}

	impl Model for Child {
		fn model_class() -> &'static ModelClass {
			&CHILD
		}

		fn class(&self) -> &'static ModelClass {
			&CHILD
		}

		fn attribute(&self, _key: &str) -> Option<AttributeRef<'_>> {
			None
		}
	}

	fn keys(attributes: Vec<&Attribute>) -> Vec<&str> {
		attributes.into_iter().map(Attribute::key).collect()
	}

	#[rstest]
	#[case(PropertyFilter::Any, vec!["id", "level", "note", "blob", "level_count", "span", "children"])]
	#[case(PropertyFilter::Column, vec!["id", "level", "note", "blob", "level_count", "span"])]
	#[case(PropertyFilter::Relationship, vec!["children"])]
	fn test_get_columns_of_property_type(#[case] filter: PropertyFilter, #[case] expected: Vec<&str>) {
		assert_eq!(keys(get_columns_of_property_type(Sample::model_class(), filter)), expected);
	}

	#[rstest]
	#[case(StorageKind::Enum, vec!["level", "note"])]
	#[case(StorageKind::LargeBinary, vec!["blob"])]
	#[case(StorageKind::Integer, vec!["id", "span"])]
	#[case(StorageKind::Date, vec![])]
	fn test_find_col_types(#[case] kind: StorageKind, #[case] expected: Vec<&str>) {
		assert_eq!(keys(find_col_types(Sample::model_class(), kind)), expected);
	}

	#[rstest]
	#[case("id", false)]
	#[case("level", false)]
	#[case("note", true)]
	fn test_check_column_is_nullable(#[case] key: &str, #[case] expected: bool) {
		let attribute = Sample::model_class().attribute(key).unwrap();
		assert_eq!(check_column_is_nullable(attribute), Ok(expected));
	}

	#[rstest]
	fn test_check_column_is_nullable_rejects_composite() {
		// Arrange
		let span = Sample::model_class().attribute("span").unwrap();

		// Act
		let result = check_column_is_nullable(span);

		// Assert
		assert_eq!(
			result,
			Err(IntrospectionError::UnsupportedShape {
				attribute: "span".to_string(),
				columns: 2,
			})
		);
	}

	#[rstest]
	fn test_check_column_is_nullable_rejects_relationship() {
		let children = Sample::model_class().attribute("children").unwrap();
		assert!(matches!(
			check_column_is_nullable(children),
			Err(IntrospectionError::NotAColumn { .. })
		));
	}

	#[rstest]
	fn test_computed_and_relationship_helpers() {
		// Arrange
		let class = Sample::model_class();

		// Act
		let computed = keys(computed_columns(class));
		let related: Vec<_> = relationships(class)
			.map(|(attribute, relationship)| (attribute.key(), relationship.target().name()))
			.collect();

		// Assert
		assert_eq!(computed, vec!["level_count"]);
		assert_eq!(related, vec![("children", "Child")]);
		assert!(has_relationships(class));
		assert!(!has_relationships(Child::model_class()));
	}
}
