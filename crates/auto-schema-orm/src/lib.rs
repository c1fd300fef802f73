//! # auto-schema-orm
//!
//! The declarative-model side of auto-schema.
//!
//! This crate does not map anything to a database. It defines the descriptor
//! interface a model layer has to provide so that serializers can be derived
//! from it: which attributes a model declares, how each one is stored, whether
//! it is nullable, computed, or a relationship to another model, and how an
//! instance is constructed from keyword arguments.
//!
//! ## Features
//!
//! - **Model descriptors**: [`ModelClass`] built once per model type with
//!   [`ModelClass::builder`]
//! - **Storage types**: [`StorageType`] and the fieldless [`StorageKind`] used
//!   as a dispatch key
//! - **Model values**: [`Value`] plus enum support through [`ModelEnum`]
//! - **Construction**: [`Kwargs`] with typed extraction helpers
//! - **Introspection**: column classification in [`introspection`]
//!
//! ## Examples
//!
//! ```rust
//! use auto_schema_orm::{
//! 	AttributeRef, Column, Kwargs, Model, ModelClass, StorageType,
//! };
//! use once_cell::sync::Lazy;
//!
//! #[derive(Debug)]
//! struct Tag {
//! 	id: Option<i64>,
//! 	label: Option<String>,
//! }
//!
//! static TAG: Lazy<ModelClass> = Lazy::new(|| {
//! 	ModelClass::builder::<Tag>("Tag")
//! 		.column(Column::new("id", StorageType::Integer).primary_key())
//! 		.column(Column::new("label", StorageType::Text))
//! 		.build(|mut kwargs: Kwargs| {
//! 			let tag = Tag {
//! 				id: kwargs.optional("id")?,
//! 				label: kwargs.optional("label")?,
//! 			};
//! 			kwargs.finish()?;
//! 			Ok(Box::new(tag))
//! 		})
//! });
//!
//! impl Model for Tag {
//! 	fn model_class() -> &'static ModelClass {
//! 		&TAG
//! 	}
//!
//! 	fn class(&self) -> &'static ModelClass {
//! 		&TAG
//! 	}
//!
//! 	fn attribute(&self, key: &str) -> Option<AttributeRef<'_>> {
//! 		match key {
//! 			"id" => Some(AttributeRef::value(self.id)),
//! 			"label" => Some(AttributeRef::value(self.label.clone())),
//! 			_ => None,
//! 		}
//! 	}
//! }
//!
//! assert_eq!(Tag::model_class().attributes().len(), 2);
//! ```

pub mod introspection;
pub mod kwargs;
pub mod model;
pub mod types;
pub mod value;

pub use introspection::{
	IntrospectionError, PropertyFilter, check_column_is_nullable, computed_columns,
	find_col_types, get_columns_of_property_type, has_relationships, relationships,
};
pub use kwargs::{Arg, ConstructionError, Kwargs};
pub use model::{
	AsAny, Attribute, AttributeKind, AttributeRef, Cardinality, Column, ColumnProperty,
	Constructor, Expression, Model, ModelClass, ModelClassBuilder, Relationship,
};
pub use types::{StorageKind, StorageType};
pub use value::{EnumType, EnumValue, FromValue, ModelEnum, Value};
