//! # auto-schema
//!
//! Serialization schemas derived automatically from declarative model
//! descriptors.
//!
//! A model layer describes each entity type once through a
//! [`ModelClass`](orm::ModelClass). The first time a schema is requested for
//! that class, [`AutoSchema`](serializers::AutoSchema) inspects its columns
//! and relationships and synthesizes a [`Schema`](serializers::Schema) that
//! dumps instances to plain data and loads plain data back into instances,
//! nested related entities included.
//!
//! ## Crates
//!
//! - [`orm`]: model descriptor interface, model values, column introspection
//! - [`serializers`]: schema synthesis, dump and load, rehydration, caching
//!
//! ## Feature Flags
//!
//! - `config` (default): TOML loading for
//!   [`AutoSchemaConfig`](serializers::AutoSchemaConfig)
//!
//! ## Quick Example
//!
//! ```rust
//! use auto_schema::prelude::*;
//! use once_cell::sync::Lazy;
//!
//! #[derive(Debug, PartialEq)]
//! struct Tag {
//! 	id: Option<i64>,
//! 	label: Option<String>,
//! }
//!
//! static TAG: Lazy<ModelClass> = Lazy::new(|| {
//! 	ModelClass::builder::<Tag>("Tag")
//! 		.column(Column::new("id", StorageType::Integer).primary_key())
//! 		.column(Column::new("label", StorageType::String { length: Some(32) }).not_null())
//! 		.build(|mut kwargs| {
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
//! let auto_schema = AutoSchema::default();
//! let schema = auto_schema.schema_for::<Tag>().unwrap();
//!
//! let tag = Tag { id: Some(1), label: Some("rust".to_string()) };
//! let dumped = schema.dump(&tag).unwrap();
//! assert_eq!(dumped["label"], Data::from("rust"));
//!
//! let loaded: Tag = schema.load_instance_as(dumped).unwrap();
//! assert_eq!(loaded, tag);
//! ```

pub use auto_schema_orm as orm;
pub use auto_schema_serializers as serializers;

pub use auto_schema_serializers::record;

/// Commonly used types
pub mod prelude {
	pub use auto_schema_orm::{
		Arg, AttributeRef, Cardinality, Column, ConstructionError, EnumType, Kwargs, Model,
		ModelClass, ModelEnum, StorageKind, StorageType, Value,
	};
	pub use auto_schema_serializers::{
		AutoSchema, AutoSchemaConfig, Data, FieldDescriptor, FieldGenerator, FieldKind,
		GeneratorRegistry, LoadOptions, Loaded, OneOrMany, Record, Schema, SchemaError,
		SerializeError, UnknownPolicy,
	};
}
