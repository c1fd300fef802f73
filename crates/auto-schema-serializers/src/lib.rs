//! # auto-schema-serializers
//!
//! Serialization schemas synthesized from model descriptors.
//!
//! [`AutoSchema`] inspects a [`ModelClass`](auto_schema_orm::ModelClass) the
//! first time a schema is requested for it and builds a [`Schema`] that
//! dumps instances to [`Data`] and loads data back into model instances,
//! nested relationships included.
//!
//! ## Features
//!
//! - **Schema synthesis**: default field inference from column declarations,
//!   custom [`FieldGenerator`]s keyed by storage kind, computed columns
//!   marked dump-only, nested schemas for relationships
//! - **Caching**: a bounded LRU [`SchemaCache`] keeps schemas identity-stable
//! - **Rehydration**: [`Schema::load_instance`] rebuilds whole object graphs
//! - **Configuration**: [`AutoSchemaConfig`], loadable from TOML with the
//!   `config` feature
//!
//! ## Examples
//!
//! ```ignore
//! use auto_schema_serializers::{AutoSchema, OneOrMany};
//!
//! let auto_schema = AutoSchema::default();
//! let schema = auto_schema.schema_for::<Task>()?;
//!
//! let dumped = schema.dump(&task)?;
//! let loaded = schema.load_instance(OneOrMany::One(dumped))?;
//! ```

pub mod auto_schema;
pub mod cache;
pub mod config;
pub mod data;
pub mod error;
pub mod fields;
pub mod generators;
mod rehydrate;
pub mod schema;
pub mod shape;

pub use auto_schema::AutoSchema;
pub use cache::SchemaCache;
#[cfg(feature = "config")]
pub use config::ConfigError;
pub use config::{AutoSchemaConfig, UnknownPolicy};
pub use data::{Data, Record};
pub use error::{SchemaError, SerializeError, ValidationErrors};
pub use fields::{FieldDescriptor, FieldKind};
pub use generators::{BytesFieldGenerator, EnumFieldGenerator, FieldGenerator, GeneratorRegistry};
pub use schema::{LoadOptions, Loaded, LoadedRecord, Schema, SchemaBuilder};
pub use shape::OneOrMany;
