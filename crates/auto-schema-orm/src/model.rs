//! Model descriptor interface
//!
//! A model layer exposes each entity type through a [`ModelClass`]: an
//! immutable description of the declared attributes plus the constructor used
//! to build instances from keyword arguments. Instances implement [`Model`]
//! so their attribute values can be read back without reflection.

use crate::kwargs::{ConstructionError, Kwargs};
use crate::types::StorageType;
use crate::value::Value;
use std::any::{Any, TypeId, type_name};
use std::fmt;

/// Upcasting to [`Any`] for type-erased models
///
/// Implemented for every `'static` type; model authors never implement it.
pub trait AsAny: Any {
	fn as_any(&self) -> &dyn Any;
	fn into_any(self: Box<Self>) -> Box<dyn Any>;
}

impl<T: Any> AsAny for T {
	fn as_any(&self) -> &dyn Any {
		self
	}

	fn into_any(self: Box<Self>) -> Box<dyn Any> {
		self
	}
}

/// A declarative model instance
///
/// `model_class` and `class` must return the same descriptor. `attribute`
/// reports the current value of a declared attribute and returns `None` for
/// keys the model does not declare.
pub trait Model: AsAny + fmt::Debug + Send + Sync {
	/// Descriptor of this model type
	fn model_class() -> &'static ModelClass
	where
		Self: Sized;

	/// Descriptor of this instance's model type
	fn class(&self) -> &'static ModelClass;

	/// Read an attribute by key
	fn attribute(&self, key: &str) -> Option<AttributeRef<'_>>;
}

impl dyn Model {
	/// Check whether this instance is a `T`
	pub fn is<T: Model>(&self) -> bool {
		self.as_any().is::<T>()
	}

	/// Borrow this instance as a `T`
	pub fn downcast_ref<T: Model>(&self) -> Option<&T> {
		self.as_any().downcast_ref::<T>()
	}

	/// Convert a boxed instance into a concrete `T`
	///
	/// Returns the original box unchanged when the instance is not a `T`.
	pub fn downcast<T: Model>(self: Box<Self>) -> Result<Box<T>, Box<dyn Model>> {
		if !(*self).as_any().is::<T>() {
			return Err(self);
		}
		match self.into_any().downcast::<T>() {
			Ok(model) => Ok(model),
			Err(_) => unreachable!("instance type was checked before downcasting"),
		}
	}
}

/// Value of an attribute read from an instance
#[derive(Debug)]
pub enum AttributeRef<'a> {
	/// Plain or computed column value
	Value(Value),
	/// Single related instance, `None` when unset
	One(Option<&'a dyn Model>),
	/// Collection of related instances
	Many(Vec<&'a dyn Model>),
}

impl<'a> AttributeRef<'a> {
	/// Column value from anything convertible into [`Value`]
	pub fn value(value: impl Into<Value>) -> Self {
		AttributeRef::Value(value.into())
	}

	/// Single related instance
	pub fn one<M: Model>(related: Option<&'a M>) -> Self {
		AttributeRef::One(related.map(|m| m as &dyn Model))
	}

	/// Related collection
	pub fn many<M: Model>(related: &'a [M]) -> Self {
		AttributeRef::Many(related.iter().map(|m| m as &dyn Model).collect())
	}
}

/// Relationship cardinality
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cardinality {
	/// Many-to-one or one-to-one
	One,
	/// One-to-many or many-to-many
	Many,
}

/// Reference from one model to another
#[derive(Clone, Copy)]
pub struct Relationship {
	target: fn() -> &'static ModelClass,
	cardinality: Cardinality,
}

impl Relationship {
	/// Create a relationship to the model returned by `target`
	///
	/// The target is resolved lazily so that two models may refer to each
	/// other before either descriptor exists.
	pub fn new(target: fn() -> &'static ModelClass, cardinality: Cardinality) -> Self {
		Self {
			target,
			cardinality,
		}
	}

	pub fn target(&self) -> &'static ModelClass {
		(self.target)()
	}

	pub fn cardinality(&self) -> Cardinality {
		self.cardinality
	}

	/// `true` for collection relationships
	pub fn uselist(&self) -> bool {
		self.cardinality == Cardinality::Many
	}
}

impl fmt::Debug for Relationship {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Relationship")
			.field("target", &self.target().name())
			.field("cardinality", &self.cardinality)
			.finish()
	}
}

/// SQL expression backing a computed attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expression {
	/// Labeled expression, `SELECT ... AS label`
	Label(String),
}

/// Physical column declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
	name: String,
	storage_type: StorageType,
	nullable: bool,
	primary_key: bool,
	autoincrement: bool,
	foreign_key: Option<String>,
	has_default: bool,
}

impl Column {
	/// Create a nullable column
	///
	/// # Examples
	///
	/// ```
	/// use auto_schema_orm::{Column, StorageType};
	///
	/// let id = Column::new("id", StorageType::Integer).primary_key();
	/// assert!(!id.is_nullable());
	/// assert!(id.is_autoincrement());
	///
	/// let task_id = Column::new("task_id", StorageType::Integer).foreign_key("task.id");
	/// assert_eq!(task_id.foreign_key_target(), Some("task.id"));
	/// ```
	pub fn new(name: impl Into<String>, storage_type: StorageType) -> Self {
		Self {
			name: name.into(),
			storage_type,
			nullable: true,
			primary_key: false,
			autoincrement: false,
			foreign_key: None,
			has_default: false,
		}
	}

	/// Mark as primary key; integer keys are assigned by the database
	pub fn primary_key(mut self) -> Self {
		self.primary_key = true;
		self.nullable = false;
		self.autoincrement = self.storage_type.is_integer();
		self
	}

	/// Mark as `NOT NULL`
	pub fn not_null(mut self) -> Self {
		self.nullable = false;
		self
	}

	/// Reference another table's column, written as `table.column`
	pub fn foreign_key(mut self, target: impl Into<String>) -> Self {
		self.foreign_key = Some(target.into());
		self
	}

	/// Declare a client or server default
	pub fn with_default(mut self) -> Self {
		self.has_default = true;
		self
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn storage_type(&self) -> &StorageType {
		&self.storage_type
	}

	pub fn is_nullable(&self) -> bool {
		self.nullable
	}

	pub fn is_primary_key(&self) -> bool {
		self.primary_key
	}

	pub fn is_autoincrement(&self) -> bool {
		self.autoincrement
	}

	pub fn is_foreign_key(&self) -> bool {
		self.foreign_key.is_some()
	}

	pub fn foreign_key_target(&self) -> Option<&str> {
		self.foreign_key.as_deref()
	}

	pub fn has_default(&self) -> bool {
		self.has_default
	}
}

/// Column-backed attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnProperty {
	columns: Vec<Column>,
	expression: Option<Expression>,
}

impl ColumnProperty {
	pub fn columns(&self) -> &[Column] {
		&self.columns
	}

	/// First backing column
	pub fn column(&self) -> Option<&Column> {
		self.columns.first()
	}

	pub fn expression(&self) -> Option<&Expression> {
		self.expression.as_ref()
	}

	/// Whether this attribute is a labeled expression rather than a stored column
	pub fn is_computed(&self) -> bool {
		matches!(self.expression, Some(Expression::Label(_)))
	}
}

/// Classification of a declared attribute
#[derive(Debug, Clone)]
pub enum AttributeKind {
	Column(ColumnProperty),
	Relationship(Relationship),
}

/// A mapped attribute of a model
#[derive(Debug, Clone)]
pub struct Attribute {
	key: String,
	kind: AttributeKind,
}

impl Attribute {
	/// Plain column attribute keyed by the column name
	pub fn column(column: Column) -> Self {
		Self {
			key: column.name.clone(),
			kind: AttributeKind::Column(ColumnProperty {
				columns: vec![column],
				expression: None,
			}),
		}
	}

	/// Attribute backed by several physical columns
	pub fn composite(key: impl Into<String>, columns: Vec<Column>) -> Self {
		Self {
			key: key.into(),
			kind: AttributeKind::Column(ColumnProperty {
				columns,
				expression: None,
			}),
		}
	}

	/// Computed attribute, a labeled SQL expression over `columns`
	pub fn computed(key: impl Into<String>, columns: Vec<Column>) -> Self {
		let key = key.into();
		Self {
			kind: AttributeKind::Column(ColumnProperty {
				columns,
				expression: Some(Expression::Label(key.clone())),
			}),
			key,
		}
	}

	/// Relationship attribute
	pub fn relationship(
		key: impl Into<String>,
		target: fn() -> &'static ModelClass,
		cardinality: Cardinality,
	) -> Self {
		Self {
			key: key.into(),
			kind: AttributeKind::Relationship(Relationship::new(target, cardinality)),
		}
	}

	pub fn key(&self) -> &str {
		&self.key
	}

	pub fn kind(&self) -> &AttributeKind {
		&self.kind
	}

	pub fn column_property(&self) -> Option<&ColumnProperty> {
		match &self.kind {
			AttributeKind::Column(property) => Some(property),
			AttributeKind::Relationship(_) => None,
		}
	}

	pub fn relationship_property(&self) -> Option<&Relationship> {
		match &self.kind {
			AttributeKind::Relationship(relationship) => Some(relationship),
			AttributeKind::Column(_) => None,
		}
	}

	pub fn is_relationship(&self) -> bool {
		matches!(self.kind, AttributeKind::Relationship(_))
	}

	pub fn is_computed(&self) -> bool {
		self.column_property().is_some_and(ColumnProperty::is_computed)
	}
}

/// Constructor called with keyword arguments matching attribute keys
pub type Constructor = fn(Kwargs) -> Result<Box<dyn Model>, ConstructionError>;

/// Descriptor of a model type
///
/// Identity is the Rust type the descriptor was built for: two descriptors
/// compare equal exactly when they describe the same type.
pub struct ModelClass {
	name: &'static str,
	type_id: TypeId,
	type_name: &'static str,
	attributes: Vec<Attribute>,
	constructor: Constructor,
}

impl ModelClass {
	/// Start describing the model type `M`
	pub fn builder<M: Model>(name: &'static str) -> ModelClassBuilder {
		ModelClassBuilder {
			name,
			type_id: TypeId::of::<M>(),
			type_name: type_name::<M>(),
			attributes: Vec::new(),
		}
	}

	pub fn name(&self) -> &'static str {
		self.name
	}

	/// Identity of the described Rust type
	pub fn type_id(&self) -> TypeId {
		self.type_id
	}

	/// Attributes in declaration order
	pub fn attributes(&self) -> &[Attribute] {
		&self.attributes
	}

	pub fn attribute(&self, key: &str) -> Option<&Attribute> {
		self.attributes.iter().find(|attribute| attribute.key == key)
	}

	/// Whether `instance` is of the type this descriptor describes
	pub fn is_class_of(&self, instance: &dyn Model) -> bool {
		instance.as_any().type_id() == self.type_id
	}

	/// Call the model constructor
	pub fn construct(&self, kwargs: Kwargs) -> Result<Box<dyn Model>, ConstructionError> {
		(self.constructor)(kwargs)
	}

	/// Empty keyword set addressed to this model's constructor
	pub fn kwargs(&self) -> Kwargs {
		Kwargs::new(self.name)
	}
}

impl PartialEq for ModelClass {
	fn eq(&self, other: &Self) -> bool {
		self.type_id == other.type_id
	}
}

impl Eq for ModelClass {}

impl fmt::Debug for ModelClass {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ModelClass")
			.field("name", &self.name)
			.field("type", &self.type_name)
			.field(
				"attributes",
				&self.attributes.iter().map(Attribute::key).collect::<Vec<_>>(),
			)
			.finish()
	}
}

/// Builder for [`ModelClass`]
#[derive(Debug)]
pub struct ModelClassBuilder {
	name: &'static str,
	type_id: TypeId,
	type_name: &'static str,
	attributes: Vec<Attribute>,
}

impl ModelClassBuilder {
	/// Declare a plain column
	pub fn column(mut self, column: Column) -> Self {
		self.attributes.push(Attribute::column(column));
		self
	}

	/// Declare a computed attribute over the given columns
	pub fn computed(mut self, key: impl Into<String>, columns: Vec<Column>) -> Self {
		self.attributes.push(Attribute::computed(key, columns));
		self
	}

	/// Declare a relationship to another model
	pub fn relationship(
		mut self,
		key: impl Into<String>,
		target: fn() -> &'static ModelClass,
		cardinality: Cardinality,
	) -> Self {
		self.attributes
			.push(Attribute::relationship(key, target, cardinality));
		self
	}

	/// Declare an arbitrary attribute
	pub fn attribute(mut self, attribute: Attribute) -> Self {
		self.attributes.push(attribute);
		self
	}

	pub fn build(self, constructor: Constructor) -> ModelClass {
		ModelClass {
			name: self.name,
			type_id: self.type_id,
			type_name: self.type_name,
			attributes: self.attributes,
			constructor,
		}
	}
}
