//! Fixture models shared by the integration tests

#![allow(dead_code)]

use auto_schema_orm::{
	AttributeRef, Cardinality, Column, ConstructionError, EnumType, Kwargs, Model, ModelClass,
	ModelEnum, StorageType,
};
use chrono::NaiveDate;
use once_cell::sync::Lazy;

type Constructed = Result<Box<dyn Model>, ConstructionError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskType {
	Task,
	Bug,
}

impl ModelEnum for TaskType {
	const ENUM_TYPE: EnumType = EnumType::new("TaskType", &["Task", "Bug"]);

	fn member_name(&self) -> &'static str {
		match self {
			TaskType::Task => "Task",
			TaskType::Bug => "Bug",
		}
	}

	fn from_member_name(name: &str) -> Option<Self> {
		match name {
			"Task" => Some(TaskType::Task),
			"Bug" => Some(TaskType::Bug),
			_ => None,
		}
	}
}

fn task_columns(builder: auto_schema_orm::ModelClassBuilder) -> auto_schema_orm::ModelClassBuilder {
	builder
		.column(Column::new("id", StorageType::Integer).primary_key())
		.column(Column::new("name", StorageType::String { length: Some(50) }).not_null())
		.column(Column::new("finished_by", StorageType::Date))
		.column(Column::new("type", StorageType::Enum(TaskType::ENUM_TYPE)).not_null())
}

// Task

#[derive(Debug, Clone, PartialEq)]
pub struct Task {
	pub id: Option<i64>,
	pub name: Option<String>,
	pub finished_by: Option<NaiveDate>,
	pub task_type: Option<TaskType>,
}

impl Task {
	pub fn new(id: i64, name: &str, finished_by: NaiveDate, task_type: TaskType) -> Self {
		Self {
			id: Some(id),
			name: Some(name.to_string()),
			finished_by: Some(finished_by),
			task_type: Some(task_type),
		}
	}
}

pub static TASK: Lazy<ModelClass> =
	Lazy::new(|| task_columns(ModelClass::builder::<Task>("Task")).build(construct_task));

fn construct_task(mut kwargs: Kwargs) -> Constructed {
	let task = Task {
		id: kwargs.optional("id")?,
		name: kwargs.optional("name")?,
		finished_by: kwargs.optional("finished_by")?,
		task_type: kwargs.optional_enum("type")?,
	};
	kwargs.finish()?;
	Ok(Box::new(task))
}

impl Model for Task {
	fn model_class() -> &'static ModelClass {
		&TASK
	}

	fn class(&self) -> &'static ModelClass {
		&TASK
	}

	fn attribute(&self, key: &str) -> Option<AttributeRef<'_>> {
		match key {
			"id" => Some(AttributeRef::value(self.id)),
			"name" => Some(AttributeRef::value(self.name.clone())),
			"finished_by" => Some(AttributeRef::value(self.finished_by)),
			"type" => Some(AttributeRef::value(self.task_type.as_ref().map(ModelEnum::to_value))),
			_ => None,
		}
	}
}

// Attachment

#[derive(Debug, Clone, PartialEq)]
pub struct Attachment {
	pub id: Option<i64>,
	pub task_id: Option<i64>,
	pub location: Option<String>,
}

impl Attachment {
	pub fn new(id: i64, task_id: i64, location: &str) -> Self {
		Self {
			id: Some(id),
			task_id: Some(task_id),
			location: Some(location.to_string()),
		}
	}
}

pub static ATTACHMENT: Lazy<ModelClass> = Lazy::new(|| {
	ModelClass::builder::<Attachment>("Attachment")
		.column(Column::new("id", StorageType::Integer).primary_key())
		.column(
			Column::new("task_id", StorageType::Integer)
				.foreign_key("task_with_relationship.id"),
		)
		.column(Column::new("location", StorageType::String { length: Some(200) }))
		.build(construct_attachment)
});

fn construct_attachment(mut kwargs: Kwargs) -> Constructed {
	let attachment = Attachment {
		id: kwargs.optional("id")?,
		task_id: kwargs.optional("task_id")?,
		location: kwargs.optional("location")?,
	};
	kwargs.finish()?;
	Ok(Box::new(attachment))
}

impl Model for Attachment {
	fn model_class() -> &'static ModelClass {
		&ATTACHMENT
	}

	fn class(&self) -> &'static ModelClass {
		&ATTACHMENT
	}

	fn attribute(&self, key: &str) -> Option<AttributeRef<'_>> {
		match key {
			"id" => Some(AttributeRef::value(self.id)),
			"task_id" => Some(AttributeRef::value(self.task_id)),
			"location" => Some(AttributeRef::value(self.location.clone())),
			_ => None,
		}
	}
}

// TaskWithRelationship

/// `attachments` is `None` when the constructor never received the keyword
#[derive(Debug, Clone, PartialEq)]
pub struct TaskWithRelationship {
	pub id: Option<i64>,
	pub name: Option<String>,
	pub finished_by: Option<NaiveDate>,
	pub task_type: Option<TaskType>,
	pub attachments: Option<Vec<Attachment>>,
}

impl TaskWithRelationship {
	pub fn new(id: i64, name: &str, finished_by: NaiveDate, task_type: TaskType) -> Self {
		Self {
			id: Some(id),
			name: Some(name.to_string()),
			finished_by: Some(finished_by),
			task_type: Some(task_type),
			attachments: None,
		}
	}
}

pub static TASK_WITH_RELATIONSHIP: Lazy<ModelClass> = Lazy::new(|| {
	task_columns(ModelClass::builder::<TaskWithRelationship>(
		"TaskWithRelationship",
	))
	.relationship("attachments", Attachment::model_class, Cardinality::Many)
	.build(construct_task_with_relationship)
});

fn construct_task_with_relationship(mut kwargs: Kwargs) -> Constructed {
	let attachments = if kwargs.contains_key("attachments") {
		Some(kwargs.many("attachments")?)
	} else {
		None
	};
	let task = TaskWithRelationship {
		id: kwargs.optional("id")?,
		name: kwargs.optional("name")?,
		finished_by: kwargs.optional("finished_by")?,
		task_type: kwargs.optional_enum("type")?,
		attachments,
	};
	kwargs.finish()?;
	Ok(Box::new(task))
}

impl Model for TaskWithRelationship {
	fn model_class() -> &'static ModelClass {
		&TASK_WITH_RELATIONSHIP
	}

	fn class(&self) -> &'static ModelClass {
		&TASK_WITH_RELATIONSHIP
	}

	fn attribute(&self, key: &str) -> Option<AttributeRef<'_>> {
		match key {
			"id" => Some(AttributeRef::value(self.id)),
			"name" => Some(AttributeRef::value(self.name.clone())),
			"finished_by" => Some(AttributeRef::value(self.finished_by)),
			"type" => Some(AttributeRef::value(self.task_type.as_ref().map(ModelEnum::to_value))),
			"attachments" => Some(AttributeRef::many(
				self.attachments.as_deref().unwrap_or_default(),
			)),
			_ => None,
		}
	}
}

// Project: nested relationships two levels deep

#[derive(Debug, Clone, PartialEq)]
pub struct Project {
	pub id: Option<i64>,
	pub title: Option<String>,
	pub cover: Option<Attachment>,
	pub tasks: Vec<TaskWithRelationship>,
}

pub static PROJECT: Lazy<ModelClass> = Lazy::new(|| {
	ModelClass::builder::<Project>("Project")
		.column(Column::new("id", StorageType::Integer).primary_key())
		.column(Column::new("title", StorageType::Text))
		.relationship("cover", Attachment::model_class, Cardinality::One)
		.relationship(
			"tasks",
			TaskWithRelationship::model_class,
			Cardinality::Many,
		)
		.build(construct_project)
});

fn construct_project(mut kwargs: Kwargs) -> Constructed {
	let project = Project {
		id: kwargs.optional("id")?,
		title: kwargs.optional("title")?,
		cover: kwargs.one("cover")?,
		tasks: kwargs.many("tasks")?,
	};
	kwargs.finish()?;
	Ok(Box::new(project))
}

impl Model for Project {
	fn model_class() -> &'static ModelClass {
		&PROJECT
	}

	fn class(&self) -> &'static ModelClass {
		&PROJECT
	}

	fn attribute(&self, key: &str) -> Option<AttributeRef<'_>> {
		match key {
			"id" => Some(AttributeRef::value(self.id)),
			"title" => Some(AttributeRef::value(self.title.clone())),
			"cover" => Some(AttributeRef::one(self.cover.as_ref())),
			"tasks" => Some(AttributeRef::many(&self.tasks)),
			_ => None,
		}
	}
}

// Report: computed column

#[derive(Debug, Clone, PartialEq)]
pub struct Report {
	pub id: Option<i64>,
	pub pages: Option<i64>,
}

impl Report {
	/// Value of the labeled `page_total` expression
	pub fn page_total(&self) -> Option<i64> {
		self.pages.map(|pages| pages * 2)
	}
}

pub static REPORT: Lazy<ModelClass> = Lazy::new(|| {
	ModelClass::builder::<Report>("Report")
		.column(Column::new("id", StorageType::Integer).primary_key())
		.column(Column::new("pages", StorageType::Integer))
		.computed(
			"page_total",
			vec![Column::new("page_total", StorageType::Integer)],
		)
		.build(construct_report)
});

fn construct_report(mut kwargs: Kwargs) -> Constructed {
	let report = Report {
		id: kwargs.optional("id")?,
		pages: kwargs.optional("pages")?,
	};
	kwargs.finish()?;
	Ok(Box::new(report))
}

impl Model for Report {
	fn model_class() -> &'static ModelClass {
		&REPORT
	}

	fn class(&self) -> &'static ModelClass {
		&REPORT
	}

	fn attribute(&self, key: &str) -> Option<AttributeRef<'_>> {
		match key {
			"id" => Some(AttributeRef::value(self.id)),
			"pages" => Some(AttributeRef::value(self.pages)),
			"page_total" => Some(AttributeRef::value(self.page_total())),
			_ => None,
		}
	}
}

// Blob: binary column declared NOT NULL

#[derive(Debug, Clone, PartialEq)]
pub struct Blob {
	pub id: Option<i64>,
	pub data: Option<Vec<u8>>,
}

pub static BLOB: Lazy<ModelClass> = Lazy::new(|| {
	ModelClass::builder::<Blob>("Blob")
		.column(Column::new("id", StorageType::Integer).primary_key())
		.column(Column::new("data", StorageType::LargeBinary).not_null())
		.build(construct_blob)
});

fn construct_blob(mut kwargs: Kwargs) -> Constructed {
	let blob = Blob {
		id: kwargs.optional("id")?,
		data: kwargs.optional("data")?,
	};
	kwargs.finish()?;
	Ok(Box::new(blob))
}

impl Model for Blob {
	fn model_class() -> &'static ModelClass {
		&BLOB
	}

	fn class(&self) -> &'static ModelClass {
		&BLOB
	}

	fn attribute(&self, key: &str) -> Option<AttributeRef<'_>> {
		match key {
			"id" => Some(AttributeRef::value(self.id)),
			"data" => Some(AttributeRef::value(self.data.clone())),
			_ => None,
		}
	}
}

// Node: self-referencing tree

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
	pub id: Option<i64>,
	pub children: Vec<Node>,
}

pub static NODE: Lazy<ModelClass> = Lazy::new(|| {
	ModelClass::builder::<Node>("Node")
		.column(Column::new("id", StorageType::Integer).primary_key())
		.relationship("children", Node::model_class, Cardinality::Many)
		.build(construct_node)
});

fn construct_node(mut kwargs: Kwargs) -> Constructed {
	let node = Node {
		id: kwargs.optional("id")?,
		children: kwargs.many("children")?,
	};
	kwargs.finish()?;
	Ok(Box::new(node))
}

impl Model for Node {
	fn model_class() -> &'static ModelClass {
		&NODE
	}

	fn class(&self) -> &'static ModelClass {
		&NODE
	}

	fn attribute(&self, key: &str) -> Option<AttributeRef<'_>> {
		match key {
			"id" => Some(AttributeRef::value(self.id)),
			"children" => Some(AttributeRef::many(&self.children)),
			_ => None,
		}
	}
}

// Author and Book refer to each other

#[derive(Debug)]
pub struct Author {
	pub books: Vec<Book>,
}

#[derive(Debug)]
pub struct Book {
	pub author: Option<Box<Author>>,
}

pub static AUTHOR: Lazy<ModelClass> = Lazy::new(|| {
	ModelClass::builder::<Author>("Author")
		.column(Column::new("id", StorageType::Integer).primary_key())
		.relationship("books", Book::model_class, Cardinality::Many)
		.build(|mut kwargs| {
			let author = Author {
				books: kwargs.many("books")?,
			};
			kwargs.finish()?;
			Ok(Box::new(author))
		})
});

pub static BOOK: Lazy<ModelClass> = Lazy::new(|| {
	ModelClass::builder::<Book>("Book")
		.column(Column::new("id", StorageType::Integer).primary_key())
		.relationship("author", Author::model_class, Cardinality::One)
		.build(|mut kwargs| {
			let book = Book {
				author: kwargs.one("author")?.map(Box::new),
			};
			kwargs.finish()?;
			Ok(Box::new(book))
		})
});

impl Model for Author {
	fn model_class() -> &'static ModelClass {
		&AUTHOR
	}

	fn class(&self) -> &'static ModelClass {
		&AUTHOR
	}

	fn attribute(&self, key: &str) -> Option<AttributeRef<'_>> {
		match key {
			"books" => Some(AttributeRef::many(&self.books)),
			_ => None,
		}
	}
}

impl Model for Book {
	fn model_class() -> &'static ModelClass {
		&BOOK
	}

	fn class(&self) -> &'static ModelClass {
		&BOOK
	}

	fn attribute(&self, key: &str) -> Option<AttributeRef<'_>> {
		match key {
			"author" => Some(AttributeRef::one(self.author.as_deref())),
			_ => None,
		}
	}
}

/// Date used by the fixtures
pub fn today() -> NaiveDate {
	chrono::Local::now().date_naive()
}
