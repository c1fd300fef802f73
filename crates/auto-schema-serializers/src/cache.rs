//! Bounded schema cache

use crate::schema::Schema;
use lru::LruCache;
use parking_lot::Mutex;
use std::any::TypeId;
use std::fmt;
use std::num::NonZeroUsize;
use std::sync::Arc;
use tracing::{debug, trace};

/// Least-recently-used map from model type to its schema
///
/// The lock is only held for single lookups and insertions.
pub struct SchemaCache {
	entries: Mutex<LruCache<TypeId, Arc<Schema>>>,
}

impl SchemaCache {
	pub fn new(capacity: NonZeroUsize) -> Self {
		Self {
			entries: Mutex::new(LruCache::new(capacity)),
		}
	}

	/// Cached schema for `key`, marking it most recently used
	pub fn get(&self, key: &TypeId) -> Option<Arc<Schema>> {
		let mut entries = self.entries.lock();
		let schema = entries.get(key).map(Arc::clone);
		if let Some(schema) = &schema {
			trace!(schema = schema.name(), "schema cache hit");
		}
		schema
	}

	/// Insert a schema unless one is already cached for `key`
	///
	/// Returns the schema that ends up cached: the existing one when another
	/// caller got there first, otherwise `schema`.
	pub fn insert(&self, key: TypeId, schema: Arc<Schema>) -> Arc<Schema> {
		let mut entries = self.entries.lock();
		if let Some(existing) = entries.get(&key) {
			return Arc::clone(existing);
		}
		if let Some((_, evicted)) = entries.push(key, Arc::clone(&schema)) {
			debug!(
				schema = evicted.name(),
				capacity = entries.cap().get(),
				"evicted schema from cache"
			);
		}
		schema
	}

	/// Whether `key` is cached, without touching recency
	pub fn contains(&self, key: &TypeId) -> bool {
		self.entries.lock().contains(key)
	}

	pub fn len(&self) -> usize {
		self.entries.lock().len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.lock().is_empty()
	}

	pub fn capacity(&self) -> NonZeroUsize {
		self.entries.lock().cap()
	}

	pub fn clear(&self) {
		self.entries.lock().clear();
	}
}

impl fmt::Debug for SchemaCache {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let entries = self.entries.lock();
		f.debug_struct("SchemaCache")
			.field("len", &entries.len())
			.field("capacity", &entries.cap())
			.finish()
	}
}
