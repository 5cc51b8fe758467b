use crate::common::{Document, Value};
use crate::errors::{DocRefError, DocRefResult, ErrorKind};
use crate::store::memory::InMemoryCollection;
use crate::store::{CollectionRef, DocumentStoreProvider};
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use indexmap::IndexMap;
use std::sync::Arc;

/// In-memory implementation of a document-store backend.
///
/// # Purpose
/// `InMemoryStore` keeps every collection in a concurrent map keyed by the
/// collection's full path, with documents held in insertion order. It is the
/// backend used by the default builder configuration and by the test suite;
/// all data is lost when the store is dropped.
///
/// # Characteristics
/// - **Thread-safe**: concurrent calls are independent, the only shared
///   state is the collection map
/// - **Lazy references**: collections and documents spring into being on
///   first write, reads of absent paths return nothing
/// - **Sentinel resolution**: [Value::ServerTimestamp] fields are replaced
///   with the current time at write
///
/// # Usage
/// ```text
/// let store = DocumentStore::new(InMemoryStore::new());
/// let products = store.root_collection("products");
/// products.doc("p1").set(doc! { name: "Lamp" }, false).await?;
/// ```
#[derive(Clone, Default)]
pub struct InMemoryStore {
    core: Arc<MemoryCore>,
}

impl InMemoryStore {
    /// Creates a new empty in-memory store.
    pub fn new() -> InMemoryStore {
        InMemoryStore {
            core: Arc::new(MemoryCore::new()),
        }
    }
}

impl DocumentStoreProvider for InMemoryStore {
    fn root_collection(&self, name: &str) -> CollectionRef {
        CollectionRef::new(InMemoryCollection::new(self.core.clone(), name.to_string()))
    }
}

/// Shared state behind every reference handed out by an [InMemoryStore].
///
/// Collections are keyed by full path (`sessions/42/cart`); each holds its
/// documents in insertion order, which is the backend's default result
/// order for unordered reads.
#[derive(Default)]
pub(crate) struct MemoryCore {
    collections: DashMap<String, IndexMap<String, Document>>,
}

impl MemoryCore {
    pub(crate) fn new() -> MemoryCore {
        MemoryCore {
            collections: DashMap::new(),
        }
    }

    /// Returns the documents of a collection in insertion order. An absent
    /// collection reads as empty.
    pub(crate) fn documents(&self, collection_path: &str) -> Vec<Document> {
        match self.collections.get(collection_path) {
            Some(collection) => collection.values().cloned().collect(),
            None => Vec::new(),
        }
    }

    pub(crate) fn get(&self, collection_path: &str, id: &str) -> Option<Document> {
        self.collections
            .get(collection_path)
            .and_then(|collection| collection.get(id).cloned())
    }

    /// Stores a document, resolving server timestamp sentinels first. With
    /// `merge` the given fields overlay any stored document; without it the
    /// document is fully replaced.
    pub(crate) fn set(&self, collection_path: &str, id: &str, value: Document, merge: bool) {
        let resolved = resolve_sentinels(value, Utc::now());
        let mut collection = self.collections.entry(collection_path.to_string()).or_default();

        match collection.get_mut(id) {
            Some(stored) if merge => stored.merge_from(&resolved),
            _ => {
                collection.insert(id.to_string(), resolved);
            }
        }
    }

    /// Partial update with exactly the given fields. Fails when the document
    /// does not exist; a failed update must not create the collection.
    pub(crate) fn update(
        &self,
        collection_path: &str,
        id: &str,
        value: Document,
    ) -> DocRefResult<()> {
        let resolved = resolve_sentinels(value, Utc::now());

        if let Some(mut collection) = self.collections.get_mut(collection_path) {
            if let Some(stored) = collection.get_mut(id) {
                stored.merge_from(&resolved);
                return Ok(());
            }
        }

        log::error!("No document to update: {}/{}", collection_path, id);
        Err(DocRefError::new(
            &format!("No document to update: {}/{}", collection_path, id),
            ErrorKind::NotFound,
        ))
    }

    /// Deletes a document. Deleting an absent document is a no-op.
    pub(crate) fn delete(&self, collection_path: &str, id: &str) {
        if let Some(mut collection) = self.collections.get_mut(collection_path) {
            collection.shift_remove(id);
        }
    }
}

/// Replaces every [Value::ServerTimestamp] sentinel in the document with the
/// given instant, descending into nested documents and arrays.
fn resolve_sentinels(value: Document, now: DateTime<Utc>) -> Document {
    let mut resolved = Document::new();
    for (key, field) in value.iter() {
        // put only fails on an empty key, which the source document rejects
        let _ = resolved.put(key, resolve_value(field.clone(), now));
    }
    resolved
}

fn resolve_value(value: Value, now: DateTime<Utc>) -> Value {
    match value {
        Value::ServerTimestamp => Value::DateTime(now),
        Value::Document(doc) => Value::Document(resolve_sentinels(doc, now)),
        Value::Array(items) => Value::Array(
            items
                .into_iter()
                .map(|item| resolve_value(item, now))
                .collect(),
        ),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{doc, val};

    #[test]
    fn test_absent_collection_reads_empty() {
        let core = MemoryCore::new();
        assert!(core.documents("products").is_empty());
        assert!(core.get("products", "p1").is_none());
    }

    #[test]
    fn test_set_and_get() {
        let core = MemoryCore::new();
        core.set("products", "p1", doc! { name: "Lamp" }, false);

        let stored = core.get("products", "p1").unwrap();
        assert_eq!(stored.get("name"), val!("Lamp"));
    }

    #[test]
    fn test_set_replaces_without_merge() {
        let core = MemoryCore::new();
        core.set("products", "p1", doc! { name: "Lamp", price: 10 }, false);
        core.set("products", "p1", doc! { price: 12 }, false);

        let stored = core.get("products", "p1").unwrap();
        assert!(!stored.contains("name"));
        assert_eq!(stored.get("price"), val!(12));
    }

    #[test]
    fn test_set_preserves_with_merge() {
        let core = MemoryCore::new();
        core.set("products", "p1", doc! { name: "Lamp" }, true);
        core.set("products", "p1", doc! { price: 10 }, true);

        let stored = core.get("products", "p1").unwrap();
        assert_eq!(stored.get("name"), val!("Lamp"));
        assert_eq!(stored.get("price"), val!(10));
    }

    #[test]
    fn test_update_missing_document_fails() {
        let core = MemoryCore::new();
        let result = core.update("products", "missing", doc! { price: 10 });
        assert!(result.is_err());
        assert_eq!(result.unwrap_err().kind(), &ErrorKind::NotFound);
    }

    #[test]
    fn test_failed_update_does_not_create_collection() {
        let core = MemoryCore::new();
        let result = core.update("products", "missing", doc! { price: 10 });

        assert!(result.is_err());
        assert!(!core.collections.contains_key("products"));
    }

    #[test]
    fn test_update_touches_only_given_fields() {
        let core = MemoryCore::new();
        core.set("products", "p1", doc! { name: "Lamp", price: 10 }, false);
        core.update("products", "p1", doc! { price: 12 }).unwrap();

        let stored = core.get("products", "p1").unwrap();
        assert_eq!(stored.get("name"), val!("Lamp"));
        assert_eq!(stored.get("price"), val!(12));
    }

    #[test]
    fn test_delete_is_idempotent() {
        let core = MemoryCore::new();
        core.set("products", "p1", doc! { name: "Lamp" }, false);

        core.delete("products", "p1");
        assert!(core.get("products", "p1").is_none());

        // deleting again, or deleting from an absent collection, is a no-op
        core.delete("products", "p1");
        core.delete("ghosts", "g1");
    }

    #[test]
    fn test_documents_preserve_insertion_order() {
        let core = MemoryCore::new();
        core.set("products", "b", doc! { n: 1 }, false);
        core.set("products", "a", doc! { n: 2 }, false);
        core.set("products", "c", doc! { n: 3 }, false);

        let docs = core.documents("products");
        let order: Vec<_> = docs.iter().map(|d| d.get("n")).collect();
        assert_eq!(order, vec![val!(1), val!(2), val!(3)]);
    }

    #[test]
    fn test_sentinel_resolved_on_set() {
        let core = MemoryCore::new();
        let mut value = doc! { name: "Lamp" };
        value.put("created_at", Value::ServerTimestamp).unwrap();
        core.set("products", "p1", value, false);

        let stored = core.get("products", "p1").unwrap();
        assert!(stored.get("created_at").as_date_time().is_some());
    }

    #[test]
    fn test_sentinel_resolved_in_nested_values() {
        let now = Utc::now();
        let mut nested = Document::new();
        nested.put("at", Value::ServerTimestamp).unwrap();
        let mut value = Document::new();
        value.put("meta", nested).unwrap();
        value
            .put("stamps", vec![Value::ServerTimestamp])
            .unwrap();

        let resolved = resolve_sentinels(value, now);
        let meta = resolved.get("meta");
        assert_eq!(
            meta.as_document().unwrap().get("at"),
            Value::DateTime(now)
        );
        assert_eq!(resolved.get("stamps").as_array().unwrap()[0], Value::DateTime(now));
    }
}
