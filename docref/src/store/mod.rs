//! Store provider layer: the contract a hierarchical document-store backend
//! must satisfy, plus the public reference handles wrapped around it.
//!
//! References are constructed synchronously and lazily; only the operations
//! that touch the backend (`get`, `set`, `update`, `delete`, `fetch`) are
//! async, one suspend point per network round trip. The handles are cheap to
//! clone and share the provider through an `Arc`.

pub mod memory;

use crate::common::Document;
use crate::errors::DocRefResult;
use crate::query::{Query, QuerySpec};
use async_trait::async_trait;
use std::fmt::{Debug, Formatter};
use std::sync::Arc;

/// Contract for a document-store backend.
///
/// A store is a flat namespace of root collections; everything below a root
/// collection is reached through [CollectionProvider] and [DocumentProvider]
/// references. Implementers must be `Send + Sync`; concurrent calls are
/// independent and the store is the only state shared across them.
pub trait DocumentStoreProvider: Send + Sync {
    /// Returns a reference to a root collection. No existence check is
    /// performed; collections spring into being on first write.
    fn root_collection(&self, name: &str) -> CollectionRef;
}

/// Contract for a collection reference.
#[async_trait]
pub trait CollectionProvider: Send + Sync {
    /// The full path of this collection, e.g. `sessions/42/cart`.
    fn path(&self) -> String;

    /// The collection name, the last path segment.
    fn name(&self) -> String;

    /// Returns a lazy reference to the document with the given id.
    fn doc(&self, id: &str) -> DocumentRef;

    /// Returns a reference to a new document with a backend-assigned id.
    fn new_doc(&self) -> DocumentRef;

    /// Executes a composed query against this collection and returns the
    /// matching document payloads in result order.
    async fn fetch(&self, spec: &QuerySpec) -> DocRefResult<Vec<Document>>;
}

/// Contract for a document reference.
#[async_trait]
pub trait DocumentProvider: Send + Sync {
    /// The document id, the last path segment.
    fn id(&self) -> String;

    /// The full path of this document, e.g. `products/p1`.
    fn path(&self) -> String;

    /// Returns a reference to a sub-collection of this document.
    fn subcollection(&self, name: &str) -> CollectionRef;

    /// Point read. Absence is not an error.
    async fn get(&self) -> DocRefResult<Option<Document>>;

    /// Full or merge set. With `merge` the given fields overlay the stored
    /// document; without it the document is fully replaced. Server timestamp
    /// sentinels in the value are resolved by the backend.
    async fn set(&self, value: Document, merge: bool) -> DocRefResult<()>;

    /// Partial update with exactly the given fields. Fails if the document
    /// does not exist.
    async fn update(&self, value: Document) -> DocRefResult<()>;

    /// Deletes the document. Deleting an absent document is a no-op.
    async fn delete(&self) -> DocRefResult<()>;
}

/// Handle to a document-store backend.
///
/// `DocumentStore` is the process-wide connection handle: created once at
/// startup from a provider, cloned freely, injected into the access layer.
#[derive(Clone)]
pub struct DocumentStore {
    inner: Arc<dyn DocumentStoreProvider>,
}

impl DocumentStore {
    /// Wraps a backend provider into a store handle.
    pub fn new(provider: impl DocumentStoreProvider + 'static) -> DocumentStore {
        DocumentStore {
            inner: Arc::new(provider),
        }
    }

    /// Returns a reference to a root collection.
    pub fn root_collection(&self, name: &str) -> CollectionRef {
        self.inner.root_collection(name)
    }
}

impl Debug for DocumentStore {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "DocumentStore")
    }
}

/// Handle to a collection reference.
#[derive(Clone)]
pub struct CollectionRef {
    inner: Arc<dyn CollectionProvider>,
}

impl CollectionRef {
    /// Wraps a backend collection provider.
    pub fn new(provider: impl CollectionProvider + 'static) -> CollectionRef {
        CollectionRef {
            inner: Arc::new(provider),
        }
    }

    /// The full path of this collection.
    pub fn path(&self) -> String {
        self.inner.path()
    }

    /// The collection name.
    pub fn name(&self) -> String {
        self.inner.name()
    }

    /// Returns a lazy reference to the document with the given id.
    pub fn doc(&self, id: &str) -> DocumentRef {
        self.inner.doc(id)
    }

    /// Returns a reference to a new document with a backend-assigned id.
    pub fn new_doc(&self) -> DocumentRef {
        self.inner.new_doc()
    }

    /// Starts a query builder over this collection.
    pub fn query(&self) -> Query {
        Query::new(self.clone())
    }

    /// Executes a composed query against this collection.
    pub async fn fetch(&self, spec: &QuerySpec) -> DocRefResult<Vec<Document>> {
        self.inner.fetch(spec).await
    }
}

impl Debug for CollectionRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "CollectionRef({})", self.path())
    }
}

/// Handle to a document reference.
#[derive(Clone)]
pub struct DocumentRef {
    inner: Arc<dyn DocumentProvider>,
}

impl DocumentRef {
    /// Wraps a backend document provider.
    pub fn new(provider: impl DocumentProvider + 'static) -> DocumentRef {
        DocumentRef {
            inner: Arc::new(provider),
        }
    }

    /// The document id.
    pub fn id(&self) -> String {
        self.inner.id()
    }

    /// The full path of this document.
    pub fn path(&self) -> String {
        self.inner.path()
    }

    /// Returns a reference to a sub-collection of this document.
    pub fn subcollection(&self, name: &str) -> CollectionRef {
        self.inner.subcollection(name)
    }

    /// Point read. Returns `None` when the document does not exist.
    pub async fn get(&self) -> DocRefResult<Option<Document>> {
        self.inner.get().await
    }

    /// Full or merge set.
    pub async fn set(&self, value: Document, merge: bool) -> DocRefResult<()> {
        self.inner.set(value, merge).await
    }

    /// Partial update with exactly the given fields.
    pub async fn update(&self, value: Document) -> DocRefResult<()> {
        self.inner.update(value).await
    }

    /// Deletes the document.
    pub async fn delete(&self) -> DocRefResult<()> {
        self.inner.delete().await
    }
}

impl Debug for DocumentRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "DocumentRef({})", self.path())
    }
}
