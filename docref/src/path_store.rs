use crate::common::Document;
use crate::errors::DocRefResult;
use crate::operation::{ReadOperations, WriteOperations};
use crate::options::{IdPolicy, ReadOptions, WriteOptions};
use crate::path_store_builder::PathStoreBuilder;
use crate::store::DocumentStore;
use std::sync::Arc;

/// The path-addressed access layer over a document-store backend.
///
/// `PathStore` is the entry point for callers: it maps a slash-delimited
/// logical path to the backend's collection/document references and performs
/// either a write (create, merge, update, delete) or a filtered, ordered,
/// paginated read against them.
///
/// The backend connection is injected at construction and is the only state
/// shared across calls; concurrent calls are independent and may be issued
/// in parallel. `PathStore` uses the PIMPL pattern internally, so clones are
/// cheap and share the same backend handle.
///
/// # Examples
///
/// ```rust,ignore
/// use docref::{doc, IdPolicy, PathStore, ReadOptions, WriteOptions};
///
/// let store = PathStore::builder().open()?;
///
/// store
///     .add_data(
///         WriteOptions::new("products/p1", doc! { name: "Lamp" }),
///         IdPolicy::default(),
///     )
///     .await?;
///
/// let records = store.get_data(ReadOptions::new("products")).await?;
/// ```
#[derive(Clone, Debug)]
pub struct PathStore {
    inner: Arc<PathStoreInner>,
}

impl PathStore {
    /// Creates a new [PathStoreBuilder] for configuring and opening a store.
    pub fn builder() -> PathStoreBuilder {
        PathStoreBuilder::new()
    }

    pub(crate) fn new(store: DocumentStore) -> PathStore {
        PathStore {
            inner: Arc::new(PathStoreInner {
                write_operations: WriteOperations::new(store.clone()),
                read_operations: ReadOperations::new(store.clone()),
                store,
            }),
        }
    }

    /// Writes `options.value` at `options.path`.
    ///
    /// Performs exactly one of delete, partial update, or set, in that
    /// priority order of the option flags, after applying the id and
    /// timestamp injection policies. Returns the value object, augmented
    /// with the target document's id when the policy injected one.
    ///
    /// # Errors
    ///
    /// * [crate::errors::ErrorKind::InvalidPath] for a malformed path
    /// * [crate::errors::ErrorKind::DocumentRequired] when delete or update
    ///   is requested on a collection-addressing path
    /// * backend failures, propagated unchanged
    pub async fn add_data(
        &self,
        options: WriteOptions,
        id_policy: IdPolicy,
    ) -> DocRefResult<Document> {
        self.inner.write_operations.execute(options, &id_policy).await
    }

    /// Reads the document payloads addressed by `options.path`.
    ///
    /// A document-addressing path is a point read returning zero or one
    /// record; a collection-addressing path returns the matching records in
    /// result order.
    ///
    /// # Errors
    ///
    /// * [crate::errors::ErrorKind::InvalidPath] for a malformed path
    /// * [crate::errors::ErrorKind::InvalidQuery] when filters are supplied
    ///   against a document-addressing path
    /// * backend failures, propagated unchanged
    pub async fn get_data(&self, options: ReadOptions) -> DocRefResult<Vec<Document>> {
        self.inner.read_operations.execute(options).await
    }

    /// The injected backend handle, for adapters that need raw references.
    pub fn store(&self) -> &DocumentStore {
        &self.inner.store
    }
}

struct PathStoreInner {
    store: DocumentStore,
    write_operations: WriteOperations,
    read_operations: ReadOperations,
}

impl std::fmt::Debug for PathStoreInner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PathStoreInner")
    }
}
