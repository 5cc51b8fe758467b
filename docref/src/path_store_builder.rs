use crate::errors::DocRefResult;
use crate::path_store::PathStore;
use crate::store::memory::InMemoryStore;
use crate::store::DocumentStore;

/// Builder for creating and configuring a [PathStore].
///
/// The backend handle is injected here, once, at startup; the opened store
/// reuses it for every call. When no backend is supplied the builder falls
/// back to a fresh [InMemoryStore], which is what tests use.
///
/// # Examples
///
/// ```rust,ignore
/// use docref::PathStore;
/// use docref::store::DocumentStore;
///
/// // In-memory store
/// let store = PathStore::builder().open()?;
///
/// // Injected backend
/// let store = PathStore::builder()
///     .store(DocumentStore::new(my_backend))
///     .open()?;
/// ```
#[derive(Default)]
pub struct PathStoreBuilder {
    store: Option<DocumentStore>,
}

impl PathStoreBuilder {
    /// Creates a new builder with default configuration.
    pub fn new() -> PathStoreBuilder {
        PathStoreBuilder { store: None }
    }

    /// Injects the backend connection handle.
    pub fn store(mut self, store: DocumentStore) -> PathStoreBuilder {
        self.store = Some(store);
        self
    }

    /// Opens the path store over the configured backend.
    pub fn open(self) -> DocRefResult<PathStore> {
        let store = match self.store {
            Some(store) => store,
            None => {
                log::debug!("No backend injected, using in-memory store");
                DocumentStore::new(InMemoryStore::new())
            }
        };
        Ok(PathStore::new(store))
    }
}
