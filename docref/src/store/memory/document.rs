use crate::common::Document;
use crate::errors::DocRefResult;
use crate::store::memory::{InMemoryCollection, MemoryCore};
use crate::store::{CollectionRef, DocumentProvider};
use async_trait::async_trait;
use std::sync::Arc;

/// Document reference backed by an [crate::store::memory::InMemoryStore].
pub(crate) struct InMemoryDocument {
    core: Arc<MemoryCore>,
    collection_path: String,
    id: String,
}

impl InMemoryDocument {
    pub(crate) fn new(core: Arc<MemoryCore>, collection_path: String, id: String) -> InMemoryDocument {
        InMemoryDocument {
            core,
            collection_path,
            id,
        }
    }
}

#[async_trait]
impl DocumentProvider for InMemoryDocument {
    fn id(&self) -> String {
        self.id.clone()
    }

    fn path(&self) -> String {
        format!("{}/{}", self.collection_path, self.id)
    }

    fn subcollection(&self, name: &str) -> CollectionRef {
        CollectionRef::new(InMemoryCollection::new(
            self.core.clone(),
            format!("{}/{}/{}", self.collection_path, self.id, name),
        ))
    }

    async fn get(&self) -> DocRefResult<Option<Document>> {
        Ok(self.core.get(&self.collection_path, &self.id))
    }

    async fn set(&self, value: Document, merge: bool) -> DocRefResult<()> {
        self.core.set(&self.collection_path, &self.id, value, merge);
        Ok(())
    }

    async fn update(&self, value: Document) -> DocRefResult<()> {
        self.core.update(&self.collection_path, &self.id, value)
    }

    async fn delete(&self) -> DocRefResult<()> {
        self.core.delete(&self.collection_path, &self.id);
        Ok(())
    }
}
