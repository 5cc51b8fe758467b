use crate::common::Document;
use crate::errors::DocRefResult;
use crate::query::{OrderBy, QuerySpec};
use crate::store::memory::{InMemoryDocument, MemoryCore};
use crate::store::{CollectionProvider, DocumentRef};
use async_trait::async_trait;
use itertools::Itertools;
use std::cmp::Ordering;
use std::sync::Arc;

/// Collection reference backed by an [crate::store::memory::InMemoryStore].
pub(crate) struct InMemoryCollection {
    core: Arc<MemoryCore>,
    path: String,
}

impl InMemoryCollection {
    pub(crate) fn new(core: Arc<MemoryCore>, path: String) -> InMemoryCollection {
        InMemoryCollection { core, path }
    }
}

#[async_trait]
impl CollectionProvider for InMemoryCollection {
    fn path(&self) -> String {
        self.path.clone()
    }

    fn name(&self) -> String {
        match self.path.rsplit('/').next() {
            Some(name) => name.to_string(),
            None => self.path.clone(),
        }
    }

    fn doc(&self, id: &str) -> DocumentRef {
        DocumentRef::new(InMemoryDocument::new(
            self.core.clone(),
            self.path.clone(),
            id.to_string(),
        ))
    }

    fn new_doc(&self) -> DocumentRef {
        self.doc(&uuid::Uuid::new_v4().to_string())
    }

    async fn fetch(&self, spec: &QuerySpec) -> DocRefResult<Vec<Document>> {
        let mut documents = self.core.documents(&self.path);

        // filters apply in caller-given order; each one is AND-ed
        for filter in &spec.filters {
            documents.retain(|document| filter.matches(document));
        }

        // ordering applies before cursors; cursor positions are undefined
        // without it, so cursors are skipped when no ordering is set
        if let Some(order_by) = &spec.order_by {
            documents = documents
                .into_iter()
                .sorted_by(|a, b| ordered_cmp(order_by, a, b))
                .collect();

            if let Some(cursor) = &spec.start_at {
                documents = documents
                    .into_iter()
                    .skip_while(|document| {
                        cursor_cmp(order_by, document, cursor) == Ordering::Less
                    })
                    .collect();
            }

            // applied after start_at, so supplying both yields start_after
            // semantics
            if let Some(cursor) = &spec.start_after {
                documents = documents
                    .into_iter()
                    .skip_while(|document| {
                        cursor_cmp(order_by, document, cursor) != Ordering::Greater
                    })
                    .collect();
            }
        }

        if let Some(limit) = spec.limit {
            documents.truncate(limit as usize);
        }

        Ok(documents)
    }
}

/// Compares two documents on the ordered field, honoring the direction.
fn ordered_cmp(order_by: &OrderBy, a: &Document, b: &Document) -> Ordering {
    let ordering = a.get(&order_by.field).cmp(&b.get(&order_by.field));
    match order_by.order {
        crate::common::SortOrder::Ascending => ordering,
        crate::common::SortOrder::Descending => ordering.reverse(),
    }
}

/// Positions a document relative to a cursor value in the ordered view.
fn cursor_cmp(order_by: &OrderBy, document: &Document, cursor: &crate::common::Value) -> Ordering {
    let ordering = document.get(&order_by.field).cmp(cursor);
    match order_by.order {
        crate::common::SortOrder::Ascending => ordering,
        crate::common::SortOrder::Descending => ordering.reverse(),
    }
}
