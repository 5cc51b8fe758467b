use crate::common::Document;
use crate::errors::{DocRefError, DocRefResult, ErrorKind};
use crate::options::ReadOptions;
use crate::path::DataPath;
use crate::store::DocumentStore;

/// Executes reads against resolved references.
///
/// A document-addressing path becomes a point read; a collection-addressing
/// path becomes a query composed from the read options. Absence of an
/// addressed document is not an error.
pub(crate) struct ReadOperations {
    store: DocumentStore,
}

impl ReadOperations {
    pub(crate) fn new(store: DocumentStore) -> ReadOperations {
        ReadOperations { store }
    }

    /// Fetches the document payloads addressed by the options, in result
    /// order.
    pub(crate) async fn execute(&self, options: ReadOptions) -> DocRefResult<Vec<Document>> {
        log::debug!("get_data path={} filters={}", options.path, options.filters.len());

        let path = DataPath::parse(&options.path)?;

        // query semantics do not apply to a point lookup
        if path.addresses_document() && !options.filters.is_empty() {
            log::error!("Filters cannot run on a document: {}", options.path);
            return Err(DocRefError::new(
                "Filters cannot run on a document",
                ErrorKind::InvalidQuery,
            ));
        }

        let refs = path.resolve(&self.store);

        if path.addresses_document() {
            return match refs.document() {
                Some(document) => Ok(document.get().await?.into_iter().collect()),
                // even segment counts always yield a document reference
                None => Ok(Vec::new()),
            };
        }

        let collection = refs.collection();
        if options.is_unconstrained() {
            // the bare collection reference is the query
            return collection.fetch(&Default::default()).await;
        }

        let mut query = collection.query();
        for filter in options.filters {
            query = query.filter(filter);
        }
        if let Some(order_by) = options.order_by {
            query = query.order_by(&order_by.field, order_by.order);
        }
        if let Some(value) = options.start_at {
            query = query.start_at(value);
        }
        if let Some(value) = options.start_after {
            query = query.start_after(value);
        }
        if let Some(limit) = options.limit {
            query = query.limit(limit);
        }

        query.get().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::SortOrder;
    use crate::query::FilterOp;
    use crate::store::memory::InMemoryStore;
    use crate::{doc, val};

    async fn seeded_ops() -> ReadOperations {
        let store = DocumentStore::new(InMemoryStore::new());
        let products = store.root_collection("products");
        for (id, price) in [("p1", 10i64), ("p2", 45i64), ("p3", 120i64)] {
            products
                .doc(id)
                .set(doc! { product_id: id, price: price }, false)
                .await
                .unwrap();
        }
        ReadOperations::new(store)
    }

    #[tokio::test]
    async fn test_point_read_returns_single_record() {
        let ops = seeded_ops().await;

        let records = ops.execute(ReadOptions::new("products/p2")).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].get("price"), val!(45i64));
    }

    #[tokio::test]
    async fn test_point_read_of_absent_document_is_empty() {
        let ops = seeded_ops().await;

        let records = ops.execute(ReadOptions::new("products/ghost")).await.unwrap();
        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn test_collection_read_returns_all_records() {
        let ops = seeded_ops().await;

        let records = ops.execute(ReadOptions::new("products")).await.unwrap();
        assert_eq!(records.len(), 3);
    }

    #[tokio::test]
    async fn test_filtered_read() {
        let ops = seeded_ops().await;

        let records = ops
            .execute(ReadOptions::new("products").filter("product_id", FilterOp::Equal, "p1"))
            .await
            .unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].get("product_id"), val!("p1"));
    }

    #[tokio::test]
    async fn test_filters_on_document_path_fail() {
        let ops = seeded_ops().await;

        let result = ops
            .execute(ReadOptions::new("products/p1").filter("x", FilterOp::Equal, 1))
            .await;
        assert!(result.is_err());
        assert_eq!(result.unwrap_err().kind(), &ErrorKind::InvalidQuery);
    }

    #[tokio::test]
    async fn test_order_limit_and_cursor_compose() {
        let ops = seeded_ops().await;

        let records = ops
            .execute(
                ReadOptions::new("products")
                    .order_by("price", SortOrder::Ascending)
                    .start_after(10)
                    .limit(1),
            )
            .await
            .unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].get("price"), val!(45i64));
    }

    #[tokio::test]
    async fn test_invalid_path_fails() {
        let ops = seeded_ops().await;

        let result = ops.execute(ReadOptions::new("")).await;
        assert!(result.is_err());
        assert_eq!(result.unwrap_err().kind(), &ErrorKind::InvalidPath);
    }

    #[tokio::test]
    async fn test_read_of_absent_collection_is_empty() {
        let ops = seeded_ops().await;

        let records = ops.execute(ReadOptions::new("warehouses")).await.unwrap();
        assert!(records.is_empty());
    }
}
