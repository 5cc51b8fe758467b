use crate::common::{Document, Value};
use crate::errors::{DocRefError, DocRefResult, ErrorKind};
use crate::options::{IdPolicy, WriteAction, WriteOptions};
use crate::path::DataPath;
use crate::store::{DocumentRef, DocumentStore};

/// Executes writes against resolved references.
///
/// Precondition checks run synchronously before any backend call; a backend
/// failure propagates unchanged. Exactly one backend write is issued per
/// execution.
pub(crate) struct WriteOperations {
    store: DocumentStore,
}

impl WriteOperations {
    pub(crate) fn new(store: DocumentStore) -> WriteOperations {
        WriteOperations { store }
    }

    /// Performs exactly one of delete, partial update, or set, applying the
    /// id-injection and timestamp-injection policies first. Returns the
    /// value object, augmented with the document id when one was injected.
    pub(crate) async fn execute(
        &self,
        options: WriteOptions,
        id_policy: &IdPolicy,
    ) -> DocRefResult<Document> {
        log::debug!("add_data path={} value={}", options.path, options.value);

        let action = WriteAction::from_options(&options);
        let path = DataPath::parse(&options.path)?;

        // document id must be provided to delete or update the document
        if action.requires_document() && !path.addresses_document() {
            log::error!(
                "Document id must be provided to delete or update: {}",
                options.path
            );
            return Err(DocRefError::new(
                "Document id must be provided to delete or update the document",
                ErrorKind::DocumentRequired,
            ));
        }

        let refs = path.resolve(&self.store);
        let target = match refs.document() {
            Some(document) if path.addresses_document() => document.clone(),
            _ => refs.collection().new_doc(),
        };

        let mut value = options.value;
        inject_id(&mut value, &target, id_policy)?;

        match action {
            WriteAction::Delete => target.delete().await?,
            WriteAction::Update => target.update(value.clone()).await?,
            WriteAction::Replace { merge } => {
                if let Some(field) = &options.timestamp_field {
                    value.put(field, Value::ServerTimestamp)?;
                }
                target.set(value.clone(), merge).await?;
            }
        }

        Ok(value)
    }
}

/// Writes the target document's id into the value under the policy's field
/// name, unless injection is disabled or the value already carries one.
fn inject_id(value: &mut Document, target: &DocumentRef, id_policy: &IdPolicy) -> DocRefResult<()> {
    if let Some(field) = id_policy.field_name() {
        if !value.has_value(field) {
            value.put(field, target.id())?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::InMemoryStore;
    use crate::{doc, val};

    fn write_ops() -> (WriteOperations, DocumentStore) {
        let store = DocumentStore::new(InMemoryStore::new());
        (WriteOperations::new(store.clone()), store)
    }

    #[tokio::test]
    async fn test_set_injects_id_from_addressed_document() {
        let (ops, store) = write_ops();

        let value = ops
            .execute(
                WriteOptions::new("products/p1", doc! { name: "Lamp" }),
                &IdPolicy::default(),
            )
            .await
            .unwrap();

        assert_eq!(value.get("id"), val!("p1"));
        let stored = store
            .root_collection("products")
            .doc("p1")
            .get()
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.get("id"), val!("p1"));
        assert_eq!(stored.get("name"), val!("Lamp"));
    }

    #[tokio::test]
    async fn test_collection_path_auto_generates_id() {
        let (ops, store) = write_ops();

        let value = ops
            .execute(
                WriteOptions::new("sessions/42/cart", doc! { qty: 2 }),
                &IdPolicy::default(),
            )
            .await
            .unwrap();

        let id = value.get("id");
        let id = id.as_str().unwrap();
        let stored = store
            .root_collection("sessions")
            .doc("42")
            .subcollection("cart")
            .doc(id)
            .get()
            .await
            .unwrap();
        assert!(stored.is_some());
    }

    #[tokio::test]
    async fn test_custom_id_field_policy() {
        let (ops, _) = write_ops();

        let value = ops
            .execute(
                WriteOptions::new("products/p1", doc! { name: "Lamp" }),
                &IdPolicy::Field("product_id".to_string()),
            )
            .await
            .unwrap();

        assert_eq!(value.get("product_id"), val!("p1"));
        assert!(!value.contains("id"));
    }

    #[tokio::test]
    async fn test_skip_policy_never_injects() {
        let (ops, _) = write_ops();

        let value = ops
            .execute(
                WriteOptions::new("products/p1", doc! { name: "Lamp" }),
                &IdPolicy::Skip,
            )
            .await
            .unwrap();

        assert!(!value.contains("id"));
    }

    #[tokio::test]
    async fn test_existing_id_is_preserved() {
        let (ops, _) = write_ops();

        let value = ops
            .execute(
                WriteOptions::new("products/p1", doc! { id: "custom", name: "Lamp" }),
                &IdPolicy::default(),
            )
            .await
            .unwrap();

        assert_eq!(value.get("id"), val!("custom"));
    }

    #[tokio::test]
    async fn test_delete_on_collection_path_fails() {
        let (ops, _) = write_ops();

        let result = ops
            .execute(
                WriteOptions::new("sessions", doc! { qty: 2 }).delete(true),
                &IdPolicy::default(),
            )
            .await;

        assert!(result.is_err());
        assert_eq!(result.unwrap_err().kind(), &ErrorKind::DocumentRequired);
    }

    #[tokio::test]
    async fn test_update_on_collection_path_fails() {
        let (ops, _) = write_ops();

        let result = ops
            .execute(
                WriteOptions::new("sessions/42/cart", doc! { qty: 2 }).update(true),
                &IdPolicy::default(),
            )
            .await;

        assert!(result.is_err());
        assert_eq!(result.unwrap_err().kind(), &ErrorKind::DocumentRequired);
    }

    #[tokio::test]
    async fn test_delete_precedes_update() {
        let (ops, store) = write_ops();
        let products = store.root_collection("products");
        products.doc("p1").set(doc! { name: "Lamp" }, false).await.unwrap();

        // both flags set: delete wins
        ops.execute(
            WriteOptions::new("products/p1", doc! { name: "Desk" })
                .delete(true)
                .update(true),
            &IdPolicy::Skip,
        )
        .await
        .unwrap();

        assert!(products.doc("p1").get().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_merge_set_preserves_existing_fields() {
        let (ops, store) = write_ops();

        ops.execute(
            WriteOptions::new("products/p1", doc! { name: "Lamp" }).merge(true),
            &IdPolicy::default(),
        )
        .await
        .unwrap();
        ops.execute(
            WriteOptions::new("products/p1", doc! { price: 10 }).merge(true),
            &IdPolicy::default(),
        )
        .await
        .unwrap();

        let stored = store
            .root_collection("products")
            .doc("p1")
            .get()
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.get("name"), val!("Lamp"));
        assert_eq!(stored.get("price"), val!(10));
    }

    #[tokio::test]
    async fn test_plain_set_fully_replaces() {
        let (ops, store) = write_ops();

        ops.execute(
            WriteOptions::new("products/p1", doc! { name: "Lamp", price: 10 }),
            &IdPolicy::Skip,
        )
        .await
        .unwrap();
        ops.execute(
            WriteOptions::new("products/p1", doc! { name: "Desk" }),
            &IdPolicy::Skip,
        )
        .await
        .unwrap();

        let stored = store
            .root_collection("products")
            .doc("p1")
            .get()
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.get("name"), val!("Desk"));
        assert!(!stored.contains("price"));
    }

    #[tokio::test]
    async fn test_update_touches_only_supplied_fields() {
        let (ops, store) = write_ops();
        store
            .root_collection("products")
            .doc("p1")
            .set(doc! { name: "Lamp", price: 10 }, false)
            .await
            .unwrap();

        ops.execute(
            WriteOptions::new("products/p1", doc! { price: 12 }).update(true),
            &IdPolicy::Skip,
        )
        .await
        .unwrap();

        let stored = store
            .root_collection("products")
            .doc("p1")
            .get()
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.get("name"), val!("Lamp"));
        assert_eq!(stored.get("price"), val!(12));
    }

    #[tokio::test]
    async fn test_update_missing_document_propagates_backend_error() {
        let (ops, _) = write_ops();

        let result = ops
            .execute(
                WriteOptions::new("products/missing", doc! { price: 12 }).update(true),
                &IdPolicy::Skip,
            )
            .await;

        assert!(result.is_err());
        assert_eq!(result.unwrap_err().kind(), &ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_timestamp_field_injection_on_set() {
        let (ops, store) = write_ops();

        let value = ops
            .execute(
                WriteOptions::new("products/p1", doc! { name: "Lamp" })
                    .timestamp_field("created_at"),
                &IdPolicy::default(),
            )
            .await
            .unwrap();

        // the returned value carries the sentinel, the stored document the
        // resolved server time
        assert_eq!(value.get("created_at"), Value::ServerTimestamp);
        let stored = store
            .root_collection("products")
            .doc("p1")
            .get()
            .await
            .unwrap()
            .unwrap();
        assert!(stored.get("created_at").as_date_time().is_some());
    }

    #[tokio::test]
    async fn test_invalid_path_fails_before_backend() {
        let (ops, _) = write_ops();

        let result = ops
            .execute(
                WriteOptions::new("products//p1", doc! { name: "Lamp" }),
                &IdPolicy::default(),
            )
            .await;

        assert!(result.is_err());
        assert_eq!(result.unwrap_err().kind(), &ErrorKind::InvalidPath);
    }

    #[tokio::test]
    async fn test_delete_returns_value_with_injected_id() {
        let (ops, _) = write_ops();

        let value = ops
            .execute(
                WriteOptions::new("products/p1", doc! {}).delete(true),
                &IdPolicy::default(),
            )
            .await
            .unwrap();

        assert_eq!(value.get("id"), val!("p1"));
    }
}
