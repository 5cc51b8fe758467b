use docref::errors::DocRefResult;
use docref::{doc, Document, IdPolicy, PathStore, WriteOptions};

#[derive(Clone)]
pub struct TestContext {
    store: PathStore,
}

impl TestContext {
    pub fn new(store: PathStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> PathStore {
        self.store.clone()
    }
}

pub fn create_test_context() -> DocRefResult<TestContext> {
    let store = PathStore::builder().open()?;
    Ok(TestContext::new(store))
}

pub fn random_session_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Sample product catalog modeled after a small web-shop inventory.
pub fn create_test_products() -> Vec<Document> {
    vec![
        doc! {
            product_id: "tea-001",
            name: "Green Tea",
            category: "beverage",
            price: 450,
            in_stock: true,
        },
        doc! {
            product_id: "tea-002",
            name: "Black Tea",
            category: "beverage",
            price: 420,
            in_stock: true,
        },
        doc! {
            product_id: "mug-001",
            name: "Ceramic Mug",
            category: "kitchenware",
            price: 1200,
            in_stock: false,
        },
        doc! {
            product_id: "mug-002",
            name: "Travel Mug",
            category: "kitchenware",
            price: 1800,
            in_stock: true,
        },
    ]
}

pub async fn seed_products(store: &PathStore) -> DocRefResult<()> {
    for product in create_test_products() {
        store
            .add_data(
                WriteOptions::new("products", product),
                IdPolicy::DefaultField,
            )
            .await?;
    }
    Ok(())
}

pub fn is_sorted<T: Ord>(iterable: impl IntoIterator<Item = T>, ascending: bool) -> bool {
    let mut iter = iterable.into_iter();
    if let Some(mut prev) = iter.next() {
        for current in iter {
            if ascending {
                if prev > current {
                    return false;
                }
            } else {
                if prev < current {
                    return false;
                }
            }
            prev = current;
        }
    }
    true
}
