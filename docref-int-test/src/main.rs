use docref::errors::DocRefResult;
use docref::{doc, FilterOp, IdPolicy, ReadOptions, SortOrder, WriteOptions};
use docref_int_test::test_util::create_test_context;

#[tokio::main]
async fn main() -> DocRefResult<()> {
    println!("Starting stress test...");
    let ctx = create_test_context()?;
    let store = ctx.store();

    let count = 100000;

    let start = std::time::Instant::now();
    for n in 0..count {
        let item = doc! {
            sku: (uuid::Uuid::new_v4().to_string()),
            price: (n % 500),
            processed: false,
        };
        store
            .add_data(WriteOptions::new("items", item), IdPolicy::DefaultField)
            .await?;
    }
    let elapsed = start.elapsed();
    println!("Inserted {} documents in {:?}", count, elapsed);

    let start = std::time::Instant::now();
    let pending = store
        .get_data(ReadOptions::new("items").filter("processed", FilterOp::Equal, false))
        .await?;
    let elapsed = start.elapsed();
    println!("Fetched {} pending documents in {:?}", pending.len(), elapsed);

    let start = std::time::Instant::now();
    for item in &pending {
        let id = item.get("id").as_str().unwrap_or_default().to_string();
        store
            .add_data(
                WriteOptions::new(&format!("items/{}", id), doc! { processed: true })
                    .update(true),
                IdPolicy::Skip,
            )
            .await?;
    }
    let elapsed = start.elapsed();
    println!("Updated {} documents in {:?}", pending.len(), elapsed);

    let start = std::time::Instant::now();
    let page = store
        .get_data(
            ReadOptions::new("items")
                .filter("processed", FilterOp::Equal, true)
                .order_by("price", SortOrder::Descending)
                .limit(25),
        )
        .await?;
    let elapsed = start.elapsed();
    println!("Fetched top {} by price in {:?}", page.len(), elapsed);

    Ok(())
}
