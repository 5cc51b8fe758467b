/// Specifies the direction for ordering query results.
///
/// # Variants
/// - `Ascending`: smallest to largest value (A to Z, 0 to 9, oldest to newest)
/// - `Descending`: largest to smallest value (Z to A, 9 to 0, newest to oldest)
///
/// Used with the query builder's `order_by`:
/// ```text
/// let query = collection.query().order_by("price", SortOrder::Descending);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub enum SortOrder {
    /// Sort in ascending order
    Ascending,
    /// Sort in descending order
    Descending,
}
