/// Default field name used by the id policy when injecting a document's id
/// into its own stored value.
pub const DEFAULT_ID_FIELD: &str = "id";

/// Separator between segments of a logical path.
pub const PATH_SEPARATOR: char = '/';
