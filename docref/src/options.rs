use crate::common::{Document, SortOrder, Value, DEFAULT_ID_FIELD};
use crate::query::{FieldFilter, FilterOp, OrderBy};

/// Options for a write through [crate::PathStore::add_data].
///
/// The `delete`, `update` and `merge` flags mirror the wire options of the
/// access layer: `delete` takes priority over `update`, which takes priority
/// over a plain set. The flags are collapsed into a [WriteAction] exactly
/// once before dispatch, so the precedence lives in one place.
///
/// # Examples
///
/// ```rust,ignore
/// use docref::{doc, WriteOptions};
///
/// let options = WriteOptions::new("products/p1", doc! { name: "Lamp" })
///     .merge(true)
///     .timestamp_field("created_at");
/// ```
#[derive(Debug, Clone, serde::Deserialize, serde::Serialize)]
pub struct WriteOptions {
    pub path: String,
    pub value: Document,
    pub timestamp_field: Option<String>,
    pub merge: bool,
    pub update: bool,
    pub delete: bool,
}

impl WriteOptions {
    /// Creates write options for a plain set of `value` at `path`.
    pub fn new(path: &str, value: Document) -> WriteOptions {
        WriteOptions {
            path: path.to_string(),
            value,
            timestamp_field: None,
            merge: false,
            update: false,
            delete: false,
        }
    }

    /// Names the field that receives a server-generated creation timestamp
    /// when the document is set.
    pub fn timestamp_field(mut self, field: &str) -> WriteOptions {
        self.timestamp_field = Some(field.to_string());
        self
    }

    /// Controls whether a set preserves unspecified stored fields (`true`)
    /// or fully replaces the document (`false`, the default).
    pub fn merge(mut self, merge: bool) -> WriteOptions {
        self.merge = merge;
        self
    }

    /// Requests a partial update with exactly the fields present in the
    /// value. Lower priority than `delete`.
    pub fn update(mut self, update: bool) -> WriteOptions {
        self.update = update;
        self
    }

    /// Requests a delete. Highest priority; the value is returned unchanged.
    pub fn delete(mut self, delete: bool) -> WriteOptions {
        self.delete = delete;
        self
    }
}

/// The single dispatched action of a write, constructed once from the
/// priority-encoded option flags: delete over update over replace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteAction {
    /// Delete the addressed document
    Delete,
    /// Partial update with exactly the supplied fields
    Update,
    /// Full or merge set
    Replace {
        /// Preserve unspecified stored fields when `true`
        merge: bool,
    },
}

impl WriteAction {
    /// Collapses the option flags into the action, applying the strict
    /// priority order.
    pub fn from_options(options: &WriteOptions) -> WriteAction {
        if options.delete {
            WriteAction::Delete
        } else if options.update {
            WriteAction::Update
        } else {
            WriteAction::Replace {
                merge: options.merge,
            }
        }
    }

    /// Returns `true` for the actions that require the path to address an
    /// explicit document.
    pub fn requires_document(&self) -> bool {
        matches!(self, WriteAction::Delete | WriteAction::Update)
    }
}

/// The rule controlling whether and under what field name a document's
/// generated or addressed id is copied into its own stored value.
///
/// Mirrors the wire tri-state `false | true | "field_name"`.
#[derive(Debug, Clone, PartialEq, Eq, Default, serde::Deserialize, serde::Serialize)]
pub enum IdPolicy {
    /// Never inject the id
    Skip,
    /// Inject under the default `id` field
    #[default]
    DefaultField,
    /// Inject under a caller-specified field name
    Field(String),
}

impl IdPolicy {
    /// The field name the id should be written to, or `None` when injection
    /// is disabled.
    pub fn field_name(&self) -> Option<&str> {
        match self {
            IdPolicy::Skip => None,
            IdPolicy::DefaultField => Some(DEFAULT_ID_FIELD),
            IdPolicy::Field(name) => Some(name),
        }
    }
}

/// Options for a read through [crate::PathStore::get_data].
///
/// Filters are illegal when the path addresses a single document; they are
/// AND-composed in the order they were added.
///
/// # Examples
///
/// ```rust,ignore
/// use docref::{FilterOp, ReadOptions, SortOrder};
///
/// let options = ReadOptions::new("products")
///     .filter("price", FilterOp::GreaterThan, 10)
///     .order_by("price", SortOrder::Ascending)
///     .limit(20);
/// ```
#[derive(Debug, Clone, Default, serde::Deserialize, serde::Serialize)]
pub struct ReadOptions {
    pub path: String,
    pub limit: Option<u32>,
    pub filters: Vec<FieldFilter>,
    pub order_by: Option<OrderBy>,
    pub start_at: Option<Value>,
    pub start_after: Option<Value>,
}

impl ReadOptions {
    /// Creates read options for the given path with no constraints.
    pub fn new(path: &str) -> ReadOptions {
        ReadOptions {
            path: path.to_string(),
            ..ReadOptions::default()
        }
    }

    /// Adds an AND-composed field filter.
    pub fn filter<T: Into<Value>>(mut self, field: &str, op: FilterOp, value: T) -> ReadOptions {
        self.filters.push(FieldFilter::new(field, op, value));
        self
    }

    /// Orders results by a field.
    pub fn order_by(mut self, field: &str, order: SortOrder) -> ReadOptions {
        self.order_by = Some(OrderBy::new(field, order));
        self
    }

    /// Starts results at the given cursor value, inclusive.
    pub fn start_at<T: Into<Value>>(mut self, value: T) -> ReadOptions {
        self.start_at = Some(value.into());
        self
    }

    /// Starts results after the given cursor value, exclusive.
    pub fn start_after<T: Into<Value>>(mut self, value: T) -> ReadOptions {
        self.start_after = Some(value.into());
        self
    }

    /// Truncates the result set to at most `limit` documents.
    pub fn limit(mut self, limit: u32) -> ReadOptions {
        self.limit = Some(limit);
        self
    }

    /// Returns `true` when no filter, ordering, cursor, or limit is set.
    pub fn is_unconstrained(&self) -> bool {
        self.filters.is_empty()
            && self.order_by.is_none()
            && self.start_at.is_none()
            && self.start_after.is_none()
            && self.limit.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::doc;

    #[test]
    fn test_write_options_defaults() {
        let options = WriteOptions::new("products/p1", doc! { name: "Lamp" });
        assert!(!options.merge);
        assert!(!options.update);
        assert!(!options.delete);
        assert!(options.timestamp_field.is_none());
    }

    #[test]
    fn test_write_action_priority_delete_wins() {
        let options = WriteOptions::new("products/p1", doc! {})
            .delete(true)
            .update(true)
            .merge(true);
        assert_eq!(WriteAction::from_options(&options), WriteAction::Delete);
    }

    #[test]
    fn test_write_action_priority_update_over_replace() {
        let options = WriteOptions::new("products/p1", doc! {}).update(true).merge(true);
        assert_eq!(WriteAction::from_options(&options), WriteAction::Update);
    }

    #[test]
    fn test_write_action_defaults_to_full_replace() {
        let options = WriteOptions::new("products/p1", doc! {});
        assert_eq!(
            WriteAction::from_options(&options),
            WriteAction::Replace { merge: false }
        );

        let merged = WriteOptions::new("products/p1", doc! {}).merge(true);
        assert_eq!(
            WriteAction::from_options(&merged),
            WriteAction::Replace { merge: true }
        );
    }

    #[test]
    fn test_write_action_requires_document() {
        assert!(WriteAction::Delete.requires_document());
        assert!(WriteAction::Update.requires_document());
        assert!(!WriteAction::Replace { merge: false }.requires_document());
    }

    #[test]
    fn test_id_policy_field_names() {
        assert_eq!(IdPolicy::Skip.field_name(), None);
        assert_eq!(IdPolicy::DefaultField.field_name(), Some("id"));
        assert_eq!(
            IdPolicy::Field("product_id".to_string()).field_name(),
            Some("product_id")
        );
    }

    #[test]
    fn test_id_policy_default() {
        assert_eq!(IdPolicy::default(), IdPolicy::DefaultField);
    }

    #[test]
    fn test_read_options_unconstrained() {
        assert!(ReadOptions::new("products").is_unconstrained());
        assert!(!ReadOptions::new("products").limit(1).is_unconstrained());
        assert!(!ReadOptions::new("products")
            .filter("price", FilterOp::GreaterThan, 1)
            .is_unconstrained());
    }

    #[test]
    fn test_read_options_builder_chain() {
        let options = ReadOptions::new("products")
            .filter("price", FilterOp::GreaterThan, 5)
            .filter("price", FilterOp::LessThan, 50)
            .order_by("price", SortOrder::Descending)
            .start_after(45)
            .limit(3);

        assert_eq!(options.filters.len(), 2);
        assert_eq!(options.order_by, Some(OrderBy::descending("price")));
        assert_eq!(options.start_after, Some(Value::I32(45)));
        assert_eq!(options.limit, Some(3));
    }
}
