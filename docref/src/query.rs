use crate::common::{Document, SortOrder, Value};
use crate::errors::{DocRefError, DocRefResult, ErrorKind};
use crate::store::CollectionRef;
use std::cmp::Ordering;
use std::fmt::{Debug, Display, Formatter};
use std::str::FromStr;

/// Comparison operators supported by field filters.
///
/// The set is closed and mirrors the operator strings accepted on the wire:
/// `<`, `<=`, `==`, `>=`, `>`, `array-contains`, `in`, `array-contains-any`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub enum FilterOp {
    /// Field value is less than the comparison value
    LessThan,
    /// Field value is less than or equal to the comparison value
    LessThanOrEqual,
    /// Field value equals the comparison value
    Equal,
    /// Field value is greater than or equal to the comparison value
    GreaterThanOrEqual,
    /// Field value is greater than the comparison value
    GreaterThan,
    /// Field value is an array containing the comparison value
    ArrayContains,
    /// Field value is a member of the comparison array
    In,
    /// Field value is an array sharing at least one element with the comparison array
    ArrayContainsAny,
}

impl FilterOp {
    /// Returns the operator string as accepted by [FilterOp::from_str].
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterOp::LessThan => "<",
            FilterOp::LessThanOrEqual => "<=",
            FilterOp::Equal => "==",
            FilterOp::GreaterThanOrEqual => ">=",
            FilterOp::GreaterThan => ">",
            FilterOp::ArrayContains => "array-contains",
            FilterOp::In => "in",
            FilterOp::ArrayContainsAny => "array-contains-any",
        }
    }
}

impl FromStr for FilterOp {
    type Err = DocRefError;

    fn from_str(s: &str) -> DocRefResult<FilterOp> {
        match s {
            "<" => Ok(FilterOp::LessThan),
            "<=" => Ok(FilterOp::LessThanOrEqual),
            "==" => Ok(FilterOp::Equal),
            ">=" => Ok(FilterOp::GreaterThanOrEqual),
            ">" => Ok(FilterOp::GreaterThan),
            "array-contains" => Ok(FilterOp::ArrayContains),
            "in" => Ok(FilterOp::In),
            "array-contains-any" => Ok(FilterOp::ArrayContainsAny),
            _ => Err(DocRefError::new(
                &format!("Unknown filter operator: {}", s),
                ErrorKind::InvalidQuery,
            )),
        }
    }
}

impl Display for FilterOp {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Compares two values when they belong to the same comparable family
/// (numbers, strings, booleans, timestamps). Range operators never match
/// across families; in particular a missing field (null) never satisfies a
/// range filter.
fn compare_comparable(a: &Value, b: &Value) -> Option<Ordering> {
    if a.is_number() && b.is_number() {
        return a.partial_cmp(b);
    }

    match (a, b) {
        (Value::String(x), Value::String(y)) => Some(x.cmp(y)),
        (Value::Bool(x), Value::Bool(y)) => Some(x.cmp(y)),
        (Value::DateTime(x), Value::DateTime(y)) => Some(x.cmp(y)),
        _ => None,
    }
}

/// A single equality/range/membership filter on a document field.
///
/// Filters are AND-composed by the query builder in caller-given order.
#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct FieldFilter {
    field: String,
    op: FilterOp,
    value: Value,
}

impl FieldFilter {
    pub fn new<T: Into<Value>>(field: &str, op: FilterOp, value: T) -> FieldFilter {
        FieldFilter {
            field: field.to_string(),
            op,
            value: value.into(),
        }
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn op(&self) -> FilterOp {
        self.op
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Evaluates this filter against a document. Shared by backends so that
    /// every store applies identical matching semantics.
    pub fn matches(&self, document: &Document) -> bool {
        let field_value = document.get(&self.field);

        match self.op {
            FilterOp::Equal => field_value == self.value,
            FilterOp::LessThan => {
                compare_comparable(&field_value, &self.value) == Some(Ordering::Less)
            }
            FilterOp::LessThanOrEqual => matches!(
                compare_comparable(&field_value, &self.value),
                Some(Ordering::Less) | Some(Ordering::Equal)
            ),
            FilterOp::GreaterThan => {
                compare_comparable(&field_value, &self.value) == Some(Ordering::Greater)
            }
            FilterOp::GreaterThanOrEqual => matches!(
                compare_comparable(&field_value, &self.value),
                Some(Ordering::Greater) | Some(Ordering::Equal)
            ),
            FilterOp::ArrayContains => match field_value.as_array() {
                Some(items) => items.contains(&self.value),
                None => false,
            },
            FilterOp::In => match self.value.as_array() {
                Some(candidates) => candidates.contains(&field_value),
                None => false,
            },
            FilterOp::ArrayContainsAny => match (field_value.as_array(), self.value.as_array()) {
                (Some(items), Some(candidates)) => {
                    items.iter().any(|item| candidates.contains(item))
                }
                _ => false,
            },
        }
    }
}

/// An ordering directive for query results.
#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct OrderBy {
    pub field: String,
    pub order: SortOrder,
}

impl OrderBy {
    pub fn new(field: &str, order: SortOrder) -> OrderBy {
        OrderBy {
            field: field.to_string(),
            order,
        }
    }

    /// Ascending order on the given field.
    pub fn ascending(field: &str) -> OrderBy {
        OrderBy::new(field, SortOrder::Ascending)
    }

    /// Descending order on the given field.
    pub fn descending(field: &str) -> OrderBy {
        OrderBy::new(field, SortOrder::Descending)
    }
}

/// The composed query handed to a backend for execution.
///
/// Filters apply in caller-given order (logically AND-ed), ordering applies
/// before cursors, cursors apply in `start_at` then `start_after` sequence,
/// and the limit truncates last.
#[derive(Debug, Clone, Default, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct QuerySpec {
    pub filters: Vec<FieldFilter>,
    pub order_by: Option<OrderBy>,
    pub start_at: Option<Value>,
    pub start_after: Option<Value>,
    pub limit: Option<u32>,
}

impl QuerySpec {
    /// Returns `true` when the spec carries no constraint at all, in which
    /// case the bare collection reference is the query.
    pub fn is_unconstrained(&self) -> bool {
        self.filters.is_empty()
            && self.order_by.is_none()
            && self.start_at.is_none()
            && self.start_after.is_none()
            && self.limit.is_none()
    }
}

/// A fluent query builder over a collection reference.
///
/// Composes equality/range/membership filters, ordering, pagination cursors
/// and a result limit into a single [QuerySpec], then executes it against
/// the collection's backend.
///
/// ```text
/// let products = collection
///     .query()
///     .where_field("price", FilterOp::GreaterThan, 10)
///     .order_by("price", SortOrder::Ascending)
///     .limit(20)
///     .get()
///     .await?;
/// ```
#[derive(Clone)]
pub struct Query {
    collection: CollectionRef,
    spec: QuerySpec,
}

impl Query {
    pub(crate) fn new(collection: CollectionRef) -> Query {
        Query {
            collection,
            spec: QuerySpec::default(),
        }
    }

    /// Adds a field filter. Filters are AND-ed in the order they are added;
    /// the order is reproducible but does not change the result set.
    pub fn where_field<T: Into<Value>>(mut self, field: &str, op: FilterOp, value: T) -> Query {
        self.spec.filters.push(FieldFilter::new(field, op, value));
        self
    }

    /// Adds an already constructed field filter.
    pub fn filter(mut self, filter: FieldFilter) -> Query {
        self.spec.filters.push(filter);
        self
    }

    /// Orders results by a field. Cursor positions are only well-defined
    /// relative to an ordering.
    pub fn order_by(mut self, field: &str, order: SortOrder) -> Query {
        self.spec.order_by = Some(OrderBy::new(field, order));
        self
    }

    /// Starts results at the given cursor value, inclusive.
    pub fn start_at<T: Into<Value>>(mut self, value: T) -> Query {
        self.spec.start_at = Some(value.into());
        self
    }

    /// Starts results after the given cursor value, exclusive. Applied after
    /// `start_at`, so supplying both yields `start_after` semantics.
    pub fn start_after<T: Into<Value>>(mut self, value: T) -> Query {
        self.spec.start_after = Some(value.into());
        self
    }

    /// Truncates the result set to at most `limit` documents.
    pub fn limit(mut self, limit: u32) -> Query {
        self.spec.limit = Some(limit);
        self
    }

    /// Returns the composed spec.
    pub fn spec(&self) -> &QuerySpec {
        &self.spec
    }

    /// Executes the query and returns the matching document payloads in
    /// result order.
    pub async fn get(self) -> DocRefResult<Vec<Document>> {
        self.collection.fetch(&self.spec).await
    }
}
