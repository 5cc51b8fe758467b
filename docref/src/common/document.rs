use crate::common::Value;
use crate::errors::{DocRefError, DocRefResult, ErrorKind};
use indexmap::IndexMap;
use std::fmt::{Debug, Display, Formatter};

/// Represents a document: an ordered set of named fields.
///
/// A document is composed of key-value pairs. The key is always a [String]
/// and the value is a [Value]. Field order is insertion order, which is also
/// the order preserved by the built-in memory backend for unordered reads.
///
/// Documents are request-scoped value objects. They carry no identity of
/// their own; the id of a stored document lives in whatever field the
/// caller's id policy selected (by default `id`).
#[derive(Clone, PartialEq, Eq, Default, serde::Deserialize, serde::Serialize)]
pub struct Document {
    data: IndexMap<String, Value>,
}

impl Document {
    /// Creates a new empty document.
    pub fn new() -> Self {
        Document {
            data: IndexMap::new(),
        }
    }

    /// Checks if the document is empty.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the number of fields in the document.
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// Associates the specified [Value] with the specified key in this
    /// document. If the key already exists, its value is replaced.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is empty.
    pub fn put<T: Into<Value>>(&mut self, key: &str, value: T) -> DocRefResult<()> {
        if key.is_empty() {
            log::error!("Document does not support empty key");
            return Err(DocRefError::new(
                "Document does not support empty key",
                ErrorKind::InvalidOperation,
            ));
        }

        self.data.insert(key.to_string(), value.into());
        Ok(())
    }

    /// Returns the [Value] associated with the specified key, or
    /// [Value::Null] if this document contains no mapping for the key.
    pub fn get(&self, key: &str) -> Value {
        self.data.get(key).cloned().unwrap_or(Value::Null)
    }

    /// Checks if the document contains the specified key.
    pub fn contains(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    /// Checks if the document has a non-null value for the specified key.
    pub fn has_value(&self, key: &str) -> bool {
        matches!(self.data.get(key), Some(value) if !value.is_null())
    }

    /// Removes the mapping for the specified key, returning the previous
    /// value if one was present.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.data.shift_remove(key)
    }

    /// Returns an iterator over the fields in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.data.iter()
    }

    /// Returns the field names in insertion order.
    pub fn field_names(&self) -> Vec<&str> {
        self.data.keys().map(String::as_str).collect()
    }

    /// Overlays the fields of `other` onto this document. Fields present in
    /// `other` replace the existing values; fields absent from `other` are
    /// left untouched. This is the field-wise semantics of merge sets and
    /// partial updates.
    pub fn merge_from(&mut self, other: &Document) {
        for (key, value) in other.iter() {
            self.data.insert(key.clone(), value.clone());
        }
    }
}

impl Debug for Document {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self.data.iter()).finish()
    }
}

impl Display for Document {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{")?;
        for (i, (key, value)) in self.data.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", key, value)?;
        }
        write!(f, "}}")
    }
}

/// Strips surrounding double quotes produced by `stringify!` on string
/// literal keys in the [doc!] macro.
pub fn normalize(key: &str) -> String {
    key.trim_matches('"').to_string()
}

/// A macro to create a [Document] from key-value pairs.
///
/// Keys can be bare identifiers or string literals; values can be literals,
/// expressions in parentheses, nested documents, or arrays.
///
/// # Examples
///
/// ```rust
/// use docref::doc;
///
/// let empty = doc! {};
///
/// let product = doc! {
///     name: "Lamp",
///     price: 10,
///     tags: ["home", "light"],
/// };
/// ```
#[macro_export]
macro_rules! doc {
    () => {
        $crate::common::Document::new()
    };

    ($($key:tt : $value:tt),* $(,)?) => {
        {
            #[allow(unused_imports)]
            use $crate::doc_value;

            let mut doc = $crate::common::Document::new();
            $(
                doc.put(&$crate::common::normalize(stringify!($key)), $crate::doc_value!($value))
                    .expect("Failed to put value in document");
            )*
            doc
        }
    };
}

/// Helper macro to convert values for the [doc!] macro.
/// Handles nested documents, arrays, and expressions.
#[macro_export]
macro_rules! doc_value {
    // match a nested document
    ({ $($key:tt : $value:tt),* $(,)? }) => {
        $crate::common::Value::Document($crate::doc!{ $($key : $value),* })
    };

    // match an array of values
    ([ $($value:tt),* $(,)? ]) => {
        $crate::common::Value::Array(vec![$($crate::doc_value!($value)),*])
    };

    // match an expression (variable, function call, literal, etc.)
    ($value:expr) => {
        $crate::common::Value::from($value)
    };
}
