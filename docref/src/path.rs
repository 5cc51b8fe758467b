use crate::common::PATH_SEPARATOR;
use crate::errors::{DocRefError, DocRefResult, ErrorKind};
use crate::store::{CollectionRef, DocumentRef, DocumentStore};
use smallvec::SmallVec;
use std::fmt::{Debug, Display, Formatter};

type SegmentVec = SmallVec<[String; 4]>;

/// A parsed, validated slash-delimited logical path.
///
/// A path is an ordered sequence of non-empty segments alternating between
/// collection names and document ids: `collection/doc_id/collection/doc_id/…`.
/// The segment count parity determines the addressed target: an odd count
/// terminates at a collection, an even count at a document.
///
/// ```text
/// "products"            -> the products collection
/// "products/p1"         -> document p1 in products
/// "sessions/42/cart"    -> the cart collection under document 42
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct DataPath {
    segments: SegmentVec,
}

impl DataPath {
    /// Parses a slash-delimited path string.
    ///
    /// # Errors
    ///
    /// Fails with [ErrorKind::InvalidPath] if the path is empty or contains
    /// an empty segment.
    pub fn parse(path: &str) -> DocRefResult<DataPath> {
        if path.is_empty() {
            log::error!("Path cannot be empty");
            return Err(DocRefError::new("Path cannot be empty", ErrorKind::InvalidPath));
        }

        let segments: SegmentVec = path.split(PATH_SEPARATOR).map(String::from).collect();
        if segments.iter().any(String::is_empty) {
            log::error!("Path contains an empty segment: {}", path);
            return Err(DocRefError::new(
                &format!("Path contains an empty segment: {}", path),
                ErrorKind::InvalidPath,
            ));
        }

        Ok(DataPath { segments })
    }

    /// Returns the path segments in order.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Returns the number of segments, always at least one.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Returns `true` if the path terminates at a document (even segment
    /// count), `false` if it terminates at a collection.
    pub fn addresses_document(&self) -> bool {
        self.segments.len() % 2 == 0
    }

    /// Returns `true` if the path terminates at a collection.
    pub fn addresses_collection(&self) -> bool {
        !self.addresses_document()
    }

    /// Resolves this path against a store into the deepest collection and
    /// document references reached.
    ///
    /// The walk folds over the segments: the first segment opens a root
    /// collection; each following pair selects a document by id and, when a
    /// further segment exists, descends into that document's sub-collection.
    /// References are constructed lazily, no existence check is performed.
    pub fn resolve(&self, store: &DocumentStore) -> RefPair {
        let root = RefPair {
            collection: store.root_collection(&self.segments[0]),
            document: None,
        };

        self.segments[1..].chunks(2).fold(root, |pair, chunk| {
            let document = pair.collection.doc(&chunk[0]);
            match chunk.get(1) {
                Some(name) => RefPair {
                    collection: document.subcollection(name),
                    document: Some(document),
                },
                None => RefPair {
                    collection: pair.collection,
                    document: Some(document),
                },
            }
        })
    }
}

impl Display for DataPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.segments.join("/"))
    }
}

impl Debug for DataPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "DataPath({})", self)
    }
}

/// The deepest collection and document references reached by a path walk.
///
/// The document reference is `None` until at least two segments have been
/// consumed. Both references may be simultaneously valid: writes need the
/// collection (to auto-generate an id) while point reads need the document.
#[derive(Clone)]
pub struct RefPair {
    collection: CollectionRef,
    document: Option<DocumentRef>,
}

impl RefPair {
    /// The deepest collection reference reached.
    pub fn collection(&self) -> &CollectionRef {
        &self.collection
    }

    /// The deepest document reference reached, if the path consumed at least
    /// two segments.
    pub fn document(&self) -> Option<&DocumentRef> {
        self.document.as_ref()
    }
}
