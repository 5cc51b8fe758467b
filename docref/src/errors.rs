use backtrace::Backtrace;
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};
use std::result::Result;
use std::sync::Arc;

/// Error kinds for docref operations.
///
/// Each kind describes a specific category of failure. The first four kinds
/// are raised by the access layer itself; the remaining kinds cover the
/// document model and backend propagation.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum ErrorKind {
    /// Malformed or empty path string
    InvalidPath,
    /// Delete or update requested against a path that does not address a document
    DocumentRequired,
    /// Filters supplied against a path that already addresses a document
    InvalidQuery,
    /// Failure surfaced by the storage backend, propagated verbatim
    BackendError,
    /// The operation is not valid in the current context
    InvalidOperation,
    /// The addressed document does not exist
    NotFound,
    /// Internal error (usually indicates a bug)
    InternalError,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::InvalidPath => write!(f, "Invalid path"),
            ErrorKind::DocumentRequired => write!(f, "Document required"),
            ErrorKind::InvalidQuery => write!(f, "Invalid query"),
            ErrorKind::BackendError => write!(f, "Backend error"),
            ErrorKind::InvalidOperation => write!(f, "Invalid operation"),
            ErrorKind::NotFound => write!(f, "Not found"),
            ErrorKind::InternalError => write!(f, "Internal error"),
        }
    }
}

/// Custom docref error type.
///
/// `DocRefError` encapsulates the error message, kind, and optional cause.
/// It supports error chaining and backtraces for debugging.
///
/// # Type alias
///
/// The `DocRefResult<T>` type alias is equivalent to `Result<T, DocRefError>`
/// and is used throughout the crate for operations that can fail.
#[derive(Clone)]
pub struct DocRefError {
    message: String,
    error_kind: ErrorKind,
    cause: Option<Box<DocRefError>>,
    backtrace: Arc<Backtrace>,
}

impl DocRefError {
    /// Creates a new `DocRefError` with the specified message and error kind.
    pub fn new(message: &str, error_kind: ErrorKind) -> Self {
        DocRefError {
            message: message.to_string(),
            error_kind,
            cause: None,
            backtrace: Arc::new(Backtrace::new()),
        }
    }

    /// Creates a new `DocRefError` with a cause error.
    ///
    /// This creates an error chain where the cause error is preserved for
    /// debugging.
    pub fn new_with_cause(message: &str, error_kind: ErrorKind, cause: DocRefError) -> Self {
        DocRefError {
            message: message.to_string(),
            error_kind,
            cause: Some(Box::new(cause)),
            backtrace: Arc::new(Backtrace::new()),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.error_kind
    }

    pub fn cause(&self) -> Option<&DocRefError> {
        self.cause.as_deref()
    }
}

impl Display for DocRefError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Debug for DocRefError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        // print error message with stack trace followed by cause
        match &self.cause {
            Some(cause) => write!(f, "{}\nCaused by: {:?}", self.message, cause),
            None => write!(f, "{}\n{:?}", self.message, self.backtrace),
        }
    }
}

impl Error for DocRefError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match &self.cause {
            Some(cause) => Some(cause.as_ref()),
            None => None,
        }
    }
}

/// A result type alias for docref operations.
///
/// `DocRefResult<T>` is shorthand for `Result<T, DocRefError>`.
pub type DocRefResult<T> = Result<T, DocRefError>;

impl From<String> for DocRefError {
    fn from(msg: String) -> Self {
        DocRefError::new(&msg, ErrorKind::InternalError)
    }
}

impl From<&str> for DocRefError {
    fn from(msg: &str) -> Self {
        DocRefError::new(msg, ErrorKind::InternalError)
    }
}
