//! # docref - Hierarchical-Path Document-Store Access Layer
//!
//! docref maps slash-delimited logical paths (e.g. `sessions/abc/cart`) to
//! nested collection/document references in a hierarchical document store,
//! then performs either a write (create, merge, update, delete) or a
//! filtered, ordered, paginated read against the resolved reference.
//!
//! ## Key Pieces
//!
//! - **Path resolver** ([`path`]): turns a path string into the deepest
//!   (collection, document) reference pair; segment count parity decides
//!   whether the path addresses a collection or a document
//! - **Write executor**: id and timestamp injection, then exactly one of
//!   delete, partial update, or full/merge set, in strict priority order
//! - **Query builder + read executor** ([`query`]): AND-composed field
//!   filters, ordering, inclusive/exclusive pagination cursors, a result
//!   limit
//! - **Store provider layer** ([`store`]): the backend contract behind
//!   cheap cloneable reference handles, with a built-in in-memory backend
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use docref::{doc, IdPolicy, PathStore, ReadOptions, WriteOptions};
//!
//! # async fn example() -> docref::errors::DocRefResult<()> {
//! let store = PathStore::builder().open()?;
//!
//! // write a product; the addressed id is injected into the value
//! store
//!     .add_data(
//!         WriteOptions::new("products/p1", doc! { name: "Lamp", price: 10 }),
//!         IdPolicy::default(),
//!     )
//!     .await?;
//!
//! // point read
//! let records = store.get_data(ReadOptions::new("products/p1")).await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Design
//!
//! The backend connection is an explicitly constructed, injected dependency
//! (no process-wide globals), so tests substitute an in-memory backend
//! without touching shared state. Precondition violations are raised before
//! any backend call; backend failures propagate unchanged with no retry or
//! translation layer.
//!
//! ## Module Organization
//!
//! - [`common`] - Value and document model, sort order, constants
//! - [`errors`] - Error types and result definitions
//! - [`options`] - Write/read options, id policy, write action
//! - [`path`] - Path parsing and reference resolution
//! - [`query`] - Filters, ordering, cursors, and the query builder
//! - [`store`] - Backend provider contract and the in-memory backend
//! - [`path_store`] - The caller-facing access layer
//! - [`path_store_builder`] - Store construction and backend injection

pub mod common;
pub mod errors;
pub mod options;
pub mod path;
pub mod path_store;
pub mod path_store_builder;
pub mod query;
pub mod store;

mod operation;

pub use common::{Document, SortOrder, Value};
pub use options::{IdPolicy, ReadOptions, WriteAction, WriteOptions};
pub use path_store::PathStore;
pub use path_store_builder::PathStoreBuilder;
pub use query::{FieldFilter, FilterOp, OrderBy};
