mod collection;
mod document;
mod store;

pub use store::InMemoryStore;

pub(crate) use collection::InMemoryCollection;
pub(crate) use document::InMemoryDocument;
pub(crate) use store::MemoryCore;
