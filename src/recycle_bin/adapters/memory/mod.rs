//! In-memory recycle-bin storage.

mod repository;

pub use repository::InMemoryRecycleBin;
