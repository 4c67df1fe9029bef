//! File-backed storage backend for docbind.
//!
//! This crate provides [`FileStore`], which keeps one JSON document per file
//! under `<root>/<collection>/<name>.json`. Writes go through a temporary
//! file and a rename so that readers never observe a partially-written
//! document.

mod store;

pub use store::FileStore;
