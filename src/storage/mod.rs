//! Durable storage for bookmark records.
//!
//! This module provides a trait-based abstraction over the table holding
//! bookmarks, so handlers never depend on a particular database engine.
//!
//! # Implementations
//!
//! - [`LibsqlStore`] - local libsql (SQLite-compatible) database
//!
//! # Example
//!
//! ```no_run
//! use bookmarkr::storage::{BookmarkStore, LibsqlStore};
//!
//! # async fn run() -> bookmarkr::Result<()> {
//! let store = LibsqlStore::open("bookmarks.db").await?;
//! let all = store.list_all().await?;
//! # Ok(())
//! # }
//! ```

mod database;

pub use database::LibsqlStore;

use crate::{
    Result,
    types::{Bookmark, BookmarkPatch, NewBookmark},
};
use async_trait::async_trait;

/// Storage backend trait for bookmark records
#[async_trait]
pub trait BookmarkStore: Send + Sync {
    /// All records, in insertion order
    async fn list_all(&self) -> Result<Vec<Bookmark>>;

    /// Insert a record; the store assigns its id
    async fn insert(&self, bookmark: NewBookmark) -> Result<Bookmark>;

    /// Fetch a record, `None` if no record has this id
    async fn get_by_id(&self, id: i64) -> Result<Option<Bookmark>>;

    /// Overwrite the fields set in `patch`, returning the number of rows affected
    async fn update(&self, id: i64, patch: BookmarkPatch) -> Result<u64>;

    /// Permanently delete a record
    async fn remove(&self, id: i64) -> Result<()>;
}
