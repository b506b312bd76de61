use crate::{
    Result,
    storage::BookmarkStore,
    types::{Bookmark, BookmarkPatch, NewBookmark},
};

/// Domain operations on bookmarks.
///
/// Built per request around the shared store; nothing is cached between
/// calls, every operation goes to the store.
pub struct BookmarkService<'a> {
    store: &'a dyn BookmarkStore,
}

impl<'a> BookmarkService<'a> {
    pub fn new(store: &'a dyn BookmarkStore) -> Self {
        Self { store }
    }

    pub async fn list_all(&self) -> Result<Vec<Bookmark>> {
        self.store.list_all().await
    }

    pub async fn insert(&self, bookmark: NewBookmark) -> Result<Bookmark> {
        self.store.insert(bookmark).await
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Option<Bookmark>> {
        self.store.get_by_id(id).await
    }

    pub async fn update(&self, id: i64, patch: BookmarkPatch) -> Result<u64> {
        self.store.update(id, patch).await
    }

    pub async fn remove(&self, id: i64) -> Result<()> {
        self.store.remove(id).await
    }
}
