//! Request checks that run before the store is written.

use crate::{
    Error, Result,
    service::BookmarkService,
    types::{Bookmark, BookmarkPatch, CreateBookmarkBody, NewBookmark, UpdateBookmarkBody},
};

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Checks the required fields of a new bookmark, in the order
/// `title`, `url`, `description`, and reports the first one missing.
pub fn validate_new(body: CreateBookmarkBody) -> Result<NewBookmark> {
    let title = present(body.title).ok_or(Error::MissingField("title"))?;
    let url = present(body.url).ok_or(Error::MissingField("url"))?;
    let description = present(body.description).ok_or(Error::MissingField("description"))?;

    Ok(NewBookmark {
        title,
        url,
        description,
        rating: body.rating,
    })
}

/// Reduces an update body to the fields that will be written.
///
/// Empty strings and a zero rating do not count towards the one required
/// field. Empty strings are never written.
pub fn validate_patch(body: UpdateBookmarkBody) -> Result<BookmarkPatch> {
    let has_value = body.title.as_deref().is_some_and(|v| !v.is_empty())
        || body.url.as_deref().is_some_and(|v| !v.is_empty())
        || body.description.as_deref().is_some_and(|v| !v.is_empty())
        || body.rating.as_ref().is_some_and(|r| r.as_f64() != Some(0.0));

    if !has_value {
        return Err(Error::EmptyUpdate);
    }

    Ok(BookmarkPatch {
        title: present(body.title),
        url: present(body.url),
        description: present(body.description),
        rating: body.rating,
    })
}

/// Loads the bookmark a single-record route refers to.
///
/// A path id that is not an integer cannot name a stored record.
pub async fn require_bookmark(service: &BookmarkService<'_>, raw_id: &str) -> Result<Bookmark> {
    let id: i64 = raw_id.parse().map_err(|_| Error::BookmarkNotFound)?;

    service
        .get_by_id(id)
        .await?
        .ok_or(Error::BookmarkNotFound)
}
