use axum::{
    Json,
    extract::{OriginalUri, Path, State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::IntoResponse,
};

use super::AppState;
use crate::{
    Error, Result,
    service::BookmarkService,
    types::{Bookmark, CreateBookmarkBody, UpdateBookmarkBody},
    validation::{require_bookmark, validate_new, validate_patch},
};

fn json_body<T>(body: std::result::Result<Json<T>, JsonRejection>) -> Result<T> {
    body.map(|Json(value)| value)
        .map_err(|rejection| Error::InvalidInput(rejection.body_text()))
}

pub async fn list_bookmarks(State(state): State<AppState>) -> Result<Json<Vec<Bookmark>>> {
    let service = BookmarkService::new(state.store.as_ref());
    let bookmarks = service.list_all().await?;

    Ok(Json(
        bookmarks
            .into_iter()
            .map(|b| b.sanitized(state.sanitizer.as_ref()))
            .collect(),
    ))
}

pub async fn create_bookmark(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    body: std::result::Result<Json<CreateBookmarkBody>, JsonRejection>,
) -> Result<impl IntoResponse> {
    let bookmark = validate_new(json_body(body)?).inspect_err(|e| {
        tracing::debug!(error = %e, "rejected bookmark creation");
    })?;

    let service = BookmarkService::new(state.store.as_ref());
    let created = service.insert(bookmark).await?;
    tracing::info!(id = created.id, "bookmark created");

    let location = format!("{}/{}", uri.path().trim_end_matches('/'), created.id);

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(created.sanitized(state.sanitizer.as_ref())),
    ))
}

pub async fn get_bookmark(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Bookmark>> {
    let service = BookmarkService::new(state.store.as_ref());
    let bookmark = require_bookmark(&service, &id).await?;

    Ok(Json(bookmark.sanitized(state.sanitizer.as_ref())))
}

pub async fn update_bookmark(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: std::result::Result<Json<UpdateBookmarkBody>, JsonRejection>,
) -> Result<StatusCode> {
    let service = BookmarkService::new(state.store.as_ref());
    // Existence is checked before the body is looked at.
    let bookmark = require_bookmark(&service, &id).await?;

    let patch = validate_patch(json_body(body)?)?;
    let affected = service.update(bookmark.id, patch).await?;
    tracing::info!(id = bookmark.id, affected, "bookmark updated");

    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete_bookmark(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    let service = BookmarkService::new(state.store.as_ref());
    let bookmark = require_bookmark(&service, &id).await?;

    service.remove(bookmark.id).await?;
    tracing::info!(id = bookmark.id, "bookmark deleted");

    Ok(StatusCode::NO_CONTENT)
}
