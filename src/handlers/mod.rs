mod bookmarks;

pub use bookmarks::{
    create_bookmark, delete_bookmark, get_bookmark, list_bookmarks, update_bookmark,
};

use crate::{
    auth::{AuthConfig, auth_middleware},
    config::Environment,
    error::handle_server_errors,
    sanitize::Sanitizer,
    storage::BookmarkStore,
};
use axum::{Router, middleware, routing::get};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Base path the bookmark routes are mounted under
pub const BOOKMARKS_PATH: &str = "/api/bookmarks";

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn BookmarkStore>,
    pub sanitizer: Arc<dyn Sanitizer>,
    pub auth: Arc<AuthConfig>,
    pub environment: Environment,
}

/// Build the full application router.
///
/// Requests pass through tracing, then the bearer-token check, then the
/// server-fault handler before reaching a bookmark route.
pub fn create_router(state: AppState) -> Router {
    let bookmarks = Router::new()
        .route("/", get(list_bookmarks).post(create_bookmark))
        .route(
            "/:id",
            get(get_bookmark)
                .patch(update_bookmark)
                .delete(delete_bookmark),
        );

    Router::new()
        .nest(BOOKMARKS_PATH, bookmarks)
        .layer(middleware::from_fn_with_state(
            state.environment,
            handle_server_errors,
        ))
        .layer(middleware::from_fn_with_state(
            state.auth.clone(),
            auth_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
