use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, post, put},
};

/// Authenticated Router Module
///
/// Every handler here takes an `Authenticated` extractor. Comment edits and
/// deletes additionally pass through the ownership policy; favorites are
/// always scoped to the caller.
pub fn authenticated_routes() -> Router<AppState> {
    Router::<AppState>::new()
        // GET /me
        .route("/me", get(handlers::get_me))
        // --- Commenting ---
        // POST /campsites/{id}/comments
        // The author field is stamped from the principal, never from the body.
        .route(
            "/campsites/{id}/comments",
            post(handlers::comments::add_comment),
        )
        // PUT/DELETE /campsites/{id}/comments/{comment_id}
        // Owner-only. Admins have no bypass on a single comment.
        .route(
            "/campsites/{id}/comments/{comment_id}",
            put(handlers::comments::update_comment)
                .delete(handlers::comments::delete_comment),
        )
        // --- Favorites ---
        // GET/POST/DELETE /favorites
        .route(
            "/favorites",
            get(handlers::favorites::get_favorites)
                .post(handlers::favorites::add_favorites)
                .delete(handlers::favorites::delete_favorites),
        )
        // POST/DELETE /favorites/{id}
        // Idempotent add; remove answers 200 even when there is nothing to remove.
        .route(
            "/favorites/{id}",
            post(handlers::favorites::add_favorite).delete(handlers::favorites::remove_favorite),
        )
}
