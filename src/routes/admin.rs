use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{delete, get, post, put},
};

/// Admin Router Module
///
/// Catalogue management for campsites, partners and promotions, and the
/// bulk comment purge. Handlers take the `Admin` extractor: 401 for anonymous
/// callers, 403 for authenticated non-admins.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        // --- Campsites ---
        .route(
            "/campsites",
            post(handlers::campsites::create_campsite)
                .delete(handlers::campsites::delete_all_campsites),
        )
        .route(
            "/campsites/{id}",
            put(handlers::campsites::update_campsite).delete(handlers::campsites::delete_campsite),
        )
        // DELETE /campsites/{id}/comments
        // Bulk purge; never consults comment ownership.
        .route(
            "/campsites/{id}/comments",
            delete(handlers::comments::delete_all_comments),
        )
        // --- Partners ---
        .route(
            "/partners",
            post(handlers::partners::create_partner).delete(handlers::partners::delete_all_partners),
        )
        .route(
            "/partners/{id}",
            put(handlers::partners::update_partner).delete(handlers::partners::delete_partner),
        )
        // --- Promotions ---
        .route(
            "/promotions",
            post(handlers::promotions::create_promotion)
                .delete(handlers::promotions::delete_all_promotions),
        )
        .route(
            "/promotions/{id}",
            put(handlers::promotions::update_promotion)
                .delete(handlers::promotions::delete_promotion),
        )
        .merge(unsupported_routes())
}

/// Verbs that make no sense for a path shape (PUT on a collection root, POST
/// on a single document). Answered with a plain-text 403.
fn unsupported_routes() -> Router<AppState> {
    Router::new()
        .route("/campsites", put(handlers::unsupported))
        .route("/campsites/{id}", post(handlers::unsupported))
        .route("/campsites/{id}/comments", put(handlers::unsupported))
        .route(
            "/campsites/{id}/comments/{comment_id}",
            post(handlers::unsupported),
        )
        .route("/partners", put(handlers::unsupported))
        .route("/partners/{id}", post(handlers::unsupported))
        .route("/promotions", put(handlers::unsupported))
        .route("/promotions/{id}", post(handlers::unsupported))
        .route("/favorites", put(handlers::unsupported))
        .route(
            "/favorites/{id}",
            get(handlers::unsupported).put(handlers::unsupported),
        )
}
