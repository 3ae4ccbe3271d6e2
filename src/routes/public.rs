use crate::{AppState, handlers};
use axum::{Router, routing::get};

/// Public Router Module
///
/// Read-only endpoints, open to anonymous callers.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // GET /health
        // Liveness probe for load balancers.
        .route("/health", get(|| async { "ok" }))
        // --- Campsites & comment threads ---
        .route("/campsites", get(handlers::campsites::list_campsites))
        .route("/campsites/{id}", get(handlers::campsites::get_campsite))
        .route(
            "/campsites/{id}/comments",
            get(handlers::comments::list_comments),
        )
        .route(
            "/campsites/{id}/comments/{comment_id}",
            get(handlers::comments::get_comment),
        )
        // --- Partners & promotions ---
        .route("/partners", get(handlers::partners::list_partners))
        .route("/partners/{id}", get(handlers::partners::get_partner))
        .route("/promotions", get(handlers::promotions::list_promotions))
        .route("/promotions/{id}", get(handlers::promotions::get_promotion))
}
