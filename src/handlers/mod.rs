//! HTTP handlers, one module per resource.
//!
//! Guards are expressed as extractors (`Authenticated`, `Admin`) so they run
//! before the body is read and before any repository call.

use axum::{
    Json,
    extract::OriginalUri,
    http::Method,
};

use crate::{
    auth::{Admin, Authenticated},
    error::ApiError,
    models::PrincipalProfile,
};

pub mod campsites;
pub mod comments;
pub mod favorites;
pub mod partners;
pub mod promotions;

/// unsupported
///
/// Fallback for verbs a path shape does not support (e.g. PUT on a collection
/// root). Admin-gated first, then answers 403 in plain text.
pub async fn unsupported(
    _admin: Admin,
    method: Method,
    OriginalUri(uri): OriginalUri,
) -> ApiError {
    ApiError::UnsupportedOperation(format!(
        "{method} operation not supported on {}",
        uri.path()
    ))
}

/// get_me
///
/// [Authenticated Route] Reports the principal resolved for this request.
#[utoipa::path(
    get,
    path = "/me",
    responses(
        (status = 200, description = "Resolved principal", body = PrincipalProfile),
        (status = 401, description = "Not authenticated", body = crate::error::ErrorBody)
    )
)]
pub async fn get_me(Authenticated(principal): Authenticated) -> Json<PrincipalProfile> {
    Json(PrincipalProfile {
        id: principal.id,
        admin: principal.admin,
    })
}
