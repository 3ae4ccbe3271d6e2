use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use uuid::Uuid;

use crate::{
    AppState,
    extract::{ApiJson, ApiPath},
    auth::Authenticated,
    error::{ApiError, ErrorBody},
    favorites::{self, Removal},
    models::{CampsiteRef, Favorite},
};

/// Plain-text body of a single-remove that found nothing to remove.
pub const NOTHING_TO_REMOVE: &str = "There are no favorites to delete from this user";

/// Plain-text body of a whole-record delete when the caller has no record.
pub const NO_FAVORITES: &str = "You do not have any favorites to delete";

/// get_favorites
///
/// [Authenticated Route] The caller's own favorites record. There is no way
/// to read another user's record.
#[utoipa::path(
    get,
    path = "/favorites",
    responses(
        (status = 200, description = "Favorites", body = Favorite),
        (status = 404, description = "No favorites yet", body = ErrorBody)
    )
)]
pub async fn get_favorites(
    Authenticated(principal): Authenticated,
    State(state): State<AppState>,
) -> Result<Json<Favorite>, ApiError> {
    Ok(Json(
        favorites::get_favorites(state.repo.as_ref(), &principal).await?,
    ))
}

/// add_favorites
///
/// [Authenticated Route] Bulk add. The body is a list of campsite ids or
/// `{"_id": ...}` documents; duplicates collapse.
#[utoipa::path(
    post,
    path = "/favorites",
    request_body = [CampsiteRef],
    responses(
        (status = 200, description = "Favorites", body = Favorite),
        (status = 404, description = "Unknown campsite", body = ErrorBody)
    )
)]
pub async fn add_favorites(
    Authenticated(principal): Authenticated,
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<Vec<CampsiteRef>>,
) -> Result<Json<Favorite>, ApiError> {
    Ok(Json(
        favorites::add_favorites(state.repo.as_ref(), &principal, payload).await?,
    ))
}

/// delete_favorites
///
/// [Authenticated Route] Drops the caller's whole record. Having none is not
/// an error.
#[utoipa::path(
    delete,
    path = "/favorites",
    responses(
        (status = 200, description = "Deleted record, or a plain-text note when there was none", body = Favorite)
    )
)]
pub async fn delete_favorites(
    Authenticated(principal): Authenticated,
    State(state): State<AppState>,
) -> Result<Response, ApiError> {
    let response = match favorites::delete_favorites(state.repo.as_ref(), &principal).await? {
        Some(favorite) => Json(favorite).into_response(),
        None => (StatusCode::OK, NO_FAVORITES).into_response(),
    };
    Ok(response)
}

/// add_favorite
///
/// [Authenticated Route] Idempotent single add: re-adding returns the record
/// unchanged.
#[utoipa::path(
    post,
    path = "/favorites/{id}",
    params(("id" = Uuid, Path, description = "Campsite ID")),
    responses(
        (status = 200, description = "Favorites", body = Favorite),
        (status = 404, description = "Unknown campsite", body = ErrorBody)
    )
)]
pub async fn add_favorite(
    Authenticated(principal): Authenticated,
    State(state): State<AppState>,
    ApiPath(campsite_id): ApiPath<Uuid>,
) -> Result<Json<Favorite>, ApiError> {
    Ok(Json(
        favorites::add_favorite(state.repo.as_ref(), &principal, campsite_id).await?,
    ))
}

/// remove_favorite
///
/// [Authenticated Route] Removes one campsite. When it was not there the
/// answer is still 200: the unchanged record, or a plain-text note if the
/// caller has no record at all.
#[utoipa::path(
    delete,
    path = "/favorites/{id}",
    params(("id" = Uuid, Path, description = "Campsite ID")),
    responses(
        (status = 200, description = "Updated or unchanged favorites", body = Favorite)
    )
)]
pub async fn remove_favorite(
    Authenticated(principal): Authenticated,
    State(state): State<AppState>,
    ApiPath(campsite_id): ApiPath<Uuid>,
) -> Result<Response, ApiError> {
    let removal = favorites::remove_favorite(state.repo.as_ref(), &principal, campsite_id).await?;
    let response = match removal {
        Removal::Removed(favorite) | Removal::NothingToRemove(Some(favorite)) => {
            Json(favorite).into_response()
        }
        Removal::NothingToRemove(None) => (StatusCode::OK, NOTHING_TO_REMOVE).into_response(),
    };
    Ok(response)
}
