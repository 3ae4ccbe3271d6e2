use axum::{
    Json,
    extract::State,
};
use uuid::Uuid;

use crate::{
    AppState,
    extract::{ApiJson, ApiPath},
    auth::Admin,
    error::{ApiError, ErrorBody},
    models::{Campsite, CreateCampsiteRequest, DeleteSummary, UpdateCampsiteRequest},
};

/// list_campsites
///
/// [Public Route] Lists every campsite, comments included.
#[utoipa::path(
    get,
    path = "/campsites",
    responses((status = 200, description = "All campsites", body = [Campsite]))
)]
pub async fn list_campsites(
    State(state): State<AppState>,
) -> Result<Json<Vec<Campsite>>, ApiError> {
    Ok(Json(state.repo.list_campsites().await?))
}

/// get_campsite
///
/// [Public Route] A single campsite. Unknown ids are a 404, never a null body.
#[utoipa::path(
    get,
    path = "/campsites/{id}",
    params(("id" = Uuid, Path, description = "Campsite ID")),
    responses(
        (status = 200, description = "Found", body = Campsite),
        (status = 404, description = "Not Found", body = ErrorBody)
    )
)]
pub async fn get_campsite(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<Campsite>, ApiError> {
    state
        .repo
        .get_campsite(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Campsite", id))
}

/// create_campsite
///
/// [Admin Route] Creates a campsite with an empty comment thread.
#[utoipa::path(
    post,
    path = "/campsites",
    request_body = CreateCampsiteRequest,
    responses(
        (status = 200, description = "Created", body = Campsite),
        (status = 403, description = "Not an admin", body = ErrorBody),
        (status = 409, description = "Name already taken", body = ErrorBody)
    )
)]
pub async fn create_campsite(
    Admin(admin): Admin,
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<CreateCampsiteRequest>,
) -> Result<Json<Campsite>, ApiError> {
    payload.validate()?;
    let campsite = state.repo.create_campsite(payload).await?;
    tracing::info!(admin = %admin.id, campsite = %campsite.id, "campsite created");
    Ok(Json(campsite))
}

/// update_campsite
///
/// [Admin Route] Partial update; fields left out of the body are unchanged.
#[utoipa::path(
    put,
    path = "/campsites/{id}",
    params(("id" = Uuid, Path, description = "Campsite ID")),
    request_body = UpdateCampsiteRequest,
    responses(
        (status = 200, description = "Updated", body = Campsite),
        (status = 404, description = "Not Found", body = ErrorBody)
    )
)]
pub async fn update_campsite(
    Admin(admin): Admin,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<UpdateCampsiteRequest>,
) -> Result<Json<Campsite>, ApiError> {
    payload.validate()?;
    let campsite = state
        .repo
        .update_campsite(id, payload)
        .await?
        .ok_or_else(|| ApiError::not_found("Campsite", id))?;
    tracing::info!(admin = %admin.id, campsite = %id, "campsite updated");
    Ok(Json(campsite))
}

/// delete_campsite
///
/// [Admin Route] Deletes one campsite and, with it, its embedded comments.
/// Responds with the deleted document.
#[utoipa::path(
    delete,
    path = "/campsites/{id}",
    params(("id" = Uuid, Path, description = "Campsite ID")),
    responses(
        (status = 200, description = "Deleted", body = Campsite),
        (status = 404, description = "Not Found", body = ErrorBody)
    )
)]
pub async fn delete_campsite(
    Admin(admin): Admin,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<Campsite>, ApiError> {
    let campsite = state
        .repo
        .delete_campsite(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Campsite", id))?;
    tracing::info!(admin = %admin.id, campsite = %id, "campsite deleted");
    Ok(Json(campsite))
}

/// delete_all_campsites
///
/// [Admin Route] Empties the campsites collection.
#[utoipa::path(
    delete,
    path = "/campsites",
    responses((status = 200, description = "Deleted", body = DeleteSummary))
)]
pub async fn delete_all_campsites(
    Admin(admin): Admin,
    State(state): State<AppState>,
) -> Result<Json<DeleteSummary>, ApiError> {
    let deleted_count = state.repo.delete_all_campsites().await?;
    tracing::warn!(admin = %admin.id, deleted_count, "all campsites deleted");
    Ok(Json(DeleteSummary { deleted_count }))
}
