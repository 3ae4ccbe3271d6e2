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
    models::{CreatePartnerRequest, DeleteSummary, Partner, UpdatePartnerRequest},
};

#[utoipa::path(
    get,
    path = "/partners",
    responses((status = 200, description = "All partners", body = [Partner]))
)]
pub async fn list_partners(State(state): State<AppState>) -> Result<Json<Vec<Partner>>, ApiError> {
    Ok(Json(state.repo.list_partners().await?))
}

#[utoipa::path(
    get,
    path = "/partners/{id}",
    params(("id" = Uuid, Path, description = "Partner ID")),
    responses(
        (status = 200, description = "Found", body = Partner),
        (status = 404, description = "Not Found", body = ErrorBody)
    )
)]
pub async fn get_partner(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<Partner>, ApiError> {
    state
        .repo
        .get_partner(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Partner", id))
}

/// create_partner
///
/// [Admin Route]
#[utoipa::path(
    post,
    path = "/partners",
    request_body = CreatePartnerRequest,
    responses(
        (status = 200, description = "Created", body = Partner),
        (status = 409, description = "Name already taken", body = ErrorBody)
    )
)]
pub async fn create_partner(
    Admin(admin): Admin,
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<CreatePartnerRequest>,
) -> Result<Json<Partner>, ApiError> {
    payload.validate()?;
    let partner = state.repo.create_partner(payload).await?;
    tracing::info!(admin = %admin.id, partner = %partner.id, "partner created");
    Ok(Json(partner))
}

/// update_partner
///
/// [Admin Route] Partial update.
#[utoipa::path(
    put,
    path = "/partners/{id}",
    params(("id" = Uuid, Path, description = "Partner ID")),
    request_body = UpdatePartnerRequest,
    responses(
        (status = 200, description = "Updated", body = Partner),
        (status = 404, description = "Not Found", body = ErrorBody)
    )
)]
pub async fn update_partner(
    Admin(admin): Admin,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<UpdatePartnerRequest>,
) -> Result<Json<Partner>, ApiError> {
    payload.validate()?;
    let partner = state
        .repo
        .update_partner(id, payload)
        .await?
        .ok_or_else(|| ApiError::not_found("Partner", id))?;
    tracing::info!(admin = %admin.id, partner = %id, "partner updated");
    Ok(Json(partner))
}

#[utoipa::path(
    delete,
    path = "/partners/{id}",
    params(("id" = Uuid, Path, description = "Partner ID")),
    responses(
        (status = 200, description = "Deleted", body = Partner),
        (status = 404, description = "Not Found", body = ErrorBody)
    )
)]
pub async fn delete_partner(
    Admin(admin): Admin,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<Partner>, ApiError> {
    let partner = state
        .repo
        .delete_partner(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Partner", id))?;
    tracing::info!(admin = %admin.id, partner = %id, "partner deleted");
    Ok(Json(partner))
}

#[utoipa::path(
    delete,
    path = "/partners",
    responses((status = 200, description = "Deleted", body = DeleteSummary))
)]
pub async fn delete_all_partners(
    Admin(admin): Admin,
    State(state): State<AppState>,
) -> Result<Json<DeleteSummary>, ApiError> {
    let deleted_count = state.repo.delete_all_partners().await?;
    tracing::warn!(admin = %admin.id, deleted_count, "all partners deleted");
    Ok(Json(DeleteSummary { deleted_count }))
}
