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
    models::{CreatePromotionRequest, DeleteSummary, Promotion, UpdatePromotionRequest},
};

/// list_promotions
///
/// [Public Route]
#[utoipa::path(
    get,
    path = "/promotions",
    responses((status = 200, description = "All promotions", body = [Promotion]))
)]
pub async fn list_promotions(
    State(state): State<AppState>,
) -> Result<Json<Vec<Promotion>>, ApiError> {
    Ok(Json(state.repo.list_promotions().await?))
}

/// get_promotion
///
/// [Public Route] 404 for unknown ids.
#[utoipa::path(
    get,
    path = "/promotions/{id}",
    params(("id" = Uuid, Path, description = "Promotion ID")),
    responses(
        (status = 200, description = "Found", body = Promotion),
        (status = 404, description = "Not Found", body = ErrorBody)
    )
)]
pub async fn get_promotion(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<Promotion>, ApiError> {
    state
        .repo
        .get_promotion(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Promotion", id))
}

#[utoipa::path(
    post,
    path = "/promotions",
    request_body = CreatePromotionRequest,
    responses(
        (status = 200, description = "Created", body = Promotion),
        (status = 409, description = "Name already taken", body = ErrorBody)
    )
)]
pub async fn create_promotion(
    Admin(admin): Admin,
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<CreatePromotionRequest>,
) -> Result<Json<Promotion>, ApiError> {
    payload.validate()?;
    let promotion = state.repo.create_promotion(payload).await?;
    tracing::info!(admin = %admin.id, promotion = %promotion.id, "promotion created");
    Ok(Json(promotion))
}

#[utoipa::path(
    put,
    path = "/promotions/{id}",
    params(("id" = Uuid, Path, description = "Promotion ID")),
    request_body = UpdatePromotionRequest,
    responses(
        (status = 200, description = "Updated", body = Promotion),
        (status = 404, description = "Not Found", body = ErrorBody)
    )
)]
pub async fn update_promotion(
    Admin(admin): Admin,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<UpdatePromotionRequest>,
) -> Result<Json<Promotion>, ApiError> {
    payload.validate()?;
    let promotion = state
        .repo
        .update_promotion(id, payload)
        .await?
        .ok_or_else(|| ApiError::not_found("Promotion", id))?;
    tracing::info!(admin = %admin.id, promotion = %id, "promotion updated");
    Ok(Json(promotion))
}

#[utoipa::path(
    delete,
    path = "/promotions/{id}",
    params(("id" = Uuid, Path, description = "Promotion ID")),
    responses(
        (status = 200, description = "Deleted", body = Promotion),
        (status = 404, description = "Not Found", body = ErrorBody)
    )
)]
pub async fn delete_promotion(
    Admin(admin): Admin,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<Promotion>, ApiError> {
    let promotion = state
        .repo
        .delete_promotion(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Promotion", id))?;
    tracing::info!(admin = %admin.id, promotion = %id, "promotion deleted");
    Ok(Json(promotion))
}

#[utoipa::path(
    delete,
    path = "/promotions",
    responses((status = 200, description = "Deleted", body = DeleteSummary))
)]
pub async fn delete_all_promotions(
    Admin(admin): Admin,
    State(state): State<AppState>,
) -> Result<Json<DeleteSummary>, ApiError> {
    let deleted_count = state.repo.delete_all_promotions().await?;
    tracing::warn!(admin = %admin.id, deleted_count, "all promotions deleted");
    Ok(Json(DeleteSummary { deleted_count }))
}
