use axum::{
    Json,
    extract::State,
};
use uuid::Uuid;

use crate::{
    AppState,
    extract::{ApiJson, ApiPath},
    auth::{Admin, Authenticated},
    comments,
    error::{ApiError, ErrorBody},
    models::{Campsite, Comment, CreateCommentRequest, UpdateCommentRequest},
};

/// list_comments
///
/// [Public Route] The comment thread of a campsite, in posting order.
#[utoipa::path(
    get,
    path = "/campsites/{id}/comments",
    params(("id" = Uuid, Path, description = "Campsite ID")),
    responses(
        (status = 200, description = "Comments", body = [Comment]),
        (status = 404, description = "Campsite not found", body = ErrorBody)
    )
)]
pub async fn list_comments(
    State(state): State<AppState>,
    ApiPath(campsite_id): ApiPath<Uuid>,
) -> Result<Json<Vec<Comment>>, ApiError> {
    Ok(Json(
        comments::list_comments(state.repo.as_ref(), campsite_id).await?,
    ))
}

/// add_comment
///
/// [Authenticated Route] Posts a comment. The author is always the caller,
/// whatever the body says. Responds with the whole campsite.
#[utoipa::path(
    post,
    path = "/campsites/{id}/comments",
    params(("id" = Uuid, Path, description = "Campsite ID")),
    request_body = CreateCommentRequest,
    responses(
        (status = 200, description = "Comment added", body = Campsite),
        (status = 401, description = "Not authenticated", body = ErrorBody),
        (status = 404, description = "Campsite not found", body = ErrorBody)
    )
)]
pub async fn add_comment(
    Authenticated(principal): Authenticated,
    State(state): State<AppState>,
    ApiPath(campsite_id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<CreateCommentRequest>,
) -> Result<Json<Campsite>, ApiError> {
    let campsite =
        comments::add_comment(state.repo.as_ref(), &principal, campsite_id, payload).await?;
    Ok(Json(campsite))
}

/// delete_all_comments
///
/// [Admin Route] Bulk removal of a campsite's comments. Ownership is not
/// consulted on this path.
#[utoipa::path(
    delete,
    path = "/campsites/{id}/comments",
    params(("id" = Uuid, Path, description = "Campsite ID")),
    responses(
        (status = 200, description = "Comments cleared", body = Campsite),
        (status = 403, description = "Not an admin", body = ErrorBody),
        (status = 404, description = "Campsite not found", body = ErrorBody)
    )
)]
pub async fn delete_all_comments(
    Admin(admin): Admin,
    State(state): State<AppState>,
    ApiPath(campsite_id): ApiPath<Uuid>,
) -> Result<Json<Campsite>, ApiError> {
    let campsite = comments::delete_all_comments(state.repo.as_ref(), campsite_id).await?;
    tracing::info!(admin = %admin.id, campsite = %campsite_id, "comments cleared by admin");
    Ok(Json(campsite))
}

/// get_comment
///
/// [Public Route] One comment of a campsite.
#[utoipa::path(
    get,
    path = "/campsites/{id}/comments/{comment_id}",
    params(
        ("id" = Uuid, Path, description = "Campsite ID"),
        ("comment_id" = Uuid, Path, description = "Comment ID")
    ),
    responses(
        (status = 200, description = "Found", body = Comment),
        (status = 404, description = "Campsite or comment not found", body = ErrorBody)
    )
)]
pub async fn get_comment(
    State(state): State<AppState>,
    ApiPath((campsite_id, comment_id)): ApiPath<(Uuid, Uuid)>,
) -> Result<Json<Comment>, ApiError> {
    Ok(Json(
        comments::get_comment(state.repo.as_ref(), campsite_id, comment_id).await?,
    ))
}

/// update_comment
///
/// [Authenticated Route] Edits rating and/or text. Only the author may do
/// this; being an admin does not help.
#[utoipa::path(
    put,
    path = "/campsites/{id}/comments/{comment_id}",
    params(
        ("id" = Uuid, Path, description = "Campsite ID"),
        ("comment_id" = Uuid, Path, description = "Comment ID")
    ),
    request_body = UpdateCommentRequest,
    responses(
        (status = 200, description = "Updated", body = Campsite),
        (status = 403, description = "Not the author", body = ErrorBody),
        (status = 404, description = "Campsite or comment not found", body = ErrorBody)
    )
)]
pub async fn update_comment(
    Authenticated(principal): Authenticated,
    State(state): State<AppState>,
    ApiPath((campsite_id, comment_id)): ApiPath<(Uuid, Uuid)>,
    ApiJson(payload): ApiJson<UpdateCommentRequest>,
) -> Result<Json<Campsite>, ApiError> {
    let campsite = comments::update_comment(
        state.repo.as_ref(),
        &principal,
        campsite_id,
        comment_id,
        payload,
    )
    .await?;
    Ok(Json(campsite))
}

/// delete_comment
///
/// [Authenticated Route] Removes one comment. Author only.
#[utoipa::path(
    delete,
    path = "/campsites/{id}/comments/{comment_id}",
    params(
        ("id" = Uuid, Path, description = "Campsite ID"),
        ("comment_id" = Uuid, Path, description = "Comment ID")
    ),
    responses(
        (status = 200, description = "Deleted", body = Campsite),
        (status = 403, description = "Not the author", body = ErrorBody),
        (status = 404, description = "Campsite or comment not found", body = ErrorBody)
    )
)]
pub async fn delete_comment(
    Authenticated(principal): Authenticated,
    State(state): State<AppState>,
    ApiPath((campsite_id, comment_id)): ApiPath<(Uuid, Uuid)>,
) -> Result<Json<Campsite>, ApiError> {
    let campsite =
        comments::delete_comment(state.repo.as_ref(), &principal, campsite_id, comment_id)
            .await?;
    Ok(Json(campsite))
}
