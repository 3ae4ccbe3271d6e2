//! Comment threads embedded in campsites.
//!
//! A campsite's `comments` vector is treated as an arena addressed by comment
//! id. Edits replace the entry at its index and removals shift the tail left,
//! so the relative order of the other comments never changes. Every mutation
//! is followed by one write of the whole sequence back to the parent.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
    auth::Principal,
    error::ApiError,
    models::{Campsite, Comment, CreateCommentRequest, UpdateCommentRequest},
    policy::may_mutate,
    repository::Repository,
};

/// Index of the comment with `id`, if present.
pub fn position(comments: &[Comment], id: Uuid) -> Option<usize> {
    comments.iter().position(|comment| comment.id == id)
}

/// Builds a new comment authored by `principal`.
pub fn compose(principal: &Principal, req: CreateCommentRequest, now: DateTime<Utc>) -> Comment {
    Comment {
        id: Uuid::new_v4(),
        rating: req.rating,
        text: req.text,
        author: principal.id,
        created_at: now,
        updated_at: now,
    }
}

/// revise
///
/// Applies `changes` to the comment `id`, replacing it in place. Fails with
/// `NotFound` if the id is unknown and `NotAuthorizedCommenter` if the
/// principal did not write it. The author field is never touched.
pub fn revise(
    comments: &mut [Comment],
    principal: &Principal,
    id: Uuid,
    changes: UpdateCommentRequest,
    now: DateTime<Utc>,
) -> Result<(), ApiError> {
    let index = position(comments, id).ok_or_else(|| ApiError::not_found("Comment", id))?;

    let current = &comments[index];
    if !may_mutate(principal, current.author) {
        return Err(ApiError::NotAuthorizedCommenter);
    }

    let mut revised = current.clone();
    if let Some(rating) = changes.rating {
        revised.rating = rating;
    }
    if let Some(text) = changes.text {
        revised.text = text;
    }
    revised.updated_at = now;

    comments[index] = revised;
    Ok(())
}

/// remove
///
/// Takes the comment `id` out of the sequence after the same checks as
/// `revise`. `Vec::remove` keeps the remaining comments in order.
pub fn remove(
    comments: &mut Vec<Comment>,
    principal: &Principal,
    id: Uuid,
) -> Result<Comment, ApiError> {
    let index = position(comments, id).ok_or_else(|| ApiError::not_found("Comment", id))?;

    if !may_mutate(principal, comments[index].author) {
        return Err(ApiError::NotAuthorizedCommenter);
    }

    Ok(comments.remove(index))
}

async fn load_campsite(repo: &dyn Repository, campsite_id: Uuid) -> Result<Campsite, ApiError> {
    repo.get_campsite(campsite_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Campsite", campsite_id))
}

async fn persist(repo: &dyn Repository, campsite: Campsite) -> Result<Campsite, ApiError> {
    // The campsite can vanish between the read and this write.
    repo.save_comments(campsite.id, &campsite.comments)
        .await?
        .ok_or_else(|| ApiError::not_found("Campsite", campsite.id))
}

pub async fn list_comments(
    repo: &dyn Repository,
    campsite_id: Uuid,
) -> Result<Vec<Comment>, ApiError> {
    Ok(load_campsite(repo, campsite_id).await?.comments)
}

pub async fn get_comment(
    repo: &dyn Repository,
    campsite_id: Uuid,
    comment_id: Uuid,
) -> Result<Comment, ApiError> {
    let campsite = load_campsite(repo, campsite_id).await?;
    campsite
        .comments
        .into_iter()
        .find(|comment| comment.id == comment_id)
        .ok_or_else(|| ApiError::not_found("Comment", comment_id))
}

/// add_comment
///
/// Appends a comment authored by `principal` and returns the updated campsite.
pub async fn add_comment(
    repo: &dyn Repository,
    principal: &Principal,
    campsite_id: Uuid,
    req: CreateCommentRequest,
) -> Result<Campsite, ApiError> {
    req.validate()?;

    let mut campsite = load_campsite(repo, campsite_id).await?;
    let comment = compose(principal, req, Utc::now());
    let comment_id = comment.id;
    campsite.comments.push(comment);

    let saved = persist(repo, campsite).await?;
    tracing::info!(campsite = %campsite_id, comment = %comment_id, author = %principal.id, "comment posted");
    Ok(saved)
}

/// update_comment
///
/// Owner-only edit. Admins get no bypass here.
pub async fn update_comment(
    repo: &dyn Repository,
    principal: &Principal,
    campsite_id: Uuid,
    comment_id: Uuid,
    req: UpdateCommentRequest,
) -> Result<Campsite, ApiError> {
    req.validate()?;

    let mut campsite = load_campsite(repo, campsite_id).await?;
    revise(&mut campsite.comments, principal, comment_id, req, Utc::now())?;

    let saved = persist(repo, campsite).await?;
    tracing::info!(campsite = %campsite_id, comment = %comment_id, "comment updated");
    Ok(saved)
}

/// delete_comment
///
/// Owner-only removal of a single comment.
pub async fn delete_comment(
    repo: &dyn Repository,
    principal: &Principal,
    campsite_id: Uuid,
    comment_id: Uuid,
) -> Result<Campsite, ApiError> {
    let mut campsite = load_campsite(repo, campsite_id).await?;
    remove(&mut campsite.comments, principal, comment_id)?;

    let saved = persist(repo, campsite).await?;
    tracing::info!(campsite = %campsite_id, comment = %comment_id, "comment deleted");
    Ok(saved)
}

/// delete_all_comments
///
/// Clears the whole thread. Never consults ownership; callers must have
/// passed the `Admin` guard.
pub async fn delete_all_comments(
    repo: &dyn Repository,
    campsite_id: Uuid,
) -> Result<Campsite, ApiError> {
    let mut campsite = load_campsite(repo, campsite_id).await?;
    let removed = campsite.comments.len();
    campsite.comments.clear();

    let saved = persist(repo, campsite).await?;
    tracing::info!(campsite = %campsite_id, removed, "all comments deleted");
    Ok(saved)
}
