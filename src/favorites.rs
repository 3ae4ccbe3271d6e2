//! Per-user favorite campsites.
//!
//! A `Favorite` record is an idempotent set of campsite ids owned by exactly
//! one principal. Every operation here takes the principal from the request
//! and touches only that principal's record; there is no admin override.

use std::collections::HashSet;

use uuid::Uuid;

use crate::{
    auth::Principal,
    error::ApiError,
    models::{CampsiteRef, Favorite},
    repository::Repository,
};

impl Favorite {
    pub fn contains(&self, campsite: Uuid) -> bool {
        self.campsites.contains(&campsite)
    }

    /// Adds `campsite` unless already present. Returns whether the set changed.
    pub fn insert(&mut self, campsite: Uuid) -> bool {
        if self.contains(campsite) {
            return false;
        }
        self.campsites.push(campsite);
        true
    }

    /// Removes `campsite` if present. Returns whether the set changed.
    pub fn remove(&mut self, campsite: Uuid) -> bool {
        let before = self.campsites.len();
        self.campsites.retain(|id| *id != campsite);
        self.campsites.len() != before
    }
}

/// Drops repeated ids, keeping the first occurrence of each.
pub fn dedup(ids: impl IntoIterator<Item = Uuid>) -> Vec<Uuid> {
    let mut seen = HashSet::new();
    ids.into_iter().filter(|id| seen.insert(*id)).collect()
}

/// Outcome of removing a single campsite from a favorites set.
#[derive(Debug, Clone)]
pub enum Removal {
    Removed(Favorite),
    /// The id was not in the set, or the principal has no record at all.
    /// Carries the unchanged record when there is one.
    NothingToRemove(Option<Favorite>),
}

async fn ensure_campsite(repo: &dyn Repository, campsite: Uuid) -> Result<(), ApiError> {
    match repo.get_campsite(campsite).await? {
        Some(_) => Ok(()),
        None => Err(ApiError::not_found("Campsite", campsite)),
    }
}

async fn save(repo: &dyn Repository, favorite: &Favorite) -> Result<Favorite, ApiError> {
    repo.save_favorite(favorite)
        .await?
        .ok_or_else(|| ApiError::not_found("Favorite", favorite.user))
}

/// get_favorites
///
/// The caller's own record; 404 when they have never added a favorite.
pub async fn get_favorites(
    repo: &dyn Repository,
    principal: &Principal,
) -> Result<Favorite, ApiError> {
    repo.get_favorite(principal.id)
        .await?
        .ok_or_else(|| ApiError::not_found("Favorite", principal.id))
}

/// add_favorite
///
/// Creates the record on first use. Adding a campsite that is already in the
/// set returns the record unchanged without writing, even if that campsite has
/// since been deleted. Only ids that would be inserted must exist.
pub async fn add_favorite(
    repo: &dyn Repository,
    principal: &Principal,
    campsite: Uuid,
) -> Result<Favorite, ApiError> {
    let existing = repo.get_favorite(principal.id).await?;

    if let Some(favorite) = existing.as_ref().filter(|f| f.contains(campsite)) {
        tracing::debug!(user = %principal.id, %campsite, "campsite already a favorite");
        return Ok(favorite.clone());
    }

    ensure_campsite(repo, campsite).await?;

    let Some(mut favorite) = existing else {
        let created = repo.create_favorite(principal.id, vec![campsite]).await?;
        tracing::info!(user = %principal.id, %campsite, "favorites created");
        return Ok(created);
    };

    favorite.insert(campsite);
    save(repo, &favorite).await
}

/// add_favorites
///
/// Bulk form of `add_favorite`. The submitted ids are de-duplicated before the
/// record is created, and merged one by one into an existing record, so the
/// set contract is the same on both paths. Ids already in the set are skipped
/// without an existence check.
pub async fn add_favorites(
    repo: &dyn Repository,
    principal: &Principal,
    refs: Vec<CampsiteRef>,
) -> Result<Favorite, ApiError> {
    let existing = repo.get_favorite(principal.id).await?;

    let fresh: Vec<Uuid> = dedup(refs.iter().map(CampsiteRef::id))
        .into_iter()
        .filter(|id| !existing.as_ref().is_some_and(|f| f.contains(*id)))
        .collect();
    for id in &fresh {
        ensure_campsite(repo, *id).await?;
    }

    let Some(mut favorite) = existing else {
        let created = repo.create_favorite(principal.id, fresh).await?;
        tracing::info!(user = %principal.id, count = created.campsites.len(), "favorites created");
        return Ok(created);
    };

    if fresh.is_empty() {
        return Ok(favorite);
    }
    for id in fresh {
        favorite.insert(id);
    }
    save(repo, &favorite).await
}

/// remove_favorite
///
/// Never fails because of missing data: an absent record or absent id yields
/// `Removal::NothingToRemove`.
pub async fn remove_favorite(
    repo: &dyn Repository,
    principal: &Principal,
    campsite: Uuid,
) -> Result<Removal, ApiError> {
    let Some(mut favorite) = repo.get_favorite(principal.id).await? else {
        return Ok(Removal::NothingToRemove(None));
    };

    if !favorite.remove(campsite) {
        return Ok(Removal::NothingToRemove(Some(favorite)));
    }

    let saved = save(repo, &favorite).await?;
    tracing::info!(user = %principal.id, %campsite, "favorite removed");
    Ok(Removal::Removed(saved))
}

/// delete_favorites
///
/// Drops the caller's whole record. `None` when there was nothing to drop.
pub async fn delete_favorites(
    repo: &dyn Repository,
    principal: &Principal,
) -> Result<Option<Favorite>, ApiError> {
    let deleted = repo.delete_favorite(principal.id).await?;
    if deleted.is_some() {
        tracing::info!(user = %principal.id, "favorites deleted");
    }
    Ok(deleted)
}
