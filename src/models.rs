use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use ts_rs::TS;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::ApiError;

/// Lowest and highest star rating a comment may carry.
pub const MIN_RATING: i32 = 1;
pub const MAX_RATING: i32 = 5;

// --- Core Application Schemas (Mapped to Database) ---

/// User
///
/// The account record backing a `Principal`. Accounts are registered by the
/// external identity provider; this service only reads them.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    // RBAC flag. Admins may manage campsites, partners and promotions.
    pub admin: bool,
}

/// Comment
///
/// A review embedded in a campsite document. The `author` is stamped from the
/// requesting principal at creation and never changes afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct Comment {
    pub id: Uuid,
    pub rating: i32,
    pub text: String,
    pub author: Uuid,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

/// Campsite
///
/// The top-level resource. Comments are stored inline, in posting order, as a
/// JSONB array on the `campsites` row.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow)]
#[ts(export)]
pub struct Campsite {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub image: String,
    pub elevation: i32,
    /// Price in cents.
    pub cost: i64,
    pub featured: bool,
    #[sqlx(json)]
    pub comments: Vec<Comment>,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

/// Partner
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow)]
#[ts(export)]
pub struct Partner {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub image: String,
    pub featured: bool,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

/// Promotion
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow)]
#[ts(export)]
pub struct Promotion {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub image: String,
    /// Price in cents.
    pub cost: i64,
    pub featured: bool,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

/// Favorite
///
/// One record per user, holding the set of campsites that user has marked.
/// `campsites` never contains the same id twice; see `crate::favorites`.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow)]
#[ts(export)]
pub struct Favorite {
    pub id: Uuid,
    #[sqlx(rename = "user_id")]
    pub user: Uuid,
    pub campsites: Vec<Uuid>,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

/// DeleteSummary
///
/// Returned by the collection-level DELETE endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct DeleteSummary {
    pub deleted_count: u64,
}

// --- Request Payloads (Input Schemas) ---

fn require_text(field: &str, value: &str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        return Err(ApiError::Invalid(format!("{field} must not be empty")));
    }
    Ok(())
}

fn require_cost(cost: i64) -> Result<(), ApiError> {
    if cost < 0 {
        return Err(ApiError::Invalid("cost must not be negative".to_string()));
    }
    Ok(())
}

fn require_rating(rating: i32) -> Result<(), ApiError> {
    if !(MIN_RATING..=MAX_RATING).contains(&rating) {
        return Err(ApiError::Invalid(format!(
            "rating must be between {MIN_RATING} and {MAX_RATING}"
        )));
    }
    Ok(())
}

/// CreateCampsiteRequest
///
/// Input payload for POST /campsites.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct CreateCampsiteRequest {
    pub name: String,
    pub description: String,
    pub image: String,
    pub elevation: i32,
    pub cost: i64,
    #[serde(default)]
    pub featured: bool,
}

impl CreateCampsiteRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        require_text("name", &self.name)?;
        require_text("description", &self.description)?;
        require_text("image", &self.image)?;
        require_cost(self.cost)
    }
}

/// UpdateCampsiteRequest
///
/// Partial update payload for PUT /campsites/{id}. Absent fields are left untouched.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct UpdateCampsiteRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elevation: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub featured: Option<bool>,
}

impl UpdateCampsiteRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        if let Some(name) = &self.name {
            require_text("name", name)?;
        }
        if let Some(description) = &self.description {
            require_text("description", description)?;
        }
        if let Some(image) = &self.image {
            require_text("image", image)?;
        }
        if let Some(cost) = self.cost {
            require_cost(cost)?;
        }
        Ok(())
    }
}

/// CreatePartnerRequest
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct CreatePartnerRequest {
    pub name: String,
    pub description: String,
    pub image: String,
    #[serde(default)]
    pub featured: bool,
}

impl CreatePartnerRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        require_text("name", &self.name)?;
        require_text("description", &self.description)?;
        require_text("image", &self.image)
    }
}

/// UpdatePartnerRequest
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct UpdatePartnerRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub featured: Option<bool>,
}

impl UpdatePartnerRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        if let Some(name) = &self.name {
            require_text("name", name)?;
        }
        if let Some(description) = &self.description {
            require_text("description", description)?;
        }
        if let Some(image) = &self.image {
            require_text("image", image)?;
        }
        Ok(())
    }
}

/// CreatePromotionRequest
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct CreatePromotionRequest {
    pub name: String,
    pub description: String,
    pub image: String,
    pub cost: i64,
    #[serde(default)]
    pub featured: bool,
}

impl CreatePromotionRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        require_text("name", &self.name)?;
        require_text("description", &self.description)?;
        require_text("image", &self.image)?;
        require_cost(self.cost)
    }
}

/// UpdatePromotionRequest
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct UpdatePromotionRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub featured: Option<bool>,
}

impl UpdatePromotionRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        if let Some(name) = &self.name {
            require_text("name", name)?;
        }
        if let Some(description) = &self.description {
            require_text("description", description)?;
        }
        if let Some(image) = &self.image {
            require_text("image", image)?;
        }
        if let Some(cost) = self.cost {
            require_cost(cost)?;
        }
        Ok(())
    }
}

/// CreateCommentRequest
///
/// Input payload for POST /campsites/{id}/comments. Any `author` sent by the
/// client is ignored; the author always comes from the authenticated principal.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct CreateCommentRequest {
    pub rating: i32,
    pub text: String,
}

impl CreateCommentRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        require_rating(self.rating)?;
        require_text("text", &self.text)
    }
}

/// UpdateCommentRequest
///
/// Both fields are optional and applied independently.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct UpdateCommentRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl UpdateCommentRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        if let Some(rating) = self.rating {
            require_rating(rating)?;
        }
        if let Some(text) = &self.text {
            require_text("text", text)?;
        }
        Ok(())
    }
}

/// CampsiteRef
///
/// One entry of a bulk favorites body. Clients send either a bare campsite id
/// or a document of the shape `{"_id": "..."}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum CampsiteRef {
    Id(Uuid),
    Document {
        #[serde(rename = "_id", alias = "id")]
        id: Uuid,
    },
}

impl CampsiteRef {
    pub fn id(&self) -> Uuid {
        match self {
            CampsiteRef::Id(id) => *id,
            CampsiteRef::Document { id } => *id,
        }
    }
}

// --- Profile Schemas (Output) ---

/// PrincipalProfile
///
/// Output schema for GET /me.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct PrincipalProfile {
    pub id: Uuid,
    pub admin: bool,
}
