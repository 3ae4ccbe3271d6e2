use crate::{
    error::PersistenceError,
    models::{
        Campsite, Comment, CreateCampsiteRequest, CreatePartnerRequest, CreatePromotionRequest,
        Favorite, Partner, Promotion, UpdateCampsiteRequest, UpdatePartnerRequest,
        UpdatePromotionRequest, User,
    },
};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{PgPool, types::Json};
use std::{collections::HashMap, sync::Arc};
use tokio::sync::RwLock;
use uuid::Uuid;

pub type RepoResult<T> = Result<T, PersistenceError>;

/// Repository Trait
///
/// The document store contract. Handlers and the comment/favorite services
/// only ever see `Arc<dyn Repository>`, so Postgres and the in-memory store
/// are interchangeable.
///
/// Lookups of a missing id return `Ok(None)`; deciding whether that is a 404
/// is the caller's job.
#[async_trait]
pub trait Repository: Send + Sync {
    // --- Users ---
    async fn get_user(&self, id: Uuid) -> RepoResult<Option<User>>;
    async fn create_user(&self, user: User) -> RepoResult<User>;

    // --- Campsites ---
    async fn list_campsites(&self) -> RepoResult<Vec<Campsite>>;
    async fn get_campsite(&self, id: Uuid) -> RepoResult<Option<Campsite>>;
    async fn create_campsite(&self, req: CreateCampsiteRequest) -> RepoResult<Campsite>;
    async fn update_campsite(
        &self,
        id: Uuid,
        req: UpdateCampsiteRequest,
    ) -> RepoResult<Option<Campsite>>;
    async fn delete_campsite(&self, id: Uuid) -> RepoResult<Option<Campsite>>;
    async fn delete_all_campsites(&self) -> RepoResult<u64>;
    /// Persists the whole comment sequence of a campsite, replacing what was stored.
    async fn save_comments(&self, id: Uuid, comments: &[Comment]) -> RepoResult<Option<Campsite>>;

    // --- Partners ---
    async fn list_partners(&self) -> RepoResult<Vec<Partner>>;
    async fn get_partner(&self, id: Uuid) -> RepoResult<Option<Partner>>;
    async fn create_partner(&self, req: CreatePartnerRequest) -> RepoResult<Partner>;
    async fn update_partner(
        &self,
        id: Uuid,
        req: UpdatePartnerRequest,
    ) -> RepoResult<Option<Partner>>;
    async fn delete_partner(&self, id: Uuid) -> RepoResult<Option<Partner>>;
    async fn delete_all_partners(&self) -> RepoResult<u64>;

    // --- Promotions ---
    async fn list_promotions(&self) -> RepoResult<Vec<Promotion>>;
    async fn get_promotion(&self, id: Uuid) -> RepoResult<Option<Promotion>>;
    async fn create_promotion(&self, req: CreatePromotionRequest) -> RepoResult<Promotion>;
    async fn update_promotion(
        &self,
        id: Uuid,
        req: UpdatePromotionRequest,
    ) -> RepoResult<Option<Promotion>>;
    async fn delete_promotion(&self, id: Uuid) -> RepoResult<Option<Promotion>>;
    async fn delete_all_promotions(&self) -> RepoResult<u64>;

    // --- Favorites (one record per user) ---
    async fn get_favorite(&self, user: Uuid) -> RepoResult<Option<Favorite>>;
    async fn create_favorite(&self, user: Uuid, campsites: Vec<Uuid>) -> RepoResult<Favorite>;
    /// Writes back the campsite set of an existing record.
    async fn save_favorite(&self, favorite: &Favorite) -> RepoResult<Option<Favorite>>;
    async fn delete_favorite(&self, user: Uuid) -> RepoResult<Option<Favorite>>;
}

/// RepositoryState
///
/// The concrete type used to share the persistence layer across the application state.
pub type RepositoryState = Arc<dyn Repository>;

const CAMPSITE_COLUMNS: &str =
    "id, name, description, image, elevation, cost, featured, comments, created_at, updated_at";
const PARTNER_COLUMNS: &str = "id, name, description, image, featured, created_at, updated_at";
const PROMOTION_COLUMNS: &str =
    "id, name, description, image, cost, featured, created_at, updated_at";
const FAVORITE_COLUMNS: &str = "id, user_id, campsites, created_at, updated_at";

/// PostgresRepository
///
/// `Repository` backed by PostgreSQL. Queries are built at runtime so the
/// crate compiles without a live database.
pub struct PostgresRepository {
    pool: PgPool,
}

impl PostgresRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Applies the embedded migrations in `./migrations`.
    pub async fn migrate(&self) -> RepoResult<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl Repository for PostgresRepository {
    async fn get_user(&self, id: Uuid) -> RepoResult<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT id, username, admin FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn create_user(&self, user: User) -> RepoResult<User> {
        sqlx::query_as::<_, User>(
            "INSERT INTO users (id, username, admin) VALUES ($1, $2, $3) RETURNING id, username, admin",
        )
        .bind(user.id)
        .bind(&user.username)
        .bind(user.admin)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| PersistenceError::from_write("User", e))
    }

    // --- CAMPSITES ---

    async fn list_campsites(&self) -> RepoResult<Vec<Campsite>> {
        let query = format!("SELECT {CAMPSITE_COLUMNS} FROM campsites ORDER BY created_at ASC");
        let campsites = sqlx::query_as::<_, Campsite>(&query)
            .fetch_all(&self.pool)
            .await?;
        Ok(campsites)
    }

    async fn get_campsite(&self, id: Uuid) -> RepoResult<Option<Campsite>> {
        let query = format!("SELECT {CAMPSITE_COLUMNS} FROM campsites WHERE id = $1");
        let campsite = sqlx::query_as::<_, Campsite>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(campsite)
    }

    async fn create_campsite(&self, req: CreateCampsiteRequest) -> RepoResult<Campsite> {
        let query = format!(
            r#"INSERT INTO campsites (id, name, description, image, elevation, cost, featured, comments, created_at, updated_at)
               VALUES ($1, $2, $3, $4, $5, $6, $7, '[]'::jsonb, NOW(), NOW())
               RETURNING {CAMPSITE_COLUMNS}"#
        );
        sqlx::query_as::<_, Campsite>(&query)
            .bind(Uuid::new_v4())
            .bind(req.name)
            .bind(req.description)
            .bind(req.image)
            .bind(req.elevation)
            .bind(req.cost)
            .bind(req.featured)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| PersistenceError::from_write("Campsite", e))
    }

    /// Partial update via COALESCE: a NULL bind leaves the column untouched.
    async fn update_campsite(
        &self,
        id: Uuid,
        req: UpdateCampsiteRequest,
    ) -> RepoResult<Option<Campsite>> {
        let query = format!(
            r#"UPDATE campsites
               SET name = COALESCE($2, name),
                   description = COALESCE($3, description),
                   image = COALESCE($4, image),
                   elevation = COALESCE($5, elevation),
                   cost = COALESCE($6, cost),
                   featured = COALESCE($7, featured),
                   updated_at = NOW()
               WHERE id = $1
               RETURNING {CAMPSITE_COLUMNS}"#
        );
        sqlx::query_as::<_, Campsite>(&query)
            .bind(id)
            .bind(req.name)
            .bind(req.description)
            .bind(req.image)
            .bind(req.elevation)
            .bind(req.cost)
            .bind(req.featured)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| PersistenceError::from_write("Campsite", e))
    }

    async fn delete_campsite(&self, id: Uuid) -> RepoResult<Option<Campsite>> {
        let query = format!("DELETE FROM campsites WHERE id = $1 RETURNING {CAMPSITE_COLUMNS}");
        let campsite = sqlx::query_as::<_, Campsite>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(campsite)
    }

    async fn delete_all_campsites(&self) -> RepoResult<u64> {
        let result = sqlx::query("DELETE FROM campsites")
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn save_comments(&self, id: Uuid, comments: &[Comment]) -> RepoResult<Option<Campsite>> {
        let query = format!(
            "UPDATE campsites SET comments = $2, updated_at = NOW() WHERE id = $1 RETURNING {CAMPSITE_COLUMNS}"
        );
        let campsite = sqlx::query_as::<_, Campsite>(&query)
            .bind(id)
            .bind(Json(comments))
            .fetch_optional(&self.pool)
            .await?;
        Ok(campsite)
    }

    // --- PARTNERS ---

    async fn list_partners(&self) -> RepoResult<Vec<Partner>> {
        let query = format!("SELECT {PARTNER_COLUMNS} FROM partners ORDER BY created_at ASC");
        let partners = sqlx::query_as::<_, Partner>(&query)
            .fetch_all(&self.pool)
            .await?;
        Ok(partners)
    }

    async fn get_partner(&self, id: Uuid) -> RepoResult<Option<Partner>> {
        let query = format!("SELECT {PARTNER_COLUMNS} FROM partners WHERE id = $1");
        let partner = sqlx::query_as::<_, Partner>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(partner)
    }

    async fn create_partner(&self, req: CreatePartnerRequest) -> RepoResult<Partner> {
        let query = format!(
            r#"INSERT INTO partners (id, name, description, image, featured, created_at, updated_at)
               VALUES ($1, $2, $3, $4, $5, NOW(), NOW())
               RETURNING {PARTNER_COLUMNS}"#
        );
        sqlx::query_as::<_, Partner>(&query)
            .bind(Uuid::new_v4())
            .bind(req.name)
            .bind(req.description)
            .bind(req.image)
            .bind(req.featured)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| PersistenceError::from_write("Partner", e))
    }

    async fn update_partner(
        &self,
        id: Uuid,
        req: UpdatePartnerRequest,
    ) -> RepoResult<Option<Partner>> {
        let query = format!(
            r#"UPDATE partners
               SET name = COALESCE($2, name),
                   description = COALESCE($3, description),
                   image = COALESCE($4, image),
                   featured = COALESCE($5, featured),
                   updated_at = NOW()
               WHERE id = $1
               RETURNING {PARTNER_COLUMNS}"#
        );
        sqlx::query_as::<_, Partner>(&query)
            .bind(id)
            .bind(req.name)
            .bind(req.description)
            .bind(req.image)
            .bind(req.featured)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| PersistenceError::from_write("Partner", e))
    }

    async fn delete_partner(&self, id: Uuid) -> RepoResult<Option<Partner>> {
        let query = format!("DELETE FROM partners WHERE id = $1 RETURNING {PARTNER_COLUMNS}");
        let partner = sqlx::query_as::<_, Partner>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(partner)
    }

    async fn delete_all_partners(&self) -> RepoResult<u64> {
        let result = sqlx::query("DELETE FROM partners").execute(&self.pool).await?;
        Ok(result.rows_affected())
    }

    // --- PROMOTIONS ---

    async fn list_promotions(&self) -> RepoResult<Vec<Promotion>> {
        let query = format!("SELECT {PROMOTION_COLUMNS} FROM promotions ORDER BY created_at ASC");
        let promotions = sqlx::query_as::<_, Promotion>(&query)
            .fetch_all(&self.pool)
            .await?;
        Ok(promotions)
    }

    async fn get_promotion(&self, id: Uuid) -> RepoResult<Option<Promotion>> {
        let query = format!("SELECT {PROMOTION_COLUMNS} FROM promotions WHERE id = $1");
        let promotion = sqlx::query_as::<_, Promotion>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(promotion)
    }

    async fn create_promotion(&self, req: CreatePromotionRequest) -> RepoResult<Promotion> {
        let query = format!(
            r#"INSERT INTO promotions (id, name, description, image, cost, featured, created_at, updated_at)
               VALUES ($1, $2, $3, $4, $5, $6, NOW(), NOW())
               RETURNING {PROMOTION_COLUMNS}"#
        );
        sqlx::query_as::<_, Promotion>(&query)
            .bind(Uuid::new_v4())
            .bind(req.name)
            .bind(req.description)
            .bind(req.image)
            .bind(req.cost)
            .bind(req.featured)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| PersistenceError::from_write("Promotion", e))
    }

    async fn update_promotion(
        &self,
        id: Uuid,
        req: UpdatePromotionRequest,
    ) -> RepoResult<Option<Promotion>> {
        let query = format!(
            r#"UPDATE promotions
               SET name = COALESCE($2, name),
                   description = COALESCE($3, description),
                   image = COALESCE($4, image),
                   cost = COALESCE($5, cost),
                   featured = COALESCE($6, featured),
                   updated_at = NOW()
               WHERE id = $1
               RETURNING {PROMOTION_COLUMNS}"#
        );
        sqlx::query_as::<_, Promotion>(&query)
            .bind(id)
            .bind(req.name)
            .bind(req.description)
            .bind(req.image)
            .bind(req.cost)
            .bind(req.featured)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| PersistenceError::from_write("Promotion", e))
    }

    async fn delete_promotion(&self, id: Uuid) -> RepoResult<Option<Promotion>> {
        let query = format!("DELETE FROM promotions WHERE id = $1 RETURNING {PROMOTION_COLUMNS}");
        let promotion = sqlx::query_as::<_, Promotion>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(promotion)
    }

    async fn delete_all_promotions(&self) -> RepoResult<u64> {
        let result = sqlx::query("DELETE FROM promotions")
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    // --- FAVORITES ---

    async fn get_favorite(&self, user: Uuid) -> RepoResult<Option<Favorite>> {
        let query = format!("SELECT {FAVORITE_COLUMNS} FROM favorites WHERE user_id = $1");
        let favorite = sqlx::query_as::<_, Favorite>(&query)
            .bind(user)
            .fetch_optional(&self.pool)
            .await?;
        Ok(favorite)
    }

    /// `user_id` is UNIQUE, so two racing first-adds yield one record and one `Conflict`.
    async fn create_favorite(&self, user: Uuid, campsites: Vec<Uuid>) -> RepoResult<Favorite> {
        let query = format!(
            r#"INSERT INTO favorites (id, user_id, campsites, created_at, updated_at)
               VALUES ($1, $2, $3, NOW(), NOW())
               RETURNING {FAVORITE_COLUMNS}"#
        );
        sqlx::query_as::<_, Favorite>(&query)
            .bind(Uuid::new_v4())
            .bind(user)
            .bind(campsites)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| match PersistenceError::from_write("Favorite", e) {
                PersistenceError::Conflict(_) => {
                    PersistenceError::Conflict(format!("Favorite for user {user} already exists"))
                }
                other => other,
            })
    }

    async fn save_favorite(&self, favorite: &Favorite) -> RepoResult<Option<Favorite>> {
        let query = format!(
            "UPDATE favorites SET campsites = $2, updated_at = NOW() WHERE id = $1 RETURNING {FAVORITE_COLUMNS}"
        );
        let saved = sqlx::query_as::<_, Favorite>(&query)
            .bind(favorite.id)
            .bind(&favorite.campsites)
            .fetch_optional(&self.pool)
            .await?;
        Ok(saved)
    }

    async fn delete_favorite(&self, user: Uuid) -> RepoResult<Option<Favorite>> {
        let query = format!("DELETE FROM favorites WHERE user_id = $1 RETURNING {FAVORITE_COLUMNS}");
        let favorite = sqlx::query_as::<_, Favorite>(&query)
            .bind(user)
            .fetch_optional(&self.pool)
            .await?;
        Ok(favorite)
    }
}

// --- In-Memory Implementation ---

#[derive(Default)]
struct MemoryStore {
    users: HashMap<Uuid, User>,
    // Vecs keep insertion order, matching the `ORDER BY created_at` of the SQL listing.
    campsites: Vec<Campsite>,
    partners: Vec<Partner>,
    promotions: Vec<Promotion>,
    favorites: HashMap<Uuid, Favorite>,
}

/// InMemoryRepository
///
/// A `Repository` held entirely in process memory. Used by the test suites so
/// the handler and policy logic can be exercised without Postgres. It enforces
/// the same unique-name rule as the SQL schema.
#[derive(Default)]
pub struct InMemoryRepository {
    store: RwLock<MemoryStore>,
    /// When true, every call fails with a simulated database error.
    pub should_fail: bool,
}

fn conflict(entity: &str) -> PersistenceError {
    PersistenceError::Conflict(format!("{entity} with this name already exists"))
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn new_failing() -> Self {
        Self {
            should_fail: true,
            ..Self::default()
        }
    }

    fn check(&self) -> RepoResult<()> {
        if self.should_fail {
            return Err(PersistenceError::Database(sqlx::Error::Protocol(
                "simulated storage failure".to_string(),
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl Repository for InMemoryRepository {
    async fn get_user(&self, id: Uuid) -> RepoResult<Option<User>> {
        self.check()?;
        Ok(self.store.read().await.users.get(&id).cloned())
    }

    async fn create_user(&self, user: User) -> RepoResult<User> {
        self.check()?;
        let mut store = self.store.write().await;
        if store.users.values().any(|u| u.username == user.username) {
            return Err(conflict("User"));
        }
        store.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn list_campsites(&self) -> RepoResult<Vec<Campsite>> {
        self.check()?;
        Ok(self.store.read().await.campsites.clone())
    }

    async fn get_campsite(&self, id: Uuid) -> RepoResult<Option<Campsite>> {
        self.check()?;
        let store = self.store.read().await;
        Ok(store.campsites.iter().find(|c| c.id == id).cloned())
    }

    async fn create_campsite(&self, req: CreateCampsiteRequest) -> RepoResult<Campsite> {
        self.check()?;
        let mut store = self.store.write().await;
        if store.campsites.iter().any(|c| c.name == req.name) {
            return Err(conflict("Campsite"));
        }
        let now = Utc::now();
        let campsite = Campsite {
            id: Uuid::new_v4(),
            name: req.name,
            description: req.description,
            image: req.image,
            elevation: req.elevation,
            cost: req.cost,
            featured: req.featured,
            comments: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        store.campsites.push(campsite.clone());
        Ok(campsite)
    }

    async fn update_campsite(
        &self,
        id: Uuid,
        req: UpdateCampsiteRequest,
    ) -> RepoResult<Option<Campsite>> {
        self.check()?;
        let mut store = self.store.write().await;
        if let Some(name) = &req.name {
            if store.campsites.iter().any(|c| c.id != id && &c.name == name) {
                return Err(conflict("Campsite"));
            }
        }
        let Some(campsite) = store.campsites.iter_mut().find(|c| c.id == id) else {
            return Ok(None);
        };
        if let Some(name) = req.name {
            campsite.name = name;
        }
        if let Some(description) = req.description {
            campsite.description = description;
        }
        if let Some(image) = req.image {
            campsite.image = image;
        }
        if let Some(elevation) = req.elevation {
            campsite.elevation = elevation;
        }
        if let Some(cost) = req.cost {
            campsite.cost = cost;
        }
        if let Some(featured) = req.featured {
            campsite.featured = featured;
        }
        campsite.updated_at = Utc::now();
        Ok(Some(campsite.clone()))
    }

    async fn delete_campsite(&self, id: Uuid) -> RepoResult<Option<Campsite>> {
        self.check()?;
        let mut store = self.store.write().await;
        let index = store.campsites.iter().position(|c| c.id == id);
        Ok(index.map(|i| store.campsites.remove(i)))
    }

    async fn delete_all_campsites(&self) -> RepoResult<u64> {
        self.check()?;
        let mut store = self.store.write().await;
        let count = store.campsites.len() as u64;
        store.campsites.clear();
        Ok(count)
    }

    async fn save_comments(&self, id: Uuid, comments: &[Comment]) -> RepoResult<Option<Campsite>> {
        self.check()?;
        let mut store = self.store.write().await;
        let Some(campsite) = store.campsites.iter_mut().find(|c| c.id == id) else {
            return Ok(None);
        };
        campsite.comments = comments.to_vec();
        campsite.updated_at = Utc::now();
        Ok(Some(campsite.clone()))
    }

    async fn list_partners(&self) -> RepoResult<Vec<Partner>> {
        self.check()?;
        Ok(self.store.read().await.partners.clone())
    }

    async fn get_partner(&self, id: Uuid) -> RepoResult<Option<Partner>> {
        self.check()?;
        let store = self.store.read().await;
        Ok(store.partners.iter().find(|p| p.id == id).cloned())
    }

    async fn create_partner(&self, req: CreatePartnerRequest) -> RepoResult<Partner> {
        self.check()?;
        let mut store = self.store.write().await;
        if store.partners.iter().any(|p| p.name == req.name) {
            return Err(conflict("Partner"));
        }
        let now = Utc::now();
        let partner = Partner {
            id: Uuid::new_v4(),
            name: req.name,
            description: req.description,
            image: req.image,
            featured: req.featured,
            created_at: now,
            updated_at: now,
        };
        store.partners.push(partner.clone());
        Ok(partner)
    }

    async fn update_partner(
        &self,
        id: Uuid,
        req: UpdatePartnerRequest,
    ) -> RepoResult<Option<Partner>> {
        self.check()?;
        let mut store = self.store.write().await;
        if let Some(name) = &req.name {
            if store.partners.iter().any(|p| p.id != id && &p.name == name) {
                return Err(conflict("Partner"));
            }
        }
        let Some(partner) = store.partners.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };
        if let Some(name) = req.name {
            partner.name = name;
        }
        if let Some(description) = req.description {
            partner.description = description;
        }
        if let Some(image) = req.image {
            partner.image = image;
        }
        if let Some(featured) = req.featured {
            partner.featured = featured;
        }
        partner.updated_at = Utc::now();
        Ok(Some(partner.clone()))
    }

    async fn delete_partner(&self, id: Uuid) -> RepoResult<Option<Partner>> {
        self.check()?;
        let mut store = self.store.write().await;
        let index = store.partners.iter().position(|p| p.id == id);
        Ok(index.map(|i| store.partners.remove(i)))
    }

    async fn delete_all_partners(&self) -> RepoResult<u64> {
        self.check()?;
        let mut store = self.store.write().await;
        let count = store.partners.len() as u64;
        store.partners.clear();
        Ok(count)
    }

    async fn list_promotions(&self) -> RepoResult<Vec<Promotion>> {
        self.check()?;
        Ok(self.store.read().await.promotions.clone())
    }

    async fn get_promotion(&self, id: Uuid) -> RepoResult<Option<Promotion>> {
        self.check()?;
        let store = self.store.read().await;
        Ok(store.promotions.iter().find(|p| p.id == id).cloned())
    }

    async fn create_promotion(&self, req: CreatePromotionRequest) -> RepoResult<Promotion> {
        self.check()?;
        let mut store = self.store.write().await;
        if store.promotions.iter().any(|p| p.name == req.name) {
            return Err(conflict("Promotion"));
        }
        let now = Utc::now();
        let promotion = Promotion {
            id: Uuid::new_v4(),
            name: req.name,
            description: req.description,
            image: req.image,
            cost: req.cost,
            featured: req.featured,
            created_at: now,
            updated_at: now,
        };
        store.promotions.push(promotion.clone());
        Ok(promotion)
    }

    async fn update_promotion(
        &self,
        id: Uuid,
        req: UpdatePromotionRequest,
    ) -> RepoResult<Option<Promotion>> {
        self.check()?;
        let mut store = self.store.write().await;
        if let Some(name) = &req.name {
            if store.promotions.iter().any(|p| p.id != id && &p.name == name) {
                return Err(conflict("Promotion"));
            }
        }
        let Some(promotion) = store.promotions.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };
        if let Some(name) = req.name {
            promotion.name = name;
        }
        if let Some(description) = req.description {
            promotion.description = description;
        }
        if let Some(image) = req.image {
            promotion.image = image;
        }
        if let Some(cost) = req.cost {
            promotion.cost = cost;
        }
        if let Some(featured) = req.featured {
            promotion.featured = featured;
        }
        promotion.updated_at = Utc::now();
        Ok(Some(promotion.clone()))
    }

    async fn delete_promotion(&self, id: Uuid) -> RepoResult<Option<Promotion>> {
        self.check()?;
        let mut store = self.store.write().await;
        let index = store.promotions.iter().position(|p| p.id == id);
        Ok(index.map(|i| store.promotions.remove(i)))
    }

    async fn delete_all_promotions(&self) -> RepoResult<u64> {
        self.check()?;
        let mut store = self.store.write().await;
        let count = store.promotions.len() as u64;
        store.promotions.clear();
        Ok(count)
    }

    async fn get_favorite(&self, user: Uuid) -> RepoResult<Option<Favorite>> {
        self.check()?;
        Ok(self.store.read().await.favorites.get(&user).cloned())
    }

    async fn create_favorite(&self, user: Uuid, campsites: Vec<Uuid>) -> RepoResult<Favorite> {
        self.check()?;
        let mut store = self.store.write().await;
        if store.favorites.contains_key(&user) {
            return Err(PersistenceError::Conflict(format!(
                "Favorite for user {user} already exists"
            )));
        }
        let now = Utc::now();
        let favorite = Favorite {
            id: Uuid::new_v4(),
            user,
            campsites,
            created_at: now,
            updated_at: now,
        };
        store.favorites.insert(user, favorite.clone());
        Ok(favorite)
    }

    async fn save_favorite(&self, favorite: &Favorite) -> RepoResult<Option<Favorite>> {
        self.check()?;
        let mut store = self.store.write().await;
        let Some(stored) = store
            .favorites
            .values_mut()
            .find(|f| f.id == favorite.id)
        else {
            return Ok(None);
        };
        stored.campsites = favorite.campsites.clone();
        stored.updated_at = Utc::now();
        Ok(Some(stored.clone()))
    }

    async fn delete_favorite(&self, user: Uuid) -> RepoResult<Option<Favorite>> {
        self.check()?;
        Ok(self.store.write().await.favorites.remove(&user))
    }
}
