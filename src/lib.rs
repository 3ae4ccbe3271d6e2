use axum::{
    Router,
    extract::FromRef,
    http::{HeaderName, HeaderValue},
    middleware,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Module Structure ---

pub mod auth;
pub mod comments;
pub mod config;
pub mod error;
pub mod extract;
pub mod favorites;
pub mod handlers;
pub mod models;
pub mod policy;
pub mod repository;

// Routers grouped by guard (Public, Authenticated, Admin).
pub mod routes;
use routes::{admin, authenticated, public};

// --- Public Re-exports ---

pub use config::{AppConfig, Env};
pub use repository::{InMemoryRepository, PostgresRepository, RepositoryState};

/// ApiDoc
///
/// OpenAPI document for every routed handler and body schema. Served at
/// `/api-docs/openapi.json`, browsable at `/swagger-ui`.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::get_me,
        handlers::campsites::list_campsites, handlers::campsites::get_campsite,
        handlers::campsites::create_campsite, handlers::campsites::update_campsite,
        handlers::campsites::delete_campsite, handlers::campsites::delete_all_campsites,
        handlers::comments::list_comments, handlers::comments::add_comment,
        handlers::comments::delete_all_comments, handlers::comments::get_comment,
        handlers::comments::update_comment, handlers::comments::delete_comment,
        handlers::partners::list_partners, handlers::partners::get_partner,
        handlers::partners::create_partner, handlers::partners::update_partner,
        handlers::partners::delete_partner, handlers::partners::delete_all_partners,
        handlers::promotions::list_promotions, handlers::promotions::get_promotion,
        handlers::promotions::create_promotion, handlers::promotions::update_promotion,
        handlers::promotions::delete_promotion, handlers::promotions::delete_all_promotions,
        handlers::favorites::get_favorites, handlers::favorites::add_favorites,
        handlers::favorites::delete_favorites, handlers::favorites::add_favorite,
        handlers::favorites::remove_favorite
    ),
    components(
        schemas(
            models::Campsite, models::Comment, models::Partner, models::Promotion,
            models::Favorite, models::DeleteSummary, models::PrincipalProfile,
            models::CreateCampsiteRequest, models::UpdateCampsiteRequest,
            models::CreatePartnerRequest, models::UpdatePartnerRequest,
            models::CreatePromotionRequest, models::UpdatePromotionRequest,
            models::CreateCommentRequest, models::UpdateCommentRequest,
            models::CampsiteRef, error::ErrorBody,
        )
    ),
    tags(
        (name = "campsite-api", description = "Campsites, partners, promotions and favorites")
    )
)]
struct ApiDoc;

/// AppState
///
/// Shared by every request. Cheap to clone: the repository sits behind an
/// `Arc` and the config is a handful of strings.
#[derive(Clone)]
pub struct AppState {
    pub repo: RepositoryState,
    pub config: AppConfig,
}

impl FromRef<AppState> for RepositoryState {
    fn from_ref(app_state: &AppState) -> RepositoryState {
        app_state.repo.clone()
    }
}

impl FromRef<AppState> for AppConfig {
    fn from_ref(app_state: &AppState) -> AppConfig {
        app_state.config.clone()
    }
}

fn cors_layer(config: &AppConfig) -> CorsLayer {
    let cors = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    match config.env {
        Env::Local => cors.allow_origin(Any),
        Env::Production => {
            let origins: Vec<HeaderValue> = config
                .allowed_origins
                .iter()
                .filter_map(|origin| match HeaderValue::from_str(origin) {
                    Ok(value) => Some(value),
                    Err(_) => {
                        tracing::warn!(%origin, "ignoring malformed CORS origin");
                        None
                    }
                })
                .collect();
            cors.allow_origin(AllowOrigin::list(origins))
        }
    }
}

/// create_router
///
/// Assembles the route tiers and wraps them in the middleware stack.
/// Innermost to outermost: principal resolution, the internal error renderer,
/// request id + tracing, then CORS.
pub fn create_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config);
    let x_request_id = HeaderName::from_static("x-request-id");

    let base_router = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(public::public_routes())
        .merge(authenticated::authenticated_routes())
        .merge(admin::admin_routes())
        // Every request gets a `ResolvedPrincipal`, anonymous or not. The
        // `Authenticated` / `Admin` extractors decide what to do with it.
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::resolve_principal_middleware,
        ))
        // Outside the resolver so that its own 500s are rendered too.
        .layer(middleware::from_fn_with_state(
            state.config.clone(),
            error::render_internal_errors,
        ))
        .with_state(state);

    base_router
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(trace_span_logger)
                        .on_response(
                            DefaultOnResponse::new()
                                .level(Level::INFO)
                                .latency_unit(tower_http::LatencyUnit::Millis),
                        ),
                )
                .layer(PropagateRequestIdLayer::new(x_request_id)),
        )
        .layer(cors)
}

/// Span for one HTTP request, tagged with its `x-request-id` so every log
/// line of the request can be correlated.
fn trace_span_logger(request: &axum::http::Request<axum::body::Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = ?request.method(),
        uri = ?request.uri(),
        req_id = %request_id,
    )
}
