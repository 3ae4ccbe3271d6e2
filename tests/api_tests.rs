use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode, header},
};
use campsite_api::{
    AppConfig, AppState, create_router,
    error::ErrorBody,
    models::{Campsite, DeleteSummary, Favorite, User},
    repository::{InMemoryRepository, Repository},
};
use serde_json::{Value, json};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceExt;
use uuid::Uuid;

// --- Test Harness ---

struct TestApp {
    router: Router,
    admin: Uuid,
    alice: Uuid,
    bob: Uuid,
}

async fn seed_user(repo: &InMemoryRepository, username: &str, admin: bool) -> Uuid {
    repo.create_user(User {
        id: Uuid::new_v4(),
        username: username.to_string(),
        admin,
    })
    .await
    .unwrap()
    .id
}

async fn spawn_app() -> TestApp {
    let repo = Arc::new(InMemoryRepository::new());
    let admin = seed_user(&repo, "admin", true).await;
    let alice = seed_user(&repo, "alice", false).await;
    let bob = seed_user(&repo, "bob", false).await;

    let state = AppState {
        repo,
        config: AppConfig::default(),
    };

    TestApp {
        router: create_router(state),
        admin,
        alice,
        bob,
    }
}

impl TestApp {
    /// Sends a request through the full middleware stack. `user` goes in the
    /// local-only `x-user-id` header.
    async fn send(
        &self,
        method: Method,
        uri: &str,
        user: Option<Uuid>,
        body: Option<Value>,
    ) -> (StatusCode, Option<String>, Vec<u8>) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(id) = user {
            builder = builder.header("x-user-id", id.to_string());
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, content_type, bytes.to_vec())
    }

    async fn create_campsite(&self, name: &str) -> Campsite {
        let (status, _, body) = self
            .send(
                Method::POST,
                "/campsites",
                Some(self.admin),
                Some(json!({
                    "name": name,
                    "description": "Nestled in the foothills",
                    "image": "images/react-lake.jpg",
                    "elevation": 1233,
                    "cost": 6500,
                    "featured": false
                })),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        serde_json::from_slice(&body).unwrap()
    }
}

fn error_message(body: &[u8]) -> String {
    serde_json::from_slice::<ErrorBody>(body).unwrap().message
}

// --- Public surface ---

#[tokio::test]
async fn test_health_check() {
    let app = spawn_app().await;
    let (status, _, _) = app.send(Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_public_reads_need_no_credentials() {
    let app = spawn_app().await;
    let campsite = app.create_campsite("React Lake").await;

    let (status, _, body) = app.send(Method::GET, "/campsites", None, None).await;
    assert_eq!(status, StatusCode::OK);
    let listed: Vec<Campsite> = serde_json::from_slice(&body).unwrap();
    assert_eq!(listed.len(), 1);

    let (status, _, _) = app
        .send(
            Method::GET,
            &format!("/campsites/{}", campsite.id),
            None,
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_unknown_campsite_is_404_with_message() {
    let app = spawn_app().await;
    let id = Uuid::new_v4();
    let (status, _, body) = app
        .send(Method::GET, &format!("/campsites/{id}/comments"), None, None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error_message(&body), format!("Campsite {id} not found"));
}

// --- Guards ---

#[tokio::test]
async fn test_anonymous_write_is_401() {
    let app = spawn_app().await;
    let (status, _, body) = app
        .send(
            Method::POST,
            "/campsites",
            None,
            Some(json!({"name": "x", "description": "y", "image": "z", "elevation": 1, "cost": 1})),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(error_message(&body), "You are not authenticated!");
}

#[tokio::test]
async fn test_non_admin_write_is_403() {
    let app = spawn_app().await;
    let (status, _, body) = app
        .send(Method::DELETE, "/partners", Some(app.alice), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(
        error_message(&body),
        "You are not authorized to perform this operation!"
    );
}

#[tokio::test]
async fn test_unknown_bypass_user_is_anonymous() {
    let app = spawn_app().await;
    let (status, _, _) = app
        .send(Method::GET, "/me", Some(Uuid::new_v4()), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_me_reports_admin_flag() {
    let app = spawn_app().await;
    let (status, _, body) = app.send(Method::GET, "/me", Some(app.admin), None).await;
    assert_eq!(status, StatusCode::OK);
    let profile: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(profile["admin"], json!(true));
    assert_eq!(profile["id"], json!(app.admin.to_string()));
}

// --- Unsupported verbs ---

#[tokio::test]
async fn test_unsupported_verb_is_plain_text_403_for_admin() {
    let app = spawn_app().await;
    let (status, content_type, body) = app
        .send(Method::PUT, "/campsites", Some(app.admin), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(content_type.unwrap().starts_with("text/plain"));
    assert_eq!(
        String::from_utf8(body).unwrap(),
        "PUT operation not supported on /campsites"
    );
}

#[tokio::test]
async fn test_unsupported_verb_is_still_guarded() {
    let app = spawn_app().await;
    let id = Uuid::new_v4();
    let (status, _, _) = app
        .send(Method::POST, &format!("/partners/{id}"), None, None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

// --- Malformed input ---

#[tokio::test]
async fn test_incomplete_comment_body_is_400_error_body() {
    let app = spawn_app().await;
    let campsite = app.create_campsite("React Lake").await;

    let (status, content_type, body) = app
        .send(
            Method::POST,
            &format!("/campsites/{}/comments", campsite.id),
            Some(app.alice),
            Some(json!({"rating": 4})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(content_type.unwrap().starts_with("application/json"));
    let error: ErrorBody = serde_json::from_slice(&body).unwrap();
    assert_eq!(error.status, 400);
    assert!(error.message.contains("text"));
}

#[tokio::test]
async fn test_non_uuid_id_is_400_error_body() {
    let app = spawn_app().await;
    let (status, _, body) = app
        .send(Method::GET, "/campsites/not-a-uuid", None, None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let error: ErrorBody = serde_json::from_slice(&body).unwrap();
    assert_eq!(error.status, 400);
}

// --- Comments end to end ---

#[tokio::test]
async fn test_comment_ownership_over_http() {
    let app = spawn_app().await;
    let campsite = app.create_campsite("React Lake").await;
    let comments_uri = format!("/campsites/{}/comments", campsite.id);

    // Any author sent by the client is ignored.
    let (status, _, body) = app
        .send(
            Method::POST,
            &comments_uri,
            Some(app.alice),
            Some(json!({"rating": 5, "text": "Great", "author": app.bob})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let campsite: Campsite = serde_json::from_slice(&body).unwrap();
    let comment = &campsite.comments[0];
    assert_eq!(comment.author, app.alice);
    let comment_uri = format!("{comments_uri}/{}", comment.id);

    let (status, _, body) = app
        .send(
            Method::PUT,
            &comment_uri,
            Some(app.bob),
            Some(json!({"text": "Bad"})),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(error_message(&body), "You are not the authorized commenter");

    // Admin status does not grant ownership either.
    let (status, _, _) = app
        .send(Method::DELETE, &comment_uri, Some(app.admin), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _, body) = app.send(Method::GET, &comment_uri, None, None).await;
    assert_eq!(status, StatusCode::OK);
    let stored: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(stored["text"], json!("Great"));

    // The admin bulk purge does not consult ownership.
    let (status, _, body) = app
        .send(Method::DELETE, &comments_uri, Some(app.admin), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    let cleared: Campsite = serde_json::from_slice(&body).unwrap();
    assert!(cleared.comments.is_empty());
}

#[tokio::test]
async fn test_bulk_comment_purge_requires_admin() {
    let app = spawn_app().await;
    let campsite = app.create_campsite("React Lake").await;
    let (status, _, _) = app
        .send(
            Method::DELETE,
            &format!("/campsites/{}/comments", campsite.id),
            Some(app.alice),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

// --- Favorites end to end ---

#[tokio::test]
async fn test_favorites_over_http() {
    let app = spawn_app().await;
    let a = app.create_campsite("Alpha").await.id;
    let b = app.create_campsite("Bravo").await.id;

    let (status, _, _) = app.send(Method::GET, "/favorites", Some(app.bob), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    for _ in 0..2 {
        let (status, _, body) = app
            .send(Method::POST, &format!("/favorites/{a}"), Some(app.bob), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        let favorite: Favorite = serde_json::from_slice(&body).unwrap();
        assert_eq!(favorite.campsites, vec![a]);
    }

    let (status, _, body) = app
        .send(
            Method::POST,
            "/favorites",
            Some(app.bob),
            Some(json!([a, {"_id": b}, b])),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let favorite: Favorite = serde_json::from_slice(&body).unwrap();
    assert_eq!(favorite.campsites, vec![a, b]);

    let (status, _, body) = app
        .send(Method::DELETE, &format!("/favorites/{a}"), Some(app.bob), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    let favorite: Favorite = serde_json::from_slice(&body).unwrap();
    assert_eq!(favorite.campsites, vec![b]);

    // Another user's record is untouched by bob's calls.
    let (status, _, body) = app
        .send(Method::DELETE, &format!("/favorites/{b}"), Some(app.alice), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        String::from_utf8(body).unwrap(),
        "There are no favorites to delete from this user"
    );
}

#[tokio::test]
async fn test_favorites_require_authentication() {
    let app = spawn_app().await;
    let (status, _, _) = app
        .send(Method::POST, &format!("/favorites/{}", Uuid::new_v4()), None, None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

// --- Collection deletes ---

#[tokio::test]
async fn test_admin_collection_delete_returns_count() {
    let app = spawn_app().await;
    app.create_campsite("Alpha").await;
    app.create_campsite("Bravo").await;

    let (status, _, body) = app
        .send(Method::DELETE, "/campsites", Some(app.admin), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    let summary: DeleteSummary = serde_json::from_slice(&body).unwrap();
    assert_eq!(summary.deleted_count, 2);
}

// --- Error rendering ---

#[tokio::test]
async fn test_internal_error_detail_only_in_local() {
    let local = AppState {
        repo: Arc::new(InMemoryRepository::new_failing()),
        config: AppConfig::default(),
    };
    let response = create_router(local)
        .oneshot(Request::get("/campsites").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: ErrorBody = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body.message, "Internal Server Error");
    assert!(body.error.unwrap().contains("simulated storage failure"));

    let production = AppState {
        repo: Arc::new(InMemoryRepository::new_failing()),
        config: AppConfig {
            env: campsite_api::Env::Production,
            ..AppConfig::default()
        },
    };
    let response = create_router(production)
        .oneshot(Request::get("/campsites").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: ErrorBody = serde_json::from_slice(&bytes).unwrap();
    assert!(body.error.is_none());
}

#[tokio::test]
async fn test_request_id_is_propagated() {
    let app = spawn_app().await;
    let response = app
        .router
        .clone()
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert!(response.headers().contains_key("x-request-id"));
}

// --- Served over TCP ---

/// Binds the app to an ephemeral port, the way `main` serves it.
async fn serve(state: AppState) -> String {
    let router = create_router(state);
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind port");
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    format!("http://127.0.0.1:{port}")
}

#[tokio::test]
async fn test_campsite_lifecycle_over_tcp() {
    let repo = Arc::new(InMemoryRepository::new());
    let admin = seed_user(&repo, "admin", true).await;
    let address = serve(AppState {
        repo,
        config: AppConfig::default(),
    })
    .await;
    let client = reqwest::Client::new();

    let response = client
        .get(format!("{address}/health"))
        .send()
        .await
        .expect("req fail");
    assert!(response.status().is_success());

    let created: Campsite = client
        .post(format!("{address}/campsites"))
        .header("x-user-id", admin.to_string())
        .json(&json!({
            "name": "Chrome River",
            "description": "Campers love the river",
            "image": "images/chrome-river.jpg",
            "elevation": 877,
            "cost": 5500
        }))
        .send()
        .await
        .expect("req fail")
        .json()
        .await
        .expect("body should be a campsite");
    assert_eq!(created.name, "Chrome River");
    assert!(!created.featured);

    let response = client
        .delete(format!("{address}/campsites/{}", created.id))
        .send()
        .await
        .expect("req fail");
    assert_eq!(response.status().as_u16(), 401);

    let response = client
        .get(format!("{address}/campsites/{}", created.id))
        .send()
        .await
        .expect("req fail");
    assert_eq!(response.status().as_u16(), 200);
}
