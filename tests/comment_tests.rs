use campsite_api::{
    auth::Principal,
    comments,
    error::ApiError,
    models::{Comment, CreateCampsiteRequest, CreateCommentRequest, UpdateCommentRequest},
    repository::{InMemoryRepository, Repository},
};
use chrono::Utc;
use uuid::Uuid;

// --- Helpers ---

fn user() -> Principal {
    Principal {
        id: Uuid::new_v4(),
        admin: false,
    }
}

fn admin() -> Principal {
    Principal {
        id: Uuid::new_v4(),
        admin: true,
    }
}

fn comment_by(author: Uuid, text: &str) -> Comment {
    let now = Utc::now();
    Comment {
        id: Uuid::new_v4(),
        rating: 4,
        text: text.to_string(),
        author,
        created_at: now,
        updated_at: now,
    }
}

fn review(rating: i32, text: &str) -> CreateCommentRequest {
    CreateCommentRequest {
        rating,
        text: text.to_string(),
    }
}

async fn seeded_campsite(repo: &InMemoryRepository) -> Uuid {
    repo.create_campsite(CreateCampsiteRequest {
        name: "React Lake Campground".to_string(),
        description: "Nestled in the foothills".to_string(),
        image: "images/react-lake.jpg".to_string(),
        elevation: 1233,
        cost: 6500,
        featured: false,
    })
    .await
    .unwrap()
    .id
}

// --- Pure sequence operations ---

#[test]
fn test_compose_stamps_author_from_principal() {
    let author = user();
    let comment = comments::compose(&author, review(5, "Great"), Utc::now());
    assert_eq!(comment.author, author.id);
    assert_eq!(comment.rating, 5);
    assert_eq!(comment.created_at, comment.updated_at);
}

#[test]
fn test_revise_replaces_in_place_and_keeps_order() {
    let author = user();
    let mut thread = vec![
        comment_by(Uuid::new_v4(), "first"),
        comment_by(author.id, "second"),
        comment_by(Uuid::new_v4(), "third"),
    ];
    let target = thread[1].id;

    comments::revise(
        &mut thread,
        &author,
        target,
        UpdateCommentRequest {
            rating: None,
            text: Some("edited".to_string()),
        },
        Utc::now(),
    )
    .unwrap();

    let texts: Vec<&str> = thread.iter().map(|c| c.text.as_str()).collect();
    assert_eq!(texts, vec!["first", "edited", "third"]);
    assert_eq!(thread[1].id, target);
    assert_eq!(thread[1].author, author.id);
    // Rating untouched when absent from the request.
    assert_eq!(thread[1].rating, 4);
}

#[test]
fn test_revise_rejects_non_author_without_change() {
    let owner = Uuid::new_v4();
    let mut thread = vec![comment_by(owner, "mine")];
    let before = thread.clone();

    let result = comments::revise(
        &mut thread,
        &admin(),
        before[0].id,
        UpdateCommentRequest {
            rating: Some(1),
            text: None,
        },
        Utc::now(),
    );

    assert!(matches!(result, Err(ApiError::NotAuthorizedCommenter)));
    assert_eq!(thread, before);
}

#[test]
fn test_remove_keeps_relative_order() {
    let author = user();
    let mut thread = vec![
        comment_by(Uuid::new_v4(), "a"),
        comment_by(author.id, "b"),
        comment_by(Uuid::new_v4(), "c"),
        comment_by(Uuid::new_v4(), "d"),
    ];
    let target = thread[1].id;

    let removed = comments::remove(&mut thread, &author, target).unwrap();

    assert_eq!(removed.text, "b");
    let texts: Vec<&str> = thread.iter().map(|c| c.text.as_str()).collect();
    assert_eq!(texts, vec!["a", "c", "d"]);
}

#[test]
fn test_remove_unknown_comment_is_not_found() {
    let mut thread = vec![comment_by(Uuid::new_v4(), "a")];
    let result = comments::remove(&mut thread, &user(), Uuid::new_v4());
    assert!(matches!(
        result,
        Err(ApiError::NotFound {
            entity: "Comment",
            ..
        })
    ));
    assert_eq!(thread.len(), 1);
}

// --- Services over a repository ---

#[tokio::test]
async fn test_comment_lifecycle_scenario() {
    let repo = InMemoryRepository::new();
    let campsite_id = seeded_campsite(&repo).await;
    let alice = user();
    let bob = user();

    let campsite = comments::add_comment(&repo, &alice, campsite_id, review(5, "Great"))
        .await
        .unwrap();
    assert_eq!(campsite.comments.len(), 1);
    let comment_id = campsite.comments[0].id;
    assert_eq!(campsite.comments[0].author, alice.id);

    // Another user cannot edit it.
    let denied = comments::update_comment(
        &repo,
        &bob,
        campsite_id,
        comment_id,
        UpdateCommentRequest {
            rating: None,
            text: Some("Bad".to_string()),
        },
    )
    .await;
    assert!(matches!(denied, Err(ApiError::NotAuthorizedCommenter)));

    // Stored comment unchanged.
    let stored = comments::get_comment(&repo, campsite_id, comment_id)
        .await
        .unwrap();
    assert_eq!(stored.text, "Great");

    // The author can.
    let updated = comments::update_comment(
        &repo,
        &alice,
        campsite_id,
        comment_id,
        UpdateCommentRequest {
            rating: Some(4),
            text: None,
        },
    )
    .await
    .unwrap();
    assert_eq!(updated.comments[0].rating, 4);
    assert_eq!(updated.comments[0].text, "Great");

    let after_delete = comments::delete_comment(&repo, &alice, campsite_id, comment_id)
        .await
        .unwrap();
    assert!(after_delete.comments.is_empty());
}

#[tokio::test]
async fn test_admin_cannot_delete_someone_elses_comment() {
    let repo = InMemoryRepository::new();
    let campsite_id = seeded_campsite(&repo).await;
    let author = user();

    let campsite = comments::add_comment(&repo, &author, campsite_id, review(3, "Okay"))
        .await
        .unwrap();
    let comment_id = campsite.comments[0].id;

    let result = comments::delete_comment(&repo, &admin(), campsite_id, comment_id).await;
    assert!(matches!(result, Err(ApiError::NotAuthorizedCommenter)));

    let remaining = comments::list_comments(&repo, campsite_id).await.unwrap();
    assert_eq!(remaining.len(), 1);
}

#[tokio::test]
async fn test_admin_bulk_delete_ignores_ownership() {
    let repo = InMemoryRepository::new();
    let campsite_id = seeded_campsite(&repo).await;

    for (i, author) in [user(), user(), user()].iter().enumerate() {
        comments::add_comment(&repo, author, campsite_id, review(5, &format!("note {i}")))
            .await
            .unwrap();
    }

    let campsite = comments::delete_all_comments(&repo, campsite_id)
        .await
        .unwrap();
    assert!(campsite.comments.is_empty());
    assert_eq!(campsite.name, "React Lake Campground");
}

#[tokio::test]
async fn test_comments_keep_posting_order_through_deletes() {
    let repo = InMemoryRepository::new();
    let campsite_id = seeded_campsite(&repo).await;
    let author = user();

    let mut ids = Vec::new();
    for text in ["one", "two", "three", "four"] {
        let campsite = comments::add_comment(&repo, &author, campsite_id, review(4, text))
            .await
            .unwrap();
        ids.push(campsite.comments.last().unwrap().id);
    }

    comments::delete_comment(&repo, &author, campsite_id, ids[2])
        .await
        .unwrap();

    let texts: Vec<String> = comments::list_comments(&repo, campsite_id)
        .await
        .unwrap()
        .into_iter()
        .map(|c| c.text)
        .collect();
    assert_eq!(texts, vec!["one", "two", "four"]);
}

#[tokio::test]
async fn test_comment_on_missing_campsite_is_not_found() {
    let repo = InMemoryRepository::new();
    let result = comments::add_comment(&repo, &user(), Uuid::new_v4(), review(5, "Hello")).await;
    assert!(matches!(
        result,
        Err(ApiError::NotFound {
            entity: "Campsite",
            ..
        })
    ));
}

#[tokio::test]
async fn test_out_of_range_rating_is_rejected_before_lookup() {
    let repo = InMemoryRepository::new();
    // The campsite does not exist; validation must fail first.
    let result = comments::add_comment(&repo, &user(), Uuid::new_v4(), review(6, "Too good")).await;
    assert!(matches!(result, Err(ApiError::Invalid(_))));
}

#[tokio::test]
async fn test_update_unknown_comment_is_not_found() {
    let repo = InMemoryRepository::new();
    let campsite_id = seeded_campsite(&repo).await;

    let result = comments::update_comment(
        &repo,
        &user(),
        campsite_id,
        Uuid::new_v4(),
        UpdateCommentRequest::default(),
    )
    .await;
    assert!(matches!(
        result,
        Err(ApiError::NotFound {
            entity: "Comment",
            ..
        })
    ));
}
