use campsite_api::{
    auth::Principal,
    policy::{Denial, Requirement, authorize, may_mutate},
};
use uuid::Uuid;

fn principal(admin: bool) -> Principal {
    Principal {
        id: Uuid::new_v4(),
        admin,
    }
}

// --- authorize ---

#[test]
fn test_anonymous_is_never_authorized() {
    assert_eq!(
        authorize(None, Requirement::Authenticated),
        Err(Denial::NotAuthenticated)
    );
    // Admin implies Authenticated, so an anonymous caller gets 401 rather than 403.
    assert_eq!(
        authorize(None, Requirement::Admin),
        Err(Denial::NotAuthenticated)
    );
}

#[test]
fn test_authenticated_requirement_ignores_admin_flag() {
    assert!(authorize(Some(&principal(false)), Requirement::Authenticated).is_ok());
    assert!(authorize(Some(&principal(true)), Requirement::Authenticated).is_ok());
}

#[test]
fn test_admin_requirement() {
    assert_eq!(
        authorize(Some(&principal(false)), Requirement::Admin),
        Err(Denial::NotAdmin)
    );
    assert!(authorize(Some(&principal(true)), Requirement::Admin).is_ok());
}

// --- may_mutate ---

#[test]
fn test_author_may_mutate_own_comment() {
    let user = principal(false);
    assert!(may_mutate(&user, user.id));
}

#[test]
fn test_admin_gets_no_ownership_bypass() {
    let admin = principal(true);
    assert!(!may_mutate(&admin, Uuid::new_v4()));
}

#[test]
fn test_ownership_is_identity_only() {
    let user = principal(false);
    // Same id, different admin flag: still the same author.
    let elevated = Principal {
        id: user.id,
        admin: true,
    };
    assert!(may_mutate(&elevated, user.id));
    assert!(!may_mutate(&principal(false), user.id));
}
