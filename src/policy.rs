//! Authorization decisions.
//!
//! Two independent checks live here. `authorize` is the role gate applied to
//! every route that declares a `Requirement`. `may_mutate` is the ownership
//! test for comments; admin status plays no part in it.

use uuid::Uuid;

use crate::auth::Principal;

/// The capability a route demands before its handler runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    Authenticated,
    Admin,
}

/// Why `authorize` refused a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Denial {
    NotAuthenticated,
    NotAdmin,
}

/// authorize
///
/// Pure decision over the resolved principal (if any). `Admin` implies
/// `Authenticated`, so an anonymous caller is always `NotAuthenticated`.
pub fn authorize(principal: Option<&Principal>, requirement: Requirement) -> Result<(), Denial> {
    let principal = principal.ok_or(Denial::NotAuthenticated)?;

    match requirement {
        Requirement::Authenticated => Ok(()),
        Requirement::Admin if principal.admin => Ok(()),
        Requirement::Admin => Err(Denial::NotAdmin),
    }
}

/// may_mutate
///
/// True iff `principal` is the author. Identity comparison only.
pub fn may_mutate(principal: &Principal, author: Uuid) -> bool {
    principal.id == author
}
