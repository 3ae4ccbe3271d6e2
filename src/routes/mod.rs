/// Router Module Index
///
/// Routes are grouped by the guard they declare. Each handler also enforces
/// its own requirement through the `Authenticated` / `Admin` extractors, so
/// a route placed in the wrong tier still cannot skip its check.

/// Reads anyone may perform. No guard runs on these.
pub mod public;

/// Mutations that need a resolved principal: comments and favorites.
pub mod authenticated;

/// Catalogue management and bulk destructive operations, plus the
/// structurally unsupported verbs (which are admin-gated before answering 403).
pub mod admin;
