use axum::{
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, header, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use jsonwebtoken::{DecodingKey, Validation, decode, errors::ErrorKind};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    AppState,
    config::{AppConfig, Env},
    error::ApiError,
    policy::{Requirement, authorize},
    repository::Repository,
};

/// Claims
///
/// Payload of the bearer tokens issued by the identity provider.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user's id in the `users` table.
    pub sub: Uuid,
    pub exp: usize,
    pub iat: usize,
}

/// Principal
///
/// The authenticated caller of a request. Immutable once resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub id: Uuid,
    pub admin: bool,
}

/// ResolvedPrincipal
///
/// Request extension written by `resolve_principal_middleware`. `None` means
/// the request carried no usable credential.
#[derive(Debug, Clone, Default)]
pub struct ResolvedPrincipal(pub Option<Principal>);

/// resolve_principal
///
/// Turns request headers into a principal. Order of attempts:
/// 1. `Env::Local` only: an `x-user-id` header naming an existing user.
/// 2. `Authorization: Bearer <jwt>` signed with the configured secret.
///
/// Malformed, expired or unknown credentials resolve to `None`; only a
/// persistence failure during the user lookup is an error.
pub async fn resolve_principal(
    headers: &HeaderMap,
    repo: &dyn Repository,
    config: &AppConfig,
) -> Result<Option<Principal>, ApiError> {
    if config.env == Env::Local {
        let bypass_id = headers
            .get("x-user-id")
            .and_then(|value| value.to_str().ok())
            .and_then(|raw| Uuid::parse_str(raw).ok());

        if let Some(user_id) = bypass_id {
            if let Some(user) = repo.get_user(user_id).await? {
                return Ok(Some(Principal {
                    id: user.id,
                    admin: user.admin,
                }));
            }
        }
    }

    let Some(token) = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
    else {
        return Ok(None);
    };

    let decoding_key = DecodingKey::from_secret(config.jwt_secret.as_bytes());
    let mut validation = Validation::default();
    validation.validate_exp = true;

    let claims = match decode::<Claims>(token, &decoding_key, &validation) {
        Ok(data) => data.claims,
        Err(e) => {
            match e.kind() {
                ErrorKind::ExpiredSignature => tracing::debug!("rejected expired token"),
                kind => tracing::debug!("rejected token: {:?}", kind),
            }
            return Ok(None);
        }
    };

    // A valid token for a deleted account grants nothing.
    let principal = repo.get_user(claims.sub).await?.map(|user| Principal {
        id: user.id,
        admin: user.admin,
    });

    Ok(principal)
}

/// resolve_principal_middleware
///
/// Runs for every request and stores the outcome as a `ResolvedPrincipal`
/// extension. It never rejects on its own; the guard extractors do.
pub async fn resolve_principal_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let resolved = resolve_principal(request.headers(), state.repo.as_ref(), &state.config).await;
    match resolved {
        Ok(principal) => {
            request.extensions_mut().insert(ResolvedPrincipal(principal));
            next.run(request).await
        }
        Err(e) => e.into_response(),
    }
}

fn guard(parts: &Parts, requirement: Requirement) -> Result<Principal, ApiError> {
    let principal = parts
        .extensions
        .get::<ResolvedPrincipal>()
        .and_then(|resolved| resolved.0.as_ref());

    authorize(principal, requirement)?;

    // authorize only allows when a principal is present
    principal.cloned().ok_or(ApiError::Unauthenticated)
}

/// Authenticated
///
/// Extractor for routes declaring `Requirement::Authenticated`. Rejects with
/// 401 before the handler (and before any body extraction) runs.
#[derive(Debug, Clone)]
pub struct Authenticated(pub Principal);

impl<S> FromRequestParts<S> for Authenticated
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        guard(parts, Requirement::Authenticated).map(Authenticated)
    }
}

/// Admin
///
/// Extractor for routes declaring `Requirement::Admin`: 401 when anonymous,
/// 403 when the principal is not an admin.
#[derive(Debug, Clone)]
pub struct Admin(pub Principal);

impl<S> FromRequestParts<S> for Admin
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        guard(parts, Requirement::Admin).map(Admin)
    }
}
