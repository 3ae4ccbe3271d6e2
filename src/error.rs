use axum::{
    Json,
    extract::{Request, State},
    http::{StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use crate::{
    config::{AppConfig, Env},
    policy::Denial,
};

/// PersistenceError
///
/// Failures raised by a `Repository` implementation. Everything except a
/// uniqueness conflict is opaque to callers and surfaces as a 500.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("{0}")]
    Conflict(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

impl PersistenceError {
    /// Maps a Postgres unique violation (SQLSTATE 23505) to `Conflict`,
    /// keeping every other driver error as-is.
    pub fn from_write(entity: &str, err: sqlx::Error) -> Self {
        let is_unique_violation = err
            .as_database_error()
            .is_some_and(|db| db.is_unique_violation());

        if is_unique_violation {
            PersistenceError::Conflict(format!("{entity} with this name already exists"))
        } else {
            PersistenceError::Database(err)
        }
    }
}

/// ApiError
///
/// Every failure a handler can produce. Converted into an HTTP response by the
/// `IntoResponse` impl below, so handlers just use `?`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("You are not authenticated!")]
    Unauthenticated,

    #[error("You are not authorized to perform this operation!")]
    Unauthorized,

    #[error("You are not the authorized commenter")]
    NotAuthorizedCommenter,

    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: String },

    #[error("{0}")]
    UnsupportedOperation(String),

    #[error("{0}")]
    Invalid(String),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

impl ApiError {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        ApiError::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthenticated => StatusCode::UNAUTHORIZED,
            ApiError::Unauthorized
            | ApiError::NotAuthorizedCommenter
            | ApiError::UnsupportedOperation(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Invalid(_) => StatusCode::BAD_REQUEST,
            ApiError::Persistence(PersistenceError::Conflict(_)) => StatusCode::CONFLICT,
            ApiError::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<Denial> for ApiError {
    fn from(denial: Denial) -> Self {
        match denial {
            Denial::NotAuthenticated => ApiError::Unauthenticated,
            Denial::NotAdmin => ApiError::Unauthorized,
        }
    }
}

/// ErrorBody
///
/// The JSON shape of every error response except unsupported verbs, which
/// answer in plain text.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub status: u16,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Detail of an internal failure, attached to the response so that
/// `render_internal_errors` can decide whether the client may see it.
#[derive(Debug, Clone)]
pub struct ErrorDetail(pub String);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        match self {
            ApiError::UnsupportedOperation(message) => {
                (status, [(header::CONTENT_TYPE, "text/plain")], message).into_response()
            }
            ApiError::Persistence(PersistenceError::Conflict(message)) => (
                status,
                Json(ErrorBody {
                    status: status.as_u16(),
                    message,
                    error: None,
                }),
            )
                .into_response(),
            ApiError::Persistence(err) => {
                tracing::error!("persistence failure: {:?}", err);
                let mut response = (
                    status,
                    Json(ErrorBody {
                        status: status.as_u16(),
                        message: "Internal Server Error".to_string(),
                        error: None,
                    }),
                )
                    .into_response();
                response.extensions_mut().insert(ErrorDetail(err.to_string()));
                response
            }
            other => {
                if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
                    tracing::warn!(%status, "request denied: {}", other);
                }
                (
                    status,
                    Json(ErrorBody {
                        status: status.as_u16(),
                        message: other.to_string(),
                        error: None,
                    }),
                )
                    .into_response()
            }
        }
    }
}

/// render_internal_errors
///
/// The centralized error renderer. 500 responses carry a generic message; in
/// `Env::Local` the underlying failure is copied into the `error` field.
pub async fn render_internal_errors(
    State(config): State<AppConfig>,
    request: Request,
    next: Next,
) -> Response {
    let response = next.run(request).await;

    if config.env != Env::Local {
        return response;
    }

    let Some(ErrorDetail(detail)) = response.extensions().get::<ErrorDetail>().cloned() else {
        return response;
    };

    let status = response.status();
    (
        status,
        Json(ErrorBody {
            status: status.as_u16(),
            message: "Internal Server Error".to_string(),
            error: Some(detail),
        }),
    )
        .into_response()
}
