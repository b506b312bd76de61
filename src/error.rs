use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use serde_json::json;

use crate::config::Environment;

pub type Result<T> = std::result::Result<T, Error>;

pub const UPDATE_FIELDS_REQUIRED: &str =
    "Request body must contain either 'title', 'url', 'description' or 'rating'";

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Unauthorized request")]
    Unauthorized,

    #[error("Missing '{0}' in request body")]
    MissingField(&'static str),

    #[error("Request body must contain either 'title', 'url', 'description' or 'rating'")]
    EmptyUpdate,

    #[error("{0}")]
    InvalidInput(String),

    #[error("Bookmark doesn't exist")]
    BookmarkNotFound,

    #[error("database error: {0}")]
    Database(#[from] libsql::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: ErrorMessage,
}

#[derive(Debug, Serialize)]
pub struct ErrorMessage {
    pub message: String,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        ErrorBody {
            error: ErrorMessage {
                message: message.into(),
            },
        }
    }
}

/// Real cause of a 500 response, attached as a response extension so the
/// process-wide handler can log it and decide what the client gets to see.
#[derive(Debug, Clone)]
pub struct ServerFault(pub String);

impl Error {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::Unauthorized => StatusCode::UNAUTHORIZED,
            Error::MissingField(_) | Error::EmptyUpdate | Error::InvalidInput(_) => {
                StatusCode::BAD_REQUEST
            }
            Error::BookmarkNotFound => StatusCode::NOT_FOUND,
            Error::Database(_) | Error::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.to_string();

        match self {
            Error::Unauthorized => {
                (status, axum::Json(json!({ "error": message }))).into_response()
            }
            Error::Database(_) | Error::Internal(_) => {
                let mut response = (
                    status,
                    axum::Json(json!({ "message": message, "error": { "message": message } })),
                )
                    .into_response();
                response.extensions_mut().insert(ServerFault(message));
                response
            }
            _ => (status, axum::Json(ErrorBody::new(message))).into_response(),
        }
    }
}

/// Process-wide handler for server faults.
///
/// Every fault is logged. Outside production the real error stays in the
/// body; in production it is replaced with a generic message.
pub async fn handle_server_errors(
    State(environment): State<Environment>,
    request: Request,
    next: Next,
) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    let response = next.run(request).await;

    let Some(ServerFault(fault)) = response.extensions().get::<ServerFault>().cloned() else {
        return response;
    };

    tracing::error!(%method, %path, error = %fault, "request failed with server error");

    if environment.is_production() {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            axum::Json(ErrorBody::new("server error")),
        )
            .into_response();
    }

    response
}
