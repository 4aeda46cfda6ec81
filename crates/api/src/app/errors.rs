use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use orderdesk_core::RepositoryError;

/// Map a repository failure onto the HTTP surface.
///
/// Validation failures land in the client-error class and persistence
/// failures in the server-error class; the two must never collapse into
/// one status.
pub fn repository_error_to_response(err: RepositoryError) -> axum::response::Response {
    match err {
        RepositoryError::OrderNotFound(id) => json_error(
            StatusCode::NOT_FOUND,
            "not_found",
            format!("order {id} was not found"),
        ),
        RepositoryError::InvalidArgument(msg) => {
            json_error(StatusCode::BAD_REQUEST, "invalid_argument", msg)
        }
        RepositoryError::Validation(msg) => {
            json_error(StatusCode::UNPROCESSABLE_ENTITY, "validation_error", msg)
        }
        RepositoryError::Persistence(cause) => json_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "persistence_error",
            format!("{cause:#}"),
        ),
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
