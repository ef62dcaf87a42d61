//! Error handler for mercato.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use sqlx::{postgres::PgDatabaseError, Error as SQLxError};
use thiserror::Error;
use validator::ValidationErrors;

pub type Result<T> = std::result::Result<T, ServerError>;

/// Enum representing server-side errors.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("validation error occurred")]
    Validation(#[from] ValidationErrors),

    #[error(transparent)]
    Axum(#[from] JsonRejection),

    #[error(transparent)]
    Query(#[from] QueryRejection),

    #[error("SQL request failed: {0}")]
    Sql(#[from] SQLxError),

    #[error("token rejected: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    #[error(transparent)]
    Crypto(#[from] crate::crypto::CryptoError),

    #[error("{0}")]
    Unauthorized(&'static str),

    #[error("admin privileges required")]
    Forbidden,

    #[error("{0}")]
    NotFound(&'static str),

    #[error("internal server error, {details}")]
    Internal { details: String },
}

/// Structure for error responses.
///
/// Every error leaves the API as `{ "message": ..., "error": ... }`,
/// with `error` only present when there is a detail worth returning.
#[derive(Debug, Serialize)]
pub struct ResponseError {
    #[serde(skip)]
    status: StatusCode,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl ResponseError {
    /// Update error status code.
    pub fn status(mut self, code: StatusCode) -> Self {
        self.status = code;
        self
    }

    /// Update `message` field.
    pub fn message(mut self, message: &str) -> Self {
        self.message = message.into();
        self
    }

    /// Add detailed error.
    pub fn details(mut self, description: &str) -> Self {
        self.error = Some(description.into());
        self
    }

    /// Flatten field violations into the `error` detail.
    pub fn errors(mut self, errors: &ValidationErrors) -> Self {
        self.error = Some(parse_validation_errors(errors));
        self
    }

    /// Transform [`ResponseError`] into axum [`Response`].
    pub fn into_response(self) -> std::result::Result<Response, axum::http::Error> {
        if let Ok(body) = serde_json::to_string(&self) {
            Response::builder()
                .status(self.status)
                .header(header::CONTENT_TYPE, "application/json")
                .body(body.into())
        } else {
            Ok(internal_server_error())
        }
    }
}

impl Default for ResponseError {
    fn default() -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: "Server error".to_owned(),
            error: None,
        }
    }
}

fn parse_validation_errors(errors: &ValidationErrors) -> String {
    errors
        .field_errors()
        .iter()
        .flat_map(|(field, issues)| issues.iter().map(move |issue| format!("{field}: {issue}")))
        .collect::<Vec<_>>()
        .join("; ")
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let response = ResponseError::default()
            .message("Validation error")
            .status(StatusCode::BAD_REQUEST);

        let response = match &self {
            ServerError::Validation(validation_errors) => response.errors(validation_errors),

            ServerError::Axum(rejection) => response.details(&rejection.body_text()),

            ServerError::Query(rejection) => response.details(&rejection.body_text()),

            ServerError::Sql(err) => {
                tracing::error!(%err, "database request failed");

                response
                    .message("Server error")
                    .status(StatusCode::INTERNAL_SERVER_ERROR)
                    .details(
                        err.as_database_error()
                            .and_then(|e| e.downcast_ref::<PgDatabaseError>().detail())
                            .unwrap_or(&err.to_string()),
                    )
            }

            ServerError::Token(_) => response
                .message("Invalid token")
                .status(StatusCode::UNAUTHORIZED),

            ServerError::Crypto(err) => {
                tracing::error!(%err, "password hashing failed");

                response
                    .message("Server error")
                    .status(StatusCode::INTERNAL_SERVER_ERROR)
                    .details(&err.to_string())
            }

            ServerError::Unauthorized(message) => response
                .message(message)
                .status(StatusCode::UNAUTHORIZED),

            ServerError::Forbidden => response
                .message("Access denied. Admin required.")
                .status(StatusCode::FORBIDDEN),

            ServerError::NotFound(message) => response
                .message(message)
                .status(StatusCode::NOT_FOUND),

            ServerError::Internal { details } => {
                tracing::error!(%details, "server returned 500 status");

                response
                    .message("Server error")
                    .status(StatusCode::INTERNAL_SERVER_ERROR)
                    .details(details)
            }
        };

        response
            .into_response()
            .unwrap_or_else(|_| internal_server_error())
    }
}

fn internal_server_error() -> Response {
    Response::builder()
        .status(StatusCode::INTERNAL_SERVER_ERROR)
        .header(header::CONTENT_TYPE, "application/json")
        .body(
            serde_json::json!({
                "message": "Server error",
            })
            .to_string()
            .into(),
        )
        .unwrap_or_else(|_| Response::new("Internal server error".into()))
}
