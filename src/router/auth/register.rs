use axum::http::StatusCode;
use axum::{Json, extract::State};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::AppState;
use crate::error::Result;
use crate::router::Valid;
use crate::user::{User, UserRepository};

/// Body to create an account.
#[derive(Debug, Deserialize, Validate, Zeroize, ZeroizeOnDrop)]
pub struct Body {
    #[validate(length(
        min = 2,
        max = 50,
        message = "Username must be 2 to 50 characters long."
    ))]
    username: String,
    #[validate(email(message = "Email must be formatted."))]
    email: String,
    #[validate(length(
        min = 8,
        max = 255,
        message = "Password must contain at least 8 characters."
    ))]
    password: String,
}

#[derive(Debug, Serialize)]
pub struct Response {
    pub token: String,
    pub user: User,
}

/// Handler to create an account and sign its first token.
pub async fn handler(
    State(state): State<AppState>,
    Valid(body): Valid<Body>,
) -> Result<(StatusCode, Json<Response>)> {
    let user = User {
        id: Uuid::new_v4(),
        username: body.username.clone(),
        email: body.email.to_lowercase(),
        password: state.crypto.hash_password(&body.password)?,
        is_admin: false,
        created_at: Utc::now(),
    };

    UserRepository::new(state.db.postgres.clone())
        .insert(&user)
        .await?;

    let token = state.token.create(user.id)?;

    Ok((StatusCode::CREATED, Json(Response { token, user })))
}

#[cfg(test)]
pub(super) mod tests {
    use crate::*;
    use axum::http::{Method, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::json;

    #[tokio::test]
    async fn malformed_email_is_rejected() {
        let app = app(router::state());

        let response = make_request(
            app,
            Method::POST,
            "/api/auth/register",
            None,
            None,
            json!({
                "username": "marie",
                "email": "not-an-email",
                "password": "long enough secret"
            })
            .to_string(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["message"], "Validation error");
        assert!(
            body["error"]
                .as_str()
                .unwrap()
                .contains("Email must be formatted.")
        );
    }

    #[tokio::test]
    async fn short_password_is_rejected() {
        let app = app(router::state());

        let response = make_request(
            app,
            Method::POST,
            "/api/auth/register",
            None,
            None,
            json!({
                "username": "marie",
                "email": "marie@example.org",
                "password": "short"
            })
            .to_string(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert!(
            body["error"]
                .as_str()
                .unwrap()
                .contains("Password must contain at least 8 characters.")
        );
    }
}
