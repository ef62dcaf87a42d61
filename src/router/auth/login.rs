use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use validator::Validate;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::Result;
use crate::router::Valid;
use crate::user::{User, UserRepository};
use crate::{AppState, ServerError};

/// Body to sign into an account.
#[derive(Debug, Deserialize, Validate, Zeroize, ZeroizeOnDrop)]
pub struct Body {
    #[validate(email(message = "Email must be formatted."))]
    email: String,
    password: String,
}

#[derive(Debug, Serialize)]
pub struct Response {
    pub token: String,
    pub user: User,
}

/// Handler to exchange credentials for a token.
pub async fn handler(
    State(state): State<AppState>,
    Valid(body): Valid<Body>,
) -> Result<Json<Response>> {
    let user = UserRepository::new(state.db.postgres.clone())
        .find_by_email(&body.email.to_lowercase())
        .await?
        .ok_or(ServerError::Unauthorized("Invalid credentials"))?;

    state.crypto.verify_password(&body.password, &user.password)?;

    let token = state.token.create(user.id)?;

    Ok(Json(Response { token, user }))
}

#[cfg(test)]
pub(super) mod tests {
    use crate::*;
    use axum::http::{Method, StatusCode};
    use serde_json::json;

    #[tokio::test]
    async fn malformed_email_is_rejected() {
        let app = app(router::state());

        let response = make_request(
            app,
            Method::POST,
            "/api/auth/login",
            None,
            None,
            json!({ "email": "not-an-email", "password": "whatever" }).to_string(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn missing_body_is_rejected() {
        let app = app(router::state());

        let response = make_request(
            app,
            Method::POST,
            "/api/auth/login",
            None,
            None,
            String::new(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
