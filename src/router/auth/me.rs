use axum::{Extension, Json};

use crate::user::User;

/// Handler to return the authenticated account.
pub async fn handler(Extension(user): Extension<User>) -> Json<User> {
    Json(user)
}

#[cfg(test)]
pub(super) mod tests {
    use crate::*;
    use axum::http::{Method, StatusCode};
    use http_body_util::BodyExt;

    #[tokio::test]
    async fn missing_token_is_unauthorized() {
        let app = app(router::state());

        let response =
            make_request(app, Method::GET, "/api/auth/me", None, None, String::new()).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["message"], "Access denied. No token provided.");
    }

    #[tokio::test]
    async fn garbage_token_is_unauthorized() {
        let app = app(router::state());

        let response = make_request(
            app,
            Method::GET,
            "/api/auth/me",
            Some("garbage.token.value"),
            None,
            String::new(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["message"], "Invalid token");
    }
}
