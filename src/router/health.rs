//! `/health` route.

use axum::Json;
use axum::extract::State;
use serde::Serialize;

use crate::AppState;

#[derive(Debug, Serialize)]
pub struct Health {
    status: &'static str,
    message: &'static str,
    name: String,
    version: &'static str,
}

/// Handler to check service readiness.
pub async fn handler(State(state): State<AppState>) -> Json<Health> {
    Json(Health {
        status: "ok",
        message: "Backend is running 🚀",
        name: state.config.name.clone(),
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[cfg(test)]
pub(super) mod tests {
    use crate::*;
    use axum::http::{Method, StatusCode};
    use http_body_util::BodyExt;

    #[tokio::test]
    async fn health_answers_without_any_backend() {
        let app = app(router::state());

        let response = make_request(app, Method::GET, "/health", None, None, String::new()).await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["status"], "ok");
        assert_eq!(body["message"], "Backend is running 🚀");
        assert_eq!(body["name"], "mercato");
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    }
}
