//! Middlewares for routes.

use axum::Extension;
use axum::extract::{Request, State};
use axum::http::{HeaderMap, header};
use axum::middleware::Next;
use axum::response::Response;
use uuid::Uuid;

use crate::error::Result;
use crate::user::{User, UserRepository};
use crate::{AppState, ServerError};

const BEARER: &str = "Bearer ";

/// Header carrying the guest session id.
pub const SESSION_HEADER: &str = "session-id";

/// Outcome of [`optional_auth`], inserted on every request it passes.
#[derive(Clone, Debug)]
pub struct MaybeUser(pub Option<User>);

/// Load the account behind the `Authorization` header.
///
/// Takes the headers alone: the request body is not `Sync`, and holding
/// the whole request across the account lookup would make the guard
/// futures unspawnable.
async fn identify(state: &AppState, headers: &HeaderMap) -> Result<User> {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .ok_or(ServerError::Unauthorized("Access denied. No token provided."))?;
    let token = token.replace(BEARER, "");

    let claims = state.token.decode(&token)?;
    let user_id = Uuid::parse_str(&claims.sub)
        .map_err(|_| ServerError::Unauthorized("Invalid token"))?;

    UserRepository::new(state.db.postgres.clone())
        .find_by_id(user_id)
        .await?
        .ok_or(ServerError::Unauthorized("Invalid token. User not found."))
}

/// Custom middleware for authentification. Rejects with 401 unless a
/// valid token maps to an existing account.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response> {
    let user = identify(&state, req.headers()).await?;
    req.extensions_mut().insert(user);

    Ok(next.run(req).await)
}

/// Authentication that never fails: a missing or broken token simply
/// leaves the request without an account.
pub async fn optional_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response> {
    let user = identify(&state, req.headers()).await.ok();
    req.extensions_mut().insert(MaybeUser(user));

    Ok(next.run(req).await)
}

/// Restrict a route to admin accounts. Layer after [`require_auth`].
pub async fn require_admin(
    Extension(user): Extension<User>,
    req: Request,
    next: Next,
) -> Result<Response> {
    if !user.is_admin {
        return Err(ServerError::Forbidden);
    }

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use crate::*;
    use axum::http::{Method, StatusCode};

    // Spawning only compiles while the guard futures are Send.
    #[tokio::test]
    async fn guards_run_from_a_spawned_task() {
        let handle = tokio::spawn(async {
            let app = app(router::state());
            make_request(app, Method::GET, "/api/auth/me", None, None, String::new()).await
        });

        let response = handle.await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
