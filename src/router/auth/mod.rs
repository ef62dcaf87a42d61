//! Account HTTP API.

mod login;
mod me;
mod register;

use axum::routing::{get, post};
use axum::{Router, middleware};

use crate::AppState;

/// Create account router.
pub fn router(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        // `GET /me` goes to `me`. Authorization required.
        .route("/me", get(me::handler))
        .route_layer(middleware::from_fn_with_state(
            state,
            crate::middleware::require_auth,
        ));

    Router::new()
        // `POST /register` goes to `register`.
        .route("/register", post(register::handler))
        // `POST /login` goes to `login`.
        .route("/login", post(login::handler))
        .merge(protected)
}
