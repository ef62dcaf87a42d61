use axum::Json;
use axum::extract::{Path, State};
use uuid::Uuid;

use super::Response;
use crate::cart::{CartIdentity, CartService};
use crate::error::Result;
use crate::{AppState, ServerError};

/// Handler to drop a line. An id that is in nobody's cart, or not even
/// a UUID, leaves the cart as it was.
pub async fn handler(
    State(state): State<AppState>,
    identity: CartIdentity,
    Path(item_id): Path<String>,
) -> Result<Json<Response>> {
    let service = CartService::new(state.db.postgres.clone());

    let mut cart = service
        .resolve(&identity)
        .await?
        .ok_or(ServerError::NotFound("Cart not found"))?;

    if let Ok(item_id) = Uuid::parse_str(&item_id) {
        cart.remove_line(item_id);
    }

    let catalog = service.persist(&mut cart).await?;

    Ok(Json(Response::expanded(cart, &catalog)))
}

#[cfg(test)]
pub(super) mod tests {
    use crate::*;
    use axum::http::{Method, StatusCode};

    #[tokio::test]
    async fn anonymous_caller_has_no_cart_to_remove_from() {
        let app = app(router::state());

        let response = make_request(
            app,
            Method::DELETE,
            "/api/cart/remove/4cd8d93a-8a3f-4968-9d9b-7e318a69e7c8",
            None,
            None,
            String::new(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
