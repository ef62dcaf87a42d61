use axum::Json;
use axum::extract::State;

use crate::AppState;
use crate::cart::{CartIdentity, CartService};
use crate::error::Result;
use crate::router::Message;

/// Handler to empty the cart. Succeeds even when there is none.
pub async fn handler(
    State(state): State<AppState>,
    identity: CartIdentity,
) -> Result<Json<Message>> {
    let service = CartService::new(state.db.postgres.clone());

    if let Some(mut cart) = service.resolve(&identity).await? {
        cart.clear();
        service.persist(&mut cart).await?;
    }

    Ok(Json(Message {
        message: "Cart cleared successfully",
    }))
}
