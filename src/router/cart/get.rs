use axum::Json;
use axum::extract::State;

use super::Response;
use crate::AppState;
use crate::cart::{CartIdentity, CartService};
use crate::error::Result;

/// Handler to read the current cart; anonymous callers get an empty one.
pub async fn handler(
    State(state): State<AppState>,
    identity: CartIdentity,
) -> Result<Json<Response>> {
    let service = CartService::new(state.db.postgres.clone());

    match service.resolve(&identity).await? {
        Some(cart) => {
            let catalog = service.expansion(&cart).await?;
            Ok(Json(Response::expanded(cart, &catalog)))
        }
        None => Ok(Json(Response::empty())),
    }
}
