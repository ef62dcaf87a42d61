use axum::Json;
use axum::extract::{Path, State};

use crate::error::Result;
use crate::item::ItemRepository;
use crate::router::Message;
use crate::{AppState, ServerError};

/// Handler to delete an item. Admin only.
pub async fn handler(
    State(state): State<AppState>,
    Path(item_id): Path<String>,
) -> Result<Json<Message>> {
    let item_id = super::parse_item_id(&item_id)?;

    let deleted = ItemRepository::new(state.db.postgres.clone())
        .delete(item_id)
        .await?;
    if !deleted {
        return Err(ServerError::NotFound("Item not found"));
    }

    Ok(Json(Message {
        message: "Item deleted successfully",
    }))
}
