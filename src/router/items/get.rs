use axum::Json;
use axum::extract::{Path, State};

use crate::error::Result;
use crate::item::{Item, ItemRepository};
use crate::{AppState, ServerError};

/// Handler to read one item.
pub async fn handler(
    State(state): State<AppState>,
    Path(item_id): Path<String>,
) -> Result<Json<Item>> {
    let item_id = super::parse_item_id(&item_id)?;

    let item = ItemRepository::new(state.db.postgres.clone())
        .find_by_id(item_id)
        .await?
        .ok_or(ServerError::NotFound("Item not found"))?;

    Ok(Json(item))
}

#[cfg(test)]
pub(super) mod tests {
    use crate::*;
    use axum::http::{Method, StatusCode};
    use http_body_util::BodyExt;

    #[tokio::test]
    async fn invalid_id_is_not_found() {
        let app = app(router::state());

        let response =
            make_request(app, Method::GET, "/api/items/42", None, None, String::new()).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["message"], "Item not found");
    }
}
