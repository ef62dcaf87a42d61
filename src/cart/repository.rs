//! Handle database requests for carts.

use sqlx::types::Json;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::cart::Cart;
use crate::error::Result;

#[derive(Clone)]
pub struct CartRepository {
    pool: Pool<Postgres>,
}

impl CartRepository {
    /// Create a new [`CartRepository`].
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Find the cart owned by an account.
    pub async fn find_by_user(&self, user_id: Uuid) -> Result<Option<Cart>> {
        Ok(
            sqlx::query_as::<_, Cart>("SELECT * FROM carts WHERE user_id = $1")
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    /// Find the cart owned by a guest session.
    pub async fn find_by_session(&self, session_id: &str) -> Result<Option<Cart>> {
        Ok(
            sqlx::query_as::<_, Cart>("SELECT * FROM carts WHERE session_id = $1")
                .bind(session_id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    /// Insert or overwrite a cart, refreshing `updated_at`.
    pub async fn save(&self, cart: &Cart) -> Result<()> {
        sqlx::query(
            r#"INSERT INTO carts (id, user_id, session_id, items, total_amount, created_at, updated_at)
                VALUES ($1, $2, $3, $4, $5, $6, NOW())
                ON CONFLICT (id) DO UPDATE
                SET user_id = EXCLUDED.user_id,
                    session_id = EXCLUDED.session_id,
                    items = EXCLUDED.items,
                    total_amount = EXCLUDED.total_amount,
                    updated_at = NOW()"#,
        )
        .bind(cart.id)
        .bind(cart.user_id)
        .bind(cart.session_id.clone())
        .bind(Json(&cart.items))
        .bind(cart.total_amount)
        .bind(cart.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
