mod repository;

pub use repository::*;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// User as saved on database.
#[derive(Clone, Debug, PartialEq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    #[serde(skip)]
    pub password: String,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}
