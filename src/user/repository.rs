//! Handle database requests.

use sqlx::{Pool, Postgres};
use uuid::Uuid;
use validator::{ValidationError, ValidationErrors};

use crate::error::Result;
use crate::user::User;

#[derive(Clone)]
pub struct UserRepository {
    pool: Pool<Postgres>,
}

impl UserRepository {
    /// Create a new [`UserRepository`].
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Insert [`User`] into database.
    ///
    /// A taken email is reported as a field violation on `email`.
    pub async fn insert(&self, user: &User) -> Result<()> {
        let result = sqlx::query(
            r#"INSERT INTO users (id, username, email, password, is_admin, created_at)
                VALUES ($1, $2, $3, $4, $5, $6)
                ON CONFLICT (email) DO NOTHING"#,
        )
        .bind(user.id)
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password)
        .bind(user.is_admin)
        .bind(user.created_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() != 1 {
            return Err(email_taken().into());
        }

        Ok(())
    }

    /// Find a user using `id` field.
    pub async fn find_by_id(&self, user_id: Uuid) -> Result<Option<User>> {
        let query = get_by_field_query(Field::Id);

        Ok(sqlx::query_as::<_, User>(&query)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?)
    }

    /// Find a user using `email` field.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let query = get_by_field_query(Field::Email);

        Ok(sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?)
    }
}

#[derive(Debug, Clone)]
enum Field {
    Id,
    Email,
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Field::Id => write!(f, "id"),
            Field::Email => write!(f, "email"),
        }
    }
}

fn get_by_field_query(field: Field) -> String {
    format!("SELECT * FROM users WHERE {field} = $1")
}

fn email_taken() -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    errors.add(
        "email",
        ValidationError::new("email_taken").with_message("Email is already registered.".into()),
    );
    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn find_queries_target_the_right_column() {
        assert_eq!(
            get_by_field_query(Field::Id),
            "SELECT * FROM users WHERE id = $1"
        );
        assert_eq!(
            get_by_field_query(Field::Email),
            "SELECT * FROM users WHERE email = $1"
        );
    }

    #[test]
    fn email_taken_is_a_field_violation() {
        let errors = email_taken();
        assert!(errors.field_errors().contains_key("email"));
    }
}
