//! Decide which cart owner a request acts for.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use uuid::Uuid;

use crate::ServerError;
use crate::middleware::{MaybeUser, SESSION_HEADER};

/// Cart owner derived from the request, in strict precedence order:
/// authenticated user first, then guest session, then nobody.
#[derive(Clone, Debug, PartialEq)]
pub enum CartIdentity {
    /// Authenticated account. The session id (when sent) is kept so a
    /// guest cart started before login can be claimed.
    User {
        id: Uuid,
        session_id: Option<String>,
    },
    /// Guest identified only by the `Session-Id` header.
    Guest { session_id: String },
    /// No credentials at all.
    Anonymous,
}

impl CartIdentity {
    pub fn resolve(user_id: Option<Uuid>, session_id: Option<String>) -> Self {
        match (user_id, session_id) {
            (Some(id), session_id) => Self::User { id, session_id },
            (None, Some(session_id)) => Self::Guest { session_id },
            (None, None) => Self::Anonymous,
        }
    }
}

impl<S> FromRequestParts<S> for CartIdentity
where
    S: Send + Sync,
{
    type Rejection = ServerError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let MaybeUser(user) =
            parts
                .extensions
                .get::<MaybeUser>()
                .cloned()
                .ok_or(ServerError::Internal {
                    details: "cart routes need the optional_auth layer".to_owned(),
                })?;

        let session_id = parts
            .headers
            .get(SESSION_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|session| !session.is_empty())
            .map(ToOwned::to_owned);

        Ok(Self::resolve(user.map(|user| user.id), session_id))
    }
}
