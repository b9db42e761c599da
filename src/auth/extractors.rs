use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use tracing::warn;
use uuid::Uuid;

use crate::auth::jwt::JwtKeys;
use crate::auth::repo::User;
use crate::error::ApiError;
use crate::state::AppState;

/// The gate in front of every protected route: extracts the bearer token,
/// verifies it, and yields the authenticated user's id.
#[derive(Debug)]
pub struct AuthUser(pub Uuid);

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let keys = JwtKeys::from_ref(state);
        let token = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .ok_or_else(|| ApiError::Unauthorized("Not authorized, token missing".into()))?;

        let claims = keys.verify(token).map_err(|e| {
            warn!(error = %e, "token verification failed");
            ApiError::Unauthorized("Not authorized, token invalid".into())
        })?;

        Ok(AuthUser(claims.sub))
    }
}

/// [`AuthUser`] plus a best-effort fetch of the user row. The fetch may fail
/// (user deleted after token issuance, transient store error); callers may
/// only rely on `id` being present.
#[derive(Debug)]
pub struct CurrentUser {
    pub id: Uuid,
    pub user: Option<User>,
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let AuthUser(id) = AuthUser::from_request_parts(parts, state).await?;
        let user = match User::find_by_id(&state.db, id).await {
            Ok(u) => u,
            Err(e) => {
                warn!(error = %e, user_id = %id, "could not hydrate user record");
                None
            }
        };
        Ok(CurrentUser { id, user })
    }
}
