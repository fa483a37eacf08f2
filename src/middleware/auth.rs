use axum::{
    extract::FromRequestParts,
    http::{request::Parts, HeaderMap},
};

use crate::auth;
use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::models::User;
use crate::error::ApiError;

/// Caller with a valid bearer token. Resolving the guard loads the user row,
/// so handlers get the current admin flag, not the one at token issue time.
#[derive(Clone, Debug)]
pub struct CurrentUser(pub User);

/// Caller with a valid bearer token and the admin flag set.
#[derive(Clone, Debug)]
pub struct AdminUser(pub User);

#[axum::async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let token = extract_bearer_token(&parts.headers)?;

        let claims = auth::verify_token(&token)
            .map_err(|_| ApiError::unauthorized("Invalid or expired token"))?;

        let pool = DatabaseManager::pool().await.map_err(ApiError::from)?;
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = $1")
            .bind(&claims.sub)
            .fetch_optional(&pool)
            .await
            .map_err(|e| ApiError::from(DatabaseError::Sqlx(e)))?
            .ok_or_else(|| ApiError::unauthorized("Could not validate credentials"))?;

        Ok(CurrentUser(user))
    }
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for AdminUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let CurrentUser(user) = CurrentUser::from_request_parts(parts, state).await?;

        if !user.is_admin {
            return Err(ApiError::forbidden("Admin privileges required"));
        }

        Ok(AdminUser(user))
    }
}

/// Extract the token from an `Authorization: Bearer <token>` header
fn extract_bearer_token(headers: &HeaderMap) -> Result<String, ApiError> {
    let auth_header = headers
        .get("authorization")
        .ok_or_else(|| ApiError::unauthorized("Missing Authorization header"))?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| ApiError::unauthorized("Invalid Authorization header format"))?;

    if let Some(token) = auth_str.strip_prefix("Bearer ") {
        if token.trim().is_empty() {
            return Err(ApiError::unauthorized("Empty bearer token"));
        }
        Ok(token.to_string())
    } else {
        Err(ApiError::unauthorized("Authorization header must use Bearer token format"))
    }
}
