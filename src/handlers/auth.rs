use axum::{extract::Form, http::StatusCode, Json};

use crate::auth;
use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::models::User;
use crate::error::ApiError;
use crate::middleware::CurrentUser;
use crate::schemas::user::{LoginForm, Token, UserCreate, UserResponse};

/// POST /api/auth/register - create a new account
pub async fn register(
    Json(input): Json<UserCreate>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    input.validate()?;

    let hashed = auth::hash_password(&input.password).map_err(|e| {
        tracing::error!("Password hashing failed: {}", e);
        ApiError::internal_server_error("Failed to process registration")
    })?;

    let pool = DatabaseManager::pool().await?;
    let user = sqlx::query_as::<_, User>(
        "INSERT INTO users (username, email, hashed_password, full_name) \
         VALUES ($1, $2, $3, $4) RETURNING *",
    )
    .bind(input.username.trim())
    .bind(input.email.trim())
    .bind(&hashed)
    .bind(&input.full_name)
    .fetch_one(&pool)
    .await
    .map_err(|e| match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            ApiError::conflict("Username or email is already registered")
        }
        _ => ApiError::from(DatabaseError::Sqlx(e)),
    })?;

    tracing::info!("Registered user {}", user.username);
    Ok((StatusCode::CREATED, Json(user.into())))
}

/// POST /api/auth/token - exchange credentials for a bearer token.
/// The rejection message never reveals which part was wrong.
pub async fn token(Form(form): Form<LoginForm>) -> Result<Json<Token>, ApiError> {
    let pool = DatabaseManager::pool().await?;

    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = $1")
        .bind(form.username.trim())
        .fetch_optional(&pool)
        .await
        .map_err(DatabaseError::Sqlx)?;

    let verified = match &user {
        Some(user) => auth::verify_password(&form.password, &user.hashed_password),
        None => false,
    };
    let Some(user) = user.filter(|_| verified) else {
        return Err(ApiError::unauthorized("Incorrect username or password"));
    };

    let access_token = auth::generate_token(&user.username).map_err(|e| {
        tracing::error!("Token generation failed: {}", e);
        ApiError::internal_server_error("Failed to issue token")
    })?;

    Ok(Json(Token::bearer(access_token)))
}

/// GET /api/auth/me - the caller's own account
pub async fn me(CurrentUser(user): CurrentUser) -> Json<UserResponse> {
    Json(user.into())
}
