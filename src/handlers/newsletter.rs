use axum::Json;
use serde_json::{json, Value};

use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::models::Newsletter;
use crate::error::ApiError;
use crate::schemas::newsletter::{NewsletterResponse, NewsletterSubscribe};

/// POST /api/newsletter/subscribe - subscribe (or re-activate) an email
pub async fn subscribe(Json(input): Json<NewsletterSubscribe>) -> Result<Json<NewsletterResponse>, ApiError> {
    input.validate()?;

    let pool = DatabaseManager::pool().await?;

    // Re-subscribing a known address re-activates it in place
    let subscription = sqlx::query_as::<_, Newsletter>(
        "INSERT INTO newsletter (email) VALUES ($1) \
         ON CONFLICT (email) DO UPDATE SET is_active = TRUE \
         RETURNING *",
    )
    .bind(input.email.trim())
    .fetch_one(&pool)
    .await
    .map_err(DatabaseError::Sqlx)?;

    Ok(Json(subscription.into()))
}

/// POST /api/newsletter/unsubscribe
pub async fn unsubscribe(Json(input): Json<NewsletterSubscribe>) -> Result<Json<Value>, ApiError> {
    input.validate()?;

    let pool = DatabaseManager::pool().await?;

    let result = sqlx::query("UPDATE newsletter SET is_active = FALSE WHERE email = $1")
        .bind(input.email.trim())
        .execute(&pool)
        .await
        .map_err(DatabaseError::Sqlx)?;

    if result.rows_affected() == 0 {
        return Err(ApiError::not_found("Subscription not found"));
    }

    Ok(Json(json!({ "message": "Unsubscribed successfully" })))
}
