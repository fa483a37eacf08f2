use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Comment {
    pub id: i64,
    pub content: String,
    pub article_id: i64,
    pub author_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub is_approved: bool,
}

/// Storage input for a new comment; the author comes from the
/// authenticated caller, not the request body.
#[derive(Debug, Clone)]
pub struct NewComment {
    pub content: String,
    pub article_id: i64,
    pub author_id: i64,
}

/// Comment row joined with its author's display name.
#[derive(Debug, Clone, FromRow)]
pub struct CommentWithAuthor {
    #[sqlx(flatten)]
    pub comment: Comment,
    pub author_name: Option<String>,
}

/// Moderation view: comment plus the article title and author name.
#[derive(Debug, Clone, FromRow)]
pub struct CommentModerationRow {
    #[sqlx(flatten)]
    pub comment: Comment,
    pub article_title: String,
    pub author_name: Option<String>,
}
