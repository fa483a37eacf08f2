use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::database::models::{ArticleStatus, CommentModerationRow};

/// Dashboard counters with 30-day trend percentages.
#[derive(Debug, Serialize)]
pub struct AdminStats {
    pub total_views: i64,
    pub total_spots: i64,
    pub total_subscribers: i64,
    pub pending_comments: i64,
    pub views_trend: f64,
    pub spots_trend: f64,
    pub subscribers_trend: f64,
    pub comments_trend: f64,
}

#[derive(Debug, Deserialize)]
pub struct AdminArticlesQuery {
    pub skip: Option<i64>,
    pub limit: Option<i64>,
    pub status: Option<ArticleStatus>,
    pub category: Option<String>,
    pub created_after: Option<DateTime<Utc>>,
    pub created_before: Option<DateTime<Utc>>,
}

/// Listing projection for the dashboard table; queried directly in this shape.
#[derive(Debug, Serialize, FromRow)]
pub struct AdminArticleItem {
    pub id: i64,
    pub title: String,
    pub author_name: Option<String>,
    pub status: ArticleStatus,
    pub category: Option<String>,
    pub created_at: DateTime<Utc>,
    pub views: i64,
}

#[derive(Debug, Serialize)]
pub struct AdminArticleList {
    pub items: Vec<AdminArticleItem>,
    pub total: i64,
}

#[derive(Debug, Serialize)]
pub struct AdminCommentItem {
    pub id: i64,
    pub content: String,
    pub article_id: i64,
    pub article_title: String,
    pub author_name: Option<String>,
    pub is_approved: bool,
    pub created_at: DateTime<Utc>,
}

impl From<CommentModerationRow> for AdminCommentItem {
    fn from(row: CommentModerationRow) -> Self {
        Self {
            id: row.comment.id,
            content: row.comment.content,
            article_id: row.comment.article_id,
            article_title: row.article_title,
            author_name: row.author_name,
            is_approved: row.comment.is_approved,
            created_at: row.comment.created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct BulkDeleteRequest {
    pub ids: Vec<i64>,
}

#[derive(Debug, Serialize)]
pub struct BulkDeleteResponse {
    pub deleted_count: u64,
}
