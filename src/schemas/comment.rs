use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::database::models::{Comment, CommentWithAuthor};
use crate::error::ApiError;

use super::{finish_validation, require};

#[derive(Debug, Clone, Deserialize)]
pub struct CommentCreate {
    pub content: String,
    pub article_id: i64,
}

impl CommentCreate {
    pub fn validate(&self) -> Result<(), ApiError> {
        let mut errors = HashMap::new();
        require("content", &self.content, &mut errors);
        if self.article_id < 1 {
            errors.insert("article_id".to_string(), "must be a valid article id".to_string());
        }
        finish_validation("Invalid comment payload", errors)
    }
}

#[derive(Debug, Serialize)]
pub struct CommentResponse {
    pub id: i64,
    pub content: String,
    pub article_id: i64,
    pub author_id: i64,
    pub author_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub is_approved: bool,
}

impl CommentResponse {
    pub fn new(comment: Comment, author_name: Option<String>) -> Self {
        Self {
            id: comment.id,
            content: comment.content,
            article_id: comment.article_id,
            author_id: comment.author_id,
            author_name,
            created_at: comment.created_at,
            is_approved: comment.is_approved,
        }
    }
}

impl From<CommentWithAuthor> for CommentResponse {
    fn from(row: CommentWithAuthor) -> Self {
        Self::new(row.comment, row.author_name)
    }
}
