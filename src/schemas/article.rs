use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::database::models::{Article, ArticleStatus, ArticleWithAuthor};
use crate::error::ApiError;

use super::{finish_validation, require};

#[derive(Debug, Clone, Deserialize)]
pub struct ArticleCreate {
    pub title: String,
    pub excerpt: Option<String>,
    pub content: String,
    pub cover_image: Option<String>,
    pub category: Option<String>,
    #[serde(default = "default_reading_time")]
    pub reading_time: i32,
}

fn default_reading_time() -> i32 {
    5
}

impl ArticleCreate {
    pub fn validate(&self) -> Result<(), ApiError> {
        let mut errors = HashMap::new();
        require("title", &self.title, &mut errors);
        require("content", &self.content, &mut errors);
        if self.reading_time < 1 {
            errors.insert("reading_time".to_string(), "must be at least 1 minute".to_string());
        }
        finish_validation("Invalid article payload", errors)
    }
}

/// Partial update; absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ArticleUpdate {
    pub title: Option<String>,
    pub excerpt: Option<String>,
    pub content: Option<String>,
    pub cover_image: Option<String>,
    pub category: Option<String>,
    pub status: Option<ArticleStatus>,
    pub reading_time: Option<i32>,
}

impl ArticleUpdate {
    pub fn validate(&self) -> Result<(), ApiError> {
        let mut errors = HashMap::new();
        if let Some(title) = &self.title {
            require("title", title, &mut errors);
        }
        if let Some(content) = &self.content {
            require("content", content, &mut errors);
        }
        if matches!(self.reading_time, Some(rt) if rt < 1) {
            errors.insert("reading_time".to_string(), "must be at least 1 minute".to_string());
        }
        finish_validation("Invalid article payload", errors)
    }

    pub fn has_changes(&self) -> bool {
        self.title.is_some()
            || self.excerpt.is_some()
            || self.content.is_some()
            || self.cover_image.is_some()
            || self.category.is_some()
            || self.status.is_some()
            || self.reading_time.is_some()
    }
}

#[derive(Debug, Serialize)]
pub struct ArticleResponse {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub excerpt: Option<String>,
    pub content: String,
    pub cover_image: Option<String>,
    pub category: Option<String>,
    pub status: ArticleStatus,
    pub reading_time: i32,
    pub author_id: i64,
    pub author_name: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub views: i64,
}

impl ArticleResponse {
    pub fn new(article: Article, author_name: Option<String>) -> Self {
        Self {
            id: article.id,
            title: article.title,
            slug: article.slug,
            excerpt: article.excerpt,
            content: article.content,
            cover_image: article.cover_image,
            category: article.category,
            status: article.status,
            reading_time: article.reading_time,
            author_id: article.author_id,
            author_name,
            published_at: article.published_at,
            created_at: article.created_at,
            updated_at: article.updated_at,
            views: article.views,
        }
    }
}

impl From<ArticleWithAuthor> for ArticleResponse {
    fn from(row: ArticleWithAuthor) -> Self {
        Self::new(row.article, row.author_name)
    }
}

#[derive(Debug, Deserialize)]
pub struct ListArticlesQuery {
    pub skip: Option<i64>,
    pub limit: Option<i64>,
    pub status: Option<ArticleStatus>,
    pub category: Option<String>,
}
