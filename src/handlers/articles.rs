use axum::{
    extract::{Path, Query},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use sqlx::{Postgres, QueryBuilder};

use crate::config;
use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::models::{Article, ArticleStatus, ArticleWithAuthor};
use crate::error::ApiError;
use crate::middleware::{AdminUser, CurrentUser};
use crate::schemas::article::{ArticleCreate, ArticleResponse, ArticleUpdate, ListArticlesQuery};
use crate::schemas::resolve_page;
use crate::slug;

/// GET /api/articles - list articles; anonymous callers only see published
/// ones unless an explicit status filter is supplied
pub async fn list(Query(query): Query<ListArticlesQuery>) -> Result<Json<Vec<ArticleResponse>>, ApiError> {
    let pagination = &config::config().pagination;
    let (skip, limit) = resolve_page(
        query.skip,
        query.limit,
        pagination.article_default_limit,
        pagination.article_max_limit,
    )?;

    let pool = DatabaseManager::pool().await?;

    let mut qb = QueryBuilder::new(
        "SELECT a.*, COALESCE(u.full_name, u.username) AS author_name \
         FROM articles a JOIN users u ON u.id = a.author_id WHERE a.status = ",
    );
    qb.push_bind(query.status.unwrap_or(ArticleStatus::Published));
    if let Some(category) = &query.category {
        qb.push(" AND a.category = ").push_bind(category.clone());
    }
    qb.push(" ORDER BY a.published_at DESC NULLS LAST OFFSET ")
        .push_bind(skip)
        .push(" LIMIT ")
        .push_bind(limit);

    let rows = qb
        .build_query_as::<ArticleWithAuthor>()
        .fetch_all(&pool)
        .await
        .map_err(DatabaseError::Sqlx)?;

    Ok(Json(rows.into_iter().map(ArticleResponse::from).collect()))
}

// Reading a single article bumps its view counter in the same statement,
// so the increment is durable before the response is built.
const FETCH_BY_ID: &str = "WITH bumped AS ( \
     UPDATE articles SET views = views + 1 WHERE id = $1 RETURNING * \
 ) SELECT b.*, COALESCE(u.full_name, u.username) AS author_name \
   FROM bumped b JOIN users u ON u.id = b.author_id";

const FETCH_BY_SLUG: &str = "WITH bumped AS ( \
     UPDATE articles SET views = views + 1 WHERE slug = $1 RETURNING * \
 ) SELECT b.*, COALESCE(u.full_name, u.username) AS author_name \
   FROM bumped b JOIN users u ON u.id = b.author_id";

/// GET /api/articles/:id - single article; side effect: views + 1
pub async fn get(Path(id): Path<i64>) -> Result<Json<ArticleResponse>, ApiError> {
    let pool = DatabaseManager::pool().await?;

    let row = sqlx::query_as::<_, ArticleWithAuthor>(FETCH_BY_ID)
        .bind(id)
        .fetch_optional(&pool)
        .await
        .map_err(DatabaseError::Sqlx)?
        .ok_or_else(|| ApiError::not_found("Article not found"))?;

    Ok(Json(row.into()))
}

/// GET /api/articles/slug/:slug - single article by slug; side effect: views + 1
pub async fn get_by_slug(Path(slug): Path<String>) -> Result<Json<ArticleResponse>, ApiError> {
    let pool = DatabaseManager::pool().await?;

    let row = sqlx::query_as::<_, ArticleWithAuthor>(FETCH_BY_SLUG)
        .bind(&slug)
        .fetch_optional(&pool)
        .await
        .map_err(DatabaseError::Sqlx)?
        .ok_or_else(|| ApiError::not_found("Article not found"))?;

    Ok(Json(row.into()))
}

/// POST /api/articles - create a draft owned by the caller
pub async fn create(
    CurrentUser(user): CurrentUser,
    Json(input): Json<ArticleCreate>,
) -> Result<(StatusCode, Json<ArticleResponse>), ApiError> {
    input.validate()?;

    let pool = DatabaseManager::pool().await?;
    let mut tx = pool.begin().await.map_err(DatabaseError::Sqlx)?;

    let slug = slug::ensure_unique_slug(&mut *tx, slug::slugify(&input.title))
        .await
        .map_err(DatabaseError::Sqlx)?;

    let article = sqlx::query_as::<_, Article>(
        "INSERT INTO articles \
         (title, slug, excerpt, content, cover_image, category, status, reading_time, author_id) \
         VALUES ($1, $2, $3, $4, $5, $6, 'draft', $7, $8) RETURNING *",
    )
    .bind(&input.title)
    .bind(&slug)
    .bind(&input.excerpt)
    .bind(&input.content)
    .bind(&input.cover_image)
    .bind(&input.category)
    .bind(input.reading_time)
    .bind(user.id)
    .fetch_one(&mut *tx)
    .await
    .map_err(DatabaseError::Sqlx)?;

    tx.commit().await.map_err(DatabaseError::Sqlx)?;

    let author_name = Some(user.display_name().to_string());
    Ok((StatusCode::CREATED, Json(ArticleResponse::new(article, author_name))))
}

/// PUT /api/articles/:id - partial update by the author or an admin
pub async fn update(
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
    Json(input): Json<ArticleUpdate>,
) -> Result<Json<ArticleResponse>, ApiError> {
    input.validate()?;

    let pool = DatabaseManager::pool().await?;
    let mut tx = pool.begin().await.map_err(DatabaseError::Sqlx)?;

    let article = sqlx::query_as::<_, Article>("SELECT * FROM articles WHERE id = $1 FOR UPDATE")
        .bind(id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(DatabaseError::Sqlx)?
        .ok_or_else(|| ApiError::not_found("Article not found"))?;

    if article.author_id != user.id && !user.is_admin {
        return Err(ApiError::forbidden("Not authorized to modify this article"));
    }

    let updated = if input.has_changes() {
        // The first transition into "published" stamps the publish time;
        // later updates never re-stamp it.
        let stamp_published =
            input.status == Some(ArticleStatus::Published) && article.published_at.is_none();

        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new("UPDATE articles SET ");
        {
            let mut sets = qb.separated(", ");
            if let Some(title) = &input.title {
                sets.push("title = ").push_bind_unseparated(title.clone());
            }
            if let Some(excerpt) = &input.excerpt {
                sets.push("excerpt = ").push_bind_unseparated(excerpt.clone());
            }
            if let Some(content) = &input.content {
                sets.push("content = ").push_bind_unseparated(content.clone());
            }
            if let Some(cover_image) = &input.cover_image {
                sets.push("cover_image = ").push_bind_unseparated(cover_image.clone());
            }
            if let Some(category) = &input.category {
                sets.push("category = ").push_bind_unseparated(category.clone());
            }
            if let Some(status) = input.status {
                sets.push("status = ").push_bind_unseparated(status);
            }
            if let Some(reading_time) = input.reading_time {
                sets.push("reading_time = ").push_bind_unseparated(reading_time);
            }
            if stamp_published {
                sets.push("published_at = now()");
            }
            sets.push("updated_at = now()");
        }
        qb.push(" WHERE id = ").push_bind(id).push(" RETURNING *");

        qb.build_query_as::<Article>()
            .fetch_one(&mut *tx)
            .await
            .map_err(DatabaseError::Sqlx)?
    } else {
        article
    };

    let author_name: Option<String> =
        sqlx::query_scalar("SELECT COALESCE(full_name, username) FROM users WHERE id = $1")
            .bind(updated.author_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(DatabaseError::Sqlx)?;

    tx.commit().await.map_err(DatabaseError::Sqlx)?;

    Ok(Json(ArticleResponse::new(updated, author_name)))
}

/// DELETE /api/articles/:id - admin only
pub async fn delete(AdminUser(_admin): AdminUser, Path(id): Path<i64>) -> Result<Json<Value>, ApiError> {
    let pool = DatabaseManager::pool().await?;

    let result = sqlx::query("DELETE FROM articles WHERE id = $1")
        .bind(id)
        .execute(&pool)
        .await
        .map_err(DatabaseError::Sqlx)?;

    if result.rows_affected() == 0 {
        return Err(ApiError::not_found("Article not found"));
    }

    Ok(Json(json!({ "message": "Article deleted successfully" })))
}
