use axum::{
    extract::{Path, Query},
    Json,
};
use serde_json::{json, Value};
use sqlx::{Postgres, QueryBuilder};

use crate::config;
use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::models::CommentModerationRow;
use crate::database::Repository;
use crate::error::ApiError;
use crate::handlers::comments::Comments;
use crate::middleware::AdminUser;
use crate::schemas::admin::{
    AdminArticleItem, AdminArticleList, AdminArticlesQuery, AdminCommentItem, AdminStats,
    BulkDeleteRequest, BulkDeleteResponse,
};
use crate::schemas::resolve_page;
use crate::services::stats;

/// GET /api/admin/stats - dashboard counters with 30-day trends
pub async fn get_stats(AdminUser(_admin): AdminUser) -> Result<Json<AdminStats>, ApiError> {
    let pool = DatabaseManager::pool().await?;
    let stats = stats::dashboard_stats(&pool).await?;
    Ok(Json(stats))
}

/// GET /api/admin/articles - any status, filtered and paginated
pub async fn list_articles(
    AdminUser(_admin): AdminUser,
    Query(query): Query<AdminArticlesQuery>,
) -> Result<Json<AdminArticleList>, ApiError> {
    let pagination = &config::config().pagination;
    let (skip, limit) = resolve_page(
        query.skip,
        query.limit,
        pagination.admin_default_limit,
        pagination.admin_max_limit,
    )?;

    let pool = DatabaseManager::pool().await?;

    let mut count_qb: QueryBuilder<Postgres> =
        QueryBuilder::new("SELECT COUNT(*) FROM articles a WHERE 1 = 1");
    push_article_filters(&mut count_qb, &query);
    let total: i64 = count_qb
        .build_query_scalar()
        .fetch_one(&pool)
        .await
        .map_err(DatabaseError::Sqlx)?;

    let mut qb: QueryBuilder<Postgres> = QueryBuilder::new(
        "SELECT a.id, a.title, COALESCE(u.full_name, u.username) AS author_name, \
                a.status, a.category, a.created_at, a.views \
         FROM articles a JOIN users u ON u.id = a.author_id WHERE 1 = 1",
    );
    push_article_filters(&mut qb, &query);
    qb.push(" ORDER BY a.created_at DESC OFFSET ")
        .push_bind(skip)
        .push(" LIMIT ")
        .push_bind(limit);

    let items = qb
        .build_query_as::<AdminArticleItem>()
        .fetch_all(&pool)
        .await
        .map_err(DatabaseError::Sqlx)?;

    Ok(Json(AdminArticleList { items, total }))
}

fn push_article_filters(qb: &mut QueryBuilder<'_, Postgres>, query: &AdminArticlesQuery) {
    if let Some(status) = query.status {
        qb.push(" AND a.status = ").push_bind(status);
    }
    if let Some(category) = &query.category {
        qb.push(" AND a.category = ").push_bind(category.clone());
    }
    if let Some(after) = query.created_after {
        qb.push(" AND a.created_at >= ").push_bind(after);
    }
    if let Some(before) = query.created_before {
        qb.push(" AND a.created_at <= ").push_bind(before);
    }
}

/// GET /api/admin/comments - every comment, newest first
pub async fn list_comments(AdminUser(_admin): AdminUser) -> Result<Json<Vec<AdminCommentItem>>, ApiError> {
    let pool = DatabaseManager::pool().await?;

    let rows = sqlx::query_as::<_, CommentModerationRow>(
        "SELECT c.*, a.title AS article_title, COALESCE(u.full_name, u.username) AS author_name \
         FROM comments c \
         JOIN articles a ON a.id = c.article_id \
         JOIN users u ON u.id = c.author_id \
         ORDER BY c.created_at DESC",
    )
    .fetch_all(&pool)
    .await
    .map_err(DatabaseError::Sqlx)?;

    Ok(Json(rows.into_iter().map(AdminCommentItem::from).collect()))
}

/// POST /api/admin/comments/:id/approve
pub async fn approve_comment(AdminUser(_admin): AdminUser, Path(id): Path<i64>) -> Result<Json<Value>, ApiError> {
    let pool = DatabaseManager::pool().await?;

    let result = sqlx::query("UPDATE comments SET is_approved = TRUE, updated_at = now() WHERE id = $1")
        .bind(id)
        .execute(&pool)
        .await
        .map_err(DatabaseError::Sqlx)?;

    if result.rows_affected() == 0 {
        return Err(ApiError::not_found("Comment not found"));
    }

    Ok(Json(json!({ "message": "Comment approved" })))
}

/// DELETE /api/admin/comments/:id
pub async fn delete_comment(AdminUser(_admin): AdminUser, Path(id): Path<i64>) -> Result<Json<Value>, ApiError> {
    let pool = DatabaseManager::pool().await?;
    Repository::<Comments>::delete(&pool, id).await?;
    Ok(Json(json!({ "message": "Comment deleted" })))
}

/// POST /api/admin/comments/bulk-delete - one set-based removal;
/// unknown ids are skipped, not an error
pub async fn bulk_delete_comments(
    AdminUser(_admin): AdminUser,
    Json(request): Json<BulkDeleteRequest>,
) -> Result<Json<BulkDeleteResponse>, ApiError> {
    let pool = DatabaseManager::pool().await?;

    let result = sqlx::query("DELETE FROM comments WHERE id = ANY($1)")
        .bind(&request.ids)
        .execute(&pool)
        .await
        .map_err(DatabaseError::Sqlx)?;

    Ok(Json(BulkDeleteResponse { deleted_count: result.rows_affected() }))
}

/// POST /api/admin/articles/bulk-delete
pub async fn bulk_delete_articles(
    AdminUser(_admin): AdminUser,
    Json(request): Json<BulkDeleteRequest>,
) -> Result<Json<BulkDeleteResponse>, ApiError> {
    let pool = DatabaseManager::pool().await?;

    let result = sqlx::query("DELETE FROM articles WHERE id = ANY($1)")
        .bind(&request.ids)
        .execute(&pool)
        .await
        .map_err(DatabaseError::Sqlx)?;

    tracing::info!("Bulk-deleted {} articles", result.rows_affected());
    Ok(Json(BulkDeleteResponse { deleted_count: result.rows_affected() }))
}
