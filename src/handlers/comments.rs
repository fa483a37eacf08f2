use axum::{extract::Path, http::StatusCode, Json};
use sqlx::query_builder::Separated;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::models::{Comment, CommentWithAuthor, NewComment};
use crate::database::repository::{CrudResource, Repository};
use crate::error::ApiError;
use crate::middleware::CurrentUser;
use crate::schemas::comment::{CommentCreate, CommentResponse};

/// Façade binding for the comments table. Comments are never partially
/// updated through the API; moderation flips flags with dedicated queries.
pub struct Comments;

impl CrudResource for Comments {
    type Record = Comment;
    type Create = NewComment;
    type Update = ();

    const TABLE: &'static str = "comments";
    const RESOURCE: &'static str = "Comment";

    fn bind_insert(qb: &mut QueryBuilder<'_, Postgres>, input: &NewComment) {
        qb.push("(content, article_id, author_id) VALUES (");
        let mut vals = qb.separated(", ");
        vals.push_bind(input.content.clone());
        vals.push_bind(input.article_id);
        vals.push_bind(input.author_id);
        vals.push_unseparated(")");
    }

    fn bind_update(_sets: &mut Separated<'_, '_, Postgres, &'static str>, _input: &()) {}

    fn has_changes(_input: &()) -> bool {
        false
    }
}

pub(crate) async fn article_exists(pool: &PgPool, article_id: i64) -> Result<bool, DatabaseError> {
    let exists = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM articles WHERE id = $1)")
        .bind(article_id)
        .fetch_one(pool)
        .await?;
    Ok(exists)
}

/// GET /api/articles/:id/comments - approved comments, oldest first
pub async fn list_for_article(Path(article_id): Path<i64>) -> Result<Json<Vec<CommentResponse>>, ApiError> {
    let pool = DatabaseManager::pool().await?;

    if !article_exists(&pool, article_id).await? {
        return Err(ApiError::not_found("Article not found"));
    }

    let rows = sqlx::query_as::<_, CommentWithAuthor>(
        "SELECT c.*, COALESCE(u.full_name, u.username) AS author_name \
         FROM comments c JOIN users u ON u.id = c.author_id \
         WHERE c.article_id = $1 AND c.is_approved \
         ORDER BY c.created_at",
    )
    .bind(article_id)
    .fetch_all(&pool)
    .await
    .map_err(DatabaseError::Sqlx)?;

    Ok(Json(rows.into_iter().map(CommentResponse::from).collect()))
}

/// POST /api/comments - leave a comment; held for moderation
pub async fn create(
    CurrentUser(user): CurrentUser,
    Json(input): Json<CommentCreate>,
) -> Result<(StatusCode, Json<CommentResponse>), ApiError> {
    input.validate()?;

    let pool = DatabaseManager::pool().await?;

    if !article_exists(&pool, input.article_id).await? {
        return Err(ApiError::not_found("Article not found"));
    }

    let new_comment = NewComment {
        content: input.content,
        article_id: input.article_id,
        author_id: user.id,
    };
    let comment = Repository::<Comments>::insert(&pool, &new_comment).await?;

    let author_name = Some(user.display_name().to_string());
    Ok((StatusCode::CREATED, Json(CommentResponse::new(comment, author_name))))
}
