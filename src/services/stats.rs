use sqlx::PgPool;

use crate::database::manager::DatabaseError;
use crate::schemas::admin::AdminStats;

/// Trailing window length for dashboard trend comparisons
const TREND_WINDOW_DAYS: i32 = 30;

/// Percentage change of `current` against `previous`; zero when there is no
/// previous baseline (avoids division by zero).
pub fn trend(current: f64, previous: f64) -> f64 {
    if previous == 0.0 {
        0.0
    } else {
        (current - previous) / previous * 100.0
    }
}

/// Dashboard counters plus 30-day-window trends for each of them.
pub async fn dashboard_stats(pool: &PgPool) -> Result<AdminStats, DatabaseError> {
    let total_views: i64 =
        sqlx::query_scalar("SELECT COALESCE(SUM(views), 0)::BIGINT FROM articles")
            .fetch_one(pool)
            .await?;
    let total_spots: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM spots")
        .fetch_one(pool)
        .await?;
    let total_subscribers: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM newsletter WHERE is_active")
            .fetch_one(pool)
            .await?;
    let pending_comments: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM comments WHERE NOT is_approved")
            .fetch_one(pool)
            .await?;

    let (views_now, views_prev) = windowed(
        pool,
        "SELECT \
           COALESCE(SUM(views) FILTER (WHERE created_at >= now() - make_interval(days => $1)), 0)::BIGINT, \
           COALESCE(SUM(views) FILTER (WHERE created_at >= now() - make_interval(days => $1 * 2) \
                                         AND created_at <  now() - make_interval(days => $1)), 0)::BIGINT \
         FROM articles",
    )
    .await?;

    let (spots_now, spots_prev) = windowed(
        pool,
        "SELECT \
           COUNT(*) FILTER (WHERE created_at >= now() - make_interval(days => $1)), \
           COUNT(*) FILTER (WHERE created_at >= now() - make_interval(days => $1 * 2) \
                              AND created_at <  now() - make_interval(days => $1)) \
         FROM spots",
    )
    .await?;

    let (subscribers_now, subscribers_prev) = windowed(
        pool,
        "SELECT \
           COUNT(*) FILTER (WHERE subscribed_at >= now() - make_interval(days => $1)), \
           COUNT(*) FILTER (WHERE subscribed_at >= now() - make_interval(days => $1 * 2) \
                              AND subscribed_at <  now() - make_interval(days => $1)) \
         FROM newsletter WHERE is_active",
    )
    .await?;

    let (comments_now, comments_prev) = windowed(
        pool,
        "SELECT \
           COUNT(*) FILTER (WHERE created_at >= now() - make_interval(days => $1)), \
           COUNT(*) FILTER (WHERE created_at >= now() - make_interval(days => $1 * 2) \
                              AND created_at <  now() - make_interval(days => $1)) \
         FROM comments WHERE NOT is_approved",
    )
    .await?;

    Ok(AdminStats {
        total_views,
        total_spots,
        total_subscribers,
        pending_comments,
        views_trend: trend(views_now as f64, views_prev as f64),
        spots_trend: trend(spots_now as f64, spots_prev as f64),
        subscribers_trend: trend(subscribers_now as f64, subscribers_prev as f64),
        comments_trend: trend(comments_now as f64, comments_prev as f64),
    })
}

async fn windowed(pool: &PgPool, sql: &str) -> Result<(i64, i64), DatabaseError> {
    Ok(sqlx::query_as::<_, (i64, i64)>(sql)
        .bind(TREND_WINDOW_DAYS)
        .fetch_one(pool)
        .await?)
}
