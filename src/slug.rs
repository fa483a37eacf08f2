use chrono::Utc;
use sqlx::PgConnection;

/// Derive a URL-safe slug from an article title: lowercase, spaces to
/// hyphens, apostrophes and commas dropped, everything else filtered to
/// `[a-z0-9-]`.
pub fn slugify(title: &str) -> String {
    title
        .to_lowercase()
        .replace(' ', "-")
        .replace(['\'', ','], "")
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-')
        .collect()
}

/// Disambiguate a colliding slug with a numeric timestamp suffix.
pub fn with_unique_suffix(slug: &str) -> String {
    format!("{}-{}", slug, Utc::now().timestamp())
}

/// Return `slug` unchanged if no article uses it yet, otherwise a
/// timestamp-suffixed variant.
pub async fn ensure_unique_slug(conn: &mut PgConnection, slug: String) -> Result<String, sqlx::Error> {
    let taken: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM articles WHERE slug = $1)")
        .bind(&slug)
        .fetch_one(conn)
        .await?;

    if taken {
        Ok(with_unique_suffix(&slug))
    } else {
        Ok(slug)
    }
}
