use axum::{
    http::{HeaderValue, StatusCode},
    response::Json,
    routing::{delete, get, post},
    Router,
};
use serde_json::{json, Value};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use lumiere_api::config;
use lumiere_api::database::manager::DatabaseManager;
use lumiere_api::handlers::{admin, articles, auth, comments, newsletter, spots};

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    let config = config::config();
    tracing::info!("Starting LUMIÈRE API in {:?} mode", config.environment);

    if let Err(e) = DatabaseManager::ensure_schema().await {
        tracing::error!("Failed to prepare database schema: {}", e);
        std::process::exit(1);
    }

    let app = app();

    let bind_addr = format!("0.0.0.0:{}", config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    tracing::info!("LUMIÈRE API listening on http://{}", bind_addr);

    axum::serve(listener, app).await.expect("server");
}

fn app() -> Router {
    Router::new()
        .route("/api/health", get(health))
        .merge(auth_routes())
        .merge(article_routes())
        .merge(spot_routes())
        .merge(comment_routes())
        .merge(newsletter_routes())
        .merge(admin_routes())
        // Global middleware
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
}

fn auth_routes() -> Router {
    Router::new()
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/token", post(auth::token))
        .route("/api/auth/me", get(auth::me))
}

fn article_routes() -> Router {
    Router::new()
        // Some clients call the collection with a trailing slash
        .route("/api/articles", get(articles::list).post(articles::create))
        .route("/api/articles/", get(articles::list).post(articles::create))
        .route("/api/articles/slug/:slug", get(articles::get_by_slug))
        .route(
            "/api/articles/:id",
            get(articles::get).put(articles::update).delete(articles::delete),
        )
        .route("/api/articles/:id/comments", get(comments::list_for_article))
}

fn spot_routes() -> Router {
    Router::new()
        .route("/api/spots", get(spots::list).post(spots::create))
        .route("/api/spots/", get(spots::list).post(spots::create))
        .route(
            "/api/spots/:id",
            get(spots::get).put(spots::update).delete(spots::delete),
        )
}

fn comment_routes() -> Router {
    Router::new().route("/api/comments", post(comments::create))
}

fn newsletter_routes() -> Router {
    Router::new()
        .route("/api/newsletter/subscribe", post(newsletter::subscribe))
        .route("/api/newsletter/unsubscribe", post(newsletter::unsubscribe))
}

fn admin_routes() -> Router {
    Router::new()
        .route("/api/admin/stats", get(admin::get_stats))
        .route("/api/admin/articles", get(admin::list_articles))
        .route("/api/admin/articles/bulk-delete", post(admin::bulk_delete_articles))
        .route("/api/admin/comments", get(admin::list_comments))
        .route("/api/admin/comments/bulk-delete", post(admin::bulk_delete_comments))
        .route("/api/admin/comments/:id/approve", post(admin::approve_comment))
        .route("/api/admin/comments/:id", delete(admin::delete_comment))
}

fn cors_layer() -> CorsLayer {
    let origins: Vec<HeaderValue> = config::config()
        .security
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}

async fn health() -> (StatusCode, Json<Value>) {
    match DatabaseManager::health_check().await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "database": "ok"
            })),
        ),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "status": "degraded",
                "database_error": e.to_string()
            })),
        ),
    }
}
