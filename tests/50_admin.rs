mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::json;

#[tokio::test]
async fn admin_surface_is_forbidden_to_regular_users() -> Result<()> {
    if !common::database_available() {
        eprintln!("skipping: DATABASE_URL not set");
        return Ok(());
    }

    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();
    let (_, user_token) = common::register_and_login(&server.base_url, "civilian").await?;

    for path in ["/api/admin/stats", "/api/admin/articles", "/api/admin/comments"] {
        let res = client
            .get(format!("{}{}", server.base_url, path))
            .bearer_auth(&user_token)
            .send()
            .await?;
        assert_eq!(res.status(), StatusCode::FORBIDDEN, "{} should be admin-only", path);
    }
    Ok(())
}

#[tokio::test]
async fn stats_report_counters_and_trends() -> Result<()> {
    if !common::database_available() {
        eprintln!("skipping: DATABASE_URL not set");
        return Ok(());
    }

    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();
    let (_, admin_token) = common::register_admin(&server.base_url, "statadmin").await?;

    let res = client
        .get(format!("{}/api/admin/stats", server.base_url))
        .bearer_auth(&admin_token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let stats: serde_json::Value = res.json().await?;
    for key in [
        "total_views",
        "total_spots",
        "total_subscribers",
        "pending_comments",
        "views_trend",
        "spots_trend",
        "subscribers_trend",
        "comments_trend",
    ] {
        assert!(stats.get(key).is_some(), "stats missing {}", key);
    }
    assert!(stats["total_views"].as_i64().unwrap() >= 0);
    Ok(())
}

#[tokio::test]
async fn admin_article_listing_filters_and_counts() -> Result<()> {
    if !common::database_available() {
        eprintln!("skipping: DATABASE_URL not set");
        return Ok(());
    }

    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();
    let (_, admin_token) = common::register_admin(&server.base_url, "articleadmin").await?;

    // Drafts are visible here, unlike in the public listing
    let category = format!("cat-{}", common::unique_suffix());
    let res = client
        .post(format!("{}/api/articles", server.base_url))
        .bearer_auth(&admin_token)
        .json(&json!({
            "title": format!("Hidden draft {}", common::unique_suffix()),
            "content": "...",
            "category": category,
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);

    let res = client
        .get(format!(
            "{}/api/admin/articles?category={}&status=draft",
            server.base_url, category
        ))
        .bearer_auth(&admin_token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let listing: serde_json::Value = res.json().await?;
    assert_eq!(listing["total"], json!(1));
    assert_eq!(listing["items"].as_array().unwrap().len(), 1);
    assert_eq!(listing["items"][0]["status"], json!("draft"));
    assert!(listing["items"][0]["author_name"].is_string());
    Ok(())
}

#[tokio::test]
async fn comment_moderation_flow() -> Result<()> {
    if !common::database_available() {
        eprintln!("skipping: DATABASE_URL not set");
        return Ok(());
    }

    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();
    let (_, author_token) = common::register_and_login(&server.base_url, "commenter").await?;
    let (_, admin_token) = common::register_admin(&server.base_url, "moderator").await?;

    // An article to comment on
    let res = client
        .post(format!("{}/api/articles", server.base_url))
        .bearer_auth(&author_token)
        .json(&json!({
            "title": format!("Commentable {}", common::unique_suffix()),
            "content": "...",
        }))
        .send()
        .await?;
    let article: serde_json::Value = res.json().await?;
    let article_id = article["id"].as_i64().unwrap();

    // Comments are held for moderation
    let res = client
        .post(format!("{}/api/comments", server.base_url))
        .bearer_auth(&author_token)
        .json(&json!({ "content": "Superbe article !", "article_id": article_id }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let comment: serde_json::Value = res.json().await?;
    let comment_id = comment["id"].as_i64().unwrap();
    assert_eq!(comment["is_approved"], json!(false));

    // Invisible to the public until approved
    let res = client
        .get(format!("{}/api/articles/{}/comments", server.base_url, article_id))
        .send()
        .await?;
    let visible: Vec<serde_json::Value> = res.json().await?;
    assert!(visible.iter().all(|c| c["id"] != comment["id"]));

    let res = client
        .post(format!("{}/api/admin/comments/{}/approve", server.base_url, comment_id))
        .bearer_auth(&admin_token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let res = client
        .get(format!("{}/api/articles/{}/comments", server.base_url, article_id))
        .send()
        .await?;
    let visible: Vec<serde_json::Value> = res.json().await?;
    assert!(visible.iter().any(|c| c["id"].as_i64() == Some(comment_id)));
    Ok(())
}

#[tokio::test]
async fn deleting_a_missing_comment_is_not_found() -> Result<()> {
    if !common::database_available() {
        eprintln!("skipping: DATABASE_URL not set");
        return Ok(());
    }

    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();
    let (_, admin_token) = common::register_admin(&server.base_url, "nodelete").await?;

    let res = client
        .delete(format!("{}/api/admin/comments/999999999", server.base_url))
        .bearer_auth(&admin_token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn bulk_delete_reports_rows_actually_removed() -> Result<()> {
    if !common::database_available() {
        eprintln!("skipping: DATABASE_URL not set");
        return Ok(());
    }

    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();
    let (_, admin_token) = common::register_admin(&server.base_url, "bulkadmin").await?;

    let mut ids = Vec::new();
    for i in 0..2 {
        let res = client
            .post(format!("{}/api/articles", server.base_url))
            .bearer_auth(&admin_token)
            .json(&json!({
                "title": format!("Bulk target {} {}", i, common::unique_suffix()),
                "content": "...",
            }))
            .send()
            .await?;
        let article: serde_json::Value = res.json().await?;
        ids.push(article["id"].as_i64().unwrap());
    }
    ids.push(999_999_999); // never existed

    let res = client
        .post(format!("{}/api/admin/articles/bulk-delete", server.base_url))
        .bearer_auth(&admin_token)
        .json(&json!({ "ids": ids }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let body: serde_json::Value = res.json().await?;
    assert_eq!(body["deleted_count"], json!(2));
    Ok(())
}

#[tokio::test]
async fn newsletter_subscription_round_trip() -> Result<()> {
    if !common::database_available() {
        eprintln!("skipping: DATABASE_URL not set");
        return Ok(());
    }

    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let email = format!("reader-{}@example.com", common::unique_suffix());

    let res = client
        .post(format!("{}/api/newsletter/subscribe", server.base_url))
        .json(&json!({ "email": email }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let sub: serde_json::Value = res.json().await?;
    assert_eq!(sub["is_active"], json!(true));
    let id = sub["id"].as_i64().unwrap();

    let res = client
        .post(format!("{}/api/newsletter/unsubscribe", server.base_url))
        .json(&json!({ "email": email }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    // Re-subscribing re-activates the same row
    let res = client
        .post(format!("{}/api/newsletter/subscribe", server.base_url))
        .json(&json!({ "email": email }))
        .send()
        .await?;
    let resub: serde_json::Value = res.json().await?;
    assert_eq!(resub["id"], json!(id));
    assert_eq!(resub["is_active"], json!(true));

    // Unknown addresses cannot unsubscribe
    let res = client
        .post(format!("{}/api/newsletter/unsubscribe", server.base_url))
        .json(&json!({ "email": format!("ghost-{}@example.com", common::unique_suffix()) }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    Ok(())
}
