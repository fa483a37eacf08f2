mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::json;

#[tokio::test]
async fn register_login_me_flow() -> Result<()> {
    if !common::database_available() {
        eprintln!("skipping: DATABASE_URL not set");
        return Ok(());
    }

    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let (username, token) = common::register_and_login(&server.base_url, "authflow").await?;

    let res = client
        .get(format!("{}/api/auth/me", server.base_url))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let me: serde_json::Value = res.json().await?;
    assert_eq!(me["username"], json!(username));
    assert_eq!(me["is_admin"], json!(false));
    assert!(me.get("hashed_password").is_none(), "hash must never leak");
    Ok(())
}

#[tokio::test]
async fn wrong_password_is_undifferentiated_401() -> Result<()> {
    if !common::database_available() {
        eprintln!("skipping: DATABASE_URL not set");
        return Ok(());
    }

    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let (username, _) = common::register_and_login(&server.base_url, "badpass").await?;

    for (user, pass) in [(username.as_str(), "wrong"), ("no-such-user", "secret123")] {
        let res = client
            .post(format!("{}/api/auth/token", server.base_url))
            .form(&[("username", user), ("password", pass)])
            .send()
            .await?;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        let body: serde_json::Value = res.json().await?;
        assert_eq!(body["message"], json!("Incorrect username or password"));
    }
    Ok(())
}

#[tokio::test]
async fn duplicate_registration_conflicts() -> Result<()> {
    if !common::database_available() {
        eprintln!("skipping: DATABASE_URL not set");
        return Ok(());
    }

    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let (username, _) = common::register_and_login(&server.base_url, "dup").await?;

    let res = client
        .post(format!("{}/api/auth/register", server.base_url))
        .json(&json!({
            "username": username,
            "email": format!("other-{}@example.com", common::unique_suffix()),
            "password": "secret123",
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CONFLICT);
    Ok(())
}

#[tokio::test]
async fn protected_route_rejects_missing_and_garbage_tokens() -> Result<()> {
    if !common::database_available() {
        eprintln!("skipping: DATABASE_URL not set");
        return Ok(());
    }

    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/api/auth/me", server.base_url))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = client
        .get(format!("{}/api/auth/me", server.base_url))
        .bearer_auth("not.a.jwt")
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn registration_validates_payload() -> Result<()> {
    if !common::database_available() {
        eprintln!("skipping: DATABASE_URL not set");
        return Ok(());
    }

    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/api/auth/register", server.base_url))
        .json(&json!({ "username": "", "email": "nope", "password": "" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body: serde_json::Value = res.json().await?;
    assert!(body["field_errors"]["username"].is_string());
    assert!(body["field_errors"]["email"].is_string());
    Ok(())
}
