#![allow(dead_code)]

use std::process::{Child, Command, Stdio};
use std::sync::OnceLock;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use reqwest::StatusCode;

static SERVER: OnceLock<TestServer> = OnceLock::new();

/// Integration tests need a reachable PostgreSQL; skip cleanly without one.
pub fn database_available() -> bool {
    std::env::var("DATABASE_URL").is_ok()
}

pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    child: Child,
}

impl TestServer {
    fn spawn() -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        // Spawn the already-built binary to keep start fast during tests
        let mut cmd = Command::new("target/debug/lumiere-api");
        cmd.env("PORT", port.to_string())
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        // Inherit environment so the server sees DATABASE_URL and JWT_SECRET
        let child = cmd.spawn().context("failed to spawn server binary")?;

        Ok(Self { port, base_url, child })
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            let url = format!("{}/api/health", self.base_url);
            if let Ok(resp) = client.get(&url).send().await {
                if resp.status() == StatusCode::OK || resp.status() == StatusCode::SERVICE_UNAVAILABLE {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(150)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }
}

pub async fn ensure_server() -> Result<&'static TestServer> {
    let server = SERVER.get_or_init(|| TestServer::spawn().expect("failed to spawn server binary"));
    server.wait_ready(Duration::from_secs(10)).await?;
    Ok(server)
}

/// Unique-enough suffix so repeated test runs don't collide on usernames/emails
pub fn unique_suffix() -> u128 {
    SystemTime::now().duration_since(UNIX_EPOCH).expect("clock").as_nanos()
}

/// Register a fresh user and return (username, bearer token)
pub async fn register_and_login(base_url: &str, tag: &str) -> Result<(String, String)> {
    let client = reqwest::Client::new();
    let username = format!("{}-{}", tag, unique_suffix());
    let password = "secret123";

    let res = client
        .post(format!("{}/api/auth/register", base_url))
        .json(&serde_json::json!({
            "username": username,
            "email": format!("{}@example.com", username),
            "password": password,
        }))
        .send()
        .await?;
    anyhow::ensure!(res.status() == StatusCode::CREATED, "register failed: {}", res.status());

    let res = client
        .post(format!("{}/api/auth/token", base_url))
        .form(&[("username", username.as_str()), ("password", password)])
        .send()
        .await?;
    anyhow::ensure!(res.status() == StatusCode::OK, "login failed: {}", res.status());

    let body: serde_json::Value = res.json().await?;
    let token = body["access_token"].as_str().context("missing token")?.to_string();
    Ok((username, token))
}

/// Flip the admin flag directly in the database; there is deliberately no
/// HTTP endpoint for promotion.
pub async fn promote_to_admin(username: &str) -> Result<()> {
    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(1)
        .connect(&std::env::var("DATABASE_URL")?)
        .await?;
    sqlx::query("UPDATE users SET is_admin = TRUE WHERE username = $1")
        .bind(username)
        .execute(&pool)
        .await?;
    Ok(())
}

/// Register a fresh admin and return (username, bearer token)
pub async fn register_admin(base_url: &str, tag: &str) -> Result<(String, String)> {
    let (username, _) = register_and_login(base_url, tag).await?;
    promote_to_admin(&username).await?;

    // Re-login is not needed: the admin flag is read per request
    let client = reqwest::Client::new();
    let res = client
        .post(format!("{}/api/auth/token", base_url))
        .form(&[("username", username.as_str()), ("password", "secret123")])
        .send()
        .await?;
    let body: serde_json::Value = res.json().await?;
    let token = body["access_token"].as_str().context("missing token")?.to_string();
    Ok((username, token))
}
