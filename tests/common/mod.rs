#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::StatusCode;
use serde_json::{json, Value};

use contact_api::config::AppConfig;
use contact_api::database::{ContactRepository, ContactStore, DatabaseManager};
use contact_api::{app, AppState};

pub const USERNAME: &str = "admin";
pub const PASSWORD: &str = "correct-horse";
pub const SECRET: &str = "integration-signing-key";

/// A live server on its own port with a fresh in-memory database
pub struct TestServer {
    pub base_url: String,
    pub client: reqwest::Client,
}

impl TestServer {
    /// Token checks on, credentials configured
    pub async fn spawn() -> Result<Self> {
        Self::spawn_with(|_| {}).await
    }

    pub async fn spawn_with(customize: impl FnOnce(&mut AppConfig)) -> Result<Self> {
        let mut config = AppConfig::development();
        config.security.app_user = Some(USERNAME.to_string());
        config.security.app_password = Some(PASSWORD.to_string());
        config.security.jwt_secret = Some(SECRET.to_string());
        customize(&mut config);

        let pool = DatabaseManager::connect(&config.database).await?;
        let repository = ContactRepository::new(pool);
        repository.create_schema().await?;
        let state = AppState::new(config, Arc::new(repository));

        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
            .await
            .context("failed to bind test listener")?;
        tokio::spawn(async move {
            let _ = axum::serve(listener, app(state)).await;
        });

        let server = Self {
            base_url: format!("http://127.0.0.1:{}", port),
            client: reqwest::Client::new(),
        };
        server.wait_ready(Duration::from_secs(5)).await?;
        Ok(server)
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let deadline = tokio::time::Instant::now() + timeout;
        while tokio::time::Instant::now() < deadline {
            if let Ok(resp) = self.client.get(self.url("/health")).send().await {
                if resp.status() == StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn login(&self) -> Result<String> {
        let res = self
            .client
            .post(self.url("/login"))
            .json(&json!({"username": USERNAME, "password": PASSWORD}))
            .send()
            .await?;
        anyhow::ensure!(res.status() == StatusCode::OK, "login failed: {}", res.status());
        let body = res.json::<Value>().await?;
        body["token"]
            .as_str()
            .map(str::to_string)
            .context("login response missing token")
    }

    pub async fn create(&self, token: &str, name: &str, email: &str) -> Result<i64> {
        let res = self
            .client
            .post(self.url("/contact"))
            .bearer_auth(token)
            .json(&json!({"name": name, "email": email}))
            .send()
            .await?;
        anyhow::ensure!(res.status() == StatusCode::CREATED, "create failed: {}", res.status());
        let body = res.json::<Value>().await?;
        body["id"].as_i64().context("create response missing id")
    }

    pub async fn list(&self, token: &str, query: &str) -> Result<Vec<Value>> {
        let res = self
            .client
            .get(self.url(&format!("/contacts{}", query)))
            .bearer_auth(token)
            .send()
            .await?;
        anyhow::ensure!(res.status() == StatusCode::OK, "list failed: {}", res.status());
        let body = res.json::<Value>().await?;
        body.as_array().cloned().context("list response is not an array")
    }
}
