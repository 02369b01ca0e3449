#![allow(dead_code)]

use std::sync::Arc;

use anyhow::{Context, Result};
use reqwest::StatusCode;
use serde_json::{json, Value};

use myflix_api::config::{AppConfig, MEMORY_DATABASE_URL};
use myflix_api::database::models::{Director, Genre, NewMovie, User};
use myflix_api::database::{MemoryStore, Store};
use myflix_api::AppState;

pub const PASSWORD: &str = "popcorn";

pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    pub store: Arc<MemoryStore>,
    pub client: reqwest::Client,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// POST /users with a valid payload for `username`.
    pub async fn register(&self, username: &str) -> Result<reqwest::Response> {
        let payload = json!({
            "Username": username,
            "Password": PASSWORD,
            "Email": format!("{}@example.com", username),
            "Birthday": "1990-04-12"
        });
        Ok(self.client.post(self.url("/users")).json(&payload).send().await?)
    }

    /// Register `username` and log in, returning the bearer token.
    pub async fn register_and_login(&self, username: &str) -> Result<String> {
        let res = self.register(username).await?;
        anyhow::ensure!(res.status() == StatusCode::CREATED, "register failed: {}", res.status());
        self.login(username, PASSWORD).await
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<String> {
        let res = self
            .client
            .post(self.url("/login"))
            .json(&json!({ "Username": username, "Password": password }))
            .send()
            .await?;
        anyhow::ensure!(res.status() == StatusCode::OK, "login failed: {}", res.status());
        let body: Value = res.json().await?;
        body["token"]
            .as_str()
            .map(str::to_string)
            .context("login response without token")
    }

    /// Read a user straight from the store, bypassing HTTP.
    pub async fn store_user(&self, username: &str) -> Result<User> {
        self.store
            .find_user(username)
            .await?
            .with_context(|| format!("user '{}' not in store", username))
    }

    pub async fn seed_movie(&self, title: &str, genre: &str, director: &str) -> Result<()> {
        self.store
            .insert_movie(NewMovie {
                title: title.to_string(),
                description: format!("{} description", title),
                genre: Genre { name: genre.to_string(), description: format!("{} films", genre) },
                director: Director {
                    name: director.to_string(),
                    bio: format!("{} bio", director),
                    birth: Some(1946),
                    death: None,
                },
                image_path: format!("{}.png", title.to_lowercase()),
                featured: true,
            })
            .await?;
        Ok(())
    }
}

fn test_config() -> AppConfig {
    let mut config = AppConfig::development();
    config.server.host = "127.0.0.1".to_string();
    config.database.url = MEMORY_DATABASE_URL.to_string();
    config.security.jwt_secret = "integration-test-secret".to_string();
    config.security.bcrypt_cost = 4;
    config
}

/// Start a server on a free port with a fresh in-memory store.
pub async fn spawn_server() -> Result<TestServer> {
    spawn_server_with(|_| {}).await
}

pub async fn spawn_server_with(configure: impl FnOnce(&mut AppConfig)) -> Result<TestServer> {
    let mut config = test_config();
    configure(&mut config);

    // Pick an unused port for isolation
    let port = portpicker::pick_unused_port().context("failed to pick free port")?;
    config.server.port = port;

    let store = Arc::new(MemoryStore::new());
    let state = AppState::new(config, store.clone());

    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
        .await
        .with_context(|| format!("failed to bind port {}", port))?;
    let app = myflix_api::app(state);
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    Ok(TestServer {
        port,
        base_url: format!("http://127.0.0.1:{}", port),
        store,
        client: reqwest::Client::new(),
    })
}
