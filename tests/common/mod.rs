#![allow(dead_code)]

use std::net::SocketAddr;
use std::path::PathBuf;

use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use tempfile::TempDir;

use tcrm::config::{AdminConfig, Config};
use tcrm::state::SharedState;

pub const ADMIN_USERNAME: &str = "admin";
pub const ADMIN_PASSWORD: &str = "correct-horse-battery";
pub const JWT_SECRET: &str = "test-jwt-secret-that-is-long-enough";

/// A running test server backed by its own temporary data directory.
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: Client,
    pub state: SharedState,
    pub data_dir: TempDir,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub fn data_path(&self) -> PathBuf {
        self.state.config.data_path.clone()
    }

    /// Submit a JSON form, return (body, status).
    pub async fn submit_json(&self, data: &Value) -> (Value, StatusCode) {
        let resp = self
            .client
            .post(self.url("/submit-form"))
            .json(data)
            .send()
            .await
            .expect("submit json failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    /// Submit form-urlencoded data, return (body, status).
    pub async fn submit_form(&self, data: &[(&str, &str)]) -> (Value, StatusCode) {
        let resp = self
            .client
            .post(self.url("/submit-form"))
            .form(data)
            .send()
            .await
            .expect("submit form failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    pub async fn get_submissions(&self) -> (Value, StatusCode) {
        let resp = self
            .client
            .get(self.url("/get-submissions"))
            .send()
            .await
            .expect("get submissions failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    pub async fn get_submissions_auth(&self, token: &str) -> (Value, StatusCode) {
        let resp = self
            .client
            .get(self.url("/get-submissions"))
            .bearer_auth(token)
            .send()
            .await
            .expect("get submissions failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    pub async fn login(&self, username: &str, password: &str) -> (Value, StatusCode) {
        let resp = self
            .client
            .post(self.url("/admin/login"))
            .json(&json!({ "username": username, "password": password }))
            .send()
            .await
            .expect("login request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }
}

pub fn jane() -> Value {
    json!({
        "fullName": "Jane Doe",
        "email": "jane@acme.com",
        "companyName": "Acme",
        "companySize": "11-50",
    })
}

pub fn test_config(data_dir: &TempDir) -> Config {
    Config {
        host: "127.0.0.1".parse().unwrap(),
        port: 0,
        data_path: data_dir.path().join("data").join("submissions.json"),
        static_dir: data_dir.path().join("static"),
        max_body_size: 16 * 1024,
        trusted_proxies: vec![],
        submit_rate_limit: 0,
        submit_rate_window_secs: 60,
        honeypot_field: None,
        strict_validation: false,
        log_level: "warn".to_string(),
        admin: None,
    }
}

pub fn admin_config() -> AdminConfig {
    AdminConfig {
        username: ADMIN_USERNAME.to_string(),
        password_hash: tcrm::auth::password::hash(ADMIN_PASSWORD).unwrap(),
        jwt_secret: JWT_SECRET.to_string(),
    }
}

/// Spawn the app with the default test config.
pub async fn spawn_app() -> TestApp {
    spawn_app_with(|_| {}).await
}

/// Spawn the app after letting the caller adjust the config.
pub async fn spawn_app_with(customize: impl FnOnce(&mut Config)) -> TestApp {
    let data_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let mut config = test_config(&data_dir);
    customize(&mut config);

    let (app, state) = tcrm::build_app(config);

    // Bind to random port
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind to random port");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        .expect("Server failed");
    });

    let client = Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap();

    TestApp {
        addr,
        client,
        state,
        data_dir,
    }
}
