#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use reqwest::{Method, RequestBuilder, StatusCode};
use serde_json::{json, Value};

use internship_portal::config::{AppConfig, StorageBackend};
use internship_portal::database::models::{NewUser, User};
use internship_portal::database::MemoryStore;
use internship_portal::types::Role;
use internship_portal::AppState;

pub const PASSWORD: &str = "password123";
pub const UPLOAD_LIMIT: usize = 1024;

/// A portal instance running in-process over a fresh in-memory store
pub struct TestApp {
    pub base_url: String,
    pub client: reqwest::Client,
    pub state: AppState,
    pub upload_dir: PathBuf,
}

impl TestApp {
    pub async fn spawn() -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;

        let mut config = AppConfig::development();
        config.server.port = port;
        config.database.storage = StorageBackend::Memory;
        config.security.jwt_secret = "test-secret".to_string();
        config.security.password_cost = 4;
        let upload_dir = std::env::temp_dir().join(format!("portal-it-{}", port));
        config.uploads.dir = upload_dir.clone();
        config.uploads.max_bytes = UPLOAD_LIMIT;

        let state = AppState::new(config, Arc::new(MemoryStore::new()));
        let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
            .await
            .context("failed to bind test listener")?;

        let app = internship_portal::app(state.clone());
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Ok(Self {
            base_url: format!("http://127.0.0.1:{}", port),
            client: reqwest::Client::new(),
            state,
            upload_dir,
        })
    }

    pub fn request(&self, method: Method, path: &str, token: Option<&str>) -> RequestBuilder {
        let builder = self.client.request(method, format!("{}{}", self.base_url, path));
        match token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    pub async fn get(&self, path: &str, token: &str) -> Result<(StatusCode, Value)> {
        send(self.request(Method::GET, path, Some(token))).await
    }

    pub async fn send_json(&self, method: Method, path: &str, token: &str, body: Value) -> Result<(StatusCode, Value)> {
        send(self.request(method, path, Some(token)).json(&body)).await
    }

    /// Create an account directly through the service layer
    pub async fn seed_user(&self, email: &str, role: Role) -> Result<User> {
        let user = self
            .state
            .service
            .create_user(
                NewUser {
                    email: email.to_string(),
                    name: email.split('@').next().unwrap_or("user").to_string(),
                    password: PASSWORD.to_string(),
                    department: Some("CSE".to_string()),
                    roll_number: None,
                },
                role,
            )
            .await?;
        Ok(user)
    }

    pub async fn assign_mentor(&self, student: &User, faculty: &User) -> Result<()> {
        self.state.service.assign_mentor(student.id, faculty.id).await?;
        Ok(())
    }

    pub async fn login(&self, email: &str) -> Result<String> {
        let (status, body) = send(
            self.request(Method::POST, "/auth/login", None)
                .json(&json!({ "email": email, "password": PASSWORD })),
        )
        .await?;
        anyhow::ensure!(status == StatusCode::OK, "login failed for {}: {}", email, body);

        body["data"]["token"]
            .as_str()
            .map(str::to_string)
            .context("login response carried no token")
    }

    pub async fn seed_and_login(&self, email: &str, role: Role) -> Result<(User, String)> {
        let user = self.seed_user(email, role).await?;
        let token = self.login(email).await?;
        Ok((user, token))
    }

    /// Submit an internship as `token`'s student and return its id
    pub async fn submit_internship(&self, token: &str, company: &str) -> Result<String> {
        let (status, body) = self
            .send_json(
                Method::POST,
                "/api/student/internships",
                token,
                json!({ "companyName": company, "position": "Software Intern", "stipend": 12000 }),
            )
            .await?;
        anyhow::ensure!(status == StatusCode::CREATED, "submit failed: {}", body);

        body["data"]["id"]
            .as_str()
            .map(str::to_string)
            .context("created internship carried no id")
    }
}

pub async fn send(builder: RequestBuilder) -> Result<(StatusCode, Value)> {
    let res = builder.send().await?;
    let status = res.status();
    let body = res.json::<Value>().await.unwrap_or(Value::Null);
    Ok((status, body))
}

impl Drop for TestApp {
    fn drop(&mut self) {
        // nothing to remove when the test never uploaded
        let _ = std::fs::remove_dir_all(&self.upload_dir);
    }
}
