use std::net::SocketAddr;

use reqwest::Client;
use sea_orm::DatabaseConnection;
use serde_json::{Value, json};
use tempfile::TempDir;

use server::config::{AppConfig, CorsConfig, DatabaseConfig, SeedConfig, ServerConfig};
use server::state::AppState;

pub mod routes {
    pub const DASHBOARD: &str = "/";
    pub const SEARCH: &str = "/search/";
    pub const ACTIVITIES: &str = "/atividades/";
    pub const NEW_ACTIVITY: &str = "/atividades/new/";
    pub const OPENAPI: &str = "/api-docs/openapi.json";

    pub fn activity(id: i32) -> String {
        format!("/atividades/{id}/")
    }

    pub fn edit_activity(id: i32) -> String {
        format!("/atividades/edit/{id}/")
    }

    pub fn delete_activity(id: i32) -> String {
        format!("/atividades/delete/{id}/")
    }
}

/// A running test server backed by its own SQLite file.
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: Client,
    pub db: DatabaseConnection,
    _dir: TempDir,
}

/// Parsed HTTP response for test assertions.
pub struct TestResponse {
    pub status: u16,
    /// Raw `Set-Cookie` headers.
    pub cookies: Vec<String>,
    /// Raw response body as text.
    pub text: String,
    /// Parsed JSON body, or `Null` if the response is not valid JSON.
    pub body: Value,
}

/// Database settings pointing at a fresh SQLite file inside `dir`.
pub fn test_database(dir: &TempDir) -> DatabaseConfig {
    DatabaseConfig {
        url: format!(
            "sqlite://{}?mode=rwc",
            dir.path().join("activities.db").display()
        ),
        max_connections: 5,
    }
}

/// A valid form body; tweak fields with `body["field"] = ...` before posting.
pub fn activity_payload(title: &str) -> Value {
    json!({
        "title": title,
        "description": "Hands-on introduction for new students.",
        "type": "COURSE",
        "status": "PENDING",
        "start_date": "2025-03-01",
        "end_date": "2025-05-30",
        "time": "19:00 - 22:00",
        "location": "Laboratório de Informática 1",
        "coordinator": "Prof. Carlos Silva",
        "participants": 25,
        "tags": "python, web",
        "requirements": "Notebook próprio\nConhecimentos básicos de Python",
    })
}

impl TestApp {
    pub async fn spawn() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        Self::spawn_in(dir).await
    }

    /// Start the server on a database directory that may already hold rows.
    pub async fn spawn_in(dir: TempDir) -> Self {
        let database = test_database(&dir);
        let db = server::database::init_db(&database)
            .await
            .expect("Failed to initialize test database");
        server::seed::prepare(&db, &SeedConfig::default())
            .await
            .expect("Failed to prepare test database");

        let app_config = AppConfig {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                cors: CorsConfig {
                    allow_origins: vec!["http://localhost:5173".to_string()],
                    max_age: 3600,
                },
            },
            database,
            seed: SeedConfig::default(),
        };

        let state = AppState {
            db: db.clone(),
            config: app_config,
        };

        let app = server::build_router(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            addr,
            client: Client::builder()
                .cookie_store(true)
                .build()
                .expect("Failed to build HTTP client"),
            db,
            _dir: dir,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub async fn get(&self, path: &str) -> TestResponse {
        let res = self
            .client
            .get(self.url(path))
            .send()
            .await
            .expect("Failed to send GET request");

        TestResponse::from_response(res).await
    }

    pub async fn post_json(&self, path: &str, body: &Value) -> TestResponse {
        let res = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .expect("Failed to send POST request");

        TestResponse::from_response(res).await
    }

    pub async fn post_form(&self, path: &str, fields: &[(&str, &str)]) -> TestResponse {
        let res = self
            .client
            .post(self.url(path))
            .form(fields)
            .send()
            .await
            .expect("Failed to send form POST request");

        TestResponse::from_response(res).await
    }

    pub async fn post_empty(&self, path: &str) -> TestResponse {
        let res = self
            .client
            .post(self.url(path))
            .send()
            .await
            .expect("Failed to send POST request");

        TestResponse::from_response(res).await
    }

    /// Create an activity via the API and return its `id`.
    pub async fn create_activity(&self, title: &str) -> i32 {
        self.create_activity_with(activity_payload(title)).await
    }

    pub async fn create_activity_with(&self, body: Value) -> i32 {
        let res = self.post_json(routes::NEW_ACTIVITY, &body).await;
        assert_eq!(res.status, 201, "create_activity failed: {}", res.text);
        res.id()
    }
}

impl TestResponse {
    pub async fn from_response(res: reqwest::Response) -> Self {
        let status = res.status().as_u16();
        let cookies = res
            .headers()
            .get_all(reqwest::header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok().map(str::to_string))
            .collect();
        let text = res.text().await.unwrap_or_default();
        let body = serde_json::from_str(&text).unwrap_or(Value::Null);
        Self {
            status,
            cookies,
            text,
            body,
        }
    }

    pub fn id(&self) -> i32 {
        self.body["id"]
            .as_i64()
            .expect("response body should contain 'id'") as i32
    }

    /// Titles of the activities in a listing or search body.
    pub fn titles(&self) -> Vec<String> {
        self.body["data"]
            .as_array()
            .expect("response body should contain 'data'")
            .iter()
            .filter_map(|a| a["title"].as_str().map(str::to_string))
            .collect()
    }
}
