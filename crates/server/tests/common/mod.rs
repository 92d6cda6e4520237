//! In-process test fixture for the HTTP API.
//!
//! Builds the full router over either the in-memory store or a SQLite file in
//! a temporary directory, with five accounts provisioned:
//!
//! | id | role          |
//! |----|---------------|
//! | 1  | General       |
//! | 2  | Analyst       |
//! | 3  | Analyst       |
//! | 4  | Administrator |
//! | 5  | General       |
//!
//! Every account's email is `user<id>@helpdesk.example` and its password is
//! [`fixtures::DEFAULT_PASSWORD`].

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use base64::{engine::general_purpose::STANDARD, Engine};
use http_body_util::BodyExt;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use helpdesk_core::config::{AuthConfig, DatabaseConfig, PagingConfig, ServerConfig};
use helpdesk_core::testing::InMemoryStore;
use helpdesk_core::{
    create_authenticator, AuthMethod, Collaborators, Config, Role, Services, SqliteStore,
};
use helpdesk_server::{create_router, AppState};

pub use helpdesk_core::testing::fixtures;

pub const REQUESTER: i64 = 1;
pub const ANALYST: i64 = 2;
pub const OTHER_ANALYST: i64 = 3;
pub const ADMIN: i64 = 4;
pub const OTHER_REQUESTER: i64 = 5;

const ACCOUNTS: [(i64, Role); 5] = [
    (REQUESTER, Role::General),
    (ANALYST, Role::Analyst),
    (OTHER_ANALYST, Role::Analyst),
    (ADMIN, Role::Administrator),
    (OTHER_REQUESTER, Role::General),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    InMemory,
    Sqlite,
}

#[derive(Debug, Clone, Copy)]
pub struct TestConfig {
    pub auth_method: AuthMethod,
    pub backend: Backend,
    pub default_page_size: u32,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            auth_method: AuthMethod::Header,
            backend: Backend::InMemory,
            default_page_size: 10,
        }
    }
}

impl TestConfig {
    pub fn with_basic_auth() -> Self {
        Self {
            auth_method: AuthMethod::Basic,
            ..Self::default()
        }
    }

    pub fn with_sqlite() -> Self {
        Self {
            backend: Backend::Sqlite,
            ..Self::default()
        }
    }
}

pub struct TestFixture {
    pub router: Router,
    /// Set for the in-memory backend, to inspect state or fail commits.
    pub memory: Option<Arc<InMemoryStore>>,
    _temp_dir: Option<TempDir>,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

/// Credentials attached to a request.
#[derive(Debug, Clone)]
pub enum As {
    Anonymous,
    /// `X-User-Id` gateway header.
    User(i64),
    /// `Authorization: Basic` with the given email and password.
    Basic(String, String),
}

impl TestFixture {
    pub async fn new() -> Self {
        Self::with_config(TestConfig::default()).await
    }

    pub async fn with_config(test_config: TestConfig) -> Self {
        let config = Config {
            auth: AuthConfig {
                method: test_config.auth_method,
            },
            server: ServerConfig::default(),
            database: DatabaseConfig::default(),
            paging: PagingConfig {
                default_page_size: test_config.default_page_size,
            },
            users: Vec::new(),
        };

        let (collaborators, memory, temp_dir) = match test_config.backend {
            Backend::InMemory => {
                let store = Arc::new(InMemoryStore::new());
                for (id, role) in ACCOUNTS {
                    store.add_user(fixtures::user(id, role)).await;
                }
                (
                    Collaborators::from_store(Arc::clone(&store)),
                    Some(store),
                    None,
                )
            }
            Backend::Sqlite => {
                let temp_dir = TempDir::new().expect("Failed to create temp dir");
                let store = Arc::new(
                    SqliteStore::new(&temp_dir.path().join("helpdesk.db"))
                        .expect("Failed to open database"),
                );
                (Collaborators::from_store(store), None, Some(temp_dir))
            }
        };

        let services = Services::new(collaborators, Arc::new(fixtures::hasher()));
        if test_config.backend == Backend::Sqlite {
            for (id, role) in ACCOUNTS {
                let created = services
                    .users
                    .provision(
                        &format!("User{}", id),
                        role.name(),
                        &format!("user{}@helpdesk.example", id),
                        fixtures::DEFAULT_PASSWORD,
                        role,
                    )
                    .await
                    .expect("Failed to provision account");
                assert_eq!(created.map(|u| u.0), Some(id));
            }
        }

        let authenticator = Arc::from(create_authenticator(
            &config.auth,
            services.authentication.clone(),
        ));
        let state = Arc::new(AppState::new(config, authenticator, services));

        Self {
            router: create_router(state),
            memory,
            _temp_dir: temp_dir,
        }
    }

    pub async fn get(&self, path: &str) -> TestResponse {
        self.request("GET", path, As::Anonymous, None).await
    }

    pub async fn get_as(&self, user: i64, path: &str) -> TestResponse {
        self.request("GET", path, As::User(user), None).await
    }

    pub async fn post(&self, path: &str, body: Value) -> TestResponse {
        self.request("POST", path, As::Anonymous, Some(body)).await
    }

    pub async fn post_as(&self, user: i64, path: &str, body: Value) -> TestResponse {
        self.request("POST", path, As::User(user), Some(body)).await
    }

    pub async fn put_as(&self, user: i64, path: &str, body: Value) -> TestResponse {
        self.request("PUT", path, As::User(user), Some(body)).await
    }

    /// Create a ticket as `user` and return its id.
    pub async fn create_ticket(&self, user: i64, category_id: i64, description: &str) -> i64 {
        let response = self
            .post_as(
                user,
                "/api/v1/tickets",
                serde_json::json!({ "category_id": category_id, "description": description }),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
        response.body["id"].as_i64().expect("created id")
    }

    /// Send a POST request with raw string body (for testing malformed JSON).
    pub async fn post_raw_as(&self, user: i64, path: &str, body: &str) -> TestResponse {
        let request = Request::builder()
            .method("POST")
            .uri(path)
            .header("Content-Type", "application/json")
            .header("X-User-Id", user.to_string())
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    pub async fn request(
        &self,
        method: &str,
        path: &str,
        credentials: As,
        body: Option<Value>,
    ) -> TestResponse {
        let mut request_builder = Request::builder().method(method).uri(path);

        request_builder = match credentials {
            As::Anonymous => request_builder,
            As::User(id) => request_builder.header("X-User-Id", id.to_string()),
            As::Basic(email, password) => request_builder.header(
                "Authorization",
                format!("Basic {}", STANDARD.encode(format!("{}:{}", email, password))),
            ),
        };

        let body = if let Some(json_body) = body {
            request_builder = request_builder.header("Content-Type", "application/json");
            Body::from(serde_json::to_vec(&json_body).unwrap())
        } else {
            Body::empty()
        };

        self.send(request_builder.body(body).unwrap()).await
    }

    async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        let body: Value = if body_bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body_bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&body_bytes).into_owned()))
        };

        TestResponse { status, body }
    }
}

/// Helper to assert a response has expected status.
#[macro_export]
macro_rules! assert_status {
    ($response:expr, $status:expr) => {
        assert_eq!(
            $response.status, $status,
            "Expected status {:?}, got {:?}. Body: {}",
            $status,
            $response.status,
            serde_json::to_string_pretty(&$response.body).unwrap_or_default()
        );
    };
}

/// Assert an error response carries the given code.
#[macro_export]
macro_rules! assert_error_code {
    ($response:expr, $status:expr, $code:expr) => {
        $crate::assert_status!($response, $status);
        assert_eq!($response.body["code"], $code, "Body: {}", $response.body);
    };
}
