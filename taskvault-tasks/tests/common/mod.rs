/// Common test utilities for task service integration tests
///
/// Builds both the identity router and the task router over one database
/// pool and one signing secret, so tests exercise the real cross-service
/// flow: register against the identity service, spend the token against
/// the task service. Requires `DATABASE_URL`; the constructor returns
/// `None` when it is unset so tests can skip.
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

/// Signing secret shared by both routers, as in deployment
pub const TEST_SECRET: &str = "integration-test-secret-key-0123456789abcdef";

/// Test context holding the pool and both service routers
pub struct TestContext {
    pub db: PgPool,
    pub identity: Router,
    pub tasks: Router,
}

impl TestContext {
    /// Creates a context, or `None` when `DATABASE_URL` is unset
    pub async fn new() -> anyhow::Result<Option<Self>> {
        let Ok(url) = std::env::var("DATABASE_URL") else {
            return Ok(None);
        };

        let db = PgPool::connect(&url).await?;
        taskvault_shared::db::migrations::run_migrations(&db).await?;

        let identity_config = taskvault_identity::config::Config {
            server: taskvault_identity::config::ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                cors_origins: vec!["*".to_string()],
            },
            database: taskvault_identity::config::DatabaseConfig {
                url: url.clone(),
                max_connections: 5,
            },
            jwt: taskvault_identity::config::JwtConfig {
                secret: TEST_SECRET.to_string(),
            },
        };
        let identity = taskvault_identity::app::build_router(
            taskvault_identity::app::AppState::new(db.clone(), identity_config),
        );

        let tasks_config = taskvault_tasks::config::Config {
            server: taskvault_tasks::config::ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                cors_origins: vec!["*".to_string()],
            },
            database: taskvault_tasks::config::DatabaseConfig {
                url,
                max_connections: 5,
            },
            jwt: taskvault_tasks::config::JwtConfig {
                secret: TEST_SECRET.to_string(),
            },
        };
        let tasks = taskvault_tasks::app::build_router(taskvault_tasks::app::AppState::new(
            db.clone(),
            tasks_config,
        ));

        Ok(Some(TestContext {
            db,
            identity,
            tasks,
        }))
    }

    /// Registers a fresh user through the identity router and returns
    /// (bearer token, user id)
    pub async fn register_user(&self, tag: &str) -> (String, Uuid) {
        let nonce = Uuid::new_v4().simple().to_string();
        let username = format!("{}-{}", tag, &nonce[..12]);
        let email = format!("{}-{}@example.com", tag, &nonce[..12]);

        let (status, body) = request(
            &self.identity,
            "POST",
            "/register",
            None,
            Some(serde_json::json!({
                "username": username,
                "email": email,
                "password": "pw123456"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED, "registration failed: {}", body);

        let token = body["token"].as_str().unwrap().to_string();
        let user_id: Uuid = body["user"]["id"].as_str().unwrap().parse().unwrap();
        (token, user_id)
    }

    /// Removes a user created during a test; their tasks cascade
    pub async fn cleanup_user(&self, user_id: Uuid) -> anyhow::Result<()> {
        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user_id)
            .execute(&self.db)
            .await?;
        Ok(())
    }
}

/// Sends a request, optionally authenticated and with a JSON body, and
/// returns (status, parsed body)
pub async fn request(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let mut builder = Request::builder().method(method).uri(uri);

    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }

    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);

    (status, json)
}
