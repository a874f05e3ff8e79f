/// Common test utilities for identity service integration tests
///
/// Tests run against a real PostgreSQL database. When `DATABASE_URL` is
/// not set the context constructor returns `None` and each test skips
/// with a note, so the suite stays runnable without infrastructure.
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use sqlx::PgPool;
use taskvault_identity::app::{build_router, AppState};
use taskvault_identity::config::{Config, DatabaseConfig, JwtConfig, ServerConfig};
use tower::ServiceExt;
use uuid::Uuid;

/// Signing secret used by every test context
pub const TEST_SECRET: &str = "integration-test-secret-key-0123456789abcdef";

/// Test context holding the database pool and a ready-to-call router
pub struct TestContext {
    pub db: PgPool,
    pub app: Router,
}

impl TestContext {
    /// Creates a context, or `None` when `DATABASE_URL` is unset
    pub async fn new() -> anyhow::Result<Option<Self>> {
        let Ok(url) = std::env::var("DATABASE_URL") else {
            return Ok(None);
        };

        let db = PgPool::connect(&url).await?;
        taskvault_shared::db::migrations::run_migrations(&db).await?;

        let config = Config {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                cors_origins: vec!["*".to_string()],
            },
            database: DatabaseConfig {
                url,
                max_connections: 5,
            },
            jwt: JwtConfig {
                secret: TEST_SECRET.to_string(),
            },
        };

        let app = build_router(AppState::new(db.clone(), config));

        Ok(Some(TestContext { db, app }))
    }

    /// Removes a user created during a test; tasks cascade
    pub async fn cleanup_user(&self, user_id: Uuid) -> anyhow::Result<()> {
        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user_id)
            .execute(&self.db)
            .await?;
        Ok(())
    }
}

/// Sends a JSON POST to the router and returns (status, parsed body)
pub async fn post_json(
    app: &Router,
    uri: &str,
    body: serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);

    (status, json)
}

/// Unique credentials so runs never collide on the unique constraints
pub fn unique_credentials(tag: &str) -> (String, String) {
    let nonce = Uuid::new_v4().simple().to_string();
    (
        format!("{}-{}", tag, &nonce[..12]),
        format!("{}-{}@example.com", tag, &nonce[..12]),
    )
}
