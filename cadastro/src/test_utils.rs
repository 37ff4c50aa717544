//! Test utilities: throwaway databases, a configured test server and record factories.

use crate::{
    api::models::{addresses::AddressResponse, users::UserResponse},
    config::{Config, DatabaseConfig, PoolSettings},
    db::{
        handlers::{Addresses, Repository, Users},
        models::{addresses::AddressCreateDBRequest, users::UserCreateDBRequest},
    },
    types::UserId,
};
use axum_test::TestServer;
use sqlx::SqlitePool;
use tempfile::TempDir;

/// A migrated SQLite database in its own temporary directory.
///
/// The directory (and with it the database file) is removed when this value is dropped, so keep
/// it alive for as long as the pool is in use.
pub struct TestDb {
    pub pool: SqlitePool,
    _dir: TempDir,
}

impl TestDb {
    pub async fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let database = test_database_config(&dir);

        let pool = crate::db::pools::connect(&database, std::time::Duration::from_secs(1))
            .await
            .expect("Failed to open test database");
        crate::migrator().run(&pool).await.expect("Failed to run migrations");

        Self { pool, _dir: dir }
    }
}

fn test_database_config(dir: &TempDir) -> DatabaseConfig {
    DatabaseConfig {
        url: format!("sqlite://{}", dir.path().join("test.db").display()),
        pool: PoolSettings {
            max_connections: 4,
            min_connections: 0,
            ..Default::default()
        },
    }
}

pub fn create_test_config() -> Config {
    Config {
        host: "127.0.0.1".to_string(),
        port: 0,
        // Replaced by the TestDb pool in create_test_app
        database: DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            ..Default::default()
        },
        ..Default::default()
    }
}

pub async fn create_test_app() -> (TestServer, TestDb) {
    let db = TestDb::new().await;

    let app = crate::Application::new_with_pool(create_test_config(), db.pool.clone())
        .await
        .expect("Failed to create application");

    (app.into_test_server(), db)
}

pub async fn create_test_user(pool: &SqlitePool, email: &str) -> UserResponse {
    let mut conn = pool.acquire().await.expect("Failed to acquire connection");
    let user = Users::new(&mut conn)
        .create(&UserCreateDBRequest {
            name: "Test User".to_string(),
            email: email.to_string(),
        })
        .await
        .expect("Failed to create test user");

    UserResponse::from(user)
}

pub async fn create_test_address(pool: &SqlitePool, user_id: UserId, street: &str) -> AddressResponse {
    let mut conn = pool.acquire().await.expect("Failed to acquire connection");
    let address = Addresses::new(&mut conn)
        .create(&AddressCreateDBRequest {
            user_id,
            street: street.to_string(),
            city: "São Paulo".to_string(),
            postal_code: Some("01000-000".to_string()),
        })
        .await
        .expect("Failed to create test address");

    AddressResponse::from(address)
}
