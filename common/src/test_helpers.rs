/// Shared Test Helpers for Cross-Crate Use
///
/// Centralizes the database selection used by integration tests. Tests run
/// against a private in-memory SQLite database unless `DATABASE_URL` points
/// them at a real server.

use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::config::DATABASE_URL_ENV;

// Global counter for unique test identifiers across parallel tests
static GLOBAL_TEST_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Generate globally unique test identifiers that won't conflict across parallel tests
///
/// # Returns
/// A unique string in the format: "{prefix}-{timestamp}-{counter}"
pub fn generate_unique_id(prefix: &str) -> String {
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default();
    let counter = GLOBAL_TEST_COUNTER.fetch_add(1, Ordering::SeqCst);
    format!("{}-{}-{}", prefix, timestamp, counter)
}

/// Get the test database URL from environment or default
///
/// Falls back to an in-memory SQLite database.
pub fn get_test_database_url() -> String {
    std::env::var(DATABASE_URL_ENV)
        .ok()
        .filter(|url| !url.is_empty())
        .unwrap_or_else(get_test_in_memory_database_url)
}

/// Get an in-memory SQLite database URL for unit tests
pub fn get_test_in_memory_database_url() -> String {
    "sqlite::memory:".to_string()
}

/// True when the URL names a database private to a single connection.
pub fn is_in_memory_database(database_url: &str) -> bool {
    database_url.starts_with("sqlite:") && database_url.contains(":memory:")
}

/// Connection options for test databases.
///
/// An in-memory SQLite database lives and dies with its connection, so the
/// pool is pinned to exactly one that is never reaped or recycled.
pub fn test_connect_options(database_url: &str) -> ConnectOptions {
    let mut options = ConnectOptions::new(database_url.to_string());
    options.sqlx_logging(false);
    if is_in_memory_database(database_url) {
        options
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None::<Duration>)
            .max_lifetime(None::<Duration>);
    }
    options
}

/// Open a connection to the test database
pub async fn create_test_connection() -> Result<DatabaseConnection, DbErr> {
    let database_url = get_test_database_url();
    tracing::debug!("Connecting to test database {}", database_url);
    Database::connect(test_connect_options(&database_url)).await
}
