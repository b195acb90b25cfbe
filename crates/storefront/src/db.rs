//! Database operations for the storefront `PostgreSQL`.
//!
//! The storefront keeps no product or order data locally (the catalog
//! service owns products; orders leave through WhatsApp). The database
//! holds a single table:
//!
//! - `sessions` - tower-sessions storage, carrying each browser's cart

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
