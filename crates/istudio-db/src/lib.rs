//! # iStudio DB
//!
//! Database pool initialization for the iStudio API.
//!
//! The pool is created once at startup from `DATABASE_URL` and cloned into
//! the application state; every service issues queries through it.

use std::env;

/// Initializes a PostgreSQL connection pool from `DATABASE_URL`.
///
/// # Panics
///
/// Panics if `DATABASE_URL` is not set or the database is unreachable.
/// Startup without a database is not a state this application can run in.
pub async fn init_db_pool() -> sqlx::PgPool {
    let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    sqlx::PgPool::connect(&database_url)
        .await
        .expect("Failed to connect to database")
}

// Re-export PgPool for convenience
pub use sqlx::PgPool;
