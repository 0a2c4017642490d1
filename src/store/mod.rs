// src/store/mod.rs

pub mod images;
pub mod questions;

use std::str::FromStr;

use sqlx::{
    SqlitePool,
    migrate::MigrateError,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};

pub use images::{ImageStore, ImageStoreError};
pub use questions::{QuestionRepository, StoreError};

/// Opens a pool on `database_url`, creating the database file if missing.
pub async fn open_pool(database_url: &str, max_connections: u32) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

    SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await
}

/// Applies the embedded migrations in `./migrations`.
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
