pub mod models;
pub mod repositories;
pub mod schema;
pub mod store;

pub mod mock;

pub use store::PgStore;

use eyre::{Result, WrapErr};
use sqlx::postgres::PgPoolOptions;
use sqlx::{Pool, Postgres};
use tracing::debug;

pub type DbPool = Pool<Postgres>;

/// Opens the Postgres pool shared by every request.
pub async fn create_pool(database_url: &str) -> Result<DbPool> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await
        .wrap_err("Failed to connect to the clinic database")?;

    debug!("Database pool ready");
    Ok(pool)
}
