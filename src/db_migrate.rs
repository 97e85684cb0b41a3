use clinicly_db::{create_pool, schema::initialize_database};
use color_eyre::eyre::{Result, WrapErr};
use dotenv::dotenv;
use tracing::{Level, info};

/// Creates the clinic, directory and appointment tables without starting the API.
#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();
    dotenv().ok();

    let database_url = std::env::var("DATABASE_URL")
        .wrap_err("DATABASE_URL must point at the clinic database")?;

    info!("Preparing clinic schema");
    let pool = create_pool(&database_url).await?;
    initialize_database(&pool).await?;
    info!("Clinic schema is up to date");

    Ok(())
}
