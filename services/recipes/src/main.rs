use anyhow::Result;
use tracing::info;

use common::database::{self, DatabaseConfig};
use recipes::settings::BootstrapConfig;
use recipes::{MIGRATOR, PgRepository, UserManager};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    common::logging::init_tracing().expect("setting default subscriber failed");

    info!("Starting recipes service");

    let bootstrap = BootstrapConfig::load()?;

    // Initialize database connection pool
    let db_config = DatabaseConfig::from_env()?;
    let pool = database::init_pool(&db_config).await?;

    // Check database connectivity
    if database::health_check(&pool).await? {
        info!("Database connection successful");
    } else {
        anyhow::bail!("Failed to connect to database");
    }

    database::run_migrations(&pool, &MIGRATOR).await?;

    let manager = UserManager::new(PgRepository::new(pool));
    if let Some((email, password)) = bootstrap.superuser()? {
        if let Some(user) = manager.ensure_superuser(email, password).await? {
            info!("Created superuser {}", user);
        }
    }

    info!("Recipes service initialized successfully");
    Ok(())
}
