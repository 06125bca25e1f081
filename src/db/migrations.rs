use sqlx::{Pool, Postgres};
use tracing::info;

/// Run all pending database migrations.
///
/// Migrations are embedded at compile time from the migrations/ directory
/// and tracked by sqlx, so this is safe to run on every startup.
pub async fn run_migrations(pool: &Pool<Postgres>) -> Result<(), sqlx::migrate::MigrateError> {
    info!("Running database migrations...");
    sqlx::migrate!("./migrations").run(pool).await?;
    info!("Database migrations up to date");
    Ok(())
}
