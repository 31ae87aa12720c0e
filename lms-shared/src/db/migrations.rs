/// Schema migration runner
///
/// The schema lives in `migrations/` at the workspace root and is embedded
/// into the binary at compile time with `sqlx::migrate!`. Applied versions
/// are tracked by sqlx in `_sqlx_migrations`.
///
/// # Example
///
/// ```no_run
/// use lms_shared::db::migrations::run_migrations;
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool) -> Result<(), Box<dyn std::error::Error>> {
/// run_migrations(&pool).await?;
/// # Ok(())
/// # }
/// ```

use sqlx::postgres::PgPool;
use tracing::{info, warn};

/// Applies every pending migration
///
/// # Errors
///
/// Returns the sqlx migrate error if a migration fails to apply or a
/// previously applied migration was modified.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    info!("Applying database migrations");

    match sqlx::migrate!("../migrations").run(pool).await {
        Ok(()) => {
            info!("Database schema is up to date");
            Ok(())
        }
        Err(e) => {
            warn!(error = %e, "Migration failed");
            Err(e)
        }
    }
}
