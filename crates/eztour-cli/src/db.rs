//! `db` subcommand handlers.

use sqlx::SqlitePool;

/// Apply pending migrations and report how many ran.
///
/// # Errors
///
/// Returns an error if a migration fails.
pub(crate) async fn run_migrate(pool: &SqlitePool) -> anyhow::Result<()> {
    let applied = eztour_db::run_migrations(pool).await?;
    if applied == 0 {
        println!("database is up to date");
    } else {
        println!("applied {applied} migration(s)");
    }
    Ok(())
}

/// Check that the database answers a trivial query.
///
/// # Errors
///
/// Returns an error if the ping fails.
pub(crate) async fn run_ping(pool: &SqlitePool) -> anyhow::Result<()> {
    eztour_db::health_check(pool).await?;
    println!("database reachable");
    Ok(())
}
