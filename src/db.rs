use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};

/// Connects to the configured database and brings the schema up to date.
pub async fn connect(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(database_url.to_owned());
    // An in-memory SQLite database lives and dies with its connection
    if database_url.contains(":memory:") {
        options.max_connections(1).min_connections(1);
    }
    options.sqlx_logging(false);

    tracing::info!(
        "Connecting to database: {}",
        if database_url.starts_with("postgres") { "PostgreSQL" } else { "SQLite" }
    );

    let conn = Database::connect(options).await?;
    Migrator::up(&conn, None).await?;
    Ok(conn)
}
