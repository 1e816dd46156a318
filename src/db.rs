use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use std::path::Path;

pub type DbPool = Pool<SqliteConnectionManager>;

/// Strip the `sqlite:` scheme and any query string (e.g. `?mode=rwc`).
fn database_path(database_url: &str) -> &str {
    let path = database_url.strip_prefix("sqlite:").unwrap_or(database_url);
    path.split('?').next().unwrap_or(path)
}

pub fn create_pool(database_url: &str) -> Result<DbPool, r2d2::Error> {
    let path = database_path(database_url);

    let manager = if path == ":memory:" {
        SqliteConnectionManager::memory()
    } else {
        SqliteConnectionManager::file(Path::new(path))
    }
    .with_init(|conn| conn.execute_batch("PRAGMA foreign_keys = ON;"));

    // A single in-memory connection, otherwise every pooled connection
    // would see its own empty database.
    let max_size = if path == ":memory:" { 1 } else { 5 };

    Pool::builder().max_size(max_size).build(manager)
}

pub fn create_memory_pool() -> Result<DbPool, r2d2::Error> {
    create_pool(":memory:")
}
