//! SQLite pool construction and schema bootstrap.

use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};

/// Open the database pool and make sure the schema exists.
pub async fn connect(url: &str) -> Result<SqlitePool, sqlx::Error> {
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(url)
        .await?;
    migrate(&pool).await?;
    Ok(pool)
}

/// Create the tables if they are missing. Safe to run on every start.
///
/// Timestamps are stored as RFC 3339 text in UTC, which keeps lexicographic
/// and chronological order identical.
pub async fn migrate(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS news ( \
             id INTEGER PRIMARY KEY AUTOINCREMENT, \
             title TEXT NOT NULL, \
             summary TEXT, \
             cover_url TEXT, \
             content_html TEXT NOT NULL, \
             slug TEXT, \
             published_at TEXT, \
             created_at TEXT NOT NULL \
         )",
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE TABLE IF NOT EXISTS parcels (code TEXT PRIMARY KEY)")
        .execute(pool)
        .await?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS parcel_updates ( \
             id INTEGER PRIMARY KEY AUTOINCREMENT, \
             code TEXT NOT NULL, \
             time TEXT NOT NULL, \
             event TEXT NOT NULL, \
             location TEXT NOT NULL, \
             created_at TEXT NOT NULL, \
             updated_at TEXT NOT NULL \
         )",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS parcel_updates_code_idx \
         ON parcel_updates (code)",
    )
    .execute(pool)
    .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn migrate_is_idempotent() {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();

        migrate(&pool).await.unwrap();
        migrate(&pool).await.unwrap();

        sqlx::query("SELECT id FROM news LIMIT 1")
            .fetch_optional(&pool)
            .await
            .unwrap();
    }
}
