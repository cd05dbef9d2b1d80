//! Parcel status update persistence.

use chrono::{DateTime, NaiveTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use sqlx::sqlite::SqlitePool;

/// One hand-curated status update for a parcel.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ParcelUpdate {
    pub id: i64,
    /// Parcel code the update belongs to.
    pub code: String,
    /// When the event happened.
    pub time: DateTime<Utc>,
    /// What happened ("Arrived at sorting facility").
    pub event: String,
    /// Where it happened.
    pub location: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields of an update as supplied by the admin tooling.
///
/// Everything is optional: creation fills defaults, edits only touch the
/// fields that are present.
#[derive(Debug, Clone, Default)]
pub struct UpdateInput {
    pub time: Option<DateTime<Utc>>,
    pub event: Option<String>,
    pub location: Option<String>,
}

/// Data access for parcels and their status updates.
#[derive(Clone)]
pub struct ParcelStore {
    pool: SqlitePool,
}

impl ParcelStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// All updates for a parcel, newest first.
    pub async fn list(&self, code: &str) -> Result<Vec<ParcelUpdate>, sqlx::Error> {
        sqlx::query_as(
            "SELECT id, code, time, event, location, created_at, updated_at \
             FROM parcel_updates WHERE code = ? \
             ORDER BY time DESC, created_at DESC",
        )
        .bind(code)
        .fetch_all(&self.pool)
        .await
    }

    /// Insert an update, creating the parcel row on first use.
    ///
    /// A missing time defaults to today's UTC midnight so hand-entered
    /// updates land on the right day.
    pub async fn create(
        &self,
        code: &str,
        input: &UpdateInput,
    ) -> Result<ParcelUpdate, sqlx::Error> {
        sqlx::query("INSERT OR IGNORE INTO parcels (code) VALUES (?)")
            .bind(code)
            .execute(&self.pool)
            .await?;

        let now = Utc::now();
        sqlx::query_as(
            "INSERT INTO parcel_updates (code, time, event, location, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?) \
             RETURNING id, code, time, event, location, created_at, updated_at",
        )
        .bind(code)
        .bind(input.time.unwrap_or_else(today_midnight))
        .bind(input.event.as_deref().unwrap_or(""))
        .bind(input.location.as_deref().unwrap_or(""))
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await
    }

    /// Change an update, touching only the provided fields.
    ///
    /// Without an explicit id the parcel's newest update is targeted.
    /// Returns `None` when there is nothing to edit.
    pub async fn update(
        &self,
        code: &str,
        id: Option<i64>,
        input: &UpdateInput,
    ) -> Result<Option<ParcelUpdate>, sqlx::Error> {
        let Some(target) = self.target_id(code, id).await? else {
            return Ok(None);
        };

        sqlx::query_as(
            "UPDATE parcel_updates SET \
                 time = COALESCE(?, time), \
                 event = COALESCE(?, event), \
                 location = COALESCE(?, location), \
                 updated_at = ? \
             WHERE id = ? AND code = ? \
             RETURNING id, code, time, event, location, created_at, updated_at",
        )
        .bind(input.time)
        .bind(&input.event)
        .bind(&input.location)
        .bind(Utc::now())
        .bind(target)
        .bind(code)
        .fetch_optional(&self.pool)
        .await
    }

    /// Remove an update (the newest one when no id is given).
    pub async fn delete(
        &self,
        code: &str,
        id: Option<i64>,
    ) -> Result<Option<ParcelUpdate>, sqlx::Error> {
        let Some(target) = self.target_id(code, id).await? else {
            return Ok(None);
        };

        sqlx::query_as(
            "DELETE FROM parcel_updates WHERE id = ? AND code = ? \
             RETURNING id, code, time, event, location, created_at, updated_at",
        )
        .bind(target)
        .bind(code)
        .fetch_optional(&self.pool)
        .await
    }

    /// The explicit target id, or the parcel's newest update.
    async fn target_id(&self, code: &str, id: Option<i64>) -> Result<Option<i64>, sqlx::Error> {
        if id.is_some() {
            return Ok(id);
        }
        sqlx::query_scalar(
            "SELECT id FROM parcel_updates WHERE code = ? \
             ORDER BY time DESC, created_at DESC LIMIT 1",
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await
    }
}

/// Today at 00:00:00 UTC.
fn today_midnight() -> DateTime<Utc> {
    Utc::now().date_naive().and_time(NaiveTime::MIN).and_utc()
}
