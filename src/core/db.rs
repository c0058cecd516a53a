use std::path::Path;

use serde_json::Value;
use sqlx::{migrate::MigrateDatabase, sqlite::Sqlite, types::Json, SqlitePool};

use crate::{
    core::tournament::{payload_id, tournament_name, with_id, TournamentSummary},
    error::Error,
    util::now_millis,
};

/// The current time, bumped past the newest stored timestamp when the clock
/// has not moved on since the previous save.
const NEXT_UPDATED_AT: &str =
    "max(?, (select coalesce(max(updated_at), 0) + 1 from tournaments))";

/// Handle to the tournament database. Created once at startup and shared.
pub struct TournamentDb {
    db: SqlitePool,
}

impl TournamentDb {
    /// Opens the database at `file`, creating it and its schema when missing.
    pub async fn init(file: &Path) -> Result<Self, Error> {
        let url = format!("sqlite://{}", file.display());
        if !Sqlite::database_exists(&url).await? {
            log::info!("Creating database {}", file.display());
            Sqlite::create_database(&url).await?;
        }

        let db = SqlitePool::connect(&url).await?;
        let store = TournamentDb { db };
        store.migrate().await?;

        log::info!("Database {} ready", file.display());
        Ok(store)
    }

    async fn migrate(&self) -> Result<(), Error> {
        sqlx::query(
            "create table if not exists tournaments(
                        id integer primary key autoincrement,
                        name text not null,
                        state text not null,
                        updated_at integer not null,
                        is_deleted boolean not null default 0
                    );",
        )
        .execute(&self.db)
        .await?;

        // Tables created before soft delete existed lack the flag.
        let has_flag: i64 = sqlx::query_scalar(
            "select count(*) from pragma_table_info('tournaments')
                        where name = 'is_deleted'",
        )
        .fetch_one(&self.db)
        .await?;

        if has_flag == 0 {
            log::info!("Migrating database: adding is_deleted column");
            sqlx::query("alter table tournaments add column is_deleted boolean not null default 0")
                .execute(&self.db)
                .await?;
        }

        // Older tables default `updated_at` to CURRENT_TIMESTAMP text and allow null.
        let converted = sqlx::query(
            "update tournaments
                        set updated_at = coalesce(cast(strftime('%s', updated_at) as integer), 0) * 1000
                        where typeof(updated_at) in ('text', 'null')",
        )
        .execute(&self.db)
        .await?
        .rows_affected();

        if converted > 0 {
            log::info!("Migrating database: converted {} text timestamps", converted);
        }

        Ok(())
    }

    /// Live tournaments, most recently saved first.
    ///
    /// Saves never share an `updated_at` value, so the order is the write order.
    pub async fn get_tournaments(&self) -> Result<Vec<TournamentSummary>, Error> {
        Ok(sqlx::query_as(
            "select id, name, updated_at from tournaments
                        where is_deleted = 0
                        order by updated_at desc, id desc",
        )
        .fetch_all(&self.db)
        .await?)
    }

    /// Stores a snapshot and returns the ID it was saved under.
    ///
    /// A snapshot carrying the ID of an existing row replaces that row and
    /// clears its deleted flag. Any other snapshot gets a fresh row.
    pub async fn save_tournament(&self, payload: &Value) -> Result<i64, Error> {
        let fields = payload
            .as_object()
            .ok_or("tournament snapshot must be a JSON object")?;
        let name = tournament_name(fields);
        let now = now_millis();

        let mut tx = self.db.begin().await?;

        if let Some(id) = payload_id(fields) {
            let updated = sqlx::query(&format!(
                "update tournaments
                            set name = ?, state = ?, updated_at = {}, is_deleted = 0
                            where id = ?",
                NEXT_UPDATED_AT
            ))
            .bind(&name)
            .bind(Json(payload))
            .bind(now)
            .bind(id)
            .execute(&mut *tx)
            .await?;

            if updated.rows_affected() > 0 {
                tx.commit().await?;
                log::debug!("Updated tournament {} ({})", id, name);
                return Ok(id);
            }

            log::debug!("Tournament {} does not exist, saving as new", id);
        }

        let id = sqlx::query(&format!(
            "insert into tournaments(name, state, updated_at, is_deleted) values(?, ?, {}, 0)",
            NEXT_UPDATED_AT
        ))
        .bind(&name)
        .bind(Json(payload))
        .bind(now)
        .execute(&mut *tx)
        .await?
        .last_insert_rowid();

        tx.commit().await?;
        log::debug!("Created tournament {} ({})", id, name);
        Ok(id)
    }

    /// The saved snapshot of a live tournament with its `id` field set.
    pub async fn get_tournament(&self, id: i64) -> Result<Value, Error> {
        let row: Option<(Json<Value>, bool)> =
            sqlx::query_as("select state, is_deleted from tournaments where id = ? limit 1")
                .bind(id)
                .fetch_optional(&self.db)
                .await?;

        match row {
            None => Err(Error::NotFound(id)),
            Some((_, true)) => Err(Error::Gone(id)),
            Some((Json(state), false)) => Ok(with_id(state, id)),
        }
    }

    /// Hides a tournament. Unknown or already deleted IDs are not an error.
    pub async fn delete_tournament(&self, id: i64) -> Result<(), Error> {
        log::debug!("Deleting tournament {}", id);
        self.set_deleted(id, true).await
    }

    /// Undoes [`TournamentDb::delete_tournament`]. Unknown IDs are not an error.
    pub async fn restore_tournament(&self, id: i64) -> Result<(), Error> {
        log::debug!("Restoring tournament {}", id);
        self.set_deleted(id, false).await
    }

    async fn set_deleted(&self, id: i64, deleted: bool) -> Result<(), Error> {
        Ok(sqlx::query("update tournaments set is_deleted = ? where id = ?")
            .bind(deleted)
            .bind(id)
            .execute(&self.db)
            .await
            .map(|_| ())?)
    }
}
