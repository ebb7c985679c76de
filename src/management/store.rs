//! SQLite store of the extracted top tracks.
//!
//! One table, `top_tracks`, keyed by (username, track_id, term). A refresh
//! replaces every row of a (username, term) pair at once, so the table only
//! ever holds the latest snapshot of each listening window.

use std::{path::Path, str::FromStr, time::Duration};

use sqlx::{
    Row, SqlitePool,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow},
};

use crate::{
    error::StoreError,
    stats::extract::MAX_TRACKS,
    types::{Term, TrackRecord},
};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS top_tracks (
    username    TEXT    NOT NULL,
    track_id    TEXT    NOT NULL,
    term        TEXT    NOT NULL,
    track_name  TEXT    NOT NULL,
    artist_name TEXT    NOT NULL,
    genre       TEXT    NOT NULL,
    play_count  INTEGER NOT NULL,
    PRIMARY KEY (username, track_id, term)
)
"#;

#[derive(Debug, Clone)]
pub struct TrackStore {
    pool: SqlitePool,
}

impl TrackStore {
    /// Opens (and creates, if needed) the database file at `path`.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            async_fs::create_dir_all(parent).await?;
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new().connect_with(options).await?;

        let store = Self { pool };
        store.migrate().await?;
        Ok(store)
    }

    /// Opens a private in-memory database.
    ///
    /// Every SQLite connection to `:memory:` gets its own database, so the pool
    /// is pinned to a single connection that is never recycled.
    pub async fn in_memory() -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?;
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None::<Duration>)
            .max_lifetime(None::<Duration>)
            .connect_with(options)
            .await?;

        let store = Self { pool };
        store.migrate().await?;
        Ok(store)
    }

    async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::query(SCHEMA).execute(&self.pool).await?;
        Ok(())
    }

    /// Replaces all rows of (`username`, `term`) with `records`.
    ///
    /// Records are written in the given order; a record whose `username` or
    /// `term` does not match is stored under the given pair anyway.
    pub async fn replace_tracks(
        &self,
        username: &str,
        term: Term,
        records: &[TrackRecord],
    ) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM top_tracks WHERE username = ? AND term = ?")
            .bind(username)
            .bind(term.as_str())
            .execute(&mut *tx)
            .await?;

        for record in records {
            sqlx::query(
                r#"
                INSERT OR REPLACE INTO top_tracks
                (username, track_id, term, track_name, artist_name, genre, play_count)
                VALUES (?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(username)
            .bind(&record.track_id)
            .bind(term.as_str())
            .bind(&record.track_name)
            .bind(&record.artist_name)
            .bind(&record.genre)
            .bind(i64::from(record.play_count))
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    /// Returns the stored tracks of (`username`, `term`), rank 1 first.
    pub async fn tracks(&self, username: &str, term: Term) -> Result<Vec<TrackRecord>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT username, track_id, term, track_name, artist_name, genre, play_count
            FROM top_tracks
            WHERE username = ? AND term = ?
            ORDER BY play_count ASC, track_name ASC
            LIMIT ?
            "#,
        )
        .bind(username)
        .bind(term.as_str())
        .bind(MAX_TRACKS as i64)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(record_from_row).collect()
    }

    /// The username owning the stored tracks, if there is exactly one.
    pub async fn sole_username(&self) -> Result<Option<String>, StoreError> {
        let rows = sqlx::query("SELECT DISTINCT username FROM top_tracks LIMIT 2")
            .fetch_all(&self.pool)
            .await?;

        match rows.as_slice() {
            [row] => Ok(Some(row.try_get("username")?)),
            _ => Ok(None),
        }
    }

    /// Names of all tables in the database file.
    pub async fn table_names(&self) -> Result<Vec<String>, StoreError> {
        let rows = sqlx::query("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name")
            .fetch_all(&self.pool)
            .await?;

        rows.iter()
            .map(|row| row.try_get::<String, _>("name").map_err(StoreError::from))
            .collect()
    }

    /// First `limit` rows of `top_tracks`, across users and terms.
    pub async fn sample(&self, limit: u32) -> Result<Vec<TrackRecord>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT username, track_id, term, track_name, artist_name, genre, play_count
            FROM top_tracks
            LIMIT ?
            "#,
        )
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(record_from_row).collect()
    }
}

fn record_from_row(row: &SqliteRow) -> Result<TrackRecord, StoreError> {
    let term: String = row.try_get("term")?;
    let term = Term::from_str(&term).map_err(|e| StoreError::Corrupt(e.to_string()))?;
    let play_count: i64 = row.try_get("play_count")?;
    let play_count = u32::try_from(play_count)
        .map_err(|_| StoreError::Corrupt(format!("play_count {} out of range", play_count)))?;

    Ok(TrackRecord {
        username: row.try_get("username")?,
        track_id: row.try_get("track_id")?,
        term,
        track_name: row.try_get("track_name")?,
        artist_name: row.try_get("artist_name")?,
        genre: row.try_get("genre")?,
        play_count,
    })
}
