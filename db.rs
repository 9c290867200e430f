use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{params, Connection, OptionalExtension, Row, TransactionBehavior};
use std::path::Path;
use std::time::Duration;
use crate::config::StoreConfig;
use crate::error::Result;
use crate::models::{
    parking_from_text, parking_to_text, Hike, HikeFields, NewObservation, Observation,
    WriteOutcome,
};
use crate::schema;

pub type DbPool = r2d2::Pool<SqliteConnectionManager>;
pub type DbConnection = r2d2::PooledConnection<SqliteConnectionManager>;

const HIKE_COLUMNS: &str = "id, name, location, date, parking, length, difficulty, description";
const OBSERVATION_COLUMNS: &str = "id, hike_id, observation, time, image_path";

/// Opens the connection pool for `db_path` and runs migrations.
pub fn init_database(db_path: &Path, config: &StoreConfig) -> Result<DbPool> {
    log::info!("Database path: {}", db_path.display());

    // Ensure the parent directory exists
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let busy_timeout = Duration::from_millis(config.busy_timeout_ms);
    let manager = SqliteConnectionManager::file(db_path)
        .with_init(move |conn| init_connection(conn, busy_timeout));
    let pool = r2d2::Pool::builder()
        .max_size(config.pool_size.max(1))
        .build(manager)?;

    run_migrations(&pool.get()?)?;

    Ok(pool)
}

/// Per-connection settings. `foreign_keys` is connection-scoped in SQLite, so
/// every pooled connection needs it for the cascade to fire.
fn init_connection(conn: &mut Connection, busy_timeout: Duration) -> rusqlite::Result<()> {
    conn.busy_timeout(busy_timeout)?;
    conn.pragma_update(None, "foreign_keys", "ON")?;
    conn.pragma_update(None, "journal_mode", "WAL")
}

/// Applies all pending database migrations.
fn run_migrations(connection: &DbConnection) -> Result<()> {
    let connection: &Connection = connection;

    log::info!("Running database migrations...");

    // Migration 0001: Initial Schema
    connection.execute_batch(schema::MIGRATION_0001)?;

    log::info!("Migrations applied successfully.");
    Ok(())
}

fn hike_from_row(row: &Row<'_>) -> rusqlite::Result<Hike> {
    Ok(Hike {
        id: row.get(0)?,
        fields: HikeFields {
            name: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
            location: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
            date: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
            parking: parking_from_text(row.get::<_, Option<String>>(4)?.as_deref()),
            length: row.get::<_, Option<String>>(5)?.unwrap_or_default(),
            difficulty: row.get(6)?,
            description: row.get(7)?,
        },
    })
}

fn observation_from_row(row: &Row<'_>) -> rusqlite::Result<Observation> {
    Ok(Observation {
        id: row.get(0)?,
        hike_id: row.get(1)?,
        observation: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
        time: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
        image_path: row.get(4)?,
    })
}

pub fn add_hike(conn: &Connection, fields: &HikeFields) -> Result<i64> {
    conn.execute(
        "INSERT INTO Hikes (name, location, date, parking, length, difficulty, description)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            fields.name,
            fields.location,
            fields.date,
            parking_to_text(fields.parking),
            fields.length,
            fields.difficulty,
            fields.description,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn get_hikes(conn: &Connection) -> Result<Vec<Hike>> {
    let mut stmt = conn.prepare(&format!("SELECT {HIKE_COLUMNS} FROM Hikes ORDER BY id DESC"))?;
    let hikes = stmt
        .query_map([], hike_from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(hikes)
}

pub fn get_hike(conn: &Connection, id: i64) -> Result<Option<Hike>> {
    let hike = conn
        .query_row(
            &format!("SELECT {HIKE_COLUMNS} FROM Hikes WHERE id = ?1"),
            params![id],
            hike_from_row,
        )
        .optional()?;
    Ok(hike)
}

pub fn update_hike(conn: &Connection, id: i64, fields: &HikeFields) -> Result<WriteOutcome> {
    let rows = conn.execute(
        "UPDATE Hikes
         SET name = ?1, location = ?2, date = ?3, parking = ?4, length = ?5,
             difficulty = ?6, description = ?7
         WHERE id = ?8",
        params![
            fields.name,
            fields.location,
            fields.date,
            parking_to_text(fields.parking),
            fields.length,
            fields.difficulty,
            fields.description,
            id,
        ],
    )?;
    Ok(WriteOutcome::from_rows(rows))
}

/// Removes a hike and its observations in one immediate transaction.
///
/// Observations go first so no reader ever sees them without their hike; the
/// schema cascade covers anything inserted through other connections.
pub fn delete_hike(conn: &mut Connection, id: i64) -> Result<WriteOutcome> {
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
    let observations = tx.execute("DELETE FROM Observations WHERE hike_id = ?1", params![id])?;
    let rows = tx.execute("DELETE FROM Hikes WHERE id = ?1", params![id])?;
    tx.commit()?;
    log::debug!("Deleted hike {id} ({rows} row, {observations} observations)");
    Ok(WriteOutcome::from_rows(rows))
}

pub fn add_observation(conn: &Connection, observation: &NewObservation) -> Result<i64> {
    conn.execute(
        "INSERT INTO Observations (hike_id, observation, time, image_path) VALUES (?1, ?2, ?3, ?4)",
        params![
            observation.hike_id,
            observation.observation,
            observation.time,
            observation.image_path,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn get_observations(conn: &Connection, hike_id: i64) -> Result<Vec<Observation>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {OBSERVATION_COLUMNS} FROM Observations WHERE hike_id = ?1 ORDER BY id DESC"
    ))?;
    let observations = stmt
        .query_map(params![hike_id], observation_from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(observations)
}

pub fn delete_image_observations(conn: &Connection, hike_id: i64) -> Result<usize> {
    let rows = conn.execute(
        "DELETE FROM Observations WHERE hike_id = ?1 AND image_path IS NOT NULL",
        params![hike_id],
    )?;
    Ok(rows)
}

/// Image path of the newest observation with a non-empty photo path.
pub fn cover_photo(conn: &Connection, hike_id: i64) -> Result<Option<String>> {
    let path = conn
        .query_row(
            "SELECT image_path FROM Observations
             WHERE hike_id = ?1 AND image_path IS NOT NULL AND image_path <> ''
             ORDER BY id DESC LIMIT 1",
            params![hike_id],
            |row| row.get(0),
        )
        .optional()?;
    Ok(path)
}
