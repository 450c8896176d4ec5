//! Database migrations
//!
//! The schema version lives in a one-row `schema_version` table. Each
//! `migrate_vN` step is applied once, in order, when the stored version is
//! behind [`SCHEMA_VERSION`].
//!
//! ## Adding a migration
//!
//! 1. Increment `SCHEMA_VERSION`
//! 2. Add a `migrate_vN` function
//! 3. Call it from `run_migrations`

use rusqlite::Connection;
use tracing::{debug, error, info};

use super::connection::DatabaseError;

/// Current schema version
pub const SCHEMA_VERSION: i32 = 2;

/// Run all pending migrations
pub fn run_migrations(conn: &Connection) -> Result<(), DatabaseError> {
    let current_version = get_schema_version(conn)?;

    if current_version >= SCHEMA_VERSION {
        debug!(version = current_version, "Database schema is up to date");
        return Ok(());
    }

    info!(
        from_version = current_version,
        to_version = SCHEMA_VERSION,
        "Running database migrations"
    );

    if current_version < 1 {
        if let Err(e) = migrate_v1(conn) {
            error!(version = 1, error = %e, "Migration V001 (loads and bookings) failed");
            return Err(e);
        }
    }

    if current_version < 2 {
        if let Err(e) = migrate_v2(conn) {
            error!(version = 2, error = %e, "Migration V002 (booking outcome on loads) failed");
            return Err(e);
        }
    }

    set_schema_version(conn, SCHEMA_VERSION)?;
    info!(version = SCHEMA_VERSION, "Database migrations complete");
    Ok(())
}

/// Current schema version, 0 for a fresh database
pub fn get_schema_version(conn: &Connection) -> Result<i32, DatabaseError> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY
        )",
        [],
    )?;

    let version = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |row| row.get(0),
    )?;

    Ok(version)
}

fn set_schema_version(conn: &Connection, version: i32) -> Result<(), DatabaseError> {
    conn.execute("DELETE FROM schema_version", [])?;
    conn.execute(
        "INSERT INTO schema_version (version) VALUES (?1)",
        [version],
    )?;
    Ok(())
}

/// V001: loads and the booking log
fn migrate_v1(conn: &Connection) -> Result<(), DatabaseError> {
    debug!("Applying migration V001: loads and bookings");

    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS loads (
            load_id TEXT PRIMARY KEY,
            origin TEXT NOT NULL,
            destination TEXT NOT NULL,
            pickup_datetime TEXT,
            delivery_datetime TEXT,
            equipment_type TEXT,
            loadboard_rate REAL,
            notes TEXT,
            weight REAL NOT NULL,
            commodity_type TEXT,
            num_of_pieces INTEGER,
            miles REAL,
            dimensions TEXT,
            status TEXT NOT NULL DEFAULT 'pending'
                CHECK(status IN ('pending', 'calling', 'ready', 'booked'))
        );

        -- Bookings outlive their loads, so no foreign key
        CREATE TABLE IF NOT EXISTS bookings (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            load_id TEXT NOT NULL,
            mc_num TEXT NOT NULL,
            initial_rate REAL,
            final_rate REAL,
            transcript TEXT,
            sentiment TEXT,
            duration REAL,
            timestamp TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_loads_pickup ON loads(pickup_datetime);
        CREATE INDEX IF NOT EXISTS idx_loads_status ON loads(status);
        CREATE INDEX IF NOT EXISTS idx_bookings_load ON bookings(load_id);
        CREATE INDEX IF NOT EXISTS idx_bookings_timestamp ON bookings(timestamp);
        ",
    )?;

    Ok(())
}

/// V002: final rate and booking time on the load itself
fn migrate_v2(conn: &Connection) -> Result<(), DatabaseError> {
    debug!("Applying migration V002: booking outcome on loads");

    conn.execute_batch(
        "
        ALTER TABLE loads ADD COLUMN final_rate REAL;
        ALTER TABLE loads ADD COLUMN booked_at TEXT;
        ",
    )
    .map_err(|e| DatabaseError::Migration(format!("V002: {e}")))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column_names(conn: &Connection, table: &str) -> Vec<String> {
        let mut stmt = conn
            .prepare(&format!("PRAGMA table_info({table})"))
            .unwrap();
        stmt.query_map([], |row| row.get::<_, String>(1))
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap()
    }

    #[test]
    fn fresh_database_reaches_current_version() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        assert_eq!(get_schema_version(&conn).unwrap(), SCHEMA_VERSION);
    }

    #[test]
    fn migrations_are_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        run_migrations(&conn).unwrap();
        assert_eq!(get_schema_version(&conn).unwrap(), SCHEMA_VERSION);
    }

    #[test]
    fn v1_database_is_upgraded() {
        let conn = Connection::open_in_memory().unwrap();
        get_schema_version(&conn).unwrap();
        migrate_v1(&conn).unwrap();
        set_schema_version(&conn, 1).unwrap();
        assert!(!column_names(&conn, "loads").contains(&"final_rate".to_string()));

        run_migrations(&conn).unwrap();

        let columns = column_names(&conn, "loads");
        assert!(columns.contains(&"final_rate".to_string()));
        assert!(columns.contains(&"booked_at".to_string()));
    }

    #[test]
    fn status_check_rejects_unknown_values() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        let result = conn.execute(
            "INSERT INTO loads (load_id, origin, destination, weight, status)
             VALUES ('X', 'A', 'B', 1.0, 'lost')",
            [],
        );
        assert!(result.is_err());
    }
}
