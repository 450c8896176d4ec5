//! SQLite load store implementation
//!
//! Implements [`LoadStore`] over the `loads` and `bookings` tables. Every
//! call runs on the blocking pool with its own pooled connection; multi-step
//! writes use a transaction so readers never observe half a booking.

use std::sync::Arc;

use application::{ApplicationError, BookedLoad, LoadStore};
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use domain::{
    Booking, BookingRecord, CallDuration, Load, LoadId, LoadStatus, LoadUpdate, McNumber, Rate,
};
use rusqlite::types::Type;
use rusqlite::{Connection, ErrorCode, OptionalExtension, Row, TransactionBehavior, params};
use tokio::task;
use tracing::{debug, info, instrument};

use super::connection::ConnectionPool;

const LOAD_COLUMNS: &str = "load_id, origin, destination, pickup_datetime, delivery_datetime, \
     equipment_type, loadboard_rate, notes, weight, commodity_type, num_of_pieces, miles, \
     dimensions, status, final_rate, booked_at";

/// SQLite-backed load store
#[derive(Debug, Clone)]
pub struct SqliteLoadStore {
    pool: Arc<ConnectionPool>,
}

impl SqliteLoadStore {
    /// Create a new SQLite load store
    #[must_use]
    pub const fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }
}

fn internal(e: impl std::fmt::Display) -> ApplicationError {
    ApplicationError::Internal(e.to_string())
}

#[async_trait]
impl LoadStore for SqliteLoadStore {
    #[instrument(skip_all, fields(load_id = %load_id))]
    async fn get(&self, load_id: &LoadId) -> Result<Option<Load>, ApplicationError> {
        let pool = Arc::clone(&self.pool);
        let load_id = load_id.clone();

        task::spawn_blocking(move || {
            let conn = pool.get().map_err(internal)?;
            select_load(&conn, &load_id).map_err(internal)
        })
        .await
        .map_err(internal)?
    }

    #[instrument(skip(self))]
    async fn list_all(&self) -> Result<Vec<Load>, ApplicationError> {
        let pool = Arc::clone(&self.pool);

        task::spawn_blocking(move || {
            let conn = pool.get().map_err(internal)?;
            let mut stmt = conn
                .prepare(&format!(
                    "SELECT {LOAD_COLUMNS} FROM loads ORDER BY pickup_datetime DESC, rowid ASC"
                ))
                .map_err(internal)?;

            let loads = stmt
                .query_map([], |row| row_to_load(row, 0))
                .map_err(internal)?
                .collect::<Result<Vec<_>, _>>()
                .map_err(internal)?;

            debug!(count = loads.len(), "Listed loads");
            Ok(loads)
        })
        .await
        .map_err(internal)?
    }

    #[instrument(skip_all, fields(load_id = %load.load_id))]
    async fn create(&self, load: &Load) -> Result<(), ApplicationError> {
        let pool = Arc::clone(&self.pool);
        let load = load.clone();

        task::spawn_blocking(move || {
            let conn = pool.get().map_err(internal)?;
            match insert_load(&conn, &load) {
                Ok(()) => {
                    debug!("Created load");
                    Ok(())
                },
                Err(e) if is_constraint_violation(&e) => Err(ApplicationError::Conflict(
                    format!("Load {} already exists", load.load_id),
                )),
                Err(e) => Err(internal(e)),
            }
        })
        .await
        .map_err(internal)?
    }

    #[instrument(skip_all, fields(load_id = %load_id))]
    async fn update(
        &self,
        load_id: &LoadId,
        update: &LoadUpdate,
    ) -> Result<Load, ApplicationError> {
        let pool = Arc::clone(&self.pool);
        let load_id = load_id.clone();
        let update = update.clone();

        task::spawn_blocking(move || {
            let mut conn = pool.get().map_err(internal)?;
            let tx = conn.transaction().map_err(internal)?;

            let mut load = select_load(&tx, &load_id)
                .map_err(internal)?
                .ok_or_else(|| ApplicationError::NotFound(format!("Load {load_id}")))?;
            update.apply(&mut load);

            tx.execute(
                "UPDATE loads SET origin = ?2, destination = ?3, pickup_datetime = ?4,
                    delivery_datetime = ?5, equipment_type = ?6, loadboard_rate = ?7,
                    notes = ?8, weight = ?9, commodity_type = ?10, num_of_pieces = ?11,
                    miles = ?12, dimensions = ?13, status = ?14, final_rate = ?15,
                    booked_at = ?16
                 WHERE load_id = ?1",
                params![
                    load.load_id.as_str(),
                    load.origin,
                    load.destination,
                    load.pickup_datetime,
                    load.delivery_datetime,
                    load.equipment_type,
                    load.loadboard_rate,
                    load.notes,
                    load.weight,
                    load.commodity_type,
                    load.num_of_pieces,
                    load.miles,
                    load.dimensions,
                    load.status.as_str(),
                    load.final_rate,
                    load.booked_at.map(format_timestamp),
                ],
            )
            .map_err(internal)?;
            tx.commit().map_err(internal)?;

            debug!("Updated load");
            Ok(load)
        })
        .await
        .map_err(internal)?
    }

    #[instrument(skip_all, fields(load_id = %load_id))]
    async fn delete(&self, load_id: &LoadId) -> Result<(), ApplicationError> {
        let pool = Arc::clone(&self.pool);
        let load_id = load_id.clone();

        task::spawn_blocking(move || {
            let conn = pool.get().map_err(internal)?;
            let deleted = conn
                .execute("DELETE FROM loads WHERE load_id = ?1", [load_id.as_str()])
                .map_err(internal)?;

            if deleted == 0 {
                return Err(ApplicationError::NotFound(format!("Load {load_id}")));
            }
            debug!("Deleted load");
            Ok(())
        })
        .await
        .map_err(internal)?
    }

    #[instrument(skip_all, fields(load_id = %booking.load_id, mc_num = %booking.mc_num))]
    async fn append_booking(&self, booking: &Booking) -> Result<Booking, ApplicationError> {
        let pool = Arc::clone(&self.pool);
        let booking = booking.clone();

        task::spawn_blocking(move || {
            let conn = pool.get().map_err(internal)?;
            let id = insert_booking(&conn, &booking).map_err(internal)?;
            Ok(Booking {
                id: Some(id),
                ..booking
            })
        })
        .await
        .map_err(internal)?
    }

    #[instrument(skip(self))]
    async fn list_bookings(&self) -> Result<Vec<BookingRecord>, ApplicationError> {
        let pool = Arc::clone(&self.pool);

        task::spawn_blocking(move || {
            let conn = pool.get().map_err(internal)?;
            let mut stmt = conn
                .prepare(
                    "SELECT b.id, b.load_id, b.mc_num, b.initial_rate, b.final_rate,
                            b.transcript, b.sentiment, b.duration, b.timestamp,
                            l.load_id, l.origin, l.destination, l.pickup_datetime,
                            l.delivery_datetime, l.equipment_type, l.loadboard_rate, l.notes,
                            l.weight, l.commodity_type, l.num_of_pieces, l.miles,
                            l.dimensions, l.status, l.final_rate, l.booked_at
                     FROM bookings b
                     LEFT JOIN loads l ON l.load_id = b.load_id
                     ORDER BY b.timestamp DESC, b.id DESC",
                )
                .map_err(internal)?;

            let records = stmt
                .query_map([], |row| {
                    let booking = row_to_booking(row)?;
                    let load = match row.get::<_, Option<String>>(9)? {
                        Some(_) => Some(row_to_load(row, 9)?),
                        None => None,
                    };
                    Ok(BookingRecord { booking, load })
                })
                .map_err(internal)?
                .collect::<Result<Vec<_>, _>>()
                .map_err(internal)?;

            Ok(records)
        })
        .await
        .map_err(internal)?
    }

    #[instrument(skip_all, fields(load_id = %load_id, mc_num = %booking.mc_num))]
    async fn book_load(
        &self,
        load_id: &LoadId,
        booking: &Booking,
        allow_rebooking: bool,
    ) -> Result<BookedLoad, ApplicationError> {
        let pool = Arc::clone(&self.pool);
        let load_id = load_id.clone();
        let booking = booking.clone();

        task::spawn_blocking(move || {
            let mut conn = pool.get().map_err(internal)?;
            // Take the write lock up front so concurrent bookings serialize on the status read
            let tx = conn
                .transaction_with_behavior(TransactionBehavior::Immediate)
                .map_err(internal)?;

            let mut load = select_load(&tx, &load_id)
                .map_err(internal)?
                .ok_or_else(|| ApplicationError::NotFound(format!("Load {load_id}")))?;
            if load.status.is_booked() && !allow_rebooking {
                return Err(ApplicationError::Conflict(format!(
                    "Load {load_id} is already booked"
                )));
            }
            load.mark_booked(booking.final_rate.map(|r| r.value()), booking.timestamp);

            tx.execute(
                "UPDATE loads SET status = ?2, final_rate = ?3, booked_at = ?4 WHERE load_id = ?1",
                params![
                    load.load_id.as_str(),
                    load.status.as_str(),
                    load.final_rate,
                    load.booked_at.map(format_timestamp),
                ],
            )
            .map_err(internal)?;

            let id = insert_booking(&tx, &booking).map_err(internal)?;
            tx.commit().map_err(internal)?;

            info!(booking_id = id, "Load booked");
            Ok(BookedLoad {
                load,
                booking: Booking {
                    id: Some(id),
                    ..booking
                },
            })
        })
        .await
        .map_err(internal)?
    }

    async fn ping(&self) -> Result<(), ApplicationError> {
        let pool = Arc::clone(&self.pool);

        task::spawn_blocking(move || {
            let conn = pool.get().map_err(internal)?;
            conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))
                .map_err(internal)?;
            Ok(())
        })
        .await
        .map_err(internal)?
    }
}

fn select_load(conn: &Connection, load_id: &LoadId) -> rusqlite::Result<Option<Load>> {
    conn.query_row(
        &format!("SELECT {LOAD_COLUMNS} FROM loads WHERE load_id = ?1"),
        [load_id.as_str()],
        |row| row_to_load(row, 0),
    )
    .optional()
}

/// Insert a load row (shared with seeding)
pub(crate) fn insert_load(conn: &Connection, load: &Load) -> rusqlite::Result<()> {
    conn.execute(
        &format!(
            "INSERT INTO loads ({LOAD_COLUMNS})
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)"
        ),
        params![
            load.load_id.as_str(),
            load.origin,
            load.destination,
            load.pickup_datetime,
            load.delivery_datetime,
            load.equipment_type,
            load.loadboard_rate,
            load.notes,
            load.weight,
            load.commodity_type,
            load.num_of_pieces,
            load.miles,
            load.dimensions,
            load.status.as_str(),
            load.final_rate,
            load.booked_at.map(format_timestamp),
        ],
    )?;
    Ok(())
}

fn insert_booking(conn: &Connection, booking: &Booking) -> rusqlite::Result<i64> {
    conn.execute(
        "INSERT INTO bookings (load_id, mc_num, initial_rate, final_rate, transcript,
                               sentiment, duration, timestamp)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            booking.load_id.as_str(),
            booking.mc_num.as_str(),
            booking.initial_rate.map(|r| r.value()),
            booking.final_rate.map(|r| r.value()),
            booking.transcript,
            booking.sentiment,
            booking.duration.map(|d| d.as_secs()),
            format_timestamp(booking.timestamp),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

fn is_constraint_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _) if e.code == ErrorCode::ConstraintViolation
    )
}

fn conversion_error(
    idx: usize,
    err: impl std::error::Error + Send + Sync + 'static,
) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(err))
}

/// Fixed-width UTC timestamps so text ordering matches time ordering
fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_timestamp(idx: usize, value: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| conversion_error(idx, e))
}

/// Map the sixteen load columns starting at `base`
fn row_to_load(row: &Row<'_>, base: usize) -> rusqlite::Result<Load> {
    let load_id: String = row.get(base)?;
    let status: String = row.get(base + 13)?;
    let booked_at: Option<String> = row.get(base + 15)?;

    Ok(Load {
        load_id: LoadId::parse(&load_id).map_err(|e| conversion_error(base, e))?,
        origin: row.get(base + 1)?,
        destination: row.get(base + 2)?,
        pickup_datetime: row.get(base + 3)?,
        delivery_datetime: row.get(base + 4)?,
        equipment_type: row.get(base + 5)?,
        loadboard_rate: row.get(base + 6)?,
        notes: row.get(base + 7)?,
        weight: row.get(base + 8)?,
        commodity_type: row.get(base + 9)?,
        num_of_pieces: row.get(base + 10)?,
        miles: row.get(base + 11)?,
        dimensions: row.get(base + 12)?,
        status: status
            .parse::<LoadStatus>()
            .map_err(|e| conversion_error(base + 13, e))?,
        final_rate: row.get(base + 14)?,
        booked_at: booked_at
            .as_deref()
            .map(|s| parse_timestamp(base + 15, s))
            .transpose()?,
    })
}

fn row_to_booking(row: &Row<'_>) -> rusqlite::Result<Booking> {
    let load_id: String = row.get(1)?;
    let mc_num: String = row.get(2)?;
    let initial_rate: Option<f64> = row.get(3)?;
    let final_rate: Option<f64> = row.get(4)?;
    let duration: Option<f64> = row.get(7)?;
    let timestamp: String = row.get(8)?;

    Ok(Booking {
        id: Some(row.get(0)?),
        load_id: LoadId::parse(&load_id).map_err(|e| conversion_error(1, e))?,
        mc_num: McNumber::parse(&mc_num).map_err(|e| conversion_error(2, e))?,
        initial_rate: initial_rate
            .map(Rate::new)
            .transpose()
            .map_err(|e| conversion_error(3, e))?,
        final_rate: final_rate
            .map(Rate::new)
            .transpose()
            .map_err(|e| conversion_error(4, e))?,
        transcript: row.get(5)?,
        sentiment: row.get(6)?,
        duration: duration
            .map(CallDuration::from_secs)
            .transpose()
            .map_err(|e| conversion_error(7, e))?,
        timestamp: parse_timestamp(8, &timestamp)?,
    })
}
