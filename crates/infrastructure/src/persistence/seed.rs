//! Sample loads for a fresh database
//!
//! Three demo loads so the webhook and distance endpoints have something to
//! answer with before a real load board is connected.

use domain::{DomainError, Load, LoadId, LoadStatus};
use tracing::{debug, info};

use super::connection::{ConnectionPool, DatabaseError};
use super::load_store::insert_load;

/// The demo load set
pub fn sample_loads() -> Result<Vec<Load>, DomainError> {
    Ok(vec![
        Load::new(LoadId::parse("LOAD001")?, "Los Angeles, CA", "Phoenix, AZ", 15_000.0)
            .with_schedule("2024-01-15 08:00:00", "2024-01-16 14:00:00")
            .with_equipment_type("Dry Van")
            .with_loadboard_rate(1250.0)
            .with_notes("Fragile electronics - handle with care")
            .with_commodity_type("Electronics")
            .with_num_of_pieces(500)
            .with_miles(372.0)
            .with_dimensions("48x48x96"),
        Load::new(LoadId::parse("LOAD002")?, "Chicago, IL", "Detroit, MI", 22_000.0)
            .with_schedule("2024-01-15 10:30:00", "2024-01-15 18:00:00")
            .with_equipment_type("Reefer")
            .with_loadboard_rate(1800.0)
            .with_notes("Temperature controlled - maintain 35-40°F")
            .with_commodity_type("Frozen Foods")
            .with_num_of_pieces(1200)
            .with_miles(283.0)
            .with_dimensions("53x102x102")
            .with_status(LoadStatus::Calling),
        Load::new(LoadId::parse("LOAD003")?, "Dallas, TX", "Houston, TX", 45_000.0)
            .with_schedule("2024-01-15 06:00:00", "2024-01-15 12:00:00")
            .with_equipment_type("Flatbed")
            .with_loadboard_rate(950.0)
            .with_notes("Heavy machinery - secure properly")
            .with_commodity_type("Industrial Equipment")
            .with_num_of_pieces(8)
            .with_miles(239.0)
            .with_dimensions("48x96x120")
            .with_status(LoadStatus::Ready),
    ])
}

/// Insert the demo loads if the loads table is empty
///
/// Returns the number of rows inserted (0 when loads already exist).
pub fn seed_sample_data(pool: &ConnectionPool) -> Result<usize, DatabaseError> {
    let mut conn = pool.get()?;
    let tx = conn.transaction()?;

    let existing: i64 = tx.query_row("SELECT COUNT(*) FROM loads", [], |row| row.get(0))?;
    if existing > 0 {
        debug!(existing, "Loads present, skipping sample data");
        return Ok(0);
    }

    let loads = sample_loads().map_err(|e| DatabaseError::Migration(e.to_string()))?;
    for load in &loads {
        insert_load(&tx, load)?;
    }
    tx.commit()?;

    info!(count = loads.len(), "Inserted sample loads");
    Ok(loads.len())
}
