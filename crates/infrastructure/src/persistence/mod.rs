//! Persistence module
//!
//! SQLite storage for loads and the booking log.

pub mod connection;
pub mod load_store;
pub mod migrations;
pub mod seed;

pub use connection::{ConnectionPool, DatabaseError, create_pool};
pub use load_store::SqliteLoadStore;
pub use seed::seed_sample_data;
