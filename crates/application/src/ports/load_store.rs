//! Load store port
//!
//! Persistence of loads and the append-only booking audit log.

use async_trait::async_trait;
use domain::{Booking, BookingRecord, Load, LoadId, LoadUpdate};
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Result of an atomic booking: the flipped load and the stored booking
#[derive(Debug, Clone, PartialEq)]
pub struct BookedLoad {
    pub load: Load,
    pub booking: Booking,
}

/// Port for load and booking persistence
///
/// Errors: `NotFound` for missing loads on update/delete/book, `Conflict`
/// for duplicate ids on create, `Internal` for storage failures. Every
/// mutating call has committed when it returns `Ok`.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait LoadStore: Send + Sync {
    /// Fetch a load by id
    async fn get(&self, load_id: &LoadId) -> Result<Option<Load>, ApplicationError>;

    /// All loads, newest pickup first; ties keep insertion order
    async fn list_all(&self) -> Result<Vec<Load>, ApplicationError>;

    /// Insert a new load
    async fn create(&self, load: &Load) -> Result<(), ApplicationError>;

    /// Apply a partial update and return the stored result
    async fn update(&self, load_id: &LoadId, update: &LoadUpdate)
    -> Result<Load, ApplicationError>;

    /// Remove a load
    async fn delete(&self, load_id: &LoadId) -> Result<(), ApplicationError>;

    /// Append a booking record, returning it with its assigned id
    async fn append_booking(&self, booking: &Booking) -> Result<Booking, ApplicationError>;

    /// All bookings with their loads, newest first
    async fn list_bookings(&self) -> Result<Vec<BookingRecord>, ApplicationError>;

    /// Flip a load to `booked` and append the booking in one transaction
    ///
    /// The status is checked inside the transaction: an already booked load
    /// yields `Conflict` unless `allow_rebooking` is set.
    async fn book_load(
        &self,
        load_id: &LoadId,
        booking: &Booking,
        allow_rebooking: bool,
    ) -> Result<BookedLoad, ApplicationError>;

    /// Check that storage is reachable
    async fn ping(&self) -> Result<(), ApplicationError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn _assert_object_safe(_: &dyn LoadStore) {}

    #[test]
    fn trait_is_send_sync() {
        fn assert_send_sync<T: Send + Sync + ?Sized>() {}
        assert_send_sync::<dyn LoadStore>();
    }
}
