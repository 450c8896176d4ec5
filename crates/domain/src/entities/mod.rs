//! Domain entities - Objects with identity and lifecycle

mod booking;
mod load;

pub use booking::{Booking, BookingRecord};
pub use load::{Load, LoadUpdate};
