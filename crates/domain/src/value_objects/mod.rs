//! Value objects - immutable objects defined by their attributes

mod geo_location;
mod load_id;
mod load_status;
mod mc_number;
mod rate;

pub use geo_location::{EARTH_RADIUS_MILES, GeoLocation, InvalidCoordinates};
pub use load_id::{LoadId, MAX_LOAD_ID_LEN};
pub use load_status::LoadStatus;
pub use mc_number::McNumber;
pub use rate::{CallDuration, NumericInput, Rate};
