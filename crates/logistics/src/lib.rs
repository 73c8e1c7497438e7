//! `plategrid-logistics` — the Courier and Delivery bounded context.

pub mod courier;
pub mod delivery;
pub mod geo;

pub use courier::{Courier, CourierError, CourierRepository, CourierStatus};
pub use delivery::{Delivery, DeliveryError, DeliveryRepository, DeliveryStatus};
pub use geo::{GeoPoint, InvalidCoordinates};
