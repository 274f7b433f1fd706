//! Foundation types for the fleet rental system.
//!
//! Every other fleet crate depends on `fleet-types`. The types here are plain
//! data holders: they know how to validate, parse, and render themselves, but
//! never touch the filesystem.
//!
//! # Key Types
//!
//! - [`Plate`]: System-wide unique vehicle identifier
//! - [`VehicleType`]: SEDAN, SUV, or VAN
//! - [`Vehicle`]: A plate, a type, and an odometer reading
//! - [`RentalRecord`]: A vehicle currently out, with its discount flag
//! - [`Transaction`]: An immutable record of a completed return
//! - [`pricing`]: Distance-based charges and the lot discount

pub mod error;
pub mod names;
pub mod plate;
pub mod pricing;
pub mod rental;
pub mod vehicle;

pub use error::TypeError;
pub use names::{validate_location, validate_lot_name};
pub use plate::Plate;
pub use pricing::{charge_for, discount_for, LOT_DISCOUNT_PERCENT};
pub use rental::{discount_label, RentalRecord, Transaction};
pub use vehicle::{Vehicle, VehicleType};
