//! Storage interfaces for the three shared stores.
//!
//! Any backend (shared files, in-memory) implements these traits. File
//! backends must run every read-decide-write operation as a single critical
//! section under one lock on one file; no operation may hold locks on two
//! files at once.

use std::collections::BTreeSet;

use fleet_types::{Plate, RentalRecord, Vehicle, VehicleType};

use crate::error::StoreResult;

/// Global set of issued plates.
pub trait PlateRegistry: Send + Sync {
    /// Issue a plate that has never been issued before and record it.
    fn generate_unique_plate(&self) -> StoreResult<Plate>;

    /// All plates issued so far.
    fn issued(&self) -> StoreResult<BTreeSet<Plate>>;

    /// Whether `plate` has been issued.
    fn contains(&self, plate: &str) -> StoreResult<bool> {
        Ok(self.issued()?.contains(plate))
    }
}

/// Durable per-lot collections of available vehicles.
pub trait LotStore: Send + Sync {
    /// Every vehicle in the lot, in file order. A missing lot is empty.
    fn read_all(&self, lot: &str) -> StoreResult<Vec<Vehicle>>;

    /// Atomically remove and return the first vehicle of `vehicle_type`.
    ///
    /// Returns `Ok(None)` if the lot has no such vehicle (or does not exist).
    fn take_first_of_type(&self, lot: &str, vehicle_type: VehicleType)
        -> StoreResult<Option<Vehicle>>;

    /// Atomically append several vehicles to the lot.
    fn put_all(&self, lot: &str, vehicles: &[Vehicle]) -> StoreResult<()>;

    /// Atomically remove and return the vehicle whose plate matches
    /// `plate` case-insensitively.
    fn remove_by_plate(&self, lot: &str, plate: &str) -> StoreResult<Option<Vehicle>>;

    /// Atomically append one vehicle to the lot.
    fn put(&self, lot: &str, vehicle: &Vehicle) -> StoreResult<()> {
        self.put_all(lot, std::slice::from_ref(vehicle))
    }
}

/// Global log of vehicles currently rented by some shop.
pub trait RentalRegistry: Send + Sync {
    /// Record a new outstanding rental.
    fn append(&self, record: &RentalRecord) -> StoreResult<()>;

    /// Atomically remove and return the first outstanding rental for `plate`.
    fn take_by_plate(&self, plate: &str) -> StoreResult<Option<RentalRecord>>;

    /// Given the plates a shop believes are rented, return those the
    /// registry no longer knows about (and that the shop must drop).
    fn reconcile(&self, local: &[Plate]) -> StoreResult<Vec<Plate>>;

    /// Every outstanding rental, in registry order.
    fn outstanding(&self) -> StoreResult<Vec<RentalRecord>>;
}
