//! Lot administration: commissioning new vehicles and decommissioning old
//! ones.

use std::sync::Arc;

use fleet_types::{validate_lot_name, Vehicle, VehicleType};
use tracing::{error, info};

use crate::error::StoreResult;
use crate::traits::{LotStore, PlateRegistry};

/// Composes the plate registry and the lot store for the lot utility.
pub struct LotAdmin {
    lots: Arc<dyn LotStore>,
    plates: Arc<dyn PlateRegistry>,
}

impl LotAdmin {
    pub fn new(lots: Arc<dyn LotStore>, plates: Arc<dyn PlateRegistry>) -> Self {
        Self { lots, plates }
    }

    /// Commission `count` new vehicles of `vehicle_type` into `lot`.
    ///
    /// Each vehicle gets a freshly issued plate and a zero odometer. A plate
    /// that cannot be issued is logged and skipped; the returned list holds
    /// the vehicles actually placed in the lot.
    pub fn add_vehicles(
        &self,
        lot: &str,
        vehicle_type: VehicleType,
        count: usize,
    ) -> StoreResult<Vec<Vehicle>> {
        validate_lot_name(lot)?;
        let mut added = Vec::with_capacity(count);
        for _ in 0..count {
            match self.plates.generate_unique_plate() {
                Ok(plate) => added.push(Vehicle::new(plate, vehicle_type, 0)),
                Err(e) => error!(lot, %vehicle_type, error = %e, "failed to issue plate; skipping vehicle"),
            }
        }
        self.lots.put_all(lot, &added)?;
        info!(lot, %vehicle_type, requested = count, added = added.len(), "vehicles commissioned");
        Ok(added)
    }

    /// Remove a vehicle from `lot` by plate. Returns `None` if it is not
    /// there (it may be at a shop or rented out).
    pub fn remove_vehicle(&self, lot: &str, plate: &str) -> StoreResult<Option<Vehicle>> {
        self.lots.remove_by_plate(lot, plate)
    }

    /// Current contents of `lot`.
    pub fn inventory(&self, lot: &str) -> StoreResult<Vec<Vehicle>> {
        self.lots.read_all(lot)
    }
}
