//! In-memory stores for testing and embedding.
//!
//! Each store keeps its data behind a `Mutex`, which gives the same
//! one-critical-section-per-operation guarantee the file stores get from
//! advisory locks. Data is lost when the store is dropped.

use std::collections::{BTreeSet, HashMap};
use std::sync::{Mutex, MutexGuard};

use fleet_types::{validate_lot_name, Plate, RentalRecord, Vehicle, VehicleType};

use crate::error::{StoreError, StoreResult};
use crate::traits::{LotStore, PlateRegistry, RentalRegistry};

fn lock<T>(mutex: &Mutex<T>) -> StoreResult<MutexGuard<'_, T>> {
    mutex
        .lock()
        .map_err(|e| StoreError::LockPoisoned(e.to_string()))
}

/// An in-memory implementation of [`LotStore`].
#[derive(Debug, Default)]
pub struct InMemoryLotStore {
    lots: Mutex<HashMap<String, Vec<Vehicle>>>,
}

impl InMemoryLotStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn take_where(
        &self,
        lot: &str,
        select: impl Fn(&Vehicle) -> bool,
    ) -> StoreResult<Option<Vehicle>> {
        validate_lot_name(lot)?;
        let mut lots = lock(&self.lots)?;
        let Some(vehicles) = lots.get_mut(lot) else {
            return Ok(None);
        };
        Ok(vehicles
            .iter()
            .position(select)
            .map(|idx| vehicles.remove(idx)))
    }
}

impl LotStore for InMemoryLotStore {
    fn read_all(&self, lot: &str) -> StoreResult<Vec<Vehicle>> {
        validate_lot_name(lot)?;
        Ok(lock(&self.lots)?.get(lot).cloned().unwrap_or_default())
    }

    fn take_first_of_type(
        &self,
        lot: &str,
        vehicle_type: VehicleType,
    ) -> StoreResult<Option<Vehicle>> {
        self.take_where(lot, |v| v.vehicle_type == vehicle_type)
    }

    fn put_all(&self, lot: &str, vehicles: &[Vehicle]) -> StoreResult<()> {
        validate_lot_name(lot)?;
        lock(&self.lots)?
            .entry(lot.to_string())
            .or_default()
            .extend_from_slice(vehicles);
        Ok(())
    }

    fn remove_by_plate(&self, lot: &str, plate: &str) -> StoreResult<Option<Vehicle>> {
        self.take_where(lot, |v| v.plate.matches(plate))
    }
}

/// An in-memory implementation of [`PlateRegistry`].
#[derive(Debug, Default)]
pub struct InMemoryPlateRegistry {
    issued: Mutex<BTreeSet<Plate>>,
}

impl InMemoryPlateRegistry {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PlateRegistry for InMemoryPlateRegistry {
    fn generate_unique_plate(&self) -> StoreResult<Plate> {
        let mut issued = lock(&self.issued)?;
        let mut rng = rand::thread_rng();
        let mut candidate = Plate::random(&mut rng);
        while issued.contains(&candidate) {
            candidate = Plate::random(&mut rng);
        }
        issued.insert(candidate.clone());
        Ok(candidate)
    }

    fn issued(&self) -> StoreResult<BTreeSet<Plate>> {
        Ok(lock(&self.issued)?.clone())
    }
}

/// An in-memory implementation of [`RentalRegistry`].
#[derive(Debug, Default)]
pub struct InMemoryRentalRegistry {
    records: Mutex<Vec<RentalRecord>>,
}

impl InMemoryRentalRegistry {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RentalRegistry for InMemoryRentalRegistry {
    fn append(&self, record: &RentalRecord) -> StoreResult<()> {
        lock(&self.records)?.push(record.clone());
        Ok(())
    }

    fn take_by_plate(&self, plate: &str) -> StoreResult<Option<RentalRecord>> {
        let mut records = lock(&self.records)?;
        Ok(records
            .iter()
            .position(|r| r.plate().matches(plate))
            .map(|idx| records.remove(idx)))
    }

    fn reconcile(&self, local: &[Plate]) -> StoreResult<Vec<Plate>> {
        let records = lock(&self.records)?;
        Ok(local
            .iter()
            .filter(|plate| !records.iter().any(|r| r.plate() == *plate))
            .cloned()
            .collect())
    }

    fn outstanding(&self) -> StoreResult<Vec<RentalRecord>> {
        Ok(lock(&self.records)?.clone())
    }
}
