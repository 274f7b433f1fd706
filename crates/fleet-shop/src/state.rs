//! The in-memory aggregate owned by one shop process.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use fleet_types::{Plate, RentalRecord, Transaction, Vehicle, VehicleType};

/// Everything one shop knows about itself.
///
/// The maps are keyed and ordered by plate, so choosing among several
/// candidates (which sedan to rent, which vehicle to relocate) is
/// deterministic.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShopState {
    pub location: String,
    pub capacity: u32,
    /// Associated lots, in the order they are asked for vehicles.
    pub lots: Vec<String>,
    pub available: BTreeMap<Plate, Vehicle>,
    pub rented: BTreeMap<Plate, RentalRecord>,
    pub history: Vec<Transaction>,
    pub revenue: Decimal,
}

impl ShopState {
    pub fn new(location: impl Into<String>, capacity: u32, lots: Vec<String>) -> Self {
        Self {
            location: location.into(),
            capacity,
            lots,
            available: BTreeMap::new(),
            rented: BTreeMap::new(),
            history: Vec::new(),
            revenue: Decimal::ZERO,
        }
    }

    /// Parking slots not taken by available or rented vehicles. Negative when
    /// the shop is over capacity.
    pub fn empty_slots(&self) -> i64 {
        i64::from(self.capacity) - self.available.len() as i64 - self.rented.len() as i64
    }

    pub fn add_available(&mut self, vehicle: Vehicle) {
        self.available.insert(vehicle.plate.clone(), vehicle);
    }

    pub fn remove_available(&mut self, plate: &Plate) -> Option<Vehicle> {
        self.available.remove(plate)
    }

    /// Remove and return the lowest-plate available vehicle of a type.
    pub fn take_available_of_type(&mut self, vehicle_type: VehicleType) -> Option<Vehicle> {
        let plate = self
            .available
            .values()
            .find(|v| v.vehicle_type == vehicle_type)
            .map(|v| v.plate.clone())?;
        self.available.remove(&plate)
    }

    /// The available vehicle with the highest odometer; ties go to the
    /// lowest plate.
    pub fn highest_odometer(&self) -> Option<&Plate> {
        self.available
            .values()
            .max_by(|a, b| a.odometer.cmp(&b.odometer).then_with(|| b.plate.cmp(&a.plate)))
            .map(|v| &v.plate)
    }

    pub fn start_rental(&mut self, record: RentalRecord) {
        self.rented.insert(record.plate().clone(), record);
    }

    /// Remove a rental by plate, matched case-insensitively.
    pub fn end_rental(&mut self, plate: &str) -> Option<RentalRecord> {
        self.rented.remove(plate.trim().to_ascii_uppercase().as_str())
    }

    pub fn rented_plates(&self) -> Vec<Plate> {
        self.rented.keys().cloned().collect()
    }

    /// Forget rentals the shop can no longer vouch for.
    pub fn drop_rentals(&mut self, plates: &[Plate]) -> Vec<RentalRecord> {
        plates
            .iter()
            .filter_map(|plate| self.rented.remove(plate))
            .collect()
    }

    /// Append a transaction to the history and book its revenue.
    pub fn record_transaction(&mut self, transaction: Transaction) {
        self.revenue += transaction.charge;
        self.history.push(transaction);
    }

    /// Total discount given across the whole history.
    pub fn total_discounts(&self) -> Decimal {
        self.history.iter().map(Transaction::discount_given).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vehicle(plate: &str, vehicle_type: VehicleType, odometer: u64) -> Vehicle {
        Vehicle::new(Plate::new(plate).unwrap(), vehicle_type, odometer)
    }

    fn shop() -> ShopState {
        ShopState::new("SanJose", 3, vec!["north".into()])
    }

    #[test]
    fn empty_slots_counts_both_sets() {
        let mut state = shop();
        assert_eq!(state.empty_slots(), 3);
        state.add_available(vehicle("AAA-001", VehicleType::Sedan, 0));
        state.start_rental(RentalRecord::new(vehicle("BBB-002", VehicleType::Suv, 0), false));
        assert_eq!(state.empty_slots(), 1);
        state.add_available(vehicle("CCC-003", VehicleType::Van, 0));
        state.add_available(vehicle("DDD-004", VehicleType::Van, 0));
        assert_eq!(state.empty_slots(), -1);
    }

    #[test]
    fn take_available_prefers_lowest_plate() {
        let mut state = shop();
        state.add_available(vehicle("ZZZ-999", VehicleType::Sedan, 0));
        state.add_available(vehicle("AAA-001", VehicleType::Sedan, 0));
        state.add_available(vehicle("MMM-500", VehicleType::Van, 0));

        let taken = state.take_available_of_type(VehicleType::Sedan).unwrap();
        assert_eq!(taken.plate.as_str(), "AAA-001");
        assert!(state.take_available_of_type(VehicleType::Suv).is_none());
        assert_eq!(state.available.len(), 2);
    }

    #[test]
    fn highest_odometer_breaks_ties_by_plate() {
        let mut state = shop();
        assert!(state.highest_odometer().is_none());
        state.add_available(vehicle("BBB-002", VehicleType::Sedan, 900));
        state.add_available(vehicle("AAA-001", VehicleType::Sedan, 900));
        state.add_available(vehicle("CCC-003", VehicleType::Sedan, 100));
        assert_eq!(state.highest_odometer().unwrap().as_str(), "AAA-001");
    }

    #[test]
    fn transactions_book_revenue_and_discounts() {
        let mut state = shop();
        state.record_transaction(Transaction::new(Plate::new("AAA-001").unwrap(), 100, false));
        state.record_transaction(Transaction::new(Plate::new("BBB-002").unwrap(), 100, true));
        assert_eq!(state.revenue, Decimal::from(190));
        assert_eq!(state.total_discounts(), Decimal::from(10));
        assert_eq!(state.history.len(), 2);
    }

    #[test]
    fn drop_rentals_returns_removed_records() {
        let mut state = shop();
        state.start_rental(RentalRecord::new(vehicle("AAA-001", VehicleType::Sedan, 0), false));
        let dropped = state.drop_rentals(&[
            Plate::new("AAA-001").unwrap(),
            Plate::new("NOT-HERE").unwrap(),
        ]);
        assert_eq!(dropped.len(), 1);
        assert!(state.rented.is_empty());
    }
}
