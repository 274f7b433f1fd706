//! Pure text rendering of shop state and command results.
//!
//! Nothing here touches a file or a lock; every function maps state to a
//! string.

use std::fmt::Write;

use fleet_types::{discount_label, Transaction, Vehicle, LOT_DISCOUNT_PERCENT};

use crate::state::ShopState;

const RULE: &str = "----------------------------------------";

/// The `LIST` report.
pub fn render_list(state: &ShopState) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "LIST: Requesting shop status report for {}", state.location);
    let _ = writeln!(out, "{RULE}");
    let _ = writeln!(out, "Shop Status Report");
    let _ = writeln!(out, "Available Parking Spaces: {}", state.empty_slots());

    let _ = writeln!(out, "\nVehicles in Shop Inventory:");
    for vehicle in state.available.values() {
        let _ = writeln!(out, "   {vehicle}");
    }

    let _ = writeln!(out, "\nVehicles Currently Rented:");
    for record in state.rented.values() {
        let _ = writeln!(out, "   {}", record.vehicle);
    }

    let _ = writeln!(out, "\nTotal Revenue: ${:.2}", state.revenue);
    out.push_str(RULE);
    out
}

/// The `TRANSACTIONS` report.
pub fn render_transactions(state: &ShopState) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "TRANSACTIONS: Requesting transaction history for {}",
        state.location
    );
    let _ = writeln!(out, "{RULE}");
    let _ = writeln!(out, "Transaction History");
    if state.history.is_empty() {
        let _ = writeln!(out, "   (no transactions)");
    }
    for transaction in &state.history {
        let _ = writeln!(out, "{transaction}");
    }

    let _ = writeln!(out, "\nTotal Earnings: ${:.2}", state.revenue);
    let _ = writeln!(out, "Total Discounts Given: ${:.2}", state.total_discounts());
    out.push_str(RULE);
    out
}

/// The diagnostic `<location>.txt` mirror written next to the snapshot.
pub fn render_mirror(state: &ShopState) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "LOCATION: {}", state.location);
    let _ = writeln!(out, "SPACES_AVAILABLE: {}", state.capacity);
    let _ = writeln!(out, "EMPTY_SLOTS: {}", state.empty_slots());
    let _ = writeln!(out, "CASH_EARNED: ${:.2}", state.revenue);
    if !state.lots.is_empty() {
        let _ = writeln!(out, "LOTS: {}", state.lots.join(","));
    }
    out.push('\n');

    let _ = writeln!(out, "INVENTORY:");
    for v in state.available.values() {
        let _ = writeln!(out, "  {},{},{}", v.plate, v.vehicle_type, v.odometer);
    }
    out.push('\n');

    let _ = writeln!(out, "RENTED_OUT:");
    for record in state.rented.values() {
        let v = &record.vehicle;
        let _ = writeln!(
            out,
            "  {},{},{},discount={}",
            v.plate,
            v.vehicle_type,
            v.odometer,
            discount_label(record.discount)
        );
    }
    out.push('\n');

    let _ = writeln!(out, "TRANSACTIONS:");
    for t in &state.history {
        let _ = writeln!(
            out,
            "  {},{},discount={},${:.2}",
            t.plate,
            t.distance,
            t.discount_label(),
            t.charge
        );
    }
    out
}

pub fn render_rented_from_shop(vehicle: &Vehicle) -> String {
    format!(
        "RENT: Vehicle {} ({}) has been provided from shop inventory.",
        vehicle.plate, vehicle.vehicle_type
    )
}

pub fn render_rented_from_lot(vehicle: &Vehicle, lot: &str) -> String {
    format!(
        "RENT: Vehicle {} ({}) has been obtained from lot {lot} with {LOT_DISCOUNT_PERCENT}% discount.",
        vehicle.plate, vehicle.vehicle_type
    )
}

pub fn render_unavailable(vehicle_type: impl std::fmt::Display) -> String {
    format!("RENT: No vehicles of type {vehicle_type} are available in shop or lots.")
}

pub fn render_returned(transaction: &Transaction) -> String {
    format!(
        "RETURN: Vehicle {} has been returned. Distance added: {} km. Charge: ${:.2}",
        transaction.plate, transaction.distance, transaction.charge
    )
}

pub fn render_relocated(vehicle: &Vehicle, lot: &str) -> String {
    format!(
        "RETURN: Vehicle {} ({}) has been moved to lot {lot} due to limited parking space.",
        vehicle.plate, vehicle.vehicle_type
    )
}

pub fn render_not_rented(plate: &str) -> String {
    format!("RETURN: Vehicle {} is not rented by any shop.", plate.to_uppercase())
}

/// Line printed for each vehicle a fresh shop pulled from its lots.
pub fn render_seeded(vehicle: &Vehicle) -> String {
    format!(
        "Initialized shop with vehicle {} ({})",
        vehicle.plate, vehicle.vehicle_type
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use fleet_types::{Plate, RentalRecord, VehicleType};

    fn vehicle(plate: &str, vehicle_type: VehicleType, odometer: u64) -> Vehicle {
        Vehicle::new(Plate::new(plate).unwrap(), vehicle_type, odometer)
    }

    fn state() -> ShopState {
        let mut state = ShopState::new("SanJose", 4, vec!["north".into()]);
        state.add_available(vehicle("AAA-001", VehicleType::Sedan, 120));
        state.start_rental(RentalRecord::new(vehicle("BBB-002", VehicleType::Suv, 40), true));
        state.record_transaction(Transaction::new(Plate::new("CCC-003").unwrap(), 100, true));
        state.record_transaction(Transaction::new(Plate::new("DDD-004").unwrap(), 50, false));
        state
    }

    #[test]
    fn list_shows_inventory_and_revenue() {
        let text = render_list(&state());
        assert!(text.starts_with("LIST: Requesting shop status report for SanJose\n"));
        assert!(text.contains("Available Parking Spaces: 2\n"));
        assert!(text.contains(
            "Vehicles in Shop Inventory:\n   AAA-001 | Type: SEDAN | Distance: 120 km\n"
        ));
        assert!(text.contains("Vehicles Currently Rented:\n   BBB-002 | Type: SUV | Distance: 40 km\n"));
        assert!(text.contains("Total Revenue: $140.00\n"));
    }

    #[test]
    fn transactions_total_earnings_and_discounts() {
        let text = render_transactions(&state());
        assert!(text.contains("Vehicle: CCC-003"));
        assert!(text.contains("Discount: None"));
        assert!(text.contains("Total Earnings: $140.00\n"));
        assert!(text.contains("Total Discounts Given: $10.00\n"));
    }

    #[test]
    fn empty_history_is_called_out() {
        let text = render_transactions(&ShopState::new("Austin", 1, Vec::new()));
        assert!(text.contains("(no transactions)"));
        assert!(text.contains("Total Earnings: $0.00"));
    }

    #[test]
    fn mirror_layout() {
        let expected = "\
LOCATION: SanJose
SPACES_AVAILABLE: 4
EMPTY_SLOTS: 2
CASH_EARNED: $140.00
LOTS: north

INVENTORY:
  AAA-001,SEDAN,120

RENTED_OUT:
  BBB-002,SUV,40,discount=10%

TRANSACTIONS:
  CCC-003,100,discount=10%,$90.00
  DDD-004,50,discount=0%,$50.00
";
        assert_eq!(render_mirror(&state()), expected);
    }

    #[test]
    fn command_lines() {
        let v = vehicle("AAA-001", VehicleType::Van, 0);
        assert_eq!(
            render_rented_from_lot(&v, "north"),
            "RENT: Vehicle AAA-001 (VAN) has been obtained from lot north with 10% discount."
        );
        assert_eq!(
            render_unavailable(VehicleType::Suv),
            "RENT: No vehicles of type SUV are available in shop or lots."
        );
        assert_eq!(
            render_not_rented("abc-123"),
            "RETURN: Vehicle ABC-123 is not rented by any shop."
        );
        let tx = Transaction::new(Plate::new("AAA-001").unwrap(), 100, true);
        assert_eq!(
            render_returned(&tx),
            "RETURN: Vehicle AAA-001 has been returned. Distance added: 100 km. Charge: $90.00"
        );
    }
}
