use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::plate::Plate;
use crate::pricing::{charge_for, discount_for, LOT_DISCOUNT_PERCENT};
use crate::vehicle::Vehicle;

/// A vehicle that is currently rented out.
///
/// `discount` is set when the renting shop had to pull the vehicle from a
/// lot; it is applied when the vehicle comes back.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RentalRecord {
    pub vehicle: Vehicle,
    pub discount: bool,
}

impl RentalRecord {
    pub fn new(vehicle: Vehicle, discount: bool) -> Self {
        Self { vehicle, discount }
    }

    pub fn plate(&self) -> &Plate {
        &self.vehicle.plate
    }

    /// Close the rental: advance the odometer and produce the transaction.
    pub fn complete(mut self, distance: u64) -> (Vehicle, Transaction) {
        self.vehicle.add_distance(distance);
        let transaction = Transaction::new(self.vehicle.plate.clone(), distance, self.discount);
        (self.vehicle, transaction)
    }
}

/// A completed return. Immutable once created.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub plate: Plate,
    pub distance: u64,
    pub discount: bool,
    pub charge: Decimal,
}

impl Transaction {
    pub fn new(plate: Plate, distance: u64, discount: bool) -> Self {
        Self {
            plate,
            distance,
            discount,
            charge: charge_for(distance, discount),
        }
    }

    /// Amount knocked off the gross charge by the lot discount.
    pub fn discount_given(&self) -> Decimal {
        discount_for(self.distance, self.discount)
    }

    /// Discount label used in reports: `10%` or `0%`.
    pub fn discount_label(&self) -> String {
        discount_label(self.discount)
    }
}

/// Render a discount flag the way reports and the shop mirror show it.
pub fn discount_label(discount: bool) -> String {
    if discount {
        format!("{LOT_DISCOUNT_PERCENT}%")
    } else {
        "0%".to_string()
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Transaction Details:")?;
        writeln!(f, "   Vehicle: {}", self.plate)?;
        writeln!(f, "   Distance: {} km", self.distance)?;
        if self.discount {
            writeln!(f, "   Discount: {LOT_DISCOUNT_PERCENT}%")?;
        } else {
            writeln!(f, "   Discount: None")?;
        }
        write!(f, "   Total: ${:.2}", self.charge)
    }
}
