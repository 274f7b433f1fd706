use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;
use crate::plate::Plate;

/// The kinds of vehicle in the fleet.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum VehicleType {
    Sedan,
    Suv,
    Van,
}

impl VehicleType {
    /// All vehicle types, in the order a fresh shop tries them when seeding.
    pub const ALL: [VehicleType; 3] = [VehicleType::Sedan, VehicleType::Suv, VehicleType::Van];

    /// Canonical uppercase name as written to shared files.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sedan => "SEDAN",
            Self::Suv => "SUV",
            Self::Van => "VAN",
        }
    }
}

impl fmt::Display for VehicleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VehicleType {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| TypeError::UnknownVehicleType(s.to_string()))
    }
}

/// A vehicle in the fleet.
///
/// Vehicles are created once, when the lot utility issues a plate, and are
/// never destroyed; they only move between lots and shops. The odometer
/// never decreases.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vehicle {
    pub plate: Plate,
    pub vehicle_type: VehicleType,
    pub odometer: u64,
}

impl Vehicle {
    pub fn new(plate: Plate, vehicle_type: VehicleType, odometer: u64) -> Self {
        Self {
            plate,
            vehicle_type,
            odometer,
        }
    }

    /// Add a driven distance to the odometer.
    pub fn add_distance(&mut self, km: u64) {
        self.odometer = self.odometer.saturating_add(km);
    }
}

impl fmt::Display for Vehicle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} | Type: {} | Distance: {} km",
            self.plate, self.vehicle_type, self.odometer
        )
    }
}
