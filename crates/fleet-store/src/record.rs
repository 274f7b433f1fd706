//! Line codecs for the shared text files.
//!
//! Lot rows are `PLATE,TYPE,ODOMETER`. Rental registry rows are
//! `PLATE,TYPE,DISCOUNT[,ODOMETER]`; the trailing odometer lets a shop that
//! did not originate a rental still return the vehicle with its true reading,
//! and rows written without it read back with odometer 0.

use fleet_types::{Plate, RentalRecord, TypeError, Vehicle, VehicleType};
use tracing::warn;

use crate::lock::RawLine;

/// Encode a vehicle as a lot row.
pub fn format_vehicle_line(vehicle: &Vehicle) -> String {
    format!("{},{},{}", vehicle.plate, vehicle.vehicle_type, vehicle.odometer)
}

/// Decode a lot row.
pub fn parse_vehicle_line(line: &str) -> Result<Vehicle, TypeError> {
    let fields: Vec<&str> = line.split(',').map(str::trim).collect();
    if fields.len() != 3 {
        return Err(malformed(line, format!("expected 3 fields, found {}", fields.len())));
    }
    let plate = Plate::new(fields[0])?;
    let vehicle_type: VehicleType = fields[1].parse()?;
    let odometer = parse_odometer(fields[2])?;
    Ok(Vehicle::new(plate, vehicle_type, odometer))
}

/// Encode a rental as a registry row.
pub fn format_rental_line(record: &RentalRecord) -> String {
    format!(
        "{},{},{},{}",
        record.vehicle.plate, record.vehicle.vehicle_type, record.discount, record.vehicle.odometer
    )
}

/// Decode a registry row.
pub fn parse_rental_line(line: &str) -> Result<RentalRecord, TypeError> {
    let fields: Vec<&str> = line.split(',').map(str::trim).collect();
    if !(3..=4).contains(&fields.len()) {
        return Err(malformed(line, format!("expected 3 or 4 fields, found {}", fields.len())));
    }
    let plate = Plate::new(fields[0])?;
    let vehicle_type: VehicleType = fields[1].parse()?;
    let discount = match fields[2].to_ascii_lowercase().as_str() {
        "true" => true,
        "false" => false,
        other => return Err(malformed(line, format!("invalid discount flag {other:?}"))),
    };
    let odometer = match fields.get(3) {
        Some(raw) => parse_odometer(raw)?,
        None => 0,
    };
    Ok(RentalRecord::new(Vehicle::new(plate, vehicle_type, odometer), discount))
}

/// Plate field of a registry row without decoding the rest.
pub(crate) fn rental_line_plate(line: &str) -> Option<&str> {
    line.split(',').next().map(str::trim).filter(|p| !p.is_empty())
}

/// Decode every row, skipping blank lines and logging malformed ones,
/// including rows that are not UTF-8.
pub(crate) fn parse_all<T>(
    lines: &[RawLine],
    source: &str,
    parse: impl Fn(&str) -> Result<T, TypeError>,
) -> Vec<T> {
    lines
        .iter()
        .enumerate()
        .filter(|(_, line)| !line.is_blank())
        .filter_map(|(idx, line)| match line.text().and_then(&parse) {
            Ok(item) => Some(item),
            Err(e) => {
                warn!(source, line = idx + 1, error = %e, "skipping malformed line");
                None
            }
        })
        .collect()
}

fn parse_odometer(raw: &str) -> Result<u64, TypeError> {
    raw.parse::<u64>()
        .map_err(|_| TypeError::InvalidOdometer(raw.to_string()))
}

fn malformed(line: &str, reason: String) -> TypeError {
    TypeError::MalformedRecord {
        line: line.to_string(),
        reason,
    }
}
