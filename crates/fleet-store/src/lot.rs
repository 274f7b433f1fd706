//! File-backed lots.
//!
//! Each lot is one text file of `PLATE,TYPE,ODOMETER` rows shared by every
//! shop process and the lot utility. Takes and puts are single critical
//! sections: the exclusive lock is held across the whole read, decide, and
//! write cycle, so two concurrent takers can never both walk away with the
//! same vehicle.
//!
//! Rows that fail to parse are logged and ignored for selection but are
//! preserved verbatim when the file is rewritten.

use fleet_types::{Vehicle, VehicleType};
use tracing::{debug, info, warn};

use crate::error::StoreResult;
use crate::layout::DataLayout;
use crate::lock::LockedFile;
use crate::record::{format_vehicle_line, parse_all, parse_vehicle_line};
use crate::traits::LotStore;

/// [`LotStore`] over the lot files of a [`DataLayout`].
#[derive(Clone, Debug)]
pub struct FileLotStore {
    layout: DataLayout,
}

impl FileLotStore {
    pub fn new(layout: DataLayout) -> Self {
        Self { layout }
    }

    pub fn layout(&self) -> &DataLayout {
        &self.layout
    }

    /// Remove the first row for which `select` returns true, under one
    /// exclusive lock.
    fn take_where(
        &self,
        lot: &str,
        select: impl Fn(&Vehicle) -> bool,
    ) -> StoreResult<Option<Vehicle>> {
        let path = self.layout.lot_path(lot)?;
        let Some(mut locked) = LockedFile::exclusive_existing(&path)? else {
            debug!(lot, "lot file missing; treating as empty");
            return Ok(None);
        };

        let mut lines = locked.read_lines()?;
        lines.retain(|line| !line.is_blank());

        let found = lines
            .iter()
            .enumerate()
            .find_map(|(idx, line)| match line.text().and_then(parse_vehicle_line) {
                Ok(v) if select(&v) => Some((idx, v)),
                Ok(_) => None,
                Err(e) => {
                    warn!(lot, line = idx + 1, error = %e, "skipping malformed line");
                    None
                }
            });

        let Some((idx, vehicle)) = found else {
            return Ok(None);
        };

        lines.remove(idx);
        locked.rewrite(&lines)?;
        Ok(Some(vehicle))
    }
}

impl LotStore for FileLotStore {
    fn read_all(&self, lot: &str) -> StoreResult<Vec<Vehicle>> {
        let path = self.layout.lot_path(lot)?;
        let Some(mut locked) = LockedFile::shared(&path)? else {
            return Ok(Vec::new());
        };
        let lines = locked.read_lines()?;
        Ok(parse_all(&lines, lot, parse_vehicle_line))
    }

    fn take_first_of_type(
        &self,
        lot: &str,
        vehicle_type: VehicleType,
    ) -> StoreResult<Option<Vehicle>> {
        let taken = self.take_where(lot, |v| v.vehicle_type == vehicle_type)?;
        if let Some(vehicle) = &taken {
            info!(lot, plate = %vehicle.plate, %vehicle_type, "vehicle taken from lot");
        }
        Ok(taken)
    }

    fn put_all(&self, lot: &str, vehicles: &[Vehicle]) -> StoreResult<()> {
        if vehicles.is_empty() {
            return Ok(());
        }
        let path = self.layout.lot_path(lot)?;
        let mut locked = LockedFile::exclusive(&path)?;
        let lines: Vec<String> = vehicles.iter().map(format_vehicle_line).collect();
        locked.append_lines(&lines)?;
        info!(lot, count = vehicles.len(), "vehicles put into lot");
        Ok(())
    }

    fn remove_by_plate(&self, lot: &str, plate: &str) -> StoreResult<Option<Vehicle>> {
        let removed = self.take_where(lot, |v| v.plate.matches(plate))?;
        if let Some(vehicle) = &removed {
            info!(lot, plate = %vehicle.plate, "vehicle removed from lot");
        }
        Ok(removed)
    }
}
