//! File-backed registry of outstanding rentals.
//!
//! Every shop appends here when it rents a vehicle out, and removes the
//! entry when the vehicle comes back, whichever shop that happens at. The
//! registry is the durable answer to "is this vehicle out?" across shop
//! restarts.

use std::collections::HashSet;
use std::path::PathBuf;

use fleet_types::{Plate, RentalRecord};
use tracing::{debug, info, warn};

use crate::error::StoreResult;
use crate::layout::DataLayout;
use crate::lock::LockedFile;
use crate::record::{format_rental_line, parse_all, parse_rental_line, rental_line_plate};
use crate::traits::RentalRegistry;

/// [`RentalRegistry`] over `registry/rented_registry.txt`.
#[derive(Clone, Debug)]
pub struct FileRentalRegistry {
    path: PathBuf,
}

impl FileRentalRegistry {
    pub fn new(layout: &DataLayout) -> Self {
        Self {
            path: layout.rental_registry_path(),
        }
    }
}

impl RentalRegistry for FileRentalRegistry {
    fn append(&self, record: &RentalRecord) -> StoreResult<()> {
        let mut locked = LockedFile::exclusive(&self.path)?;
        locked.append_line(&format_rental_line(record))?;
        info!(plate = %record.plate(), discount = record.discount, "rental registered");
        Ok(())
    }

    fn take_by_plate(&self, plate: &str) -> StoreResult<Option<RentalRecord>> {
        let Some(mut locked) = LockedFile::exclusive_existing(&self.path)? else {
            return Ok(None);
        };

        let mut lines = locked.read_lines()?;
        lines.retain(|line| !line.is_blank());

        let found = lines
            .iter()
            .enumerate()
            .find_map(|(idx, line)| match line.text().and_then(parse_rental_line) {
                Ok(record) if record.plate().matches(plate) => Some((idx, record)),
                Ok(_) => None,
                Err(e) => {
                    warn!(line = idx + 1, error = %e, "skipping malformed registry line");
                    None
                }
            });

        let Some((idx, record)) = found else {
            debug!(plate, "no outstanding rental in registry");
            return Ok(None);
        };

        lines.remove(idx);
        locked.rewrite(&lines)?;
        info!(plate = %record.plate(), "rental cleared from registry");
        Ok(Some(record))
    }

    fn reconcile(&self, local: &[Plate]) -> StoreResult<Vec<Plate>> {
        let registered: HashSet<String> = match LockedFile::shared(&self.path)? {
            Some(mut locked) => locked
                .read_lines()?
                .iter()
                .filter_map(|line| line.text().ok())
                .filter_map(rental_line_plate)
                .map(str::to_ascii_uppercase)
                .collect(),
            None => HashSet::new(),
        };

        let stale: Vec<Plate> = local
            .iter()
            .filter(|plate| !registered.contains(plate.as_str()))
            .cloned()
            .collect();
        debug!(local = local.len(), stale = stale.len(), "reconciled against rental registry");
        Ok(stale)
    }

    fn outstanding(&self) -> StoreResult<Vec<RentalRecord>> {
        match LockedFile::shared(&self.path)? {
            Some(mut locked) => Ok(parse_all(
                &locked.read_lines()?,
                "rental registry",
                parse_rental_line,
            )),
            None => Ok(Vec::new()),
        }
    }
}
