use fleet_types::{validate_location, validate_lot_name};

use crate::error::ShopResult;

/// Parking capacity of a new shop when none is given.
pub const DEFAULT_CAPACITY: u32 = 10;

/// A return that leaves fewer empty slots than this sends a vehicle back to
/// the first lot.
pub const DEFAULT_RELOCATION_THRESHOLD: u32 = 2;

/// Startup configuration for one shop process.
///
/// `capacity` and `lots` only shape a fresh shop; a shop resuming from its
/// snapshot keeps the values it was created with.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShopConfig {
    pub location: String,
    pub capacity: u32,
    pub lots: Vec<String>,
    pub relocation_threshold: u32,
    pub seed_from_lots: bool,
}

impl ShopConfig {
    pub fn new(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            capacity: DEFAULT_CAPACITY,
            lots: Vec::new(),
            relocation_threshold: DEFAULT_RELOCATION_THRESHOLD,
            seed_from_lots: false,
        }
    }

    pub fn with_capacity(mut self, capacity: u32) -> Self {
        self.capacity = capacity;
        self
    }

    /// Set the associated lots. Blank entries (as produced by splitting an
    /// empty `--lots=` value) are dropped.
    pub fn with_lots<I, S>(mut self, lots: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.lots = lots
            .into_iter()
            .map(|l| l.as_ref().trim().to_string())
            .filter(|l| !l.is_empty())
            .collect();
        self
    }

    pub fn with_relocation_threshold(mut self, threshold: u32) -> Self {
        self.relocation_threshold = threshold;
        self
    }

    pub fn with_seed_from_lots(mut self, seed: bool) -> Self {
        self.seed_from_lots = seed;
        self
    }

    /// Check the location and every lot name before any file is touched.
    pub fn validate(&self) -> ShopResult<()> {
        validate_location(&self.location)?;
        for lot in &self.lots {
            validate_lot_name(lot)?;
        }
        Ok(())
    }
}
