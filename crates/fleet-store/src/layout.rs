//! On-disk layout of the shared data directory.
//!
//! ```text
//! <root>/lots/<lot>.txt                 PLATE,TYPE,ODOMETER
//! <root>/registry/plates_registry.txt   one plate per line
//! <root>/registry/rented_registry.txt   PLATE,TYPE,DISCOUNT,ODOMETER
//! <root>/shops/<location>.snapshot      framed binary shop snapshot
//! <root>/shops/<location>.txt           human-readable mirror
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use fleet_types::{validate_location, validate_lot_name};

use crate::error::StoreResult;

pub const DEFAULT_DATA_DIR: &str = "outputs";

const LOTS_DIR: &str = "lots";
const REGISTRY_DIR: &str = "registry";
const SHOPS_DIR: &str = "shops";
const PLATE_REGISTRY_FILE: &str = "plates_registry.txt";
const RENTAL_REGISTRY_FILE: &str = "rented_registry.txt";

/// Resolves every shared path from one data directory root.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DataLayout {
    root: PathBuf,
}

impl DataLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn lots_dir(&self) -> PathBuf {
        self.root.join(LOTS_DIR)
    }

    pub fn registry_dir(&self) -> PathBuf {
        self.root.join(REGISTRY_DIR)
    }

    pub fn shops_dir(&self) -> PathBuf {
        self.root.join(SHOPS_DIR)
    }

    /// Path of a lot file. The lot name is validated first.
    pub fn lot_path(&self, lot: &str) -> StoreResult<PathBuf> {
        validate_lot_name(lot)?;
        Ok(self.lots_dir().join(format!("{lot}.txt")))
    }

    pub fn plate_registry_path(&self) -> PathBuf {
        self.registry_dir().join(PLATE_REGISTRY_FILE)
    }

    pub fn rental_registry_path(&self) -> PathBuf {
        self.registry_dir().join(RENTAL_REGISTRY_FILE)
    }

    /// Path of a shop's binary snapshot. The location is validated first.
    pub fn snapshot_path(&self, location: &str) -> StoreResult<PathBuf> {
        validate_location(location)?;
        Ok(self.shops_dir().join(format!("{location}.snapshot")))
    }

    /// Path of a shop's human-readable mirror.
    pub fn mirror_path(&self, location: &str) -> StoreResult<PathBuf> {
        validate_location(location)?;
        Ok(self.shops_dir().join(format!("{location}.txt")))
    }

    /// Create the lots, registry, and shops directories if missing.
    pub fn ensure_dirs(&self) -> StoreResult<()> {
        fs::create_dir_all(self.lots_dir())?;
        fs::create_dir_all(self.registry_dir())?;
        fs::create_dir_all(self.shops_dir())?;
        Ok(())
    }
}

impl Default for DataLayout {
    fn default() -> Self {
        Self::new(DEFAULT_DATA_DIR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;

    #[test]
    fn default_root() {
        assert_eq!(DataLayout::default().root(), Path::new("outputs"));
    }

    #[test]
    fn resolves_shared_paths() {
        let layout = DataLayout::new("/data");
        assert_eq!(layout.lot_path("north").unwrap(), PathBuf::from("/data/lots/north.txt"));
        assert_eq!(
            layout.plate_registry_path(),
            PathBuf::from("/data/registry/plates_registry.txt")
        );
        assert_eq!(
            layout.rental_registry_path(),
            PathBuf::from("/data/registry/rented_registry.txt")
        );
        assert_eq!(
            layout.snapshot_path("SanJose").unwrap(),
            PathBuf::from("/data/shops/SanJose.snapshot")
        );
        assert_eq!(layout.mirror_path("SanJose").unwrap(), PathBuf::from("/data/shops/SanJose.txt"));
    }

    #[test]
    fn rejects_unsafe_names() {
        let layout = DataLayout::new("/data");
        assert!(matches!(layout.lot_path("../x"), Err(StoreError::Type(_))));
        assert!(layout.snapshot_path("").is_err());
    }

    #[test]
    fn ensure_dirs_creates_tree() {
        let dir = tempfile::tempdir().unwrap();
        let layout = DataLayout::new(dir.path().join("outputs"));
        layout.ensure_dirs().unwrap();
        assert!(layout.lots_dir().is_dir());
        assert!(layout.registry_dir().is_dir());
        assert!(layout.shops_dir().is_dir());
    }
}
