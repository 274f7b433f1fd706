//! File-backed plate registry.
//!
//! One plate per line. Generation reads the issued set, draws candidates
//! until one is fresh, and appends it, all under a single exclusive lock, so
//! concurrent lot utilities can never issue the same plate twice.

use std::collections::BTreeSet;
use std::path::PathBuf;

use fleet_types::Plate;
use tracing::{debug, info};

use crate::error::StoreResult;
use crate::layout::DataLayout;
use crate::lock::{LockedFile, RawLine};
use crate::record::parse_all;
use crate::traits::PlateRegistry;

/// [`PlateRegistry`] over `registry/plates_registry.txt`.
#[derive(Clone, Debug)]
pub struct FilePlateRegistry {
    path: PathBuf,
}

impl FilePlateRegistry {
    pub fn new(layout: &DataLayout) -> Self {
        Self {
            path: layout.plate_registry_path(),
        }
    }
}

fn parse_issued(lines: &[RawLine]) -> BTreeSet<Plate> {
    parse_all(lines, "plate registry", Plate::new)
        .into_iter()
        .collect()
}

impl PlateRegistry for FilePlateRegistry {
    fn generate_unique_plate(&self) -> StoreResult<Plate> {
        let mut locked = LockedFile::exclusive(&self.path)?;
        let issued = parse_issued(&locked.read_lines()?);

        let mut rng = rand::thread_rng();
        let mut attempts = 1u32;
        let mut candidate = Plate::random(&mut rng);
        while issued.contains(&candidate) {
            candidate = Plate::random(&mut rng);
            attempts += 1;
        }

        locked.append_line(candidate.as_str())?;
        debug!(attempts, issued = issued.len() + 1, "plate registry grew");
        info!(plate = %candidate, "plate issued");
        Ok(candidate)
    }

    fn issued(&self) -> StoreResult<BTreeSet<Plate>> {
        match LockedFile::shared(&self.path)? {
            Some(mut locked) => Ok(parse_issued(&locked.read_lines()?)),
            None => Ok(BTreeSet::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::fs;
    use std::sync::{Arc, Barrier};
    use std::thread;

    fn registry() -> (tempfile::TempDir, FilePlateRegistry) {
        let dir = tempfile::tempdir().unwrap();
        let registry = FilePlateRegistry::new(&DataLayout::new(dir.path()));
        (dir, registry)
    }

    fn line_count(registry: &FilePlateRegistry) -> usize {
        fs::read(&registry.path)
            .map(|b| b.iter().filter(|&&c| c == b'\n').count())
            .unwrap_or(0)
    }

    #[test]
    fn empty_registry_has_no_plates() {
        let (_dir, registry) = registry();
        assert!(registry.issued().unwrap().is_empty());
        assert!(!registry.contains("ABC-123").unwrap());
    }

    #[test]
    fn serial_generation_is_unique() {
        let (_dir, registry) = registry();
        let plates: Vec<Plate> = (0..100)
            .map(|_| registry.generate_unique_plate().unwrap())
            .collect();

        let distinct: HashSet<&Plate> = plates.iter().collect();
        assert_eq!(distinct.len(), 100);
        assert!(plates.iter().all(Plate::is_standard_format));
        assert_eq!(line_count(&registry), 100);
        assert!(registry.contains(plates[0].as_str()).unwrap());
    }

    #[test]
    fn generation_avoids_preexisting_plates() {
        let (_dir, registry) = registry();
        fs::create_dir_all(registry.path.parent().unwrap()).unwrap();
        fs::write(&registry.path, "ABC-123\nXYZ-999\n").unwrap();

        let plate = registry.generate_unique_plate().unwrap();
        assert_ne!(plate.as_str(), "ABC-123");
        assert_ne!(plate.as_str(), "XYZ-999");
        assert_eq!(registry.issued().unwrap().len(), 3);
    }

    #[test]
    fn corrupt_registry_line_does_not_block_issuing() {
        let (_dir, registry) = registry();
        fs::create_dir_all(registry.path.parent().unwrap()).unwrap();
        fs::write(&registry.path, b"ABC-123\n\xc3\x28\nXYZ-999\n").unwrap();

        assert_eq!(registry.issued().unwrap().len(), 2);
        let plate = registry.generate_unique_plate().unwrap();
        assert!(registry.contains(plate.as_str()).unwrap());
        assert_eq!(line_count(&registry), 4);
    }

    #[test]
    fn concurrent_generation_is_unique() {
        const THREADS: usize = 8;
        const PER_THREAD: usize = 25;

        let (dir, registry) = registry();
        let root = dir.path().to_path_buf();
        let barrier = Arc::new(Barrier::new(THREADS));

        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                let root = root.clone();
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    let registry = FilePlateRegistry::new(&DataLayout::new(root));
                    barrier.wait();
                    (0..PER_THREAD)
                        .map(|_| registry.generate_unique_plate().unwrap())
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        let plates: Vec<Plate> = handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect();
        let distinct: HashSet<&Plate> = plates.iter().collect();

        assert_eq!(plates.len(), THREADS * PER_THREAD);
        assert_eq!(distinct.len(), THREADS * PER_THREAD);
        assert_eq!(line_count(&registry), THREADS * PER_THREAD);
    }
}
