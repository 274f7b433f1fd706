//! Shared, file-resident stores for the fleet rental system.
//!
//! Shop processes and the lot utility run independently and coordinate only
//! through three kinds of shared file, each guarded by advisory locks:
//!
//! - **Lots** -- one file per lot holding the vehicles parked there
//! - **Plate registry** -- every plate ever issued
//! - **Rental registry** -- every vehicle currently rented by some shop
//!
//! # Storage Backends
//!
//! All backends implement the traits in [`traits`]:
//!
//! - [`FileLotStore`], [`FilePlateRegistry`], [`FileRentalRegistry`] --
//!   shared files under a [`DataLayout`]
//! - [`InMemoryLotStore`], [`InMemoryPlateRegistry`],
//!   [`InMemoryRentalRegistry`] -- mutex-guarded stores for tests
//!
//! # Design Rules
//!
//! 1. Every read-decide-write sequence is one critical section under one lock.
//! 2. No operation holds locks on two shared files at once.
//! 3. A missing shared file is an empty collection, not an error.
//! 4. Malformed rows are skipped with a warning, never fatal.
//! 5. I/O errors are propagated; callers decide whether they are fatal.

pub mod admin;
pub mod error;
pub mod layout;
pub mod lock;
pub mod lot;
pub mod memory;
pub mod plates;
pub mod record;
pub mod rentals;
pub mod traits;

pub use admin::LotAdmin;
pub use error::{StoreError, StoreResult};
pub use layout::{DataLayout, DEFAULT_DATA_DIR};
pub use lock::{LockMode, LockedFile, RawLine};
pub use lot::FileLotStore;
pub use memory::{InMemoryLotStore, InMemoryPlateRegistry, InMemoryRentalRegistry};
pub use plates::FilePlateRegistry;
pub use rentals::FileRentalRegistry;
pub use traits::{LotStore, PlateRegistry, RentalRegistry};
