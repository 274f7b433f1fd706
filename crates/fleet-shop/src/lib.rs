//! A rental shop: its state, its persistence, and its commands.
//!
//! A shop process owns exactly one [`ShopState`], drives it through a
//! [`RentalWorkflow`], and persists it with a [`SnapshotStore`] after every
//! change. [`ShopSession`] ties these together for the `fleet shop` command.
//!
//! # Persistence
//!
//! The snapshot (`shops/<location>.snapshot`) is the only durable record of a
//! shop and is written atomically. The text mirror next to it is generated by
//! [`report::render_mirror`] for operators and is never read back.

pub mod command;
pub mod config;
pub mod error;
pub mod report;
pub mod session;
pub mod snapshot;
pub mod state;
pub mod workflow;

pub use command::{Command, CommandError};
pub use config::{ShopConfig, DEFAULT_CAPACITY, DEFAULT_RELOCATION_THRESHOLD};
pub use error::{ShopError, ShopResult};
pub use session::ShopSession;
pub use snapshot::SnapshotStore;
pub use state::ShopState;
pub use workflow::{CommandOutcome, Relocation, RentOutcome, RentalWorkflow, ReturnOutcome};
