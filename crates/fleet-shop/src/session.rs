//! Shop process lifecycle: resume or create, run commands, persist.

use std::sync::Arc;

use tracing::{error, info, warn};

use fleet_store::{DataLayout, FileLotStore, FileRentalRegistry, LotStore, RentalRegistry};

use crate::command::Command;
use crate::config::ShopConfig;
use crate::error::ShopResult;
use crate::report;
use crate::snapshot::SnapshotStore;
use crate::state::ShopState;
use crate::workflow::RentalWorkflow;

/// One running shop.
///
/// A session is opened once per process. Opening either resumes the shop from
/// its snapshot (and reconciles its rentals against the registry) or creates
/// a fresh shop from the config; either way the snapshot is written before
/// the first command runs.
pub struct ShopSession {
    workflow: RentalWorkflow,
    snapshots: SnapshotStore,
    resumed: bool,
    notices: Vec<String>,
}

impl ShopSession {
    /// Open the shop described by `config` against the given stores.
    ///
    /// An unreadable snapshot is an error; the file is left untouched.
    pub fn open(
        config: &ShopConfig,
        layout: DataLayout,
        lots: Arc<dyn LotStore>,
        rentals: Arc<dyn RentalRegistry>,
    ) -> ShopResult<Self> {
        config.validate()?;
        let snapshots = SnapshotStore::new(layout);
        let mut notices = Vec::new();

        let resumed = snapshots.exists(&config.location)?;
        let state = if resumed {
            let state = snapshots.load(&config.location)?;
            if state.capacity != config.capacity {
                warn!(
                    location = %state.location,
                    stored = state.capacity,
                    requested = config.capacity,
                    "resuming shop; ignoring requested capacity"
                );
            }
            if !config.lots.is_empty() && state.lots != config.lots {
                warn!(
                    location = %state.location,
                    stored = ?state.lots,
                    requested = ?config.lots,
                    "resuming shop; ignoring requested lots"
                );
            }
            state
        } else {
            info!(location = %config.location, capacity = config.capacity, lots = ?config.lots, "creating shop");
            ShopState::new(config.location.clone(), config.capacity, config.lots.clone())
        };

        let mut workflow = RentalWorkflow::new(state, lots, rentals)
            .with_relocation_threshold(config.relocation_threshold);

        if resumed {
            for record in workflow.reconcile() {
                notices.push(format!(
                    "Rental of vehicle {} is no longer registered and was dropped.",
                    record.plate()
                ));
            }
        } else if config.seed_from_lots {
            if let Some(vehicle) = workflow.seed_from_lots() {
                notices.push(report::render_seeded(&vehicle));
            }
        }

        let session = Self {
            workflow,
            snapshots,
            resumed,
            notices,
        };
        session.save()?;
        Ok(session)
    }

    /// Open a shop backed by the shared files under `layout`.
    pub fn open_files(config: &ShopConfig, layout: DataLayout) -> ShopResult<Self> {
        config.validate()?;
        layout.ensure_dirs()?;
        let lots = Arc::new(FileLotStore::new(layout.clone()));
        let rentals = Arc::new(FileRentalRegistry::new(&layout));
        Self::open(config, layout, lots, rentals)
    }

    /// Whether the shop was resumed from an existing snapshot.
    pub fn resumed(&self) -> bool {
        self.resumed
    }

    /// Messages produced while opening the shop.
    pub fn notices(&self) -> &[String] {
        &self.notices
    }

    pub fn state(&self) -> &ShopState {
        self.workflow.state()
    }

    /// Handle one line of input. Returns `None` when the session should end.
    ///
    /// The snapshot is saved after every command that changed state. A save
    /// failure is appended to the report and the session continues.
    pub fn handle_line(&mut self, line: &str) -> Option<String> {
        let command = match Command::parse(line) {
            Ok(Some(Command::Exit)) => return None,
            Ok(Some(command)) => command,
            Ok(None) => return Some(String::new()),
            Err(e) => return Some(e.to_string()),
        };

        let outcome = self.workflow.execute(&command);
        let mut report = outcome.report;
        if outcome.mutated {
            if let Err(e) = self.save() {
                error!(location = %self.state().location, error = %e, "failed to save shop state");
                report.push_str(&format!("\nWarning: failed to save shop state: {e}"));
            }
        }
        Some(report)
    }

    /// Write the snapshot and mirror.
    pub fn save(&self) -> ShopResult<()> {
        self.snapshots.save(self.workflow.state())
    }
}
