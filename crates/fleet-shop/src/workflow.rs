//! Rent, return, and relocation.
//!
//! [`RentalWorkflow`] owns a shop's [`ShopState`] and reaches the shared
//! stores only through the handles it was built with. Each shared-store call
//! is its own critical section; the workflow never holds two at once.
//!
//! A failed shared-store call never aborts a command. It is logged and
//! treated as the benign outcome for that call: a lot that cannot be read
//! has no vehicles, a relocation that cannot be written leaves the vehicle
//! in the shop, and a registry write that fails leaves the local rental in
//! place.

use std::sync::Arc;

use tracing::{error, info, warn};

use fleet_store::{LotStore, RentalRegistry};
use fleet_types::{RentalRecord, Transaction, Vehicle, VehicleType};

use crate::command::Command;
use crate::config::DEFAULT_RELOCATION_THRESHOLD;
use crate::report;
use crate::state::ShopState;

/// Where a rented vehicle came from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RentOutcome {
    FromShop(Vehicle),
    FromLot { vehicle: Vehicle, lot: String },
    Unavailable,
}

/// A vehicle sent back to a lot to free parking space.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Relocation {
    pub vehicle: Vehicle,
    pub lot: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReturnOutcome {
    Returned {
        transaction: Transaction,
        relocated: Option<Relocation>,
    },
    NotRented,
}

/// The result of executing one command: the text to show and whether shop
/// state changed (and so must be persisted).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommandOutcome {
    pub report: String,
    pub mutated: bool,
}

pub struct RentalWorkflow {
    state: ShopState,
    lots: Arc<dyn LotStore>,
    rentals: Arc<dyn RentalRegistry>,
    relocation_threshold: u32,
}

impl RentalWorkflow {
    pub fn new(
        state: ShopState,
        lots: Arc<dyn LotStore>,
        rentals: Arc<dyn RentalRegistry>,
    ) -> Self {
        Self {
            state,
            lots,
            rentals,
            relocation_threshold: DEFAULT_RELOCATION_THRESHOLD,
        }
    }

    pub fn with_relocation_threshold(mut self, threshold: u32) -> Self {
        self.relocation_threshold = threshold;
        self
    }

    pub fn state(&self) -> &ShopState {
        &self.state
    }

    pub fn into_state(self) -> ShopState {
        self.state
    }

    /// Rent a vehicle of `vehicle_type`: from the shop's own inventory if it
    /// has one, otherwise from the first associated lot that does, with the
    /// lot discount.
    pub fn rent(&mut self, vehicle_type: VehicleType) -> RentOutcome {
        let (record, outcome) = if let Some(vehicle) =
            self.state.take_available_of_type(vehicle_type)
        {
            (
                RentalRecord::new(vehicle.clone(), false),
                RentOutcome::FromShop(vehicle),
            )
        } else if let Some((vehicle, lot)) = self.take_from_lots(vehicle_type) {
            (
                RentalRecord::new(vehicle.clone(), true),
                RentOutcome::FromLot { vehicle, lot },
            )
        } else {
            info!(location = %self.state.location, %vehicle_type, "no vehicle available");
            return RentOutcome::Unavailable;
        };

        if let Err(e) = self.rentals.append(&record) {
            error!(
                plate = %record.plate(),
                error = %e,
                "failed to record rental in registry; keeping local rental"
            );
        }
        info!(
            location = %self.state.location,
            plate = %record.plate(),
            %vehicle_type,
            discount = record.discount,
            "vehicle rented"
        );
        self.state.start_rental(record);
        outcome
    }

    /// Return a rented vehicle after `distance` km.
    ///
    /// The registry entry is always removed, whether the rental is local or
    /// was made by another shop. A return that leaves fewer empty slots than
    /// the relocation threshold sends the highest-odometer vehicle to the
    /// first associated lot.
    pub fn return_vehicle(&mut self, plate: &str, distance: u64) -> ReturnOutcome {
        let local = self.state.end_rental(plate);
        let registered = match self.rentals.take_by_plate(plate) {
            Ok(record) => record,
            Err(e) => {
                error!(plate, error = %e, "failed to update rental registry");
                None
            }
        };

        let Some(record) = local.or(registered) else {
            info!(location = %self.state.location, plate, "return of vehicle not rented");
            return ReturnOutcome::NotRented;
        };

        let (vehicle, transaction) = record.complete(distance);
        info!(
            location = %self.state.location,
            plate = %vehicle.plate,
            distance,
            charge = %transaction.charge,
            "vehicle returned"
        );
        self.state.add_available(vehicle);
        self.state.record_transaction(transaction.clone());

        let relocated = self.relocate_if_crowded();
        ReturnOutcome::Returned {
            transaction,
            relocated,
        }
    }

    /// Drop local rentals the registry no longer knows about. Returns the
    /// dropped rentals.
    pub fn reconcile(&mut self) -> Vec<RentalRecord> {
        let local = self.state.rented_plates();
        if local.is_empty() {
            return Vec::new();
        }
        match self.rentals.reconcile(&local) {
            Ok(absent) => {
                let dropped = self.state.drop_rentals(&absent);
                for record in &dropped {
                    warn!(
                        location = %self.state.location,
                        plate = %record.plate(),
                        "rental no longer registered; dropping it"
                    );
                }
                dropped
            }
            Err(e) => {
                error!(error = %e, "failed to read rental registry; keeping local rentals");
                Vec::new()
            }
        }
    }

    /// Pull one vehicle from the lots into an empty shop, trying each
    /// vehicle type in turn.
    pub fn seed_from_lots(&mut self) -> Option<Vehicle> {
        if !self.state.available.is_empty() {
            return None;
        }
        for vehicle_type in VehicleType::ALL {
            if let Some((vehicle, lot)) = self.take_from_lots(vehicle_type) {
                info!(location = %self.state.location, plate = %vehicle.plate, lot = %lot, "shop seeded");
                self.state.add_available(vehicle.clone());
                return Some(vehicle);
            }
        }
        None
    }

    /// Execute a command against the shop.
    pub fn execute(&mut self, command: &Command) -> CommandOutcome {
        match command {
            Command::Rent(vehicle_type) => {
                let (report, mutated) = match self.rent(*vehicle_type) {
                    RentOutcome::FromShop(vehicle) => (report::render_rented_from_shop(&vehicle), true),
                    RentOutcome::FromLot { vehicle, lot } => {
                        (report::render_rented_from_lot(&vehicle, &lot), true)
                    }
                    RentOutcome::Unavailable => (report::render_unavailable(vehicle_type), false),
                };
                CommandOutcome { report, mutated }
            }
            Command::Return { plate, distance } => match self.return_vehicle(plate, *distance) {
                ReturnOutcome::Returned {
                    transaction,
                    relocated,
                } => {
                    let mut report = report::render_returned(&transaction);
                    if let Some(relocation) = relocated {
                        report.push('\n');
                        report.push_str(&report::render_relocated(
                            &relocation.vehicle,
                            &relocation.lot,
                        ));
                    }
                    CommandOutcome {
                        report,
                        mutated: true,
                    }
                }
                ReturnOutcome::NotRented => CommandOutcome {
                    report: report::render_not_rented(plate),
                    mutated: false,
                },
            },
            Command::List => CommandOutcome {
                report: report::render_list(&self.state),
                mutated: false,
            },
            Command::Transactions => CommandOutcome {
                report: report::render_transactions(&self.state),
                mutated: false,
            },
            Command::Exit => CommandOutcome {
                report: String::new(),
                mutated: false,
            },
        }
    }

    fn take_from_lots(&self, vehicle_type: VehicleType) -> Option<(Vehicle, String)> {
        for lot in &self.state.lots {
            match self.lots.take_first_of_type(lot, vehicle_type) {
                Ok(Some(vehicle)) => return Some((vehicle, lot.clone())),
                Ok(None) => {}
                Err(e) => error!(lot = %lot, %vehicle_type, error = %e, "failed to take vehicle from lot"),
            }
        }
        None
    }

    fn relocate_if_crowded(&mut self) -> Option<Relocation> {
        if self.state.empty_slots() >= i64::from(self.relocation_threshold) {
            return None;
        }
        let Some(lot) = self.state.lots.first().cloned() else {
            warn!(location = %self.state.location, "shop is crowded but has no lot to relocate to");
            return None;
        };
        let plate = self.state.highest_odometer()?.clone();
        let vehicle = self.state.remove_available(&plate)?;

        if let Err(e) = self.lots.put(&lot, &vehicle) {
            error!(lot = %lot, plate = %plate, error = %e, "relocation failed; keeping vehicle in shop");
            self.state.add_available(vehicle);
            return None;
        }
        info!(location = %self.state.location, plate = %plate, lot = %lot, "vehicle relocated");
        Some(Relocation { vehicle, lot })
    }
}
