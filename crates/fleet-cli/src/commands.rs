use std::io::{self, BufRead, Write};
use std::sync::Arc;

use anyhow::Context;
use colored::Colorize;
use serde::Serialize;
use tracing::debug;

use fleet_shop::{ShopConfig, ShopSession};
use fleet_store::{DataLayout, FileLotStore, FilePlateRegistry, LotAdmin};
use fleet_types::{validate_lot_name, Vehicle, VehicleType};

use crate::cli::*;
use crate::config::FleetConfig;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = FleetConfig::load(cli.config.as_deref())?;
    let data_dir = cli.data_dir.clone().unwrap_or_else(|| config.data_dir.clone());
    let layout = DataLayout::new(data_dir);
    debug!(data_dir = %layout.root().display(), "using data directory");

    match cli.command {
        Command::Lot(args) => {
            let summary = run_lot(&args, &layout)?;
            let stdout = io::stdout();
            let mut out = stdout.lock();
            match cli.format {
                OutputFormat::Text => write!(out, "{}", render_lot_summary(&summary))?,
                OutputFormat::Json => writeln!(out, "{}", serde_json::to_string_pretty(&summary)?)?,
            }
            Ok(())
        }
        Command::Shop(args) => {
            let shop_config = shop_config(&args, &config);
            let mut session = ShopSession::open_files(&shop_config, layout)
                .with_context(|| format!("opening shop {}", args.location))?;
            let stdin = io::stdin();
            let stdout = io::stdout();
            run_shop_loop(&mut session, stdin.lock(), stdout.lock())
        }
    }
}

/// What `fleet lot` did.
#[derive(Debug, Serialize)]
pub struct LotSummary {
    pub lot: String,
    pub added: Vec<Vehicle>,
    pub removal: Option<Removal>,
    pub vehicle_count: usize,
}

#[derive(Debug, Serialize)]
pub struct Removal {
    pub plate: String,
    pub removed: bool,
}

pub fn run_lot(args: &LotArgs, layout: &DataLayout) -> anyhow::Result<LotSummary> {
    validate_lot_name(&args.lot_name).context("invalid --lot-name")?;
    layout.ensure_dirs().context("creating data directories")?;

    let admin = LotAdmin::new(
        Arc::new(FileLotStore::new(layout.clone())),
        Arc::new(FilePlateRegistry::new(layout)),
    );

    let mut added = Vec::new();
    for (vehicle_type, count) in [
        (VehicleType::Sedan, args.add_sedan),
        (VehicleType::Suv, args.add_suv),
        (VehicleType::Van, args.add_van),
    ] {
        if count > 0 {
            added.extend(admin.add_vehicles(&args.lot_name, vehicle_type, count)?);
        }
    }

    let removal = match &args.remove_vehicle {
        Some(plate) => {
            let removed = admin.remove_vehicle(&args.lot_name, plate)?.is_some();
            Some(Removal {
                plate: plate.to_uppercase(),
                removed,
            })
        }
        None => None,
    };

    let vehicle_count = admin.inventory(&args.lot_name)?.len();
    Ok(LotSummary {
        lot: args.lot_name.clone(),
        added,
        removal,
        vehicle_count,
    })
}

fn render_lot_summary(summary: &LotSummary) -> String {
    let mut out = String::new();
    for vehicle in &summary.added {
        out.push_str(&format!("  {} {}\n", "added:".green(), vehicle));
    }
    if let Some(removal) = &summary.removal {
        if removal.removed {
            out.push_str(&format!(
                "Vehicle with license {} has been successfully removed from lot {}.\n",
                removal.plate, summary.lot
            ));
        } else {
            out.push_str(&format!(
                "Vehicle with license {} was not found in lot {} (possibly assigned to a shop or is in use).\n",
                removal.plate, summary.lot
            ));
        }
    }
    out.push_str(&format!(
        "{} Lot {} has been updated successfully!\n",
        "✓".green().bold(),
        summary.lot.bold()
    ));
    out.push_str(&format!("Current vehicle count: {}\n", summary.vehicle_count));
    out
}

fn shop_config(args: &ShopArgs, config: &FleetConfig) -> ShopConfig {
    ShopConfig::new(args.location.clone())
        .with_capacity(args.spaces_available.unwrap_or(config.default_spaces))
        .with_lots(&args.lots)
        .with_relocation_threshold(args.relocation_threshold.unwrap_or(config.relocation_threshold))
        .with_seed_from_lots(args.seed_from_lots)
}

/// Read commands from `input` until EXIT or end of input.
pub fn run_shop_loop<R: BufRead, W: Write>(
    session: &mut ShopSession,
    input: R,
    mut output: W,
) -> anyhow::Result<()> {
    let state = session.state();
    if session.resumed() {
        writeln!(output, "Resumed shop {} from its snapshot.", state.location)?;
    }
    writeln!(output, "Welcome to {} Rental Shop!", state.location)?;
    for notice in session.notices() {
        writeln!(output, "{notice}")?;
    }
    writeln!(output, "Available commands: RENT, RETURN, LIST, TRANSACTIONS")?;
    writeln!(output, "Type EXIT to quit.")?;

    let mut lines = input.lines();
    loop {
        write!(output, "> ")?;
        output.flush()?;
        let Some(line) = lines.next() else {
            writeln!(output)?;
            break;
        };
        let line = line.context("reading command")?;
        match session.handle_line(&line) {
            Some(report) if report.is_empty() => {}
            Some(report) => writeln!(output, "{report}")?,
            None => break,
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn lot_args(lot: &str) -> LotArgs {
        LotArgs {
            lot_name: lot.into(),
            add_sedan: 0,
            add_suv: 0,
            add_van: 0,
            remove_vehicle: None,
        }
    }

    #[test]
    fn lot_adds_and_removes() {
        let dir = tempfile::tempdir().unwrap();
        let layout = DataLayout::new(dir.path());

        let added = run_lot(
            &LotArgs {
                add_sedan: 2,
                add_van: 1,
                ..lot_args("north")
            },
            &layout,
        )
        .unwrap();
        assert_eq!(added.added.len(), 3);
        assert_eq!(added.vehicle_count, 3);

        let plate = added.added[0].plate.as_str().to_lowercase();
        let removed = run_lot(
            &LotArgs {
                remove_vehicle: Some(plate),
                ..lot_args("north")
            },
            &layout,
        )
        .unwrap();
        assert!(removed.removal.as_ref().unwrap().removed);
        assert_eq!(removed.vehicle_count, 2);

        let text = render_lot_summary(&removed);
        assert!(text.contains("has been successfully removed from lot north."));
        assert!(text.contains("Current vehicle count: 2"));
    }

    #[test]
    fn lot_summary_serializes() {
        let dir = tempfile::tempdir().unwrap();
        let layout = DataLayout::new(dir.path());
        let summary = run_lot(&LotArgs { add_suv: 1, ..lot_args("north") }, &layout).unwrap();

        let json: serde_json::Value = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["lot"], "north");
        assert_eq!(json["vehicle_count"], 1);
        assert_eq!(json["added"][0]["vehicle_type"], "SUV");
        assert_eq!(json["added"][0]["odometer"], 0);
        assert!(json["removal"].is_null());
    }

    #[test]
    fn invalid_lot_name_touches_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let layout = DataLayout::new(dir.path().join("data"));
        assert!(run_lot(&LotArgs { add_sedan: 1, ..lot_args("a/b") }, &layout).is_err());
        assert!(!layout.root().exists());
    }

    #[test]
    fn shop_config_falls_back_to_fleet_config() {
        let args = ShopArgs {
            location: "SanJose".into(),
            spaces_available: None,
            lots: vec!["north".into()],
            seed_from_lots: false,
            relocation_threshold: None,
        };
        let fleet = FleetConfig {
            default_spaces: 7,
            relocation_threshold: 3,
            ..FleetConfig::default()
        };
        let c = shop_config(&args, &fleet);
        assert_eq!(c.capacity, 7);
        assert_eq!(c.relocation_threshold, 3);
        assert_eq!(c.lots, vec!["north"]);
    }

    #[test]
    fn shop_loop_runs_until_exit() {
        let dir = tempfile::tempdir().unwrap();
        let layout = DataLayout::new(dir.path());
        run_lot(&LotArgs { add_sedan: 1, ..lot_args("north") }, &layout).unwrap();

        let config = ShopConfig::new("SanJose").with_lots(["north"]);
        let mut session = ShopSession::open_files(&config, layout).unwrap();
        let input = Cursor::new("RENT sedan\nLIST\nEXIT\nLIST\n");
        let mut output = Vec::new();
        run_shop_loop(&mut session, input, &mut output).unwrap();

        let text = String::from_utf8(output).unwrap();
        assert!(text.starts_with("Welcome to SanJose Rental Shop!\n"));
        assert!(text.contains("with 10% discount."));
        assert_eq!(text.matches("Shop Status Report").count(), 1);
        assert_eq!(session.state().rented.len(), 1);
    }

    #[test]
    fn shop_loop_stops_at_end_of_input() {
        let dir = tempfile::tempdir().unwrap();
        let mut session =
            ShopSession::open_files(&ShopConfig::new("Austin"), DataLayout::new(dir.path())).unwrap();
        let mut output = Vec::new();
        run_shop_loop(&mut session, Cursor::new("\nbogus\n"), &mut output).unwrap();

        let text = String::from_utf8(output).unwrap();
        assert!(text.contains("Unknown command."));
        assert!(text.ends_with("> \n"));
    }
}
