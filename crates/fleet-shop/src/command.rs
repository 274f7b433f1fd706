//! The shop's line protocol.
//!
//! ```text
//! RENT <TYPE>
//! RETURN <PLATE> <KM>
//! LIST
//! TRANSACTIONS
//! EXIT
//! ```
//!
//! Keywords and vehicle types are case-insensitive. Trailing tokens are
//! ignored.

use std::str::FromStr;

use fleet_types::VehicleType;

/// A parsed shop command.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Rent(VehicleType),
    Return { plate: String, distance: u64 },
    List,
    Transactions,
    Exit,
}

/// Why a line is not a command. The display text is the report shown to the
/// user.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("Usage: RENT <VEHICLE TYPE>")]
    RentUsage,

    #[error("Usage: RETURN <LICENSE PLATE> <KILOMETERS>")]
    ReturnUsage,

    #[error("Invalid kilometers value.")]
    InvalidDistance,

    #[error("Unknown vehicle type: {0}. Use SEDAN, SUV, or VAN.")]
    UnknownVehicleType(String),

    #[error("Unknown command.")]
    Unknown,
}

impl Command {
    /// Parse one input line. Blank lines parse to `Ok(None)`.
    pub fn parse(line: &str) -> Result<Option<Self>, CommandError> {
        let mut tokens = line.split_whitespace();
        let Some(keyword) = tokens.next() else {
            return Ok(None);
        };

        let command = match keyword.to_ascii_uppercase().as_str() {
            "RENT" => {
                let raw = tokens.next().ok_or(CommandError::RentUsage)?;
                let vehicle_type = VehicleType::from_str(raw)
                    .map_err(|_| CommandError::UnknownVehicleType(raw.to_ascii_uppercase()))?;
                Command::Rent(vehicle_type)
            }
            "RETURN" => {
                let (Some(plate), Some(km)) = (tokens.next(), tokens.next()) else {
                    return Err(CommandError::ReturnUsage);
                };
                let distance = km.parse::<u64>().map_err(|_| CommandError::InvalidDistance)?;
                Command::Return {
                    plate: plate.to_ascii_uppercase(),
                    distance,
                }
            }
            "LIST" => Command::List,
            "TRANSACTIONS" => Command::Transactions,
            "EXIT" => Command::Exit,
            _ => return Err(CommandError::Unknown),
        };
        Ok(Some(command))
    }

    /// Whether executing the command can change shop state.
    pub fn mutates(&self) -> bool {
        matches!(self, Command::Rent(_) | Command::Return { .. })
    }
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Command::parse(s)?.ok_or(CommandError::Unknown)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> Result<Command, CommandError> {
        line.parse()
    }

    #[test]
    fn keywords_are_case_insensitive() {
        assert_eq!(parse("rent suv"), Ok(Command::Rent(VehicleType::Suv)));
        assert_eq!(parse("  LiSt "), Ok(Command::List));
        assert_eq!(parse("transactions"), Ok(Command::Transactions));
        assert_eq!(parse("exit"), Ok(Command::Exit));
        assert_eq!(
            parse("return abc-123 100"),
            Ok(Command::Return {
                plate: "ABC-123".into(),
                distance: 100
            })
        );
    }

    #[test]
    fn missing_arguments_report_usage() {
        assert_eq!(parse("RENT"), Err(CommandError::RentUsage));
        assert_eq!(parse("RETURN ABC-123"), Err(CommandError::ReturnUsage));
        assert_eq!(
            CommandError::ReturnUsage.to_string(),
            "Usage: RETURN <LICENSE PLATE> <KILOMETERS>"
        );
    }

    #[test]
    fn bad_distances_are_rejected() {
        for km in ["-5", "ten", "1.5", ""] {
            let line = format!("RETURN ABC-123 {km}");
            let expected = if km.is_empty() {
                CommandError::ReturnUsage
            } else {
                CommandError::InvalidDistance
            };
            assert_eq!(parse(&line), Err(expected), "line {line:?}");
        }
        assert_eq!(CommandError::InvalidDistance.to_string(), "Invalid kilometers value.");
    }

    #[test]
    fn unknown_input() {
        assert_eq!(parse("FLY away"), Err(CommandError::Unknown));
        assert_eq!(
            parse("RENT truck"),
            Err(CommandError::UnknownVehicleType("TRUCK".into()))
        );
        assert_eq!(Command::parse("   "), Ok(None));
    }

    #[test]
    fn only_rent_and_return_mutate() {
        assert!(Command::Rent(VehicleType::Van).mutates());
        assert!(!Command::List.mutates());
        assert!(!Command::Exit.mutates());
    }
}
