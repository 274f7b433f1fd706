use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use fleet_shop::{DEFAULT_CAPACITY, DEFAULT_RELOCATION_THRESHOLD};
use fleet_store::DEFAULT_DATA_DIR;

/// Process-wide defaults, optionally read from a TOML file. Command-line
/// flags override every value.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FleetConfig {
    pub data_dir: PathBuf,
    pub default_spaces: u32,
    pub relocation_threshold: u32,
}

impl Default for FleetConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            default_spaces: DEFAULT_CAPACITY,
            relocation_threshold: DEFAULT_RELOCATION_THRESHOLD,
        }
    }
}

impl FleetConfig {
    /// Read `path`, or return the defaults when no file is given.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let c = FleetConfig::default();
        assert_eq!(c.data_dir, PathBuf::from("outputs"));
        assert_eq!(c.default_spaces, 10);
        assert_eq!(c.relocation_threshold, 2);
        assert_eq!(FleetConfig::load(None).unwrap(), c);
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fleet.toml");
        fs::write(&path, "data_dir = \"/srv/fleet\"\ndefault_spaces = 25\n").unwrap();

        let c = FleetConfig::load(Some(&path)).unwrap();
        assert_eq!(c.data_dir, PathBuf::from("/srv/fleet"));
        assert_eq!(c.default_spaces, 25);
        assert_eq!(c.relocation_threshold, 2);
    }

    #[test]
    fn bad_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fleet.toml");
        fs::write(&path, "default_spaces = \"many\"").unwrap();
        assert!(FleetConfig::load(Some(&path)).is_err());
        assert!(FleetConfig::load(Some(&dir.path().join("missing.toml"))).is_err());
    }
}
