use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::TypeError;

const LETTERS: usize = 3;
const DIGITS: usize = 3;

/// A license plate: the system-wide unique identifier of a vehicle.
///
/// Plates are normalized to uppercase. Any non-empty token without
/// whitespace or commas is accepted (operators may hand-edit lot files), but
/// plates issued by the registry always have the form `AAA-000`.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Plate(String);

impl Plate {
    /// Validate and normalize a plate string.
    pub fn new(raw: &str) -> Result<Self, TypeError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(TypeError::InvalidPlate {
                plate: raw.to_string(),
                reason: "plate must not be empty".into(),
            });
        }
        if trimmed.contains(|c: char| c == ',' || c.is_whitespace()) {
            return Err(TypeError::InvalidPlate {
                plate: raw.to_string(),
                reason: "plate must not contain commas or whitespace".into(),
            });
        }
        Ok(Self(trimmed.to_ascii_uppercase()))
    }

    /// Draw a random candidate of the form `AAA-000`.
    ///
    /// Uniqueness is not guaranteed here; the plate registry rejects and
    /// redraws candidates that were already issued.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut plate = String::with_capacity(LETTERS + 1 + DIGITS);
        for _ in 0..LETTERS {
            plate.push(rng.gen_range(b'A'..=b'Z') as char);
        }
        plate.push('-');
        for _ in 0..DIGITS {
            plate.push(char::from(b'0' + rng.gen_range(0..10u8)));
        }
        Self(plate)
    }

    /// Returns `true` if the plate has the issued `AAA-000` shape.
    pub fn is_standard_format(&self) -> bool {
        let bytes = self.0.as_bytes();
        bytes.len() == LETTERS + 1 + DIGITS
            && bytes[..LETTERS].iter().all(u8::is_ascii_uppercase)
            && bytes[LETTERS] == b'-'
            && bytes[LETTERS + 1..].iter().all(u8::is_ascii_digit)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Case-insensitive comparison against a raw, unnormalized plate.
    pub fn matches(&self, raw: &str) -> bool {
        self.0.eq_ignore_ascii_case(raw.trim())
    }
}

impl FromStr for Plate {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl Borrow<str> for Plate {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Plate {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Plate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Plate({})", self.0)
    }
}

impl fmt::Display for Plate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
