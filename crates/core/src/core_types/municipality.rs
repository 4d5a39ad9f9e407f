//! The three municipalities covered by the dashboard

use crate::core_types::coordinates::LngLat;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Unknown municipality name
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown municipality '{0}' (expected sallapadan, bucay or lagangilang)")]
pub struct UnknownMunicipality(pub String);

/// Municipality a sample was taken in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Municipality {
    /// Sallapadan
    Sallapadan,
    /// Bucay
    Bucay,
    /// Lagangilang
    Lagangilang,
}

impl Municipality {
    /// All municipalities in display order
    pub const ALL: [Municipality; 3] = [
        Municipality::Sallapadan,
        Municipality::Bucay,
        Municipality::Lagangilang,
    ];

    /// Human-readable name
    pub fn display_name(self) -> &'static str {
        match self {
            Municipality::Sallapadan => "Sallapadan",
            Municipality::Bucay => "Bucay",
            Municipality::Lagangilang => "Lagangilang",
        }
    }

    /// Lower-case identifier used in storage and form values
    pub fn slug(self) -> &'static str {
        match self {
            Municipality::Sallapadan => "sallapadan",
            Municipality::Bucay => "bucay",
            Municipality::Lagangilang => "lagangilang",
        }
    }

    /// Where the location picker opens for this municipality
    pub fn center(self) -> LngLat {
        match self {
            Municipality::Sallapadan => LngLat::new_const(120.95, 17.46),
            Municipality::Bucay => LngLat::new_const(120.74, 17.55),
            Municipality::Lagangilang => LngLat::new_const(120.79, 17.62),
        }
    }

    /// Convert from u8 for FFI compatibility
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Municipality::Sallapadan),
            1 => Some(Municipality::Bucay),
            2 => Some(Municipality::Lagangilang),
            _ => None,
        }
    }

    /// Convert to u8 for FFI compatibility
    pub fn as_u8(self) -> u8 {
        match self {
            Municipality::Sallapadan => 0,
            Municipality::Bucay => 1,
            Municipality::Lagangilang => 2,
        }
    }
}

impl fmt::Display for Municipality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for Municipality {
    type Err = UnknownMunicipality;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|m| m.slug().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownMunicipality(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("bucay".parse(), Ok(Municipality::Bucay));
        assert_eq!(" Sallapadan ".parse(), Ok(Municipality::Sallapadan));
        assert_eq!("LAGANGILANG".parse(), Ok(Municipality::Lagangilang));
        assert!("manila".parse::<Municipality>().is_err());
    }

    #[test]
    fn test_u8_round_trip_covers_all() {
        for m in Municipality::ALL {
            assert_eq!(Municipality::from_u8(m.as_u8()), Some(m));
        }
        assert_eq!(Municipality::from_u8(3), None);
    }

    #[test]
    fn test_serde_uses_slug() {
        let json = serde_json::to_string(&Municipality::Lagangilang).unwrap();
        assert_eq!(json, "\"lagangilang\"");
    }
}
