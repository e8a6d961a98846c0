//! # Disease Code Table
//!
//! Diseases are serialized as small signed integers chosen to fit the
//! one-byte integer encoding of the compact binary format. The enum is
//! closed: adding a disease means adding a variant and a table row, and
//! reverse lookup of an unknown code is a typed error.

use serde::{Deserialize, Serialize};

use crate::error::ClaimError;

/// A disease with a registered wire code.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Disease {
    /// General item for Covid-19.
    Covid19,
    /// Mutant of Covid-19, here the british mutant.
    Covid19B117,
    /// Hepatitis A.
    HepatitisA,
    /// Hepatitis B.
    HepatitisB,
    /// Hepatitis C.
    HepatitisC,
}

impl Disease {
    /// All registered diseases.
    pub const ALL: [Disease; 5] = [
        Disease::Covid19,
        Disease::Covid19B117,
        Disease::HepatitisA,
        Disease::HepatitisB,
        Disease::HepatitisC,
    ];

    /// The wire code of this disease.
    pub const fn code(self) -> i64 {
        match self {
            Disease::Covid19 => 0,
            Disease::Covid19B117 => 1,
            Disease::HepatitisA => -1,
            Disease::HepatitisB => 2,
            Disease::HepatitisC => -2,
        }
    }

    /// Human-readable name of this disease.
    pub const fn full_name(self) -> &'static str {
        match self {
            Disease::Covid19 => "Covid-19",
            Disease::Covid19B117 => "Covid-19, B1.1.7",
            Disease::HepatitisA => "Hepatitis A",
            Disease::HepatitisB => "Hepatitis B",
            Disease::HepatitisC => "Hepatitis C",
        }
    }

    /// Reverse lookup by wire code.
    pub fn from_code(code: i64) -> Result<Self, ClaimError> {
        Self::ALL
            .iter()
            .find(|d| d.code() == code)
            .copied()
            .ok_or(ClaimError::UnknownDisease(code))
    }
}

impl std::fmt::Display for Disease {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.full_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_roundtrip() {
        for disease in Disease::ALL {
            assert_eq!(Disease::from_code(disease.code()).unwrap(), disease);
        }
    }

    #[test]
    fn test_codes_unique() {
        for (i, a) in Disease::ALL.iter().enumerate() {
            for b in Disease::ALL.iter().skip(i + 1) {
                assert_ne!(a.code(), b.code());
            }
        }
    }

    #[test]
    fn test_codes_fit_one_byte_encoding() {
        // Wire codes must stay in [-24, 23] so the compact binary format
        // encodes them without a length prefix.
        for disease in Disease::ALL {
            assert!((-24..=23).contains(&disease.code()), "{disease:?}");
        }
    }

    #[test]
    fn test_unknown_code_is_typed_error() {
        match Disease::from_code(99).unwrap_err() {
            ClaimError::UnknownDisease(99) => {}
            other => panic!("expected UnknownDisease, got {other:?}"),
        }
    }
}
