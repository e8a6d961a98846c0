//! # Registrar and Dialect Tags
//!
//! A registrar is the jurisdiction that defines an encoding for serialized
//! artifacts. Each revision of a registrar's encoding rules is identified
//! by the registrar's wire identifier plus a version number assigned by
//! that registrar. All decoding dispatches first on the registrar, then on
//! the version; an unknown combination is a hard error.
//!
//! Telephone country codes are used as registrar identifiers: well defined,
//! unique, and small. The raw country code is folded with a zig-zag mapping
//! (even `n` → `n/2`, odd `n` → `(-1-n)/2`) so the wire identifier stays
//! close to zero in either sign, which keeps its integer encoding short.

use serde::{Deserialize, Serialize};

use crate::error::ClaimError;

/// A jurisdiction that registers encoding dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Registrar {
    /// Germany, telephone country code +49.
    Germany,
}

/// Code table: (registrar, raw telephone country code).
const REGISTRARS: [(Registrar, u16); 1] = [(Registrar::Germany, 49)];

impl Registrar {
    /// The raw telephone country code of this registrar.
    pub const fn country_code(self) -> u16 {
        match self {
            Registrar::Germany => 49,
        }
    }

    /// The zig-zag-folded wire identifier of this registrar.
    ///
    /// Germany (+49, odd) folds to −25.
    pub const fn identifier(self) -> i64 {
        fold(self.country_code())
    }

    /// Reverse lookup by wire identifier.
    ///
    /// The version is carried only to report an unknown identifier as an
    /// unsupported (registrar, version) pair, naming the offending values.
    pub fn from_identifier(identifier: i64, version: i64) -> Result<Self, ClaimError> {
        REGISTRARS
            .iter()
            .find(|(r, _)| r.identifier() == identifier)
            .map(|(r, _)| *r)
            .ok_or(ClaimError::UnsupportedVersion {
                registrar: identifier,
                version,
            })
    }
}

/// Zig-zag fold of a non-negative country code.
const fn fold(code: u16) -> i64 {
    let code = code as i64;
    if code & 1 == 0 {
        code >> 1
    } else {
        (-1 - code) >> 1
    }
}

impl std::fmt::Display for Registrar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Registrar::Germany => f.write_str("Germany"),
        }
    }
}

/// An encoding dialect: a registrar plus its version number.
///
/// This pair is the sole extension point for future encoding revisions.
/// New dialects are added as new dispatch arms; existing arms are never
/// mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dialect {
    /// Registrar that defined this dialect.
    pub registrar: Registrar,
    /// Version number assigned by the registrar.
    pub version: i64,
}

impl Dialect {
    /// The only dialect currently implemented: (Germany, −1).
    pub const CURRENT: Dialect = Dialect {
        registrar: Registrar::Germany,
        version: -1,
    };

    /// Returns this dialect unchanged if it is implemented, or
    /// `UnsupportedVersion` naming the offending pair.
    pub fn check_supported(self) -> Result<Self, ClaimError> {
        if self == Dialect::CURRENT {
            Ok(self)
        } else {
            Err(ClaimError::UnsupportedVersion {
                registrar: self.registrar.identifier(),
                version: self.version,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_germany_folds_to_minus_25() {
        assert_eq!(Registrar::Germany.identifier(), -25);
    }

    #[test]
    fn test_fold_even_and_odd() {
        assert_eq!(fold(0), 0);
        assert_eq!(fold(1), -1);
        assert_eq!(fold(48), 24);
        assert_eq!(fold(49), -25);
    }

    #[test]
    fn test_reverse_lookup() {
        assert_eq!(
            Registrar::from_identifier(-25, -1).unwrap(),
            Registrar::Germany
        );
    }

    #[test]
    fn test_reverse_lookup_unknown_is_unsupported_version() {
        let err = Registrar::from_identifier(7, -1).unwrap_err();
        match err {
            ClaimError::UnsupportedVersion { registrar, version } => {
                assert_eq!(registrar, 7);
                assert_eq!(version, -1);
            }
            other => panic!("expected UnsupportedVersion, got {other:?}"),
        }
    }

    #[test]
    fn test_code_table_identifiers_unique() {
        for (i, (a, _)) in REGISTRARS.iter().enumerate() {
            for (b, _) in REGISTRARS.iter().skip(i + 1) {
                assert_ne!(a.identifier(), b.identifier());
            }
        }
    }

    #[test]
    fn test_current_dialect_supported() {
        assert!(Dialect::CURRENT.check_supported().is_ok());
    }

    #[test]
    fn test_unknown_version_rejected() {
        let dialect = Dialect {
            registrar: Registrar::Germany,
            version: 2,
        };
        let err = dialect.check_supported().unwrap_err();
        assert!(err.to_string().contains("version 2"));
    }
}
