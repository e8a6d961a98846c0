//! # Health Status — Packed Two-Field Value
//!
//! Aggregates two bounded measurements about an individual and a disease:
//!
//! - **shield strength** ∈ [0, 7]: how well the individual is protected
//!   (typically high after vaccination).
//! - **harmlessness** ∈ [0, 5]: how non-infectious the individual is to
//!   others (typically high after a negative test).
//!
//! Both fields pack into one signed integer,
//! `(harmlessness << 3) + shield_strength − 24`, which always lands in
//! [−24, 23] — the range the compact binary format encodes in a single
//! octet. Instances are immutable value types.

use serde::{Deserialize, Serialize};

use crate::error::ClaimError;
use crate::registrar::{Dialect, Registrar};

/// Inclusive upper bound for shield strength.
pub const MAX_SHIELD_STRENGTH: u8 = 7;

/// Inclusive upper bound for harmlessness.
pub const MAX_HARMLESSNESS: u8 = 5;

/// Offset making the packed value straddle zero; 48 states fit one octet.
const OFFSET: i64 = 24;

/// Protection level and non-infectiousness for one disease.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HealthStatus {
    shield_strength: u8,
    harmlessness: u8,
}

impl HealthStatus {
    /// Build a health status, rejecting out-of-range fields.
    pub fn new(shield_strength: u8, harmlessness: u8) -> Result<Self, ClaimError> {
        if shield_strength > MAX_SHIELD_STRENGTH {
            return Err(ClaimError::Range {
                field: "shieldStrength",
                max: MAX_SHIELD_STRENGTH,
                value: shield_strength as i64,
            });
        }
        if harmlessness > MAX_HARMLESSNESS {
            return Err(ClaimError::Range {
                field: "harmlessness",
                max: MAX_HARMLESSNESS,
                value: harmlessness as i64,
            });
        }
        Ok(Self {
            shield_strength,
            harmlessness,
        })
    }

    /// Level of protection, 0 = none, 7 = fully protected.
    pub fn shield_strength(&self) -> u8 {
        self.shield_strength
    }

    /// How harmless the individual is to others, 0 = high threat,
    /// 5 = not harmful at all.
    pub fn harmlessness(&self) -> u8 {
        self.harmlessness
    }

    /// Pack both fields into one signed integer per the (Germany, −1)
    /// dialect: `(harmlessness << 3) + shield_strength − 24`.
    pub fn packed(&self) -> i64 {
        ((self.harmlessness as i64) << 3) + self.shield_strength as i64 - OFFSET
    }

    /// Unpack a wire value under the given dialect.
    ///
    /// Dispatches on (registrar, version); unknown combinations are an
    /// `UnsupportedVersion` error, out-of-range values a `Range` error.
    pub fn from_packed(dialect: Dialect, raw: i64) -> Result<Self, ClaimError> {
        match (dialect.registrar, dialect.version) {
            (Registrar::Germany, -1) => {
                let value = raw + OFFSET;
                if !(0..48).contains(&value) {
                    return Err(ClaimError::Range {
                        field: "healthStatus",
                        max: 47,
                        value: raw,
                    });
                }
                Self::new((value & 0x7) as u8, (value >> 3) as u8)
            }
            _ => Err(ClaimError::UnsupportedVersion {
                registrar: dialect.registrar.identifier(),
                version: dialect.version,
            }),
        }
    }
}

impl std::fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "(shield={}, harmlessness={})",
            self.shield_strength, self.harmlessness
        )
    }
}
