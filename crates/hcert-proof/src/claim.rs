//! # Health-Status Claims
//!
//! A claim binds a person (name, day of birth) to a health status per
//! disease, valid until an expiry instant. Its wire form under the
//! (Germany, −1) dialect is six sequential top-level CBOR items:
//!
//! ```text
//! integer  registrar wire identifier (−25)
//! integer  dialect version (−1)
//! text     full name
//! integer  day of birth, as days since 1970-01-01 (signed)
//! integer  expiry, as epoch seconds
//! map      disease code → packed health status
//! ```
//!
//! Decoding dispatches on the leading (registrar, version) pair before
//! touching anything else; an unknown pair is rejected naming both values.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use hcert_codec::cbor::{self, Value};
use hcert_core::{ClaimError, Dialect, Disease, HealthStatus, Registrar, Timestamp};

/// Days from 0001-01-01 (CE day 1) to 1970-01-01.
const UNIX_EPOCH_DAYS_FROM_CE: i64 = 719_163;

/// A person's health status per disease, with validity bounds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Claim {
    name: String,
    day_of_birth: NaiveDate,
    expires: Timestamp,
    status: BTreeMap<Disease, HealthStatus>,
}

impl Claim {
    /// Build a claim. The name must be non-empty and at least one disease
    /// must be covered.
    pub fn new(
        name: impl Into<String>,
        day_of_birth: NaiveDate,
        expires: Timestamp,
        status: BTreeMap<Disease, HealthStatus>,
    ) -> Result<Self, ClaimError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ClaimError::Format("claim name must not be empty".into()));
        }
        if status.is_empty() {
            return Err(ClaimError::Format(
                "claim must cover at least one disease".into(),
            ));
        }
        Ok(Self {
            name,
            day_of_birth,
            expires,
            status,
        })
    }

    /// The person's full name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The person's day of birth.
    pub fn day_of_birth(&self) -> NaiveDate {
        self.day_of_birth
    }

    /// When this claim stops being valid.
    pub fn expires(&self) -> Timestamp {
        self.expires
    }

    /// Health status per covered disease.
    pub fn status(&self) -> &BTreeMap<Disease, HealthStatus> {
        &self.status
    }

    /// Encode under the current dialect.
    pub fn encode(&self) -> Result<Vec<u8>, ClaimError> {
        let dialect = Dialect::CURRENT;
        let day_of_birth =
            self.day_of_birth.num_days_from_ce() as i64 - UNIX_EPOCH_DAYS_FROM_CE;
        let entries = self
            .status
            .iter()
            .map(|(disease, status)| {
                (
                    Value::Integer(disease.code() as i128),
                    Value::Integer(status.packed() as i128),
                )
            })
            .collect();
        let items = [
            Value::Integer(dialect.registrar.identifier() as i128),
            Value::Integer(dialect.version as i128),
            Value::Text(self.name.clone()),
            Value::Integer(day_of_birth as i128),
            Value::Integer(self.expires.epoch_secs() as i128),
            Value::Map(entries),
        ];
        cbor::encode_all(&items).map_err(|e| ClaimError::Format(e.to_string()))
    }

    /// Decode a claim, dispatching on its leading (registrar, version).
    pub fn decode(bytes: &[u8]) -> Result<Self, ClaimError> {
        let codec = |e: hcert_core::CodecError| ClaimError::Format(e.to_string());
        let items = cbor::decode_exactly(bytes, 6).map_err(codec)?;

        let registrar_id = items[0].as_i64().map_err(codec)?;
        let version = items[1].as_i64().map_err(codec)?;
        let registrar = Registrar::from_identifier(registrar_id, version)?;
        let dialect = Dialect { registrar, version }.check_supported()?;

        let name = items[2].as_text().map_err(codec)?.to_owned();
        let birth_days = items[3].as_i64().map_err(codec)?;
        let day_of_birth = days_since_epoch_to_date(birth_days)?;
        let expires = Timestamp::from_epoch_secs(items[4].as_i64().map_err(codec)?)?;

        let mut status = BTreeMap::new();
        for (key, value) in items[5].as_map().map_err(codec)? {
            let disease = Disease::from_code(key.as_i64().map_err(codec)?)?;
            let packed = HealthStatus::from_packed(dialect, value.as_i64().map_err(codec)?)?;
            if status.insert(disease, packed).is_some() {
                return Err(ClaimError::Format(format!(
                    "disease {disease} listed twice"
                )));
            }
        }
        Self::new(name, day_of_birth, expires, status)
    }

    /// Multi-line text rendering for human inspection.
    pub fn render_text(&self) -> String {
        let mut out = format!(
            "CLAIM\n|  name {:?}\n|  day of birth {}\n|  expires {}\n",
            self.name, self.day_of_birth, self.expires
        );
        for (disease, status) in &self.status {
            out.push_str(&format!("|  {disease} {status}\n"));
        }
        out
    }
}

fn days_since_epoch_to_date(days: i64) -> Result<NaiveDate, ClaimError> {
    let from_ce = days + UNIX_EPOCH_DAYS_FROM_CE;
    i32::try_from(from_ce)
        .ok()
        .and_then(NaiveDate::from_num_days_from_ce_opt)
        .ok_or_else(|| ClaimError::Format(format!("day of birth {days} is out of range")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn sample() -> Claim {
        let mut status = BTreeMap::new();
        status.insert(Disease::Covid19, HealthStatus::new(5, 4).unwrap());
        Claim::new(
            "John Doe",
            NaiveDate::from_ymd_opt(1968, 5, 27).unwrap(),
            Timestamp::parse("2021-08-27T15:46:39Z").unwrap(),
            status,
        )
        .unwrap()
    }

    #[test]
    fn test_roundtrip() {
        let claim = sample();
        let bytes = claim.encode().unwrap();
        assert_eq!(Claim::decode(&bytes).unwrap(), claim);
    }

    #[test]
    fn test_wire_leads_with_dialect() {
        let bytes = sample().encode().unwrap();
        let items = cbor::decode_all(&bytes).unwrap();
        assert_eq!(items[0].as_i64().unwrap(), -25);
        assert_eq!(items[1].as_i64().unwrap(), -1);
    }

    #[test]
    fn test_birth_date_is_signed_day_count() {
        let bytes = sample().encode().unwrap();
        let items = cbor::decode_all(&bytes).unwrap();
        // 1968-05-27 precedes the epoch, so the day count is negative.
        let days = items[3].as_i64().unwrap();
        assert!(days < 0);
        let date = days_since_epoch_to_date(days).unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(1968, 5, 27).unwrap());
    }

    #[test]
    fn test_unknown_registrar_rejected() {
        let mut items = cbor::decode_all(&sample().encode().unwrap()).unwrap();
        items[0] = Value::Integer(7);
        let bytes = cbor::encode_all(&items).unwrap();
        let err = Claim::decode(&bytes).unwrap_err();
        assert!(matches!(err, ClaimError::UnsupportedVersion { registrar: 7, .. }));
    }

    #[test]
    fn test_unknown_version_rejected() {
        let claim = sample();
        let mut items = cbor::decode_all(&claim.encode().unwrap()).unwrap();
        items[1] = Value::Integer(3);
        let bytes = cbor::encode_all(&items).unwrap();
        let err = Claim::decode(&bytes).unwrap_err();
        assert!(matches!(
            err,
            ClaimError::UnsupportedVersion { version: 3, .. }
        ));
    }

    #[test]
    fn test_duplicate_disease_rejected() {
        let claim = sample();
        let mut items = cbor::decode_all(&claim.encode().unwrap()).unwrap();
        items[5] = Value::Map(vec![
            (Value::Integer(0), Value::Integer(0)),
            (Value::Integer(0), Value::Integer(1)),
        ]);
        let bytes = cbor::encode_all(&items).unwrap();
        assert!(Claim::decode(&bytes).is_err());
    }

    #[test]
    fn test_empty_name_rejected() {
        let err = Claim::new(
            "  ",
            NaiveDate::from_ymd_opt(1990, 1, 1).unwrap(),
            Timestamp::now(),
            BTreeMap::from([(Disease::Covid19, HealthStatus::new(1, 1).unwrap())]),
        )
        .unwrap_err();
        assert!(matches!(err, ClaimError::Format(_)));
    }

    #[test]
    fn test_empty_status_rejected() {
        let err = Claim::new(
            "Jane",
            NaiveDate::from_ymd_opt(1990, 1, 1).unwrap(),
            Timestamp::now(),
            BTreeMap::new(),
        )
        .unwrap_err();
        assert!(matches!(err, ClaimError::Format(_)));
    }

    proptest! {
        #[test]
        fn prop_roundtrip(
            shield in 0u8..=7,
            harmless in 0u8..=5,
            birth_days in -20_000i64..20_000,
            expiry in 0i64..4_000_000_000,
        ) {
            let mut status = BTreeMap::new();
            status.insert(Disease::HepatitisC, HealthStatus::new(shield, harmless).unwrap());
            let claim = Claim::new(
                "Jane Roe",
                days_since_epoch_to_date(birth_days).unwrap(),
                Timestamp::from_epoch_secs(expiry).unwrap(),
                status,
            )
            .unwrap();
            let bytes = claim.encode().unwrap();
            prop_assert_eq!(Claim::decode(&bytes).unwrap(), claim);
        }
    }
}
