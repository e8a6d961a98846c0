//! # Vaccination Records
//!
//! The certificate-of-vaccination side of the system: a record of who was
//! inoculated with which vaccine, from which batch, on which day. Unlike a
//! claim it is a DER structure rather than CBOR, and it carries contact
//! data a signed proof deliberately omits:
//!
//! ```text
//! VaccinationRecord ::= SEQUENCE {
//!     version     INTEGER (1),
//!     person      SEQUENCE { version INTEGER (1), name UTF8String,
//!                            dayOfBirth UTF8String, email UTF8String },
//!     vaccination SEQUENCE { version INTEGER (1),
//!                            vaccine SEQUENCE { version INTEGER (1),
//!                                               manufacturer UTF8String,
//!                                               name UTF8String },
//!                            batch UTF8String, date UTF8String }
//! }
//! ```
//!
//! Dates travel as ISO `YYYY-MM-DD` strings. Every nested structure leads
//! with its own version integer so each part can evolve independently;
//! decoding rejects any version other than 1.

use chrono::NaiveDate;
use hcert_codec::Tlv;
use hcert_core::ClaimError;

const RECORD_VERSION: i128 = 1;

/// The person a vaccination record belongs to.
///
/// The name is a single free-form string; splitting it into given name,
/// surname, and titles is culture-specific and deliberately avoided.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonalInfo {
    name: String,
    day_of_birth: NaiveDate,
    email: String,
}

/// The vaccine administered: manufacturer and product name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vaccine {
    manufacturer: String,
    name: String,
}

/// One inoculation: the vaccine, the ampoule batch, and the date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vaccination {
    vaccine: Vaccine,
    batch: String,
    date: NaiveDate,
}

/// A complete certificate-of-vaccination record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VaccinationRecord {
    person: PersonalInfo,
    vaccination: Vaccination,
}

// ---------------------------------------------------------------------------
// PersonalInfo
// ---------------------------------------------------------------------------

impl PersonalInfo {
    /// Build personal information. The name must be non-empty; the email
    /// address is an arbitrary string.
    pub fn new(
        name: impl Into<String>,
        day_of_birth: NaiveDate,
        email: impl Into<String>,
    ) -> Result<Self, ClaimError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ClaimError::Format("person name must not be empty".into()));
        }
        Ok(Self {
            name,
            day_of_birth,
            email: email.into(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn day_of_birth(&self) -> NaiveDate {
        self.day_of_birth
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    fn encode(&self) -> Tlv {
        Tlv::Sequence(vec![
            Tlv::Integer(RECORD_VERSION),
            Tlv::Utf8String(self.name.clone()),
            Tlv::Utf8String(self.day_of_birth.to_string()),
            Tlv::Utf8String(self.email.clone()),
        ])
    }

    fn decode(tlv: &Tlv) -> Result<Self, ClaimError> {
        check_version(tlv, "personal information")?;
        let name = tlv.element(1).and_then(Tlv::as_utf8_string).map_err(codec)?;
        let day_of_birth =
            parse_date(tlv.element(2).and_then(Tlv::as_utf8_string).map_err(codec)?)?;
        let email = tlv.element(3).and_then(Tlv::as_utf8_string).map_err(codec)?;
        Self::new(name, day_of_birth, email)
    }
}

// ---------------------------------------------------------------------------
// Vaccine and Vaccination
// ---------------------------------------------------------------------------

impl Vaccine {
    pub fn new(manufacturer: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            manufacturer: manufacturer.into(),
            name: name.into(),
        }
    }

    pub fn manufacturer(&self) -> &str {
        &self.manufacturer
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn encode(&self) -> Tlv {
        Tlv::Sequence(vec![
            Tlv::Integer(RECORD_VERSION),
            Tlv::Utf8String(self.manufacturer.clone()),
            Tlv::Utf8String(self.name.clone()),
        ])
    }

    fn decode(tlv: &Tlv) -> Result<Self, ClaimError> {
        check_version(tlv, "vaccine")?;
        let manufacturer = tlv.element(1).and_then(Tlv::as_utf8_string).map_err(codec)?;
        let name = tlv.element(2).and_then(Tlv::as_utf8_string).map_err(codec)?;
        Ok(Self::new(manufacturer, name))
    }
}

impl Vaccination {
    pub fn new(vaccine: Vaccine, batch: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            vaccine,
            batch: batch.into(),
            date,
        }
    }

    pub fn vaccine(&self) -> &Vaccine {
        &self.vaccine
    }

    /// Identification of the ampoule the dose came from.
    pub fn batch(&self) -> &str {
        &self.batch
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    fn encode(&self) -> Tlv {
        Tlv::Sequence(vec![
            Tlv::Integer(RECORD_VERSION),
            self.vaccine.encode(),
            Tlv::Utf8String(self.batch.clone()),
            Tlv::Utf8String(self.date.to_string()),
        ])
    }

    fn decode(tlv: &Tlv) -> Result<Self, ClaimError> {
        check_version(tlv, "vaccination")?;
        let vaccine = Vaccine::decode(tlv.element(1).map_err(codec)?)?;
        let batch = tlv.element(2).and_then(Tlv::as_utf8_string).map_err(codec)?;
        let date = parse_date(tlv.element(3).and_then(Tlv::as_utf8_string).map_err(codec)?)?;
        Ok(Self::new(vaccine, batch, date))
    }
}

// ---------------------------------------------------------------------------
// VaccinationRecord
// ---------------------------------------------------------------------------

impl VaccinationRecord {
    pub fn new(person: PersonalInfo, vaccination: Vaccination) -> Self {
        Self {
            person,
            vaccination,
        }
    }

    pub fn person(&self) -> &PersonalInfo {
        &self.person
    }

    pub fn vaccination(&self) -> &Vaccination {
        &self.vaccination
    }

    /// Serialize to DER.
    pub fn to_der(&self) -> Vec<u8> {
        Tlv::Sequence(vec![
            Tlv::Integer(RECORD_VERSION),
            self.person.encode(),
            self.vaccination.encode(),
        ])
        .to_der()
    }

    /// Parse a record from DER bytes, dispatching on each version integer.
    pub fn from_der(bytes: &[u8]) -> Result<Self, ClaimError> {
        let tlv = Tlv::from_der(bytes).map_err(codec)?;
        check_version(&tlv, "vaccination record")?;
        let person = PersonalInfo::decode(tlv.element(1).map_err(codec)?)?;
        let vaccination = Vaccination::decode(tlv.element(2).map_err(codec)?)?;
        Ok(Self::new(person, vaccination))
    }

    /// Multi-line text rendering for human inspection.
    pub fn render_text(&self) -> String {
        format!(
            "VACCINATION RECORD\n\
             |  person {:?}, born {}, email {:?}\n\
             |  vaccine {:?} by {:?}\n\
             |  batch {:?}, date {}\n",
            self.person.name,
            self.person.day_of_birth,
            self.person.email,
            self.vaccination.vaccine.name,
            self.vaccination.vaccine.manufacturer,
            self.vaccination.batch,
            self.vaccination.date,
        )
    }
}

fn check_version(tlv: &Tlv, what: &str) -> Result<(), ClaimError> {
    let version = tlv.element(0).and_then(Tlv::as_integer).map_err(codec)?;
    if version != RECORD_VERSION {
        return Err(ClaimError::Format(format!(
            "unsupported {what} version {version}"
        )));
    }
    Ok(())
}

fn parse_date(text: &str) -> Result<NaiveDate, ClaimError> {
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .map_err(|_| ClaimError::Format(format!("invalid date {text:?}, expected YYYY-MM-DD")))
}

fn codec(e: hcert_core::CodecError) -> ClaimError {
    ClaimError::Format(e.to_string())
}
