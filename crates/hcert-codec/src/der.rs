//! # DER Tag-Length-Value Trees
//!
//! The certificate structures in this system are hand-built ASN.1 DER.
//! `Tlv` models the node kinds those structures need — INTEGER,
//! OCTET STRING, UTF8String, PrintableString, BOOLEAN, NULL, BIT STRING,
//! UTCTime, OBJECT IDENTIFIER, SEQUENCE, SET, and constructed
//! context-specific tags — each round-trippable to and from its canonical
//! byte serialization.
//!
//! Beyond the binary form, every tree renders to an annotated text view
//! ([`Tlv::render_tree`]) which the credential store writes next to each
//! binary artifact.

use chrono::{TimeZone, Utc};
use hcert_core::{CodecError, Timestamp};

/// Universal tag numbers (and the context-specific constructed base).
const TAG_BOOLEAN: u8 = 0x01;
const TAG_INTEGER: u8 = 0x02;
const TAG_BIT_STRING: u8 = 0x03;
const TAG_OCTET_STRING: u8 = 0x04;
const TAG_NULL: u8 = 0x05;
const TAG_OID: u8 = 0x06;
const TAG_UTF8_STRING: u8 = 0x0c;
const TAG_PRINTABLE_STRING: u8 = 0x13;
const TAG_UTC_TIME: u8 = 0x17;
const TAG_SEQUENCE: u8 = 0x30;
const TAG_SET: u8 = 0x31;
const TAG_CONTEXT_CONSTRUCTED: u8 = 0xa0;

/// A DER node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tlv {
    /// BOOLEAN.
    Boolean(bool),
    /// INTEGER, minimal two's-complement content.
    Integer(i128),
    /// BIT STRING with a count of unused trailing bits.
    BitString {
        /// Unused bits in the final content octet (0..=7).
        unused_bits: u8,
        /// The bit content, most significant bit first.
        bytes: Vec<u8>,
    },
    /// OCTET STRING.
    OctetString(Vec<u8>),
    /// NULL.
    Null,
    /// OBJECT IDENTIFIER as its arc sequence.
    Oid(Vec<u64>),
    /// UTF8String.
    Utf8String(String),
    /// PrintableString.
    PrintableString(String),
    /// UTCTime, seconds precision, always Zulu.
    UtcTime(Timestamp),
    /// SEQUENCE (ordered).
    Sequence(Vec<Tlv>),
    /// SET (unordered; serialized in the order given).
    Set(Vec<Tlv>),
    /// Constructed context-specific tag `[n]` with children.
    Context {
        /// Context tag number (0..=30).
        tag: u8,
        /// Child nodes.
        elements: Vec<Tlv>,
    },
}

impl Tlv {
    /// Human-readable kind name for error messages and tree rendering.
    fn kind(&self) -> &'static str {
        match self {
            Tlv::Boolean(_) => "BOOLEAN",
            Tlv::Integer(_) => "INTEGER",
            Tlv::BitString { .. } => "BIT STRING",
            Tlv::OctetString(_) => "OCTET STRING",
            Tlv::Null => "NULL",
            Tlv::Oid(_) => "OBJECT IDENTIFIER",
            Tlv::Utf8String(_) => "UTF8String",
            Tlv::PrintableString(_) => "PrintableString",
            Tlv::UtcTime(_) => "UTCTime",
            Tlv::Sequence(_) => "SEQUENCE",
            Tlv::Set(_) => "SET",
            Tlv::Context { .. } => "[context]",
        }
    }

    // -----------------------------------------------------------------
    // Encoding
    // -----------------------------------------------------------------

    /// Serialize this tree to canonical DER.
    pub fn to_der(&self) -> Vec<u8> {
        let mut out = Vec::new();
        self.write(&mut out);
        out
    }

    fn write(&self, out: &mut Vec<u8>) {
        let (tag, content) = self.tag_and_content();
        out.push(tag);
        write_length(content.len(), out);
        out.extend_from_slice(&content);
    }

    fn tag_and_content(&self) -> (u8, Vec<u8>) {
        match self {
            Tlv::Boolean(b) => (TAG_BOOLEAN, vec![if *b { 0xff } else { 0x00 }]),
            Tlv::Integer(n) => (TAG_INTEGER, integer_content(*n)),
            Tlv::BitString { unused_bits, bytes } => {
                let mut content = Vec::with_capacity(bytes.len() + 1);
                content.push(*unused_bits);
                content.extend_from_slice(bytes);
                (TAG_BIT_STRING, content)
            }
            Tlv::OctetString(bytes) => (TAG_OCTET_STRING, bytes.clone()),
            Tlv::Null => (TAG_NULL, Vec::new()),
            Tlv::Oid(arcs) => (TAG_OID, oid_content(arcs)),
            Tlv::Utf8String(s) => (TAG_UTF8_STRING, s.as_bytes().to_vec()),
            Tlv::PrintableString(s) => (TAG_PRINTABLE_STRING, s.as_bytes().to_vec()),
            Tlv::UtcTime(ts) => (
                TAG_UTC_TIME,
                ts.as_datetime()
                    .format("%y%m%d%H%M%SZ")
                    .to_string()
                    .into_bytes(),
            ),
            Tlv::Sequence(children) => (TAG_SEQUENCE, children_content(children)),
            Tlv::Set(children) => (TAG_SET, children_content(children)),
            Tlv::Context { tag, elements } => {
                (TAG_CONTEXT_CONSTRUCTED | (tag & 0x1f), children_content(elements))
            }
        }
    }

    // -----------------------------------------------------------------
    // Decoding
    // -----------------------------------------------------------------

    /// Parse exactly one DER tree from `bytes`; trailing bytes are a
    /// structure error.
    pub fn from_der(bytes: &[u8]) -> Result<Tlv, CodecError> {
        let (tlv, consumed) = parse_one(bytes)?;
        if consumed != bytes.len() {
            return Err(CodecError::Structure(format!(
                "{} trailing bytes after DER value",
                bytes.len() - consumed
            )));
        }
        Ok(tlv)
    }

    /// Parse every concatenated DER tree in `bytes`.
    pub fn from_der_all(bytes: &[u8]) -> Result<Vec<Tlv>, CodecError> {
        let mut trees = Vec::new();
        let mut rest = bytes;
        while !rest.is_empty() {
            let (tlv, consumed) = parse_one(rest)?;
            trees.push(tlv);
            rest = &rest[consumed..];
        }
        Ok(trees)
    }

    // -----------------------------------------------------------------
    // Typed accessors
    // -----------------------------------------------------------------

    /// The children of a SEQUENCE, or a structure error.
    pub fn as_sequence(&self) -> Result<&[Tlv], CodecError> {
        match self {
            Tlv::Sequence(children) => Ok(children),
            other => Err(type_mismatch("SEQUENCE", other)),
        }
    }

    /// The children of a SET, or a structure error.
    pub fn as_set(&self) -> Result<&[Tlv], CodecError> {
        match self {
            Tlv::Set(children) => Ok(children),
            other => Err(type_mismatch("SET", other)),
        }
    }

    /// The children of a constructed context tag, or a structure error.
    pub fn as_context(&self, expected_tag: u8) -> Result<&[Tlv], CodecError> {
        match self {
            Tlv::Context { tag, elements } if *tag == expected_tag => Ok(elements),
            other => Err(type_mismatch("context tag", other)),
        }
    }

    /// The INTEGER value, or a structure error.
    pub fn as_integer(&self) -> Result<i128, CodecError> {
        match self {
            Tlv::Integer(n) => Ok(*n),
            other => Err(type_mismatch("INTEGER", other)),
        }
    }

    /// The BIT STRING content (ignoring unused-bit count), or a structure error.
    pub fn as_bit_string(&self) -> Result<&[u8], CodecError> {
        match self {
            Tlv::BitString { bytes, .. } => Ok(bytes),
            other => Err(type_mismatch("BIT STRING", other)),
        }
    }

    /// The OCTET STRING content, or a structure error.
    pub fn as_octet_string(&self) -> Result<&[u8], CodecError> {
        match self {
            Tlv::OctetString(bytes) => Ok(bytes),
            other => Err(type_mismatch("OCTET STRING", other)),
        }
    }

    /// The UTF8String content, or a structure error.
    pub fn as_utf8_string(&self) -> Result<&str, CodecError> {
        match self {
            Tlv::Utf8String(s) => Ok(s),
            other => Err(type_mismatch("UTF8String", other)),
        }
    }

    /// The PrintableString content, or a structure error.
    pub fn as_printable_string(&self) -> Result<&str, CodecError> {
        match self {
            Tlv::PrintableString(s) => Ok(s),
            other => Err(type_mismatch("PrintableString", other)),
        }
    }

    /// The OID arcs, or a structure error.
    pub fn as_oid(&self) -> Result<&[u64], CodecError> {
        match self {
            Tlv::Oid(arcs) => Ok(arcs),
            other => Err(type_mismatch("OBJECT IDENTIFIER", other)),
        }
    }

    /// The UTCTime value, or a structure error.
    pub fn as_utc_time(&self) -> Result<Timestamp, CodecError> {
        match self {
            Tlv::UtcTime(ts) => Ok(*ts),
            other => Err(type_mismatch("UTCTime", other)),
        }
    }

    /// Indexed child of a constructed node, with a structure error when
    /// fewer elements are present than the schema requires.
    pub fn element(&self, index: usize) -> Result<&Tlv, CodecError> {
        let children = match self {
            Tlv::Sequence(children) | Tlv::Set(children) => children,
            Tlv::Context { elements, .. } => elements,
            other => return Err(type_mismatch("constructed node", other)),
        };
        children.get(index).ok_or_else(|| {
            CodecError::Structure(format!(
                "{} has {} elements, index {index} required",
                self.kind(),
                children.len()
            ))
        })
    }

    // -----------------------------------------------------------------
    // Rendering
    // -----------------------------------------------------------------

    /// Render an annotated, indented tree view of this node.
    pub fn render_tree(&self) -> String {
        let mut out = String::new();
        self.render_into(&mut out, 0);
        out
    }

    fn render_into(&self, out: &mut String, depth: usize) {
        for _ in 0..depth {
            out.push_str("|  ");
        }
        match self {
            Tlv::Boolean(b) => out.push_str(&format!("BOOLEAN {b}\n")),
            Tlv::Integer(n) => out.push_str(&format!("INTEGER {n}\n")),
            Tlv::BitString { unused_bits, bytes } => out.push_str(&format!(
                "BIT STRING ({unused_bits} unused bits) {}\n",
                to_hex(bytes)
            )),
            Tlv::OctetString(bytes) => {
                out.push_str(&format!("OCTET STRING {}\n", to_hex(bytes)))
            }
            Tlv::Null => out.push_str("NULL\n"),
            Tlv::Oid(arcs) => {
                let dotted: Vec<String> = arcs.iter().map(u64::to_string).collect();
                out.push_str(&format!("OBJECT IDENTIFIER {}\n", dotted.join(".")));
            }
            Tlv::Utf8String(s) => out.push_str(&format!("UTF8String {s:?}\n")),
            Tlv::PrintableString(s) => out.push_str(&format!("PrintableString {s:?}\n")),
            Tlv::UtcTime(ts) => out.push_str(&format!("UTCTime {ts}\n")),
            Tlv::Sequence(children) => {
                out.push_str("SEQUENCE\n");
                for child in children {
                    child.render_into(out, depth + 1);
                }
            }
            Tlv::Set(children) => {
                out.push_str("SET\n");
                for child in children {
                    child.render_into(out, depth + 1);
                }
            }
            Tlv::Context { tag, elements } => {
                out.push_str(&format!("[{tag}]\n"));
                for child in elements {
                    child.render_into(out, depth + 1);
                }
            }
        }
    }
}

/// Lowercase hex rendering (no external hex crate dependency).
pub fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

fn children_content(children: &[Tlv]) -> Vec<u8> {
    let mut out = Vec::new();
    for child in children {
        child.write(&mut out);
    }
    out
}

fn write_length(len: usize, out: &mut Vec<u8>) {
    if len < 0x80 {
        out.push(len as u8);
    } else {
        let bytes = len.to_be_bytes();
        let skip = bytes.iter().take_while(|&&b| b == 0).count();
        let significant = &bytes[skip..];
        out.push(0x80 | significant.len() as u8);
        out.extend_from_slice(significant);
    }
}

/// Minimal two's-complement content octets of an INTEGER.
fn integer_content(n: i128) -> Vec<u8> {
    let bytes = n.to_be_bytes();
    let mut start = 0;
    while start < bytes.len() - 1 {
        let redundant = (bytes[start] == 0x00 && bytes[start + 1] & 0x80 == 0)
            || (bytes[start] == 0xff && bytes[start + 1] & 0x80 != 0);
        if !redundant {
            break;
        }
        start += 1;
    }
    bytes[start..].to_vec()
}

fn oid_content(arcs: &[u64]) -> Vec<u8> {
    let mut out = Vec::new();
    if arcs.len() < 2 {
        // A valid OID has at least two arcs; an empty content octet
        // string would be rejected by the parser on the way back in.
        return out;
    }
    write_base128(arcs[0] * 40 + arcs[1], &mut out);
    for &arc in &arcs[2..] {
        write_base128(arc, &mut out);
    }
    out
}

fn write_base128(mut value: u64, out: &mut Vec<u8>) {
    let mut stack = [0u8; 10];
    let mut i = 0;
    loop {
        stack[i] = (value & 0x7f) as u8;
        value >>= 7;
        i += 1;
        if value == 0 {
            break;
        }
    }
    while i > 1 {
        i -= 1;
        out.push(stack[i] | 0x80);
    }
    out.push(stack[0]);
}

fn parse_one(bytes: &[u8]) -> Result<(Tlv, usize), CodecError> {
    if bytes.len() < 2 {
        return Err(CodecError::Structure("truncated TLV header".into()));
    }
    let tag = bytes[0];
    let (content_len, header_len) = parse_length(&bytes[1..])?;
    let total = 1 + header_len + content_len;
    if bytes.len() < total {
        return Err(CodecError::Structure(format!(
            "TLV content truncated: need {content_len} bytes"
        )));
    }
    let content = &bytes[1 + header_len..total];

    let tlv = match tag {
        TAG_BOOLEAN => {
            if content.len() != 1 {
                return Err(CodecError::Structure("BOOLEAN content must be 1 byte".into()));
            }
            Tlv::Boolean(content[0] != 0)
        }
        TAG_INTEGER => Tlv::Integer(parse_integer(content)?),
        TAG_BIT_STRING => {
            let (&unused_bits, rest) = content
                .split_first()
                .ok_or_else(|| CodecError::Structure("empty BIT STRING".into()))?;
            if unused_bits > 7 {
                return Err(CodecError::Structure(format!(
                    "BIT STRING unused bits {unused_bits} > 7"
                )));
            }
            Tlv::BitString {
                unused_bits,
                bytes: rest.to_vec(),
            }
        }
        TAG_OCTET_STRING => Tlv::OctetString(content.to_vec()),
        TAG_NULL => {
            if !content.is_empty() {
                return Err(CodecError::Structure("NULL content must be empty".into()));
            }
            Tlv::Null
        }
        TAG_OID => Tlv::Oid(parse_oid(content)?),
        TAG_UTF8_STRING => Tlv::Utf8String(
            std::str::from_utf8(content)
                .map_err(|e| CodecError::Structure(format!("invalid UTF8String: {e}")))?
                .to_owned(),
        ),
        TAG_PRINTABLE_STRING => Tlv::PrintableString(
            std::str::from_utf8(content)
                .map_err(|e| CodecError::Structure(format!("invalid PrintableString: {e}")))?
                .to_owned(),
        ),
        TAG_UTC_TIME => Tlv::UtcTime(parse_utc_time(content)?),
        TAG_SEQUENCE => Tlv::Sequence(parse_children(content)?),
        TAG_SET => Tlv::Set(parse_children(content)?),
        tag if tag & 0xe0 == TAG_CONTEXT_CONSTRUCTED => Tlv::Context {
            tag: tag & 0x1f,
            elements: parse_children(content)?,
        },
        tag => {
            return Err(CodecError::Structure(format!(
                "unsupported tag 0x{tag:02x}"
            )))
        }
    };
    Ok((tlv, total))
}

fn parse_children(content: &[u8]) -> Result<Vec<Tlv>, CodecError> {
    let mut children = Vec::new();
    let mut rest = content;
    while !rest.is_empty() {
        let (child, consumed) = parse_one(rest)?;
        children.push(child);
        rest = &rest[consumed..];
    }
    Ok(children)
}

/// Returns (content length, length-field length).
fn parse_length(bytes: &[u8]) -> Result<(usize, usize), CodecError> {
    let first = *bytes
        .first()
        .ok_or_else(|| CodecError::Structure("missing length".into()))?;
    if first < 0x80 {
        return Ok((first as usize, 1));
    }
    let count = (first & 0x7f) as usize;
    if count == 0 || count > 8 {
        return Err(CodecError::Structure(format!(
            "unsupported length-of-length {count}"
        )));
    }
    if bytes.len() < 1 + count {
        return Err(CodecError::Structure("truncated long-form length".into()));
    }
    let mut len: usize = 0;
    for &b in &bytes[1..1 + count] {
        len = len
            .checked_mul(256)
            .map(|l| l | b as usize)
            .ok_or_else(|| CodecError::Arithmetic("length exceeds usize".into()))?;
    }
    Ok((len, 1 + count))
}

fn parse_integer(content: &[u8]) -> Result<i128, CodecError> {
    if content.is_empty() {
        return Err(CodecError::Structure("empty INTEGER content".into()));
    }
    if content.len() > 16 {
        return Err(CodecError::Arithmetic(format!(
            "INTEGER of {} bytes exceeds 128-bit range",
            content.len()
        )));
    }
    let negative = content[0] & 0x80 != 0;
    let mut buf = [if negative { 0xff } else { 0x00 }; 16];
    buf[16 - content.len()..].copy_from_slice(content);
    Ok(i128::from_be_bytes(buf))
}

fn parse_oid(content: &[u8]) -> Result<Vec<u64>, CodecError> {
    if content.is_empty() {
        return Err(CodecError::Structure("empty OID content".into()));
    }
    let mut arcs = Vec::new();
    let mut value: u64 = 0;
    for (i, &b) in content.iter().enumerate() {
        value = value
            .checked_mul(128)
            .map(|v| v | (b & 0x7f) as u64)
            .ok_or_else(|| CodecError::Arithmetic("OID arc exceeds 64-bit range".into()))?;
        if b & 0x80 != 0 {
            if i == content.len() - 1 {
                return Err(CodecError::Structure("truncated OID arc".into()));
            }
            continue;
        }
        if arcs.is_empty() {
            // First encoded value folds the first two arcs.
            let first = (value / 40).min(2);
            arcs.push(first);
            arcs.push(value - first * 40);
        } else {
            arcs.push(value);
        }
        value = 0;
    }
    Ok(arcs)
}

fn parse_utc_time(content: &[u8]) -> Result<Timestamp, CodecError> {
    let text = std::str::from_utf8(content)
        .map_err(|_| CodecError::Structure("UTCTime is not ASCII".into()))?;
    if text.len() != 13 || !text.ends_with('Z') {
        return Err(CodecError::Structure(format!(
            "UTCTime must be YYMMDDHHMMSSZ, got {text:?}"
        )));
    }
    let digit = |range: std::ops::Range<usize>| -> Result<u32, CodecError> {
        text[range.clone()]
            .parse::<u32>()
            .map_err(|_| CodecError::Structure(format!("non-digit in UTCTime {text:?}")))
    };
    let yy = digit(0..2)?;
    // RFC 5280 century rule: 00..=49 map to 20xx, 50..=99 to 19xx.
    let year = if yy < 50 { 2000 + yy } else { 1900 + yy } as i32;
    let dt = Utc
        .with_ymd_and_hms(
            year,
            digit(2..4)?,
            digit(4..6)?,
            digit(6..8)?,
            digit(8..10)?,
            digit(10..12)?,
        )
        .single()
        .ok_or_else(|| CodecError::Structure(format!("invalid UTCTime {text:?}")))?;
    Ok(Timestamp::from_utc(dt))
}

fn type_mismatch(expected: &str, found: &Tlv) -> CodecError {
    CodecError::Structure(format!("expected {expected}, found {}", found.kind()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip(tlv: Tlv) -> Vec<u8> {
        let der = tlv.to_der();
        assert_eq!(Tlv::from_der(&der).unwrap(), tlv);
        der
    }

    #[test]
    fn test_primitive_roundtrips() {
        roundtrip(Tlv::Boolean(true));
        roundtrip(Tlv::Boolean(false));
        roundtrip(Tlv::Null);
        roundtrip(Tlv::OctetString(vec![1, 2, 3]));
        roundtrip(Tlv::Utf8String("zügig".into()));
        roundtrip(Tlv::PrintableString("Root-CA".into()));
        roundtrip(Tlv::BitString {
            unused_bits: 0,
            bytes: vec![0x04, 0x7f],
        });
    }

    #[test]
    fn test_integer_encodings() {
        assert_eq!(roundtrip(Tlv::Integer(0)), vec![0x02, 0x01, 0x00]);
        assert_eq!(roundtrip(Tlv::Integer(127)), vec![0x02, 0x01, 0x7f]);
        // 128 needs a leading zero octet to stay non-negative.
        assert_eq!(roundtrip(Tlv::Integer(128)), vec![0x02, 0x02, 0x00, 0x80]);
        assert_eq!(roundtrip(Tlv::Integer(-1)), vec![0x02, 0x01, 0xff]);
        assert_eq!(roundtrip(Tlv::Integer(-129)), vec![0x02, 0x02, 0xff, 0x7f]);
        roundtrip(Tlv::Integer(1_616_161_616));
    }

    #[test]
    fn test_oid_encoding() {
        // ecdsa-with-SHA256
        let der = roundtrip(Tlv::Oid(vec![1, 2, 840, 10045, 4, 3, 2]));
        assert_eq!(
            der,
            vec![0x06, 0x08, 0x2a, 0x86, 0x48, 0xce, 0x3d, 0x04, 0x03, 0x02]
        );
        // commonName
        assert_eq!(
            roundtrip(Tlv::Oid(vec![2, 5, 4, 3])),
            vec![0x06, 0x03, 0x55, 0x04, 0x03]
        );
    }

    #[test]
    fn test_utc_time_roundtrip() {
        let ts = Timestamp::parse("2021-03-28T18:47:59Z").unwrap();
        let der = roundtrip(Tlv::UtcTime(ts));
        assert_eq!(&der[2..], b"210328184759Z");
    }

    #[test]
    fn test_utc_time_century_rule() {
        let der = Tlv::UtcTime(Timestamp::parse("1999-12-31T23:59:59Z").unwrap()).to_der();
        let back = Tlv::from_der(&der).unwrap();
        assert_eq!(
            back.as_utc_time().unwrap().to_iso8601(),
            "1999-12-31T23:59:59Z"
        );
    }

    #[test]
    fn test_nested_structure() {
        let tree = Tlv::Sequence(vec![
            Tlv::Context {
                tag: 0,
                elements: vec![Tlv::Integer(2)],
            },
            Tlv::Integer(42),
            Tlv::Set(vec![Tlv::Sequence(vec![
                Tlv::Oid(vec![2, 5, 4, 3]),
                Tlv::PrintableString("Root-CA".into()),
            ])]),
        ]);
        roundtrip(tree);
    }

    #[test]
    fn test_long_form_length() {
        let tlv = Tlv::OctetString(vec![0xab; 300]);
        let der = roundtrip(tlv);
        assert_eq!(&der[..4], &[0x04, 0x82, 0x01, 0x2c]);
    }

    #[test]
    fn test_trailing_bytes_rejected() {
        let mut der = Tlv::Null.to_der();
        der.push(0x00);
        assert!(Tlv::from_der(&der).is_err());
    }

    #[test]
    fn test_from_der_all() {
        let mut bytes = Tlv::Integer(1).to_der();
        bytes.extend(Tlv::Integer(2).to_der());
        let trees = Tlv::from_der_all(&bytes).unwrap();
        assert_eq!(trees.len(), 2);
    }

    #[test]
    fn test_too_few_elements_is_structure_error() {
        let seq = Tlv::Sequence(vec![Tlv::Integer(1)]);
        assert!(matches!(
            seq.element(3).unwrap_err(),
            CodecError::Structure(_)
        ));
    }

    #[test]
    fn test_type_mismatch() {
        let tlv = Tlv::Integer(5);
        assert!(matches!(
            tlv.as_sequence().unwrap_err(),
            CodecError::Structure(_)
        ));
    }

    #[test]
    fn test_oversize_integer_is_arithmetic_error() {
        // 17 content bytes cannot fit a 128-bit target.
        let mut der = vec![0x02, 0x11];
        der.extend(std::iter::repeat(0x7f).take(17));
        assert!(matches!(
            Tlv::from_der(&der).unwrap_err(),
            CodecError::Arithmetic(_)
        ));
    }

    #[test]
    fn test_oversize_oid_arc_is_arithmetic_error() {
        // Ten continuation septets plus a final one encode more than 64 bits.
        let mut content = vec![0x55]; // 2.5
        content.extend(std::iter::repeat(0xff).take(10));
        content.push(0x7f);
        let mut der = vec![0x06, content.len() as u8];
        der.extend(content);
        assert!(matches!(
            Tlv::from_der(&der).unwrap_err(),
            CodecError::Arithmetic(_)
        ));
    }

    #[test]
    fn test_dangling_oid_arc_rejected() {
        // Final content byte still has its continuation bit set.
        let der = vec![0x06, 0x02, 0x55, 0x81];
        assert!(matches!(
            Tlv::from_der(&der).unwrap_err(),
            CodecError::Structure(_)
        ));
    }

    #[test]
    fn test_render_tree_indents() {
        let tree = Tlv::Sequence(vec![Tlv::Integer(2), Tlv::Sequence(vec![Tlv::Null])]);
        let text = tree.render_tree();
        assert!(text.contains("SEQUENCE\n|  INTEGER 2\n"));
        assert!(text.contains("|  |  NULL\n"));
    }
}
