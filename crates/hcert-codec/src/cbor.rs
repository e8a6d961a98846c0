//! # Compact Binary Items
//!
//! A small item model for the RFC 8949 subset this system speaks:
//! unsigned/negative integers (major types 0/1), byte strings (2),
//! UTF-8 text (3), arrays (4), and maps (5). Floats, tags, and
//! indefinite lengths are intentionally not supported and decode to a
//! structure error.
//!
//! Encoding always chooses the smallest length representation, so the
//! wire form of a value tree is canonical: `decode(encode(v)) == v` and
//! `encode(decode(b)) == b` for every accepted input.
//!
//! Several artifacts in this system are *sequences* of top-level items
//! (a signed proof is three concatenated byte strings, a compact
//! certificate message two items), so the decoder exposes
//! [`decode_all`] rather than a single-item entry point.

use hcert_core::CodecError;

/// A decoded item tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// Major type 0 (non-negative) or 1 (negative) integer.
    Integer(i128),
    /// Major type 2 byte string.
    Bytes(Vec<u8>),
    /// Major type 3 UTF-8 text string.
    Text(String),
    /// Major type 4 array.
    Array(Vec<Value>),
    /// Major type 5 map; entry order is preserved as written.
    Map(Vec<(Value, Value)>),
}

impl Value {
    /// Human-readable kind name for error messages.
    fn kind(&self) -> &'static str {
        match self {
            Value::Integer(_) => "integer",
            Value::Bytes(_) => "byte string",
            Value::Text(_) => "text string",
            Value::Array(_) => "array",
            Value::Map(_) => "map",
        }
    }

    /// Serialize this item, smallest-width heads throughout.
    pub fn to_bytes(&self) -> Result<Vec<u8>, CodecError> {
        let mut out = Vec::new();
        self.write(&mut out)?;
        Ok(out)
    }

    fn write(&self, out: &mut Vec<u8>) -> Result<(), CodecError> {
        match self {
            Value::Integer(n) => write_integer(*n, out),
            Value::Bytes(bytes) => {
                write_head(2, bytes.len() as u64, out);
                out.extend_from_slice(bytes);
                Ok(())
            }
            Value::Text(text) => {
                write_head(3, text.len() as u64, out);
                out.extend_from_slice(text.as_bytes());
                Ok(())
            }
            Value::Array(items) => {
                write_head(4, items.len() as u64, out);
                for item in items {
                    item.write(out)?;
                }
                Ok(())
            }
            Value::Map(entries) => {
                write_head(5, entries.len() as u64, out);
                for (key, value) in entries {
                    key.write(out)?;
                    value.write(out)?;
                }
                Ok(())
            }
        }
    }

    /// Parse exactly one item; trailing bytes are a structure error.
    pub fn from_bytes(bytes: &[u8]) -> Result<Value, CodecError> {
        let mut items = decode_exactly(bytes, 1)?;
        items.pop().ok_or_else(|| {
            CodecError::Structure("empty input where one item was required".into())
        })
    }

    /// The integer value, or a structure error for any other kind.
    pub fn as_integer(&self) -> Result<i128, CodecError> {
        match self {
            Value::Integer(n) => Ok(*n),
            other => Err(type_mismatch("integer", other)),
        }
    }

    /// The integer value narrowed to `i64`.
    ///
    /// Overflow of the target width is an arithmetic error, matching the
    /// behavior of exact narrowing in the decode path.
    pub fn as_i64(&self) -> Result<i64, CodecError> {
        let n = self.as_integer()?;
        i64::try_from(n)
            .map_err(|_| CodecError::Arithmetic(format!("integer {n} exceeds 64-bit range")))
    }

    /// The byte-string content, or a structure error.
    pub fn as_bytes(&self) -> Result<&[u8], CodecError> {
        match self {
            Value::Bytes(bytes) => Ok(bytes),
            other => Err(type_mismatch("byte string", other)),
        }
    }

    /// The text content, or a structure error.
    pub fn as_text(&self) -> Result<&str, CodecError> {
        match self {
            Value::Text(text) => Ok(text),
            other => Err(type_mismatch("text string", other)),
        }
    }

    /// The array elements, or a structure error.
    pub fn as_array(&self) -> Result<&[Value], CodecError> {
        match self {
            Value::Array(items) => Ok(items),
            other => Err(type_mismatch("array", other)),
        }
    }

    /// The map entries, or a structure error.
    pub fn as_map(&self) -> Result<&[(Value, Value)], CodecError> {
        match self {
            Value::Map(entries) => Ok(entries),
            other => Err(type_mismatch("map", other)),
        }
    }
}

fn type_mismatch(expected: &str, found: &Value) -> CodecError {
    CodecError::Structure(format!("expected {expected}, found {}", found.kind()))
}

/// Serialize a slice of top-level items back-to-back.
pub fn encode_all(items: &[Value]) -> Result<Vec<u8>, CodecError> {
    let mut out = Vec::new();
    for item in items {
        item.write(&mut out)?;
    }
    Ok(out)
}

/// Decode every top-level item in `bytes`.
///
/// Trailing garbage that does not form a complete item is a structure
/// error; an empty input decodes to an empty list.
pub fn decode_all(bytes: &[u8]) -> Result<Vec<Value>, CodecError> {
    let mut reader = Reader { buf: bytes, pos: 0 };
    let mut items = Vec::new();
    while !reader.at_end() {
        items.push(reader.read_value()?);
    }
    Ok(items)
}

/// Decode an input that must contain exactly `n` top-level items.
pub fn decode_exactly(bytes: &[u8], n: usize) -> Result<Vec<Value>, CodecError> {
    let items = decode_all(bytes)?;
    if items.len() != n {
        return Err(CodecError::Structure(format!(
            "expected {n} items, found {}",
            items.len()
        )));
    }
    Ok(items)
}

fn write_integer(n: i128, out: &mut Vec<u8>) -> Result<(), CodecError> {
    if n >= 0 {
        let magnitude = u64::try_from(n)
            .map_err(|_| CodecError::Arithmetic(format!("integer {n} exceeds encodable range")))?;
        write_head(0, magnitude, out);
    } else {
        let magnitude = u64::try_from(-1 - n)
            .map_err(|_| CodecError::Arithmetic(format!("integer {n} exceeds encodable range")))?;
        write_head(1, magnitude, out);
    }
    Ok(())
}

/// Write a major-type head with the smallest argument width.
fn write_head(major: u8, argument: u64, out: &mut Vec<u8>) {
    let major = major << 5;
    if argument < 24 {
        out.push(major | argument as u8);
    } else if argument <= u8::MAX as u64 {
        out.push(major | 24);
        out.push(argument as u8);
    } else if argument <= u16::MAX as u64 {
        out.push(major | 25);
        out.extend_from_slice(&(argument as u16).to_be_bytes());
    } else if argument <= u32::MAX as u64 {
        out.push(major | 26);
        out.extend_from_slice(&(argument as u32).to_be_bytes());
    } else {
        out.push(major | 27);
        out.extend_from_slice(&argument.to_be_bytes());
    }
}

struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn at_end(&self) -> bool {
        self.pos >= self.buf.len()
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], CodecError> {
        let end = self
            .pos
            .checked_add(n)
            .filter(|&end| end <= self.buf.len())
            .ok_or_else(|| CodecError::Structure("unexpected end of input".into()))?;
        let slice = &self.buf[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    fn take_array<const N: usize>(&mut self) -> Result<[u8; N], CodecError> {
        self.take(N)?
            .try_into()
            .map_err(|_| CodecError::Structure("unexpected end of input".into()))
    }

    fn read_head(&mut self) -> Result<(u8, u64), CodecError> {
        let initial = self.take(1)?[0];
        let major = initial >> 5;
        let info = initial & 0x1f;
        let argument = match info {
            0..=23 => info as u64,
            24 => self.take(1)?[0] as u64,
            25 => u16::from_be_bytes(self.take_array()?) as u64,
            26 => u32::from_be_bytes(self.take_array()?) as u64,
            27 => u64::from_be_bytes(self.take_array()?),
            31 => {
                return Err(CodecError::Structure(
                    "indefinite-length items are not supported".into(),
                ))
            }
            _ => {
                return Err(CodecError::Structure(format!(
                    "reserved additional information {info}"
                )))
            }
        };
        Ok((major, argument))
    }

    fn read_value(&mut self) -> Result<Value, CodecError> {
        let (major, argument) = self.read_head()?;
        match major {
            0 => Ok(Value::Integer(argument as i128)),
            1 => Ok(Value::Integer(-1 - argument as i128)),
            2 => Ok(Value::Bytes(self.take(argument as usize)?.to_vec())),
            3 => {
                let bytes = self.take(argument as usize)?;
                let text = std::str::from_utf8(bytes)
                    .map_err(|e| CodecError::Structure(format!("invalid UTF-8 text: {e}")))?;
                Ok(Value::Text(text.to_owned()))
            }
            4 => {
                let mut items = Vec::with_capacity(argument.min(1024) as usize);
                for _ in 0..argument {
                    items.push(self.read_value()?);
                }
                Ok(Value::Array(items))
            }
            5 => {
                let mut entries = Vec::with_capacity(argument.min(1024) as usize);
                for _ in 0..argument {
                    let key = self.read_value()?;
                    let value = self.read_value()?;
                    entries.push((key, value));
                }
                Ok(Value::Map(entries))
            }
            major => Err(CodecError::Structure(format!(
                "unsupported major type {major}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn roundtrip(value: Value) -> Vec<u8> {
        let bytes = value.to_bytes().unwrap();
        let decoded = decode_exactly(&bytes, 1).unwrap();
        assert_eq!(decoded[0], value);
        bytes
    }

    #[test]
    fn test_small_integers_are_one_byte() {
        assert_eq!(roundtrip(Value::Integer(0)), vec![0x00]);
        assert_eq!(roundtrip(Value::Integer(23)), vec![0x17]);
        assert_eq!(roundtrip(Value::Integer(-1)), vec![0x20]);
        assert_eq!(roundtrip(Value::Integer(-24)), vec![0x37]);
    }

    #[test]
    fn test_integer_width_boundaries() {
        assert_eq!(roundtrip(Value::Integer(24)), vec![0x18, 24]);
        assert_eq!(roundtrip(Value::Integer(-25)), vec![0x38, 24]);
        assert_eq!(roundtrip(Value::Integer(255)), vec![0x18, 255]);
        assert_eq!(roundtrip(Value::Integer(256)), vec![0x19, 0x01, 0x00]);
        assert_eq!(
            roundtrip(Value::Integer(u32::MAX as i128 + 1)),
            vec![0x1b, 0, 0, 0, 1, 0, 0, 0, 0]
        );
    }

    #[test]
    fn test_text_and_bytes() {
        assert_eq!(
            roundtrip(Value::Text("IETF".into())),
            vec![0x64, b'I', b'E', b'T', b'F']
        );
        assert_eq!(
            roundtrip(Value::Bytes(vec![1, 2, 3, 4])),
            vec![0x44, 1, 2, 3, 4]
        );
    }

    #[test]
    fn test_nested_array_and_map() {
        roundtrip(Value::Array(vec![
            Value::Integer(1),
            Value::Array(vec![Value::Integer(2), Value::Integer(3)]),
        ]));
        roundtrip(Value::Map(vec![
            (Value::Integer(0), Value::Integer(-19)),
            (Value::Integer(-1), Value::Integer(4)),
        ]));
    }

    #[test]
    fn test_sequential_top_level_items() {
        let mut bytes = Value::Integer(-25).to_bytes().unwrap();
        bytes.extend(Value::Bytes(vec![0xAA; 33]).to_bytes().unwrap());
        let items = decode_all(&bytes).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].as_i64().unwrap(), -25);
        assert_eq!(items[1].as_bytes().unwrap().len(), 33);
    }

    #[test]
    fn test_decode_exactly_count_mismatch() {
        let bytes = Value::Integer(1).to_bytes().unwrap();
        assert!(decode_exactly(&bytes, 2).is_err());
    }

    #[test]
    fn test_truncated_input() {
        // Byte string head claims 4 bytes, only 2 present.
        assert!(decode_all(&[0x44, 1, 2]).is_err());
    }

    #[test]
    fn test_truncated_head_argument() {
        // u16 head with one argument byte, u64 head with three.
        assert!(matches!(
            decode_all(&[0x19, 0x01]).unwrap_err(),
            CodecError::Structure(_)
        ));
        assert!(matches!(
            decode_all(&[0x1b, 0x00, 0x00, 0x00]).unwrap_err(),
            CodecError::Structure(_)
        ));
    }

    #[test]
    fn test_unsupported_items_rejected() {
        // Tag (major 6), float (major 7), indefinite array.
        assert!(decode_all(&[0xc0, 0x00]).is_err());
        assert!(decode_all(&[0xf9, 0x3c, 0x00]).is_err());
        assert!(decode_all(&[0x9f, 0x00, 0xff]).is_err());
    }

    #[test]
    fn test_type_mismatch_is_structure_error() {
        let value = Value::Text("x".into());
        assert!(matches!(
            value.as_integer().unwrap_err(),
            CodecError::Structure(_)
        ));
    }

    #[test]
    fn test_width_overflow_is_arithmetic_error() {
        let value = Value::Integer(i64::MAX as i128 + 1);
        assert!(matches!(
            value.as_i64().unwrap_err(),
            CodecError::Arithmetic(_)
        ));
    }

    #[test]
    fn test_invalid_utf8_rejected() {
        assert!(decode_all(&[0x62, 0xff, 0xfe]).is_err());
    }

    proptest! {
        #[test]
        fn prop_integer_roundtrip(n in -(u64::MAX as i128 + 1)..=(u64::MAX as i128)) {
            let bytes = Value::Integer(n).to_bytes().unwrap();
            let items = decode_all(&bytes).unwrap();
            prop_assert_eq!(&items[0], &Value::Integer(n));
            // Re-encoding reproduces the original bytes.
            prop_assert_eq!(items[0].to_bytes().unwrap(), bytes);
        }

        #[test]
        fn prop_bytes_roundtrip(data in proptest::collection::vec(any::<u8>(), 0..600)) {
            let bytes = Value::Bytes(data.clone()).to_bytes().unwrap();
            let items = decode_all(&bytes).unwrap();
            prop_assert_eq!(&items[0], &Value::Bytes(data));
        }
    }
}
