//! # Base45 Transport Alphabet
//!
//! RFC 9285 text mapping used before proof payloads are rasterized into a
//! 2D barcode. Pairs of bytes become three characters of a 45-symbol
//! alphabet chosen to fit the barcode's alphanumeric mode; a trailing lone
//! byte becomes two characters.

use hcert_core::CodecError;

const ALPHABET: &[u8; 45] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ $%*+-./:";

const BASE: u32 = 45;

/// Encode `bytes` into Base45 text.
pub fn encode(bytes: &[u8]) -> String {
    let mut out = String::with_capacity((bytes.len() / 2) * 3 + 2);
    let mut chunks = bytes.chunks_exact(2);
    for pair in &mut chunks {
        // Two bytes form a big-endian value, emitted little-endian in
        // base 45: n = c + d*45 + e*45^2.
        let mut n = u32::from(pair[0]) << 8 | u32::from(pair[1]);
        for _ in 0..3 {
            out.push(ALPHABET[(n % BASE) as usize] as char);
            n /= BASE;
        }
    }
    if let [last] = chunks.remainder() {
        let n = u32::from(*last);
        out.push(ALPHABET[(n % BASE) as usize] as char);
        out.push(ALPHABET[(n / BASE) as usize] as char);
    }
    out
}

/// Decode Base45 text back into bytes.
///
/// Rejects characters outside the alphabet, dangling single characters,
/// and groups whose value exceeds the two-byte (or one-byte) range.
pub fn decode(text: &str) -> Result<Vec<u8>, CodecError> {
    let digits: Vec<u32> = text
        .chars()
        .map(|c| {
            ALPHABET
                .iter()
                .position(|&a| a as char == c)
                .map(|i| i as u32)
                .ok_or_else(|| CodecError::Format(format!("invalid Base45 character {c:?}")))
        })
        .collect::<Result<_, _>>()?;

    if digits.len() % 3 == 1 {
        return Err(CodecError::Format(format!(
            "Base45 text length {} leaves a dangling character",
            digits.len()
        )));
    }

    let mut out = Vec::with_capacity((digits.len() / 3) * 2 + 1);
    let mut groups = digits.chunks_exact(3);
    for group in &mut groups {
        let n = group[0] + group[1] * BASE + group[2] * BASE * BASE;
        if n > 0xffff {
            return Err(CodecError::Format(format!(
                "Base45 triplet value {n} exceeds two-byte range"
            )));
        }
        out.push((n >> 8) as u8);
        out.push((n & 0xff) as u8);
    }
    if let [c, d] = groups.remainder() {
        let n = c + d * BASE;
        if n > 0xff {
            return Err(CodecError::Format(format!(
                "Base45 pair value {n} exceeds one-byte range"
            )));
        }
        out.push(n as u8);
    }
    Ok(out)
}
