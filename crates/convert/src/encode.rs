//! Fixed binary encodings used when a primitive is coerced to `bytes`.
//!
//! Numerics are big-endian and fixed width. Decimals carry their scale
//! as a 4-byte big-endian integer followed by the unscaled value in
//! minimal big-endian two's complement.

use rust_decimal::Decimal;

pub fn bool_bytes(b: bool) -> Vec<u8> {
    vec![if b { 0xff } else { 0x00 }]
}

pub fn i16_bytes(v: i16) -> Vec<u8> {
    v.to_be_bytes().to_vec()
}

pub fn i32_bytes(v: i32) -> Vec<u8> {
    v.to_be_bytes().to_vec()
}

pub fn i64_bytes(v: i64) -> Vec<u8> {
    v.to_be_bytes().to_vec()
}

/// IEEE-754 bit pattern, big-endian.
pub fn f32_bytes(v: f32) -> Vec<u8> {
    v.to_bits().to_be_bytes().to_vec()
}

/// IEEE-754 bit pattern, big-endian.
pub fn f64_bytes(v: f64) -> Vec<u8> {
    v.to_bits().to_be_bytes().to_vec()
}

pub fn text_bytes(v: &str) -> Vec<u8> {
    v.as_bytes().to_vec()
}

pub fn decimal_bytes(v: &Decimal) -> Vec<u8> {
    let unscaled = minimal_twos_complement(v.mantissa());
    let mut out = Vec::with_capacity(4 + unscaled.len());
    // rust_decimal scales are at most 28.
    out.extend_from_slice(&(v.scale() as i32).to_be_bytes());
    out.extend_from_slice(&unscaled);
    out
}

/// Shortest big-endian two's complement form of `v`; at least one byte.
fn minimal_twos_complement(v: i128) -> Vec<u8> {
    let bytes = v.to_be_bytes();
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
