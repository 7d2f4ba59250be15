// src/common/types.rs

use core::fmt;

use arrayvec::ArrayString;

use super::crc;
use super::error::DecodeError;

// --- Measurement payload ---

/// Hex digits in a measurement payload: T_VAL[3] + H_VAL[3].
pub const PAYLOAD_HEX_LEN: usize = 12;

/// Validity bit inside a 24-bit T_VAL/H_VAL reading.
pub const VALID_BIT: u32 = 1 << 16;

/// Whether the decoder verifies the CRC-7 embedded in each reading.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum CrcCheck {
    /// Accept every reading regardless of its CRC bits.
    #[default]
    Skip,
    /// Reject readings whose CRC-7 does not match (`DecodeError::Crc`).
    Verify,
}

/// One decoded ENS210 sample.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Measurement {
    /// Raw 24-bit T_VAL (CRC | valid bit | 16 data bits).
    pub t_raw: u32,
    /// Raw 24-bit H_VAL.
    pub h_raw: u32,
    /// Temperature in degrees Celsius.
    pub temperature_c: f64,
    /// Relative humidity in percent.
    pub humidity_rh: f64,
    /// Both validity bits set. Always true for a value returned by [`decode`].
    pub valid: bool,
}

impl Measurement {
    /// Converts the low 16 bits of a T_VAL reading (1/64 K) to Celsius.
    #[inline]
    pub fn celsius(t_raw: u32) -> f64 {
        (t_raw & 0xFFFF) as f64 / 64.0 - 273.15
    }

    /// Converts the low 16 bits of an H_VAL reading (1/512 %RH) to percent.
    #[inline]
    pub fn relative_humidity(h_raw: u32) -> f64 {
        (h_raw & 0xFFFF) as f64 / 512.0
    }
}

impl fmt::Display for Measurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1} \u{00B0}C {:.0} %RH", self.temperature_c, self.humidity_rh)
    }
}

/// Returns true if the validity bit of a reading is set.
#[inline]
pub const fn valid_ok(field: u32) -> bool {
    field & VALID_BIT != 0
}

/// Returns true if the reading passes the configured CRC policy.
#[inline]
pub fn crc_ok(field: u32, check: CrcCheck) -> bool {
    match check {
        CrcCheck::Skip => true,
        CrcCheck::Verify => crc::verify_field_crc(field),
    }
}

/// Splits a 12-hex-digit payload into the little-endian T and H fields.
pub fn split_payload(payload: &str) -> Result<(u32, u32), DecodeError> {
    if payload.len() != PAYLOAD_HEX_LEN || !payload.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(DecodeError::Malformed);
    }
    let mut bytes = [0u8; PAYLOAD_HEX_LEN / 2];
    for (i, byte) in bytes.iter_mut().enumerate() {
        *byte = u8::from_str_radix(&payload[2 * i..2 * i + 2], 16)
            .map_err(|_| DecodeError::Malformed)?;
    }
    let field = |b: &[u8]| (u32::from(b[2]) << 16) | (u32::from(b[1]) << 8) | u32::from(b[0]);
    Ok((field(&bytes[0..3]), field(&bytes[3..6])))
}

/// Decodes a measurement payload as returned by `w4330r4306p`.
///
/// # Arguments
///
/// * `payload`: exactly 12 hex digits, bytes `[T0,T1,T2,H0,H1,H2]`.
/// * `check`: whether the CRC-7 of each field is verified.
///
/// # Returns
///
/// * `Ok(Measurement)` if both fields pass the CRC policy and carry the validity bit.
/// * `Err(DecodeError::Crc)` if either CRC fails (checked before validity).
/// * `Err(DecodeError::Invalid)` if either validity bit is clear.
/// * `Err(DecodeError::Malformed)` if the payload is not 12 hex digits.
pub fn decode(payload: &str, check: CrcCheck) -> Result<Measurement, DecodeError> {
    let (t_raw, h_raw) = split_payload(payload)?;

    if !crc_ok(t_raw, check) || !crc_ok(h_raw, check) {
        return Err(DecodeError::Crc);
    }
    if !valid_ok(t_raw) || !valid_ok(h_raw) {
        return Err(DecodeError::Invalid);
    }

    Ok(Measurement {
        t_raw,
        h_raw,
        temperature_c: Measurement::celsius(t_raw),
        humidity_rh: Measurement::relative_humidity(h_raw),
        valid: true,
    })
}

// --- Bridge firmware ---

/// Firmware tag reported by the bridge, e.g. `v3`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct FirmwareVersion(ArrayString<4>);

impl FirmwareVersion {
    /// Wraps a tag already validated by the response matcher.
    pub fn new(tag: &str) -> Option<Self> {
        ArrayString::from(tag).ok().map(FirmwareVersion)
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for FirmwareVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
