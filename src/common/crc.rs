// src/common/crc.rs

use crc::{Algorithm, Crc};

/// CRC-7 protecting each 24-bit ENS210 reading (T_VAL / H_VAL).
///
/// The sensor computes the CRC over the 17 low bits (16 data bits plus the
/// validity bit) with polynomial x^7 + x^3 + 1 and initial vector 0x7F placed
/// *below* the data, i.e. `crc = (data·x^7 + 0x7F) mod P`. With leading zeros
/// being neutral for a zero init, that is a plain MSB-first CRC-7 over the three
/// big-endian bytes of the 17-bit value followed by a final XOR of 0x7F.
/// Polynomial: 0x09 (x^7 implied)
/// Initial Value: 0x00
/// Input Reflected: false
/// Output Reflected: false
/// Final XOR: 0x7F
/// Check Value: 0x0A (for "123456789")
pub const ENS210_CRC7: Algorithm<u8> = Algorithm {
    width: 7,
    poly: 0x09,
    init: 0x00,
    refin: false,
    refout: false,
    xorout: 0x7F,
    check: 0x0A,
    residue: 0x38,
};

const CRC_COMPUTER: Crc<u8> = Crc::<u8>::new(&ENS210_CRC7);

/// Mask of the bits covered by the CRC: 16 data bits + the validity bit.
pub const CRC_DATA_MASK: u32 = 0x1_FFFF;
/// Position of the CRC inside a 24-bit reading.
pub const CRC_SHIFT: u32 = 17;

/// Calculates the ENS210 CRC-7 of the 17 data bits of `value`.
///
/// Bits above bit 16 are ignored, so a complete 24-bit reading can be passed.
#[inline]
pub fn calculate_crc7(value: u32) -> u8 {
    let data = value & CRC_DATA_MASK;
    let bytes = [(data >> 16) as u8, (data >> 8) as u8, data as u8];
    CRC_COMPUTER.checksum(&bytes)
}

/// Returns the CRC carried in bits 23..17 of a 24-bit reading.
#[inline]
pub fn embedded_crc7(field: u32) -> u8 {
    ((field >> CRC_SHIFT) & 0x7F) as u8
}

/// Verifies the CRC of a 24-bit T_VAL or H_VAL reading.
pub fn verify_field_crc(field: u32) -> bool {
    calculate_crc7(field) == embedded_crc7(field)
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;

    // Bit-serial reference, as laid out in the ENS210 datasheet.
    fn reference_crc7(value: u32) -> u8 {
        const WIDTH: u32 = 7;
        const POLY: u32 = 0x89;
        const IVEC: u32 = 0x7F;
        const DATA_WIDTH: u32 = 17;
        let data_mask = (1u32 << DATA_WIDTH) - 1;
        let mut pol = POLY << (DATA_WIDTH - WIDTH - 1);
        let mut bit = 1u32 << (DATA_WIDTH - 1);
        let mut val = (value & data_mask) << WIDTH;
        bit <<= WIDTH;
        pol <<= WIDTH;
        val |= IVEC;
        while bit & (data_mask << WIDTH) != 0 {
            if bit & val != 0 {
                val ^= pol;
            }
            bit >>= 1;
            pol >>= 1;
        }
        val as u8
    }

    #[test]
    fn test_check_value() {
        assert_eq!(CRC_COMPUTER.checksum(b"123456789"), 0x0A);
    }

    #[test]
    fn test_known_readings() {
        assert_eq!(calculate_crc7(0x01_6400), 0x63);
        assert_eq!(calculate_crc7(0x01_4000), 0x3D);
        assert_eq!(calculate_crc7(0x01_4A5C), 0x62);
        assert_eq!(calculate_crc7(0x01_2E80), 0x01);
    }

    #[test]
    fn test_matches_datasheet_reference() {
        let mut value = 0u32;
        while value <= CRC_DATA_MASK {
            assert_eq!(calculate_crc7(value), reference_crc7(value), "value {:#07x}", value);
            value += 97;
        }
    }

    #[test]
    fn test_upper_bits_ignored() {
        assert_eq!(calculate_crc7(0xC7_6400), calculate_crc7(0x01_6400));
    }

    #[test]
    fn test_verify_field_crc() {
        assert!(verify_field_crc(0xC7_6400));
        assert!(verify_field_crc(0x7B_4000));
        assert!(verify_field_crc(0x03_2E80));
        // Zeroed CRC bits
        assert!(!verify_field_crc(0x01_6400));
        // Single data bit flipped
        assert!(!verify_field_crc(0xC7_6401));
        assert_eq!(embedded_crc7(0xC7_6400), 0x63);
    }
}
