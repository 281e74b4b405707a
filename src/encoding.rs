//! Payload packing for each segment mode.
//!
//! These functions only write the data part of a segment. The packing ratios
//! (10 bits per 3 digits, 11 bits per 2 alphanumeric codes, 8 bits per byte)
//! are fixed by ISO/IEC 18004.

use crate::bitstream::BitStream;

/// Packs decimal digits (each 0 to 9) three at a time into 10 bits. A
/// trailing pair takes 7 bits and a trailing single digit 4.
pub(crate) fn encode_numeric<B>(digits: &[u8], bits: &mut BitStream<B>)
where
    B: AsRef<[u8]> + AsMut<[u8]>,
{
    let mut triplets = digits.chunks_exact(3);
    for triplet in triplets.by_ref() {
        let v = 100 * u16::from(triplet[0]) + 10 * u16::from(triplet[1]) + u16::from(triplet[2]);
        bits.write8((v >> 2) as u8);
        bits.write2(v as u8);
    }

    match *triplets.remainder() {
        [d0] => bits.write4(d0),
        [d0, d1] => {
            let v = 10 * d0 + d1;
            bits.write4(v >> 3);
            bits.write2(v >> 1);
            bits.write1(v);
        }
        _ => {}
    }
}

/// Packs alphanumeric codes (each 0 to 44) two at a time into 11 bits. A
/// trailing code takes 6 bits.
pub(crate) fn encode_alphanumeric<B>(codes: &[u8], bits: &mut BitStream<B>)
where
    B: AsRef<[u8]> + AsMut<[u8]>,
{
    let mut pairs = codes.chunks_exact(2);
    for pair in pairs.by_ref() {
        let v = 45 * u16::from(pair[0]) + u16::from(pair[1]);
        bits.write8((v >> 3) as u8);
        bits.write2((v >> 1) as u8);
        bits.write1(v as u8);
    }

    if let [c] = *pairs.remainder() {
        bits.write4(c >> 2);
        bits.write2(c);
    }
}

/// Writes each byte as-is.
pub(crate) fn encode_bytes<B>(data: &[u8], bits: &mut BitStream<B>)
where
    B: AsRef<[u8]> + AsMut<[u8]>,
{
    for &byte in data {
        bits.write8(byte);
    }
}
