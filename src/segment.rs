//! Mode-tagged QR data segments.
//!
//! A [`Segment`] stores its payload already normalised for its mode: one
//! element per decimal digit in numeric mode, one alphanumeric code per
//! character in alphanumeric mode, raw UTF-8 bytes in byte mode. Encoding
//! writes the 4-bit mode indicator, the character count field and then the
//! packed payload into a [`BitStream`].

use std::fmt;

use crate::bitstream::BitStream;
use crate::codes;
use crate::digits;
use crate::encoding;
use crate::error::SegmentError;
use crate::qrcode::Version;

/// Character substituted for each run of ill-formed UTF-8 in byte segments.
pub const PLACEHOLDER: char = '?';

/// Width of the mode indicator that starts every segment.
pub const MODE_INDICATOR_BITS: usize = 4;

/// Encoding mode of a segment.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum SegmentMode {
    /// Decimal digits, 10 bits per 3 digits.
    Numeric,
    /// The 45-symbol alphabet, 11 bits per 2 characters.
    Alphanumeric,
    /// Arbitrary bytes, 8 bits each.
    Byte,
}

impl SegmentMode {
    /// Returns the 4-bit mode indicator.
    pub const fn mode_bits(self) -> u8 {
        use SegmentMode::*;
        match self {
            Numeric => 0x1,
            Alphanumeric => 0x2,
            Byte => 0x4,
        }
    }

    /// Returns the width of the character count field at `version`.
    ///
    /// Versions 1 to 9, 10 to 26 and 27 to 40 each use their own width.
    pub fn length_bits(self, version: Version) -> u8 {
        use SegmentMode::*;
        let band = usize::from((version.value() + 7) / 17);
        (match self {
            Numeric => [10, 12, 14],
            Alphanumeric => [9, 11, 13],
            Byte => [8, 16, 16],
        })[band]
    }
}

impl fmt::Display for SegmentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SegmentMode::Numeric => "numeric",
            SegmentMode::Alphanumeric => "alphanumeric",
            SegmentMode::Byte => "byte",
        })
    }
}

/// A segment of data destined for a QR code, immutable once built.
///
/// # Example
///
/// ```rust
/// use qrbits::bitstream::BitStream;
/// use qrbits::qrcode::Version;
/// use qrbits::segment::Segment;
///
/// let segment = Segment::from_alphanumeric("HELLO WORLD").unwrap();
/// let version = Version::new(1);
///
/// let mut bits = BitStream::with_capacity(segment.total_bits(version));
/// segment.encode(version, &mut bits);
///
/// assert_eq!(bits.count(), 74);
/// assert_eq!(&bits.as_bytes()[..3], &[0x20, 0x5B, 0x0B]);
/// ```
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Segment {
    mode: SegmentMode,
    data: Vec<u8>,
}

impl Segment {
    /// Creates a numeric segment from the decimal digits of `num`.
    pub fn from_number(num: u64) -> Self {
        Self {
            mode: SegmentMode::Numeric,
            data: digits::decimal_digits(num),
        }
    }

    /// Creates a numeric segment from a string of ASCII digits, keeping any
    /// leading zeros.
    ///
    /// # Errors
    ///
    /// Fails on the first character that is not a digit.
    pub fn from_numeric_text(text: &str) -> Result<Self, SegmentError> {
        let data = text
            .chars()
            .enumerate()
            .map(|(position, ch)| match ch.to_digit(10) {
                Some(digit) => Ok(digit as u8),
                None => Err(SegmentError::InvalidCharacter {
                    mode: SegmentMode::Numeric,
                    character: ch,
                    position,
                }),
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            mode: SegmentMode::Numeric,
            data,
        })
    }

    /// Creates an alphanumeric segment.
    ///
    /// Allowed characters: 0–9, A–Z (uppercase), space, `$`, `%`, `*`, `+`,
    /// `-`, `.`, `/`, `:`.
    ///
    /// # Errors
    ///
    /// Fails on the first character outside that alphabet. No segment is
    /// produced in that case.
    pub fn from_alphanumeric(text: &str) -> Result<Self, SegmentError> {
        let data = text
            .chars()
            .enumerate()
            .map(|(position, ch)| {
                codes::lookup(ch).ok_or(SegmentError::InvalidCharacter {
                    mode: SegmentMode::Alphanumeric,
                    character: ch,
                    position,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            mode: SegmentMode::Alphanumeric,
            data,
        })
    }

    /// Creates a byte segment holding the UTF-8 encoding of `text`.
    pub fn from_text(text: &str) -> Self {
        Self {
            mode: SegmentMode::Byte,
            data: text.as_bytes().to_vec(),
        }
    }

    /// Creates a byte segment from bytes expected to be UTF-8, replacing
    /// each run of ill-formed bytes with [`PLACEHOLDER`].
    pub fn from_utf8_lossy(bytes: &[u8]) -> Self {
        let mut text = String::with_capacity(bytes.len());
        let mut repaired = 0;
        let mut in_invalid_run = false;

        for chunk in bytes.utf8_chunks() {
            if !chunk.valid().is_empty() {
                text.push_str(chunk.valid());
                in_invalid_run = false;
            }
            if !chunk.invalid().is_empty() && !in_invalid_run {
                text.push(PLACEHOLDER);
                in_invalid_run = true;
                repaired += 1;
            }
        }

        if repaired > 0 {
            tracing::debug!(repaired, "replaced ill-formed UTF-8 in byte segment");
        }

        Self {
            mode: SegmentMode::Byte,
            data: text.into_bytes(),
        }
    }

    /// Returns the mode of this segment.
    pub fn mode(&self) -> SegmentMode {
        self.mode
    }

    /// Returns the normalised payload: digits, alphanumeric codes or bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Returns the value written in the character count field: digits,
    /// characters or bytes depending on the mode.
    pub fn char_count(&self) -> usize {
        self.data.len()
    }

    /// Returns the number of bits the packed payload occupies, excluding
    /// the mode indicator and the character count field.
    pub fn data_bits(&self) -> usize {
        let len = self.data.len();
        match self.mode {
            SegmentMode::Numeric => {
                (len / 3) * 10
                    + match len % 3 {
                        1 => 4,
                        2 => 7,
                        _ => 0,
                    }
            }
            SegmentMode::Alphanumeric => (len / 2) * 11 + (len % 2) * 6,
            SegmentMode::Byte => len * 8,
        }
    }

    /// Returns the width of the character count field at `version`.
    pub fn length_bits(&self, version: Version) -> u8 {
        self.mode.length_bits(version)
    }

    /// Returns the largest character count representable at `version`.
    pub fn max_char_count(&self, version: Version) -> usize {
        (1usize << self.length_bits(version)) - 1
    }

    /// Returns whether the character count fits in the count field at `version`.
    pub fn fits(&self, version: Version) -> bool {
        self.char_count() <= self.max_char_count(version)
    }

    /// Returns the total encoded size: mode indicator, count field and payload.
    pub fn total_bits(&self, version: Version) -> usize {
        MODE_INDICATOR_BITS + usize::from(self.length_bits(version)) + self.data_bits()
    }

    /// Writes the mode indicator, the character count field and the packed
    /// payload into `bits`.
    ///
    /// # Panics
    ///
    /// Panics before writing anything if `bits` has fewer than
    /// [`total_bits`](Self::total_bits) bits left, or if the character count
    /// does not fit in the count field at `version`. Use
    /// [`encode_segment`](crate::qrcode::encode_segment) for a checked variant.
    pub fn encode<B>(&self, version: Version, bits: &mut BitStream<B>)
    where
        B: AsRef<[u8]> + AsMut<[u8]>,
    {
        assert!(
            self.fits(version),
            "{} segment of {} characters overflows the {}-bit count field of version {}",
            self.mode,
            self.char_count(),
            self.length_bits(version),
            version.value()
        );
        let needed = self.total_bits(version);
        assert!(
            needed <= bits.remaining(),
            "not enough space in bit stream: segment needs {needed} bits, {} remaining",
            bits.remaining()
        );

        bits.write4(self.mode.mode_bits());
        bits.write_bits(self.char_count() as u32, self.length_bits(version));

        match self.mode {
            SegmentMode::Numeric => encoding::encode_numeric(&self.data, bits),
            SegmentMode::Alphanumeric => encoding::encode_alphanumeric(&self.data, bits),
            SegmentMode::Byte => encoding::encode_bytes(&self.data, bits),
        }
    }
}
