//! Segment encoding into the data bit string of a QR code.
//!
//! This module ties segments and bit streams together for callers that want a
//! ready-to-render buffer: the stream is sized from the segments, every
//! segment is checked against the count field width of the target version,
//! and the result carries the exact number of meaningful bits. Error
//! correction, masking and module placement are left to the renderer.
use crate::bitstream::BitStream;
use crate::error::SegmentError;
use crate::segment::Segment;

/// The data bit string of one or more encoded segments.
///
/// Only the first [`bits`](Self::bits) bits of [`as_bytes`](Self::as_bytes)
/// are data; the rest of the last byte is zero padding and must not be
/// interpreted by the renderer.
///
/// # Example
///
/// ```rust
/// use qrbits::qrcode::{encode_segment, Version};
/// use qrbits::segment::Segment;
///
/// let segment = Segment::from_number(673);
/// let encoded = encode_segment(&segment, Version::new(1)).unwrap();
///
/// assert_eq!(encoded.bits(), 24);
/// assert_eq!(encoded.as_bytes(), &[0x10, 0x0E, 0xA1]);
/// ```
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct EncodedBits {
    data: Vec<u8>,
    bit_count: usize,
    version: Version,
}

impl EncodedBits {
    /// Returns the number of meaningful bits.
    pub fn bits(&self) -> usize {
        self.bit_count
    }

    /// Returns the packed buffer, `ceil(bits / 8)` bytes long.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Returns the version the count fields were sized for. The renderer
    /// must build a symbol of this version.
    pub fn version(&self) -> Version {
        self.version
    }

    /// Returns the bit at `index` (0 is the most significant bit of the
    /// first byte), or `None` past the end of the data.
    pub fn bit(&self, index: usize) -> Option<bool> {
        (index < self.bit_count).then(|| (self.data[index >> 3] >> (7 - (index & 7))) & 1 != 0)
    }

    /// Consumes the result and returns the packed buffer.
    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }
}

/// Encodes a single segment for a symbol of the given version.
///
/// # Arguments
///
/// * `segment` - The segment to encode.
/// * `version` - Symbol version the renderer will use.
///
/// # Returns
///
/// The packed bits, or [`SegmentError::SegmentTooLong`] if the segment has
/// more characters than the count field of `version` can hold.
pub fn encode_segment(segment: &Segment, version: Version) -> Result<EncodedBits, SegmentError> {
    encode_segments(core::slice::from_ref(segment), version)
}

/// Encodes segments back to back, in the given order, for a symbol of the
/// given version.
///
/// The caller chooses the mode of every segment; no attempt is made to pick
/// cheaper modes or to split the input differently.
///
/// # Arguments
///
/// * `segs` - Segments to concatenate.
/// * `version` - Symbol version the renderer will use.
///
/// # Returns
///
/// The packed bits, or [`SegmentError::SegmentTooLong`] for the first
/// segment whose character count does not fit at `version`. Nothing is
/// encoded when an error is returned.
///
/// # Example
///
/// ```rust
/// use qrbits::qrcode::{encode_segments, Version};
/// use qrbits::segment::Segment;
///
/// let segs = [
///     Segment::from_alphanumeric("ORDER:").unwrap(),
///     Segment::from_number(20231105),
/// ];
/// let encoded = encode_segments(&segs, Version::new(2)).unwrap();
/// assert_eq!(encoded.bits(), 4 + 9 + 33 + 4 + 10 + 27);
/// ```
pub fn encode_segments(segs: &[Segment], version: Version) -> Result<EncodedBits, SegmentError> {
    let mut total: usize = 0;
    for seg in segs {
        if !seg.fits(version) {
            return Err(SegmentError::SegmentTooLong {
                mode: seg.mode(),
                count: seg.char_count(),
                max: seg.max_char_count(version),
            });
        }
        total += seg.total_bits(version);
    }
    tracing::trace!(
        segments = segs.len(),
        total_bits = total,
        version = version.value(),
        "sized data bit string"
    );

    let mut bits = BitStream::with_capacity(total);
    for seg in segs {
        seg.encode(version, &mut bits);
        tracing::debug!(
            mode = %seg.mode(),
            chars = seg.char_count(),
            data_bits = seg.data_bits(),
            "encoded segment"
        );
    }
    debug_assert_eq!(bits.count(), total);

    Ok(EncodedBits {
        bit_count: bits.count(),
        data: bits.into_inner(),
        version,
    })
}

/// A QR code version (1–40).
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Version(u8);

impl Version {
    /// The minimum version number supported in the QR Code Model 2 standard.
    pub const MIN: Version = Version(1);

    /// The maximum version number supported in the QR Code Model 2 standard.
    pub const MAX: Version = Version(40);

    /// Creates a version object from the given number.
    ///
    /// # Panics
    ///
    /// Panics if the number is outside the range [1, 40].
    pub const fn new(ver: u8) -> Self {
        assert!(
            Version::MIN.value() <= ver && ver <= Version::MAX.value(),
            "Version number out of range"
        );
        Self(ver)
    }

    /// Returns the value, which is in the range [1, 40].
    pub const fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Version {
    type Error = SegmentError;

    fn try_from(ver: u8) -> Result<Self, Self::Error> {
        if (Version::MIN.value()..=Version::MAX.value()).contains(&ver) {
            Ok(Self(ver))
        } else {
            Err(SegmentError::InvalidVersion(ver))
        }
    }
}
