//! Recoverable errors reported to callers building or encoding segments.

use crate::segment::SegmentMode;

/// Errors that can occur when constructing or encoding a segment.
///
/// Buffer overruns are not represented here. They are caller defects and
/// panic instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SegmentError {
    /// The input contains a character the requested mode cannot encode.
    /// `position` counts characters, not bytes.
    #[error("character {character:?} at position {position} cannot be encoded in {mode} mode")]
    InvalidCharacter {
        /// Mode the segment was being built for.
        mode: SegmentMode,
        /// The offending character.
        character: char,
        /// Index of the character within the input.
        position: usize,
    },

    /// The segment holds more characters than its length field can count at
    /// the target version.
    #[error("{mode} segment of {count} characters exceeds the maximum of {max} for this version")]
    SegmentTooLong {
        /// Mode of the segment.
        mode: SegmentMode,
        /// Characters (or bytes) in the segment.
        count: usize,
        /// Largest count the length field can hold.
        max: usize,
    },

    /// A symbol version number outside [1, 40] was supplied.
    #[error("symbol version {0} is out of range (expected 1 to 40)")]
    InvalidVersion(u8),
}
