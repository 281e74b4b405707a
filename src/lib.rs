//! # qrbits
//!
//! A Rust library for packing data into QR code segments, bit for bit.
//!
//! `qrbits` produces the data bit string of a QR code symbol as defined by
//! ISO/IEC 18004: for each segment a 4-bit mode indicator, a character count
//! field whose width depends on the symbol version, and the payload packed at
//! 10 bits per 3 digits (numeric), 11 bits per 2 characters (alphanumeric) or
//! 8 bits per byte (byte). The output buffer and its exact bit count are meant
//! to be handed to a QR renderer that adds error correction, masking and
//! module placement.
//!
//! ## Features
//!
//! - Build numeric, alphanumeric and byte segments from numbers or text.
//! - Pack segments into a fixed-capacity, MSB-first bit stream at any bit
//!   alignment.
//! - Size count fields for any version from 1 to 40.
//! - Render encoded bits as text, SVG or images for inspection.
//! - Safe Rust implementation with no unsafe code.
//!
//! ## Example
//!
//! Encode a string in alphanumeric mode for a version 1 symbol:
//!
//! ```rust
//! use qrbits::qrcode::{encode_segment, Version};
//! use qrbits::segment::Segment;
//!
//! let segment = Segment::from_alphanumeric("HELLO WORLD").unwrap();
//! let encoded = encode_segment(&segment, Version::new(1)).unwrap();
//!
//! assert_eq!(encoded.bits(), 74);
//! assert_eq!(encoded.as_bytes()[0], 0x20);
//! ```
//!
//! Write into a caller supplied buffer:
//!
//! ```rust
//! use qrbits::bitstream::BitStream;
//! use qrbits::qrcode::Version;
//! use qrbits::segment::Segment;
//!
//! let segment = Segment::from_number(673);
//! let mut buffer = [0u8; 8];
//! let mut bits = BitStream::wrap(&mut buffer);
//! segment.encode(Version::new(1), &mut bits);
//!
//! assert_eq!(bits.count(), 24);
//! assert_eq!(&buffer[..3], &[0x10, 0x0E, 0xA1]);
//! ```
//!
//! ## Modules
//!
//! - [`bitstream`]: Bit-level output buffer.
//! - [`segment`]: Segments, modes and count field sizing.
//! - [`qrcode`]: Checked encoding of segments for a symbol version.
//! - [`codes`]: The alphanumeric alphabet.
//! - [`digits`]: Decimal digit counting.
//! - [`helper`]: Utilities for rendering encoded bits.

#![forbid(unsafe_code)]

pub mod bitstream;
pub mod codes;
pub mod digits;
mod encoding;
pub mod error;
pub mod helper;
pub mod logging;
pub mod qrcode;
pub mod segment;

pub use error::SegmentError;
pub use qrcode::{encode_segment, encode_segments, EncodedBits, Version};
pub use segment::{Segment, SegmentMode};
