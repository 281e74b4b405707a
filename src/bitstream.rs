//! MSB-first bit packing into a fixed-capacity byte buffer.
//!
//! QR data segments are not byte aligned: a numeric triplet costs 10 bits, an
//! alphanumeric pair 11, and the mode indicator 4. [`BitStream`] appends values
//! of 1, 2, 4 or 8 bits at any bit offset, splitting a write across a byte
//! boundary when the current byte has fewer free bits than requested.

/// An append-only, bit-addressable output buffer.
///
/// The stream either owns its storage ([`BitStream::with_capacity`]) or writes
/// into a caller supplied slice ([`BitStream::wrap`]). Capacity is always the
/// buffer length times 8 and never changes.
///
/// Writing past capacity is a programming error (the caller sized the buffer
/// wrong) and panics.
///
/// # Example
///
/// ```rust
/// use qrbits::bitstream::BitStream;
///
/// let mut bits = BitStream::with_capacity(10);
/// bits.write8(0b1010_1000);
/// bits.write2(0b01);
///
/// assert_eq!(bits.count(), 10);
/// assert_eq!(bits.capacity(), 16);
/// assert_eq!(bits.as_bytes(), &[0xA8, 0x40]);
/// ```
#[derive(Clone, Debug)]
pub struct BitStream<B = Vec<u8>> {
    data: B,
    /// Byte currently being filled.
    index: usize,
    /// Unused bits in `data[index]`, in the range [1, 8].
    left: u8,
}

impl BitStream<Vec<u8>> {
    /// Creates a stream owning a zeroed buffer able to hold at least `bits`
    /// bits. The capacity is rounded up to the next multiple of 8.
    pub fn with_capacity(bits: usize) -> Self {
        Self {
            data: vec![0u8; bits.div_ceil(8)],
            index: 0,
            left: 8,
        }
    }
}

impl<'a> BitStream<&'a mut [u8]> {
    /// Creates a stream writing into `buffer`, starting at its first bit.
    ///
    /// The buffer does not need to be zeroed beforehand: every byte is
    /// overwritten when the stream first reaches it.
    pub fn wrap(buffer: &'a mut [u8]) -> Self {
        Self {
            data: buffer,
            index: 0,
            left: 8,
        }
    }
}

impl<B> BitStream<B>
where
    B: AsRef<[u8]> + AsMut<[u8]>,
{
    /// Returns the total number of bits the buffer can hold.
    pub fn capacity(&self) -> usize {
        self.data.as_ref().len() * 8
    }

    /// Returns the number of bits written so far.
    pub fn count(&self) -> usize {
        self.index * 8 + usize::from(8 - self.left)
    }

    /// Returns the number of bits that can still be written.
    pub fn remaining(&self) -> usize {
        self.capacity() - self.count()
    }

    /// Returns the underlying buffer. Only the first [`count`](Self::count)
    /// bits carry data.
    pub fn as_bytes(&self) -> &[u8] {
        self.data.as_ref()
    }

    /// Consumes the stream and returns its buffer.
    pub fn into_inner(self) -> B {
        self.data
    }

    /// Writes the lowest bit of `bit`.
    #[inline]
    pub fn write1(&mut self, bit: u8) {
        self.put(bit & 0x1, 1);
    }

    /// Writes the lowest 2 bits of `value`, most significant first.
    #[inline]
    pub fn write2(&mut self, value: u8) {
        self.put(value & 0x3, 2);
    }

    /// Writes the lowest 4 bits of `value`, most significant first.
    #[inline]
    pub fn write4(&mut self, value: u8) {
        self.put(value & 0xF, 4);
    }

    /// Writes all 8 bits of `value`, most significant first.
    #[inline]
    pub fn write8(&mut self, value: u8) {
        self.put(value, 8);
    }

    /// Writes the lowest `width` bits of `value`, most significant first,
    /// using the fewest 8, 4, 2 and 1 bit writes that add up to `width`.
    ///
    /// A 10-bit field becomes an 8-bit write of the top bits followed by a
    /// 2-bit write, a 13-bit field becomes 8 + 4 + 1, and so on.
    ///
    /// # Panics
    ///
    /// Panics if `width` is greater than 32 or the stream lacks `width` bits
    /// of space.
    pub fn write_bits(&mut self, value: u32, width: u8) {
        assert!(width <= 32, "bit width {width} exceeds 32");
        assert!(
            usize::from(width) <= self.remaining(),
            "not enough space in bit stream: {width} bits requested, {} remaining",
            self.remaining()
        );

        let mut width = width;
        while width > 0 {
            let chunk = match width {
                8..=32 => 8,
                4..=7 => 4,
                2 | 3 => 2,
                _ => 1,
            };
            width -= chunk;
            let part = (value >> width) as u8;
            match chunk {
                8 => self.write8(part),
                4 => self.write4(part),
                2 => self.write2(part),
                _ => self.write1(part),
            }
        }
    }

    /// Packs the `n` low bits of `value` (already masked) at the cursor.
    fn put(&mut self, value: u8, n: u8) {
        assert!(
            usize::from(n) <= self.remaining(),
            "not enough space in bit stream: {n} bits requested, {} remaining",
            self.remaining()
        );

        let data = self.data.as_mut();
        let left = self.left;

        if n <= left {
            let shift = left - n;
            let bits = value << shift;
            if left == 8 {
                data[self.index] = bits;
            } else {
                data[self.index] |= bits;
            }

            if shift == 0 {
                self.index += 1;
                self.left = 8;
            } else {
                self.left = shift;
            }
        } else {
            // Only reachable with a partially filled byte, since n <= 8.
            let spill = n - left;
            data[self.index] |= value >> spill;
            self.index += 1;
            data[self.index] = value << (8 - spill);
            self.left = 8 - spill;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::panic::{catch_unwind, AssertUnwindSafe};
    use test_case::test_case;

    /// Reads `n` bits starting at bit `offset`, MSB-first.
    fn read_bits(buf: &[u8], offset: usize, n: usize) -> u32 {
        (offset..offset + n).fold(0, |acc, i| {
            let bit = (buf[i / 8] >> (7 - (i % 8))) & 1;
            (acc << 1) | u32::from(bit)
        })
    }

    #[test_case(7, 8, 1; "seven bits round to one byte")]
    #[test_case(10, 16, 2; "ten bits round to two bytes")]
    #[test_case(16, 16, 2; "exact multiple")]
    #[test_case(20, 24, 3; "twenty bits")]
    #[test_case(0, 0, 0; "empty")]
    fn test_capacity_rounds_up(requested: usize, capacity: usize, bytes: usize) {
        let bits = BitStream::with_capacity(requested);
        assert_eq!(bits.capacity(), capacity);
        assert_eq!(bits.as_bytes().len(), bytes);
        assert_eq!(bits.count(), 0);
        assert_eq!(bits.remaining(), capacity);
    }

    #[test]
    fn test_write1() {
        let mut bits = BitStream::with_capacity(7);
        for i in 0..8u8 {
            assert_eq!(bits.index, 0);
            assert_eq!(bits.count(), usize::from(i));
            assert_eq!(bits.left, 8 - i);
            bits.write1(i);
        }

        assert_eq!(bits.count(), 8);
        assert_eq!(bits.as_bytes()[0], 0b0101_0101);
    }

    #[test]
    fn test_write2() {
        let mut bits = BitStream::with_capacity(10);

        bits.write2(0b11);
        assert_eq!((bits.count(), bits.index, bits.left), (2, 0, 6));
        assert_eq!(bits.as_bytes()[0], 0b1100_0000);

        bits.write2(0b01);
        assert_eq!((bits.count(), bits.index, bits.left), (4, 0, 4));
        assert_eq!(bits.as_bytes()[0], 0b1101_0000);

        bits.write2(0b10);
        assert_eq!((bits.count(), bits.index, bits.left), (6, 0, 2));
        assert_eq!(bits.as_bytes()[0], 0b1101_1000);

        bits.write2(0b00);
        assert_eq!((bits.count(), bits.index, bits.left), (8, 1, 8));
        assert_eq!(bits.as_bytes()[0], 0b1101_1000);

        bits.write2(0b11);
        assert_eq!((bits.count(), bits.index, bits.left), (10, 1, 6));
        assert_eq!(bits.as_bytes(), &[0b1101_1000, 0b1100_0000]);
    }

    #[test]
    fn test_write4() {
        let mut bits = BitStream::with_capacity(20);

        bits.write4(0b1011);
        bits.write4(0b0110);
        assert_eq!((bits.count(), bits.index, bits.left), (8, 1, 8));
        bits.write4(0b0101);
        bits.write4(0b1100);
        bits.write4(0b1001);
        assert_eq!((bits.count(), bits.index, bits.left), (20, 2, 4));
        assert_eq!(bits.as_bytes(), &[0b1011_0110, 0b0101_1100, 0b1001_0000]);
    }

    #[test]
    fn test_write8() {
        let mut bits = BitStream::with_capacity(16);

        bits.write8(0b1100_1100);
        assert_eq!((bits.count(), bits.index, bits.left), (8, 1, 8));
        bits.write8(0b1010_0101);
        assert_eq!((bits.count(), bits.index, bits.left), (16, 2, 8));
        assert_eq!(bits.as_bytes(), &[0b1100_1100, 0b1010_0101]);
        assert_eq!(bits.remaining(), 0);
    }

    #[test]
    fn test_unaligned_writes() {
        let mut bits = BitStream::with_capacity(10);
        bits.write1(0b1);
        bits.write2(0b11);
        bits.write2(0b00);
        bits.write2(0b10);
        bits.write2(0b01);
        assert_eq!((bits.count(), bits.index, bits.left), (9, 1, 7));
        assert_eq!(bits.as_bytes(), &[0b1110_0100, 0b1000_0000]);

        let mut bits = BitStream::with_capacity(16);
        bits.write2(0b01);
        bits.write4(0b1010);
        bits.write4(0b1101);
        assert_eq!((bits.count(), bits.index, bits.left), (10, 1, 6));
        assert_eq!(bits.as_bytes(), &[0b0110_1011, 0b0100_0000]);

        let mut bits = BitStream::with_capacity(16);
        bits.write2(0b11);
        bits.write4(0b1001);
        bits.write8(0b1100_0101);
        assert_eq!((bits.count(), bits.index, bits.left), (14, 1, 2));
        assert_eq!(bits.as_bytes(), &[0b1110_0111, 0b0001_0100]);

        let mut bits = BitStream::with_capacity(16);
        bits.write1(0b1);
        bits.write2(0b01);
        bits.write4(0b1010);
        bits.write8(0b1111_1111);
        assert_eq!((bits.count(), bits.index, bits.left), (15, 1, 1));
        assert_eq!(bits.as_bytes(), &[0b1011_0101, 0b1111_1110]);
    }

    #[test]
    fn test_every_width_at_every_misalignment() {
        for width in [1u8, 2, 4, 8] {
            for offset in 0..8usize {
                for value in 0..(1u16 << width) {
                    let mut bits = BitStream::with_capacity(16);
                    for _ in 0..offset {
                        bits.write1(1);
                    }

                    let value = value as u8;
                    match width {
                        1 => bits.write1(value),
                        2 => bits.write2(value),
                        4 => bits.write4(value),
                        _ => bits.write8(value),
                    }

                    let w = usize::from(width);
                    assert_eq!(bits.count(), offset + w);
                    assert_eq!(read_bits(bits.as_bytes(), 0, offset), (1 << offset) - 1);
                    assert_eq!(
                        read_bits(bits.as_bytes(), offset, w),
                        u32::from(value),
                        "width {width} at offset {offset}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_only_low_bits_are_written() {
        let mut bits = BitStream::with_capacity(8);
        bits.write1(0b1111_1110);
        bits.write2(0b1111_1101);
        bits.write4(0b1111_0110);
        bits.write1(0b11);
        assert_eq!(bits.as_bytes(), &[0b0010_1101]);
    }

    #[test_case(10, 0b10_1010_0001, &[0xA8, 0x40]; "ten bits as 8 + 2")]
    #[test_case(7, 0b001_0110, &[0x2C, 0x00]; "seven bits as 4 + 2 + 1")]
    #[test_case(13, 0b1_0110_1001_0011, &[0xB4, 0x98]; "thirteen bits as 8 + 4 + 1")]
    #[test_case(16, 0xBEEF, &[0xBE, 0xEF]; "sixteen bits as 8 + 8")]
    #[test_case(0, 0xFFFF, &[0x00, 0x00]; "zero width writes nothing")]
    fn test_write_bits(width: u8, value: u32, expected: &[u8]) {
        let mut bits = BitStream::with_capacity(16);
        bits.write_bits(value, width);
        assert_eq!(bits.count(), usize::from(width));
        assert_eq!(bits.as_bytes(), expected);
    }

    #[test]
    fn test_sum_of_widths_is_count() {
        let widths = [4u8, 8, 1, 2, 2, 8, 4, 1, 1, 8, 2, 4];
        let total: usize = widths.iter().map(|w| usize::from(*w)).sum();
        let mut bits = BitStream::with_capacity(total);

        for (i, width) in widths.iter().enumerate() {
            bits.write_bits(i as u32, *width);
        }
        assert_eq!(bits.count(), total);
    }

    fn write_width<B>(bits: &mut BitStream<B>, width: u8)
    where
        B: AsRef<[u8]> + AsMut<[u8]>,
    {
        match width {
            1 => bits.write1(1),
            2 => bits.write2(0b11),
            4 => bits.write4(0xF),
            _ => bits.write8(0xFF),
        }
    }

    #[test]
    fn test_writing_past_capacity_panics() {
        for prior in 0..=16usize {
            for width in [1u8, 2, 4, 8] {
                let overflows = prior + usize::from(width) > 16;

                let direct = catch_unwind(AssertUnwindSafe(|| {
                    let mut bits = BitStream::with_capacity(16);
                    for _ in 0..prior {
                        bits.write1(1);
                    }
                    write_width(&mut bits, width);
                    bits.count()
                }));
                let chunked = catch_unwind(AssertUnwindSafe(|| {
                    let mut bits = BitStream::with_capacity(16);
                    for _ in 0..prior {
                        bits.write1(1);
                    }
                    bits.write_bits(0, width);
                    bits.count()
                }));

                for (kind, result) in [("direct", direct), ("write_bits", chunked)] {
                    if overflows {
                        assert!(result.is_err(), "{kind}: {prior} + {width} should overflow");
                    } else {
                        assert_eq!(result.ok(), Some(prior + usize::from(width)), "{kind}");
                    }
                }
            }
        }
    }

    #[test]
    fn test_overflowing_write_leaves_buffer_untouched() {
        for width in [2u8, 4, 8] {
            let mut buffer = [0u8; 1];
            let result = catch_unwind(AssertUnwindSafe(|| {
                let mut bits = BitStream::wrap(&mut buffer);
                for _ in 0..7 {
                    bits.write1(1);
                }
                write_width(&mut bits, width);
            }));
            assert!(result.is_err(), "width {width}");
            assert_eq!(buffer, [0b1111_1110], "width {width}");
        }
    }

    #[test]
    #[should_panic(expected = "not enough space")]
    fn test_empty_stream_rejects_writes() {
        let mut bits = BitStream::with_capacity(0);
        bits.write1(1);
    }

    #[test]
    fn test_wrapped_dirty_buffer_matches_fresh() {
        let mut dirty = [0xFFu8; 3];
        let mut wrapped = BitStream::wrap(&mut dirty);
        let mut fresh = BitStream::with_capacity(24);

        wrapped.write4(0b1001);
        wrapped.write8(0b0011_0011);
        wrapped.write1(0);
        fresh.write4(0b1001);
        fresh.write8(0b0011_0011);
        fresh.write1(0);

        assert_eq!(wrapped.capacity(), 24);
        assert_eq!(wrapped.count(), 13);
        assert_eq!(wrapped.as_bytes()[..2], fresh.as_bytes()[..2]);
    }
}
