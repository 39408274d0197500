//! Variable-length integer encoding and decoding
//!
//! Antelope encodes lengths, element counts and variant tags as LEB128 varints (`varuint32`).
//! Each byte uses:
//! - 7 bits for the value
//! - 1 "continuation" bit to indicate if more bytes follow
//!
//! Signed values (`varint32`) are ZigZag-mapped onto the unsigned encoding first, which moves
//! the sign bit to the least significant bit so that values close to zero stay short.

use crate::{EncodeSize, Error, Read, Write};
use bytes::{Buf, BufMut};
use std::ops::{BitOrAssign, Shl, ShrAssign};

const BITS_PER_BYTE: usize = 8;
const DATA_BITS_PER_BYTE: usize = 7;
const DATA_BITS_MASK: u8 = 0x7F;
const CONTINUATION_BIT_MASK: u8 = 0x80;

/// A trait for unsigned integers that can be varint encoded.
pub trait UInt:
    Copy
    + From<u8>
    + Sized
    + ShrAssign<usize>
    + Shl<usize, Output = Self>
    + BitOrAssign<Self>
    + PartialOrd
{
    /// Returns the number of leading zeros in the integer.
    fn leading_zeros(self) -> u32;

    /// Returns the least significant byte of the integer.
    fn as_u8(self) -> u8;
}

macro_rules! impl_uint {
    ($type:ty) => {
        impl UInt for $type {
            #[inline]
            fn leading_zeros(self) -> u32 {
                self.leading_zeros()
            }

            #[inline]
            fn as_u8(self) -> u8 {
                self as u8
            }
        }
    };
}
impl_uint!(u8);
impl_uint!(u16);
impl_uint!(u32);
impl_uint!(u64);

/// Encodes an unsigned integer as a varint.
pub fn write<T: UInt>(value: T, buf: &mut impl BufMut) {
    let continuation_threshold = T::from(CONTINUATION_BIT_MASK);
    let mut val = value;
    while val >= continuation_threshold {
        buf.put_u8(val.as_u8() | CONTINUATION_BIT_MASK);
        val >>= DATA_BITS_PER_BYTE;
    }
    buf.put_u8(val.as_u8());
}

/// Decodes an unsigned integer from a varint.
///
/// Rejects encodings that set bits beyond the width of `T` (which also rejects encodings that
/// would continue past the last possible byte).
pub fn read<T: UInt>(buf: &mut impl Buf) -> Result<T, Error> {
    let max_bits = std::mem::size_of::<T>() * BITS_PER_BYTE;
    let mut result: T = T::from(0);
    let mut shift = 0;
    loop {
        if !buf.has_remaining() {
            return Err(Error::EndOfBuffer);
        }
        let byte = buf.get_u8();

        // On what must be the last byte, any bit beyond the width of T (including the
        // continuation bit) is an overflow.
        let remaining_bits = max_bits.saturating_sub(shift);
        if remaining_bits <= DATA_BITS_PER_BYTE {
            let relevant_bits = BITS_PER_BYTE - byte.leading_zeros() as usize;
            if relevant_bits > remaining_bits {
                return Err(Error::InvalidVarint);
            }
        }

        result |= T::from(byte & DATA_BITS_MASK) << shift;
        if byte & CONTINUATION_BIT_MASK == 0 {
            return Ok(result);
        }
        shift += DATA_BITS_PER_BYTE;
    }
}

/// Calculates the number of bytes needed to encode an unsigned integer as a varint.
pub fn size<T: UInt>(value: T) -> usize {
    let total_bits = std::mem::size_of::<T>() * BITS_PER_BYTE;
    let data_bits = total_bits - value.leading_zeros() as usize;
    usize::max(1, data_bits.div_ceil(DATA_BITS_PER_BYTE))
}

/// Maps a signed 32-bit integer onto the unsigned range with ZigZag encoding.
#[inline]
pub fn zigzag(value: i32) -> u32 {
    ((value << 1) ^ (value >> 31)) as u32
}

/// Reverses [zigzag].
#[inline]
pub fn unzigzag(value: u32) -> i32 {
    ((value >> 1) as i32) ^ -((value & 1) as i32)
}

/// A `varuint32`: an unsigned 32-bit integer written as a varint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VarUint32(pub u32);

impl Write for VarUint32 {
    #[inline]
    fn write(&self, buf: &mut impl BufMut) {
        write(self.0, buf);
    }
}

impl Read for VarUint32 {
    type Cfg = ();

    #[inline]
    fn read_cfg(buf: &mut impl Buf, _: &()) -> Result<Self, Error> {
        read(buf).map(VarUint32)
    }
}

impl EncodeSize for VarUint32 {
    #[inline]
    fn encode_size(&self) -> usize {
        size(self.0)
    }
}

/// A `varint32`: a signed 32-bit integer written as a ZigZag varint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VarInt32(pub i32);

impl Write for VarInt32 {
    #[inline]
    fn write(&self, buf: &mut impl BufMut) {
        write(zigzag(self.0), buf);
    }
}

impl Read for VarInt32 {
    type Cfg = ();

    #[inline]
    fn read_cfg(buf: &mut impl Buf, _: &()) -> Result<Self, Error> {
        read::<u32>(buf).map(|value| VarInt32(unzigzag(value)))
    }
}

impl EncodeSize for VarInt32 {
    #[inline]
    fn encode_size(&self) -> usize {
        size(zigzag(self.0))
    }
}

/// Writes a length or count as a `varuint32`.
///
/// Panics if `len` does not fit in a `u32`.
#[inline]
pub fn write_len(len: usize, buf: &mut impl BufMut) {
    let len = u32::try_from(len).expect("length exceeds u32");
    write(len, buf);
}

/// Returns the encoded size of a length prefix.
#[inline]
pub fn len_size(len: usize) -> usize {
    let len = u32::try_from(len).expect("length exceeds u32");
    size(len)
}

/// Reads a `varuint32` length prefix, rejecting values outside `range`.
pub fn read_len(buf: &mut impl Buf, range: &crate::RangeCfg) -> Result<usize, Error> {
    let len = read::<u32>(buf)?;
    let len = usize::try_from(len).map_err(|_| Error::InvalidVarint)?;
    if !range.contains(&len) {
        return Err(Error::InvalidLength(len));
    }
    Ok(len)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DecodeExt, Encode};
    use bytes::Bytes;
    use test_case::test_case;

    #[test_case(0, &[0x00]; "zero")]
    #[test_case(1, &[0x01]; "one")]
    #[test_case(127, &[0x7F]; "largest single byte")]
    #[test_case(128, &[0x80, 0x01]; "smallest two bytes")]
    #[test_case(230, &[0xE6, 0x01]; "two bytes")]
    #[test_case(16384, &[0x80, 0x80, 0x01]; "three bytes")]
    #[test_case(u32::MAX, &[0xFF, 0xFF, 0xFF, 0xFF, 0x0F]; "max")]
    fn test_varuint32_vectors(value: u32, expected: &[u8]) {
        let encoded = VarUint32(value).encode();
        assert_eq!(&encoded[..], expected);
        assert_eq!(VarUint32(value).encode_size(), expected.len());
        assert_eq!(VarUint32::decode(encoded).unwrap(), VarUint32(value));
    }

    #[test_case(0, &[0x00]; "zero")]
    #[test_case(-1, &[0x01]; "minus one")]
    #[test_case(1, &[0x02]; "one")]
    #[test_case(-64, &[0x7F]; "largest negative single byte")]
    #[test_case(64, &[0x80, 0x01]; "smallest positive two bytes")]
    #[test_case(i32::MIN, &[0xFF, 0xFF, 0xFF, 0xFF, 0x0F]; "min")]
    fn test_varint32_vectors(value: i32, expected: &[u8]) {
        let encoded = VarInt32(value).encode();
        assert_eq!(&encoded[..], expected);
        assert_eq!(VarInt32::decode(encoded).unwrap(), VarInt32(value));
    }

    #[test]
    fn test_zigzag_extremes() {
        for value in [0, 1, -1, i32::MAX, i32::MIN, 1 << 20, -(1 << 20)] {
            assert_eq!(unzigzag(zigzag(value)), value);
        }
    }

    #[test]
    fn test_varint_insufficient_buffer() {
        let mut buf = Bytes::from_static(&[0x80]);
        assert!(matches!(read::<u32>(&mut buf), Err(Error::EndOfBuffer)));
    }

    #[test]
    fn test_varint_overlong() {
        // Continuation bit set on the fifth byte of a u32.
        let mut buf = Bytes::from_static(&[0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0x01]);
        assert!(matches!(read::<u32>(&mut buf), Err(Error::InvalidVarint)));

        // Fifth byte carries bits beyond 32.
        let mut buf = Bytes::from_static(&[0xFF, 0xFF, 0xFF, 0xFF, 0x1F]);
        assert!(matches!(read::<u32>(&mut buf), Err(Error::InvalidVarint)));
    }

    #[test]
    fn test_read_len_range() {
        let mut buf = Bytes::from_static(&[0x05]);
        assert!(matches!(
            read_len(&mut buf, &(..5).into()),
            Err(Error::InvalidLength(5))
        ));
        let mut buf = Bytes::from_static(&[0x05]);
        assert_eq!(read_len(&mut buf, &(..=5).into()).unwrap(), 5);
    }
}
