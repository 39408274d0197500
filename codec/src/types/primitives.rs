//! Codec implementations for Rust primitive types.
//!
//! All fixed-size integers and floats are written little-endian, matching the in-memory layout
//! Antelope nodes serialize. `bool` is a single byte that must be `0` or `1` when read back.

use crate::{util::at_least, EncodeSize, Error, FixedSize, Read, ReadExt, Write};
use bytes::{Buf, BufMut};

macro_rules! impl_numeric {
    ($type:ty, $read_method:ident, $write_method:ident) => {
        impl Write for $type {
            #[inline]
            fn write(&self, buf: &mut impl BufMut) {
                buf.$write_method(*self);
            }
        }

        impl Read for $type {
            type Cfg = ();

            #[inline]
            fn read_cfg(buf: &mut impl Buf, _: &()) -> Result<Self, Error> {
                at_least(buf, std::mem::size_of::<$type>())?;
                Ok(buf.$read_method())
            }
        }

        impl FixedSize for $type {
            const SIZE: usize = std::mem::size_of::<$type>();
        }
    };
}

impl_numeric!(u8, get_u8, put_u8);
impl_numeric!(u16, get_u16_le, put_u16_le);
impl_numeric!(u32, get_u32_le, put_u32_le);
impl_numeric!(u64, get_u64_le, put_u64_le);
impl_numeric!(u128, get_u128_le, put_u128_le);
impl_numeric!(i8, get_i8, put_i8);
impl_numeric!(i16, get_i16_le, put_i16_le);
impl_numeric!(i32, get_i32_le, put_i32_le);
impl_numeric!(i64, get_i64_le, put_i64_le);
impl_numeric!(i128, get_i128_le, put_i128_le);
impl_numeric!(f32, get_f32_le, put_f32_le);
impl_numeric!(f64, get_f64_le, put_f64_le);

impl Write for bool {
    #[inline]
    fn write(&self, buf: &mut impl BufMut) {
        buf.put_u8(u8::from(*self));
    }
}

impl Read for bool {
    type Cfg = ();

    #[inline]
    fn read_cfg(buf: &mut impl Buf, _: &()) -> Result<Self, Error> {
        match u8::read(buf)? {
            0 => Ok(false),
            1 => Ok(true),
            _ => Err(Error::InvalidBool),
        }
    }
}

impl FixedSize for bool {
    const SIZE: usize = 1;
}

// Fixed-length raw bytes (checksums, key material)
impl<const N: usize> Write for [u8; N] {
    #[inline]
    fn write(&self, buf: &mut impl BufMut) {
        buf.put_slice(&self[..]);
    }
}

impl<const N: usize> Read for [u8; N] {
    type Cfg = ();

    #[inline]
    fn read_cfg(buf: &mut impl Buf, _: &()) -> Result<Self, Error> {
        at_least(buf, N)?;
        let mut dst = [0; N];
        buf.copy_to_slice(&mut dst);
        Ok(dst)
    }
}

impl<const N: usize> FixedSize for [u8; N] {
    const SIZE: usize = N;
}

impl<T: Write> Write for Option<T> {
    #[inline]
    fn write(&self, buf: &mut impl BufMut) {
        self.is_some().write(buf);
        if let Some(inner) = self {
            inner.write(buf);
        }
    }
}

impl<T: EncodeSize> EncodeSize for Option<T> {
    #[inline]
    fn encode_size(&self) -> usize {
        match self {
            Some(inner) => 1 + inner.encode_size(),
            None => 1,
        }
    }
}

impl<T: Read> Read for Option<T> {
    type Cfg = T::Cfg;

    #[inline]
    fn read_cfg(buf: &mut impl Buf, cfg: &Self::Cfg) -> Result<Self, Error> {
        if bool::read(buf)? {
            Ok(Some(T::read_cfg(buf, cfg)?))
        } else {
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DecodeExt, Encode};
    use bytes::Bytes;
    use paste::paste;

    macro_rules! impl_num_test {
        ($type:ty, $size:expr) => {
            paste! {
                #[test]
                fn [<test_ $type>]() {
                    let values: [$type; 5] =
                        [0 as $type, 1 as $type, 42 as $type, <$type>::MAX, <$type>::MIN];
                    for value in values.iter() {
                        let encoded = value.encode();
                        assert_eq!(encoded.len(), $size);
                        assert_eq!(&encoded[..], &value.to_le_bytes()[..]);
                        let decoded = <$type>::decode(encoded).unwrap();
                        assert_eq!(*value, decoded);
                    }
                }
            }
        };
    }
    impl_num_test!(u8, 1);
    impl_num_test!(u16, 2);
    impl_num_test!(u32, 4);
    impl_num_test!(u64, 8);
    impl_num_test!(u128, 16);
    impl_num_test!(i8, 1);
    impl_num_test!(i16, 2);
    impl_num_test!(i32, 4);
    impl_num_test!(i64, 8);
    impl_num_test!(i128, 16);
    impl_num_test!(f32, 4);
    impl_num_test!(f64, 8);

    #[test]
    fn test_endianness() {
        assert_eq!(&0x0102u16.encode()[..], &[0x02, 0x01]);
        assert_eq!(&0x01020304u32.encode()[..], &[0x04, 0x03, 0x02, 0x01]);
        assert_eq!(&(-2i16).encode()[..], &[0xFE, 0xFF]);
        assert_eq!(&1.0f32.encode()[..], &[0x00, 0x00, 0x80, 0x3F]);
    }

    #[test]
    fn test_bool() {
        assert_eq!(&true.encode()[..], &[0x01]);
        assert_eq!(&false.encode()[..], &[0x00]);
        assert!(bool::decode(Bytes::from_static(&[0x01])).unwrap());
        assert!(matches!(
            bool::decode(Bytes::from_static(&[0x02])),
            Err(Error::InvalidBool)
        ));
    }

    #[test]
    fn test_array() {
        let values = [1u8, 2, 3];
        let encoded = values.encode();
        assert_eq!(&encoded[..], &[1, 2, 3]);
        assert_eq!(<[u8; 3]>::decode(encoded).unwrap(), values);
        assert!(matches!(
            <[u8; 4]>::decode(Bytes::from_static(&[1, 2, 3])),
            Err(Error::EndOfBuffer)
        ));
    }

    #[test]
    fn test_option() {
        assert_eq!(&Some(42u32).encode()[..], &[0x01, 0x2A, 0x00, 0x00, 0x00]);
        assert_eq!(&None::<u32>.encode()[..], &[0x00]);
        for value in [Some(42u32), None] {
            assert_eq!(Option::<u32>::decode(value.encode()).unwrap(), value);
        }
    }
}
