//! Codec implementations for length-prefixed byte types.
//!
//! Both [Bytes] and [String] are written as a `varuint32` length followed by the raw bytes.
//! Strings must be valid UTF-8 when read back.

use crate::{util::at_least, varint, EncodeSize, Error, RangeCfg, Read, Write};
use bytes::{Buf, BufMut, Bytes};

impl Write for Bytes {
    #[inline]
    fn write(&self, buf: &mut impl BufMut) {
        varint::write_len(self.len(), buf);
        buf.put_slice(self);
    }
}

impl EncodeSize for Bytes {
    #[inline]
    fn encode_size(&self) -> usize {
        varint::len_size(self.len()) + self.len()
    }
}

impl Read for Bytes {
    type Cfg = RangeCfg;

    #[inline]
    fn read_cfg(buf: &mut impl Buf, range: &RangeCfg) -> Result<Self, Error> {
        let len = varint::read_len(buf, range)?;
        at_least(buf, len)?;
        Ok(buf.copy_to_bytes(len))
    }
}

impl Write for String {
    #[inline]
    fn write(&self, buf: &mut impl BufMut) {
        varint::write_len(self.len(), buf);
        buf.put_slice(self.as_bytes());
    }
}

impl EncodeSize for String {
    #[inline]
    fn encode_size(&self) -> usize {
        varint::len_size(self.len()) + self.len()
    }
}

impl Read for String {
    type Cfg = RangeCfg;

    #[inline]
    fn read_cfg(buf: &mut impl Buf, range: &RangeCfg) -> Result<Self, Error> {
        let len = varint::read_len(buf, range)?;
        at_least(buf, len)?;
        let mut raw = vec![0u8; len];
        buf.copy_to_slice(&mut raw);
        String::from_utf8(raw).map_err(|_| Error::InvalidUtf8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Decode, Encode};

    #[test]
    fn test_bytes() {
        let values = [
            Bytes::new(),
            Bytes::from_static(&[1, 2, 3]),
            Bytes::from(vec![0; 300]),
        ];
        for value in values {
            let encoded = value.encode();
            assert_eq!(encoded.len(), varint::len_size(value.len()) + value.len());
            let len = value.len();

            let decoded = Bytes::decode_cfg(encoded, &RangeCfg::exact(len)).unwrap();
            assert_eq!(value, decoded);

            assert!(matches!(
                Bytes::decode_cfg(value.encode(), &(len + 1..).into()),
                Err(Error::InvalidLength(_))
            ));
        }
    }

    #[test]
    fn test_string() {
        let value = "test transfer".to_string();
        let encoded = value.encode();
        assert_eq!(encoded[0], 13);
        assert_eq!(&encoded[1..], b"test transfer");
        assert_eq!(String::decode_cfg(encoded, &(..).into()).unwrap(), value);
    }

    #[test]
    fn test_string_invalid_utf8() {
        let encoded = Bytes::from_static(&[0x02, 0xC3, 0x28]);
        assert!(matches!(
            String::decode_cfg(encoded, &(..).into()),
            Err(Error::InvalidUtf8)
        ));
    }

    #[test]
    fn test_string_truncated() {
        let encoded = Bytes::from_static(&[0x05, b'a', b'b']);
        assert!(matches!(
            String::decode_cfg(encoded, &(..).into()),
            Err(Error::EndOfBuffer)
        ));
    }
}
