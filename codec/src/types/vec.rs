//! Codec implementation for vectors.
//!
//! A vector is written as a `varuint32` element count followed by each element in order.

use crate::{varint, EncodeSize, Error, RangeCfg, Read, Write};
use bytes::{Buf, BufMut};

impl<T: Write> Write for Vec<T> {
    #[inline]
    fn write(&self, buf: &mut impl BufMut) {
        varint::write_len(self.len(), buf);
        for item in self {
            item.write(buf);
        }
    }
}

impl<T: EncodeSize> EncodeSize for Vec<T> {
    #[inline]
    fn encode_size(&self) -> usize {
        varint::len_size(self.len()) + self.iter().map(EncodeSize::encode_size).sum::<usize>()
    }
}

impl<T: Read> Read for Vec<T> {
    type Cfg = (RangeCfg, T::Cfg);

    #[inline]
    fn read_cfg(buf: &mut impl Buf, (range, cfg): &Self::Cfg) -> Result<Self, Error> {
        let len = varint::read_len(buf, range)?;

        // Every element occupies at least one byte, so never trust a count larger than the
        // remaining input when reserving capacity.
        let mut vec = Vec::with_capacity(len.min(buf.remaining()));
        for _ in 0..len {
            vec.push(T::read_cfg(buf, cfg)?);
        }
        Ok(vec)
    }
}
