//! Helpers shared by the codec implementations.

use crate::Error;
use bytes::Buf;

/// Checks that at least `len` bytes remain in the buffer.
#[inline]
pub fn at_least<B: Buf>(buf: &mut B, len: usize) -> Result<(), Error> {
    if buf.remaining() < len {
        return Err(Error::EndOfBuffer);
    }
    Ok(())
}
