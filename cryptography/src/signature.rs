//! Signatures in their binary and textual forms.

use crate::{text, Error, KeyType};
use antelope_codec::{EncodeSize, Error as CodecError, RangeCfg, Read, ReadExt, Write};
use bytes::{Buf, BufMut, Bytes};
use std::{fmt, str::FromStr};

/// Length of a compact recoverable signature.
pub const COMPACT_SIGNATURE_LENGTH: usize = 65;

/// A signature: a [KeyType] and the payload that follows it on the wire.
///
/// WA signatures carry the authenticator data and client JSON after the compact signature, each
/// length-prefixed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Signature {
    key_type: KeyType,
    data: Vec<u8>,
}

impl Signature {
    /// Creates a signature after checking that `data` is a well-formed payload for `key_type`.
    pub fn new(key_type: KeyType, data: Vec<u8>) -> Result<Self, Error> {
        let mut buf = &data[..];
        match read_payload(key_type, &mut buf, &RangeCfg::default()) {
            Ok(_) if buf.is_empty() => Ok(Self { key_type, data }),
            _ => Err(Error::InvalidLength(key_type, data.len())),
        }
    }

    /// Returns the key type.
    pub fn key_type(&self) -> KeyType {
        self.key_type
    }

    /// Returns the payload following the key type byte.
    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

fn read_payload(
    key_type: KeyType,
    buf: &mut impl Buf,
    cfg: &RangeCfg,
) -> Result<Vec<u8>, CodecError> {
    let compact = <[u8; COMPACT_SIGNATURE_LENGTH]>::read(buf)?;
    let mut data = compact.to_vec();
    if key_type == KeyType::WA {
        let auth_data = Bytes::read_cfg(buf, cfg)?;
        let client_json = String::read_cfg(buf, cfg)?;
        auth_data.write(&mut data);
        client_json.write(&mut data);
    }
    Ok(data)
}

impl FromStr for Signature {
    type Err = Error;

    /// Parses `SIG_K1_…`, `SIG_R1_…` or `SIG_WA_…`, verifying the checksum.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (key_type, body) =
            text::split_typed(s, "SIG").ok_or_else(|| Error::UnknownPrefix(s.to_string()))??;
        let data = text::decode_checked(body, key_type.suffix().as_bytes())?;
        Self::new(key_type, data)
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&text::encode_typed("SIG", self.key_type, &self.data))
    }
}

impl Write for Signature {
    fn write(&self, buf: &mut impl BufMut) {
        buf.put_u8(self.key_type.tag());
        buf.put_slice(&self.data);
    }
}

impl EncodeSize for Signature {
    fn encode_size(&self) -> usize {
        1 + self.data.len()
    }
}

impl Read for Signature {
    /// Bounds the variable-length WA fields.
    type Cfg = RangeCfg;

    fn read_cfg(buf: &mut impl Buf, cfg: &RangeCfg) -> Result<Self, CodecError> {
        let key_type = KeyType::from_tag(u8::read(buf)?)
            .ok_or(CodecError::Invalid("signature", "unknown key type"))?;
        let data = read_payload(key_type, buf, cfg)?;
        Ok(Self { key_type, data })
    }
}
