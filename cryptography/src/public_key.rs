//! Public keys in their binary and textual forms.

use crate::{text, Error, KeyType};
use antelope_codec::{EncodeSize, Error as CodecError, RangeCfg, Read, ReadExt, Write};
use bytes::{Buf, BufMut};
use std::{fmt, str::FromStr};

/// Length of a compressed secp256k1/secp256r1 point.
pub const COMPRESSED_KEY_LENGTH: usize = 33;

/// Legacy prefix accepted by [PublicKey::from_str].
pub const DEFAULT_LEGACY_PREFIX: &str = "EOS";

/// A public key: a [KeyType] and the payload that follows it on the wire.
///
/// For K1 and R1 the payload is a compressed point. For WA it is a compressed point, a user
/// presence byte and a length-prefixed relying party id.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PublicKey {
    key_type: KeyType,
    data: Vec<u8>,
}

impl PublicKey {
    /// Creates a public key after checking that `data` is a well-formed payload for `key_type`.
    pub fn new(key_type: KeyType, data: Vec<u8>) -> Result<Self, Error> {
        let mut buf = &data[..];
        match read_payload(key_type, &mut buf, &RangeCfg::default()) {
            Ok(_) if buf.is_empty() => Ok(Self { key_type, data }),
            _ => Err(Error::InvalidLength(key_type, data.len())),
        }
    }

    /// Parses the typed form (`PUB_K1_…`) or a legacy form starting with one of
    /// `legacy_prefixes`, verifying the embedded checksum.
    pub fn parse<P: AsRef<str>>(text: &str, legacy_prefixes: &[P]) -> Result<Self, Error> {
        if let Some(typed) = text::split_typed(text, "PUB") {
            let (key_type, body) = typed?;
            let data = text::decode_checked(body, key_type.suffix().as_bytes())?;
            return Self::new(key_type, data);
        }
        let body = legacy_prefixes
            .iter()
            .find_map(|prefix| text.strip_prefix(prefix.as_ref()))
            .ok_or_else(|| Error::UnknownPrefix(text.to_string()))?;
        let data = text::decode_checked(body, &[])?;
        Self::new(KeyType::K1, data)
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
    let point = <[u8; COMPRESSED_KEY_LENGTH]>::read(buf)?;
    let mut data = point.to_vec();
    if key_type == KeyType::WA {
        let user_presence = u8::read(buf)?;
        let rpid = String::read_cfg(buf, cfg)?;
        user_presence.write(&mut data);
        rpid.write(&mut data);
    }
    Ok(data)
}

impl FromStr for PublicKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s, &[DEFAULT_LEGACY_PREFIX])
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&text::encode_typed("PUB", self.key_type, &self.data))
    }
}

impl Write for PublicKey {
    fn write(&self, buf: &mut impl BufMut) {
        buf.put_u8(self.key_type.tag());
        buf.put_slice(&self.data);
    }
}

impl EncodeSize for PublicKey {
    fn encode_size(&self) -> usize {
        1 + self.data.len()
    }
}

impl Read for PublicKey {
    /// Bounds the relying party id of WA keys.
    type Cfg = RangeCfg;

    fn read_cfg(buf: &mut impl Buf, cfg: &RangeCfg) -> Result<Self, CodecError> {
        let key_type = KeyType::from_tag(u8::read(buf)?)
            .ok_or(CodecError::Invalid("public_key", "unknown key type"))?;
        let data = read_payload(key_type, buf, cfg)?;
        Ok(Self { key_type, data })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use antelope_codec::{Decode, Encode};
    use antelope_utils::from_hex;
    use test_case::test_case;

    const LEGACY: &str = "EOS6MRyAjQq8ud7hVNYcfnVPJqcVpscN5So8BhtHuGYqET5GDW5CV";
    const TYPED: &str = "PUB_K1_6MRyAjQq8ud7hVNYcfnVPJqcVpscN5So8BhtHuGYqET5BoDq63";
    const POINT: &str = "02c0ded2bc1f1305fb0faac5e6c03ee3a1924234985427b6167ca569d13df435cf";

    #[test]
    fn test_parse_legacy() {
        let key: PublicKey = LEGACY.parse().unwrap();
        assert_eq!(key.key_type(), KeyType::K1);
        assert_eq!(key.data(), &from_hex(POINT).unwrap()[..]);
        assert_eq!(key.to_string(), TYPED);
    }

    #[test]
    fn test_parse_other_legacy_prefix() {
        let vex = LEGACY.replacen("EOS", "VEX", 1);
        assert!(matches!(
            vex.parse::<PublicKey>(),
            Err(Error::UnknownPrefix(_))
        ));
        let key = PublicKey::parse(&vex, &["EOS", "VEX"]).unwrap();
        assert_eq!(key.to_string(), TYPED);
    }

    #[test]
    fn test_parse_typed() {
        let key: PublicKey = TYPED.parse().unwrap();
        assert_eq!(key, LEGACY.parse().unwrap());

        let r1: PublicKey = "PUB_R1_6MRyAjQq8ud7hVNYcfnVPJqcVpscN5So8BhtHuGYqET5Bpuyty"
            .parse()
            .unwrap();
        assert_eq!(r1.key_type(), KeyType::R1);
        assert_eq!(r1.data(), key.data());
    }

    #[test]
    fn test_checksum_mismatch() {
        let tampered = "EOS6MRyAjQq8ud7hVNYcfnVPJqcVpscN5So8BhtHuGYqET5GDW5CZ";
        assert_eq!(
            tampered.parse::<PublicKey>(),
            Err(Error::ChecksumMismatch)
        );

        // A K1 body presented with an R1 prefix fails the salted checksum.
        let swapped = TYPED.replacen("K1", "R1", 1);
        assert_eq!(swapped.parse::<PublicKey>(), Err(Error::ChecksumMismatch));
    }

    #[test_case("invalid key"; "no prefix")]
    #[test_case("PUB_XX_6MRyAjQq8ud7hVNYcfnVPJqcVpscN5So8BhtHuGYqET5BoDq63"; "unknown key type")]
    #[test_case("SIG_K1_6MRyAjQq8ud7hVNYcfnVPJqcVpscN5So8BhtHuGYqET5BoDq63"; "signature prefix")]
    fn test_unknown_prefix(text: &str) {
        assert!(matches!(
            text.parse::<PublicKey>(),
            Err(Error::UnknownPrefix(_))
        ));
    }

    #[test]
    fn test_invalid_base58() {
        assert_eq!(
            "PUB_K1_0OIl".parse::<PublicKey>(),
            Err(Error::InvalidBase58)
        );
    }

    #[test]
    fn test_binary() {
        let key: PublicKey = TYPED.parse().unwrap();
        let encoded = key.encode();
        assert_eq!(encoded.len(), 34);
        assert_eq!(encoded[0], 0);
        assert_eq!(&encoded[1..], key.data());
        let decoded = PublicKey::decode_cfg(encoded, &RangeCfg::default()).unwrap();
        assert_eq!(decoded, key);
    }

    #[test]
    fn test_binary_wa() {
        let mut data = from_hex(POINT).unwrap();
        data.push(1);
        "example.com".to_string().write(&mut data);
        let key = PublicKey::new(KeyType::WA, data).unwrap();
        let text = key.to_string();
        assert!(text.starts_with("PUB_WA_"));
        assert_eq!(text.parse::<PublicKey>().unwrap(), key);

        let decoded = PublicKey::decode_cfg(key.encode(), &RangeCfg::default()).unwrap();
        assert_eq!(decoded, key);
    }

    #[test]
    fn test_binary_unknown_type() {
        let mut encoded = vec![7u8];
        encoded.extend_from_slice(&from_hex(POINT).unwrap());
        assert!(matches!(
            PublicKey::decode_cfg(&encoded[..], &RangeCfg::default()),
            Err(CodecError::Invalid(..))
        ));
    }

    #[test]
    fn test_wrong_length() {
        assert_eq!(
            PublicKey::new(KeyType::K1, vec![2; 32]),
            Err(Error::InvalidLength(KeyType::K1, 32))
        );
    }
}
