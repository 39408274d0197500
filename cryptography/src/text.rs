//! Base58 text encoding shared by keys and signatures.

use crate::{ripemd160, Error, KeyType};

/// Splits `PUB_K1_<body>`-style text into its key type and body.
pub(crate) fn split_typed<'a>(
    text: &'a str,
    kind: &str,
) -> Option<Result<(KeyType, &'a str), Error>> {
    let rest = text.strip_prefix(kind)?.strip_prefix('_')?;
    let (suffix, body) = rest.split_once('_')?;
    Some(
        KeyType::from_suffix(suffix)
            .map(|key_type| (key_type, body))
            .ok_or_else(|| Error::UnknownPrefix(format!("{kind}_{suffix}_"))),
    )
}

/// Decodes a base58 body and verifies its trailing checksum against `salt`.
pub(crate) fn decode_checked(body: &str, salt: &[u8]) -> Result<Vec<u8>, Error> {
    let mut raw = bs58::decode(body)
        .into_vec()
        .map_err(|_| Error::InvalidBase58)?;
    if raw.len() < ripemd160::CHECKSUM_LENGTH {
        return Err(Error::ChecksumMismatch);
    }
    let split = raw.len() - ripemd160::CHECKSUM_LENGTH;
    if ripemd160::checksum(&raw[..split], salt)[..] != raw[split..] {
        return Err(Error::ChecksumMismatch);
    }
    raw.truncate(split);
    Ok(raw)
}

/// Encodes `data` as `<kind>_<suffix>_<base58(data || checksum)>`.
pub(crate) fn encode_typed(kind: &str, key_type: KeyType, data: &[u8]) -> String {
    let checksum = ripemd160::checksum(data, key_type.suffix().as_bytes());
    let mut raw = Vec::with_capacity(data.len() + checksum.len());
    raw.extend_from_slice(data);
    raw.extend_from_slice(&checksum);
    format!(
        "{kind}_{}_{}",
        key_type.suffix(),
        bs58::encode(raw).into_string()
    )
}
