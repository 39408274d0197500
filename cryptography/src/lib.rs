//! Parse, print and serialize Antelope public keys and signatures.
//!
//! Keys and signatures travel on the wire as a key type byte followed by the curve-specific
//! payload, and are written in JSON as base58 text with a RIPEMD-160 checksum:
//!
//! - Typed form: `PUB_K1_…`, `PUB_R1_…`, `PUB_WA_…`, `SIG_K1_…`, … where the checksum covers the
//!   payload followed by the key type suffix (`K1`, `R1` or `WA`).
//! - Legacy form (public keys only): a chain-specific prefix such as `EOS` followed by a K1 payload
//!   whose checksum covers the payload alone.
//!
//! Parsing accepts both forms (legacy prefixes are supplied by the caller) and always verifies
//! the checksum. Printing always produces the typed form.
//!
//! # Example
//!
//! ```rust
//! use antelope_cryptography::{KeyType, PublicKey};
//!
//! let key = PublicKey::parse(
//!     "EOS6MRyAjQq8ud7hVNYcfnVPJqcVpscN5So8BhtHuGYqET5GDW5CV",
//!     &["EOS"],
//! ).unwrap();
//! assert_eq!(key.key_type(), KeyType::K1);
//! assert_eq!(
//!     key.to_string(),
//!     "PUB_K1_6MRyAjQq8ud7hVNYcfnVPJqcVpscN5So8BhtHuGYqET5BoDq63",
//! );
//! ```

use thiserror::Error;

pub mod public_key;
pub use public_key::PublicKey;
pub mod ripemd160;
pub mod signature;
pub use signature::Signature;
mod text;

/// Errors that can occur when parsing keys and signatures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("unrecognized prefix: {0}")]
    UnknownPrefix(String),
    #[error("invalid base58")]
    InvalidBase58,
    #[error("checksum doesn't match")]
    ChecksumMismatch,
    #[error("invalid payload length for {0}: {1}")]
    InvalidLength(KeyType, usize),
    #[error("invalid payload: {0}")]
    Codec(#[from] antelope_codec::Error),
}

/// The curve (or authenticator) a key or signature belongs to, written as the first byte of its
/// binary form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyType {
    /// secp256k1.
    K1,
    /// secp256r1.
    R1,
    /// WebAuthn (secp256r1 with authenticator metadata).
    WA,
}

impl KeyType {
    /// Returns the key type for a wire tag.
    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            0 => Some(Self::K1),
            1 => Some(Self::R1),
            2 => Some(Self::WA),
            _ => None,
        }
    }

    /// Returns the wire tag of this key type.
    pub fn tag(self) -> u8 {
        match self {
            Self::K1 => 0,
            Self::R1 => 1,
            Self::WA => 2,
        }
    }

    /// Returns the suffix mixed into checksums and used in typed prefixes.
    pub fn suffix(self) -> &'static str {
        match self {
            Self::K1 => "K1",
            Self::R1 => "R1",
            Self::WA => "WA",
        }
    }

    fn from_suffix(suffix: &str) -> Option<Self> {
        match suffix {
            "K1" => Some(Self::K1),
            "R1" => Some(Self::R1),
            "WA" => Some(Self::WA),
            _ => None,
        }
    }
}

impl std::fmt::Display for KeyType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.suffix())
    }
}
