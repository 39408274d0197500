//! Account, action and table names.
//!
//! A name is up to 13 characters from `.12345abcdefghijklmnopqrstuvwxyz` packed into a `u64`.
//! The first 12 characters take 5 bits each, starting from the most significant bit, and the
//! 13th character takes the remaining 4 bits (so it is limited to `.12345abcdefghij`).
//!
//! Only canonical text is accepted: a string parses if and only if printing the packed value
//! reproduces it exactly. Trailing dots are therefore rejected (`"abc."` would print as
//! `"abc"`).

use crate::error::ParseError;
use antelope_codec::{Error as CodecError, FixedSize, Read, ReadExt, Write};
use bytes::{Buf, BufMut};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::{fmt, str::FromStr};

const CHARMAP: &[u8; 32] = b".12345abcdefghijklmnopqrstuvwxyz";

/// Maximum length of a name.
pub const MAX_LENGTH: usize = 13;

/// A packed name.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Name(u64);

impl Name {
    /// Wraps a packed value. Every `u64` is a valid name.
    pub const fn from_u64(value: u64) -> Self {
        Self(value)
    }

    /// Returns the packed value.
    pub const fn value(self) -> u64 {
        self.0
    }
}

fn symbol(c: u8) -> Option<u64> {
    match c {
        b'.' => Some(0),
        b'1'..=b'5' => Some(u64::from(c - b'1') + 1),
        b'a'..=b'z' => Some(u64::from(c - b'a') + 6),
        _ => None,
    }
}

impl FromStr for Name {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() > MAX_LENGTH {
            return Err(ParseError::Name(s.to_string()));
        }
        let mut value = 0u64;
        for (i, c) in s.bytes().enumerate() {
            let sym = symbol(c).ok_or_else(|| ParseError::Name(s.to_string()))?;
            if i < MAX_LENGTH - 1 {
                value |= sym << (64 - 5 * (i + 1));
            } else if sym > 0x0f {
                return Err(ParseError::Name(s.to_string()));
            } else {
                value |= sym;
            }
        }

        // Reject anything that would not print back identically
        let name = Self(value);
        if name.to_string() != s {
            return Err(ParseError::Name(s.to_string()));
        }
        Ok(name)
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = [b'.'; MAX_LENGTH];
        let mut rest = self.0;
        for i in 0..MAX_LENGTH {
            let (mask, shift) = if i == 0 { (0x0f, 4) } else { (0x1f, 5) };
            out[MAX_LENGTH - 1 - i] = CHARMAP[(rest & mask) as usize];
            rest >>= shift;
        }
        let len = out
            .iter()
            .rposition(|&c| c != b'.')
            .map_or(0, |last| last + 1);
        for &c in &out[..len] {
            fmt::Write::write_char(f, c as char)?;
        }
        Ok(())
    }
}

impl Write for Name {
    fn write(&self, buf: &mut impl BufMut) {
        buf.put_u64_le(self.0);
    }
}

impl FixedSize for Name {
    const SIZE: usize = u64::SIZE;
}

impl Read for Name {
    type Cfg = ();

    fn read_cfg(buf: &mut impl Buf, _: &()) -> Result<Self, CodecError> {
        Ok(Self(u64::read(buf)?))
    }
}

impl Serialize for Name {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Name {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use antelope_codec::{DecodeExt, Encode};
    use test_case::test_case;

    #[test_case("", 0; "empty")]
    #[test_case("a", 0x3000000000000000; "single")]
    #[test_case("alice", 0x345c850000000000; "alice")]
    #[test_case("eosio", 0x5530ea0000000000; "eosio")]
    #[test_case("eosio.token", 0x5530ea033482a600; "dotted")]
    #[test_case("zzzzzzzzzzzzj", u64::MAX; "max")]
    fn test_name_vectors(text: &str, value: u64) {
        let name: Name = text.parse().unwrap();
        assert_eq!(name.value(), value);
        assert_eq!(name.to_string(), text);
    }

    #[test_case("abc."; "trailing dot")]
    #[test_case("ABC"; "uppercase")]
    #[test_case("abc6"; "digit out of charset")]
    #[test_case("aaaaaaaaaaaaaa"; "too long")]
    #[test_case("aaaaaaaaaaaaz"; "thirteenth char out of range")]
    #[test_case("."; "only dot")]
    fn test_name_rejected(text: &str) {
        assert_eq!(
            text.parse::<Name>(),
            Err(ParseError::Name(text.to_string()))
        );
    }

    #[test]
    fn test_name_binary() {
        let name: Name = "eosio.token".parse().unwrap();
        let encoded = name.encode();
        assert_eq!(&encoded[..], &[0x00, 0xa6, 0x82, 0x34, 0x03, 0xea, 0x30, 0x55]);
        assert_eq!(Name::decode(encoded).unwrap(), name);
    }

    #[test]
    fn test_name_serde() {
        let name: Name = serde_json::from_str("\"transfer\"").unwrap();
        assert_eq!(name.to_string(), "transfer");
        assert_eq!(serde_json::to_string(&name).unwrap(), "\"transfer\"");
        assert!(serde_json::from_str::<Name>("\"Transfer\"").is_err());
    }
}
