//! Read and write the Antelope binary wire format.
//!
//! # Overview
//!
//! Antelope nodes exchange action data, table rows and ABI documents in a compact binary format:
//! - Fixed-width integers and floats are written little-endian
//! - Lengths, element counts and variant tags are written as LEB128 varints (`varuint32`)
//! - Strings and byte blobs are length-prefixed
//! - Optional values are prefixed by a presence byte
//!
//! This crate provides the building blocks used to read that format from untrusted input and
//! to write it back out: the [Write], [Read] and [EncodeSize] traits, implementations for the
//! primitives the format supports, and the [varint] helpers. Reads of variable-length values
//! take a [RangeCfg] so callers can bound allocations driven by attacker-controlled lengths.
//!
//! # Example
//!
//! ```
//! use bytes::{Buf, BufMut};
//! use antelope_codec::{Decode, Encode, EncodeSize, Error, RangeCfg, Read, ReadExt, Write};
//!
//! #[derive(Debug, PartialEq)]
//! struct Permission {
//!     weight: u16,
//!     label: String,
//! }
//!
//! impl Write for Permission {
//!     fn write(&self, buf: &mut impl BufMut) {
//!         self.weight.write(buf);
//!         self.label.write(buf);
//!     }
//! }
//!
//! impl EncodeSize for Permission {
//!     fn encode_size(&self) -> usize {
//!         self.weight.encode_size() + self.label.encode_size()
//!     }
//! }
//!
//! impl Read for Permission {
//!     type Cfg = RangeCfg;
//!
//!     fn read_cfg(buf: &mut impl Buf, cfg: &RangeCfg) -> Result<Self, Error> {
//!         let weight = u16::read(buf)?;
//!         let label = String::read_cfg(buf, cfg)?;
//!         Ok(Self { weight, label })
//!     }
//! }
//!
//! let permission = Permission { weight: 1, label: "active".to_string() };
//! let encoded = permission.encode();
//! assert_eq!(&encoded[..], &[0x01, 0x00, 0x06, b'a', b'c', b't', b'i', b'v', b'e']);
//! let decoded = Permission::decode_cfg(encoded, &(..=64).into()).unwrap();
//! assert_eq!(permission, decoded);
//! ```

pub mod codec;
pub mod config;
pub mod error;
pub mod types;
pub mod util;
pub mod varint;

// Re-export main types and traits
pub use codec::{Decode, DecodeExt, Encode, EncodeSize, FixedSize, Read, ReadExt, Write};
pub use config::RangeCfg;
pub use error::Error;
