//! The ABI document in its JSON and binary forms.
//!
//! # Binary format
//!
//! ```text
//! version: string
//! types: (new_type_name: string, type: string)[]
//! structs: (name: string, base: string, fields: (name: string, type: string)[])[]
//! actions: (name: name, type: string, ricardian_contract: string)[]
//! tables: (name: name, index_type: string, key_names: string[], key_types: string[], type: string)[]
//! ricardian_clauses: (id: string, body: string)[]
//! error_messages: (error_code: uint64, error_msg: string)[]
//! abi_extensions: (tag: uint16, value: bytes)[]
//! variants$: (name: string, types: string[])[]
//! action_results$: (name: name, result_type: string)[]
//! ```
//!
//! Sections after `error_messages` may be absent from older ABIs and default to empty. Data after
//! the last known section is skipped.

use crate::{name::Name, Config, Error};
use antelope_codec::{varint, EncodeSize, Error as CodecError, RangeCfg, Read, ReadExt, Write};
use antelope_utils::{from_hex, hex};
use bytes::{Buf, BufMut, Bytes};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use tracing::debug;

/// Prefix every supported ABI version starts with.
pub const VERSION_PREFIX: &str = "eosio::abi/1.";

/// An ABI document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AbiDef {
    pub version: String,
    pub types: Vec<TypeDef>,
    pub structs: Vec<StructDef>,
    pub actions: Vec<ActionDef>,
    pub tables: Vec<TableDef>,
    pub ricardian_clauses: Vec<ClausePair>,
    pub error_messages: Vec<ErrorMessage>,
    pub abi_extensions: Vec<AbiExtension>,
    pub variants: Vec<VariantDef>,
    pub action_results: Vec<ActionResultDef>,
}

/// A type alias.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDef {
    pub new_type_name: String,
    #[serde(rename = "type")]
    pub type_: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDef {
    pub name: String,
    #[serde(rename = "type")]
    pub type_: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructDef {
    pub name: String,
    /// Name of the base struct, or empty.
    #[serde(default)]
    pub base: String,
    pub fields: Vec<FieldDef>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionDef {
    pub name: Name,
    #[serde(rename = "type")]
    pub type_: String,
    #[serde(default)]
    pub ricardian_contract: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableDef {
    pub name: Name,
    #[serde(default)]
    pub index_type: String,
    #[serde(default)]
    pub key_names: Vec<String>,
    #[serde(default)]
    pub key_types: Vec<String>,
    #[serde(rename = "type")]
    pub type_: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClausePair {
    pub id: String,
    pub body: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorMessage {
    pub error_code: u64,
    pub error_msg: String,
}

/// An opaque extension, with its value written in JSON as hex.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbiExtension {
    pub tag: u16,
    #[serde(serialize_with = "to_hex", deserialize_with = "from_hex_str")]
    pub value: Vec<u8>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantDef {
    pub name: String,
    pub types: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionResultDef {
    pub name: Name,
    pub result_type: String,
}

fn to_hex<S: Serializer>(value: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&hex(value))
}

fn from_hex_str<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
    let text = String::deserialize(deserializer)?;
    from_hex(&text).ok_or_else(|| de::Error::custom("invalid hex"))
}

impl AbiDef {
    /// Parses a JSON ABI document.
    pub fn from_json(value: &Value) -> Result<Self, Error> {
        Self::deserialize(value).map_err(|err| Error::Schema(err.to_string()))
    }

    /// Parses a JSON ABI document from text.
    pub fn from_json_str(text: &str) -> Result<Self, Error> {
        serde_json::from_str(text).map_err(|err| Error::Schema(err.to_string()))
    }

    /// Converts this document to JSON.
    pub fn to_json(&self) -> Value {
        // Every field serializes to a string, number or array of those
        serde_json::to_value(self).unwrap_or(Value::Null)
    }

    /// Parses a binary ABI document, bounding every string and vector by `range`.
    pub fn from_bin(mut bytes: &[u8], range: &RangeCfg) -> Result<Self, Error> {
        Self::read_cfg(&mut bytes, range).map_err(|err| Error::Schema(err.to_string()))
    }

    /// Serializes this document to its binary form.
    pub fn to_bin(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.encode_size());
        self.write(&mut out);
        out
    }
}

/// Converts a JSON ABI document to its binary form.
pub fn abi_json_to_bin(value: &Value) -> Result<Vec<u8>, Error> {
    AbiDef::from_json(value).map(|abi| abi.to_bin())
}

/// Converts a binary ABI document to JSON.
pub fn abi_bin_to_json(bytes: &[u8]) -> Result<Value, Error> {
    let range = Config::default().abi_range();
    AbiDef::from_bin(bytes, &range).map(|abi| abi.to_json())
}

/// Implements the codec traits for a record of fields written in order.
macro_rules! impl_record {
    (@read $buf:ident, $range:ident, fixed) => {
        Read::read_cfg($buf, &())?
    };
    (@read $buf:ident, $range:ident, text) => {
        Read::read_cfg($buf, $range)?
    };
    (@read $buf:ident, $range:ident, list) => {
        Read::read_cfg($buf, &(*$range, *$range))?
    };
    ($type:ident { $($field:ident: $cfg:ident),* $(,)? }) => {
        impl Write for $type {
            fn write(&self, buf: &mut impl BufMut) {
                $(self.$field.write(buf);)*
            }
        }

        impl EncodeSize for $type {
            fn encode_size(&self) -> usize {
                0 $(+ self.$field.encode_size())*
            }
        }

        impl Read for $type {
            type Cfg = RangeCfg;

            fn read_cfg(buf: &mut impl Buf, range: &RangeCfg) -> Result<Self, CodecError> {
                Ok(Self {
                    $($field: impl_record!(@read buf, range, $cfg),)*
                })
            }
        }
    };
}

impl_record!(TypeDef { new_type_name: text, type_: text });
impl_record!(FieldDef { name: text, type_: text });
impl_record!(StructDef { name: text, base: text, fields: list });
impl_record!(ActionDef { name: fixed, type_: text, ricardian_contract: text });
impl_record!(TableDef {
    name: fixed,
    index_type: text,
    key_names: list,
    key_types: list,
    type_: text,
});
impl_record!(ClausePair { id: text, body: text });
impl_record!(ErrorMessage { error_code: fixed, error_msg: text });
impl_record!(VariantDef { name: text, types: list });
impl_record!(ActionResultDef { name: fixed, result_type: text });

impl Write for AbiExtension {
    fn write(&self, buf: &mut impl BufMut) {
        self.tag.write(buf);
        varint::write_len(self.value.len(), buf);
        buf.put_slice(&self.value);
    }
}

impl EncodeSize for AbiExtension {
    fn encode_size(&self) -> usize {
        self.tag.encode_size() + varint::len_size(self.value.len()) + self.value.len()
    }
}

impl Read for AbiExtension {
    type Cfg = RangeCfg;

    fn read_cfg(buf: &mut impl Buf, range: &RangeCfg) -> Result<Self, CodecError> {
        let tag = u16::read(buf)?;
        let value = Bytes::read_cfg(buf, range)?.to_vec();
        Ok(Self { tag, value })
    }
}

impl Write for AbiDef {
    fn write(&self, buf: &mut impl BufMut) {
        self.version.write(buf);
        self.types.write(buf);
        self.structs.write(buf);
        self.actions.write(buf);
        self.tables.write(buf);
        self.ricardian_clauses.write(buf);
        self.error_messages.write(buf);
        self.abi_extensions.write(buf);
        self.variants.write(buf);
        self.action_results.write(buf);
    }
}

impl EncodeSize for AbiDef {
    fn encode_size(&self) -> usize {
        self.version.encode_size()
            + self.types.encode_size()
            + self.structs.encode_size()
            + self.actions.encode_size()
            + self.tables.encode_size()
            + self.ricardian_clauses.encode_size()
            + self.error_messages.encode_size()
            + self.abi_extensions.encode_size()
            + self.variants.encode_size()
            + self.action_results.encode_size()
    }
}

/// Reads a trailing section, defaulting to empty when the buffer has ended.
fn read_section<T: Read<Cfg = RangeCfg>>(
    buf: &mut impl Buf,
    range: &RangeCfg,
) -> Result<Vec<T>, CodecError> {
    if !buf.has_remaining() {
        return Ok(Vec::new());
    }
    Vec::read_cfg(buf, &(*range, *range))
}

impl Read for AbiDef {
    type Cfg = RangeCfg;

    fn read_cfg(buf: &mut impl Buf, range: &RangeCfg) -> Result<Self, CodecError> {
        let list = (*range, *range);
        let abi = Self {
            version: String::read_cfg(buf, range)?,
            types: Vec::read_cfg(buf, &list)?,
            structs: Vec::read_cfg(buf, &list)?,
            actions: Vec::read_cfg(buf, &list)?,
            tables: Vec::read_cfg(buf, &list)?,
            ricardian_clauses: Vec::read_cfg(buf, &list)?,
            error_messages: Vec::read_cfg(buf, &list)?,
            abi_extensions: read_section(buf, range)?,
            variants: read_section(buf, range)?,
            action_results: read_section(buf, range)?,
        };
        let remaining = buf.remaining();
        if remaining > 0 {
            debug!(remaining, "skipping unknown abi sections");
            buf.advance(remaining);
        }
        Ok(abi)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn token_abi() -> Value {
        json!({
            "version": "eosio::abi/1.2",
            "types": [{ "new_type_name": "account_name", "type": "name" }],
            "structs": [{
                "name": "transfer",
                "base": "",
                "fields": [
                    { "name": "from", "type": "account_name" },
                    { "name": "to", "type": "account_name" },
                    { "name": "quantity", "type": "asset" },
                    { "name": "memo", "type": "string" }
                ]
            }],
            "actions": [{ "name": "transfer", "type": "transfer", "ricardian_contract": "" }],
            "tables": [{
                "name": "accounts",
                "index_type": "i64",
                "key_names": ["currency"],
                "key_types": ["uint64"],
                "type": "transfer"
            }],
            "ricardian_clauses": [{ "id": "terms", "body": "be nice" }],
            "error_messages": [{ "error_code": 7, "error_msg": "bad" }],
            "abi_extensions": [{ "tag": 1, "value": "00ff" }],
            "variants": [{ "name": "value", "types": ["int8", "string"] }],
            "action_results": [{ "name": "transfer", "result_type": "string" }]
        })
    }

    #[test]
    fn test_json_roundtrip() {
        let abi = AbiDef::from_json(&token_abi()).unwrap();
        assert_eq!(abi.structs[0].fields.len(), 4);
        assert_eq!(abi.actions[0].name.to_string(), "transfer");
        assert_eq!(abi.abi_extensions[0].value, vec![0x00, 0xff]);
        assert_eq!(abi.to_json(), token_abi());
    }

    #[test]
    fn test_missing_sections_default() {
        let abi = AbiDef::from_json(&json!({ "version": "eosio::abi/1.0" })).unwrap();
        assert!(abi.structs.is_empty());
        assert!(abi.variants.is_empty());
    }

    #[test]
    fn test_malformed_sections() {
        for value in [
            json!({ "version": "eosio::abi/1.0", "structs": {} }),
            json!({ "version": "eosio::abi/1.0", "structs": [{ "name": "a" }] }),
            json!({ "version": "eosio::abi/1.0", "actions": [{ "name": "BAD", "type": "a" }] }),
            json!({ "version": 1 }),
        ] {
            assert!(matches!(AbiDef::from_json(&value), Err(Error::Schema(_))));
        }
    }

    #[test]
    fn test_binary_roundtrip() {
        let abi = AbiDef::from_json(&token_abi()).unwrap();
        let bin = abi.to_bin();
        assert_eq!(bin.len(), abi.encode_size());
        assert_eq!(AbiDef::from_bin(&bin, &RangeCfg::default()).unwrap(), abi);
        assert_eq!(abi_bin_to_json(&abi_json_to_bin(&token_abi()).unwrap()).unwrap(), token_abi());
    }

    #[test]
    fn test_binary_without_extensions() {
        let abi = AbiDef {
            version: "eosio::abi/1.0".into(),
            ..Default::default()
        };
        // version, then seven empty vectors (no variants or action results)
        let mut bin = Vec::new();
        abi.version.write(&mut bin);
        bin.extend_from_slice(&[0; 7]);
        assert_eq!(AbiDef::from_bin(&bin, &RangeCfg::default()).unwrap(), abi);

        // Unknown trailing sections are skipped
        let mut extended = abi.to_bin();
        extended.extend_from_slice(&[1, 2, 3]);
        assert_eq!(AbiDef::from_bin(&extended, &RangeCfg::default()).unwrap(), abi);
    }

    #[test]
    fn test_binary_limits() {
        let abi = AbiDef::from_json(&token_abi()).unwrap();
        let bin = abi.to_bin();
        assert!(matches!(
            AbiDef::from_bin(&bin, &RangeCfg::from(..=4)),
            Err(Error::Schema(_))
        ));
        assert!(matches!(
            AbiDef::from_bin(&bin[..bin.len() / 2], &RangeCfg::default()),
            Err(Error::Schema(_))
        ));
    }
}
