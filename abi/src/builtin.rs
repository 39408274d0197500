//! JSON and binary forms of the built-in types.
//!
//! | type | JSON |
//! |---|---|
//! | `bool` | `true` / `false` |
//! | 8, 16 and 32-bit integers, `varint32`, `varuint32` | number (numeric strings are accepted) |
//! | 64 and 128-bit integers | decimal string (integral numbers are accepted) |
//! | `float32`, `float64` | number, or `"inf"`, `"-inf"`, `"NaN"` |
//! | `float128`, `checksum*`, `bytes` | hex string |
//! | `name`, `symbol`, `symbol_code`, `asset` | text form |
//! | `time_point`, `time_point_sec`, `block_timestamp_type` | `"2018-06-01T12:00:00.000"` |
//! | `public_key`, `signature` | `"PUB_K1_…"`, `"SIG_K1_…"` (legacy keys are accepted) |
//! | `extended_asset` | `{"quantity": asset, "contract": name}` |

use crate::{
    asset::{Asset, ExtendedAsset, Symbol, SymbolCode},
    error::{Fault, ParseError},
    name::Name,
    time::{BlockTimestamp, TimePoint, TimePointSec},
    types::Builtin,
    Config,
};
use antelope_codec::{
    varint::{self, VarInt32, VarUint32},
    RangeCfg, Read, ReadExt, Write,
};
use antelope_cryptography::{PublicKey, Signature};
use antelope_utils::{from_hex, hex};
use bytes::{BufMut, Bytes};
use serde_json::{json, Number, Value};
use std::{
    num::{IntErrorKind, ParseIntError},
    str::FromStr,
};

fn text<'v>(value: &'v Value, what: &str) -> Result<&'v str, Fault> {
    value
        .as_str()
        .ok_or_else(|| Fault::Format(format!("expected {what} string")))
}

fn parse_text<T: FromStr<Err = ParseError>>(value: &Value, what: &str) -> Result<T, Fault> {
    text(value, what)?.parse().map_err(Fault::from)
}

fn is_decimal(text: &str) -> bool {
    let digits = text.strip_prefix('-').unwrap_or(text);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

fn parse_int<T: FromStr<Err = ParseIntError>>(text: &str) -> Result<T, Fault> {
    text.parse().map_err(|err: ParseIntError| match err.kind() {
        IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => {
            Fault::Range(format!("number is out of range: {text}"))
        }
        // A well-formed negative number for an unsigned type
        _ if is_decimal(text) => Fault::Range(format!("number is out of range: {text}")),
        _ => Fault::Format(format!("expected number: {text}")),
    })
}

fn integer<T: FromStr<Err = ParseIntError>>(value: &Value) -> Result<T, Fault> {
    match value {
        Value::Number(number) => parse_int(&number.to_string()),
        Value::String(text) => parse_int(text),
        _ => Err(Fault::Format("expected number or numeric string".into())),
    }
}

fn float(value: &Value) -> Result<f64, Fault> {
    match value {
        Value::Number(number) => number
            .as_f64()
            .ok_or_else(|| Fault::Format(format!("expected float: {number}"))),
        Value::String(text) => text
            .parse()
            .map_err(|_| Fault::Format(format!("expected float: {text}"))),
        _ => Err(Fault::Format("expected number or numeric string".into())),
    }
}

fn float_value(value: f64) -> Value {
    Number::from_f64(value)
        .map(Value::Number)
        .unwrap_or_else(|| Value::String(value.to_string()))
}

fn hex_bytes(value: &Value, what: &str) -> Result<Vec<u8>, Fault> {
    let text = text(value, what)?;
    from_hex(text).ok_or_else(|| Fault::Format(format!("invalid hex in {what}")))
}

fn fixed_hex<const N: usize>(text: &str, what: &str) -> Result<[u8; N], Fault> {
    let bytes = from_hex(text).ok_or_else(|| Fault::Format(format!("invalid hex in {what}")))?;
    let len = bytes.len();
    bytes
        .try_into()
        .map_err(|_| Fault::Format(format!("{what} must be {N} bytes, got {len}")))
}

fn length_prefixed(bytes: &[u8], out: &mut Vec<u8>) -> Result<(), Fault> {
    if u32::try_from(bytes.len()).is_err() {
        return Err(Fault::Range(format!("length {} exceeds u32", bytes.len())));
    }
    varint::write_len(bytes.len(), out);
    out.put_slice(bytes);
    Ok(())
}

/// Appends the binary form of `value` as `builtin` to `out`.
pub(crate) fn encode(
    builtin: Builtin,
    value: &Value,
    out: &mut Vec<u8>,
    cfg: &Config,
) -> Result<(), Fault> {
    match builtin {
        Builtin::Bool => value
            .as_bool()
            .ok_or_else(|| Fault::Format("expected bool".into()))?
            .write(out),
        Builtin::Int8 => integer::<i8>(value)?.write(out),
        Builtin::Uint8 => integer::<u8>(value)?.write(out),
        Builtin::Int16 => integer::<i16>(value)?.write(out),
        Builtin::Uint16 => integer::<u16>(value)?.write(out),
        Builtin::Int32 => integer::<i32>(value)?.write(out),
        Builtin::Uint32 => integer::<u32>(value)?.write(out),
        Builtin::Int64 => integer::<i64>(value)?.write(out),
        Builtin::Uint64 => integer::<u64>(value)?.write(out),
        Builtin::Int128 => integer::<i128>(value)?.write(out),
        Builtin::Uint128 => integer::<u128>(value)?.write(out),
        Builtin::VarInt32 => VarInt32(integer(value)?).write(out),
        Builtin::VarUint32 => VarUint32(integer(value)?).write(out),
        Builtin::Float32 => {
            let wide = float(value)?;
            let narrow = wide as f32;
            if wide.is_finite() && !narrow.is_finite() {
                return Err(Fault::Range(format!("number is out of range: {wide}")));
            }
            narrow.write(out)
        }
        Builtin::Float64 => float(value)?.write(out),
        Builtin::Float128 => {
            let text = text(value, "float128")?;
            let text = text.strip_prefix("0x").unwrap_or(text);
            fixed_hex::<16>(text, "float128")?.write(out)
        }
        Builtin::TimePoint => parse_text::<TimePoint>(value, "time_point")?.write(out),
        Builtin::TimePointSec => parse_text::<TimePointSec>(value, "time_point_sec")?.write(out),
        Builtin::BlockTimestamp => {
            parse_text::<BlockTimestamp>(value, "block_timestamp_type")?.write(out)
        }
        Builtin::Name => parse_text::<Name>(value, "name")?.write(out),
        Builtin::Bytes => length_prefixed(&hex_bytes(value, "bytes")?, out)?,
        Builtin::String => length_prefixed(text(value, "string")?.as_bytes(), out)?,
        Builtin::Checksum160 => {
            fixed_hex::<20>(text(value, "checksum160")?, "checksum160")?.write(out)
        }
        Builtin::Checksum256 => {
            fixed_hex::<32>(text(value, "checksum256")?, "checksum256")?.write(out)
        }
        Builtin::Checksum512 => {
            fixed_hex::<64>(text(value, "checksum512")?, "checksum512")?.write(out)
        }
        Builtin::PublicKey => {
            let text = text(value, "public_key")?;
            PublicKey::parse(text, cfg.legacy_key_prefixes.as_slice())?.write(out)
        }
        Builtin::Signature => text(value, "signature")?.parse::<Signature>()?.write(out),
        Builtin::Symbol => parse_text::<Symbol>(value, "symbol")?.write(out),
        Builtin::SymbolCode => parse_text::<SymbolCode>(value, "symbol_code")?
            .value()
            .write(out),
        Builtin::Asset => parse_text::<Asset>(value, "asset")?.write(out),
        Builtin::ExtendedAsset => {
            let object = value
                .as_object()
                .ok_or_else(|| Fault::Format("expected extended_asset object".into()))?;
            let quantity = object.get("quantity").ok_or(Fault::Missing("quantity"))?;
            let contract = object.get("contract").ok_or(Fault::Missing("contract"))?;
            ExtendedAsset {
                quantity: parse_text(quantity, "asset")?,
                contract: parse_text(contract, "name")?,
            }
            .write(out)
        }
    }
    Ok(())
}

/// Reads a value of type `builtin` from the front of `buf`.
pub(crate) fn decode(builtin: Builtin, buf: &mut &[u8]) -> Result<Value, Fault> {
    let unbounded = RangeCfg::default();
    Ok(match builtin {
        Builtin::Bool => Value::Bool(bool::read(buf)?),
        Builtin::Int8 => i8::read(buf)?.into(),
        Builtin::Uint8 => u8::read(buf)?.into(),
        Builtin::Int16 => i16::read(buf)?.into(),
        Builtin::Uint16 => u16::read(buf)?.into(),
        Builtin::Int32 => i32::read(buf)?.into(),
        Builtin::Uint32 => u32::read(buf)?.into(),
        Builtin::Int64 => i64::read(buf)?.to_string().into(),
        Builtin::Uint64 => u64::read(buf)?.to_string().into(),
        Builtin::Int128 => i128::read(buf)?.to_string().into(),
        Builtin::Uint128 => u128::read(buf)?.to_string().into(),
        Builtin::VarInt32 => VarInt32::read(buf)?.0.into(),
        Builtin::VarUint32 => VarUint32::read(buf)?.0.into(),
        Builtin::Float32 => {
            // Go through the shortest text form so 0.1f32 reads back as 0.1
            let narrow = f32::read(buf)?;
            float_value(
                narrow
                    .to_string()
                    .parse()
                    .unwrap_or_else(|_| f64::from(narrow)),
            )
        }
        Builtin::Float64 => float_value(f64::read(buf)?),
        Builtin::Float128 => hex(&<[u8; 16]>::read(buf)?).into(),
        Builtin::TimePoint => {
            let point = TimePoint::read(buf)?;
            if point.to_datetime().is_none() {
                return Err(Fault::Range(format!(
                    "time_point out of range: {}",
                    point.micros()
                )));
            }
            point.to_string().into()
        }
        Builtin::TimePointSec => TimePointSec::read(buf)?.to_string().into(),
        Builtin::BlockTimestamp => BlockTimestamp::read(buf)?.to_string().into(),
        Builtin::Name => Name::read(buf)?.to_string().into(),
        Builtin::Bytes => hex(&Bytes::read_cfg(buf, &unbounded)?).into(),
        Builtin::String => String::read_cfg(buf, &unbounded)?.into(),
        Builtin::Checksum160 => hex(&<[u8; 20]>::read(buf)?).into(),
        Builtin::Checksum256 => hex(&<[u8; 32]>::read(buf)?).into(),
        Builtin::Checksum512 => hex(&<[u8; 64]>::read(buf)?).into(),
        Builtin::PublicKey => PublicKey::read_cfg(buf, &unbounded)?.to_string().into(),
        Builtin::Signature => Signature::read_cfg(buf, &unbounded)?.to_string().into(),
        Builtin::Symbol => Symbol::read(buf)?.to_string().into(),
        Builtin::SymbolCode => SymbolCode::from_u64(u64::read(buf)?)?.to_string().into(),
        Builtin::Asset => Asset::read(buf)?.to_string().into(),
        Builtin::ExtendedAsset => {
            let extended = ExtendedAsset::read(buf)?;
            json!({
                "quantity": extended.quantity.to_string(),
                "contract": extended.contract.to_string(),
            })
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn roundtrip(builtin: Builtin, value: Value) -> Vec<u8> {
        let mut out = Vec::new();
        encode(builtin, &value, &mut out, &Config::default()).unwrap();
        let mut buf = &out[..];
        assert_eq!(decode(builtin, &mut buf).unwrap(), value);
        assert!(buf.is_empty());
        out
    }

    fn encode_err(builtin: Builtin, value: Value) -> Fault {
        let mut out = Vec::new();
        encode(builtin, &value, &mut out, &Config::default()).unwrap_err()
    }

    #[test]
    fn test_integers() {
        assert_eq!(roundtrip(Builtin::Int8, json!(-128)), [0x80]);
        assert_eq!(roundtrip(Builtin::Uint16, json!(513)), [0x01, 0x02]);
        assert_eq!(
            roundtrip(Builtin::Uint64, json!("18446744073709551615")),
            [0xff; 8]
        );
        assert_eq!(roundtrip(Builtin::Int64, json!("-1")), [0xff; 8]);
        assert_eq!(
            roundtrip(
                Builtin::Int128,
                json!("-170141183460469231731687303715884105728")
            )
            .len(),
            16
        );
        assert_eq!(roundtrip(Builtin::VarUint32, json!(300)), [0xac, 0x02]);
        assert_eq!(roundtrip(Builtin::VarInt32, json!(-1)), [0x01]);
    }

    #[test]
    fn test_integer_input_forms() {
        let mut out = Vec::new();
        encode(Builtin::Int32, &json!("-5"), &mut out, &Config::default()).unwrap();
        encode(Builtin::Uint64, &json!(7), &mut out, &Config::default()).unwrap();
        assert_eq!(out, [0xfb, 0xff, 0xff, 0xff, 7, 0, 0, 0, 0, 0, 0, 0]);
    }

    #[test_case(Builtin::Int8, json!(128); "int8 above")]
    #[test_case(Builtin::Int8, json!(-129); "int8 below")]
    #[test_case(Builtin::Uint64, json!("-1"); "uint64 negative")]
    #[test_case(Builtin::Uint64, json!("18446744073709551616"); "uint64 above")]
    #[test_case(Builtin::VarUint32, json!(4294967296u64); "varuint32 above")]
    #[test_case(Builtin::Float32, json!(1e300); "float32 above")]
    fn test_out_of_range(builtin: Builtin, value: Value) {
        assert!(matches!(encode_err(builtin, value), Fault::Range(_)));
    }

    #[test_case(Builtin::Int8, json!("ten"); "word")]
    #[test_case(Builtin::Int8, json!(1.5); "fraction")]
    #[test_case(Builtin::Int8, json!(true); "bool")]
    #[test_case(Builtin::Bool, json!(1); "bool from number")]
    #[test_case(Builtin::Name, json!("Alice"); "uppercase name")]
    #[test_case(Builtin::Asset, json!("1.0000"); "asset without symbol")]
    #[test_case(Builtin::Bytes, json!("abc"); "odd hex")]
    #[test_case(Builtin::Checksum256, json!("00"); "short checksum")]
    #[test_case(Builtin::TimePoint, json!("noon"); "bad time")]
    #[test_case(Builtin::PublicKey, json!("PUB_K1_6MRyAjQq8ud7hVNYcfnVPJqcVpscN5So8BhtHuGYqET5BoDq64"); "bad checksum")]
    #[test_case(Builtin::Signature, json!("EOS6MRyAjQq8ud7hVNYcfnVPJqcVpscN5So8BhtHuGYqET5GDW5CV"); "signature prefix")]
    fn test_malformed(builtin: Builtin, value: Value) {
        assert!(matches!(encode_err(builtin, value), Fault::Format(_)));
    }

    #[test]
    fn test_floats() {
        assert_eq!(roundtrip(Builtin::Float64, json!(1.5)), 1.5f64.to_le_bytes());
        assert_eq!(roundtrip(Builtin::Float32, json!(0.1)), 0.1f32.to_le_bytes());
        roundtrip(Builtin::Float64, json!("inf"));
        roundtrip(Builtin::Float32, json!("NaN"));
    }

    #[test]
    fn test_text_types() {
        assert_eq!(
            roundtrip(Builtin::Name, json!("eosio.token")),
            [0x00, 0xa6, 0x82, 0x34, 0x03, 0xea, 0x30, 0x55]
        );
        assert_eq!(roundtrip(Builtin::Name, json!("")), [0; 8]);
        roundtrip(Builtin::Symbol, json!("4,EOS"));
        assert_eq!(
            roundtrip(Builtin::SymbolCode, json!("EOS")),
            [b'E', b'O', b'S', 0, 0, 0, 0, 0]
        );
        roundtrip(Builtin::Asset, json!("-12.345 ABC"));
        roundtrip(Builtin::TimePoint, json!("2018-06-01T12:00:00.000"));
        roundtrip(Builtin::TimePointSec, json!("2018-06-01T12:00:00.000"));
        roundtrip(Builtin::BlockTimestamp, json!("2018-06-01T12:00:00.500"));
        assert_eq!(
            roundtrip(
                Builtin::ExtendedAsset,
                json!({ "quantity": "1.0000 EOS", "contract": "eosio.token" })
            )
            .len(),
            24
        );
        assert_eq!(
            encode_err(Builtin::ExtendedAsset, json!({ "quantity": "1.0000 EOS" })),
            Fault::Missing("contract")
        );
    }

    #[test]
    fn test_bytes_and_checksums() {
        assert_eq!(roundtrip(Builtin::Bytes, json!("00ff")), [0x02, 0x00, 0xff]);
        assert_eq!(roundtrip(Builtin::String, json!("hé")), [0x03, b'h', 0xc3, 0xa9]);
        roundtrip(Builtin::Checksum160, json!("9c1185a5c5e9fc54612808977ee8f548b2258d31"));
        roundtrip(Builtin::Checksum256, json!("00".repeat(32)));
        roundtrip(Builtin::Checksum512, json!("ab".repeat(64)));
        roundtrip(Builtin::Float128, json!("0102030405060708090a0b0c0d0e0f10"));

        let mut out = Vec::new();
        encode(
            Builtin::Float128,
            &json!("0x0102030405060708090A0B0C0D0E0F10"),
            &mut out,
            &Config::default(),
        )
        .unwrap();
        assert_eq!(out, (1..=16).collect::<Vec<u8>>());
    }

    #[test]
    fn test_keys() {
        let key = json!("PUB_K1_6MRyAjQq8ud7hVNYcfnVPJqcVpscN5So8BhtHuGYqET5BoDq63");
        assert_eq!(roundtrip(Builtin::PublicKey, key.clone()).len(), 34);

        let mut out = Vec::new();
        encode(
            Builtin::PublicKey,
            &json!("EOS6MRyAjQq8ud7hVNYcfnVPJqcVpscN5So8BhtHuGYqET5GDW5CV"),
            &mut out,
            &Config::default(),
        )
        .unwrap();
        assert_eq!(decode(Builtin::PublicKey, &mut &out[..]).unwrap(), key);

        let signature = json!("SIG_K1_JuPRYrQuGBoWkbrwZ1uLuiwG19vUfL1LRkPryc8sD7QprezRWyZLsjBzyxuTZFJHeu784LNVdTNs2YQPq289cYMGcpTXAS");
        assert_eq!(roundtrip(Builtin::Signature, signature).len(), 66);
    }

    #[test]
    fn test_decode_errors() {
        assert_eq!(decode(Builtin::Uint32, &mut &[1, 2][..]), Err(Fault::Overrun));
        assert!(matches!(
            decode(Builtin::Bool, &mut &[2][..]),
            Err(Fault::Format(_))
        ));
        assert!(matches!(
            decode(Builtin::String, &mut &[2, 0xff, 0xfe][..]),
            Err(Fault::Format(_))
        ));
        assert_eq!(decode(Builtin::String, &mut &[5, b'a'][..]), Err(Fault::Overrun));
        assert!(matches!(
            decode(Builtin::VarUint32, &mut &[0xff, 0xff, 0xff, 0xff, 0xff, 0x01][..]),
            Err(Fault::Format(_))
        ));
        assert!(matches!(
            decode(Builtin::Symbol, &mut &[4, b'e', 0, 0, 0, 0, 0, 0][..]),
            Err(Fault::Format(_))
        ));
        assert!(matches!(
            decode(Builtin::TimePoint, &mut &i64::MAX.to_le_bytes()[..]),
            Err(Fault::Range(_))
        ));
        assert!(matches!(
            decode(Builtin::PublicKey, &mut &[9; 34][..]),
            Err(Fault::Format(_))
        ));
    }
}
