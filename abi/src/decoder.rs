//! Convert the binary format into JSON values.

use crate::{
    builtin,
    path::Path,
    resolver::Resolved,
    types::{Type, TypeId},
    Config, Error,
};
use antelope_codec::{varint, RangeCfg, Read, ReadExt};
use bytes::Buf;
use serde_json::{Map, Value};

struct Decoder<'a, 'b> {
    resolved: &'a Resolved,
    cfg: &'a Config,
    path: Path<'a>,
    buf: &'b [u8],
}

/// Decodes the root type of `resolved` from the front of `bytes`, returning the value and the
/// number of bytes consumed.
pub(crate) fn decode(
    resolved: &Resolved,
    bytes: &[u8],
    cfg: &Config,
) -> Result<(Value, usize), Error> {
    let mut decoder = Decoder {
        resolved,
        cfg,
        path: Path::default(),
        buf: bytes,
    };
    let value = decoder.decode(resolved.root(), 0)?;
    Ok((value, bytes.len() - decoder.buf.len()))
}

impl Decoder<'_, '_> {
    fn format(&self, detail: impl Into<String>) -> Error {
        Error::Format {
            path: self.path.to_string(),
            detail: detail.into(),
        }
    }

    fn read_len(&mut self) -> Result<usize, Error> {
        varint::read_len(&mut self.buf, &RangeCfg::default()).map_err(|err| match err {
            antelope_codec::Error::EndOfBuffer => Error::StreamOverrun {
                path: self.path.to_string(),
            },
            err => self.format(err.to_string()),
        })
    }

    fn decode(&mut self, id: TypeId, depth: usize) -> Result<Value, Error> {
        if depth > self.cfg.max_depth {
            return Err(Error::RecursionLimit {
                path: self.path.to_string(),
            });
        }
        let resolved = self.resolved;
        let value = match resolved.get(id) {
            Type::Builtin(kind) => {
                builtin::decode(*kind, &mut self.buf).map_err(|fault| fault.at(&self.path))?
            }
            Type::Alias { target, .. } => self.decode(*target, depth + 1)?,
            Type::Array(element) => {
                let len = self.read_len()?;

                // Refuse counts that cannot possibly be satisfied before allocating for them
                if resolved.is_zero_size(*element) {
                    if len > self.cfg.max_zero_size_elements {
                        return Err(Error::Range {
                            path: self.path.to_string(),
                            detail: format!("{len} elements of a zero-size type"),
                        });
                    }
                } else if len > self.buf.remaining() {
                    return Err(Error::StreamOverrun {
                        path: self.path.to_string(),
                    });
                }
                let mut items = Vec::with_capacity(len);
                for i in 0..len {
                    self.path.push_index(i);
                    items.push(self.decode(*element, depth + 1)?);
                    self.path.pop();
                }
                Value::Array(items)
            }
            Type::Optional(element) => match u8::read(&mut self.buf) {
                Ok(0) => Value::Null,
                Ok(1) => self.decode(*element, depth + 1)?,
                Ok(flag) => return Err(self.format(format!("invalid optional flag {flag}"))),
                Err(_) => {
                    return Err(Error::StreamOverrun {
                        path: self.path.to_string(),
                    })
                }
            },
            Type::Extension(element) => {
                if self.buf.is_empty() {
                    Value::Null
                } else {
                    self.decode(*element, depth + 1)?
                }
            }
            Type::Struct { fields, .. } => {
                let mut object = Map::with_capacity(fields.len());
                for field in fields {
                    // Binary extensions end the struct when the data runs out
                    if self.buf.is_empty() && matches!(resolved.get(field.ty), Type::Extension(_))
                    {
                        break;
                    }
                    self.path.push_field(&field.name);
                    let item = self.decode(field.ty, depth + 1)?;
                    self.path.pop();
                    object.insert(field.name.clone(), item);
                }
                Value::Object(object)
            }
            Type::Variant { name, members } => {
                let index = self.read_len()?;
                let (member, ty) = members.get(index).ok_or_else(|| {
                    self.format(format!("invalid index {index} for variant '{name}'"))
                })?;
                let item = self.decode(*ty, depth + 1)?;
                Value::Array(vec![Value::String(member.clone()), item])
            }
        };
        Ok(value)
    }
}
