//! Convert JSON values into the binary format.

use crate::{
    builtin,
    path::Path,
    resolver::Resolved,
    types::{Type, TypeId},
    Config, Error,
};
use antelope_codec::{varint, Write};
use serde_json::Value;

struct Encoder<'a> {
    resolved: &'a Resolved,
    cfg: &'a Config,
    path: Path<'a>,
    out: Vec<u8>,
}

/// Encodes `value` as the root type of `resolved`.
pub(crate) fn encode(resolved: &Resolved, value: &Value, cfg: &Config) -> Result<Vec<u8>, Error> {
    let mut encoder = Encoder {
        resolved,
        cfg,
        path: Path::default(),
        out: Vec::new(),
    };
    encoder.encode(resolved.root(), value, 0)?;
    Ok(encoder.out)
}

impl<'a> Encoder<'a> {
    fn format(&self, detail: impl Into<String>) -> Error {
        Error::Format {
            path: self.path.to_string(),
            detail: detail.into(),
        }
    }

    fn encode(&mut self, id: TypeId, value: &Value, depth: usize) -> Result<(), Error> {
        if depth > self.cfg.max_depth {
            return Err(Error::RecursionLimit {
                path: self.path.to_string(),
            });
        }
        let resolved = self.resolved;
        match resolved.get(id) {
            Type::Builtin(kind) => builtin::encode(*kind, value, &mut self.out, self.cfg)
                .map_err(|fault| fault.at(&self.path))?,
            Type::Alias { target, .. } => self.encode(*target, value, depth + 1)?,
            Type::Array(element) => {
                let items = value
                    .as_array()
                    .ok_or_else(|| self.format("expected array"))?;
                if u32::try_from(items.len()).is_err() {
                    return Err(self.format("array too long"));
                }
                if resolved.is_zero_size(*element) && items.len() > self.cfg.max_zero_size_elements
                {
                    return Err(Error::Range {
                        path: self.path.to_string(),
                        detail: format!("{} elements of a zero-size type", items.len()),
                    });
                }
                varint::write_len(items.len(), &mut self.out);
                for (i, item) in items.iter().enumerate() {
                    self.path.push_index(i);
                    self.encode(*element, item, depth + 1)?;
                    self.path.pop();
                }
            }
            Type::Optional(element) => {
                if value.is_null() {
                    false.write(&mut self.out);
                } else {
                    true.write(&mut self.out);
                    self.encode(*element, value, depth + 1)?;
                }
            }
            Type::Extension(element) => self.encode(*element, value, depth + 1)?,
            Type::Struct { name, fields, .. } => {
                let object = value
                    .as_object()
                    .ok_or_else(|| self.format(format!("expected object for struct '{name}'")))?;

                // Binary extensions may be left out, but only as a suffix of the field list
                let mut omitted: Option<&str> = None;
                for field in fields {
                    let Some(item) = object.get(&field.name) else {
                        if matches!(resolved.get(field.ty), Type::Extension(_)) {
                            omitted.get_or_insert(&field.name);
                            continue;
                        }
                        return Err(Error::MissingField {
                            path: self.path.to_string(),
                            field: field.name.clone(),
                        });
                    };
                    if let Some(missing) = omitted {
                        return Err(self.format(format!(
                            "field '{}' is present but earlier extension '{missing}' is not",
                            field.name
                        )));
                    }
                    self.path.push_field(&field.name);
                    self.encode(field.ty, item, depth + 1)?;
                    self.path.pop();
                }
            }
            Type::Variant { name, members } => {
                let pair = value
                    .as_array()
                    .filter(|pair| pair.len() == 2)
                    .ok_or_else(|| {
                        self.format(format!("expected [type, value] for variant '{name}'"))
                    })?;
                let member = pair[0].as_str().ok_or_else(|| {
                    self.format(format!("expected type name string for variant '{name}'"))
                })?;
                let index = members
                    .iter()
                    .position(|(candidate, _)| candidate == member)
                    .ok_or_else(|| Error::not_found("variant member", format!("{name}.{member}")))?;
                varint::write_len(index, &mut self.out);
                self.encode(members[index].1, &pair[1], depth + 1)?;
            }
        }
        Ok(())
    }
}
