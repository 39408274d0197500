//! Errors returned by registration, resolution, encoding and decoding.

use std::fmt;
use thiserror::Error;

/// Errors that can occur when working with a [crate::Registry].
///
/// Encode and decode errors carry the path of the value being processed when the error occurred
/// (for example `transfer.quantity` or `actions[2].data`). The root value has an empty path.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("invalid abi: {0}")]
    Schema(String),
    #[error("{kind} not found: {name}")]
    NotFound { kind: &'static str, name: String },
    #[error("out of range at '{path}': {detail}")]
    Range { path: String, detail: String },
    #[error("invalid format at '{path}': {detail}")]
    Format { path: String, detail: String },
    #[error("expected field '{field}' at '{path}'")]
    MissingField { path: String, field: String },
    #[error("stream overrun at '{path}'")]
    StreamOverrun { path: String },
    #[error("recursion limit reached at '{path}'")]
    RecursionLimit { path: String },
}

/// The category of an [Error].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Schema,
    NotFound,
    Range,
    Format,
    MissingField,
    StreamOverrun,
    RecursionLimit,
}

impl Error {
    /// Returns the category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Schema(_) => ErrorKind::Schema,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Range { .. } => ErrorKind::Range,
            Self::Format { .. } => ErrorKind::Format,
            Self::MissingField { .. } => ErrorKind::MissingField,
            Self::StreamOverrun { .. } => ErrorKind::StreamOverrun,
            Self::RecursionLimit { .. } => ErrorKind::RecursionLimit,
        }
    }

    pub(crate) fn not_found(kind: &'static str, name: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            name: name.into(),
        }
    }

    pub(crate) fn format(detail: impl Into<String>) -> Self {
        Self::Format {
            path: String::new(),
            detail: detail.into(),
        }
    }
}

/// Errors produced when parsing the text form of names, symbols, assets and times.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("invalid name: {0}")]
    Name(String),
    #[error("invalid symbol: {0}")]
    Symbol(String),
    #[error("invalid asset: {0}")]
    Asset(String),
    #[error("asset amount out of range: {0}")]
    AmountOutOfRange(String),
    #[error("invalid time: {0}")]
    Time(String),
    #[error("time out of range: {0}")]
    TimeOutOfRange(String),
}

/// A failure at a single value, before the path of that value is known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Fault {
    Range(String),
    Format(String),
    Missing(&'static str),
    Overrun,
}

impl Fault {
    /// Attaches the path of the offending value.
    pub(crate) fn at(self, path: &impl fmt::Display) -> Error {
        let path = path.to_string();
        match self {
            Self::Range(detail) => Error::Range { path, detail },
            Self::Format(detail) => Error::Format { path, detail },
            Self::Missing(field) => Error::MissingField {
                path,
                field: field.to_string(),
            },
            Self::Overrun => Error::StreamOverrun { path },
        }
    }
}

impl From<ParseError> for Fault {
    fn from(err: ParseError) -> Self {
        match err {
            ParseError::AmountOutOfRange(_) | ParseError::TimeOutOfRange(_) => {
                Self::Range(err.to_string())
            }
            _ => Self::Format(err.to_string()),
        }
    }
}

impl From<antelope_codec::Error> for Fault {
    fn from(err: antelope_codec::Error) -> Self {
        match err {
            antelope_codec::Error::EndOfBuffer => Self::Overrun,
            err => Self::Format(err.to_string()),
        }
    }
}

impl From<antelope_cryptography::Error> for Fault {
    fn from(err: antelope_cryptography::Error) -> Self {
        match err {
            antelope_cryptography::Error::Codec(err) => err.into(),
            err => Self::Format(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fault_paths() {
        let err = Fault::Range("number is out of range".into()).at(&"s1.x1");
        assert_eq!(err.kind(), ErrorKind::Range);
        assert_eq!(
            err.to_string(),
            "out of range at 's1.x1': number is out of range"
        );

        let err = Fault::Missing("contract").at(&"quantity");
        assert_eq!(
            err,
            Error::MissingField {
                path: "quantity".into(),
                field: "contract".into()
            }
        );
    }

    #[test]
    fn test_codec_errors() {
        assert_eq!(
            Fault::from(antelope_codec::Error::EndOfBuffer),
            Fault::Overrun
        );
        assert!(matches!(
            Fault::from(antelope_codec::Error::InvalidBool),
            Fault::Format(_)
        ));
        assert!(matches!(
            Fault::from(ParseError::AmountOutOfRange("1".into())),
            Fault::Range(_)
        ));
    }
}
