//! Points in time.
//!
//! All three types are written in JSON as UTC `YYYY-MM-DDTHH:MM:SS.mmm` (six fractional digits when
//! the value has sub-millisecond precision). Parsing accepts any number of fractional digits (or
//! none) and an optional trailing `Z`.

use crate::error::ParseError;
use antelope_codec::{Error as CodecError, FixedSize, Read, ReadExt, Write};
use bytes::{Buf, BufMut};
use chrono::{DateTime, NaiveDateTime, Utc};
use std::{fmt, str::FromStr};

const INPUT_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";
const MILLIS_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f";
const MICROS_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

/// Milliseconds between the Unix epoch and the first block timestamp slot
/// (`2000-01-01T00:00:00.000`).
pub const BLOCK_TIMESTAMP_EPOCH_MS: i64 = 946_684_800_000;

/// Length of a block timestamp slot.
pub const BLOCK_INTERVAL_MS: i64 = 500;

fn parse_micros(s: &str) -> Result<i64, ParseError> {
    let text = s.strip_suffix('Z').unwrap_or(s);
    let parsed = NaiveDateTime::parse_from_str(text, INPUT_FORMAT)
        .map_err(|_| ParseError::Time(s.to_string()))?;
    Ok(parsed.and_utc().timestamp_micros())
}

fn write_datetime(f: &mut fmt::Formatter<'_>, dt: DateTime<Utc>) -> fmt::Result {
    let format = if dt.timestamp_subsec_micros() % 1000 == 0 {
        MILLIS_FORMAT
    } else {
        MICROS_FORMAT
    };
    write!(f, "{}", dt.format(format))
}

/// Microseconds since the Unix epoch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimePoint(i64);

impl TimePoint {
    pub const fn from_micros(micros: i64) -> Self {
        Self(micros)
    }

    pub const fn micros(self) -> i64 {
        self.0
    }

    /// Returns the calendar time, or `None` if it cannot be represented.
    pub fn to_datetime(self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_micros(self.0)
    }
}

impl FromStr for TimePoint {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_micros(s).map(Self)
    }
}

impl fmt::Display for TimePoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_datetime() {
            Some(dt) => write_datetime(f, dt),
            None => write!(f, "{}", self.0),
        }
    }
}

/// Seconds since the Unix epoch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimePointSec(u32);

impl TimePointSec {
    pub const fn from_secs(secs: u32) -> Self {
        Self(secs)
    }

    pub const fn secs(self) -> u32 {
        self.0
    }
}

impl FromStr for TimePointSec {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let secs = parse_micros(s)?.div_euclid(1_000_000);
        u32::try_from(secs)
            .map(Self)
            .map_err(|_| ParseError::TimeOutOfRange(s.to_string()))
    }
}

impl fmt::Display for TimePointSec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match DateTime::from_timestamp(i64::from(self.0), 0) {
            Some(dt) => write_datetime(f, dt),
            None => write!(f, "{}", self.0),
        }
    }
}

/// Half-second slots since [BLOCK_TIMESTAMP_EPOCH_MS].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockTimestamp(u32);

impl BlockTimestamp {
    pub const fn from_slot(slot: u32) -> Self {
        Self(slot)
    }

    pub const fn slot(self) -> u32 {
        self.0
    }
}

impl FromStr for BlockTimestamp {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let millis = parse_micros(s)?.div_euclid(1000);
        let slot = (millis - BLOCK_TIMESTAMP_EPOCH_MS).div_euclid(BLOCK_INTERVAL_MS);
        u32::try_from(slot)
            .map(Self)
            .map_err(|_| ParseError::TimeOutOfRange(s.to_string()))
    }
}

impl fmt::Display for BlockTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let millis = i64::from(self.0) * BLOCK_INTERVAL_MS + BLOCK_TIMESTAMP_EPOCH_MS;
        match DateTime::from_timestamp_millis(millis) {
            Some(dt) => write_datetime(f, dt),
            None => write!(f, "{}", self.0),
        }
    }
}

macro_rules! impl_codec {
    ($type:ty, $inner:ty) => {
        impl Write for $type {
            fn write(&self, buf: &mut impl BufMut) {
                self.0.write(buf);
            }
        }

        impl FixedSize for $type {
            const SIZE: usize = <$inner>::SIZE;
        }

        impl Read for $type {
            type Cfg = ();

            fn read_cfg(buf: &mut impl Buf, _: &()) -> Result<Self, CodecError> {
                <$inner>::read(buf).map(Self)
            }
        }
    };
}

impl_codec!(TimePoint, i64);
impl_codec!(TimePointSec, u32);
impl_codec!(BlockTimestamp, u32);
