//! Symbols and token quantities.
//!
//! A [SymbolCode] is 1 to 7 uppercase letters packed little-endian into a `u64`. A [Symbol] adds a
//! decimal precision in the low byte (the code occupies the bytes above it). An [Asset] is a
//! signed 64-bit amount of the smallest unit together with its symbol, written as text like
//! `"1.0000 EOS"` where the number of fractional digits is the precision.

use crate::{error::ParseError, name::Name};
use antelope_codec::{Error as CodecError, FixedSize, Read, ReadExt, Write};
use bytes::{Buf, BufMut};
use std::{fmt, str::FromStr};

/// Maximum number of letters in a symbol code.
pub const MAX_CODE_LENGTH: usize = 7;

/// Maximum precision of a symbol.
pub const MAX_PRECISION: u8 = 18;

/// A packed symbol code such as `EOS`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SymbolCode(u64);

impl SymbolCode {
    /// Checks that `value` packs 1 to 7 uppercase letters with no gaps.
    pub fn from_u64(value: u64) -> Result<Self, ParseError> {
        let bytes = value.to_le_bytes();
        let len = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
        let valid = (1..=MAX_CODE_LENGTH).contains(&len)
            && bytes[..len].iter().all(u8::is_ascii_uppercase)
            && bytes[len..].iter().all(|&b| b == 0);
        if !valid {
            return Err(ParseError::Symbol(format!("{value:#x}")));
        }
        Ok(Self(value))
    }

    /// Returns the packed value.
    pub fn value(self) -> u64 {
        self.0
    }
}

impl FromStr for SymbolCode {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() || s.len() > MAX_CODE_LENGTH || !s.bytes().all(|b| b.is_ascii_uppercase())
        {
            return Err(ParseError::Symbol(s.to_string()));
        }
        let value = s
            .bytes()
            .enumerate()
            .fold(0u64, |acc, (i, b)| acc | u64::from(b) << (8 * i));
        Ok(Self(value))
    }
}

impl fmt::Display for SymbolCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for b in self.0.to_le_bytes().into_iter().take_while(|&b| b != 0) {
            fmt::Write::write_char(f, b as char)?;
        }
        Ok(())
    }
}

/// A symbol code and its decimal precision, written as `"4,EOS"`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Symbol {
    precision: u8,
    code: SymbolCode,
}

impl Symbol {
    /// Creates a symbol, rejecting precisions above [MAX_PRECISION].
    pub fn new(precision: u8, code: SymbolCode) -> Result<Self, ParseError> {
        if precision > MAX_PRECISION {
            return Err(ParseError::Symbol(format!("{precision},{code}")));
        }
        Ok(Self { precision, code })
    }

    /// Unpacks and validates a wire value.
    pub fn from_u64(value: u64) -> Result<Self, ParseError> {
        Self::new((value & 0xff) as u8, SymbolCode::from_u64(value >> 8)?)
    }

    /// Returns the packed wire value.
    pub fn value(self) -> u64 {
        self.code.0 << 8 | u64::from(self.precision)
    }

    pub fn precision(self) -> u8 {
        self.precision
    }

    pub fn code(self) -> SymbolCode {
        self.code
    }
}

impl FromStr for Symbol {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseError::Symbol(s.to_string());
        let (precision, code) = s.split_once(',').ok_or_else(invalid)?;
        if precision.is_empty() || !precision.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let precision = precision.parse().map_err(|_| invalid())?;
        Self::new(precision, code.parse()?)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.precision, self.code)
    }
}

/// A quantity of a token.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Asset {
    amount: i64,
    symbol: Symbol,
}

impl Asset {
    pub fn new(amount: i64, symbol: Symbol) -> Self {
        Self { amount, symbol }
    }

    /// Returns the amount in units of `10^-precision`.
    pub fn amount(&self) -> i64 {
        self.amount
    }

    pub fn symbol(&self) -> Symbol {
        self.symbol
    }
}

impl FromStr for Asset {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseError::Asset(s.to_string());
        let (number, code) = s.split_once(' ').ok_or_else(invalid)?;
        let code: SymbolCode = code.parse().map_err(|_| invalid())?;

        let (negative, digits) = match number.strip_prefix('-') {
            Some(digits) => (true, digits),
            None => (false, number),
        };
        let (whole, fraction) = digits.split_once('.').unwrap_or((digits, ""));
        if whole.is_empty()
            || (digits.contains('.') && fraction.is_empty())
            || !whole.bytes().chain(fraction.bytes()).all(|b| b.is_ascii_digit())
        {
            return Err(invalid());
        }
        let precision = u8::try_from(fraction.len())
            .ok()
            .filter(|&p| p <= MAX_PRECISION)
            .ok_or_else(invalid)?;

        // Accumulate in i128 so the sign can be applied before narrowing
        let mut amount: i128 = 0;
        for b in whole.bytes().chain(fraction.bytes()) {
            amount = amount
                .checked_mul(10)
                .and_then(|a| a.checked_add(i128::from(b - b'0')))
                .ok_or_else(|| ParseError::AmountOutOfRange(s.to_string()))?;
        }
        if negative {
            // "-0" has no binary form of its own
            if amount == 0 {
                return Err(invalid());
            }
            amount = -amount;
        }
        let amount =
            i64::try_from(amount).map_err(|_| ParseError::AmountOutOfRange(s.to_string()))?;
        Ok(Self::new(amount, Symbol::new(precision, code)?))
    }
}

impl fmt::Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let precision = usize::from(self.symbol.precision);
        let digits = format!(
            "{:0>width$}",
            self.amount.unsigned_abs(),
            width = precision + 1
        );
        let (whole, fraction) = digits.split_at(digits.len() - precision);
        if self.amount < 0 {
            f.write_str("-")?;
        }
        f.write_str(whole)?;
        if precision > 0 {
            write!(f, ".{fraction}")?;
        }
        write!(f, " {}", self.symbol.code)
    }
}

impl Write for Symbol {
    fn write(&self, buf: &mut impl BufMut) {
        buf.put_u64_le(self.value());
    }
}

impl FixedSize for Symbol {
    const SIZE: usize = u64::SIZE;
}

impl Read for Symbol {
    type Cfg = ();

    fn read_cfg(buf: &mut impl Buf, _: &()) -> Result<Self, CodecError> {
        Self::from_u64(u64::read(buf)?).map_err(|_| CodecError::Invalid("symbol", "invalid symbol"))
    }
}

impl Write for Asset {
    fn write(&self, buf: &mut impl BufMut) {
        buf.put_i64_le(self.amount);
        self.symbol.write(buf);
    }
}

impl FixedSize for Asset {
    const SIZE: usize = i64::SIZE + Symbol::SIZE;
}

impl Read for Asset {
    type Cfg = ();

    fn read_cfg(buf: &mut impl Buf, _: &()) -> Result<Self, CodecError> {
        let amount = i64::read(buf)?;
        let symbol = Symbol::read(buf)?;
        Ok(Self { amount, symbol })
    }
}

/// An [Asset] together with the account of the token contract that issued it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ExtendedAsset {
    pub quantity: Asset,
    pub contract: Name,
}

impl Write for ExtendedAsset {
    fn write(&self, buf: &mut impl BufMut) {
        self.quantity.write(buf);
        self.contract.write(buf);
    }
}

impl FixedSize for ExtendedAsset {
    const SIZE: usize = Asset::SIZE + Name::SIZE;
}

impl Read for ExtendedAsset {
    type Cfg = ();

    fn read_cfg(buf: &mut impl Buf, _: &()) -> Result<Self, CodecError> {
        let quantity = Asset::read(buf)?;
        let contract = Name::read(buf)?;
        Ok(Self { quantity, contract })
    }
}
