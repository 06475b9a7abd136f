//! Symbols and quantities are the value types the whole ledger is built on.
//!
//! A `Symbol` pairs a short uppercase code with a fixed decimal precision (ie
//! `4,ABC`) and a `Quantity` is a fixed-point amount expressed in that
//! symbol's units (ie `500.0000 ABC`, stored as `5000000`). Quantities only
//! combine with quantities of the exact same symbol, and amounts never wrap.

use crate::error::{Error, Result};
use getset::{CopyGetters, Getters};
use rust_decimal::Decimal;
use serde::{Serialize, Deserialize};
use std::cmp::Ordering;
use std::convert::TryFrom;
use std::fmt;
use std::str::FromStr;

/// The largest magnitude a quantity's amount may have (2^62 - 1).
pub const MAX_AMOUNT: i64 = (1 << 62) - 1;

/// The largest number of decimal places a symbol may carry.
pub const MAX_PRECISION: u8 = 18;

/// The longest a symbol code can be.
pub const MAX_CODE_LEN: usize = 7;

/// The code half of a symbol, ie `ABC`. One to seven uppercase letters.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SymbolCode(String);

impl SymbolCode {
    /// Validate and create a symbol code.
    pub fn new<T: Into<String>>(code: T) -> Result<Self> {
        let code = code.into();
        let valid_len = !code.is_empty() && code.len() <= MAX_CODE_LEN;
        if !valid_len || !code.chars().all(|c| c.is_ascii_uppercase()) {
            return Err(Error::InvalidSymbol(code));
        }
        Ok(Self(code))
    }

    /// Return a string ref for this code
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl TryFrom<String> for SymbolCode {
    type Error = Error;

    fn try_from(val: String) -> Result<Self> {
        Self::new(val)
    }
}

impl From<SymbolCode> for String {
    fn from(code: SymbolCode) -> Self {
        code.0
    }
}

impl FromStr for SymbolCode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl fmt::Display for SymbolCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A currency's identity: its code and how many decimal places it uses. The
/// textual form is `"<precision>,<CODE>"`, ie `4,ABC`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Getters, CopyGetters, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Symbol {
    #[getset(get_copy = "pub")]
    precision: u8,
    #[getset(get = "pub")]
    code: SymbolCode,
}

impl Symbol {
    /// Create a symbol, checking that the precision is in range.
    pub fn new(precision: u8, code: SymbolCode) -> Result<Self> {
        if precision > MAX_PRECISION {
            Err(Error::InvalidSymbol(format!("{},{}", precision, code)))?;
        }
        Ok(Self { precision, code })
    }
}

impl FromStr for Symbol {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::InvalidSymbol(s.to_string());
        let mut parts = s.trim().splitn(2, ',');
        let precision = parts.next().ok_or_else(invalid)?;
        let code = parts.next().ok_or_else(invalid)?;
        if precision.is_empty() || !precision.chars().all(|c| c.is_ascii_digit()) {
            Err(invalid())?;
        }
        let precision = precision.parse::<u8>().map_err(|_| invalid())?;
        Self::new(precision, SymbolCode::new(code)?)
    }
}

impl TryFrom<String> for Symbol {
    type Error = Error;

    fn try_from(val: String) -> Result<Self> {
        val.parse()
    }
}

impl From<Symbol> for String {
    fn from(symbol: Symbol) -> Self {
        symbol.to_string()
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.precision, self.code)
    }
}

/// A fixed-point amount paired with a symbol.
///
/// The amount is scaled by the symbol's precision, so `500.0000 ABC` has an
/// amount of `5000000`. A quantity can hold any `i64` (so we can report what
/// was asked for) but only amounts within `±MAX_AMOUNT` are
/// [valid](#method.is_valid), and arithmetic never leaves that range.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Getters, CopyGetters, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Quantity {
    #[getset(get_copy = "pub")]
    amount: i64,
    #[getset(get = "pub")]
    symbol: Symbol,
}

impl Quantity {
    pub fn new(amount: i64, symbol: Symbol) -> Self {
        Self { amount, symbol }
    }

    /// A zero quantity of the given symbol.
    pub fn zero(symbol: Symbol) -> Self {
        Self::new(0, symbol)
    }

    /// Whether the amount sits inside the representable range.
    pub fn is_valid(&self) -> bool {
        self.amount >= -MAX_AMOUNT && self.amount <= MAX_AMOUNT
    }

    pub fn is_positive(&self) -> bool {
        self.amount > 0
    }

    /// The symbol code, as a shortcut for `quantity.symbol().code()`.
    pub fn code(&self) -> &SymbolCode {
        self.symbol.code()
    }

    /// Convert this quantity's amount into a decimal with the correct scale.
    pub fn to_decimal(&self) -> Decimal {
        Decimal::new(self.amount, self.symbol.precision() as u32)
    }

    fn same_symbol(&self, other: &Quantity) -> Result<()> {
        if self.symbol != other.symbol {
            Err(Error::SymbolMismatch)?;
        }
        Ok(())
    }

    fn in_range(amount: i64) -> Result<i64> {
        if amount < -MAX_AMOUNT || amount > MAX_AMOUNT {
            Err(Error::Overflow)?;
        }
        Ok(amount)
    }

    /// Add two quantities of the same symbol.
    pub fn checked_add(&self, other: &Quantity) -> Result<Quantity> {
        self.same_symbol(other)?;
        let amount = self.amount.checked_add(other.amount).ok_or(Error::Overflow)?;
        Ok(Self::new(Self::in_range(amount)?, self.symbol.clone()))
    }

    /// Subtract `other` from this quantity (same symbol required).
    pub fn checked_sub(&self, other: &Quantity) -> Result<Quantity> {
        self.same_symbol(other)?;
        let amount = self.amount.checked_sub(other.amount).ok_or(Error::Overflow)?;
        Ok(Self::new(Self::in_range(amount)?, self.symbol.clone()))
    }

    /// Compare two quantities of the same symbol.
    pub fn try_cmp(&self, other: &Quantity) -> Result<Ordering> {
        self.same_symbol(other)?;
        Ok(self.amount.cmp(&other.amount))
    }
}

/// Parses the `"<integer>[.<fraction>] <CODE>"` form. The number of fraction
/// digits becomes the precision.
impl FromStr for Quantity {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::InvalidQuantity(s.to_string());
        let trimmed = s.trim();
        let space = trimmed.find(' ').ok_or_else(invalid)?;
        let (number, code) = (&trimmed[..space], trimmed[space..].trim());
        let code = SymbolCode::new(code)?;

        let (negative, number) = match number.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, number),
        };
        let mut parts = number.splitn(2, '.');
        let whole = parts.next().unwrap_or("");
        let fraction = parts.next();
        let digits = |x: &str| !x.is_empty() && x.chars().all(|c| c.is_ascii_digit());
        if !digits(whole) {
            Err(invalid())?;
        }
        let fraction = match fraction {
            Some(frac) if digits(frac) => frac,
            Some(_) => Err(invalid())?,
            None => "",
        };
        if fraction.len() > MAX_PRECISION as usize {
            Err(Error::InvalidSymbol(format!("{},{}", fraction.len(), code)))?;
        }
        let precision = fraction.len() as u8;

        let scale = 10i64.checked_pow(precision as u32).ok_or_else(invalid)?;
        let whole = whole.parse::<i64>().map_err(|_| invalid())?;
        let mut amount = whole.checked_mul(scale).ok_or_else(invalid)?;
        if !fraction.is_empty() {
            let frac = fraction.parse::<i64>().map_err(|_| invalid())?;
            amount = amount.checked_add(frac).ok_or_else(invalid)?;
        }
        if negative {
            amount = -amount;
        }
        Ok(Self::new(amount, Symbol::new(precision, code)?))
    }
}

impl TryFrom<String> for Quantity {
    type Error = Error;

    fn try_from(val: String) -> Result<Self> {
        val.parse()
    }
}

impl From<Quantity> for String {
    fn from(quantity: Quantity) -> Self {
        quantity.to_string()
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.to_decimal(), self.symbol.code())
    }
}
