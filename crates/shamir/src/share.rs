//! Raw share records and their decoding into exact integer points.
use core::str::FromStr;

use num_bigint::{BigInt, BigUint};

use super::{RecoverError, Result};

/// Smallest radix a share value may be encoded in.
pub const MIN_BASE: u32 = 2;

/// Largest radix a share value may be encoded in (`0-9` followed by `A-Z`).
pub const MAX_BASE: u32 = 36;

/// A share as read from its source, before any validation.
///
/// The index is the key the share was stored under and is expected to be an
/// integer x-coordinate. The value is a digit string in `base`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Share {
    pub index: String,
    pub base: String,
    pub value: String,
}

impl Share {
    /// Creates a new raw share record.
    pub fn new(
        index: impl Into<String>,
        base: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            index: index.into(),
            base: base.into(),
            value: value.into(),
        }
    }

    /// Decodes this record into an exact integer point.
    ///
    /// The index is checked first, so a record with a bad index reports
    /// `InvalidIndex` even when its value is malformed too.
    ///
    /// # Examples
    /// ```
    /// use fractus_shamir::Share;
    /// use num_bigint::BigInt;
    ///
    /// let point = Share::new("3", "2", "10101101").decode().unwrap();
    /// assert_eq!(point.x(), &BigInt::from(3));
    /// assert_eq!(point.y(), &BigInt::from(173));
    /// ```
    pub fn decode(&self) -> Result<Point> {
        let x = parse_index(&self.index)?;
        let base = parse_base(&self.base)?;
        let y = decode_value(&self.value, base)?;
        Ok(Point::new(x, y))
    }
}

impl std::fmt::Display for Share {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Share(index={}, base={}, value={})",
            self.index, self.base, self.value
        )
    }
}

/// A decoded share: one point on the sharing polynomial.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Point {
    x: BigInt,
    y: BigInt,
}

impl Point {
    pub fn new(x: impl Into<BigInt>, y: impl Into<BigInt>) -> Self {
        Self {
            x: x.into(),
            y: y.into(),
        }
    }

    /// Returns the x-coordinate of this point.
    pub fn x(&self) -> &BigInt {
        &self.x
    }

    /// Returns the y-coordinate of this point.
    pub fn y(&self) -> &BigInt {
        &self.y
    }
}

impl std::fmt::Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Parses a share key as a decimal integer x-coordinate.
///
/// An optional sign followed by ASCII digits; nothing else.
pub fn parse_index(index: &str) -> Result<BigInt> {
    let digits = index.strip_prefix(['+', '-']).unwrap_or(index);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(RecoverError::InvalidIndex(index.to_string()));
    }
    BigInt::from_str(index).map_err(|_| RecoverError::InvalidIndex(index.to_string()))
}

/// Parses a radix in `MIN_BASE..=MAX_BASE`.
pub fn parse_base(base: &str) -> Result<u32> {
    match base.parse::<u32>() {
        Ok(radix) if (MIN_BASE..=MAX_BASE).contains(&radix) => Ok(radix),
        _ => Err(RecoverError::InvalidBase(base.to_string())),
    }
}

/// Converts a digit string in `base` to an arbitrary-precision integer.
///
/// Letters are case-insensitive. Every character must be a digit of `base`;
/// signs, separators and whitespace are rejected.
///
/// # Examples
/// ```
/// use fractus_shamir::share::decode_value;
/// use num_bigint::BigInt;
///
/// assert_eq!(decode_value("ff", 16).unwrap(), BigInt::from(255));
/// assert_eq!(decode_value("111", 2).unwrap(), BigInt::from(7));
/// assert_eq!(decode_value("Z", 36).unwrap(), BigInt::from(35));
/// ```
pub fn decode_value(digits: &str, base: u32) -> Result<BigInt> {
    if !(MIN_BASE..=MAX_BASE).contains(&base) {
        return Err(RecoverError::InvalidBase(base.to_string()));
    }
    if digits.is_empty() {
        return Err(RecoverError::EmptyValue);
    }

    let values = digits
        .chars()
        .map(|ch| {
            ch.to_digit(base)
                .map(|d| d as u8)
                .ok_or(RecoverError::InvalidDigit { digit: ch, base })
        })
        .collect::<Result<Vec<u8>>>()?;

    // acc = acc * base + digit, most significant digit first
    let magnitude = BigUint::from_radix_be(&values, base)
        .ok_or(RecoverError::InvalidBase(base.to_string()))?;
    Ok(BigInt::from(magnitude))
}
