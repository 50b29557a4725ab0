//! Exact rational arithmetic over arbitrary-precision integers.
//!
//! Values are always kept in lowest terms with a strictly positive
//! denominator, so equality is structural and `is_integer` is a single
//! comparison.
use core::iter::{Product, Sum};
use core::ops::{Add, Mul, Neg, Sub};

use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{One, Signed, Zero};

/// A fraction `numer / denom` with `denom > 0` and `gcd(numer, denom) == 1`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Rational {
    numer: BigInt,
    denom: BigInt,
}

impl Rational {
    /// Creates a new rational and reduces it to lowest terms.
    ///
    /// # Panics
    /// Panics if `denom` is zero.
    pub fn new(numer: BigInt, denom: BigInt) -> Self {
        assert!(!denom.is_zero(), "Rational with zero denominator");
        let mut value = Self { numer, denom };
        value.reduce();
        value
    }

    /// The additive identity.
    pub fn zero() -> Self {
        Self {
            numer: BigInt::zero(),
            denom: BigInt::one(),
        }
    }

    /// The multiplicative identity.
    pub fn one() -> Self {
        Self {
            numer: BigInt::one(),
            denom: BigInt::one(),
        }
    }

    pub fn numer(&self) -> &BigInt {
        &self.numer
    }

    pub fn denom(&self) -> &BigInt {
        &self.denom
    }

    /// Returns true if the denominator is one.
    #[inline]
    pub fn is_integer(&self) -> bool {
        self.denom.is_one()
    }

    /// Consumes the value and returns the integer it represents, if any.
    pub fn into_integer(self) -> Option<BigInt> {
        if self.is_integer() {
            Some(self.numer)
        } else {
            None
        }
    }

    fn reduce(&mut self) {
        if self.numer.is_zero() {
            self.denom = BigInt::one();
            return;
        }

        let g = self.numer.gcd(&self.denom);
        if !g.is_one() {
            self.numer /= &g;
            self.denom /= &g;
        }

        if self.denom.is_negative() {
            self.numer = -core::mem::take(&mut self.numer);
            self.denom = -core::mem::take(&mut self.denom);
        }
    }
}

impl Default for Rational {
    fn default() -> Self {
        Self::zero()
    }
}

impl From<BigInt> for Rational {
    fn from(value: BigInt) -> Self {
        Self {
            numer: value,
            denom: BigInt::one(),
        }
    }
}

impl From<&BigInt> for Rational {
    fn from(value: &BigInt) -> Self {
        Self::from(value.clone())
    }
}

impl std::fmt::Display for Rational {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_integer() {
            write!(f, "{}", self.numer)
        } else {
            write!(f, "{}/{}", self.numer, self.denom)
        }
    }
}

impl Add for Rational {
    type Output = Self;

    fn add(self, other: Self) -> Self::Output {
        if self.denom == other.denom {
            return Self::new(self.numer + other.numer, self.denom);
        }
        // a/b + c/d = (ad + cb) / bd
        let numer = self.numer * &other.denom + other.numer * &self.denom;
        Self::new(numer, self.denom * other.denom)
    }
}

impl Sub for Rational {
    type Output = Self;

    fn sub(self, other: Self) -> Self::Output {
        self + (-other)
    }
}

impl Neg for Rational {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self {
            numer: -self.numer,
            denom: self.denom,
        }
    }
}

impl Mul for Rational {
    type Output = Self;

    fn mul(self, other: Self) -> Self::Output {
        Self::new(self.numer * other.numer, self.denom * other.denom)
    }
}

impl Sum for Rational {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::zero(), |acc, x| acc + x)
    }
}

impl Product for Rational {
    fn product<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::one(), |acc, x| acc * x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ratio(n: i64, d: i64) -> Rational {
        Rational::new(BigInt::from(n), BigInt::from(d))
    }

    #[test]
    fn test_reduction() {
        let r = ratio(6, 8);
        assert_eq!(r.numer(), &BigInt::from(3));
        assert_eq!(r.denom(), &BigInt::from(4));
    }

    #[test]
    fn test_negative_denominator_is_normalized() {
        let r = ratio(3, -6);
        assert_eq!(r.numer(), &BigInt::from(-1));
        assert_eq!(r.denom(), &BigInt::from(2));
        assert_eq!(ratio(-2, -4), ratio(1, 2));
    }

    #[test]
    fn test_zero_has_unit_denominator() {
        let r = ratio(0, -17);
        assert_eq!(r, Rational::zero());
        assert!(r.is_integer());
    }

    #[test]
    fn test_basic_arithmetic() {
        assert_eq!(ratio(1, 2) + ratio(1, 3), ratio(5, 6));
        assert_eq!(ratio(1, 2) - ratio(1, 3), ratio(1, 6));
        assert_eq!(ratio(2, 3) * ratio(9, 4), ratio(3, 2));
        assert_eq!(ratio(1, 4) + ratio(3, 4), Rational::one());
    }

    #[test]
    fn test_sum_and_product() {
        let terms = vec![ratio(1, 2), ratio(1, 3), ratio(1, 6)];
        assert_eq!(terms.clone().into_iter().sum::<Rational>(), Rational::one());
        assert_eq!(terms.into_iter().product::<Rational>(), ratio(1, 36));
    }

    #[test]
    fn test_into_integer() {
        assert_eq!(ratio(10, 5).into_integer(), Some(BigInt::from(2)));
        assert_eq!(ratio(10, 4).into_integer(), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(ratio(-7, 1).to_string(), "-7");
        assert_eq!(ratio(2, -6).to_string(), "-1/3");
    }

    #[test]
    fn test_large_values_stay_exact() {
        let big = BigInt::from(10).pow(200u32);
        let third = Rational::new(big.clone(), BigInt::from(3));
        let total = third.clone() + third.clone() + third;
        assert_eq!(total.into_integer(), Some(big));
    }

    #[test]
    #[should_panic(expected = "zero denominator")]
    fn test_zero_denominator() {
        let _ = ratio(1, 0);
    }
}
