//! Exact Lagrange interpolation over the rationals.
//!
//! This module evaluates the unique polynomial passing through a set of
//! points at a chosen x-coordinate. Every intermediate value is an exact
//! [`Rational`], so the result carries no rounding error regardless of how
//! large the coordinates are.

use num_bigint::BigInt;
use num_traits::Zero;

use super::rational::Rational;
use super::share::Point;
use super::{RecoverError, Result};

/// Evaluates the interpolating polynomial of `points` at `x = 0`.
///
/// For points `(x_0, y_0) .. (x_{k-1}, y_{k-1})` this computes
///
/// f(0) = Σ(i) y_i * L_i(0),  L_i(0) = Π(j≠i) x_j / (x_j - x_i)
///
/// Returns zero for an empty slice.
///
/// # Errors
/// `RecoverError::DuplicateIndex` if two points share an x-coordinate.
///
/// # Examples
/// ```
/// use fractus_shamir::Point;
/// use fractus_shamir::poly::interpolate_at_zero;
/// use num_bigint::BigInt;
///
/// // f(x) = 2x + 3
/// let points = vec![Point::new(1, 5), Point::new(2, 7)];
/// let value = interpolate_at_zero(&points)?;
/// assert_eq!(value.into_integer(), Some(BigInt::from(3)));
/// # Ok::<(), fractus_shamir::RecoverError>(())
/// ```
pub fn interpolate_at_zero(points: &[Point]) -> Result<Rational> {
    interpolate_at(points, &BigInt::zero())
}

/// Evaluates the interpolating polynomial of `points` at an arbitrary `x`.
///
/// f(x) = Σ(i) y_i * Π(j≠i) (x - x_j) / (x_i - x_j)
///
/// Fails with `RecoverError::DuplicateIndex` on a repeated x-coordinate.
pub fn interpolate_at(points: &[Point], x: &BigInt) -> Result<Rational> {
    points
        .iter()
        .enumerate()
        .map(|(i, point_i)| {
            let (numer, denom) = points
                .iter()
                .enumerate()
                .filter(|&(j, _)| j != i)
                .fold(
                    (BigInt::from(1), BigInt::from(1)),
                    |(numer, denom), (_, point_j)| {
                        (numer * (x - point_j.x()), denom * (point_i.x() - point_j.x()))
                    },
                );

            if denom.is_zero() {
                return Err(RecoverError::DuplicateIndex(point_i.x().clone()));
            }
            Ok(Rational::new(numer, denom) * Rational::from(point_i.y()))
        })
        .sum::<Result<Rational>>()
}

/// Evaluates a polynomial at `x` using Horner's method.
///
/// Coefficients are in ascending order of degree, so `coefficients[0]` is the
/// constant term.
///
/// # Examples
/// ```
/// use fractus_shamir::poly::evaluate_polynomial;
/// use num_bigint::BigInt;
///
/// // 5 + 3x + 2x^2 at x = 2
/// let coeffs = [BigInt::from(5), BigInt::from(3), BigInt::from(2)];
/// assert_eq!(evaluate_polynomial(&coeffs, &BigInt::from(2)), BigInt::from(19));
/// ```
pub fn evaluate_polynomial(coefficients: &[BigInt], x: &BigInt) -> BigInt {
    coefficients
        .iter()
        .rev()
        .fold(BigInt::zero(), |accumulator, coefficient| {
            accumulator * x + coefficient
        })
}
