//! Exact reconstruction of Shamir-shared secrets over the integers.
//!
//! Shares arrive as `(index, base, digits)` records. They are decoded into
//! arbitrary-precision integer points and the secret is recovered as the
//! constant term of the interpolating polynomial, computed with exact
//! rational arithmetic and checked to be an integer.

pub mod poly;
pub mod rational;
pub mod share;

use hashbrown::HashSet;
use log::{debug, warn};
use num_bigint::BigInt;
use thiserror::Error;

pub use rational::Rational;
pub use share::{Point, Share};

/// Errors that can occur while reconstructing a secret.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecoverError {
    /// A share key is not an integer x-coordinate
    #[error("Invalid share index '{0}': expected an integer")]
    InvalidIndex(String),

    /// A share base is not an integer in 2..=36
    #[error("Invalid base '{0}': expected an integer between 2 and 36")]
    InvalidBase(String),

    /// A share value contains a character that is not a digit of its base
    #[error("Invalid digit '{digit}' for base {base}")]
    InvalidDigit { digit: char, base: u32 },

    /// A share value has no digits at all
    #[error("Share value is empty")]
    EmptyValue,

    /// Threshold must be at least 1
    #[error("Threshold must be at least 1")]
    InvalidThreshold,

    /// Not enough shares to determine the polynomial
    #[error("Need at least {required} shares, but only {provided} available")]
    InsufficientShares { required: usize, provided: usize },

    /// Two shares decode to the same x-coordinate
    #[error("Duplicate share with x-coordinate: {0}")]
    DuplicateIndex(BigInt),

    /// The interpolated constant term is not an integer
    #[error("Interpolated secret {0} is not an integer; the shares are inconsistent")]
    NonIntegerResult(Rational),

    /// A share does not lie on the polynomial defined by the selected shares
    #[error("Share with x-coordinate {x} does not lie on the reconstructed polynomial")]
    InconsistentShare { x: BigInt },
}

pub type Result<T> = std::result::Result<T, RecoverError>;

/// Decodes raw share records into points.
///
/// Records whose index is not an integer are skipped with a warning. Any
/// other decoding failure aborts the whole batch, since a secret recovered
/// from a corrupt share would be silently wrong.
///
/// # Examples
/// ```
/// use fractus_shamir::{decode_shares, Share};
///
/// let records = vec![
///     Share::new("1", "10", "4"),
///     Share::new("keys", "10", "0"),
///     Share::new("2", "16", "ff"),
/// ];
/// let points = decode_shares(&records).unwrap();
/// assert_eq!(points.len(), 2);
/// ```
pub fn decode_shares<'a, T>(records: T) -> Result<Vec<Point>>
where
    T: IntoIterator<Item = &'a Share>,
{
    let mut points = Vec::new();

    for record in records {
        match record.decode() {
            Ok(point) => points.push(point),
            Err(RecoverError::InvalidIndex(index)) => {
                warn!("Could not parse share index '{}' as an integer, skipping", index);
            }
            Err(err) => return Err(err),
        }
    }

    Ok(points)
}

/// Decodes `records` and reconstructs the secret with threshold `k`.
///
/// # Examples
/// ```
/// use fractus_shamir::{recover_secret, Share};
/// use num_bigint::BigInt;
///
/// let records = vec![
///     Share::new("1", "10", "1"),
///     Share::new("2", "10", "1234"),
///     Share::new("3", "2", "10101101"),
/// ];
/// let secret = recover_secret(&records, 3).unwrap();
/// assert_eq!(secret, BigInt::from(-3526));
/// ```
pub fn recover_secret(records: &[Share], k: usize) -> Result<BigInt> {
    let points = decode_shares(records)?;
    Reconstructor::new(k)?.recover(&points)
}

/// Reconstructs secrets from integer points with a fixed threshold.
///
/// The threshold is the number of points that determine the polynomial,
/// i.e. its degree plus one. Reconstruction always uses the `threshold`
/// points with the smallest x-coordinates, so the result does not depend on
/// the order the points are supplied in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reconstructor {
    threshold: usize,
}

impl Reconstructor {
    /// Creates a new reconstructor with the specified threshold.
    ///
    /// # Errors
    /// Returns `RecoverError::InvalidThreshold` if threshold is 0.
    ///
    /// # Examples
    /// ```
    /// use fractus_shamir::Reconstructor;
    /// let reconstructor = Reconstructor::new(3).unwrap();
    /// assert_eq!(reconstructor.threshold(), 3);
    /// ```
    pub fn new(threshold: usize) -> Result<Self> {
        if threshold == 0 {
            return Err(RecoverError::InvalidThreshold);
        }
        Ok(Self { threshold })
    }

    /// Returns the number of points required to recover the secret.
    pub fn threshold(&self) -> usize {
        self.threshold
    }

    /// Validates `points` and returns the ones used for reconstruction.
    ///
    /// The result holds exactly `threshold` points in ascending x order.
    ///
    /// # Errors
    /// * `RecoverError::DuplicateIndex` - Two points share an x-coordinate
    /// * `RecoverError::InsufficientShares` - Fewer than `threshold` points
    pub fn select<'a>(&self, points: &'a [Point]) -> Result<Vec<&'a Point>> {
        let mut unique_x_coords = HashSet::with_capacity(points.len());
        for point in points {
            if !unique_x_coords.insert(point.x()) {
                return Err(RecoverError::DuplicateIndex(point.x().clone()));
            }
        }

        if points.len() < self.threshold {
            return Err(RecoverError::InsufficientShares {
                required: self.threshold,
                provided: points.len(),
            });
        }

        let mut sorted: Vec<&Point> = points.iter().collect();
        sorted.sort_by(|a, b| a.x().cmp(b.x()));
        sorted.truncate(self.threshold);
        Ok(sorted)
    }

    /// Recovers the secret from a collection of points.
    ///
    /// # Errors
    /// * `RecoverError::DuplicateIndex` - Two points share an x-coordinate
    /// * `RecoverError::InsufficientShares` - Fewer than `threshold` points
    /// * `RecoverError::NonIntegerResult` - The points are not on a common
    ///   polynomial with an integer constant term
    ///
    /// # Examples
    /// ```
    /// use fractus_shamir::{Point, Reconstructor};
    /// use num_bigint::BigInt;
    ///
    /// // f(x) = 7 + 2x + x^2
    /// let points = vec![Point::new(3, 22), Point::new(1, 10), Point::new(2, 15)];
    /// let secret = Reconstructor::new(3).unwrap().recover(&points).unwrap();
    /// assert_eq!(secret, BigInt::from(7));
    /// ```
    pub fn recover(&self, points: &[Point]) -> Result<BigInt> {
        let selected = self.owned_selection(points)?;
        Self::secret_from(&selected)
    }

    /// Recovers the secret and checks every unused point against it.
    ///
    /// Points beyond the first `threshold` must lie on the polynomial the
    /// selected points define. This detects inconsistent shares; it does not
    /// say which of the shares is wrong.
    ///
    /// # Errors
    /// Everything `recover` returns, plus `RecoverError::InconsistentShare`
    /// for the first unused point off the polynomial.
    pub fn recover_verified(&self, points: &[Point]) -> Result<BigInt> {
        let selected = self.owned_selection(points)?;
        let secret = Self::secret_from(&selected)?;

        for point in points {
            if selected.iter().any(|used| used.x() == point.x()) {
                continue;
            }

            let expected = poly::interpolate_at(&selected, point.x())?;
            if expected != Rational::from(point.y()) {
                return Err(RecoverError::InconsistentShare {
                    x: point.x().clone(),
                });
            }
        }

        debug!(
            "Verified {} additional share(s) against the polynomial",
            points.len() - selected.len()
        );
        Ok(secret)
    }

    fn owned_selection(&self, points: &[Point]) -> Result<Vec<Point>> {
        let selected: Vec<Point> = self.select(points)?.into_iter().cloned().collect();
        debug!(
            "Using {} of {} shares, x = [{}]",
            selected.len(),
            points.len(),
            selected
                .iter()
                .map(|p| p.x().to_string())
                .collect::<Vec<_>>()
                .join(", ")
        );
        Ok(selected)
    }

    fn secret_from(selected: &[Point]) -> Result<BigInt> {
        let value = poly::interpolate_at_zero(selected)?;
        if !value.is_integer() {
            return Err(RecoverError::NonIntegerResult(value));
        }
        Ok(value.numer().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_bigint::RandBigInt;
    use num_traits::{Num, Zero};
    use rand::seq::SliceRandom;
    use rand_chacha::rand_core::SeedableRng;

    /// Builds `count` points on a random polynomial of the given threshold.
    fn shares_for<R: rand::Rng>(
        secret: &BigInt,
        threshold: usize,
        xs: &[i64],
        bits: u64,
        rng: &mut R,
    ) -> Vec<Point> {
        let mut coeffs = vec![secret.clone()];
        coeffs.extend((1..threshold).map(|_| rng.gen_bigint(bits)));
        xs.iter()
            .map(|&x| {
                let x = BigInt::from(x);
                let y = poly::evaluate_polynomial(&coeffs, &x);
                Point::new(x, y)
            })
            .collect()
    }

    #[test]
    fn test_threshold_validation() {
        assert_eq!(Reconstructor::new(0), Err(RecoverError::InvalidThreshold));
        assert!(Reconstructor::new(1).is_ok());
        assert!(Reconstructor::new(255).is_ok());
    }

    #[test]
    fn test_threshold_getter() {
        let reconstructor = Reconstructor::new(7).unwrap();
        assert_eq!(reconstructor.threshold(), 7);
    }

    #[test]
    fn test_end_to_end_example() {
        let records = vec![
            Share::new("1", "10", "1"),
            Share::new("2", "10", "1234"),
            Share::new("3", "2", "10101101"),
        ];

        let points = decode_shares(&records).unwrap();
        assert_eq!(
            points,
            vec![Point::new(1, 1), Point::new(2, 1234), Point::new(3, 173)]
        );
        assert_eq!(recover_secret(&records, 3).unwrap(), BigInt::from(-3526));
    }

    #[test]
    fn test_basic_recover() {
        let mut rng = rand_chacha::ChaCha8Rng::from_seed([0x90; 32]);
        let secret = BigInt::from(123_456_789u64);
        let points = shares_for(&secret, 3, &[1, 2, 3, 4, 5], 64, &mut rng);

        let reconstructor = Reconstructor::new(3).unwrap();
        assert_eq!(reconstructor.recover(&points).unwrap(), secret);
        assert_eq!(reconstructor.recover(&points[..3]).unwrap(), secret);
    }

    #[test]
    fn test_round_trip_random_thresholds() {
        let mut rng = rand_chacha::ChaCha8Rng::from_seed([1; 32]);

        for threshold in 1..=12usize {
            let mut xs: Vec<i64> = (1..=40).collect();
            xs.shuffle(&mut rng);
            xs.truncate(threshold);

            let secret = rng.gen_bigint(256);
            let points = shares_for(&secret, threshold, &xs, 256, &mut rng);

            let reconstructor = Reconstructor::new(threshold).unwrap();
            assert_eq!(reconstructor.recover(&points).unwrap(), secret);
        }
    }

    #[test]
    fn test_order_independence() {
        let mut rng = rand_chacha::ChaCha8Rng::from_seed([2; 32]);
        let secret = rng.gen_bigint(128);
        let mut points = shares_for(&secret, 4, &[9, 2, 7, 1, 5, 3], 128, &mut rng);

        let reconstructor = Reconstructor::new(4).unwrap();
        let expected = reconstructor.recover(&points).unwrap();
        assert_eq!(expected, secret);

        for _ in 0..10 {
            points.shuffle(&mut rng);
            assert_eq!(reconstructor.recover(&points).unwrap(), expected);
        }
    }

    #[test]
    fn test_selects_smallest_x_values() {
        let points = vec![
            Point::new(10, 0),
            Point::new(3, 0),
            Point::new(7, 0),
            Point::new(1, 0),
        ];
        let selected = Reconstructor::new(2).unwrap().select(&points).unwrap();
        let xs: Vec<_> = selected.iter().map(|p| p.x().clone()).collect();
        assert_eq!(xs, vec![BigInt::from(1), BigInt::from(3)]);
    }

    #[test]
    fn test_insufficient_shares() {
        let points = vec![Point::new(1, 5), Point::new(2, 5)];

        // A constant polynomial is determined by two points, but the
        // threshold still requires three.
        let result = Reconstructor::new(3).unwrap().recover(&points);
        assert_eq!(
            result,
            Err(RecoverError::InsufficientShares {
                required: 3,
                provided: 2
            })
        );
    }

    #[test]
    fn test_no_shares_provided() {
        let result = Reconstructor::new(1).unwrap().recover(&[]);
        assert_eq!(
            result,
            Err(RecoverError::InsufficientShares {
                required: 1,
                provided: 0
            })
        );
    }

    #[test]
    fn test_duplicate_shares() {
        let points = vec![Point::new(1, 5), Point::new(2, 6), Point::new(1, 5)];
        let result = Reconstructor::new(2).unwrap().recover(&points);
        assert_eq!(result, Err(RecoverError::DuplicateIndex(BigInt::from(1))));
    }

    #[test]
    fn test_duplicate_index_after_decoding() {
        let records = vec![
            Share::new("1", "10", "5"),
            Share::new("01", "10", "5"),
            Share::new("2", "10", "6"),
        ];
        assert!(matches!(
            recover_secret(&records, 2),
            Err(RecoverError::DuplicateIndex(_))
        ));
    }

    #[test]
    fn test_inconsistent_points_are_not_integer() {
        // (1, 6), (2, 7) lie on x + 5 and (4, 16) on x^2
        let points = vec![Point::new(1, 6), Point::new(2, 7), Point::new(4, 16)];
        let result = Reconstructor::new(3).unwrap().recover(&points);
        assert!(matches!(result, Err(RecoverError::NonIntegerResult(_))));

        if let Err(RecoverError::NonIntegerResult(value)) = result {
            assert_eq!(value.to_string(), "22/3");
        }
    }

    #[test]
    fn test_mixed_polynomials_detected() {
        let mut rng = rand_chacha::ChaCha8Rng::from_seed([3; 32]);
        let first = shares_for(&BigInt::from(1000), 3, &[1, 2, 4], 32, &mut rng);
        let second = shares_for(&BigInt::from(2000), 3, &[1, 2, 4], 32, &mut rng);

        let mixed = vec![first[0].clone(), first[1].clone(), second[2].clone()];
        let result = Reconstructor::new(3).unwrap().recover(&mixed);
        match result {
            Err(RecoverError::NonIntegerResult(_)) => {}
            // Coincidental integer results are possible but must differ.
            Ok(secret) => assert_ne!(secret, BigInt::from(1000)),
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_recover_verified_accepts_consistent_shares() {
        let mut rng = rand_chacha::ChaCha8Rng::from_seed([4; 32]);
        let secret = rng.gen_bigint(200);
        let points = shares_for(&secret, 3, &[1, 2, 3, 4, 5, 6], 200, &mut rng);

        let reconstructor = Reconstructor::new(3).unwrap();
        assert_eq!(reconstructor.recover_verified(&points).unwrap(), secret);
    }

    #[test]
    fn test_recover_verified_rejects_tampered_share() {
        let mut rng = rand_chacha::ChaCha8Rng::from_seed([5; 32]);
        let secret = rng.gen_bigint(200);
        let mut points = shares_for(&secret, 3, &[1, 2, 3, 4, 5], 200, &mut rng);
        let tampered = Point::new(points[4].x().clone(), points[4].y() + BigInt::from(1));
        points[4] = tampered;

        let reconstructor = Reconstructor::new(3).unwrap();
        assert_eq!(reconstructor.recover(&points).unwrap(), secret);
        assert_eq!(
            reconstructor.recover_verified(&points),
            Err(RecoverError::InconsistentShare {
                x: BigInt::from(5)
            })
        );
    }

    #[test]
    fn test_minimum_threshold() {
        let points = vec![Point::new(4, 99), Point::new(2, 42)];
        let secret = Reconstructor::new(1).unwrap().recover(&points).unwrap();
        // The single selected point is the one with the smallest x.
        assert_eq!(secret, BigInt::from(42));
    }

    #[test]
    fn test_zero_secret() {
        let mut rng = rand_chacha::ChaCha8Rng::from_seed([6; 32]);
        let points = shares_for(&BigInt::zero(), 4, &[1, 2, 3, 4], 64, &mut rng);
        let secret = Reconstructor::new(4).unwrap().recover(&points).unwrap();
        assert!(secret.is_zero());
    }

    #[test]
    fn test_large_secret_through_encoded_shares() {
        let mut rng = rand_chacha::ChaCha8Rng::from_seed([7; 32]);

        // Roughly 300 decimal digits, with non-negative coefficients so every
        // share value is a plain digit string.
        let coeffs: Vec<BigInt> = (0..5).map(|_| rng.gen_biguint(1000).into()).collect();
        let secret = coeffs[0].clone();
        assert!(secret.to_string().len() > 290);

        let points: Vec<Point> = (1..=7)
            .map(|x| {
                let x = BigInt::from(x);
                let y = poly::evaluate_polynomial(&coeffs, &x);
                Point::new(x, y)
            })
            .collect();

        let bases = [2u32, 8, 10, 16, 36, 7, 29];
        let records: Vec<Share> = points
            .iter()
            .zip(bases.iter().cycle())
            .map(|(point, &base)| {
                let digits = point.y().to_str_radix(base);
                Share::new(point.x().to_string(), base.to_string(), digits)
            })
            .collect();

        assert_eq!(recover_secret(&records, 5).unwrap(), secret);
    }

    #[test]
    fn test_decode_skips_bad_indices_only() {
        let records = vec![
            Share::new("1", "10", "10"),
            Share::new("abc", "10", "10"),
            Share::new("2", "10", "20"),
        ];
        let points = decode_shares(&records).unwrap();
        assert_eq!(points, vec![Point::new(1, 10), Point::new(2, 20)]);

        let records = vec![Share::new("1", "10", "10"), Share::new("2", "ten", "20")];
        assert_eq!(
            decode_shares(&records),
            Err(RecoverError::InvalidBase("ten".to_string()))
        );

        let records = vec![Share::new("1", "2", "102")];
        assert_eq!(
            decode_shares(&records),
            Err(RecoverError::InvalidDigit {
                digit: '2',
                base: 2
            })
        );
    }

    #[test]
    fn test_skipped_indices_reduce_available_shares() {
        let records = vec![
            Share::new("1", "10", "10"),
            Share::new("two", "10", "20"),
            Share::new("3", "10", "30"),
        ];
        assert_eq!(
            recover_secret(&records, 3),
            Err(RecoverError::InsufficientShares {
                required: 3,
                provided: 2
            })
        );
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            RecoverError::InsufficientShares {
                required: 3,
                provided: 1
            }
            .to_string(),
            "Need at least 3 shares, but only 1 available"
        );
        assert_eq!(
            RecoverError::InvalidDigit { digit: 'q', base: 16 }.to_string(),
            "Invalid digit 'q' for base 16"
        );
        let hex = BigInt::from_str_radix("ff", 16).unwrap();
        assert_eq!(
            RecoverError::DuplicateIndex(hex).to_string(),
            "Duplicate share with x-coordinate: 255"
        );
    }

    #[test]
    fn test_reconstructor_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Reconstructor>();
        assert_send_sync::<Point>();
        assert_send_sync::<RecoverError>();
    }
}
