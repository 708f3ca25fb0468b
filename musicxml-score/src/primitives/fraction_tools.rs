//! Tools for exact arithmetic on fractions as musical lengths.

use fraction::Fraction;
use itertools::Itertools;

/// Numerator of a reduced fraction. NaN and infinity count as zero.
pub fn numer(frac: &Fraction) -> u64 {
    frac.numer().copied().unwrap_or(0)
}

/// Denominator of a reduced fraction. NaN and infinity count as one.
pub fn denom(frac: &Fraction) -> u64 {
    frac.denom().copied().unwrap_or(1)
}

pub fn zero() -> Fraction {
    Fraction::new(0u64, 1u64)
}

pub fn whole(value: u64) -> Fraction {
    Fraction::new(value, 1u64)
}

pub fn gcd(a: u64, b: u64) -> u64 {
    let (mut a, mut b) = (a, b);
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

pub fn lcm(a: u64, b: u64) -> u64 {
    if a == 0 || b == 0 {
        return 0;
    }
    a / gcd(a, b) * b
}

/// Least common multiple of all given numbers, 1 for an empty input.
///
/// # Example
/// ```
/// # use musicxml_score::primitives::fraction_tools::lcm_all;
/// assert_eq!(lcm_all([2, 3, 4]), 12);
/// assert_eq!(lcm_all(Vec::<u64>::new()), 1);
/// ```
pub fn lcm_all(values: impl IntoIterator<Item = u64>) -> u64 {
    values.into_iter().fold(1, lcm)
}

pub fn is_power_of_two(value: u64) -> bool {
    value != 0 && value & (value - 1) == 0
}

/// Largest `2^k` (k >= 0) such that `base * 2^k <= ceiling`.
///
/// Returns 1 if even `base` alone exceeds the ceiling.
pub fn largest_power_of_two_multiplier(base: u64, ceiling: u64) -> u64 {
    let mut multiplier = 1;
    while base * multiplier * 2 <= ceiling {
        multiplier *= 2;
    }
    multiplier
}

/// Closest fraction to `frac` with denominator at most `limit`.
///
/// Walks the continued fraction expansion, then compares the last
/// convergent with the best semiconvergent.
///
/// # Example
/// ```
/// # use fraction::Fraction;
/// # use musicxml_score::primitives::fraction_tools::limit_denominator;
/// assert_eq!(
///     limit_denominator(Fraction::new(1u64, 129u64), 128),
///     Fraction::new(1u64, 128u64)
/// );
/// assert_eq!(
///     limit_denominator(Fraction::from(3.141592653589793), 100),
///     Fraction::new(311u64, 99u64)
/// );
/// ```
pub fn limit_denominator(frac: Fraction, limit: u64) -> Fraction {
    let limit = limit.max(1);
    if denom(&frac) <= limit {
        return frac;
    }
    let (mut p0, mut q0, mut p1, mut q1) = (0u64, 1u64, 1u64, 0u64);
    let (mut n, mut d) = (numer(&frac), denom(&frac));
    loop {
        let a = n / d;
        let q2 = q0 + a * q1;
        if q2 > limit {
            break;
        }
        (p0, q0, p1, q1) = (p1, q1, p0 + a * p1, q2);
        (n, d) = (d, n - a * d);
    }
    let k = (limit - q0) / q1;
    let bound1 = Fraction::new(p0 + k * p1, q0 + k * q1);
    let bound2 = Fraction::new(p1, q1);
    if distance(bound2, frac) <= distance(bound1, frac) {
        bound2
    } else {
        bound1
    }
}

fn distance(a: Fraction, b: Fraction) -> Fraction {
    if a > b {
        a - b
    } else {
        b - a
    }
}

/// Round a non-negative fraction to the nearest integer, ties to even.
pub fn round_half_even(frac: Fraction) -> u64 {
    let (n, d) = (numer(&frac), denom(&frac));
    let floor = n / d;
    let remainder = n % d;
    match (remainder * 2).cmp(&d) {
        std::cmp::Ordering::Less => floor,
        std::cmp::Ordering::Greater => floor + 1,
        std::cmp::Ordering::Equal => floor + floor % 2,
    }
}

/// Exact sum of fractions.
pub fn sum(fractions: impl IntoIterator<Item = Fraction>) -> Fraction {
    fractions.into_iter().fold(zero(), |acc, frac| acc + frac)
}

/// Human readable list of fractions, used in error messages.
pub fn describe(fractions: &[Fraction]) -> String {
    fractions.iter().map(|frac| frac.to_string()).join(", ")
}
