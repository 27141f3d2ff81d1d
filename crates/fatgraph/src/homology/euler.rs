//! Orbifold Euler characteristic of M_{g,n} (Harer–Zagier).
//!
//! All arithmetic is checked; `None` means the value does not fit in `Rational64`.

use num_rational::Rational64;
use num_traits::{CheckedAdd, CheckedDiv, CheckedMul};

fn binomial(n: i64, k: i64) -> Option<i64> {
    (0..k).try_fold(1i64, |acc, i| Some(acc.checked_mul(n - i)? / (i + 1)))
}

/// Bernoulli number `B_m` (with `B_1 = -1/2`).
pub fn bernoulli(m: usize) -> Option<Rational64> {
    let mut b: Vec<Rational64> = Vec::with_capacity(m + 1);
    b.push(Rational64::from_integer(1));
    for j in 1..=m {
        let n = i64::try_from(j).ok()?;
        let mut sum = Rational64::from_integer(0);
        for (k, bk) in b.iter().enumerate() {
            let c = Rational64::from_integer(binomial(n + 1, k as i64)?);
            sum = sum.checked_add(&bk.checked_mul(&c)?)?;
        }
        b.push(-sum.checked_div(&Rational64::from_integer(n + 1))?);
    }
    b.pop()
}

/// `χ(M_{0,3}) = 1`, `χ(M_{g,1}) = -B_{2g}/(2g)`, `χ(M_{g,n+1}) = (2 - 2g - n) χ(M_{g,n})`.
///
/// `None` for unstable types and on overflow.
pub fn orbifold_euler_characteristic(genus: usize, boundary: usize) -> Option<Rational64> {
    if boundary == 0 || 2 * genus + boundary < 3 {
        return None;
    }
    let g = i64::try_from(genus).ok()?;
    let (mut chi, start) = if genus == 0 {
        (Rational64::from_integer(1), 3)
    } else {
        let twice = Rational64::from_integer(g.checked_mul(2)?);
        (-bernoulli(2 * genus)?.checked_div(&twice)?, 1)
    };
    for n in start..boundary {
        let factor = 2 - 2 * g - i64::try_from(n).ok()?;
        chi = chi.checked_mul(&Rational64::from_integer(factor))?;
    }
    Some(chi)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bernoulli_numbers() {
        assert_eq!(bernoulli(0), Some(Rational64::from_integer(1)));
        assert_eq!(bernoulli(1), Some(Rational64::new(-1, 2)));
        assert_eq!(bernoulli(2), Some(Rational64::new(1, 6)));
        assert_eq!(bernoulli(3), Some(Rational64::from_integer(0)));
        assert_eq!(bernoulli(4), Some(Rational64::new(-1, 30)));
        assert_eq!(bernoulli(12), Some(Rational64::new(-691, 2730)));
    }

    #[test]
    fn harer_zagier_values() {
        assert_eq!(orbifold_euler_characteristic(0, 3), Some(Rational64::from_integer(1)));
        assert_eq!(orbifold_euler_characteristic(0, 4), Some(Rational64::from_integer(-1)));
        assert_eq!(orbifold_euler_characteristic(0, 5), Some(Rational64::from_integer(2)));
        assert_eq!(orbifold_euler_characteristic(1, 1), Some(Rational64::new(-1, 12)));
        assert_eq!(orbifold_euler_characteristic(1, 2), Some(Rational64::new(1, 12)));
        // ζ(-3) = -B_4 / 4
        assert_eq!(orbifold_euler_characteristic(2, 1), Some(Rational64::new(1, 120)));
        assert_eq!(orbifold_euler_characteristic(0, 2), None);
    }

    #[test]
    fn overflow_is_reported_not_wrapped() {
        assert_eq!(binomial(200, 100), None);
        assert_eq!(bernoulli(200), None);
        assert_eq!(orbifold_euler_characteristic(100, 1), None);
        assert!(orbifold_euler_characteristic(3, 1).is_some());
    }
}
