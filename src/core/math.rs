//! Exact arithmetic primitives: GCD/LCM, fractions and integer polynomials
//!
//! Every correctness-sensitive comparison in the crate goes through these
//! types. Fraction equality is cross-multiplication, never float division.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Greatest common divisor (always non-negative; `gcd(0, 0) == 0`)
pub fn gcd(a: i64, b: i64) -> i64 {
    let (mut a, mut b) = (a.unsigned_abs(), b.unsigned_abs());
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a as i64
}

/// Least common multiple (`lcm(0, x) == 0`)
pub fn lcm(a: i64, b: i64) -> i64 {
    if a == 0 || b == 0 {
        return 0;
    }
    (a / gcd(a, b) * b).abs()
}

/// An exact rational number
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fraction {
    pub numerator: i64,
    pub denominator: i64,
}

impl Fraction {
    /// Create a fraction exactly as given (not reduced, denominator unchecked)
    pub fn new(numerator: i64, denominator: i64) -> Self {
        Self {
            numerator,
            denominator,
        }
    }

    pub fn whole(value: i64) -> Self {
        Self::new(value, 1)
    }

    /// Lowest terms with a positive denominator. A zero denominator is left as is.
    pub fn reduced(&self) -> Self {
        if self.denominator == 0 {
            return *self;
        }
        let divisor = gcd(self.numerator, self.denominator).max(1);
        let sign = if self.denominator < 0 { -1 } else { 1 };
        Self::new(
            sign * self.numerator / divisor,
            sign * self.denominator / divisor,
        )
    }

    pub fn is_reduced(&self) -> bool {
        self.denominator > 0 && gcd(self.numerator, self.denominator) == 1
    }

    pub fn is_whole(&self) -> bool {
        self.denominator != 0 && self.numerator % self.denominator == 0
    }

    /// `a/b == c/d` iff `a*d == c*b`
    pub fn equivalent(&self, other: &Fraction) -> bool {
        if self.denominator == 0 || other.denominator == 0 {
            return false;
        }
        (self.numerator as i128) * (other.denominator as i128)
            == (other.numerator as i128) * (self.denominator as i128)
    }

    /// Compare by value, `None` if either denominator is zero
    pub fn cmp_value(&self, other: &Fraction) -> Option<std::cmp::Ordering> {
        if self.denominator == 0 || other.denominator == 0 {
            return None;
        }
        let a = self.reduced();
        let b = other.reduced();
        let left = (a.numerator as i128) * (b.denominator as i128);
        let right = (b.numerator as i128) * (a.denominator as i128);
        Some(left.cmp(&right))
    }

    pub fn add(&self, other: &Fraction) -> Fraction {
        let common = lcm(self.denominator, other.denominator);
        if common == 0 {
            return Fraction::new(0, 0);
        }
        Fraction::new(
            self.numerator * (common / self.denominator)
                + other.numerator * (common / other.denominator),
            common,
        )
        .reduced()
    }

    pub fn sub(&self, other: &Fraction) -> Fraction {
        self.add(&Fraction::new(-other.numerator, other.denominator))
    }

    pub fn mul(&self, other: &Fraction) -> Fraction {
        Fraction::new(
            self.numerator * other.numerator,
            self.denominator * other.denominator,
        )
        .reduced()
    }

    /// `None` when dividing by zero
    pub fn checked_div(&self, other: &Fraction) -> Option<Fraction> {
        if other.numerator == 0 {
            return None;
        }
        Some(
            Fraction::new(
                self.numerator * other.denominator,
                self.denominator * other.numerator,
            )
            .reduced(),
        )
    }

    /// Approximate value, for display and tolerance checks only
    pub fn to_f64(&self) -> Option<f64> {
        if self.denominator == 0 {
            None
        } else {
            Some(self.numerator as f64 / self.denominator as f64)
        }
    }

    /// Parse `"3/4"`, `"-2"`, or a mixed number `"1 1/2"`
    pub fn parse(input: &str) -> Option<Fraction> {
        let text = input.trim();
        if text.is_empty() {
            return None;
        }

        if let Some((whole, rest)) = text.split_once(' ') {
            let whole: i64 = whole.trim().parse().ok()?;
            let frac = Fraction::parse(rest)?;
            if frac.numerator < 0 || rest.contains(' ') {
                return None;
            }
            let sign = if whole < 0 { -1 } else { 1 };
            return Some(Fraction::new(
                whole * frac.denominator + sign * frac.numerator,
                frac.denominator,
            ));
        }

        match text.split_once('/') {
            Some((n, d)) => {
                let numerator: i64 = n.trim().parse().ok()?;
                let denominator: i64 = d.trim().parse().ok()?;
                if denominator == 0 {
                    return None;
                }
                Some(Fraction::new(numerator, denominator))
            }
            None => text.parse::<i64>().ok().map(Fraction::whole),
        }
    }
}

impl fmt::Display for Fraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}

/// Integer-coefficient polynomial; `coefficients[k]` multiplies `x^k`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Polynomial {
    coefficients: Vec<i64>,
}

impl Polynomial {
    pub fn new(coefficients: Vec<i64>) -> Self {
        let mut poly = Self { coefficients };
        poly.trim();
        poly
    }

    fn trim(&mut self) {
        while self.coefficients.len() > 1 && self.coefficients.last() == Some(&0) {
            self.coefficients.pop();
        }
    }

    pub fn coefficients(&self) -> &[i64] {
        &self.coefficients
    }

    pub fn degree(&self) -> usize {
        self.coefficients.len().saturating_sub(1)
    }

    pub fn eval(&self, x: i64) -> i64 {
        self.coefficients
            .iter()
            .rev()
            .fold(0, |acc, &c| acc * x + c)
    }

    pub fn derivative(&self) -> Polynomial {
        if self.coefficients.len() <= 1 {
            return Polynomial::new(vec![0]);
        }
        Polynomial::new(
            self.coefficients
                .iter()
                .enumerate()
                .skip(1)
                .map(|(power, c)| c * power as i64)
                .collect(),
        )
    }

    /// Exact definite integral from `a` to `b`
    pub fn integrate(&self, a: i64, b: i64) -> Fraction {
        self.coefficients
            .iter()
            .enumerate()
            .fold(Fraction::whole(0), |acc, (power, &c)| {
                let k = power as u32 + 1;
                let delta = b.pow(k) - a.pow(k);
                acc.add(&Fraction::new(c * delta, k as i64))
            })
    }
}

impl fmt::Display for Polynomial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut wrote = false;
        for (power, &c) in self.coefficients.iter().enumerate().rev() {
            if c == 0 {
                continue;
            }
            let magnitude = c.unsigned_abs();
            if wrote {
                write!(f, " {} ", if c < 0 { '-' } else { '+' })?;
            } else if c < 0 {
                write!(f, "-")?;
            }
            match power {
                0 => write!(f, "{}", magnitude)?,
                _ => {
                    if magnitude != 1 {
                        write!(f, "{}", magnitude)?;
                    }
                    if power == 1 {
                        write!(f, "x")?;
                    } else {
                        write!(f, "x^{}", power)?;
                    }
                }
            }
            wrote = true;
        }
        if !wrote {
            write!(f, "0")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gcd_lcm() {
        assert_eq!(gcd(12, 18), 6);
        assert_eq!(gcd(-12, 18), 6);
        assert_eq!(gcd(7, 0), 7);
        assert_eq!(lcm(4, 6), 12);
        assert_eq!(lcm(0, 6), 0);
    }

    #[test]
    fn test_fraction_reduce_normalizes_sign() {
        assert_eq!(Fraction::new(6, 8).reduced(), Fraction::new(3, 4));
        assert_eq!(Fraction::new(3, -6).reduced(), Fraction::new(-1, 2));
        assert!(Fraction::new(3, 4).is_reduced());
        assert!(!Fraction::new(2, 4).is_reduced());
    }

    #[test]
    fn test_fraction_equivalence_by_cross_multiplication() {
        let answer = Fraction::new(2, 1);
        assert!(Fraction::parse("12/6").unwrap().equivalent(&answer));
        assert!(Fraction::new(1, 3).equivalent(&Fraction::new(3, 9)));
        assert!(!Fraction::new(1, 3).equivalent(&Fraction::new(33, 100)));
        assert!(!Fraction::new(1, 0).equivalent(&Fraction::new(1, 0)));
    }

    #[test]
    fn test_fraction_arithmetic_reduces() {
        let half = Fraction::new(1, 2);
        let third = Fraction::new(1, 3);
        assert_eq!(half.add(&third), Fraction::new(5, 6));
        assert_eq!(half.sub(&third), Fraction::new(1, 6));
        assert_eq!(Fraction::new(2, 3).mul(&Fraction::new(3, 4)), Fraction::new(1, 2));
        assert_eq!(half.checked_div(&third), Some(Fraction::new(3, 2)));
        assert_eq!(half.checked_div(&Fraction::new(0, 5)), None);
    }

    #[test]
    fn test_fraction_compare_by_value() {
        use std::cmp::Ordering;
        assert_eq!(
            Fraction::new(2, 3).cmp_value(&Fraction::new(3, 5)),
            Some(Ordering::Greater)
        );
        assert_eq!(
            Fraction::new(2, 4).cmp_value(&Fraction::new(1, 2)),
            Some(Ordering::Equal)
        );
    }

    #[test]
    fn test_fraction_parse_forms() {
        assert_eq!(Fraction::parse("3/4"), Some(Fraction::new(3, 4)));
        assert_eq!(Fraction::parse(" 5 "), Some(Fraction::whole(5)));
        assert_eq!(Fraction::parse("1 1/2"), Some(Fraction::new(3, 2)));
        assert_eq!(Fraction::parse("-1 1/2"), Some(Fraction::new(-3, 2)));
        assert_eq!(Fraction::parse("1/0"), None);
        assert_eq!(Fraction::parse("abc"), None);
    }

    #[test]
    fn test_polynomial_display() {
        assert_eq!(Polynomial::new(vec![5, -2, 0, 3]).to_string(), "3x^3 - 2x + 5");
        assert_eq!(Polynomial::new(vec![0, 1]).to_string(), "x");
        assert_eq!(Polynomial::new(vec![-1, 0, -1]).to_string(), "-x^2 - 1");
        assert_eq!(Polynomial::new(vec![0, 0]).to_string(), "0");
    }

    #[test]
    fn test_polynomial_calculus() {
        let p = Polynomial::new(vec![1, 2, 3]); // 3x^2 + 2x + 1
        assert_eq!(p.eval(2), 17);
        assert_eq!(p.derivative(), Polynomial::new(vec![2, 6]));
        // x^3 + x^2 + x from 0 to 2 = 8 + 4 + 2
        assert_eq!(p.integrate(0, 2), Fraction::whole(14));
        // x from 0 to 1 = 1/2
        assert_eq!(Polynomial::new(vec![0, 1]).integrate(0, 1), Fraction::new(1, 2));
    }
}
