//! Random operand primitives

use rand::seq::IndexedRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Inclusive integer range used by every operand constraint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntRange {
    pub min: i64,
    pub max: i64,
}

impl IntRange {
    pub const fn new(min: i64, max: i64) -> Self {
        Self { min, max }
    }

    pub const fn fixed(value: i64) -> Self {
        Self {
            min: value,
            max: value,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.min <= self.max
    }

    pub fn is_fixed(&self) -> bool {
        self.min == self.max
    }

    pub fn contains(&self, value: i64) -> bool {
        (self.min..=self.max).contains(&value)
    }

    /// Uniform sample; an inverted range collapses to `min`
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> i64 {
        if self.max <= self.min {
            return self.min;
        }
        rng.random_range(self.min..=self.max)
    }

    /// Uniform sample that is never zero (falls back to `max` for `0..=0`)
    pub fn sample_nonzero<R: Rng + ?Sized>(&self, rng: &mut R) -> i64 {
        for _ in 0..32 {
            let value = self.sample(rng);
            if value != 0 {
                return value;
            }
        }
        if self.max != 0 {
            self.max
        } else {
            1
        }
    }
}

impl fmt::Display for IntRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_fixed() {
            write!(f, "{}", self.min)
        } else {
            write!(f, "{}..={}", self.min, self.max)
        }
    }
}

/// Pick one item from a non-empty vocabulary list
pub fn pick<'a, R: Rng + ?Sized>(rng: &mut R, items: &[&'a str]) -> &'a str {
    items.choose(rng).copied().unwrap_or_default()
}

/// Uniform worksheet number in `start..=end`
pub fn worksheet_in<R: Rng + ?Sized>(rng: &mut R, start: u32, end: u32) -> u32 {
    if end <= start {
        return start;
    }
    rng.random_range(start..=end)
}
