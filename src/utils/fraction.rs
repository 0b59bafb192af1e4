use std::cmp::Ordering;

/// A scale factor such as `target / source`, kept exact to avoid float drift
/// when planning output dimensions.
#[derive(Debug, Copy, Clone)]
pub struct Fraction {
    numerator: u32,
    denominator: u32,
}

impl Fraction {
    pub fn new(numerator: u32, denominator: u32) -> Self {
        debug_assert!(denominator != 0);
        Fraction {
            numerator,
            denominator,
        }
    }

    /// Scales `value` by this fraction, rounding to the nearest integer (halves round up).
    /// Never returns less than 1, a zero-sized axis is not a valid image.
    pub fn scale(&self, value: u32) -> u32 {
        // doubling a product of two u32 values does not fit in u64
        let numerator = u128::from(value) * u128::from(self.numerator);
        let denominator = u128::from(self.denominator);
        let rounded = (2 * numerator + denominator) / (2 * denominator);
        rounded.clamp(1, u128::from(u32::MAX)) as u32
    }
}

impl PartialEq for Fraction {
    fn eq(&self, other: &Self) -> bool {
        let (a, b) = self.cross_multiply(other);
        a == b
    }
}

impl Eq for Fraction {}

impl PartialOrd for Fraction {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Fraction {
    fn cmp(&self, other: &Self) -> Ordering {
        let (a, b) = self.cross_multiply(other);
        a.cmp(&b)
    }
}

impl Fraction {
    /// Cross-multiplication to compare fractions without using floating-point arithmetic
    /// `a/b < c/d` is equivalent to `a * d < c * b`
    fn cross_multiply(&self, other: &Self) -> (u64, u64) {
        (
            u64::from(self.numerator) * u64::from(other.denominator),
            u64::from(other.numerator) * u64::from(self.denominator),
        )
    }
}
