//! Helper functions for using `quickcheck`'s `Arbitrary` trait

use quickcheck::Arbitrary;

/// Image side length in `1..=max`, small enough to keep properties fast.
#[must_use]
pub fn side_length(gen: &mut quickcheck::Gen, max: u32) -> u32 {
    u32::arbitrary(gen) % max + 1
}

#[must_use]
pub fn optional_side_length(gen: &mut quickcheck::Gen, max: u32) -> Option<u32> {
    if bool::arbitrary(gen) {
        Some(side_length(gen, max))
    } else {
        None
    }
}
