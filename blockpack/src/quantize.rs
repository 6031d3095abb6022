//! Derives the block unit all placement math runs in.

use crate::types::SourceRect;

/// Computes the block size for a set of rectangles: the greatest common
/// divisor of every width and height in the set.
///
/// Quantizing to this unit shrinks the placement grid from pixels to blocks
/// without changing which arrangements are possible, since every rectangle
/// spans a whole number of blocks. Returns `None` for an empty set, where no
/// block size is meaningful. A result of 1 means the dimensions share no
/// factor and the search runs at full pixel resolution.
pub fn block_size(rects: &[SourceRect]) -> Option<u32> {
    let mut result: Option<u32> = None;

    for rect in rects {
        let (w, h) = rect.size();

        for dim in [w, h].iter().copied() {
            result = Some(match result {
                Some(acc) => gcd(acc, dim),
                None => dim,
            });

            // GCD can only shrink; once it hits 1 we're done.
            if result == Some(1) {
                return result;
            }
        }
    }

    result
}

fn gcd(a: u32, b: u32) -> u32 {
    let (mut a, mut b) = (a, b);
    while b != 0 {
        let r = a % b;
        a = b;
        b = r;
    }
    a
}
