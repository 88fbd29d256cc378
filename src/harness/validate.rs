/// Pure result checks, separated from the orchestration so they can be
/// exercised on hand-built buffers.
use std::cmp::Ordering;

use crate::shape::ShapeOps;

/// Index of the first record that is greater than its successor, or None if
/// the buffer is non-decreasing under the shape ordering. A single linear
/// scan; idempotent.
pub fn first_disorder(words: &[u64], shape: &ShapeOps) -> Option<usize> {
    let rw = shape.record_words;
    let mut prev: Option<&[u64]> = None;
    for (i, rec) in words.chunks_exact(rw).enumerate() {
        if let Some(p) = prev {
            if (shape.compare)(p, rec) == Ordering::Greater {
                return Some(i - 1);
            }
        }
        prev = Some(rec);
    }
    None
}

/// True iff no adjacent pair is out of order.
pub fn is_sorted(words: &[u64], shape: &ShapeOps) -> bool {
    first_disorder(words, shape).is_none()
}

/// Index of the first record that differs from the reference sequence, or
/// None when the sequences are identical. Full byte-for-byte record
/// equality — key and payload — which is what upgrades a sortedness check
/// into a true-permutation check: every payload must still ride with the key
/// it entered with.
pub fn first_mismatch(
    result: &[u64],
    reference: &[&[u64]],
    record_words: usize,
) -> Option<usize> {
    for (i, (rec, expected)) in result.chunks_exact(record_words).zip(reference).enumerate() {
        if rec != *expected {
            return Some(i);
        }
    }
    None
}
