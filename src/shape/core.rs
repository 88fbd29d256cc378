/// Record shapes and the run-time dispatcher.
///
/// A record is `record_words` native-endian u64 words; the first `key_words`
/// of them form the sort key, compared from the highest key word index down.
/// Per-record operations are monomorphized per key width so the comparison
/// and fill loops unroll completely — on sort-sized workloads (billions of
/// comparisons) that unrolling is the difference between measuring the engine
/// and measuring the harness. Dispatch picks the descriptor exactly once per
/// run; the per-record calls then go through plain function pointers.
use std::cmp::Ordering;

use rand::RngCore;
use rand::rngs::StdRng;

use crate::engine::{MAX_RECORD_BYTES, MAX_RECORD_WORDS};
use crate::error::HarnessError;

pub type CompareFn = fn(&[u64], &[u64]) -> Ordering;
pub type FillFn = fn(&mut [u64], &mut StdRng, u64);

/// Descriptor for one supported record shape, selected once per run.
#[derive(Clone, Copy)]
pub struct ShapeOps {
    /// Total words per record (`record_bytes / 8`).
    pub record_words: usize,
    /// Key-prefix words (`ceil(key_bytes / 8)`).
    pub key_words: usize,
    /// Orders two records by their key prefix.
    pub compare: CompareFn,
    /// Randomizes one record's key words; zeroes its payload words.
    pub fill: FillFn,
}

impl std::fmt::Debug for ShapeOps {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShapeOps")
            .field("record_words", &self.record_words)
            .field("key_words", &self.key_words)
            .finish()
    }
}

/// Compare two records over their first `KW` words, highest index first.
/// Words beyond the key never influence the ordering.
fn compare_records<const KW: usize>(a: &[u64], b: &[u64]) -> Ordering {
    for i in (0..KW).rev() {
        match a[i].cmp(&b[i]) {
            Ordering::Equal => continue,
            ord => return ord,
        }
    }
    Ordering::Equal
}

/// Fill one record: independent uniform draws for each key word, the most
/// significant key word masked down to the configured key byte width, and
/// payload words zeroed so every generated record has fully defined content.
fn fill_record<const KW: usize>(rec: &mut [u64], rng: &mut StdRng, msw_mask: u64) {
    for i in (0..KW).rev() {
        rec[i] = rng.next_u64();
    }
    rec[KW - 1] &= msw_mask;
    for w in rec.iter_mut().skip(KW) {
        *w = 0;
    }
}

/// Per-key-width operation table, indexed by `key_words - 1`.
/// The array length is pinned to `MAX_RECORD_WORDS`, so widening the engine
/// contract without extending this table is a compile error.
const KEY_OPS: [(CompareFn, FillFn); MAX_RECORD_WORDS] = [
    (compare_records::<1>, fill_record::<1>),
    (compare_records::<2>, fill_record::<2>),
    (compare_records::<3>, fill_record::<3>),
    (compare_records::<4>, fill_record::<4>),
    (compare_records::<5>, fill_record::<5>),
    (compare_records::<6>, fill_record::<6>),
    (compare_records::<7>, fill_record::<7>),
    (compare_records::<8>, fill_record::<8>),
];

/// Select the unique supported shape for a `(record_bytes, key_bytes)` pair.
///
/// Scans candidate record widths from `MAX_RECORD_WORDS` down to 1 and,
/// within each, key widths from the record width down to 1, stopping at the
/// first exact match. Quadratic in `MAX_RECORD_WORDS`, but it runs once per
/// run — never per record.
pub fn dispatch(record_bytes: usize, key_bytes: usize) -> Result<ShapeOps, HarnessError> {
    if record_bytes == 0 || record_bytes % 8 != 0 {
        return Err(HarnessError::Config(format!(
            "record size must be a positive multiple of 8, got {record_bytes}"
        )));
    }
    if key_bytes == 0 || key_bytes > record_bytes {
        return Err(HarnessError::Config(format!(
            "key size must be in 1..={record_bytes}, got {key_bytes}"
        )));
    }

    let rec_words = record_bytes / 8;
    let key_words = (key_bytes + 7) / 8;

    for rw in (1..=MAX_RECORD_WORDS).rev() {
        if rw != rec_words {
            continue;
        }
        for kw in (1..=rw).rev() {
            if kw != key_words {
                continue;
            }
            let (compare, fill) = KEY_OPS[kw - 1];
            return Ok(ShapeOps {
                record_words: rw,
                key_words: kw,
                compare,
                fill,
            });
        }
    }

    Err(HarnessError::Config(format!(
        "record size {record_bytes} exceeds the engine maximum of {MAX_RECORD_BYTES} bytes"
    )))
}

/// Mask for the most significant key word: when `key_bytes` is not a whole
/// number of words, the top word's bytes beyond the key are forced to zero so
/// the logical key occupies exactly `key_bytes` significant bytes.
pub fn most_significant_word_mask(key_bytes: usize) -> u64 {
    match key_bytes % 8 {
        0 => u64::MAX,
        r => u64::MAX >> ((8 - r) * 8),
    }
}
