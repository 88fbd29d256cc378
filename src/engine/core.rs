/// The sort engine and its buffer contract.
///
/// The harness treats this module as a boundary: callers depend only on the
/// constants below and on the documented pass/parity behavior of `sort`, not
/// on how a pass orders records internally.
///
/// Contract: `sort` performs `key_words` passes over word-wide digits, least
/// significant key word first. Every pass scatters all records from the
/// active buffer into the other one (ping-pong), and every pass is stable.
/// After the final pass the sorted sequence lives in the primary buffer when
/// `key_words` is even and in the scratch buffer when it is odd —
/// `sorted_in_scratch` is the single authority on that rule.
use rayon::prelude::*;

use crate::shape::ShapeOps;

/// Buffer alignment the engine requires, in bytes.
pub const ALIGNMENT: usize = 256;

/// Widest supported record, in 8-byte words.
pub const MAX_RECORD_WORDS: usize = 8;

/// Widest supported record, in bytes.
pub const MAX_RECORD_BYTES: usize = MAX_RECORD_WORDS * 8;

const RADIX_BITS: usize = 8;
const NUM_BUCKETS: usize = 1 << RADIX_BITS;
const RADIX_MASK: u64 = (NUM_BUCKETS - 1) as u64;
const DIGITS_PER_WORD: usize = 64 / RADIX_BITS;

/// The pass-parity rule: after `key_words` ping-pong passes starting in the
/// primary buffer, an odd pass count leaves the result in scratch.
#[inline]
pub fn sorted_in_scratch(key_words: usize) -> bool {
    key_words % 2 == 1
}

/// Optional pre-sort normalization of the scratch buffer: zero it in parallel
/// chunks. Pre-faults the pages so the first sort pass doesn't pay for them.
/// Advisory only — sorting is correct without it.
pub fn prepare_scratch(scratch: &mut [u64], threads: usize) {
    if scratch.is_empty() {
        return;
    }
    let chunk = scratch.len().div_ceil(threads.max(1)).max(1);
    scratch.par_chunks_mut(chunk).for_each(|c| c.fill(0));
}

/// Sort `n_recs` records of `shape` held in `primary`, using `scratch` as the
/// ping-pong partner. Both buffers must hold at least
/// `n_recs * shape.record_words` words and be `ALIGNMENT`-aligned. `threads`
/// is a sizing hint for the parallel scatter.
pub fn sort(
    primary: &mut [u64],
    scratch: &mut [u64],
    n_recs: usize,
    shape: &ShapeOps,
    threads: usize,
) {
    let rw = shape.record_words;
    let len = n_recs * rw;
    assert!(primary.len() >= len, "primary buffer too small");
    assert!(scratch.len() >= len, "scratch buffer too small");

    let mut src = &mut primary[..len];
    let mut dst = &mut scratch[..len];

    let mut order: Vec<usize> = Vec::with_capacity(n_recs);
    let mut order_tmp: Vec<usize> = vec![0; n_recs];

    for word in 0..shape.key_words {
        // Stable order of the source records by this key word, as a
        // permutation. Record data moves exactly once per pass.
        order.clear();
        order.extend(0..n_recs);
        sort_indices_by_word(&*src, rw, word, &mut order, &mut order_tmp);
        scatter(&*src, dst, rw, &order, threads);
        std::mem::swap(&mut src, &mut dst);
    }
}

/// LSD counting sort of a record permutation by one 64-bit key word, eight
/// bits per digit. Stable: equal words keep their incoming relative order,
/// which is what chains the word passes into a correct multi-word sort.
fn sort_indices_by_word(
    recs: &[u64],
    rw: usize,
    word: usize,
    order: &mut Vec<usize>,
    tmp: &mut Vec<usize>,
) {
    let n = order.len();
    for digit in 0..DIGITS_PER_WORD {
        let shift = digit * RADIX_BITS;

        let mut hist = [0usize; NUM_BUCKETS];
        for &i in order.iter() {
            let d = ((recs[i * rw + word] >> shift) & RADIX_MASK) as usize;
            hist[d] += 1;
        }

        // All records share this byte value — nothing to move.
        if hist.iter().any(|&c| c == n) {
            continue;
        }

        // Exclusive prefix sums turn counts into bucket start offsets.
        let mut sum = 0usize;
        for count in hist.iter_mut() {
            let c = *count;
            *count = sum;
            sum += c;
        }

        for &i in order.iter() {
            let d = ((recs[i * rw + word] >> shift) & RADIX_MASK) as usize;
            tmp[hist[d]] = i;
            hist[d] += 1;
        }

        std::mem::swap(order, tmp);
    }
}

/// Move records from `src` into `dst` in permutation order. Destination
/// positions are disjoint per chunk, so chunks scatter in parallel; `src` is
/// only read.
fn scatter(src: &[u64], dst: &mut [u64], rw: usize, order: &[usize], threads: usize) {
    let n = order.len();
    if n == 0 {
        return;
    }
    let chunk_recs = n.div_ceil(threads.max(1)).max(1);
    dst.par_chunks_mut(chunk_recs * rw)
        .zip(order.par_chunks(chunk_recs))
        .for_each(|(out, idxs)| {
            for (rec_out, &i) in out.chunks_exact_mut(rw).zip(idxs) {
                rec_out.copy_from_slice(&src[i * rw..i * rw + rw]);
            }
        });
}
