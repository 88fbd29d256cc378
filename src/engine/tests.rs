use super::*;
use crate::shape::dispatch;

/// Flatten records (as word arrays) into a buffer.
fn buffer_of(recs: &[&[u64]]) -> Vec<u64> {
    recs.iter().flat_map(|r| r.iter().copied()).collect()
}

fn records(buf: &[u64], rw: usize) -> Vec<Vec<u64>> {
    buf.chunks_exact(rw).map(|c| c.to_vec()).collect()
}

#[test]
fn test_parity_rule() {
    assert!(sorted_in_scratch(1));
    assert!(!sorted_in_scratch(2));
    assert!(sorted_in_scratch(3));
    assert!(!sorted_in_scratch(4));
}

#[test]
fn test_sort_single_key_word_lands_in_scratch() {
    // rec 16 bytes, key 8 bytes: one pass, odd, result in scratch
    let shape = dispatch(16, 8).unwrap();
    let mut primary = buffer_of(&[&[5, 0], &[1, 1], &[9, 2], &[3, 3]]);
    let mut scratch = vec![0u64; primary.len()];

    sort(&mut primary, &mut scratch, 4, &shape, 2);

    assert!(sorted_in_scratch(shape.key_words));
    assert_eq!(
        records(&scratch, 2),
        vec![vec![1, 1], vec![3, 3], vec![5, 0], vec![9, 2]]
    );
}

#[test]
fn test_sort_two_key_words_lands_in_primary() {
    // rec 16 bytes, key 16 bytes: two passes, even, result back in primary
    let shape = dispatch(16, 16).unwrap();
    // word index 1 is the most significant
    let mut primary = buffer_of(&[&[0, 2], &[5, 1], &[9, 0], &[1, 1]]);
    let mut scratch = vec![0u64; primary.len()];

    sort(&mut primary, &mut scratch, 4, &shape, 2);

    assert!(!sorted_in_scratch(shape.key_words));
    assert_eq!(
        records(&primary, 2),
        vec![vec![9, 0], vec![1, 1], vec![5, 1], vec![0, 2]]
    );
}

#[test]
fn test_sort_matches_comparison_sort() {
    let shape = dispatch(24, 16).unwrap();
    let rw = shape.record_words;
    let n = 1000;

    // Deterministic scrambled input with a payload tagging the original slot
    let mut primary: Vec<u64> = Vec::with_capacity(n * rw);
    for i in 0..n as u64 {
        primary.push(i.wrapping_mul(0x9E37_79B9_7F4A_7C15));
        primary.push(i.wrapping_mul(0xC2B2_AE3D_27D4_EB4F) % 3);
        primary.push(i);
    }
    let mut scratch = vec![0u64; primary.len()];

    let mut expected = records(&primary, rw);
    expected.sort_by(|a, b| (shape.compare)(a, b));

    sort(&mut primary, &mut scratch, n, &shape, 4);

    let result = if sorted_in_scratch(shape.key_words) {
        &scratch
    } else {
        &primary
    };
    assert_eq!(records(result, rw), expected);
}

#[test]
fn test_sort_is_stable_and_preserves_payload() {
    // Duplicate keys with distinct payloads: payloads must ride with their
    // key and equal keys must keep input order.
    let shape = dispatch(16, 8).unwrap();
    let mut primary = buffer_of(&[&[7, 100], &[2, 200], &[7, 300], &[2, 400]]);
    let mut scratch = vec![0u64; primary.len()];

    sort(&mut primary, &mut scratch, 4, &shape, 1);

    assert_eq!(
        records(&scratch, 2),
        vec![vec![2, 200], vec![2, 400], vec![7, 100], vec![7, 300]]
    );
}

#[test]
fn test_sort_single_record() {
    let shape = dispatch(16, 8).unwrap();
    let mut primary = vec![42u64, 7u64];
    let mut scratch = vec![0u64; 2];
    sort(&mut primary, &mut scratch, 1, &shape, 1);
    assert_eq!(scratch, vec![42, 7]);
}

#[test]
fn test_prepare_scratch_zeroes_buffer() {
    let mut scratch = vec![u64::MAX; 1024];
    prepare_scratch(&mut scratch, 4);
    assert!(scratch.iter().all(|&w| w == 0));
}

#[test]
fn test_prepare_scratch_empty() {
    let mut scratch: Vec<u64> = Vec::new();
    prepare_scratch(&mut scratch, 4);
}
