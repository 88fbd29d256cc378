use super::*;
use crate::buffer::AlignedBuffer;
use crate::shape::dispatch;

#[test]
fn test_partition_covers_range_without_gaps() {
    for (n, t) in [(100, 4), (101, 4), (7, 3), (1, 1), (5, 8), (1000, 7)] {
        let ranges = partition_ranges(n, t);
        assert_eq!(ranges.len(), t);
        assert_eq!(ranges[0].0, 0);
        assert_eq!(ranges[t - 1].1, n);
        for w in ranges.windows(2) {
            // contiguous and disjoint: each range starts where the previous ended
            assert_eq!(w[0].1, w[1].0);
        }
        for &(start, end) in &ranges {
            assert!(start <= end);
        }
    }
}

#[test]
fn test_partition_last_task_absorbs_remainder() {
    let ranges = partition_ranges(103, 4);
    assert_eq!(ranges, vec![(0, 25), (25, 50), (50, 75), (75, 103)]);
}

#[test]
fn test_generation_is_deterministic() {
    let shape = dispatch(16, 8).unwrap();
    let mut a = vec![0u64; 1000 * 2];
    let mut b = vec![u64::MAX; 1000 * 2];
    generate(&mut a, &shape, 8, 4);
    generate(&mut b, &shape, 8, 4);
    assert_eq!(a, b);
}

#[test]
fn test_generation_masks_top_key_word() {
    let shape = dispatch(16, 9).unwrap();
    let mut words = vec![0u64; 500 * 2];
    generate(&mut words, &shape, 9, 3);
    // key_bytes=9: upper 56 bits of word 1 masked to zero
    for rec in words.chunks_exact(2) {
        assert!(rec[1] <= 0xFF, "unmasked top word: {:#x}", rec[1]);
    }
}

#[test]
fn test_generation_whole_word_key_not_truncated() {
    let shape = dispatch(16, 16).unwrap();
    let mut words = vec![0u64; 500 * 2];
    generate(&mut words, &shape, 16, 3);
    assert!(
        words.chunks_exact(2).any(|rec| rec[1] >> 56 != 0),
        "key_bytes=16 must not mask the top word"
    );
}

#[test]
fn test_generation_zeroes_payload_words() {
    let shape = dispatch(32, 8).unwrap();
    let mut words = vec![u64::MAX; 100 * 4];
    generate(&mut words, &shape, 8, 2);
    for rec in words.chunks_exact(4) {
        assert_eq!(&rec[1..], &[0, 0, 0]);
    }
}

#[test]
fn test_round_trip_write_then_load() {
    let shape = dispatch(16, 8).unwrap();
    let n_recs = 300;
    let mut original = AlignedBuffer::new(n_recs * 2);
    generate(original.words_mut(), &shape, 8, 4);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("records.bin");
    write_file(&path, original.as_bytes()).unwrap();

    assert_eq!(infer_record_count(&path, 16, None).unwrap(), n_recs);
    assert_eq!(infer_record_count(&path, 16, Some(n_recs)).unwrap(), n_recs);

    let mut loaded = AlignedBuffer::new(n_recs * 2);
    load_file(&path, loaded.as_bytes_mut()).unwrap();
    assert_eq!(original.as_bytes(), loaded.as_bytes());
}

#[test]
fn test_load_rejects_partial_trailing_record() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("truncated.bin");
    std::fs::write(&path, vec![0u8; 16 * 5 + 7]).unwrap();

    assert!(infer_record_count(&path, 16, None).is_err());
    assert!(infer_record_count(&path, 16, Some(5)).is_err());
}

#[test]
fn test_load_missing_file_is_io_error() {
    let err = infer_record_count(std::path::Path::new("/no/such/file"), 16, None).unwrap_err();
    assert!(matches!(err, crate::HarnessError::Io { .. }));
}
