use super::*;
use crate::engine::ALIGNMENT;

#[test]
fn test_window_is_aligned() {
    for words in [1, 31, 32, 33, 1000] {
        let buf = AlignedBuffer::new(words);
        assert_eq!(buf.words().as_ptr() as usize % ALIGNMENT, 0);
        assert_eq!(buf.len(), words);
    }
}

#[test]
fn test_new_buffer_is_zeroed() {
    let buf = AlignedBuffer::new(256);
    assert!(buf.words().iter().all(|&w| w == 0));
}

#[test]
fn test_byte_view_round_trip() {
    let mut buf = AlignedBuffer::new(4);
    buf.words_mut().copy_from_slice(&[1, 2, 3, u64::MAX]);
    assert_eq!(buf.as_bytes().len(), 32);
    assert_eq!(&buf.as_bytes()[24..32], &[0xFF; 8]);

    let mut other = AlignedBuffer::new(4);
    other.as_bytes_mut().copy_from_slice(buf.as_bytes());
    assert_eq!(other.words(), &[1, 2, 3, u64::MAX]);
}
