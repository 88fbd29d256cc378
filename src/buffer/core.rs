/// Working buffers for the engine.
///
/// The engine requires its buffers on an `ALIGNMENT` boundary. A raw
/// allocation of `words + ALIGNMENT/8` words always contains an aligned
/// window of the requested size; the window offset is found by advancing
/// from the base address to the first boundary. The allocation is owned by
/// the type, so it is released on every exit path — success or error.
use std::slice;

use crate::engine::ALIGNMENT;

pub struct AlignedBuffer {
    raw: Vec<u64>,
    /// Word offset of the aligned window within `raw`.
    offset: usize,
    /// Words in the aligned window.
    len: usize,
}

impl AlignedBuffer {
    /// Allocate a zeroed buffer exposing `words` aligned u64 words.
    pub fn new(words: usize) -> Self {
        let pad = ALIGNMENT / 8;
        let raw = vec![0u64; words + pad];
        let base = raw.as_ptr() as usize;
        // Vec<u64> is 8-byte aligned, so the boundary is a whole number of
        // words away.
        let offset = (base.next_multiple_of(ALIGNMENT) - base) / 8;
        AlignedBuffer {
            raw,
            offset,
            len: words,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn words(&self) -> &[u64] {
        &self.raw[self.offset..self.offset + self.len]
    }

    pub fn words_mut(&mut self) -> &mut [u64] {
        &mut self.raw[self.offset..self.offset + self.len]
    }

    /// Byte view of the aligned window, for file I/O.
    pub fn as_bytes(&self) -> &[u8] {
        let words = self.words();
        // SAFETY: u64 has no padding and alignment 8 > 1; reinterpreting the
        // window as bytes of the same total size is always valid.
        unsafe { slice::from_raw_parts(words.as_ptr() as *const u8, words.len() * 8) }
    }

    /// Mutable byte view of the aligned window.
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        let words = self.words_mut();
        let len = words.len() * 8;
        // SAFETY: as in as_bytes; the borrow is tied to &mut self.
        unsafe { slice::from_raw_parts_mut(words.as_mut_ptr() as *mut u8, len) }
    }
}
