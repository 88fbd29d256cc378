/// Dataset provider: fills the aligned primary buffer either from a file or
/// by deterministic parallel generation. The two modes are mutually
/// exclusive, selected by whether an input path is configured.
use std::fs;
use std::path::Path;

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::common::io::{file_size, read_file};
use crate::error::HarnessError;
use crate::shape::{ShapeOps, most_significant_word_mask};

/// Partition `[0, n_recs)` into `tasks` contiguous, gap-free ranges.
/// Task t owns `[t*part, (t+1)*part)` with `part = n_recs / tasks`; the last
/// task extends to `n_recs`, absorbing the remainder.
pub fn partition_ranges(n_recs: usize, tasks: usize) -> Vec<(usize, usize)> {
    let tasks = tasks.max(1);
    let part = n_recs / tasks;
    (0..tasks)
        .map(|t| {
            let start = t * part;
            let end = if t == tasks - 1 { n_recs } else { (t + 1) * part };
            (start, end)
        })
        .collect()
}

/// Fill `words` with `words.len() / shape.record_words` random records.
///
/// One generation task per partition range, each on its own disjoint
/// sub-slice, each seeded from its range's start index — so identical
/// `(n_recs, tasks)` regenerate the dataset bit for bit, regardless of how
/// the tasks interleave. The scope join is the only ordering guarantee the
/// caller gets or needs.
pub fn generate(words: &mut [u64], shape: &ShapeOps, key_bytes: usize, tasks: usize) {
    let rw = shape.record_words;
    let n_recs = words.len() / rw;
    let mask = most_significant_word_mask(key_bytes);
    let fill = shape.fill;

    rayon::scope(|s| {
        let mut rest = words;
        for (start, end) in partition_ranges(n_recs, tasks) {
            let (chunk, tail) = std::mem::take(&mut rest).split_at_mut((end - start) * rw);
            rest = tail;
            s.spawn(move |_| {
                let mut rng = StdRng::seed_from_u64(start as u64);
                for rec in chunk.chunks_exact_mut(rw) {
                    fill(rec, &mut rng, mask);
                }
            });
        }
    });
}

/// Determine the record count for a file input: infer it from the file size
/// when not configured, and in all cases require the file to hold an exact,
/// whole number of records.
pub fn infer_record_count(
    path: &Path,
    record_bytes: usize,
    configured: Option<usize>,
) -> Result<usize, HarnessError> {
    let size = file_size(path).map_err(|e| HarnessError::io(path, e))? as usize;
    let n_recs = match configured {
        Some(n) => n,
        None => size / record_bytes,
    };
    if n_recs == 0 {
        return Err(HarnessError::Config(format!(
            "{}: too small to hold a single {record_bytes}-byte record",
            path.display()
        )));
    }
    if n_recs * record_bytes != size {
        return Err(HarnessError::Config(format!(
            "{}: {size} bytes is not exactly {n_recs} records of {record_bytes} bytes",
            path.display()
        )));
    }
    Ok(n_recs)
}

/// Read exactly `dest.len()` dataset bytes from `path` into the aligned
/// buffer window.
pub fn load_file(path: &Path, dest: &mut [u8]) -> Result<(), HarnessError> {
    let data = read_file(path).map_err(|e| HarnessError::io(path, e))?;
    if data.len() != dest.len() {
        return Err(HarnessError::Config(format!(
            "{}: holds {} bytes, expected {}",
            path.display(),
            data.len(),
            dest.len()
        )));
    }
    dest.copy_from_slice(&data);
    Ok(())
}

/// Write the result bytes to `path`. Raw concatenation of fixed-size
/// records: no header, no checksum, words in native order.
pub fn write_file(path: &Path, bytes: &[u8]) -> Result<(), HarnessError> {
    fs::write(path, bytes).map_err(|e| HarnessError::io(path, e))
}
