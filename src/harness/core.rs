/// The end-to-end run: allocate, populate, snapshot, sort, locate the result
/// via the pass-parity rule, validate, persist, release.
///
/// Every buffer is owned by this function through `AlignedBuffer`, so every
/// exit path — including every error return — releases all three
/// allocations. Nothing here retries: a correctness failure is the condition
/// the harness exists to detect.
use std::path::PathBuf;
use std::time::{Duration, Instant};

use rayon::prelude::*;

use crate::buffer::AlignedBuffer;
use crate::dataset;
use crate::engine;
use crate::error::HarnessError;
use crate::harness::validate;
use crate::shape::dispatch;

/// Configuration for one harness run. The caller (the CLI layer) validates
/// the surface before the core runs; `run` re-checks only the invariants the
/// dispatcher and the allocator depend on.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub n_recs: usize,
    /// Worker-task count for generation and a sizing hint for the engine.
    pub threads: usize,
    pub record_bytes: usize,
    pub key_bytes: usize,
    /// When set, records are loaded from this file instead of generated.
    pub input: Option<PathBuf>,
    /// When set, the sorted result is written here.
    pub output: Option<PathBuf>,
    /// Compare the result against an independently sorted reference copy.
    pub full_validation: bool,
    /// Zero the scratch buffer before sorting (advisory, defaults on).
    pub clear_scratch: bool,
    /// Suppress stderr phase narration.
    pub quiet: bool,
}

impl RunConfig {
    pub fn new(n_recs: usize, record_bytes: usize, key_bytes: usize) -> Self {
        RunConfig {
            n_recs,
            threads: 1,
            record_bytes,
            key_bytes,
            input: None,
            output: None,
            full_validation: false,
            clear_scratch: true,
            quiet: true,
        }
    }
}

/// Phase timings and result placement for a completed run.
#[derive(Debug)]
pub struct RunReport {
    pub n_recs: usize,
    pub record_bytes: usize,
    pub key_words: usize,
    /// Whether the parity rule located the result in the scratch buffer.
    pub result_in_scratch: bool,
    pub populate: Duration,
    pub clear_scratch: Option<Duration>,
    pub sort: Duration,
    pub check_sorted: Duration,
    pub full_validation: Option<Duration>,
}

macro_rules! narrate {
    ($cfg:expr, $($arg:tt)*) => {
        if !$cfg.quiet {
            eprintln!($($arg)*);
        }
    };
}

/// Execute one harness run to completion or to the first fatal error.
pub fn run(config: &RunConfig) -> Result<RunReport, HarnessError> {
    let shape = dispatch(config.record_bytes, config.key_bytes)?;
    if config.n_recs == 0 {
        return Err(HarnessError::Config(
            "record count must be at least 1".into(),
        ));
    }
    let threads = config.threads.max(1);
    let words = config.n_recs * shape.record_words;

    let mut primary = AlignedBuffer::new(words);
    let mut scratch = AlignedBuffer::new(words);
    let mut snapshot = if config.full_validation {
        Some(AlignedBuffer::new(words))
    } else {
        None
    };

    let started = Instant::now();
    match &config.input {
        Some(path) => {
            narrate!(config, "Reading input data from file: {}...", path.display());
            dataset::load_file(path, primary.as_bytes_mut())?;
        }
        None => {
            narrate!(
                config,
                "Randomly filling {} records with {} tasks...",
                config.n_recs,
                threads
            );
            dataset::generate(primary.words_mut(), &shape, config.key_bytes, threads);
        }
    }
    let populate = started.elapsed();
    narrate!(config, "done. Time: {:.3}s", populate.as_secs_f64());

    // Snapshot before the engine mutates anything
    if let Some(snap) = snapshot.as_mut() {
        narrate!(config, "Copying input data for full result validation...");
        snap.as_bytes_mut().copy_from_slice(primary.as_bytes());
    }

    let clear_scratch = if config.clear_scratch {
        narrate!(config, "Cleaning scratch buffer...");
        let phase = Instant::now();
        engine::prepare_scratch(scratch.words_mut(), threads);
        let elapsed = phase.elapsed();
        narrate!(config, "done. Time: {:.3}s", elapsed.as_secs_f64());
        Some(elapsed)
    } else {
        None
    };

    narrate!(config, "Sorting...");
    let phase = Instant::now();
    engine::sort(
        primary.words_mut(),
        scratch.words_mut(),
        config.n_recs,
        &shape,
        threads,
    );
    let sort = phase.elapsed();
    narrate!(config, "done. Time: {:.3}s", sort.as_secs_f64());

    // The one contract to get exactly right: an inverted parity silently
    // validates the stale ping-pong partner instead of the result.
    let result_in_scratch = engine::sorted_in_scratch(shape.key_words);
    let result = if result_in_scratch { &scratch } else { &primary };

    narrate!(config, "Checking if result is sorted...");
    let phase = Instant::now();
    if let Some(index) = validate::first_disorder(result.words(), &shape) {
        return Err(HarnessError::NotSorted { index });
    }
    let check_sorted = phase.elapsed();
    narrate!(config, "Info: OK result sorted");

    let full_validation = match snapshot.as_ref() {
        Some(snap) => {
            narrate!(config, "Sorting reference copy for full validation...");
            let phase = Instant::now();
            let mut reference: Vec<&[u64]> =
                snap.words().chunks_exact(shape.record_words).collect();
            // Stable, like the engine's passes: equal keys keep input order
            // on both sides, so elementwise byte equality is exact.
            reference.par_sort_by(|a, b| (shape.compare)(a, b));
            if let Some(index) =
                validate::first_mismatch(result.words(), &reference, shape.record_words)
            {
                return Err(HarnessError::ValidationMismatch { index });
            }
            let elapsed = phase.elapsed();
            narrate!(config, "Info: OK result matches reference");
            Some(elapsed)
        }
        None => None,
    };

    if let Some(path) = &config.output {
        narrate!(config, "Storing result to file: {}...", path.display());
        dataset::write_file(path, result.as_bytes())?;
        narrate!(config, "done.");
    }

    Ok(RunReport {
        n_recs: config.n_recs,
        record_bytes: config.record_bytes,
        key_words: shape.key_words,
        result_in_scratch,
        populate,
        clear_scratch,
        sort,
        check_sorted,
        full_validation,
    })
}
