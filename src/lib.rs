#![allow(clippy::needless_range_loop, clippy::manual_div_ceil)]

/// Use mimalloc as the global allocator.
/// The harness allocates multi-gigabyte working buffers plus per-pass index
/// vectors; mimalloc's thread-local caching keeps the generation and scatter
/// phases from contending on the allocator.
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

pub mod buffer;
pub mod common;
pub mod dataset;
pub mod engine;
pub mod error;
pub mod harness;
pub mod shape;

pub use error::HarnessError;
