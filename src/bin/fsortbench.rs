use std::path::PathBuf;
use std::process;

use clap::Parser;

use sortbench::HarnessError;
use sortbench::common::{io_error_msg, reset_sigpipe};
use sortbench::dataset::infer_record_count;
use sortbench::engine::MAX_RECORD_BYTES;
use sortbench::harness::{RunConfig, RunReport, run};

#[derive(Parser)]
#[command(
    name = "fsortbench",
    about = "Correctness and benchmark harness for a fixed-width-record radix sort"
)]
struct Cli {
    /// Number of records to sort; may be omitted when --input is given
    #[arg(short = 'n', long = "records", value_name = "N")]
    records: Option<usize>,

    /// Record size in bytes (must be a multiple of 8)
    #[arg(long = "rec-size", value_name = "BYTES")]
    rec_size: usize,

    /// Size of the key part of a record, in bytes
    #[arg(long = "key-size", value_name = "BYTES")]
    key_size: usize,

    /// Number of threads; 0 means all available
    #[arg(short = 't', long = "threads", value_name = "N", default_value_t = 0)]
    threads: usize,

    /// Input file; if not given, records are generated randomly
    #[arg(short = 'i', long = "input", value_name = "FILE")]
    input: Option<PathBuf>,

    /// Write the sorted result to FILE
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    output: Option<PathBuf>,

    /// Compare the result against an independently sorted reference copy
    #[arg(long = "full-validation")]
    full_validation: bool,

    /// Skip zeroing the scratch buffer before sorting
    #[arg(long = "no-clear-scratch")]
    no_clear_scratch: bool,

    /// Suppress phase narration on stderr
    #[arg(short = 'q', long = "quiet")]
    quiet: bool,
}

fn fail(msg: &str) -> ! {
    eprintln!("fsortbench: {msg}");
    process::exit(2);
}

fn main() {
    reset_sigpipe();
    let cli = Cli::parse();

    if cli.rec_size == 0 || cli.rec_size % 8 != 0 {
        fail(&format!(
            "rec-size must be a positive multiple of 8 (got {})",
            cli.rec_size
        ));
    }
    if cli.rec_size > MAX_RECORD_BYTES {
        fail(&format!(
            "rec-size {} exceeds the engine maximum of {MAX_RECORD_BYTES} bytes",
            cli.rec_size
        ));
    }
    if cli.key_size == 0 || cli.key_size > cli.rec_size {
        fail(&format!(
            "key-size must be in 1..={} (got {})",
            cli.rec_size, cli.key_size
        ));
    }
    if cli.records.is_none() && cli.input.is_none() {
        fail("either --records or --input must be given");
    }

    // For file inputs the record count may be inferred from the file size;
    // either way the file must hold an exact, whole number of records.
    let n_recs = match &cli.input {
        Some(path) => match infer_record_count(path, cli.rec_size, cli.records) {
            Ok(n) => n,
            Err(e) => report_and_exit(e),
        },
        None => cli.records.unwrap(),
    };

    let threads = if cli.threads == 0 {
        std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1)
    } else {
        cli.threads
    };

    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();

    let config = RunConfig {
        n_recs,
        threads,
        record_bytes: cli.rec_size,
        key_bytes: cli.key_size,
        input: cli.input,
        output: cli.output,
        full_validation: cli.full_validation,
        clear_scratch: !cli.no_clear_scratch,
        quiet: cli.quiet,
    };

    if !config.quiet {
        eprintln!("Configuration:");
        eprintln!("  records          - {}", config.n_recs);
        eprintln!("  threads          - {}", config.threads);
        eprintln!("  rec-size         - {}", config.record_bytes);
        eprintln!("  key-size         - {}", config.key_bytes);
        eprintln!("  full-validation  - {}", config.full_validation);
        eprintln!("  clear-scratch    - {}", config.clear_scratch);
    }

    match run(&config) {
        Ok(report) => {
            if !config.quiet {
                print_summary(&report);
            }
        }
        Err(e) => report_and_exit(e),
    }
}

fn report_and_exit(e: HarnessError) -> ! {
    match e {
        HarnessError::Io { path, source } => {
            eprintln!("fsortbench: {}: {}", path.display(), io_error_msg(&source));
        }
        e => eprintln!("fsortbench: {e}"),
    }
    process::exit(1);
}

fn print_summary(report: &RunReport) {
    let secs = report.sort.as_secs_f64();
    let mrecs = report.n_recs as f64 / 1e6;
    eprintln!(
        "Sorted {} records of {} bytes in {:.3}s ({:.1} Mrec/s), result in {} buffer",
        report.n_recs,
        report.record_bytes,
        secs,
        if secs > 0.0 { mrecs / secs } else { 0.0 },
        if report.result_in_scratch {
            "scratch"
        } else {
            "primary"
        }
    );
}
