use std::path::PathBuf;
use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

use exam_normalizer::config;
use exam_normalizer::pipeline::job_runner::{JobConfig, run_job};

fn print_usage() {
    eprintln!("Usage: exam_normalizer <input.pdf> <output_prefix> <target_page_count>");
    eprintln!("  Pad scanned exam booklets with blank pages to a fixed length.");
    eprintln!("  Writes <output_prefix>_good.pdf and <output_prefix>_padded.pdf.");
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();

    if args.is_empty() || args.iter().any(|a| a == "--help" || a == "-h") {
        print_usage();
        return if args.is_empty() {
            ExitCode::FAILURE
        } else {
            ExitCode::SUCCESS
        };
    }

    if args.iter().any(|a| a == "--version" || a == "-V") {
        eprintln!("exam_normalizer {}", env!("CARGO_PKG_VERSION"));
        return ExitCode::SUCCESS;
    }

    if args.len() != 3 {
        print_usage();
        return ExitCode::FAILURE;
    }

    let input_path = PathBuf::from(&args[0]);
    let output_prefix = args[1].clone();

    let target_length: usize = match args[2].parse() {
        Ok(n) if n > 0 => n,
        _ => {
            eprintln!(
                "ERROR: target page count must be a positive integer, got '{}'",
                args[2]
            );
            return ExitCode::FAILURE;
        }
    };

    let settings = match config::load_settings_for_input(&input_path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("ERROR: Failed to load settings for {}: {e}", args[0]);
            return ExitCode::FAILURE;
        }
    };

    let job = JobConfig {
        input_path,
        output_prefix,
        target_length,
        settings,
    };

    match run_job(&job) {
        Ok(result) => {
            eprintln!("{}", result.summary);
            match (&result.unpadded_output, &result.padded_output) {
                (Some(good), Some(padded)) => eprintln!(
                    "Merged results written to {} and {}",
                    good.display(),
                    padded.display()
                ),
                (Some(path), None) | (None, Some(path)) => {
                    eprintln!("Merged results written to {}", path.display());
                }
                (None, None) => eprintln!("No pages found; no output written"),
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("ERROR: {} -> {}: {e}", args[0], args[1]);
            ExitCode::FAILURE
        }
    }
}
