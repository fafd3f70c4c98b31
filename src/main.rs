// src/main.rs
//
// CLI surface: mosaic <image> <block-size> <mode: S|M>
//
// Validation failures and load errors print a diagnostic and exit
// without touching the output path.

use mosaic::engine::{self, Mode, Processor};
use mosaic::error::{MosaicError, Result};
use std::path::Path;
use std::process::ExitCode;

/// Fixed output path for the pixelated result.
const RESULT_PATH: &str = "result.jpg";

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    match run() {
        Ok(()) => {
            println!("Processing completed. Saved as {RESULT_PATH}.");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("{err}");
            if matches!(err.category(), mosaic::ErrorCategory::Input) {
                eprintln!("Usage: mosaic <image> <block-size> <mode: S|M>");
            }
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.len() != 3 {
        return Err(MosaicError::wrong_argument_count(3, args.len()));
    }

    let input = Path::new(&args[0]);
    let block_size: u32 = args[1]
        .parse()
        .ok()
        .filter(|&size| size > 0)
        .ok_or_else(|| MosaicError::invalid_block_size(args[1].clone()))?;
    let mode = Mode::parse(&args[2])?;

    let workers = engine::default_workers();
    tracing::info!(workers, "available processing units");

    Processor::new(block_size, mode)?
        .workers(workers)
        .process_file(input, Path::new(RESULT_PATH), None)
}
