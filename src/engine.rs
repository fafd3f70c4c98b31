// src/engine.rs
//
// The core of mosaic: load a buffer, sweep it block by block in the
// selected mode, save the result.
//
// This file is a facade over the decomposed modules in engine/.

use crate::error::{MosaicError, Result};
use parking_lot::Mutex;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

mod block;
mod buffer;
mod io;
mod partition;
mod pool;
mod scan;

pub use block::average_and_fill;
pub use buffer::{PixelBuffer, MAX_CHANNELS};
pub use io::{load, save, Source};
pub use partition::{column_bands, Band};
pub use pool::default_workers;
pub use scan::{parallel, sequential, Observer, Progress};

/// Cadence of the progress observer in multi-thread mode.
///
/// The sweep is usually much faster than this; the observer still gets
/// one final invocation when the run completes.
pub const DEFAULT_TICK: Duration = Duration::from_secs(2);

/// Execution mode for a processing run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// One thread, row-major over the whole image
    Single,
    /// One worker per column band
    Multi,
}

impl Mode {
    /// Parse the CLI mode flag: 'S' or 'M', case-insensitive.
    pub fn parse(value: &str) -> Result<Self> {
        match value.to_ascii_uppercase().as_str() {
            "S" => Ok(Mode::Single),
            "M" => Ok(Mode::Multi),
            _ => Err(MosaicError::invalid_mode(value.to_string())),
        }
    }
}

/// Pixelation run configuration: owns the buffer for the duration of a
/// run and drives the scanners and the I/O collaborators.
pub struct Processor {
    block_size: u32,
    mode: Mode,
    workers: usize,
    tick: Duration,
    gate: Arc<Mutex<()>>,
}

impl Processor {
    /// Create a processor. `block_size` must be at least 1.
    pub fn new(block_size: u32, mode: Mode) -> Result<Self> {
        if block_size == 0 {
            return Err(MosaicError::invalid_block_size(block_size.to_string()));
        }
        Ok(Self {
            block_size,
            mode,
            workers: pool::default_workers(),
            tick: DEFAULT_TICK,
            gate: Arc::new(Mutex::new(())),
        })
    }

    /// Set the worker count for multi-thread mode (clamped to at least 1).
    pub fn workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    /// Set the progress observer cadence for multi-thread mode.
    pub fn tick(mut self, tick: Duration) -> Self {
        self.tick = tick;
        self
    }

    /// Share the lock that serializes observer invocations. By default
    /// each processor owns its own gate; inject one to coordinate several
    /// processors with a single display.
    pub fn observer_gate(mut self, gate: Arc<Mutex<()>>) -> Self {
        self.gate = gate;
        self
    }

    /// Pixelate `buffer` in place.
    ///
    /// The observer, when supplied, sees the buffer once per block in
    /// single-thread mode, and periodically plus once at completion in
    /// multi-thread mode (under the gate).
    pub fn process(&self, buffer: &mut PixelBuffer, observer: Option<Observer<'_>>) -> Result<()> {
        tracing::info!(
            mode = ?self.mode,
            block_size = self.block_size,
            workers = self.workers,
            width = buffer.width(),
            height = buffer.height(),
            "processing image"
        );
        match self.mode {
            Mode::Single => {
                scan::sequential(buffer, self.block_size, observer);
                Ok(())
            }
            Mode::Multi => {
                let progress = observer.map(|on_tick| Progress {
                    on_tick,
                    every: self.tick,
                    gate: &self.gate,
                });
                scan::parallel(buffer, self.block_size, self.workers, progress)
            }
        }
    }

    /// Load `input`, pixelate it, and write the result to `output`.
    pub fn process_file(
        &self,
        input: &Path,
        output: &Path,
        observer: Option<Observer<'_>>,
    ) -> Result<()> {
        let mut buffer = io::load(input)?;
        self.process(&mut buffer, observer)?;
        io::save(output, &buffer)
    }
}
