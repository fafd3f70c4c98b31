// src/engine/scan.rs
//
// The two block sweeps: a single-threaded reference scan and a
// band-parallel scan that must produce byte-identical output.
//
// Both walk the same global block grid (origins at multiples of the block
// size, row-major). The parallel scan assigns each grid origin to the
// worker whose column band contains it; a block whose tail crosses the
// band boundary is still filled whole by that worker. Origins are unique
// to one band, so no two workers ever touch the same pixel.

use crate::engine::buffer::{PixelBuffer, SharedPixels};
use crate::engine::partition::{column_bands, Band};
use crate::engine::pool;
use crate::error::{MosaicError, Result};
use parking_lot::Mutex;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Observer callback invoked with in-progress buffer state.
pub type Observer<'a> = &'a mut dyn FnMut(&PixelBuffer);

/// Progress reporting for the parallel scan.
///
/// While workers are pending, the calling thread wakes every `every`,
/// takes `gate`, and hands a snapshot of the buffer to `on_tick`; one
/// final locked invocation happens after all workers are done. Purely for
/// visualization, never required for correctness.
pub struct Progress<'a> {
    pub on_tick: Observer<'a>,
    pub every: Duration,
    pub gate: &'a Mutex<()>,
}

/// Fill every block of the grid in row-major order on the calling thread.
///
/// `on_block`, when supplied, is invoked synchronously after each block
/// (once per block, unthrottled) so a preview can follow the sweep.
pub fn sequential(buffer: &mut PixelBuffer, block_size: u32, mut on_block: Option<Observer<'_>>) {
    debug_assert!(block_size >= 1);
    let (height, width) = (buffer.height(), buffer.width());
    for row in (0..height).step_by(block_size as usize) {
        for col in (0..width).step_by(block_size as usize) {
            crate::engine::block::average_and_fill(buffer, row, col, block_size);
            if let Some(cb) = on_block.as_mut() {
                cb(buffer);
            }
        }
    }
}

/// Fill the grid with one worker per column band on the shared pool.
///
/// Blocks until every worker has finished. Worker panics are caught per
/// task, collected after the join, and the first one (by band order) is
/// returned; a failing band never masks or cancels its siblings.
pub fn parallel(
    buffer: &mut PixelBuffer,
    block_size: u32,
    num_workers: usize,
    mut progress: Option<Progress<'_>>,
) -> Result<()> {
    debug_assert!(block_size >= 1);
    let num_workers = num_workers.max(1);
    let bands = column_bands(buffer.width(), num_workers);
    tracing::debug!(
        workers = num_workers,
        band_width = bands[0].width(),
        "starting parallel scan"
    );

    let shared = SharedPixels::new(buffer);
    let pending = AtomicUsize::new(bands.len());
    let failures: Mutex<Vec<(usize, MosaicError)>> = Mutex::new(Vec::new());

    // in_place_scope keeps the supervisory loop on the calling thread
    // while band tasks run on the pool, so a single-threaded pool can
    // never be starved by the loop below.
    pool::get_pool().in_place_scope(|s| {
        for (index, band) in bands.iter().copied().enumerate() {
            let shared = &shared;
            let pending = &pending;
            let failures = &failures;
            s.spawn(move |_| {
                let outcome = catch_unwind(AssertUnwindSafe(|| {
                    sweep_band(shared, band, block_size);
                }));
                if let Err(payload) = outcome {
                    failures.lock().push((
                        index,
                        MosaicError::worker_panicked(
                            band.col_start,
                            band.col_end,
                            panic_message(payload.as_ref()),
                        ),
                    ));
                }
                pending.fetch_sub(1, Ordering::Release);
            });
        }

        // Supervisory loop on the calling thread: poll worker liveness at
        // a fixed cadence and expose a locked snapshot to the observer,
        // then once more after the last worker has finished.
        if let Some(p) = progress.as_mut() {
            while pending.load(Ordering::Acquire) > 0 {
                std::thread::sleep(p.every);
                let _guard = p.gate.lock();
                let frame = shared.snapshot();
                (p.on_tick)(&frame);
            }
            let _guard = p.gate.lock();
            let frame = shared.snapshot();
            (p.on_tick)(&frame);
        }
    });

    // All workers have joined at this point; surface the earliest failure.
    let mut failures = failures.into_inner();
    failures.sort_by_key(|(index, _)| *index);
    match failures.into_iter().next() {
        Some((_, err)) => Err(err),
        None => Ok(()),
    }
}

/// Row-major sweep over the grid origins that fall inside `band`.
fn sweep_band(shared: &SharedPixels<'_>, band: Band, block_size: u32) {
    if band.is_empty() {
        return;
    }
    // First origin of the global grid at or after the band start. Columns
    // before it belong to a block owned by the previous band.
    let first_col = band.col_start.next_multiple_of(block_size);
    for row in (0..shared.height()).step_by(block_size as usize) {
        for col in (first_col..band.col_end).step_by(block_size as usize) {
            // SAFETY: `col` is a grid origin inside this band, and every
            // origin belongs to exactly one band, so no other worker
            // touches any pixel of this block.
            unsafe {
                shared.fill_block(row, col, block_size);
            }
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
