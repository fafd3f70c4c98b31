// src/engine/block.rs
//
// Block averaging: replace a square region with its mean color.

use crate::engine::buffer::{PixelBuffer, SharedPixels};

/// Compute the per-channel truncated mean of the block at
/// `(row_start, col_start)` and overwrite every pixel in it.
///
/// The block is `size` x `size`, clipped by the image bounds at the right
/// and bottom edges; a trailing partial block averages only the pixels
/// that exist. `row_start < height`, `col_start < width` and `size >= 1`
/// are caller contracts.
pub fn average_and_fill(buffer: &mut PixelBuffer, row_start: u32, col_start: u32, size: u32) {
    let shared = SharedPixels::new(buffer);
    // SAFETY: `shared` borrows the buffer exclusively, so no other access
    // can overlap this fill.
    unsafe {
        shared.fill_block(row_start, col_start, size);
    }
}
