// src/engine/partition.rs
//
// Column-band partitioning for the parallel scanner.

/// A full-height, contiguous slice of image columns assigned to one worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Band {
    /// First column of the band (inclusive).
    pub col_start: u32,
    /// One past the last column of the band.
    pub col_end: u32,
}

impl Band {
    pub fn is_empty(&self) -> bool {
        self.col_start >= self.col_end
    }

    pub fn width(&self) -> u32 {
        self.col_end.saturating_sub(self.col_start)
    }
}

/// Divide `width` columns into `num_workers` bands of
/// `ceil(width / num_workers)` columns each.
///
/// All bands but possibly the last have equal width; the last may be
/// narrower. When `num_workers` exceeds the image width the trailing
/// bands are empty, which is valid (the worker simply has nothing to do).
/// Bands never overlap and their union is exactly `[0, width)`.
pub fn column_bands(width: u32, num_workers: usize) -> Vec<Band> {
    debug_assert!(num_workers >= 1, "at least one worker required");
    let band_width = u64::from(width).div_ceil(num_workers as u64);
    (0..num_workers as u64)
        .map(|k| Band {
            col_start: (k * band_width).min(u64::from(width)) as u32,
            col_end: ((k + 1) * band_width).min(u64::from(width)) as u32,
        })
        .collect()
}
