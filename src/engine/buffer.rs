// src/engine/buffer.rs
//
// The in-memory pixel buffer and the shared raw view used by the
// parallel scanner.

use std::marker::PhantomData;

/// Upper bound on the channel count a buffer may carry.
///
/// Keeps the per-block accumulator a fixed-size array so averaging never
/// allocates.
pub const MAX_CHANNELS: usize = 4;

/// A row-major H x W x C grid of 8-bit channels.
///
/// Dimensions and channel count are fixed for the buffer's lifetime. The
/// loader always produces 3-channel RGB; single-channel buffers can be
/// built directly for grayscale work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    channels: usize,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Create a zero-filled buffer. `width` and `height` must be at least 1
    /// and `channels` in `1..=MAX_CHANNELS`.
    pub fn new(width: u32, height: u32, channels: usize) -> Self {
        assert!(width >= 1 && height >= 1, "empty buffer dimensions");
        assert!(
            (1..=MAX_CHANNELS).contains(&channels),
            "unsupported channel count: {channels}"
        );
        let len = width as usize * height as usize * channels;
        Self {
            width,
            height,
            channels,
            data: vec![0; len],
        }
    }

    /// Wrap an existing row-major byte vector. Returns `None` when the
    /// vector length does not match `width * height * channels`.
    pub fn from_raw(width: u32, height: u32, channels: usize, data: Vec<u8>) -> Option<Self> {
        if width == 0 || height == 0 || !(1..=MAX_CHANNELS).contains(&channels) {
            return None;
        }
        if data.len() != width as usize * height as usize * channels {
            return None;
        }
        Some(Self {
            width,
            height,
            channels,
            data,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Channel slice of the pixel at (row, col).
    pub fn pixel(&self, row: u32, col: u32) -> &[u8] {
        debug_assert!(row < self.height && col < self.width);
        let off = self.offset(row, col);
        &self.data[off..off + self.channels]
    }

    /// Mutable channel slice of the pixel at (row, col).
    pub fn pixel_mut(&mut self, row: u32, col: u32) -> &mut [u8] {
        debug_assert!(row < self.height && col < self.width);
        let off = self.offset(row, col);
        let channels = self.channels;
        &mut self.data[off..off + channels]
    }

    pub fn as_raw(&self) -> &[u8] {
        &self.data
    }

    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    fn offset(&self, row: u32, col: u32) -> usize {
        (row as usize * self.width as usize + col as usize) * self.channels
    }
}

/// Raw handle to a `PixelBuffer` shared between parallel scan workers.
///
/// Holds the buffer exclusively for its lifetime (it is created from
/// `&mut PixelBuffer`), then hands out aliasing access through raw
/// pointers so one worker per column band can fill blocks in place.
pub(crate) struct SharedPixels<'a> {
    ptr: *mut u8,
    width: u32,
    height: u32,
    channels: usize,
    _owner: PhantomData<&'a mut PixelBuffer>,
}

// SAFETY: every block of the global grid is filled by exactly one worker
// (the one whose band contains the block's origin column), so concurrent
// `fill_block` calls never touch the same pixel. `snapshot` may race with
// in-flight fills; it is only used for best-effort progress display and
// never feeds back into the averaging result.
unsafe impl Send for SharedPixels<'_> {}
unsafe impl Sync for SharedPixels<'_> {}

impl<'a> SharedPixels<'a> {
    pub fn new(buffer: &'a mut PixelBuffer) -> Self {
        Self {
            ptr: buffer.data.as_mut_ptr(),
            width: buffer.width,
            height: buffer.height,
            channels: buffer.channels,
            _owner: PhantomData,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Average the block at (row_start, col_start) and overwrite it with
    /// its mean color. The block is clipped at the right and bottom image
    /// edges; `row_start` and `col_start` must lie inside the buffer and
    /// `size` must be at least 1.
    ///
    /// # Safety
    ///
    /// No other thread may access any pixel of the clipped block while
    /// this call runs. The scanners uphold this by assigning each block
    /// origin to exactly one worker.
    pub unsafe fn fill_block(&self, row_start: u32, col_start: u32, size: u32) {
        debug_assert!(size >= 1);
        debug_assert!(row_start < self.height && col_start < self.width);

        let row_end = (row_start + size).min(self.height);
        let col_end = (col_start + size).min(self.width);
        let cols = (col_end - col_start) as usize;
        let c = self.channels;

        let mut sums = [0u64; MAX_CHANNELS];
        let mut count = 0u64;
        for row in row_start..row_end {
            let run = std::slice::from_raw_parts(self.ptr.add(self.offset(row, col_start)), cols * c);
            for px in run.chunks_exact(c) {
                for (sum, &v) in sums.iter_mut().zip(px) {
                    *sum += u64::from(v);
                }
            }
            count += cols as u64;
        }

        // Truncating mean, matching the reference mean-then-cast behavior.
        let mut mean = [0u8; MAX_CHANNELS];
        for (m, sum) in mean.iter_mut().zip(&sums).take(c) {
            *m = (sum / count) as u8;
        }

        for row in row_start..row_end {
            let run =
                std::slice::from_raw_parts_mut(self.ptr.add(self.offset(row, col_start)), cols * c);
            for px in run.chunks_exact_mut(c) {
                px.copy_from_slice(&mean[..c]);
            }
        }
    }

    /// Copy the current buffer contents into a fresh `PixelBuffer`.
    ///
    /// Taken while workers are still writing, individual pixels may be
    /// mid-fill; the copy is only ever shown to a progress observer.
    pub fn snapshot(&self) -> PixelBuffer {
        let len = self.width as usize * self.height as usize * self.channels;
        let mut data = vec![0u8; len];
        // SAFETY: `ptr` covers exactly `len` bytes of the owned buffer.
        unsafe {
            std::ptr::copy_nonoverlapping(self.ptr, data.as_mut_ptr(), len);
        }
        PixelBuffer {
            width: self.width,
            height: self.height,
            channels: self.channels,
            data,
        }
    }

    fn offset(&self, row: u32, col: u32) -> usize {
        (row as usize * self.width as usize + col as usize) * self.channels
    }
}
