// lib.rs
//
// mosaic: a block-averaging image pixelator.
//
// Design goals:
// - One averaging core shared by both execution modes
// - Multi-threaded output byte-identical to single-threaded output
// - Lock-free buffer writes via disjoint column-band ownership
// - Progress observation that never affects the result

pub mod engine;
pub mod error;

pub use engine::{Mode, PixelBuffer, Processor};
pub use error::{ErrorCategory, MosaicError, Result};
