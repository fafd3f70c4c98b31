// src/error.rs
//
// Unified error handling for mosaic
// Uses thiserror for simple, type-safe error handling
//
// Error Taxonomy:
// - Input: bad arguments, rejected before any processing
// - Load: missing or undecodable input file, nothing written
// - Worker: a parallel task died; surfaced after all siblings joined
// - Save: output could not be written; the in-memory result survives

use std::borrow::Cow;
use thiserror::Error;

/// Error taxonomy for a processing run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Invalid arguments, detected before any work starts
    Input,
    /// Input file missing or undecodable
    Load,
    /// Failure inside a parallel scan task
    Worker,
    /// Result could not be persisted
    Save,
}

/// mosaic error types
///
/// All errors are type-safe and provide clear, actionable messages.
#[derive(Debug, Error)]
pub enum MosaicError {
    // Input validation
    #[error("Invalid block size '{value}': must be a positive integer")]
    InvalidBlockSize { value: Cow<'static, str> },

    #[error("Invalid mode '{value}': use 'S' for single-thread or 'M' for multi-thread")]
    InvalidMode { value: Cow<'static, str> },

    #[error("Expected {expected} arguments, got {actual}")]
    WrongArgumentCount { expected: usize, actual: usize },

    // File loading
    #[error("File not found: {path}")]
    FileNotFound { path: Cow<'static, str> },

    #[error("Failed to read file '{path}': {source}")]
    FileReadFailed {
        path: Cow<'static, str>,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to memory-map file '{path}': {source}")]
    MmapFailed {
        path: Cow<'static, str>,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to decode image: {message}")]
    DecodeFailed { message: Cow<'static, str> },

    // Parallel scan
    #[error("Worker for columns {col_start}..{col_end} panicked: {message}")]
    WorkerPanicked {
        col_start: u32,
        col_end: u32,
        message: Cow<'static, str>,
    },

    // Saving
    #[error("Failed to write file '{path}': {source}")]
    FileWriteFailed {
        path: Cow<'static, str>,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to encode image: {message}")]
    EncodeFailed { message: Cow<'static, str> },

    #[error("Cannot encode a {channels}-channel buffer: only 1 (gray) and 3 (RGB) are supported")]
    UnsupportedChannelCount { channels: usize },
}

// Constructor Helpers
impl MosaicError {
    pub fn invalid_block_size(value: impl Into<Cow<'static, str>>) -> Self {
        Self::InvalidBlockSize {
            value: value.into(),
        }
    }

    pub fn invalid_mode(value: impl Into<Cow<'static, str>>) -> Self {
        Self::InvalidMode {
            value: value.into(),
        }
    }

    pub fn wrong_argument_count(expected: usize, actual: usize) -> Self {
        Self::WrongArgumentCount { expected, actual }
    }

    pub fn file_not_found(path: impl Into<Cow<'static, str>>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    pub fn file_read_failed(path: impl Into<Cow<'static, str>>, source: std::io::Error) -> Self {
        Self::FileReadFailed {
            path: path.into(),
            source,
        }
    }

    pub fn mmap_failed(path: impl Into<Cow<'static, str>>, source: std::io::Error) -> Self {
        Self::MmapFailed {
            path: path.into(),
            source,
        }
    }

    pub fn decode_failed(message: impl Into<Cow<'static, str>>) -> Self {
        Self::DecodeFailed {
            message: message.into(),
        }
    }

    pub fn worker_panicked(
        col_start: u32,
        col_end: u32,
        message: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self::WorkerPanicked {
            col_start,
            col_end,
            message: message.into(),
        }
    }

    pub fn file_write_failed(path: impl Into<Cow<'static, str>>, source: std::io::Error) -> Self {
        Self::FileWriteFailed {
            path: path.into(),
            source,
        }
    }

    pub fn encode_failed(message: impl Into<Cow<'static, str>>) -> Self {
        Self::EncodeFailed {
            message: message.into(),
        }
    }

    pub fn unsupported_channel_count(channels: usize) -> Self {
        Self::UnsupportedChannelCount { channels }
    }

    /// Check if this error is recoverable (user can fix it and rerun)
    ///
    /// Consistent with category(): everything except a worker failure is a
    /// problem with the invocation or the environment, not the run itself.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self.category(), ErrorCategory::Worker)
    }

    /// Get the error category for this error
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidBlockSize { .. }
            | Self::InvalidMode { .. }
            | Self::WrongArgumentCount { .. } => ErrorCategory::Input,

            Self::FileNotFound { .. }
            | Self::FileReadFailed { .. }
            | Self::MmapFailed { .. }
            | Self::DecodeFailed { .. } => ErrorCategory::Load,

            Self::WorkerPanicked { .. } => ErrorCategory::Worker,

            Self::FileWriteFailed { .. }
            | Self::EncodeFailed { .. }
            | Self::UnsupportedChannelCount { .. } => ErrorCategory::Save,
        }
    }
}

impl ErrorCategory {
    /// Get string representation of error category
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::Input => "Input",
            ErrorCategory::Load => "Load",
            ErrorCategory::Worker => "Worker",
            ErrorCategory::Save => "Save",
        }
    }
}

// Result type alias
pub type Result<T> = std::result::Result<T, MosaicError>;
