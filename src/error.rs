//! Comparator Error Types
//!
//! Every failure mode of a scoring run. All of these are fatal for the
//! current invocation: there is no retry policy, and a frame that cannot
//! be read completely is never partially scored.

use std::path::PathBuf;

use thiserror::Error;

use crate::layout::ChromaSampling;

/// Result type for comparator operations
pub type Result<T> = std::result::Result<T, CompareError>;

/// Comparator error taxonomy
#[derive(Debug, Error)]
pub enum CompareError {
    /// A referenced path could not be opened
    #[error("failed to open file: {path}")]
    Open {
        /// Path that failed to open
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// J:a:b outside the three supported combinations
    #[error("unsupported sub-sampling mode {j}:{a}:{b}: only 4:4:4, 4:2:2, 4:2:0 are supported")]
    UnsupportedLayout {
        /// Horizontal sampling reference
        j: u8,
        /// Chroma samples in the first row of J pixels
        a: u8,
        /// Chroma sample changes between the first and second row
        b: u8,
    },

    /// Sub-sampling string not of the `J:a:b` digit form
    #[error("invalid sub-sampling spec '{0}': expected digits in J:a:b form")]
    InvalidSamplingSpec(String),

    /// Dimensions are zero or incompatible with the chosen layout
    #[error("invalid dimensions {width}x{height} for {sampling} sampling")]
    InvalidDimensions {
        /// Frame width in pixels
        width: u32,
        /// Frame height in pixels
        height: u32,
        /// Layout the dimensions were checked against
        sampling: ChromaSampling,
    },

    /// A stream holds less than one whole frame
    #[error("no complete frames in {path}: {len} bytes is smaller than one {bytes_per_frame}-byte frame")]
    NoWholeFrames {
        /// Stream path
        path: PathBuf,
        /// Stream length in bytes
        len: u64,
        /// Frame size for the configured layout
        bytes_per_frame: u64,
    },

    /// A row read returned fewer bytes than requested mid-run
    #[error("truncated stream {path}: wanted {expected} bytes at offset {offset}, got {actual}")]
    TruncatedStream {
        /// Stream path
        path: PathBuf,
        /// Byte offset of the failed read
        offset: u64,
        /// Bytes requested
        expected: usize,
        /// Bytes actually read
        actual: usize,
    },

    /// Seek or read failure other than a clean short read
    #[error("I/O error reading {path}")]
    Io {
        /// Stream path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}
