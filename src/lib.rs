//! # lamco-psnr
//!
//! Streaming PSNR fidelity comparator for raw planar YUV video.
//!
//! Reads a reference and a test stream sample-by-sample, reconstructs
//! full-resolution luma/chroma samples for one of three chroma
//! sub-sampling layouts (4:4:4, 4:2:2, 4:2:0), and produces a per-frame
//! and whole-sequence PSNR score plus throughput in frames/second.
//!
//! # Architecture
//!
//! ```text
//! SequenceComparator (frame loop, aggregation, timing)
//!   ├─> ChromaSampling   (layout decode, exact plane/row offsets)
//!   ├─> PlaneReader      (seek + row-granular reads, both streams lockstep)
//!   ├─> sample_at        (chroma expansion to per-pixel triples)
//!   ├─> ErrorAccumulator (widened squared-difference sums per channel)
//!   └─> psnr_db          (MSE → dB, zero-MSE → 0 dB by contract)
//! ```
//!
//! # Data Flow
//!
//! For each frame of the shorter stream: band offsets → row reads from
//! both files → expanded (Y, U, V) triples → squared-error sums → channel
//! PSNRs → combined frame score → running sequence sum. The sequence score
//! feeds the average frame score back through the PSNR formula.

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Comparator error taxonomy
pub mod error;

/// Chroma expansion to per-pixel sample triples
pub mod expand;

/// Sub-sampling layouts and plane offset arithmetic
pub mod layout;

/// Squared-error accumulation and PSNR scoring
pub mod metrics;

/// Row-granular frame sample reading
pub mod reader;

/// Sequence scoring driver
pub mod sequence;

pub use error::{CompareError, Result};
pub use layout::ChromaSampling;
pub use metrics::{psnr_db, FrameScore, PSNR_PEAK_DB};
pub use sequence::{CompareOptions, SequenceComparator, SequenceResult, StreamContext};
