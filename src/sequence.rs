//! Sequence Scoring Driver
//!
//! Drives the frame loop: derives frame counts from stream sizes, scores
//! every frame both streams hold, folds per-frame combined scores into the
//! sequence score, and measures wall-clock throughput.
//!
//! # Aggregation
//!
//! The sequence score is NOT the arithmetic mean of per-frame PSNR values.
//! The average combined frame score is fed back through the PSNR formula:
//!
//! ```text
//! sequence = psnr_db( Σ frameScore / totalFrames )
//! ```
//!
//! This composition is contractual and reproduced exactly.
//!
//! # Parallelism
//!
//! Frames are data-independent: each needs only its own byte range from
//! each file. With `jobs > 1` the frame range is split into contiguous
//! chunks, one worker thread per chunk with its own file handles, and
//! partial sums are merged in chunk-index order so the reported score does
//! not depend on execution order.

use std::ops::Range;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::error::{CompareError, Result};
use crate::layout::ChromaSampling;
use crate::metrics::{psnr_db, ErrorAccumulator, FrameScore};
use crate::reader::{PlaneReader, RowBand};

// =============================================================================
// Types
// =============================================================================

/// Everything one scoring run needs, created once and read-only thereafter
#[derive(Debug, Clone)]
pub struct StreamContext {
    /// Reference stream path
    pub reference: PathBuf,
    /// Test stream path
    pub test: PathBuf,
    /// Frame width in pixels
    pub width: u32,
    /// Frame height in pixels
    pub height: u32,
    /// Chroma sub-sampling layout of both streams
    pub sampling: ChromaSampling,
}

/// Runtime options for a scoring run
#[derive(Debug, Clone)]
pub struct CompareOptions {
    /// Worker threads scoring frame chunks; 1 means fully sequential
    pub jobs: usize,
}

impl Default for CompareOptions {
    fn default() -> Self {
        Self { jobs: 1 }
    }
}

/// Outcome of a whole-sequence comparison
#[derive(Debug, Clone, Copy)]
pub struct SequenceResult {
    /// Sequence score in dB
    pub sequence_score_db: f64,
    /// Whole frames scored (the shorter stream bounds this)
    pub frames: u64,
    /// Wall-clock time spent in the frame loop
    pub elapsed: Duration,
}

impl SequenceResult {
    /// Frames scored per second of wall-clock time
    pub fn fps(&self) -> f64 {
        self.frames as f64 / self.elapsed.as_secs_f64()
    }
}

// =============================================================================
// SequenceComparator
// =============================================================================

/// Scores a reference/test stream pair
#[derive(Debug)]
pub struct SequenceComparator {
    context: StreamContext,
    options: CompareOptions,
}

impl SequenceComparator {
    /// Create a comparator over a validated stream context
    pub fn new(context: StreamContext, options: CompareOptions) -> Self {
        Self { context, options }
    }

    /// Run the comparison and produce the sequence result
    pub fn run(&self) -> Result<SequenceResult> {
        let ctx = &self.context;
        let sampling = ctx.sampling;
        sampling.validate_dimensions(ctx.width, ctx.height)?;

        let bytes_per_frame = sampling.bytes_per_frame(ctx.width, ctx.height);
        let reference = PlaneReader::open(&ctx.reference)?;
        let test = PlaneReader::open(&ctx.test)?;

        let ref_frames = reference.frame_count(bytes_per_frame);
        let test_frames = test.frame_count(bytes_per_frame);
        for (reader, frames) in [(&reference, ref_frames), (&test, test_frames)] {
            if frames == 0 {
                return Err(CompareError::NoWholeFrames {
                    path: reader.path().to_path_buf(),
                    len: reader.len(),
                    bytes_per_frame,
                });
            }
        }

        debug!(
            bytes_per_frame,
            ref_len = reference.len(),
            test_len = test.len(),
            ref_frames,
            test_frames,
            "stream preflight"
        );

        // Leftover bytes past the last whole frame are silently ignored
        let total_frames = ref_frames.min(test_frames);
        let jobs = self.options.jobs.max(1);

        let start = Instant::now();
        let score_sum = if jobs == 1 {
            self.score_range(reference, test, 0..total_frames)?
        } else {
            self.score_chunked(total_frames, jobs)?
        };
        let elapsed = start.elapsed();

        let sequence_score_db = psnr_db(score_sum / total_frames as f64);
        info!(
            frames = total_frames,
            sequence_score_db,
            elapsed_ms = elapsed.as_millis() as u64,
            "sequence scored"
        );

        Ok(SequenceResult {
            sequence_score_db,
            frames: total_frames,
            elapsed,
        })
    }

    /// Score a contiguous frame range, returning the sum of combined scores
    ///
    /// The running sum is an `f64`; accumulating frame scores in an integer
    /// would silently truncate fractional contributions every frame.
    fn score_range(
        &self,
        mut reference: PlaneReader,
        mut test: PlaneReader,
        frames: Range<u64>,
    ) -> Result<f64> {
        let ctx = &self.context;
        let sampling = ctx.sampling;
        let bytes_per_frame = sampling.bytes_per_frame(ctx.width, ctx.height);

        let mut ref_band = RowBand::new(sampling, ctx.width);
        let mut test_band = RowBand::new(sampling, ctx.width);
        let mut sum = 0.0f64;

        for frame in frames {
            let score = self.score_frame(
                &mut reference,
                &mut test,
                frame,
                &mut ref_band,
                &mut test_band,
            )?;
            debug!(
                frame,
                score_db = score.combined_db,
                byte_range_start = frame * bytes_per_frame,
                byte_range_end = (frame + 1) * bytes_per_frame - 1,
                "frame scored"
            );
            sum += score.combined_db;
        }

        Ok(sum)
    }

    /// Score one frame band by band, reading both streams in lockstep
    fn score_frame(
        &self,
        reference: &mut PlaneReader,
        test: &mut PlaneReader,
        frame: u64,
        ref_band: &mut RowBand,
        test_band: &mut RowBand,
    ) -> Result<FrameScore> {
        let ctx = &self.context;
        let sampling = ctx.sampling;
        let mut acc = ErrorAccumulator::new();

        for band in 0..sampling.band_count(ctx.height) {
            reference.read_band(sampling, ctx.width, ctx.height, frame, band, ref_band)?;
            test.read_band(sampling, ctx.width, ctx.height, frame, band, test_band)?;
            acc.accumulate_band(sampling, ctx.width, ref_band, test_band);
        }

        Ok(acc.frame_score(ChromaSampling::frame_pixels(ctx.width, ctx.height)))
    }

    /// Split the frame range into contiguous chunks, one worker per chunk
    ///
    /// Workers share nothing but the final reduction: each returns the sum
    /// of its chunk's frame scores, merged in chunk-index order.
    fn score_chunked(&self, total_frames: u64, jobs: usize) -> Result<f64> {
        let chunk_len = total_frames.div_ceil(jobs as u64);
        let (tx, rx) = crossbeam_channel::unbounded::<(usize, Result<f64>)>();

        std::thread::scope(|scope| {
            for idx in 0..jobs {
                let lo = idx as u64 * chunk_len;
                if lo >= total_frames {
                    break;
                }
                let hi = (lo + chunk_len).min(total_frames);
                let tx = tx.clone();
                scope.spawn(move || {
                    let partial = PlaneReader::open(&self.context.reference)
                        .and_then(|r| Ok((r, PlaneReader::open(&self.context.test)?)))
                        .and_then(|(r, t)| self.score_range(r, t, lo..hi));
                    let _ = tx.send((idx, partial));
                });
            }
        });
        drop(tx);

        let mut partials: Vec<Option<Result<f64>>> = (0..jobs).map(|_| None).collect();
        for (idx, partial) in rx.try_iter() {
            partials[idx] = Some(partial);
        }

        // Merge in chunk order: deterministic sum, first failing chunk wins
        let mut sum = 0.0f64;
        for partial in partials.into_iter().flatten() {
            sum += partial?;
        }
        Ok(sum)
    }
}
