//! Squared-Error Accumulation and PSNR Scoring
//!
//! Accumulates per-channel squared sample differences across a frame and
//! converts them to decibel scores. Chroma channels contribute once per
//! *expanded* pixel position, not once per stored sample, so every channel
//! divides by the full frame pixel count.
//!
//! Raw bytes are widened to `i32` before subtracting and squaring: samples
//! above 127 would otherwise be mangled by sign extension or overflow.

use crate::expand::{sample_at, Sample};
use crate::layout::ChromaSampling;
use crate::reader::RowBand;

/// `20 · log10(255)` for 8-bit samples
pub const PSNR_PEAK_DB: f64 = 48.130_803_609;

/// Convert a mean squared error to a decibel score
///
/// `psnr_dB = 20·log10(255) − 10·log10(MSE)`. A zero MSE (identical
/// frames on that channel) maps to exactly 0 dB rather than infinity.
/// That mapping is part of the contract; callers and tests rely on it.
#[inline]
pub fn psnr_db(mse: f64) -> f64 {
    let db = PSNR_PEAK_DB - 10.0 * mse.log10();
    if db.is_infinite() {
        0.0
    } else {
        db
    }
}

/// Per-channel scores for one frame
#[derive(Debug, Clone, Copy)]
pub struct FrameScore {
    /// Luma PSNR in dB
    pub y_db: f64,
    /// Cb PSNR in dB
    pub u_db: f64,
    /// Cr PSNR in dB
    pub v_db: f64,
    /// Arithmetic mean of the three channel scores
    pub combined_db: f64,
}

/// Running squared-error sums for one frame
///
/// Sums are `u64`: the worst case per pixel is 255² = 65 025, so even an
/// 8K frame stays far below the overflow bound.
#[derive(Debug, Default, Clone, Copy)]
pub struct ErrorAccumulator {
    sq_y: u64,
    sq_u: u64,
    sq_v: u64,
}

impl ErrorAccumulator {
    /// Fresh accumulator with all sums at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one pixel pair's squared differences
    #[inline]
    pub fn accumulate(&mut self, reference: Sample, test: Sample) {
        self.sq_y += squared_diff(reference.y, test.y);
        self.sq_u += squared_diff(reference.u, test.u);
        self.sq_v += squared_diff(reference.v, test.v);
    }

    /// Expand and accumulate every pixel position covered by a band pair
    pub fn accumulate_band(
        &mut self,
        sampling: ChromaSampling,
        width: u32,
        reference: &RowBand,
        test: &RowBand,
    ) {
        for row_in_band in 0..sampling.rows_per_band() {
            for x in 0..width as usize {
                let r = sample_at(sampling, reference, row_in_band, x);
                let t = sample_at(sampling, test, row_in_band, x);
                self.accumulate(r, t);
            }
        }
    }

    /// Convert the accumulated sums into a frame score
    ///
    /// `frame_pixels` is width×height for every channel; chroma duplication
    /// already expanded the U/V contributions to one per pixel position.
    pub fn frame_score(&self, frame_pixels: u64) -> FrameScore {
        let y_db = psnr_db(self.sq_y as f64 / frame_pixels as f64);
        let u_db = psnr_db(self.sq_u as f64 / frame_pixels as f64);
        let v_db = psnr_db(self.sq_v as f64 / frame_pixels as f64);
        FrameScore {
            y_db,
            u_db,
            v_db,
            combined_db: (y_db + u_db + v_db) / 3.0,
        }
    }
}

#[inline]
fn squared_diff(a: u8, b: u8) -> u64 {
    let d = a as i32 - b as i32;
    (d * d) as u64
}
