//! Chroma Expansion
//!
//! Reconstructs one full-resolution (Y, U, V) triple per pixel column from
//! the row buffers of a read band. 4:4:4 maps columns directly; 4:2:2
//! duplicates each even column's chroma into the following odd column;
//! 4:2:0 duplicates one stored sample across its whole 2×2 block.

use crate::layout::ChromaSampling;
use crate::reader::RowBand;

/// One pixel's reconstructed sample triple
///
/// Stored as unsigned bytes; difference arithmetic must widen to a signed
/// type before subtracting (see [`crate::metrics`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sample {
    /// Luma
    pub y: u8,
    /// Blue-difference chroma (Cb)
    pub u: u8,
    /// Red-difference chroma (Cr)
    pub v: u8,
}

/// Expand the sample at column `x` of Y row `row_in_band` within a band
///
/// The same U/V row serves every Y row of the band; only the column lookup
/// differs per layout.
#[inline]
pub fn sample_at(sampling: ChromaSampling, band: &RowBand, row_in_band: usize, x: usize) -> Sample {
    let cx = sampling.chroma_column(x);
    Sample {
        y: band.y[row_in_band][x],
        u: band.u[cx],
        v: band.v[cx],
    }
}
