//! Chroma Sub-Sampling Layouts and Plane Offset Arithmetic
//!
//! Decodes a `J:a:b` sub-sampling specification into one of the three
//! supported planar layouts and derives every byte offset a scoring run
//! needs: frame size, plane bases, and per-row offsets within each plane.
//!
//! # Layouts
//!
//! ```text
//! 4:4:4  [ Y: w×h ][ U: w×h   ][ V: w×h   ]   3.0 × w×h bytes/frame
//! 4:2:2  [ Y: w×h ][ U: w×h/2 ][ V: w×h/2 ]   2.0 × w×h bytes/frame
//! 4:2:0  [ Y: w×h ][ U: w×h/4 ][ V: w×h/4 ]   1.5 × w×h bytes/frame
//! ```
//!
//! In 4:2:2 one full-width chroma row is shared by each pair of Y rows and
//! odd columns reuse the preceding even column's sample. In 4:2:0 chroma
//! rows are `w/2` bytes and one sample covers a 2×2 block of Y positions.
//!
//! All arithmetic is exact integer arithmetic. The fractional frame sizes
//! of 4:2:2 and 4:2:0 are computed as `frame + 2 × chroma_plane` sums, never
//! through floating point: a one-byte misalignment desynchronizes every
//! subsequent read.

use std::fmt;
use std::str::FromStr;

use crate::error::{CompareError, Result};

/// A supported chroma sub-sampling layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChromaSampling {
    /// 4:4:4 - one chroma sample per pixel
    Yuv444,
    /// 4:2:2 - one chroma row per pair of Y rows, even/odd column duplication
    Yuv422,
    /// 4:2:0 - one chroma sample per 2×2 block of pixels
    Yuv420,
}

impl ChromaSampling {
    /// Decode a (J, a, b) triple into a layout
    ///
    /// Only (4,4,4), (4,2,2), and (4,2,0) are accepted; anything else is
    /// rejected as [`CompareError::UnsupportedLayout`] before any I/O.
    pub fn from_jab(j: u8, a: u8, b: u8) -> Result<Self> {
        match (j, a, b) {
            (4, 4, 4) => Ok(Self::Yuv444),
            (4, 2, 2) => Ok(Self::Yuv422),
            (4, 2, 0) => Ok(Self::Yuv420),
            _ => Err(CompareError::UnsupportedLayout { j, a, b }),
        }
    }

    /// Reject dimensions the layout cannot represent
    ///
    /// Width and height must be positive. 4:2:2 shares chroma rows between
    /// row pairs and so needs an even height; 4:2:0 additionally halves
    /// chroma rows horizontally and needs both dimensions even. These rules
    /// also keep `bytes_per_frame` integral.
    pub fn validate_dimensions(self, width: u32, height: u32) -> Result<()> {
        let ok = width > 0
            && height > 0
            && match self {
                Self::Yuv444 => true,
                Self::Yuv422 => height % 2 == 0,
                Self::Yuv420 => width % 2 == 0 && height % 2 == 0,
            };

        if ok {
            Ok(())
        } else {
            Err(CompareError::InvalidDimensions {
                width,
                height,
                sampling: self,
            })
        }
    }

    /// Number of Y samples (and expanded pixels) per frame
    #[inline]
    pub fn frame_pixels(width: u32, height: u32) -> u64 {
        width as u64 * height as u64
    }

    /// Stored bytes in one chroma plane (U or V)
    #[inline]
    pub fn chroma_plane_len(self, width: u32, height: u32) -> u64 {
        let frame = Self::frame_pixels(width, height);
        match self {
            Self::Yuv444 => frame,
            Self::Yuv422 => frame / 2,
            Self::Yuv420 => frame / 4,
        }
    }

    /// Total stored bytes per frame: Y plane plus two chroma planes
    #[inline]
    pub fn bytes_per_frame(self, width: u32, height: u32) -> u64 {
        Self::frame_pixels(width, height) + 2 * self.chroma_plane_len(width, height)
    }

    /// Y rows consumed per read band
    ///
    /// A band is the unit the reader fetches at once: a single row for
    /// 4:4:4, a pair of rows sharing one chroma row for 4:2:2 and 4:2:0.
    #[inline]
    pub fn rows_per_band(self) -> usize {
        match self {
            Self::Yuv444 => 1,
            Self::Yuv422 | Self::Yuv420 => 2,
        }
    }

    /// Number of read bands per frame
    #[inline]
    pub fn band_count(self, height: u32) -> u32 {
        height / self.rows_per_band() as u32
    }

    /// Stored bytes in one chroma row
    #[inline]
    pub fn chroma_row_len(self, width: u32) -> usize {
        match self {
            Self::Yuv444 | Self::Yuv422 => width as usize,
            Self::Yuv420 => width as usize / 2,
        }
    }

    /// Frame-relative offset of a Y row within a band
    #[inline]
    pub fn y_row_offset(self, band: u32, row_in_band: usize, width: u32) -> u64 {
        let row = band as u64 * self.rows_per_band() as u64 + row_in_band as u64;
        row * width as u64
    }

    /// Frame-relative offset of the U row serving a band
    #[inline]
    pub fn u_row_offset(self, band: u32, width: u32, height: u32) -> u64 {
        Self::frame_pixels(width, height) + band as u64 * self.chroma_row_len(width) as u64
    }

    /// Frame-relative offset of the V row serving a band
    #[inline]
    pub fn v_row_offset(self, band: u32, width: u32, height: u32) -> u64 {
        self.u_row_offset(band, width, height) + self.chroma_plane_len(width, height)
    }

    /// Chroma row index serving pixel column `x`
    ///
    /// Direct map for 4:4:4; odd columns reuse the preceding even column
    /// for 4:2:2; both columns of a block share one sample for 4:2:0.
    #[inline]
    pub fn chroma_column(self, x: usize) -> usize {
        match self {
            Self::Yuv444 => x,
            Self::Yuv422 => x & !1,
            Self::Yuv420 => x / 2,
        }
    }
}

impl fmt::Display for ChromaSampling {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Yuv444 => "4:4:4",
            Self::Yuv422 => "4:2:2",
            Self::Yuv420 => "4:2:0",
        };
        f.write_str(s)
    }
}

impl FromStr for ChromaSampling {
    type Err = CompareError;

    /// Parse a `J:a:b` string such as `4:2:0`
    fn from_str(s: &str) -> Result<Self> {
        let mut parts = s.split(':');
        let mut next = || -> Result<u8> {
            parts
                .next()
                .and_then(|p| p.parse::<u8>().ok())
                .ok_or_else(|| CompareError::InvalidSamplingSpec(s.to_string()))
        };

        let (j, a, b) = (next()?, next()?, next()?);
        if parts.next().is_some() {
            return Err(CompareError::InvalidSamplingSpec(s.to_string()));
        }

        Self::from_jab(j, a, b)
    }
}
