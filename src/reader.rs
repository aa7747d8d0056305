//! Row-Granular Frame Sample Reading
//!
//! Fetches one read band at a time from a raw planar YUV stream: the Y
//! row(s) plus the single U and V row that serve them. Each row is read
//! with an explicit seek because chroma rows are revisited only once per
//! Y-row pair in 4:2:2 and 4:2:0 - the stream position jumps between
//! planes, while reads within a row stay contiguous for cache locality.
//!
//! Row buffers live in a [`RowBand`] that is allocated once per run and
//! refilled in place for every band, so the hot loop does not allocate.

use std::fs::File;
use std::io::{ErrorKind, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use tracing::trace;

use crate::error::{CompareError, Result};
use crate::layout::ChromaSampling;

// =============================================================================
// RowBand
// =============================================================================

/// Reusable row buffers for one read band
///
/// Holds one Y row for 4:4:4 or two for 4:2:2/4:2:0, plus the chroma rows
/// shared by those Y rows. Buffer lengths are fixed by layout and width.
#[derive(Debug)]
pub struct RowBand {
    /// Y rows, `rows_per_band()` of them, `width` bytes each
    pub y: Vec<Vec<u8>>,
    /// U row serving every Y row in the band
    pub u: Vec<u8>,
    /// V row serving every Y row in the band
    pub v: Vec<u8>,
}

impl RowBand {
    /// Allocate buffers sized for the given layout and width
    pub fn new(sampling: ChromaSampling, width: u32) -> Self {
        let chroma_len = sampling.chroma_row_len(width);
        Self {
            y: vec![vec![0u8; width as usize]; sampling.rows_per_band()],
            u: vec![0u8; chroma_len],
            v: vec![0u8; chroma_len],
        }
    }
}

// =============================================================================
// PlaneReader
// =============================================================================

/// Seek-and-read access to one raw YUV stream
#[derive(Debug)]
pub struct PlaneReader {
    file: File,
    path: PathBuf,
    len: u64,
}

impl PlaneReader {
    /// Open a stream and capture its byte length
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|source| CompareError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        let len = file
            .metadata()
            .map_err(|source| CompareError::Io {
                path: path.to_path_buf(),
                source,
            })?
            .len();

        Ok(Self {
            file,
            path: path.to_path_buf(),
            len,
        })
    }

    /// Stream length in bytes
    pub fn len(&self) -> u64 {
        self.len
    }

    /// Whether the stream holds no bytes at all
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Stream path, for error reports
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whole frames in the stream; trailing partial-frame bytes are ignored
    pub fn frame_count(&self, bytes_per_frame: u64) -> u64 {
        self.len / bytes_per_frame
    }

    /// Fill `out` with the rows of one band of one frame
    pub fn read_band(
        &mut self,
        sampling: ChromaSampling,
        width: u32,
        height: u32,
        frame: u64,
        band: u32,
        out: &mut RowBand,
    ) -> Result<()> {
        let frame_offset = frame * sampling.bytes_per_frame(width, height);

        for (row_in_band, row) in out.y.iter_mut().enumerate() {
            let offset = frame_offset + sampling.y_row_offset(band, row_in_band, width);
            self.read_row(offset, row)?;
        }

        let u_offset = frame_offset + sampling.u_row_offset(band, width, height);
        let v_offset = frame_offset + sampling.v_row_offset(band, width, height);
        trace!(frame, band, u_offset, v_offset, "chroma row offsets");
        self.read_row(u_offset, &mut out.u)?;
        self.read_row(v_offset, &mut out.v)?;

        Ok(())
    }

    /// Seek to `offset` and read exactly `buf.len()` bytes
    ///
    /// A clean end-of-file before the buffer is full is a
    /// [`CompareError::TruncatedStream`]; the caller never scores a
    /// partially filled row.
    fn read_row(&mut self, offset: u64, buf: &mut [u8]) -> Result<()> {
        self.file
            .seek(SeekFrom::Start(offset))
            .map_err(|source| CompareError::Io {
                path: self.path.clone(),
                source,
            })?;

        let mut filled = 0;
        while filled < buf.len() {
            match self.file.read(&mut buf[filled..]) {
                Ok(0) => {
                    return Err(CompareError::TruncatedStream {
                        path: self.path.clone(),
                        offset,
                        expected: buf.len(),
                        actual: filled,
                    });
                }
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(source) => {
                    return Err(CompareError::Io {
                        path: self.path.clone(),
                        source,
                    });
                }
            }
        }

        Ok(())
    }
}
