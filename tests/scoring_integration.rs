//! End-to-end scoring tests
//!
//! Exercises the full pipeline over real files: layout decoding, offset
//! arithmetic, row reads, chroma expansion, and the sequence aggregation
//! composition, using the concrete scenarios the contract pins down.

use std::io::Write;

use tempfile::NamedTempFile;

use lamco_psnr::{
    psnr_db, ChromaSampling, CompareOptions, SequenceComparator, StreamContext, PSNR_PEAK_DB,
};

const EPS: f64 = 1e-9;

fn stream_with_bytes(bytes: &[u8]) -> NamedTempFile {
    let mut f = NamedTempFile::new().expect("temp file");
    f.write_all(bytes).expect("write fixture");
    f
}

fn score(
    reference: &NamedTempFile,
    test: &NamedTempFile,
    width: u32,
    height: u32,
    sampling: ChromaSampling,
    jobs: usize,
) -> lamco_psnr::SequenceResult {
    let context = StreamContext {
        reference: reference.path().to_path_buf(),
        test: test.path().to_path_buf(),
        width,
        height,
        sampling,
    };
    SequenceComparator::new(context, CompareOptions { jobs })
        .run()
        .expect("scoring run")
}

#[test]
fn test_identical_streams_score_zero_db_for_every_layout() {
    // Zero MSE maps to 0 dB, not infinity - regression-pinned because it
    // is counter-intuitive.
    for sampling in [
        ChromaSampling::Yuv444,
        ChromaSampling::Yuv422,
        ChromaSampling::Yuv420,
    ] {
        let (w, h) = (4u32, 4u32);
        let bytes = vec![128u8; 2 * sampling.bytes_per_frame(w, h) as usize];
        let reference = stream_with_bytes(&bytes);
        let test = stream_with_bytes(&bytes);

        let result = score(&reference, &test, w, h, sampling, 1);
        assert_eq!(result.frames, 2, "{sampling}");
        assert_eq!(result.sequence_score_db, 0.0, "{sampling}");
    }
}

#[test]
fn test_known_luma_offset_scenario() {
    // One 2×2 4:4:4 frame: every reference Y = 100, every test Y = 110,
    // chroma identical. MSE_Y = 100 ⇒ PSNR_Y = 28.1308 dB, U/V at 0 dB,
    // frame score ≈ 9.377 dB, and the sequence score is that frame score
    // fed back through the PSNR formula.
    let mut ref_bytes = vec![100u8; 4];
    ref_bytes.extend(vec![128u8; 8]);
    let mut test_bytes = vec![110u8; 4];
    test_bytes.extend(vec![128u8; 8]);
    let reference = stream_with_bytes(&ref_bytes);
    let test = stream_with_bytes(&test_bytes);

    let result = score(&reference, &test, 2, 2, ChromaSampling::Yuv444, 1);

    let frame_score = (PSNR_PEAK_DB - 20.0) / 3.0;
    assert!((frame_score - 9.376_934_536).abs() < 1e-6);
    assert!((result.sequence_score_db - psnr_db(frame_score)).abs() < EPS);
}

#[test]
fn test_sequence_score_feeds_average_frame_score_through_psnr() {
    // Frame 0 identical (scores 0), frame 1 is the luma-offset frame.
    // sequence = psnr_db((0 + frameScore) / 2), NOT the mean of the two
    // per-frame PSNR values.
    let mut ref_bytes = vec![128u8; 12];
    ref_bytes.extend(vec![100u8; 4]);
    ref_bytes.extend(vec![128u8; 8]);
    let mut test_bytes = vec![128u8; 12];
    test_bytes.extend(vec![110u8; 4]);
    test_bytes.extend(vec![128u8; 8]);
    let reference = stream_with_bytes(&ref_bytes);
    let test = stream_with_bytes(&test_bytes);

    let result = score(&reference, &test, 2, 2, ChromaSampling::Yuv444, 1);

    let frame_score = (PSNR_PEAK_DB - 20.0) / 3.0;
    assert_eq!(result.frames, 2);
    assert!((result.sequence_score_db - psnr_db(frame_score / 2.0)).abs() < EPS);
}

#[test]
fn test_422_unsampled_chroma_bytes_do_not_affect_score() {
    // 4×2 4:2:2: odd columns of a stored chroma row are never sampled
    // (odd pixels duplicate the preceding even column), so arbitrary
    // garbage there must not move the score.
    let (w, h) = (4u32, 2u32);
    let mut ref_bytes = vec![50u8; 8]; // Y
    ref_bytes.extend([10, 99, 30, 99]); // U row
    ref_bytes.extend([40, 99, 60, 99]); // V row
    let mut test_bytes = vec![50u8; 8];
    test_bytes.extend([10, 0, 30, 0]);
    test_bytes.extend([40, 0, 60, 0]);
    let reference = stream_with_bytes(&ref_bytes);
    let test = stream_with_bytes(&test_bytes);

    let result = score(&reference, &test, w, h, ChromaSampling::Yuv422, 1);
    assert_eq!(result.sequence_score_db, 0.0);
}

#[test]
fn test_422_even_column_chroma_duplicates_into_odd() {
    // A single even-column U difference of 3 covers columns 0 and 1 of
    // both rows sharing the chroma row: 4 positions × 3² = 36, over the
    // full 8-pixel frame ⇒ MSE_U = 4.5.
    let (w, h) = (4u32, 2u32);
    let mut ref_bytes = vec![50u8; 8];
    ref_bytes.extend([10, 0, 30, 0]); // U
    ref_bytes.extend([40, 0, 60, 0]); // V
    let mut test_bytes = vec![50u8; 8];
    test_bytes.extend([13, 0, 30, 0]);
    test_bytes.extend([40, 0, 60, 0]);
    let reference = stream_with_bytes(&ref_bytes);
    let test = stream_with_bytes(&test_bytes);

    let result = score(&reference, &test, w, h, ChromaSampling::Yuv422, 1);

    let frame_score = psnr_db(4.5) / 3.0;
    assert!((result.sequence_score_db - psnr_db(frame_score)).abs() < EPS);
}

#[test]
fn test_420_single_chroma_sample_counts_once_per_block_position() {
    // 2×2 4:2:0 holds one U and one V sample for the whole block. A U
    // difference of 10 contributes at all four expanded positions:
    // MSE_U = 4·100 / 4 = 100.
    let mut ref_bytes = vec![50u8; 4]; // Y
    ref_bytes.push(100); // U
    ref_bytes.push(128); // V
    let mut test_bytes = vec![50u8; 4];
    test_bytes.push(110);
    test_bytes.push(128);
    let reference = stream_with_bytes(&ref_bytes);
    let test = stream_with_bytes(&test_bytes);

    let result = score(&reference, &test, 2, 2, ChromaSampling::Yuv420, 1);

    let frame_score = (PSNR_PEAK_DB - 20.0) / 3.0;
    assert!((result.sequence_score_db - psnr_db(frame_score)).abs() < EPS);
}

#[test]
fn test_trailing_partial_frame_is_ignored() {
    // 3 whole 4:2:0 frames plus a partial tail on the reference side
    let (w, h) = (4u32, 4u32);
    let bpf = ChromaSampling::Yuv420.bytes_per_frame(w, h) as usize;
    let reference = stream_with_bytes(&vec![128u8; 3 * bpf + bpf / 2]);
    let test = stream_with_bytes(&vec![128u8; 3 * bpf]);

    let result = score(&reference, &test, w, h, ChromaSampling::Yuv420, 1);
    assert_eq!(result.frames, 3);
}

#[test]
fn test_rescoring_is_deterministic() {
    // The algorithm is pure given the same byte content
    let (w, h) = (4u32, 2u32);
    let ref_bytes: Vec<u8> = (0..2 * 16).map(|i| (i * 7 % 251) as u8).collect();
    let test_bytes: Vec<u8> = (0..2 * 16).map(|i| (i * 13 % 241) as u8).collect();
    let reference = stream_with_bytes(&ref_bytes);
    let test = stream_with_bytes(&test_bytes);

    let first = score(&reference, &test, w, h, ChromaSampling::Yuv422, 1);
    let second = score(&reference, &test, w, h, ChromaSampling::Yuv422, 1);
    assert_eq!(first.sequence_score_db, second.sequence_score_db);
    assert_eq!(first.frames, second.frames);
}

#[test]
fn test_jobs_parity_on_identical_streams() {
    // All frame scores are exactly 0.0, so chunked merging must agree
    // bit-for-bit with the sequential sum.
    let (w, h) = (4u32, 4u32);
    let bytes = vec![128u8; 6 * ChromaSampling::Yuv444.bytes_per_frame(w, h) as usize];
    let reference = stream_with_bytes(&bytes);
    let test = stream_with_bytes(&bytes);

    let sequential = score(&reference, &test, w, h, ChromaSampling::Yuv444, 1);
    let chunked = score(&reference, &test, w, h, ChromaSampling::Yuv444, 4);
    assert_eq!(sequential.sequence_score_db, chunked.sequence_score_db);
    assert_eq!(sequential.frames, chunked.frames);
}
