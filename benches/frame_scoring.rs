//! Frame Scoring Benchmarks
//!
//! Measures whole-sequence scoring throughput at various resolutions and
//! layouts, plus the in-memory expansion/accumulation inner loop on its
//! own (no I/O).

use std::io::Write;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use tempfile::NamedTempFile;

use lamco_psnr::metrics::ErrorAccumulator;
use lamco_psnr::reader::RowBand;
use lamco_psnr::{ChromaSampling, CompareOptions, SequenceComparator, StreamContext};

/// Write a gradient-patterned stream of whole frames
fn generate_stream(sampling: ChromaSampling, width: u32, height: u32, frames: u64, bias: u8) -> NamedTempFile {
    let bytes_per_frame = sampling.bytes_per_frame(width, height) as usize;
    let mut data = vec![0u8; frames as usize * bytes_per_frame];
    for (i, byte) in data.iter_mut().enumerate() {
        *byte = ((i % 251) as u8).wrapping_add(bias);
    }

    let mut f = NamedTempFile::new().expect("temp file");
    f.write_all(&data).expect("write stream");
    f
}

/// Benchmark whole-sequence scoring for each layout
fn bench_sequence_scoring(c: &mut Criterion) {
    let mut group = c.benchmark_group("sequence_scoring");

    let resolutions = [(640, 480, "480p"), (1280, 720, "720p")];
    let layouts = [
        (ChromaSampling::Yuv444, "444"),
        (ChromaSampling::Yuv422, "422"),
        (ChromaSampling::Yuv420, "420"),
    ];
    let frames = 4u64;

    for (width, height, res_name) in resolutions {
        for (sampling, layout_name) in layouts {
            let reference = generate_stream(sampling, width, height, frames, 0);
            let test = generate_stream(sampling, width, height, frames, 3);

            let pixels = width as u64 * height as u64 * frames;
            group.throughput(Throughput::Elements(pixels));

            group.bench_function(BenchmarkId::new(layout_name, res_name), |b| {
                b.iter(|| {
                    let context = StreamContext {
                        reference: reference.path().to_path_buf(),
                        test: test.path().to_path_buf(),
                        width,
                        height,
                        sampling,
                    };
                    let comparator =
                        SequenceComparator::new(context, CompareOptions::default());
                    black_box(comparator.run().expect("scoring run"))
                })
            });
        }
    }

    group.finish();
}

/// Benchmark the expansion + accumulation inner loop without I/O
fn bench_band_accumulation(c: &mut Criterion) {
    let mut group = c.benchmark_group("band_accumulation");

    let width = 1920u32;
    let layouts = [
        (ChromaSampling::Yuv444, "444"),
        (ChromaSampling::Yuv422, "422"),
        (ChromaSampling::Yuv420, "420"),
    ];

    for (sampling, layout_name) in layouts {
        let mut reference = RowBand::new(sampling, width);
        let mut test = RowBand::new(sampling, width);
        for row in reference.y.iter_mut().chain(test.y.iter_mut()) {
            for (x, byte) in row.iter_mut().enumerate() {
                *byte = (x % 256) as u8;
            }
        }
        reference.u.fill(90);
        test.u.fill(93);
        reference.v.fill(200);
        test.v.fill(180);

        let pixels = width as u64 * sampling.rows_per_band() as u64;
        group.throughput(Throughput::Elements(pixels));

        group.bench_function(BenchmarkId::new(layout_name, "1920w"), |b| {
            b.iter(|| {
                let mut acc = ErrorAccumulator::new();
                acc.accumulate_band(sampling, width, black_box(&reference), black_box(&test));
                black_box(acc)
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_sequence_scoring, bench_band_accumulation);
criterion_main!(benches);
