//! lamco-psnr - Streaming YUV fidelity comparator
//!
//! Entry point for the comparator binary.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lamco_psnr::{ChromaSampling, CompareOptions, SequenceComparator, StreamContext};

/// Command-line arguments for lamco-psnr
#[derive(Parser, Debug)]
#[command(name = "lamco-psnr")]
#[command(version, about = "Computes PSNR between reference and test video streams", long_about = None)]
pub struct Args {
    /// Chroma sub-sampling in J:a:b form: one of 4:4:4, 4:2:2, 4:2:0
    #[arg(short, long)]
    pub sampling: String,

    /// Frame width in pixels
    #[arg(short, long)]
    pub width: u32,

    /// Frame height in pixels
    #[arg(short = 'H', long)]
    pub height: u32,

    /// Worker threads scoring frame chunks
    #[arg(short, long, env = "LAMCO_PSNR_JOBS", default_value = "1")]
    pub jobs: usize,

    /// Verbose logging (can be specified multiple times)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Log format (json|pretty|compact)
    #[arg(long, default_value = "compact")]
    pub log_format: String,

    /// Reference video file
    pub ref_file: PathBuf,

    /// Test video file
    pub test_file: PathBuf,
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args)?;

    info!(
        "lamco-psnr v{} (built {}, commit {})",
        env!("CARGO_PKG_VERSION"),
        env!("BUILD_DATE"),
        env!("GIT_HASH"),
    );

    let sampling: ChromaSampling = args.sampling.parse()?;
    let context = StreamContext {
        reference: args.ref_file,
        test: args.test_file,
        width: args.width,
        height: args.height,
        sampling,
    };
    let options = CompareOptions { jobs: args.jobs };

    let result = SequenceComparator::new(context, options).run()?;

    // The two result lines are the machine-readable output; logs go to stderr
    println!("Sequence Score: {:.4} dB", result.sequence_score_db);
    println!("FPS: {:.2}/sec", result.fps());

    Ok(())
}

fn init_logging(args: &Args) -> Result<()> {
    let log_level = match args.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(format!("lamco_psnr={log_level}")));

    // Logs must not interleave with the stdout result lines
    match args.log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(std::io::stderr),
                )
                .init();
        }
        "pretty" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .pretty()
                        .with_writer(std::io::stderr),
                )
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .compact()
                        .with_writer(std::io::stderr),
                )
                .init();
        }
    }

    Ok(())
}
