//! denoisewrap - alpha-aware denoising front-end
//!
//! Drives ImageMagick and Intel Open Image Denoise to clean up rendered
//! images, giving the alpha channel its own denoise pass when present.

use anyhow::Result;
use clap::Parser;
use denoisewrap::pipeline::{DenoiseConfig, Denoiser};
use denoisewrap::tools::ToolOverrides;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "denoisewrap")]
#[command(version)]
#[command(about = "Denoise rendered images with oidnDenoise, handling the alpha channel separately")]
struct Cli {
    /// Input image to denoise
    input: PathBuf,

    /// Explicit path to the ImageMagick convert/magick binary
    #[arg(long, env = "DENOISEWRAP_MAGICK")]
    magick_bin: Option<PathBuf>,

    /// Explicit path to the ImageMagick identify binary
    #[arg(long, env = "DENOISEWRAP_IDENTIFY")]
    identify_bin: Option<PathBuf>,

    /// Explicit path to the oidnDenoise binary
    #[arg(long, env = "DENOISEWRAP_OIDN")]
    oidn_bin: Option<PathBuf>,

    /// Enable verbose logging (use RUST_LOG=debug for more detail)
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Only initialize logging if verbose or RUST_LOG is set
    if cli.verbose || std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive(if cli.verbose {
                    "denoisewrap=debug".parse()?
                } else {
                    "denoisewrap=warn".parse()?
                }),
            )
            .init();
    }

    let config = DenoiseConfig {
        input: cli.input,
        tool_overrides: ToolOverrides {
            identify: cli.identify_bin,
            convert: cli.magick_bin,
            oidn: cli.oidn_bin,
        },
    };

    let denoiser = Denoiser::new(config)?;
    let report = denoiser.run()?;

    println!("Channels: {}", report.channels);
    if report.alpha_pass {
        println!("Alpha:    denoised separately and recomposited");
    }
    println!("Output:   {}", report.output.display());

    Ok(())
}
