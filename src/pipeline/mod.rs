//! Denoise orchestrator
//!
//! Sequences the external-tool invocations for one run:
//! 1. Inspect   - channel layout via identify
//! 2. Convert   - input to color PFM (alpha dropped by the format)
//! 3. Denoise   - color pass with the sRGB hint
//! 4. Alpha     - when the layout says so: extract, denoise linear,
//!                composite back onto the denoised color
//! 5. Finalize  - otherwise the denoised color alone becomes the output
//!
//! Steps run strictly in order, each one a blocking external process.
//! Any non-zero exit aborts the run with that tool's stderr.

pub mod config;

pub use config::{ConfigError, DenoiseConfig};

use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing::info;

use crate::channels::ChannelLayout;
use crate::magick;
use crate::oidn::{self, Transfer};
use crate::staging::{self, Staging};
use crate::tools::Toolchain;

/// What one run did, for the end-of-run summary.
#[derive(Debug, Clone)]
pub struct DenoiseReport {
    /// Channel layout reported by the inspection step
    pub channels: ChannelLayout,
    /// Whether the alpha channel got its own denoise pass
    pub alpha_pass: bool,
    /// Where the final image was written
    pub output: PathBuf,
}

/// One pipeline step. The plan for a run is decided once, from the
/// channel layout, before any conversion starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    /// Input to color PFM (drops alpha)
    ColorToPfm,
    /// Denoise the color raster with the sRGB hint
    DenoiseColor,
    /// Extract alpha as a grayscale PFM
    AlphaToPfm,
    /// Denoise the alpha raster (linear, no sRGB hint)
    DenoiseAlpha,
    /// Composite denoised alpha onto denoised color into the output
    CompositeOutput,
    /// Convert the denoised color raster alone into the output
    ConvertOutput,
}

/// Decide the step sequence for a channel layout. Only a layout whose
/// descriptor is the alpha-present token gets the alpha passes; every
/// other descriptor takes the single-raster path.
fn plan(channels: &ChannelLayout) -> Vec<Step> {
    let mut steps = vec![Step::ColorToPfm, Step::DenoiseColor];
    if channels.has_alpha() {
        steps.extend([Step::AlphaToPfm, Step::DenoiseAlpha, Step::CompositeOutput]);
    } else {
        steps.push(Step::ConvertOutput);
    }
    steps
}

/// Drives one denoise run
pub struct Denoiser {
    config: DenoiseConfig,
    tools: Toolchain,
    staging: Staging,
}

impl Denoiser {
    /// Validate the configuration and locate the external tools.
    pub fn new(config: DenoiseConfig) -> Result<Self> {
        config.validate().context("Invalid configuration")?;
        let tools = Toolchain::locate(&config.tool_overrides)?;

        Ok(Self {
            config,
            tools,
            staging: Staging::in_system_temp(),
        })
    }

    /// Use an explicit staging directory instead of the system temp dir.
    pub fn with_staging(mut self, staging: Staging) -> Self {
        self.staging = staging;
        self
    }

    /// Run the pipeline to completion.
    pub fn run(&self) -> Result<DenoiseReport> {
        let input = &self.config.input;

        let channels = magick::query_channels(&self.tools, input)?;
        info!("Channel layout for {}: {}", input.display(), channels);

        let output = staging::output_path(input);
        let steps = plan(&channels);

        for step in &steps {
            match step {
                Step::ColorToPfm => {
                    magick::color_to_pfm(&self.tools, input, &self.staging.color_in())?;
                }
                Step::DenoiseColor => {
                    info!("Denoising color");
                    oidn::denoise(
                        &self.tools,
                        &self.staging.color_in(),
                        &self.staging.color_out(),
                        Transfer::Srgb,
                    )?;
                }
                Step::AlphaToPfm => {
                    magick::alpha_to_pfm(&self.tools, input, &self.staging.alpha_in())?;
                }
                Step::DenoiseAlpha => {
                    info!("Denoising alpha");
                    oidn::denoise(
                        &self.tools,
                        &self.staging.alpha_in(),
                        &self.staging.alpha_out(),
                        Transfer::Linear,
                    )?;
                }
                Step::CompositeOutput => {
                    magick::composite(
                        &self.tools,
                        &self.staging.color_out(),
                        &self.staging.alpha_out(),
                        &output,
                    )?;
                }
                Step::ConvertOutput => {
                    magick::finalize(&self.tools, &self.staging.color_out(), &output)?;
                }
            }
        }

        info!("Wrote {}", output.display());

        Ok(DenoiseReport {
            alpha_pass: channels.has_alpha(),
            channels,
            output,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alpha_layout_selects_alpha_steps() {
        let steps = plan(&ChannelLayout::from_token("srgba"));
        assert_eq!(
            steps,
            [
                Step::ColorToPfm,
                Step::DenoiseColor,
                Step::AlphaToPfm,
                Step::DenoiseAlpha,
                Step::CompositeOutput,
            ]
        );
        assert!(!steps.contains(&Step::ConvertOutput));
    }

    #[test]
    fn test_other_layouts_take_single_raster_path() {
        for token in ["srgb", "rgba", "gray", "cmyk"] {
            let steps = plan(&ChannelLayout::from_token(token));
            assert_eq!(
                steps,
                [Step::ColorToPfm, Step::DenoiseColor, Step::ConvertOutput],
                "token {:?}",
                token
            );
        }
    }

    #[test]
    fn test_full_run_when_tools_available() -> Result<()> {
        use crate::tools::ToolOverrides;

        // Needs identify, convert, and oidnDenoise all on PATH
        if Toolchain::locate(&ToolOverrides::default()).is_err() {
            return Ok(());
        }

        let dir = tempfile::tempdir()?;
        let input = dir.path().join("render.png");
        image::RgbaImage::from_pixel(16, 16, image::Rgba([90, 120, 200, 255])).save(&input)?;

        let config = DenoiseConfig {
            input,
            tool_overrides: ToolOverrides::default(),
        };
        let report = Denoiser::new(config)?
            .with_staging(Staging::in_dir(dir.path()))
            .run()?;

        assert!(report.alpha_pass);
        assert_eq!(report.output, dir.path().join("render.denoised.png"));
        assert!(report.output.exists());
        Ok(())
    }

    #[test]
    fn test_color_passes_precede_alpha_passes() {
        // The composite needs both denoised rasters; order within the
        // plan is what guarantees they exist by then.
        let steps = plan(&ChannelLayout::from_token("srgba"));
        let composite_at = steps
            .iter()
            .position(|s| *s == Step::CompositeOutput)
            .unwrap();
        assert_eq!(composite_at, steps.len() - 1);
    }
}
