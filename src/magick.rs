//! ImageMagick invocations.
//!
//! Every pipeline step that touches pixels is delegated to ImageMagick:
//! channel inspection, PFM conversion, alpha extraction, and the final
//! composite. Each conversion has a pure argument builder (the fixed CLI
//! contract, covered by tests) and a checked runner that fails the run
//! with the tool's stderr on a non-zero exit.
//!
//! # Command reference
//!
//! - Inspect:   `identify -format '%[channels]' input`
//! - To PFM:    `convert -endian LSB input out.pfm`
//!   - PFM carries no alpha, so this also drops the alpha channel
//!   - `-endian LSB`: oidnDenoise reads little-endian PFM
//! - Alpha:     `convert -endian LSB input -alpha extract -colorspace RGB
//!   -type truecolor out.pfm`
//!   - `-alpha extract`: the alpha channel becomes the image content
//!   - `-colorspace RGB -type truecolor`: denoiser wants a linear
//!     three-channel raster
//! - Composite: `convert color.pfm alpha.pfm -compose CopyOpacity
//!   -composite output`
//! - Finalize:  `convert color.pfm output`

use anyhow::{bail, Context, Result};
use std::ffi::OsString;
use std::path::Path;
use tracing::debug;

use crate::channels::ChannelLayout;
use crate::tools::Toolchain;

/// Query the channel layout of an image.
pub fn query_channels(tools: &Toolchain, input: &Path) -> Result<ChannelLayout> {
    let output = tools
        .identify_command()
        .arg("-format")
        .arg("%[channels]")
        .arg(input)
        .output()
        .with_context(|| format!("Failed to run identify on {}", input.display()))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        bail!(
            "identify failed for {}: {}",
            input.display(),
            stderr.trim()
        );
    }

    let token = String::from_utf8_lossy(&output.stdout);
    Ok(ChannelLayout::from_token(&token))
}

/// Arguments converting the input to a little-endian color PFM.
///
/// PFM has no alpha plane, so any alpha channel is dropped here.
pub fn color_to_pfm_args(input: &Path, out: &Path) -> Vec<OsString> {
    vec![
        "-endian".into(),
        "LSB".into(),
        input.as_os_str().to_os_string(),
        out.as_os_str().to_os_string(),
    ]
}

/// Arguments extracting the alpha channel as a grayscale truecolor PFM.
pub fn alpha_to_pfm_args(input: &Path, out: &Path) -> Vec<OsString> {
    vec![
        "-endian".into(),
        "LSB".into(),
        input.as_os_str().to_os_string(),
        "-alpha".into(),
        "extract".into(),
        "-colorspace".into(),
        "RGB".into(),
        "-type".into(),
        "truecolor".into(),
        out.as_os_str().to_os_string(),
    ]
}

/// Arguments recombining denoised color and denoised alpha into the
/// final output. CopyOpacity takes the second image's intensity as the
/// first image's opacity.
pub fn composite_args(color: &Path, alpha: &Path, out: &Path) -> Vec<OsString> {
    vec![
        color.as_os_str().to_os_string(),
        alpha.as_os_str().to_os_string(),
        "-compose".into(),
        "CopyOpacity".into(),
        "-composite".into(),
        out.as_os_str().to_os_string(),
    ]
}

/// Arguments converting a single raster to the final output.
pub fn finalize_args(input: &Path, out: &Path) -> Vec<OsString> {
    vec![
        input.as_os_str().to_os_string(),
        out.as_os_str().to_os_string(),
    ]
}

/// Convert the input to a color PFM, dropping alpha.
pub fn color_to_pfm(tools: &Toolchain, input: &Path, out: &Path) -> Result<()> {
    run_convert(tools, &color_to_pfm_args(input, out), "color to PFM")
}

/// Extract the input's alpha channel as a grayscale PFM.
pub fn alpha_to_pfm(tools: &Toolchain, input: &Path, out: &Path) -> Result<()> {
    run_convert(tools, &alpha_to_pfm_args(input, out), "alpha extraction")
}

/// Recombine denoised color and denoised alpha into the output image.
pub fn composite(tools: &Toolchain, color: &Path, alpha: &Path, out: &Path) -> Result<()> {
    run_convert(tools, &composite_args(color, alpha, out), "alpha composite")
}

/// Convert the denoised raster to the output image.
pub fn finalize(tools: &Toolchain, input: &Path, out: &Path) -> Result<()> {
    run_convert(tools, &finalize_args(input, out), "output conversion")
}

fn run_convert(tools: &Toolchain, args: &[OsString], what: &str) -> Result<()> {
    debug!("convert ({}): {:?}", what, args);

    let output = tools
        .convert_command()
        .args(args)
        .output()
        .with_context(|| format!("Failed to run convert ({})", what))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        bail!("convert failed ({}): {}", what, stderr.trim());
    }

    Ok(())
}
