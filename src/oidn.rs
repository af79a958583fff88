//! oidnDenoise invocations.
//!
//! The denoiser is treated as an opaque executable with a fixed CLI
//! contract: `oidnDenoise --ldr <in.pfm> [--srgb] -o <out.pfm>`. The
//! `--srgb` hint is passed for the color pass only; the alpha raster is
//! linear data.

use anyhow::{bail, Context, Result};
use std::ffi::OsString;
use std::path::Path;
use tracing::debug;

use crate::tools::Toolchain;

/// Transfer-function hint for a denoise pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transfer {
    /// sRGB-encoded low-dynamic-range color.
    Srgb,
    /// Linear data (the extracted alpha raster).
    Linear,
}

/// Arguments for one denoise pass.
pub fn denoise_args(input: &Path, out: &Path, transfer: Transfer) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec!["--ldr".into(), input.as_os_str().to_os_string()];
    if transfer == Transfer::Srgb {
        args.push("--srgb".into());
    }
    args.push("-o".into());
    args.push(out.as_os_str().to_os_string());
    args
}

/// Run one denoise pass over a PFM raster.
pub fn denoise(tools: &Toolchain, input: &Path, out: &Path, transfer: Transfer) -> Result<()> {
    let args = denoise_args(input, out, transfer);
    debug!("oidnDenoise: {:?}", args);

    let output = tools
        .oidn_command()
        .args(&args)
        .output()
        .with_context(|| format!("Failed to run oidnDenoise on {}", input.display()))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        bail!(
            "oidnDenoise failed for {}: {}",
            input.display(),
            stderr.trim()
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args_as_strings(args: &[OsString]) -> Vec<String> {
        args.iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn test_color_pass_contract() {
        let args = denoise_args(
            Path::new("/tmp/denoise-in.pfm"),
            Path::new("/tmp/denoise-out.pfm"),
            Transfer::Srgb,
        );
        assert_eq!(
            args_as_strings(&args),
            [
                "--ldr",
                "/tmp/denoise-in.pfm",
                "--srgb",
                "-o",
                "/tmp/denoise-out.pfm"
            ]
        );
    }

    #[test]
    fn test_nonzero_exit_is_an_error() {
        use std::path::PathBuf;

        let false_bin = PathBuf::from("/bin/false");
        if !false_bin.exists() {
            return;
        }
        let tools = Toolchain {
            identify: false_bin.clone(),
            convert: false_bin.clone(),
            oidn: false_bin,
        };
        let result = denoise(
            &tools,
            Path::new("in.pfm"),
            Path::new("out.pfm"),
            Transfer::Srgb,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_alpha_pass_has_no_srgb_hint() {
        let args = denoise_args(
            Path::new("/tmp/denoise-in-alpha.pfm"),
            Path::new("/tmp/denoise-out-alpha.pfm"),
            Transfer::Linear,
        );
        assert_eq!(
            args_as_strings(&args),
            [
                "--ldr",
                "/tmp/denoise-in-alpha.pfm",
                "-o",
                "/tmp/denoise-out-alpha.pfm"
            ]
        );
    }
}
