//! External tool discovery.
//!
//! The pipeline depends on three external executables: ImageMagick's
//! `identify` and `convert` (IM7 ships both behind the single `magick`
//! entry point) and Intel Open Image Denoise's `oidnDenoise`. All three
//! are located up front so a missing tool fails the run before any
//! intermediate files are written.

use anyhow::{bail, Result};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Explicit tool locations from CLI flags or environment, overriding
/// `PATH` lookup.
#[derive(Debug, Clone, Default)]
pub struct ToolOverrides {
    pub identify: Option<PathBuf>,
    pub convert: Option<PathBuf>,
    pub oidn: Option<PathBuf>,
}

/// Resolved locations of the external executables.
#[derive(Debug, Clone)]
pub struct Toolchain {
    pub identify: PathBuf,
    pub convert: PathBuf,
    pub oidn: PathBuf,
}

impl Toolchain {
    /// Locate all three tools, honoring explicit overrides first.
    pub fn locate(overrides: &ToolOverrides) -> Result<Self> {
        Ok(Self {
            identify: find_tool(
                "identify",
                &["identify", "magick"],
                overrides.identify.as_deref(),
                "ImageMagick",
            )?,
            convert: find_tool(
                "convert",
                &["convert", "magick"],
                overrides.convert.as_deref(),
                "ImageMagick",
            )?,
            oidn: find_tool(
                "oidnDenoise",
                &["oidnDenoise"],
                overrides.oidn.as_deref(),
                "Intel Open Image Denoise",
            )?,
        })
    }

    /// Command for identify invocations. Inserts the `identify`
    /// subcommand when the resolved binary is the IM7 `magick` front-end.
    pub fn identify_command(&self) -> Command {
        let mut cmd = Command::new(&self.identify);
        if is_magick_frontend(&self.identify) {
            cmd.arg("identify");
        }
        cmd
    }

    /// Command for convert invocations. The bare `magick` front-end
    /// already behaves as convert, so no subcommand is needed.
    pub fn convert_command(&self) -> Command {
        Command::new(&self.convert)
    }

    /// Command for denoiser invocations.
    pub fn oidn_command(&self) -> Command {
        Command::new(&self.oidn)
    }
}

fn is_magick_frontend(path: &Path) -> bool {
    path.file_stem().map(|s| s == "magick").unwrap_or(false)
}

/// Find one tool: explicit override if given, otherwise the first of
/// `names` found on `PATH`.
fn find_tool(
    label: &str,
    names: &[&str],
    override_path: Option<&Path>,
    package: &str,
) -> Result<PathBuf> {
    if let Some(path) = override_path {
        if path.exists() {
            return Ok(path.to_path_buf());
        }
        bail!(
            "{} not found at specified path: {}",
            label,
            path.display()
        );
    }

    for name in names {
        if let Ok(found) = which::which(name) {
            return Ok(found);
        }
    }

    bail!(
        "{} binary not found on PATH (tried: {}). Install {} or pass an explicit path.",
        label,
        names.join(", "),
        package
    )
}
