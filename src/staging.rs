//! Intermediate file locations and output naming.
//!
//! The pipeline hands data between external tools through PFM rasters at
//! fixed names under the staging directory. The names are stable across
//! runs: a later run overwrites whatever an earlier run left behind, and
//! nothing is cleaned up afterwards. Concurrent invocations sharing a
//! staging directory will race on these files.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

const COLOR_IN: &str = "denoise-in.pfm";
const COLOR_OUT: &str = "denoise-out.pfm";
const ALPHA_IN: &str = "denoise-in-alpha.pfm";
const ALPHA_OUT: &str = "denoise-out-alpha.pfm";

/// Suffix appended to the input stem to form the output file name.
pub const OUTPUT_SUFFIX: &str = ".denoised.png";

/// Staging directory holding the intermediate PFM rasters.
#[derive(Debug, Clone)]
pub struct Staging {
    dir: PathBuf,
}

impl Staging {
    /// Stage intermediates in the system temp directory.
    pub fn in_system_temp() -> Self {
        Self::in_dir(std::env::temp_dir())
    }

    /// Stage intermediates in an explicit directory.
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Color raster handed to the denoiser (alpha already dropped).
    pub fn color_in(&self) -> PathBuf {
        self.dir.join(COLOR_IN)
    }

    /// Denoised color raster.
    pub fn color_out(&self) -> PathBuf {
        self.dir.join(COLOR_OUT)
    }

    /// Extracted alpha channel as a grayscale raster.
    pub fn alpha_in(&self) -> PathBuf {
        self.dir.join(ALPHA_IN)
    }

    /// Denoised alpha raster.
    pub fn alpha_out(&self) -> PathBuf {
        self.dir.join(ALPHA_OUT)
    }
}

/// Derive the output path for an input image.
///
/// The input's extension is replaced with `.denoised.png`; an input
/// without an extension gets the suffix appended. The output lands next
/// to the input, whichever branch of the pipeline produced it.
pub fn output_path(input: &Path) -> PathBuf {
    let mut name: OsString = input.file_stem().unwrap_or_default().to_os_string();
    name.push(OUTPUT_SUFFIX);
    input.with_file_name(name)
}
