//! Channel-layout descriptors.
//!
//! ImageMagick's `identify -format '%[channels]'` reports the channel
//! composition of an image as a short token: `srgb` for plain sRGB color,
//! `srgba` when an alpha channel is present, `gray` for grayscale, etc.
//! The token decides whether the alpha channel gets its own denoise pass.

use std::fmt;

/// Channel layout of an input image, as reported by the inspection tool.
///
/// The raw token is kept verbatim (after trimming tool-output whitespace)
/// so it can be shown to the user exactly as reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelLayout {
    token: String,
}

impl ChannelLayout {
    /// Token identify reports for sRGB color with an alpha channel.
    pub const ALPHA_TOKEN: &'static str = "srgba";

    /// Wrap a raw token from tool output. Trailing newlines and
    /// surrounding whitespace are trimmed; the token is otherwise
    /// preserved verbatim.
    pub fn from_token(raw: &str) -> Self {
        Self {
            token: raw.trim().to_string(),
        }
    }

    /// The raw descriptor token.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Whether the image carries an alpha channel that needs its own
    /// denoise pass.
    ///
    /// Exact match against `srgba` only. Every other token (including
    /// variants like `rgba` in non-sRGB colorspaces) takes the color-only
    /// path, matching what the compositing step supports.
    pub fn has_alpha(&self) -> bool {
        self.token == Self::ALPHA_TOKEN
    }
}

impl fmt::Display for ChannelLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.token)
    }
}
