//! denoisewrap - alpha-aware denoising front-end
//!
//! Drives ImageMagick and Intel Open Image Denoise to clean up rendered
//! images: the color data is denoised with an sRGB hint, and when the
//! input carries an alpha channel that channel is extracted, denoised
//! separately, and composited back into the output.

pub mod channels;
pub mod magick;
pub mod oidn;
pub mod pipeline;
pub mod staging;
pub mod tools;
