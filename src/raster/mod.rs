//! Pixel storage and the two per-pixel transforms applied to it.

/// Straight-alpha RGBA8 surfaces.
pub mod buffer;
/// Noisy gradient band.
pub mod gradient;
/// Nearest-neighbor upscaling.
pub mod scale;
