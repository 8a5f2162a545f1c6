//! Per-frame compositing of the gradient, background, and caption layers.

/// Straight-alpha blend operators.
pub mod blend;
/// The per-frame draw pipeline.
pub mod compositor;
