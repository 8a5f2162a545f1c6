//! Pixfade renders pixelated, dithered color-cycling gradient animations.
//!
//! A palette of colors sweeps across the canvas one after another, each transition drawn as
//! a noisy band that is upscaled with nearest-neighbor sampling for a blocky look. An optional
//! caption stays legible by always being drawn in the opposite layer's color.
//!
//! - Describe the animation with an [`AnimationConfig`]
//! - Build an [`AnimationState`] and drive it with [`AnimationState::update`] and [`draw`]
//! - Capture one full cycle into a [`FrameSink`] with [`capture_cycle`], or run it live
//!   through a [`PreviewLoop`]
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

/// Animation state and its time update.
pub mod animation;
/// One-cycle capture into a frame sink.
pub mod capture;
/// JSON animation config.
pub mod config;
/// Encoding sinks.
pub mod encode;
/// Output naming and size formatting.
pub mod export;
/// Fixed-step live preview loop.
pub mod preview;
/// Pixel buffers, gradient dither and upscaling.
pub mod raster;
/// Frame compositing.
pub mod render;
/// Caption layout and rasterization.
pub mod text;

pub use crate::foundation::core::{Direction, FrameIndex, Rgb8, Rgba8, next_index};
pub use crate::foundation::error::{PixfadeError, PixfadeResult};
pub use crate::foundation::rng::Rng64;

pub use crate::animation::state::{AnimationState, CYCLE_MS_PER_COLOR, GRADIENT_WIDTH};
pub use crate::capture::{CaptureJob, capture_cycle, expected_frame_count};
pub use crate::config::{AnimationConfig, DEFAULT_FRAME_DELAY_MS, DEFAULT_SEED};
pub use crate::encode::gif::{GifSink, GifSinkOpts};
pub use crate::encode::sink::{EncodeEvents, EncodeJob, FrameSink, InMemorySink, SinkConfig};
pub use crate::export::{default_gif_file_name, format_size_mb, sanitize_file_stem};
pub use crate::preview::PreviewLoop;
pub use crate::raster::buffer::PixelBuffer;
pub use crate::raster::gradient::{axis_length, draw_noisy_gradient, get_position};
pub use crate::raster::scale::scale_nearest;
pub use crate::render::compositor::draw;
pub use crate::text::{Caption, CaptionMask};
