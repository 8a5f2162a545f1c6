//! Encoding sinks.
//!
//! Sinks consume rendered frames in capture order and finalize them, possibly off-thread.

/// Animated GIF output via `image`'s GIF codec.
pub mod gif;
/// Generic frame sink trait and built-in sinks.
pub mod sink;
