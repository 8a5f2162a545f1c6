use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::foundation::core::{Direction, Rgb8};
use crate::foundation::error::{PixfadeError, PixfadeResult};

/// Default capture frame delay: one 60 Hz display frame.
pub const DEFAULT_FRAME_DELAY_MS: f64 = 1000.0 / 60.0;

/// Default dither seed.
pub const DEFAULT_SEED: u64 = 0x5EED;

/// Everything needed to build an animation: canvas size, pixel scale, palette, sweep
/// direction, caption and encoder pacing.
///
/// Read-only to the renderer; a new config means a new [`AnimationState`](crate::AnimationState).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AnimationConfig {
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// Integer downscale factor of the gradient ("pixel size").
    #[serde(default = "default_scale")]
    pub scale: u32,
    /// Palette cycled through, one dwell period per color.
    pub colors: Vec<Rgb8>,
    /// Sweep direction of the gradient.
    #[serde(default = "default_direction")]
    pub direction: Direction,
    /// Caption drawn in the middle of every frame; empty for none.
    #[serde(default)]
    pub text: String,
    /// Font file used for the caption. Relative paths resolve against the config file.
    #[serde(default)]
    pub font: Option<PathBuf>,
    /// Caption size in pixels.
    #[serde(default = "default_font_size")]
    pub font_size: f32,
    /// Dither seed.
    #[serde(default = "default_seed")]
    pub seed: u64,
    /// Animation time per captured frame, in milliseconds.
    #[serde(default = "default_frame_delay_ms")]
    pub frame_delay_ms: f64,
}

fn default_scale() -> u32 {
    1
}

fn default_direction() -> Direction {
    Direction::Down
}

fn default_font_size() -> f32 {
    32.0
}

fn default_seed() -> u64 {
    DEFAULT_SEED
}

fn default_frame_delay_ms() -> f64 {
    DEFAULT_FRAME_DELAY_MS
}

impl AnimationConfig {
    /// Minimal caption-less config; handy for tests and programmatic use.
    pub fn new(width: u32, height: u32, colors: Vec<Rgb8>) -> Self {
        Self {
            width,
            height,
            scale: default_scale(),
            colors,
            direction: default_direction(),
            text: String::new(),
            font: None,
            font_size: default_font_size(),
            seed: default_seed(),
            frame_delay_ms: default_frame_delay_ms(),
        }
    }

    /// Read and validate a JSON config. A relative `font` path is resolved against the
    /// directory containing `path`.
    pub fn load(path: &Path) -> PixfadeResult<Self> {
        let f = File::open(path)?;
        let mut cfg: Self = serde_json::from_reader(BufReader::new(f)).map_err(|e| {
            PixfadeError::validation(format!("parse config '{}': {e}", path.display()))
        })?;
        if let (Some(font), Some(dir)) = (cfg.font.as_mut(), path.parent())
            && font.is_relative()
        {
            *font = dir.join(&*font);
        }
        cfg.validate()?;
        Ok(cfg)
    }

    /// Parse and validate a config from JSON text.
    ///
    /// A relative `font` path is kept as is.
    pub fn from_json_str(s: &str) -> PixfadeResult<Self> {
        let cfg: Self = serde_json::from_str(s)
            .map_err(|e| PixfadeError::validation(format!("parse config: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Check sizes, scale, palette, font size and frame delay.
    pub fn validate(&self) -> PixfadeResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(PixfadeError::validation("canvas width/height must be > 0"));
        }
        if self.scale == 0 {
            return Err(PixfadeError::validation("scale must be >= 1"));
        }
        if self.scale > self.width || self.scale > self.height {
            return Err(PixfadeError::validation(
                "scale must not exceed canvas width/height",
            ));
        }
        if self.colors.is_empty() {
            return Err(PixfadeError::validation("at least one color is required"));
        }
        if !self.font_size.is_finite() || self.font_size <= 0.0 {
            return Err(PixfadeError::validation("font_size must be finite and > 0"));
        }
        if !self.frame_delay_ms.is_finite() || self.frame_delay_ms <= 0.0 {
            return Err(PixfadeError::validation(
                "frame_delay_ms must be finite and > 0",
            ));
        }
        if !self.text.is_empty() && self.font.is_none() {
            return Err(PixfadeError::validation(
                "a font is required when text is set",
            ));
        }
        Ok(())
    }

    /// Size of the low-resolution gradient buffer (integer division by `scale`).
    pub fn low_res_size(&self) -> (u32, u32) {
        let scale = self.scale.max(1);
        (self.width / scale, self.height / scale)
    }

    /// `true` when `scale` divides both dimensions exactly.
    pub fn scale_divides_evenly(&self) -> bool {
        self.scale != 0 && self.width % self.scale == 0 && self.height % self.scale == 0
    }
}
