use crate::config::AnimationConfig;
use crate::foundation::core::{Direction, Rgb8, next_index};
use crate::foundation::error::PixfadeResult;
use crate::foundation::rng::Rng64;
use crate::raster::buffer::PixelBuffer;
use crate::text::{Caption, CaptionMask};

/// Milliseconds each palette color stays current; a full cycle lasts `n * CYCLE_MS_PER_COLOR`.
pub const CYCLE_MS_PER_COLOR: f64 = 2000.0;

/// Fraction of the frame occupied by the dithered transition.
pub const GRADIENT_WIDTH: f64 = 0.5;

/// Mutable state of one animation session.
///
/// Built once from an [`AnimationConfig`], advanced in place by [`AnimationState::update`] and
/// rendered by [`draw`](crate::draw). Preview and capture each own a separate instance.
#[derive(Debug)]
pub struct AnimationState {
    pub(crate) width: u32,
    pub(crate) height: u32,
    pub(crate) scale: u32,
    pub(crate) colors: Vec<Rgb8>,
    pub(crate) direction: Direction,
    pub(crate) gradient_width: f64,
    pub(crate) frame_delay_ms: f64,

    pub(crate) progress: f64,
    pub(crate) color_index: usize,
    pub(crate) color_changed: bool,
    /// Sticky copy of `color_changed`, consumed by the next draw even when several updates
    /// ran in between.
    pub(crate) clear_pending: bool,

    pub(crate) rng: Rng64,
    pub(crate) caption: Option<CaptionMask>,

    pub(crate) low_res: PixelBuffer,
    pub(crate) full_res: PixelBuffer,
    pub(crate) background: PixelBuffer,
    pub(crate) foreground: PixelBuffer,
    pub(crate) final_surface: PixelBuffer,
}

impl AnimationState {
    /// Build a state from `cfg` with an already loaded caption (or none).
    pub fn new(cfg: &AnimationConfig, caption: Option<Caption>) -> PixfadeResult<Self> {
        cfg.validate()?;
        let (low_w, low_h) = cfg.low_res_size();

        let caption = match caption {
            Some(c) => {
                let mask = CaptionMask::rasterize(&c, cfg.width, cfg.height)?;
                (!mask.is_empty()).then_some(mask)
            }
            None => None,
        };

        if !cfg.scale_divides_evenly() {
            tracing::warn!(
                width = cfg.width,
                height = cfg.height,
                scale = cfg.scale,
                "scale does not divide the canvas; right/bottom edge pixels stay uncovered"
            );
        }

        Ok(Self {
            width: cfg.width,
            height: cfg.height,
            scale: cfg.scale,
            colors: cfg.colors.clone(),
            direction: cfg.direction,
            gradient_width: GRADIENT_WIDTH,
            frame_delay_ms: cfg.frame_delay_ms,
            progress: 0.0,
            color_index: 0,
            color_changed: false,
            clear_pending: false,
            rng: Rng64::new(cfg.seed),
            caption,
            low_res: PixelBuffer::new(low_w, low_h),
            full_res: PixelBuffer::new(cfg.width, cfg.height),
            background: PixelBuffer::new(cfg.width, cfg.height),
            foreground: PixelBuffer::new(cfg.width, cfg.height),
            final_surface: PixelBuffer::new(cfg.width, cfg.height),
        })
    }

    /// Build a state from `cfg`, loading the caption font from `cfg.font` when text is set.
    pub fn from_config(cfg: &AnimationConfig) -> PixfadeResult<Self> {
        cfg.validate()?;
        let caption = match (&cfg.font, cfg.text.trim().is_empty()) {
            (Some(font), false) => Some(Caption::load(cfg.text.clone(), font, cfg.font_size)?),
            _ => None,
        };
        Self::new(cfg, caption)
    }

    /// Advance the cycle by `delta_ms` of elapsed time.
    ///
    /// A full cycle takes `n * 2000` ms. Reaching or passing 1.0 resets progress to exactly
    /// 0.0; the time past the end of the cycle is dropped, not carried into the next one.
    /// Negative or non-finite deltas are ignored.
    pub fn update(&mut self, delta_ms: f64) {
        if !delta_ms.is_finite() || delta_ms < 0.0 {
            tracing::warn!(delta_ms, "ignoring invalid animation time delta");
            self.color_changed = false;
            return;
        }
        let n = self.colors.len();
        let new_progress = self.progress + delta_ms / (n as f64 * CYCLE_MS_PER_COLOR);
        self.progress = if new_progress >= 1.0 {
            0.0
        } else {
            new_progress
        };

        let new_index = ((self.progress * n as f64).floor() as usize).min(n - 1);
        self.color_changed = new_index != self.color_index;
        if self.color_changed {
            tracing::trace!(
                from = self.color_index,
                to = new_index,
                progress = self.progress,
                "palette color changed"
            );
            self.clear_pending = true;
        }
        self.color_index = new_index;
    }

    /// Position in the whole palette cycle, in `[0, 1)`.
    pub fn progress(&self) -> f64 {
        self.progress
    }

    /// Index of the color currently shown.
    pub fn color_index(&self) -> usize {
        self.color_index
    }

    /// Set by the update that moved to a new color, cleared by the next one.
    pub fn color_changed(&self) -> bool {
        self.color_changed
    }

    /// The palette, in cycle order.
    pub fn colors(&self) -> &[Rgb8] {
        &self.colors
    }

    /// Sweep direction of the gradient.
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Capture frame delay copied from the config.
    pub fn frame_delay_ms(&self) -> f64 {
        self.frame_delay_ms
    }

    /// Output width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Output height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// `colors()[color_index()]`.
    pub fn current_color(&self) -> Rgb8 {
        self.colors[self.color_index]
    }

    /// Index of the color sweeping in, wrapping to 0.
    pub fn next_color_index(&self) -> usize {
        next_index(self.color_index, self.colors.len())
    }

    /// The color sweeping in.
    pub fn next_color(&self) -> Rgb8 {
        self.colors[self.next_color_index()]
    }

    /// Progress through the current color's dwell period, in `[0, 1)`.
    pub fn color_progress(&self) -> f64 {
        let scaled = self.progress * self.colors.len() as f64;
        scaled - scaled.floor()
    }

    /// Where the dithered edge starts this frame: sweeps from `-w` to `1` over a dwell period.
    pub fn transition_start(&self) -> f64 {
        self.color_progress() * (1.0 + self.gradient_width) - self.gradient_width
    }

    /// Whether a non-empty caption was rasterized.
    pub fn has_caption(&self) -> bool {
        self.caption.is_some()
    }

    /// The rasterized caption, if any.
    pub fn caption_mask(&self) -> Option<&CaptionMask> {
        self.caption.as_ref()
    }

    /// Low-resolution gradient buffer (accumulates within a dwell period).
    pub fn low_res(&self) -> &PixelBuffer {
        &self.low_res
    }

    /// Full-size layer filled with the current color.
    pub fn background(&self) -> &PixelBuffer {
        &self.background
    }

    /// Upscaled gradient in the next color.
    pub fn foreground(&self) -> &PixelBuffer {
        &self.foreground
    }

    /// The composited frame produced by the last draw.
    pub fn surface(&self) -> &PixelBuffer {
        &self.final_surface
    }
}
