use crate::animation::state::AnimationState;
use crate::foundation::error::PixfadeResult;
use crate::raster::buffer::PixelBuffer;
use crate::render::compositor::draw;

/// Simulation step of the live preview: one 60 Hz display frame.
pub const PREVIEW_STEP_MS: f64 = 1000.0 / 60.0;

/// Most fixed steps run by one [`PreviewLoop::tick`]; time beyond that is dropped.
pub const MAX_STEPS_PER_TICK: u32 = 240;

/// Fixed-timestep driver for an interactive preview.
///
/// The host calls [`PreviewLoop::tick`] with wall-clock time since its previous call and
/// displays [`PreviewLoop::surface`] whenever a frame was drawn.
#[derive(Debug)]
pub struct PreviewLoop {
    state: AnimationState,
    accumulated_ms: f64,
    running: bool,
    dropped_ms: f64,
}

impl PreviewLoop {
    /// Start running with `state`.
    pub fn new(state: AnimationState) -> Self {
        Self {
            state,
            accumulated_ms: 0.0,
            running: true,
            dropped_ms: 0.0,
        }
    }

    /// Advance by `elapsed_ms` of wall-clock time; returns whether a frame was drawn.
    pub fn tick(&mut self, elapsed_ms: f64) -> PixfadeResult<bool> {
        if !self.running {
            return Ok(false);
        }
        if elapsed_ms.is_finite() && elapsed_ms > 0.0 {
            self.accumulated_ms += elapsed_ms;
        }

        let mut steps = 0;
        while self.accumulated_ms >= PREVIEW_STEP_MS {
            self.state.update(PREVIEW_STEP_MS);
            self.accumulated_ms -= PREVIEW_STEP_MS;
            steps += 1;
            if steps >= MAX_STEPS_PER_TICK {
                if self.accumulated_ms >= PREVIEW_STEP_MS {
                    tracing::warn!(
                        dropped_ms = self.accumulated_ms,
                        "preview fell behind; dropping accumulated time"
                    );
                    self.dropped_ms += self.accumulated_ms;
                    self.accumulated_ms = 0.0;
                }
                break;
            }
        }

        draw(&mut self.state)?;
        Ok(true)
    }

    /// Stop advancing; time accumulated toward the next step is discarded.
    pub fn pause(&mut self) {
        self.running = false;
        self.accumulated_ms = 0.0;
    }

    /// Continue from where `pause` stopped.
    pub fn resume(&mut self) {
        self.running = true;
    }

    /// Flip between running and paused; returns the new running state.
    pub fn toggle(&mut self) -> bool {
        if self.running {
            self.pause();
        } else {
            self.resume();
        }
        self.running
    }

    /// Whether `tick` advances the animation.
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Total time discarded by the per-tick step cap.
    pub fn dropped_ms(&self) -> f64 {
        self.dropped_ms
    }

    /// The animation being previewed.
    pub fn state(&self) -> &AnimationState {
        &self.state
    }

    /// Replace the animation (e.g. after the configuration changed).
    pub fn reset(&mut self, state: AnimationState) {
        self.state = state;
        self.accumulated_ms = 0.0;
    }

    /// The most recently drawn frame.
    pub fn surface(&self) -> &PixelBuffer {
        self.state.surface()
    }

    /// Stop the preview and take the animation back.
    pub fn into_state(self) -> AnimationState {
        self.state
    }
}
