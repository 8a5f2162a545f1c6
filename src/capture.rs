use crate::animation::state::{AnimationState, CYCLE_MS_PER_COLOR};
use crate::encode::sink::{EncodeEvents, EncodeJob, FrameSink, SinkConfig};
use crate::foundation::core::FrameIndex;
use crate::foundation::error::{PixfadeError, PixfadeResult};
use crate::render::compositor::draw;

/// Upper bound on frames in one captured cycle.
pub const MAX_CAPTURE_FRAMES: u64 = 1_000_000;

/// Result of a completed capture loop.
///
/// Frames have all been rendered and pushed; the encode itself may still be running.
#[derive(Debug)]
pub struct CaptureJob {
    /// Number of frames pushed to the sink.
    pub frames: u64,
    /// Progress of the last captured frame (the highest value before the cycle wrapped).
    pub last_progress: f64,
    /// Handle to the sink's finalization.
    pub job: EncodeJob,
}

impl CaptureJob {
    /// Block until the sink has finished encoding.
    pub fn wait(self) -> PixfadeResult<u64> {
        self.job.wait()?;
        Ok(self.frames)
    }
}

/// Frames one cycle of `colors` colors takes at `frame_delay_ms` per frame.
pub fn expected_frame_count(colors: usize, frame_delay_ms: f64) -> u64 {
    (colors as f64 * CYCLE_MS_PER_COLOR / frame_delay_ms).ceil() as u64
}

/// Render exactly one animation cycle from `state` into `sink`, then finalize it.
///
/// Each iteration advances the state by its frame delay, draws, and pushes the final surface.
/// The loop ends on the frame whose update wraps progress back below its previous value; that
/// frame is still pushed. `events` are handed to the sink and may fire after this returns.
#[tracing::instrument(skip_all, fields(width = state.width(), height = state.height()))]
pub fn capture_cycle(
    state: &mut AnimationState,
    sink: &mut dyn FrameSink,
    events: EncodeEvents,
) -> PixfadeResult<CaptureJob> {
    let delay = state.frame_delay_ms();
    let expected = expected_frame_count(state.colors().len(), delay);
    if expected > MAX_CAPTURE_FRAMES {
        return Err(PixfadeError::validation(format!(
            "one cycle at {delay} ms per frame needs {expected} frames (max {MAX_CAPTURE_FRAMES})"
        )));
    }

    sink.begin(SinkConfig {
        width: state.width(),
        height: state.height(),
    })?;
    tracing::debug!(expected, delay_ms = delay, "capture started");

    let mut frames = 0u64;
    let mut last_progress = state.progress();
    loop {
        let prev = state.progress();
        state.update(delay);
        draw(state)?;
        sink.push_frame(FrameIndex(frames), state.surface(), delay)?;
        frames += 1;
        if state.progress() < prev {
            break;
        }
        last_progress = state.progress();
        // Delays too small to move progress would otherwise never wrap.
        if frames > MAX_CAPTURE_FRAMES {
            return Err(PixfadeError::render("capture did not complete a cycle"));
        }
    }

    let job = sink.finish(events)?;
    tracing::debug!(frames, last_progress, "capture finished; encoding");
    Ok(CaptureJob {
        frames,
        last_progress,
        job,
    })
}
