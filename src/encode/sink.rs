use std::thread::JoinHandle;

use crate::foundation::core::FrameIndex;
use crate::foundation::error::{PixfadeError, PixfadeResult};
use crate::raster::buffer::PixelBuffer;

/// Configuration provided to a [`FrameSink`] before the first frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SinkConfig {
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
}

/// Progress callback; receives the encoded fraction in `[0, 1]`.
pub type ProgressFn = Box<dyn FnMut(f64) + Send + 'static>;
/// Completion callback; receives the finished artifact bytes.
pub type FinishedFn = Box<dyn FnOnce(Vec<u8>) + Send + 'static>;

/// Callbacks invoked while a sink finalizes its output.
pub struct EncodeEvents {
    /// Called as frames are encoded.
    pub on_progress: ProgressFn,
    /// Called once with the finished bytes.
    pub on_finished: FinishedFn,
}

impl EncodeEvents {
    /// Box a progress and a completion callback.
    pub fn new(
        on_progress: impl FnMut(f64) + Send + 'static,
        on_finished: impl FnOnce(Vec<u8>) + Send + 'static,
    ) -> Self {
        Self {
            on_progress: Box::new(on_progress),
            on_finished: Box::new(on_finished),
        }
    }

    /// Callbacks that ignore everything.
    pub fn noop() -> Self {
        Self::new(|_| {}, |_| {})
    }
}

impl std::fmt::Debug for EncodeEvents {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EncodeEvents").finish_non_exhaustive()
    }
}

/// Handle to a finalization that may still be running.
///
/// The completion callback is not guaranteed to have run until [`EncodeJob::wait`] returns.
#[derive(Debug)]
pub struct EncodeJob {
    handle: Option<JoinHandle<PixfadeResult<()>>>,
}

impl EncodeJob {
    /// A job that already finished on the calling thread.
    pub fn completed() -> Self {
        Self { handle: None }
    }

    pub(crate) fn spawned(handle: JoinHandle<PixfadeResult<()>>) -> Self {
        Self {
            handle: Some(handle),
        }
    }

    /// `true` once the worker has exited (always `true` for a completed job).
    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().is_none_or(|h| h.is_finished())
    }

    /// Block until finalization ends and surface its error, if any.
    pub fn wait(self) -> PixfadeResult<()> {
        match self.handle {
            None => Ok(()),
            Some(h) => h
                .join()
                .map_err(|_| PixfadeError::encode("encoder worker panicked"))?,
        }
    }
}

/// Sink contract for consuming rendered frames in capture order.
///
/// Ordering contract: `push_frame` is called with strictly increasing [`FrameIndex`] values,
/// between one `begin` and one `finish`.
pub trait FrameSink: Send {
    /// Called once before any frames are pushed.
    fn begin(&mut self, cfg: SinkConfig) -> PixfadeResult<()>;
    /// Push one frame and how long it stays on screen.
    fn push_frame(&mut self, idx: FrameIndex, frame: &PixelBuffer, delay_ms: f64)
    -> PixfadeResult<()>;
    /// Produce the artifact. May return before `events` have fired.
    fn finish(&mut self, events: EncodeEvents) -> PixfadeResult<EncodeJob>;
}

/// Shared `push_frame` checks: sink started, ordering, dimensions, delay.
pub(crate) fn check_push(
    cfg: Option<&SinkConfig>,
    last_idx: Option<FrameIndex>,
    idx: FrameIndex,
    frame: &PixelBuffer,
    delay_ms: f64,
) -> PixfadeResult<()> {
    let cfg = cfg.ok_or_else(|| PixfadeError::encode("sink not started"))?;
    if let Some(last) = last_idx
        && idx.0 <= last.0
    {
        return Err(PixfadeError::encode(format!(
            "frames must be pushed in increasing order (got {} after {})",
            idx.0, last.0
        )));
    }
    if frame.width() != cfg.width || frame.height() != cfg.height {
        return Err(PixfadeError::encode(format!(
            "frame is {}x{}, sink expects {}x{}",
            frame.width(),
            frame.height(),
            cfg.width,
            cfg.height
        )));
    }
    if !delay_ms.is_finite() || delay_ms <= 0.0 {
        return Err(PixfadeError::encode("frame delay must be finite and > 0"));
    }
    Ok(())
}

/// In-memory sink for tests and debugging.
///
/// `finish` runs synchronously and hands back the concatenated raw RGBA8 frames.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    frames: Vec<(FrameIndex, PixelBuffer, f64)>,
    finished: bool,
}

impl InMemorySink {
    /// An empty, not yet started sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration from the last `begin`, if any.
    pub fn config(&self) -> Option<SinkConfig> {
        self.cfg
    }

    /// Captured frames with their delays, in push order.
    pub fn frames(&self) -> &[(FrameIndex, PixelBuffer, f64)] {
        &self.frames
    }

    /// Whether `finish` has run.
    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> PixfadeResult<()> {
        self.cfg = Some(cfg);
        self.frames.clear();
        self.finished = false;
        Ok(())
    }

    fn push_frame(
        &mut self,
        idx: FrameIndex,
        frame: &PixelBuffer,
        delay_ms: f64,
    ) -> PixfadeResult<()> {
        let last = self.frames.last().map(|(i, _, _)| *i);
        check_push(self.cfg.as_ref(), last, idx, frame, delay_ms)?;
        self.frames.push((idx, frame.clone(), delay_ms));
        Ok(())
    }

    fn finish(&mut self, mut events: EncodeEvents) -> PixfadeResult<EncodeJob> {
        if self.cfg.is_none() {
            return Err(PixfadeError::encode("sink not started"));
        }
        let mut bytes = Vec::new();
        for (_, frame, _) in &self.frames {
            bytes.extend_from_slice(frame.data());
        }
        self.finished = true;
        (events.on_progress)(1.0);
        (events.on_finished)(bytes);
        Ok(EncodeJob::completed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn started(w: u32, h: u32) -> InMemorySink {
        let mut sink = InMemorySink::new();
        sink.begin(SinkConfig {
            width: w,
            height: h,
        })
        .unwrap();
        sink
    }

    #[test]
    fn job_reports_when_its_worker_is_done() {
        assert!(EncodeJob::completed().is_finished());
        EncodeJob::completed().wait().unwrap();

        let (tx, rx) = std::sync::mpsc::channel::<()>();
        let job = EncodeJob::spawned(std::thread::spawn(move || -> PixfadeResult<()> {
            rx.recv().unwrap();
            Ok(())
        }));
        assert!(!job.is_finished());
        tx.send(()).unwrap();
        job.wait().unwrap();

        let failed = EncodeJob::spawned(std::thread::spawn(|| -> PixfadeResult<()> {
            Err(PixfadeError::encode("boom"))
        }));
        assert!(matches!(failed.wait(), Err(PixfadeError::Encode(_))));
    }

    #[test]
    fn push_before_begin_fails() {
        let mut sink = InMemorySink::new();
        let err = sink
            .push_frame(FrameIndex(0), &PixelBuffer::new(1, 1), 10.0)
            .unwrap_err();
        assert!(err.to_string().contains("not started"));
    }

    #[test]
    fn rejects_out_of_order_and_mismatched_frames() {
        let mut sink = started(2, 2);
        sink.push_frame(FrameIndex(1), &PixelBuffer::new(2, 2), 10.0)
            .unwrap();
        assert!(
            sink.push_frame(FrameIndex(1), &PixelBuffer::new(2, 2), 10.0)
                .is_err()
        );
        assert!(
            sink.push_frame(FrameIndex(2), &PixelBuffer::new(3, 2), 10.0)
                .is_err()
        );
        assert!(
            sink.push_frame(FrameIndex(2), &PixelBuffer::new(2, 2), 0.0)
                .is_err()
        );
    }

    #[test]
    fn finish_reports_progress_and_raw_bytes() {
        let mut sink = started(1, 1);
        let mut a = PixelBuffer::new(1, 1);
        a.data_mut().copy_from_slice(&[1, 2, 3, 4]);
        sink.push_frame(FrameIndex(0), &a, 5.0).unwrap();
        sink.push_frame(FrameIndex(1), &a, 5.0).unwrap();

        let progress = Arc::new(Mutex::new(Vec::new()));
        let out = Arc::new(Mutex::new(None));
        let (p, o) = (progress.clone(), out.clone());
        let job = sink
            .finish(EncodeEvents::new(
                move |f| p.lock().unwrap().push(f),
                move |bytes| *o.lock().unwrap() = Some(bytes),
            ))
            .unwrap();
        job.wait().unwrap();

        assert!(sink.is_finished());
        assert_eq!(*progress.lock().unwrap(), vec![1.0]);
        assert_eq!(
            out.lock().unwrap().as_deref(),
            Some(&[1u8, 2, 3, 4, 1, 2, 3, 4][..])
        );
    }
}
