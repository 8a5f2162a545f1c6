use image::codecs::gif::{GifEncoder, Repeat};
use image::{Delay, Frame, RgbaImage};

use crate::encode::sink::{EncodeEvents, EncodeJob, FrameSink, SinkConfig, check_push};
use crate::foundation::core::FrameIndex;
use crate::foundation::error::{PixfadeError, PixfadeResult};
use crate::raster::buffer::PixelBuffer;

/// Options for [`GifSink`] output.
#[derive(Clone, Copy, Debug)]
pub struct GifSinkOpts {
    /// NeuQuant sampling speed, 1 (best) to 30 (fastest).
    pub speed: i32,
    /// Loop the animation forever instead of playing it once.
    pub repeat_forever: bool,
}

impl Default for GifSinkOpts {
    fn default() -> Self {
        Self {
            speed: 10,
            repeat_forever: true,
        }
    }
}

/// Sink that buffers frames and encodes an animated GIF on a worker thread.
///
/// `finish` returns immediately; progress and completion callbacks fire on the worker.
#[derive(Debug, Default)]
pub struct GifSink {
    opts: GifSinkOpts,
    cfg: Option<SinkConfig>,
    frames: Vec<(PixelBuffer, f64)>,
    last_idx: Option<FrameIndex>,
}

impl GifSink {
    /// A not yet started sink with the given options.
    pub fn new(opts: GifSinkOpts) -> Self {
        Self {
            opts,
            ..Self::default()
        }
    }

    /// Frames buffered since `begin`.
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }
}

impl FrameSink for GifSink {
    fn begin(&mut self, cfg: SinkConfig) -> PixfadeResult<()> {
        if cfg.width == 0 || cfg.height == 0 {
            return Err(PixfadeError::validation(
                "gif sink width/height must be non-zero",
            ));
        }
        if cfg.width > u32::from(u16::MAX) || cfg.height > u32::from(u16::MAX) {
            return Err(PixfadeError::validation(
                "gif sink width/height must fit in 16 bits",
            ));
        }
        if !(1..=30).contains(&self.opts.speed) {
            return Err(PixfadeError::validation("gif speed must be in 1..=30"));
        }
        self.cfg = Some(cfg);
        self.frames.clear();
        self.last_idx = None;
        Ok(())
    }

    fn push_frame(
        &mut self,
        idx: FrameIndex,
        frame: &PixelBuffer,
        delay_ms: f64,
    ) -> PixfadeResult<()> {
        check_push(self.cfg.as_ref(), self.last_idx, idx, frame, delay_ms)?;
        self.frames.push((frame.clone(), delay_ms));
        self.last_idx = Some(idx);
        Ok(())
    }

    fn finish(&mut self, events: EncodeEvents) -> PixfadeResult<EncodeJob> {
        if self.cfg.take().is_none() {
            return Err(PixfadeError::encode("sink not started"));
        }
        if self.frames.is_empty() {
            return Err(PixfadeError::encode("no frames to encode"));
        }
        let frames = std::mem::take(&mut self.frames);
        let opts = self.opts;
        self.last_idx = None;

        tracing::debug!(frames = frames.len(), speed = opts.speed, "spawning gif encoder");
        let handle = std::thread::Builder::new()
            .name("pixfade-gif".to_string())
            .spawn(move || encode_gif(frames, opts, events))?;
        Ok(EncodeJob::spawned(handle))
    }
}

fn encode_gif(
    frames: Vec<(PixelBuffer, f64)>,
    opts: GifSinkOpts,
    mut events: EncodeEvents,
) -> PixfadeResult<()> {
    let total = frames.len();
    let mut out = Vec::new();
    {
        let mut encoder = GifEncoder::new_with_speed(&mut out, opts.speed);
        let repeat = if opts.repeat_forever {
            Repeat::Infinite
        } else {
            Repeat::Finite(0)
        };
        encoder
            .set_repeat(repeat)
            .map_err(|e| PixfadeError::encode(format!("gif repeat: {e}")))?;

        for (i, (buf, delay_ms)) in frames.into_iter().enumerate() {
            let (w, h) = (buf.width(), buf.height());
            let img = RgbaImage::from_raw(w, h, buf.into_data())
                .ok_or_else(|| PixfadeError::encode(format!("frame {i} has a short buffer")))?;
            let delay = Delay::from_numer_denom_ms((delay_ms * 1000.0).round() as u32, 1000);
            encoder
                .encode_frame(Frame::from_parts(img, 0, 0, delay))
                .map_err(|e| PixfadeError::encode(format!("gif frame {i}: {e}")))?;
            (events.on_progress)((i + 1) as f64 / total as f64);
        }
    }

    tracing::debug!(bytes = out.len(), "gif encoded");
    (events.on_finished)(out);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::core::Rgba8;
    use image::AnimationDecoder;
    use image::codecs::gif::GifDecoder;
    use std::sync::{Arc, Mutex, mpsc};

    fn solid(w: u32, h: u32, c: Rgba8) -> PixelBuffer {
        let mut b = PixelBuffer::new(w, h);
        b.fill(c);
        b
    }

    #[test]
    fn encodes_frames_on_worker_and_reports_progress() {
        let mut sink = GifSink::new(GifSinkOpts::default());
        sink.begin(SinkConfig {
            width: 4,
            height: 3,
        })
        .unwrap();
        let colors = [
            Rgba8::new(255, 0, 0, 255),
            Rgba8::new(0, 255, 0, 255),
            Rgba8::new(0, 0, 255, 255),
        ];
        for (i, c) in colors.into_iter().enumerate() {
            sink.push_frame(FrameIndex(i as u64), &solid(4, 3, c), 1000.0 / 60.0)
                .unwrap();
        }
        assert_eq!(sink.frame_count(), 3);

        let progress = Arc::new(Mutex::new(Vec::new()));
        let p = progress.clone();
        let (tx, rx) = mpsc::channel();
        let job = sink
            .finish(EncodeEvents::new(
                move |f| p.lock().unwrap().push(f),
                move |bytes| tx.send(bytes).unwrap(),
            ))
            .unwrap();
        job.wait().unwrap();

        let bytes = rx.recv().unwrap();
        assert!(rx.try_recv().is_err(), "completion fires once");
        assert_eq!(&bytes[..6], b"GIF89a");

        let got = progress.lock().unwrap().clone();
        assert_eq!(got.len(), 3);
        assert!((got[0] - 1.0 / 3.0).abs() < 1e-12);
        assert_eq!(got[2], 1.0);

        let decoder = GifDecoder::new(std::io::Cursor::new(bytes)).unwrap();
        let decoded = decoder.into_frames().collect_frames().unwrap();
        assert_eq!(decoded.len(), 3);
        assert_eq!(decoded[0].buffer().dimensions(), (4, 3));
        let px = decoded[1].buffer().get_pixel(0, 0).0;
        assert!(px[1] > 200 && px[0] < 50 && px[2] < 50, "{px:?}");
    }

    #[test]
    fn rejects_misuse() {
        let mut sink = GifSink::default();
        assert!(
            sink.push_frame(FrameIndex(0), &PixelBuffer::new(2, 2), 10.0)
                .is_err()
        );
        assert!(sink.finish(EncodeEvents::noop()).is_err());

        sink.begin(SinkConfig {
            width: 2,
            height: 2,
        })
        .unwrap();
        assert!(
            sink.push_frame(FrameIndex(0), &PixelBuffer::new(3, 3), 10.0)
                .is_err()
        );
        assert!(sink.finish(EncodeEvents::noop()).is_err());
    }

    #[test]
    fn zero_size_is_rejected() {
        let mut sink = GifSink::default();
        assert!(
            sink.begin(SinkConfig {
                width: 0,
                height: 4
            })
            .is_err()
        );
    }
}
