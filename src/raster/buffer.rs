use crate::foundation::core::Rgba8;
use crate::foundation::error::{PixfadeError, PixfadeResult};

/// Owned RGBA8 pixel storage, straight alpha, tightly packed, row-major.
///
/// Plays the role of a canvas `ImageData`: every layer of the pipeline (low-res gradient,
/// full-res scratch, background, foreground, final) owns one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Fully transparent buffer of `width x height` pixels.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0u8; (width as usize) * (height as usize) * 4],
        }
    }

    /// Wrap existing RGBA8 bytes; `data.len()` must be `width * height * 4`.
    pub fn from_rgba8(width: u32, height: u32, data: Vec<u8>) -> PixfadeResult<Self> {
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|v| v.checked_mul(4))
            .ok_or_else(|| PixfadeError::render("pixel buffer size overflow"))?;
        if data.len() != expected {
            return Err(PixfadeError::render(format!(
                "rgba8 data length {} does not match {width}x{height}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Row-major RGBA8 bytes, `width * height * 4` long.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Mutable view of [`data`](Self::data).
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Take the raw bytes.
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// `width * height`.
    pub fn pixel_count(&self) -> usize {
        (self.width as usize) * (self.height as usize)
    }

    /// Pixel at `(x, y)`, or `None` outside the buffer.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        let p = &self.data[i..i + 4];
        Some(Rgba8::new(p[0], p[1], p[2], p[3]))
    }

    /// Overwrite one pixel; writes outside the buffer are ignored.
    pub fn set_pixel(&mut self, x: u32, y: u32, color: Rgba8) {
        if x >= self.width || y >= self.height {
            return;
        }
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        self.data[i..i + 4].copy_from_slice(&color.to_array());
    }

    /// Paint every pixel with `color`.
    pub fn fill(&mut self, color: Rgba8) {
        let rgba = color.to_array();
        for px in self.data.chunks_exact_mut(4) {
            px.copy_from_slice(&rgba);
        }
    }

    /// Make every pixel transparent.
    pub fn clear(&mut self) {
        self.data.fill(0);
    }

    /// Replace contents with `src`; dimensions must match.
    pub fn copy_from(&mut self, src: &PixelBuffer) -> PixfadeResult<()> {
        if self.width != src.width || self.height != src.height {
            return Err(PixfadeError::render(format!(
                "copy_from expects equal dimensions ({}x{} vs {}x{})",
                self.width, self.height, src.width, src.height
            )));
        }
        self.data.copy_from_slice(&src.data);
        Ok(())
    }
}
