use std::path::Path;
use std::sync::Arc;

use crate::foundation::error::{PixfadeError, PixfadeResult};

/// Caption text with the font it is drawn in.
#[derive(Clone, Debug)]
pub struct Caption {
    /// Text laid out on a single line.
    pub text: String,
    /// Raw TrueType/OpenType font data.
    pub font_bytes: Arc<Vec<u8>>,
    /// Size in pixels.
    pub font_size: f32,
}

impl Caption {
    /// Pair `text` with in-memory font data. Fails on a non-positive or non-finite size.
    pub fn new(text: impl Into<String>, font_bytes: Vec<u8>, font_size: f32) -> PixfadeResult<Self> {
        if !font_size.is_finite() || font_size <= 0.0 {
            return Err(PixfadeError::validation(
                "caption font size must be finite and > 0",
            ));
        }
        Ok(Self {
            text: text.into(),
            font_bytes: Arc::new(font_bytes),
            font_size,
        })
    }

    /// Read the font file at `font_path`.
    pub fn load(text: impl Into<String>, font_path: &Path, font_size: f32) -> PixfadeResult<Self> {
        let bytes = std::fs::read(font_path).map_err(|e| {
            PixfadeError::validation(format!("read font '{}': {e}", font_path.display()))
        })?;
        Self::new(text, bytes, font_size)
    }
}

/// Top-left x and baseline y that center a caption on a `width x height` surface.
///
/// `x = round((width - advance) / 2)`, `baseline = round((height - size/2) / 2) + size/2`;
/// half the font size stands in for the text height.
pub fn centered_origin(width: u32, height: u32, advance: f32, font_size: f32) -> (f32, f32) {
    let text_height = font_size / 2.0;
    let x = ((width as f32 - advance) / 2.0).round();
    let baseline = ((height as f32 - text_height) / 2.0).round() + text_height;
    (x, baseline)
}

/// Stateful helper for building Parley text layouts from raw font bytes.
pub(crate) struct TextLayoutEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<()>,
}

impl TextLayoutEngine {
    pub(crate) fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
        }
    }

    /// Shape and lay out a single unwrapped line of text.
    pub(crate) fn layout_line(
        &mut self,
        text: &str,
        font_bytes: &[u8],
        size_px: f32,
    ) -> PixfadeResult<parley::Layout<()>> {
        let families = self
            .font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(font_bytes.to_vec()), None);
        let family_id = families.first().map(|(id, _)| *id).ok_or_else(|| {
            PixfadeError::validation("no font families registered from font bytes")
        })?;

        let family_name = self
            .font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| PixfadeError::validation("registered font family has no name"))?
            .to_string();

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(family_name)),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));

        let mut layout: parley::Layout<()> = builder.build(text);
        layout.break_all_lines(None);
        layout.align(
            None,
            parley::Alignment::Start,
            parley::AlignmentOptions::default(),
        );
        Ok(layout)
    }
}

/// Per-pixel glyph coverage of a caption centered on a surface.
///
/// The glyph geometry is identical for every frame and both layers, so it is rasterized once
/// and re-tinted by the compositor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CaptionMask {
    width: u32,
    height: u32,
    coverage: Vec<u8>,
}

impl CaptionMask {
    /// A mask with no coverage anywhere.
    pub fn empty(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            coverage: vec![0; (width as usize) * (height as usize)],
        }
    }

    /// Wrap precomputed coverage; `coverage.len()` must be `width * height`.
    pub fn from_coverage(width: u32, height: u32, coverage: Vec<u8>) -> PixfadeResult<Self> {
        if coverage.len() != (width as usize) * (height as usize) {
            return Err(PixfadeError::render(format!(
                "coverage length {} does not match {width}x{height}",
                coverage.len()
            )));
        }
        Ok(Self {
            width,
            height,
            coverage,
        })
    }

    /// Shape `caption` and rasterize it, centered, onto a `width x height` coverage grid.
    pub fn rasterize(caption: &Caption, width: u32, height: u32) -> PixfadeResult<Self> {
        if caption.text.trim().is_empty() {
            return Ok(Self::empty(width, height));
        }

        let width_u16: u16 = width
            .try_into()
            .map_err(|_| PixfadeError::render("caption surface width exceeds u16"))?;
        let height_u16: u16 = height
            .try_into()
            .map_err(|_| PixfadeError::render("caption surface height exceeds u16"))?;

        let mut engine = TextLayoutEngine::new();
        let layout = engine.layout_line(&caption.text, &caption.font_bytes, caption.font_size)?;

        let advance = layout.full_width();
        let (origin_x, baseline) = centered_origin(width, height, advance, caption.font_size);
        let first_baseline = layout
            .lines()
            .next()
            .map(|line| line.metrics().baseline)
            .unwrap_or(0.0);
        let dy = baseline - first_baseline;

        let font = vello_cpu::peniko::FontData::new(
            vello_cpu::peniko::Blob::from(caption.font_bytes.to_vec()),
            0,
        );

        let mut ctx = vello_cpu::RenderContext::new(width_u16, height_u16);
        ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(255, 255, 255, 255));
        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x + origin_x,
                    y: g.y + dy,
                });
                ctx.glyph_run(&font)
                    .font_size(run.run().font_size())
                    .fill_glyphs(glyphs);
            }
        }
        ctx.flush();

        let mut pixmap = vello_cpu::Pixmap::new(width_u16, height_u16);
        ctx.render_to_pixmap(&mut pixmap);

        // Painted in opaque white, so premultiplied alpha is the coverage.
        let coverage = pixmap
            .data_as_u8_slice()
            .chunks_exact(4)
            .map(|px| px[3])
            .collect();

        tracing::debug!(
            text = %caption.text,
            advance,
            origin_x,
            baseline,
            "rasterized caption mask"
        );

        Ok(Self {
            width,
            height,
            coverage,
        })
    }

    /// Mask width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Mask height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Row-major coverage, one byte per pixel.
    pub fn coverage(&self) -> &[u8] {
        &self.coverage
    }

    /// `true` when no pixel is covered.
    pub fn is_empty(&self) -> bool {
        self.coverage.iter().all(|&c| c == 0)
    }

    /// Bounding box `(x0, y0, x1, y1)` (exclusive max) of covered pixels.
    pub fn bounds(&self) -> Option<(u32, u32, u32, u32)> {
        let w = self.width as usize;
        let mut out: Option<(u32, u32, u32, u32)> = None;
        for (i, &c) in self.coverage.iter().enumerate() {
            if c == 0 {
                continue;
            }
            let x = (i % w) as u32;
            let y = (i / w) as u32;
            out = Some(match out {
                None => (x, y, x + 1, y + 1),
                Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x + 1), y1.max(y + 1)),
            });
        }
        out
    }
}
