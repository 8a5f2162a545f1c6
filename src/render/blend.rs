use crate::foundation::core::{Rgb8, Rgba8};
use crate::foundation::error::{PixfadeError, PixfadeResult};
use crate::foundation::math::{lerp_u8, mul_div255_u16};
use crate::raster::buffer::PixelBuffer;
use crate::text::CaptionMask;

/// Straight-alpha source-over of one pixel.
pub fn over(dst: Rgba8, src: Rgba8) -> Rgba8 {
    if src.a == 255 {
        return src;
    }
    if src.a == 0 {
        return dst;
    }

    let sa = u16::from(src.a);
    let da = mul_div255_u16(u16::from(dst.a), 255 - sa);
    let out_a = sa + da;
    if out_a == 0 {
        return Rgba8::TRANSPARENT;
    }

    let mix = |s: u8, d: u8| -> u8 {
        let num = u32::from(s) * u32::from(sa) + u32::from(d) * u32::from(da);
        ((num + u32::from(out_a) / 2) / u32::from(out_a)).min(255) as u8
    };
    Rgba8::new(
        mix(src.r, dst.r),
        mix(src.g, dst.g),
        mix(src.b, dst.b),
        out_a.min(255) as u8,
    )
}

/// Straight-alpha source-atop of one pixel: color lands only where `dst` is already opaque,
/// and `dst` keeps its alpha.
pub fn atop(dst: Rgba8, src: Rgba8) -> Rgba8 {
    if dst.a == 0 || src.a == 0 {
        return dst;
    }
    Rgba8::new(
        lerp_u8(dst.r, src.r, src.a),
        lerp_u8(dst.g, src.g, src.a),
        lerp_u8(dst.b, src.b, src.a),
        dst.a,
    )
}

/// Composite `src` over `dst`; both must have the same dimensions.
pub fn over_in_place(dst: &mut PixelBuffer, src: &PixelBuffer) -> PixfadeResult<()> {
    if dst.width() != src.width() || dst.height() != src.height() {
        return Err(PixfadeError::render(
            "over_in_place expects equal-size rgba8 buffers",
        ));
    }
    for (d, s) in dst
        .data_mut()
        .chunks_exact_mut(4)
        .zip(src.data().chunks_exact(4))
    {
        let out = over(
            Rgba8::new(d[0], d[1], d[2], d[3]),
            Rgba8::new(s[0], s[1], s[2], s[3]),
        );
        d.copy_from_slice(&out.to_array());
    }
    Ok(())
}

/// How [`tint_mask`] combines the caption with what is already there.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MaskMode {
    /// Paint over everything (the background caption).
    Over,
    /// Paint only onto already opaque pixels (the foreground caption).
    Atop,
}

/// Paint `color` through the coverage of `mask` onto `dst`.
pub fn tint_mask(
    dst: &mut PixelBuffer,
    mask: &CaptionMask,
    color: Rgb8,
    mode: MaskMode,
) -> PixfadeResult<()> {
    if dst.width() != mask.width() || dst.height() != mask.height() {
        return Err(PixfadeError::render(
            "caption mask and target surface differ in size",
        ));
    }
    for (d, &c) in dst.data_mut().chunks_exact_mut(4).zip(mask.coverage()) {
        if c == 0 {
            continue;
        }
        let dp = Rgba8::new(d[0], d[1], d[2], d[3]);
        let sp = Rgba8::new(color.r, color.g, color.b, c);
        let out = match mode {
            MaskMode::Over => over(dp, sp),
            MaskMode::Atop => atop(dp, sp),
        };
        d.copy_from_slice(&out.to_array());
    }
    Ok(())
}
