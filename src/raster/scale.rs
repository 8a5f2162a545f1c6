use crate::foundation::error::{PixfadeError, PixfadeResult};
use crate::raster::buffer::PixelBuffer;

/// Nearest-neighbor upscale of `src` into `dst` by an integer `factor`.
///
/// Each source pixel becomes a `factor x factor` block. The destination may differ from
/// `factor * src` in either dimension (the source size came from integer division): rows and
/// columns falling outside `dst` are clipped and any part of `dst` not covered is left as is.
/// Row offsets always come from `dst`'s own width.
pub fn scale_nearest(src: &PixelBuffer, dst: &mut PixelBuffer, factor: u32) -> PixfadeResult<()> {
    if factor == 0 {
        return Err(PixfadeError::invalid_argument("scale factor must be >= 1"));
    }

    let src_w = src.width() as usize;
    let factor = factor as usize;
    let scaled_w = (src_w * factor).min(dst.width() as usize);
    let scaled_h = (src.height() as usize * factor).min(dst.height() as usize);
    let dst_w = dst.width() as usize;
    let src_data = src.data();
    let dst_data = dst.data_mut();

    for y in 0..scaled_h {
        let src_row = (y / factor) * src_w;
        let dst_row = y * dst_w * 4;
        for x in 0..scaled_w {
            let s = (src_row + x / factor) * 4;
            let d = dst_row + x * 4;
            dst_data[d..d + 4].copy_from_slice(&src_data[s..s + 4]);
        }
    }
    Ok(())
}
