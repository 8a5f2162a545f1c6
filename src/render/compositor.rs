use crate::animation::state::AnimationState;
use crate::foundation::error::PixfadeResult;
use crate::raster::gradient::draw_noisy_gradient;
use crate::raster::scale::scale_nearest;
use crate::render::blend::{MaskMode, over_in_place, tint_mask};

/// Render one frame of `state` into its final surface.
///
/// 1. On a palette change, clear the low-res gradient (it otherwise accumulates).
/// 2. Dither the current color into the low-res buffer.
/// 3. Upscale it into the foreground layer.
/// 4. Fill the background with the next color and draw the caption in the current color.
/// 5. Draw the caption atop the foreground's painted pixels in the next color.
/// 6. Composite background, then foreground, onto the final surface.
pub fn draw(state: &mut AnimationState) -> PixfadeResult<()> {
    if state.clear_pending {
        state.low_res.clear();
        state.clear_pending = false;
        state.color_changed = false;
    }

    let current = state.current_color();
    let next = state.next_color();
    let start = state.transition_start();

    draw_noisy_gradient(
        &mut state.low_res,
        current.opaque(),
        state.gradient_width,
        start,
        state.direction,
        &mut state.rng,
    )?;

    if state.scale == 1 {
        state.foreground.copy_from(&state.low_res)?;
    } else {
        scale_nearest(&state.low_res, &mut state.full_res, state.scale)?;
        state.foreground.copy_from(&state.full_res)?;
    }

    state.background.fill(next.opaque());
    if let Some(mask) = state.caption.as_ref() {
        tint_mask(&mut state.background, mask, current, MaskMode::Over)?;
        tint_mask(&mut state.foreground, mask, next, MaskMode::Atop)?;
    }

    state.final_surface.clear();
    over_in_place(&mut state.final_surface, &state.background)?;
    over_in_place(&mut state.final_surface, &state.foreground)?;
    Ok(())
}
