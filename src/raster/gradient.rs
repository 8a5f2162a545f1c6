use crate::foundation::core::{Direction, Rgba8};
use crate::foundation::error::{PixfadeError, PixfadeResult};
use crate::foundation::rng::Rng64;
use crate::raster::buffer::PixelBuffer;

/// Position along `direction` of the pixel that owns byte `i` of a `width x height` RGBA8 buffer.
///
/// Rows for DOWN/UP, columns for RIGHT/LEFT; UP counts `height - row` and LEFT counts
/// `width - 1 - col`.
///
/// ```
/// use pixfade::{Direction, get_position};
/// assert_eq!(get_position(4, 3, 33, Direction::Down), 2);
/// assert_eq!(get_position(4, 3, 33, Direction::Up), 1);
/// assert_eq!(get_position(4, 3, 33, Direction::Right), 0);
/// assert_eq!(get_position(4, 3, 33, Direction::Left), 3);
/// ```
pub fn get_position(width: u32, height: u32, i: usize, direction: Direction) -> u32 {
    let pixel = i / 4;
    let width = width.max(1) as usize;
    let row = (pixel / width) as u32;
    let col = (pixel % width) as u32;
    match direction {
        Direction::Down => row,
        Direction::Up => height.saturating_sub(row),
        Direction::Right => col,
        Direction::Left => (width as u32 - 1).saturating_sub(col),
    }
}

/// Number of rows (DOWN/UP) or columns (RIGHT/LEFT) traversed by `direction`.
pub fn axis_length(width: u32, height: u32, direction: Direction) -> u32 {
    if direction.is_vertical() {
        height
    } else {
        width
    }
}

/// Draw a dithered gradient edge of `color` into `buf`.
///
/// Pixels whose normalized position is before `transition_start` are painted solid; pixels
/// inside `[transition_start, transition_start + transition_length)` are painted with
/// probability `1 - t` where `t` is their relative offset into the transition; everything
/// else is left untouched. No blending happens: a pixel is either overwritten or kept.
pub fn draw_noisy_gradient(
    buf: &mut PixelBuffer,
    color: Rgba8,
    transition_length: f64,
    transition_start: f64,
    direction: Direction,
    rng: &mut Rng64,
) -> PixfadeResult<()> {
    if !transition_length.is_finite() || transition_length <= 0.0 {
        return Err(PixfadeError::invalid_argument(format!(
            "transition length must be finite and > 0 (got {transition_length})"
        )));
    }
    if !transition_start.is_finite() {
        return Err(PixfadeError::invalid_argument(
            "transition start must be finite",
        ));
    }

    let width = buf.width();
    let height = buf.height();
    let len = f64::from(axis_length(width, height, direction));
    let transition_end = transition_start + transition_length;
    let rgba = color.to_array();

    for (px_idx, px) in buf.data_mut().chunks_exact_mut(4).enumerate() {
        let pos = f64::from(get_position(width, height, px_idx * 4, direction)) / len;

        if pos < transition_start {
            px.copy_from_slice(&rgba);
        } else if pos < transition_end {
            let t = (pos - transition_start).abs() / transition_length;
            if rng.next_f64_01() >= t {
                px.copy_from_slice(&rgba);
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgba8 = Rgba8::new(255, 0, 0, 255);

    #[test]
    fn positions_match_reference_grid() {
        assert_eq!(get_position(4, 3, 33, Direction::Down), 2);
        assert_eq!(get_position(4, 3, 33, Direction::Up), 1);
        assert_eq!(get_position(4, 3, 33, Direction::Right), 0);
        assert_eq!(get_position(4, 3, 0, Direction::Left), 3);
        assert_eq!(get_position(4, 3, 4, Direction::Left), 2);
        assert_eq!(get_position(4, 3, 8, Direction::Left), 1);
        assert_eq!(get_position(4, 3, 12, Direction::Left), 0);
        assert_eq!(get_position(4, 3, 33, Direction::Left), 3);
    }

    #[test]
    fn reversed_directions_mirror_forward_ones() {
        for (w, h) in [(1u32, 1u32), (4, 3), (7, 5), (16, 9)] {
            for i in (0..(w * h * 4) as usize).step_by(4) {
                assert_eq!(
                    get_position(w, h, i, Direction::Up),
                    h - get_position(w, h, i, Direction::Down)
                );
                assert_eq!(
                    get_position(w, h, i, Direction::Left),
                    w - 1 - get_position(w, h, i, Direction::Right)
                );
            }
        }
    }

    #[test]
    fn axis_length_by_direction() {
        assert_eq!(axis_length(4, 3, Direction::Up), 3);
        assert_eq!(axis_length(4, 3, Direction::Down), 3);
        assert_eq!(axis_length(4, 3, Direction::Right), 4);
        assert_eq!(axis_length(4, 3, Direction::Left), 4);
    }

    #[test]
    fn start_past_end_paints_everything_solid() {
        let mut buf = PixelBuffer::new(5, 4);
        let mut rng = Rng64::new(1);
        draw_noisy_gradient(&mut buf, RED, 0.5, 1.0, Direction::Down, &mut rng).unwrap();
        assert!(buf.data().chunks_exact(4).all(|p| p == RED.to_array()));
    }

    #[test]
    fn transition_before_start_leaves_buffer_untouched() {
        let mut buf = PixelBuffer::new(5, 4);
        let mut rng = Rng64::new(1);
        draw_noisy_gradient(&mut buf, RED, 0.5, -0.5, Direction::Right, &mut rng).unwrap();
        assert!(buf.data().iter().all(|&v| v == 0));
    }

    #[test]
    fn solid_region_respects_direction() {
        // Start at 0.5 with a tiny transition: the first half along the axis is solid.
        let mut rng = Rng64::new(3);
        let mut down = PixelBuffer::new(4, 4);
        draw_noisy_gradient(&mut down, RED, 0.01, 0.5, Direction::Down, &mut rng).unwrap();
        assert_eq!(down.pixel(0, 0), Some(RED));
        assert_eq!(down.pixel(3, 1), Some(RED));
        assert_eq!(down.pixel(0, 3), Some(Rgba8::TRANSPARENT));

        let mut left = PixelBuffer::new(4, 4);
        draw_noisy_gradient(&mut left, RED, 0.01, 0.5, Direction::Left, &mut rng).unwrap();
        assert_eq!(left.pixel(3, 0), Some(RED));
        assert_eq!(left.pixel(2, 2), Some(RED));
        assert_eq!(left.pixel(0, 0), Some(Rgba8::TRANSPARENT));
    }

    #[test]
    fn explicit_alpha_is_written_through() {
        let mut buf = PixelBuffer::new(2, 2);
        let mut rng = Rng64::new(1);
        let half = Rgba8::new(10, 20, 30, 128);
        draw_noisy_gradient(&mut buf, half, 0.5, 2.0, Direction::Up, &mut rng).unwrap();
        assert_eq!(buf.pixel(1, 1), Some(half));
    }

    #[test]
    fn paint_frequency_tracks_one_minus_position() {
        let width = 10u32;
        let height = 4000u32;
        let mut buf = PixelBuffer::new(width, height);
        let mut rng = Rng64::new(0xD17E);
        draw_noisy_gradient(&mut buf, RED, 1.0, 0.0, Direction::Right, &mut rng).unwrap();

        for col in 0..width {
            let painted = (0..height)
                .filter(|&row| buf.pixel(col, row) == Some(RED))
                .count();
            let freq = painted as f64 / f64::from(height);
            let p = f64::from(col) / f64::from(width);
            assert!(
                (freq - (1.0 - p)).abs() < 0.04,
                "col={col} freq={freq} expected={}",
                1.0 - p
            );
        }
    }

    #[test]
    fn same_seed_same_dither() {
        let draw = |seed| {
            let mut buf = PixelBuffer::new(16, 16);
            let mut rng = Rng64::new(seed);
            draw_noisy_gradient(&mut buf, RED, 0.5, 0.25, Direction::Down, &mut rng).unwrap();
            buf
        };
        assert_eq!(draw(9), draw(9));
    }

    #[test]
    fn rejects_non_positive_transition_length() {
        let mut buf = PixelBuffer::new(2, 2);
        let mut rng = Rng64::new(1);
        for w in [0.0, -0.5, f64::NAN] {
            let err = draw_noisy_gradient(&mut buf, RED, w, 0.0, Direction::Down, &mut rng)
                .unwrap_err();
            assert!(matches!(err, PixfadeError::InvalidArgument(_)));
        }
    }
}
