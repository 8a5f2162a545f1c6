pub(crate) fn mul_div255_u16(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

/// Linear mix of two channels by an 8-bit weight: `a * (255 - t) + b * t`, rounded.
pub(crate) fn lerp_u8(a: u8, b: u8, t: u8) -> u8 {
    let t = u32::from(t);
    ((u32::from(a) * (255 - t) + u32::from(b) * t + 127) / 255) as u8
}
