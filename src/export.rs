//! Naming and reporting helpers for exported animations.

/// File stem used when the caption sanitizes to nothing.
pub const DEFAULT_FILE_STEM: &str = "pixfade";

/// Strip characters that are unsafe in file names: `\ / : * ? < > |`, dots and spaces.
pub fn sanitize_file_stem(text: &str) -> String {
    text.chars()
        .filter(|c| !matches!(c, '\\' | '/' | ':' | '*' | '?' | '<' | '>' | '|' | '.' | ' '))
        .collect()
}

/// `<sanitized caption>.gif`, falling back to [`DEFAULT_FILE_STEM`].
pub fn default_gif_file_name(caption: &str) -> String {
    let stem = sanitize_file_stem(caption);
    if stem.is_empty() {
        format!("{DEFAULT_FILE_STEM}.gif")
    } else {
        format!("{stem}.gif")
    }
}

/// Size in mebibytes with three significant digits.
pub fn format_size_mb(bytes: u64) -> String {
    format_significant(bytes as f64 / 1024.0 / 1024.0, 3)
}

fn format_significant(v: f64, digits: i32) -> String {
    if v == 0.0 || !v.is_finite() {
        return format!("{:.*}", (digits - 1).max(0) as usize, 0.0);
    }
    let magnitude = v.abs().log10().floor() as i32;
    let mut decimals = (digits - 1 - magnitude).max(0);
    // Rounding can carry into the next power of ten (9.996 -> 10.0).
    let scale = 10f64.powi(decimals);
    let rounded = (v * scale).round() / scale;
    if decimals > 0 && rounded.abs().log10().floor() as i32 > magnitude {
        decimals -= 1;
    }
    format!("{:.*}", decimals as usize, rounded)
}

/// Whole-percent progress, floored, as shown while frames are combined.
pub fn progress_percent(fraction: f64) -> u32 {
    (fraction.clamp(0.0, 1.0) * 100.0).floor() as u32
}
