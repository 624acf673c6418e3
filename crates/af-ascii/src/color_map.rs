use af_core::color::scale_clamped;

/// Derive a cell colour from the source pixel and the chosen palette slot.
///
/// Denser characters get brighter colours: the factor runs from 0.5 at
/// index 0 up to 2.0 at the last index, then every channel is clamped into
/// `[40, 255]`.
///
/// # Example
/// ```
/// use af_ascii::color_map::derive_color;
/// assert_eq!(derive_color(100, 100, 100, 0, 10), (50, 50, 50));
/// assert_eq!(derive_color(100, 100, 100, 9, 10), (200, 200, 200));
/// assert_eq!(derive_color(0, 0, 0, 9, 10), (40, 40, 40));
/// ```
#[inline(always)]
#[must_use]
pub fn derive_color(r: u8, g: u8, b: u8, index: usize, palette_len: usize) -> (u8, u8, u8) {
    scale_clamped(r, g, b, brightness_factor(index, palette_len))
}

/// `(index / (len − 1)) · 1.5 + 0.5`, taken at index 0 when `len == 1`.
#[inline(always)]
#[must_use]
pub fn brightness_factor(index: usize, palette_len: usize) -> f64 {
    if palette_len <= 1 {
        return 0.5;
    }
    (index as f64 / (palette_len - 1) as f64) * 1.5 + 0.5
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_entry_palette_uses_floor_factor() {
        assert!((brightness_factor(0, 1) - 0.5).abs() < f64::EPSILON);
        assert_eq!(derive_color(200, 200, 200, 0, 1), (100, 100, 100));
    }

    #[test]
    fn factor_spans_half_to_double() {
        assert!((brightness_factor(0, 5) - 0.5).abs() < f64::EPSILON);
        assert!((brightness_factor(4, 5) - 2.0).abs() < f64::EPSILON);
    }
}
