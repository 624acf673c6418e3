//! Brightness formulas and palette lookup.
//!
//! Grayscale output uses plain luma, colour output uses a quadratic
//! perceptual weighting. They give different characters for the same pixel.

/// Luma BT.601 normalisée [0, 1].
///
/// # Example
/// ```
/// use af_ascii::luminance::luma;
/// assert_eq!(luma(255, 255, 255), 1.0);
/// assert_eq!(luma(0, 0, 0), 0.0);
/// ```
#[inline(always)]
#[must_use]
pub fn luma(r: u8, g: u8, b: u8) -> f64 {
    (f64::from(r) * 0.299 + f64::from(g) * 0.587 + f64::from(b) * 0.114) / 255.0
}

/// Luminosité perceptuelle : `sqrt(0.299·r² + 0.587·g² + 0.114·b²)` sur canaux normalisés.
///
/// # Example
/// ```
/// use af_ascii::luminance::perceived;
/// assert!((perceived(255, 255, 255) - 1.0).abs() < 1e-12);
/// assert!(perceived(255, 0, 0) > af_ascii::luminance::luma(255, 0, 0));
/// ```
#[inline(always)]
#[must_use]
pub fn perceived(r: u8, g: u8, b: u8) -> f64 {
    let r = f64::from(r) / 255.0;
    let g = f64::from(g) / 255.0;
    let b = f64::from(b) / 255.0;
    (0.299 * r * r + 0.587 * g * g + 0.114 * b * b).sqrt()
}

/// Brightness of a pixel for the active mode, reflected when `inverted`.
///
/// # Example
/// ```
/// use af_ascii::luminance::brightness;
/// assert_eq!(brightness(255, 255, 255, true, true), 0.0);
/// ```
#[inline(always)]
#[must_use]
pub fn brightness(r: u8, g: u8, b: u8, grayscale: bool, inverted: bool) -> f64 {
    let beta = if grayscale {
        luma(r, g, b)
    } else {
        perceived(r, g, b)
    };
    if inverted { 1.0 - beta } else { beta }
}

/// Index de palette pour une luminosité, clampé dans `[0, len − 1]`.
///
/// A single-entry palette always maps to 0.
///
/// # Example
/// ```
/// use af_ascii::luminance::palette_index;
/// assert_eq!(palette_index(1.0, 10), 9);
/// assert_eq!(palette_index(0.5, 10), 4);
/// assert_eq!(palette_index(0.7, 1), 0);
/// ```
#[inline(always)]
#[must_use]
pub fn palette_index(beta: f64, len: usize) -> usize {
    if len <= 1 {
        return 0;
    }
    let max = len - 1;
    let raw = (beta * max as f64).floor();
    if raw.is_nan() || raw <= 0.0 {
        0
    } else {
        (raw as usize).min(max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formulas_differ_on_saturated_colour() {
        let (l, p) = (luma(0, 0, 255), perceived(0, 0, 255));
        assert!((l - 0.114).abs() < 1e-9);
        assert!((p - 0.114f64.sqrt()).abs() < 1e-9);
    }

    #[test]
    fn out_of_range_beta_is_clamped() {
        assert_eq!(palette_index(-0.3, 5), 0);
        assert_eq!(palette_index(1.7, 5), 4);
        assert_eq!(palette_index(f64::NAN, 5), 0);
    }

    #[test]
    fn luma_monotonic_in_each_channel() {
        for c in 0..255u8 {
            assert!(luma(c + 1, 10, 10) >= luma(c, 10, 10));
            assert!(perceived(10, c + 1, 10) >= perceived(10, c, 10));
        }
    }
}
