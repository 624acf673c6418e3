/// Plancher de chaque canal : un glyphe noir serait illisible sur fond noir.
pub const MIN_CHANNEL: u8 = 40;

/// Scale an RGB triple by `factor`, rounding, then clamp every channel into
/// `[MIN_CHANNEL, 255]`.
///
/// # Example
/// ```
/// use af_core::color::scale_clamped;
/// assert_eq!(scale_clamped(0, 0, 0, 2.0), (40, 40, 40));
/// assert_eq!(scale_clamped(200, 100, 50, 2.0), (255, 200, 100));
/// ```
#[inline(always)]
#[must_use]
pub fn scale_clamped(r: u8, g: u8, b: u8, factor: f64) -> (u8, u8, u8) {
    let channel = |c: u8| -> u8 {
        let scaled = (f64::from(c) * factor).round();
        if scaled.is_nan() {
            return MIN_CHANNEL;
        }
        scaled.clamp(f64::from(MIN_CHANNEL), 255.0) as u8
    };
    (channel(r), channel(g), channel(b))
}
