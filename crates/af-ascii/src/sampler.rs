use af_core::config::ConversionConfig;
use af_core::error::CoreError;
use af_core::frame::{AsciiCell, AsciiGrid, Conversion, FrameBuffer};

use crate::color_map::derive_color;
use crate::luminance::{brightness, palette_index};

/// Compensation de l'aspect des glyphes (plus hauts que larges) sur l'axe vertical.
pub const FONT_ASPECT_RATIO: f64 = 0.5;

/// Grid geometry derived from a buffer size and a resolution factor.
///
/// # Example
/// ```
/// use af_ascii::sampler::Sampling;
/// let s = Sampling::new(100, 100, 0.1);
/// assert_eq!((s.col_stride, s.row_stride), (10, 20));
/// assert_eq!((s.columns, s.rows), (10, 5));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Sampling {
    /// Pixels between two sampled columns.
    pub col_stride: u32,
    /// Pixels between two sampled rows.
    pub row_stride: u32,
    /// Character columns produced.
    pub columns: u32,
    /// Character rows produced.
    pub rows: u32,
}

impl Sampling {
    /// Compute strides for a non-empty `width × height` buffer.
    #[must_use]
    pub fn new(width: u32, height: u32, resolution_factor: f64) -> Self {
        let target_w = target_cells(width, resolution_factor);
        let target_h = target_cells(height, resolution_factor);

        let col_stride = stride(f64::from(width) / f64::from(target_w));
        let row_stride = stride(f64::from(height) / f64::from(target_h) / FONT_ASPECT_RATIO);

        Self {
            col_stride,
            row_stride,
            columns: width.div_ceil(col_stride),
            rows: height.div_ceil(row_stride),
        }
    }
}

/// `floor(n · factor)`, never below 1.
#[inline]
fn target_cells(n: u32, factor: f64) -> u32 {
    let t = (f64::from(n) * factor).floor();
    if t.is_nan() || t < 1.0 {
        1
    } else {
        (t as u32).min(n.max(1))
    }
}

#[inline]
fn stride(ratio: f64) -> u32 {
    (ratio.ceil() as u32).max(1)
}

/// Convertit un buffer de pixels en grille ASCII (et sa projection texte).
///
/// Nearest-pixel sampling on a coarse grid: one pixel is read every
/// `col_stride` columns and `row_stride` rows, starting at (0, 0). The
/// buffer is never modified. Each call rebuilds the whole grid.
///
/// # Errors
/// `InvalidImage` for a zero-area buffer, `PixelAccess` when the byte store
/// is shorter than `width × height × 4`.
///
/// # Example
/// ```
/// use af_core::frame::FrameBuffer;
/// use af_core::config::ConversionConfig;
/// use af_ascii::sampler::convert;
///
/// let frame = FrameBuffer::filled(2, 2, [255, 255, 255, 255]);
/// let config = ConversionConfig { resolution_factor: 1.0, ..Default::default() };
/// let conv = convert(&frame, &config).unwrap();
/// assert_eq!(conv.text(), "@@\n");
/// ```
pub fn convert(frame: &FrameBuffer, config: &ConversionConfig) -> Result<Conversion, CoreError> {
    frame.ensure_readable()?;

    let chars = config.palette.chars();
    let len = chars.len();
    let sampling = Sampling::new(frame.width, frame.height, config.resolution_factor);

    log::debug!(
        "Conversion {}×{} → {}×{} cellules (pas {}×{}, palette {} [{len}])",
        frame.width,
        frame.height,
        sampling.columns,
        sampling.rows,
        sampling.col_stride,
        sampling.row_stride,
        config.palette,
    );

    let mut grid = AsciiGrid::new(sampling.columns, sampling.rows);
    let ys = (0..frame.height).step_by(sampling.row_stride as usize);
    for (cy, y) in ys.enumerate() {
        let xs = (0..frame.width).step_by(sampling.col_stride as usize);
        for (cx, x) in xs.enumerate() {
            let (r, g, b, _) = frame.pixel(x, y);
            let beta = brightness(r, g, b, config.grayscale, config.inverted);
            let index = palette_index(beta, len);
            let fg = if config.grayscale {
                None
            } else {
                Some(derive_color(r, g, b, index, len))
            };
            grid.set(
                cx as u32,
                cy as u32,
                AsciiCell {
                    ch: chars[index],
                    fg,
                },
            );
        }
    }

    Ok(Conversion::new(grid, config.grayscale))
}

#[cfg(test)]
mod tests {
    use super::*;
    use af_core::charset::Palette;
    use af_core::color::MIN_CHANNEL;
    use proptest::prelude::*;

    fn config(grayscale: bool, inverted: bool) -> ConversionConfig {
        ConversionConfig {
            resolution_factor: 1.0,
            palette: Palette::Standard,
            inverted,
            grayscale,
        }
    }

    fn gradient(width: u32, height: u32) -> FrameBuffer {
        let mut fb = FrameBuffer::new(width, height);
        for y in 0..height {
            for x in 0..width {
                let v = ((x * 255) / width.max(1)) as u8;
                fb.put_pixel(x, y, [v, (y % 256) as u8, 255 - v, 255]);
            }
        }
        fb
    }

    #[test]
    fn white_grayscale_maps_to_densest_char() {
        let frame = FrameBuffer::filled(2, 2, [255, 255, 255, 255]);
        let conv = convert(&frame, &config(true, false)).unwrap();
        assert!(conv.grid().cells().iter().all(|c| c.ch == '@'));
        // rows are sampled every ceil(2 / 2 / 0.5) = 2 pixels
        assert_eq!(conv.text(), "@@\n");
    }

    #[test]
    fn white_inverted_maps_to_blank() {
        let frame = FrameBuffer::filled(2, 2, [255, 255, 255, 255]);
        let conv = convert(&frame, &config(true, true)).unwrap();
        assert!(conv.grid().cells().iter().all(|c| c.ch == ' '));
        assert_eq!(conv.text(), "  \n");
    }

    #[test]
    fn black_pixel_colour_is_floored() {
        let frame = FrameBuffer::filled(1, 1, [0, 0, 0, 255]);
        let conv = convert(&frame, &config(false, false)).unwrap();
        let cell = conv.grid().get(0, 0);
        assert_eq!(cell.ch, ' ');
        assert_eq!(cell.fg, Some((40, 40, 40)));
    }

    #[test]
    fn single_pixel_gives_single_cell() {
        let frame = FrameBuffer::filled(1, 1, [120, 30, 200, 255]);
        for factor in [0.01, 0.5, 1.0] {
            let cfg = ConversionConfig {
                resolution_factor: factor,
                ..config(false, false)
            };
            let conv = convert(&frame, &cfg).unwrap();
            assert_eq!((conv.grid().width, conv.grid().height), (1, 1));
            assert_eq!(conv.grid().cells().len(), 1);
        }
    }

    #[test]
    fn grayscale_cells_carry_no_colour() {
        let conv = convert(&gradient(16, 16), &config(true, false)).unwrap();
        assert!(conv.grid().cells().iter().all(|c| c.fg.is_none()));
        assert!(conv.grayscale());
    }

    #[test]
    fn zero_area_is_invalid_image() {
        let err = convert(&FrameBuffer::new(0, 10), &config(true, false)).unwrap_err();
        assert!(matches!(err, CoreError::InvalidImage { .. }));
    }

    #[test]
    fn truncated_buffer_is_pixel_access_error() {
        let frame = FrameBuffer {
            data: vec![255; 8],
            width: 4,
            height: 4,
        };
        let err = convert(&frame, &config(true, false)).unwrap_err();
        assert!(matches!(err, CoreError::PixelAccess(_)));
    }

    #[test]
    fn single_char_palette_fills_everything() {
        let cfg = ConversionConfig {
            palette: Palette::UserDefined("#".into()),
            ..config(false, false)
        };
        let conv = convert(&gradient(8, 8), &cfg).unwrap();
        assert!(conv.grid().cells().iter().all(|c| c.ch == '#'));
    }

    #[test]
    fn uniform_image_repeats_one_cell() {
        let frame = FrameBuffer::filled(30, 20, [90, 160, 30, 255]);
        let conv = convert(&frame, &config(false, false)).unwrap();
        let first = *conv.grid().get(0, 0);
        assert!(conv.grid().cells().iter().all(|c| *c == first));
    }

    #[test]
    fn resolution_controls_grid_size() {
        let frame = gradient(200, 100);
        let cfg = ConversionConfig {
            resolution_factor: 0.1,
            ..config(true, false)
        };
        let conv = convert(&frame, &cfg).unwrap();
        // 200 * 0.1 = 20 columns; rows: ceil(100 / 10 / 0.5) = 20 px stride
        assert_eq!((conv.grid().width, conv.grid().height), (20, 5));
    }

    #[test]
    fn colour_and_grayscale_formulas_disagree() {
        let frame = FrameBuffer::filled(1, 1, [0, 0, 255, 255]);
        let gray = convert(&frame, &config(true, false)).unwrap();
        let color = convert(&frame, &config(false, false)).unwrap();
        // luma 0.114 → index 1, perceived sqrt(0.114) ≈ 0.338 → index 3
        assert_eq!(gray.grid().get(0, 0).ch, '.');
        assert_eq!(color.grid().get(0, 0).ch, '-');
    }

    #[test]
    fn inversion_mirrors_extremes() {
        let chars = Palette::Standard.chars();
        let len = chars.len();
        let index_of = |conv: &Conversion| {
            let ch = conv.grid().get(0, 0).ch;
            chars.iter().position(|&c| c == ch).unwrap()
        };
        for rgba in [[0, 0, 0, 255], [255, 255, 255, 255]] {
            let frame = FrameBuffer::filled(3, 3, rgba);
            for grayscale in [true, false] {
                let plain = index_of(&convert(&frame, &config(grayscale, false)).unwrap());
                let inv = index_of(&convert(&frame, &config(grayscale, true)).unwrap());
                // floor() may land one step off the exact mirror
                let mirror = len - 1 - plain;
                assert!(inv.abs_diff(mirror) <= 1, "{rgba:?} {grayscale}: {plain} / {inv}");
            }
        }
    }

    #[test]
    fn colour_white_stops_one_short_of_densest() {
        // sqrt(0.299 + 0.587 + 0.114) rounds to 0.9999999999999999 in f64
        let chars = Palette::Standard.chars();
        let frame = FrameBuffer::filled(1, 1, [255, 255, 255, 255]);
        let color = convert(&frame, &config(false, false)).unwrap();
        let gray = convert(&frame, &config(true, false)).unwrap();
        assert_eq!(color.grid().get(0, 0).ch, chars[chars.len() - 2]);
        assert_eq!(gray.grid().get(0, 0).ch, chars[chars.len() - 1]);
    }

    proptest! {
        #[test]
        fn prop_grid_is_rectangular(
            w in 1u32..64,
            h in 1u32..64,
            factor in 0.001f64..=1.0,
            grayscale in any::<bool>(),
        ) {
            let frame = gradient(w, h);
            let cfg = ConversionConfig { resolution_factor: factor, ..config(grayscale, false) };
            let conv = convert(&frame, &cfg).unwrap();
            let grid = conv.grid();
            prop_assert!(grid.width >= 1 && grid.height >= 1);
            prop_assert_eq!(grid.rows().count(), grid.height as usize);
            prop_assert!(grid.rows().all(|r| r.len() == grid.width as usize));
        }

        #[test]
        fn prop_channels_within_floor_and_ceiling(
            r in any::<u8>(), g in any::<u8>(), b in any::<u8>(), inverted in any::<bool>(),
        ) {
            let frame = FrameBuffer::filled(2, 2, [r, g, b, 255]);
            let conv = convert(&frame, &config(false, inverted)).unwrap();
            for cell in conv.grid().cells() {
                let (cr, cg, cb) = cell.fg.unwrap();
                prop_assert!(cr >= MIN_CHANNEL && cg >= MIN_CHANNEL && cb >= MIN_CHANNEL);
            }
        }

        #[test]
        fn prop_index_monotonic_in_each_channel(
            rgb in any::<[u8; 3]>(), channel in 0usize..3,
            grayscale in any::<bool>(), inverted in any::<bool>(),
        ) {
            prop_assume!(rgb[channel] < u8::MAX);
            let len = 15;
            let mut brighter = rgb;
            brighter[channel] += 1;
            let [r, g, b] = rgb;
            let lo = palette_index(brightness(r, g, b, grayscale, inverted), len);
            let [r, g, b] = brighter;
            let hi = palette_index(brightness(r, g, b, grayscale, inverted), len);
            if inverted {
                prop_assert!(hi <= lo);
            } else {
                prop_assert!(hi >= lo);
            }
        }

        #[test]
        fn prop_text_matches_grid(w in 1u32..40, h in 1u32..40, factor in 0.05f64..=1.0) {
            let cfg = ConversionConfig { resolution_factor: factor, ..config(true, false) };
            let conv = convert(&gradient(w, h), &cfg).unwrap();
            let rebuilt: String = conv
                .grid()
                .rows()
                .map(|row| row.iter().map(|c| c.ch).collect::<String>() + "\n")
                .collect();
            prop_assert_eq!(rebuilt, conv.text());
        }
    }
}
