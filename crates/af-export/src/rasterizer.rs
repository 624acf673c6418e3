use std::collections::HashMap;

use ab_glyph::{Font, FontRef, PxScale, point};
use af_core::frame::{AsciiGrid, FrameBuffer, NEUTRAL_FG};

/// Hauteur de glyphe par défaut (px), équivalente à une police 8px.
pub const DEFAULT_GLYPH_HEIGHT: u32 = 8;

/// Hauteur de glyphe maximale acceptée (px).
pub const MAX_GLYPH_HEIGHT: u32 = 256;

/// Largeur d'un glyphe = hauteur × ce ratio (police monospace).
pub const GLYPH_WIDTH_RATIO: f64 = 0.6;

/// Couleur de fond de la surface.
pub const BACKGROUND: (u8, u8, u8) = (0, 0, 0);

/// Where glyph coverage comes from.
enum Glyphs {
    /// Pre-rasterized TrueType/OpenType glyphs. Missing chars draw nothing.
    Atlas(HashMap<char, Vec<u8>>),
    /// One solid block for every visible char, nothing for whitespace.
    Block(Vec<u8>),
}

/// Convertit une AsciiGrid en surface RGBA dimensionnée au contenu.
///
/// Stateless between calls: the atlas is built once in the constructor and
/// every [`Rasterizer::render`] allocates a fresh surface.
///
/// # Example
/// ```
/// use af_core::frame::{AsciiCell, AsciiGrid};
/// use af_export::rasterizer::Rasterizer;
///
/// let mut grid = AsciiGrid::new(5, 2);
/// grid.set(0, 0, AsciiCell { ch: '@', fg: Some((255, 0, 0)) });
/// let surface = Rasterizer::builtin(8).render(&grid, &grid.to_plain_text(), false);
/// assert_eq!((surface.width, surface.height), (24, 16));
/// ```
pub struct Rasterizer {
    glyph_height: u32,
    glyph_width: f64,
    /// Bitmap width of one glyph (the fractional box, rounded up).
    bitmap_width: u32,
    glyphs: Glyphs,
    /// Pre-allocated fallback glyph (all zeros).
    empty_glyph: Vec<u8>,
}

impl Rasterizer {
    /// Rasterizer sans police : chaque caractère visible devient un bloc plein
    /// (marge de 1 px), les espaces restent vides.
    ///
    /// `glyph_height` is clamped to `1..=MAX_GLYPH_HEIGHT`.
    #[must_use]
    pub fn builtin(glyph_height: u32) -> Self {
        let glyph_height = glyph_height.clamp(1, MAX_GLYPH_HEIGHT);
        let (glyph_width, bitmap_width) = glyph_box(glyph_height);

        let mut block = vec![0u8; (bitmap_width * glyph_height) as usize];
        for y in 1..glyph_height.saturating_sub(1) {
            for x in 1..bitmap_width.saturating_sub(1) {
                block[(y * bitmap_width + x) as usize] = 255;
            }
        }
        // Tiny boxes have no interior: fill them whole.
        if block.iter().all(|&a| a == 0) {
            block.fill(255);
        }

        Self {
            glyph_height,
            glyph_width,
            bitmap_width,
            glyphs: Glyphs::Block(block),
            empty_glyph: vec![0u8; (bitmap_width * glyph_height) as usize],
        }
    }

    /// Initialise le rasterizer en pré-calculant (atlas software) les
    /// caractères ASCII, Latin-1, les blocs Unicode et `extra`.
    ///
    /// # Errors
    /// Retourne une erreur si la police fournie est invalide.
    pub fn with_font(
        font_data: &[u8],
        glyph_height: u32,
        extra: impl IntoIterator<Item = char>,
    ) -> anyhow::Result<Self> {
        let font = FontRef::try_from_slice(font_data)?;
        let glyph_height = glyph_height.clamp(1, MAX_GLYPH_HEIGHT);
        let (glyph_width, bitmap_width) = glyph_box(glyph_height);
        let scale = PxScale::from(glyph_height as f32);

        let mut atlas = HashMap::new();
        let ranges = [32..=126, 0x00A0..=0x00FF, 0x2580..=0x259F];
        for codepoint in ranges.into_iter().flatten() {
            if let Some(ch) = char::from_u32(codepoint) {
                cache_glyph(&mut atlas, &font, scale, ch, bitmap_width, glyph_height);
            }
        }
        for ch in extra {
            if !atlas.contains_key(&ch) {
                cache_glyph(&mut atlas, &font, scale, ch, bitmap_width, glyph_height);
            }
        }
        log::debug!(
            "Atlas de glyphes : {} caractères, boîte {glyph_width:.1}×{glyph_height}",
            atlas.len()
        );

        Ok(Self {
            glyph_height,
            glyph_width,
            bitmap_width,
            glyphs: Glyphs::Atlas(atlas),
            empty_glyph: vec![0u8; (bitmap_width * glyph_height) as usize],
        })
    }

    /// Calcule les dimensions de surface pour `columns × rows` caractères.
    ///
    /// # Example
    /// ```
    /// use af_export::rasterizer::Rasterizer;
    /// assert_eq!(Rasterizer::builtin(8).target_dimensions(10, 3), (48, 24));
    /// ```
    #[must_use]
    pub fn target_dimensions(&self, columns: u32, rows: u32) -> (u32, u32) {
        (
            (f64::from(columns) * self.glyph_width).floor() as u32,
            rows.saturating_mul(self.glyph_height),
        )
    }

    /// Rendu de la grille (mode couleur) ou du texte (mode niveaux de gris).
    ///
    /// In grayscale mode each line of `text` is drawn left-aligned in the
    /// neutral colour; the surface is as wide as the longest line. In colour
    /// mode each cell is drawn with its own colour. An empty grid yields a
    /// 0×0 surface.
    #[must_use]
    pub fn render(&self, grid: &AsciiGrid, text: &str, grayscale: bool) -> FrameBuffer {
        if grid.is_empty() {
            return FrameBuffer::new(0, 0);
        }

        if grayscale {
            let lines: Vec<&str> = text.lines().collect();
            let columns = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
            let (w, h) = self.target_dimensions(columns as u32, lines.len() as u32);
            let mut surface = blank_surface(w, h);
            for (row, line) in lines.iter().enumerate() {
                for (col, ch) in line.chars().enumerate() {
                    self.draw_glyph(&mut surface, col as u32, row as u32, ch, NEUTRAL_FG);
                }
            }
            surface
        } else {
            let (w, h) = self.target_dimensions(grid.width, grid.height);
            let mut surface = blank_surface(w, h);
            for (row, cells) in grid.rows().enumerate() {
                for (col, cell) in cells.iter().enumerate() {
                    self.draw_glyph(&mut surface, col as u32, row as u32, cell.ch, cell.color());
                }
            }
            surface
        }
    }

    fn coverage(&self, ch: char) -> &[u8] {
        match &self.glyphs {
            Glyphs::Atlas(atlas) => atlas.get(&ch).unwrap_or(&self.empty_glyph),
            Glyphs::Block(_) if ch.is_whitespace() => &self.empty_glyph,
            Glyphs::Block(block) => block,
        }
    }

    fn draw_glyph(&self, surface: &mut FrameBuffer, col: u32, row: u32, ch: char, fg: (u8, u8, u8)) {
        let alpha_map = self.coverage(ch);
        let x0 = (f64::from(col) * self.glyph_width).floor() as u32;
        let y0 = row.saturating_mul(self.glyph_height);

        for gy in 0..self.glyph_height {
            let y = y0.saturating_add(gy);
            if y >= surface.height {
                break;
            }
            for gx in 0..self.bitmap_width {
                let x = x0.saturating_add(gx);
                if x >= surface.width {
                    break;
                }
                let alpha = alpha_map[(gy * self.bitmap_width + gx) as usize];
                if alpha == 0 {
                    continue;
                }
                let (r, g, b, _) = surface.pixel(x, y);
                let a = f32::from(alpha) / 255.0;
                let blend = |f: u8, base: u8| (f32::from(f) * a + f32::from(base) * (1.0 - a)) as u8;
                surface.put_pixel(x, y, [blend(fg.0, r), blend(fg.1, g), blend(fg.2, b), 255]);
            }
        }
    }
}

/// Fractional glyph width and the bitmap width that covers it.
fn glyph_box(glyph_height: u32) -> (f64, u32) {
    let width = f64::from(glyph_height) * GLYPH_WIDTH_RATIO;
    (width, (width.ceil() as u32).max(1))
}

fn blank_surface(width: u32, height: u32) -> FrameBuffer {
    FrameBuffer::filled(width, height, [BACKGROUND.0, BACKGROUND.1, BACKGROUND.2, 255])
}

fn cache_glyph(
    atlas: &mut HashMap<char, Vec<u8>>,
    font: &FontRef,
    scale: PxScale,
    ch: char,
    width: u32,
    height: u32,
) {
    // Skip characters not actually in the font (glyph_id 0 = .notdef)
    let gid = font.glyph_id(ch);
    if gid.0 == 0 {
        return;
    }

    let mut buffer = vec![0u8; (width * height) as usize];
    let ascent_px = font.ascent_unscaled() * scale.y / font.height_unscaled();
    let glyph = gid.with_scale_and_position(scale, point(0.0, ascent_px));

    if let Some(outline) = font.outline_glyph(glyph) {
        let bounds = outline.px_bounds();
        #[allow(clippy::cast_possible_wrap)]
        outline.draw(|x, y, v| {
            let px = (x as i32 + bounds.min.x as i32).max(0) as u32;
            let py = (y as i32 + bounds.min.y as i32).max(0) as u32;
            if px < width && py < height {
                let idx = (py * width + px) as usize;
                buffer[idx] = buffer[idx].max((v * 255.0).round() as u8);
            }
        });
    }
    atlas.insert(ch, buffer);
}
