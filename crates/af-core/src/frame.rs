use crate::error::CoreError;

/// Buffer de pixels RGBA row-major, 4 bytes par pixel.
///
/// Sert à la fois d'entrée (image décodée) et de sortie (surface rasterisée).
///
/// # Example
/// ```
/// use af_core::frame::FrameBuffer;
/// let fb = FrameBuffer::new(10, 10);
/// assert_eq!(fb.data.len(), 400);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameBuffer {
    /// Pixels RGBA, row-major, 4 bytes par pixel.
    pub data: Vec<u8>,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl FrameBuffer {
    /// Crée un buffer pré-alloué (noir transparent) aux dimensions données.
    ///
    /// # Example
    /// ```
    /// use af_core::frame::FrameBuffer;
    /// let fb = FrameBuffer::new(100, 50);
    /// assert_eq!(fb.width, 100);
    /// assert_eq!(fb.height, 50);
    /// assert_eq!(fb.data.len(), 100 * 50 * 4);
    /// ```
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            data: vec![0u8; width as usize * height as usize * 4],
            width,
            height,
        }
    }

    /// Buffer uniforme, pratique pour les tests et les images par défaut.
    ///
    /// # Example
    /// ```
    /// use af_core::frame::FrameBuffer;
    /// let fb = FrameBuffer::filled(2, 2, [255, 255, 255, 255]);
    /// assert_eq!(fb.pixel(1, 1), (255, 255, 255, 255));
    /// ```
    #[must_use]
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        Self {
            data: rgba.repeat(width as usize * height as usize),
            width,
            height,
        }
    }

    /// Number of bytes a `width × height` RGBA buffer needs, `None` on overflow.
    #[must_use]
    pub fn expected_len(&self) -> Option<usize> {
        (self.width as usize)
            .checked_mul(self.height as usize)
            .and_then(|n| n.checked_mul(4))
    }

    /// Vérifie que le buffer est convertible.
    ///
    /// # Errors
    /// `InvalidImage` for a zero-area buffer, `PixelAccess` when the byte
    /// store does not cover every declared pixel.
    ///
    /// # Example
    /// ```
    /// use af_core::frame::FrameBuffer;
    /// assert!(FrameBuffer::new(0, 4).ensure_readable().is_err());
    /// assert!(FrameBuffer::new(4, 4).ensure_readable().is_ok());
    /// ```
    pub fn ensure_readable(&self) -> Result<(), CoreError> {
        if self.width == 0 || self.height == 0 {
            return Err(CoreError::InvalidImage {
                width: self.width,
                height: self.height,
            });
        }
        match self.expected_len() {
            Some(len) if self.data.len() >= len => Ok(()),
            Some(len) => Err(CoreError::PixelAccess(format!(
                "{} octets disponibles, {len} attendus pour {}×{}",
                self.data.len(),
                self.width,
                self.height
            ))),
            None => Err(CoreError::PixelAccess(format!(
                "dimensions {}×{} hors limites",
                self.width, self.height
            ))),
        }
    }

    /// Accès au pixel (x, y) → (r, g, b, a).
    ///
    /// Out-of-range reads return transparent black.
    ///
    /// # Example
    /// ```
    /// use af_core::frame::FrameBuffer;
    /// let fb = FrameBuffer::new(10, 10);
    /// let (r, g, b, a) = fb.pixel(0, 0);
    /// assert_eq!((r, g, b, a), (0, 0, 0, 0));
    /// ```
    #[inline(always)]
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> (u8, u8, u8, u8) {
        debug_assert!(x < self.width && y < self.height, "pixel out of bounds");
        let idx = (y as usize * self.width as usize + x as usize) * 4;
        match self.data.get(idx..idx + 4) {
            Some(px) => (px[0], px[1], px[2], px[3]),
            None => (0, 0, 0, 0),
        }
    }

    /// Écrit un pixel. Ignoré hors limites.
    #[inline(always)]
    pub fn put_pixel(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        if x >= self.width || y >= self.height {
            return;
        }
        let idx = (y as usize * self.width as usize + x as usize) * 4;
        if let Some(px) = self.data.get_mut(idx..idx + 4) {
            px.copy_from_slice(&rgba);
        }
    }
}

/// Foreground used for every cell when the grid carries no colour.
pub const NEUTRAL_FG: (u8, u8, u8) = (255, 255, 255);

/// Single cell in the ASCII grid.
///
/// # Example
/// ```
/// use af_core::frame::AsciiCell;
/// let cell = AsciiCell::default();
/// assert_eq!(cell.ch, ' ');
/// assert_eq!(cell.color(), (255, 255, 255));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AsciiCell {
    /// Caractère à afficher.
    pub ch: char,
    /// Couleur foreground (RGB). `None` = mode niveaux de gris.
    pub fg: Option<(u8, u8, u8)>,
}

impl AsciiCell {
    /// Effective display colour.
    #[inline(always)]
    #[must_use]
    pub fn color(&self) -> (u8, u8, u8) {
        self.fg.unwrap_or(NEUTRAL_FG)
    }
}

impl Default for AsciiCell {
    fn default() -> Self {
        Self { ch: ' ', fg: None }
    }
}

/// Grille de sortie ASCII, row-major, toujours rectangulaire.
///
/// # Example
/// ```
/// use af_core::frame::{AsciiGrid, AsciiCell};
/// let mut grid = AsciiGrid::new(80, 24);
/// grid.set(0, 0, AsciiCell { ch: '@', fg: Some((255, 0, 0)) });
/// assert_eq!(grid.get(0, 0).ch, '@');
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AsciiGrid {
    cells: Vec<AsciiCell>,
    /// Width in characters.
    pub width: u32,
    /// Height in characters.
    pub height: u32,
}

impl AsciiGrid {
    /// Crée une grille pré-allouée remplie d'espaces.
    ///
    /// # Example
    /// ```
    /// use af_core::frame::AsciiGrid;
    /// let grid = AsciiGrid::new(80, 24);
    /// assert_eq!(grid.cells().len(), 80 * 24);
    /// ```
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            cells: vec![AsciiCell::default(); width as usize * height as usize],
            width,
            height,
        }
    }

    /// Set a cell at position (x, y). Out-of-range writes are ignored.
    #[inline(always)]
    pub fn set(&mut self, x: u32, y: u32, cell: AsciiCell) {
        if x < self.width && y < self.height {
            self.cells[y as usize * self.width as usize + x as usize] = cell;
        }
    }

    /// Get a cell reference at position (x, y).
    ///
    /// # Panics
    /// Panics if (x, y) lies outside the grid.
    #[inline(always)]
    #[must_use]
    pub fn get(&self, x: u32, y: u32) -> &AsciiCell {
        assert!(x < self.width && y < self.height, "cell out of bounds");
        &self.cells[y as usize * self.width as usize + x as usize]
    }

    /// All cells, row-major.
    #[must_use]
    pub fn cells(&self) -> &[AsciiCell] {
        &self.cells
    }

    /// Rows, top to bottom. Yields nothing for an empty grid.
    pub fn rows(&self) -> impl Iterator<Item = &[AsciiCell]> {
        self.cells.chunks_exact(self.width.max(1) as usize)
    }

    /// True when the grid holds no cell.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Projection texte : un caractère par cellule, chaque ligne terminée par `\n`.
    ///
    /// # Example
    /// ```
    /// use af_core::frame::{AsciiGrid, AsciiCell};
    /// let mut grid = AsciiGrid::new(2, 1);
    /// grid.set(0, 0, AsciiCell { ch: '#', fg: None });
    /// assert_eq!(grid.to_plain_text(), "# \n");
    /// ```
    #[must_use]
    pub fn to_plain_text(&self) -> String {
        let mut text = String::with_capacity(self.cells.len() + self.height as usize);
        for row in self.rows() {
            text.extend(row.iter().map(|c| c.ch));
            text.push('\n');
        }
        text
    }
}

/// Résultat complet d'une conversion : la grille et sa projection texte.
///
/// Built in one step so the two never diverge; replaced wholesale on every
/// new conversion.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Conversion {
    grid: AsciiGrid,
    text: String,
    grayscale: bool,
}

impl Conversion {
    /// Wraps a finished grid and derives its text.
    ///
    /// # Example
    /// ```
    /// use af_core::frame::{AsciiGrid, Conversion};
    /// let conv = Conversion::new(AsciiGrid::new(3, 2), true);
    /// assert_eq!(conv.text(), "   \n   \n");
    /// ```
    #[must_use]
    pub fn new(grid: AsciiGrid, grayscale: bool) -> Self {
        let text = grid.to_plain_text();
        Self {
            grid,
            text,
            grayscale,
        }
    }

    /// Character grid.
    #[must_use]
    pub fn grid(&self) -> &AsciiGrid {
        &self.grid
    }

    /// Plain text, rows separated by `\n` with a trailing newline.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Whether the grid was produced without per-cell colour.
    #[must_use]
    pub fn grayscale(&self) -> bool {
        self.grayscale
    }
}
