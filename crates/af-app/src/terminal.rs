use std::io::{self, Write};

use af_core::frame::Conversion;
use crossterm::queue;
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};

/// Écrit la conversion sur `out`, en truecolor si elle porte des couleurs.
///
/// Grayscale conversions are written as their plain text.
///
/// # Errors
/// Propagates any write failure.
///
/// # Example
/// ```
/// use af_core::frame::{AsciiGrid, Conversion};
/// use af_app::terminal::print_conversion;
///
/// let conv = Conversion::new(AsciiGrid::new(2, 1), true);
/// let mut out = Vec::new();
/// print_conversion(&mut out, &conv).unwrap();
/// assert_eq!(out, b"  \n");
/// ```
pub fn print_conversion(out: &mut impl Write, conv: &Conversion) -> io::Result<()> {
    if conv.grayscale() {
        queue!(out, Print(conv.text()))?;
    } else {
        for row in conv.grid().rows() {
            for cell in row {
                let (r, g, b) = cell.color();
                queue!(out, SetForegroundColor(Color::Rgb { r, g, b }), Print(cell.ch))?;
            }
            queue!(out, ResetColor, Print('\n'))?;
        }
    }
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use af_core::frame::{AsciiCell, AsciiGrid};

    #[test]
    fn colour_cells_emit_truecolor_sequences() {
        let mut grid = AsciiGrid::new(1, 1);
        grid.set(0, 0, AsciiCell { ch: '#', fg: Some((40, 41, 42)) });
        let conv = Conversion::new(grid, false);

        let mut out = Vec::new();
        print_conversion(&mut out, &conv).unwrap();
        let s = String::from_utf8(out).unwrap();
        assert!(s.contains("\u{1b}[38;2;40;41;42m#"));
        assert!(s.ends_with('\n'));
    }
}
