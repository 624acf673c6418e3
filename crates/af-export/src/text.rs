use std::path::Path;

use af_core::error::CoreError;
use af_core::frame::Conversion;
use anyhow::{Context, Result};

/// Nom de fichier proposé pour le téléchargement du texte.
pub const DEFAULT_TEXT_FILE: &str = "ascii-art.txt";

/// Texte exportable (UTF-8, lignes séparées par `\n`, newline final).
///
/// # Errors
/// `CoreError::Export` when no conversion is available or it is empty.
///
/// # Example
/// ```
/// use af_core::frame::{AsciiGrid, Conversion};
/// use af_export::text::export_text;
///
/// assert!(export_text(None).is_err());
/// let conv = Conversion::new(AsciiGrid::new(2, 1), true);
/// assert_eq!(export_text(Some(&conv)).unwrap(), "  \n");
/// ```
pub fn export_text(conversion: Option<&Conversion>) -> Result<&str, CoreError> {
    match conversion {
        Some(c) if !c.text().is_empty() => Ok(c.text()),
        Some(_) => Err(CoreError::Export("la conversion est vide".into())),
        None => Err(CoreError::Export("aucune conversion disponible".into())),
    }
}

/// Écrit le texte de la conversion dans `path`.
///
/// # Errors
/// `CoreError::Export` when there is nothing to write, or the I/O failure.
pub fn write_text(path: &Path, conversion: Option<&Conversion>) -> Result<()> {
    let text = export_text(conversion)?;
    std::fs::write(path, text.as_bytes())
        .with_context(|| format!("Impossible d'écrire {}", path.display()))?;
    log::info!("Texte ({} octets) écrit dans {}", text.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use af_core::frame::{AsciiCell, AsciiGrid};

    #[test]
    fn writes_text_with_trailing_newline() {
        let mut grid = AsciiGrid::new(2, 2);
        grid.set(1, 1, AsciiCell { ch: '█', fg: None });
        let conv = Conversion::new(grid, true);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_TEXT_FILE);
        write_text(&path, Some(&conv)).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "  \n █\n");
    }

    #[test]
    fn empty_conversion_is_export_error() {
        let conv = Conversion::new(AsciiGrid::default(), true);
        assert!(matches!(
            export_text(Some(&conv)),
            Err(CoreError::Export(_))
        ));
    }

    #[test]
    fn nothing_written_without_conversion() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("none.txt");
        assert!(write_text(&path, None).is_err());
        assert!(!path.exists());
    }
}
