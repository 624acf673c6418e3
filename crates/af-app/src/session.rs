use std::sync::Arc;

use af_core::config::ConversionConfig;
use af_core::error::CoreError;
use af_core::frame::{Conversion, FrameBuffer};
use arc_swap::ArcSwapOption;

/// Image chargée + dernière conversion réussie.
///
/// Each slot is replaced in one atomic store, so a reader never sees a
/// half-built grid. Any failure empties the conversion slot so nothing
/// stale is displayed or exported.
///
/// # Example
/// ```
/// use af_app::session::Session;
/// use af_core::config::ConversionConfig;
/// use af_core::frame::FrameBuffer;
///
/// let session = Session::new();
/// session.set_source(Ok(FrameBuffer::filled(4, 4, [255, 255, 255, 255]))).unwrap();
/// let conv = session.refresh(&ConversionConfig::default()).unwrap();
/// assert_eq!(conv.text(), "@\n");
/// ```
pub struct Session {
    source: ArcSwapOption<FrameBuffer>,
    current: ArcSwapOption<Conversion>,
}

impl Session {
    #[must_use]
    pub fn new() -> Self {
        Self {
            source: ArcSwapOption::empty(),
            current: ArcSwapOption::empty(),
        }
    }

    /// Installe le résultat d'une acquisition d'image.
    ///
    /// # Errors
    /// Hands back the acquisition error after clearing both slots.
    pub fn set_source(&self, acquired: Result<FrameBuffer, CoreError>) -> Result<(), CoreError> {
        self.current.store(None);
        match acquired {
            Ok(frame) => {
                self.source.store(Some(Arc::new(frame)));
                Ok(())
            }
            Err(e) => {
                self.source.store(None);
                Err(e)
            }
        }
    }

    /// Recalcule toute la grille depuis l'image courante.
    ///
    /// # Errors
    /// `ImageAcquisition` when no image is loaded, or the conversion error.
    pub fn refresh(&self, config: &ConversionConfig) -> Result<Arc<Conversion>, CoreError> {
        let Some(frame) = self.source.load_full() else {
            self.current.store(None);
            return Err(CoreError::ImageAcquisition {
                source_name: "session".into(),
                reason: "aucune image chargée".into(),
            });
        };
        match af_ascii::convert(&frame, config) {
            Ok(conv) => {
                let conv = Arc::new(conv);
                self.current.store(Some(Arc::clone(&conv)));
                Ok(conv)
            }
            Err(e) => {
                self.current.store(None);
                Err(e)
            }
        }
    }

    /// Dernière conversion réussie, si elle est toujours valide.
    #[must_use]
    pub fn current(&self) -> Option<Arc<Conversion>> {
        self.current.load_full()
    }

    /// Texte de la conversion courante, pour copie ou téléchargement.
    ///
    /// # Errors
    /// `CoreError::Export` when nothing has been converted.
    pub fn text(&self) -> Result<String, CoreError> {
        let current = self.current();
        af_export::text::export_text(current.as_deref()).map(str::to_owned)
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
