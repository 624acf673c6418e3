use std::fmt;
use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::charset::Palette;
use crate::error::CoreError;

/// Facteur de résolution minimal accepté après clamp.
pub const MIN_RESOLUTION: f64 = 0.01;

/// Plage conseillée pour l'interface : 0.05–0.30.
pub const RECOMMENDED_RESOLUTION: (f64, f64) = (0.05, 0.30);

/// Paramètres d'une conversion. Valeur immuable, remplacée en bloc.
///
/// Chaque champ a une valeur par défaut saine.
///
/// # Example
/// ```
/// use af_core::config::ConversionConfig;
/// let config = ConversionConfig::default();
/// assert!((config.resolution_factor - 0.11).abs() < 1e-9);
/// assert!(config.grayscale);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct ConversionConfig {
    /// Fraction des colonnes/lignes de pixels conservées, dans (0, 1].
    pub resolution_factor: f64,
    /// Palette active (du plus sombre au plus clair).
    pub palette: Palette,
    /// Inverser la luminance (`b → 1 − b`) avant lookup.
    pub inverted: bool,
    /// Pas de couleur par cellule : rendu en une seule couleur neutre.
    pub grayscale: bool,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            resolution_factor: 0.11,
            palette: Palette::Standard,
            inverted: false,
            grayscale: true,
        }
    }
}

impl ConversionConfig {
    /// Clamp numeric fields to their valid ranges.
    /// Called after TOML deserialization and CLI overrides.
    ///
    /// # Example
    /// ```
    /// use af_core::config::ConversionConfig;
    /// let mut c = ConversionConfig { resolution_factor: 7.0, ..Default::default() };
    /// c.clamp_all();
    /// assert_eq!(c.resolution_factor, 1.0);
    /// ```
    pub fn clamp_all(&mut self) {
        if self.resolution_factor.is_finite() {
            self.resolution_factor = self.resolution_factor.clamp(MIN_RESOLUTION, 1.0);
        } else {
            log::warn!(
                "Facteur de résolution non fini ({}), valeur par défaut",
                self.resolution_factor
            );
            self.resolution_factor = Self::default().resolution_factor;
        }
        if (self.resolution_factor < RECOMMENDED_RESOLUTION.0)
            || (self.resolution_factor > RECOMMENDED_RESOLUTION.1)
        {
            log::debug!(
                "Résolution {:.2} hors plage conseillée {:.2}–{:.2}",
                self.resolution_factor,
                RECOMMENDED_RESOLUTION.0,
                RECOMMENDED_RESOLUTION.1
            );
        }
    }
}

/// Named bundles of the four conversion settings, applied atomically.
///
/// # Example
/// ```
/// use af_core::config::Preset;
/// use af_core::charset::Palette;
/// let c = Preset::Retro.config();
/// assert_eq!(c.palette, Palette::Blocks);
/// assert!(c.inverted);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Preset {
    /// Basse résolution, palette minimale.
    Quick,
    /// Palette détaillée, résolution plus fine.
    Detailed,
    /// Palette standard, couleurs par cellule.
    Colorful,
    /// Blocs inversés.
    Retro,
}

impl Preset {
    /// All presets, in display order.
    pub const ALL: [Self; 4] = [Self::Quick, Self::Detailed, Self::Colorful, Self::Retro];

    /// Lowercase name used on the command line.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Quick => "quick",
            Self::Detailed => "detailed",
            Self::Colorful => "colorful",
            Self::Retro => "retro",
        }
    }

    /// The full configuration this preset stands for.
    #[must_use]
    pub fn config(self) -> ConversionConfig {
        let (resolution_factor, palette, inverted, grayscale) = match self {
            Self::Quick => (0.08, Palette::Minimal, false, true),
            Self::Detailed => (0.15, Palette::Detailed, false, true),
            Self::Colorful => (0.12, Palette::Standard, false, false),
            Self::Retro => (0.1, Palette::Blocks, true, true),
        };
        ConversionConfig {
            resolution_factor,
            palette,
            inverted,
            grayscale,
        }
    }
}

impl FromStr for Preset {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|p| p.name() == wanted)
            .ok_or_else(|| {
                let names: Vec<_> = Self::ALL.iter().map(|p| p.name()).collect();
                CoreError::Config(format!(
                    "preset inconnu '{}' (attendu : {})",
                    s.trim(),
                    names.join(", ")
                ))
            })
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Structure TOML intermédiaire pour désérialisation avec valeurs optionnelles.
#[derive(Deserialize)]
struct ConfigFile {
    conversion: Option<ConversionSection>,
}

/// Conversion section of the TOML config, all fields optional for partial override.
#[derive(Deserialize)]
struct ConversionSection {
    resolution: Option<f64>,
    palette: Option<String>,
    charset: Option<String>,
    inverted: Option<bool>,
    grayscale: Option<bool>,
}

/// Parse une config TOML et fusionne avec les valeurs par défaut.
///
/// `charset` (chaîne littérale) l'emporte sur `palette` (nom).
///
/// # Errors
/// Returns an error on malformed TOML, an unknown palette name, or a
/// `charset` containing control characters.
///
/// # Example
/// ```
/// use af_core::config::parse_config;
/// let c = parse_config("[conversion]\nresolution = 0.2\ninverted = true\n").unwrap();
/// assert!(c.inverted);
/// assert!((c.resolution_factor - 0.2).abs() < 1e-9);
/// ```
pub fn parse_config(content: &str) -> Result<ConversionConfig> {
    let file: ConfigFile = toml::from_str(content).context("Erreur de parsing TOML")?;

    let mut config = ConversionConfig::default();
    if let Some(c) = file.conversion {
        if let Some(v) = c.resolution {
            config.resolution_factor = v;
        }
        if let Some(v) = c.palette {
            config.palette = v.parse()?;
        }
        if let Some(v) = c.charset {
            config.palette = Palette::user_defined(&v)?;
        }
        if let Some(v) = c.inverted {
            config.inverted = v;
        }
        if let Some(v) = c.grayscale {
            config.grayscale = v;
        }
    }

    config.clamp_all();
    Ok(config)
}

/// Charge un fichier TOML et fusionne avec les valeurs par défaut.
///
/// # Errors
/// Returns an error if the file cannot be read or parsed.
///
/// # Example
/// ```no_run
/// use af_core::config::load_config;
/// use std::path::Path;
/// let config = load_config(Path::new("config/default.toml")).unwrap();
/// ```
pub fn load_config(path: &Path) -> Result<ConversionConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Impossible de lire {}", path.display()))?;
    parse_config(&content).with_context(|| format!("Config invalide : {}", path.display()))
}
