use std::path::{Path, PathBuf};

use af_core::charset::Palette;
use af_core::config::{ConversionConfig, Preset, load_config};
use af_export::rasterizer::{DEFAULT_GLYPH_HEIGHT, MAX_GLYPH_HEIGHT};
use af_export::text::DEFAULT_TEXT_FILE;
use anyhow::Result;
use clap::Parser;

/// clasSCII studio — convertit une image en art ASCII (texte + aperçu PNG).
#[allow(clippy::struct_excessive_bools)]
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Image source (PNG, JPEG, BMP, GIF), `-` pour stdin. Sans argument : image intégrée.
    #[arg(long)]
    pub image: Option<PathBuf>,

    /// Fichier de configuration TOML (section [conversion]).
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Preset nommé : quick, detailed, colorful, retro (ignore --config).
    #[arg(long)]
    pub preset: Option<String>,

    /// Facteur de résolution (0, 1]. Plage conseillée 0.05–0.30.
    #[arg(short, long)]
    pub resolution: Option<f64>,

    /// Palette : standard, detailed, blocks, minimal, custom.
    #[arg(long)]
    pub palette: Option<String>,

    /// Palette libre, du plus sombre au plus clair (prioritaire sur --palette).
    #[arg(long)]
    pub charset: Option<String>,

    /// Inverser la luminance.
    #[arg(long, default_value_t = false)]
    pub invert: bool,

    /// Couleur par cellule.
    #[arg(long, default_value_t = false, conflicts_with = "grayscale")]
    pub color: bool,

    /// Une seule couleur neutre.
    #[arg(long, default_value_t = false)]
    pub grayscale: bool,

    /// Écrire le texte dans ce fichier (`--output` seul : ascii-art.txt).
    #[arg(short, long, num_args = 0..=1, default_missing_value = DEFAULT_TEXT_FILE)]
    pub output: Option<PathBuf>,

    /// Écrire l'aperçu rasterisé en PNG.
    #[arg(long)]
    pub png: Option<PathBuf>,

    /// Police TTF/OTF pour l'aperçu. Défaut : glyphes blocs intégrés.
    #[arg(long)]
    pub font: Option<PathBuf>,

    /// Hauteur d'un glyphe dans l'aperçu (px).
    #[arg(
        long,
        default_value_t = DEFAULT_GLYPH_HEIGHT,
        value_parser = clap::value_parser!(u32).range(1..=i64::from(MAX_GLYPH_HEIGHT))
    )]
    pub glyph_height: u32,

    /// Afficher l'art en couleurs truecolor dans le terminal.
    #[arg(long, default_value_t = false)]
    pub print: bool,

    /// Relancer la conversion à chaque modification du fichier --config.
    #[arg(long, default_value_t = false)]
    pub watch: bool,

    /// Niveau de log : error, warn, info, debug, trace.
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}

impl Cli {
    /// Check flag combinations clap cannot express.
    ///
    /// # Errors
    /// Returns an error if `--watch` lacks a config file or is combined with a preset.
    pub fn validate(&self) -> Result<()> {
        if self.watch && self.config.is_none() {
            anyhow::bail!("--watch requiert --config <fichier.toml>.");
        }
        if self.watch && self.preset.is_some() {
            anyhow::bail!("--watch et --preset sont incompatibles : le preset masquerait la config.");
        }
        Ok(())
    }

    /// Resolve config: preset > config file > defaults, then CLI overrides.
    ///
    /// # Errors
    /// Unknown preset/palette, or an unreadable config file.
    pub fn resolve_config(&self) -> Result<ConversionConfig> {
        let base = if let Some(ref name) = self.preset {
            name.parse::<Preset>()?.config()
        } else if let Some(ref path) = self.config {
            load_config(path)?
        } else {
            ConversionConfig::default()
        };
        self.apply_overrides(base)
    }

    /// Apply command-line overrides on top of a loaded config.
    ///
    /// # Errors
    /// Returns an error for an unknown palette name.
    pub fn apply_overrides(&self, mut config: ConversionConfig) -> Result<ConversionConfig> {
        if let Some(v) = self.resolution {
            config.resolution_factor = v;
        }
        if let Some(ref name) = self.palette {
            config.palette = name.parse()?;
        }
        if let Some(ref chars) = self.charset {
            config.palette = Palette::user_defined(chars)?;
        }
        if self.invert {
            config.inverted = true;
        }
        if self.color {
            config.grayscale = false;
        }
        if self.grayscale {
            config.grayscale = true;
        }
        config.clamp_all();
        Ok(config)
    }

    /// True when `--image -` asks for the picture on stdin.
    #[must_use]
    pub fn image_from_stdin(&self) -> bool {
        self.image.as_deref() == Some(Path::new("-"))
    }

    /// True when no explicit output was requested: the text goes to stdout.
    #[must_use]
    pub fn wants_stdout(&self) -> bool {
        self.output.is_none() && self.png.is_none() && !self.print
    }
}
