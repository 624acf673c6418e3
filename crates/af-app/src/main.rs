use std::io::Write;

use af_app::cli::Cli;
use af_app::hotreload;
use af_app::session::Session;
use af_app::terminal;
use af_core::config::ConversionConfig;
use af_core::frame::FrameBuffer;
use af_core::CoreError;
use af_export::rasterizer::Rasterizer;
use anyhow::{Context, Result};
use clap::Parser;

fn main() -> Result<()> {
    // 1. Parser CLI
    let cli = Cli::parse();

    // 2. Initialiser le logging
    env_logger::Builder::new()
        .filter_level(cli.log_level.parse().unwrap_or(log::LevelFilter::Warn))
        .init();

    // 3. Valider les combinaisons de flags
    cli.validate()?;

    // 4. Charger la config
    let mut config = cli.resolve_config()?;
    log::info!(
        "Config : résolution {:.2}, palette {}, inversé {}, niveaux de gris {}",
        config.resolution_factor,
        config.palette,
        config.inverted,
        config.grayscale
    );

    // 5. Police de l'aperçu (lue une fois)
    let font_data = match cli.font {
        Some(ref path) => Some(
            std::fs::read(path)
                .with_context(|| format!("Impossible de lire la police {}", path.display()))?,
        ),
        None => None,
    };

    // 6. Acquérir l'image
    let session = Session::new();
    session.set_source(acquire(&cli))?;

    // 7. Première conversion
    run_once(&cli, &session, &config, font_data.as_deref())?;

    // 8. Mode watch : chaque config valide relance tout
    if cli.watch {
        let Some(ref path) = cli.config else {
            return Ok(());
        };
        let (tx, rx) = flume::unbounded();
        let _watcher = hotreload::spawn_config_watcher(path, tx)?;
        log::info!("Surveillance de {} (Ctrl+C pour quitter)", path.display());

        for reloaded in rx.iter() {
            match cli.apply_overrides(reloaded) {
                Ok(next) if next == config => log::debug!("Config inchangée, conversion ignorée"),
                Ok(next) => {
                    config = next;
                    if let Err(e) = run_once(&cli, &session, &config, font_data.as_deref()) {
                        log::error!("Conversion échouée : {e:#}");
                    }
                }
                Err(e) => log::warn!("Config ignorée : {e:#}"),
            }
        }
    }

    Ok(())
}

/// Image from `--image` (a file, or `-` for stdin), or the built-in default picture.
fn acquire(cli: &Cli) -> Result<FrameBuffer, CoreError> {
    match cli.image {
        Some(_) if cli.image_from_stdin() => {
            af_source::image::read_image(std::io::stdin().lock(), "stdin")
        }
        Some(ref path) => af_source::image::load_image(path),
        None => {
            log::info!(
                "Aucune image fournie, utilisation de l'image '{}'",
                af_source::image::DEFAULT_IMAGE_NAME
            );
            Ok(af_source::image::default_image())
        }
    }
}

/// Convert the loaded image with `config` and write every requested output.
fn run_once(
    cli: &Cli,
    session: &Session,
    config: &ConversionConfig,
    font_data: Option<&[u8]>,
) -> Result<()> {
    let conv = session.refresh(config)?;

    if let Some(ref path) = cli.output {
        af_export::text::write_text(path, Some(conv.as_ref()))?;
    }

    if let Some(ref path) = cli.png {
        let rasterizer = match font_data {
            Some(data) => Rasterizer::with_font(data, cli.glyph_height, config.palette.chars())?,
            None => Rasterizer::builtin(cli.glyph_height),
        };
        let surface = rasterizer.render(conv.grid(), conv.text(), conv.grayscale());
        af_export::surface::save_png(&surface, path)?;
    }

    let mut stdout = std::io::stdout().lock();
    if cli.print {
        terminal::print_conversion(&mut stdout, &conv)?;
    } else if cli.wants_stdout() {
        stdout.write_all(session.text()?.as_bytes())?;
        stdout.flush()?;
    }
    Ok(())
}
