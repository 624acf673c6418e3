use std::path::Path;

use af_core::config::ConversionConfig;
use anyhow::Result;
use notify::{Event, EventKind, RecursiveMode, Watcher};

/// Surveille le fichier config et envoie chaque version valide sur `tx`.
///
/// Retourne le Watcher (doit rester vivant tant que l'app tourne).
/// An unreadable or invalid file is logged and skipped: the receiver keeps
/// working with the last good config.
///
/// # Errors
/// Returns an error if the watcher cannot be created or the path cannot be watched.
///
/// # Example
/// ```no_run
/// use af_app::hotreload::spawn_config_watcher;
/// use std::path::Path;
///
/// let (tx, rx) = flume::unbounded();
/// let _watcher = spawn_config_watcher(Path::new("config/default.toml"), tx).unwrap();
/// for config in rx.iter() {
///     println!("nouvelle résolution : {}", config.resolution_factor);
/// }
/// ```
pub fn spawn_config_watcher(
    config_path: &Path,
    tx: flume::Sender<ConversionConfig>,
) -> Result<impl Watcher + use<>> {
    let path = config_path.to_path_buf();

    let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
        if let Ok(event) = res {
            if matches!(event.kind, EventKind::Modify(_)) {
                match af_core::config::load_config(&path) {
                    Ok(new_config) => {
                        log::info!("Config rechargée depuis {}", path.display());
                        if tx.send(new_config).is_err() {
                            log::debug!("Récepteur de config fermé");
                        }
                    }
                    Err(e) => {
                        log::warn!("Erreur de rechargement config : {e:#}");
                    }
                }
            }
        }
    })?;

    watcher.watch(config_path, RecursiveMode::NonRecursive)?;
    Ok(watcher)
}
