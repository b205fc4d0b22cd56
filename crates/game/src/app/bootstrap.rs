use arcade_engine::{resolve_app_paths, LoopConfig, Scene, StartupError};
use thiserror::Error;
use tracing::info;
use tracing_subscriber::EnvFilter;

use super::platformer::{load_level, LevelDef, LevelError, PlatformerScene, LEVEL_FILE_RELATIVE_PATH};

const WINDOW_TITLE: &str = "Platformer";

#[derive(Debug, Error)]
pub(crate) enum BootstrapError {
    #[error(transparent)]
    Startup(#[from] StartupError),
    #[error(transparent)]
    Level(#[from] LevelError),
}

pub(crate) struct AppWiring {
    pub(crate) config: LoopConfig,
    pub(crate) scene: Box<dyn Scene>,
}

pub(crate) fn build_app() -> Result<AppWiring, BootstrapError> {
    init_tracing();
    info!("=== Platformer Startup ===");

    let paths = resolve_app_paths()?;
    let level = load_level(&paths.assets_dir.join(LEVEL_FILE_RELATIVE_PATH))?;
    let config = loop_config_for(&level);
    info!(
        width = config.window_width,
        height = config.window_height,
        gravity_y = config.world.gravity.y,
        debug = config.world.debug,
        "level_ready"
    );

    Ok(AppWiring {
        config,
        scene: Box::new(PlatformerScene::new(level)),
    })
}

fn loop_config_for(level: &LevelDef) -> LoopConfig {
    let world = level.arcade_config();
    LoopConfig {
        window_title: WINDOW_TITLE.to_string(),
        window_width: world.bounds.width().round() as u32,
        window_height: world.bounds.height().round() as u32,
        world,
        ..LoopConfig::default()
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_names(true)
        .compact()
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loop_config_sizes_window_to_level_world() {
        let mut level = LevelDef::default();
        level.world.width = 1024.0;
        level.world.height = 576.0;
        level.world.debug = true;

        let config = loop_config_for(&level);
        assert_eq!((config.window_width, config.window_height), (1024, 576));
        assert_eq!(config.world.bounds.right, 1024.0);
        assert!(config.world.debug);
        assert_eq!(config.window_title, WINDOW_TITLE);
        assert_eq!(config.target_tps, 60);
    }
}
