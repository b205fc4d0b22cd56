use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use arcade_engine::{ArcadeConfig, Ease, Rect, UnknownEase, Vec2};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

pub(crate) const LEVEL_FILE_RELATIVE_PATH: &str = "base/levels/level.json";

const GROUND_URL: &str = "https://labs.phaser.io/assets/platform.png";
const PLAYER_URL: &str = "https://labs.phaser.io/assets/sprites/phaser-dude.png";
// Stand-in art until a dedicated spike image exists.
const SPIKE_URL: &str = "https://labs.phaser.io/assets/sprites/platform.png";

#[derive(Debug, Error)]
pub(crate) enum LevelError {
    #[error("failed to read level file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("parse level json at {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid level at {path}: {message}")]
    Invalid { path: String, message: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct LevelDef {
    pub world: WorldDef,
    pub assets: Vec<AssetDef>,
    pub platforms: Vec<PlatformDef>,
    pub player: PlayerDef,
    pub obstacle: ObstacleDef,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct WorldDef {
    pub width: f32,
    pub height: f32,
    pub gravity_y: f32,
    pub debug: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct AssetDef {
    pub key: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct PlatformDef {
    pub x: f32,
    pub y: f32,
    pub texture: String,
    #[serde(default = "unit_scale")]
    pub scale: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct PlayerDef {
    pub x: f32,
    pub y: f32,
    pub texture: String,
    pub bounce: f32,
    pub collide_world_bounds: bool,
    pub run_speed: f32,
    pub jump_speed: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct ObstacleDef {
    pub x: f32,
    pub y: f32,
    pub texture: String,
    pub patrol_distance: f32,
    pub patrol_duration_ms: f32,
    pub ease: String,
}

fn unit_scale() -> f32 {
    1.0
}

impl Default for LevelDef {
    fn default() -> Self {
        Self {
            world: WorldDef::default(),
            assets: vec![
                AssetDef::new("ground", GROUND_URL),
                AssetDef::new("player", PLAYER_URL),
                AssetDef::new("spike", SPIKE_URL),
            ],
            platforms: vec![PlatformDef {
                x: 400.0,
                y: 580.0,
                texture: "ground".to_string(),
                scale: 2.0,
            }],
            player: PlayerDef::default(),
            obstacle: ObstacleDef::default(),
        }
    }
}

impl Default for WorldDef {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            gravity_y: 300.0,
            debug: false,
        }
    }
}

impl Default for PlayerDef {
    fn default() -> Self {
        Self {
            x: 100.0,
            y: 450.0,
            texture: "player".to_string(),
            bounce: 0.2,
            collide_world_bounds: true,
            run_speed: 160.0,
            jump_speed: 330.0,
        }
    }
}

impl Default for ObstacleDef {
    fn default() -> Self {
        Self {
            x: 400.0,
            y: 500.0,
            texture: "spike".to_string(),
            patrol_distance: 200.0,
            patrol_duration_ms: 2000.0,
            ease: "Linear".to_string(),
        }
    }
}

impl AssetDef {
    fn new(key: &str, url: &str) -> Self {
        Self {
            key: key.to_string(),
            url: url.to_string(),
        }
    }
}

impl PlayerDef {
    pub(crate) fn spawn(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

impl ObstacleDef {
    pub(crate) fn spawn(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub(crate) fn ease(&self) -> Result<Ease, UnknownEase> {
        self.ease.parse()
    }
}

impl LevelDef {
    pub(crate) fn from_json_str(raw: &str) -> Result<Self, LevelError> {
        let mut deserializer = serde_json::Deserializer::from_str(raw);
        let level: LevelDef = serde_path_to_error::deserialize(&mut deserializer).map_err(
            |error| {
                let path = error.path().to_string();
                LevelError::Parse {
                    path,
                    source: error.into_inner(),
                }
            },
        )?;
        level.validate()?;
        Ok(level)
    }

    pub(crate) fn arcade_config(&self) -> ArcadeConfig {
        ArcadeConfig {
            gravity: Vec2::new(0.0, self.world.gravity_y),
            bounds: Rect {
                left: 0.0,
                top: 0.0,
                right: self.world.width,
                bottom: self.world.height,
            },
            debug: self.world.debug,
        }
    }

    pub(crate) fn validate(&self) -> Result<(), LevelError> {
        require_positive("world.width", self.world.width)?;
        require_positive("world.height", self.world.height)?;
        require_finite("world.gravity_y", self.world.gravity_y)?;

        for (index, asset) in self.assets.iter().enumerate() {
            if self.assets[..index].iter().any(|prior| prior.key == asset.key) {
                return Err(invalid(
                    format!("assets[{index}].key"),
                    format!("duplicate asset key '{}'", asset.key),
                ));
            }
            if asset.url.trim().is_empty() {
                return Err(invalid(format!("assets[{index}].url"), "must not be empty"));
            }
        }

        for (index, platform) in self.platforms.iter().enumerate() {
            require_finite(&format!("platforms[{index}].x"), platform.x)?;
            require_finite(&format!("platforms[{index}].y"), platform.y)?;
            require_positive(&format!("platforms[{index}].scale"), platform.scale)?;
            self.require_declared_texture(&format!("platforms[{index}].texture"), &platform.texture)?;
        }

        require_finite("player.x", self.player.x)?;
        require_finite("player.y", self.player.y)?;
        require_non_negative("player.bounce", self.player.bounce)?;
        require_non_negative("player.run_speed", self.player.run_speed)?;
        require_non_negative("player.jump_speed", self.player.jump_speed)?;
        self.require_declared_texture("player.texture", &self.player.texture)?;

        require_finite("obstacle.x", self.obstacle.x)?;
        require_finite("obstacle.y", self.obstacle.y)?;
        require_finite("obstacle.patrol_distance", self.obstacle.patrol_distance)?;
        require_positive("obstacle.patrol_duration_ms", self.obstacle.patrol_duration_ms)?;
        self.require_declared_texture("obstacle.texture", &self.obstacle.texture)?;
        self.obstacle
            .ease()
            .map_err(|error| invalid("obstacle.ease", error.to_string()))?;

        Ok(())
    }

    fn require_declared_texture(&self, path: &str, key: &str) -> Result<(), LevelError> {
        if self.assets.iter().any(|asset| asset.key == key) {
            Ok(())
        } else {
            Err(invalid(
                path,
                format!("texture '{key}' is not declared in assets"),
            ))
        }
    }
}

/// Reads the level at `path`, falling back to the built-in level when the file is absent.
pub(crate) fn load_level(path: &Path) -> Result<LevelDef, LevelError> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(source) if source.kind() == io::ErrorKind::NotFound => {
            info!(path = %path.display(), "level_file_missing_using_defaults");
            return Ok(LevelDef::default());
        }
        Err(source) => {
            return Err(LevelError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };
    let level = LevelDef::from_json_str(&raw)?;
    info!(
        path = %path.display(),
        platforms = level.platforms.len(),
        assets = level.assets.len(),
        "level_loaded"
    );
    Ok(level)
}

fn invalid(path: impl Into<String>, message: impl Into<String>) -> LevelError {
    LevelError::Invalid {
        path: path.into(),
        message: message.into(),
    }
}

fn require_finite(path: &str, value: f32) -> Result<(), LevelError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(invalid(path, format!("expected finite number, got {value}")))
    }
}

fn require_non_negative(path: &str, value: f32) -> Result<(), LevelError> {
    require_finite(path, value)?;
    if value >= 0.0 {
        Ok(())
    } else {
        Err(invalid(path, format!("expected >= 0, got {value}")))
    }
}

fn require_positive(path: &str, value: f32) -> Result<(), LevelError> {
    require_finite(path, value)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(invalid(path, format!("expected > 0, got {value}")))
    }
}
