use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

pub mod app;
pub mod content;

pub use app::{
    run_app, AppError, ArcadeConfig, ArcadeWorld, Body, BodyId, BodyKind, ColliderId,
    CollisionTarget, Contact, ContactReport, CursorKeys, Ease, Faces, GroupId, InputAction,
    InputSnapshot, LoopConfig, Rect, Renderer, Repeat, Scene, SceneControl, SceneRunner,
    SceneState, SceneWorld, TickOutcome, TweenConfig, TweenId, TweenProperty, TweenState,
    UnknownEase, Vec2,
};
pub use content::{
    load_queue, AssetCache, AssetFetcher, AssetLoadError, AssetLoadReport, AssetQueue,
    AssetSource, FetchError, HttpFetcher, Texture, TextureStore,
};

pub const ROOT_ENV_VAR: &str = "PLATFORMER_ROOT";

#[derive(Debug, Clone)]
pub struct AppPaths {
    pub root: PathBuf,
    pub assets_dir: PathBuf,
    pub cache_dir: PathBuf,
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("{var} could not be read: {source}")]
    EnvVar {
        var: &'static str,
        #[source]
        source: env::VarError,
    },
    #[error("unable to locate the running executable: {0}")]
    CurrentExe(#[source] std::io::Error),
    #[error("executable {0} has no containing directory")]
    ExeHasNoParent(PathBuf),
    #[error("cache directory {path} could not be created: {source}")]
    CreateCacheDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(
        "PLATFORMER_ROOT={path} is not a platformer checkout \
(expected Cargo.toml next to an assets/ or crates/ directory)"
    )]
    InvalidEnvRoot { path: PathBuf },
    #[error(
        "no platformer checkout found above {start_dir}; \
export {env_var}=/path/to/platformer to point at one"
    )]
    RootNotFound {
        start_dir: PathBuf,
        env_var: &'static str,
    },
}

/// Resolves the checkout root and makes sure `cache/` exists beneath it.
pub fn resolve_app_paths() -> Result<AppPaths, StartupError> {
    let root = match root_from_env()? {
        Some(root) => root,
        None => root_above_executable()?,
    };
    let paths = AppPaths {
        assets_dir: root.join("assets"),
        cache_dir: root.join("cache"),
        root,
    };

    fs::create_dir_all(&paths.cache_dir).map_err(|source| StartupError::CreateCacheDir {
        path: paths.cache_dir.clone(),
        source,
    })?;
    Ok(paths)
}

fn root_from_env() -> Result<Option<PathBuf>, StartupError> {
    let value = match env::var(ROOT_ENV_VAR) {
        Ok(value) => value,
        Err(env::VarError::NotPresent) => return Ok(None),
        Err(source) => {
            return Err(StartupError::EnvVar {
                var: ROOT_ENV_VAR,
                source,
            })
        }
    };
    let root = canonical_or_raw(Path::new(&value));
    if looks_like_checkout(&root) {
        Ok(Some(root))
    } else {
        Err(StartupError::InvalidEnvRoot { path: root })
    }
}

fn root_above_executable() -> Result<PathBuf, StartupError> {
    let exe = env::current_exe().map_err(StartupError::CurrentExe)?;
    let Some(exe_dir) = exe.parent() else {
        return Err(StartupError::ExeHasNoParent(exe));
    };

    exe_dir
        .ancestors()
        .find(|candidate| looks_like_checkout(candidate))
        .map(canonical_or_raw)
        .ok_or_else(|| StartupError::RootNotFound {
            start_dir: canonical_or_raw(exe_dir),
            env_var: ROOT_ENV_VAR,
        })
}

fn looks_like_checkout(dir: &Path) -> bool {
    dir.join("Cargo.toml").is_file()
        && (dir.join("assets").is_dir() || dir.join("crates").is_dir())
}

fn canonical_or_raw(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}
