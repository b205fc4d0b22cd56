mod geometry;
mod input;
mod loop_runner;
pub mod physics;
mod rendering;
mod scene;
pub mod tween;

pub use geometry::{Rect, Vec2};
pub use input::{CursorKeys, InputAction, InputSnapshot};
pub use loop_runner::{run_app, AppError, LoopConfig, ASSET_CACHE_DIR, PAUSED_TITLE_SUFFIX};
pub use physics::{
    ArcadeConfig, ArcadeWorld, Body, BodyId, BodyKind, ColliderId, CollisionTarget, Contact,
    ContactReport, Faces, GroupId,
};
pub use rendering::Renderer;
pub use scene::{Scene, SceneControl, SceneRunner, SceneState, SceneWorld, TickOutcome};
pub use tween::{Ease, Repeat, TweenConfig, TweenId, TweenProperty, TweenState, UnknownEase};
