use arcade_engine::{
    BodyId, Contact, Ease, Repeat, SceneControl, TweenConfig, TweenProperty,
};
use tracing::info;

use super::level::ObstacleDef;

/// Back-and-forth x patrol starting at the spawn point.
pub(crate) fn patrol_tween(target: BodyId, obstacle: &ObstacleDef, ease: Ease) -> TweenConfig {
    TweenConfig {
        target,
        property: TweenProperty::X,
        to: obstacle.x + obstacle.patrol_distance,
        duration_ms: obstacle.patrol_duration_ms,
        ease,
        yoyo: true,
        repeat: Repeat::Forever,
    }
}

/// Ends the run on the first player/obstacle contact.
#[derive(Debug, Default)]
pub(crate) struct ObstacleHit {
    triggered: bool,
}

impl ObstacleHit {
    pub(crate) fn triggered(&self) -> bool {
        self.triggered
    }

    /// Returns `true` only for the contact that paused the scene.
    pub(crate) fn handle(&mut self, contact: Contact, control: &mut SceneControl) -> bool {
        if self.triggered {
            return false;
        }
        self.triggered = true;
        info!(
            collider = contact.collider.0,
            player = contact.a.0,
            obstacle = contact.b.0,
            "obstacle_hit"
        );
        control.pause();
        true
    }
}
