mod controls;
mod level;
mod obstacle;

use arcade_engine::{
    AssetQueue, BodyId, ColliderId, Contact, ContactReport, Ease, GroupId, InputSnapshot, Scene,
    SceneControl, SceneWorld, Vec2,
};
use tracing::{info, warn};

use self::controls::{apply_cursor_keys, MovementTuning};
use self::obstacle::{patrol_tween, ObstacleHit};

pub(crate) use self::level::{load_level, LevelDef, LevelError, LEVEL_FILE_RELATIVE_PATH};

#[derive(Debug, Clone, Copy)]
struct SceneIds {
    player: BodyId,
    obstacle: BodyId,
    obstacle_collider: ColliderId,
}

pub(crate) struct PlatformerScene {
    level: LevelDef,
    tuning: MovementTuning,
    ids: Option<SceneIds>,
    obstacle_hit: ObstacleHit,
}

impl PlatformerScene {
    pub(crate) fn new(level: LevelDef) -> Self {
        let tuning = MovementTuning {
            run_speed: level.player.run_speed,
            jump_speed: level.player.jump_speed,
        };
        Self {
            level,
            tuning,
            ids: None,
            obstacle_hit: ObstacleHit::default(),
        }
    }

    fn spawn_platforms(&self, world: &mut SceneWorld) -> GroupId {
        let platforms = world.add_static_group();
        for platform in &self.level.platforms {
            let id = world.add_static_image(
                platforms,
                Vec2::new(platform.x, platform.y),
                &platform.texture,
            );
            if let Some(body) = world.body_mut(id) {
                body.set_scale(platform.scale);
            }
        }
        platforms
    }

    fn spawn_player(&self, world: &mut SceneWorld) -> BodyId {
        let def = &self.level.player;
        let player = world.add_sprite(def.spawn(), &def.texture);
        if let Some(body) = world.body_mut(player) {
            body.set_bounce(def.bounce);
            body.set_collide_world_bounds(def.collide_world_bounds);
        }
        player
    }

    fn spawn_obstacle(&self, world: &mut SceneWorld) -> BodyId {
        let def = &self.level.obstacle;
        let obstacle = world.add_sprite(def.spawn(), &def.texture);
        if let Some(body) = world.body_mut(obstacle) {
            body.set_immovable(true);
            body.set_allow_gravity(false);
        }
        obstacle
    }

    fn patrol_ease(&self) -> Ease {
        self.level.obstacle.ease().unwrap_or_else(|error| {
            warn!(error = %error, "obstacle_ease_invalid_using_linear");
            Ease::Linear
        })
    }
}

impl Scene for PlatformerScene {
    fn preload(&mut self, assets: &mut AssetQueue) {
        for asset in &self.level.assets {
            assets.image(asset.key.as_str(), asset.url.as_str());
        }
    }

    fn create(&mut self, world: &mut SceneWorld) {
        let platforms = self.spawn_platforms(world);
        let player = self.spawn_player(world);
        let obstacle = self.spawn_obstacle(world);

        world.add_collider(player, platforms, ContactReport::Silent);
        let obstacle_collider = world.add_collider(player, obstacle, ContactReport::Notify);
        let patrol = world.add_tween(patrol_tween(
            obstacle,
            &self.level.obstacle,
            self.patrol_ease(),
        ));
        if patrol.is_none() {
            warn!(obstacle = obstacle.0, "obstacle_patrol_not_started");
        }

        info!(
            player = player.0,
            obstacle = obstacle.0,
            platforms = world.physics().group_members(platforms).len(),
            "platformer_created"
        );
        self.ids = Some(SceneIds {
            player,
            obstacle,
            obstacle_collider,
        });
    }

    fn update(
        &mut self,
        _fixed_dt_seconds: f32,
        input: &InputSnapshot,
        world: &mut SceneWorld,
        _control: &mut SceneControl,
    ) {
        let Some(ids) = self.ids else {
            return;
        };
        let Some(player) = world.body_mut(ids.player) else {
            return;
        };
        apply_cursor_keys(input.cursor_keys(), self.tuning, player);
    }

    fn on_collision(
        &mut self,
        contact: Contact,
        _world: &mut SceneWorld,
        control: &mut SceneControl,
    ) {
        let Some(ids) = self.ids else {
            return;
        };
        if contact.collider == ids.obstacle_collider && contact.b == ids.obstacle {
            self.obstacle_hit.handle(contact, control);
        }
    }

    fn shutdown(&mut self, _world: &mut SceneWorld) {
        info!(
            obstacle_hit = self.obstacle_hit.triggered(),
            "platformer_shutdown"
        );
    }
}

#[cfg(test)]
mod tests {
    include!("tests.rs");
}
