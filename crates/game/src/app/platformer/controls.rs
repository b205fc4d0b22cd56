use arcade_engine::{Body, CursorKeys};

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct MovementTuning {
    pub run_speed: f32,
    pub jump_speed: f32,
}

impl Default for MovementTuning {
    fn default() -> Self {
        Self {
            run_speed: 160.0,
            jump_speed: 330.0,
        }
    }
}

/// Velocity changes for one tick. `vy` is `None` when gravity keeps control.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Steering {
    pub vx: f32,
    pub vy: Option<f32>,
}

/// Left wins over right; a jump needs ground contact.
pub(crate) fn steer(keys: CursorKeys, grounded: bool, tuning: MovementTuning) -> Steering {
    let vx = if keys.left {
        -tuning.run_speed
    } else if keys.right {
        tuning.run_speed
    } else {
        0.0
    };
    let vy = (keys.up && grounded).then_some(-tuning.jump_speed);
    Steering { vx, vy }
}

pub(crate) fn apply_cursor_keys(keys: CursorKeys, tuning: MovementTuning, player: &mut Body) {
    let steering = steer(keys, player.touching().down, tuning);
    player.set_velocity_x(steering.vx);
    if let Some(vy) = steering.vy {
        player.set_velocity_y(vy);
    }
}
