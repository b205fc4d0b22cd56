use crate::app::{Rect, Vec2};

pub const MAX_BODY_SPEED: f32 = 10_000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    Dynamic,
    Static,
}

/// Per-face contact flags, recomputed on every physics step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Faces {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl Faces {
    pub fn any(&self) -> bool {
        self.up || self.down || self.left || self.right
    }
}

#[derive(Debug, Clone)]
pub struct Body {
    id: BodyId,
    kind: BodyKind,
    position: Vec2,
    previous_position: Vec2,
    frame_size: Vec2,
    scale: f32,
    pub(crate) velocity: Vec2,
    bounce: Vec2,
    allow_gravity: bool,
    immovable: bool,
    collide_world_bounds: bool,
    pub(crate) touching: Faces,
    pub(crate) blocked: Faces,
    texture_key: String,
}

impl Body {
    pub(crate) fn new(
        id: BodyId,
        kind: BodyKind,
        position: Vec2,
        frame_size: Vec2,
        texture_key: String,
    ) -> Self {
        let is_static = kind == BodyKind::Static;
        Self {
            id,
            kind,
            position,
            previous_position: position,
            frame_size,
            scale: 1.0,
            velocity: Vec2::ZERO,
            bounce: Vec2::ZERO,
            allow_gravity: !is_static,
            immovable: is_static,
            collide_world_bounds: false,
            touching: Faces::default(),
            blocked: Faces::default(),
            texture_key,
        }
    }

    pub fn id(&self) -> BodyId {
        self.id
    }

    pub fn kind(&self) -> BodyKind {
        self.kind
    }

    pub fn is_static(&self) -> bool {
        self.kind == BodyKind::Static
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn previous_position(&self) -> Vec2 {
        self.previous_position
    }

    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    pub fn set_x(&mut self, x: f32) {
        self.position.x = x;
    }

    pub fn set_y(&mut self, y: f32) {
        self.position.y = y;
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    pub fn set_velocity(&mut self, velocity: Vec2) {
        self.velocity = velocity;
    }

    pub fn set_velocity_x(&mut self, vx: f32) {
        self.velocity.x = vx;
    }

    pub fn set_velocity_y(&mut self, vy: f32) {
        self.velocity.y = vy;
    }

    pub fn bounce(&self) -> Vec2 {
        self.bounce
    }

    /// Sets the same restitution on both axes.
    pub fn set_bounce(&mut self, bounce: f32) {
        self.bounce = Vec2::splat(bounce.max(0.0));
    }

    pub fn allows_gravity(&self) -> bool {
        self.allow_gravity
    }

    pub fn set_allow_gravity(&mut self, allow_gravity: bool) {
        self.allow_gravity = allow_gravity && !self.is_static();
    }

    pub fn is_immovable(&self) -> bool {
        self.immovable
    }

    pub fn set_immovable(&mut self, immovable: bool) {
        self.immovable = immovable || self.is_static();
    }

    pub fn collides_with_world_bounds(&self) -> bool {
        self.collide_world_bounds
    }

    pub fn set_collide_world_bounds(&mut self, enabled: bool) {
        self.collide_world_bounds = enabled;
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Rescales the body and refreshes its collision size from the frame.
    pub fn set_scale(&mut self, scale: f32) {
        self.scale = if scale.is_finite() && scale > 0.0 {
            scale
        } else {
            1.0
        };
    }

    pub fn size(&self) -> Vec2 {
        Vec2 {
            x: self.frame_size.x * self.scale,
            y: self.frame_size.y * self.scale,
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_center(self.position, self.size())
    }

    pub fn previous_bounds(&self) -> Rect {
        Rect::from_center(self.previous_position, self.size())
    }

    /// Faces in contact with another body during the last step.
    pub fn touching(&self) -> Faces {
        self.touching
    }

    /// Faces pressed against the world bounds during the last step.
    pub fn blocked(&self) -> Faces {
        self.blocked
    }

    pub fn texture_key(&self) -> &str {
        &self.texture_key
    }

    pub(crate) fn begin_step(&mut self) {
        self.previous_position = self.position;
        self.touching = Faces::default();
        self.blocked = Faces::default();
    }

    pub(crate) fn integrate(&mut self, gravity: Vec2, dt_seconds: f32) {
        if self.allow_gravity {
            self.velocity.x += gravity.x * dt_seconds;
            self.velocity.y += gravity.y * dt_seconds;
        }
        self.velocity.x = self.velocity.x.clamp(-MAX_BODY_SPEED, MAX_BODY_SPEED);
        self.velocity.y = self.velocity.y.clamp(-MAX_BODY_SPEED, MAX_BODY_SPEED);
        self.position.x += self.velocity.x * dt_seconds;
        self.position.y += self.velocity.y * dt_seconds;
    }

    pub(crate) fn clamp_to(&mut self, world: Rect) {
        let rect = self.bounds();
        if rect.left < world.left {
            self.position.x += world.left - rect.left;
            if self.velocity.x < 0.0 {
                self.velocity.x = -self.velocity.x * self.bounce.x;
            }
            self.blocked.left = true;
        } else if rect.right > world.right {
            self.position.x -= rect.right - world.right;
            if self.velocity.x > 0.0 {
                self.velocity.x = -self.velocity.x * self.bounce.x;
            }
            self.blocked.right = true;
        }

        if rect.top < world.top {
            self.position.y += world.top - rect.top;
            if self.velocity.y < 0.0 {
                self.velocity.y = -self.velocity.y * self.bounce.y;
            }
            self.blocked.up = true;
        } else if rect.bottom > world.bottom {
            self.position.y -= rect.bottom - world.bottom;
            if self.velocity.y > 0.0 {
                self.velocity.y = -self.velocity.y * self.bounce.y;
            }
            self.blocked.down = true;
        }
    }

    pub(crate) fn shift(&mut self, dx: f32, dy: f32) {
        self.position.x += dx;
        self.position.y += dy;
    }
}
