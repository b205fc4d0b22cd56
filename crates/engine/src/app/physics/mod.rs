mod body;
mod separation;

pub use body::{Body, BodyId, BodyKind, Faces, MAX_BODY_SPEED};

use super::{Rect, Vec2};

pub const DEFAULT_GRAVITY_Y: f32 = 300.0;
pub const DEFAULT_WORLD_WIDTH: f32 = 800.0;
pub const DEFAULT_WORLD_HEIGHT: f32 = 600.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcadeConfig {
    pub gravity: Vec2,
    pub bounds: Rect,
    pub debug: bool,
}

impl Default for ArcadeConfig {
    fn default() -> Self {
        Self {
            gravity: Vec2::new(0.0, DEFAULT_GRAVITY_Y),
            bounds: Rect {
                left: 0.0,
                top: 0.0,
                right: DEFAULT_WORLD_WIDTH,
                bottom: DEFAULT_WORLD_HEIGHT,
            },
            debug: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GroupId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColliderId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionTarget {
    Body(BodyId),
    Group(GroupId),
}

impl From<BodyId> for CollisionTarget {
    fn from(id: BodyId) -> Self {
        CollisionTarget::Body(id)
    }
}

impl From<GroupId> for CollisionTarget {
    fn from(id: GroupId) -> Self {
        CollisionTarget::Group(id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactReport {
    Silent,
    Notify,
}

/// A collision produced by a collider registered with [`ContactReport::Notify`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Contact {
    pub collider: ColliderId,
    pub a: BodyId,
    pub b: BodyId,
}

#[derive(Debug, Clone, Copy)]
struct Collider {
    id: ColliderId,
    a: CollisionTarget,
    b: CollisionTarget,
    report: ContactReport,
}

#[derive(Debug, Default)]
pub struct ArcadeWorld {
    config: ArcadeConfig,
    bodies: Vec<Body>,
    groups: Vec<Vec<BodyId>>,
    colliders: Vec<Collider>,
}

impl ArcadeWorld {
    pub fn new(config: ArcadeConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &ArcadeConfig {
        &self.config
    }

    pub fn add_body(
        &mut self,
        kind: BodyKind,
        position: Vec2,
        frame_size: Vec2,
        texture_key: &str,
    ) -> BodyId {
        let id = BodyId(self.bodies.len() as u32);
        self.bodies.push(Body::new(
            id,
            kind,
            position,
            frame_size,
            texture_key.to_string(),
        ));
        id
    }

    pub fn create_group(&mut self) -> GroupId {
        let id = GroupId(self.groups.len() as u32);
        self.groups.push(Vec::new());
        id
    }

    pub fn add_to_group(&mut self, group: GroupId, body: BodyId) -> bool {
        if self.body(body).is_none() {
            return false;
        }
        match self.groups.get_mut(group.0 as usize) {
            Some(members) if !members.contains(&body) => {
                members.push(body);
                true
            }
            _ => false,
        }
    }

    pub fn group_members(&self, group: GroupId) -> &[BodyId] {
        self.groups
            .get(group.0 as usize)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn add_collider(
        &mut self,
        a: impl Into<CollisionTarget>,
        b: impl Into<CollisionTarget>,
        report: ContactReport,
    ) -> ColliderId {
        let id = ColliderId(self.colliders.len() as u32);
        self.colliders.push(Collider {
            id,
            a: a.into(),
            b: b.into(),
            report,
        });
        id
    }

    pub fn body(&self, id: BodyId) -> Option<&Body> {
        self.bodies.get(id.0 as usize)
    }

    pub fn body_mut(&mut self, id: BodyId) -> Option<&mut Body> {
        self.bodies.get_mut(id.0 as usize)
    }

    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Advances every dynamic body by `dt_seconds` and resolves colliders in
    /// registration order. Contacts are returned for notifying colliders only.
    pub fn step(&mut self, dt_seconds: f32) -> Vec<Contact> {
        let mut contacts = Vec::new();
        if !(dt_seconds.is_finite() && dt_seconds > 0.0) {
            return contacts;
        }

        let gravity = self.config.gravity;
        let bounds = self.config.bounds;
        for body in &mut self.bodies {
            body.begin_step();
            if body.is_static() {
                continue;
            }
            body.integrate(gravity, dt_seconds);
            if body.collides_with_world_bounds() {
                body.clamp_to(bounds);
            }
        }

        for collider_index in 0..self.colliders.len() {
            let collider = self.colliders[collider_index];
            let lhs = self.expand_target(collider.a);
            let rhs = self.expand_target(collider.b);
            for &a in &lhs {
                for &b in &rhs {
                    let Some((body_a, body_b)) = pair_mut(&mut self.bodies, a, b) else {
                        continue;
                    };
                    if separation::separate(body_a, body_b)
                        && collider.report == ContactReport::Notify
                    {
                        contacts.push(Contact {
                            collider: collider.id,
                            a,
                            b,
                        });
                    }
                }
            }
        }

        contacts
    }

    fn expand_target(&self, target: CollisionTarget) -> Vec<BodyId> {
        match target {
            CollisionTarget::Body(id) => vec![id],
            CollisionTarget::Group(group) => self.group_members(group).to_vec(),
        }
    }
}

fn pair_mut(bodies: &mut [Body], a: BodyId, b: BodyId) -> Option<(&mut Body, &mut Body)> {
    let (ia, ib) = (a.0 as usize, b.0 as usize);
    if ia == ib || ia >= bodies.len() || ib >= bodies.len() {
        return None;
    }
    if ia < ib {
        let (head, tail) = bodies.split_at_mut(ib);
        Some((&mut head[ia], &mut tail[0]))
    } else {
        let (head, tail) = bodies.split_at_mut(ia);
        Some((&mut tail[0], &mut head[ib]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    fn world_with_ground() -> (ArcadeWorld, GroupId, BodyId) {
        let mut world = ArcadeWorld::new(ArcadeConfig::default());
        let platforms = world.create_group();
        let ground = world.add_body(
            BodyKind::Static,
            Vec2::new(400.0, 580.0),
            Vec2::new(400.0, 32.0),
            "ground",
        );
        world.body_mut(ground).expect("ground").set_scale(2.0);
        assert!(world.add_to_group(platforms, ground));
        (world, platforms, ground)
    }

    #[test]
    fn dynamic_body_accelerates_under_gravity() {
        let mut world = ArcadeWorld::new(ArcadeConfig::default());
        let id = world.add_body(
            BodyKind::Dynamic,
            Vec2::new(100.0, 100.0),
            Vec2::splat(10.0),
            "ball",
        );

        world.step(0.5);

        let body = world.body(id).expect("body");
        assert!((body.velocity().y - 150.0).abs() < 0.0001);
        assert!((body.position().y - 175.0).abs() < 0.0001);
    }

    #[test]
    fn gravity_exempt_body_holds_still() {
        let mut world = ArcadeWorld::new(ArcadeConfig::default());
        let id = world.add_body(
            BodyKind::Dynamic,
            Vec2::new(400.0, 500.0),
            Vec2::splat(10.0),
            "spike",
        );
        world.body_mut(id).expect("body").set_allow_gravity(false);

        for _ in 0..30 {
            world.step(DT);
        }

        assert_eq!(world.body(id).expect("body").position(), Vec2::new(400.0, 500.0));
    }

    #[test]
    fn static_body_ignores_gravity_and_overrides() {
        let (mut world, _, ground) = world_with_ground();
        let body = world.body_mut(ground).expect("ground");
        body.set_allow_gravity(true);
        body.set_immovable(false);
        body.set_velocity_y(50.0);

        world.step(DT);

        let body = world.body(ground).expect("ground");
        assert!(!body.allows_gravity());
        assert!(body.is_immovable());
        assert_eq!(body.position(), Vec2::new(400.0, 580.0));
        assert_eq!(body.size(), Vec2::new(800.0, 64.0));
    }

    #[test]
    fn falling_body_lands_on_static_group_and_stays_grounded() {
        let (mut world, platforms, _) = world_with_ground();
        let player = world.add_body(
            BodyKind::Dynamic,
            Vec2::new(100.0, 450.0),
            Vec2::new(27.0, 40.0),
            "player",
        );
        world.body_mut(player).expect("player").set_bounce(0.2);
        world.add_collider(player, platforms, ContactReport::Silent);

        for _ in 0..240 {
            world.step(DT);
        }

        let body = world.body(player).expect("player");
        assert!(body.touching().down);
        assert!((body.bounds().bottom - 548.0).abs() < 0.5);
        assert!(body.velocity().y.abs() < 10.0);
    }

    #[test]
    fn touching_flags_clear_once_contact_ends() {
        let (mut world, platforms, _) = world_with_ground();
        let player = world.add_body(
            BodyKind::Dynamic,
            Vec2::new(100.0, 528.5),
            Vec2::new(27.0, 40.0),
            "player",
        );
        world.add_collider(player, platforms, ContactReport::Silent);

        world.step(DT);
        assert!(world.body(player).expect("player").touching().down);

        world.body_mut(player).expect("player").set_velocity_y(-330.0);
        world.step(DT);
        assert!(!world.body(player).expect("player").touching().down);
    }

    #[test]
    fn world_bounds_clamp_and_flag_blocked_faces() {
        let mut world = ArcadeWorld::new(ArcadeConfig::default());
        let id = world.add_body(
            BodyKind::Dynamic,
            Vec2::new(5.0, 595.0),
            Vec2::splat(20.0),
            "player",
        );
        let body = world.body_mut(id).expect("body");
        body.set_collide_world_bounds(true);
        body.set_bounce(0.5);
        body.set_velocity(Vec2::new(-60.0, 60.0));

        world.step(DT);

        let body = world.body(id).expect("body");
        assert!(body.blocked().left);
        assert!(body.blocked().down);
        assert!(!body.touching().any());
        assert!((body.bounds().left - 0.0).abs() < 0.0001);
        assert!((body.bounds().bottom - 600.0).abs() < 0.0001);
        assert!(body.velocity().x > 0.0);
        assert!(body.velocity().y < 0.0);
    }

    #[test]
    fn only_notifying_colliders_emit_contacts() {
        let (mut world, platforms, _) = world_with_ground();
        let player = world.add_body(
            BodyKind::Dynamic,
            Vec2::new(300.0, 520.0),
            Vec2::new(27.0, 40.0),
            "player",
        );
        let spike = world.add_body(
            BodyKind::Dynamic,
            Vec2::new(320.0, 520.0),
            Vec2::new(32.0, 32.0),
            "spike",
        );
        let spike_body = world.body_mut(spike).expect("spike");
        spike_body.set_immovable(true);
        spike_body.set_allow_gravity(false);
        world.add_collider(player, platforms, ContactReport::Silent);
        let hit = world.add_collider(player, spike, ContactReport::Notify);

        let contacts = world.step(DT);

        assert_eq!(
            contacts,
            vec![Contact {
                collider: hit,
                a: player,
                b: spike,
            }]
        );
        assert_eq!(
            world.body(spike).expect("spike").position(),
            Vec2::new(320.0, 520.0)
        );
    }

    #[test]
    fn non_positive_dt_is_ignored() {
        let mut world = ArcadeWorld::new(ArcadeConfig::default());
        let id = world.add_body(BodyKind::Dynamic, Vec2::ZERO, Vec2::splat(1.0), "dot");
        assert!(world.step(0.0).is_empty());
        assert!(world.step(f32::NAN).is_empty());
        assert_eq!(world.body(id).expect("body").velocity(), Vec2::ZERO);
    }

    #[test]
    fn group_membership_rejects_unknown_and_duplicate_bodies() {
        let (mut world, platforms, ground) = world_with_ground();
        assert!(!world.add_to_group(platforms, ground));
        assert!(!world.add_to_group(platforms, BodyId(99)));
        assert_eq!(world.group_members(platforms), &[ground]);
        assert!(world.group_members(GroupId(7)).is_empty());
    }
}
