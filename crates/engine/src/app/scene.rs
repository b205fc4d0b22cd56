use tracing::{info, warn};

use super::input::InputSnapshot;
use super::physics::{
    ArcadeConfig, ArcadeWorld, Body, BodyId, BodyKind, ColliderId, CollisionTarget, Contact,
    ContactReport, GroupId,
};
use super::tween::{TweenConfig, TweenId, TweenManager};
use super::Vec2;
use crate::content::{AssetQueue, TextureStore};

/// Lifecycle callbacks driven by [`SceneRunner`]: `preload` once, `create`
/// once, then `update` every tick until the scene is paused.
pub trait Scene {
    fn preload(&mut self, assets: &mut AssetQueue);
    fn create(&mut self, world: &mut SceneWorld);
    fn update(
        &mut self,
        fixed_dt_seconds: f32,
        input: &InputSnapshot,
        world: &mut SceneWorld,
        control: &mut SceneControl,
    );
    /// Called for every contact reported by a notifying collider.
    fn on_collision(
        &mut self,
        _contact: Contact,
        _world: &mut SceneWorld,
        _control: &mut SceneControl,
    ) {
    }
    fn shutdown(&mut self, _world: &mut SceneWorld) {}
}

/// Capabilities a scene may exercise on its own scheduling.
#[derive(Debug, Default)]
pub struct SceneControl {
    pause_requested: bool,
}

impl SceneControl {
    /// Stops further ticks from the next tick onward.
    pub fn pause(&mut self) {
        self.pause_requested = true;
    }

    pub fn pause_requested(&self) -> bool {
        self.pause_requested
    }
}

#[derive(Debug, Default)]
pub struct SceneWorld {
    physics: ArcadeWorld,
    tweens: TweenManager,
    textures: TextureStore,
}

impl SceneWorld {
    pub fn new(config: ArcadeConfig, textures: TextureStore) -> Self {
        Self {
            physics: ArcadeWorld::new(config),
            tweens: TweenManager::default(),
            textures,
        }
    }

    pub fn physics(&self) -> &ArcadeWorld {
        &self.physics
    }

    pub fn physics_mut(&mut self) -> &mut ArcadeWorld {
        &mut self.physics
    }

    pub fn tweens(&self) -> &TweenManager {
        &self.tweens
    }

    pub fn textures(&self) -> &TextureStore {
        &self.textures
    }

    pub fn add_static_group(&mut self) -> GroupId {
        self.physics.create_group()
    }

    /// Adds an immovable, gravity-free body sized from its texture to `group`.
    pub fn add_static_image(&mut self, group: GroupId, position: Vec2, texture_key: &str) -> BodyId {
        let frame_size = self.textures.frame_size(texture_key);
        let id = self
            .physics
            .add_body(BodyKind::Static, position, frame_size, texture_key);
        self.physics.add_to_group(group, id);
        id
    }

    /// Adds a dynamic body sized from its texture.
    pub fn add_sprite(&mut self, position: Vec2, texture_key: &str) -> BodyId {
        let frame_size = self.textures.frame_size(texture_key);
        self.physics
            .add_body(BodyKind::Dynamic, position, frame_size, texture_key)
    }

    pub fn body(&self, id: BodyId) -> Option<&Body> {
        self.physics.body(id)
    }

    pub fn body_mut(&mut self, id: BodyId) -> Option<&mut Body> {
        self.physics.body_mut(id)
    }

    pub fn add_collider(
        &mut self,
        a: impl Into<CollisionTarget>,
        b: impl Into<CollisionTarget>,
        report: ContactReport,
    ) -> ColliderId {
        self.physics.add_collider(a, b, report)
    }

    pub fn add_tween(&mut self, config: TweenConfig) -> Option<TweenId> {
        self.tweens.add(config, &self.physics)
    }

    pub(crate) fn advance(&mut self, dt_seconds: f32) -> Vec<Contact> {
        self.tweens.advance(dt_seconds, &mut self.physics);
        self.physics.step(dt_seconds)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneState {
    Booting,
    Running,
    Paused,
    Shutdown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Skipped,
    Ran,
    Paused,
}

pub struct SceneRunner {
    scene: Box<dyn Scene>,
    world: SceneWorld,
    config: ArcadeConfig,
    state: SceneState,
    tick_count: u64,
}

impl SceneRunner {
    pub fn new(scene: Box<dyn Scene>, config: ArcadeConfig) -> Self {
        Self {
            scene,
            world: SceneWorld::new(config, TextureStore::default()),
            config,
            state: SceneState::Booting,
            tick_count: 0,
        }
    }

    pub fn state(&self) -> SceneState {
        self.state
    }

    pub fn world(&self) -> &SceneWorld {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut SceneWorld {
        &mut self.world
    }

    /// Number of ticks that reached `Scene::update`.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn preload(&mut self) -> AssetQueue {
        let mut queue = AssetQueue::new();
        self.scene.preload(&mut queue);
        queue
    }

    /// Builds the world with the loaded textures and runs `Scene::create`.
    /// Returns `false` when the scene was already created.
    pub fn create(&mut self, textures: TextureStore) -> bool {
        if self.state != SceneState::Booting {
            warn!(state = ?self.state, "scene_create_ignored");
            return false;
        }
        self.world = SceneWorld::new(self.config, textures);
        self.scene.create(&mut self.world);
        self.state = SceneState::Running;
        info!(
            body_count = self.world.physics().body_count(),
            tween_count = self.world.tweens().len(),
            "scene_created"
        );
        true
    }

    pub fn tick(&mut self, fixed_dt_seconds: f32, input: &InputSnapshot) -> TickOutcome {
        if self.state != SceneState::Running {
            return TickOutcome::Skipped;
        }

        let mut control = SceneControl::default();
        self.scene
            .update(fixed_dt_seconds, input, &mut self.world, &mut control);
        let contacts = self.world.advance(fixed_dt_seconds);
        for contact in contacts {
            self.scene
                .on_collision(contact, &mut self.world, &mut control);
        }
        self.tick_count = self.tick_count.saturating_add(1);

        if control.pause_requested() {
            self.state = SceneState::Paused;
            info!(tick = self.tick_count, "scene_paused");
            return TickOutcome::Paused;
        }
        TickOutcome::Ran
    }

    pub fn shutdown(&mut self) {
        if matches!(self.state, SceneState::Running | SceneState::Paused) {
            self.scene.shutdown(&mut self.world);
        }
        self.state = SceneState::Shutdown;
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::app::InputAction;
    use crate::content::Texture;

    #[derive(Debug, Default)]
    struct Calls {
        preload: usize,
        create: usize,
        update: usize,
        collisions: usize,
        shutdown: usize,
    }

    /// Drops a box onto a spike; the spike collider pauses the scene.
    struct BoxOnSpikeScene {
        calls: Rc<RefCell<Calls>>,
        pause_from_update_on_quit: bool,
        hit_collider: Option<ColliderId>,
    }

    impl BoxOnSpikeScene {
        fn new(calls: Rc<RefCell<Calls>>) -> Self {
            Self {
                calls,
                pause_from_update_on_quit: false,
                hit_collider: None,
            }
        }
    }

    impl Scene for BoxOnSpikeScene {
        fn preload(&mut self, assets: &mut AssetQueue) {
            self.calls.borrow_mut().preload += 1;
            assets.image("box", "https://example.test/box.png");
        }

        fn create(&mut self, world: &mut SceneWorld) {
            self.calls.borrow_mut().create += 1;
            let floor = world.add_static_group();
            world.add_static_image(floor, Vec2::new(100.0, 200.0), "spike");
            let falling = world.add_sprite(Vec2::new(100.0, 100.0), "box");
            self.hit_collider = Some(world.add_collider(falling, floor, ContactReport::Notify));
        }

        fn update(
            &mut self,
            _fixed_dt_seconds: f32,
            input: &InputSnapshot,
            _world: &mut SceneWorld,
            control: &mut SceneControl,
        ) {
            self.calls.borrow_mut().update += 1;
            if self.pause_from_update_on_quit && input.is_down(InputAction::Quit) {
                control.pause();
            }
        }

        fn on_collision(
            &mut self,
            contact: Contact,
            _world: &mut SceneWorld,
            control: &mut SceneControl,
        ) {
            if Some(contact.collider) == self.hit_collider {
                self.calls.borrow_mut().collisions += 1;
                control.pause();
            }
        }

        fn shutdown(&mut self, _world: &mut SceneWorld) {
            self.calls.borrow_mut().shutdown += 1;
        }
    }

    fn textures() -> TextureStore {
        let mut textures = TextureStore::default();
        textures.insert("box", Texture::solid(20, 20, [255; 4]));
        textures
    }

    #[test]
    fn ticks_before_create_are_skipped() {
        let calls = Rc::new(RefCell::new(Calls::default()));
        let mut runner = SceneRunner::new(
            Box::new(BoxOnSpikeScene::new(Rc::clone(&calls))),
            ArcadeConfig::default(),
        );

        assert_eq!(
            runner.tick(1.0 / 60.0, &InputSnapshot::empty()),
            TickOutcome::Skipped
        );
        assert_eq!(calls.borrow().update, 0);
        assert_eq!(runner.state(), SceneState::Booting);
    }

    #[test]
    fn preload_then_create_run_once() {
        let calls = Rc::new(RefCell::new(Calls::default()));
        let mut runner = SceneRunner::new(
            Box::new(BoxOnSpikeScene::new(Rc::clone(&calls))),
            ArcadeConfig::default(),
        );

        let queue = runner.preload();
        assert_eq!(queue.len(), 1);
        assert!(runner.create(textures()));
        assert!(!runner.create(textures()));

        assert_eq!(calls.borrow().preload, 1);
        assert_eq!(calls.borrow().create, 1);
        assert_eq!(runner.state(), SceneState::Running);
        assert_eq!(runner.world().physics().body_count(), 2);
        assert_eq!(
            runner.world().body(BodyId(1)).expect("box").size(),
            Vec2::new(20.0, 20.0)
        );
    }

    #[test]
    fn collision_pauses_exactly_once_and_stops_updates() {
        let calls = Rc::new(RefCell::new(Calls::default()));
        let mut runner = SceneRunner::new(
            Box::new(BoxOnSpikeScene::new(Rc::clone(&calls))),
            ArcadeConfig::default(),
        );
        runner.create(textures());

        let mut outcomes = Vec::new();
        for _ in 0..600 {
            outcomes.push(runner.tick(1.0 / 60.0, &InputSnapshot::empty()));
        }

        let paused = outcomes
            .iter()
            .filter(|outcome| **outcome == TickOutcome::Paused)
            .count();
        assert_eq!(paused, 1);
        assert_eq!(runner.state(), SceneState::Paused);
        assert_eq!(calls.borrow().collisions, 1);

        let updates_at_pause = calls.borrow().update;
        assert_eq!(updates_at_pause as u64, runner.tick_count());
        runner.tick(1.0 / 60.0, &InputSnapshot::empty());
        assert_eq!(calls.borrow().update, updates_at_pause);
    }

    #[test]
    fn pause_requested_from_update_also_halts() {
        let calls = Rc::new(RefCell::new(Calls::default()));
        let mut scene = BoxOnSpikeScene::new(Rc::clone(&calls));
        scene.pause_from_update_on_quit = true;
        let mut runner = SceneRunner::new(Box::new(scene), ArcadeConfig::default());
        runner.create(textures());

        assert_eq!(
            runner.tick(1.0 / 60.0, &InputSnapshot::empty()),
            TickOutcome::Ran
        );
        let quit = InputSnapshot::empty().with_action_down(InputAction::Quit, true);
        assert_eq!(runner.tick(1.0 / 60.0, &quit), TickOutcome::Paused);
        assert_eq!(runner.tick(1.0 / 60.0, &quit), TickOutcome::Skipped);
        assert_eq!(calls.borrow().update, 2);
    }

    #[test]
    fn shutdown_notifies_created_scene_once() {
        let calls = Rc::new(RefCell::new(Calls::default()));
        let mut runner = SceneRunner::new(
            Box::new(BoxOnSpikeScene::new(Rc::clone(&calls))),
            ArcadeConfig::default(),
        );
        runner.create(textures());

        runner.shutdown();
        runner.shutdown();

        assert_eq!(calls.borrow().shutdown, 1);
        assert_eq!(runner.state(), SceneState::Shutdown);
    }
}
