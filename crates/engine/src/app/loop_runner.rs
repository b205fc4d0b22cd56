use std::sync::Arc;
use std::time::{Duration, Instant};

use pixels::Error as PixelsError;
use thiserror::Error;
use tracing::{info, warn};
use winit::dpi::LogicalSize;
use winit::error::{EventLoopError, OsError};
use winit::event::{ElementState, Event, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::WindowBuilder;

use crate::content::{load_queue, AssetCache, HttpFetcher, DEFAULT_FETCH_TIMEOUT};
use crate::{resolve_app_paths, StartupError};

use super::input::ActionStates;
use super::physics::ArcadeConfig;
use super::scene::{SceneRunner, SceneState, TickOutcome};
use super::{InputAction, InputSnapshot, Renderer, Scene};

pub const ASSET_CACHE_DIR: &str = "assets";
pub const PAUSED_TITLE_SUFFIX: &str = " - paused";

#[derive(Debug, Clone)]
pub struct LoopConfig {
    pub window_title: String,
    pub window_width: u32,
    pub window_height: u32,
    pub world: ArcadeConfig,
    pub target_tps: u32,
    pub max_frame_delta: Duration,
    pub max_ticks_per_frame: u32,
    pub asset_fetch_timeout: Duration,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            window_title: "Platformer".to_string(),
            window_width: 800,
            window_height: 600,
            world: ArcadeConfig::default(),
            target_tps: 60,
            max_frame_delta: Duration::from_millis(250),
            max_ticks_per_frame: 5,
            asset_fetch_timeout: DEFAULT_FETCH_TIMEOUT,
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Startup(#[from] StartupError),
    #[error("failed to create event loop: {0}")]
    CreateEventLoop(#[source] EventLoopError),
    #[error("failed to create application window: {0}")]
    CreateWindow(#[source] OsError),
    #[error("failed to initialize renderer: {0}")]
    CreateRenderer(#[source] PixelsError),
    #[error("event loop failed: {0}")]
    EventLoopRun(#[source] EventLoopError),
}

/// Runs `scene` through preload, asset loading and create, then drives it
/// at a fixed tick rate until the window closes.
pub fn run_app(config: LoopConfig, scene: Box<dyn Scene>) -> Result<(), AppError> {
    let app_paths = resolve_app_paths()?;
    info!(
        root = %app_paths.root.display(),
        assets_dir = %app_paths.assets_dir.display(),
        cache_dir = %app_paths.cache_dir.display(),
        "startup"
    );

    let mut runner = SceneRunner::new(scene, config.world);
    let queue = runner.preload();
    let mut cache = AssetCache::open(app_paths.cache_dir.join(ASSET_CACHE_DIR));
    let fetcher = HttpFetcher::new(config.asset_fetch_timeout);
    let report = load_queue(&queue, &mut cache, &fetcher);
    info!(
        requested = queue.len(),
        loaded = report.textures.len(),
        failed = report.failures.len(),
        "preload_complete"
    );
    runner.create(report.textures);

    let event_loop = EventLoop::new().map_err(AppError::CreateEventLoop)?;
    let window = Arc::new(
        WindowBuilder::new()
            .with_title(config.window_title.clone())
            .with_inner_size(LogicalSize::new(
                config.window_width as f64,
                config.window_height as f64,
            ))
            .build(&event_loop)
            .map_err(AppError::CreateWindow)?,
    );
    let window_for_loop = Arc::clone(&window);
    let buffer_width = config.world.bounds.width().round().max(1.0) as u32;
    let buffer_height = config.world.bounds.height().round().max(1.0) as u32;
    let mut renderer =
        Renderer::new(window, buffer_width, buffer_height).map_err(AppError::CreateRenderer)?;

    event_loop.set_control_flow(ControlFlow::Poll);

    let mut clock = FrameClock::new(&config, Instant::now());
    let fixed_dt_seconds = clock.fixed_dt.as_secs_f32();
    let mut input_collector = InputCollector::default();
    let mut title_shows_paused = false;

    info!(
        target_tps = config.target_tps.max(1),
        max_frame_delta_ms = clock.max_frame_delta.as_millis() as u64,
        max_ticks_per_frame = clock.max_ticks_per_frame,
        buffer_width,
        buffer_height,
        "loop_config"
    );

    event_loop
        .run(move |event, window_target| match event {
            Event::WindowEvent { window_id, event } if window_id == window_for_loop.id() => {
                match event {
                    WindowEvent::CloseRequested => {
                        input_collector.mark_quit_requested();
                        info!(reason = "window_close", "shutdown_requested");
                        window_target.exit();
                    }
                    WindowEvent::Resized(new_size) => {
                        if let Err(error) = renderer.resize(new_size.width, new_size.height) {
                            warn!(error = %error, "renderer_resize_failed");
                            window_target.exit();
                        }
                    }
                    WindowEvent::ScaleFactorChanged { .. } => {
                        let size = window_for_loop.inner_size();
                        if let Err(error) = renderer.resize(size.width, size.height) {
                            warn!(error = %error, "renderer_resize_failed");
                            window_target.exit();
                        }
                    }
                    WindowEvent::KeyboardInput { event, .. } => {
                        input_collector.handle_keyboard_input(&event);
                        if input_collector.quit_requested {
                            info!(reason = "escape_key", "shutdown_requested");
                            window_target.exit();
                        }
                    }
                    WindowEvent::RedrawRequested => {
                        for _ in 0..clock.ticks_due(Instant::now()) {
                            let input_snapshot = input_collector.snapshot_for_tick();
                            match runner.tick(fixed_dt_seconds, &input_snapshot) {
                                TickOutcome::Paused | TickOutcome::Skipped => break,
                                TickOutcome::Ran => {}
                            }
                        }

                        if let Err(error) = renderer.render_world(runner.world()) {
                            warn!(error = %error, "renderer_draw_failed");
                            window_target.exit();
                        }

                        let paused = runner.state() == SceneState::Paused;
                        if paused != title_shows_paused {
                            window_for_loop.set_title(&window_title_for(
                                &config.window_title,
                                paused,
                            ));
                            title_shows_paused = paused;
                        }
                    }
                    _ => {}
                }
            }
            Event::AboutToWait => {
                window_for_loop.request_redraw();
            }
            Event::LoopExiting => {
                runner.shutdown();
                info!(ticks = runner.tick_count(), "shutdown");
            }
            _ => {}
        })
        .map_err(AppError::EventLoopRun)
}

#[derive(Debug, Default)]
struct InputCollector {
    quit_requested: bool,
    action_states: ActionStates,
}

impl InputCollector {
    fn mark_quit_requested(&mut self) {
        self.quit_requested = true;
    }

    fn handle_keyboard_input(&mut self, key_event: &winit::event::KeyEvent) {
        let is_pressed = key_event.state == ElementState::Pressed;
        self.update_action_state_from_physical_key(key_event.physical_key, is_pressed);
    }

    fn update_action_state_from_physical_key(&mut self, key: PhysicalKey, is_pressed: bool) {
        match key {
            PhysicalKey::Code(KeyCode::ArrowUp) => {
                self.action_states.set(InputAction::Up, is_pressed);
            }
            PhysicalKey::Code(KeyCode::ArrowDown) => {
                self.action_states.set(InputAction::Down, is_pressed);
            }
            PhysicalKey::Code(KeyCode::ArrowLeft) => {
                self.action_states.set(InputAction::Left, is_pressed);
            }
            PhysicalKey::Code(KeyCode::ArrowRight) => {
                self.action_states.set(InputAction::Right, is_pressed);
            }
            PhysicalKey::Code(KeyCode::Escape) => {
                self.action_states.set(InputAction::Quit, is_pressed);
                if is_pressed {
                    self.mark_quit_requested();
                }
            }
            _ => {}
        }
    }

    fn snapshot_for_tick(&self) -> InputSnapshot {
        InputSnapshot::new(self.quit_requested, self.action_states)
    }
}

fn window_title_for(base: &str, paused: bool) -> String {
    if paused {
        format!("{base}{PAUSED_TITLE_SUFFIX}")
    } else {
        base.to_string()
    }
}

#[derive(Debug, Clone, Copy)]
struct StepPlan {
    ticks_to_run: u32,
    remaining_accumulator: Duration,
    dropped_backlog: Duration,
}

fn plan_sim_steps(
    mut accumulator: Duration,
    fixed_dt: Duration,
    max_ticks_per_frame: u32,
) -> StepPlan {
    let mut ticks_to_run = 0u32;
    while accumulator >= fixed_dt && ticks_to_run < max_ticks_per_frame {
        accumulator = accumulator.saturating_sub(fixed_dt);
        ticks_to_run = ticks_to_run.saturating_add(1);
    }

    let dropped_backlog = if accumulator >= fixed_dt {
        std::mem::replace(&mut accumulator, Duration::ZERO)
    } else {
        Duration::ZERO
    };
    StepPlan {
        ticks_to_run,
        remaining_accumulator: accumulator,
        dropped_backlog,
    }
}

/// Fixed-step accumulator fed by wall-clock frame times.
#[derive(Debug)]
struct FrameClock {
    fixed_dt: Duration,
    max_frame_delta: Duration,
    max_ticks_per_frame: u32,
    accumulator: Duration,
    last_frame: Instant,
}

impl FrameClock {
    fn new(config: &LoopConfig, now: Instant) -> Self {
        let max_frame_delta = if config.max_frame_delta.is_zero() {
            Duration::from_millis(250)
        } else {
            config.max_frame_delta
        };
        Self {
            fixed_dt: Duration::from_secs_f64(1.0 / config.target_tps.max(1) as f64),
            max_frame_delta,
            max_ticks_per_frame: config.max_ticks_per_frame.max(1),
            accumulator: Duration::ZERO,
            last_frame: now,
        }
    }

    /// Number of fixed ticks to run for the frame ending at `now`.
    fn ticks_due(&mut self, now: Instant) -> u32 {
        let frame_dt = now
            .saturating_duration_since(self.last_frame)
            .min(self.max_frame_delta);
        self.last_frame = now;

        let plan = plan_sim_steps(
            self.accumulator.saturating_add(frame_dt),
            self.fixed_dt,
            self.max_ticks_per_frame,
        );
        self.accumulator = plan.remaining_accumulator;
        if plan.dropped_backlog > Duration::ZERO {
            warn!(
                dropped_backlog_ms = plan.dropped_backlog.as_millis() as u64,
                max_ticks_per_frame = self.max_ticks_per_frame,
                "sim_clamp_triggered"
            );
        }
        plan.ticks_to_run
    }
}
