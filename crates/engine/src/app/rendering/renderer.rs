use std::collections::HashSet;
use std::sync::Arc;

use pixels::{Error, Pixels, SurfaceTexture, TextureError};
use tracing::warn;
use winit::window::Window;

use crate::app::physics::{Body, BodyKind};
use crate::app::SceneWorld;

use super::draw::{Canvas, PixelRect};

const CLEAR_COLOR: [u8; 4] = [20, 22, 28, 255];
const PLACEHOLDER_COLOR: [u8; 4] = [220, 220, 240, 255];
const PLACEHOLDER_EDGE_COLOR: [u8; 4] = [90, 90, 110, 255];
const DEBUG_STATIC_COLOR: [u8; 4] = [0, 0, 255, 255];
const DEBUG_DYNAMIC_COLOR: [u8; 4] = [255, 0, 255, 255];
const DEBUG_TOUCHING_COLOR: [u8; 4] = [0, 255, 0, 255];

/// Software renderer drawing the scene into a fixed-size pixel buffer.
/// The buffer matches world size; `pixels` scales it to the window surface.
pub struct Renderer {
    window: Arc<Window>,
    pixels: Pixels<'static>,
    buffer_width: u32,
    buffer_height: u32,
    warned_missing_texture_keys: HashSet<String>,
}

impl Renderer {
    pub fn new(window: Arc<Window>, buffer_width: u32, buffer_height: u32) -> Result<Self, Error> {
        let size = window.inner_size();
        let surface = SurfaceTexture::new(size.width, size.height, Arc::clone(&window));
        let pixels = Pixels::new(buffer_width, buffer_height, surface)?;
        Ok(Self {
            window,
            pixels,
            buffer_width,
            buffer_height,
            warned_missing_texture_keys: HashSet::new(),
        })
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), TextureError> {
        if width == 0 || height == 0 {
            return Ok(());
        }
        self.pixels.resize_surface(width, height)
    }

    pub(crate) fn render_world(&mut self, world: &SceneWorld) -> Result<(), Error> {
        let debug = world.physics().config().debug;
        let warned = &mut self.warned_missing_texture_keys;
        let mut canvas = Canvas::new(
            self.pixels.frame_mut(),
            self.buffer_width,
            self.buffer_height,
        );
        canvas.clear(CLEAR_COLOR);

        for body in world.physics().bodies() {
            draw_body(&mut canvas, world, body, warned);
            if debug {
                draw_body_outline(&mut canvas, body);
            }
        }

        self.pixels.render()
    }
}

fn draw_body(
    canvas: &mut Canvas<'_>,
    world: &SceneWorld,
    body: &Body,
    warned_missing_texture_keys: &mut HashSet<String>,
) {
    let dest = PixelRect::from_world(&body.bounds());
    match world.textures().get(body.texture_key()) {
        Some(texture) => canvas.blit_scaled(texture, dest),
        None => {
            if warned_missing_texture_keys.insert(body.texture_key().to_string()) {
                warn!(
                    texture_key = body.texture_key(),
                    body = body.id().0,
                    "renderer_texture_missing_using_placeholder"
                );
            }
            canvas.fill_rect(dest, PLACEHOLDER_COLOR);
            canvas.stroke_rect(dest, PLACEHOLDER_EDGE_COLOR);
        }
    }
}

fn draw_body_outline(canvas: &mut Canvas<'_>, body: &Body) {
    let color = if body.touching().any() {
        DEBUG_TOUCHING_COLOR
    } else {
        match body.kind() {
            BodyKind::Static => DEBUG_STATIC_COLOR,
            BodyKind::Dynamic => DEBUG_DYNAMIC_COLOR,
        }
    };
    canvas.stroke_rect(PixelRect::from_world(&body.bounds()), color);
}
