use crate::app::Rect;
use crate::content::Texture;

/// RGBA8 frame buffer view with clipped drawing primitives.
pub(crate) struct Canvas<'a> {
    frame: &'a mut [u8],
    width: u32,
    height: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PixelRect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl PixelRect {
    pub(crate) fn from_world(rect: &Rect) -> Self {
        Self {
            left: rect.left.round() as i32,
            top: rect.top.round() as i32,
            right: rect.right.round() as i32,
            bottom: rect.bottom.round() as i32,
        }
    }

    fn width(&self) -> i32 {
        self.right - self.left
    }

    fn height(&self) -> i32 {
        self.bottom - self.top
    }
}

impl<'a> Canvas<'a> {
    pub(crate) fn new(frame: &'a mut [u8], width: u32, height: u32) -> Self {
        Self {
            frame,
            width,
            height,
        }
    }

    pub(crate) fn clear(&mut self, color: [u8; 4]) {
        for pixel in self.frame.chunks_exact_mut(4) {
            pixel.copy_from_slice(&color);
        }
    }

    pub(crate) fn put(&mut self, x: i32, y: i32, color: [u8; 4]) {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return;
        }
        let offset = (y as usize * self.width as usize + x as usize) * 4;
        if let Some(pixel) = self.frame.get_mut(offset..offset + 4) {
            pixel.copy_from_slice(&color);
        }
    }

    pub(crate) fn fill_rect(&mut self, rect: PixelRect, color: [u8; 4]) {
        let left = rect.left.max(0);
        let top = rect.top.max(0);
        let right = rect.right.min(self.width as i32);
        let bottom = rect.bottom.min(self.height as i32);
        for y in top..bottom {
            for x in left..right {
                self.put(x, y, color);
            }
        }
    }

    pub(crate) fn stroke_rect(&mut self, rect: PixelRect, color: [u8; 4]) {
        if rect.width() <= 0 || rect.height() <= 0 {
            return;
        }
        let (right, bottom) = (rect.right - 1, rect.bottom - 1);
        for x in rect.left..=right {
            self.put(x, rect.top, color);
            self.put(x, bottom, color);
        }
        for y in rect.top..=bottom {
            self.put(rect.left, y, color);
            self.put(right, y, color);
        }
    }

    /// Nearest-neighbour stretch of `texture` onto `dest`; transparent texels are skipped.
    pub(crate) fn blit_scaled(&mut self, texture: &Texture, dest: PixelRect) {
        let (dest_w, dest_h) = (dest.width(), dest.height());
        if dest_w <= 0 || dest_h <= 0 || texture.width() == 0 || texture.height() == 0 {
            return;
        }
        let draw_left = dest.left.max(0);
        let draw_top = dest.top.max(0);
        let draw_right = dest.right.min(self.width as i32);
        let draw_bottom = dest.bottom.min(self.height as i32);
        let texels = texture.rgba();
        let tex_w = texture.width() as usize;

        for y in draw_top..draw_bottom {
            let src_y = ((y - dest.top) as i64 * texture.height() as i64 / dest_h as i64) as usize;
            for x in draw_left..draw_right {
                let src_x = ((x - dest.left) as i64 * texture.width() as i64 / dest_w as i64) as usize;
                let offset = (src_y * tex_w + src_x) * 4;
                let Some(texel) = texels.get(offset..offset + 4) else {
                    continue;
                };
                if texel[3] == 0 {
                    continue;
                }
                self.put(x, y, [texel[0], texel[1], texel[2], texel[3]]);
            }
        }
    }
}
