//! Retained raster the viewer paints circles into.
//!
//! Every circle is rasterised once, when growth emits it, into an RGBA
//! buffer. The buffer is uploaded to a single egui texture only when it has
//! changed, so the per-frame cost does not depend on how many circles the
//! plant has drawn.

use garden_core::{
    math::Color,
    types::{Circle, Disc},
};
use glam::Vec2;

/// Side length, in world units, of the default square canvas.
pub const CANVAS_SIZE: usize = 1280;

/// An RGBA image covering a world-space rectangle centered on the origin,
/// one pixel per world unit.
pub struct Canvas {
    size: [usize; 2],
    rgba: Vec<u8>,
    background: Color,
    painted: u64,
    dirty: bool,
    texture: Option<egui::TextureHandle>,
}

impl Canvas {
    pub fn new(width: usize, height: usize, background: Color) -> Self {
        let mut canvas = Self {
            size: [width, height],
            rgba: vec![0; width * height * 4],
            background,
            painted: 0,
            dirty: true,
            texture: None,
        };
        canvas.clear();
        canvas
    }

    /// Fills the whole canvas with the background color.
    pub fn clear(&mut self) {
        let [r, g, b] = self.background.rgb();
        for pixel in self.rgba.chunks_exact_mut(4) {
            pixel.copy_from_slice(&[r, g, b, 255]);
        }
        self.painted = 0;
        self.dirty = true;
    }

    /// Number of circles painted since the last [`Canvas::clear`].
    #[inline]
    pub fn painted(&self) -> u64 {
        self.painted
    }

    /// World-space corners `(min, max)` of the area the canvas covers.
    pub fn world_bounds(&self) -> (Vec2, Vec2) {
        let half = Vec2::new(self.size[0] as f32, self.size[1] as f32) / 2.0;
        (-half, half)
    }

    #[cfg(test)]
    fn pixel(&self, x: usize, y: usize) -> Option<Color> {
        let [width, height] = self.size;
        if x >= width || y >= height {
            return None;
        }
        let i = (y * width + x) * 4;
        Some(Color::new(
            self.rgba[i] as i32,
            self.rgba[i + 1] as i32,
            self.rgba[i + 2] as i32,
        ))
    }

    /// Paints `circle` as its three bevel discs.
    pub fn draw_circle(&mut self, circle: &Circle, bevel_delta: i32) {
        for disc in circle.bevel(bevel_delta) {
            self.fill_disc(&disc);
        }
        self.painted += 1;
        self.dirty = true;
    }

    /// Rasterises one disc, clipped to the canvas. A pixel is covered when
    /// its center lies inside the disc.
    fn fill_disc(&mut self, disc: &Disc) {
        let [width, height] = self.size;
        let cx = disc.center.x + width as f32 / 2.0;
        let cy = disc.center.y + height as f32 / 2.0;
        let radius = disc.radius;
        if !(cx.is_finite() && cy.is_finite() && radius.is_finite()) {
            return;
        }

        let x0 = (cx - radius).floor().max(0.0);
        let x1 = (cx + radius).ceil().min(width as f32);
        let y0 = (cy - radius).floor().max(0.0);
        let y1 = (cy + radius).ceil().min(height as f32);
        if x0 >= x1 || y0 >= y1 {
            return;
        }

        let [r, g, b] = disc.color.rgb();
        let radius_sq = radius * radius;
        for y in y0 as usize..y1 as usize {
            let dy = y as f32 + 0.5 - cy;
            for x in x0 as usize..x1 as usize {
                let dx = x as f32 + 0.5 - cx;
                if dx * dx + dy * dy <= radius_sq {
                    let i = (y * width + x) * 4;
                    self.rgba[i..i + 4].copy_from_slice(&[r, g, b, 255]);
                }
            }
        }
    }

    /// Texture holding the current image, re-uploaded only after changes.
    pub fn texture_id(&mut self, ctx: &egui::Context) -> egui::TextureId {
        let dirty = std::mem::take(&mut self.dirty);
        if let Some(texture) = self.texture.as_mut() {
            if dirty {
                let image = egui::ColorImage::from_rgba_unmultiplied(self.size, &self.rgba);
                texture.set(image, egui::TextureOptions::LINEAR);
            }
            return texture.id();
        }

        let image = egui::ColorImage::from_rgba_unmultiplied(self.size, &self.rgba);
        let texture = ctx.load_texture("garden-canvas", image, egui::TextureOptions::LINEAR);
        let id = texture.id();
        self.texture = Some(texture);
        id
    }
}
