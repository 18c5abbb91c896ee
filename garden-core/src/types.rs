use crate::math::{Color, Vec2};

/// Depth of an agent in its plant, and index into a [`crate::genome::PlantGenom`].
pub type Generation = usize;

/// The drawable primitive emitted by growth: one filled circle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Circle {
    pub pos: Vec2,
    pub radius: f32,
    pub color: Color,
}

/// A single filled disc in a renderer's draw list.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Disc {
    pub center: Vec2,
    pub radius: f32,
    pub color: Color,
}

/// Pixel offset of the shadow and highlight discs in [`Circle::bevel`].
pub const BEVEL_OFFSET: f32 = 2.0;

impl Circle {
    pub fn new(pos: Vec2, radius: f32, color: Color) -> Self {
        Self { pos, radius, color }
    }

    /// Returns the three discs of the conventional bevelled look, in draw order.
    ///
    /// The radius used is `|radius| + 1`, so shrinking lineages (negative
    /// size) still draw. The first disc is shifted up-left and brightened by
    /// `delta`, the second shifted down-right and darkened by `delta`, and
    /// the last is the circle itself on top.
    pub fn bevel(&self, delta: i32) -> [Disc; 3] {
        let radius = self.radius.abs() + 1.0;
        let shift = Vec2::splat(BEVEL_OFFSET);
        let delta = Color::gray(delta);
        [
            Disc {
                center: self.pos - shift,
                radius,
                color: self.color + delta,
            },
            Disc {
                center: self.pos + shift,
                radius,
                color: self.color - delta,
            },
            Disc {
                center: self.pos,
                radius,
                color: self.color,
            },
        ]
    }
}
