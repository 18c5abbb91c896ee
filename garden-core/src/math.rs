//! Small value types shared by the growth and genome code.
//!
//! Positions and headings are plain [`glam::Vec2`] values in screen space:
//! `y` grows downward, so a plant grows "up" along [`UP`].

use std::ops::{Add, Mul, Sub};

pub use glam::Vec2;
use rand::Rng;

/// Heading of a freshly seeded plant.
pub const UP: Vec2 = Vec2::NEG_Y;

/// Degree-based rotation for 2-D directions.
pub trait Rotate {
    /// Returns `self` rotated by `degrees`.
    fn rotate_deg(self, degrees: f32) -> Self;
}

impl Rotate for Vec2 {
    #[inline]
    fn rotate_deg(self, degrees: f32) -> Self {
        Vec2::from_angle(degrees.to_radians()).rotate(self)
    }
}

/// An RGB color whose channels always stay inside `[0, 255]`.
///
/// Every constructor and every arithmetic operator clamps, so intermediate
/// overflow (for example `color + Color::new(20, 20, 20)`) saturates instead
/// of wrapping.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Color {
    r: u8,
    g: u8,
    b: u8,
}

#[inline]
fn clamp_channel(value: i32) -> u8 {
    value.clamp(0, 255) as u8
}

impl Color {
    pub const BLACK: Color = Color { r: 0, g: 0, b: 0 };
    pub const WHITE: Color = Color {
        r: 255,
        g: 255,
        b: 255,
    };

    /// Builds a color from arbitrary integers, clamping each channel.
    pub fn new(r: i32, g: i32, b: i32) -> Self {
        Self {
            r: clamp_channel(r),
            g: clamp_channel(g),
            b: clamp_channel(b),
        }
    }

    /// Same as [`Color::new`] but uniform over the whole channel.
    pub fn gray(value: i32) -> Self {
        Self::new(value, value, value)
    }

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::new(
            rng.random_range(0..=255),
            rng.random_range(0..=255),
            rng.random_range(0..=255),
        )
    }

    #[inline]
    pub fn r(self) -> u8 {
        self.r
    }

    #[inline]
    pub fn g(self) -> u8 {
        self.g
    }

    #[inline]
    pub fn b(self) -> u8 {
        self.b
    }

    #[inline]
    pub fn rgb(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    /// Formats the color as `#rrggbb`.
    pub fn hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl From<Color> for [u8; 3] {
    fn from(c: Color) -> Self {
        c.rgb()
    }
}

impl Add for Color {
    type Output = Color;

    fn add(self, rhs: Color) -> Color {
        Color::new(
            self.r as i32 + rhs.r as i32,
            self.g as i32 + rhs.g as i32,
            self.b as i32 + rhs.b as i32,
        )
    }
}

impl Sub for Color {
    type Output = Color;

    fn sub(self, rhs: Color) -> Color {
        Color::new(
            self.r as i32 - rhs.r as i32,
            self.g as i32 - rhs.g as i32,
            self.b as i32 - rhs.b as i32,
        )
    }
}

/// Scales every channel, truncating toward zero before clamping.
impl Mul<f32> for Color {
    type Output = Color;

    fn mul(self, k: f32) -> Color {
        Color::new(
            (self.r as f32 * k) as i32,
            (self.g as f32 * k) as i32,
            (self.b as f32 * k) as i32,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    fn assert_close(a: Vec2, b: Vec2) {
        assert!((a - b).length() < 1e-5, "{a:?} != {b:?}");
    }

    #[test]
    fn rotate_quarter_turns() {
        assert_close(Vec2::X.rotate_deg(90.0), Vec2::Y);
        assert_close(Vec2::X.rotate_deg(-90.0), Vec2::NEG_Y);
        assert_close(UP.rotate_deg(180.0), Vec2::Y);
        assert_close(Vec2::new(3.0, 4.0).rotate_deg(0.0), Vec2::new(3.0, 4.0));
    }

    #[test]
    fn rotation_preserves_length() {
        let v = Vec2::new(3.0, 4.0);
        for deg in [-170.0, -33.0, 12.5, 90.0, 359.0] {
            assert!((v.rotate_deg(deg).length() - 5.0).abs() < 1e-4);
        }
    }

    #[test]
    fn new_clamps_channels() {
        let c = Color::new(-10, 128, 300);
        assert_eq!(c.rgb(), [0, 128, 255]);
    }

    #[test]
    fn add_and_sub_saturate() {
        let c = Color::new(250, 10, 100);
        assert_eq!((c + Color::gray(20)).rgb(), [255, 30, 120]);
        assert_eq!((c - Color::gray(20)).rgb(), [230, 0, 80]);
    }

    #[test]
    fn mul_truncates_and_clamps() {
        let c = Color::new(101, 200, 3);
        assert_eq!((c * 0.5).rgb(), [50, 100, 1]);
        assert_eq!((c * 2.0).rgb(), [202, 255, 6]);
        assert_eq!((c * -1.0).rgb(), [0, 0, 0]);
    }

    #[test]
    fn hex_is_lowercase_and_padded() {
        assert_eq!(Color::new(255, 0, 10).hex(), "#ff000a");
        assert_eq!(Color::BLACK.hex(), "#000000");
    }

    #[test]
    fn random_is_reproducible_for_equal_seeds() {
        let mut a = StdRng::seed_from_u64(7);
        let mut b = StdRng::seed_from_u64(7);
        for _ in 0..32 {
            assert_eq!(Color::random(&mut a), Color::random(&mut b));
        }
    }
}
