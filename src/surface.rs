//! Drawing-surface contract used by the simulation.
//!
//! All coordinates are surface units. Implementations keep a small state stack
//! (global alpha + shadow) that `save`/`restore` push and pop, so a caller can
//! change opacity for one draw call without leaking it into the next.

use crate::color::{mix, Rgb, Rgba};

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct RadialGradient {
    pub(crate) cx: f32,
    pub(crate) cy: f32,
    pub(crate) radius: f32,
    pub(crate) inner: Rgb,
    pub(crate) outer: Rgb,
}

impl RadialGradient {
    pub(crate) fn color_at(&self, x: f32, y: f32) -> Rgb {
        if self.radius <= 0.0 {
            return self.outer;
        }
        let d = ((x - self.cx).powi(2) + (y - self.cy).powi(2)).sqrt();
        mix(self.inner, self.outer, d / self.radius)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum Paint {
    Solid(Rgb),
    Radial(RadialGradient),
}

impl Paint {
    pub(crate) fn color_at(&self, x: f32, y: f32) -> Rgb {
        match self {
            Paint::Solid(c) => *c,
            Paint::Radial(g) => g.color_at(x, y),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct DrawState {
    pub(crate) global_alpha: f32,
    pub(crate) shadow: Rgba,
    pub(crate) shadow_blur: f32,
}

impl Default for DrawState {
    fn default() -> Self {
        Self {
            global_alpha: 1.0,
            shadow: Rgba::TRANSPARENT,
            shadow_blur: 0.0,
        }
    }
}

pub(crate) trait Surface {
    /// Wipe the whole surface to black.
    fn clear(&mut self);
    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, paint: &Paint);
    fn fill_circle(&mut self, cx: f32, cy: f32, r: f32, color: Rgb);
    fn set_global_alpha(&mut self, alpha: f32);
    fn set_shadow(&mut self, color: Rgba, blur: f32);
    fn save(&mut self);
    fn restore(&mut self);
}
