use crate::color::{clamp01, Rgb};
use crate::surface::Surface;
use rand::Rng;
use std::f32::consts::TAU;

/// Speed multiplier applied every tick.
pub(crate) const FRICTION: f32 = 0.95;
/// Constant downward drift added every tick, independent of speed.
pub(crate) const GRAVITY: f32 = 0.05;

/// One glowing, fading dot of a burst.
#[derive(Clone, Debug)]
pub(crate) struct Particle {
    pub(crate) x: f32,
    pub(crate) y: f32,
    color: Rgb,
    radius: f32,
    angle: f32,
    speed: f32,
    alpha: f32,
    decay: f32,
}

impl Particle {
    pub(crate) fn new<R: Rng + ?Sized>(x: f32, y: f32, color: Rgb, rng: &mut R) -> Self {
        Self::with_motion(
            x,
            y,
            color,
            rng.gen::<f32>() * 2.0 + 1.0,
            rng.gen::<f32>() * TAU,
            rng.gen::<f32>() * 5.0 + 2.0,
            rng.gen::<f32>() * 0.015 + 0.005,
        )
    }

    pub(crate) fn with_motion(
        x: f32,
        y: f32,
        color: Rgb,
        radius: f32,
        angle: f32,
        speed: f32,
        decay: f32,
    ) -> Self {
        Self {
            x,
            y,
            color,
            radius,
            angle,
            speed,
            alpha: 1.0,
            decay,
        }
    }

    pub(crate) fn advance(&mut self) {
        self.speed *= FRICTION;
        self.x += self.angle.cos() * self.speed;
        self.y += self.angle.sin() * self.speed + GRAVITY;
        self.alpha -= self.decay;
    }

    pub(crate) fn is_expired(&self) -> bool {
        self.alpha <= 0.0
    }

    pub(crate) fn render(&self, surface: &mut dyn Surface) {
        surface.save();
        surface.set_global_alpha(clamp01(self.alpha));
        surface.fill_circle(self.x, self.y, self.radius, self.color);
        surface.restore();
    }
}
