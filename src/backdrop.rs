use crate::color::{Rgb, Rgba};
use crate::surface::{Paint, RadialGradient, Surface};
use rand::Rng;

pub(crate) const DEFAULT_STAR_COUNT: usize = 100;

pub(crate) const SKY_INNER: Rgb = Rgb::new(0x0d, 0x0d, 0x1d);
pub(crate) const SKY_OUTER: Rgb = Rgb::new(0x1a, 0x1a, 0x33);
/// The ground reuses the darkest sky tone.
pub(crate) const GROUND: Rgb = SKY_INNER;
pub(crate) const STAR_COLOR: Rgb = Rgb::WHITE;

/// Stars live in the top part of the sky only.
const STAR_BAND: f32 = 0.7;
const STAR_MAX_RADIUS: f32 = 1.5;
const GROUND_LINE: f32 = 0.85;

const MOON_RADIUS: f32 = 40.0;
const MOON_COLOR: Rgb = Rgb::new(0xfd, 0xfd, 0xfd);
const MOON_GLOW: Rgba = Rgba::new(255, 255, 200, 0.5);
const MOON_GLOW_BLUR: f32 = 20.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Star {
    pub(crate) x: f32,
    pub(crate) y: f32,
    pub(crate) radius: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Moon {
    pub(crate) x: f32,
    pub(crate) y: f32,
    pub(crate) radius: f32,
    pub(crate) color: Rgb,
    pub(crate) glow: Rgba,
}

impl Default for Moon {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            radius: MOON_RADIUS,
            color: MOON_COLOR,
            glow: MOON_GLOW,
        }
    }
}

/// Stars and moon; the ground is derived from the viewport on every draw.
#[derive(Clone, Debug)]
pub(crate) struct Backdrop {
    stars: Vec<Star>,
    star_count: usize,
    moon: Moon,
}

impl Backdrop {
    pub(crate) fn new<R: Rng + ?Sized>(w: f32, h: f32, star_count: usize, rng: &mut R) -> Self {
        let mut b = Self {
            stars: Vec::new(),
            star_count,
            moon: Moon::default(),
        };
        b.generate_stars(star_count, w, h, rng);
        b.place_moon(w, h);
        b
    }

    /// Throw away the current stars and scatter `count` new ones.
    pub(crate) fn generate_stars<R: Rng + ?Sized>(
        &mut self,
        count: usize,
        w: f32,
        h: f32,
        rng: &mut R,
    ) {
        // scaled unit samples instead of gen_range: a zero-sized viewport is valid
        self.stars = (0..count)
            .map(|_| Star {
                x: rng.gen::<f32>() * w,
                y: rng.gen::<f32>() * h * STAR_BAND,
                radius: rng.gen::<f32>() * STAR_MAX_RADIUS,
            })
            .collect();
        self.star_count = count;
    }

    pub(crate) fn place_moon(&mut self, w: f32, h: f32) {
        self.moon.x = w * 0.8;
        self.moon.y = h * 0.2;
    }

    pub(crate) fn resize<R: Rng + ?Sized>(&mut self, w: f32, h: f32, rng: &mut R) {
        self.generate_stars(self.star_count, w, h, rng);
        self.place_moon(w, h);
    }

    pub(crate) fn render(&self, surface: &mut dyn Surface, w: f32, h: f32) {
        let sky = RadialGradient {
            cx: w / 2.0,
            cy: h / 2.0,
            radius: w,
            inner: SKY_INNER,
            outer: SKY_OUTER,
        };
        surface.fill_rect(0.0, 0.0, w, h, &Paint::Radial(sky));

        for s in &self.stars {
            surface.fill_circle(s.x, s.y, s.radius, STAR_COLOR);
        }

        surface.save();
        surface.set_shadow(self.moon.glow, MOON_GLOW_BLUR);
        surface.fill_circle(self.moon.x, self.moon.y, self.moon.radius, self.moon.color);
        surface.restore();

        let ground_y = h * GROUND_LINE;
        surface.fill_rect(0.0, ground_y, w, h - ground_y, &Paint::Solid(GROUND));
    }
}
