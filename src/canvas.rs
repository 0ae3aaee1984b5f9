use crate::color::{clamp01, Rgb, Rgba};
use crate::surface::{DrawState, Paint, Surface};
use crate::term::{Cell, CellBuffer};

/// Subpixels per terminal cell, braille layout.
pub(crate) const SUB_X: u32 = 2;
pub(crate) const SUB_Y: u32 = 4;

/// A subpixel counts as a dot when it is this much brighter (luma, 0..255)
/// than the darkest subpixel of its cell.
const INK_THRESHOLD: f32 = 28.0;

/// Opaque RGB framebuffer at braille resolution. One subpixel spans `scale`
/// surface units.
pub(crate) struct PixelCanvas {
    pub(crate) w: u32,
    pub(crate) h: u32,
    scale: f32,
    px: Vec<Rgb>,
    state: DrawState,
    stack: Vec<DrawState>,
}

impl PixelCanvas {
    pub(crate) fn new(w: u32, h: u32, scale: f32) -> Self {
        Self {
            w,
            h,
            scale: scale.max(0.01),
            px: vec![Rgb::BLACK; (w as usize) * (h as usize)],
            state: DrawState::default(),
            stack: Vec::new(),
        }
    }

    pub(crate) fn for_cells(cols: u16, rows: u16, scale: f32) -> Self {
        Self::new(cols as u32 * SUB_X, rows as u32 * SUB_Y, scale)
    }

    /// Surface-unit extent of the whole canvas.
    pub(crate) fn extent(&self) -> (f32, f32) {
        (self.w as f32 * self.scale, self.h as f32 * self.scale)
    }

    pub(crate) fn idx(&self, x: u32, y: u32) -> usize {
        (y as usize) * (self.w as usize) + (x as usize)
    }

    pub(crate) fn get(&self, x: u32, y: u32) -> Rgb {
        self.px[self.idx(x, y)]
    }

    fn blend_over(&mut self, x: i64, y: i64, src: Rgb, alpha: f32) {
        if x < 0 || y < 0 || x >= self.w as i64 || y >= self.h as i64 || alpha <= 0.0 {
            return;
        }
        let i = self.idx(x as u32, y as u32);
        let dst = self.px[i];
        let a = clamp01(alpha);
        let ch = |s: u8, d: u8| (s as f32 * a + d as f32 * (1.0 - a) + 0.5) as u8;
        self.px[i] = Rgb {
            r: ch(src.r, dst.r),
            g: ch(src.g, dst.g),
            b: ch(src.b, dst.b),
        };
    }

    /// Surface-unit coordinates of subpixel centre.
    fn center(&self, x: i64, y: i64) -> (f32, f32) {
        ((x as f32 + 0.5) * self.scale, (y as f32 + 0.5) * self.scale)
    }

    /// Subpixel index range covering `[lo, hi]` in surface units.
    fn span(&self, lo: f32, hi: f32, limit: u32) -> (i64, i64) {
        let a = (lo / self.scale).floor() as i64;
        let b = (hi / self.scale).ceil() as i64;
        (a.max(0), b.min(limit as i64))
    }

    fn draw_glow(&mut self, cx: f32, cy: f32, r: f32, glow: Rgba, blur: f32) {
        let reach = r + blur;
        let (x0, x1) = self.span(cx - reach, cx + reach, self.w);
        let (y0, y1) = self.span(cy - reach, cy + reach, self.h);
        let strength = glow.a * self.state.global_alpha;
        for y in y0..y1 {
            for x in x0..x1 {
                let (ux, uy) = self.center(x, y);
                let d = ((ux - cx).powi(2) + (uy - cy).powi(2)).sqrt();
                if d <= r || d >= reach {
                    continue;
                }
                let falloff = 1.0 - (d - r) / blur;
                self.blend_over(x, y, glow.rgb, strength * falloff * falloff);
            }
        }
    }

    /// Braille-encode into `out`, which must be `w/2 × h/4` cells.
    pub(crate) fn to_cells(&self, out: &mut CellBuffer) {
        for cy in 0..out.h as u32 {
            for cx in 0..out.w as u32 {
                let mut lum = [0.0f32; 8];
                let mut col = [Rgb::BLACK; 8];
                let mut n = 0;
                for dy in 0..SUB_Y {
                    for dx in 0..SUB_X {
                        let (x, y) = (cx * SUB_X + dx, cy * SUB_Y + dy);
                        if x < self.w && y < self.h {
                            let p = self.get(x, y);
                            col[(dy * SUB_X + dx) as usize] = p;
                            lum[(dy * SUB_X + dx) as usize] = p.luma();
                            n += 1;
                        }
                    }
                }
                if n == 0 {
                    continue;
                }
                let floor = lum.iter().copied().fold(f32::MAX, f32::min);

                let mut mask = 0u8;
                let (mut ink, mut bg) = (Avg::default(), Avg::default());
                for dy in 0..SUB_Y {
                    for dx in 0..SUB_X {
                        let k = (dy * SUB_X + dx) as usize;
                        if lum[k] - floor > INK_THRESHOLD {
                            mask |= braille_bit(dx, dy);
                            ink.add(col[k]);
                        } else {
                            bg.add(col[k]);
                        }
                    }
                }

                let bg = bg.get().unwrap_or(Rgb::BLACK);
                let cell = match ink.get() {
                    Some(fg) => Cell {
                        ch: char::from_u32(0x2800 + mask as u32).unwrap_or(' '),
                        fg,
                        bg,
                    },
                    None => Cell::blank(bg),
                };
                out.set(cx as u16, cy as u16, cell);
            }
        }
    }
}

#[derive(Default)]
struct Avg {
    r: u32,
    g: u32,
    b: u32,
    n: u32,
}

impl Avg {
    fn add(&mut self, c: Rgb) {
        self.r += c.r as u32;
        self.g += c.g as u32;
        self.b += c.b as u32;
        self.n += 1;
    }
    fn get(&self) -> Option<Rgb> {
        (self.n > 0).then(|| {
            Rgb::new(
                (self.r / self.n) as u8,
                (self.g / self.n) as u8,
                (self.b / self.n) as u8,
            )
        })
    }
}

// Dots: (0,0)=1 (0,1)=2 (0,2)=4 (0,3)=64 (1,0)=8 (1,1)=16 (1,2)=32 (1,3)=128
fn braille_bit(dx: u32, dy: u32) -> u8 {
    match (dx, dy) {
        (0, 0) => 0x01,
        (0, 1) => 0x02,
        (0, 2) => 0x04,
        (0, 3) => 0x40,
        (1, 0) => 0x08,
        (1, 1) => 0x10,
        (1, 2) => 0x20,
        (1, 3) => 0x80,
        _ => 0x00,
    }
}

impl Surface for PixelCanvas {
    fn clear(&mut self) {
        self.px.fill(Rgb::BLACK);
    }

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, paint: &Paint) {
        let (x0, x1) = self.span(x, x + w, self.w);
        let (y0, y1) = self.span(y, y + h, self.h);
        let alpha = self.state.global_alpha;
        for py in y0..y1 {
            for px in x0..x1 {
                let (ux, uy) = self.center(px, py);
                if ux < x || ux >= x + w || uy < y || uy >= y + h {
                    continue;
                }
                self.blend_over(px, py, paint.color_at(ux, uy), alpha);
            }
        }
    }

    fn fill_circle(&mut self, cx: f32, cy: f32, r: f32, color: Rgb) {
        if r < 0.0 {
            return;
        }
        let shadow = self.state.shadow;
        let blur = self.state.shadow_blur;
        if blur > 0.0 && shadow.a > 0.0 {
            self.draw_glow(cx, cy, r, shadow, blur);
        }

        // one subpixel of soft edge keeps sub-subpixel dots visible
        let edge = self.scale;
        let (x0, x1) = self.span(cx - r - edge, cx + r + edge, self.w);
        let (y0, y1) = self.span(cy - r - edge, cy + r + edge, self.h);
        let alpha = self.state.global_alpha;
        for y in y0..y1 {
            for x in x0..x1 {
                let (ux, uy) = self.center(x, y);
                let d = ((ux - cx).powi(2) + (uy - cy).powi(2)).sqrt();
                let coverage = clamp01((r - d) / edge + 0.5);
                if coverage > 0.0 {
                    self.blend_over(x, y, color, alpha * coverage);
                }
            }
        }
    }

    fn set_global_alpha(&mut self, alpha: f32) {
        self.state.global_alpha = clamp01(alpha);
    }

    fn set_shadow(&mut self, color: Rgba, blur: f32) {
        self.state.shadow = color;
        self.state.shadow_blur = blur.max(0.0);
    }

    fn save(&mut self) {
        self.stack.push(self.state);
    }

    fn restore(&mut self) {
        if let Some(s) = self.stack.pop() {
            self.state = s;
        }
    }
}
