use std::str::FromStr;
use thiserror::Error;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct Rgb {
    pub(crate) r: u8,
    pub(crate) g: u8,
    pub(crate) b: u8,
}

impl Rgb {
    pub(crate) const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub(crate) const WHITE: Rgb = Rgb::new(255, 255, 255);

    pub(crate) const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Rec. 601 luma on the 0..255 scale.
    pub(crate) fn luma(self) -> f32 {
        0.299 * self.r as f32 + 0.587 * self.g as f32 + 0.114 * self.b as f32
    }
}

/// Color with straight (non-premultiplied) alpha in 0..1.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Rgba {
    pub(crate) rgb: Rgb,
    pub(crate) a: f32,
}

impl Rgba {
    pub(crate) const TRANSPARENT: Rgba = Rgba {
        rgb: Rgb::BLACK,
        a: 0.0,
    };

    pub(crate) const fn new(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self {
            rgb: Rgb::new(r, g, b),
            a,
        }
    }
}

impl From<Rgb> for Rgba {
    fn from(rgb: Rgb) -> Self {
        Self { rgb, a: 1.0 }
    }
}

pub(crate) fn clamp01(x: f32) -> f32 {
    x.max(0.0).min(1.0)
}

pub(crate) fn mix(a: Rgb, b: Rgb, t: f32) -> Rgb {
    let t = clamp01(t);
    let u = 1.0 - t;
    let ch = |x: u8, y: u8| (x as f32 * u + y as f32 * t + 0.5) as u8;
    Rgb {
        r: ch(a.r, b.r),
        g: ch(a.g, b.g),
        b: ch(a.b, b.b),
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub(crate) enum ColorError {
    #[error("empty color string")]
    Empty,
    #[error("bad hex color `{0}` (expected #rrggbb or #rgb)")]
    BadHex(String),
    #[error("bad rgba() color `{0}`")]
    BadFunction(String),
    #[error("unknown color name `{0}`")]
    UnknownName(String),
}

impl FromStr for Rgb {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let c: Rgba = s.parse()?;
        Ok(c.rgb)
    }
}

/// Accepts `#rrggbb`, `#rgb`, `rgb(r,g,b)`, `rgba(r,g,b,a)` and a few names.
impl FromStr for Rgba {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ColorError::Empty);
        }
        if let Some(hex) = s.strip_prefix('#') {
            return parse_hex(hex)
                .map(Rgba::from)
                .ok_or_else(|| ColorError::BadHex(s.to_string()));
        }
        let lower = s.to_ascii_lowercase();
        if lower.starts_with("rgb") {
            return parse_function(&lower).ok_or_else(|| ColorError::BadFunction(s.to_string()));
        }
        match lower.as_str() {
            "white" => Ok(Rgb::WHITE.into()),
            "black" => Ok(Rgb::BLACK.into()),
            "transparent" => Ok(Rgba::TRANSPARENT),
            _ => Err(ColorError::UnknownName(s.to_string())),
        }
    }
}

fn parse_hex(hex: &str) -> Option<Rgb> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    match hex.len() {
        6 => {
            let v = u32::from_str_radix(hex, 16).ok()?;
            Some(Rgb::new((v >> 16) as u8, (v >> 8) as u8, v as u8))
        }
        3 => {
            let v = u16::from_str_radix(hex, 16).ok()?;
            let nib = |n: u16| ((n & 0xF) as u8) * 17;
            Some(Rgb::new(nib(v >> 8), nib(v >> 4), nib(v)))
        }
        _ => None,
    }
}

fn parse_function(s: &str) -> Option<Rgba> {
    let open = s.find('(')?;
    let name = s[..open].trim();
    let args = s[open + 1..].strip_suffix(')')?;
    let parts: Vec<&str> = args.split(',').map(str::trim).collect();

    let channel = |p: &str| -> Option<u8> {
        let v: f32 = p.parse().ok()?;
        Some(v.clamp(0.0, 255.0).round() as u8)
    };

    match (name, parts.as_slice()) {
        ("rgb", [r, g, b]) => Some(Rgba::new(channel(r)?, channel(g)?, channel(b)?, 1.0)),
        ("rgba", [r, g, b, a]) => {
            let a: f32 = a.parse().ok()?;
            Some(Rgba::new(channel(r)?, channel(g)?, channel(b)?, clamp01(a)))
        }
        _ => None,
    }
}
