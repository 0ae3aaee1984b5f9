use crate::backdrop::DEFAULT_STAR_COUNT;
use crate::color::Rgb;
use crate::fireworks::DEFAULT_BURST_SIZE;
use anyhow::{Context, Result};
use clap::Parser;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

pub(crate) const DEFAULT_PALETTE: [&str; 6] = [
    "#ff7675", "#74b9ff", "#55efc4", "#ffeaa7", "#fd79a8", "#a29bfe",
];

#[derive(Parser, Debug, Clone)]
#[command(name = "nightburst")]
#[command(about = "Click anywhere in the terminal to launch fireworks over a night sky")]
pub(crate) struct Cli {
    /// Settings file (JSON). Defaults to the per-user config directory.
    #[arg(long)]
    pub(crate) config: Option<PathBuf>,

    /// Write the effective settings back to the settings file and continue
    #[arg(long, default_value_t = false)]
    pub(crate) save_config: bool,

    /// Frame rate cap
    #[arg(long)]
    pub(crate) fps: Option<u32>,

    /// Surface units per braille dot (bigger = everything looks smaller)
    #[arg(long)]
    pub(crate) scale: Option<f32>,

    /// Particles per burst
    #[arg(long)]
    pub(crate) burst: Option<usize>,

    /// Number of background stars
    #[arg(long)]
    pub(crate) stars: Option<usize>,

    /// Text shown after each click
    #[arg(long)]
    pub(crate) message: Option<String>,

    /// Seed for the random generator
    #[arg(long)]
    pub(crate) seed: Option<u64>,

    /// Disable the terminal bell on bursts
    #[arg(long, default_value_t = false)]
    pub(crate) mute: bool,

    /// Append trace logs to this file
    #[arg(long)]
    pub(crate) log_file: Option<PathBuf>,

    /// Most verbose level written to the log file (error, warn, info, debug, trace)
    #[arg(long, default_value_t = tracing::Level::DEBUG)]
    pub(crate) log_level: tracing::Level,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct Settings {
    pub(crate) fps_cap: u32,
    pub(crate) units_per_subpixel: f32,
    pub(crate) burst_size: usize,
    pub(crate) star_count: usize,
    pub(crate) overlay_ms: u64,
    pub(crate) message: String,
    pub(crate) palette: Vec<String>,
    pub(crate) sound: bool,
    pub(crate) seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            fps_cap: 60,
            units_per_subpixel: 4.0,
            burst_size: DEFAULT_BURST_SIZE,
            star_count: DEFAULT_STAR_COUNT,
            overlay_ms: 3000,
            message: "Happy New Year!".to_string(),
            palette: DEFAULT_PALETTE.iter().map(|s| s.to_string()).collect(),
            sound: true,
            seed: None,
        }
    }
}

impl Settings {
    /// Command-line flags win over the file.
    pub(crate) fn apply_cli(&mut self, cli: &Cli) {
        if let Some(v) = cli.fps {
            self.fps_cap = v;
        }
        if let Some(v) = cli.scale {
            self.units_per_subpixel = v;
        }
        if let Some(v) = cli.burst {
            self.burst_size = v;
        }
        if let Some(v) = cli.stars {
            self.star_count = v;
        }
        if let Some(v) = &cli.message {
            self.message = v.clone();
        }
        if cli.seed.is_some() {
            self.seed = cli.seed;
        }
        if cli.mute {
            self.sound = false;
        }
    }

    pub(crate) fn validated(mut self) -> Self {
        self.fps_cap = self.fps_cap.clamp(10, 240);
        if !self.units_per_subpixel.is_finite() {
            self.units_per_subpixel = Settings::default().units_per_subpixel;
        }
        self.units_per_subpixel = self.units_per_subpixel.clamp(0.5, 32.0);
        self.burst_size = self.burst_size.min(5_000);
        self.star_count = self.star_count.min(10_000);
        self
    }

    pub(crate) fn palette_rgb(&self) -> Result<Vec<Rgb>> {
        self.palette
            .iter()
            .map(|s| {
                s.parse::<Rgb>()
                    .with_context(|| format!("invalid palette color `{s}`"))
            })
            .collect()
    }

    pub(crate) fn overlay_delay(&self) -> Duration {
        Duration::from_millis(self.overlay_ms)
    }
}

pub(crate) fn default_settings_path() -> Result<PathBuf> {
    let proj = ProjectDirs::from("com", "nightburst", "Nightburst")
        .context("could not resolve project directories")?;
    let dir = proj.config_dir().to_path_buf();
    fs::create_dir_all(&dir).ok();
    Ok(dir.join("settings.json"))
}

/// Missing or unreadable settings fall back to defaults.
pub(crate) fn load_settings(path: &Path) -> Settings {
    let text = match fs::read_to_string(path) {
        Ok(s) => s,
        Err(_) => return Settings::default(),
    };
    match serde_json::from_str::<Settings>(&text) {
        Ok(v) => v,
        Err(e) => {
            tracing::warn!("ignoring {}: {e}", path.display());
            Settings::default()
        }
    }
}

pub(crate) fn save_settings_atomic(path: &Path, s: &Settings) -> Result<()> {
    let tmp = path.with_extension("json.tmp");
    let data = serde_json::to_vec_pretty(s)?;
    fs::write(&tmp, data).with_context(|| format!("writing {}", tmp.display()))?;
    atomic_rename(&tmp, path)?;
    Ok(())
}

fn atomic_rename(from: &Path, to: &Path) -> Result<()> {
    // rename-over-existing fails on Windows
    if cfg!(windows) && to.exists() {
        let _ = fs::remove_file(to);
    }
    fs::rename(from, to).with_context(|| format!("replacing {}", to.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("nightburst-{}-{name}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        dir.join("settings.json")
    }

    #[test]
    fn defaults_match_the_classic_show() {
        let s = Settings::default();
        assert_eq!(s.burst_size, 50);
        assert_eq!(s.star_count, 100);
        assert_eq!(s.overlay_delay(), Duration::from_millis(3000));
        assert_eq!(s.palette_rgb().unwrap().len(), 6);
    }

    #[test]
    fn missing_file_gives_defaults() {
        let path = scratch("missing").with_file_name("nope.json");
        assert_eq!(load_settings(&path), Settings::default());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let path = scratch("partial");
        fs::write(&path, r#"{ "burst_size": 80, "message": "boom" }"#).unwrap();
        let s = load_settings(&path);
        assert_eq!(s.burst_size, 80);
        assert_eq!(s.message, "boom");
        assert_eq!(s.star_count, 100);
    }

    #[test]
    fn garbage_file_gives_defaults() {
        let path = scratch("garbage");
        fs::write(&path, "not json").unwrap();
        assert_eq!(load_settings(&path), Settings::default());
    }

    #[test]
    fn save_then_load() {
        let path = scratch("save");
        let s = Settings {
            seed: Some(42),
            sound: false,
            ..Settings::default()
        };
        save_settings_atomic(&path, &s).unwrap();
        save_settings_atomic(&path, &s).unwrap();
        assert_eq!(load_settings(&path), s);
    }

    #[test]
    fn cli_overrides_and_validation() {
        let cli = Cli::parse_from([
            "nightburst", "--fps", "1000", "--burst", "20", "--mute", "--seed", "9", "--scale", "0",
        ]);
        let mut s = Settings::default();
        s.apply_cli(&cli);
        let s = s.validated();
        assert_eq!(s.fps_cap, 240);
        assert_eq!(s.burst_size, 20);
        assert_eq!(s.seed, Some(9));
        assert_eq!(s.units_per_subpixel, 0.5);
        assert!(!s.sound);
    }

    #[test]
    fn log_level_defaults_to_debug() {
        let cli = Cli::parse_from(["nightburst"]);
        assert_eq!(cli.log_level, tracing::Level::DEBUG);

        let cli = Cli::parse_from(["nightburst", "--log-file", "x.log", "--log-level", "warn"]);
        assert_eq!(cli.log_level, tracing::Level::WARN);
        assert!(Cli::try_parse_from(["nightburst", "--log-level", "loud"]).is_err());
    }

    #[test]
    fn bad_palette_is_reported() {
        let s = Settings {
            palette: vec!["#ff7675".into(), "nope".into()],
            ..Settings::default()
        };
        let err = s.palette_rgb().unwrap_err();
        assert!(err.to_string().contains("nope"));
    }
}
