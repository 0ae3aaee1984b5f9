use crate::color::Rgb;
use crate::config::{default_settings_path, load_settings, save_settings_atomic, Cli, Settings};
use crate::input::{collect_input_nonblocking, InputEvent};
use crate::sound::{Silent, SoundEffect, TerminalBell};
use crate::term::{centered_x, draw_text, Terminal};
use crate::world::{World, WorldParams};
use anyhow::Context;
use rand::{rngs::StdRng, SeedableRng};
use std::time::{Duration, Instant};

const MESSAGE_COLOR: Rgb = Rgb::new(0xff, 0xea, 0xa7);
const HUD_COLOR: Rgb = Rgb::new(0x9a, 0x9a, 0xc8);

pub(crate) struct App {
    term: Terminal,
    world: World,
    frame_dt: Duration,
    should_quit: bool,
}

impl App {
    fn init(settings: &Settings) -> anyhow::Result<Self> {
        let palette = settings.palette_rgb()?;
        let rng = match settings.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let sound: Box<dyn SoundEffect> = if settings.sound {
            Box::new(TerminalBell::stdout())
        } else {
            Box::new(Silent)
        };

        let term = Terminal::begin(settings.units_per_subpixel)?;
        let (width, height) = term.viewport();
        tracing::info!(
            "terminal {}x{} cells, viewport {width:.0}x{height:.0} units",
            term.cols,
            term.rows
        );

        let world = World::new(
            WorldParams {
                width,
                height,
                palette,
                burst_size: settings.burst_size,
                star_count: settings.star_count,
                message: settings.message.clone(),
                overlay_delay: settings.overlay_delay(),
            },
            sound,
            rng,
        );

        Ok(Self {
            term,
            world,
            frame_dt: Duration::from_secs_f32(1.0 / settings.fps_cap as f32),
            should_quit: false,
        })
    }

    fn run(&mut self) -> anyhow::Result<()> {
        while !self.should_quit {
            let frame_start = Instant::now();

            for ev in collect_input_nonblocking()? {
                self.handle(ev, frame_start);
            }
            if self.should_quit {
                break;
            }
            self.world.run_timers(frame_start);

            self.render_frame()?;

            spin_sleep(self.frame_dt, frame_start);
        }
        Ok(())
    }

    fn handle(&mut self, ev: InputEvent, now: Instant) {
        match ev {
            InputEvent::Click { col, row } => {
                let (x, y) = self.term.cell_to_surface(col, row);
                self.world.click(x, y, now);
            }
            InputEvent::Resize { cols, rows } => {
                self.term.resize(cols, rows);
                let (w, h) = self.term.viewport();
                self.world.resize(w, h);
            }
            InputEvent::Quit => self.should_quit = true,
        }
    }

    fn render_frame(&mut self) -> anyhow::Result<()> {
        self.world.frame(&mut self.term.canvas);
        self.term.canvas.to_cells(&mut self.term.cur);

        let overlay = &self.world.overlay;
        if overlay.is_visible() {
            let row = (self.term.rows / 6) as i32;
            let x = centered_x(self.term.cols, &overlay.text);
            draw_text(
                &mut self.term.cur,
                x,
                row,
                &overlay.text,
                MESSAGE_COLOR,
                overlay.opacity(),
            );
        }

        let hud = format!(
            " click to launch | q quit | {} sparks",
            self.world.particles.len()
        );
        let last_row = self.term.rows.saturating_sub(1) as i32;
        draw_text(&mut self.term.cur, 0, last_row, &hud, HUD_COLOR, 0.6);

        self.term.present()
    }
}

pub(crate) fn run(cli: Cli) -> anyhow::Result<()> {
    let path = match &cli.config {
        Some(p) => p.clone(),
        None => default_settings_path()?,
    };
    let mut settings = load_settings(&path);
    settings.apply_cli(&cli);
    let settings = settings.validated();

    if cli.save_config {
        save_settings_atomic(&path, &settings)
            .with_context(|| format!("saving settings to {}", path.display()))?;
        tracing::info!("settings written to {}", path.display());
    }

    let mut app = App::init(&settings)?;
    let result = app.run();
    let restored = app.term.end();
    first_error(result, restored)
}

/// The loop error wins; a failed terminal restore after it is only logged.
fn first_error(run: anyhow::Result<()>, restore: anyhow::Result<()>) -> anyhow::Result<()> {
    match run {
        Err(e) => {
            if let Err(restore_err) = restore {
                tracing::error!("restoring terminal after failure: {restore_err:#}");
            }
            Err(e)
        }
        Ok(()) => restore,
    }
}

/* -----------------------------
   Frame pacing helper
------------------------------ */

fn spin_sleep(target: Duration, start: Instant) {
    let end = start + target;
    loop {
        let t = Instant::now();
        if t >= end {
            break;
        }
        let left = end - t;
        if left > Duration::from_millis(2) {
            std::thread::sleep(Duration::from_millis(1));
        } else {
            std::hint::spin_loop();
        }
    }
}
