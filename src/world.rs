use crate::backdrop::Backdrop;
use crate::color::Rgb;
use crate::fireworks::ParticleSystem;
use crate::overlay::{DelayQueue, MessageOverlay};
use crate::sound::SoundEffect;
use crate::surface::Surface;
use rand::rngs::StdRng;
use std::time::{Duration, Instant};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum TimerAction {
    HideMessage,
}

pub(crate) struct WorldParams {
    pub(crate) width: f32,
    pub(crate) height: f32,
    pub(crate) palette: Vec<Rgb>,
    pub(crate) burst_size: usize,
    pub(crate) star_count: usize,
    pub(crate) message: String,
    pub(crate) overlay_delay: Duration,
}

/// Everything the render loop reads or mutates, for the life of the process.
pub(crate) struct World {
    width: f32,
    height: f32,
    pub(crate) particles: ParticleSystem,
    pub(crate) backdrop: Backdrop,
    pub(crate) overlay: MessageOverlay,
    timers: DelayQueue<TimerAction>,
    palette: Vec<Rgb>,
    burst_size: usize,
    overlay_delay: Duration,
    rng: StdRng,
}

impl World {
    pub(crate) fn new(params: WorldParams, sound: Box<dyn SoundEffect>, mut rng: StdRng) -> Self {
        let backdrop = Backdrop::new(params.width, params.height, params.star_count, &mut rng);
        Self {
            width: params.width,
            height: params.height,
            particles: ParticleSystem::new(sound),
            backdrop,
            overlay: MessageOverlay::new(params.message),
            timers: DelayQueue::default(),
            palette: params.palette,
            burst_size: params.burst_size,
            overlay_delay: params.overlay_delay,
            rng,
        }
    }

    /// A click: burst at the point, show the message, schedule its hide.
    ///
    /// The hide is never cancelled, so an older click's timer can hide the
    /// message shown by a newer click.
    pub(crate) fn click(&mut self, x: f32, y: f32, now: Instant) {
        self.particles
            .spawn_burst(x, y, self.burst_size, &self.palette, &mut self.rng);
        self.overlay.show();
        self.timers
            .schedule(now, self.overlay_delay, TimerAction::HideMessage);
    }

    pub(crate) fn resize(&mut self, width: f32, height: f32) {
        self.width = width.max(0.0);
        self.height = height.max(0.0);
        self.backdrop.resize(self.width, self.height, &mut self.rng);
        tracing::info!("viewport resized to {:.0}x{:.0}", self.width, self.height);
    }

    pub(crate) fn run_timers(&mut self, now: Instant) {
        for action in self.timers.drain_due(now) {
            match action {
                TimerAction::HideMessage => self.overlay.hide(),
            }
        }
    }

    /// One frame tick: clear, backdrop, particles.
    pub(crate) fn frame(&mut self, surface: &mut dyn Surface) {
        surface.clear();
        self.backdrop.render(surface, self.width, self.height);
        self.particles.tick(surface);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backdrop::DEFAULT_STAR_COUNT;
    use crate::fireworks::DEFAULT_BURST_SIZE;
    use crate::sound::counting::CountingSound;
    use crate::surface::recording::{Op, RecordingSurface};
    use rand::SeedableRng;

    impl World {
        fn size(&self) -> (f32, f32) {
            (self.width, self.height)
        }
    }

    fn world(sound: CountingSound) -> World {
        let params = WorldParams {
            width: 800.0,
            height: 600.0,
            palette: vec![
                "#ff7675".parse().unwrap(),
                "#74b9ff".parse().unwrap(),
                "#55efc4".parse().unwrap(),
            ],
            burst_size: DEFAULT_BURST_SIZE,
            star_count: DEFAULT_STAR_COUNT,
            message: "Happy New Year!".into(),
            overlay_delay: Duration::from_millis(3000),
        };
        World::new(params, Box::new(sound), StdRng::seed_from_u64(2024))
    }

    #[test]
    fn click_burst_then_everything_fades() {
        let sound = CountingSound::default();
        let mut w = world(sound.clone());
        let t0 = Instant::now();
        assert_eq!(w.particles.len(), 0);

        w.click(400.0, 300.0, t0);
        assert_eq!(w.particles.len(), 50);
        assert_eq!(w.overlay.opacity(), 1.0);
        assert_eq!(sound.plays.get(), 1);

        w.run_timers(t0 + Duration::from_millis(2999));
        assert_eq!(w.overlay.opacity(), 1.0);
        w.run_timers(t0 + Duration::from_millis(3000));
        assert_eq!(w.overlay.opacity(), 0.0);

        let mut s = RecordingSurface::default();
        for _ in 0..201 {
            w.frame(&mut s);
        }
        assert!(w.particles.is_empty());
    }

    #[test]
    fn frame_clears_then_draws_backdrop_then_particles() {
        let mut w = world(CountingSound::default());
        w.click(400.0, 300.0, Instant::now());

        let mut s = RecordingSurface::default();
        w.frame(&mut s);

        assert_eq!(s.ops[0], Op::Clear);
        // sky + stars + moon + ground
        let backdrop_ops = 1 + DEFAULT_STAR_COUNT + 1 + 1;
        assert!(matches!(s.ops[1], Op::Rect { .. }));
        assert!(matches!(s.ops[backdrop_ops], Op::Rect { .. }));
        assert_eq!(s.ops.len(), 1 + backdrop_ops + 50);
        assert!(s.ops[1 + backdrop_ops..]
            .iter()
            .all(|op| matches!(op, Op::Circle { alpha, .. } if *alpha < 1.0)));
    }

    #[test]
    fn burst_only_shows_from_the_next_frame() {
        let mut w = world(CountingSound::default());
        let mut s = RecordingSurface::default();
        w.frame(&mut s);
        let quiet = s.ops.len();

        w.click(10.0, 10.0, Instant::now());
        let mut s = RecordingSurface::default();
        w.frame(&mut s);
        assert_eq!(s.ops.len(), quiet + 50);
    }

    #[test]
    fn early_hide_timer_hides_later_message() {
        let mut w = world(CountingSound::default());
        let t0 = Instant::now();
        w.click(100.0, 100.0, t0);
        w.click(200.0, 200.0, t0 + Duration::from_millis(2000));

        w.run_timers(t0 + Duration::from_millis(3000));
        assert!(!w.overlay.is_visible());

        w.overlay.show();
        w.run_timers(t0 + Duration::from_millis(5000));
        assert!(!w.overlay.is_visible());
    }

    #[test]
    fn resize_replaces_backdrop() {
        let mut w = world(CountingSound::default());
        let before = w.backdrop.stars().to_vec();

        w.resize(1000.0, 700.0);

        assert_eq!(w.size(), (1000.0, 700.0));
        assert_eq!(w.backdrop.stars().len(), 100);
        assert_ne!(w.backdrop.stars(), before.as_slice());
        assert_eq!((w.backdrop.moon().x, w.backdrop.moon().y), (800.0, 140.0));
    }
}
