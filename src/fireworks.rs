use crate::color::Rgb;
use crate::particle::Particle;
use crate::sound::SoundEffect;
use crate::surface::Surface;
use rand::seq::SliceRandom;
use rand::Rng;

pub(crate) const DEFAULT_BURST_SIZE: usize = 50;

/// Owns every live particle plus the burst sound.
pub(crate) struct ParticleSystem {
    particles: Vec<Particle>,
    sound: Box<dyn SoundEffect>,
}

impl ParticleSystem {
    pub(crate) fn new(sound: Box<dyn SoundEffect>) -> Self {
        Self {
            particles: Vec::new(),
            sound,
        }
    }

    pub(crate) fn spawn_burst<R: Rng + ?Sized>(
        &mut self,
        x: f32,
        y: f32,
        count: usize,
        palette: &[Rgb],
        rng: &mut R,
    ) {
        // sound is optional; a blocked or missing bell never stops the burst
        if let Err(e) = self.sound.restart_and_play() {
            tracing::debug!("burst sound failed: {e}");
        }

        if palette.is_empty() {
            tracing::warn!("burst at ({x:.1}, {y:.1}) skipped: empty palette");
            return;
        }

        self.particles.reserve(count);
        for _ in 0..count {
            let color = palette.choose(rng).copied().unwrap_or(Rgb::WHITE);
            self.particles.push(Particle::new(x, y, color, rng));
        }
        tracing::debug!(
            "burst of {count} at ({x:.1}, {y:.1}), {} live",
            self.particles.len()
        );
    }

    /// Advance, draw, and prune every particle once.
    pub(crate) fn tick(&mut self, surface: &mut dyn Surface) {
        self.particles.retain_mut(|p| {
            p.advance();
            p.render(surface);
            !p.is_expired()
        });
    }

    pub(crate) fn len(&self) -> usize {
        self.particles.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sound::counting::CountingSound;
    use crate::surface::recording::RecordingSurface;
    use rand::{rngs::StdRng, SeedableRng};

    impl ParticleSystem {
        pub(crate) fn is_empty(&self) -> bool {
            self.particles.is_empty()
        }

        pub(crate) fn iter(&self) -> impl Iterator<Item = &Particle> {
            self.particles.iter()
        }
    }

    fn palette() -> Vec<Rgb> {
        vec![Rgb::new(255, 118, 117), Rgb::new(116, 185, 255), Rgb::new(85, 239, 196)]
    }

    #[test]
    fn burst_adds_exactly_count_with_palette_colors() {
        let sound = CountingSound::default();
        let mut sys = ParticleSystem::new(Box::new(sound.clone()));
        let mut rng = StdRng::seed_from_u64(1);
        let pal = palette();

        sys.spawn_burst(400.0, 300.0, DEFAULT_BURST_SIZE, &pal, &mut rng);
        assert_eq!(sys.len(), 50);
        sys.spawn_burst(10.0, 10.0, DEFAULT_BURST_SIZE, &pal, &mut rng);
        assert_eq!(sys.len(), 100);

        assert!(sys.iter().all(|p| pal.contains(&p.color())));
        assert_eq!(sound.plays.get(), 2);
    }

    #[test]
    fn sound_failure_does_not_stop_burst() {
        let sound = CountingSound {
            fail: true,
            ..Default::default()
        };
        let mut sys = ParticleSystem::new(Box::new(sound.clone()));
        let mut rng = StdRng::seed_from_u64(2);
        sys.spawn_burst(0.0, 0.0, 12, &palette(), &mut rng);
        assert_eq!(sys.len(), 12);
        assert_eq!(sound.plays.get(), 1);
    }

    #[test]
    fn empty_palette_spawns_nothing() {
        let mut sys = ParticleSystem::new(Box::new(CountingSound::default()));
        let mut rng = StdRng::seed_from_u64(3);
        sys.spawn_burst(0.0, 0.0, 50, &[], &mut rng);
        assert!(sys.is_empty());
    }

    #[test]
    fn tick_draws_each_particle_and_prunes_expired() {
        let mut sys = ParticleSystem::new(Box::new(CountingSound::default()));
        let mut rng = StdRng::seed_from_u64(4);
        sys.spawn_burst(100.0, 100.0, 50, &palette(), &mut rng);

        let mut ticks = 0;
        while !sys.is_empty() {
            let before = sys.len();
            let mut s = RecordingSurface::default();
            sys.tick(&mut s);
            ticks += 1;

            assert_eq!(s.circles().count(), before);
            assert!(sys.iter().all(|p| !p.is_expired()));
            assert!(ticks <= 201);
        }
        // slowest possible decay is just above 0.005
        assert!(ticks > 50);
    }
}
