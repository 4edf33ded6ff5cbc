use crate::config::{Rgba, SimulationConfig};
use rand::Rng;

/// A drifting point in surface space
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    /// Fixed at creation
    pub radius: f32,
    /// Fixed at creation; carried but not applied when drawing
    pub opacity: f32,
    pub color: Rgba,
}

impl Particle {
    #[cfg(test)]
    pub fn speed(&self) -> f32 {
        (self.vx * self.vx + self.vy * self.vy).sqrt()
    }
}

/// The current batch of particles for one viewport size
#[derive(Debug, Clone, Default)]
pub struct ParticlePool {
    pub particles: Vec<Particle>,
    /// Bumped on every (re)initialization
    pub generation: u64,
}

/// Number of particles for a viewport: one per `density_divisor` px² of area
pub fn particle_count(width: f32, height: f32, config: &SimulationConfig) -> usize {
    if width <= 0.0 || height <= 0.0 || config.density_divisor <= 0.0 {
        return 0;
    }
    (width * height / config.density_divisor).floor() as usize
}

impl ParticlePool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Discard every particle and seed a fresh batch sized for `width` x `height`
    pub fn initialize<R: Rng>(
        &mut self,
        width: f32,
        height: f32,
        config: &SimulationConfig,
        rng: &mut R,
    ) {
        let count = particle_count(width, height, config);
        let jitter = config.velocity_jitter.abs();

        self.particles = (0..count)
            .map(|_| Particle {
                x: rng.gen_range(0.0..width),
                y: rng.gen_range(0.0..height),
                vx: rng.gen_range(-jitter..=jitter),
                vy: rng.gen_range(-jitter..=jitter),
                radius: rng.gen_range(config.radius_range.clone()),
                opacity: rng.gen_range(config.opacity_range.clone()),
                color: pick_color(config.palette, rng),
            })
            .collect();
        self.generation += 1;
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }
}

fn pick_color<R: Rng>(palette: &[Rgba], rng: &mut R) -> Rgba {
    if palette.is_empty() {
        return Rgba::opaque(255, 255, 255);
    }
    palette[rng.gen_range(0..palette.len())]
}
