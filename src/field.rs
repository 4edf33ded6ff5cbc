use crate::config::SimulationConfig;
use crate::particle::ParticlePool;
use crate::pointer::PointerTracker;
use crate::render::{self, Surface};
use crate::simulation;
use crate::viewport::{ViewportDimensions, ViewportMonitor};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// One particle field instance: everything a frame reads or writes lives here.
///
/// Pointer and resize notifications mutate this state between frames; `tick` and
/// `render` read it on the next frame. Instances share nothing.
pub struct ParticleField {
    pub config: SimulationConfig,
    pub pool: ParticlePool,
    pub pointer: PointerTracker,
    pub viewport: ViewportMonitor,
    rng: StdRng,
}

impl ParticleField {
    /// Create a field and seed it for the viewport. `seed` pins the random source for repeatable runs.
    pub fn new(config: SimulationConfig, viewport: ViewportMonitor, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let mut field = Self {
            config,
            pool: ParticlePool::new(),
            pointer: PointerTracker::new(),
            viewport,
            rng,
        };
        field.reseed();
        field
    }

    pub fn dimensions(&self) -> ViewportDimensions {
        self.viewport.dimensions()
    }

    /// Throw away every particle and seed a new batch for the current size
    pub fn reseed(&mut self) {
        let dims = self.dimensions();
        self.pool
            .initialize(dims.width, dims.height, &self.config, &mut self.rng);
        log::info!(
            "seeded {} particles for {:.0}x{:.0} (generation {})",
            self.pool.len(),
            dims.width,
            dims.height,
            self.pool.generation
        );
    }

    /// Terminal resized to `columns` x `rows`. Reseeds synchronously when the size changed.
    pub fn resize(&mut self, columns: u16, rows: u16) -> bool {
        if !self.viewport.observe(columns, rows) {
            return false;
        }
        self.reseed();
        true
    }

    /// Pointer moved over terminal cell (`column`, `row`)
    pub fn pointer_moved(&mut self, column: u16, row: u16) {
        let (x, y) = self.viewport.cell_to_surface(column, row);
        self.pointer.record(x, y);
    }

    /// Advance every particle one frame
    pub fn tick(&mut self) {
        let bounds = self.viewport.dimensions();
        simulation::step(
            &mut self.pool.particles,
            self.pointer.sample(),
            bounds,
            &self.config,
        );
    }

    /// Draw the current state
    pub fn render<S: Surface>(&self, surface: &mut S) {
        render::render(&self.pool.particles, surface, &self.config);
    }
}
